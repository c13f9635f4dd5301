//! Detection of the notebook front-end the process runs under.

use std::fmt;

/// Where rendered HTML is likely to end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Google Colab. Relative image paths do not resolve there, so
    /// callers should embed images as base64.
    Colab,
    /// A Jupyter kernel (including evcxr).
    Jupyter,
    /// Anything else.
    Terminal,
}

impl Environment {
    /// Detect from the process environment.
    #[must_use]
    pub fn detect() -> Self {
        Self::detect_with(|key| std::env::var_os(key).is_some())
    }

    /// Detect using `is_set` to check whether a variable is present.
    #[must_use]
    pub fn detect_with(is_set: impl Fn(&str) -> bool) -> Self {
        if is_set("COLAB_RELEASE_TAG") || is_set("COLAB_GPU") {
            Self::Colab
        } else if is_set("JPY_PARENT_PID") {
            Self::Jupyter
        } else {
            Self::Terminal
        }
    }

    /// Whether local file paths may fail to display and base64
    /// embedding should be forced.
    #[must_use]
    pub const fn prefers_base64(self) -> bool {
        matches!(self, Self::Colab)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Colab => "colab",
            Self::Jupyter => "jupyter",
            Self::Terminal => "terminal",
        })
    }
}
