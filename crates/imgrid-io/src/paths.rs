//! Classification and rewriting of image location strings.

use std::path::{Component, Path, PathBuf};

/// Prefixes that mark a location as remote (or otherwise not a local
/// filesystem path). Matched case-insensitively.
pub const REMOTE_PREFIXES: [&str; 6] = ["http:", "https:", "ftp:", "www.", "data:", "file:"];

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Whether `location` is a URL or URI rather than a local path.
#[must_use]
pub fn is_remote(location: &str) -> bool {
    REMOTE_PREFIXES
        .iter()
        .any(|prefix| starts_with_ignore_case(location, prefix))
}

/// Whether `location` is served over HTTP(S). Bare `www.` hosts count.
#[must_use]
pub fn is_http(location: &str) -> bool {
    ["http:", "https:", "www."]
        .iter()
        .any(|prefix| starts_with_ignore_case(location, prefix))
}

/// Rewrite a local path relative to `base`.
///
/// Purely lexical: nothing is resolved against the filesystem and
/// symlinks are not followed. A relative `path` is first joined onto
/// `base`. If the two share no common root (different drive prefixes on
/// Windows) the absolute path is returned unchanged. Identical paths
/// yield `"."`.
#[must_use]
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let absolute = normalize(&base.join(path));
    let base = normalize(base);

    let target: Vec<Component<'_>> = absolute.components().collect();
    let from: Vec<Component<'_>> = base.components().collect();

    if target.first() != from.first() {
        return absolute;
    }

    let common = target
        .iter()
        .zip(&from)
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = PathBuf::new();
    for _ in common..from.len() {
        out.push("..");
    }
    for part in &target[common..] {
        out.push(part.as_os_str());
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Rewrite a local path relative to the process's current directory.
///
/// Remote locations and paths that cannot be relativized (no current
/// directory) are returned unchanged.
#[must_use]
pub fn relative_to_cwd(location: &str) -> String {
    if is_remote(location) {
        return location.to_owned();
    }
    match std::env::current_dir() {
        Ok(cwd) => relative_to(Path::new(location), &cwd)
            .to_string_lossy()
            .into_owned(),
        Err(err) => {
            tracing::debug!(location, %err, "no current directory, keeping path as-is");
            location.to_owned()
        }
    }
}

/// Collapse `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)))
                    && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
