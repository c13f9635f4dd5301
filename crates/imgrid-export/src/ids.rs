//! Element id generation.
//!
//! Every style block is scoped to ids minted here so several widgets can
//! live in one notebook page without their CSS interfering.

/// Source of unique ids for HTML elements and CSS selectors.
///
/// Ids must be valid in both `id` attributes and CSS selectors without
/// escaping: ASCII letters, digits, `-` and `_` only.
pub trait IdGenerator {
    /// Return a fresh id, distinct from every id returned before.
    fn next_id(&mut self) -> String;
}

impl<G: IdGenerator + ?Sized> IdGenerator for &mut G {
    fn next_id(&mut self) -> String {
        (**self).next_id()
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn next_id(&mut self) -> String {
        (**self).next_id()
    }
}

/// Random v4 UUIDs in simple (hyphen-free) form.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic ids `<prefix>0`, `<prefix>1`, ...
///
/// Useful for reproducible output (snapshot files, tests).
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    /// Start counting from zero with the given prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
