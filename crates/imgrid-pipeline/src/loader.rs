//! Byte sources for [`ImageRef::Path`](crate::ImageRef::Path) images.
//!
//! The pipeline never touches the filesystem or network itself.
//! Resolving a path or URL to bytes is delegated to an [`ImageLoader`],
//! so the same encoder works against local files, HTTP, or bytes the
//! caller already holds.

use std::collections::HashMap;

use crate::types::LoadError;

/// Fetches the encoded bytes stored at a path or URL.
pub trait ImageLoader {
    /// Return the raw (still encoded) image bytes for `location`.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the location cannot be read.
    fn load(&self, location: &str) -> Result<Vec<u8>, LoadError>;
}

impl<L: ImageLoader + ?Sized> ImageLoader for &L {
    fn load(&self, location: &str) -> Result<Vec<u8>, LoadError> {
        (**self).load(location)
    }
}

impl<L: ImageLoader + ?Sized> ImageLoader for Box<L> {
    fn load(&self, location: &str) -> Result<Vec<u8>, LoadError> {
        (**self).load(location)
    }
}

/// Loader backed by an in-memory map of location to bytes.
///
/// Useful when the caller has already fetched the images, and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryLoader {
    /// Create an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `location`, replacing any previous entry.
    #[must_use]
    pub fn with(mut self, location: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.entries.insert(location.into(), bytes);
        self
    }
}

impl ImageLoader for MemoryLoader {
    fn load(&self, location: &str) -> Result<Vec<u8>, LoadError> {
        self.entries.get(location).cloned().ok_or_else(|| {
            LoadError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no entry for {location}"),
            ))
        })
    }
}
