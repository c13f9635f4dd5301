//! Normalization of caller-supplied image collections.
//!
//! Every accepted external collection type has exactly one adapter
//! here, and each produces an [`ImageBatch`]: an ordered `Vec` of
//! [`ImageRef`] plus the [`BatchKind`] observed on its first element.
//! Everything downstream works on `ImageBatch` only.

use std::fmt;
use std::path::PathBuf;

use crate::types::{DynamicImage, ImageRef, PipelineError, PixelArray, PixelData, sample_count};

/// Variant of the first element of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    /// The batch has no elements.
    Empty,
    /// First element is a path or URL.
    Paths,
    /// First element is a pixel buffer.
    Pixels,
    /// First element is a decoded image; the batch holds whole images.
    Images,
}

impl fmt::Display for BatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty"),
            Self::Paths => f.write_str("paths"),
            Self::Pixels => f.write_str("pixel arrays"),
            Self::Images => f.write_str("images"),
        }
    }
}

/// An ordered, normalized collection of images.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBatch {
    kind: BatchKind,
    items: Vec<ImageRef>,
}

impl ImageBatch {
    /// Build a batch from already-typed references, which may mix
    /// variants. The kind is taken from the first element.
    #[must_use]
    pub fn from_refs(items: Vec<ImageRef>) -> Self {
        let kind = match items.first() {
            None => BatchKind::Empty,
            Some(ImageRef::Path(_)) => BatchKind::Paths,
            Some(ImageRef::Pixels(_)) => BatchKind::Pixels,
            Some(ImageRef::Image(_)) => BatchKind::Images,
        };
        tracing::debug!(count = items.len(), %kind, "normalized image batch");
        Self { kind, items }
    }

    /// Adapter for a sequence of path or URL strings.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_refs(paths.into_iter().map(|p| ImageRef::Path(p.into())).collect())
    }

    /// Adapter for filesystem paths.
    ///
    /// Non-UTF-8 paths are converted lossily.
    pub fn from_path_bufs<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        Self::from_paths(
            paths
                .into_iter()
                .map(|p| p.to_string_lossy().into_owned()),
        )
    }

    /// Adapter for a sequence of pixel buffers.
    pub fn from_pixel_arrays<I>(arrays: I) -> Self
    where
        I: IntoIterator<Item = PixelArray>,
    {
        Self::from_refs(arrays.into_iter().map(ImageRef::Pixels).collect())
    }

    /// Adapter for decoded images. Each image stays a single element; it
    /// is never split into pixel rows or channels.
    pub fn from_images<I>(images: I) -> Self
    where
        I: IntoIterator<Item = DynamicImage>,
    {
        Self::from_refs(images.into_iter().map(ImageRef::Image).collect())
    }

    /// Adapter for one stacked `count x height x width x channels` buffer,
    /// split into `count` pixel arrays.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::PixelCountMismatch`] if `data` does not
    /// hold exactly `count * height * width * channels` samples,
    /// [`PipelineError::ShapeOverflow`] if that product does not fit in
    /// `usize`, or a layout error from [`PixelArray::new`].
    pub fn from_stacked(
        count: usize,
        height: u32,
        width: u32,
        channels: u8,
        data: PixelData,
    ) -> Result<Self, PipelineError> {
        let overflow = || PipelineError::ShapeOverflow {
            count,
            width,
            height,
            channels,
        };
        let per_image = sample_count(1, width, height, channels).ok_or_else(overflow)?;
        let expected = sample_count(count, width, height, channels).ok_or_else(overflow)?;
        if data.len() != expected {
            return Err(PipelineError::PixelCountMismatch {
                expected,
                actual: data.len(),
            });
        }

        let arrays = match data {
            PixelData::U8(v) => split_stacked(&v, per_image, count, PixelData::U8),
            PixelData::F32(v) => split_stacked(&v, per_image, count, PixelData::F32),
            PixelData::F64(v) => split_stacked(&v, per_image, count, PixelData::F64),
        };
        let arrays = arrays
            .into_iter()
            .map(|chunk| PixelArray::new(width, height, channels, chunk))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_pixel_arrays(arrays))
    }

    /// Variant observed on the first element.
    #[must_use]
    pub const fn kind(&self) -> BatchKind {
        self.kind
    }

    /// Number of images.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the batch is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The images in order.
    #[must_use]
    pub fn items(&self) -> &[ImageRef] {
        &self.items
    }

    /// Consume the batch and return the images.
    #[must_use]
    pub fn into_items(self) -> Vec<ImageRef> {
        self.items
    }
}

impl From<Vec<ImageRef>> for ImageBatch {
    fn from(items: Vec<ImageRef>) -> Self {
        Self::from_refs(items)
    }
}

fn split_stacked<T: Clone>(
    samples: &[T],
    per_image: usize,
    count: usize,
    wrap: fn(Vec<T>) -> PixelData,
) -> Vec<PixelData> {
    if per_image == 0 {
        return (0..count).map(|_| wrap(Vec::new())).collect();
    }
    samples
        .chunks_exact(per_image)
        .map(|chunk| wrap(chunk.to_vec()))
        .collect()
}
