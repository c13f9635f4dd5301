//! Shared types for the imgrid pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Re-export `DynamicImage` so downstream crates can hand over decoded
/// images without depending on `image` directly.
pub use image::DynamicImage;

/// A class label attached to an image.
///
/// Labels are totally ordered: every [`Label::Int`] sorts before every
/// [`Label::Text`], integers compare numerically and text compares
/// lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    /// Integer class id.
    Int(i64),
    /// Named class.
    Text(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Label {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Label {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Label {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<usize> for Label {
    fn from(value: usize) -> Self {
        // Indices beyond i64::MAX never occur for in-memory collections.
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for Label {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

/// Convert any sequence of label-like values into [`Label`]s.
///
/// This is the one adapter for label columns; nothing else in the
/// pipeline coerces labels implicitly.
pub fn labels_from<I, L>(values: I) -> Vec<Label>
where
    I: IntoIterator<Item = L>,
    L: Into<Label>,
{
    values.into_iter().map(Into::into).collect()
}

/// Sample storage of a [`PixelArray`].
#[derive(Debug, Clone, PartialEq)]
pub enum PixelData {
    /// 8-bit unsigned samples in the 0-255 domain.
    U8(Vec<u8>),
    /// Single-precision float samples.
    F32(Vec<f32>),
    /// Double-precision float samples.
    F64(Vec<f64>),
}

impl PixelData {
    /// Number of samples in the buffer.
    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
        }
    }

    /// Returns `true` if the buffer holds no samples.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name of the sample type, used in diagnostics.
    #[must_use]
    pub const fn dtype(&self) -> &'static str {
        match self {
            Self::U8(_) => "uint8",
            Self::F32(_) => "float32",
            Self::F64(_) => "float64",
        }
    }
}

/// A decoded H x W x C pixel buffer in row-major, channel-interleaved order.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelArray {
    width: u32,
    height: u32,
    channels: u8,
    data: PixelData,
}

impl PixelArray {
    /// Wrap a pixel buffer after checking its layout.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnsupportedPixelLayout`] if `channels` is
    /// not 1, 3 or 4.
    /// Returns [`PipelineError::PixelCountMismatch`] if the buffer length is
    /// not `width * height * channels`, or [`PipelineError::ShapeOverflow`]
    /// if that product does not fit in `usize`.
    pub fn new(
        width: u32,
        height: u32,
        channels: u8,
        data: PixelData,
    ) -> Result<Self, PipelineError> {
        if !matches!(channels, 1 | 3 | 4) {
            return Err(PipelineError::UnsupportedPixelLayout {
                channels,
                dtype: data.dtype(),
            });
        }
        let expected =
            sample_count(1, width, height, channels).ok_or(PipelineError::ShapeOverflow {
                count: 1,
                width,
                height,
                channels,
            })?;
        if data.len() != expected {
            return Err(PipelineError::PixelCountMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Samples per pixel.
    #[must_use]
    pub const fn channels(&self) -> u8 {
        self.channels
    }

    /// The raw sample buffer.
    #[must_use]
    pub const fn data(&self) -> &PixelData {
        &self.data
    }
}

/// One image as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageRef {
    /// Local file path or remote URL.
    Path(String),
    /// Decoded pixel buffer.
    Pixels(PixelArray),
    /// Already decoded in-memory image.
    Image(DynamicImage),
}

impl ImageRef {
    /// The path or URL, if this is a [`ImageRef::Path`].
    #[must_use]
    pub fn as_path(&self) -> Option<&str> {
        match self {
            Self::Path(p) => Some(p),
            Self::Pixels(_) | Self::Image(_) => None,
        }
    }
}

impl From<&str> for ImageRef {
    fn from(value: &str) -> Self {
        Self::Path(value.to_owned())
    }
}

impl From<String> for ImageRef {
    fn from(value: String) -> Self {
        Self::Path(value)
    }
}

impl From<PixelArray> for ImageRef {
    fn from(value: PixelArray) -> Self {
        Self::Pixels(value)
    }
}

impl From<DynamicImage> for ImageRef {
    fn from(value: DynamicImage) -> Self {
        Self::Image(value)
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Errors raised while fetching the bytes behind an [`ImageRef::Path`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Reading a local file failed.
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Fetching a remote URL failed.
    #[error("remote fetch failed: {0}")]
    Remote(String),

    /// The location is a remote URL but remote fetching is not compiled in.
    #[error("remote fetching is disabled (enable the `remote` feature)")]
    RemoteDisabled,
}

/// Errors that can occur while normalizing, encoding or selecting images.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Two parallel sequences that must be the same length are not.
    #[error("{what} has {actual} entries but {expected} images were given")]
    LengthMismatch {
        /// Which sequence is out of step with the images.
        what: &'static str,
        /// Number of images.
        expected: usize,
        /// Length of the offending sequence.
        actual: usize,
    },

    /// The bytes behind a path or URL could not be fetched.
    #[error("failed to load {location}")]
    Load {
        /// The path or URL that was requested.
        location: String,
        /// Underlying failure.
        #[source]
        source: LoadError,
    },

    /// Failed to decode image bytes.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[source] image::ImageError),

    /// PNG serialization failed.
    #[error("PNG encoding failed: {0}")]
    PngEncode(#[source] image::ImageError),

    /// Pixel buffer has a channel count that cannot form an image.
    #[error("unsupported pixel layout: {channels} channel(s) of {dtype}")]
    UnsupportedPixelLayout {
        /// Samples per pixel that were given.
        channels: u8,
        /// Sample type name.
        dtype: &'static str,
    },

    /// Pixel buffer length does not match its declared shape.
    #[error("pixel buffer holds {actual} samples but its shape needs {expected}")]
    PixelCountMismatch {
        /// `width * height * channels`.
        expected: usize,
        /// Actual buffer length.
        actual: usize,
    },

    /// Declared shape has more samples than fit in memory addressing.
    #[error("pixel shape {count} x {height} x {width} x {channels} is too large")]
    ShapeOverflow {
        /// Number of stacked images.
        count: usize,
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// Samples per pixel.
        channels: u8,
    },

    /// Resize target cannot produce a visible image.
    #[error("target width must be positive, got {0}")]
    InvalidTargetWidth(u32),

    /// Source image has no columns, so no scale factor exists.
    #[error("cannot rescale an image of width 0 (height {height})")]
    EmptySourceImage {
        /// Height of the zero-width source.
        height: u32,
    },
}

/// `count * width * height * channels`, or `None` on overflow.
#[must_use]
pub fn sample_count(count: usize, width: u32, height: u32, channels: u8) -> Option<usize> {
    let width = usize::try_from(width).ok()?;
    let height = usize::try_from(height).ok()?;
    count
        .checked_mul(width)?
        .checked_mul(height)?
        .checked_mul(usize::from(channels))
}

/// Fail with [`PipelineError::LengthMismatch`] unless `actual == expected`.
///
/// # Errors
///
/// Returns [`PipelineError::LengthMismatch`] when the lengths differ.
pub fn ensure_same_len(
    what: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), PipelineError> {
    if expected == actual {
        Ok(())
    } else {
        Err(PipelineError::LengthMismatch {
            what,
            expected,
            actual,
        })
    }
}
