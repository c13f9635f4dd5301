//! Raster encoding: any [`ImageRef`] to an embeddable base64 PNG.
//!
//! Steps for one image:
//!
//! 1. Resolve the reference to a decoded image (pixel buffers are
//!    converted, paths are loaded through an [`ImageLoader`], decoded
//!    images are used as-is).
//! 2. Optionally rescale to a target width (see [`crate::rescale`]).
//! 3. Serialize to PNG in memory.
//! 4. Base64-encode with the standard alphabet.
//!
//! Output is deterministic for a given input and target width. Nothing
//! is cached; every call re-encodes.

use std::borrow::Cow;
use std::io::Cursor;

use base64::Engine;
use image::{DynamicImage, ImageFormat};

use crate::loader::ImageLoader;
use crate::rescale::{ResizeFilter, rescale_to_width};
use crate::types::{ImageRef, PipelineError, PixelArray, PixelData, sample_count};

/// Prefix of a PNG data URI; append the base64 payload.
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Encodes [`ImageRef`]s to PNG bytes or base64 strings.
pub struct Encoder<'a> {
    loader: &'a dyn ImageLoader,
    filter: ResizeFilter,
}

impl<'a> Encoder<'a> {
    /// Create an encoder that resolves paths through `loader` and
    /// rescales with the default [`ResizeFilter`].
    #[must_use]
    pub fn new(loader: &'a dyn ImageLoader) -> Self {
        Self {
            loader,
            filter: ResizeFilter::default(),
        }
    }

    /// Use `filter` when rescaling.
    #[must_use]
    pub const fn with_filter(mut self, filter: ResizeFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Resolve `image` to a decoded image without rescaling.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Load`] if a path cannot be read,
    /// [`PipelineError::ImageDecode`] if its bytes are not a supported
    /// image, or a layout error for malformed pixel buffers.
    pub fn decode<'i>(&self, image: &'i ImageRef) -> Result<Cow<'i, DynamicImage>, PipelineError> {
        match image {
            ImageRef::Pixels(pixels) => pixels_to_image(pixels).map(Cow::Owned),
            ImageRef::Path(location) => {
                let bytes = self
                    .loader
                    .load(location)
                    .map_err(|source| PipelineError::Load {
                        location: location.clone(),
                        source,
                    })?;
                tracing::debug!(location, bytes = bytes.len(), "loaded image bytes");
                image::load_from_memory(&bytes)
                    .map(Cow::Owned)
                    .map_err(PipelineError::ImageDecode)
            }
            ImageRef::Image(decoded) => Ok(Cow::Borrowed(decoded)),
        }
    }

    /// Encode `image` as PNG bytes, rescaled to `target_width` when given.
    ///
    /// # Errors
    ///
    /// See [`Encoder::decode`]; additionally returns
    /// [`PipelineError::InvalidTargetWidth`] for a zero width and
    /// [`PipelineError::PngEncode`] if serialization fails.
    pub fn encode_png(
        &self,
        image: &ImageRef,
        target_width: Option<u32>,
    ) -> Result<Vec<u8>, PipelineError> {
        let decoded = self.decode(image)?;
        let sized = match target_width {
            Some(width) => Cow::Owned(rescale_to_width(&decoded, width, self.filter)?),
            None => decoded,
        };

        let mut png = Vec::new();
        sized
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(PipelineError::PngEncode)?;
        tracing::debug!(
            width = sized.width(),
            height = sized.height(),
            bytes = png.len(),
            "encoded image as PNG"
        );
        Ok(png)
    }

    /// Encode `image` as a base64 PNG string suitable for a data URI.
    ///
    /// # Errors
    ///
    /// See [`Encoder::encode_png`].
    pub fn encode(
        &self,
        image: &ImageRef,
        target_width: Option<u32>,
    ) -> Result<String, PipelineError> {
        let png = self.encode_png(image, target_width)?;
        Ok(base64::engine::general_purpose::STANDARD.encode(png))
    }
}

/// Build a `data:image/png;base64,...` URI from a base64 payload.
#[must_use]
pub fn png_data_uri(base64_png: &str) -> String {
    format!("{PNG_DATA_URI_PREFIX}{base64_png}")
}

/// Convert a pixel buffer into a decoded image.
///
/// Float buffers are mapped into the 0-255 domain first: when the
/// largest sample is at most 1.0 the buffer is treated as normalized and
/// multiplied by 255, otherwise it is assumed to be already scaled.
/// Samples are then truncated (saturating) to `u8`. A very dark float
/// image whose true maximum is at most 1.0 out of 255 is therefore
/// brightened; this matches the documented heuristic.
///
/// # Errors
///
/// Returns [`PipelineError::PixelCountMismatch`] if the buffer does not
/// fill the declared shape, or [`PipelineError::UnsupportedPixelLayout`]
/// for a channel count other than 1, 3 or 4.
pub fn pixels_to_image(pixels: &PixelArray) -> Result<DynamicImage, PipelineError> {
    let samples: Vec<u8> = match pixels.data() {
        PixelData::U8(v) => v.clone(),
        PixelData::F32(v) => float_samples_to_u8(v),
        PixelData::F64(v) => float_samples_to_u8(v),
    };
    let (w, h) = (pixels.width(), pixels.height());
    let actual = samples.len();
    let mismatch = || PipelineError::PixelCountMismatch {
        expected: sample_count(1, w, h, pixels.channels()).unwrap_or(usize::MAX),
        actual,
    };

    match pixels.channels() {
        1 => image::GrayImage::from_raw(w, h, samples)
            .map(DynamicImage::ImageLuma8)
            .ok_or_else(mismatch),
        3 => image::RgbImage::from_raw(w, h, samples)
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(mismatch),
        4 => image::RgbaImage::from_raw(w, h, samples)
            .map(DynamicImage::ImageRgba8)
            .ok_or_else(mismatch),
        channels => Err(PipelineError::UnsupportedPixelLayout {
            channels,
            dtype: pixels.data().dtype(),
        }),
    }
}

/// Map float samples into `u8`, scaling by 255 when the maximum is <= 1.0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn float_samples_to_u8<T: Copy + Into<f64>>(samples: &[T]) -> Vec<u8> {
    let max = samples
        .iter()
        .map(|&v| v.into())
        .fold(f64::NEG_INFINITY, f64::max);
    let factor = if max <= 1.0 { 255.0 } else { 1.0 };
    samples
        .iter()
        .map(|&v| (v.into() * factor) as u8)
        .collect()
}
