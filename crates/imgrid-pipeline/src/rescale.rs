//! Aspect-preserving rescale to a target display width.
//!
//! Embedded images are resized to the tile width before encoding so
//! notebooks do not grow by the full source resolution of every image.

use std::fmt;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::types::{Dimensions, PipelineError};

/// Resampling filter used when rescaling.
///
/// Ordered from fastest/lowest-quality to slowest/highest-quality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeFilter {
    /// Nearest-neighbor: fastest, blocky artifacts.
    Nearest,
    /// Bilinear interpolation: fast, decent quality.
    Triangle,
    /// Bicubic (Catmull-Rom): moderate speed, good quality.
    #[default]
    CatmullRom,
    /// Gaussian: moderate speed, smooth output.
    Gaussian,
    /// Lanczos with 3 lobes: slowest, sharpest.
    Lanczos3,
}

impl ResizeFilter {
    /// Convert to the `image` crate's `FilterType`.
    const fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            Self::Nearest => image::imageops::FilterType::Nearest,
            Self::Triangle => image::imageops::FilterType::Triangle,
            Self::CatmullRom => image::imageops::FilterType::CatmullRom,
            Self::Gaussian => image::imageops::FilterType::Gaussian,
            Self::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for ResizeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nearest => f.write_str("Nearest"),
            Self::Triangle => f.write_str("Triangle"),
            Self::CatmullRom => f.write_str("CatmullRom"),
            Self::Gaussian => f.write_str("Gaussian"),
            Self::Lanczos3 => f.write_str("Lanczos3"),
        }
    }
}

/// Compute the output size for rescaling `width x height` to
/// `target_width`.
///
/// The scale factor `target_width / width` is applied to both axes and
/// each product is truncated independently, so the aspect ratio may
/// drift by less than a pixel. Height is kept at least 1.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidTargetWidth`] if `target_width` is 0
/// and [`PipelineError::EmptySourceImage`] if `width` is 0.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn scaled_dimensions(
    width: u32,
    height: u32,
    target_width: u32,
) -> Result<Dimensions, PipelineError> {
    if target_width == 0 {
        return Err(PipelineError::InvalidTargetWidth(target_width));
    }
    if width == 0 {
        return Err(PipelineError::EmptySourceImage { height });
    }
    let scale = f64::from(target_width) / f64::from(width);
    let new_width = (f64::from(width) * scale) as u32;
    let new_height = (f64::from(height) * scale) as u32;
    Ok(Dimensions {
        width: new_width.max(1),
        height: new_height.max(1),
    })
}

/// Rescale `image` to `target_width` pixels wide, preserving aspect
/// ratio as described in [`scaled_dimensions`].
///
/// # Errors
///
/// Returns [`PipelineError::InvalidTargetWidth`] if `target_width` is 0.
pub fn rescale_to_width(
    image: &DynamicImage,
    target_width: u32,
    filter: ResizeFilter,
) -> Result<DynamicImage, PipelineError> {
    let dims = scaled_dimensions(image.width(), image.height(), target_width)?;
    if dims.width == image.width() && dims.height == image.height() {
        return Ok(image.clone());
    }
    Ok(image.resize_exact(dims.width, dims.height, filter.to_image_filter()))
}
