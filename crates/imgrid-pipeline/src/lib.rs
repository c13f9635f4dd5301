//! imgrid-pipeline: Pure image normalization, encoding and selection (sans-IO).
//!
//! Turns caller-supplied image collections into the data the markup
//! layer needs:
//!
//! - [`normalize`]: heterogeneous collections -> [`ImageBatch`]
//! - [`encode`]: one [`ImageRef`] -> base64 PNG, optionally rescaled
//! - [`select`]: labeled collections -> one representative per class
//!
//! This crate has **no I/O dependencies**. Bytes behind path strings are
//! fetched through the [`ImageLoader`] trait; filesystem and network
//! implementations live in `imgrid-io`.

pub mod encode;
pub mod loader;
pub mod normalize;
pub mod rescale;
pub mod select;
pub mod types;

pub use encode::{Encoder, PNG_DATA_URI_PREFIX, pixels_to_image, png_data_uri};
pub use loader::{ImageLoader, MemoryLoader};
pub use normalize::{BatchKind, ImageBatch};
pub use rescale::{ResizeFilter, rescale_to_width, scaled_dimensions};
pub use select::{LabeledCollection, class_representatives, unique_sorted_labels};
pub use types::{
    Dimensions, DynamicImage, ImageRef, Label, LoadError, PipelineError, PixelArray, PixelData,
    ensure_same_len, labels_from, sample_count,
};
