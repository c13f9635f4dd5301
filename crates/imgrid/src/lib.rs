//! imgrid: Image grids, class tabs and class mosaics for notebooks.
//!
//! Renders collections of images as self-contained HTML/CSS widgets:
//!
//! - [`plot_images`]: a grid with click-to-zoom tiles
//! - [`plot_class_tabs`]: one tab per label
//! - [`plot_class_representations`]: one image per label
//!
//! The free functions display through the evcxr kernel on stdout with
//! random element ids. Use [`Renderer`] directly to choose the
//! [`DisplaySink`](imgrid_io::DisplaySink), the image loader or the id
//! source, or to get the HTML as a string.
//!
//! ```no_run
//! use imgrid::{ImageBatch, PlotConfig, labels_from};
//!
//! let images = ImageBatch::from_paths(["imgs/cat.png", "imgs/dog.png"]);
//! let labels = labels_from(["cat", "dog"]);
//! imgrid::plot_images(&images, Some(&labels), None, &PlotConfig::default())?;
//! # Ok::<(), imgrid::RenderError>(())
//! ```

pub mod config;
pub mod error;
pub mod render;

pub use config::PlotConfig;
pub use error::RenderError;
pub use render::Renderer;

pub use imgrid_export::{IdGenerator, RandomIds, SequentialIds};
pub use imgrid_io::{
    DisplayError, DisplaySink, Environment, EvcxrSink, FsLoader, HtmlFileSink, LoaderConfig,
};
pub use imgrid_pipeline::{
    ImageBatch, ImageLoader, ImageRef, Label, LabeledCollection, MemoryLoader, PipelineError,
    PixelArray, PixelData, ResizeFilter, class_representatives, labels_from,
};

/// Display a grid of images in the evcxr notebook.
///
/// # Errors
///
/// See [`Renderer::plot_images`].
pub fn plot_images(
    images: &ImageBatch,
    labels: Option<&[Label]>,
    custom_texts: Option<&[String]>,
    config: &PlotConfig,
) -> Result<(), RenderError> {
    Renderer::new(config.clone()).plot_images(&mut EvcxrSink::stdout(), images, labels, custom_texts)
}

/// Display one tab per label in the evcxr notebook.
///
/// # Errors
///
/// See [`Renderer::plot_class_tabs`].
pub fn plot_class_tabs(
    collection: &LabeledCollection<ImageRef>,
    tabs_order: Option<&[Label]>,
    config: &PlotConfig,
) -> Result<(), RenderError> {
    Renderer::new(config.clone()).plot_class_tabs(&mut EvcxrSink::stdout(), collection, tabs_order)
}

/// Display one representative image per label in the evcxr notebook.
///
/// # Errors
///
/// See [`Renderer::plot_class_representations`].
pub fn plot_class_representations(
    collection: &LabeledCollection<ImageRef>,
    ignore_labels: Option<&[Label]>,
    labels_order: Option<&[Label]>,
    config: &PlotConfig,
) -> Result<(), RenderError> {
    Renderer::new(config.clone()).plot_class_representations(
        &mut EvcxrSink::stdout(),
        collection,
        ignore_labels,
        labels_order,
    )
}

/// Detect the notebook environment and warn where local image paths
/// will not display.
///
/// Call once at the start of a session; nothing is checked implicitly.
pub fn check_environment() -> Environment {
    report_environment(Environment::detect())
}

fn report_environment(env: Environment) -> Environment {
    if env.prefers_base64() {
        tracing::warn!(
            environment = %env,
            "local image paths do not display here; set force_b64 in PlotConfig"
        );
    } else {
        tracing::debug!(environment = %env, "detected environment");
    }
    env
}
