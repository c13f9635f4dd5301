//! imgrid-io: Image loading, display sinks and environment detection.
//!
//! The I/O edge of imgrid: reads image bytes from disk or the network,
//! hands rendered HTML to a notebook kernel or a file, and inspects the
//! process environment. All pure work lives in `imgrid-pipeline` and
//! `imgrid-export`.

pub mod display;
pub mod environment;
pub mod loader;
pub mod paths;

pub use display::{DisplayError, DisplaySink, EvcxrSink, HtmlFileSink};
pub use environment::Environment;
pub use loader::{FsLoader, LoaderConfig};
