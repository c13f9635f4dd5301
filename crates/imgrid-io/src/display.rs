//! Destinations for rendered HTML.
//!
//! Notebook kernels differ in how rich output reaches the front-end.
//! [`EvcxrSink`] speaks the evcxr Jupyter kernel's stdout protocol;
//! [`HtmlFileSink`] collects fragments into a standalone page for
//! viewing outside a notebook.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use imgrid_export::standalone_document;

/// Errors that can occur while displaying HTML.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    /// Writing to the output stream or file failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Receives HTML fragments in display order.
pub trait DisplaySink {
    /// Display one HTML fragment.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::Io`] if the fragment cannot be written.
    fn display_html(&mut self, html: &str) -> Result<(), DisplayError>;
}

impl<S: DisplaySink + ?Sized> DisplaySink for &mut S {
    fn display_html(&mut self, html: &str) -> Result<(), DisplayError> {
        (**self).display_html(html)
    }
}

/// Opening marker of an evcxr rich-content block.
pub const EVCXR_BEGIN: &str = "EVCXR_BEGIN_CONTENT text/html";

/// Closing marker of an evcxr rich-content block.
pub const EVCXR_END: &str = "EVCXR_END_CONTENT";

/// Writes each fragment as an evcxr `text/html` content block.
#[derive(Debug)]
pub struct EvcxrSink<W> {
    out: W,
}

impl<W: Write> EvcxrSink<W> {
    /// Wrap any writer.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl EvcxrSink<io::Stdout> {
    /// Sink on the process's stdout, which the evcxr kernel captures.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> DisplaySink for EvcxrSink<W> {
    fn display_html(&mut self, html: &str) -> Result<(), DisplayError> {
        writeln!(self.out, "{EVCXR_BEGIN}")?;
        writeln!(self.out, "{html}")?;
        writeln!(self.out, "{EVCXR_END}")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Collects fragments and writes them as one standalone HTML document.
///
/// Nothing touches the filesystem until [`HtmlFileSink::finish`].
#[derive(Debug, Clone)]
pub struct HtmlFileSink {
    path: PathBuf,
    title: String,
    fragments: Vec<String>,
}

impl HtmlFileSink {
    /// Sink that will write to `path`, titled after the file name.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let title = path
            .file_stem()
            .map_or_else(|| "imgrid".to_owned(), |s| s.to_string_lossy().into_owned());
        Self {
            path,
            title,
            fragments: Vec::new(),
        }
    }

    /// Override the document title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Destination path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fragments collected so far.
    #[must_use]
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// The complete document as it would be written.
    #[must_use]
    pub fn document(&self) -> String {
        standalone_document(&self.title, &self.fragments)
    }

    /// Write the document to disk, returning its path.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::Io`] if the file cannot be written.
    pub fn finish(self) -> Result<PathBuf, DisplayError> {
        std::fs::write(&self.path, self.document())?;
        tracing::debug!(
            path = %self.path.display(),
            fragments = self.fragments.len(),
            "wrote html document"
        );
        Ok(self.path)
    }
}

impl DisplaySink for HtmlFileSink {
    fn display_html(&mut self, html: &str) -> Result<(), DisplayError> {
        self.fragments.push(html.to_owned());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn evcxr_blocks_wrap_each_fragment() {
        let mut sink = EvcxrSink::new(Vec::new());
        sink.display_html("<p>a</p>").unwrap();
        sink.display_html("<p>b</p>").unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            out,
            "EVCXR_BEGIN_CONTENT text/html\n<p>a</p>\nEVCXR_END_CONTENT\n\
             EVCXR_BEGIN_CONTENT text/html\n<p>b</p>\nEVCXR_END_CONTENT\n"
        );
    }

    #[test]
    fn html_file_sink_writes_document_on_finish() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cats.html");
        let mut sink = HtmlFileSink::new(&path);
        sink.display_html("<p>one</p>").unwrap();
        sink.display_html("<p>two</p>").unwrap();
        assert!(!path.exists());

        let written = sink.finish().unwrap();
        assert_eq!(written, path);
        let doc = std::fs::read_to_string(&path).unwrap();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>cats</title>"));
        let one = doc.find("<p>one</p>").unwrap();
        let two = doc.find("<p>two</p>").unwrap();
        assert!(one < two);
    }

    #[test]
    fn html_file_sink_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let sink = HtmlFileSink::new(dir.path().join("missing").join("out.html"));
        assert!(matches!(sink.finish(), Err(DisplayError::Io(_))));
    }

    #[test]
    fn sink_by_mut_reference() {
        fn show(mut sink: impl DisplaySink) {
            sink.display_html("frag").unwrap();
        }
        let mut inner = HtmlFileSink::new("x.html").with_title("t");
        show(&mut inner);
        assert_eq!(inner.fragments(), ["frag".to_owned()]);
        assert!(inner.document().contains("<title>t</title>"));
    }
}
