use imgrid_io::DisplayError;
use imgrid_pipeline::PipelineError;

/// Errors that can occur while rendering or displaying a widget.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Input validation, loading or encoding failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// The rendered HTML could not be displayed.
    #[error(transparent)]
    Display(#[from] DisplayError),
}
