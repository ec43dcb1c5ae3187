use thiserror::Error;

/// Errors reported by the rendering backend or the engine's configuration
/// surface. Usage errors (bad arguments, empty dataset) are logged and
/// swallowed at the call site instead of surfacing here; invariant
/// violations panic because they indicate a rebuild-sequencing bug.
#[derive(Error, Debug)]
pub enum CarouselError {
    #[error("no cell template is configured")]
    MissingCellTemplate,

    #[error("cell template is missing a visual anchor: {0}")]
    MissingVisualAnchor(String),

    #[error("host error: {0}")]
    Host(String),
}

pub type Result<T> = std::result::Result<T, CarouselError>;
