use thiserror::Error;

/// Outcome of an inspection run that did not end with a printed report.
#[derive(Error, Debug)]
pub enum InspectError {
    #[error("failed to open certificate store '{store}': {message}")]
    StoreAccess { store: String, message: String },

    /// Not a failure; reported as an informational line.
    #[error("No certificate found.")]
    NotFound { thumbprint: String },

    #[error("{0:#}")]
    Unexpected(#[from] anyhow::Error),
}

impl From<std::io::Error> for InspectError {
    fn from(err: std::io::Error) -> Self {
        InspectError::Unexpected(err.into())
    }
}

pub type Result<T> = std::result::Result<T, InspectError>;
