use thiserror::Error;

/// Top-level error type for the slashforge runtime.
#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("platform lookup failed ({resource}): {message}")]
    LookupFailed { resource: String, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ForgeError {
    /// A lookup the platform could not answer.
    pub fn lookup(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LookupFailed {
            resource: resource.into(),
            message: message.into(),
        }
    }
}
