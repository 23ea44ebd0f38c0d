use std::fmt;

/// Error kinds raised by the extraction pipeline itself.
///
/// Failures of the alignment source are not represented here; they are
/// propagated unchanged as `anyhow::Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Call string and aligned pairs disagree, or the call string holds an
    /// unknown symbol. The record is skipped.
    MalformedRecord { read: String, reason: String },
    /// Rejected before the alignment source is touched.
    InvalidConfiguration(String),
}

impl PipelineError {
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        PipelineError::InvalidConfiguration(msg.into())
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::MalformedRecord { read, reason } => {
                write!(f, "Malformed record '{}': {}", read, reason)
            }
            PipelineError::InvalidConfiguration(msg) => {
                write!(f, "Invalid configuration: {}", msg)
            }
        }
    }
}

impl std::error::Error for PipelineError {}
