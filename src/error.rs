/// Crate-level error type for the glottis voice-feature library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid parameter value.
    #[error("invalid parameter `{name}`: got {value}, {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// Audio data is empty when a non-empty signal was required.
    #[error("audio data is empty")]
    EmptyAudio,

    /// Audio data contains non-finite values (NaN or Inf).
    #[error("audio data contains non-finite values")]
    NonFiniteAudio,

    /// A required dimension is zero or invalid.
    #[error("invalid size for `{name}`: {value} ({reason})")]
    InvalidSize {
        name: &'static str,
        value: usize,
        reason: &'static str,
    },

    /// A pitch tracker, spectrum provider or amplitude sampler failed.
    #[error("{capability} failed: {message}")]
    Capability {
        capability: &'static str,
        message: String,
    },

    /// The recording manifest could not be parsed.
    #[error("manifest error: {0}")]
    Manifest(String),

    /// Audio I/O errors.
    #[error(transparent)]
    Audio(#[from] crate::io::AudioError),

    /// File I/O errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a [`Error::Capability`] failure.
    pub fn capability(capability: &'static str, message: impl Into<String>) -> Self {
        Error::Capability {
            capability,
            message: message.into(),
        }
    }
}

/// Convenience Result type for glottis operations.
pub type Result<T> = std::result::Result<T, Error>;
