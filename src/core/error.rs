use std::io;

use thiserror::Error;

/// Errors produced by the automaton engine and its collaborators.
///
/// The engine itself only ever returns [`EcaError::InvalidArgument`]; the
/// other variants come from the export layer when writing to a sink.
#[derive(Debug, Error)]
pub enum EcaError {
    /// Out-of-range integer, malformed rule table, or an empty row.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl EcaError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        EcaError::InvalidArgument(msg.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, EcaError::InvalidArgument(_))
    }
}

pub type Result<T> = core::result::Result<T, EcaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_message_includes_reason() {
        let e = EcaError::invalid("width must be > 0");
        assert!(e.is_invalid_argument());
        assert_eq!(e.to_string(), "invalid argument: width must be > 0");
    }

    #[test]
    fn io_errors_convert() {
        let e: EcaError = io::Error::new(io::ErrorKind::Other, "disk full").into();
        assert!(!e.is_invalid_argument());
        assert!(e.to_string().starts_with("io:"));
    }
}
