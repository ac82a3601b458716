use std::fmt::Display;

use thiserror::Error;

use crate::value::ValueKind;

/// Errors that can abort an encode.
///
/// The first error raised anywhere in the traversal is returned to the caller
/// and no partial output is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The top-level value (after one dereference) is not a record,
    /// sequence or map.
    #[error("cannot encode a {0} at the top level, expected a record, sequence or map")]
    UnsupportedRootKind(ValueKind),

    /// The value graph is nested deeper than the supported limit.
    #[error("recursion level too deep, the max is: {0}")]
    MaxDepthExceeded(usize),

    /// A map was found whose keys are not strings.
    #[error("kind of map key must be string, got: {0}")]
    InvalidMapKeyKind(ValueKind),

    /// Raised by a custom encoder or a `Serialize` implementation.
    #[error("{0}")]
    Custom(String),

    /// The configured date-time layout could not be rendered.
    #[error("invalid time format: {0:?}")]
    TimeFormat(String),
}

impl Error {
    /// Creates an [`Error::Custom`] from any displayable message.
    ///
    /// This is the intended way for custom encoders to report failures.
    pub fn custom<T: Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: Display,
    {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
