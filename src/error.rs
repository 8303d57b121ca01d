use std::fmt::{Display, Formatter};
use std::string::FromUtf8Error;

/// An error that can occur while decoding, encoding or constructing codecs
#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// The input slice cannot be interpreted under the expected codec.
    ///
    /// Raised for wrong lengths of fixed-size data, a missing string
    /// terminator, invalid UTF-8, a missing variant separator, framing
    /// offsets inconsistent with the slice length, or duplicate dictionary
    /// keys. The string carries context information.
    Malformed(String),

    /// A type signature string could not be parsed.
    ///
    /// Carries a description and the byte position of the offending
    /// character.
    Signature(String, usize),

    /// A codec was constructed or applied incorrectly.
    ///
    /// Raised for predicate branches with incompatible alignment or size,
    /// for dynamic values whose shape does not match the signature they are
    /// encoded with, and for values too large for the format to frame.
    Usage(String),

    /// The input slice is shorter than a fixed-size codec demands
    Underflow {
        /// The number of bytes the codec needs
        demanded: usize,
        /// The number of bytes that were available
        available: usize,
    },
}

impl std::error::Error for Error {}

impl From<FromUtf8Error> for Error {
    fn from(err: FromUtf8Error) -> Self {
        Self::Malformed(format!("invalid UTF-8 in string data: {}", err.utf8_error()))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Malformed(msg) => {
                write!(f, "Malformed GVariant data: {msg}")
            }
            Error::Signature(msg, position) => {
                write!(f, "Invalid type signature at position {position}: {msg}")
            }
            Error::Usage(msg) => {
                write!(f, "Invalid codec usage: {msg}")
            }
            Error::Underflow {
                demanded,
                available,
            } => {
                write!(
                    f,
                    "Not enough bytes for fixed-size data: needed {demanded}, got {available}"
                )
            }
        }
    }
}

/// The Result type for [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
