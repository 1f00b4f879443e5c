//! Types for error handling.
//!
//! Encoding itself cannot fail. Errors only come from the operations built
//! around it: parsing flat keys back into structure, assembling HTTP
//! requests, and converting serde values.

use std::{error::Error as StdError, fmt, io};

/// All possible types of errors that can be returned from this crate.
#[derive(Debug)]
pub enum Error {
    /// Encoded fields could not be reconstructed into a mapping.
    Decode(DecodeError),
    /// Validation error when constructing a request or a form part header.
    InvalidHttpFormat(http::Error),
    /// An unknown I/O error.
    Io(io::Error),
    /// A value could not be serialized into JSON before conversion.
    #[cfg(feature = "json")]
    Json(serde_json::Error),
    /// A serialized value was not an object, so it has no field names to
    /// flatten.
    NotAMapping,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "failed to decode form fields: {}", e),
            Self::InvalidHttpFormat(e) => write!(f, "invalid HTTP format: {}", e),
            Self::Io(e) => write!(f, "I/O error: {}", e),
            #[cfg(feature = "json")]
            Self::Json(e) => write!(f, "failed to serialize value: {}", e),
            Self::NotAMapping => f.write_str("value does not serialize to an object"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
            Self::InvalidHttpFormat(e) => Some(e),
            Self::Io(e) => Some(e),
            #[cfg(feature = "json")]
            Self::Json(e) => Some(e),
            Self::NotAMapping => None,
        }
    }
}

#[doc(hidden)]
impl From<DecodeError> for Error {
    fn from(error: DecodeError) -> Error {
        Error::Decode(error)
    }
}

#[doc(hidden)]
impl From<http::Error> for Error {
    fn from(error: http::Error) -> Error {
        Error::InvalidHttpFormat(error)
    }
}

#[doc(hidden)]
impl From<io::Error> for Error {
    fn from(error: io::Error) -> Error {
        Error::Io(error)
    }
}

#[doc(hidden)]
#[cfg(feature = "json")]
impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Error {
        Error::Json(error)
    }
}

#[doc(hidden)]
impl From<Error> for io::Error {
    fn from(error: Error) -> io::Error {
        match error {
            Error::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}

/// An error reconstructing a mapping from flat keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// A key does not follow the `segment ("." segment | "[" index "]")*`
    /// grammar.
    InvalidKey {
        /// The offending key.
        key: String,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// A key addresses a path already used with a different shape, such as a
    /// leaf that is also a container, or a mapping that is also a sequence.
    Conflict {
        /// The key that could not be placed.
        key: String,
    },
    /// A key was repeated for a value that cannot hold more than one entry.
    /// Only files may share a key.
    DuplicateKey {
        /// The repeated key.
        key: String,
    },
}

impl DecodeError {
    pub(crate) fn invalid_key(key: &str, reason: &'static str) -> Self {
        Self::InvalidKey {
            key: key.to_owned(),
            reason,
        }
    }

    /// Get the key that caused this error.
    pub fn key(&self) -> &str {
        match self {
            Self::InvalidKey { key, .. } | Self::Conflict { key } | Self::DuplicateKey { key } => key,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidKey { key, reason } => write!(f, "invalid key `{}`: {}", key, reason),
            Self::Conflict { key } => {
                write!(f, "key `{}` conflicts with the shape of an earlier key", key)
            }
            Self::DuplicateKey { key } => write!(f, "key `{}` appears more than once", key),
        }
    }
}

impl StdError for DecodeError {}
