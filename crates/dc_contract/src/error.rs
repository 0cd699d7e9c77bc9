use alloc::string::String;
use core::fmt;

use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

/// Errors raised by contract building, writing and reading.
///
/// Nothing is retried internally. A failed write leaves the sink partially
/// written; callers discard it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Declarative metadata of a type is malformed.
    #[error("invalid data contract for `{type_path}`: {reason}")]
    InvalidContract {
        type_path: &'static str,
        reason: String,
    },

    /// A value cannot be written against its declared contract.
    #[error("cannot write `{type_path}`: {reason}")]
    ContractMismatch {
        type_path: &'static str,
        reason: String,
    },

    /// The XML structure does not match the expected contract.
    #[error("unexpected element: {0}")]
    UnexpectedElement(String),

    /// Text content cannot be parsed as the expected primitive.
    #[error("malformed content: {0}")]
    MalformedContent(String),

    /// A type name read from `i:type` resolves to no known type.
    #[error("type name `{name}` from namespace `{namespace}` is not a known type")]
    NotFound { name: String, namespace: String },

    /// More elements than `max_items_in_object_graph` were written or read.
    #[error("maximum number of items in the object graph ({limit}) exceeded")]
    QuotaExceeded { limit: usize },

    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    FromValue(#[from] FromValueError),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

impl Error {
    #[inline]
    pub(crate) fn invalid(type_path: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidContract {
            type_path,
            reason: reason.into(),
        }
    }

    #[inline]
    pub(crate) fn mismatch(type_path: &'static str, reason: impl Into<String>) -> Self {
        Self::ContractMismatch {
            type_path,
            reason: reason.into(),
        }
    }
}

// -----------------------------------------------------------------------------
// FromValueError

/// The shape of a [`Value`](crate::Value), used in conversion errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Primitive,
    Enum,
    Class,
    Collection,
    Dictionary,
    Custom,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Null => "null",
            Self::Primitive => "primitive",
            Self::Enum => "enum",
            Self::Class => "class",
            Self::Collection => "collection",
            Self::Dictionary => "dictionary",
            Self::Custom => "custom",
        })
    }
}

/// Errors converting a [`Value`](crate::Value) back into a Rust type.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum FromValueError {
    #[error("expected a {expected} value for `{type_path}`, found {found}")]
    MismatchedKind {
        type_path: &'static str,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("`{type_path}` is not nullable but the value is null")]
    UnexpectedNull { type_path: &'static str },

    #[error("{bits} is not a value of enum `{type_path}`")]
    UnknownEnumValue { type_path: &'static str, bits: i64 },

    #[error("{0}")]
    Custom(String),
}
