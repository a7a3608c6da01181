//! Error types for stringification and parsing.
//!
//! All failure modes of the crate funnel into a single [`Error`] enum:
//!
//! - **Registration errors**: a converter was registered for a disallowed
//!   type kind. These accumulate while [`Options`](crate::Options) is built
//!   and surface as the first action of the next [`stringify`](crate::stringify)
//!   or [`parse`](crate::parse) call, before any traversal happens.
//! - **Invalid target**: the top-level parse target can never be written
//!   (a custom leaf with no parser path). Distinguished from data errors so
//!   callers can detect programmer error.
//! - **Structural errors**: malformed map entries, or more elements than a
//!   fixed array can hold.
//! - **Built-in parse errors**: malformed numerals, booleans or durations,
//!   propagated from the underlying parser without wrapping.
//! - **User conversion errors**: whatever a registered converter or a
//!   marshal/unmarshal implementation returns, propagated verbatim.
//!
//! ```rust
//! use flatconv::{parse, Error, Value};
//!
//! let mut slot = Value::I32(0);
//! let err = parse("not a number", &mut slot).unwrap_err();
//! assert!(matches!(err, Error::ParseInt(_)));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors produced while stringifying or parsing.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more invalid registrations accumulated while building
    /// [`Options`](crate::Options). Surfaced before any traversal.
    #[error("{}", .0.join("\n"))]
    Registration(Vec<String>),

    /// The top-level parse target cannot be written into: it is a custom
    /// leaf with neither a registered parser nor an unmarshal capability.
    #[error("invalid parse target: {0} has no parser or unmarshal capability")]
    InvalidTarget(String),

    /// A value or target whose type has no conversion path.
    #[error("unsupported type {0}")]
    UnsupportedType(String),

    /// Failure while stringifying a sequence element, tagged with its index.
    #[error("error stringifying element at index {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    /// Failure while stringifying a map key.
    #[error("error stringifying map key: {source}")]
    MapKey {
        #[source]
        source: Box<Error>,
    },

    /// Failure while stringifying a map value, tagged with its stringified key.
    #[error("error stringifying map value with key {key}: {source}")]
    MapValue {
        key: String,
        #[source]
        source: Box<Error>,
    },

    /// A map entry that did not split into exactly one key and one value.
    #[error("invalid map entry: {0:?}")]
    MalformedEntry(String),

    /// More separated elements than a fixed array can hold.
    #[error("number of elements ({count}) exceeds array capacity ({capacity})")]
    CapacityExceeded { count: usize, capacity: usize },

    /// Malformed integer text, from the underlying integer parser.
    #[error(transparent)]
    ParseInt(#[from] std::num::ParseIntError),

    /// Malformed floating-point text, from the underlying float parser.
    #[error(transparent)]
    ParseFloat(#[from] std::num::ParseFloatError),

    /// Malformed complex-number text, from the underlying complex parser.
    #[error(transparent)]
    ParseComplex(#[from] num_complex::ParseComplexError<std::num::ParseFloatError>),

    /// Text that is not a recognized boolean token.
    #[error("invalid boolean syntax: {0:?}")]
    InvalidBool(String),

    /// Malformed duration notation.
    #[error("{0}")]
    InvalidDuration(String),

    /// Error raised by a registered converter or a marshal/unmarshal
    /// implementation.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates a custom error with a display message.
    ///
    /// This is the constructor registered converters and capability
    /// implementations use for their own failures.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flatconv::Error;
    ///
    /// let err = Error::custom("value out of range");
    /// assert!(err.to_string().contains("out of range"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an unsupported-type error naming the offending type.
    pub fn unsupported_type(name: &str) -> Self {
        Error::UnsupportedType(name.to_string())
    }

    /// Creates the distinguished invalid-parse-target error.
    pub fn invalid_target(name: &str) -> Self {
        Error::InvalidTarget(name.to_string())
    }

    pub(crate) fn element(index: usize, source: Error) -> Self {
        Error::Element {
            index,
            source: Box::new(source),
        }
    }

    pub(crate) fn map_key(source: Error) -> Self {
        Error::MapKey {
            source: Box::new(source),
        }
    }

    pub(crate) fn map_value(key: &str, source: Error) -> Self {
        Error::MapValue {
            key: key.to_string(),
            source: Box::new(source),
        }
    }

    pub(crate) fn duration(msg: String) -> Self {
        Error::InvalidDuration(msg)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
