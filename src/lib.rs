//! # flatconv
//!
//! Bidirectional, type-directed conversion between structured values and a
//! flat delimited string. Where configuration, command-line or key/value
//! style text has to become a typed value (and back) without a full
//! document format, a single scalar, container or custom type maps to a
//! single string and a single string maps back.
//!
//! The crate has exactly two entry points: [`stringify`] walks a
//! [`Value`] and produces its textual form, [`parse`] walks a mutable
//! [`Value`] target and fills it from text. Both apply the same precedence
//! at every recursive step (registered converter, text capability,
//! binary capability, built-in kind handling), so encode and decode stay
//! exact mirrors of each other.
//!
//! ## Quick start
//!
//! ```rust
//! use flatconv::{parse, stringify, Value};
//!
//! assert_eq!(stringify(&Value::I64(10)).unwrap(), "10");
//!
//! let mut slot = Value::I64(0);
//! parse("10", &mut slot).unwrap();
//! assert_eq!(slot, Value::I64(10));
//! ```
//!
//! Containers flatten with configurable separators (`;` between elements,
//! `:` between a key and its value by default):
//!
//! ```rust
//! use flatconv::{stringify, Shape, Value, ValueMap};
//!
//! let mut map = ValueMap::new(Shape::Str, Shape::Str);
//! map.insert(Value::from("key2"), Value::from("value2"));
//! map.insert(Value::from("key1"), Value::from("value1"));
//!
//! // Pairs are sorted lexicographically: same logical content, same
//! // output, regardless of insertion order.
//! assert_eq!(stringify(&Value::Map(map)).unwrap(), "key1:value1;key2:value2");
//! ```
//!
//! Fixed-capacity arrays render their populated prefix and pad the rest
//! with empty placeholders:
//!
//! ```rust
//! use flatconv::{stringify, Shape, Value};
//!
//! let v = Value::array(Shape::Str, 10, vec![Value::from("item1"), Value::from("item2")]);
//! assert_eq!(stringify(&v).unwrap(), "item1;item2;;;;;;;;");
//! ```
//!
//! ## Extending conversion
//!
//! Two mechanisms, both consulted before built-in handling:
//!
//! - **Registry**: [`Options::with_stringifier`] / [`Options::with_parser`]
//!   register a conversion function for one exact type. Lookup never
//!   crosses related types, and registrations for dynamic, channel,
//!   function, raw-pointer or map types are rejected.
//! - **Capabilities**: a custom leaf type advertises
//!   [`MarshalText`]/[`UnmarshalText`] (or the binary pair) through its
//!   [`Custom`] impl; the [`custom_value!`] macro writes the wiring.
//!
//! ## Known asymmetry
//!
//! An empty optional stringifies to the empty string, but parsing the
//! empty string into an optional target does *not* reconstruct the empty
//! optional: storage is allocated and the empty string is parsed into the
//! pointee, which may fail (integers) or produce a zero value (strings).
//! This shortcut is deliberate and kept; round-trip guarantees apply to
//! populated values.
//!
//! ## Concurrency
//!
//! Conversion is synchronous, CPU-bound recursion with no shared state:
//! an [`Options`] value is built per call and never mutated afterwards,
//! so calls from multiple threads are independent.

pub mod custom;
pub mod error;
pub mod map;
pub mod options;
pub mod value;

mod de;
mod duration;
mod macros;
mod ser;

pub use custom::{
    Custom, CustomShape, CustomValue, MarshalBinary, MarshalText, UnmarshalBinary,
    UnmarshalText,
};
pub use error::{Error, Result};
pub use map::ValueMap;
pub use options::{Options, Registrable};
pub use value::{Kind, Shape, Value};

/// Converts `value` to its flat string form using default [`Options`].
///
/// # Examples
///
/// ```rust
/// use chrono::TimeDelta;
/// use flatconv::{stringify, Value};
///
/// assert_eq!(stringify(&Value::Duration(TimeDelta::hours(5))).unwrap(), "5h0m0s");
/// ```
///
/// # Errors
///
/// Returns an error for values with no conversion path, or whatever a
/// registered converter or marshal capability reports.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn stringify(value: &Value) -> Result<String> {
    stringify_with_options(value, &Options::new())
}

/// Converts `value` to its flat string form with custom [`Options`].
///
/// If the options carry an accumulated registration error, it is returned
/// before any traversal begins.
///
/// # Examples
///
/// ```rust
/// use flatconv::{stringify_with_options, Options, Shape, Value};
///
/// let options = Options::new().with_element_separator(',');
/// let list = Value::list(Shape::I32, vec![Value::I32(1), Value::I32(2)]);
/// assert_eq!(stringify_with_options(&list, &options).unwrap(), "1,2");
/// ```
///
/// # Errors
///
/// Returns an error for invalid registrations, values with no conversion
/// path, or whatever a registered converter or marshal capability reports.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn stringify_with_options(value: &Value, options: &Options) -> Result<String> {
    options.ensure_valid()?;
    ser::stringify_value(value, options)
}

/// Parses `s` into `target` using default [`Options`].
///
/// The target's structure directs the parse: its shape decides how the
/// input is tokenized and which built-in parser applies.
///
/// # Examples
///
/// ```rust
/// use flatconv::{parse, Shape, Value};
///
/// let mut slot = Value::Map(flatconv::ValueMap::new(Shape::Str, Shape::Str));
/// parse("key1:value1;key2:value2", &mut slot).unwrap();
///
/// if let Value::Map(map) = slot {
///     assert_eq!(map.get(&Value::from("key1")), Some(&Value::from("value1")));
///     assert_eq!(map.len(), 2);
/// }
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidTarget`] if the top-level target is a custom
/// leaf that can never be written (no registered parser, no unmarshal
/// capability); otherwise a data error as described on [`Error`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse(s: &str, target: &mut Value) -> Result<()> {
    parse_with_options(s, target, &Options::new())
}

/// Parses `s` into `target` with custom [`Options`].
///
/// An accumulated registration error is returned first, then the
/// invalid-target check, then the parse itself.
///
/// # Examples
///
/// ```rust
/// use flatconv::{parse_with_options, Error, Options, Value};
///
/// // Decimal-comma floats via a registered parser for f64.
/// let options = Options::new()
///     .with_parser(|s: &str| s.replace(',', ".").parse::<f64>().map_err(Error::from));
///
/// let mut slot = Value::F64(0.0);
/// parse_with_options("3,14159", &mut slot, &options).unwrap();
/// assert_eq!(slot, Value::F64(3.14159));
/// ```
///
/// # Errors
///
/// As [`parse`], plus any accumulated registration error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_with_options(s: &str, target: &mut Value, options: &Options) -> Result<()> {
    options.ensure_valid()?;
    if let Value::Custom(custom) = target {
        if !options.has_parser(custom.shape().id()) && !custom.has_unmarshal() {
            return Err(Error::invalid_target(custom.shape().name()));
        }
    }
    de::parse_value(s, target, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: Value) {
        let s = stringify(&value).unwrap();
        let mut parsed = value.shape().default_value();
        parse(&s, &mut parsed).unwrap();
        assert_eq!(parsed, value, "via {s:?}");
    }

    #[test]
    fn test_scalar_roundtrips() {
        roundtrip(Value::I64(10));
        roundtrip(Value::U32(4_000_000_000));
        roundtrip(Value::F64(2.71828));
        roundtrip(Value::Bool(true));
        roundtrip(Value::Str("whatever".to_string()));
        roundtrip(Value::Bytes(b"whatever".to_vec()));
    }

    #[test]
    fn test_container_roundtrips() {
        roundtrip(Value::list(
            Shape::I32,
            vec![Value::I32(1), Value::I32(2), Value::I32(3)],
        ));
        roundtrip(Value::Map(ValueMap::from_entries(
            Shape::Str,
            Shape::I32,
            [
                (Value::from("a"), Value::I32(1)),
                (Value::from("b"), Value::I32(2)),
            ],
        )));
    }

    #[test]
    fn test_registration_error_precedes_traversal() {
        let options = Options::new()
            .with_stringifier(|_: &std::collections::HashMap<String, i32>| Ok(String::new()));
        let err = stringify_with_options(&Value::I64(1), &options).unwrap_err();
        assert!(matches!(err, Error::Registration(_)));
        assert!(err
            .to_string()
            .contains("map is not a valid stringifier argument type"));
    }

    #[test]
    fn test_invalid_target_is_distinguished() {
        #[derive(Clone, Debug, Default, PartialEq)]
        struct Opaque;
        crate::custom_value!(Opaque);

        let mut target = Value::custom(Opaque);
        let err = parse("anything", &mut target).unwrap_err();
        assert!(matches!(err, Error::InvalidTarget(_)));

        // A data error is not the invalid-target sentinel.
        let mut number = Value::I64(0);
        let err = parse("not a number", &mut number).unwrap_err();
        assert!(!matches!(err, Error::InvalidTarget(_)));
    }
}
