//! The parse engine: recursive string → value conversion.
//!
//! The exact structural mirror of the stringify engine. Every recursive
//! step applies the same precedence chain in the decode direction: a
//! parser registered for the target's exact type, then the text-unmarshal
//! capability, then the binary-unmarshal capability, then built-in
//! handling of the target's kind. The target value's structure directs the
//! parse; fresh slots for container elements are materialized from the
//! container's element [`Shape`](crate::Shape).
//!
//! ```rust
//! use flatconv::{parse, Shape, Value};
//!
//! let mut slot = Value::list(Shape::I32, vec![]);
//! parse("1;2;3", &mut slot).unwrap();
//! assert_eq!(
//!     slot,
//!     Value::list(Shape::I32, vec![Value::I32(1), Value::I32(2), Value::I32(3)]),
//! );
//! ```
//!
//! A failed parse aborts the whole call and may leave a container target
//! partially populated; the target's content is unspecified whenever an
//! error is returned.

use std::borrow::Cow;
use std::num::ParseIntError;

use num_complex::{Complex32, Complex64};
use num_traits::Num;

use crate::map::ValueMap;
use crate::{duration, Error, Options, Result, Shape, Value};

pub(crate) fn parse_value(s: &str, target: &mut Value, options: &Options) -> Result<()> {
    if let Some((id, any)) = target.leaf_mut() {
        if let Some(f) = options.parser(id) {
            return f(s, any);
        }
    }

    match target {
        Value::Str(slot) => {
            *slot = s.to_string();
            Ok(())
        }
        Value::Bytes(slot) => {
            *slot = s.as_bytes().to_vec();
            Ok(())
        }
        Value::Bool(slot) => {
            *slot = parse_bool(s)?;
            Ok(())
        }
        Value::I8(slot) => {
            *slot = parse_int(s)?;
            Ok(())
        }
        Value::I16(slot) => {
            *slot = parse_int(s)?;
            Ok(())
        }
        Value::I32(slot) => {
            *slot = parse_int(s)?;
            Ok(())
        }
        Value::I64(slot) => {
            *slot = parse_int(s)?;
            Ok(())
        }
        Value::U8(slot) => {
            *slot = parse_int(s)?;
            Ok(())
        }
        Value::U16(slot) => {
            *slot = parse_int(s)?;
            Ok(())
        }
        Value::U32(slot) => {
            *slot = parse_int(s)?;
            Ok(())
        }
        Value::U64(slot) => {
            *slot = parse_int(s)?;
            Ok(())
        }
        Value::F32(slot) => {
            *slot = s.parse::<f32>()?;
            Ok(())
        }
        Value::F64(slot) => {
            *slot = s.parse::<f64>()?;
            Ok(())
        }
        Value::C32(slot) => {
            *slot = strip_parens(s).parse::<Complex32>()?;
            Ok(())
        }
        Value::C64(slot) => {
            *slot = strip_parens(s).parse::<Complex64>()?;
            Ok(())
        }
        Value::Duration(slot) => {
            *slot = duration::parse(s)?;
            Ok(())
        }
        Value::Optional { pointee, value } => {
            // Allocate backing storage if none exists, then parse into the
            // pointee. The empty string is not special-cased here; see the
            // crate docs for the resulting asymmetry with stringify.
            let inner = value.get_or_insert_with(|| Box::new(pointee.default_value()));
            parse_value(s, inner, options)
        }
        Value::List { elem, items } => {
            if *elem == Shape::U8 {
                *items = s.bytes().map(Value::U8).collect();
                return Ok(());
            }
            let mut parsed = Vec::new();
            for piece in s.split(options.element_separator()) {
                let mut slot = elem.default_value();
                parse_value(piece, &mut slot, options)?;
                parsed.push(slot);
            }
            *items = parsed;
            Ok(())
        }
        Value::Array {
            elem,
            capacity,
            items,
        } => {
            if *elem == Shape::U8 {
                if s.len() > *capacity {
                    return Err(Error::CapacityExceeded {
                        count: s.len(),
                        capacity: *capacity,
                    });
                }
                *items = s.bytes().map(Value::U8).collect();
                return Ok(());
            }
            let pieces: Vec<&str> = s.split(options.element_separator()).collect();
            if pieces.len() > *capacity {
                return Err(Error::CapacityExceeded {
                    count: pieces.len(),
                    capacity: *capacity,
                });
            }
            let mut parsed = Vec::with_capacity(pieces.len());
            for piece in pieces {
                let mut slot = elem.default_value();
                parse_value(piece, &mut slot, options)?;
                parsed.push(slot);
            }
            *items = parsed;
            Ok(())
        }
        Value::Map(map) => {
            let key_shape = map.key_shape().clone();
            let value_shape = map.value_shape().clone();
            let mut fresh = ValueMap::new(key_shape.clone(), value_shape.clone());
            if !s.trim().is_empty() {
                for pair in s.split(options.element_separator()) {
                    let parts: Vec<&str> = pair.split(options.key_separator()).collect();
                    if parts.len() != 2 {
                        return Err(Error::MalformedEntry(pair.to_string()));
                    }
                    let mut key = key_shape.default_value();
                    parse_value(parts[0], &mut key, options)?;
                    let mut value = value_shape.default_value();
                    parse_value(parts[1], &mut value, options)?;
                    // Later duplicates overwrite earlier entries.
                    fresh.insert(key, value);
                }
            }
            *map = fresh;
            Ok(())
        }
        Value::Custom(custom) => {
            if let Some(u) = custom.unmarshal_text() {
                return u.unmarshal_text(s);
            }
            if let Some(u) = custom.unmarshal_binary() {
                return u.unmarshal_binary(s.as_bytes());
            }
            Err(Error::unsupported_type(custom.shape().name()))
        }
    }
}

/// Parses an integer sized to the target width, accepting `0x`/`0o`/`0b`
/// prefixes (either case, sign before prefix) in addition to base 10.
fn parse_int<T>(s: &str) -> Result<T>
where
    T: Num<FromStrRadixErr = ParseIntError>,
{
    let (radix, digits) = split_radix(s);
    T::from_str_radix(&digits, radix).map_err(Error::from)
}

fn split_radix(s: &str) -> (u32, Cow<'_, str>) {
    let (sign, body) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => match s.strip_prefix('+') {
            Some(rest) => ("", rest),
            None => ("", s),
        },
    };
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = body.strip_prefix(prefix) {
            return (radix, Cow::Owned(format!("{sign}{digits}")));
        }
    }
    (10, Cow::Borrowed(s))
}

fn parse_bool(s: &str) -> Result<bool> {
    match s {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(Error::InvalidBool(s.to_string())),
    }
}

/// Complex input may be wrapped in balanced parentheses, matching the
/// stringify output `(re+imi)`; the components are handed to the
/// underlying complex parser.
fn strip_parens(s: &str) -> &str {
    s.strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .unwrap_or(s)
}
