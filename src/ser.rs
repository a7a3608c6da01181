//! The stringify engine: recursive value → string conversion.
//!
//! Every recursive step applies the same precedence chain: a converter
//! registered for the exact type, then the text-marshal capability, then
//! the binary-marshal capability, then built-in handling of the value's
//! kind. Container elements re-enter the chain from the top, so a
//! registered converter fires for elements just as it does for top-level
//! values.
//!
//! ```rust
//! use flatconv::{stringify, Shape, Value, ValueMap};
//!
//! let mut map = ValueMap::new(Shape::Str, Shape::Str);
//! map.insert(Value::from("key2"), Value::from("value2"));
//! map.insert(Value::from("key1"), Value::from("value1"));
//!
//! // Map output is sorted, not in insertion order.
//! assert_eq!(stringify(&Value::Map(map)).unwrap(), "key1:value1;key2:value2");
//! ```

use crate::{duration, Error, Options, Result, Shape, Value};

pub(crate) fn stringify_value(value: &Value, options: &Options) -> Result<String> {
    if let Some((id, any)) = value.leaf() {
        if let Some(f) = options.stringifier(id) {
            return f(any);
        }
    }

    match value {
        Value::Str(s) => Ok(s.clone()),
        Value::Bytes(b) => Ok(String::from_utf8_lossy(b).into_owned()),
        Value::Bool(v) => Ok(v.to_string()),
        Value::I8(v) => Ok(v.to_string()),
        Value::I16(v) => Ok(v.to_string()),
        Value::I32(v) => Ok(v.to_string()),
        Value::I64(v) => Ok(v.to_string()),
        Value::U8(v) => Ok(v.to_string()),
        Value::U16(v) => Ok(v.to_string()),
        Value::U32(v) => Ok(v.to_string()),
        Value::U64(v) => Ok(v.to_string()),
        Value::F32(v) => Ok(v.to_string()),
        Value::F64(v) => Ok(v.to_string()),
        Value::C32(c) => Ok(format_complex(&c.re.to_string(), &c.im.to_string())),
        Value::C64(c) => Ok(format_complex(&c.re.to_string(), &c.im.to_string())),
        Value::Duration(d) => Ok(duration::format(*d)),
        Value::Optional { value: None, .. } => Ok(String::new()),
        Value::Optional {
            value: Some(inner), ..
        } => stringify_value(inner, options),
        Value::List { elem, items } => {
            if let Some(bytes) = byte_items(elem, items) {
                return Ok(String::from_utf8_lossy(&bytes).into_owned());
            }
            let parts = stringify_elements(items, options)?;
            Ok(join(&parts, options.element_separator()))
        }
        Value::Array {
            elem,
            capacity,
            items,
        } => {
            if let Some(bytes) = byte_items(elem, items) {
                return Ok(String::from_utf8_lossy(&bytes).into_owned());
            }
            let mut parts = stringify_elements(items, options)?;
            // Unpopulated capacity renders as empty placeholders.
            while parts.len() < *capacity {
                parts.push(String::new());
            }
            Ok(join(&parts, options.element_separator()))
        }
        Value::Map(map) => {
            let mut pairs = Vec::with_capacity(map.len());
            for (key, val) in map.iter() {
                let sk = stringify_value(key, options).map_err(Error::map_key)?;
                let sv =
                    stringify_value(val, options).map_err(|e| Error::map_value(&sk, e))?;
                let mut pair = sk;
                pair.push(options.key_separator());
                pair.push_str(&sv);
                pairs.push(pair);
            }
            // Sort to get predictable output.
            pairs.sort_unstable();
            Ok(join(&pairs, options.element_separator()))
        }
        Value::Custom(custom) => {
            if let Some(m) = custom.marshal_text() {
                return m.marshal_text();
            }
            if let Some(m) = custom.marshal_binary() {
                let bytes = m.marshal_binary()?;
                return Ok(String::from_utf8_lossy(&bytes).into_owned());
            }
            Err(Error::unsupported_type(custom.shape().name()))
        }
    }
}

fn stringify_elements(items: &[Value], options: &Options) -> Result<Vec<String>> {
    let mut parts = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let s = stringify_value(item, options).map_err(|e| Error::element(i, e))?;
        parts.push(s);
    }
    Ok(parts)
}

/// The byte-sequence shortcut: a sequence whose element shape is a single
/// byte is interpreted as text directly instead of being separator-joined.
fn byte_items(elem: &Shape, items: &[Value]) -> Option<Vec<u8>> {
    if *elem != Shape::U8 {
        return None;
    }
    items
        .iter()
        .map(|v| match v {
            Value::U8(b) => Some(*b),
            _ => None,
        })
        .collect()
}

fn format_complex(re: &str, im: &str) -> String {
    if im.starts_with('-') {
        format!("({re}{im}i)")
    } else {
        format!("({re}+{im}i)")
    }
}

fn join(parts: &[String], sep: char) -> String {
    let mut out = String::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            out.push(sep);
        }
        out.push_str(part);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    fn plain(value: &Value) -> String {
        stringify_value(value, &Options::new()).unwrap()
    }

    #[test]
    fn test_complex_sign_handling() {
        assert_eq!(plain(&Value::C64(Complex64::new(3.0, 2.0))), "(3+2i)");
        assert_eq!(plain(&Value::C64(Complex64::new(5.0, -1.5))), "(5-1.5i)");
    }

    #[test]
    fn test_array_padding() {
        let v = Value::array(
            Shape::Str,
            10,
            vec![Value::from("item1"), Value::from("item2")],
        );
        assert_eq!(plain(&v), "item1;item2;;;;;;;;");
    }

    #[test]
    fn test_byte_sequence_is_text() {
        assert_eq!(plain(&Value::Bytes(b"whatever".to_vec())), "whatever");
        let list = Value::list(Shape::U8, b"abc".iter().map(|b| Value::U8(*b)).collect());
        assert_eq!(plain(&list), "abc");
    }

    #[test]
    fn test_element_error_carries_index() {
        #[derive(Clone, Debug, Default, PartialEq)]
        struct Opaque;
        crate::custom_value!(Opaque);

        let list = Value::list(
            Shape::Custom(crate::CustomShape::of::<Opaque>()),
            vec![Value::custom(Opaque)],
        );
        let err = stringify_value(&list, &Options::new()).unwrap_err();
        assert!(err.to_string().contains("index 0"));
    }
}
