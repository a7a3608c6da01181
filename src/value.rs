//! Dynamically-shaped values and their type descriptors.
//!
//! This module provides the three types the conversion engines dispatch on:
//!
//! - [`Value`]: a closed sum type over every supported kind of value. Both
//!   engines walk it recursively with a single `match`.
//! - [`Shape`]: the type-descriptor tree mirroring [`Value`]. The parse
//!   engine uses shapes to materialize fresh zero-valued slots for container
//!   elements, map keys/values and optional pointees.
//! - [`Kind`]: the coarse structural category of a value or shape, used in
//!   error messages and for validating registrations.
//!
//! ## Creating values
//!
//! ```rust
//! use flatconv::{Shape, Value};
//!
//! let n = Value::from(42i64);
//! let s = Value::from("hello");
//! let list = Value::list(Shape::Str, vec![Value::from("a"), Value::from("b")]);
//!
//! assert_eq!(n.as_i64(), Some(42));
//! assert_eq!(s.as_str(), Some("hello"));
//! assert_eq!(list.kind(), flatconv::Kind::List);
//! ```
//!
//! ## Parse targets
//!
//! A parse target is just a mutable `Value` whose structure describes the
//! type being parsed into:
//!
//! ```rust
//! use flatconv::{parse, Value};
//!
//! let mut slot = Value::U16(0);
//! parse("0xFF", &mut slot).unwrap();
//! assert_eq!(slot, Value::U16(255));
//! ```

use std::any::{Any, TypeId};
use std::fmt;

use chrono::TimeDelta;
use num_complex::{Complex32, Complex64};

use crate::custom::{CustomShape, CustomValue};
use crate::map::ValueMap;
use crate::Custom;

/// The structural category of a value, as opposed to its exact type.
///
/// The last five categories (`Dynamic`, `Channel`, `Function`, `RawPointer`
/// and, for registration purposes, `Map`) never occur inside a [`Value`];
/// they exist so that registering a converter for such a type can be
/// rejected with an error naming the kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Str,
    Bytes,
    Bool,
    Int,
    Uint,
    Float,
    Complex,
    Duration,
    Optional,
    List,
    Array,
    Map,
    Custom,
    Dynamic,
    Channel,
    Function,
    RawPointer,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Str => "string",
            Kind::Bytes => "bytes",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float => "float",
            Kind::Complex => "complex",
            Kind::Duration => "duration",
            Kind::Optional => "optional",
            Kind::List => "list",
            Kind::Array => "array",
            Kind::Map => "map",
            Kind::Custom => "custom",
            Kind::Dynamic => "dynamic",
            Kind::Channel => "channel",
            Kind::Function => "function",
            Kind::RawPointer => "raw pointer",
        };
        f.write_str(name)
    }
}

/// A type descriptor: the shape of a [`Value`] without its content.
///
/// Shapes drive the parse engine wherever it has to conjure storage that
/// does not exist yet: elements of a list being split out of the input,
/// fresh keys and values for a map, the pointee of an empty optional.
///
/// # Examples
///
/// ```rust
/// use flatconv::{Shape, Value};
///
/// let shape = Shape::List(Box::new(Shape::I32));
/// assert_eq!(shape.default_value(), Value::list(Shape::I32, vec![]));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Str,
    Bytes,
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    C32,
    C64,
    Duration,
    Optional(Box<Shape>),
    List(Box<Shape>),
    Array(Box<Shape>, usize),
    Map(Box<Shape>, Box<Shape>),
    Custom(CustomShape),
}

impl Shape {
    /// Returns the coarse [`Kind`] of this shape.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Shape::Str => Kind::Str,
            Shape::Bytes => Kind::Bytes,
            Shape::Bool => Kind::Bool,
            Shape::I8 | Shape::I16 | Shape::I32 | Shape::I64 => Kind::Int,
            Shape::U8 | Shape::U16 | Shape::U32 | Shape::U64 => Kind::Uint,
            Shape::F32 | Shape::F64 => Kind::Float,
            Shape::C32 | Shape::C64 => Kind::Complex,
            Shape::Duration => Kind::Duration,
            Shape::Optional(_) => Kind::Optional,
            Shape::List(_) => Kind::List,
            Shape::Array(_, _) => Kind::Array,
            Shape::Map(_, _) => Kind::Map,
            Shape::Custom(_) => Kind::Custom,
        }
    }

    /// Builds the zero value of this shape.
    ///
    /// Numeric shapes produce zero, strings and byte sequences are empty,
    /// optionals are empty, containers have no populated entries, and
    /// custom shapes invoke the `Default` of the underlying type.
    #[must_use]
    pub fn default_value(&self) -> Value {
        match self {
            Shape::Str => Value::Str(String::new()),
            Shape::Bytes => Value::Bytes(Vec::new()),
            Shape::Bool => Value::Bool(false),
            Shape::I8 => Value::I8(0),
            Shape::I16 => Value::I16(0),
            Shape::I32 => Value::I32(0),
            Shape::I64 => Value::I64(0),
            Shape::U8 => Value::U8(0),
            Shape::U16 => Value::U16(0),
            Shape::U32 => Value::U32(0),
            Shape::U64 => Value::U64(0),
            Shape::F32 => Value::F32(0.0),
            Shape::F64 => Value::F64(0.0),
            Shape::C32 => Value::C32(Complex32::new(0.0, 0.0)),
            Shape::C64 => Value::C64(Complex64::new(0.0, 0.0)),
            Shape::Duration => Value::Duration(TimeDelta::zero()),
            Shape::Optional(pointee) => Value::Optional {
                pointee: (**pointee).clone(),
                value: None,
            },
            Shape::List(elem) => Value::List {
                elem: (**elem).clone(),
                items: Vec::new(),
            },
            Shape::Array(elem, capacity) => Value::Array {
                elem: (**elem).clone(),
                capacity: *capacity,
                items: Vec::new(),
            },
            Shape::Map(key, value) => {
                Value::Map(ValueMap::new((**key).clone(), (**value).clone()))
            }
            Shape::Custom(shape) => Value::Custom(CustomValue::from_shape(shape.clone())),
        }
    }
}

/// A dynamically-shaped value: the input of [`stringify`](crate::stringify)
/// and the target of [`parse`](crate::parse).
///
/// Scalar variants hold their content inline. Container variants carry the
/// [`Shape`] of their elements so that an empty container is still a
/// complete parse target. `Custom` holds a type-erased leaf implementing
/// the [`Custom`](crate::Custom) trait.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Text. Stringifies to itself.
    Str(String),
    /// Raw byte sequence. Interpreted as text directly, never hex-encoded.
    Bytes(Vec<u8>),
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    C32(Complex32),
    C64(Complex64),
    /// Signed duration, rendered in clock-unit notation such as `5h0m0s`.
    Duration(TimeDelta),
    /// Optional value. `None` stringifies to the empty string.
    Optional {
        pointee: Shape,
        value: Option<Box<Value>>,
    },
    /// Variable-length ordered sequence.
    List { elem: Shape, items: Vec<Value> },
    /// Fixed-capacity ordered sequence. `items` is the populated prefix;
    /// the remaining capacity stringifies as empty placeholders.
    Array {
        elem: Shape,
        capacity: usize,
        items: Vec<Value>,
    },
    /// Associative collection of key/value pairs.
    Map(ValueMap),
    /// Type-erased custom leaf.
    Custom(CustomValue),
}

impl Value {
    /// Wraps a custom leaf type into a `Value`.
    ///
    /// `Default` is required so the type can also act as a parse target
    /// inside containers, where fresh slots are built from its default.
    pub fn custom<T: Custom + Default + 'static>(value: T) -> Value {
        Value::Custom(CustomValue::new(value))
    }

    /// Builds a list value from an element shape and items.
    #[must_use]
    pub fn list(elem: Shape, items: Vec<Value>) -> Value {
        Value::List { elem, items }
    }

    /// Builds a fixed-capacity array value from an element shape, capacity
    /// and populated prefix. `items` must not exceed `capacity`.
    #[must_use]
    pub fn array(elem: Shape, capacity: usize, items: Vec<Value>) -> Value {
        debug_assert!(items.len() <= capacity, "populated prefix exceeds capacity");
        Value::Array {
            elem,
            capacity,
            items,
        }
    }

    /// Builds a populated optional around `value`.
    #[must_use]
    pub fn some(value: Value) -> Value {
        Value::Optional {
            pointee: value.shape(),
            value: Some(Box::new(value)),
        }
    }

    /// Builds an empty optional with the given pointee shape.
    #[must_use]
    pub fn none(pointee: Shape) -> Value {
        Value::Optional {
            pointee,
            value: None,
        }
    }

    /// Returns the coarse [`Kind`] of this value.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.shape().kind()
    }

    /// Returns the [`Shape`] describing this value's type structure.
    #[must_use]
    pub fn shape(&self) -> Shape {
        match self {
            Value::Str(_) => Shape::Str,
            Value::Bytes(_) => Shape::Bytes,
            Value::Bool(_) => Shape::Bool,
            Value::I8(_) => Shape::I8,
            Value::I16(_) => Shape::I16,
            Value::I32(_) => Shape::I32,
            Value::I64(_) => Shape::I64,
            Value::U8(_) => Shape::U8,
            Value::U16(_) => Shape::U16,
            Value::U32(_) => Shape::U32,
            Value::U64(_) => Shape::U64,
            Value::F32(_) => Shape::F32,
            Value::F64(_) => Shape::F64,
            Value::C32(_) => Shape::C32,
            Value::C64(_) => Shape::C64,
            Value::Duration(_) => Shape::Duration,
            Value::Optional { pointee, .. } => Shape::Optional(Box::new(pointee.clone())),
            Value::List { elem, .. } => Shape::List(Box::new(elem.clone())),
            Value::Array { elem, capacity, .. } => {
                Shape::Array(Box::new(elem.clone()), *capacity)
            }
            Value::Map(map) => Shape::Map(
                Box::new(map.key_shape().clone()),
                Box::new(map.value_shape().clone()),
            ),
            Value::Custom(custom) => Shape::Custom(custom.shape().clone()),
        }
    }

    /// If this is a string value, returns its content.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// If this is a boolean value, returns it.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If this is a signed integer value, returns it widened to `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I8(v) => Some(i64::from(*v)),
            Value::I16(v) => Some(i64::from(*v)),
            Value::I32(v) => Some(i64::from(*v)),
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// If this is an unsigned integer value, returns it widened to `u64`.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::U8(v) => Some(u64::from(*v)),
            Value::U16(v) => Some(u64::from(*v)),
            Value::U32(v) => Some(u64::from(*v)),
            Value::U64(v) => Some(*v),
            _ => None,
        }
    }

    /// If this is a floating-point value, returns it widened to `f64`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F32(v) => Some(f64::from(*v)),
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// The exact-type identity and erased view of a leaf node, used for
    /// registry dispatch. Container and optional nodes have no registry
    /// identity.
    pub(crate) fn leaf(&self) -> Option<(TypeId, &dyn Any)> {
        match self {
            Value::Str(v) => Some((TypeId::of::<String>(), v as &dyn Any)),
            Value::Bytes(v) => Some((TypeId::of::<Vec<u8>>(), v as &dyn Any)),
            Value::Bool(v) => Some((TypeId::of::<bool>(), v as &dyn Any)),
            Value::I8(v) => Some((TypeId::of::<i8>(), v as &dyn Any)),
            Value::I16(v) => Some((TypeId::of::<i16>(), v as &dyn Any)),
            Value::I32(v) => Some((TypeId::of::<i32>(), v as &dyn Any)),
            Value::I64(v) => Some((TypeId::of::<i64>(), v as &dyn Any)),
            Value::U8(v) => Some((TypeId::of::<u8>(), v as &dyn Any)),
            Value::U16(v) => Some((TypeId::of::<u16>(), v as &dyn Any)),
            Value::U32(v) => Some((TypeId::of::<u32>(), v as &dyn Any)),
            Value::U64(v) => Some((TypeId::of::<u64>(), v as &dyn Any)),
            Value::F32(v) => Some((TypeId::of::<f32>(), v as &dyn Any)),
            Value::F64(v) => Some((TypeId::of::<f64>(), v as &dyn Any)),
            Value::C32(v) => Some((TypeId::of::<Complex32>(), v as &dyn Any)),
            Value::C64(v) => Some((TypeId::of::<Complex64>(), v as &dyn Any)),
            Value::Duration(v) => Some((TypeId::of::<TimeDelta>(), v as &dyn Any)),
            Value::Custom(c) => Some((c.shape().id(), c.as_any())),
            _ => None,
        }
    }

    /// Mutable counterpart of [`Value::leaf`] for the parse direction.
    pub(crate) fn leaf_mut(&mut self) -> Option<(TypeId, &mut dyn Any)> {
        match self {
            Value::Str(v) => Some((TypeId::of::<String>(), v as &mut dyn Any)),
            Value::Bytes(v) => Some((TypeId::of::<Vec<u8>>(), v as &mut dyn Any)),
            Value::Bool(v) => Some((TypeId::of::<bool>(), v as &mut dyn Any)),
            Value::I8(v) => Some((TypeId::of::<i8>(), v as &mut dyn Any)),
            Value::I16(v) => Some((TypeId::of::<i16>(), v as &mut dyn Any)),
            Value::I32(v) => Some((TypeId::of::<i32>(), v as &mut dyn Any)),
            Value::I64(v) => Some((TypeId::of::<i64>(), v as &mut dyn Any)),
            Value::U8(v) => Some((TypeId::of::<u8>(), v as &mut dyn Any)),
            Value::U16(v) => Some((TypeId::of::<u16>(), v as &mut dyn Any)),
            Value::U32(v) => Some((TypeId::of::<u32>(), v as &mut dyn Any)),
            Value::U64(v) => Some((TypeId::of::<u64>(), v as &mut dyn Any)),
            Value::F32(v) => Some((TypeId::of::<f32>(), v as &mut dyn Any)),
            Value::F64(v) => Some((TypeId::of::<f64>(), v as &mut dyn Any)),
            Value::C32(v) => Some((TypeId::of::<Complex32>(), v as &mut dyn Any)),
            Value::C64(v) => Some((TypeId::of::<Complex64>(), v as &mut dyn Any)),
            Value::Duration(v) => Some((TypeId::of::<TimeDelta>(), v as &mut dyn Any)),
            Value::Custom(c) => Some((c.shape().id(), c.as_any_mut())),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::I8(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::I16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::U8(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::U16(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::F32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<Complex32> for Value {
    fn from(v: Complex32) -> Self {
        Value::C32(v)
    }
}

impl From<Complex64> for Value {
    fn from(v: Complex64) -> Self {
        Value::C64(v)
    }
}

impl From<TimeDelta> for Value {
    fn from(v: TimeDelta) -> Self {
        Value::Duration(v)
    }
}

impl From<ValueMap> for Value {
    fn from(v: ValueMap) -> Self {
        Value::Map(v)
    }
}
