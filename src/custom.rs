//! Custom leaf types and the marshal/unmarshal capability probe.
//!
//! A type that is neither a built-in scalar nor a container participates in
//! conversion as a *custom leaf*: it implements [`Custom`] and is wrapped
//! into [`Value::Custom`](crate::Value::Custom). Both engines consult a
//! custom leaf in the same order:
//!
//! 1. a converter registered for the exact type in
//!    [`Options`](crate::Options);
//! 2. the text capability ([`MarshalText`] / [`UnmarshalText`]);
//! 3. the binary capability ([`MarshalBinary`] / [`UnmarshalBinary`]);
//! 4. otherwise the leaf is an unsupported type.
//!
//! Capabilities are advertised through the defaulted `as_*` hooks on
//! [`Custom`]; overriding a hook to return `Some(self)` is what makes the
//! probe find the capability. The unmarshal hooks take `&mut self` because
//! unmarshalling writes into the value; parse targets are always handed to
//! the engines as mutable references, so a mutable handle is available
//! wherever the probe needs one.
//!
//! The [`custom_value!`](crate::custom_value) macro generates the
//! boilerplate part of a [`Custom`] impl and wires the chosen capabilities.
//!
//! ## Examples
//!
//! ```rust
//! use flatconv::{custom_value, parse, stringify, Result, Value};
//! use flatconv::{MarshalText, UnmarshalText};
//!
//! #[derive(Clone, Debug, Default, PartialEq)]
//! struct Tag(String);
//!
//! impl MarshalText for Tag {
//!     fn marshal_text(&self) -> Result<String> {
//!         Ok(format!("#{}", self.0))
//!     }
//! }
//!
//! impl UnmarshalText for Tag {
//!     fn unmarshal_text(&mut self, text: &str) -> Result<()> {
//!         self.0 = text.trim_start_matches('#').to_string();
//!         Ok(())
//!     }
//! }
//!
//! custom_value!(Tag: marshal_text, unmarshal_text);
//!
//! let s = stringify(&Value::custom(Tag("rust".into()))).unwrap();
//! assert_eq!(s, "#rust");
//!
//! let mut slot = Value::custom(Tag::default());
//! parse("#codec", &mut slot).unwrap();
//! assert_eq!(slot, Value::custom(Tag("codec".into())));
//! ```

use std::any::{Any, TypeId};
use std::fmt;

use crate::Result;

/// Capability: render the value as text.
pub trait MarshalText {
    fn marshal_text(&self) -> Result<String>;
}

/// Capability: reconstruct the value from text.
pub trait UnmarshalText {
    fn unmarshal_text(&mut self, text: &str) -> Result<()>;
}

/// Capability: render the value as raw bytes. Consulted after
/// [`MarshalText`]; the bytes become the output string.
pub trait MarshalBinary {
    fn marshal_binary(&self) -> Result<Vec<u8>>;
}

/// Capability: reconstruct the value from raw bytes. Consulted after
/// [`UnmarshalText`].
pub trait UnmarshalBinary {
    fn unmarshal_binary(&mut self, bytes: &[u8]) -> Result<()>;
}

/// A type-erased custom leaf.
///
/// The first five methods are mechanical and identical for every
/// implementor; the `as_*` hooks advertise capabilities to the probe and
/// default to absent. Use [`custom_value!`](crate::custom_value) instead of
/// writing this out by hand.
pub trait Custom: fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn clone_box(&self) -> Box<dyn Custom>;
    fn eq_box(&self, other: &dyn Custom) -> bool;
    fn type_name(&self) -> &'static str;

    fn as_marshal_text(&self) -> Option<&dyn MarshalText> {
        None
    }

    fn as_marshal_binary(&self) -> Option<&dyn MarshalBinary> {
        None
    }

    fn as_unmarshal_text(&mut self) -> Option<&mut dyn UnmarshalText> {
        None
    }

    fn as_unmarshal_binary(&mut self) -> Option<&mut dyn UnmarshalBinary> {
        None
    }
}

/// The identity of a custom leaf type: its `TypeId` (the registry key), its
/// name (for error messages) and a factory producing its default value (for
/// fresh parse slots).
#[derive(Clone)]
pub struct CustomShape {
    id: TypeId,
    name: &'static str,
    make: fn() -> Box<dyn Custom>,
}

fn make_default<T: Custom + Default + 'static>() -> Box<dyn Custom> {
    Box::new(T::default())
}

impl CustomShape {
    /// The shape of custom leaf type `T`.
    #[must_use]
    pub fn of<T: Custom + Default + 'static>() -> Self {
        CustomShape {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            make: make_default::<T>,
        }
    }

    /// The exact-type identity used for registry lookup.
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The type name used in error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for CustomShape {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for CustomShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CustomShape").field(&self.name).finish()
    }
}

/// A custom leaf value: the erased instance together with its shape.
pub struct CustomValue {
    shape: CustomShape,
    inner: Box<dyn Custom>,
}

impl CustomValue {
    /// Wraps `value` into an erased leaf.
    pub fn new<T: Custom + Default + 'static>(value: T) -> Self {
        CustomValue {
            shape: CustomShape::of::<T>(),
            inner: Box::new(value),
        }
    }

    /// Builds the default value of a custom shape.
    pub(crate) fn from_shape(shape: CustomShape) -> Self {
        let inner = (shape.make)();
        CustomValue { shape, inner }
    }

    /// The shape of this leaf.
    #[must_use]
    pub fn shape(&self) -> &CustomShape {
        &self.shape
    }

    /// Downcasts to the concrete type.
    #[must_use]
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref()
    }

    /// Mutably downcasts to the concrete type.
    #[must_use]
    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.inner.as_any_mut().downcast_mut()
    }

    pub(crate) fn as_any(&self) -> &dyn Any {
        self.inner.as_any()
    }

    pub(crate) fn as_any_mut(&mut self) -> &mut dyn Any {
        self.inner.as_any_mut()
    }

    pub(crate) fn marshal_text(&self) -> Option<&dyn MarshalText> {
        self.inner.as_marshal_text()
    }

    pub(crate) fn marshal_binary(&self) -> Option<&dyn MarshalBinary> {
        self.inner.as_marshal_binary()
    }

    pub(crate) fn unmarshal_text(&mut self) -> Option<&mut dyn UnmarshalText> {
        self.inner.as_unmarshal_text()
    }

    pub(crate) fn unmarshal_binary(&mut self) -> Option<&mut dyn UnmarshalBinary> {
        self.inner.as_unmarshal_binary()
    }

    pub(crate) fn has_unmarshal(&mut self) -> bool {
        self.inner.as_unmarshal_text().is_some() || self.inner.as_unmarshal_binary().is_some()
    }
}

impl Clone for CustomValue {
    fn clone(&self) -> Self {
        CustomValue {
            shape: self.shape.clone(),
            inner: self.inner.clone_box(),
        }
    }
}

impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        self.inner.eq_box(other.inner.as_ref())
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}
