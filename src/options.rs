//! Per-call configuration: separators and the conversion registry.
//!
//! An [`Options`] value is built fresh for every top-level call with
//! consuming `with_*` builders and is never mutated afterwards, so
//! concurrent conversions never share registry state:
//!
//! ```rust
//! use flatconv::{stringify_with_options, Options, Shape, Value};
//!
//! let options = Options::new()
//!     .with_element_separator(',')
//!     .with_key_separator('=');
//!
//! let list = Value::list(Shape::Str, vec![Value::from("a"), Value::from("b")]);
//! assert_eq!(stringify_with_options(&list, &options).unwrap(), "a,b");
//! ```
//!
//! ## Registering converters
//!
//! A registered converter is keyed by the *exact* type it handles, never
//! by kind, and never shared with related types. Registering for a
//! primitive overrides the built-in handling of that one type:
//!
//! ```rust
//! use flatconv::{stringify_with_options, Options, Value};
//!
//! let options = Options::new().with_stringifier(|v: &f64| Ok(format!("{v:.2}")));
//! assert_eq!(
//!     stringify_with_options(&Value::F64(3.14159), &options).unwrap(),
//!     "3.14",
//! );
//! // The f32 built-in is untouched.
//! assert_eq!(
//!     stringify_with_options(&Value::F32(1.5), &options).unwrap(),
//!     "1.5",
//! );
//! ```
//!
//! Registration for dynamic, channel, function, raw-pointer or
//! map-shaped types is rejected. The rejection is not immediate: it
//! accumulates in the `Options` and surfaces as the first action of the
//! next [`stringify`](crate::stringify) or [`parse`](crate::parse) call,
//! which then performs no traversal at all.
//!
//! The element separator and the key separator must be distinct
//! characters; this is the caller's responsibility and is not enforced.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};

use chrono::TimeDelta;
use num_complex::{Complex32, Complex64};

use crate::{Error, Kind, Result};

type StringifyFn = Box<dyn Fn(&dyn Any) -> Result<String>>;
type ParseFn = Box<dyn Fn(&str, &mut dyn Any) -> Result<()>>;

/// A type that can be the subject of a registered converter.
///
/// The associated [`Kind`] is what registration validates; it defaults to
/// [`Kind::Custom`], so a custom leaf type opts in with an empty impl
/// (which [`custom_value!`](crate::custom_value) writes for you):
///
/// ```rust
/// # use flatconv::Registrable;
/// #[derive(Debug)]
/// struct Temperature(f64);
///
/// impl Registrable for Temperature {}
/// ```
///
/// The crate provides impls for every built-in leaf type, and also for the
/// disallowed categories (maps, channel endpoints, function pointers, raw
/// pointers, `Box<dyn Any>`) so that registering one of them produces the
/// accumulated rejection error instead of failing to compile in an
/// unhelpful place.
pub trait Registrable: Any {
    /// The structural category validated at registration time.
    fn kind() -> Kind
    where
        Self: Sized,
    {
        Kind::Custom
    }
}

macro_rules! registrable {
    ($($ty:ty => $kind:expr),* $(,)?) => {
        $(
            impl Registrable for $ty {
                fn kind() -> Kind {
                    $kind
                }
            }
        )*
    };
}

registrable! {
    String => Kind::Str,
    Vec<u8> => Kind::Bytes,
    bool => Kind::Bool,
    i8 => Kind::Int,
    i16 => Kind::Int,
    i32 => Kind::Int,
    i64 => Kind::Int,
    u8 => Kind::Uint,
    u16 => Kind::Uint,
    u32 => Kind::Uint,
    u64 => Kind::Uint,
    f32 => Kind::Float,
    f64 => Kind::Float,
    Complex32 => Kind::Complex,
    Complex64 => Kind::Complex,
    TimeDelta => Kind::Duration,
}

impl<K: 'static, V: 'static, S: 'static> Registrable for HashMap<K, V, S> {
    fn kind() -> Kind {
        Kind::Map
    }
}

impl<K: 'static, V: 'static> Registrable for BTreeMap<K, V> {
    fn kind() -> Kind {
        Kind::Map
    }
}

impl<T: 'static> Registrable for std::sync::mpsc::Sender<T> {
    fn kind() -> Kind {
        Kind::Channel
    }
}

impl<T: 'static> Registrable for std::sync::mpsc::Receiver<T> {
    fn kind() -> Kind {
        Kind::Channel
    }
}

impl<T: 'static> Registrable for *const T {
    fn kind() -> Kind {
        Kind::RawPointer
    }
}

impl<T: 'static> Registrable for *mut T {
    fn kind() -> Kind {
        Kind::RawPointer
    }
}

impl Registrable for Box<dyn Any> {
    fn kind() -> Kind {
        Kind::Dynamic
    }
}

impl<R: 'static> Registrable for fn() -> R {
    fn kind() -> Kind {
        Kind::Function
    }
}

impl<A: 'static, R: 'static> Registrable for fn(A) -> R {
    fn kind() -> Kind {
        Kind::Function
    }
}

impl<A: 'static, B: 'static, R: 'static> Registrable for fn(A, B) -> R {
    fn kind() -> Kind {
        Kind::Function
    }
}

fn rejected<T: Registrable>(role: &str) -> Option<String> {
    match T::kind() {
        Kind::Dynamic | Kind::Channel | Kind::Function | Kind::RawPointer | Kind::Map => {
            Some(format!("{} is not a valid {role} type", T::kind()))
        }
        _ => None,
    }
}

/// Configuration for a single conversion call.
///
/// Holds the two separator characters and the exact-type registry of
/// custom converters. Immutable once handed to an engine.
pub struct Options {
    elem_sep: char,
    key_sep: char,
    stringifiers: HashMap<TypeId, StringifyFn>,
    parsers: HashMap<TypeId, ParseFn>,
    invalid: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            elem_sep: ';',
            key_sep: ':',
            stringifiers: HashMap::new(),
            parsers: HashMap::new(),
            invalid: Vec::new(),
        }
    }
}

impl Options {
    /// Creates default options: element separator `;`, key separator `:`,
    /// no registered converters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the separator placed between sequence elements and map
    /// entries.
    #[must_use]
    pub fn with_element_separator(mut self, sep: char) -> Self {
        self.elem_sep = sep;
        self
    }

    /// Overrides the separator placed between a map key and its value.
    #[must_use]
    pub fn with_key_separator(mut self, sep: char) -> Self {
        self.key_sep = sep;
        self
    }

    /// Registers a stringifier for the exact type `T`.
    ///
    /// The function's error, if any, is propagated verbatim. Registering a
    /// dynamic, channel, function, raw-pointer or map type is rejected
    /// with an accumulated error naming the kind.
    #[must_use]
    pub fn with_stringifier<T, F>(mut self, f: F) -> Self
    where
        T: Registrable,
        F: Fn(&T) -> Result<String> + 'static,
    {
        if let Some(msg) = rejected::<T>("stringifier argument") {
            self.invalid.push(msg);
            return self;
        }
        self.stringifiers.insert(
            TypeId::of::<T>(),
            Box::new(move |any: &dyn Any| match any.downcast_ref::<T>() {
                Some(v) => f(v),
                None => Err(Error::custom("registered stringifier saw a mismatched type")),
            }),
        );
        self
    }

    /// Registers a parser producing the exact type `T`.
    ///
    /// On success the produced value is written into the parse target; the
    /// function's error, if any, is propagated verbatim. The same kind
    /// restrictions as [`Options::with_stringifier`] apply.
    #[must_use]
    pub fn with_parser<T, F>(mut self, f: F) -> Self
    where
        T: Registrable,
        F: Fn(&str) -> Result<T> + 'static,
    {
        if let Some(msg) = rejected::<T>("parser return") {
            self.invalid.push(msg);
            return self;
        }
        self.parsers.insert(
            TypeId::of::<T>(),
            Box::new(move |s: &str, any: &mut dyn Any| match any.downcast_mut::<T>() {
                Some(slot) => {
                    *slot = f(s)?;
                    Ok(())
                }
                None => Err(Error::custom("registered parser saw a mismatched target")),
            }),
        );
        self
    }

    /// The separator between sequence elements and map entries.
    #[must_use]
    pub fn element_separator(&self) -> char {
        self.elem_sep
    }

    /// The separator between a map key and its value.
    #[must_use]
    pub fn key_separator(&self) -> char {
        self.key_sep
    }

    pub(crate) fn stringifier(&self, id: TypeId) -> Option<&StringifyFn> {
        self.stringifiers.get(&id)
    }

    pub(crate) fn parser(&self, id: TypeId) -> Option<&ParseFn> {
        self.parsers.get(&id)
    }

    pub(crate) fn has_parser(&self, id: TypeId) -> bool {
        self.parsers.contains_key(&id)
    }

    /// Fails with the accumulated registration errors, if any. Called by
    /// the engines before any traversal.
    pub(crate) fn ensure_valid(&self) -> Result<()> {
        if self.invalid.is_empty() {
            Ok(())
        } else {
            Err(Error::Registration(self.invalid.clone()))
        }
    }
}
