//! The [`custom_value!`](crate::custom_value) macro.

/// Implements [`Custom`](crate::Custom) and
/// [`Registrable`](crate::Registrable) for a type, wiring the listed
/// capabilities into the probe.
///
/// The type must be `Clone + PartialEq + Debug + 'static`. Capabilities
/// are named after their traits: `marshal_text`, `unmarshal_text`,
/// `marshal_binary`, `unmarshal_binary`; each listed capability requires
/// the corresponding trait impl on the type.
///
/// # Examples
///
/// ```rust
/// use flatconv::{custom_value, MarshalText, Result};
///
/// #[derive(Clone, Debug, Default, PartialEq)]
/// struct Celsius(f64);
///
/// impl MarshalText for Celsius {
///     fn marshal_text(&self) -> Result<String> {
///         Ok(format!("{}C", self.0))
///     }
/// }
///
/// custom_value!(Celsius: marshal_text);
/// ```
#[macro_export]
macro_rules! custom_value {
    ($ty:ty $(: $($cap:ident),+ $(,)?)?) => {
        impl $crate::Custom for $ty {
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            fn clone_box(&self) -> ::std::boxed::Box<dyn $crate::Custom> {
                ::std::boxed::Box::new(self.clone())
            }

            fn eq_box(&self, other: &dyn $crate::Custom) -> bool {
                other
                    .as_any()
                    .downcast_ref::<Self>()
                    .map_or(false, |other| other == self)
            }

            fn type_name(&self) -> &'static str {
                ::std::any::type_name::<Self>()
            }

            $($($crate::__custom_capability!($cap);)+)?
        }

        impl $crate::Registrable for $ty {}
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __custom_capability {
    (marshal_text) => {
        fn as_marshal_text(&self) -> ::std::option::Option<&dyn $crate::MarshalText> {
            ::std::option::Option::Some(self)
        }
    };
    (unmarshal_text) => {
        fn as_unmarshal_text(
            &mut self,
        ) -> ::std::option::Option<&mut dyn $crate::UnmarshalText> {
            ::std::option::Option::Some(self)
        }
    };
    (marshal_binary) => {
        fn as_marshal_binary(&self) -> ::std::option::Option<&dyn $crate::MarshalBinary> {
            ::std::option::Option::Some(self)
        }
    };
    (unmarshal_binary) => {
        fn as_unmarshal_binary(
            &mut self,
        ) -> ::std::option::Option<&mut dyn $crate::UnmarshalBinary> {
            ::std::option::Option::Some(self)
        }
    };
}
