use core::fmt;
use core::marker::PhantomData;

use crate::error::FromValueError;
use crate::info::{TypeInfo, TypePath, Typed};
use crate::value::{DataContract, Value, ValueContext};

/// A slot declared as contract `T` that may hold a value of any type.
///
/// The writer emits an `i:type` attribute when the held value's runtime
/// type is not `T`, and that type must be resolvable as a known type. On
/// read the slot keeps whatever the `i:type` attribute selected.
///
/// # Examples
///
/// ```
/// use dc_contract::{DataContract, Poly};
///
/// #[derive(DataContract, Default, Debug, PartialEq)]
/// #[data_contract(known_type(Circle))]
/// struct Shape {
///     id: i32,
/// }
///
/// #[derive(DataContract, Default, Debug, PartialEq)]
/// struct Circle {
///     #[data_member(base)]
///     base: Shape,
///     radius: f64,
/// }
///
/// let slot: Poly<Shape> = Poly::new(&Circle { base: Shape { id: 1 }, radius: 2.0 });
/// assert!(slot.is::<Circle>());
/// assert!(!slot.is::<Shape>());
/// assert_eq!(slot.downcast::<Circle>().unwrap().radius, 2.0);
/// ```
pub struct Poly<T> {
    value: Value,
    marker: PhantomData<fn() -> T>,
}

impl<T> Poly<T> {
    /// Converts `value` into the slot.
    pub fn new<U: DataContract>(value: &U) -> Self {
        Self::from_raw(value.to_value(&mut ValueContext::new()))
    }

    #[inline]
    pub const fn from_raw(value: Value) -> Self {
        Self {
            value,
            marker: PhantomData,
        }
    }

    #[inline]
    pub const fn null() -> Self {
        Self::from_raw(Value::Null)
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[inline]
    pub fn into_value(self) -> Value {
        self.value
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    /// Whether the held value's runtime type is `U`.
    pub fn is<U: Typed>(&self) -> bool {
        self.value
            .runtime_type()
            .is_some_and(|info| info == U::type_info())
    }

    /// Converts the held value into `U`.
    pub fn downcast<U: DataContract>(&self) -> Result<U, FromValueError> {
        U::from_value(&self.value, &mut ValueContext::new())
    }
}

impl<T> Clone for Poly<T> {
    fn clone(&self) -> Self {
        Self::from_raw(self.value.clone())
    }
}

impl<T> Default for Poly<T> {
    #[inline]
    fn default() -> Self {
        Self::null()
    }
}

impl<T> PartialEq for Poly<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> fmt::Debug for Poly<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Poly").field(&self.value).finish()
    }
}

impl<T: TypePath> TypePath for Poly<T> {
    #[inline]
    fn type_path() -> &'static str {
        T::type_path()
    }

    #[inline]
    fn type_name() -> &'static str {
        T::type_name()
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        T::module_path()
    }
}

impl<T: Typed> Typed for Poly<T> {
    #[inline]
    fn type_info() -> &'static TypeInfo {
        T::type_info()
    }
}

impl<T: Typed> DataContract for Poly<T> {
    fn to_value(&self, _cx: &mut ValueContext) -> Value {
        self.value.clone()
    }

    fn from_value(value: &Value, _cx: &mut ValueContext) -> Result<Self, FromValueError> {
        Ok(Self::from_raw(value.clone()))
    }
}
