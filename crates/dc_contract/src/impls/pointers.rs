use alloc::boxed::Box;
use alloc::sync::Arc;

use crate::error::FromValueError;
use crate::info::{TypeInfo, TypePath, Typed};
use crate::value::{DataContract, Value, ValueContext};

// Both pointers are transparent: their contract is the contract of `T`.

macro_rules! impl_transparent_type {
    ($ptr:ident) => {
        impl<T: TypePath> TypePath for $ptr<T> {
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

        impl<T: Typed> Typed for $ptr<T> {
            #[inline]
            fn type_info() -> &'static TypeInfo {
                T::type_info()
            }
        }
    };
}

impl_transparent_type!(Box);
impl_transparent_type!(Arc);

impl<T: DataContract> DataContract for Box<T> {
    #[inline]
    fn to_value(&self, cx: &mut ValueContext) -> Value {
        T::to_value(self, cx)
    }

    #[inline]
    fn from_value(value: &Value, cx: &mut ValueContext) -> Result<Self, FromValueError> {
        T::from_value(value, cx).map(Box::new)
    }
}

/// Allocations shared by several `Arc`s become one [`Value::Shared`] node.
impl<T: DataContract> DataContract for Arc<T> {
    #[inline]
    fn to_value(&self, cx: &mut ValueContext) -> Value {
        cx.share(self)
    }

    #[inline]
    fn from_value(value: &Value, cx: &mut ValueContext) -> Result<Self, FromValueError> {
        cx.unshare(value)
    }
}
