use crate::error::FromValueError;
use crate::info::{GenericTypeInfoCell, GenericTypePathCell, NullableInfo};
use crate::info::{TypeInfo, TypePath, Typed, concat};
use crate::value::{DataContract, Value, ValueContext};

impl<T: TypePath> TypePath for Option<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["core::option::Option<", T::type_path(), ">"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["Option<", T::type_name(), ">"]))
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("core::option")
    }
}

impl<T: Typed> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Nullable(NullableInfo::new::<Self>(T::type_info)))
    }
}

impl<T: DataContract> DataContract for Option<T> {
    fn to_value(&self, cx: &mut ValueContext) -> Value {
        match self {
            Some(value) => value.to_value(cx),
            None => Value::Null,
        }
    }

    fn from_value(value: &Value, cx: &mut ValueContext) -> Result<Self, FromValueError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(value, cx).map(Some)
        }
    }
}
