use alloc::string::String;

use crate::error::FromValueError;
use crate::info::PrimitiveKind;
use crate::value::{Primitive, Value};

/// Extracts the payload of `kind` from a primitive value.
///
/// A primitive of another kind is re-parsed from its text, which is how
/// untyped `anyType` content (read as a string) converts to a typed slot.
pub(crate) fn convert_primitive(
    value: &Value,
    kind: PrimitiveKind,
    type_path: &'static str,
) -> Result<Primitive, FromValueError> {
    let primitive = value.expect_primitive(type_path)?;
    if primitive.kind() == kind {
        return Ok(primitive.clone());
    }
    Primitive::parse(kind, &primitive.to_text())
        .map_err(|err| FromValueError::Custom(alloc::format!("{type_path}: {err}")))
}

macro_rules! impl_primitive_contract {
    ($ty:ty, $kind:ident, $path:literal, $name:literal, $module:expr) => {
        impl $crate::info::TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                $path
            }

            #[inline]
            fn type_name() -> &'static str {
                $name
            }

            #[inline]
            fn module_path() -> Option<&'static str> {
                $module
            }
        }

        impl $crate::info::Typed for $ty {
            fn type_info() -> &'static $crate::info::TypeInfo {
                static CELL: $crate::info::TypeInfoCell = $crate::info::TypeInfoCell::new();
                CELL.get_or_init(|| {
                    $crate::info::TypeInfo::Primitive($crate::info::PrimitiveInfo::new::<Self>(
                        $crate::info::PrimitiveKind::$kind,
                    ))
                })
            }
        }

        impl $crate::value::DataContract for $ty {
            #[inline]
            fn to_value(&self, _cx: &mut $crate::value::ValueContext) -> $crate::value::Value {
                $crate::value::Value::Primitive($crate::value::Primitive::$kind(::core::clone::Clone::clone(
                    self,
                )))
            }

            fn from_value(
                value: &$crate::value::Value,
                _cx: &mut $crate::value::ValueContext,
            ) -> Result<Self, $crate::FromValueError> {
                match $crate::impls::convert_primitive(value, $crate::info::PrimitiveKind::$kind, $path)? {
                    $crate::value::Primitive::$kind(v) => Ok(v),
                    other => Err($crate::FromValueError::Custom(::alloc::format!(
                        "{}: expected {}, found {}",
                        $path,
                        $crate::info::PrimitiveKind::$kind,
                        other.kind()
                    ))),
                }
            }
        }
    };
}

pub(crate) use impl_primitive_contract;

impl_primitive_contract!(bool, Boolean, "bool", "bool", None);
impl_primitive_contract!(i8, Byte, "i8", "i8", None);
impl_primitive_contract!(u8, UnsignedByte, "u8", "u8", None);
impl_primitive_contract!(i16, Short, "i16", "i16", None);
impl_primitive_contract!(u16, UnsignedShort, "u16", "u16", None);
impl_primitive_contract!(i32, Int, "i32", "i32", None);
impl_primitive_contract!(u32, UnsignedInt, "u32", "u32", None);
impl_primitive_contract!(i64, Long, "i64", "i64", None);
impl_primitive_contract!(u64, UnsignedLong, "u64", "u64", None);
impl_primitive_contract!(f32, Float, "f32", "f32", None);
impl_primitive_contract!(f64, Double, "f64", "f64", None);
impl_primitive_contract!(char, Char, "char", "char", None);
impl_primitive_contract!(
    String,
    String,
    "alloc::string::String",
    "String",
    Some("alloc::string")
);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use crate::info::{TypeKind, TypePath, Typed};
    use crate::value::{DataContract, Primitive, Value, ValueContext};

    #[test]
    fn string_paths() {
        assert_eq!(String::type_path(), "alloc::string::String");
        assert_eq!(String::type_name(), "String");
        assert_eq!(String::type_info().kind(), TypeKind::Primitive);
    }

    #[test]
    fn untyped_text_converts() {
        let mut cx = ValueContext::new();
        let text = Value::Primitive(Primitive::String(String::from("17")));
        assert_eq!(i32::from_value(&text, &mut cx), Ok(17));
        assert!(u8::from_value(&Value::Primitive(Primitive::Int(300)), &mut cx).is_err());
    }

    #[test]
    fn null_is_rejected() {
        let err = bool::from_value(&Value::Null, &mut ValueContext::new()).unwrap_err();
        assert_eq!(err, crate::FromValueError::UnexpectedNull { type_path: "bool" });
    }
}
