use alloc::string::String;
use alloc::vec::Vec;

use crate::error::FromValueError;
use crate::impls::convert_primitive;
use crate::info::{PrimitiveInfo, PrimitiveKind, TypeInfo, TypeInfoCell, TypePath, Typed};
use crate::value::{DataContract, Primitive, Value, ValueContext};

/// Binary content written as `base64Binary`.
///
/// `Vec<u8>` serializes as an array of `unsignedByte` items, wrap it in
/// `Bytes` to get the compact base64 text form.
///
/// ```
/// use dc_contract::DataContract;
/// use dc_contract::impls::Bytes;
/// use dc_contract::value::{Primitive, Value, ValueContext};
///
/// let value = Bytes(vec![0xff, 0x00]).to_value(&mut ValueContext::new());
/// assert_eq!(value, Value::Primitive(Primitive::Base64Binary(vec![0xff, 0x00])));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Bytes(pub Vec<u8>);

/// A URI written as `anyURI`. The text is not validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Uri(pub String);

macro_rules! impl_wrapped_primitive {
    ($ty:ident, $kind:ident, $name:literal) => {
        impl TypePath for $ty {
            fn type_path() -> &'static str {
                concat!("dc_contract::impls::", $name)
            }

            fn type_name() -> &'static str {
                $name
            }

            fn module_path() -> Option<&'static str> {
                Some("dc_contract::impls")
            }
        }

        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: TypeInfoCell = TypeInfoCell::new();
                CELL.get_or_init(|| {
                    TypeInfo::Primitive(PrimitiveInfo::new::<Self>(PrimitiveKind::$kind))
                })
            }
        }

        impl DataContract for $ty {
            fn to_value(&self, _cx: &mut ValueContext) -> Value {
                Value::Primitive(Primitive::$kind(self.0.clone()))
            }

            fn from_value(value: &Value, _cx: &mut ValueContext) -> Result<Self, FromValueError> {
                match convert_primitive(value, PrimitiveKind::$kind, Self::type_path())? {
                    Primitive::$kind(v) => Ok(Self(v)),
                    other => Err(FromValueError::Custom(alloc::format!(
                        "{}: expected {}, found {}",
                        Self::type_path(),
                        PrimitiveKind::$kind,
                        other.kind()
                    ))),
                }
            }
        }
    };
}

impl_wrapped_primitive!(Bytes, Base64Binary, "Bytes");
impl_wrapped_primitive!(Uri, AnyUri, "Uri");

impl From<Vec<u8>> for Bytes {
    #[inline]
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl From<&str> for Uri {
    #[inline]
    fn from(value: &str) -> Self {
        Self(String::from(value))
    }
}
