use crate::error::FromValueError;
use crate::info::{ObjectInfo, TypeInfo, TypeInfoCell, TypePath, Typed};
use crate::value::{DataContract, Value, ValueContext};

// A `Value` field is an `anyType` slot: it holds whatever was written or read.

impl TypePath for Value {
    fn type_path() -> &'static str {
        "dc_contract::value::Value"
    }

    fn type_name() -> &'static str {
        "Value"
    }

    fn module_path() -> Option<&'static str> {
        Some("dc_contract::value")
    }
}

impl Typed for Value {
    fn type_info() -> &'static TypeInfo {
        static CELL: TypeInfoCell = TypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::Object(ObjectInfo::new::<Self>()))
    }
}

impl DataContract for Value {
    #[inline]
    fn to_value(&self, _cx: &mut ValueContext) -> Value {
        self.clone()
    }

    #[inline]
    fn from_value(value: &Value, _cx: &mut ValueContext) -> Result<Self, FromValueError> {
        Ok(value.clone())
    }
}
