use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::error::ValueKind;
use crate::error::FromValueError;
use crate::info::{TypeInfo, TypeKind};
use crate::value::{ExtensionDataObject, Primitive, SerializationInfo};

// -----------------------------------------------------------------------------
// Value

/// A node of the dynamic object graph the engines walk.
///
/// Every non-primitive variant carries the info of its runtime type, which
/// is how a slot declared as one type carries an instance of another.
/// [`Shared`](Value::Shared) marks a value reachable through several `Arc`s.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Primitive(Primitive),
    Enum(EnumValue),
    Class(ClassValue),
    Collection(CollectionValue),
    Dictionary(DictionaryValue),
    Custom(CustomValue),
    Shared(Arc<Value>),
}

/// An enum value as its integer bits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnumValue {
    pub ty: &'static TypeInfo,
    pub bits: i64,
}

/// A class instance.
///
/// `members` is indexed like the fields of the class info, `None` marks a
/// member absent from the input.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassValue {
    pub ty: &'static TypeInfo,
    pub base: Option<Box<Value>>,
    pub members: Vec<Option<Value>>,
    pub extension_data: Option<ExtensionDataObject>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionValue {
    pub ty: &'static TypeInfo,
    pub items: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryValue {
    pub ty: &'static TypeInfo,
    pub entries: Vec<(Value, Value)>,
}

/// A value of a type with hand-written serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomValue {
    pub ty: &'static TypeInfo,
    pub info: SerializationInfo,
}

impl ClassValue {
    #[inline]
    pub fn new(ty: &'static TypeInfo, members: Vec<Option<Value>>) -> Self {
        Self {
            ty,
            base: None,
            members,
            extension_data: None,
        }
    }

    /// Member at `index`, `None` when absent.
    #[inline]
    pub fn member(&self, index: usize) -> Option<&Value> {
        self.members.get(index).and_then(Option::as_ref)
    }
}

impl Value {
    /// Follows [`Shared`](Value::Shared) indirections.
    pub fn resolve(&self) -> &Value {
        let mut value = self;
        while let Value::Shared(inner) = value {
            value = inner;
        }
        value
    }

    /// Info of the runtime type, `None` for null.
    ///
    /// ```
    /// use dc_contract::value::{Primitive, Value};
    /// use dc_contract::info::Typed;
    ///
    /// let value = Value::Primitive(Primitive::Int(3));
    /// assert_eq!(value.runtime_type(), Some(i32::type_info()));
    /// assert_eq!(Value::Null.runtime_type(), None);
    /// ```
    pub fn runtime_type(&self) -> Option<&'static TypeInfo> {
        match self.resolve() {
            Value::Null => None,
            Value::Primitive(p) => Some(p.kind().type_info()),
            Value::Enum(v) => Some(v.ty),
            Value::Class(v) => Some(v.ty),
            Value::Collection(v) => Some(v.ty),
            Value::Dictionary(v) => Some(v.ty),
            Value::Custom(v) => Some(v.ty),
            Value::Shared(_) => None,
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self.resolve() {
            Value::Null | Value::Shared(_) => ValueKind::Null,
            Value::Primitive(_) => ValueKind::Primitive,
            Value::Enum(_) => ValueKind::Enum,
            Value::Class(_) => ValueKind::Class,
            Value::Collection(_) => ValueKind::Collection,
            Value::Dictionary(_) => ValueKind::Dictionary,
            Value::Custom(_) => ValueKind::Custom,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self.resolve(), Value::Null)
    }

    /// Whether the value equals the default of its contract, see
    /// [`Primitive::is_default`]. Null and zero enums are default.
    pub fn is_default(&self) -> bool {
        match self.resolve() {
            Value::Null => true,
            Value::Primitive(p) => p.is_default(),
            Value::Enum(v) => v.bits == 0,
            _ => false,
        }
    }

    /// Replaces the runtime type of a collection or dictionary value.
    ///
    /// Used by collection-contract wrappers, which serialize the collection
    /// they hold under their own contract.
    pub fn retag(self, ty: &'static TypeInfo) -> Value {
        match self {
            Value::Collection(mut v) => {
                v.ty = ty;
                Value::Collection(v)
            }
            Value::Dictionary(mut v) => {
                v.ty = ty;
                Value::Dictionary(v)
            }
            other => other,
        }
    }

    // -------------------------------------------------------------------------
    // Conversion helpers

    fn mismatch(&self, type_path: &'static str, expected: ValueKind) -> FromValueError {
        match self.kind() {
            ValueKind::Null => FromValueError::UnexpectedNull { type_path },
            found => FromValueError::MismatchedKind {
                type_path,
                expected,
                found,
            },
        }
    }

    pub fn expect_primitive(&self, type_path: &'static str) -> Result<&Primitive, FromValueError> {
        match self.resolve() {
            Value::Primitive(v) => Ok(v),
            other => Err(other.mismatch(type_path, ValueKind::Primitive)),
        }
    }

    pub fn expect_enum(&self, type_path: &'static str) -> Result<&EnumValue, FromValueError> {
        match self.resolve() {
            Value::Enum(v) => Ok(v),
            other => Err(other.mismatch(type_path, ValueKind::Enum)),
        }
    }

    pub fn expect_class(&self, type_path: &'static str) -> Result<&ClassValue, FromValueError> {
        match self.resolve() {
            Value::Class(v) => Ok(v),
            other => Err(other.mismatch(type_path, ValueKind::Class)),
        }
    }

    /// Reads a class value at the level of `ty`.
    ///
    /// A value of a derived class holds its base part in
    /// [`ClassValue::base`], which is followed until the level is found.
    pub fn expect_class_level(&self, ty: &'static TypeInfo) -> Result<&ClassValue, FromValueError> {
        let mut class = self.expect_class(ty.type_path())?;
        while class.ty != ty {
            class = match class.base.as_deref() {
                Some(base) => base.expect_class(ty.type_path())?,
                None => {
                    return Err(FromValueError::Custom(alloc::format!(
                        "`{}` does not derive from `{}`",
                        class.ty.type_path(),
                        ty.type_path()
                    )));
                }
            };
        }
        Ok(class)
    }

    pub fn expect_collection(
        &self,
        type_path: &'static str,
    ) -> Result<&CollectionValue, FromValueError> {
        match self.resolve() {
            Value::Collection(v) => Ok(v),
            other => Err(other.mismatch(type_path, ValueKind::Collection)),
        }
    }

    pub fn expect_dictionary(
        &self,
        type_path: &'static str,
    ) -> Result<&DictionaryValue, FromValueError> {
        match self.resolve() {
            Value::Dictionary(v) => Ok(v),
            other => Err(other.mismatch(type_path, ValueKind::Dictionary)),
        }
    }

    pub fn expect_custom(&self, type_path: &'static str) -> Result<&CustomValue, FromValueError> {
        match self.resolve() {
            Value::Custom(v) => Ok(v),
            other => Err(other.mismatch(type_path, ValueKind::Custom)),
        }
    }

    /// Checks that the runtime type of the value is `expected`.
    pub fn check_type(
        &self,
        expected: &'static TypeInfo,
    ) -> Result<(), FromValueError> {
        match self.runtime_type() {
            Some(info) if info == expected => Ok(()),
            Some(info) => Err(FromValueError::Custom(alloc::format!(
                "`{}` is not an instance of `{}`",
                info.type_path(),
                expected.type_path()
            ))),
            None => Err(FromValueError::UnexpectedNull {
                type_path: expected.type_path(),
            }),
        }
    }

    /// Kind of the contract behind the runtime type.
    pub fn type_kind(&self) -> Option<TypeKind> {
        self.runtime_type().map(TypeInfo::kind)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;

    use super::{CollectionValue, Value};
    use crate::info::Typed;
    use crate::value::{Primitive, ValueContext};
    use crate::{DataContract, FromValueError};

    #[test]
    fn shared_resolves_through() {
        let inner = Value::Primitive(Primitive::Int(0));
        let shared = Value::Shared(Arc::new(Value::Shared(Arc::new(inner.clone()))));
        assert_eq!(shared.resolve(), &inner);
        assert!(shared.is_default());
        assert_eq!(shared.runtime_type(), Some(i32::type_info()));
    }

    #[test]
    fn retag_only_touches_collections() {
        let list = Value::Collection(CollectionValue {
            ty: <alloc::vec::Vec<i32> as Typed>::type_info(),
            items: vec![],
        });
        let object = <Value as Typed>::type_info();
        let tagged = list.retag(object);
        assert_eq!(tagged.runtime_type(), Some(object));

        let number = Value::Primitive(Primitive::Int(1)).retag(object);
        assert_eq!(number.runtime_type(), Some(i32::type_info()));
    }

    #[test]
    fn expect_reports_null() {
        let err = Value::Null.expect_class("demo::A").unwrap_err();
        assert_eq!(err, crate::FromValueError::UnexpectedNull { type_path: "demo::A" });
    }

    #[derive(DataContract, Default, Debug, PartialEq)]
    struct Base {
        id: i32,
    }

    #[derive(DataContract, Default, Debug, PartialEq)]
    struct Derived {
        #[data_member(base)]
        base: Base,
        name: String,
    }

    #[test]
    fn derived_values_read_at_base_level() {
        let derived = Derived {
            base: Base { id: 4 },
            name: String::from("x"),
        };
        let value = derived.to_value(&mut ValueContext::new());
        let base = Base::from_value(&value, &mut ValueContext::new());
        assert_eq!(base, Ok(Base { id: 4 }));

        let value = Base { id: 1 }.to_value(&mut ValueContext::new());
        let err = Derived::from_value(&value, &mut ValueContext::new());
        assert!(matches!(err, Err(FromValueError::Custom(_))), "{err:?}");
    }
}
