use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::error::FromValueError;
use crate::info::{ArrayInfo, DictionaryInfo, GenericTypeInfoCell, GenericTypePathCell};
use crate::info::{TypeInfo, TypePath, Typed, concat};
use crate::value::{CollectionValue, DataContract, DictionaryValue, Value, ValueContext};

// -----------------------------------------------------------------------------
// Vec

impl<T: TypePath> TypePath for Vec<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["alloc::vec::Vec<", T::type_path(), ">"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["Vec<", T::type_name(), ">"]))
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("alloc::vec")
    }
}

impl<T: Typed> Typed for Vec<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Array(ArrayInfo::new::<Self>(T::type_info)))
    }
}

impl<T: DataContract> DataContract for Vec<T> {
    fn to_value(&self, cx: &mut ValueContext) -> Value {
        Value::Collection(CollectionValue {
            ty: Self::type_info(),
            items: self.iter().map(|item| item.to_value(cx)).collect(),
        })
    }

    fn from_value(value: &Value, cx: &mut ValueContext) -> Result<Self, FromValueError> {
        value
            .expect_collection(Self::type_path())?
            .items
            .iter()
            .map(|item| T::from_value(item, cx))
            .collect()
    }
}

// -----------------------------------------------------------------------------
// BTreeMap

impl<K: TypePath, V: TypePath> TypePath for BTreeMap<K, V> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| {
            concat(&[
                "alloc::collections::BTreeMap<",
                K::type_path(),
                ", ",
                V::type_path(),
                ">",
            ])
        })
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| {
            concat(&["BTreeMap<", K::type_name(), ", ", V::type_name(), ">"])
        })
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("alloc::collections")
    }
}

impl<K: Typed, V: Typed> Typed for BTreeMap<K, V> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Dictionary(DictionaryInfo::new::<Self>(K::type_info, V::type_info))
        })
    }
}

impl<K: DataContract + Ord, V: DataContract> DataContract for BTreeMap<K, V> {
    fn to_value(&self, cx: &mut ValueContext) -> Value {
        Value::Dictionary(DictionaryValue {
            ty: Self::type_info(),
            entries: self
                .iter()
                .map(|(key, value)| (key.to_value(cx), value.to_value(cx)))
                .collect(),
        })
    }

    fn from_value(value: &Value, cx: &mut ValueContext) -> Result<Self, FromValueError> {
        value
            .expect_dictionary(Self::type_path())?
            .entries
            .iter()
            .map(|(key, value)| -> Result<(K, V), FromValueError> {
                Ok((K::from_value(key, cx)?, V::from_value(value, cx)?))
            })
            .collect()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::info::{TypePath, Typed};
    use crate::value::{DataContract, ValueContext};

    #[test]
    fn generic_paths() {
        assert_eq!(<Vec<Vec<u8>>>::type_name(), "Vec<Vec<u8>>");
        assert_eq!(
            <BTreeMap<String, i32>>::type_path(),
            "alloc::collections::BTreeMap<alloc::string::String, i32>"
        );
        assert!(core::ptr::eq(
            <Vec<i32>>::type_info(),
            <Vec<i32>>::type_info()
        ));
        assert!(!core::ptr::eq(
            <Vec<i32>>::type_info(),
            <Vec<i64>>::type_info()
        ));
    }

    #[test]
    fn map_round_trip() {
        let mut map = BTreeMap::new();
        map.insert(String::from("a"), vec![1_i32, 2]);
        map.insert(String::from("b"), vec![]);

        let value = map.to_value(&mut ValueContext::new());
        let back = <BTreeMap<String, Vec<i32>>>::from_value(&value, &mut ValueContext::new());
        assert_eq!(back, Ok(map));
    }
}
