use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::FromValueError;
use crate::value::{DataContract, Value, ValueContext};

/// Ordered name/value entries of a [`SerializableData`](crate::SerializableData)
/// value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SerializationInfo {
    entries: Vec<(String, Value)>,
}

impl SerializationInfo {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a raw entry. Names are not deduplicated.
    pub fn add(&mut self, name: impl Into<String>, value: Value) {
        self.entries.push((name.into(), value));
    }

    pub fn add_value<T: DataContract>(
        &mut self,
        name: impl Into<String>,
        value: &T,
        cx: &mut ValueContext,
    ) {
        let value = value.to_value(cx);
        self.add(name, value);
    }

    /// First entry with the given name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, value)| value)
    }

    /// Converts the entry `name`, failing if it is absent.
    pub fn get_value<T: DataContract>(
        &self,
        name: &str,
        cx: &mut ValueContext,
    ) -> Result<T, FromValueError> {
        match self.get(name) {
            Some(value) => T::from_value(value, cx),
            None => Err(FromValueError::Custom(format!(
                "serialization entry `{name}` is missing"
            ))),
        }
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::SerializationInfo;
    use crate::FromValueError;
    use crate::value::ValueContext;

    #[test]
    fn entries_keep_insertion_order() {
        let mut cx = ValueContext::new();
        let mut info = SerializationInfo::new();
        info.add_value("b", &2_i32, &mut cx);
        info.add_value("a", &1_i32, &mut cx);

        let names: alloc::vec::Vec<_> = info.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(info.get_value::<i32>("a", &mut cx), Ok(1));
        assert!(matches!(
            info.get_value::<i32>("c", &mut cx),
            Err(FromValueError::Custom(_))
        ));
    }
}
