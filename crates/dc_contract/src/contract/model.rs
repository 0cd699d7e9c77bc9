use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::info::{PrimitiveKind, TypeInfo, TypeKind};

// -----------------------------------------------------------------------------
// QualifiedName

/// A `(local name, namespace)` pair naming a contract or an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    pub name: String,
    pub namespace: String,
}

impl QualifiedName {
    #[inline]
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    #[inline]
    pub fn is(&self, name: &str, namespace: &str) -> bool {
        self.name == name && self.namespace == namespace
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

// -----------------------------------------------------------------------------
// Contract

/// Index of a contract in its [`ContractCache`](crate::contract::ContractCache).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContractId(pub(crate) u32);

impl ContractId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One serializable member of a class contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberContract {
    pub name: String,
    pub namespace: String,
    pub order: i32,
    pub emit_default_value: bool,
    pub is_required: bool,
    pub contract: ContractId,
    /// Index of the field in the class info and in
    /// [`ClassValue::members`](crate::value::ClassValue::members).
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumData {
    pub flags: bool,
    pub members: Vec<EnumMember>,
}

impl EnumData {
    pub fn name_of(&self, value: i64) -> Option<&str> {
        self.members
            .iter()
            .find(|m| m.value == value)
            .map(|m| m.name.as_str())
    }

    pub fn value_of(&self, name: &str) -> Option<i64> {
        self.members.iter().find(|m| m.name == name).map(|m| m.value)
    }

    /// Text of `bits`, `None` when the value has no representation.
    ///
    /// A value equal to a member is written as that member's name, even
    /// for flags. Other flag values are decomposed greedily from the last
    /// declared member and written in declaration order. Zero without a
    /// zero member is the empty string.
    pub fn format(&self, bits: i64) -> Option<String> {
        if let Some(name) = self.name_of(bits) {
            return Some(name.into());
        }
        if !self.flags {
            return None;
        }
        if bits == 0 {
            return Some(String::new());
        }

        let mut remaining = bits;
        let mut chosen = alloc::vec![false; self.members.len()];
        for (index, member) in self.members.iter().enumerate().rev() {
            if member.value != 0 && remaining & member.value == member.value {
                remaining &= !member.value;
                chosen[index] = true;
            }
        }
        if remaining != 0 {
            return None;
        }

        let names: Vec<&str> = self
            .members
            .iter()
            .zip(chosen)
            .filter_map(|(member, chosen)| chosen.then_some(member.name.as_str()))
            .collect();
        Some(names.join(" "))
    }

    /// Value of enum text, the inverse of [`format`](Self::format).
    ///
    /// Flags accept any whitespace-separated list of member names.
    pub fn parse(&self, text: &str) -> Option<i64> {
        if !self.flags {
            return self.value_of(text.trim());
        }
        text.split_whitespace()
            .try_fold(0, |bits, name| Some(bits | self.value_of(name)?))
    }
}

/// Members of a class in contract order, without those of its base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassData {
    pub base: Option<ContractId>,
    pub members: Vec<MemberContract>,
    pub extension_data: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionData {
    pub item: ContractId,
    pub item_name: String,
    /// Namespace of the item elements, the collection's own namespace.
    pub namespace: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryData {
    pub key: ContractId,
    pub value: ContractId,
    pub entry_name: String,
    pub key_name: String,
    pub value_name: String,
    pub namespace: String,
}

/// Kind-specific part of a [`Contract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractData {
    Primitive(PrimitiveKind),
    Enum(EnumData),
    Class(ClassData),
    Collection(CollectionData),
    Dictionary(DictionaryData),
    /// Contract of the wrapped type.
    Nullable(ContractId),
    Custom,
    Object,
}

/// The immutable description of how one type serializes.
///
/// Contracts live in the [`ContractCache`](crate::contract::ContractCache) of
/// one serializer and refer to each other by [`ContractId`], so cyclic type
/// graphs need no shared ownership.
#[derive(Debug, Clone)]
pub struct Contract {
    pub(crate) id: ContractId,
    pub(crate) info: &'static TypeInfo,
    pub(crate) name: QualifiedName,
    pub(crate) root_name: QualifiedName,
    pub(crate) is_reference: bool,
    pub(crate) known_types: Vec<ContractId>,
    pub(crate) data: ContractData,
}

impl Contract {
    #[inline]
    pub fn id(&self) -> ContractId {
        self.id
    }

    #[inline]
    pub fn info(&self) -> &'static TypeInfo {
        self.info
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.info.type_path()
    }

    #[inline]
    pub fn kind(&self) -> TypeKind {
        self.info.kind()
    }

    /// The type name, used in `i:type` and in schemas.
    #[inline]
    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    /// The element name of the type written as a document root.
    #[inline]
    pub fn root_name(&self) -> &QualifiedName {
        &self.root_name
    }

    #[inline]
    pub fn is_reference(&self) -> bool {
        self.is_reference
    }

    /// Known types declared by the type and its bases.
    #[inline]
    pub fn known_types(&self) -> &[ContractId] {
        &self.known_types
    }

    #[inline]
    pub fn data(&self) -> &ContractData {
        &self.data
    }

    /// Builtin primitives and `anyType`.
    pub fn is_builtin(&self) -> bool {
        matches!(self.data, ContractData::Primitive(_) | ContractData::Object)
    }

    /// Whether values of this contract can take part in object references.
    pub fn is_value_type(&self) -> bool {
        match &self.data {
            ContractData::Primitive(kind) => kind.is_value_type(),
            ContractData::Enum(_) => true,
            _ => false,
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::{EnumData, EnumMember};

    fn access(flags: bool) -> EnumData {
        let members = [("None", 0), ("Read", 1), ("Write", 2), ("All", 3), ("Exec", 4)]
            .into_iter()
            .map(|(name, value)| EnumMember {
                name: String::from(name),
                value,
            })
            .collect::<Vec<_>>();
        EnumData { flags, members }
    }

    #[test]
    fn named_values_win() {
        let data = access(true);
        assert_eq!(data.format(3).as_deref(), Some("All"));
        assert_eq!(data.format(0).as_deref(), Some("None"));
    }

    #[test]
    fn flags_decompose() {
        let data = access(true);
        assert_eq!(data.format(5).as_deref(), Some("Read Exec"));
        assert_eq!(data.format(7).as_deref(), Some("All Exec"));
        assert_eq!(data.format(8), None);
        assert_eq!(data.parse(" Read\tExec "), Some(5));
        assert_eq!(data.parse(""), Some(0));
        assert_eq!(data.parse("Read Bogus"), None);
    }

    #[test]
    fn plain_enums_need_exact_values() {
        let data = access(false);
        assert_eq!(data.format(5), None);
        assert_eq!(data.parse("Write"), Some(2));
        assert_eq!(data.parse("Read Write"), None);
    }
}
