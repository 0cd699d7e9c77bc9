//! Declarative contract metadata.
//!
//! These are the values of the `#[data_contract(..)]` and `#[data_member(..)]`
//! attributes, reified once per type and consumed by the contract builder.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// ContractAttributes

/// Type-level contract metadata: explicit name, namespace and reference
/// semantics.
///
/// ```
/// use dc_contract::info::ContractAttributes;
///
/// let attrs = ContractAttributes::new().with_name("Customer").with_is_reference(true);
/// assert_eq!(attrs.name, Some("Customer"));
/// assert_eq!(attrs.namespace, None);
/// assert!(attrs.is_reference);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContractAttributes {
    pub name: Option<&'static str>,
    pub namespace: Option<&'static str>,
    pub is_reference: bool,
}

impl ContractAttributes {
    #[inline]
    pub const fn new() -> Self {
        Self {
            name: None,
            namespace: None,
            is_reference: false,
        }
    }

    #[inline]
    pub const fn with_name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    #[inline]
    pub const fn with_namespace(mut self, namespace: &'static str) -> Self {
        self.namespace = Some(namespace);
        self
    }

    #[inline]
    pub const fn with_is_reference(mut self, is_reference: bool) -> Self {
        self.is_reference = is_reference;
        self
    }
}

// -----------------------------------------------------------------------------
// DataMemberAttributes

/// Member-level metadata.
///
/// `order` is `-1` (unordered) unless set, `emit_default_value` is `true`
/// and `is_required` is `false`.
///
/// ```
/// use dc_contract::info::DataMemberAttributes;
///
/// let attrs = DataMemberAttributes::default();
/// assert_eq!(attrs.order, -1);
/// assert!(attrs.emit_default_value);
/// assert!(!attrs.is_required);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataMemberAttributes {
    pub name: Option<&'static str>,
    pub order: i32,
    pub emit_default_value: bool,
    pub is_required: bool,
}

impl DataMemberAttributes {
    pub const UNORDERED: i32 = -1;

    #[inline]
    pub const fn new() -> Self {
        Self {
            name: None,
            order: Self::UNORDERED,
            emit_default_value: true,
            is_required: false,
        }
    }

    #[inline]
    pub const fn with_name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    #[inline]
    pub const fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    #[inline]
    pub const fn with_emit_default_value(mut self, emit: bool) -> Self {
        self.emit_default_value = emit;
        self
    }

    #[inline]
    pub const fn with_is_required(mut self, required: bool) -> Self {
        self.is_required = required;
        self
    }
}

impl Default for DataMemberAttributes {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// CollectionContractAttributes

/// Metadata of a type marked as a collection contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionContractAttributes {
    pub name: Option<&'static str>,
    pub namespace: Option<&'static str>,
    pub item_name: Option<&'static str>,
    pub key_name: Option<&'static str>,
    pub value_name: Option<&'static str>,
    pub is_reference: bool,
}

impl CollectionContractAttributes {
    #[inline]
    pub const fn new() -> Self {
        Self {
            name: None,
            namespace: None,
            item_name: None,
            key_name: None,
            value_name: None,
            is_reference: false,
        }
    }

    #[inline]
    pub const fn with_name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    #[inline]
    pub const fn with_namespace(mut self, namespace: &'static str) -> Self {
        self.namespace = Some(namespace);
        self
    }

    #[inline]
    pub const fn with_item_name(mut self, item_name: &'static str) -> Self {
        self.item_name = Some(item_name);
        self
    }

    #[inline]
    pub const fn with_key_name(mut self, key_name: &'static str) -> Self {
        self.key_name = Some(key_name);
        self
    }

    #[inline]
    pub const fn with_value_name(mut self, value_name: &'static str) -> Self {
        self.value_name = Some(value_name);
        self
    }

    #[inline]
    pub const fn with_is_reference(mut self, is_reference: bool) -> Self {
        self.is_reference = is_reference;
        self
    }
}

// -----------------------------------------------------------------------------
// KnownTypeAttributes

/// Known-type declarations of a type.
///
/// Either a list of explicit types, or the name of a provider method looked
/// up in the type's [`MethodInfo`](crate::info::MethodInfo) table. Declaring
/// both is rejected when the contract is built.
#[derive(Debug, Clone, Default)]
pub struct KnownTypeAttributes {
    types: Box<[fn() -> &'static TypeInfo]>,
    method: Option<&'static str>,
}

impl KnownTypeAttributes {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(self, ty: fn() -> &'static TypeInfo) -> Self {
        let mut types = Vec::from(self.types);
        types.push(ty);
        Self {
            types: types.into_boxed_slice(),
            method: self.method,
        }
    }

    #[inline]
    pub fn with_method(mut self, method: &'static str) -> Self {
        self.method = Some(method);
        self
    }

    #[inline]
    pub fn types(&self) -> impl ExactSizeIterator<Item = &'static TypeInfo> + '_ {
        self.types.iter().map(|ty| ty())
    }

    #[inline]
    pub fn method(&self) -> Option<&'static str> {
        self.method
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.method.is_none()
    }
}
