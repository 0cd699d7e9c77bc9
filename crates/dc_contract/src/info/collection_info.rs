use crate::info::{CollectionContractAttributes, KnownTypeAttributes, MethodInfo};
use crate::info::{Type, TypeInfo, TypePath, impl_type_fn};

use alloc::boxed::Box;

// -----------------------------------------------------------------------------
// ArrayInfo

/// Info of a sequence, `Vec<T>`.
#[derive(Debug, Clone)]
pub struct ArrayInfo {
    ty: Type,
    item: fn() -> &'static TypeInfo,
}

impl ArrayInfo {
    impl_type_fn!(ty);

    #[inline]
    pub fn new<T: TypePath>(item: fn() -> &'static TypeInfo) -> Self {
        Self {
            ty: Type::of::<T>(),
            item,
        }
    }

    #[inline]
    pub fn item(&self) -> &'static TypeInfo {
        (self.item)()
    }
}

// -----------------------------------------------------------------------------
// DictionaryInfo

/// Info of a map, `BTreeMap<K, V>`.
#[derive(Debug, Clone)]
pub struct DictionaryInfo {
    ty: Type,
    key: fn() -> &'static TypeInfo,
    value: fn() -> &'static TypeInfo,
}

impl DictionaryInfo {
    impl_type_fn!(ty);

    #[inline]
    pub fn new<T: TypePath>(
        key: fn() -> &'static TypeInfo,
        value: fn() -> &'static TypeInfo,
    ) -> Self {
        Self {
            ty: Type::of::<T>(),
            key,
            value,
        }
    }

    #[inline]
    pub fn key(&self) -> &'static TypeInfo {
        (self.key)()
    }

    #[inline]
    pub fn value(&self) -> &'static TypeInfo {
        (self.value)()
    }
}

// -----------------------------------------------------------------------------
// CollectionInfo

/// Info of a type marked `#[data_contract(collection)]`.
///
/// The type wraps a single [`ArrayInfo`] or [`DictionaryInfo`] shaped field
/// whose items it serializes under its own names.
#[derive(Debug, Clone)]
pub struct CollectionInfo {
    ty: Type,
    attributes: CollectionContractAttributes,
    inner: fn() -> &'static TypeInfo,
}

impl CollectionInfo {
    impl_type_fn!(ty);

    #[inline]
    pub fn new<T: TypePath>(inner: fn() -> &'static TypeInfo) -> Self {
        Self {
            ty: Type::of::<T>(),
            attributes: CollectionContractAttributes::new(),
            inner,
        }
    }

    #[inline]
    pub fn with_attributes(mut self, attributes: CollectionContractAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    #[inline]
    pub fn attributes(&self) -> &CollectionContractAttributes {
        &self.attributes
    }

    /// Info of the wrapped collection.
    #[inline]
    pub fn inner(&self) -> &'static TypeInfo {
        (self.inner)()
    }
}

// -----------------------------------------------------------------------------
// NullableInfo

/// Info of an optional value, `Option<T>`.
///
/// Shares the contract names of `T`, absent values are written as nil.
#[derive(Debug, Clone)]
pub struct NullableInfo {
    ty: Type,
    inner: fn() -> &'static TypeInfo,
}

impl NullableInfo {
    impl_type_fn!(ty);

    #[inline]
    pub fn new<T: TypePath>(inner: fn() -> &'static TypeInfo) -> Self {
        Self {
            ty: Type::of::<T>(),
            inner,
        }
    }

    #[inline]
    pub fn inner(&self) -> &'static TypeInfo {
        (self.inner)()
    }
}

// -----------------------------------------------------------------------------
// CustomInfo

/// Info of a type implementing [`SerializableData`](crate::SerializableData).
#[derive(Debug, Clone)]
pub struct CustomInfo {
    ty: Type,
    attributes: crate::info::ContractAttributes,
    known_types: KnownTypeAttributes,
    methods: Box<[MethodInfo]>,
}

impl CustomInfo {
    impl_type_fn!(ty);

    #[inline]
    pub fn new<T: TypePath>() -> Self {
        Self {
            ty: Type::of::<T>(),
            attributes: crate::info::ContractAttributes::new(),
            known_types: KnownTypeAttributes::new(),
            methods: Box::new([]),
        }
    }

    #[inline]
    pub fn with_attributes(mut self, attributes: crate::info::ContractAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    #[inline]
    pub fn with_known_types(mut self, known_types: KnownTypeAttributes) -> Self {
        self.known_types = known_types;
        self
    }

    #[inline]
    pub fn with_methods(mut self, methods: &[MethodInfo]) -> Self {
        self.methods = methods.into();
        self
    }

    #[inline]
    pub fn attributes(&self) -> &crate::info::ContractAttributes {
        &self.attributes
    }

    #[inline]
    pub fn known_types(&self) -> &KnownTypeAttributes {
        &self.known_types
    }

    #[inline]
    pub fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    pub fn method(&self, name: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|method| method.name() == name)
    }
}

// -----------------------------------------------------------------------------
// ObjectInfo

/// Info of a slot that accepts any value, `anyType`.
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    ty: Type,
}

impl ObjectInfo {
    impl_type_fn!(ty);

    #[inline]
    pub fn new<T: TypePath>() -> Self {
        Self { ty: Type::of::<T>() }
    }
}
