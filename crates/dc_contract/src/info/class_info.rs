use alloc::boxed::Box;

use crate::info::{ContractAttributes, DataMemberAttributes, KnownTypeAttributes, MethodInfo};
use crate::info::{Type, TypeInfo, TypePath, Typed, impl_type_fn};

// -----------------------------------------------------------------------------
// FieldInfo

/// A data member of a class.
///
/// `name` is the Rust field name, the member name written to XML comes from
/// [`DataMemberAttributes::name`] if set.
#[derive(Debug, Clone, Copy)]
pub struct FieldInfo {
    name: &'static str,
    type_info: fn() -> &'static TypeInfo,
    attributes: DataMemberAttributes,
}

impl FieldInfo {
    #[inline]
    pub fn new<T: Typed>(name: &'static str) -> Self {
        Self {
            name,
            type_info: T::type_info,
            attributes: DataMemberAttributes::new(),
        }
    }

    #[inline]
    pub fn with_attributes(mut self, attributes: DataMemberAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The member name used in XML before encoding.
    #[inline]
    pub fn member_name(&self) -> &'static str {
        self.attributes.name.unwrap_or(self.name)
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline]
    pub fn attributes(&self) -> &DataMemberAttributes {
        &self.attributes
    }
}

// -----------------------------------------------------------------------------
// ClassInfo

/// Info of a struct marked as a data contract.
///
/// The fields are the data members in declaration order. A base contract is
/// modelled as a field of the struct that the derive marks with
/// `#[data_member(base)]`, its info is stored in [`base`](ClassInfo::base).
///
/// # Examples
///
/// ```
/// use dc_contract::DataContract;
/// use dc_contract::info::Typed;
///
/// #[derive(DataContract, Default)]
/// #[data_contract(name = "Person", namespace = "urn:people")]
/// struct Person {
///     #[data_member(order = 1)]
///     name: String,
///     age: u32,
/// }
///
/// let info = Person::type_info().as_class().unwrap();
/// assert_eq!(info.field_len(), 2);
/// assert_eq!(info.index_of("age"), Some(1));
/// assert_eq!(info.attributes().namespace, Some("urn:people"));
/// ```
#[derive(Debug, Clone)]
pub struct ClassInfo {
    ty: Type,
    attributes: ContractAttributes,
    base: Option<fn() -> &'static TypeInfo>,
    fields: Box<[FieldInfo]>,
    known_types: KnownTypeAttributes,
    methods: Box<[MethodInfo]>,
    extension_data: bool,
}

impl ClassInfo {
    impl_type_fn!(ty);

    pub fn new<T: TypePath>(fields: &[FieldInfo]) -> Self {
        Self {
            ty: Type::of::<T>(),
            attributes: ContractAttributes::new(),
            base: None,
            fields: fields.into(),
            known_types: KnownTypeAttributes::new(),
            methods: Box::new([]),
            extension_data: false,
        }
    }

    #[inline]
    pub fn with_attributes(mut self, attributes: ContractAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    #[inline]
    pub fn with_base(mut self, base: fn() -> &'static TypeInfo) -> Self {
        self.base = Some(base);
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

    /// Marks the class as carrying an extension data slot.
    #[inline]
    pub fn with_extension_data(mut self, extension_data: bool) -> Self {
        self.extension_data = extension_data;
        self
    }

    #[inline]
    pub fn attributes(&self) -> &ContractAttributes {
        &self.attributes
    }

    #[inline]
    pub fn base(&self) -> Option<&'static TypeInfo> {
        self.base.map(|base| base())
    }

    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&FieldInfo> {
        self.fields.get(index)
    }

    /// Index of the field with the given Rust name. O(N).
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name() == name)
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

    #[inline]
    pub fn has_extension_data(&self) -> bool {
        self.extension_data
    }
}
