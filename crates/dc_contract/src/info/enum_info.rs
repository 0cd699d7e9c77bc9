use alloc::boxed::Box;

use crate::info::{ContractAttributes, Type, TypePath, impl_type_fn};

/// A single enum member.
///
/// `value` is the integer the variant converts to. The contract name is the
/// explicit member name if one was declared, the identifier otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumVariantInfo {
    ident: &'static str,
    value: i64,
    member_name: Option<&'static str>,
}

impl EnumVariantInfo {
    #[inline]
    pub const fn new(ident: &'static str, value: i64) -> Self {
        Self {
            ident,
            value,
            member_name: None,
        }
    }

    #[inline]
    pub const fn with_member_name(mut self, name: &'static str) -> Self {
        self.member_name = Some(name);
        self
    }

    #[inline]
    pub const fn ident(&self) -> &'static str {
        self.ident
    }

    #[inline]
    pub const fn value(&self) -> i64 {
        self.value
    }

    #[inline]
    pub const fn member_name(&self) -> Option<&'static str> {
        self.member_name
    }

    /// The name written to XML.
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self.member_name {
            Some(name) => name,
            None => self.ident,
        }
    }
}

/// Info of a C-like enum.
///
/// # Examples
///
/// ```
/// use dc_contract::DataContract;
/// use dc_contract::info::Typed;
///
/// #[derive(DataContract, Clone, Copy, PartialEq, Debug)]
/// enum Color {
///     Red = 1,
///     #[enum_member(value = "GREEN")]
///     Green = 2,
/// }
///
/// let info = Color::type_info().as_enum().unwrap();
/// assert!(!info.is_flags());
/// assert_eq!(info.variant_len(), 2);
/// assert_eq!(info.variant_at(1).unwrap().name(), "GREEN");
/// assert_eq!(info.variant_at(1).unwrap().value(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct EnumInfo {
    ty: Type,
    attributes: ContractAttributes,
    flags: bool,
    variants: Box<[EnumVariantInfo]>,
}

impl EnumInfo {
    impl_type_fn!(ty);

    /// Creates an info, variants are kept in declaration order.
    pub fn new<T: TypePath>(variants: &[EnumVariantInfo]) -> Self {
        Self {
            ty: Type::of::<T>(),
            attributes: ContractAttributes::new(),
            flags: false,
            variants: variants.into(),
        }
    }

    #[inline]
    pub fn with_attributes(mut self, attributes: ContractAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    #[inline]
    pub fn with_flags(mut self, flags: bool) -> Self {
        self.flags = flags;
        self
    }

    #[inline]
    pub fn attributes(&self) -> &ContractAttributes {
        &self.attributes
    }

    #[inline]
    pub fn is_flags(&self) -> bool {
        self.flags
    }

    #[inline]
    pub fn variants(&self) -> &[EnumVariantInfo] {
        &self.variants
    }

    #[inline]
    pub fn variant_len(&self) -> usize {
        self.variants.len()
    }

    #[inline]
    pub fn variant_at(&self, index: usize) -> Option<&EnumVariantInfo> {
        self.variants.get(index)
    }
}
