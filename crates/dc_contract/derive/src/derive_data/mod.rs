//! Parsing of the derive input into the shape the code generators need.

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod contract_class;
mod contract_enum;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use attributes::{FieldAttributes, FieldRole, TypeAttributes, VariantAttributes};
pub(crate) use contract_class::ContractClass;
pub(crate) use contract_enum::ContractEnum;

use syn::{Data, DeriveInput, Fields, Ident, Type};

/// Common data of every derived contract.
pub(crate) struct ContractMeta<'a> {
    pub attrs: TypeAttributes,
    pub ident: &'a Ident,
    dc_contract_path: syn::Path,
}

impl ContractMeta<'_> {
    #[inline]
    pub fn dc_contract_path(&self) -> &syn::Path {
        &self.dc_contract_path
    }
}

/// What the derive generates, decided from the input shape and attributes.
pub(crate) enum ContractDerive<'a> {
    Class(ContractClass<'a>),
    Enum(ContractEnum<'a>),
    /// `#[data_contract(custom)]`
    Custom(ContractMeta<'a>),
    /// `#[data_contract(collection)]`, holding the wrapped type.
    Collection(ContractMeta<'a>, &'a Type),
}

impl<'a> ContractDerive<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        if !input.generics.params.is_empty() || input.generics.where_clause.is_some() {
            return Err(syn::Error::new_spanned(
                &input.generics,
                "`DataContract` cannot be derived for generic types",
            ));
        }

        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;
        if let Some(method) = &attrs.known_type_method
            && !attrs.known_types.is_empty()
        {
            return Err(syn::Error::new(
                method.span(),
                "known types are declared both as a list and through a method",
            ));
        }
        if let (Some(custom), Some(_)) = (attrs.custom, attrs.collection) {
            return Err(syn::Error::new(custom, "`custom` and `collection` exclude each other"));
        }
        if attrs.collection.is_none()
            && let Some(name) = attrs.collection_names()
        {
            return Err(syn::Error::new(
                name.span(),
                "item, key and value names apply to `collection` contracts",
            ));
        }
        if let Some(flags) = attrs.flags
            && (attrs.custom.is_some() || !matches!(input.data, Data::Enum(_)))
        {
            return Err(syn::Error::new(flags, "`flags` applies to enum contracts"));
        }

        let meta = ContractMeta {
            attrs,
            ident: &input.ident,
            dc_contract_path: crate::path::dc_contract(),
        };

        if meta.attrs.custom.is_some() {
            if let Data::Union(_) = input.data {
                return Err(syn::Error::new_spanned(&input.ident, "unions are not supported"));
            }
            return Ok(Self::Custom(meta));
        }

        if let Some(collection) = meta.attrs.collection {
            if meta.attrs.known_type_method.is_some() || !meta.attrs.known_types.is_empty() {
                return Err(syn::Error::new(
                    collection,
                    "collection contracts do not declare known types",
                ));
            }
            return match &input.data {
                Data::Struct(data) => match &data.fields {
                    Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
                        Ok(Self::Collection(meta, &fields.unnamed[0].ty))
                    }
                    _ => Err(syn::Error::new(
                        collection,
                        "a collection contract wraps one value: `struct Name(Vec<T>);`",
                    )),
                },
                _ => Err(syn::Error::new(collection, "a collection contract must be a struct")),
            };
        }

        match &input.data {
            Data::Struct(data) => Ok(Self::Class(ContractClass::new(meta, &data.fields)?)),
            Data::Enum(data) => {
                if meta.attrs.is_reference {
                    return Err(syn::Error::new_spanned(
                        &input.ident,
                        "enum contracts cannot preserve references",
                    ));
                }
                Ok(Self::Enum(ContractEnum::new(meta, data)?))
            }
            Data::Union(_) => Err(syn::Error::new_spanned(&input.ident, "unions are not supported")),
        }
    }

    pub fn meta(&self) -> &ContractMeta<'a> {
        match self {
            Self::Class(class) => &class.meta,
            Self::Enum(e) => &e.meta,
            Self::Custom(meta) | Self::Collection(meta, _) => meta,
        }
    }
}
