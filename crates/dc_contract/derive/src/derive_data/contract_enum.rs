use syn::{DataEnum, Fields, Ident};

use super::{ContractMeta, VariantAttributes};

pub(crate) struct EnumVariant<'a> {
    pub ident: &'a Ident,
    pub attrs: VariantAttributes,
}

/// A fieldless enum.
pub(crate) struct ContractEnum<'a> {
    pub meta: ContractMeta<'a>,
    pub variants: Vec<EnumVariant<'a>>,
}

impl<'a> ContractEnum<'a> {
    pub fn new(meta: ContractMeta<'a>, data: &'a DataEnum) -> syn::Result<Self> {
        if data.variants.is_empty() {
            return Err(syn::Error::new_spanned(
                meta.ident,
                "an enum contract needs at least one member",
            ));
        }

        let variants = data
            .variants
            .iter()
            .map(|variant| {
                if !matches!(variant.fields, Fields::Unit) {
                    return Err(syn::Error::new_spanned(
                        &variant.fields,
                        "enum contract members cannot carry data, \
                         use `#[data_contract(custom)]` instead",
                    ));
                }
                Ok(EnumVariant {
                    ident: &variant.ident,
                    attrs: VariantAttributes::parse_attrs(&variant.attrs)?,
                })
            })
            .collect::<syn::Result<Vec<_>>>()?;

        Ok(Self { meta, variants })
    }
}
