use syn::{Fields, Ident, Type};

use super::{ContractMeta, FieldAttributes, FieldRole};

/// A field of a class contract.
pub(crate) struct ClassField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub attrs: FieldAttributes,
}

impl ClassField<'_> {
    /// Field name without the raw prefix.
    pub fn name(&self) -> String {
        let name = self.ident.to_string();
        name.strip_prefix("r#").map(str::to_owned).unwrap_or(name)
    }
}

/// A struct with named fields or a unit struct.
pub(crate) struct ContractClass<'a> {
    pub meta: ContractMeta<'a>,
    pub fields: Vec<ClassField<'a>>,
}

impl<'a> ContractClass<'a> {
    pub fn new(meta: ContractMeta<'a>, fields: &'a Fields) -> syn::Result<Self> {
        if let Fields::Unnamed(_) = fields {
            return Err(syn::Error::new_spanned(
                fields,
                "tuple structs need `#[data_contract(collection)]` or `#[data_contract(custom)]`",
            ));
        }

        let fields = fields
            .iter()
            .map(|field| {
                let ident = field
                    .ident
                    .as_ref()
                    .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
                Ok(ClassField {
                    ident,
                    ty: &field.ty,
                    attrs: FieldAttributes::parse_attrs(&field.attrs)?,
                })
            })
            .collect::<syn::Result<Vec<_>>>()?;

        for role in [FieldRole::Base, FieldRole::ExtensionData] {
            if let Some(second) = fields.iter().filter(|f| f.attrs.role == role).nth(1) {
                return Err(syn::Error::new_spanned(
                    second.ident,
                    match role {
                        FieldRole::Base => "a class has at most one `base` field",
                        _ => "a class has at most one `extension_data` field",
                    },
                ));
            }
        }

        Ok(Self { meta, fields })
    }

    /// Fields that are data members, in declaration order.
    pub fn members(&self) -> impl Iterator<Item = &ClassField<'a>> {
        self.fields.iter().filter(|f| f.attrs.role == FieldRole::Member)
    }

    pub fn field_of(&self, role: FieldRole) -> Option<&ClassField<'a>> {
        self.fields.iter().find(|f| f.attrs.role == role)
    }
}
