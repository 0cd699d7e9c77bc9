use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::parse::Parse;
use syn::{Attribute, LitBool, LitInt, LitStr, Token, Type, parenthesized};

use crate::{CONTRACT_ATTRIBUTE_NAME, ENUM_MEMBER_ATTRIBUTE_NAME, MEMBER_ATTRIBUTE_NAME};

/// `flag` or `flag = true|false`.
fn parse_flag(meta: &ParseNestedMeta) -> syn::Result<bool> {
    if meta.input.peek(Token![=]) {
        Ok(meta.value()?.parse::<LitBool>()?.value)
    } else {
        Ok(true)
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, meta: &ParseNestedMeta) -> syn::Result<()> {
    if slot.is_some() {
        return Err(meta.error("duplicate attribute"));
    }
    *slot = Some(value);
    Ok(())
}

// -----------------------------------------------------------------------------
// TypeAttributes

/// Content of `#[data_contract(...)]`.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    pub name: Option<LitStr>,
    pub namespace: Option<LitStr>,
    pub is_reference: bool,
    pub flags: Option<Span>,
    pub custom: Option<Span>,
    pub collection: Option<Span>,
    pub known_types: Vec<Type>,
    pub known_type_method: Option<LitStr>,
    pub item_name: Option<LitStr>,
    pub key_name: Option<LitStr>,
    pub value_name: Option<LitStr>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if attr.path().is_ident(CONTRACT_ATTRIBUTE_NAME) {
                attr.parse_nested_meta(|meta| this.parse_meta(meta))?;
            }
        }
        Ok(this)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        let span = meta.path.get_ident().map(|ident| ident.span());
        if meta.path.is_ident("name") {
            set_once(&mut self.name, meta.value()?.parse()?, &meta)
        } else if meta.path.is_ident("namespace") {
            set_once(&mut self.namespace, meta.value()?.parse()?, &meta)
        } else if meta.path.is_ident("is_reference") {
            self.is_reference = parse_flag(&meta)?;
            Ok(())
        } else if meta.path.is_ident("flags") {
            self.flags = parse_flag(&meta)?.then_some(span).flatten();
            Ok(())
        } else if meta.path.is_ident("custom") {
            self.custom = parse_flag(&meta)?.then_some(span).flatten();
            Ok(())
        } else if meta.path.is_ident("collection") {
            self.collection = parse_flag(&meta)?.then_some(span).flatten();
            Ok(())
        } else if meta.path.is_ident("known_type") {
            let content;
            parenthesized!(content in meta.input);
            let types = content.parse_terminated(Type::parse, Token![,])?;
            self.known_types.extend(types);
            Ok(())
        } else if meta.path.is_ident("known_type_method") {
            let method: LitStr = meta.value()?.parse()?;
            if syn::parse_str::<syn::Ident>(&method.value()).is_err() {
                return Err(syn::Error::new(method.span(), "expected a method name"));
            }
            set_once(&mut self.known_type_method, method, &meta)
        } else if meta.path.is_ident("item_name") {
            set_once(&mut self.item_name, meta.value()?.parse()?, &meta)
        } else if meta.path.is_ident("key_name") {
            set_once(&mut self.key_name, meta.value()?.parse()?, &meta)
        } else if meta.path.is_ident("value_name") {
            set_once(&mut self.value_name, meta.value()?.parse()?, &meta)
        } else {
            Err(meta.error(format!(
                "unknown `{CONTRACT_ATTRIBUTE_NAME}` attribute, expected one of: name, namespace, \
                 is_reference, flags, custom, collection, known_type, known_type_method, \
                 item_name, key_name, value_name"
            )))
        }
    }

    /// The first collection-only attribute, if any.
    pub fn collection_names(&self) -> Option<&LitStr> {
        self.item_name
            .as_ref()
            .or(self.key_name.as_ref())
            .or(self.value_name.as_ref())
    }
}

// -----------------------------------------------------------------------------
// FieldAttributes

/// How a field takes part in its class contract.
#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldRole {
    #[default]
    Member,
    Base,
    ExtensionData,
    Ignored,
}

/// Content of `#[data_member(...)]`.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub role: FieldRole,
    pub name: Option<LitStr>,
    pub order: Option<i32>,
    pub emit_default_value: Option<bool>,
    pub is_required: Option<bool>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        let mut span = None;
        for attr in attrs {
            if attr.path().is_ident(MEMBER_ATTRIBUTE_NAME) {
                span = Some(attr.path().get_ident().map_or_else(Span::call_site, |i| i.span()));
                attr.parse_nested_meta(|meta| this.parse_meta(meta))?;
            }
        }

        let has_member_settings = this.name.is_some()
            || this.order.is_some()
            || this.emit_default_value.is_some()
            || this.is_required.is_some();
        if this.role != FieldRole::Member && has_member_settings {
            return Err(syn::Error::new(
                span.unwrap_or_else(Span::call_site),
                "`base`, `extension_data` and `ignore` fields are not data members",
            ));
        }
        Ok(this)
    }

    fn set_role(&mut self, role: FieldRole, meta: &ParseNestedMeta) -> syn::Result<()> {
        if self.role != FieldRole::Member {
            return Err(meta.error("a field takes at most one of `base`, `extension_data` and `ignore`"));
        }
        self.role = role;
        Ok(())
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("name") {
            set_once(&mut self.name, meta.value()?.parse()?, &meta)
        } else if meta.path.is_ident("order") {
            let order = meta.value()?.parse::<LitInt>()?.base10_parse::<i32>()?;
            set_once(&mut self.order, order, &meta)
        } else if meta.path.is_ident("emit_default_value") {
            let emit = parse_flag(&meta)?;
            set_once(&mut self.emit_default_value, emit, &meta)
        } else if meta.path.is_ident("is_required") {
            let required = parse_flag(&meta)?;
            set_once(&mut self.is_required, required, &meta)
        } else if meta.path.is_ident("base") {
            self.set_role(FieldRole::Base, &meta)
        } else if meta.path.is_ident("extension_data") {
            self.set_role(FieldRole::ExtensionData, &meta)
        } else if meta.path.is_ident("ignore") {
            self.set_role(FieldRole::Ignored, &meta)
        } else {
            Err(meta.error(format!(
                "unknown `{MEMBER_ATTRIBUTE_NAME}` attribute, expected one of: name, order, \
                 emit_default_value, is_required, base, extension_data, ignore"
            )))
        }
    }
}

// -----------------------------------------------------------------------------
// VariantAttributes

/// Content of `#[enum_member(...)]`.
#[derive(Default)]
pub(crate) struct VariantAttributes {
    pub value: Option<LitStr>,
}

impl VariantAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if attr.path().is_ident(ENUM_MEMBER_ATTRIBUTE_NAME) {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("value") {
                        set_once(&mut this.value, meta.value()?.parse()?, &meta)
                    } else {
                        Err(meta.error(format!(
                            "unknown `{ENUM_MEMBER_ATTRIBUTE_NAME}` attribute, expected `value`"
                        )))
                    }
                })?;
            }
        }
        Ok(this)
    }
}
