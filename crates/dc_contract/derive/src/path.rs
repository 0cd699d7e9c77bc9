//! Paths of the runtime items the generated code refers to.
//!
//! Kept in one place so that moving an item in `dc_contract` only touches
//! this module.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// The access path of the `dc_contract` crate.
///
/// Scans the manifest of the crate being built, so it is resolved once per
/// derive and passed around.
pub(crate) fn dc_contract() -> syn::Path {
    dc_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("dc_contract"))
}

// -----------------------------------------------------------------------------
// Internal API

macro_rules! define_paths {
    ($($fn_name:ident => $($segment:ident)::+;)*) => {
        $(
            #[inline(always)]
            pub(crate) fn $fn_name(dc_contract_path: &syn::Path) -> TokenStream {
                quote! { #dc_contract_path::$($segment)::+ }
            }
        )*
    };
}

define_paths! {
    type_path_ => info::TypePath;
    typed_ => info::Typed;
    type_info_ => info::TypeInfo;
    type_info_cell_ => info::TypeInfoCell;
    class_info_ => info::ClassInfo;
    field_info_ => info::FieldInfo;
    enum_info_ => info::EnumInfo;
    enum_variant_info_ => info::EnumVariantInfo;
    custom_info_ => info::CustomInfo;
    collection_info_ => info::CollectionInfo;
    method_info_ => info::MethodInfo;
    contract_attributes_ => info::ContractAttributes;
    data_member_attributes_ => info::DataMemberAttributes;
    collection_contract_attributes_ => info::CollectionContractAttributes;
    known_type_attributes_ => info::KnownTypeAttributes;
    data_contract_ => value::DataContract;
    enum_contract_ => value::EnumContract;
    serializable_data_ => value::SerializableData;
    serialization_info_ => value::SerializationInfo;
    value_ => value::Value;
    value_context_ => value::ValueContext;
    class_value_ => value::ClassValue;
    enum_value_ => value::EnumValue;
    custom_value_ => value::CustomValue;
    from_value_error_ => FromValueError;
    vec_ => __macro_exports::Vec;
    box_ => __macro_exports::Box;
}

/// Fully qualified paths of `core` items.
pub(crate) mod fp {
    use proc_macro2::TokenStream;
    use quote::quote;

    pub(crate) fn option_() -> TokenStream {
        quote! { ::core::option::Option }
    }

    pub(crate) fn result_() -> TokenStream {
        quote! { ::core::result::Result }
    }

    pub(crate) fn default_() -> TokenStream {
        quote! { ::core::default::Default }
    }

    pub(crate) fn clone_() -> TokenStream {
        quote! { ::core::clone::Clone }
    }

    pub(crate) fn into_() -> TokenStream {
        quote! { ::core::convert::Into }
    }
}
