use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ContractMeta;
use crate::path::fp::option_;

/// Generate implementation codes for `TypePath`
pub(crate) fn impl_trait_type_path(meta: &ContractMeta) -> TokenStream {
    let trait_type_path_ = crate::path::type_path_(meta.dc_contract_path());
    let option_ = option_();

    let ident = meta.ident;
    let type_name = ident.to_string();

    quote! {
        impl #trait_type_path_ for #ident {
            #[inline]
            fn type_path() -> &'static str {
                ::core::concat!(::core::module_path!(), "::", #type_name)
            }

            #[inline]
            fn type_name() -> &'static str {
                #type_name
            }

            #[inline]
            fn module_path() -> #option_<&'static str> {
                #option_::Some(::core::module_path!())
            }
        }
    }
}
