//! Code generators, one per implemented trait.

// -----------------------------------------------------------------------------
// Modules

mod trait_data_contract;
mod trait_type_path;
mod trait_typed;

// -----------------------------------------------------------------------------
// Internal API

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ContractDerive;

pub(crate) use trait_data_contract::impl_trait_data_contract;
pub(crate) use trait_type_path::impl_trait_type_path;
pub(crate) use trait_typed::impl_trait_typed;

/// Every impl of `#[derive(DataContract)]`.
pub(crate) fn impl_contract(derive: &ContractDerive) -> TokenStream {
    let type_path = impl_trait_type_path(derive.meta());
    let typed = impl_trait_typed(derive);
    let data_contract = impl_trait_data_contract(derive);

    quote! {
        #type_path

        #typed

        #data_contract
    }
}
