use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{ContractClass, ContractDerive, ContractEnum, ContractMeta, FieldRole};
use crate::path::fp::{into_, option_};

/// `.with_attributes(ContractAttributes::new()...)`, empty without attributes.
fn contract_attributes(meta: &ContractMeta) -> TokenStream {
    let attrs = &meta.attrs;
    if attrs.name.is_none() && attrs.namespace.is_none() && !attrs.is_reference {
        return TokenStream::new();
    }

    let contract_attributes_ = crate::path::contract_attributes_(meta.dc_contract_path());
    let name = attrs.name.iter();
    let namespace = attrs.namespace.iter();
    let is_reference = attrs.is_reference.then(|| quote! { .with_is_reference(true) });

    quote! {
        .with_attributes(
            #contract_attributes_::new()
                #(.with_name(#name))*
                #(.with_namespace(#namespace))*
                #is_reference
        )
    }
}

/// `.with_known_types(..)` plus the provider in `.with_methods(..)`.
fn known_types(meta: &ContractMeta) -> TokenStream {
    let attrs = &meta.attrs;
    let dc_contract_path = meta.dc_contract_path();
    let typed_ = crate::path::typed_(dc_contract_path);
    let known_type_attributes_ = crate::path::known_type_attributes_(dc_contract_path);

    if let Some(method) = &attrs.known_type_method {
        let method_info_ = crate::path::method_info_(dc_contract_path);
        let type_info_ = crate::path::type_info_(dc_contract_path);
        let vec_ = crate::path::vec_(dc_contract_path);
        let option_ = option_();
        let into_ = into_();
        let method_ident = syn::Ident::new(&method.value(), method.span());

        return quote! {
            .with_known_types(#known_type_attributes_::new().with_method(#method))
            .with_methods(&[#method_info_::known_type_provider(#method, || {
                #into_::<#option_<#vec_<&'static #type_info_>>>::into(Self::#method_ident())
            })])
        };
    }

    if attrs.known_types.is_empty() {
        return TokenStream::new();
    }
    let types = &attrs.known_types;
    quote! {
        .with_known_types(
            #known_type_attributes_::new()
                #(.with_type(<#types as #typed_>::type_info))*
        )
    }
}

fn class_info(class: &ContractClass) -> TokenStream {
    let meta = &class.meta;
    let dc_contract_path = meta.dc_contract_path();
    let typed_ = crate::path::typed_(dc_contract_path);
    let class_info_ = crate::path::class_info_(dc_contract_path);
    let field_info_ = crate::path::field_info_(dc_contract_path);
    let data_member_attributes_ = crate::path::data_member_attributes_(dc_contract_path);

    let fields = class.members().map(|field| {
        let ty = field.ty;
        let name = field.name();
        let attrs = &field.attrs;
        let member_name = attrs.name.iter();
        let order = attrs.order.iter();
        let emit = attrs.emit_default_value.iter();
        let required = attrs.is_required.iter();
        quote! {
            #field_info_::new::<#ty>(#name).with_attributes(
                #data_member_attributes_::new()
                    #(.with_name(#member_name))*
                    #(.with_order(#order))*
                    #(.with_emit_default_value(#emit))*
                    #(.with_is_required(#required))*
            )
        }
    });

    let attributes = contract_attributes(meta);
    let base = class.field_of(FieldRole::Base).map(|field| {
        let ty = field.ty;
        quote! { .with_base(<#ty as #typed_>::type_info) }
    });
    let known_types = known_types(meta);
    let extension_data = class
        .field_of(FieldRole::ExtensionData)
        .map(|_| quote! { .with_extension_data(true) });

    quote! {
        #class_info_::new::<Self>(&[#(#fields),*])
            #attributes
            #base
            #known_types
            #extension_data
    }
}

fn enum_info(info: &ContractEnum) -> TokenStream {
    let meta = &info.meta;
    let dc_contract_path = meta.dc_contract_path();
    let enum_info_ = crate::path::enum_info_(dc_contract_path);
    let enum_variant_info_ = crate::path::enum_variant_info_(dc_contract_path);

    let variants = info.variants.iter().map(|variant| {
        let ident = variant.ident;
        let ident_name = ident.to_string();
        let member_name = variant.attrs.value.iter();
        quote! {
            #enum_variant_info_::new(#ident_name, Self::#ident as i64)
                #(.with_member_name(#member_name))*
        }
    });

    let attributes = contract_attributes(meta);
    let flags = meta.attrs.flags.map(|_| quote! { .with_flags(true) });

    quote! {
        #enum_info_::new::<Self>(&[#(#variants),*])
            #attributes
            #flags
    }
}

/// Generate implementation codes for `Typed`
pub(crate) fn impl_trait_typed(derive: &ContractDerive) -> TokenStream {
    let meta = derive.meta();
    let dc_contract_path = meta.dc_contract_path();
    let typed_ = crate::path::typed_(dc_contract_path);
    let type_info_ = crate::path::type_info_(dc_contract_path);
    let type_info_cell_ = crate::path::type_info_cell_(dc_contract_path);

    let info = match derive {
        ContractDerive::Class(class) => {
            let info = class_info(class);
            quote! { #type_info_::Class(#info) }
        }
        ContractDerive::Enum(info) => {
            let info = enum_info(info);
            quote! { #type_info_::Enum(#info) }
        }
        ContractDerive::Custom(meta) => {
            let custom_info_ = crate::path::custom_info_(dc_contract_path);
            let attributes = contract_attributes(meta);
            let known_types = known_types(meta);
            quote! {
                #type_info_::Custom(#custom_info_::new::<Self>() #attributes #known_types)
            }
        }
        ContractDerive::Collection(meta, inner) => {
            let collection_info_ = crate::path::collection_info_(dc_contract_path);
            let attributes = collection_attributes(meta);
            quote! {
                #type_info_::Collection(
                    #collection_info_::new::<Self>(<#inner as #typed_>::type_info) #attributes
                )
            }
        }
    };

    let ident = meta.ident;
    quote! {
        impl #typed_ for #ident {
            fn type_info() -> &'static #type_info_ {
                static CELL: #type_info_cell_ = #type_info_cell_::new();
                CELL.get_or_init(|| #info)
            }
        }
    }
}

fn collection_attributes(meta: &ContractMeta) -> TokenStream {
    let attrs = &meta.attrs;
    let collection_contract_attributes_ =
        crate::path::collection_contract_attributes_(meta.dc_contract_path());

    let name = attrs.name.iter();
    let namespace = attrs.namespace.iter();
    let item_name = attrs.item_name.iter();
    let key_name = attrs.key_name.iter();
    let value_name = attrs.value_name.iter();
    let is_reference = attrs.is_reference.then(|| quote! { .with_is_reference(true) });

    quote! {
        .with_attributes(
            #collection_contract_attributes_::new()
                #(.with_name(#name))*
                #(.with_namespace(#namespace))*
                #(.with_item_name(#item_name))*
                #(.with_key_name(#key_name))*
                #(.with_value_name(#value_name))*
                #is_reference
        )
    }
}
