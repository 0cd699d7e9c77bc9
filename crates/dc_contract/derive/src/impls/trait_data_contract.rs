use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{ContractClass, ContractDerive, ContractEnum, ContractMeta, FieldRole};
use crate::path::fp::{clone_, default_, option_, result_};

/// Generate implementation codes for `DataContract` and, for enums,
/// `EnumContract`.
pub(crate) fn impl_trait_data_contract(derive: &ContractDerive) -> TokenStream {
    let meta = derive.meta();
    let dc_contract_path = meta.dc_contract_path();
    let data_contract_ = crate::path::data_contract_(dc_contract_path);
    let value_ = crate::path::value_(dc_contract_path);
    let value_context_ = crate::path::value_context_(dc_contract_path);
    let from_value_error_ = crate::path::from_value_error_(dc_contract_path);
    let result_ = result_();

    let (to_value, from_value) = match derive {
        ContractDerive::Class(class) => class_conversions(class),
        ContractDerive::Enum(info) => enum_conversions(&info.meta),
        ContractDerive::Custom(meta) => custom_conversions(meta),
        ContractDerive::Collection(meta, _) => collection_conversions(meta),
    };
    let enum_contract = match derive {
        ContractDerive::Enum(info) => impl_trait_enum_contract(info),
        _ => TokenStream::new(),
    };

    let ident = meta.ident;
    quote! {
        impl #data_contract_ for #ident {
            #[allow(unused_variables)]
            fn to_value(&self, cx: &mut #value_context_) -> #value_ {
                #to_value
            }

            #[allow(unused_variables)]
            fn from_value(
                value: &#value_,
                cx: &mut #value_context_,
            ) -> #result_<Self, #from_value_error_> {
                #from_value
            }
        }

        #enum_contract
    }
}

// -----------------------------------------------------------------------------
// Class

fn class_conversions(class: &ContractClass) -> (TokenStream, TokenStream) {
    let dc_contract_path = class.meta.dc_contract_path();
    let data_contract_ = crate::path::data_contract_(dc_contract_path);
    let typed_ = crate::path::typed_(dc_contract_path);
    let value_ = crate::path::value_(dc_contract_path);
    let class_value_ = crate::path::class_value_(dc_contract_path);
    let vec_ = crate::path::vec_(dc_contract_path);
    let box_ = crate::path::box_(dc_contract_path);
    let option_ = option_();
    let result_ = result_();
    let default_ = default_();
    let clone_ = clone_();

    let members: Vec<_> = class.members().map(|field| field.ident).collect();

    let set_base = class.field_of(FieldRole::Base).map(|field| {
        let ident = field.ident;
        quote! {
            class.base = #option_::Some(#box_::new(#data_contract_::to_value(&self.#ident, cx)));
        }
    });
    let set_extension_data = class.field_of(FieldRole::ExtensionData).map(|field| {
        let ident = field.ident;
        quote! {
            class.extension_data = #option_::Some(#clone_::clone(&self.#ident));
        }
    });

    let mutability = (set_base.is_some() || set_extension_data.is_some()).then(|| quote! { mut });
    let to_value = quote! {
        let #mutability class = #class_value_::new(
            <Self as #typed_>::type_info(),
            <#vec_<_>>::from([
                #(#option_::Some(#data_contract_::to_value(&self.#members, cx))),*
            ]),
        );
        #set_base
        #set_extension_data
        #value_::Class(class)
    };

    // Members are indexed in declaration order, skipping the other roles.
    let mut index = 0_usize;
    let fields = class.fields.iter().map(|field| {
        let ident = field.ident;
        match field.attrs.role {
            FieldRole::Member => {
                let member = index;
                index += 1;
                quote! {
                    #ident: match class.member(#member) {
                        #option_::Some(value) => #data_contract_::from_value(value, cx)?,
                        #option_::None => #default_::default(),
                    }
                }
            }
            FieldRole::Base => quote! {
                #ident: match class.base.as_deref() {
                    #option_::Some(value) => #data_contract_::from_value(value, cx)?,
                    #option_::None => #default_::default(),
                }
            },
            FieldRole::ExtensionData => quote! {
                #ident: #clone_::clone(&class.extension_data).unwrap_or_default()
            },
            FieldRole::Ignored => quote! {
                #ident: #default_::default()
            },
        }
    });

    let from_value = quote! {
        let class = value.expect_class_level(<Self as #typed_>::type_info())?;
        #result_::Ok(Self { #(#fields),* })
    };

    (to_value, from_value)
}

// -----------------------------------------------------------------------------
// Enum

fn enum_conversions(meta: &ContractMeta) -> (TokenStream, TokenStream) {
    let dc_contract_path = meta.dc_contract_path();
    let type_path_ = crate::path::type_path_(dc_contract_path);
    let typed_ = crate::path::typed_(dc_contract_path);
    let enum_contract_ = crate::path::enum_contract_(dc_contract_path);
    let value_ = crate::path::value_(dc_contract_path);
    let enum_value_ = crate::path::enum_value_(dc_contract_path);
    let from_value_error_ = crate::path::from_value_error_(dc_contract_path);

    let to_value = quote! {
        #value_::Enum(#enum_value_ {
            ty: <Self as #typed_>::type_info(),
            bits: #enum_contract_::to_bits(*self),
        })
    };
    let from_value = quote! {
        let value = value.expect_enum(<Self as #type_path_>::type_path())?;
        #enum_contract_::from_bits(value.bits).ok_or(#from_value_error_::UnknownEnumValue {
            type_path: <Self as #type_path_>::type_path(),
            bits: value.bits,
        })
    };
    (to_value, from_value)
}

fn impl_trait_enum_contract(info: &ContractEnum) -> TokenStream {
    let enum_contract_ = crate::path::enum_contract_(info.meta.dc_contract_path());
    let option_ = option_();

    let ident = info.meta.ident;
    let variants = info.variants.iter().map(|variant| variant.ident);

    quote! {
        impl #enum_contract_ for #ident {
            #[inline]
            fn to_bits(self) -> i64 {
                self as i64
            }

            fn from_bits(bits: i64) -> #option_<Self> {
                #(
                    if bits == Self::#variants as i64 {
                        return #option_::Some(Self::#variants);
                    }
                )*
                #option_::None
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Custom

fn custom_conversions(meta: &ContractMeta) -> (TokenStream, TokenStream) {
    let dc_contract_path = meta.dc_contract_path();
    let type_path_ = crate::path::type_path_(dc_contract_path);
    let typed_ = crate::path::typed_(dc_contract_path);
    let serializable_data_ = crate::path::serializable_data_(dc_contract_path);
    let serialization_info_ = crate::path::serialization_info_(dc_contract_path);
    let value_ = crate::path::value_(dc_contract_path);
    let custom_value_ = crate::path::custom_value_(dc_contract_path);

    let to_value = quote! {
        let mut info = #serialization_info_::new();
        #serializable_data_::get_object_data(self, &mut info, cx);
        #value_::Custom(#custom_value_ {
            ty: <Self as #typed_>::type_info(),
            info,
        })
    };
    let from_value = quote! {
        let custom = value.expect_custom(<Self as #type_path_>::type_path())?;
        #serializable_data_::from_object_data(&custom.info, cx)
    };
    (to_value, from_value)
}

// -----------------------------------------------------------------------------
// Collection

fn collection_conversions(meta: &ContractMeta) -> (TokenStream, TokenStream) {
    let dc_contract_path = meta.dc_contract_path();
    let data_contract_ = crate::path::data_contract_(dc_contract_path);
    let typed_ = crate::path::typed_(dc_contract_path);
    let result_ = result_();

    let to_value = quote! {
        #data_contract_::to_value(&self.0, cx).retag(<Self as #typed_>::type_info())
    };
    let from_value = quote! {
        #result_::Ok(Self(#data_contract_::from_value(value, cx)?))
    };
    (to_value, from_value)
}
