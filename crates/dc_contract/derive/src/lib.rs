//! See [`DataContract`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static CONTRACT_ATTRIBUTE_NAME: &str = "data_contract";
static MEMBER_ATTRIBUTE_NAME: &str = "data_member";
static ENUM_MEMBER_ATTRIBUTE_NAME: &str = "enum_member";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Data Contract Derivation
///
/// `#[derive(DataContract)]` implements `TypePath`, `Typed` and
/// `DataContract`, plus `EnumContract` for enums. Generic types are not
/// supported.
///
/// ## Shapes
///
/// - A struct with named fields (or a unit struct) is a class contract,
///   each field a data member. Member types must implement `Default`,
///   which fills members absent from the input.
/// - A fieldless enum is an enum contract. Add `flags` to combine members
///   through `Flags<T>`.
/// - `#[data_contract(custom)]` delegates to a hand-written
///   `SerializableData` impl, for any struct or enum.
/// - `#[data_contract(collection)]` on a single-field tuple struct wrapping
///   a list or map gives the collection its own contract.
///
/// ## Type attributes
///
/// ```rust, ignore
/// #[derive(DataContract)]
/// #[data_contract(
///     name = "Order",              // contract name, default the type name
///     namespace = "urn:shop",      // default derived from the module path
///     is_reference,                // always preserve object identity
///     known_type(Express, Pickup), // types accepted in place of this one
///     known_type_method = "types", // or a static `fn types() -> Vec<&'static TypeInfo>`
/// )]
/// struct Order { /* ... */ }
/// ```
///
/// Collection contracts also take `item_name`, `key_name` and `value_name`.
///
/// ## Member attributes
///
/// ```rust, ignore
/// #[derive(DataContract, Default)]
/// struct Order {
///     #[data_member(name = "Id", order = 0, is_required)]
///     id: i32,
///     #[data_member(emit_default_value = false)]
///     note: Option<String>,
///     #[data_member(base)]
///     base: Document,
///     #[data_member(extension_data)]
///     extra: ExtensionDataObject,
///     #[data_member(ignore)]
///     cache: Vec<u8>,
/// }
/// ```
///
/// `base` marks the field holding the base class. `extension_data` keeps
/// unknown elements for a later write. `ignore` leaves a field out of the
/// contract, reading fills it with `Default`.
///
/// ## Enum members
///
/// ```rust, ignore
/// #[derive(DataContract, Clone, Copy)]
/// enum Color {
///     Red = 1,
///     #[enum_member(value = "GREEN")]
///     Green = 2,
/// }
/// ```
#[proc_macro_derive(DataContract, attributes(data_contract, data_member, enum_member))]
pub fn derive_data_contract(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let derive = match derive_data::ContractDerive::from_input(&ast) {
        Ok(derive) => derive,
        Err(err) => return err.into_compile_error().into(),
    };

    impls::impl_contract(&derive).into()
}
