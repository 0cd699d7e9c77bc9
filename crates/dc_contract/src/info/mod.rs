//! Static type information consumed by the contract builder.
//!
//! ## Menu
//!
//! - [`TypePath`]: stable type names, the source of default contract names.
//! - [`Type`]: a `TypeId` with the [`TypePath`] functions of a type.
//! - [`Typed`]: access to the `&'static` [`TypeInfo`] of a type.
//! - [`TypeInfo`]: one of
//!     - [`PrimitiveInfo`]: a built-in scalar, see [`PrimitiveKind`].
//!     - [`EnumInfo`]: a C-like enum, optionally a flags enum.
//!     - [`ClassInfo`]: a struct with data members ([`FieldInfo`]).
//!     - [`ArrayInfo`], [`DictionaryInfo`]: `Vec<T>` and `BTreeMap<K, V>`.
//!     - [`CollectionInfo`]: a user type that serializes as a collection.
//!     - [`NullableInfo`]: `Option<T>`.
//!     - [`CustomInfo`]: a type with hand-written serialization.
//!     - [`ObjectInfo`]: a slot that accepts any value.
//! - Attributes: [`ContractAttributes`], [`DataMemberAttributes`],
//!   [`CollectionContractAttributes`] and [`KnownTypeAttributes`].
//! - [`MethodInfo`]: methods that may provide known types.
//! - Cells: [`TypeInfoCell`], [`GenericTypeInfoCell`], [`GenericTypePathCell`].

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod cell;
mod class_info;
mod collection_info;
mod enum_info;
mod method_info;
mod primitive_info;
mod type_info;
mod type_path;
mod typed;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use type_path::impl_type_fn;

// -----------------------------------------------------------------------------
// Exports

pub use attributes::{CollectionContractAttributes, ContractAttributes};
pub use attributes::{DataMemberAttributes, KnownTypeAttributes};
pub use cell::{GenericTypeCell, GenericTypeInfoCell, GenericTypePathCell, TypeInfoCell, concat};
pub use class_info::{ClassInfo, FieldInfo};
pub use collection_info::{ArrayInfo, CollectionInfo, CustomInfo};
pub use collection_info::{DictionaryInfo, NullableInfo, ObjectInfo};
pub use enum_info::{EnumInfo, EnumVariantInfo};
pub use method_info::{KnownTypeProvider, MethodInfo, MethodReturn};
pub use primitive_info::{PrimitiveInfo, PrimitiveKind};
pub use type_info::{TypeInfo, TypeKind, TypeKindError};
pub use type_path::{Type, TypePath};
pub use typed::Typed;
