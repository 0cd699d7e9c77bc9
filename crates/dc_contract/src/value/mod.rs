//! The dynamic value graph.
//!
//! Rust values convert into a [`Value`] tree through [`DataContract`], the
//! writer walks that tree against the contract graph, and the reader builds
//! one from XML before converting it back.

// -----------------------------------------------------------------------------
// Modules

mod context;
mod data_contract;
mod extension_data;
mod flags;
mod poly;
mod primitive;
mod serialization_info;
mod value;

// -----------------------------------------------------------------------------
// Exports

pub use context::ValueContext;
pub use data_contract::{DataContract, EnumContract, SerializableData};
pub use extension_data::ExtensionDataObject;
pub use flags::Flags;
pub use poly::Poly;
pub use primitive::{Primitive, PrimitiveParseError};
pub use serialization_info::SerializationInfo;
pub use value::{ClassValue, CollectionValue, CustomValue, DictionaryValue, EnumValue, Value};

pub use crate::error::ValueKind;
