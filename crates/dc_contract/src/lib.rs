//! Data-contract XML serialization.
//!
//! Types describe how they serialize through declarative metadata
//! ([`#[derive(DataContract)]`](derive@DataContract)). A
//! [`DataContractSerializer`] turns that metadata into an immutable contract
//! graph, then writes object graphs as canonical XML and reads them back.
//!
//! ## Quick start
//!
//! ```
//! use dc_contract::{DataContract, DataContractSerializer};
//!
//! #[derive(DataContract, Debug, Default, PartialEq)]
//! #[data_contract(namespace = "urn:shop")]
//! struct Item {
//!     #[data_member(name = "Name", order = 0)]
//!     name: String,
//!     #[data_member(name = "Count", order = 1)]
//!     count: i32,
//! }
//!
//! let serializer = DataContractSerializer::new::<Item>().unwrap();
//! let item = Item { name: "pen".into(), count: 3 };
//!
//! let xml = serializer.write_object_to_string(&item).unwrap();
//! assert_eq!(
//!     xml,
//!     "<?xml version=\"1.0\" encoding=\"utf-16\"?>\
//!      <Item xmlns=\"urn:shop\" xmlns:i=\"http://www.w3.org/2001/XMLSchema-instance\">\
//!      <Name>pen</Name><Count>3</Count></Item>",
//! );
//!
//! let back: Item = serializer.read_object(&xml).unwrap();
//! assert_eq!(back, item);
//! ```
//!
//! ## Layout
//!
//! - [`info`]: compile-time type metadata, the input of the contract builder.
//! - [`value`]: the dynamic value graph the engines walk.
//! - [`contract`]: the contract model and its per-serializer cache.
//! - [`known_types`] and [`resolver`]: polymorphic type resolution.
//! - [`ser`] and [`de`]: the writer and reader engines.
//! - [`schema`]: XML Schema export of the same contract model.
//! - [`xml`]: namespace-aware XML writer and tree reader.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Extern Self

// Usually, we need to use `crate` in the crate itself and use `dc_contract` in doc testing.
// But `macro_utils::Manifest` can only return `::dc_contract`.
//
// This allows the macro to work properly in both cases.
extern crate self as dc_contract;

// -----------------------------------------------------------------------------
// Extern crates

extern crate alloc;
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod serializer;

pub mod contract;
pub mod de;
pub mod impls;
pub mod info;
pub mod known_types;
pub mod namespaces;
pub mod resolver;
pub mod schema;
pub mod ser;
pub mod value;
pub mod xml;

// -----------------------------------------------------------------------------
// Top-level exports

pub use error::{Error, FromValueError, Result, ValueKind};
pub use serializer::{DataContractSerializer, NamespaceMapping, SerializerBuilder};
pub use serializer::SerializerSettings;
pub use value::{DataContract, EnumContract, Flags, Poly, SerializableData, Value};

pub use dc_contract_derive::DataContract;

// -----------------------------------------------------------------------------
// Macro exports

/// Items the derive output refers to, so it expands in `no_std` crates.
#[doc(hidden)]
pub mod __macro_exports {
    pub use alloc::boxed::Box;
    pub use alloc::vec::Vec;
}
