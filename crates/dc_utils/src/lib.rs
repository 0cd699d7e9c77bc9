//! Low-level helpers shared by the data-contract crates.
//!
//! - [`TypeIdMap`]: a map keyed by [`TypeId`](core::any::TypeId) without rehashing.
//! - [`hash`]: fixed-seed hash state and `hashbrown` aliases.
//! - [`xml_name`]: XML name character classes and local-name encoding.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod typeid_map;

pub mod hash;
pub mod xml_name;

// -----------------------------------------------------------------------------
// Top-level exports

pub use typeid_map::TypeIdMap;
