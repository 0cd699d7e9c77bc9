//! Contract implementations of builtin and third-party types.
//!
//! ## Implemented Menu
//!
//! - primitives: `bool`, `i8`-`i64`, `u8`-`u64`, `f32`, `f64`, `char`, `String`
//! - chrono: [`DateTime`] (`dateTime`), `TimeDelta` (`duration`),
//!   [`DateTimeOffset`] (the `System` `DateTimeOffset` class)
//! - uuid: `Uuid` (`guid`)
//! - [`Bytes`] (`base64Binary`) and [`Uri`] (`anyURI`)
//! - `Vec<T>` (`ArrayOf..`), `BTreeMap<K, V>` (`ArrayOfKeyValueOf..`)
//! - `Option<T>` (nullable), `Box<T>` and `Arc<T>` (transparent)
//! - [`Value`](crate::Value) (`anyType`)

// -----------------------------------------------------------------------------
// Modules

mod binary;
mod collections;
mod date_time;
mod guid;
mod native;
mod object;
mod option;
mod pointers;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use native::{convert_primitive, impl_primitive_contract};

// -----------------------------------------------------------------------------
// Exports

pub use binary::{Bytes, Uri};
pub use date_time::{DateTime, DateTimeKind, DateTimeOffset};
