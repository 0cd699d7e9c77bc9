//! The XML layer the engines talk to.
//!
//! - [`XmlWriter`]: buffered start tags, namespace scopes and generated
//!   `dNpM` prefixes on top of `quick_xml`.
//! - [`read_document`]: parses a document into an [`XmlElement`] tree,
//!   names resolved by `quick_xml`'s `NsReader`.
//! - [`escape_text`], [`escape_attribute`]: character-level escaping,
//!   including control characters. [`unescape`] wraps `quick_xml`'s.

// -----------------------------------------------------------------------------
// Modules

mod escape;
mod reader;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use escape::{escape_attribute, escape_text, unescape};
pub use reader::{NamespaceScope, XmlAttribute, XmlElement, XmlName, XmlNode, read_document};
pub use writer::XmlWriter;
