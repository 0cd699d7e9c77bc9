use alloc::borrow::ToOwned;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{PrefixDeclaration, ResolveResult};
use quick_xml::reader::NsReader;

use crate::error::{Error, Result};
use crate::xml::escape::{normalize_attribute, normalize_line_ends, unescape};

// -----------------------------------------------------------------------------
// Tree

/// An expanded element name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlName {
    pub prefix: Option<String>,
    pub local: String,
    pub namespace: String,
}

impl XmlName {
    /// Whether the name is `local` in `namespace`.
    #[inline]
    pub fn is(&self, local: &str, namespace: &str) -> bool {
        self.local == local && self.namespace == namespace
    }
}

/// A non-declaration attribute. Unprefixed attributes have no namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    pub prefix: Option<String>,
    pub local: String,
    pub namespace: String,
    pub value: String,
}

/// The prefix bindings in effect at an element.
///
/// Elements without declarations share their parent's scope.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NamespaceScope {
    /// `(prefix, namespace)`, the default namespace has an empty prefix.
    bindings: Vec<(String, String)>,
}

impl NamespaceScope {
    /// Namespace bound to `prefix`, `""` looks up the default namespace.
    pub fn lookup(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, ns)| ns.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// A parsed element with its namespace context.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    pub name: XmlName,
    pub attributes: Vec<XmlAttribute>,
    pub scope: Arc<NamespaceScope>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Value of the attribute `local` in `namespace`.
    pub fn attribute(&self, namespace: &str, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.local == local && a.namespace == namespace)
            .map(|a| a.value.as_str())
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// Whether the element has element children.
    pub fn has_child_elements(&self) -> bool {
        self.child_elements().next().is_some()
    }

    /// Concatenated text content of the direct children.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for node in &self.children {
            if let XmlNode::Text(t) = node {
                text.push_str(t);
            }
        }
        text
    }

    /// Resolves a `prefix:local` value against the element's scope.
    ///
    /// Returns `(local, namespace)`. An unprefixed name takes the default
    /// namespace.
    pub fn resolve_qname<'a>(&self, qname: &'a str) -> Result<(&'a str, String)> {
        let qname = qname.trim();
        let (prefix, local) = match qname.split_once(':') {
            Some((prefix, local)) => (prefix, local),
            None => ("", qname),
        };
        match self.scope.lookup(prefix) {
            Some(ns) => Ok((local, ns.to_owned())),
            None if prefix.is_empty() => Ok((local, String::new())),
            None => Err(Error::MalformedContent(format!(
                "prefix `{prefix}` of `{qname}` is not bound"
            ))),
        }
    }
}

// -----------------------------------------------------------------------------
// Parsing

fn utf8(bytes: &[u8]) -> Result<&str> {
    core::str::from_utf8(bytes).map_err(|e| Error::MalformedContent(format!("{e}")))
}

fn namespace_of(resolved: ResolveResult<'_>, qname: &str) -> Result<String> {
    match resolved {
        ResolveResult::Bound(namespace) => Ok(utf8(namespace.as_ref())?.to_owned()),
        ResolveResult::Unbound => Ok(String::new()),
        ResolveResult::Unknown(prefix) => Err(Error::MalformedContent(format!(
            "prefix `{}` of `{qname}` is not bound",
            String::from_utf8_lossy(&prefix)
        ))),
    }
}

fn prefix_of(qname: &str) -> Option<String> {
    qname.split_once(':').map(|(prefix, _)| prefix.to_owned())
}

/// The bindings in effect at the element `reader` just read.
fn scope_of(reader: &NsReader<&[u8]>) -> Result<NamespaceScope> {
    let mut bindings = Vec::new();
    for (prefix, namespace) in reader.prefixes() {
        let prefix = match prefix {
            PrefixDeclaration::Default => String::new(),
            PrefixDeclaration::Named(prefix) => utf8(prefix)?.to_owned(),
        };
        bindings.push((prefix, utf8(namespace.as_ref())?.to_owned()));
    }
    Ok(NamespaceScope { bindings })
}

fn open_element(
    reader: &NsReader<&[u8]>,
    start: &BytesStart<'_>,
    parent: &Arc<NamespaceScope>,
) -> Result<XmlElement> {
    let mut declares = false;
    let mut attributes = Vec::new();

    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        if attribute.key.as_namespace_binding().is_some() {
            declares = true;
            continue;
        }
        let key = utf8(attribute.key.as_ref())?;
        let (resolved, local) = reader.resolve_attribute(attribute.key);
        let value = unescape(&normalize_attribute(utf8(&attribute.value)?))?.into_owned();
        attributes.push(XmlAttribute {
            prefix: prefix_of(key),
            local: utf8(local.as_ref())?.to_owned(),
            namespace: namespace_of(resolved, key)?,
            value,
        });
    }

    let scope = if declares {
        Arc::new(scope_of(reader)?)
    } else {
        parent.clone()
    };

    let name = start.name();
    let qname = utf8(name.as_ref())?;
    let (resolved, local) = reader.resolve_element(name);

    Ok(XmlElement {
        name: XmlName {
            prefix: prefix_of(qname),
            local: utf8(local.as_ref())?.to_owned(),
            namespace: namespace_of(resolved, qname)?,
        },
        attributes,
        scope,
        children: Vec::new(),
    })
}

/// Parses a document into its root element.
///
/// Comments, processing instructions and the declaration are dropped.
/// Text keeps its whitespace.
///
/// ```
/// use dc_contract::xml::read_document;
///
/// let root = read_document(r#"<a xmlns="urn:x" xmlns:p="urn:p"><p:b k="1">t</p:b></a>"#).unwrap();
/// assert!(root.name.is("a", "urn:x"));
///
/// let b = root.child_elements().next().unwrap();
/// assert!(b.name.is("b", "urn:p"));
/// assert_eq!(b.attribute("", "k"), Some("1"));
/// assert_eq!(b.text(), "t");
/// ```
pub fn read_document(xml: &str) -> Result<XmlElement> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(false);

    let root_scope = Arc::new(NamespaceScope::default());
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root = None;

    let mut close = |stack: &mut Vec<XmlElement>, element: XmlElement| -> Result<()> {
        match stack.last_mut() {
            Some(parent) => parent.children.push(XmlNode::Element(element)),
            None if root.is_none() => root = Some(element),
            None => {
                return Err(Error::UnexpectedElement(format!(
                    "second root element `{}`",
                    element.name.local
                )));
            }
        }
        Ok(())
    };

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let parent = stack.last().map_or(&root_scope, |e| &e.scope);
                let element = open_element(&reader, &start, parent)?;
                stack.push(element);
            }
            Event::Empty(start) => {
                let parent = stack.last().map_or(&root_scope, |e| &e.scope);
                let element = open_element(&reader, &start, parent)?;
                close(&mut stack, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::MalformedContent("unbalanced end tag".into()))?;
                close(&mut stack, element)?;
            }
            Event::Text(text) => {
                let raw = utf8(&text)?;
                if let Some(parent) = stack.last_mut() {
                    let value = unescape(&normalize_line_ends(raw))?.into_owned();
                    parent.children.push(XmlNode::Text(value));
                } else if !raw.trim().is_empty() {
                    return Err(Error::MalformedContent("text outside the root element".into()));
                }
            }
            Event::CData(data) => {
                let raw = utf8(&data)?;
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlNode::Text(normalize_line_ends(raw).into_owned()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(Error::MalformedContent("document ends inside an element".into()));
    }
    drop(close);
    root.ok_or_else(|| Error::MalformedContent("document has no root element".into()))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::read_document;
    use crate::namespaces;

    #[test]
    fn attributes_and_scopes() {
        let xml = r#"<?xml version="1.0" encoding="utf-16"?>
            <a xmlns:i="http://www.w3.org/2001/XMLSchema-instance"><b i:nil="true"/><c xmlns="urn:c"/></a>"#;
        let root = read_document(xml).unwrap();
        assert!(root.name.is("a", ""));

        let children: alloc::vec::Vec<_> = root.child_elements().collect();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].attribute(namespaces::XSI, "nil"), Some("true"));
        assert!(children[1].name.is("c", "urn:c"));
    }

    #[test]
    fn text_is_unescaped() {
        let root = read_document("<a>x&#x6;&lt;y&#xD;</a>").unwrap();
        assert_eq!(root.text(), "x\u{6}<y\r");
    }

    #[test]
    fn resolves_qualified_values() {
        let root = read_document(r#"<a xmlns:d1p1="urn:t" t="d1p1:Shape"/>"#).unwrap();
        let (local, ns) = root.resolve_qname("d1p1:Shape").unwrap();
        assert_eq!((local, ns.as_str()), ("Shape", "urn:t"));
        assert!(root.resolve_qname("zz:Shape").is_err());
    }

    #[test]
    fn rejects_broken_documents() {
        assert!(read_document("").is_err());
        assert!(read_document("<a><b></a>").is_err());
        assert!(read_document("<p:a/>").is_err());
    }

    #[test]
    fn nested_declarations_shadow_outer_ones() {
        let xml = r#"<a xmlns="urn:a" xmlns:p="urn:p1"><b xmlns:p="urn:p2" p:k="v"><p:c/></b><p:d/></a>"#;
        let root = read_document(xml).unwrap();
        let children: alloc::vec::Vec<_> = root.child_elements().collect();

        let b = children[0];
        assert!(b.name.is("b", "urn:a"));
        assert_eq!(b.attribute("urn:p2", "k"), Some("v"));
        assert_eq!(b.scope.lookup("p"), Some("urn:p2"));
        assert_eq!(b.scope.lookup(""), Some("urn:a"));
        assert!(b.child_elements().next().unwrap().name.is("c", "urn:p2"));

        assert!(children[1].name.is("d", "urn:p1"));
        assert!(read_document(r#"<a q:k="v"/>"#).is_err());
    }
}
