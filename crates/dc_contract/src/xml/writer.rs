use alloc::borrow::Cow;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;

use crate::error::{Error, Result};
use crate::namespaces;
use crate::xml::escape::{escape_attribute, escape_text};
use crate::xml::{XmlElement, XmlNode};

// -----------------------------------------------------------------------------
// Scopes

struct Scope {
    qname: String,
    default_ns: String,
    /// `(prefix, namespace)` declared on this element.
    bindings: Vec<(String, String)>,
    next_prefix: usize,
}

struct PendingStart {
    attributes: Vec<(String, String)>,
    declarations: Vec<(String, String)>,
}

/// Rank of a declaration in the start tag: default namespace, `i`, `z`,
/// `x`, then generated prefixes in creation order.
fn declaration_rank(prefix: &str) -> u8 {
    match prefix {
        "" => 0,
        namespaces::XSI_PREFIX => 1,
        namespaces::SERIALIZATION_PREFIX => 2,
        namespaces::XS_PREFIX => 3,
        _ => 4,
    }
}

// -----------------------------------------------------------------------------
// XmlWriter

/// A namespace-aware element writer over [`quick_xml::Writer`].
///
/// Start tags are buffered until the first child or text so attributes and
/// declarations can still be added, and elements that end without content
/// are written as `<name/>`.
///
/// Element names never carry an explicit prefix choice: an element in the
/// in-scope default namespace is unprefixed, an element in a namespace
/// bound to a prefix uses that prefix, and any other namespace becomes the
/// element's default with an `xmlns` declaration.
///
/// ```
/// use dc_contract::xml::XmlWriter;
///
/// let mut writer = XmlWriter::new(Vec::new());
/// writer.start_element("Numbers", "urn:a").unwrap();
/// writer.declare_namespace("urn:b").unwrap();
/// writer.start_element("int", "urn:b").unwrap();
/// writer.text("1").unwrap();
/// writer.end_element().unwrap();
/// writer.end_element().unwrap();
///
/// let xml = String::from_utf8(writer.into_inner()).unwrap();
/// assert_eq!(
///     xml,
///     r#"<Numbers xmlns="urn:a" xmlns:d1p1="urn:b"><d1p1:int>1</d1p1:int></Numbers>"#,
/// );
/// ```
pub struct XmlWriter<W: Write> {
    writer: Writer<W>,
    scopes: Vec<Scope>,
    pending: Option<PendingStart>,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new(inner),
            scopes: Vec::new(),
            pending: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    /// Number of open elements, `1` inside the root.
    #[inline]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn write_declaration(&mut self, encoding: &str) -> Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some(encoding), None)))?;
        Ok(())
    }

    fn default_ns(&self) -> &str {
        self.scopes.last().map_or("", |s| s.default_ns.as_str())
    }

    /// Prefix bound to `namespace` and not shadowed by a nearer binding.
    pub fn lookup_prefix(&self, namespace: &str) -> Option<&str> {
        for (depth, scope) in self.scopes.iter().enumerate().rev() {
            for (prefix, ns) in scope.bindings.iter().rev() {
                if prefix.is_empty() || ns != namespace {
                    continue;
                }
                let shadowed = self.scopes[depth + 1..]
                    .iter()
                    .any(|inner| inner.bindings.iter().any(|(p, _)| p == prefix));
                if !shadowed {
                    return Some(prefix);
                }
            }
        }
        match namespace {
            namespaces::XML => Some("xml"),
            _ => None,
        }
    }

    fn is_declared_here(&self, prefix: &str) -> bool {
        self.scopes
            .last()
            .is_some_and(|s| s.bindings.iter().any(|(p, _)| p == prefix))
    }

    fn pending(&mut self) -> Result<&mut PendingStart> {
        self.pending.as_mut().ok_or_else(|| {
            Error::Io(std::io::Error::other(
                "attributes must be written before element content",
            ))
        })
    }

    fn flush_start(&mut self) -> Result<()> {
        let Some(mut pending) = self.pending.take() else {
            return Ok(());
        };
        let Some(scope) = self.scopes.last() else {
            return Ok(());
        };
        let start = build_start(&scope.qname, &mut pending);
        self.writer.write_event(Event::Start(start))?;
        Ok(())
    }

    fn declare(&mut self, prefix: String, namespace: &str) -> Result<()> {
        let attribute = if prefix.is_empty() {
            "xmlns".to_string()
        } else {
            format!("xmlns:{prefix}")
        };
        self.pending()?.declarations.push((attribute, namespace.to_string()));
        if let Some(scope) = self.scopes.last_mut() {
            scope.bindings.push((prefix, namespace.to_string()));
        }
        Ok(())
    }

    fn generate_prefix(&mut self) -> String {
        let depth = self.scopes.len();
        loop {
            let Some(scope) = self.scopes.last_mut() else {
                return String::new();
            };
            scope.next_prefix += 1;
            let prefix = format!("d{depth}p{}", scope.next_prefix);
            if !self.is_declared_here(&prefix) {
                return prefix;
            }
        }
    }

    /// Opens an element.
    pub fn start_element(&mut self, local: &str, namespace: &str) -> Result<()> {
        self.flush_start()?;

        let inherited = self.default_ns().to_string();
        let (qname, declare_default) = if namespace == inherited {
            (local.to_string(), false)
        } else if let Some(prefix) = self.lookup_prefix(namespace) {
            (format!("{prefix}:{local}"), false)
        } else {
            (local.to_string(), true)
        };

        self.scopes.push(Scope {
            qname,
            default_ns: if declare_default {
                namespace.to_string()
            } else {
                inherited
            },
            bindings: Vec::new(),
            next_prefix: 0,
        });
        self.pending = Some(PendingStart {
            attributes: Vec::new(),
            declarations: Vec::new(),
        });
        if declare_default {
            self.declare(String::new(), namespace)?;
        }
        Ok(())
    }

    /// Opens an element in `namespace`, binding `prefix` to it on the element
    /// when the namespace is neither the default nor bound.
    ///
    /// Used for vocabularies with a customary prefix, such as `xs:schema`.
    pub fn start_prefixed_element(&mut self, prefix: &str, local: &str, namespace: &str) -> Result<()> {
        if prefix.is_empty()
            || namespace == self.default_ns()
            || self.lookup_prefix(namespace).is_some()
        {
            return self.start_element(local, namespace);
        }
        self.flush_start()?;

        let inherited = self.default_ns().to_string();
        self.scopes.push(Scope {
            qname: format!("{prefix}:{local}"),
            default_ns: inherited,
            bindings: Vec::new(),
            next_prefix: 0,
        });
        self.pending = Some(PendingStart {
            attributes: Vec::new(),
            declarations: Vec::new(),
        });
        self.declare(prefix.to_string(), namespace)
    }

    /// Adds an attribute to the open start tag.
    ///
    /// `prefix` must already be bound, see [`ensure_prefix`](Self::ensure_prefix).
    pub fn attribute(&mut self, prefix: &str, local: &str, value: &str) -> Result<()> {
        let name = if prefix.is_empty() {
            local.to_string()
        } else {
            format!("{prefix}:{local}")
        };
        self.pending()?.attributes.push((name, value.to_string()));
        Ok(())
    }

    /// Returns a prefix bound to `namespace`, declaring `preferred` (or a
    /// generated prefix when taken) on the open element if none is.
    pub fn ensure_prefix(&mut self, preferred: &str, namespace: &str) -> Result<String> {
        if let Some(prefix) = self.lookup_prefix(namespace) {
            return Ok(prefix.to_string());
        }
        let prefix = if !preferred.is_empty() && !self.is_declared_here(preferred) {
            preferred.to_string()
        } else {
            self.generate_prefix()
        };
        self.declare(prefix.clone(), namespace)?;
        Ok(prefix)
    }

    /// Declares a generated prefix for `namespace` on the open element
    /// unless the namespace is the default or already bound.
    pub fn declare_namespace(&mut self, namespace: &str) -> Result<()> {
        if namespace.is_empty()
            || namespace == self.default_ns()
            || self.lookup_prefix(namespace).is_some()
        {
            return Ok(());
        }
        let prefix = self.generate_prefix();
        self.declare(prefix, namespace)
    }

    /// Qualified-name text for `local` in `namespace`, for values such as
    /// `i:type`. Declares a generated prefix when needed.
    pub fn qualified_value(&mut self, local: &str, namespace: &str) -> Result<String> {
        if namespace == self.default_ns() {
            return Ok(local.to_string());
        }
        let prefix = match self.lookup_prefix(namespace) {
            Some(prefix) => prefix.to_string(),
            None => {
                let prefix = self.generate_prefix();
                self.declare(prefix.clone(), namespace)?;
                prefix
            }
        };
        Ok(format!("{prefix}:{local}"))
    }

    /// Writes escaped text. Empty text still forces a separate end tag.
    pub fn text(&mut self, text: &str) -> Result<()> {
        self.flush_start()?;
        let escaped = escape_text(text);
        if !escaped.is_empty() {
            self.writer
                .write_event(Event::Text(BytesText::from_escaped(escaped)))?;
        }
        Ok(())
    }

    /// Closes the innermost open element.
    pub fn end_element(&mut self) -> Result<()> {
        let scope = self.scopes.pop().ok_or_else(|| {
            Error::Io(std::io::Error::other("no open element to close"))
        })?;
        match self.pending.take() {
            Some(mut pending) => {
                let start = build_start(&scope.qname, &mut pending);
                self.writer.write_event(Event::Empty(start))?;
            }
            None => {
                self.writer
                    .write_event(Event::End(BytesEnd::new(scope.qname.as_str())))?;
            }
        }
        Ok(())
    }

    /// Writes a parsed element back, re-binding the prefixes it uses.
    pub fn write_element(&mut self, element: &XmlElement) -> Result<()> {
        self.start_element(&element.name.local, &element.name.namespace)?;
        for attribute in &element.attributes {
            if attribute.namespace.is_empty() {
                self.attribute("", &attribute.local, &attribute.value)?;
                continue;
            }
            let preferred = attribute.prefix.as_deref().unwrap_or_default();
            let prefix = self.ensure_prefix(preferred, &attribute.namespace)?;
            let value = if attribute.namespace == namespaces::XSI && attribute.local == "type" {
                let (local, ns) = element.resolve_qname(&attribute.value)?;
                Cow::Owned(self.qualified_value(local, &ns)?)
            } else {
                Cow::Borrowed(attribute.value.as_str())
            };
            self.attribute(&prefix, &attribute.local, &value)?;
        }
        for node in &element.children {
            match node {
                XmlNode::Element(child) => self.write_element(child)?,
                XmlNode::Text(text) => self.text(text)?,
            }
        }
        self.end_element()
    }
}

fn build_start<'a>(qname: &'a str, pending: &'a mut PendingStart) -> BytesStart<'a> {
    pending
        .declarations
        .sort_by_key(|(name, _)| declaration_rank(name.strip_prefix("xmlns:").unwrap_or_default()));

    let mut start = BytesStart::new(qname);
    for (name, value) in pending.attributes.iter().chain(&pending.declarations) {
        start.push_attribute(Attribute {
            key: QName(name.as_bytes()),
            value: match escape_attribute(value) {
                Cow::Borrowed(v) => Cow::Borrowed(v.as_bytes()),
                Cow::Owned(v) => Cow::Owned(v.into_bytes()),
            },
        });
    }
    start
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::XmlWriter;
    use crate::namespaces;
    use crate::xml::read_document;

    fn finish(writer: XmlWriter<Vec<u8>>) -> String {
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn attribute_order_and_empty_elements() {
        let mut w = XmlWriter::new(Vec::new());
        w.start_element("Root", "urn:r").unwrap();
        let i = w.ensure_prefix("i", namespaces::XSI).unwrap();
        w.start_element("Member", "urn:r").unwrap();
        w.attribute(&i, "nil", "true").unwrap();
        w.end_element().unwrap();
        w.end_element().unwrap();

        assert_eq!(
            finish(w),
            "<Root xmlns=\"urn:r\" xmlns:i=\"http://www.w3.org/2001/XMLSchema-instance\">\
             <Member i:nil=\"true\"/></Root>"
        );
    }

    #[test]
    fn prefixed_elements_bind_their_prefix() {
        let mut w = XmlWriter::new(Vec::new());
        w.start_prefixed_element("xs", "schema", namespaces::XS).unwrap();
        w.start_prefixed_element("xs", "element", namespaces::XS).unwrap();
        let ty = w.qualified_value("int", namespaces::XS).unwrap();
        w.attribute("", "type", &ty).unwrap();
        w.end_element().unwrap();
        w.end_element().unwrap();

        assert_eq!(
            finish(w),
            "<xs:schema xmlns:xs=\"http://www.w3.org/2001/XMLSchema\">\
             <xs:element type=\"xs:int\"/></xs:schema>"
        );
    }

    #[test]
    fn type_values_use_generated_prefixes() {
        let mut w = XmlWriter::new(Vec::new());
        w.start_element("Root", "urn:r").unwrap();
        let i = w.ensure_prefix("i", namespaces::XSI).unwrap();
        w.start_element("Shape", "urn:r").unwrap();
        let same = w.qualified_value("Square", "urn:r").unwrap();
        let other = w.qualified_value("Circle", "urn:c").unwrap();
        w.attribute(&i, "type", &other).unwrap();
        w.end_element().unwrap();
        w.end_element().unwrap();

        assert_eq!(same, "Square");
        assert_eq!(other, "d2p1:Circle");
        assert!(finish(w).contains("<Shape i:type=\"d2p1:Circle\" xmlns:d2p1=\"urn:c\"/>"));
    }

    #[test]
    fn empty_namespace_resets_default() {
        let mut w = XmlWriter::new(Vec::new());
        w.start_element("Root", "urn:r").unwrap();
        w.start_element("entry", "").unwrap();
        w.text("").unwrap();
        w.end_element().unwrap();
        w.end_element().unwrap();
        assert_eq!(finish(w), "<Root xmlns=\"urn:r\"><entry xmlns=\"\"></entry></Root>");
    }

    #[test]
    fn parsed_elements_write_back() {
        let source = r#"<Extra xmlns="urn:new" xmlns:i="http://www.w3.org/2001/XMLSchema-instance" xmlns:q="urn:q"><Inner i:type="q:T">a&amp;b</Inner></Extra>"#;
        let element = read_document(source).unwrap();

        let mut w = XmlWriter::new(Vec::new());
        w.start_element("Root", "urn:old").unwrap();
        w.write_element(&element).unwrap();
        w.end_element().unwrap();

        let written = finish(w);
        let reparsed = read_document(&written).unwrap();
        let extra = reparsed.child_elements().next().unwrap();
        assert!(extra.name.is("Extra", "urn:new"));
        let inner = extra.child_elements().next().unwrap();
        assert_eq!(inner.text(), "a&b");
        let type_name = inner.attribute(namespaces::XSI, "type").unwrap();
        let (local, ns) = inner.resolve_qname(type_name).unwrap();
        assert_eq!((local, ns.as_str()), ("T", "urn:q"));
    }
}
