use alloc::collections::{BTreeMap, BTreeSet};
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::contract::QualifiedName;
use crate::error::{Error, Result};
use crate::namespaces;
use crate::xml::XmlWriter;

// -----------------------------------------------------------------------------
// Definitions

/// An element of a content sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Particle {
    pub name: String,
    /// `None` for elements with an inline type, see [`entry`](Self::entry).
    pub type_name: Option<QualifiedName>,
    pub min_occurs: u32,
    /// `maxOccurs="unbounded"`, otherwise one.
    pub unbounded: bool,
    pub nillable: bool,
    /// Sequence of the anonymous type of a dictionary entry.
    pub entry: Option<Vec<Particle>>,
}

impl Particle {
    pub fn new(name: impl Into<String>, type_name: QualifiedName) -> Self {
        Self {
            name: name.into(),
            type_name: Some(type_name),
            min_occurs: 1,
            unbounded: false,
            nillable: false,
            entry: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexType {
    pub name: String,
    /// Base type of a `complexContent` extension.
    pub base: Option<QualifiedName>,
    pub sequence: Vec<Particle>,
    /// An open `xs:any` sequence instead of `sequence`.
    pub open: bool,
    /// Marks the type as a dictionary in its annotation.
    pub is_dictionary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    /// Member names and values in declaration order.
    pub members: Vec<(String, i64)>,
    /// Written as an `xs:list` of the members.
    pub flags: bool,
}

/// A simple type restricting a builtin one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictedType {
    pub name: String,
    pub base: QualifiedName,
    pub pattern: Option<&'static str>,
    pub min_inclusive: Option<&'static str>,
    pub max_inclusive: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDefinition {
    Complex(ComplexType),
    Enum(EnumType),
    Restricted(RestrictedType),
}

impl TypeDefinition {
    pub fn name(&self) -> &str {
        match self {
            Self::Complex(ty) => &ty.name,
            Self::Enum(ty) => &ty.name,
            Self::Restricted(ty) => &ty.name,
        }
    }
}

/// A top-level element declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementDeclaration {
    pub name: String,
    pub type_name: QualifiedName,
    pub nillable: bool,
}

// -----------------------------------------------------------------------------
// Schema

/// The schema of one target namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    target_namespace: String,
    imports: BTreeSet<String>,
    types: Vec<TypeDefinition>,
    elements: Vec<ElementDeclaration>,
}

impl Schema {
    pub(crate) fn new(target_namespace: impl Into<String>) -> Self {
        Self {
            target_namespace: target_namespace.into(),
            imports: BTreeSet::new(),
            types: Vec::new(),
            elements: Vec::new(),
        }
    }

    #[inline]
    pub fn target_namespace(&self) -> &str {
        &self.target_namespace
    }

    /// Namespaces whose types this schema refers to.
    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(String::as_str)
    }

    #[inline]
    pub fn types(&self) -> &[TypeDefinition] {
        &self.types
    }

    #[inline]
    pub fn elements(&self) -> &[ElementDeclaration] {
        &self.elements
    }

    pub fn type_definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.iter().find(|ty| ty.name() == name)
    }

    pub fn element(&self, name: &str) -> Option<&ElementDeclaration> {
        self.elements.iter().find(|el| el.name == name)
    }

    fn refer(&mut self, name: &QualifiedName) {
        if name.namespace != namespaces::XS && name.namespace != self.target_namespace {
            self.imports.insert(name.namespace.clone());
        }
    }

    fn refer_particles(&mut self, particles: &[Particle]) {
        for particle in particles {
            if let Some(name) = &particle.type_name {
                self.refer(name);
            }
            if let Some(entry) = &particle.entry {
                self.refer_particles(entry);
            }
        }
    }

    pub(crate) fn add_type(&mut self, definition: TypeDefinition) {
        match &definition {
            TypeDefinition::Complex(ty) => {
                if let Some(base) = &ty.base {
                    self.refer(base);
                }
                self.refer_particles(&ty.sequence);
            }
            TypeDefinition::Enum(_) => {}
            TypeDefinition::Restricted(ty) => self.refer(&ty.base),
        }
        self.types.push(definition);
    }

    pub(crate) fn add_element(&mut self, element: ElementDeclaration) {
        self.refer(&element.type_name);
        self.elements.push(element);
    }

    /// Renders the schema document, without an XML declaration.
    ///
    /// The target namespace is bound to `tns`, the serialization namespace
    /// to `ser` and other imported namespaces to `q1`, `q2`, ...
    pub fn to_xml(&self) -> Result<String> {
        let mut w = XmlWriter::new(Vec::new());
        w.start_prefixed_element("xs", "schema", namespaces::XS)?;
        w.attribute("", "elementFormDefault", "qualified")?;
        if !self.target_namespace.is_empty() {
            w.attribute("", "targetNamespace", &self.target_namespace)?;
            w.ensure_prefix("tns", &self.target_namespace)?;
        }
        for (index, import) in self.imports.iter().enumerate() {
            let preferred = if import == namespaces::SERIALIZATION {
                "ser".to_string()
            } else {
                format!("q{}", index + 1)
            };
            w.ensure_prefix(&preferred, import)?;
        }

        for import in &self.imports {
            w.start_element("import", namespaces::XS)?;
            w.attribute("", "namespace", import)?;
            w.end_element()?;
        }
        for definition in &self.types {
            write_type(&mut w, definition)?;
        }
        for element in &self.elements {
            w.start_element("element", namespaces::XS)?;
            w.attribute("", "name", &element.name)?;
            if element.nillable {
                w.attribute("", "nillable", "true")?;
            }
            let ty = w.qualified_value(&element.type_name.name, &element.type_name.namespace)?;
            w.attribute("", "type", &ty)?;
            w.end_element()?;
        }
        w.end_element()?;

        String::from_utf8(w.into_inner()).map_err(|e| Error::MalformedContent(e.to_string()))
    }
}

// -----------------------------------------------------------------------------
// Rendering

fn write_particles<W: std::io::Write>(w: &mut XmlWriter<W>, particles: &[Particle]) -> Result<()> {
    w.start_element("sequence", namespaces::XS)?;
    for particle in particles {
        w.start_element("element", namespaces::XS)?;
        if particle.min_occurs != 1 {
            w.attribute("", "minOccurs", &particle.min_occurs.to_string())?;
        }
        if particle.unbounded {
            w.attribute("", "maxOccurs", "unbounded")?;
        }
        w.attribute("", "name", &particle.name)?;
        if particle.nillable {
            w.attribute("", "nillable", "true")?;
        }
        if let Some(name) = &particle.type_name {
            let ty = w.qualified_value(&name.name, &name.namespace)?;
            w.attribute("", "type", &ty)?;
        }
        if let Some(entry) = &particle.entry {
            w.start_element("complexType", namespaces::XS)?;
            write_particles(w, entry)?;
            w.end_element()?;
        }
        w.end_element()?;
    }
    w.end_element()
}

fn write_appinfo<W: std::io::Write>(w: &mut XmlWriter<W>, local: &str, text: &str) -> Result<()> {
    w.start_element("annotation", namespaces::XS)?;
    w.start_element("appinfo", namespaces::XS)?;
    w.start_element(local, namespaces::SERIALIZATION)?;
    w.text(text)?;
    w.end_element()?;
    w.end_element()?;
    w.end_element()
}

fn write_type<W: std::io::Write>(w: &mut XmlWriter<W>, definition: &TypeDefinition) -> Result<()> {
    match definition {
        TypeDefinition::Complex(ty) => {
            w.start_element("complexType", namespaces::XS)?;
            w.attribute("", "name", &ty.name)?;
            if ty.is_dictionary {
                write_appinfo(w, "IsDictionary", "true")?;
            }
            if let Some(base) = &ty.base {
                w.start_element("complexContent", namespaces::XS)?;
                w.attribute("", "mixed", "false")?;
                w.start_element("extension", namespaces::XS)?;
                let base = w.qualified_value(&base.name, &base.namespace)?;
                w.attribute("", "base", &base)?;
                write_particles(w, &ty.sequence)?;
                w.end_element()?;
                w.end_element()?;
            } else if ty.open {
                w.start_element("sequence", namespaces::XS)?;
                w.start_element("any", namespaces::XS)?;
                w.attribute("", "minOccurs", "0")?;
                w.attribute("", "maxOccurs", "unbounded")?;
                w.attribute("", "namespace", "##local")?;
                w.attribute("", "processContents", "skip")?;
                w.end_element()?;
                w.end_element()?;
            } else {
                write_particles(w, &ty.sequence)?;
            }
            w.end_element()
        }
        TypeDefinition::Enum(ty) => {
            w.start_element("simpleType", namespaces::XS)?;
            w.attribute("", "name", &ty.name)?;
            if ty.flags {
                w.start_element("list", namespaces::XS)?;
                w.start_element("simpleType", namespaces::XS)?;
            }
            w.start_element("restriction", namespaces::XS)?;
            w.attribute("", "base", "xs:string")?;
            for (name, value) in &ty.members {
                w.start_element("enumeration", namespaces::XS)?;
                w.attribute("", "value", name)?;
                if ty.flags {
                    write_appinfo(w, "EnumerationValue", &value.to_string())?;
                }
                w.end_element()?;
            }
            w.end_element()?;
            if ty.flags {
                w.end_element()?;
                w.end_element()?;
            }
            w.end_element()
        }
        TypeDefinition::Restricted(ty) => {
            w.start_element("simpleType", namespaces::XS)?;
            w.attribute("", "name", &ty.name)?;
            w.start_element("restriction", namespaces::XS)?;
            let base = w.qualified_value(&ty.base.name, &ty.base.namespace)?;
            w.attribute("", "base", &base)?;
            let facets = [
                ("pattern", ty.pattern),
                ("minInclusive", ty.min_inclusive),
                ("maxInclusive", ty.max_inclusive),
            ];
            for (facet, value) in facets {
                if let Some(value) = value {
                    w.start_element(facet, namespaces::XS)?;
                    w.attribute("", "value", value)?;
                    w.end_element()?;
                }
            }
            w.end_element()?;
            w.end_element()
        }
    }
}

// -----------------------------------------------------------------------------
// SchemaSet

/// Schemas of an export, keyed by target namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSet {
    schemas: BTreeMap<String, Schema>,
}

impl SchemaSet {
    pub(crate) fn schema_mut(&mut self, namespace: &str) -> &mut Schema {
        self.schemas
            .entry(namespace.to_string())
            .or_insert_with(|| Schema::new(namespace))
    }

    pub fn get(&self, namespace: &str) -> Option<&Schema> {
        self.schemas.get(namespace)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
