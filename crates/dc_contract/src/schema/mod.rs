//! XML Schema export of the contract model.
//!
//! [`SchemaExporter`] walks the same contracts the engines use, so the
//! schemas describe exactly what the writer emits:
//!
//! - classes become complex types whose sequence lists the members in
//!   contract order, optional unless required, nillable unless their
//!   contract is a value type; a base class becomes a `complexContent`
//!   extension;
//! - collections become `ArrayOf..` types with one unbounded item element,
//!   dictionaries carry an inline entry type with key and value elements;
//! - enums become string enumerations, flags enums a list of them;
//! - custom-serialized types accept any local element;
//! - every exported type gets a nillable top-level element.
//!
//! `char`, `duration` and `guid` live in the serialization namespace, whose
//! schema is added when an exported member uses one of them.

// -----------------------------------------------------------------------------
// Modules

mod exporter;
mod model;

// -----------------------------------------------------------------------------
// Exports

pub use exporter::SchemaExporter;
pub use model::{ComplexType, ElementDeclaration, EnumType, Particle, RestrictedType};
pub use model::{Schema, SchemaSet, TypeDefinition};

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::{SchemaExporter, TypeDefinition};
    use crate::contract::QualifiedName;
    use crate::{DataContract, Error, Flags, namespaces};

    #[derive(DataContract, Default)]
    #[data_contract(namespace = "urn:t")]
    struct Point {
        x: i32,
        #[data_member(is_required)]
        label: String,
    }

    #[test]
    fn class_schema_text() {
        let mut exporter = SchemaExporter::new();
        exporter.export::<Point>().unwrap();
        let schemas = exporter.schemas().unwrap();
        assert_eq!(schemas.len(), 1);

        let xml = schemas.get("urn:t").unwrap().to_xml().unwrap();
        assert_eq!(
            xml,
            "<xs:schema elementFormDefault=\"qualified\" targetNamespace=\"urn:t\" \
             xmlns:xs=\"http://www.w3.org/2001/XMLSchema\" xmlns:tns=\"urn:t\">\
             <xs:complexType name=\"Point\"><xs:sequence>\
             <xs:element minOccurs=\"0\" name=\"x\" type=\"xs:int\"/>\
             <xs:element name=\"label\" nillable=\"true\" type=\"xs:string\"/>\
             </xs:sequence></xs:complexType>\
             <xs:element name=\"Point\" nillable=\"true\" type=\"tns:Point\"/>\
             </xs:schema>"
        );
    }

    #[derive(DataContract, Default)]
    #[data_contract(namespace = "urn:shapes", known_type(Circle))]
    struct Shape {
        id: i32,
    }

    #[derive(DataContract, Default)]
    #[data_contract(namespace = "urn:circles")]
    struct Circle {
        #[data_member(base)]
        base: Shape,
        radius: f64,
    }

    #[test]
    fn bases_and_known_types_are_exported() {
        let mut exporter = SchemaExporter::new();
        exporter.export::<Shape>().unwrap();
        let schemas = exporter.schemas().unwrap();

        let circles = schemas.get("urn:circles").unwrap();
        let Some(TypeDefinition::Complex(circle)) = circles.type_definition("Circle") else {
            panic!("Circle should be a complex type");
        };
        assert_eq!(circle.base, Some(QualifiedName::new("Shape", "urn:shapes")));
        assert_eq!(circle.sequence.len(), 1);
        assert_eq!(circle.sequence[0].name, "radius");
        assert!(circles.imports().any(|ns| ns == "urn:shapes"));

        let xml = circles.to_xml().unwrap();
        assert!(xml.contains("<xs:import namespace=\"urn:shapes\"/>"), "{xml}");
        assert!(
            xml.contains("<xs:complexContent mixed=\"false\"><xs:extension base=\"q1:Shape\">"),
            "{xml}"
        );
        assert!(schemas.get("urn:shapes").unwrap().element("Shape").is_some());
    }

    #[derive(DataContract, Debug, Clone, Copy, PartialEq)]
    #[data_contract(namespace = "urn:t")]
    enum Color {
        Red,
        Green,
    }

    #[derive(DataContract, Debug, Clone, Copy, PartialEq)]
    #[data_contract(flags, namespace = "urn:t")]
    enum Access {
        Read = 1,
        Write = 2,
    }

    #[derive(DataContract, Default)]
    #[data_contract(namespace = "urn:t")]
    struct Palette {
        color: Option<Color>,
        access: Flags<Access>,
        names: Vec<String>,
        counts: BTreeMap<String, i32>,
    }

    #[test]
    fn enums_and_collections() {
        let mut exporter = SchemaExporter::new();
        exporter.export::<Palette>().unwrap();
        let schemas = exporter.schemas().unwrap();

        let t = schemas.get("urn:t").unwrap();
        let Some(TypeDefinition::Enum(color)) = t.type_definition("Color") else {
            panic!("Color should be an enum type");
        };
        assert!(!color.flags);
        assert_eq!(color.members.len(), 2);

        let xml = t.to_xml().unwrap();
        assert!(xml.contains("<xs:simpleType name=\"Access\"><xs:list><xs:simpleType>"), "{xml}");
        assert!(xml.contains("<xs:element minOccurs=\"0\" name=\"color\" nillable=\"true\" type=\"tns:Color\"/>"), "{xml}");
        assert!(xml.contains("<xs:element minOccurs=\"0\" name=\"access\" type=\"tns:Access\"/>"), "{xml}");

        let arrays = schemas.get(namespaces::ARRAYS).unwrap();
        let Some(TypeDefinition::Complex(strings)) = arrays.type_definition("ArrayOfstring") else {
            panic!("ArrayOfstring should be a complex type");
        };
        let item = &strings.sequence[0];
        assert_eq!((item.name.as_str(), item.min_occurs, item.unbounded, item.nillable), ("string", 0, true, true));

        let Some(TypeDefinition::Complex(map)) = arrays.type_definition("ArrayOfKeyValueOfstringint") else {
            panic!("the dictionary should be a complex type");
        };
        assert!(map.is_dictionary);
        let entry = map.sequence[0].entry.as_ref().unwrap();
        assert_eq!(entry[0].name, "Key");
        assert_eq!(entry[1].name, "Value");
        assert!(!entry[1].nillable);
    }

    #[derive(DataContract, Default)]
    #[data_contract(name = "Twin", namespace = "urn:twins")]
    struct Inner {
        x: i32,
    }

    #[derive(DataContract, Default)]
    #[data_contract(name = "Twin", namespace = "urn:twins")]
    struct Outer {
        inner: Inner,
    }

    #[test]
    fn clashing_names_cannot_be_exported() {
        let mut exporter = SchemaExporter::new();
        assert!(!exporter.can_export::<Outer>());
        let err = exporter.export::<Outer>().err();
        assert!(matches!(err, Some(Error::InvalidContract { .. })), "{err:?}");
        assert!(exporter.schemas().unwrap().is_empty());

        exporter.export::<Inner>().unwrap();
        assert!(exporter.can_export::<Inner>());
        assert!(!exporter.can_export::<Outer>());
    }

    #[derive(DataContract, Default)]
    #[data_contract(namespace = "urn:t")]
    struct Token {
        id: uuid::Uuid,
        mark: char,
    }

    #[test]
    fn serialization_types_come_with_their_schema() {
        let mut exporter = SchemaExporter::new();
        exporter.export::<Token>().unwrap();
        assert_eq!(
            exporter.schema_type_name::<Token>().unwrap(),
            QualifiedName::new("Token", "urn:t")
        );
        let schemas = exporter.schemas().unwrap();

        let ser = schemas.get(namespaces::SERIALIZATION).unwrap();
        assert!(ser.type_definition("guid").is_some());
        assert!(ser.type_definition("char").is_some());
        assert!(ser.element("duration").is_some());

        let xml = schemas.get("urn:t").unwrap().to_xml().unwrap();
        assert!(xml.contains("xmlns:ser=\"http://schemas.microsoft.com/2003/10/Serialization/\""), "{xml}");
        assert!(xml.contains("type=\"ser:guid\""), "{xml}");
        let namespaces: Vec<&str> = schemas.namespaces().collect();
        assert_eq!(namespaces.len(), 2);
    }
}
