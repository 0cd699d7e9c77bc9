//! The writer engine.
//!
//! [`ObjectWriter`] walks a [`Value`](crate::Value) graph against the
//! contract graph and emits elements through an
//! [`XmlWriter`](crate::xml::XmlWriter):
//!
//! - null values become `i:nil="true"` elements;
//! - a value whose runtime type differs from the declared one gets an
//!   `i:type` named by the resolver chain, or fails with
//!   [`ContractMismatch`](crate::Error::ContractMismatch);
//! - class members follow contract order, base members first;
//! - collections write one item element per value, dictionaries one entry
//!   with key and value children per pair;
//! - reference contracts carry `z:Id`, repeated shared values `z:Ref`.
//!
//! Most callers go through [`DataContractSerializer`](crate::DataContractSerializer).

// -----------------------------------------------------------------------------
// Modules

mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use writer::{ObjectWriter, WriteOptions};

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::{DataContract, DataContractSerializer, Error, Flags, Poly};

    const XSI: &str = "xmlns:i=\"http://www.w3.org/2001/XMLSchema-instance\"";

    fn body(xml: &str) -> &str {
        xml.split_once("?>").map_or(xml, |(_, rest)| rest)
    }

    #[derive(DataContract, Debug, Default, PartialEq)]
    #[data_contract(namespace = "urn:t")]
    struct Defaults {
        #[data_member(order = 0)]
        name: Option<String>,
        #[data_member(order = 1, emit_default_value = false)]
        count: i32,
        #[data_member(order = 2, emit_default_value = false)]
        note: Option<String>,
    }

    #[test]
    fn nil_and_default_suppression() {
        let serializer = DataContractSerializer::new::<Defaults>().unwrap();
        let xml = serializer.write_object_to_string(&Defaults::default()).unwrap();
        assert_eq!(
            body(&xml),
            alloc::format!("<Defaults xmlns=\"urn:t\" {XSI}><name i:nil=\"true\"/></Defaults>")
        );
    }

    #[derive(DataContract, Debug, Default, PartialEq)]
    #[data_contract(namespace = "urn:t")]
    struct MustHave {
        #[data_member(emit_default_value = false, is_required)]
        count: i32,
    }

    #[test]
    fn required_defaults_cannot_be_skipped() {
        let serializer = DataContractSerializer::new::<MustHave>().unwrap();
        let err = serializer.write_object_to_string(&MustHave::default()).err();
        assert!(matches!(err, Some(Error::ContractMismatch { .. })), "{err:?}");
    }

    #[derive(DataContract, Debug, Clone, Copy, PartialEq)]
    #[data_contract(flags, namespace = "urn:t")]
    enum Access {
        Read = 1,
        Write = 2,
        All = 3,
        Exec = 4,
    }

    #[derive(DataContract, Debug, Default, PartialEq)]
    #[data_contract(namespace = "urn:t")]
    struct Holder {
        #[data_member(name = "Flags")]
        flags: Flags<Access>,
    }

    #[test]
    fn flags_write_named_combinations() {
        let serializer = DataContractSerializer::new::<Holder>().unwrap();
        let all = Holder {
            flags: Flags::from(Access::Read) | Access::Write,
        };
        let xml = serializer.write_object_to_string(&all).unwrap();
        assert!(xml.contains("<Flags>All</Flags>"), "{xml}");

        let mixed = Holder {
            flags: Flags::from(Access::Read) | Access::Exec,
        };
        let xml = serializer.write_object_to_string(&mixed).unwrap();
        assert!(xml.contains("<Flags>Read Exec</Flags>"), "{xml}");

        let bogus = Holder {
            flags: Flags::from_bits(64),
        };
        assert!(serializer.write_object_to_string(&bogus).is_err());
    }

    #[test]
    fn primitive_roots_use_serialization_namespace() {
        let serializer = DataContractSerializer::new::<i32>().unwrap();
        let xml = serializer.write_object_to_string(&5).unwrap();
        assert_eq!(
            body(&xml),
            "<int xmlns=\"http://schemas.microsoft.com/2003/10/Serialization/\">5</int>"
        );
    }

    #[test]
    fn primitive_lists_live_in_arrays() {
        let serializer = DataContractSerializer::new::<Vec<i32>>().unwrap();
        let xml = serializer.write_object_to_string(&vec![1, 2]).unwrap();
        assert_eq!(
            body(&xml),
            alloc::format!(
                "<ArrayOfint xmlns=\"http://schemas.microsoft.com/2003/10/Serialization/Arrays\" {XSI}>\
                 <int>1</int><int>2</int></ArrayOfint>"
            )
        );
    }

    #[derive(DataContract, Debug, Default, PartialEq)]
    #[data_contract(namespace = "urn:t")]
    struct Numbers {
        values: Vec<i32>,
    }

    #[test]
    fn nested_arrays_get_a_prefix() {
        let serializer = DataContractSerializer::new::<Numbers>().unwrap();
        let xml = serializer
            .write_object_to_string(&Numbers { values: vec![7] })
            .unwrap();
        assert!(
            xml.contains(
                "<values xmlns:d2p1=\"http://schemas.microsoft.com/2003/10/Serialization/Arrays\">\
                 <d2p1:int>7</d2p1:int></values>"
            ),
            "{xml}"
        );
    }

    #[derive(DataContract, Debug, Default, PartialEq)]
    #[data_contract(namespace = "urn:shapes", known_type(Circle))]
    struct Shape {
        id: i32,
    }

    #[derive(DataContract, Debug, Default, PartialEq)]
    #[data_contract(namespace = "urn:circles")]
    struct Circle {
        #[data_member(base)]
        base: Shape,
        radius: f64,
    }

    #[derive(DataContract, Debug, Default, PartialEq)]
    #[data_contract(namespace = "urn:shapes")]
    struct Drawing {
        shape: Poly<Shape>,
    }

    #[derive(DataContract, Debug, Default, PartialEq)]
    #[data_contract(namespace = "urn:other")]
    struct Stranger {
        x: i32,
    }

    #[test]
    fn derived_values_carry_their_type() {
        let serializer = DataContractSerializer::new::<Drawing>().unwrap();
        let drawing = Drawing {
            shape: Poly::new(&Circle {
                base: Shape { id: 1 },
                radius: 2.5,
            }),
        };
        let xml = serializer.write_object_to_string(&drawing).unwrap();
        assert_eq!(
            body(&xml),
            alloc::format!(
                "<Drawing xmlns=\"urn:shapes\" {XSI}>\
                 <shape i:type=\"d2p1:Circle\" xmlns:d2p1=\"urn:circles\">\
                 <id>1</id><d2p1:radius>2.5</d2p1:radius></shape></Drawing>"
            )
        );

        let stranger = Drawing {
            shape: Poly::new(&Stranger { x: 1 }),
        };
        let err = serializer.write_object_to_string(&stranger).err();
        assert!(matches!(err, Some(Error::ContractMismatch { .. })), "{err:?}");
    }

    #[derive(DataContract, Debug, Default, PartialEq)]
    #[data_contract(namespace = "urn:t", is_reference)]
    struct Person {
        name: String,
    }

    #[derive(DataContract, Debug, Default, PartialEq)]
    #[data_contract(namespace = "urn:t")]
    struct Pair {
        #[data_member(order = 0)]
        first: Option<Arc<Person>>,
        #[data_member(order = 1)]
        second: Option<Arc<Person>>,
    }

    #[test]
    fn shared_references_are_written_once() {
        let serializer = DataContractSerializer::new::<Pair>().unwrap();
        let person = Arc::new(Person { name: "ann".into() });
        let pair = Pair {
            first: Some(person.clone()),
            second: Some(person),
        };
        let xml = serializer.write_object_to_string(&pair).unwrap();
        assert!(
            xml.contains(
                "<first z:Id=\"i1\" xmlns:z=\"http://schemas.microsoft.com/2003/10/Serialization/\">\
                 <name>ann</name></first><second z:Ref=\"i1\" \
                 xmlns:z=\"http://schemas.microsoft.com/2003/10/Serialization/\"/>"
            ),
            "{xml}"
        );
    }

    #[test]
    fn quota_is_enforced() {
        let serializer = DataContractSerializer::builder::<Vec<i32>>()
            .max_items_in_object_graph(3)
            .build()
            .unwrap();
        assert!(serializer.write_object_to_string(&vec![1, 2]).is_ok());
        let err = serializer.write_object_to_string(&vec![1, 2, 3]).err();
        assert!(matches!(err, Some(Error::QuotaExceeded { limit: 3 })), "{err:?}");
    }

    #[test]
    fn control_characters_are_escaped() {
        let serializer = DataContractSerializer::new::<String>().unwrap();
        let xml = serializer.write_object_to_string(&String::from("a\u{6}b")).unwrap();
        assert!(xml.contains(">a&#x6;b</string>"), "{xml}");
    }

    #[test]
    fn sub_tick_times_are_rejected() {
        use chrono::{FixedOffset, TimeDelta, TimeZone};

        use crate::impls::DateTimeOffset;

        let offset = FixedOffset::east_opt(3600).unwrap();
        let at = offset.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();

        let serializer = DataContractSerializer::new::<DateTimeOffset>().unwrap();
        let finer = DateTimeOffset(at + TimeDelta::nanoseconds(1));
        let err = serializer.write_object_to_string(&finer).err();
        assert!(matches!(err, Some(Error::ContractMismatch { .. })), "{err:?}");

        let tick = DateTimeOffset(at + TimeDelta::nanoseconds(100));
        let xml = serializer.write_object_to_string(&tick).unwrap();
        assert!(xml.contains("<DateTime>2024-05-01T09:00:00.0000001Z</DateTime>"), "{xml}");
        assert_eq!(serializer.read_object::<DateTimeOffset>(&xml).unwrap(), tick);

        let serializer = DataContractSerializer::new::<TimeDelta>().unwrap();
        let err = serializer.write_object_to_string(&TimeDelta::nanoseconds(150)).err();
        assert!(matches!(err, Some(Error::ContractMismatch { .. })), "{err:?}");
    }
}
