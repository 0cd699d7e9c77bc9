//! The reader engine.
//!
//! [`ObjectReader`] walks an element tree read by
//! [`read_document`](crate::xml::read_document) against the contract graph
//! and builds the [`Value`](crate::Value) graph it describes:
//!
//! - `i:nil="true"` reads as null;
//! - `i:type` selects the runtime contract through the resolver chain, an
//!   unresolvable name fails with [`NotFound`](crate::Error::NotFound);
//! - class members are matched in contract order, unknown elements go to
//!   the extension data of the class, or are skipped;
//! - `z:Id` and `z:Ref` restore shared values.

// -----------------------------------------------------------------------------
// Modules

mod reader;

// -----------------------------------------------------------------------------
// Exports

pub use reader::{ObjectReader, ReadOptions};

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::value::{ExtensionDataObject, SerializationInfo, ValueContext};
    use crate::{DataContract, DataContractSerializer, Error, FromValueError, Poly};
    use crate::{SerializableData, Value};

    const XSI: &str = "xmlns:i=\"http://www.w3.org/2001/XMLSchema-instance\"";

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
        tags: Vec<String>,
    }

    #[test]
    fn polymorphic_round_trip() {
        let serializer = DataContractSerializer::new::<Drawing>().unwrap();
        let drawing = Drawing {
            shape: Poly::new(&Circle {
                base: Shape { id: 4 },
                radius: 0.5,
            }),
            tags: vec!["a".into(), "b".into()],
        };
        let xml = serializer.write_object_to_string(&drawing).unwrap();
        let back: Drawing = serializer.read_object(&xml).unwrap();

        assert_eq!(back.tags, drawing.tags);
        let circle = back.shape.downcast::<Circle>().unwrap();
        assert_eq!(circle.base.id, 4);
        assert_eq!(circle.radius, 0.5);
    }

    #[test]
    fn unknown_type_names_are_not_found() {
        let serializer = DataContractSerializer::new::<Drawing>().unwrap();
        let xml = alloc::format!(
            "<Drawing xmlns=\"urn:shapes\" {XSI} xmlns:q=\"urn:q\">\
             <shape i:type=\"q:Square\"><id>1</id></shape></Drawing>"
        );
        let err = serializer.read_object::<Drawing>(&xml).err();
        assert!(
            matches!(&err, Some(Error::NotFound { name, namespace }) if name == "Square" && namespace == "urn:q"),
            "{err:?}"
        );
    }

    #[test]
    fn root_name_is_verified() {
        let serializer = DataContractSerializer::new::<Shape>().unwrap();
        let xml = "<Other xmlns=\"urn:shapes\"><id>1</id></Other>";
        let err = serializer.read_object::<Shape>(xml).err();
        assert!(matches!(err, Some(Error::UnexpectedElement(_))), "{err:?}");

        let value = serializer.read_value(xml, false).unwrap();
        assert!(matches!(value, Value::Class(_)));
        assert!(!serializer.is_start_object(xml).unwrap());
        assert!(serializer.is_start_object("<Shape xmlns=\"urn:shapes\"/>").unwrap());
    }

    #[test]
    fn members_may_be_missing_or_out_of_order() {
        let serializer = DataContractSerializer::new::<Circle>().unwrap();
        // Members match forward only, so an `id` after `radius` is skipped.
        let xml = "<Circle xmlns=\"urn:circles\" xmlns:s=\"urn:shapes\">\
                   <radius>3</radius><s:id>9</s:id></Circle>";
        let circle: Circle = serializer.read_object(xml).unwrap();
        assert_eq!(circle.radius, 3.0);
        assert_eq!(circle.base.id, 0);

        let empty: Circle = serializer.read_object("<Circle xmlns=\"urn:circles\"/>").unwrap();
        assert_eq!(empty, Circle::default());
    }

    #[derive(DataContract, Debug, Default, PartialEq)]
    #[data_contract(name = "Account", namespace = "urn:v")]
    struct AccountV2 {
        #[data_member(order = 0)]
        name: String,
        #[data_member(order = 1)]
        age: i32,
    }

    #[derive(DataContract, Debug, Default, PartialEq)]
    #[data_contract(name = "Account", namespace = "urn:v")]
    struct AccountV1 {
        #[data_member(order = 0)]
        name: String,
        #[data_member(extension_data)]
        extra: ExtensionDataObject,
    }

    #[test]
    fn unknown_members_survive_a_round_trip() {
        let newer = DataContractSerializer::new::<AccountV2>().unwrap();
        let older = DataContractSerializer::new::<AccountV1>().unwrap();

        let xml = newer
            .write_object_to_string(&AccountV2 {
                name: "bo".into(),
                age: 41,
            })
            .unwrap();
        let v1: AccountV1 = older.read_object(&xml).unwrap();
        assert_eq!(v1.name, "bo");
        assert_eq!(v1.extra.len(), 1);

        let again = older.write_object_to_string(&v1).unwrap();
        assert!(again.contains("<name>bo</name><age>41</age>"), "{again}");
        let v2: AccountV2 = newer.read_object(&again).unwrap();
        assert_eq!(v2.age, 41);

        let ignoring = DataContractSerializer::builder::<AccountV1>()
            .ignore_extension_data_object(true)
            .build()
            .unwrap();
        let v1: AccountV1 = ignoring.read_object(&xml).unwrap();
        assert!(v1.extra.is_empty());
    }

    #[derive(DataContract, Debug, Default, PartialEq)]
    #[data_contract(namespace = "urn:t")]
    struct Ticket {
        #[data_member(is_required)]
        number: i32,
    }

    #[test]
    fn required_members_must_be_present() {
        let serializer = DataContractSerializer::new::<Ticket>().unwrap();
        let err = serializer.read_object::<Ticket>("<Ticket xmlns=\"urn:t\"/>").err();
        assert!(matches!(err, Some(Error::UnexpectedElement(_))), "{err:?}");

        let ticket: Ticket = serializer
            .read_object("<Ticket xmlns=\"urn:t\"><number>7</number></Ticket>")
            .unwrap();
        assert_eq!(ticket.number, 7);
    }

    #[test]
    fn malformed_text_is_rejected() {
        let serializer = DataContractSerializer::new::<Ticket>().unwrap();
        let err = serializer
            .read_object::<Ticket>("<Ticket xmlns=\"urn:t\"><number>seven</number></Ticket>")
            .err();
        assert!(matches!(err, Some(Error::MalformedContent(_))), "{err:?}");
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
    fn shared_references_are_restored() {
        let serializer = DataContractSerializer::new::<Pair>().unwrap();
        let person = Arc::new(Person { name: "ann".into() });
        let pair = Pair {
            first: Some(person.clone()),
            second: Some(person),
        };
        let xml = serializer.write_object_to_string(&pair).unwrap();
        let back: Pair = serializer.read_object(&xml).unwrap();

        let (Some(first), Some(second)) = (&back.first, &back.second) else {
            panic!("both members should be present: {back:?}");
        };
        assert!(Arc::ptr_eq(first, second));
        assert_eq!(first.name, "ann");

        let dangling = "<Pair xmlns=\"urn:t\" \
                        xmlns:z=\"http://schemas.microsoft.com/2003/10/Serialization/\">\
                        <first z:Ref=\"i9\"/></Pair>";
        let err = serializer.read_object::<Pair>(dangling).err();
        assert!(matches!(err, Some(Error::UnexpectedElement(_))), "{err:?}");
    }

    #[test]
    fn dictionaries_round_trip() {
        let serializer = DataContractSerializer::new::<BTreeMap<String, i32>>().unwrap();
        let mut map = BTreeMap::new();
        map.insert(String::from("one"), 1);
        map.insert(String::from("two"), 2);

        let xml = serializer.write_object_to_string(&map).unwrap();
        assert!(
            xml.contains("<KeyValueOfstringint><Key>one</Key><Value>1</Value></KeyValueOfstringint>"),
            "{xml}"
        );
        let back: BTreeMap<String, i32> = serializer.read_object(&xml).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn read_quota_counts_items() {
        let serializer = DataContractSerializer::builder::<Vec<i32>>()
            .max_items_in_object_graph(2)
            .build()
            .unwrap();
        let xml = "<ArrayOfint xmlns=\"http://schemas.microsoft.com/2003/10/Serialization/Arrays\">\
                   <int>1</int><int>2</int></ArrayOfint>";
        let err = serializer.read_object::<Vec<i32>>(xml).err();
        assert!(matches!(err, Some(Error::QuotaExceeded { limit: 2 })), "{err:?}");
    }

    #[test]
    fn object_slots_keep_typed_primitives() {
        let serializer = DataContractSerializer::new::<Vec<Value>>().unwrap();
        let xml = "<ArrayOfanyType xmlns=\"http://schemas.microsoft.com/2003/10/Serialization/Arrays\" \
                   xmlns:i=\"http://www.w3.org/2001/XMLSchema-instance\" \
                   xmlns:x=\"http://www.w3.org/2001/XMLSchema\">\
                   <anyType i:type=\"x:int\">5</anyType><anyType i:nil=\"true\"/></ArrayOfanyType>";
        let items: Vec<Value> = serializer.read_object(xml).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], Value::Primitive(crate::value::Primitive::Int(5)));
        assert!(items[1].is_null());
    }

    #[test]
    fn untyped_object_slots_hold_only_text() {
        let serializer = DataContractSerializer::new::<Vec<Value>>().unwrap();
        let xml = "<ArrayOfanyType xmlns=\"http://schemas.microsoft.com/2003/10/Serialization/Arrays\">\
                   <anyType>plain</anyType><anyType><x>1</x></anyType></ArrayOfanyType>";
        let err = serializer.read_object::<Vec<Value>>(xml).err();
        assert!(matches!(err, Some(Error::UnexpectedElement(_))), "{err:?}");
    }

    #[derive(DataContract, Debug, Default, PartialEq)]
    #[data_contract(namespace = "urn:p")]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(DataContract, Debug, PartialEq)]
    #[data_contract(custom, namespace = "urn:r", known_type(Point))]
    struct Reading {
        label: String,
        at: Point,
        level: f64,
    }

    impl SerializableData for Reading {
        fn get_object_data(&self, info: &mut SerializationInfo, cx: &mut ValueContext) {
            info.add_value("label", &self.label, cx);
            info.add_value("at", &self.at, cx);
            info.add_value("level", &self.level, cx);
        }

        fn from_object_data(
            info: &SerializationInfo,
            cx: &mut ValueContext,
        ) -> Result<Self, FromValueError> {
            Ok(Self {
                label: info.get_value("label", cx)?,
                at: info.get_value("at", cx)?,
                level: info.get_value("level", cx)?,
            })
        }
    }

    /// The same entries without declaring `Point` as known.
    #[derive(DataContract, Debug, PartialEq)]
    #[data_contract(custom, namespace = "urn:r")]
    struct LooseReading(Point);

    impl SerializableData for LooseReading {
        fn get_object_data(&self, info: &mut SerializationInfo, cx: &mut ValueContext) {
            info.add_value("at", &self.0, cx);
        }

        fn from_object_data(
            info: &SerializationInfo,
            cx: &mut ValueContext,
        ) -> Result<Self, FromValueError> {
            Ok(Self(info.get_value("at", cx)?))
        }
    }

    #[test]
    fn custom_data_round_trips() {
        let serializer = DataContractSerializer::new::<Reading>().unwrap();
        let reading = Reading {
            label: "north".into(),
            at: Point { x: 3, y: -4 },
            level: 1.5,
        };
        let xml = serializer.write_object_to_string(&reading).unwrap();
        assert!(xml.contains(">north</label>"), "{xml}");
        assert!(xml.contains("i:type=\"d2p1:Point\""), "{xml}");

        let back: Reading = serializer.read_object(&xml).unwrap();
        assert_eq!(back, reading);
    }

    #[test]
    fn custom_entries_need_known_types() {
        let serializer = DataContractSerializer::new::<LooseReading>().unwrap();
        let err = serializer
            .write_object_to_string(&LooseReading(Point { x: 1, y: 2 }))
            .err();
        assert!(matches!(err, Some(Error::ContractMismatch { .. })), "{err:?}");

        let xml = "<LooseReading xmlns=\"urn:r\" \
                   xmlns:i=\"http://www.w3.org/2001/XMLSchema-instance\" xmlns:p=\"urn:p\">\
                   <at i:type=\"p:Point\" xmlns=\"\"><p:x>1</p:x><p:y>2</p:y></at></LooseReading>";
        let err = serializer.read_object::<LooseReading>(xml).err();
        assert!(
            matches!(&err, Some(Error::NotFound { name, namespace }) if name == "Point" && namespace == "urn:p"),
            "{err:?}"
        );

        let known = DataContractSerializer::builder::<LooseReading>()
            .known_type::<Point>()
            .build()
            .unwrap();
        let back: LooseReading = known.read_object(xml).unwrap();
        assert_eq!(back, LooseReading(Point { x: 1, y: 2 }));
    }
}
