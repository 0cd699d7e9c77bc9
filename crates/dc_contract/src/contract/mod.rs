//! The contract model and its per-serializer cache.
//!
//! A [`Contract`] is built once per type from its [`TypeInfo`](crate::info::TypeInfo)
//! and never changes afterwards. Contracts name each other through
//! [`ContractId`]s into the owning [`ContractCache`].
//!
//! ## Naming
//!
//! - Classes, enums and custom types: the explicit name or the type name,
//!   in the explicit namespace or the one derived from the module path
//!   (see [`module_namespace`]).
//! - Builtin primitives: their XML Schema names, e.g. `int` or `dateTime`;
//!   as a document root they live in the serialization namespace.
//! - `Vec<T>`: `ArrayOf{T}`, `BTreeMap<K, V>`: `ArrayOfKeyValueOf{K}{V}`,
//!   in the arrays namespace when the elements are builtin.
//! - `Option<T>`: the contract name of `T`.
//!
//! Names that are not valid XML names get their offending characters
//! encoded as `_xHHHH_`.

// -----------------------------------------------------------------------------
// Modules

mod builder;
mod cache;
mod model;
mod naming;

// -----------------------------------------------------------------------------
// Exports

pub use cache::ContractCache;
pub use model::{ClassData, CollectionData, Contract, ContractData, ContractId, DictionaryData};
pub use model::{EnumData, EnumMember, MemberContract, QualifiedName};
pub use naming::{NamespaceMap, module_namespace};

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use alloc::{boxed::Box, collections::BTreeMap, string::String};

    use super::{ContractCache, ContractData, NamespaceMap};
    use crate::info::{ClassInfo, KnownTypeAttributes, MethodInfo, MethodReturn, TypeInfo, Typed};
    use crate::value::ValueContext;
    use crate::{DataContract, Error, namespaces};

    fn cache() -> ContractCache {
        ContractCache::new(NamespaceMap::new())
    }

    #[derive(DataContract, Default)]
    #[data_contract(namespace = "urn:tree")]
    struct Node {
        #[data_member(order = 1)]
        value: i32,
        #[data_member(order = 0)]
        children: Vec<Node>,
        label: String,
    }

    #[test]
    fn recursive_types_terminate() {
        let cache = cache();
        let node = cache.get_or_build(Node::type_info()).unwrap();
        assert!(node.name().is("Node", "urn:tree"));

        let ContractData::Class(class) = node.data() else {
            panic!("expected a class contract");
        };
        let names: Vec<_> = class.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["children", "value", "label"]);

        let children = cache.get(class.members[0].contract).unwrap();
        assert!(children.name().is("ArrayOfNode", "urn:tree"));
        let ContractData::Collection(list) = children.data() else {
            panic!("expected a collection contract");
        };
        assert_eq!(list.item, node.id());
    }

    #[test]
    fn builtin_names() {
        let cache = cache();
        let int = cache.get_or_build(i32::type_info()).unwrap();
        assert!(int.name().is("int", namespaces::XS));
        assert!(int.root_name().is("int", namespaces::SERIALIZATION));

        let map = cache
            .get_or_build(BTreeMap::<String, i32>::type_info())
            .unwrap();
        assert!(map.name().is("ArrayOfKeyValueOfstringint", namespaces::ARRAYS));

        let nullable = cache.get_or_build(Option::<char>::type_info()).unwrap();
        assert!(nullable.name().is("char", namespaces::SERIALIZATION));

        let object = cache.get_or_build(crate::Value::type_info()).unwrap();
        assert!(object.name().is("anyType", namespaces::XS));
    }

    #[derive(DataContract, Default)]
    #[data_contract(name = "Shared", namespace = "urn:same")]
    struct Outer {
        inner: Option<Box<Inner>>,
    }

    #[derive(DataContract, Default)]
    #[data_contract(name = "Shared", namespace = "urn:same")]
    struct Inner {
        id: i32,
    }

    #[test]
    fn shared_names_stay_distinct() {
        let cache = cache();
        let outer = cache.get_or_build(Outer::type_info()).unwrap();
        let inner = cache.get_or_build(Inner::type_info()).unwrap();
        assert_eq!(outer.name(), inner.name());
        assert_ne!(outer.id(), inner.id());
    }

    #[derive(DataContract, Default)]
    struct Twice {
        #[data_member(name = "X")]
        a: i32,
        #[data_member(name = "X")]
        b: i32,
    }

    #[derive(DataContract, Default)]
    #[data_contract(name = "")]
    struct Nameless {
        a: i32,
    }

    fn assert_invalid(info: &'static TypeInfo) {
        let cache = cache();
        let err = cache.get_or_build(info).err();
        assert!(matches!(err, Some(Error::InvalidContract { .. })), "{err:?}");
        assert_eq!(cache.len(), 0, "nothing of a failed batch is published");
    }

    #[test]
    fn malformed_metadata_is_rejected() {
        assert_invalid(Twice::type_info());
        assert_invalid(Nameless::type_info());
    }

    struct Manual;

    impl crate::info::TypePath for Manual {
        fn type_path() -> &'static str {
            "tests::Manual"
        }

        fn type_name() -> &'static str {
            "Manual"
        }
    }

    fn some_types() -> Option<Vec<&'static TypeInfo>> {
        Some(alloc::vec![i32::type_info()])
    }

    fn no_types() -> Option<Vec<&'static TypeInfo>> {
        None
    }

    fn manual(known: KnownTypeAttributes, methods: &[MethodInfo]) -> &'static TypeInfo {
        Box::leak(Box::new(TypeInfo::Class(
            ClassInfo::new::<Manual>(&[])
                .with_known_types(known)
                .with_methods(methods),
        )))
    }

    #[test]
    fn provider_methods_are_checked() {
        let by_method = || KnownTypeAttributes::new().with_method("types");
        let provider = MethodInfo::known_type_provider("types", some_types);

        assert_invalid(manual(by_method(), &[]));
        assert_invalid(manual(by_method(), &[provider.with_public(false)]));
        assert_invalid(manual(by_method(), &[provider.with_static(false)]));
        assert_invalid(manual(by_method(), &[provider.with_parameters(1)]));
        assert_invalid(manual(by_method(), &[provider.with_return(MethodReturn::Unit)]));
        assert_invalid(manual(
            by_method(),
            &[MethodInfo::known_type_provider("types", no_types)],
        ));
        assert_invalid(manual(
            by_method().with_type(u8::type_info),
            &[provider],
        ));

        let cache = cache();
        let ok = cache.get_or_build(manual(by_method(), &[provider])).unwrap();
        let int = cache.lookup(i32::type_info()).unwrap();
        assert_eq!(ok.known_types(), &[int.id()]);
    }

    #[test]
    fn module_namespace_mapping() {
        let mut map = NamespaceMap::new();
        map.insert(String::from(module_path!()), String::from("urn:mapped"));
        let cache = ContractCache::new(map);
        let twice = cache.get_or_build(Inner::type_info()).unwrap();
        // An explicit namespace wins over the mapping.
        assert_eq!(twice.name().namespace, "urn:same");

        let node = cache.get_or_build(NoNamespace::type_info()).unwrap();
        assert_eq!(node.name().namespace, "urn:mapped");
    }

    #[derive(DataContract, Default)]
    struct NoNamespace {
        a: i32,
    }

    #[derive(DataContract, Default, Debug, PartialEq)]
    #[data_contract(collection, namespace = "urn:list", item_name = "Entry")]
    struct Names(Vec<String>);

    #[derive(DataContract, Default)]
    #[data_contract(collection, namespace = "urn:list")]
    struct Scores(BTreeMap<String, i32>);

    #[test]
    fn collection_contracts() {
        let cache = cache();
        let names = cache.get_or_build(Names::type_info()).unwrap();
        assert!(names.name().is("ArrayOfNamesstring", "urn:list"));
        let ContractData::Collection(list) = names.data() else {
            panic!("expected a collection contract");
        };
        assert_eq!(list.item_name, "Entry");
        assert_eq!(list.namespace, "urn:list");

        let scores = cache.get_or_build(Scores::type_info()).unwrap();
        assert!(scores.name().is("ArrayOfScoresKeyValueOfstringint", "urn:list"));
        let ContractData::Dictionary(map) = scores.data() else {
            panic!("expected a dictionary contract");
        };
        assert_eq!((map.key_name.as_str(), map.value_name.as_str()), ("Key", "Value"));

        let value = Names(alloc::vec![String::from("a")]).to_value(&mut ValueContext::new());
        assert_eq!(value.runtime_type(), Some(Names::type_info()));
        let back = Names::from_value(&value, &mut ValueContext::new());
        assert_eq!(back, Ok(Names(alloc::vec![String::from("a")])));
    }
}
