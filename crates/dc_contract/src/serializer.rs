use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use std::io::Write;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::contract::{Contract, ContractCache, NamespaceMap, QualifiedName};
use crate::de::{ObjectReader, ReadOptions};
use crate::error::{Error, Result};
use crate::info::{TypeInfo, Typed};
use crate::known_types::KnownTypeSet;
use crate::resolver::{ContractResolver, KnownTypeResolver, ResolverChain};
use crate::ser::{ObjectWriter, WriteOptions};
use crate::value::{DataContract, Value, ValueContext};
use crate::xml::read_document;

// -----------------------------------------------------------------------------
// SerializerSettings

/// One module path → contract namespace override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceMapping {
    pub module: String,
    pub namespace: String,
}

/// The data part of a serializer's configuration.
///
/// Known types and the custom resolver are code and live on
/// [`SerializerBuilder`]. Everything here can be loaded from a config file.
///
/// ```
/// use dc_contract::SerializerSettings;
///
/// let settings: SerializerSettings = serde_json::from_str(
///     r#"{ "root_name": "order", "max_items_in_object_graph": 1000 }"#,
/// ).unwrap();
/// assert_eq!(settings.root_name.as_deref(), Some("order"));
/// assert!(!settings.preserve_object_references);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerSettings {
    /// Local name of the document element, the root contract's by default.
    pub root_name: Option<String>,
    /// Namespace of the document element, the root contract's by default.
    pub root_namespace: Option<String>,
    pub max_items_in_object_graph: i32,
    pub ignore_extension_data_object: bool,
    pub preserve_object_references: bool,
    pub namespace_mappings: Vec<NamespaceMapping>,
}

impl Default for SerializerSettings {
    fn default() -> Self {
        Self {
            root_name: None,
            root_namespace: None,
            max_items_in_object_graph: i32::MAX,
            ignore_extension_data_object: false,
            preserve_object_references: false,
            namespace_mappings: Vec::new(),
        }
    }
}

impl SerializerSettings {
    fn namespace_map(&self, root: &'static TypeInfo) -> Result<NamespaceMap> {
        let mut map = NamespaceMap::new();
        for mapping in &self.namespace_mappings {
            if map
                .insert(mapping.module.clone(), mapping.namespace.clone())
                .is_some()
            {
                return Err(Error::invalid(
                    root.type_path(),
                    format!("module `{}` is mapped to a namespace twice", mapping.module),
                ));
            }
        }
        Ok(map)
    }
}

// -----------------------------------------------------------------------------
// SerializerBuilder

/// Configures and builds a [`DataContractSerializer`].
///
/// ```
/// use dc_contract::{DataContract, DataContractSerializer};
///
/// #[derive(DataContract, Default)]
/// struct Note {
///     text: String,
/// }
///
/// let serializer = DataContractSerializer::builder::<Note>()
///     .root_name("memo", "urn:office")
///     .known_type::<i64>()
///     .max_items_in_object_graph(64)
///     .build()
///     .unwrap();
///
/// assert_eq!(serializer.root_name().name, "memo");
/// assert_eq!(serializer.known_types().len(), 1);
/// ```
pub struct SerializerBuilder {
    root: &'static TypeInfo,
    known_types: Vec<&'static TypeInfo>,
    resolver: Option<Arc<dyn ContractResolver>>,
    settings: SerializerSettings,
}

impl SerializerBuilder {
    fn new(root: &'static TypeInfo) -> Self {
        Self {
            root,
            known_types: Vec::new(),
            resolver: None,
            settings: SerializerSettings::default(),
        }
    }

    /// Names the document element.
    pub fn root_name(mut self, name: impl Into<String>, namespace: impl Into<String>) -> Self {
        self.settings.root_name = Some(name.into());
        self.settings.root_namespace = Some(namespace.into());
        self
    }

    pub fn known_type<U: Typed>(mut self) -> Self {
        self.known_types.push(U::type_info());
        self
    }

    pub fn known_types(mut self, types: impl IntoIterator<Item = &'static TypeInfo>) -> Self {
        self.known_types.extend(types);
        self
    }

    pub fn max_items_in_object_graph(mut self, max: i32) -> Self {
        self.settings.max_items_in_object_graph = max;
        self
    }

    pub fn ignore_extension_data_object(mut self, ignore: bool) -> Self {
        self.settings.ignore_extension_data_object = ignore;
        self
    }

    pub fn preserve_object_references(mut self, preserve: bool) -> Self {
        self.settings.preserve_object_references = preserve;
        self
    }

    /// Maps the types of `module` to `namespace`.
    pub fn namespace_mapping(mut self, module: impl Into<String>, namespace: impl Into<String>) -> Self {
        self.settings.namespace_mappings.push(NamespaceMapping {
            module: module.into(),
            namespace: namespace.into(),
        });
        self
    }

    /// Installs a resolver asked before the known types.
    pub fn resolver(mut self, resolver: impl ContractResolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Replaces all data settings at once.
    pub fn settings(mut self, settings: SerializerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Builds the root and known-type contracts.
    ///
    /// Fails with [`Error::InvalidContract`] if any reachable metadata is
    /// malformed or the settings are inconsistent.
    pub fn build(self) -> Result<DataContractSerializer> {
        let Self {
            root,
            known_types,
            resolver,
            settings,
        } = self;

        if settings.max_items_in_object_graph < 0 {
            return Err(Error::invalid(
                root.type_path(),
                "max_items_in_object_graph must not be negative",
            ));
        }

        let cache = ContractCache::new(settings.namespace_map(root)?);
        let root_contract = cache.get_or_build(root)?;
        let known = KnownTypeSet::resolve(&cache, &root_contract, &known_types)?;

        let default_name = root_contract.root_name();
        let root_name = QualifiedName::new(
            settings
                .root_name
                .clone()
                .unwrap_or_else(|| default_name.name.clone()),
            settings
                .root_namespace
                .clone()
                .unwrap_or_else(|| default_name.namespace.clone()),
        );
        if root_name.name.is_empty() {
            return Err(Error::invalid(root.type_path(), "root name is empty"));
        }

        debug!(
            "serializer for `{}`: root {root_name}, {} known types ({} effective)",
            root.type_path(),
            known_types.len(),
            known.effective().len()
        );

        Ok(DataContractSerializer {
            root,
            root_name,
            cache,
            root_contract,
            explicit: known_types,
            known,
            resolver,
            settings,
        })
    }
}

// -----------------------------------------------------------------------------
// DataContractSerializer

/// Writes and reads object graphs rooted at one type.
///
/// A serializer owns its contract cache. It is immutable after
/// [`build`](SerializerBuilder::build) apart from contracts built lazily for
/// runtime types, and may be shared across threads.
///
/// ```
/// use dc_contract::DataContractSerializer;
///
/// let serializer = DataContractSerializer::new::<Vec<String>>().unwrap();
/// let xml = serializer.write_object_to_string(&vec!["a".to_string()]).unwrap();
/// assert!(xml.ends_with("<string>a</string></ArrayOfstring>"));
///
/// let back: Vec<String> = serializer.read_object(&xml).unwrap();
/// assert_eq!(back, ["a"]);
/// ```
pub struct DataContractSerializer {
    root: &'static TypeInfo,
    root_name: QualifiedName,
    cache: ContractCache,
    root_contract: Arc<Contract>,
    explicit: Vec<&'static TypeInfo>,
    known: KnownTypeSet,
    resolver: Option<Arc<dyn ContractResolver>>,
    settings: SerializerSettings,
}

impl DataContractSerializer {
    /// A serializer for `T` with default settings and no known types.
    #[inline]
    pub fn new<T: Typed>() -> Result<Self> {
        Self::builder::<T>().build()
    }

    #[inline]
    pub fn builder<T: Typed>() -> SerializerBuilder {
        SerializerBuilder::new(T::type_info())
    }

    #[inline]
    pub fn root_type(&self) -> &'static TypeInfo {
        self.root
    }

    /// Name of the document element.
    #[inline]
    pub fn root_name(&self) -> &QualifiedName {
        &self.root_name
    }

    #[inline]
    pub fn root_contract(&self) -> &Arc<Contract> {
        &self.root_contract
    }

    /// The contract of `info`, built on first use.
    pub fn contract_of(&self, info: &'static TypeInfo) -> Result<Arc<Contract>> {
        self.cache.get_or_build(info)
    }

    #[inline]
    pub fn cache(&self) -> &ContractCache {
        &self.cache
    }

    /// The known types passed to the builder.
    ///
    /// Types declared through `known_type(..)` metadata are resolved too,
    /// but are not listed here.
    #[inline]
    pub fn known_types(&self) -> &[&'static TypeInfo] {
        &self.explicit
    }

    #[inline]
    pub fn settings(&self) -> &SerializerSettings {
        &self.settings
    }

    fn resolver_chain(&self) -> ResolverChain<'_> {
        ResolverChain::new(
            self.resolver.as_ref(),
            KnownTypeResolver::new(&self.cache, &self.known),
        )
    }

    fn write_options(&self) -> WriteOptions {
        WriteOptions {
            max_items_in_object_graph: self.settings.max_items_in_object_graph as usize,
            ignore_extension_data_object: self.settings.ignore_extension_data_object,
            preserve_object_references: self.settings.preserve_object_references,
        }
    }

    fn read_options(&self) -> ReadOptions {
        ReadOptions {
            max_items_in_object_graph: self.settings.max_items_in_object_graph as usize,
            ignore_extension_data_object: self.settings.ignore_extension_data_object,
        }
    }

    fn write_document<W: Write>(&self, writer: W, encoding: &str, value: &Value) -> Result<W> {
        let mut object_writer =
            ObjectWriter::new(writer, &self.cache, self.resolver_chain(), self.write_options());
        object_writer.write_declaration(encoding)?;
        object_writer.write_root(&self.root_name, &self.root_contract, value)?;
        Ok(object_writer.into_inner())
    }

    /// Writes `value` as a UTF-8 document.
    ///
    /// A failed write leaves whatever was written so far in `writer`.
    pub fn write_object<W: Write, T: DataContract>(&self, writer: W, value: &T) -> Result<()> {
        let value = value.to_value(&mut ValueContext::new());
        self.write_value(writer, &value)
    }

    /// Writes a value graph as a UTF-8 document.
    pub fn write_value<W: Write>(&self, writer: W, value: &Value) -> Result<()> {
        self.write_document(writer, "utf-8", value)?;
        Ok(())
    }

    /// Writes `value` to a string carrying the `utf-16` declaration of a
    /// text sink.
    pub fn write_object_to_string<T: DataContract>(&self, value: &T) -> Result<String> {
        let value = value.to_value(&mut ValueContext::new());
        let bytes = self.write_document(Vec::new(), "utf-16", &value)?;
        String::from_utf8(bytes).map_err(|e| Error::MalformedContent(e.to_string()))
    }

    /// Reads a `T`, requiring the document element to be the root name.
    #[inline]
    pub fn read_object<T: DataContract>(&self, xml: &str) -> Result<T> {
        self.read_object_with(xml, true)
    }

    pub fn read_object_with<T: DataContract>(&self, xml: &str, verify_object_name: bool) -> Result<T> {
        let value = self.read_value(xml, verify_object_name)?;
        Ok(T::from_value(&value, &mut ValueContext::new())?)
    }

    /// Reads the value graph of a document.
    pub fn read_value(&self, xml: &str, verify_object_name: bool) -> Result<Value> {
        let root = read_document(xml)?;
        let mut reader = ObjectReader::new(&self.cache, self.resolver_chain(), self.read_options());
        reader.read_root(&root, &self.root_contract, &self.root_name, verify_object_name)
    }

    /// Whether the document element of `xml` is the root name.
    pub fn is_start_object(&self, xml: &str) -> Result<bool> {
        let root = read_document(xml)?;
        Ok(root.name.is(&self.root_name.name, &self.root_name.namespace))
    }
}

impl core::fmt::Debug for DataContractSerializer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DataContractSerializer")
            .field("root", &self.root.type_path())
            .field("root_name", &self.root_name)
            .field("known_types", &self.explicit.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use chrono::{FixedOffset, TimeZone};

    use crate::contract::QualifiedName;
    use crate::impls::DateTimeOffset;
    use crate::info::{TypeInfo, Typed};
    use crate::resolver::{ContractResolver, KnownTypeResolver};
    use crate::{DataContract, DataContractSerializer, Error, Poly, SerializerSettings};

    #[derive(DataContract, Debug, Default, PartialEq)]
    #[data_contract(namespace = "urn:pets", known_type(Cat))]
    struct Animal {
        name: String,
    }

    #[derive(DataContract, Debug, Default, PartialEq)]
    #[data_contract(namespace = "urn:pets")]
    struct Cat {
        #[data_member(base)]
        base: Animal,
        lives: i32,
    }

    #[derive(DataContract, Debug, Default, PartialEq)]
    #[data_contract(namespace = "urn:pets")]
    struct Pet {
        name: String,
    }

    #[derive(DataContract, Debug, Default, PartialEq)]
    #[data_contract(namespace = "urn:pets")]
    struct Kitty {
        #[data_member(base)]
        base: Pet,
        lives: i32,
    }

    #[derive(DataContract, Debug, Default, PartialEq)]
    #[data_contract(namespace = "urn:pets")]
    struct Home {
        pet: Poly<Pet>,
    }

    #[test]
    fn known_types_report_only_the_explicit_list() {
        let plain = DataContractSerializer::new::<Animal>().unwrap();
        assert!(plain.known_types().is_empty());

        let listed = DataContractSerializer::builder::<Animal>()
            .known_type::<Cat>()
            .known_type::<i64>()
            .build()
            .unwrap();
        assert_eq!(listed.known_types().len(), 2);
    }

    #[test]
    fn nullable_date_time_offset() {
        let serializer = DataContractSerializer::new::<Option<DateTimeOffset>>().unwrap();

        let xml = serializer.write_object_to_string(&None::<DateTimeOffset>).unwrap();
        assert!(xml.contains("<DateTimeOffset i:nil=\"true\" xmlns=\"http://schemas.datacontract.org/2004/07/System\""), "{xml}");
        let back: Option<DateTimeOffset> = serializer.read_object(&xml).unwrap();
        assert_eq!(back, None);

        let offset = FixedOffset::west_opt(2 * 3600).unwrap();
        let at = Some(DateTimeOffset(offset.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()));
        let xml = serializer.write_object_to_string(&at).unwrap();
        assert!(xml.contains("<DateTime>2024-05-01T12:00:00Z</DateTime>"), "{xml}");
        assert!(xml.contains("<OffsetMinutes>-120</OffsetMinutes>"), "{xml}");
        let back: Option<DateTimeOffset> = serializer.read_object(&xml).unwrap();
        assert_eq!(back, at);
    }

    #[test]
    fn root_name_and_declaration() {
        let serializer = DataContractSerializer::builder::<Pet>()
            .root_name("animal", "urn:zoo")
            .build()
            .unwrap();
        let pet = Pet { name: "rex".into() };

        let mut bytes = Vec::new();
        serializer.write_object(&mut bytes, &pet).unwrap();
        let xml = String::from_utf8(bytes).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?><animal xmlns=\"urn:zoo\""), "{xml}");
        // Members stay in the contract namespace.
        assert!(xml.contains("xmlns:d1p1=\"urn:pets\"><d1p1:name>rex</d1p1:name>"), "{xml}");

        assert_eq!(serializer.read_object::<Pet>(&xml).unwrap(), pet);
        assert!(serializer.is_start_object(&xml).unwrap());
    }

    #[test]
    fn namespace_mappings_apply_to_default_namespaces() {
        #[derive(DataContract, Debug, Default, PartialEq)]
        struct Plain {
            x: i32,
        }

        let default = DataContractSerializer::new::<Plain>().unwrap();
        assert_eq!(
            default.root_name().namespace,
            "http://schemas.datacontract.org/2004/07/dc_contract.serializer.tests"
        );

        let mapped = DataContractSerializer::builder::<Plain>()
            .namespace_mapping("dc_contract::serializer::tests", "urn:mapped")
            .build()
            .unwrap();
        assert_eq!(mapped.root_name().namespace, "urn:mapped");

        let twice = DataContractSerializer::builder::<Plain>()
            .namespace_mapping("a", "urn:a")
            .namespace_mapping("a", "urn:b")
            .build()
            .err();
        assert!(matches!(twice, Some(Error::InvalidContract { .. })), "{twice:?}");
    }

    #[test]
    fn settings_load_from_ron_and_json() {
        let from_ron: SerializerSettings = ron::from_str(
            "(root_name: Some(\"pets\"), preserve_object_references: true, \
             namespace_mappings: [(module: \"app\", namespace: \"urn:app\")])",
        )
        .unwrap();
        assert_eq!(from_ron.root_name.as_deref(), Some("pets"));
        assert_eq!(from_ron.max_items_in_object_graph, i32::MAX);
        assert_eq!(from_ron.namespace_mappings.len(), 1);

        let from_json: SerializerSettings =
            serde_json::from_str(r#"{"max_items_in_object_graph": 10}"#).unwrap();
        assert_eq!(from_json.max_items_in_object_graph, 10);
        assert!(from_json.namespace_mappings.is_empty());

        let serializer = DataContractSerializer::builder::<Pet>()
            .settings(from_ron)
            .build()
            .unwrap();
        assert_eq!(serializer.root_name().name, "pets");
        assert_eq!(serializer.root_name().namespace, "urn:pets");
        assert!(serializer.settings().preserve_object_references);

        let negative = DataContractSerializer::builder::<Pet>()
            .max_items_in_object_graph(-1)
            .build()
            .err();
        assert!(matches!(negative, Some(Error::InvalidContract { .. })), "{negative:?}");
    }

    /// Names `Kitty` as `urn:cats:kitty` without declaring it known.
    struct Cats;

    impl ContractResolver for Cats {
        fn try_resolve_type(
            &self,
            ty: &'static TypeInfo,
            _declared: &'static TypeInfo,
            _default: &KnownTypeResolver<'_>,
        ) -> Option<QualifiedName> {
            ty.is::<Kitty>().then(|| QualifiedName::new("kitty", "urn:cats"))
        }

        fn resolve_name(
            &self,
            name: &str,
            namespace: &str,
            _declared: &'static TypeInfo,
            _default: &KnownTypeResolver<'_>,
        ) -> Option<&'static TypeInfo> {
            (name == "kitty" && namespace == "urn:cats").then(Kitty::type_info)
        }
    }

    #[test]
    fn custom_resolvers_are_asked_first() {
        let home = Home {
            pet: Poly::new(&Kitty {
                base: Pet { name: "tom".into() },
                lives: 9,
            }),
        };

        let strict = DataContractSerializer::new::<Home>().unwrap();
        let err = strict.write_object_to_string(&home).err();
        assert!(matches!(err, Some(Error::ContractMismatch { .. })), "{err:?}");

        let serializer = DataContractSerializer::builder::<Home>()
            .resolver(Cats)
            .build()
            .unwrap();
        let xml = serializer.write_object_to_string(&home).unwrap();
        assert!(
            xml.contains("<pet i:type=\"d2p1:kitty\" xmlns:d2p1=\"urn:cats\">"),
            "{xml}"
        );

        let back: Home = serializer.read_object(&xml).unwrap();
        let kitty = back.pet.downcast::<Kitty>().unwrap();
        assert_eq!(kitty.lives, 9);
        assert_eq!(kitty.base.name, "tom");
    }

    #[test]
    fn preserved_references_mark_every_object() {
        let serializer = DataContractSerializer::builder::<Animal>()
            .preserve_object_references(true)
            .build()
            .unwrap();
        let xml = serializer
            .write_object_to_string(&Animal { name: "a".into() })
            .unwrap();
        assert!(xml.contains("<Animal z:Id=\"i1\""), "{xml}");
        let back: Animal = serializer.read_object(&xml).unwrap();
        assert_eq!(back.name, "a");
    }
}
