use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use std::io::Write;

use dc_utils::hash::HashMap;

use crate::contract::{ClassData, CollectionData, Contract, ContractCache, ContractData};
use crate::contract::{DictionaryData, EnumData, QualifiedName};
use crate::error::{Error, Result};
use crate::info::Typed;
use crate::namespaces;
use crate::resolver::ResolverChain;
use crate::value::{ClassValue, Value};
use crate::xml::XmlWriter;

/// Knobs of one write.
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    pub max_items_in_object_graph: usize,
    pub ignore_extension_data_object: bool,
    pub preserve_object_references: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            max_items_in_object_graph: i32::MAX as usize,
            ignore_extension_data_object: false,
            preserve_object_references: false,
        }
    }
}

/// The writer engine: walks a [`Value`] graph against its contracts.
pub struct ObjectWriter<'a, W: Write> {
    xml: XmlWriter<W>,
    cache: &'a ContractCache,
    resolver: ResolverChain<'a>,
    options: WriteOptions,
    items: usize,
    /// Address of a written value → its `z:Id` number.
    ids: HashMap<usize, usize>,
}

impl<'a, W: Write> ObjectWriter<'a, W> {
    pub(crate) fn new(
        inner: W,
        cache: &'a ContractCache,
        resolver: ResolverChain<'a>,
        options: WriteOptions,
    ) -> Self {
        Self {
            xml: XmlWriter::new(inner),
            cache,
            resolver,
            options,
            items: 0,
            ids: HashMap::default(),
        }
    }

    pub fn write_declaration(&mut self, encoding: &str) -> Result<()> {
        self.xml.write_declaration(encoding)
    }

    pub fn into_inner(self) -> W {
        self.xml.into_inner()
    }

    /// Writes `value` as the document element `root_name`.
    pub fn write_root(
        &mut self,
        root_name: &QualifiedName,
        declared: &Arc<Contract>,
        value: &Value,
    ) -> Result<()> {
        self.write_element(&root_name.name, &root_name.namespace, declared, value)
    }

    fn count_item(&mut self) -> Result<()> {
        self.items += 1;
        if self.items > self.options.max_items_in_object_graph {
            return Err(Error::QuotaExceeded {
                limit: self.options.max_items_in_object_graph,
            });
        }
        Ok(())
    }

    fn xsi_prefix(&mut self) -> Result<String> {
        self.xml.ensure_prefix(namespaces::XSI_PREFIX, namespaces::XSI)
    }

    fn non_nullable(&self, contract: &Arc<Contract>) -> Result<Arc<Contract>> {
        let mut contract = contract.clone();
        while let ContractData::Nullable(inner) = contract.data() {
            contract = self.cache.contract(*inner)?;
        }
        Ok(contract)
    }

    fn write_element(
        &mut self,
        local: &str,
        namespace: &str,
        declared: &Arc<Contract>,
        value: &Value,
    ) -> Result<()> {
        self.count_item()?;
        let is_root = self.xml.depth() == 0;
        self.xml.start_element(local, namespace)?;

        let declared = self.non_nullable(declared)?;
        if is_root && !declared.is_builtin() {
            self.xsi_prefix()?;
        }

        let value = value.resolve();
        let Some(runtime_info) = value.runtime_type() else {
            let xsi = self.xsi_prefix()?;
            self.xml.attribute(&xsi, "nil", "true")?;
            return self.xml.end_element();
        };

        let contract = if runtime_info == declared.info() {
            declared.clone()
        } else {
            self.cache.get_or_build(runtime_info)?
        };

        let type_name = if contract.id() == declared.id() {
            None
        } else {
            let name = self
                .resolver
                .resolve_type(runtime_info, declared.info())
                .ok_or_else(|| {
                    Error::mismatch(
                        runtime_info.type_path(),
                        format!(
                            "type with contract name `{}` is not expected in a `{}` slot; \
                             add it to the known types",
                            contract.name(),
                            declared.type_path()
                        ),
                    )
                })?;
            Some(name)
        };
        if let Some(type_name) = type_name {
            let xsi = self.xsi_prefix()?;
            let text = self
                .xml
                .qualified_value(&type_name.name, &type_name.namespace)?;
            self.xml.attribute(&xsi, "type", &text)?;
        }

        let tracks_identity = !matches!(value, Value::Primitive(_) | Value::Enum(_))
            && (contract.is_reference() || self.options.preserve_object_references);
        if tracks_identity {
            let z = self
                .xml
                .ensure_prefix(namespaces::SERIALIZATION_PREFIX, namespaces::SERIALIZATION)?;
            let address = value as *const Value as usize;
            if let Some(id) = self.ids.get(&address) {
                self.xml.attribute(&z, "Ref", &format!("i{id}"))?;
                return self.xml.end_element();
            }
            let id = self.ids.len() + 1;
            self.ids.insert(address, id);
            self.xml.attribute(&z, "Id", &format!("i{id}"))?;
        }

        self.write_content(&contract, value)?;
        self.xml.end_element()
    }

    fn write_content(&mut self, contract: &Arc<Contract>, value: &Value) -> Result<()> {
        match (contract.data(), value) {
            (ContractData::Primitive(_), Value::Primitive(primitive)) => {
                if !primitive.is_exact() {
                    return Err(Error::mismatch(
                        contract.type_path(),
                        "value is finer than the 100 ns resolution of its text form",
                    ));
                }
                self.xml.text(&primitive.to_text())
            }
            (ContractData::Enum(data), Value::Enum(value)) => {
                self.write_enum(contract, data, value.bits)
            }
            (ContractData::Class(data), Value::Class(class)) => {
                self.declare_class_namespaces(contract, data)?;
                self.write_class(contract, data, class)
            }
            (ContractData::Collection(data), Value::Collection(collection)) => {
                self.write_collection(data, &collection.items)
            }
            (ContractData::Dictionary(data), Value::Dictionary(dictionary)) => {
                self.write_dictionary(data, &dictionary.entries)
            }
            (ContractData::Custom, Value::Custom(custom)) => {
                self.xml.ensure_prefix(namespaces::XS_PREFIX, namespaces::XS)?;
                let object = self.cache.get_or_build(Value::type_info())?;
                for (name, entry) in custom.info.iter() {
                    let name = dc_utils::xml_name::encode_local_name(name);
                    self.write_element(&name, "", &object, entry)?;
                }
                Ok(())
            }
            (_, value) => Err(Error::mismatch(
                contract.type_path(),
                format!("a {} value does not fit a {} contract", value.kind(), contract.kind()),
            )),
        }
    }

    fn write_enum(&mut self, contract: &Contract, data: &EnumData, bits: i64) -> Result<()> {
        let text = data.format(bits).ok_or_else(|| {
            Error::mismatch(
                contract.type_path(),
                format!("{bits} is not a valid value of enum contract `{}`", contract.name()),
            )
        })?;
        self.xml.text(&text)
    }

    /// Binds prefixes for the namespaces of a class and its bases, so
    /// members outside the element's namespace use a prefix.
    fn declare_class_namespaces(&mut self, contract: &Contract, data: &ClassData) -> Result<()> {
        self.xml.declare_namespace(&contract.name().namespace)?;
        let mut base = data.base;
        while let Some(id) = base {
            let base_contract = self.cache.contract(id)?;
            self.xml.declare_namespace(&base_contract.name().namespace)?;
            base = match base_contract.data() {
                ContractData::Class(class) => class.base,
                _ => None,
            };
        }
        Ok(())
    }

    fn write_class(&mut self, contract: &Contract, data: &ClassData, class: &ClassValue) -> Result<()> {
        if let Some(base_id) = data.base {
            let base = self.cache.contract(base_id)?;
            let ContractData::Class(base_data) = base.data() else {
                return Err(Error::mismatch(contract.type_path(), "base contract is not a class"));
            };
            match class.base.as_deref().map(Value::resolve) {
                Some(Value::Class(base_value)) => self.write_class(&base, base_data, base_value)?,
                Some(other) if !other.is_null() => {
                    return Err(Error::mismatch(
                        contract.type_path(),
                        format!("base value is a {} value", other.kind()),
                    ));
                }
                _ => {
                    let empty = ClassValue::new(base.info(), Vec::new());
                    self.write_class(&base, base_data, &empty)?;
                }
            }
        }

        let null = Value::Null;
        for member in &data.members {
            let value = class.member(member.index).unwrap_or(&null);
            if !member.emit_default_value && value.is_default() {
                if member.is_required {
                    return Err(Error::mismatch(
                        contract.type_path(),
                        format!(
                            "required member `{}` has its default value and emit_default_value is off",
                            member.name
                        ),
                    ));
                }
                continue;
            }
            let member_contract = self.cache.contract(member.contract)?;
            self.write_element(
                &member.name,
                &member.namespace,
                &member_contract,
                value,
            )?;
        }

        if data.extension_data
            && !self.options.ignore_extension_data_object
            && let Some(extension) = &class.extension_data
        {
            for element in extension.elements() {
                self.count_item()?;
                self.xml.write_element(element)?;
            }
        }
        Ok(())
    }

    fn write_collection(&mut self, data: &CollectionData, items: &[Value]) -> Result<()> {
        self.xml.declare_namespace(&data.namespace)?;
        let item = self.cache.contract(data.item)?;
        for value in items {
            self.write_element(&data.item_name, &data.namespace, &item, value)?;
        }
        Ok(())
    }

    fn write_dictionary(&mut self, data: &DictionaryData, entries: &[(Value, Value)]) -> Result<()> {
        self.xml.declare_namespace(&data.namespace)?;
        let key = self.cache.contract(data.key)?;
        let value = self.cache.contract(data.value)?;
        for (k, v) in entries {
            self.count_item()?;
            self.xml.start_element(&data.entry_name, &data.namespace)?;
            self.write_element(&data.key_name, &data.namespace, &key, k)?;
            self.write_element(&data.value_name, &data.namespace, &value, v)?;
            self.xml.end_element()?;
        }
        Ok(())
    }
}

