use alloc::boxed::Box;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;

use dc_utils::hash::HashMap;
use log::{trace, warn};

use crate::contract::{ClassData, CollectionData, Contract, ContractCache, ContractData};
use crate::contract::{DictionaryData, MemberContract, QualifiedName};
use crate::error::{Error, Result};
use crate::info::Typed;
use crate::namespaces;
use crate::resolver::ResolverChain;
use crate::value::{ClassValue, CollectionValue, CustomValue, DictionaryValue, EnumValue};
use crate::value::{ExtensionDataObject, Primitive, SerializationInfo, Value};
use crate::xml::XmlElement;

/// Knobs of one read.
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    pub max_items_in_object_graph: usize,
    pub ignore_extension_data_object: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            max_items_in_object_graph: i32::MAX as usize,
            ignore_extension_data_object: false,
        }
    }
}

/// The reader engine: builds a [`Value`] graph from an element tree.
pub struct ObjectReader<'a> {
    cache: &'a ContractCache,
    resolver: ResolverChain<'a>,
    options: ReadOptions,
    items: usize,
    /// `z:Id` → the shared value read for it.
    references: HashMap<String, Arc<Value>>,
}

/// One level of a class hierarchy while its members are read.
struct Level {
    contract: Arc<Contract>,
    value: ClassValue,
}

impl<'a> ObjectReader<'a> {
    pub(crate) fn new(cache: &'a ContractCache, resolver: ResolverChain<'a>, options: ReadOptions) -> Self {
        Self {
            cache,
            resolver,
            options,
            items: 0,
            references: HashMap::default(),
        }
    }

    /// Reads the document element `root`.
    ///
    /// With `verify_name`, the element must be named `root_name`.
    pub fn read_root(
        &mut self,
        root: &XmlElement,
        declared: &Arc<Contract>,
        root_name: &QualifiedName,
        verify_name: bool,
    ) -> Result<Value> {
        if verify_name && !root.name.is(&root_name.name, &root_name.namespace) {
            return Err(Error::UnexpectedElement(format!(
                "expecting element `{}` from namespace `{}`, found `{}` from namespace `{}`",
                root_name.name, root_name.namespace, root.name.local, root.name.namespace
            )));
        }
        self.read_element(root, declared)
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

    fn read_element(&mut self, element: &XmlElement, declared: &Arc<Contract>) -> Result<Value> {
        self.count_item()?;

        if let Some(reference) = element.attribute(namespaces::SERIALIZATION, "Ref") {
            let shared = self.references.get(reference.trim()).ok_or_else(|| {
                Error::UnexpectedElement(format!(
                    "element `{}` refers to `{reference}`, which was not read before",
                    element.name.local
                ))
            })?;
            return Ok(Value::Shared(shared.clone()));
        }

        if let Some(nil) = element.attribute(namespaces::XSI, "nil")
            && matches!(nil.trim(), "true" | "1")
        {
            return Ok(Value::Null);
        }

        let mut declared = declared.clone();
        while let ContractData::Nullable(inner) = declared.data() {
            declared = self.cache.contract(*inner)?;
        }

        let contract = match element.attribute(namespaces::XSI, "type") {
            Some(type_name) => {
                let (local, namespace) = element.resolve_qname(type_name)?;
                if declared.name().is(local, &namespace) {
                    declared
                } else {
                    let info = self
                        .resolver
                        .resolve_name(local, &namespace, declared.info())
                        .ok_or_else(|| Error::NotFound {
                            name: local.to_string(),
                            namespace: namespace.clone(),
                        })?;
                    self.cache.get_or_build(info)?
                }
            }
            None => declared,
        };

        let value = self.read_content(element, &contract)?;

        match element.attribute(namespaces::SERIALIZATION, "Id") {
            Some(id) => {
                let shared = Arc::new(value);
                self.references.insert(id.trim().to_string(), shared.clone());
                Ok(Value::Shared(shared))
            }
            None => Ok(value),
        }
    }

    fn read_content(&mut self, element: &XmlElement, contract: &Arc<Contract>) -> Result<Value> {
        match contract.data() {
            ContractData::Primitive(kind) => Primitive::parse(*kind, &element.text())
                .map(Value::Primitive)
                .map_err(|e| Error::MalformedContent(e.to_string())),
            // A slot of any type without `i:type` holds its text.
            ContractData::Object => {
                if element.has_child_elements() {
                    return Err(Error::UnexpectedElement(format!(
                        "element `{}` has content but no `i:type`",
                        element.name.local
                    )));
                }
                Ok(Value::Primitive(Primitive::String(element.text())))
            }
            ContractData::Enum(data) => {
                let text = element.text();
                let bits = data.parse(&text).ok_or_else(|| {
                    Error::MalformedContent(format!(
                        "`{}` is not a value of enum contract `{}`",
                        text.trim(),
                        contract.name()
                    ))
                })?;
                Ok(Value::Enum(EnumValue {
                    ty: contract.info(),
                    bits,
                }))
            }
            ContractData::Class(_) => self.read_class(element, contract),
            ContractData::Collection(data) => self.read_collection(element, contract, data),
            ContractData::Dictionary(data) => self.read_dictionary(element, contract, data),
            ContractData::Custom => self.read_custom(element, contract),
            ContractData::Nullable(inner) => {
                let inner = self.cache.contract(*inner)?;
                self.read_content(element, &inner)
            }
        }
    }

    /// The class hierarchy of `contract`, base-most first.
    fn hierarchy(&self, contract: &Arc<Contract>) -> Result<Vec<Level>> {
        let mut levels = Vec::new();
        let mut current = Some(contract.clone());
        while let Some(contract) = current {
            let ContractData::Class(data) = contract.data() else {
                return Err(Error::mismatch(contract.type_path(), "base contract is not a class"));
            };
            let fields = contract.info().as_class().map_or(0, |class| class.field_len());
            current = data.base.map(|id| self.cache.contract(id)).transpose()?;
            levels.push(Level {
                value: ClassValue::new(contract.info(), alloc::vec![None; fields]),
                contract,
            });
        }
        levels.reverse();
        Ok(levels)
    }

    fn read_class(&mut self, element: &XmlElement, contract: &Arc<Contract>) -> Result<Value> {
        let mut levels = self.hierarchy(contract)?;

        // Members in document order as `(level, member)`.
        let members: Vec<(usize, MemberContract)> = levels
            .iter()
            .enumerate()
            .flat_map(|(level, l)| match l.contract.data() {
                ContractData::Class(ClassData { members, .. }) => {
                    members.iter().map(|m| (level, m.clone())).collect::<Vec<_>>()
                }
                _ => Vec::new(),
            })
            .collect();

        let extension_level = levels.iter().rposition(|l| {
            matches!(l.contract.data(), ContractData::Class(ClassData { extension_data: true, .. }))
        });
        let mut extension = ExtensionDataObject::new();

        let mut next = 0;
        for child in element.child_elements() {
            let found = members[next..]
                .iter()
                .position(|(_, m)| child.name.is(&m.name, &m.namespace))
                .map(|offset| next + offset);

            let Some(position) = found else {
                match extension_level {
                    Some(_) if !self.options.ignore_extension_data_object => {
                        trace!(
                            "keeping unknown element `{}` of `{}` as extension data",
                            child.name.local,
                            contract.type_path()
                        );
                        extension.push(child.clone());
                    }
                    _ => warn!(
                        "dropping unknown element `{}` from namespace `{}` in `{}`",
                        child.name.local,
                        child.name.namespace,
                        contract.type_path()
                    ),
                }
                continue;
            };

            let (level, member) = &members[position];
            let member_contract = self.cache.contract(member.contract)?;
            let value = self.read_element(child, &member_contract)?;
            if let Some(slot) = levels[*level].value.members.get_mut(member.index) {
                *slot = Some(value);
            }
            next = position + 1;
        }

        for (level, member) in &members {
            let present = levels[*level]
                .value
                .members
                .get(member.index)
                .is_some_and(Option::is_some);
            if member.is_required && !present {
                return Err(Error::UnexpectedElement(format!(
                    "required member `{}` of `{}` is missing",
                    member.name,
                    levels[*level].contract.name()
                )));
            }
        }

        if let Some(level) = extension_level {
            levels[level].value.extension_data = Some(extension);
        }

        let mut value: Option<Value> = None;
        for mut level in levels {
            level.value.base = value.map(Box::new);
            value = Some(Value::Class(level.value));
        }
        value.ok_or_else(|| Error::mismatch(contract.type_path(), "class has no hierarchy"))
    }

    fn read_collection(
        &mut self,
        element: &XmlElement,
        contract: &Contract,
        data: &CollectionData,
    ) -> Result<Value> {
        let item = self.cache.contract(data.item)?;
        let mut items = Vec::new();
        for child in element.child_elements() {
            if !child.name.is(&data.item_name, &data.namespace) {
                return Err(Error::UnexpectedElement(format!(
                    "expecting item element `{}` from namespace `{}` in `{}`, found `{}`",
                    data.item_name,
                    data.namespace,
                    contract.name(),
                    child.name.local
                )));
            }
            items.push(self.read_element(child, &item)?);
        }
        Ok(Value::Collection(CollectionValue {
            ty: contract.info(),
            items,
        }))
    }

    fn read_dictionary(
        &mut self,
        element: &XmlElement,
        contract: &Contract,
        data: &DictionaryData,
    ) -> Result<Value> {
        let key_contract = self.cache.contract(data.key)?;
        let value_contract = self.cache.contract(data.value)?;

        let mut entries = Vec::new();
        for entry in element.child_elements() {
            if !entry.name.is(&data.entry_name, &data.namespace) {
                return Err(Error::UnexpectedElement(format!(
                    "expecting entry element `{}` in `{}`, found `{}`",
                    data.entry_name,
                    contract.name(),
                    entry.name.local
                )));
            }
            self.count_item()?;

            let find = |name: &str| {
                entry
                    .child_elements()
                    .find(|c| c.name.is(name, &data.namespace))
                    .ok_or_else(|| {
                        Error::UnexpectedElement(format!(
                            "entry of `{}` has no `{name}` element",
                            contract.name()
                        ))
                    })
            };
            let key = self.read_element(find(&data.key_name)?, &key_contract)?;
            let value = self.read_element(find(&data.value_name)?, &value_contract)?;
            entries.push((key, value));
        }
        Ok(Value::Dictionary(DictionaryValue {
            ty: contract.info(),
            entries,
        }))
    }

    fn read_custom(&mut self, element: &XmlElement, contract: &Contract) -> Result<Value> {
        let object = self.cache.get_or_build(Value::type_info())?;
        let mut info = SerializationInfo::new();
        for child in element.child_elements() {
            let value = self.read_element(child, &object)?;
            info.add(child.name.local.clone(), value);
        }
        Ok(Value::Custom(CustomValue {
            ty: contract.info(),
            info,
        }))
    }
}
