use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use dc_utils::TypeIdMap;
use dc_utils::hash::HashSet;
use log::debug;

use crate::contract::naming::{collection_namespace, contract_namespace, local_name};
use crate::contract::{ClassData, CollectionData, Contract, ContractCache, ContractData};
use crate::contract::{ContractId, DictionaryData, EnumData, EnumMember, MemberContract};
use crate::contract::QualifiedName;
use crate::error::{Error, Result};
use crate::info::{DataMemberAttributes, MethodReturn, TypeInfo, TypeKind};
use crate::namespaces;

struct Header {
    name: QualifiedName,
    root_name: QualifiedName,
    is_reference: bool,
}

struct Staged {
    info: &'static TypeInfo,
    header: Header,
    declared: Vec<ContractId>,
    data: Option<ContractData>,
}

/// Builds the contracts of one type and everything it reaches.
///
/// New contracts are staged and only published by the cache once the whole
/// batch succeeded. A contract gets its id before its body is built, which
/// is what lets cyclic type graphs terminate.
pub(crate) struct Builder<'a> {
    cache: &'a ContractCache,
    published: Vec<Arc<Contract>>,
    staged: Vec<Staged>,
    by_type: TypeIdMap<ContractId>,
}

impl<'a> Builder<'a> {
    pub(crate) fn new(cache: &'a ContractCache) -> Self {
        Self {
            cache,
            published: cache.all(),
            staged: Vec::new(),
            by_type: TypeIdMap::new(),
        }
    }

    fn find(&self, info: &TypeInfo) -> Option<ContractId> {
        self.by_type
            .get(&info.type_id())
            .copied()
            .or_else(|| self.cache.lookup(info).map(|c| c.id()))
    }

    fn staged_index(&self, id: ContractId) -> Option<usize> {
        id.index().checked_sub(self.published.len())
    }

    fn name_of(&self, id: ContractId) -> Result<&QualifiedName> {
        let name = match self.staged_index(id) {
            Some(index) => self.staged.get(index).map(|s| &s.header.name),
            None => self.published.get(id.index()).map(|c| c.name()),
        };
        name.ok_or_else(|| Error::invalid("<unknown>", format!("no contract with id {}", id.0)))
    }

    fn root_name_of(&self, id: ContractId) -> Result<QualifiedName> {
        let name = match self.staged_index(id) {
            Some(index) => self.staged.get(index).map(|s| s.header.root_name.clone()),
            None => self.published.get(id.index()).map(|c| c.root_name().clone()),
        };
        name.ok_or_else(|| Error::invalid("<unknown>", format!("no contract with id {}", id.0)))
    }

    /// Returns the contract id of `info`, building it when needed.
    pub(crate) fn id_of(&mut self, info: &'static TypeInfo) -> Result<ContractId> {
        if let Some(id) = self.find(info) {
            return Ok(id);
        }

        // Element types are built while naming a collection, which may
        // already have built the collection itself through a cycle.
        let header = self.header(info)?;
        if let Some(id) = self.find(info) {
            return Ok(id);
        }

        let index = self.staged.len();
        let id = ContractId((self.published.len() + index) as u32);
        self.staged.push(Staged {
            info,
            header,
            declared: Vec::new(),
            data: None,
        });
        self.by_type.insert(info.type_id(), id);

        let data = self.body(info, id)?;
        let declared = self.declared_known_types(info)?;

        let staged = &mut self.staged[index];
        debug!(
            "built {} contract `{}` for `{}`",
            info.kind(),
            staged.header.name,
            info.type_path()
        );
        staged.data = Some(data);
        staged.declared = declared;
        Ok(id)
    }

    // -------------------------------------------------------------------------
    // Names

    fn header(&mut self, info: &'static TypeInfo) -> Result<Header> {
        let cache = self.cache;
        let mappings = cache.mappings();
        let header = match info {
            TypeInfo::Primitive(primitive) => {
                let kind = primitive.kind();
                Header {
                    name: QualifiedName::new(kind.name(), kind.namespace()),
                    root_name: QualifiedName::new(kind.name(), namespaces::SERIALIZATION),
                    is_reference: false,
                }
            }
            TypeInfo::Object(_) => Header {
                name: QualifiedName::new("anyType", namespaces::XS),
                root_name: QualifiedName::new("anyType", namespaces::SERIALIZATION),
                is_reference: false,
            },
            TypeInfo::Enum(_) | TypeInfo::Class(_) | TypeInfo::Custom(_) => {
                let attributes = info.contract_attributes().copied().unwrap_or_default();
                if attributes.is_reference && info.kind() == TypeKind::Enum {
                    return Err(Error::invalid(
                        info.type_path(),
                        "enum contracts cannot be reference types",
                    ));
                }
                let name = QualifiedName::new(
                    local_name(info, attributes.name, info.type_name())?,
                    contract_namespace(info, attributes.namespace, mappings)?,
                );
                Header {
                    root_name: name.clone(),
                    name,
                    is_reference: attributes.is_reference,
                }
            }
            TypeInfo::Array(array) => {
                let item = self.id_of(array.item())?;
                let item = self.name_of(item)?;
                let name = QualifiedName::new(
                    format!("ArrayOf{}", item.name),
                    collection_namespace([item.namespace.as_str()]),
                );
                Header {
                    root_name: name.clone(),
                    name,
                    is_reference: false,
                }
            }
            TypeInfo::Dictionary(dictionary) => {
                let key = self.id_of(dictionary.key())?;
                let value = self.id_of(dictionary.value())?;
                let key = self.name_of(key)?;
                let value = self.name_of(value)?;
                let name = QualifiedName::new(
                    format!("ArrayOfKeyValueOf{}{}", key.name, value.name),
                    collection_namespace([value.namespace.as_str(), key.namespace.as_str()]),
                );
                Header {
                    root_name: name.clone(),
                    name,
                    is_reference: false,
                }
            }
            TypeInfo::Collection(collection) => {
                let attributes = *collection.attributes();
                let element = self.element_name(info, collection.inner())?;
                let fallback = format!("ArrayOf{}{}", info.type_name(), element);
                let name = QualifiedName::new(
                    local_name(info, attributes.name, &fallback)?,
                    contract_namespace(info, attributes.namespace, mappings)?,
                );
                Header {
                    root_name: name.clone(),
                    name,
                    is_reference: attributes.is_reference,
                }
            }
            TypeInfo::Nullable(nullable) => {
                let inner = self.id_of(nullable.inner())?;
                Header {
                    name: self.name_of(inner)?.clone(),
                    root_name: self.root_name_of(inner)?,
                    is_reference: false,
                }
            }
        };
        Ok(header)
    }

    /// Default item element name of a collection with the shape `inner`.
    fn element_name(&mut self, info: &TypeInfo, inner: &'static TypeInfo) -> Result<String> {
        match inner {
            TypeInfo::Array(array) => {
                let item = self.id_of(array.item())?;
                Ok(self.name_of(item)?.name.clone())
            }
            TypeInfo::Dictionary(dictionary) => {
                let key = self.id_of(dictionary.key())?;
                let value = self.id_of(dictionary.value())?;
                Ok(format!(
                    "KeyValueOf{}{}",
                    self.name_of(key)?.name,
                    self.name_of(value)?.name
                ))
            }
            other => Err(Error::invalid(
                info.type_path(),
                format!(
                    "a collection contract must wrap a list or a dictionary, not {}",
                    other.kind()
                ),
            )),
        }
    }

    // -------------------------------------------------------------------------
    // Bodies

    fn body(&mut self, info: &'static TypeInfo, id: ContractId) -> Result<ContractData> {
        let data = match info {
            TypeInfo::Primitive(primitive) => ContractData::Primitive(primitive.kind()),
            TypeInfo::Object(_) => ContractData::Object,
            TypeInfo::Custom(_) => ContractData::Custom,
            TypeInfo::Nullable(nullable) => ContractData::Nullable(self.id_of(nullable.inner())?),
            TypeInfo::Enum(enum_info) => {
                let mut members: Vec<EnumMember> = Vec::with_capacity(enum_info.variant_len());
                for variant in enum_info.variants() {
                    let name = local_name(info, variant.member_name(), variant.ident())?;
                    if members.iter().any(|m| m.name == name) {
                        return Err(Error::invalid(
                            info.type_path(),
                            format!("enum member name `{name}` is used twice"),
                        ));
                    }
                    members.push(EnumMember {
                        name,
                        value: variant.value(),
                    });
                }
                ContractData::Enum(EnumData {
                    flags: enum_info.is_flags(),
                    members,
                })
            }
            TypeInfo::Class(class) => {
                let base = match class.base() {
                    Some(base) if base.kind() != TypeKind::Class => {
                        return Err(Error::invalid(
                            info.type_path(),
                            format!("base `{}` is not a class contract", base.type_path()),
                        ));
                    }
                    Some(base) => Some(self.id_of(base)?),
                    None => None,
                };

                let namespace = self.name_of(id)?.namespace.clone();
                let mut members = Vec::with_capacity(class.field_len());
                for (index, field) in class.fields().iter().enumerate() {
                    let attributes = field.attributes();
                    if attributes.order < DataMemberAttributes::UNORDERED {
                        return Err(Error::invalid(
                            info.type_path(),
                            format!("member `{}` has a negative order", field.name()),
                        ));
                    }
                    members.push(MemberContract {
                        name: local_name(info, attributes.name, field.name())?,
                        namespace: namespace.clone(),
                        order: attributes.order,
                        emit_default_value: attributes.emit_default_value,
                        is_required: attributes.is_required,
                        contract: self.id_of(field.type_info())?,
                        index,
                    });
                }
                // Ordered members ascending, then unordered ones. The sort is
                // stable, ties keep declaration order.
                members.sort_by_key(|m| (m.order < 0, m.order));

                ContractData::Class(ClassData {
                    base,
                    members,
                    extension_data: class.has_extension_data(),
                })
            }
            TypeInfo::Array(array) => {
                let item = self.id_of(array.item())?;
                ContractData::Collection(CollectionData {
                    item,
                    item_name: self.name_of(item)?.name.clone(),
                    namespace: self.name_of(id)?.namespace.clone(),
                })
            }
            TypeInfo::Dictionary(_) | TypeInfo::Collection(_) => self.keyed_body(info, id)?,
        };
        Ok(data)
    }

    fn keyed_body(&mut self, info: &'static TypeInfo, id: ContractId) -> Result<ContractData> {
        let (attributes, inner) = match info {
            TypeInfo::Collection(collection) => (*collection.attributes(), collection.inner()),
            _ => (Default::default(), info),
        };
        let namespace = self.name_of(id)?.namespace.clone();
        let item_name = attributes
            .item_name
            .map(|name| local_name(info, Some(name), name))
            .transpose()?;

        match inner {
            TypeInfo::Array(array) => {
                if attributes.key_name.is_some() || attributes.value_name.is_some() {
                    return Err(Error::invalid(
                        info.type_path(),
                        "key and value names only apply to dictionary collections",
                    ));
                }
                let item = self.id_of(array.item())?;
                let item_name = match item_name {
                    Some(name) => name,
                    None => self.name_of(item)?.name.clone(),
                };
                Ok(ContractData::Collection(CollectionData {
                    item,
                    item_name,
                    namespace,
                }))
            }
            TypeInfo::Dictionary(dictionary) => {
                let key = self.id_of(dictionary.key())?;
                let value = self.id_of(dictionary.value())?;
                let entry_name = match item_name {
                    Some(name) => name,
                    None => format!("KeyValueOf{}{}", self.name_of(key)?.name, self.name_of(value)?.name),
                };
                let key_name = local_name(info, attributes.key_name, "Key")?;
                let value_name = local_name(info, attributes.value_name, "Value")?;
                if key_name == value_name {
                    return Err(Error::invalid(
                        info.type_path(),
                        "key and value names must differ",
                    ));
                }
                Ok(ContractData::Dictionary(DictionaryData {
                    key,
                    value,
                    entry_name,
                    key_name,
                    value_name,
                    namespace,
                }))
            }
            other => Err(Error::invalid(
                info.type_path(),
                format!(
                    "a collection contract must wrap a list or a dictionary, not {}",
                    other.kind()
                ),
            )),
        }
    }

    // -------------------------------------------------------------------------
    // Known types

    fn declared_known_types(&mut self, info: &'static TypeInfo) -> Result<Vec<ContractId>> {
        let Some(attributes) = info.known_type_attributes() else {
            return Ok(Vec::new());
        };
        let type_path = info.type_path();

        let types: Vec<&'static TypeInfo> = match attributes.method() {
            Some(_) if attributes.types().len() > 0 => {
                return Err(Error::invalid(
                    type_path,
                    "known types are declared both as a list and through a method",
                ));
            }
            Some(name) => {
                let method = info.methods().iter().find(|m| m.name() == name).ok_or_else(|| {
                    Error::invalid(type_path, format!("known type method `{name}` does not exist"))
                })?;
                if !method.is_public() {
                    return Err(Error::invalid(type_path, format!("known type method `{name}` is not public")));
                }
                if !method.is_static() {
                    return Err(Error::invalid(type_path, format!("known type method `{name}` is not static")));
                }
                if method.parameter_count() != 0 {
                    return Err(Error::invalid(
                        type_path,
                        format!("known type method `{name}` must not take parameters"),
                    ));
                }
                if method.returns() != MethodReturn::TypeInfoList {
                    return Err(Error::invalid(
                        type_path,
                        format!("known type method `{name}` must return a list of types"),
                    ));
                }
                method.invoke().and_then(|invoke| invoke()).ok_or_else(|| {
                    Error::invalid(type_path, format!("known type method `{name}` returned nothing"))
                })?
            }
            None => attributes.types().collect(),
        };

        let mut ids = Vec::with_capacity(types.len());
        for ty in types {
            let id = self.id_of(ty)?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    // -------------------------------------------------------------------------
    // Finish

    /// Validates the staged batch and turns it into contracts.
    pub(crate) fn finish(self) -> Result<Vec<Contract>> {
        let first = self.published.len();
        let mut built = Vec::with_capacity(self.staged.len());
        for (index, staged) in self.staged.into_iter().enumerate() {
            let data = staged.data.ok_or_else(|| {
                Error::invalid(staged.info.type_path(), "contract was left incomplete")
            })?;
            built.push(Contract {
                id: ContractId((first + index) as u32),
                info: staged.info,
                name: staged.header.name,
                root_name: staged.header.root_name,
                is_reference: staged.header.is_reference,
                known_types: staged.declared,
                data,
            });
        }

        let published = &self.published;
        let mut known = Vec::with_capacity(built.len());
        for contract in &built {
            let mut types = contract.known_types.clone();
            let mut names: HashSet<&str> = HashSet::default();
            let mut level = Some(contract);
            let mut steps = 0;
            while let Some(current) = level {
                steps += 1;
                if steps > first + built.len() {
                    return Err(Error::invalid(contract.type_path(), "base chain is cyclic"));
                }
                let ContractData::Class(class) = &current.data else {
                    break;
                };
                for member in &class.members {
                    if !names.insert(member.name.as_str()) {
                        return Err(Error::invalid(
                            contract.type_path(),
                            format!("member name `{}` is used twice", member.name),
                        ));
                    }
                }
                if !core::ptr::eq(current, contract) {
                    for id in &current.known_types {
                        if !types.contains(id) {
                            types.push(*id);
                        }
                    }
                }
                level = class.base.and_then(|id| contract_at(published, &built, id));
            }
            known.push(types);
        }

        for (contract, types) in built.iter_mut().zip(known) {
            contract.known_types = types;
        }
        Ok(built)
    }
}

fn contract_at<'c>(
    published: &'c [Arc<Contract>],
    built: &'c [Contract],
    id: ContractId,
) -> Option<&'c Contract> {
    match id.index().checked_sub(published.len()) {
        Some(index) => built.get(index),
        None => published.get(id.index()).map(|c| &**c),
    }
}
