use alloc::collections::BTreeMap;
use alloc::format;
use alloc::sync::Arc;
use alloc::vec::Vec;

use dc_utils::hash::HashSet;
use log::debug;

use crate::contract::{Contract, ContractCache, ContractData, ContractId, NamespaceMap};
use crate::contract::{MemberContract, QualifiedName};
use crate::error::{Error, Result};
use crate::info::{PrimitiveKind, TypeInfo, Typed};
use crate::namespaces;
use crate::schema::{ComplexType, ElementDeclaration, EnumType, Particle, RestrictedType};
use crate::schema::{SchemaSet, TypeDefinition};

/// Projects contracts into XML Schema.
///
/// Types are added with [`export`](Self::export), which fails without
/// changing the exporter when the new contracts clash with exported ones.
/// [`schemas`](Self::schemas) renders everything exported so far.
///
/// ```
/// use dc_contract::DataContract;
/// use dc_contract::schema::SchemaExporter;
///
/// #[derive(DataContract, Default)]
/// #[data_contract(namespace = "urn:shop")]
/// struct Item {
///     name: String,
///     count: i32,
/// }
///
/// let mut exporter = SchemaExporter::new();
/// assert!(exporter.can_export::<Item>());
/// exporter.export::<Item>().unwrap();
///
/// let schemas = exporter.schemas().unwrap();
/// let shop = schemas.get("urn:shop").unwrap();
/// assert!(shop.type_definition("Item").is_some());
/// assert!(shop.element("Item").unwrap().nillable);
/// ```
pub struct SchemaExporter {
    cache: ContractCache,
    /// Exported contracts in export order.
    exported: Vec<ContractId>,
    names: BTreeMap<QualifiedName, ContractId>,
}

impl Default for SchemaExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaExporter {
    pub fn new() -> Self {
        Self::with_namespace_mappings(NamespaceMap::new())
    }

    pub fn with_namespace_mappings(mappings: NamespaceMap) -> Self {
        Self {
            cache: ContractCache::new(mappings),
            exported: Vec::new(),
            names: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn export<T: Typed>(&mut self) -> Result<()> {
        self.export_type(T::type_info())
    }

    /// Exports the contract of `info` and every contract it reaches,
    /// known types included.
    pub fn export_type(&mut self, info: &'static TypeInfo) -> Result<()> {
        let planned = self.plan(info)?;
        for contract in planned {
            debug!("exporting schema type {} for `{}`", contract.name(), contract.type_path());
            self.names.insert(contract.name().clone(), contract.id());
            self.exported.push(contract.id());
        }
        Ok(())
    }

    #[inline]
    pub fn can_export<T: Typed>(&self) -> bool {
        self.can_export_type(T::type_info())
    }

    /// Whether [`export_type`](Self::export_type) would succeed.
    pub fn can_export_type(&self, info: &'static TypeInfo) -> bool {
        self.plan(info).is_ok()
    }

    /// The schema type name of `T`.
    pub fn schema_type_name<T: Typed>(&self) -> Result<QualifiedName> {
        Ok(self.cache.get_or_build(T::type_info())?.name().clone())
    }

    /// Contracts `info` adds to the export, checked for name clashes.
    fn plan(&self, info: &'static TypeInfo) -> Result<Vec<Arc<Contract>>> {
        let root = self.cache.get_or_build(info)?;

        let mut planned: Vec<Arc<Contract>> = Vec::new();
        let mut names = BTreeMap::new();
        let mut visited: HashSet<ContractId> = HashSet::default();
        let mut pending = alloc::vec![root.id()];

        while let Some(id) = pending.pop() {
            if !visited.insert(id) {
                continue;
            }
            let contract = self.cache.contract(id)?;
            pending.extend(contract.known_types().iter().rev());
            match contract.data() {
                ContractData::Primitive(_) | ContractData::Object => continue,
                ContractData::Nullable(inner) => {
                    pending.push(*inner);
                    continue;
                }
                ContractData::Enum(_) | ContractData::Custom => {}
                ContractData::Class(data) => {
                    pending.extend(data.members.iter().rev().map(|m| m.contract));
                    pending.extend(data.base);
                }
                ContractData::Collection(data) => pending.push(data.item),
                ContractData::Dictionary(data) => {
                    pending.push(data.value);
                    pending.push(data.key);
                }
            }

            let name = contract.name().clone();
            let clash = self
                .names
                .get(&name)
                .or_else(|| names.get(&name))
                .filter(|other| **other != contract.id());
            if let Some(other) = clash {
                let other = self.cache.contract(*other)?;
                return Err(Error::invalid(
                    contract.type_path(),
                    format!(
                        "schema type {name} is also the name of `{}`",
                        other.type_path()
                    ),
                ));
            }
            if self.names.contains_key(&name) {
                continue;
            }
            names.insert(name, contract.id());
            planned.push(contract);
        }
        Ok(planned)
    }

    /// Renders the schemas of every exported contract.
    pub fn schemas(&self) -> Result<SchemaSet> {
        let mut set = SchemaSet::default();
        let mut uses_serialization = false;

        for id in &self.exported {
            let contract = self.cache.contract(*id)?;
            let name = contract.name();
            let definition = match contract.data() {
                ContractData::Enum(data) => TypeDefinition::Enum(EnumType {
                    name: name.name.clone(),
                    members: data
                        .members
                        .iter()
                        .map(|m| (m.name.clone(), m.value))
                        .collect(),
                    flags: data.flags,
                }),
                ContractData::Class(data) => {
                    let base = data
                        .base
                        .map(|id| self.cache.contract(id).map(|c| c.name().clone()))
                        .transpose()?;
                    TypeDefinition::Complex(ComplexType {
                        name: name.name.clone(),
                        base,
                        sequence: self.members(&data.members, &mut uses_serialization)?,
                        open: false,
                        is_dictionary: false,
                    })
                }
                ContractData::Collection(data) => {
                    let item = self.cache.contract(data.item)?;
                    let mut particle = self.particle(&data.item_name, &item, &mut uses_serialization)?;
                    particle.min_occurs = 0;
                    particle.unbounded = true;
                    TypeDefinition::Complex(ComplexType {
                        name: name.name.clone(),
                        base: None,
                        sequence: alloc::vec![particle],
                        open: false,
                        is_dictionary: false,
                    })
                }
                ContractData::Dictionary(data) => {
                    let key = self.cache.contract(data.key)?;
                    let value = self.cache.contract(data.value)?;
                    let entry = Particle {
                        name: data.entry_name.clone(),
                        type_name: None,
                        min_occurs: 0,
                        unbounded: true,
                        nillable: false,
                        entry: Some(alloc::vec![
                            self.particle(&data.key_name, &key, &mut uses_serialization)?,
                            self.particle(&data.value_name, &value, &mut uses_serialization)?,
                        ]),
                    };
                    TypeDefinition::Complex(ComplexType {
                        name: name.name.clone(),
                        base: None,
                        sequence: alloc::vec![entry],
                        open: false,
                        is_dictionary: true,
                    })
                }
                ContractData::Custom => TypeDefinition::Complex(ComplexType {
                    name: name.name.clone(),
                    base: None,
                    sequence: Vec::new(),
                    open: true,
                    is_dictionary: false,
                }),
                ContractData::Primitive(_) | ContractData::Object | ContractData::Nullable(_) => {
                    continue;
                }
            };

            let schema = set.schema_mut(&name.namespace);
            schema.add_type(definition);
            let root = contract.root_name();
            let schema = set.schema_mut(&root.namespace);
            schema.add_element(ElementDeclaration {
                name: root.name.clone(),
                type_name: name.clone(),
                nillable: true,
            });
        }

        if uses_serialization {
            serialization_schema(&mut set);
        }
        Ok(set)
    }

    fn members(&self, members: &[MemberContract], uses_serialization: &mut bool) -> Result<Vec<Particle>> {
        members
            .iter()
            .map(|member| {
                let contract = self.cache.contract(member.contract)?;
                let mut particle = self.particle(&member.name, &contract, uses_serialization)?;
                if !member.is_required {
                    particle.min_occurs = 0;
                }
                Ok(particle)
            })
            .collect()
    }

    fn particle(&self, name: &str, contract: &Contract, uses_serialization: &mut bool) -> Result<Particle> {
        let mut inner = self.cache.contract(contract.id())?;
        let mut nillable = false;
        while let ContractData::Nullable(id) = inner.data() {
            nillable = true;
            inner = self.cache.contract(*id)?;
        }
        if inner.name().namespace == namespaces::SERIALIZATION {
            *uses_serialization = true;
        }

        let mut particle = Particle::new(name, inner.name().clone());
        particle.nillable = nillable || !inner.is_value_type();
        Ok(particle)
    }
}

/// Simple types of the serialization namespace referenced by builtin
/// contracts.
fn serialization_schema(set: &mut SchemaSet) {
    let xs = |name: &str| QualifiedName::new(name, namespaces::XS);
    let schema = set.schema_mut(namespaces::SERIALIZATION);
    if schema.type_definition(PrimitiveKind::Char.name()).is_some() {
        return;
    }

    let definitions = [
        RestrictedType {
            name: PrimitiveKind::Char.name().into(),
            base: xs("int"),
            pattern: None,
            min_inclusive: None,
            max_inclusive: None,
        },
        RestrictedType {
            name: PrimitiveKind::TimeSpan.name().into(),
            base: xs("duration"),
            pattern: Some(r"\-?P(\d*D)?(T(\d*H)?(\d*M)?(\d*(\.\d*)?S)?)?"),
            min_inclusive: Some("-P10675199DT2H48M5.4775808S"),
            max_inclusive: Some("P10675199DT2H48M5.4775807S"),
        },
        RestrictedType {
            name: PrimitiveKind::Guid.name().into(),
            base: xs("string"),
            pattern: Some(r"[\da-fA-F]{8}-[\da-fA-F]{4}-[\da-fA-F]{4}-[\da-fA-F]{4}-[\da-fA-F]{12}"),
            min_inclusive: None,
            max_inclusive: None,
        },
    ];
    for definition in definitions {
        let type_name = QualifiedName::new(definition.name.clone(), namespaces::SERIALIZATION);
        schema.add_element(ElementDeclaration {
            name: definition.name.clone(),
            type_name,
            nillable: true,
        });
        schema.add_type(TypeDefinition::Restricted(definition));
    }
}
