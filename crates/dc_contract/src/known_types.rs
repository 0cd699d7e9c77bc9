//! The known-type registry of a serializer.
//!
//! A serializer knows the types passed to its builder (the explicit set)
//! and, on top of those, every type declared through
//! `#[data_contract(known_type(..))]` or a provider method by any contract
//! reachable from the root or from an explicit known type (the effective
//! set). Only the explicit set is reported by
//! [`DataContractSerializer::known_types`](crate::DataContractSerializer::known_types).

use alloc::sync::Arc;
use alloc::vec::Vec;

use dc_utils::hash::HashSet;

use crate::contract::{Contract, ContractCache, ContractData, ContractId, QualifiedName};
use crate::error::Result;
use crate::info::TypeInfo;

/// Explicit and effective known types of one serializer.
///
/// ```
/// use dc_contract::contract::{ContractCache, NamespaceMap};
/// use dc_contract::info::Typed;
/// use dc_contract::known_types::KnownTypeSet;
///
/// let cache = ContractCache::new(NamespaceMap::new());
/// let root = cache.get_or_build(dc_contract::Value::type_info()).unwrap();
/// let known = KnownTypeSet::resolve(&cache, &root, &[i64::type_info(), Vec::<u8>::type_info()]).unwrap();
///
/// assert_eq!(known.explicit().len(), 2);
/// assert!(known.contains(cache.lookup(i64::type_info()).unwrap().id()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct KnownTypeSet {
    explicit: Vec<ContractId>,
    effective: Vec<ContractId>,
}

impl KnownTypeSet {
    /// Builds the explicit contracts and collects declared known types
    /// transitively from `root` and the explicit contracts.
    pub fn resolve(
        cache: &ContractCache,
        root: &Contract,
        explicit: &[&'static TypeInfo],
    ) -> Result<Self> {
        let mut explicit_ids = Vec::with_capacity(explicit.len());
        for &info in explicit {
            let id = cache.get_or_build(info)?.id();
            if !explicit_ids.contains(&id) {
                explicit_ids.push(id);
            }
        }

        let mut effective = explicit_ids.clone();
        let mut visited: HashSet<ContractId> = HashSet::default();
        let mut pending: Vec<ContractId> = Vec::with_capacity(explicit_ids.len() + 1);
        pending.push(root.id());
        pending.extend(&explicit_ids);

        while let Some(id) = pending.pop() {
            if !visited.insert(id) {
                continue;
            }
            let contract = cache.contract(id)?;
            for known in contract.known_types() {
                if !effective.contains(known) {
                    effective.push(*known);
                }
                pending.push(*known);
            }
            pending.extend(reachable(&contract));
        }

        Ok(Self {
            explicit: explicit_ids,
            effective,
        })
    }

    /// Types passed explicitly to the serializer.
    #[inline]
    pub fn explicit(&self) -> &[ContractId] {
        &self.explicit
    }

    /// Explicit types plus all declared ones.
    #[inline]
    pub fn effective(&self) -> &[ContractId] {
        &self.effective
    }

    #[inline]
    pub fn contains(&self, id: ContractId) -> bool {
        self.effective.contains(&id)
    }

    /// Effective known contracts named `name`. Several distinct contracts
    /// may share one name.
    pub fn named(&self, cache: &ContractCache, name: &QualifiedName) -> Vec<Arc<Contract>> {
        self.effective
            .iter()
            .filter_map(|id| cache.get(*id))
            .filter(|contract| contract.name() == name)
            .collect()
    }
}

/// Contracts a contract refers to directly.
fn reachable(contract: &Contract) -> Vec<ContractId> {
    match contract.data() {
        ContractData::Class(class) => class
            .base
            .into_iter()
            .chain(class.members.iter().map(|m| m.contract))
            .collect(),
        ContractData::Collection(collection) => alloc::vec![collection.item],
        ContractData::Dictionary(dictionary) => alloc::vec![dictionary.key, dictionary.value],
        ContractData::Nullable(inner) => alloc::vec![*inner],
        ContractData::Primitive(_)
        | ContractData::Enum(_)
        | ContractData::Custom
        | ContractData::Object => Vec::new(),
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::KnownTypeSet;
    use crate::contract::{ContractCache, NamespaceMap};
    use crate::info::{TypeInfo, Typed};
    use crate::{DataContract, Poly};

    #[derive(DataContract, Default, Debug, PartialEq)]
    #[data_contract(namespace = "urn:zoo", known_type(Cat))]
    struct Animal {
        name: String,
    }

    #[derive(DataContract, Default, Debug, PartialEq)]
    #[data_contract(namespace = "urn:zoo")]
    struct Cat {
        #[data_member(base)]
        base: Animal,
        lives: i32,
    }

    #[derive(DataContract, Default)]
    #[data_contract(namespace = "urn:zoo")]
    struct Zoo {
        animals: Vec<Poly<Animal>>,
    }

    #[test]
    fn declared_types_are_found_through_members() {
        let cache = ContractCache::new(NamespaceMap::new());
        let root = cache.get_or_build(Zoo::type_info()).unwrap();
        let known = KnownTypeSet::resolve(&cache, &root, &[]).unwrap();

        let cat = cache.lookup(Cat::type_info()).unwrap();
        assert!(known.explicit().is_empty());
        assert!(known.contains(cat.id()));
        assert_eq!(known.named(&cache, cat.name()).len(), 1);
    }

    #[test]
    fn explicit_types_are_deduplicated() {
        let cache = ContractCache::new(NamespaceMap::new());
        let root = cache.get_or_build(Animal::type_info()).unwrap();
        let known = KnownTypeSet::resolve(
            &cache,
            &root,
            &[Cat::type_info(), Cat::type_info(), i32::type_info()],
        )
        .unwrap();
        assert_eq!(known.explicit().len(), 2);
    }

    #[derive(DataContract, Default)]
    #[data_contract(namespace = "urn:zoo", known_type_method = "residents")]
    struct Pen {
        name: String,
    }

    impl Pen {
        fn residents() -> Vec<&'static TypeInfo> {
            alloc::vec![Cat::type_info()]
        }
    }

    #[test]
    fn provider_methods_declare_known_types() {
        let cache = ContractCache::new(NamespaceMap::new());
        let pen = cache.get_or_build(Pen::type_info()).unwrap();
        let cat = cache.lookup(Cat::type_info()).unwrap();
        assert_eq!(pen.known_types(), &[cat.id()]);
    }
}
