use alloc::format;
use alloc::sync::Arc;
use alloc::vec::Vec;
use std::sync::{Mutex, PoisonError, RwLock, RwLockReadGuard};

use dc_utils::TypeIdMap;

use crate::contract::builder::Builder;
use crate::contract::{Contract, ContractId, NamespaceMap};
use crate::error::{Error, Result};
use crate::info::TypeInfo;

#[derive(Default)]
struct Table {
    contracts: Vec<Arc<Contract>>,
    by_type: TypeIdMap<ContractId>,
}

/// The contracts of one serializer, keyed by type identity.
///
/// Published contracts are immutable and shared freely across threads.
/// Building is the only mutation: one builder runs at a time, and a batch
/// becomes visible only once all of it built successfully, so every type
/// gets exactly one contract.
///
/// Two types may share a qualified name. Lookups go through type identity,
/// never through names.
///
/// ```
/// use dc_contract::contract::{ContractCache, NamespaceMap};
/// use dc_contract::info::Typed;
///
/// let cache = ContractCache::new(NamespaceMap::new());
/// let list = cache.get_or_build(Vec::<i32>::type_info()).unwrap();
/// assert_eq!(list.name().name, "ArrayOfint");
///
/// // `int` was built along the way.
/// assert_eq!(cache.len(), 2);
/// assert!(cache.lookup(i32::type_info()).is_some());
/// ```
pub struct ContractCache {
    mappings: NamespaceMap,
    table: RwLock<Table>,
    building: Mutex<()>,
}

impl ContractCache {
    pub fn new(mappings: NamespaceMap) -> Self {
        Self {
            mappings,
            table: RwLock::new(Table::default()),
            building: Mutex::new(()),
        }
    }

    #[inline]
    pub fn mappings(&self) -> &NamespaceMap {
        &self.mappings
    }

    fn read(&self) -> RwLockReadGuard<'_, Table> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.read().contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: ContractId) -> Option<Arc<Contract>> {
        self.read().contracts.get(id.index()).cloned()
    }

    /// Like [`get`](Self::get) for ids handed out by this cache.
    pub(crate) fn contract(&self, id: ContractId) -> Result<Arc<Contract>> {
        self.get(id).ok_or_else(|| {
            Error::invalid("<unknown>", format!("no contract with id {}", id.index()))
        })
    }

    /// The contract of `info` if it was built already.
    pub fn lookup(&self, info: &TypeInfo) -> Option<Arc<Contract>> {
        let table = self.read();
        let id = table.by_type.get(&info.type_id())?;
        table.contracts.get(id.index()).cloned()
    }

    /// All published contracts in id order.
    pub fn all(&self) -> Vec<Arc<Contract>> {
        self.read().contracts.clone()
    }

    /// Returns the contract of `info`, building it and everything it
    /// reaches on first use.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidContract`] when any type of the batch carries
    /// malformed metadata. Nothing of a failed batch is published.
    pub fn get_or_build(&self, info: &'static TypeInfo) -> Result<Arc<Contract>> {
        if let Some(contract) = self.lookup(info) {
            return Ok(contract);
        }

        let _building = self.building.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(contract) = self.lookup(info) {
            return Ok(contract);
        }

        let mut builder = Builder::new(self);
        let id = builder.id_of(info)?;
        let built = builder.finish()?;

        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        for contract in built {
            table.by_type.insert(contract.info().type_id(), contract.id());
            table.contracts.push(Arc::new(contract));
        }
        table
            .contracts
            .get(id.index())
            .cloned()
            .ok_or_else(|| Error::invalid(info.type_path(), "contract was not published"))
    }
}

impl core::fmt::Debug for ContractCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ContractCache")
            .field("contracts", &self.len())
            .finish_non_exhaustive()
    }
}
