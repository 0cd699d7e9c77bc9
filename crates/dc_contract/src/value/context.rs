use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::{Any, TypeId};

use dc_utils::hash::{FixedHashState, HashMap};

use crate::error::FromValueError;
use crate::value::{DataContract, Value};

/// Identity bookkeeping of one conversion between Rust values and a
/// [`Value`] graph.
///
/// Converting an `Arc<T>` twice yields the same [`Value::Shared`] node, and
/// reading the same shared node twice yields clones of one `Arc<T>`. The
/// writer turns repeated shared nodes into `z:Ref` attributes when the
/// contract preserves references.
///
/// ```
/// use std::sync::Arc;
/// use dc_contract::DataContract;
/// use dc_contract::value::{Value, ValueContext};
///
/// let shared = Arc::new(String::from("x"));
/// let pair = vec![shared.clone(), shared];
///
/// let value = pair.to_value(&mut ValueContext::new());
/// let back: Vec<Arc<String>> = DataContract::from_value(&value, &mut ValueContext::new()).unwrap();
/// assert!(Arc::ptr_eq(&back[0], &back[1]));
/// ```
pub struct ValueContext {
    outgoing: HashMap<(TypeId, usize), Arc<Value>>,
    incoming: HashMap<(TypeId, usize), Box<dyn Any>>,
}

impl ValueContext {
    #[inline]
    pub const fn new() -> Self {
        Self {
            outgoing: HashMap::with_hasher(FixedHashState),
            incoming: HashMap::with_hasher(FixedHashState),
        }
    }

    /// Converts a shared Rust value, reusing the node of an earlier
    /// conversion of the same allocation.
    pub fn share<T: DataContract>(&mut self, value: &Arc<T>) -> Value {
        let key = (TypeId::of::<T>(), Arc::as_ptr(value) as *const () as usize);
        if let Some(node) = self.outgoing.get(&key) {
            return Value::Shared(node.clone());
        }
        let node = Arc::new(T::to_value(value, self));
        self.outgoing.insert(key, node.clone());
        Value::Shared(node)
    }

    /// Reads a shared Rust value, returning the `Arc` built for an earlier
    /// read of the same node.
    pub fn unshare<T: DataContract>(&mut self, value: &Value) -> Result<Arc<T>, FromValueError> {
        let Value::Shared(node) = value else {
            return T::from_value(value, self).map(Arc::new);
        };

        let key = (TypeId::of::<T>(), Arc::as_ptr(node) as usize);
        if let Some(existing) = self.incoming.get(&key)
            && let Some(arc) = existing.downcast_ref::<Arc<T>>()
        {
            return Ok(arc.clone());
        }
        let arc = Arc::new(T::from_value(node, self)?);
        self.incoming.insert(key, Box::new(arc.clone()));
        Ok(arc)
    }
}

impl Default for ValueContext {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for ValueContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ValueContext")
            .field("outgoing", &self.outgoing.len())
            .field("incoming", &self.incoming.len())
            .finish()
    }
}
