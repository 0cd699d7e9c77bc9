//! Mapping between runtime types and `i:type` names.
//!
//! A [`ContractResolver`] may be installed on a serializer. It is asked
//! first, and receives the [`KnownTypeResolver`] so it can delegate. When it
//! declines, the known-type resolver answers. The first resolver that
//! answers wins.

use alloc::sync::Arc;

use log::trace;

use crate::contract::{ContractCache, QualifiedName};
use crate::info::{PrimitiveKind, TypeInfo, Typed};
use crate::known_types::KnownTypeSet;
use crate::namespaces;
use crate::value::Value;

// -----------------------------------------------------------------------------
// ContractResolver

/// A pluggable mapping between types and `(name, namespace)` pairs.
///
/// Returning `None` declines and hands the question to `default`. A
/// resolver may give several types the same local name as long as their
/// namespaces tell them apart when reading.
///
/// # Examples
///
/// ```
/// use dc_contract::contract::QualifiedName;
/// use dc_contract::info::{TypeInfo, Typed};
/// use dc_contract::resolver::{ContractResolver, KnownTypeResolver};
///
/// /// Writes `i64` values as `urn:numbers:big`.
/// struct Numbers;
///
/// impl ContractResolver for Numbers {
///     fn try_resolve_type(
///         &self,
///         ty: &'static TypeInfo,
///         _declared: &'static TypeInfo,
///         _default: &KnownTypeResolver<'_>,
///     ) -> Option<QualifiedName> {
///         ty.is::<i64>().then(|| QualifiedName::new("big", "urn:numbers"))
///     }
///
///     fn resolve_name(
///         &self,
///         name: &str,
///         namespace: &str,
///         _declared: &'static TypeInfo,
///         _default: &KnownTypeResolver<'_>,
///     ) -> Option<&'static TypeInfo> {
///         (name == "big" && namespace == "urn:numbers").then(i64::type_info)
///     }
/// }
/// ```
pub trait ContractResolver: Send + Sync {
    /// Name written for a value of type `ty` in a slot declared as `declared`.
    fn try_resolve_type(
        &self,
        ty: &'static TypeInfo,
        declared: &'static TypeInfo,
        default: &KnownTypeResolver<'_>,
    ) -> Option<QualifiedName>;

    /// Type read for the name `name` in a slot declared as `declared`.
    fn resolve_name(
        &self,
        name: &str,
        namespace: &str,
        declared: &'static TypeInfo,
        default: &KnownTypeResolver<'_>,
    ) -> Option<&'static TypeInfo>;
}

/// Declines everything.
impl ContractResolver for () {
    fn try_resolve_type(
        &self,
        _ty: &'static TypeInfo,
        _declared: &'static TypeInfo,
        _default: &KnownTypeResolver<'_>,
    ) -> Option<QualifiedName> {
        None
    }

    fn resolve_name(
        &self,
        _name: &str,
        _namespace: &str,
        _declared: &'static TypeInfo,
        _default: &KnownTypeResolver<'_>,
    ) -> Option<&'static TypeInfo> {
        None
    }
}

// -----------------------------------------------------------------------------
// KnownTypeResolver

/// The default resolver: the declared type, the builtin primitives and the
/// serializer's effective known types.
#[derive(Debug, Clone, Copy)]
pub struct KnownTypeResolver<'a> {
    cache: &'a ContractCache,
    known: &'a KnownTypeSet,
}

impl<'a> KnownTypeResolver<'a> {
    #[inline]
    pub fn new(cache: &'a ContractCache, known: &'a KnownTypeSet) -> Self {
        Self { cache, known }
    }

    pub fn try_resolve_type(
        &self,
        ty: &'static TypeInfo,
        declared: &'static TypeInfo,
    ) -> Option<QualifiedName> {
        let contract = self.cache.get_or_build(ty).ok()?;
        let declared = declared.non_nullable();
        let admitted = ty == declared
            || self.known.contains(contract.id())
            || (declared.is::<Value>() && contract.is_builtin());
        admitted.then(|| contract.name().clone())
    }

    pub fn resolve_name(
        &self,
        name: &str,
        namespace: &str,
        declared: &'static TypeInfo,
    ) -> Option<&'static TypeInfo> {
        let declared = declared.non_nullable();
        if let Ok(contract) = self.cache.get_or_build(declared)
            && contract.name().is(name, namespace)
        {
            return Some(declared);
        }
        if let Some(kind) = PrimitiveKind::from_qualified_name(name, namespace) {
            return Some(kind.type_info());
        }
        if name == "anyType" && namespace == namespaces::XS {
            return Some(Value::type_info());
        }
        let qname = QualifiedName::new(name, namespace);
        self.known
            .named(self.cache, &qname)
            .first()
            .map(|contract| contract.info())
    }
}

// -----------------------------------------------------------------------------
// ResolverChain

/// The installed resolver followed by the known-type resolver.
#[derive(Clone, Copy)]
pub(crate) struct ResolverChain<'a> {
    custom: Option<&'a dyn ContractResolver>,
    default: KnownTypeResolver<'a>,
}

impl<'a> ResolverChain<'a> {
    pub(crate) fn new(
        custom: Option<&'a Arc<dyn ContractResolver>>,
        default: KnownTypeResolver<'a>,
    ) -> Self {
        Self {
            custom: custom.map(|r| &**r),
            default,
        }
    }

    pub(crate) fn resolve_type(
        &self,
        ty: &'static TypeInfo,
        declared: &'static TypeInfo,
    ) -> Option<QualifiedName> {
        if let Some(custom) = self.custom
            && let Some(name) = custom.try_resolve_type(ty, declared, &self.default)
        {
            trace!("custom resolver named `{}` as {name}", ty.type_path());
            return Some(name);
        }
        let name = self.default.try_resolve_type(ty, declared);
        trace!(
            "known types named `{}` in a `{}` slot as {name:?}",
            ty.type_path(),
            declared.type_path()
        );
        name
    }

    pub(crate) fn resolve_name(
        &self,
        name: &str,
        namespace: &str,
        declared: &'static TypeInfo,
    ) -> Option<&'static TypeInfo> {
        if let Some(custom) = self.custom
            && let Some(ty) = custom.resolve_name(name, namespace, declared, &self.default)
        {
            trace!("custom resolver read `{namespace}:{name}` as `{}`", ty.type_path());
            return Some(ty);
        }
        let ty = self.default.resolve_name(name, namespace, declared);
        trace!(
            "known types read `{namespace}:{name}` as {:?}",
            ty.map(TypeInfo::type_path)
        );
        ty
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{KnownTypeResolver, ResolverChain};
    use crate::contract::{ContractCache, NamespaceMap};
    use crate::info::Typed;
    use crate::known_types::KnownTypeSet;
    use crate::namespaces;
    use crate::value::Value;

    #[test]
    fn object_slots_admit_primitives() {
        let cache = ContractCache::new(NamespaceMap::new());
        let root = cache.get_or_build(Value::type_info()).unwrap();
        let known = KnownTypeSet::resolve(&cache, &root, &[]).unwrap();
        let chain = ResolverChain::new(None, KnownTypeResolver::new(&cache, &known));

        let name = chain.resolve_type(i32::type_info(), Value::type_info()).unwrap();
        assert!(name.is("int", namespaces::XS));
        assert!(chain.resolve_type(Vec::<i32>::type_info(), Value::type_info()).is_none());

        let read = chain.resolve_name("int", namespaces::XS, Value::type_info());
        assert_eq!(read, Some(i32::type_info()));
        assert_eq!(chain.resolve_name("nope", "urn:x", Value::type_info()), None);
    }
}
