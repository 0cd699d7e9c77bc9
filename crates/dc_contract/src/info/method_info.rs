use alloc::vec::Vec;

use crate::info::TypeInfo;

/// What a method declared in [`MethodInfo`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodReturn {
    Unit,
    /// A list of type infos, the shape a known-type provider must return.
    TypeInfoList,
    /// Anything else, named for error messages.
    Other(&'static str),
}

/// A provider invocation. `None` stands for a provider that returned nothing.
pub type KnownTypeProvider = fn() -> Option<Vec<&'static TypeInfo>>;

/// Reflection data of a method that may serve as a known-type provider.
///
/// `#[data_contract(known_type_method = "..")]` records one through
/// [`MethodInfo::known_type_provider`]. Hand-written metadata can describe
/// methods that do not qualify, the contract builder rejects them.
///
/// ```
/// use dc_contract::info::{MethodInfo, MethodReturn};
///
/// let method = MethodInfo::new("types").with_static(false);
/// assert_eq!(method.name(), "types");
/// assert!(!method.is_static());
/// assert_eq!(method.returns(), MethodReturn::Unit);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MethodInfo {
    name: &'static str,
    is_public: bool,
    is_static: bool,
    parameter_count: usize,
    returns: MethodReturn,
    invoke: Option<KnownTypeProvider>,
}

impl MethodInfo {
    /// A public, static, parameterless method returning nothing.
    #[inline]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            is_public: true,
            is_static: true,
            parameter_count: 0,
            returns: MethodReturn::Unit,
            invoke: None,
        }
    }

    /// A well-formed known-type provider.
    #[inline]
    pub const fn known_type_provider(name: &'static str, invoke: KnownTypeProvider) -> Self {
        Self {
            name,
            is_public: true,
            is_static: true,
            parameter_count: 0,
            returns: MethodReturn::TypeInfoList,
            invoke: Some(invoke),
        }
    }

    #[inline]
    pub const fn with_public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    #[inline]
    pub const fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    #[inline]
    pub const fn with_parameters(mut self, count: usize) -> Self {
        self.parameter_count = count;
        self
    }

    #[inline]
    pub const fn with_return(mut self, returns: MethodReturn) -> Self {
        self.returns = returns;
        self
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn is_public(&self) -> bool {
        self.is_public
    }

    #[inline]
    pub const fn is_static(&self) -> bool {
        self.is_static
    }

    #[inline]
    pub const fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    #[inline]
    pub const fn returns(&self) -> MethodReturn {
        self.returns
    }

    #[inline]
    pub fn invoke(&self) -> Option<KnownTypeProvider> {
        self.invoke
    }
}
