//! Well-known namespaces and the prefixes the writer binds them to.

/// XML Schema instance namespace, carries `nil` and `type`.
pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// XML Schema namespace, home of most builtin primitive names.
pub const XS: &str = "http://www.w3.org/2001/XMLSchema";

/// Serialization namespace: `char`, `duration`, `guid`, object references
/// and the root element of builtin primitives.
pub const SERIALIZATION: &str = "http://schemas.microsoft.com/2003/10/Serialization/";

/// Namespace of collections whose items are builtin primitives.
pub const ARRAYS: &str = "http://schemas.microsoft.com/2003/10/Serialization/Arrays";

/// Base of every namespace derived from a module path.
pub const DATA_CONTRACT_BASE: &str = "http://schemas.datacontract.org/2004/07/";

/// Namespace of the `DateTimeOffset` contract.
pub const SYSTEM: &str = "http://schemas.datacontract.org/2004/07/System";

/// The `xml` prefix namespace, always bound.
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";

/// Namespace of `xmlns` declarations.
pub const XMLNS: &str = "http://www.w3.org/2000/xmlns/";

pub const XSI_PREFIX: &str = "i";
pub const SERIALIZATION_PREFIX: &str = "z";
pub const XS_PREFIX: &str = "x";

/// Returns `true` for the namespaces of builtin primitive contracts.
#[inline]
pub fn is_builtin(namespace: &str) -> bool {
    namespace == XS || namespace == SERIALIZATION
}
