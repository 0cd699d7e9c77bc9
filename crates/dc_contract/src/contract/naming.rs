use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};

use dc_utils::xml_name::encode_local_name;

use crate::error::{Error, Result};
use crate::info::TypeInfo;
use crate::namespaces;

/// Module path → contract namespace overrides of one serializer.
pub type NamespaceMap = BTreeMap<String, String>;

/// Namespace of a type declared in `module`.
///
/// `my_app::shop` maps to `http://schemas.datacontract.org/2004/07/my_app.shop`
/// unless the map overrides it.
///
/// ```
/// use dc_contract::contract::{NamespaceMap, module_namespace};
///
/// let mut map = NamespaceMap::new();
/// assert_eq!(
///     module_namespace(Some("my_app::shop"), &map),
///     "http://schemas.datacontract.org/2004/07/my_app.shop",
/// );
///
/// map.insert("my_app::shop".into(), "urn:shop".into());
/// assert_eq!(module_namespace(Some("my_app::shop"), &map), "urn:shop");
/// ```
pub fn module_namespace(module: Option<&str>, mappings: &NamespaceMap) -> String {
    let module = module.unwrap_or_default();
    if let Some(namespace) = mappings.get(module) {
        return namespace.clone();
    }
    let mut namespace = String::from(namespaces::DATA_CONTRACT_BASE);
    namespace.push_str(&module.replace("::", "."));
    namespace
}

/// Validates an explicit contract or member name and encodes it.
pub(crate) fn local_name(info: &TypeInfo, explicit: Option<&str>, fallback: &str) -> Result<String> {
    let name = match explicit {
        Some("") => return Err(Error::invalid(info.type_path(), "explicit name is empty")),
        Some(name) => name,
        None => fallback,
    };
    if name.contains(':') {
        return Err(Error::invalid(
            info.type_path(),
            format!("name `{name}` is not a valid local name"),
        ));
    }
    Ok(encode_local_name(name).into_owned())
}

/// The namespace of a named contract.
pub(crate) fn contract_namespace(
    info: &TypeInfo,
    explicit: Option<&str>,
    mappings: &NamespaceMap,
) -> Result<String> {
    let namespace = match explicit {
        Some(ns) if !ns.is_empty() && ns.trim().is_empty() => {
            return Err(Error::invalid(info.type_path(), "namespace is blank"));
        }
        Some(ns) => ns.to_string(),
        None => module_namespace(info.ty().module_path(), mappings),
    };
    if namespace == namespaces::SERIALIZATION {
        return Err(Error::invalid(
            info.type_path(),
            "the serialization namespace is reserved",
        ));
    }
    Ok(namespace)
}

/// Namespace of a collection whose element contracts live in `namespaces`.
///
/// Builtin element contracts put the collection into the arrays namespace.
pub(crate) fn collection_namespace<'a>(element_namespaces: impl IntoIterator<Item = &'a str>) -> String {
    element_namespaces
        .into_iter()
        .find(|ns| !namespaces::is_builtin(ns))
        .unwrap_or(namespaces::ARRAYS)
        .to_string()
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{NamespaceMap, collection_namespace, contract_namespace, local_name};
    use crate::info::Typed;
    use crate::namespaces;

    #[test]
    fn names_are_validated() {
        let info = i32::type_info();
        assert_eq!(local_name(info, None, "Order Line").unwrap(), "Order_x0020_Line");
        assert!(local_name(info, Some(""), "x").is_err());
        assert!(local_name(info, Some("a:b"), "x").is_err());
    }

    #[test]
    fn namespaces_are_validated() {
        let info = i32::type_info();
        let map = NamespaceMap::new();
        assert!(contract_namespace(info, Some("  "), &map).is_err());
        assert!(contract_namespace(info, Some(namespaces::SERIALIZATION), &map).is_err());
        assert_eq!(contract_namespace(info, Some(""), &map).unwrap(), "");
    }

    #[test]
    fn collections_follow_elements() {
        assert_eq!(collection_namespace([namespaces::XS]), namespaces::ARRAYS);
        assert_eq!(collection_namespace([namespaces::XS, "urn:v"]), "urn:v");
    }
}
