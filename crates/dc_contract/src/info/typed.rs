use crate::info::{TypeInfo, TypePath};

/// Static access to the [`TypeInfo`] of a type.
///
/// The info is built once and stored in a static cell, so the returned
/// reference is the same on every call. Transparent wrappers (`Box<T>`,
/// `Arc<T>`, [`Poly<T>`](crate::Poly)) return the info of `T`.
///
/// # Examples
///
/// ```
/// use dc_contract::info::{TypeInfo, Typed};
///
/// let info = <Vec<String> as Typed>::type_info();
/// assert!(matches!(info, TypeInfo::Array(_)));
/// assert!(core::ptr::eq(info, <Vec<String> as Typed>::type_info()));
/// ```
pub trait Typed: TypePath {
    fn type_info() -> &'static TypeInfo;
}
