//! Static storage for type metadata.
//!
//! [`Typed::type_info`](crate::info::Typed::type_info) returns a
//! `&'static TypeInfo`. For a non-generic type a single [`TypeInfoCell`]
//! holds it. A `static` inside a generic function is shared by every
//! instantiation, so generic types key their entries by `TypeId` in a
//! [`GenericTypeInfoCell`] (and a [`GenericTypePathCell`] for names).

use alloc::boxed::Box;
use alloc::string::String;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use dc_utils::TypeIdMap;

use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// TypeInfoCell

/// Storage of the [`TypeInfo`] of one non-generic type.
///
/// ```
/// use dc_contract::info::{ObjectInfo, TypeInfo, TypeInfoCell, TypePath, Typed};
///
/// struct Anything;
///
/// impl TypePath for Anything {
///     fn type_path() -> &'static str { "demo::Anything" }
///     fn type_name() -> &'static str { "Anything" }
/// }
///
/// impl Typed for Anything {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: TypeInfoCell = TypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::Object(ObjectInfo::new::<Anything>()))
///     }
/// }
///
/// assert_eq!(Anything::type_info().type_path(), "demo::Anything");
/// ```
pub struct TypeInfoCell(OnceLock<TypeInfo>);

impl TypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> TypeInfo) -> &TypeInfo {
        self.0.get_or_init(f)
    }
}

// -----------------------------------------------------------------------------
// GenericTypeCell

mod sealed {
    use super::TypeInfo;
    use alloc::string::String;

    pub trait CellValue: Send + Sync + 'static {}

    impl CellValue for String {}
    impl CellValue for TypeInfo {}
}

/// Storage shared by all instantiations of a generic type.
///
/// Entries are leaked on first insertion and live for the rest of the
/// program, which is what makes the `&'static` return type possible.
pub struct GenericTypeCell<T: sealed::CellValue>(RwLock<TypeIdMap<&'static T>>);

/// Generic storage of [`TypeInfo`].
///
/// ```
/// use dc_contract::info::{GenericTypeInfoCell, NullableInfo, TypeInfo, TypePath, Typed};
///
/// struct Maybe<T>(Option<T>);
///
/// impl<T: Typed> TypePath for Maybe<T> {
///     fn type_path() -> &'static str { T::type_path() }
///     fn type_name() -> &'static str { T::type_name() }
/// }
///
/// impl<T: Typed> Typed for Maybe<T> {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
///         CELL.get_or_insert::<Self>(|| TypeInfo::Nullable(NullableInfo::new::<Self>(T::type_info)))
///     }
/// }
///
/// assert!(!core::ptr::eq(Maybe::<i32>::type_info(), Maybe::<u8>::type_info()));
/// ```
pub type GenericTypeInfoCell = GenericTypeCell<TypeInfo>;

/// Generic storage of a computed type path or name.
pub type GenericTypePathCell = GenericTypeCell<String>;

impl<T: sealed::CellValue> GenericTypeCell<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the entry of type `G`, creating it with `f` if needed.
    ///
    /// `f` runs outside the lock, so it may recursively ask the same cell
    /// for other instantiations (`Vec<Vec<T>>`).
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> T) -> &T {
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(&self, type_id: TypeId, f: impl FnOnce() -> T) -> &T {
        let found = self
            .0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied();
        match found {
            Some(value) => value,
            None => {
                let value = f();
                *self
                    .0
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .get_or_insert(type_id, || Box::leak(Box::new(value)))
            }
        }
    }
}

/// Concatenates string pieces, used to build generic type paths.
///
/// ```
/// use dc_contract::info::concat;
/// assert_eq!(concat(&["Vec", "<", "i32", ">"]), "Vec<i32>");
/// ```
pub fn concat(pieces: &[&str]) -> String {
    let len = pieces.iter().map(|piece| piece.len()).sum();
    let mut out = String::with_capacity(len);
    pieces.iter().for_each(|piece| out.push_str(piece));
    out
}
