use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};

// -----------------------------------------------------------------------------
// TypePath

/// Stable, compiler-independent names of a type.
///
/// [`core::any::type_name`] is not guaranteed to be stable, so contract
/// names are derived from this trait instead. The default contract name of a
/// type is its [`type_name`](TypePath::type_name) and its default namespace is
/// built from its [`module_path`](TypePath::module_path).
///
/// `#[derive(DataContract)]` implements it with `module_path!()`.
///
/// # Examples
///
/// ```
/// use dc_contract::info::TypePath;
///
/// assert_eq!(<i32 as TypePath>::type_path(), "i32");
/// assert_eq!(<Vec<i32> as TypePath>::type_path(), "alloc::vec::Vec<i32>");
/// assert_eq!(<Vec<i32> as TypePath>::type_name(), "Vec<i32>");
/// assert_eq!(<String as TypePath>::module_path(), Some("alloc::string"));
/// ```
pub trait TypePath: 'static {
    /// Fully qualified path, `my_crate::model::Person`.
    fn type_path() -> &'static str;

    /// Short name with generics, `Person` or `Vec<Person>`.
    fn type_name() -> &'static str;

    /// Module of the type, `my_crate::model`.
    fn module_path() -> Option<&'static str> {
        None
    }
}

// -----------------------------------------------------------------------------
// Type

/// Runtime identity of a type together with its [`TypePath`] names.
///
/// Comparison and hashing only look at the [`TypeId`].
///
/// # Examples
///
/// ```
/// use dc_contract::info::Type;
///
/// let ty = Type::of::<u8>();
/// assert!(ty.is::<u8>());
/// assert_eq!(ty.name(), "u8");
/// assert_ne!(ty, Type::of::<i8>());
/// ```
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    path: fn() -> &'static str,
    name: fn() -> &'static str,
    module: fn() -> Option<&'static str>,
}

impl Type {
    #[inline]
    pub fn of<T: TypePath + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: T::type_path,
            name: T::type_name,
            module: T::module_path,
        }
    }

    #[inline(always)]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub fn path(&self) -> &'static str {
        (self.path)()
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        (self.name)()
    }

    #[inline]
    pub fn module_path(&self) -> Option<&'static str> {
        (self.module)()
    }

    #[inline]
    pub fn is<T: 'static + ?Sized>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl Hash for Type {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

// -----------------------------------------------------------------------------
// impl_type_fn

/// Implements `ty`, `type_id`, `type_path`, `type_name` and `is` for an
/// info struct holding a [`Type`] field.
macro_rules! impl_type_fn {
    ($field:ident) => {
        /// Returns the underlying [`Type`](crate::info::Type).
        #[inline(always)]
        pub const fn ty(&self) -> &$crate::info::Type {
            &self.$field
        }

        #[inline]
        pub fn type_id(&self) -> ::core::any::TypeId {
            self.$field.id()
        }

        #[inline]
        pub fn type_path(&self) -> &'static str {
            self.$field.path()
        }

        #[inline]
        pub fn type_name(&self) -> &'static str {
            self.$field.name()
        }

        /// Check if the given type matches this one.
        #[inline]
        pub fn is<T: ::core::any::Any>(&self) -> bool {
            self.$field.is::<T>()
        }
    };
}

pub(crate) use impl_type_fn;
