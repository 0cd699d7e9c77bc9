use core::any::TypeId;
use core::{error, fmt};

use crate::info::{ArrayInfo, CollectionInfo, DictionaryInfo, NullableInfo};
use crate::info::{ClassInfo, CustomInfo, EnumInfo, ObjectInfo, PrimitiveInfo};
use crate::info::{ContractAttributes, KnownTypeAttributes, MethodInfo, Type};

// -----------------------------------------------------------------------------
// TypeKind

/// The shape of a type as seen by the serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive,
    Enum,
    Class,
    Array,
    Dictionary,
    Collection,
    Nullable,
    Custom,
    Object,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive => f.pad("Primitive"),
            Self::Enum => f.pad("Enum"),
            Self::Class => f.pad("Class"),
            Self::Array => f.pad("Array"),
            Self::Dictionary => f.pad("Dictionary"),
            Self::Collection => f.pad("Collection"),
            Self::Nullable => f.pad("Nullable"),
            Self::Custom => f.pad("Custom"),
            Self::Object => f.pad("Object"),
        }
    }
}

/// Error returned when a `TypeInfo` value is not the expected `TypeKind`.
#[derive(Debug)]
pub struct TypeKindError {
    pub expected: TypeKind,
    pub received: TypeKind,
}

impl fmt::Display for TypeKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type kind mismatch: expected {}, received {}",
            self.expected, self.received
        )
    }
}

impl error::Error for TypeKindError {}

// -----------------------------------------------------------------------------
// TypeInfo

/// Static shape information of a serializable type.
///
/// Obtained through [`Typed::type_info`](crate::info::Typed::type_info). The
/// contract builder turns it into a named [`Contract`](crate::contract::Contract).
///
/// Two infos are equal when they describe the same Rust type.
#[derive(Debug, Clone)]
pub enum TypeInfo {
    Primitive(PrimitiveInfo),
    Enum(EnumInfo),
    Class(ClassInfo),
    Array(ArrayInfo),
    Dictionary(DictionaryInfo),
    Collection(CollectionInfo),
    Nullable(NullableInfo),
    Custom(CustomInfo),
    Object(ObjectInfo),
}

macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $info:ident) => {
        /// Convert [`TypeInfo`] to specific type information.
        pub const fn $name(&self) -> Result<&$info, TypeKindError> {
            match self {
                Self::$kind(info) => Ok(info),
                _ => Err(TypeKindError {
                    expected: TypeKind::$kind,
                    received: self.kind(),
                }),
            }
        }
    };
}

impl TypeInfo {
    impl_cast_method!(as_primitive: Primitive => PrimitiveInfo);
    impl_cast_method!(as_enum: Enum => EnumInfo);
    impl_cast_method!(as_class: Class => ClassInfo);
    impl_cast_method!(as_array: Array => ArrayInfo);
    impl_cast_method!(as_dictionary: Dictionary => DictionaryInfo);
    impl_cast_method!(as_collection: Collection => CollectionInfo);
    impl_cast_method!(as_nullable: Nullable => NullableInfo);
    impl_cast_method!(as_custom: Custom => CustomInfo);
    impl_cast_method!(as_object: Object => ObjectInfo);

    /// Returns the underlying [`Type`].
    pub const fn ty(&self) -> &Type {
        match self {
            Self::Primitive(info) => info.ty(),
            Self::Enum(info) => info.ty(),
            Self::Class(info) => info.ty(),
            Self::Array(info) => info.ty(),
            Self::Dictionary(info) => info.ty(),
            Self::Collection(info) => info.ty(),
            Self::Nullable(info) => info.ty(),
            Self::Custom(info) => info.ty(),
            Self::Object(info) => info.ty(),
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.ty().id()
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.ty().path()
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.ty().name()
    }

    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.ty().is::<T>()
    }

    /// Returns the [`TypeKind`] for this `TypeInfo`.
    ///
    /// ```
    /// use dc_contract::info::{TypeKind, Typed};
    ///
    /// assert_eq!(i32::type_info().kind(), TypeKind::Primitive);
    /// assert_eq!(Option::<i32>::type_info().kind(), TypeKind::Nullable);
    /// ```
    pub const fn kind(&self) -> TypeKind {
        match self {
            Self::Primitive(_) => TypeKind::Primitive,
            Self::Enum(_) => TypeKind::Enum,
            Self::Class(_) => TypeKind::Class,
            Self::Array(_) => TypeKind::Array,
            Self::Dictionary(_) => TypeKind::Dictionary,
            Self::Collection(_) => TypeKind::Collection,
            Self::Nullable(_) => TypeKind::Nullable,
            Self::Custom(_) => TypeKind::Custom,
            Self::Object(_) => TypeKind::Object,
        }
    }

    /// Contract attributes of types that carry them.
    pub fn contract_attributes(&self) -> Option<&ContractAttributes> {
        match self {
            Self::Enum(info) => Some(info.attributes()),
            Self::Class(info) => Some(info.attributes()),
            Self::Custom(info) => Some(info.attributes()),
            _ => None,
        }
    }

    /// Known-type declarations, empty for kinds that cannot declare any.
    pub fn known_type_attributes(&self) -> Option<&KnownTypeAttributes> {
        match self {
            Self::Class(info) => Some(info.known_types()),
            Self::Custom(info) => Some(info.known_types()),
            _ => None,
        }
    }

    /// Method table of types that can name a known-type provider.
    pub fn methods(&self) -> &[MethodInfo] {
        match self {
            Self::Class(info) => info.methods(),
            Self::Custom(info) => info.methods(),
            _ => &[],
        }
    }

    /// Strips [`Nullable`](TypeInfo::Nullable) wrappers.
    pub fn non_nullable(&'static self) -> &'static TypeInfo {
        let mut info = self;
        while let Self::Nullable(inner) = info {
            info = inner.inner();
        }
        info
    }
}

impl PartialEq for TypeInfo {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.type_id() == other.type_id()
    }
}

impl Eq for TypeInfo {}
