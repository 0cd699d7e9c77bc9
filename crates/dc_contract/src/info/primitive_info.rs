use core::fmt;

use crate::info::{Type, TypeInfo, TypePath, Typed, impl_type_fn};
use crate::namespaces;

// -----------------------------------------------------------------------------
// PrimitiveKind

/// The fixed set of built-in primitive contracts.
///
/// Each kind has an XML schema name. Most live in the XML Schema namespace,
/// `char`, `duration` and `guid` live in the serialization namespace.
///
/// # Examples
///
/// ```
/// use dc_contract::info::PrimitiveKind;
/// use dc_contract::namespaces;
///
/// assert_eq!(PrimitiveKind::Int.name(), "int");
/// assert_eq!(PrimitiveKind::Int.namespace(), namespaces::XS);
/// assert_eq!(PrimitiveKind::Guid.namespace(), namespaces::SERIALIZATION);
/// assert!(!PrimitiveKind::String.is_value_type());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    String,
    Boolean,
    /// Signed 8-bit, `xs:byte`.
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,
    Float,
    Double,
    /// A character written as its code point.
    Char,
    DateTime,
    /// An XSD duration, `chrono::TimeDelta`.
    TimeSpan,
    Guid,
    Base64Binary,
    AnyUri,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 18] = [
        Self::String,
        Self::Boolean,
        Self::Byte,
        Self::UnsignedByte,
        Self::Short,
        Self::UnsignedShort,
        Self::Int,
        Self::UnsignedInt,
        Self::Long,
        Self::UnsignedLong,
        Self::Float,
        Self::Double,
        Self::Char,
        Self::DateTime,
        Self::TimeSpan,
        Self::Guid,
        Self::Base64Binary,
        Self::AnyUri,
    ];

    /// The contract (schema type) name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::UnsignedByte => "unsignedByte",
            Self::Short => "short",
            Self::UnsignedShort => "unsignedShort",
            Self::Int => "int",
            Self::UnsignedInt => "unsignedInt",
            Self::Long => "long",
            Self::UnsignedLong => "unsignedLong",
            Self::Float => "float",
            Self::Double => "double",
            Self::Char => "char",
            Self::DateTime => "dateTime",
            Self::TimeSpan => "duration",
            Self::Guid => "guid",
            Self::Base64Binary => "base64Binary",
            Self::AnyUri => "anyURI",
        }
    }

    /// The contract namespace.
    pub const fn namespace(self) -> &'static str {
        match self {
            Self::Char | Self::TimeSpan | Self::Guid => namespaces::SERIALIZATION,
            _ => namespaces::XS,
        }
    }

    /// `false` for kinds whose values may be absent (strings, binary, uris).
    pub const fn is_value_type(self) -> bool {
        !matches!(self, Self::String | Self::Base64Binary | Self::AnyUri)
    }

    /// Looks a kind up by its contract name and namespace.
    pub fn from_qualified_name(name: &str, namespace: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name && kind.namespace() == namespace)
    }

    /// The info of the Rust type a value of this kind is read into when no
    /// other type is known.
    pub fn type_info(self) -> &'static TypeInfo {
        use crate::impls::{Bytes, DateTime, Uri};
        use alloc::string::String;

        match self {
            Self::String => String::type_info(),
            Self::Boolean => bool::type_info(),
            Self::Byte => i8::type_info(),
            Self::UnsignedByte => u8::type_info(),
            Self::Short => i16::type_info(),
            Self::UnsignedShort => u16::type_info(),
            Self::Int => i32::type_info(),
            Self::UnsignedInt => u32::type_info(),
            Self::Long => i64::type_info(),
            Self::UnsignedLong => u64::type_info(),
            Self::Float => f32::type_info(),
            Self::Double => f64::type_info(),
            Self::Char => char::type_info(),
            Self::DateTime => DateTime::type_info(),
            Self::TimeSpan => chrono::TimeDelta::type_info(),
            Self::Guid => uuid::Uuid::type_info(),
            Self::Base64Binary => Bytes::type_info(),
            Self::AnyUri => Uri::type_info(),
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// -----------------------------------------------------------------------------
// PrimitiveInfo

/// Info of a type serialized as a single primitive value.
#[derive(Debug, Clone)]
pub struct PrimitiveInfo {
    ty: Type,
    kind: PrimitiveKind,
}

impl PrimitiveInfo {
    impl_type_fn!(ty);

    #[inline]
    pub fn new<T: TypePath>(kind: PrimitiveKind) -> Self {
        Self {
            ty: Type::of::<T>(),
            kind,
        }
    }

    #[inline]
    pub const fn kind(&self) -> PrimitiveKind {
        self.kind
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::PrimitiveKind;
    use crate::namespaces;

    #[test]
    fn names_are_unique_per_namespace() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(
                PrimitiveKind::from_qualified_name(kind.name(), kind.namespace()),
                Some(kind)
            );
        }
        assert_eq!(PrimitiveKind::from_qualified_name("int", namespaces::SERIALIZATION), None);
    }

    #[test]
    fn type_info_round_trips_kind() {
        for kind in PrimitiveKind::ALL {
            let info = kind.type_info();
            assert_eq!(info.as_primitive().ok().map(|p| p.kind()), Some(kind));
        }
    }
}
