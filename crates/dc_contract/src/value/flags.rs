use core::fmt;
use core::marker::PhantomData;
use core::ops::{BitAnd, BitOr, BitOrAssign};

use crate::error::FromValueError;
use crate::info::{TypeInfo, TypePath, Typed};
use crate::value::{DataContract, EnumContract, EnumValue, Value, ValueContext};

/// A combination of members of a flags enum contract.
///
/// Written as the member names separated by spaces, in declaration order.
/// A combination equal to a named member is written as that single name.
///
/// # Examples
///
/// ```
/// use dc_contract::{DataContract, Flags};
///
/// #[derive(DataContract, Clone, Copy, Debug, PartialEq)]
/// #[data_contract(flags)]
/// enum Access {
///     Read = 1,
///     Write = 2,
///     All = 3,
/// }
///
/// let access = Flags::from(Access::Read) | Access::Write;
/// assert_eq!(access.bits(), 3);
/// assert!(access.contains(Access::Write));
/// ```
pub struct Flags<E> {
    bits: i64,
    marker: PhantomData<fn() -> E>,
}

impl<E: EnumContract> Flags<E> {
    #[inline]
    pub const fn empty() -> Self {
        Self::from_bits(0)
    }

    #[inline]
    pub const fn from_bits(bits: i64) -> Self {
        Self {
            bits,
            marker: PhantomData,
        }
    }

    #[inline]
    pub const fn bits(&self) -> i64 {
        self.bits
    }

    #[inline]
    pub fn contains(&self, flag: E) -> bool {
        let bits = flag.to_bits();
        self.bits & bits == bits
    }

    #[inline]
    pub fn insert(&mut self, flag: E) {
        self.bits |= flag.to_bits();
    }

    #[inline]
    pub fn remove(&mut self, flag: E) {
        self.bits &= !flag.to_bits();
    }
}

impl<E: EnumContract> From<E> for Flags<E> {
    #[inline]
    fn from(flag: E) -> Self {
        Self::from_bits(flag.to_bits())
    }
}

impl<E: EnumContract> BitOr<E> for Flags<E> {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: E) -> Self {
        Self::from_bits(self.bits | rhs.to_bits())
    }
}

impl<E: EnumContract> BitOr for Flags<E> {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self::from_bits(self.bits | rhs.bits)
    }
}

impl<E: EnumContract> BitOrAssign<E> for Flags<E> {
    #[inline]
    fn bitor_assign(&mut self, rhs: E) {
        self.insert(rhs);
    }
}

impl<E: EnumContract> BitAnd for Flags<E> {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self::from_bits(self.bits & rhs.bits)
    }
}

impl<E> Clone for Flags<E> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Flags<E> {}

impl<E> PartialEq for Flags<E> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<E> Eq for Flags<E> {}

impl<E> Default for Flags<E> {
    #[inline]
    fn default() -> Self {
        Self {
            bits: 0,
            marker: PhantomData,
        }
    }
}

impl<E: TypePath> fmt::Debug for Flags<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Flags<{}>({:#x})", E::type_name(), self.bits)
    }
}

impl<E: TypePath> TypePath for Flags<E> {
    #[inline]
    fn type_path() -> &'static str {
        E::type_path()
    }

    #[inline]
    fn type_name() -> &'static str {
        E::type_name()
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        E::module_path()
    }
}

impl<E: Typed> Typed for Flags<E> {
    #[inline]
    fn type_info() -> &'static TypeInfo {
        E::type_info()
    }
}

impl<E: EnumContract> DataContract for Flags<E> {
    fn to_value(&self, _cx: &mut ValueContext) -> Value {
        Value::Enum(EnumValue {
            ty: E::type_info(),
            bits: self.bits,
        })
    }

    fn from_value(value: &Value, _cx: &mut ValueContext) -> Result<Self, FromValueError> {
        let value = value.expect_enum(E::type_path())?;
        Ok(Self::from_bits(value.bits))
    }
}
