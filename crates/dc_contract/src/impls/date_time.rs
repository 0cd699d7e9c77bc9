use alloc::vec;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};

use crate::error::FromValueError;
use crate::impls::impl_primitive_contract;
use crate::info::{ClassInfo, ContractAttributes, DataMemberAttributes, FieldInfo};
use crate::info::{TypeInfo, TypeInfoCell, TypePath, Typed};
use crate::namespaces;
use crate::value::{ClassValue, DataContract, Value, ValueContext};

// -----------------------------------------------------------------------------
// DateTime

/// How a [`DateTime`] relates to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DateTimeKind {
    /// No zone information, written without a suffix.
    #[default]
    Unspecified,
    /// Written with a `Z` suffix.
    Utc,
    /// A local time with a known offset, written with a `±HH:MM` suffix.
    Local(FixedOffset),
}

/// A `dateTime` value: a calendar time with an optional zone marker.
///
/// The default is `0001-01-01T00:00:00` without a zone.
///
/// ```
/// use chrono::NaiveDate;
/// use dc_contract::impls::{DateTime, DateTimeKind};
///
/// let noon = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(12, 0, 0).unwrap();
/// let value = DateTime::utc(noon);
/// assert_eq!(value.kind(), DateTimeKind::Utc);
/// assert_eq!(value.value(), noon);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateTime {
    value: NaiveDateTime,
    kind: DateTimeKind,
}

impl DateTime {
    #[inline]
    pub const fn new(value: NaiveDateTime, kind: DateTimeKind) -> Self {
        Self { value, kind }
    }

    #[inline]
    pub const fn utc(value: NaiveDateTime) -> Self {
        Self::new(value, DateTimeKind::Utc)
    }

    #[inline]
    pub const fn value(&self) -> NaiveDateTime {
        self.value
    }

    #[inline]
    pub const fn kind(&self) -> DateTimeKind {
        self.kind
    }

    /// The instant in UTC, `None` for unspecified values.
    pub fn to_utc(&self) -> Option<chrono::DateTime<Utc>> {
        match self.kind {
            DateTimeKind::Unspecified => None,
            DateTimeKind::Utc => Some(self.value.and_utc()),
            DateTimeKind::Local(offset) => {
                let shift = TimeDelta::seconds(i64::from(offset.local_minus_utc()));
                Some(self.value.checked_sub_signed(shift)?.and_utc())
            }
        }
    }
}

impl Default for DateTime {
    fn default() -> Self {
        let min = NaiveDate::from_ymd_opt(1, 1, 1)
            .map(|date| date.and_time(NaiveTime::MIN))
            .unwrap_or(NaiveDateTime::MIN);
        Self::new(min, DateTimeKind::Unspecified)
    }
}

impl From<chrono::DateTime<Utc>> for DateTime {
    fn from(value: chrono::DateTime<Utc>) -> Self {
        Self::utc(value.naive_utc())
    }
}

impl From<chrono::DateTime<FixedOffset>> for DateTime {
    fn from(value: chrono::DateTime<FixedOffset>) -> Self {
        Self::new(value.naive_local(), DateTimeKind::Local(*value.offset()))
    }
}

impl_primitive_contract!(
    DateTime,
    DateTime,
    "dc_contract::impls::DateTime",
    "DateTime",
    Some("dc_contract::impls")
);

impl_primitive_contract!(
    TimeDelta,
    TimeSpan,
    "chrono::TimeDelta",
    "TimeDelta",
    Some("chrono")
);

// -----------------------------------------------------------------------------
// DateTimeOffset

/// An instant with a fixed UTC offset.
///
/// Serialized as the `DateTimeOffset` class of the `System` namespace: a
/// `DateTime` member holding the instant in UTC and an `OffsetMinutes`
/// member holding the signed offset.
///
/// The offset travels in whole minutes. Leftover seconds of an offset are
/// dropped toward zero, the instant itself is kept.
///
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use dc_contract::DataContractSerializer;
/// use dc_contract::impls::DateTimeOffset;
///
/// let offset = FixedOffset::west_opt(2 * 3600).unwrap();
/// let at = DateTimeOffset(offset.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());
///
/// let serializer = DataContractSerializer::new::<DateTimeOffset>().unwrap();
/// let xml = serializer.write_object_to_string(&at).unwrap();
/// assert!(xml.contains("<DateTime>2024-05-01T12:00:00Z</DateTime>"));
/// assert!(xml.contains("<OffsetMinutes>-120</OffsetMinutes>"));
/// assert_eq!(serializer.read_object::<DateTimeOffset>(&xml).unwrap(), at);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DateTimeOffset(pub chrono::DateTime<FixedOffset>);

impl DateTimeOffset {
    /// Offset in whole minutes, positive east of UTC, truncated toward zero.
    pub fn offset_minutes(&self) -> i16 {
        (self.0.offset().local_minus_utc() / 60) as i16
    }
}

impl From<chrono::DateTime<FixedOffset>> for DateTimeOffset {
    #[inline]
    fn from(value: chrono::DateTime<FixedOffset>) -> Self {
        Self(value)
    }
}

impl TypePath for DateTimeOffset {
    fn type_path() -> &'static str {
        "dc_contract::impls::DateTimeOffset"
    }

    fn type_name() -> &'static str {
        "DateTimeOffset"
    }

    fn module_path() -> Option<&'static str> {
        Some("dc_contract::impls")
    }
}

impl Typed for DateTimeOffset {
    fn type_info() -> &'static TypeInfo {
        static CELL: TypeInfoCell = TypeInfoCell::new();
        CELL.get_or_init(|| {
            let required = DataMemberAttributes::new().with_is_required(true);
            TypeInfo::Class(
                ClassInfo::new::<Self>(&[
                    FieldInfo::new::<DateTime>("DateTime").with_attributes(required),
                    FieldInfo::new::<i16>("OffsetMinutes").with_attributes(required),
                ])
                .with_attributes(
                    ContractAttributes::new()
                        .with_name("DateTimeOffset")
                        .with_namespace(namespaces::SYSTEM),
                ),
            )
        })
    }
}

impl DataContract for DateTimeOffset {
    fn to_value(&self, cx: &mut ValueContext) -> Value {
        let utc = DateTime::utc(self.0.naive_utc());
        Value::Class(ClassValue::new(
            Self::type_info(),
            vec![
                Some(utc.to_value(cx)),
                Some(self.offset_minutes().to_value(cx)),
            ],
        ))
    }

    fn from_value(value: &Value, cx: &mut ValueContext) -> Result<Self, FromValueError> {
        let class = value.expect_class(Self::type_path())?;
        let utc = match class.member(0) {
            Some(member) => DateTime::from_value(member, cx)?,
            None => DateTime::default(),
        };
        let minutes = match class.member(1) {
            Some(member) => i16::from_value(member, cx)?,
            None => 0,
        };

        let offset = FixedOffset::east_opt(i32::from(minutes) * 60).ok_or_else(|| {
            FromValueError::Custom(alloc::format!("offset of {minutes} minutes is out of range"))
        })?;
        let instant = match utc.to_utc() {
            Some(instant) => instant.naive_utc(),
            None => utc.value(),
        };
        Ok(Self(chrono::DateTime::from_naive_utc_and_offset(instant, offset)))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};

    use super::DateTimeOffset;
    use crate::DataContractSerializer;

    #[test]
    fn sub_minute_offsets_keep_the_instant() {
        let offset = FixedOffset::west_opt(90).unwrap();
        let at = DateTimeOffset(offset.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());
        assert_eq!(at.offset_minutes(), -1);

        let serializer = DataContractSerializer::new::<DateTimeOffset>().unwrap();
        let xml = serializer.write_object_to_string(&at).unwrap();
        assert!(xml.contains("<OffsetMinutes>-1</OffsetMinutes>"), "{xml}");

        let back = serializer.read_object::<DateTimeOffset>(&xml).unwrap();
        assert_eq!(back.0.timestamp(), at.0.timestamp());
        assert_eq!(back.0.offset().local_minus_utc(), -60);
    }
}
