use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{FixedOffset, NaiveDateTime, TimeDelta, Timelike};
use thiserror::Error;
use uuid::Uuid;

use crate::impls::{DateTime, DateTimeKind};
use crate::info::PrimitiveKind;

// -----------------------------------------------------------------------------
// Primitive

/// A scalar value of one of the builtin [`PrimitiveKind`]s.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    String(String),
    Boolean(bool),
    Byte(i8),
    UnsignedByte(u8),
    Short(i16),
    UnsignedShort(u16),
    Int(i32),
    UnsignedInt(u32),
    Long(i64),
    UnsignedLong(u64),
    Float(f32),
    Double(f64),
    Char(char),
    DateTime(DateTime),
    TimeSpan(TimeDelta),
    Guid(Uuid),
    Base64Binary(Vec<u8>),
    AnyUri(String),
}

/// Text content that does not parse as the expected primitive kind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("`{text}` is not a valid {kind} value")]
pub struct PrimitiveParseError {
    pub kind: PrimitiveKind,
    pub text: String,
}

impl Primitive {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::String(_) => PrimitiveKind::String,
            Self::Boolean(_) => PrimitiveKind::Boolean,
            Self::Byte(_) => PrimitiveKind::Byte,
            Self::UnsignedByte(_) => PrimitiveKind::UnsignedByte,
            Self::Short(_) => PrimitiveKind::Short,
            Self::UnsignedShort(_) => PrimitiveKind::UnsignedShort,
            Self::Int(_) => PrimitiveKind::Int,
            Self::UnsignedInt(_) => PrimitiveKind::UnsignedInt,
            Self::Long(_) => PrimitiveKind::Long,
            Self::UnsignedLong(_) => PrimitiveKind::UnsignedLong,
            Self::Float(_) => PrimitiveKind::Float,
            Self::Double(_) => PrimitiveKind::Double,
            Self::Char(_) => PrimitiveKind::Char,
            Self::DateTime(_) => PrimitiveKind::DateTime,
            Self::TimeSpan(_) => PrimitiveKind::TimeSpan,
            Self::Guid(_) => PrimitiveKind::Guid,
            Self::Base64Binary(_) => PrimitiveKind::Base64Binary,
            Self::AnyUri(_) => PrimitiveKind::AnyUri,
        }
    }

    /// Whether the value equals the default of its kind.
    ///
    /// Strings, binary and uris are never default: their default is the
    /// absent value, which only a nullable slot can hold.
    pub fn is_default(&self) -> bool {
        match self {
            Self::String(_) | Self::Base64Binary(_) | Self::AnyUri(_) => false,
            Self::Boolean(v) => !*v,
            Self::Byte(v) => *v == 0,
            Self::UnsignedByte(v) => *v == 0,
            Self::Short(v) => *v == 0,
            Self::UnsignedShort(v) => *v == 0,
            Self::Int(v) => *v == 0,
            Self::UnsignedInt(v) => *v == 0,
            Self::Long(v) => *v == 0,
            Self::UnsignedLong(v) => *v == 0,
            Self::Float(v) => *v == 0.0,
            Self::Double(v) => *v == 0.0,
            Self::Char(v) => *v == '\0',
            Self::DateTime(v) => v.value() == DateTime::default().value(),
            Self::TimeSpan(v) => v.is_zero(),
            Self::Guid(v) => v.is_nil(),
        }
    }

    /// The canonical, locale-invariant text of the value.
    ///
    /// ```
    /// use dc_contract::value::Primitive;
    ///
    /// assert_eq!(Primitive::Boolean(true).to_text(), "true");
    /// assert_eq!(Primitive::Double(f64::NEG_INFINITY).to_text(), "-INF");
    /// assert_eq!(Primitive::Char('A').to_text(), "65");
    /// assert_eq!(Primitive::Base64Binary(vec![1, 2, 3]).to_text(), "AQID");
    /// ```
    pub fn to_text(&self) -> String {
        match self {
            Self::String(v) | Self::AnyUri(v) => v.clone(),
            Self::Boolean(v) => String::from(if *v { "true" } else { "false" }),
            Self::Byte(v) => v.to_string(),
            Self::UnsignedByte(v) => v.to_string(),
            Self::Short(v) => v.to_string(),
            Self::UnsignedShort(v) => v.to_string(),
            Self::Int(v) => v.to_string(),
            Self::UnsignedInt(v) => v.to_string(),
            Self::Long(v) => v.to_string(),
            Self::UnsignedLong(v) => v.to_string(),
            Self::Float(v) => float_text(f64::from(*v), v.is_nan(), || v.to_string()),
            Self::Double(v) => float_text(*v, v.is_nan(), || v.to_string()),
            Self::Char(v) => u32::from(*v).to_string(),
            Self::DateTime(v) => date_time_text(v),
            Self::TimeSpan(v) => duration_text(*v),
            Self::Guid(v) => v.hyphenated().to_string(),
            Self::Base64Binary(v) => STANDARD.encode(v),
        }
    }

    /// Whether [`to_text`](Self::to_text) keeps the whole value.
    ///
    /// `dateTime` and `duration` text resolves 100 ns ticks.
    ///
    /// ```
    /// use chrono::TimeDelta;
    /// use dc_contract::value::Primitive;
    ///
    /// assert!(Primitive::TimeSpan(TimeDelta::nanoseconds(200)).is_exact());
    /// assert!(!Primitive::TimeSpan(TimeDelta::nanoseconds(150)).is_exact());
    /// ```
    pub fn is_exact(&self) -> bool {
        match self {
            Self::DateTime(v) => v.value().nanosecond() % NANOS_PER_TICK == 0,
            Self::TimeSpan(v) => v.subsec_nanos().unsigned_abs() % NANOS_PER_TICK == 0,
            _ => true,
        }
    }

    /// Parses text content as a value of `kind`.
    ///
    /// Whitespace around non-string values is ignored.
    ///
    /// ```
    /// use dc_contract::info::PrimitiveKind;
    /// use dc_contract::value::Primitive;
    ///
    /// assert_eq!(Primitive::parse(PrimitiveKind::Int, " 42 "), Ok(Primitive::Int(42)));
    /// assert_eq!(Primitive::parse(PrimitiveKind::Boolean, "1"), Ok(Primitive::Boolean(true)));
    /// assert!(Primitive::parse(PrimitiveKind::Int, "forty-two").is_err());
    /// ```
    pub fn parse(kind: PrimitiveKind, text: &str) -> Result<Self, PrimitiveParseError> {
        let error = || PrimitiveParseError {
            kind,
            text: String::from(text),
        };
        let trimmed = text.trim();

        macro_rules! number {
            ($variant:ident) => {
                trimmed.parse().map(Self::$variant).map_err(|_| error())
            };
        }

        match kind {
            PrimitiveKind::String => Ok(Self::String(String::from(text))),
            PrimitiveKind::AnyUri => Ok(Self::AnyUri(String::from(trimmed))),
            PrimitiveKind::Boolean => match trimmed {
                "true" | "1" => Ok(Self::Boolean(true)),
                "false" | "0" => Ok(Self::Boolean(false)),
                _ => Err(error()),
            },
            PrimitiveKind::Byte => number!(Byte),
            PrimitiveKind::UnsignedByte => number!(UnsignedByte),
            PrimitiveKind::Short => number!(Short),
            PrimitiveKind::UnsignedShort => number!(UnsignedShort),
            PrimitiveKind::Int => number!(Int),
            PrimitiveKind::UnsignedInt => number!(UnsignedInt),
            PrimitiveKind::Long => number!(Long),
            PrimitiveKind::UnsignedLong => number!(UnsignedLong),
            PrimitiveKind::Float => match trimmed {
                "INF" => Ok(Self::Float(f32::INFINITY)),
                "-INF" => Ok(Self::Float(f32::NEG_INFINITY)),
                "NaN" => Ok(Self::Float(f32::NAN)),
                _ => number!(Float),
            },
            PrimitiveKind::Double => match trimmed {
                "INF" => Ok(Self::Double(f64::INFINITY)),
                "-INF" => Ok(Self::Double(f64::NEG_INFINITY)),
                "NaN" => Ok(Self::Double(f64::NAN)),
                _ => number!(Double),
            },
            PrimitiveKind::Char => trimmed
                .parse::<u32>()
                .ok()
                .and_then(char::from_u32)
                .map(Self::Char)
                .ok_or_else(error),
            PrimitiveKind::DateTime => parse_date_time(trimmed)
                .map(Self::DateTime)
                .ok_or_else(error),
            PrimitiveKind::TimeSpan => parse_duration(trimmed)
                .map(Self::TimeSpan)
                .ok_or_else(error),
            PrimitiveKind::Guid => Uuid::parse_str(trimmed)
                .map(Self::Guid)
                .map_err(|_| error()),
            PrimitiveKind::Base64Binary => {
                let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
                STANDARD
                    .decode(compact)
                    .map(Self::Base64Binary)
                    .map_err(|_| error())
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Text formats

const NANOS_PER_TICK: u32 = 100;

fn float_text(value: f64, is_nan: bool, text: impl FnOnce() -> String) -> String {
    if is_nan {
        String::from("NaN")
    } else if value == f64::INFINITY {
        String::from("INF")
    } else if value == f64::NEG_INFINITY {
        String::from("-INF")
    } else {
        text()
    }
}

/// Seven digit tick fraction with trailing zeros removed, empty for zero.
fn push_fraction(out: &mut String, nanos: u32) {
    let ticks = (nanos % 1_000_000_000) / NANOS_PER_TICK;
    if ticks != 0 {
        let digits = format!("{ticks:07}");
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
}

fn push_offset(out: &mut String, offset: FixedOffset) {
    let seconds = offset.local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.unsigned_abs() / 60;
    let _ = write!(out, "{sign}{:02}:{:02}", minutes / 60, minutes % 60);
}

fn date_time_text(value: &DateTime) -> String {
    let naive = value.value();
    let mut out = naive.format("%Y-%m-%dT%H:%M:%S").to_string();
    push_fraction(&mut out, naive.nanosecond());
    match value.kind() {
        DateTimeKind::Unspecified => {}
        DateTimeKind::Utc => out.push('Z'),
        DateTimeKind::Local(offset) => push_offset(&mut out, offset),
    }
    out
}

fn parse_date_time(text: &str) -> Option<DateTime> {
    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    if let Some(naive) = text.strip_suffix('Z') {
        let value = NaiveDateTime::parse_from_str(naive, FORMAT).ok()?;
        return Some(DateTime::new(value, DateTimeKind::Utc));
    }

    let bytes = text.as_bytes();
    if bytes.len() > 6
        && matches!(bytes[bytes.len() - 6], b'+' | b'-')
        && bytes[bytes.len() - 3] == b':'
        && text.contains('T')
    {
        let (naive, offset) = text.split_at(text.len() - 6);
        let sign = if offset.starts_with('-') { -1 } else { 1 };
        let hours: i32 = offset.get(1..3)?.parse().ok()?;
        let minutes: i32 = offset.get(4..6)?.parse().ok()?;
        let offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))?;
        let value = NaiveDateTime::parse_from_str(naive, FORMAT).ok()?;
        return Some(DateTime::new(value, DateTimeKind::Local(offset)));
    }

    let value = NaiveDateTime::parse_from_str(text, FORMAT).ok()?;
    Some(DateTime::new(value, DateTimeKind::Unspecified))
}

fn duration_text(value: TimeDelta) -> String {
    if value.is_zero() {
        return String::from("PT0S");
    }

    let mut out = String::new();
    if value < TimeDelta::zero() {
        out.push('-');
    }
    out.push('P');

    let value = value.abs();
    let seconds = value.num_seconds();
    let nanos = value.subsec_nanos().unsigned_abs();
    let (days, hours, minutes, secs) = (
        seconds / 86_400,
        seconds % 86_400 / 3_600,
        seconds % 3_600 / 60,
        seconds % 60,
    );

    if days != 0 {
        let _ = write!(out, "{days}D");
    }
    let ticks = nanos / NANOS_PER_TICK;
    if hours != 0 || minutes != 0 || secs != 0 || ticks != 0 {
        out.push('T');
        if hours != 0 {
            let _ = write!(out, "{hours}H");
        }
        if minutes != 0 {
            let _ = write!(out, "{minutes}M");
        }
        if secs != 0 || ticks != 0 {
            let _ = write!(out, "{secs}");
            push_fraction(&mut out, nanos);
            out.push('S');
        }
    }
    out
}

fn parse_duration(text: &str) -> Option<TimeDelta> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let mut rest = rest.strip_prefix('P')?;
    if rest.is_empty() {
        return None;
    }

    let mut seconds: i64 = 0;
    let mut nanos: i64 = 0;
    let mut in_time = false;

    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix('T') {
            if in_time || tail.is_empty() {
                return None;
            }
            in_time = true;
            rest = tail;
            continue;
        }

        let end = rest.find(|c: char| !c.is_ascii_digit() && c != '.')?;
        let (number, tail) = rest.split_at(end);
        let mut chars = tail.chars();
        let designator = chars.next()?;
        rest = chars.as_str();

        let (whole, fraction) = match number.split_once('.') {
            Some((whole, fraction)) if designator == 'S' && in_time => (whole, fraction),
            Some(_) => return None,
            None => (number, ""),
        };
        let whole: i64 = if whole.is_empty() && !fraction.is_empty() {
            0
        } else {
            whole.parse().ok()?
        };

        let unit = match (in_time, designator) {
            (false, 'Y') => 365 * 86_400,
            (false, 'M') => 30 * 86_400,
            (false, 'D') => 86_400,
            (true, 'H') => 3_600,
            (true, 'M') => 60,
            (true, 'S') => 1,
            _ => return None,
        };
        seconds = seconds.checked_add(whole.checked_mul(unit)?)?;

        if !fraction.is_empty() {
            let digits: String = fraction.chars().take(9).collect();
            let scale = 10_i64.pow(9 - digits.len() as u32);
            nanos = digits.parse::<i64>().ok()? * scale;
        }
    }

    let value = TimeDelta::try_seconds(seconds)?.checked_add(&TimeDelta::nanoseconds(nanos))?;
    Some(if negative { -value } else { value })
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Primitive, parse_duration};
    use crate::impls::{DateTime, DateTimeKind};
    use crate::info::PrimitiveKind;
    use chrono::{FixedOffset, NaiveDate, TimeDelta};

    fn naive(h: u32, m: u32, s: u32, nanos: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_nano_opt(h, m, s, nanos)
            .unwrap()
    }

    #[test]
    fn date_time_text_forms() {
        let utc = DateTime::new(naive(10, 0, 0, 0), DateTimeKind::Utc);
        assert_eq!(Primitive::DateTime(utc).to_text(), "2024-03-09T10:00:00Z");

        let fraction = DateTime::new(naive(1, 2, 3, 120_000_000), DateTimeKind::Unspecified);
        assert_eq!(Primitive::DateTime(fraction).to_text(), "2024-03-09T01:02:03.12");

        let offset = FixedOffset::east_opt(-2 * 3600).unwrap();
        let local = DateTime::new(naive(8, 30, 0, 0), DateTimeKind::Local(offset));
        let text = Primitive::DateTime(local).to_text();
        assert_eq!(text, "2024-03-09T08:30:00-02:00");
        assert_eq!(
            Primitive::parse(PrimitiveKind::DateTime, &text),
            Ok(Primitive::DateTime(local))
        );
    }

    #[test]
    fn duration_text_forms() {
        let text = |d: TimeDelta| Primitive::TimeSpan(d).to_text();
        assert_eq!(text(TimeDelta::zero()), "PT0S");
        assert_eq!(text(TimeDelta::days(1) + TimeDelta::hours(2)), "P1DT2H");
        assert_eq!(text(TimeDelta::milliseconds(1500)), "PT1.5S");
        assert_eq!(text(-TimeDelta::minutes(90)), "-PT1H30M");
    }

    #[test]
    fn only_whole_ticks_are_exact() {
        let tick = DateTime::new(naive(0, 0, 0, 300), DateTimeKind::Utc);
        assert!(Primitive::DateTime(tick).is_exact());
        assert_eq!(Primitive::DateTime(tick).to_text(), "2024-03-09T00:00:00.0000003Z");

        let finer = DateTime::new(naive(0, 0, 0, 301), DateTimeKind::Utc);
        assert!(!Primitive::DateTime(finer).is_exact());
        assert!(!Primitive::TimeSpan(-TimeDelta::nanoseconds(1)).is_exact());
        assert!(Primitive::Int(7).is_exact());
    }

    #[test]
    fn duration_parse_forms() {
        assert_eq!(parse_duration("PT0S"), Some(TimeDelta::zero()));
        assert_eq!(parse_duration("P1Y"), Some(TimeDelta::days(365)));
        assert_eq!(parse_duration("P1M"), Some(TimeDelta::days(30)));
        assert_eq!(parse_duration("-PT1H30M"), Some(-TimeDelta::minutes(90)));
        assert_eq!(parse_duration("PT0.25S"), Some(TimeDelta::milliseconds(250)));
        assert_eq!(parse_duration("P"), None);
        assert_eq!(parse_duration("PT"), None);
        assert_eq!(parse_duration("P1H"), None);
    }

    #[test]
    fn defaults() {
        assert!(Primitive::Int(0).is_default());
        assert!(!Primitive::Int(1).is_default());
        assert!(!Primitive::String(Default::default()).is_default());
        assert!(Primitive::Guid(uuid::Uuid::nil()).is_default());
        assert!(Primitive::DateTime(DateTime::default()).is_default());
    }

    #[test]
    fn guid_is_lowercase() {
        let text = "6F9619FF-8B86-D011-B42D-00C04FC964FF";
        let parsed = Primitive::parse(PrimitiveKind::Guid, text).unwrap();
        assert_eq!(parsed.to_text(), "6f9619ff-8b86-d011-b42d-00c04fc964ff");
    }
}
