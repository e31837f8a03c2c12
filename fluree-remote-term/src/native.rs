//! Native value model
//!
//! [`NativeType`] is the closed set of conversion targets; [`NativeValue`]
//! is the value produced by converting a literal to one of them.

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat};
use num_bigint::BigInt;
use std::fmt;

/// Conversion target tag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NativeType {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    BigInteger,
    Float,
    Double,
    Decimal,
    /// Best-effort numeric widening: integer, 64-bit, arbitrary precision or double
    Number,
    String,
    Date,
    /// Offset-aware when the lexical form carries a zone, local otherwise
    Time,
    /// Offset-aware when the lexical form carries a zone, local otherwise
    DateTime,
}

impl NativeType {
    pub fn name(self) -> &'static str {
        match self {
            NativeType::Boolean => "boolean",
            NativeType::Byte => "byte",
            NativeType::Short => "short",
            NativeType::Int => "int",
            NativeType::Long => "long",
            NativeType::BigInteger => "big integer",
            NativeType::Float => "float",
            NativeType::Double => "double",
            NativeType::Decimal => "decimal",
            NativeType::Number => "number",
            NativeType::String => "string",
            NativeType::Date => "date",
            NativeType::Time => "time",
            NativeType::DateTime => "date-time",
        }
    }

    pub fn is_integral(self) -> bool {
        matches!(
            self,
            NativeType::Byte
                | NativeType::Short
                | NativeType::Int
                | NativeType::Long
                | NativeType::BigInteger
        )
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A native value converted from (or destined for) a literal
#[derive(Clone, Debug, PartialEq)]
pub enum NativeValue {
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    BigInteger(BigInt),
    Float(f32),
    Double(f64),
    Decimal(BigDecimal),
    String(String),
    Date(NaiveDate),
    LocalTime(NaiveTime),
    OffsetTime(NaiveTime, FixedOffset),
    LocalDateTime(NaiveDateTime),
    OffsetDateTime(DateTime<FixedOffset>),
}

impl NativeValue {
    /// The target tag this value satisfies
    pub fn native_type(&self) -> NativeType {
        match self {
            NativeValue::Boolean(_) => NativeType::Boolean,
            NativeValue::Byte(_) => NativeType::Byte,
            NativeValue::Short(_) => NativeType::Short,
            NativeValue::Int(_) => NativeType::Int,
            NativeValue::Long(_) => NativeType::Long,
            NativeValue::BigInteger(_) => NativeType::BigInteger,
            NativeValue::Float(_) => NativeType::Float,
            NativeValue::Double(_) => NativeType::Double,
            NativeValue::Decimal(_) => NativeType::Decimal,
            NativeValue::String(_) => NativeType::String,
            NativeValue::Date(_) => NativeType::Date,
            NativeValue::LocalTime(_) | NativeValue::OffsetTime(..) => NativeType::Time,
            NativeValue::LocalDateTime(_) | NativeValue::OffsetDateTime(_) => {
                NativeType::DateTime
            }
        }
    }

    /// Widen any fixed-width integer to i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            NativeValue::Byte(v) => Some(i64::from(*v)),
            NativeValue::Short(v) => Some(i64::from(*v)),
            NativeValue::Int(v) => Some(i64::from(*v)),
            NativeValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// XSD lexical form of this value
    pub fn lexical(&self) -> String {
        match self {
            NativeValue::Boolean(b) => b.to_string(),
            NativeValue::Byte(v) => v.to_string(),
            NativeValue::Short(v) => v.to_string(),
            NativeValue::Int(v) => v.to_string(),
            NativeValue::Long(v) => v.to_string(),
            NativeValue::BigInteger(v) => v.to_string(),
            NativeValue::Float(v) => float_lexical(f64::from(*v)),
            NativeValue::Double(v) => float_lexical(*v),
            NativeValue::Decimal(v) => v.to_string(),
            NativeValue::String(s) => s.clone(),
            NativeValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            NativeValue::LocalTime(t) => t.format("%H:%M:%S%.f").to_string(),
            NativeValue::OffsetTime(t, offset) => {
                format!("{}{}", t.format("%H:%M:%S%.f"), zone_lexical(offset))
            }
            NativeValue::LocalDateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
            NativeValue::OffsetDateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }
}

impl fmt::Display for NativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lexical())
    }
}

fn float_lexical(d: f64) -> String {
    if d.is_nan() {
        "NaN".to_string()
    } else if d.is_infinite() {
        if d.is_sign_positive() {
            "INF".to_string()
        } else {
            "-INF".to_string()
        }
    } else {
        d.to_string()
    }
}

/// `Z` for UTC, `+hh:mm` / `-hh:mm` otherwise
pub(crate) fn zone_lexical(offset: &FixedOffset) -> String {
    let secs = offset.local_minus_utc();
    if secs == 0 {
        "Z".to_string()
    } else {
        let sign = if secs >= 0 { '+' } else { '-' };
        let hours = secs.abs() / 3600;
        let mins = (secs.abs() % 3600) / 60;
        format!("{}{:02}:{:02}", sign, hours, mins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_lexical() {
        assert_eq!(NativeValue::Double(f64::INFINITY).lexical(), "INF");
        assert_eq!(NativeValue::Double(f64::NEG_INFINITY).lexical(), "-INF");
        assert_eq!(NativeValue::Float(f32::NAN).lexical(), "NaN");
        assert_eq!(NativeValue::Double(123.4).lexical(), "123.4");
    }

    #[test]
    fn test_temporal_lexical() {
        let t = NaiveTime::from_hms_opt(10, 30, 0).unwrap();
        assert_eq!(NativeValue::LocalTime(t).lexical(), "10:30:00");
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(NativeValue::OffsetTime(t, utc).lexical(), "10:30:00Z");
        let minus5 = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(NativeValue::OffsetTime(t, minus5).lexical(), "10:30:00-05:00");

        let dt = DateTime::parse_from_rfc3339("2024-01-15T10:30:00+02:00").unwrap();
        assert_eq!(
            NativeValue::OffsetDateTime(dt).lexical(),
            "2024-01-15T10:30:00+02:00"
        );
    }

    #[test]
    fn test_as_i64_widens() {
        assert_eq!(NativeValue::Byte(-3).as_i64(), Some(-3));
        assert_eq!(NativeValue::Int(7).as_i64(), Some(7));
        assert_eq!(NativeValue::Double(1.0).as_i64(), None);
    }
}
