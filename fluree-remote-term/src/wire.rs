//! Wire type codes
//!
//! The fixed vocabulary of column/value type identifiers used for
//! client-facing type negotiation. Only a subset has a standard mapping in
//! the [`TypeRegistry`](crate::TypeRegistry); the rest either alias a
//! standard code or are intentionally unsupported (binary-, array- and
//! struct-like families).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum WireType {
    Bit,
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Float,
    Double,
    Numeric,
    Decimal,
    Char,
    VarChar,
    LongVarChar,
    NChar,
    NVarChar,
    LongNVarChar,
    Clob,
    NClob,
    Date,
    Time,
    TimeWithTimezone,
    Timestamp,
    TimestampWithTimezone,
    Binary,
    VarBinary,
    LongVarBinary,
    Blob,
    Array,
    Struct,
    Ref,
    RowId,
    SqlXml,
    Datalink,
    Distinct,
    JavaObject,
    Other,
    Null,
}

impl WireType {
    /// All wire type codes, in declaration order
    pub const ALL: [WireType; 38] = [
        WireType::Bit,
        WireType::Boolean,
        WireType::TinyInt,
        WireType::SmallInt,
        WireType::Integer,
        WireType::BigInt,
        WireType::Real,
        WireType::Float,
        WireType::Double,
        WireType::Numeric,
        WireType::Decimal,
        WireType::Char,
        WireType::VarChar,
        WireType::LongVarChar,
        WireType::NChar,
        WireType::NVarChar,
        WireType::LongNVarChar,
        WireType::Clob,
        WireType::NClob,
        WireType::Date,
        WireType::Time,
        WireType::TimeWithTimezone,
        WireType::Timestamp,
        WireType::TimestampWithTimezone,
        WireType::Binary,
        WireType::VarBinary,
        WireType::LongVarBinary,
        WireType::Blob,
        WireType::Array,
        WireType::Struct,
        WireType::Ref,
        WireType::RowId,
        WireType::SqlXml,
        WireType::Datalink,
        WireType::Distinct,
        WireType::JavaObject,
        WireType::Other,
        WireType::Null,
    ];

    /// Canonical upper-case name (e.g. `"BIGINT"`)
    pub fn name(self) -> &'static str {
        match self {
            WireType::Bit => "BIT",
            WireType::Boolean => "BOOLEAN",
            WireType::TinyInt => "TINYINT",
            WireType::SmallInt => "SMALLINT",
            WireType::Integer => "INTEGER",
            WireType::BigInt => "BIGINT",
            WireType::Real => "REAL",
            WireType::Float => "FLOAT",
            WireType::Double => "DOUBLE",
            WireType::Numeric => "NUMERIC",
            WireType::Decimal => "DECIMAL",
            WireType::Char => "CHAR",
            WireType::VarChar => "VARCHAR",
            WireType::LongVarChar => "LONGVARCHAR",
            WireType::NChar => "NCHAR",
            WireType::NVarChar => "NVARCHAR",
            WireType::LongNVarChar => "LONGNVARCHAR",
            WireType::Clob => "CLOB",
            WireType::NClob => "NCLOB",
            WireType::Date => "DATE",
            WireType::Time => "TIME",
            WireType::TimeWithTimezone => "TIME_WITH_TIMEZONE",
            WireType::Timestamp => "TIMESTAMP",
            WireType::TimestampWithTimezone => "TIMESTAMP_WITH_TIMEZONE",
            WireType::Binary => "BINARY",
            WireType::VarBinary => "VARBINARY",
            WireType::LongVarBinary => "LONGVARBINARY",
            WireType::Blob => "BLOB",
            WireType::Array => "ARRAY",
            WireType::Struct => "STRUCT",
            WireType::Ref => "REF",
            WireType::RowId => "ROWID",
            WireType::SqlXml => "SQLXML",
            WireType::Datalink => "DATALINK",
            WireType::Distinct => "DISTINCT",
            WireType::JavaObject => "JAVA_OBJECT",
            WireType::Other => "OTHER",
            WireType::Null => "NULL",
        }
    }

    /// The standard code this code is an alias of, if any.
    ///
    /// Aliases share the standard code's mapping instead of carrying one of
    /// their own.
    pub fn alias_of(self) -> Option<WireType> {
        match self {
            WireType::Bit => Some(WireType::Boolean),
            WireType::Float => Some(WireType::Double),
            WireType::Char
            | WireType::LongVarChar
            | WireType::NChar
            | WireType::NVarChar
            | WireType::LongNVarChar
            | WireType::Clob
            | WireType::NClob => Some(WireType::VarChar),
            WireType::TimeWithTimezone => Some(WireType::Time),
            _ => None,
        }
    }

    /// Codes that can never be marshalled to or from a term
    pub fn is_unsupported(self) -> bool {
        matches!(
            self,
            WireType::Binary
                | WireType::VarBinary
                | WireType::LongVarBinary
                | WireType::Blob
                | WireType::Array
                | WireType::Struct
                | WireType::Ref
                | WireType::RowId
                | WireType::SqlXml
                | WireType::Datalink
                | WireType::Distinct
                | WireType::JavaObject
                | WireType::Other
                | WireType::Null
        )
    }

    /// Boolean and numeric codes (which interchange during conversion)
    pub fn is_numeric_or_boolean(self) -> bool {
        matches!(
            self,
            WireType::Bit
                | WireType::Boolean
                | WireType::TinyInt
                | WireType::SmallInt
                | WireType::Integer
                | WireType::BigInt
                | WireType::Real
                | WireType::Float
                | WireType::Double
                | WireType::Numeric
                | WireType::Decimal
        )
    }

    /// Character codes
    pub fn is_character(self) -> bool {
        matches!(self.alias_of().unwrap_or(self), WireType::VarChar)
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<WireType> for &'static str {
    fn from(wt: WireType) -> Self {
        wt.name()
    }
}

impl FromStr for WireType {
    type Err = String;

    /// Parse a canonical name as produced by [`WireType::name`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WireType::ALL
            .into_iter()
            .find(|wt| wt.name() == s)
            .ok_or_else(|| format!("unknown wire type code: {}", s))
    }
}

impl TryFrom<String> for WireType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_point_at_supported_codes() {
        for wt in WireType::ALL {
            if let Some(target) = wt.alias_of() {
                assert!(target.alias_of().is_none(), "{} aliases an alias", wt);
                assert!(!target.is_unsupported());
            }
        }
    }

    #[test]
    fn test_character_family() {
        assert!(WireType::NVarChar.is_character());
        assert!(WireType::VarChar.is_character());
        assert!(!WireType::Integer.is_character());
    }

    #[test]
    fn test_serde_name() {
        let json = serde_json::to_string(&WireType::TimestampWithTimezone).unwrap();
        assert_eq!(json, "\"TIMESTAMP_WITH_TIMEZONE\"");
    }

    #[test]
    fn test_serde_uses_display_names() {
        for wt in WireType::ALL {
            let json = serde_json::to_string(&wt).unwrap();
            assert_eq!(json, format!("\"{}\"", wt));
            let back: WireType = serde_json::from_str(&json).unwrap();
            assert_eq!(back, wt);
        }
        assert_eq!(serde_json::to_string(&WireType::BigInt).unwrap(), "\"BIGINT\"");
        assert_eq!(serde_json::to_string(&WireType::SqlXml).unwrap(), "\"SQLXML\"");
        assert!(serde_json::from_str::<WireType>("\"BIG_INT\"").is_err());
        assert_eq!("VARCHAR".parse::<WireType>(), Ok(WireType::VarChar));
    }
}
