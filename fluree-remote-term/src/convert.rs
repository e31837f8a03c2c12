//! Term value conversion
//!
//! Lenient conversion between a [`Node`]'s lexical form and native scalars,
//! driven by the [`TypeRegistry`].
//!
//! ## Allowed sources
//!
//! Which source datatypes may feed which target is decided by the wire type
//! the registry assigns to the source datatype (aliases resolved first):
//!
//! | Target | Accepted source wire types |
//! |--------|----------------------------|
//! | boolean, numeric, number | boolean/numeric family, character |
//! | date | DATE, TIMESTAMP, TIMESTAMP_WITH_TIMEZONE, character |
//! | time | TIME, TIMESTAMP, TIMESTAMP_WITH_TIMEZONE, character |
//! | date-time | DATE, TIMESTAMP, TIMESTAMP_WITH_TIMEZONE, character |
//! | string | anything (IRIs render as their text, blank nodes as `_:label`) |
//!
//! Unknown datatypes fall back to the string mapping, so they are treated as
//! character data.

use crate::error::{Result, TypeConversionError};
use crate::native::{NativeType, NativeValue};
use crate::node::{Iri, Literal, Node};
use crate::registry::{TypeMapping, TypeRegistry};
use crate::temporal;
use crate::wire::WireType;
use bigdecimal::BigDecimal;
use fluree_vocab::xsd;
use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};
use std::str::FromStr;

/// Converts between terms and native values using a registry
#[derive(Clone, Copy, Debug)]
pub struct Converter<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> Converter<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    /// Convert a term to the requested native type
    pub fn to_native(&self, node: &Node, target: NativeType) -> Result<NativeValue> {
        let lit = match node {
            Node::Literal(lit) => lit,
            Node::Iri(iri) if target == NativeType::String => {
                return Ok(NativeValue::String(iri.as_str().to_string()))
            }
            Node::Blank(id) if target == NativeType::String => {
                return Ok(NativeValue::String(id.to_string()))
            }
            other => {
                return Err(TypeConversionError::new(
                    other.type_label(),
                    target.name(),
                    "only literals carry a convertible value",
                ))
            }
        };

        let datatype = lit.datatype().as_str();
        let source = self.source_wire_type(datatype);
        if !accepts(target, source) {
            return Err(TypeConversionError::new(
                datatype,
                target.name(),
                format!("{} values cannot be read as {}", source, target),
            ));
        }

        let lexical = lit.lexical_form();
        let fail = |detail: String| TypeConversionError::new(datatype, target.name(), detail);

        match target {
            NativeType::String => Ok(NativeValue::String(lexical.to_string())),
            NativeType::Boolean => parse_boolean(lexical, source).map(NativeValue::Boolean).map_err(fail),
            NativeType::Date => temporal::parse_date(lexical).map(NativeValue::Date).map_err(fail),
            NativeType::Time => temporal::parse_time_best(lexical).map_err(fail),
            NativeType::DateTime => temporal::parse_date_time_best(lexical).map_err(fail),
            numeric => {
                let text = numeric_text(datatype, lexical).map_err(&fail)?;
                parse_numeric(&text, numeric).map_err(fail)
            }
        }
    }

    /// Convert a term to the native type its datatype naturally maps to
    pub fn to_object(&self, node: &Node) -> Result<NativeValue> {
        let target = match node {
            Node::Literal(lit) => {
                let mapping = self.registry.standard_or_custom(lit.datatype().as_str());
                if lit.language().is_some() {
                    NativeType::String
                } else {
                    mapping.native_type
                }
            }
            Node::Iri(_) | Node::Blank(_) => NativeType::String,
        };
        self.to_native(node, target)
    }

    /// Build a literal for a native value.
    ///
    /// Without a wire type the datatype is picked from the value's own type.
    /// With one, the value is converted to that wire type's standard mapping
    /// first; codes without a mapping fail immediately.
    pub fn from_native(&self, value: &NativeValue, wire_type: Option<WireType>) -> Result<Node> {
        let Some(wire_type) = wire_type else {
            return Ok(Node::Literal(Literal::new(
                value.lexical(),
                Some(Iri::new(natural_datatype(value))),
            )));
        };

        let mapping = self.registry.standard_by_wire_type(wire_type).ok_or_else(|| {
            TypeConversionError::new(
                value.native_type().name(),
                wire_type.name(),
                "wire type cannot be marshalled",
            )
        })?;

        if mapping.datatype.as_str() == xsd::DATE_TIME_STAMP
            && matches!(value, NativeValue::LocalDateTime(_))
        {
            return Err(TypeConversionError::new(
                value.native_type().name(),
                wire_type.name(),
                "a zone offset is required",
            ));
        }

        if value.native_type() == mapping.native_type {
            return Ok(literal_for(mapping, value.lexical()));
        }

        // 8/16/32/64-bit integers go straight into a 64-bit column
        if mapping.wire_type == WireType::BigInt {
            if let Some(n) = value.as_i64() {
                return Ok(literal_for(mapping, n.to_string()));
            }
        }

        let intermediate = self.from_native(value, None)?;
        let converted = self
            .to_native(&intermediate, mapping.native_type)
            .map_err(|e| TypeConversionError::new(e.datatype, wire_type.name(), e.detail))?;
        Ok(literal_for(mapping, converted.lexical()))
    }

    fn source_wire_type(&self, datatype: &str) -> WireType {
        let wt = self.registry.standard_or_custom(datatype).wire_type;
        wt.alias_of().unwrap_or(wt)
    }
}

fn literal_for(mapping: &TypeMapping, lexical: String) -> Node {
    Node::Literal(Literal::new(lexical, Some(mapping.datatype.clone())))
}

fn natural_datatype(value: &NativeValue) -> &'static str {
    match value {
        NativeValue::Boolean(_) => xsd::BOOLEAN,
        NativeValue::Byte(_) => xsd::BYTE,
        NativeValue::Short(_) => xsd::SHORT,
        NativeValue::Int(_) => xsd::INT,
        NativeValue::Long(_) => xsd::LONG,
        NativeValue::BigInteger(_) => xsd::INTEGER,
        NativeValue::Float(_) => xsd::FLOAT,
        NativeValue::Double(_) => xsd::DOUBLE,
        NativeValue::Decimal(_) => xsd::DECIMAL,
        NativeValue::String(_) => xsd::STRING,
        NativeValue::Date(_) => xsd::DATE,
        NativeValue::LocalTime(_) | NativeValue::OffsetTime(..) => xsd::TIME,
        NativeValue::LocalDateTime(_) | NativeValue::OffsetDateTime(_) => xsd::DATE_TIME,
    }
}

fn accepts(target: NativeType, source: WireType) -> bool {
    if source.is_character() || target == NativeType::String {
        return true;
    }
    match target {
        NativeType::Date | NativeType::DateTime => matches!(
            source,
            WireType::Date | WireType::Timestamp | WireType::TimestampWithTimezone
        ),
        NativeType::Time => matches!(
            source,
            WireType::Time | WireType::Timestamp | WireType::TimestampWithTimezone
        ),
        _ => source.is_numeric_or_boolean(),
    }
}

fn parse_boolean(lexical: &str, source: WireType) -> std::result::Result<bool, String> {
    let s = lexical.trim();
    match source {
        WireType::Boolean => match s {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(format!("'{}' is not a boolean", s)),
        },
        WireType::VarChar => {
            Ok(s == "-1" || matches!(s.chars().next(), Some('t' | 'T' | 'y' | 'Y' | '1')))
        }
        _ => match s {
            "NaN" => Ok(false),
            "INF" | "-INF" => Ok(true),
            _ => parse_decimal(s).map(|d| integer_digits(&d) > 0),
        },
    }
}

/// Lexical text a numeric parse should see: booleans become 1/0 and
/// single-component calendar fragments yield that component
fn numeric_text(datatype: &str, lexical: &str) -> std::result::Result<String, String> {
    let s = lexical.trim();
    if s.eq_ignore_ascii_case("true") {
        return Ok("1".to_string());
    }
    if s.eq_ignore_ascii_case("false") {
        return Ok("0".to_string());
    }
    if matches!(datatype, xsd::G_YEAR | xsd::G_MONTH | xsd::G_DAY) {
        let local = xsd::datatype_local_name(datatype).unwrap_or(datatype);
        return temporal::calendar_component(local, s);
    }
    Ok(s.to_string())
}

/// Upper bound on the integer digits materialized for a big-integer target
const MAX_BIG_INTEGER_DIGITS: i64 = 4096;

fn parse_decimal(s: &str) -> std::result::Result<BigDecimal, String> {
    BigDecimal::from_str(s).map_err(|_| format!("'{}' is not a number", s))
}

/// Digits before the decimal point; zero or negative when |value| < 1.
/// Read off the mantissa and scale, so exponents are never expanded.
fn integer_digits(dec: &BigDecimal) -> i64 {
    let (mantissa, scale) = dec.as_bigint_and_exponent();
    if mantissa.is_zero() {
        return 0;
    }
    mantissa.magnitude().to_string().len() as i64 - scale
}

/// Integer part of a numeric lexical form, fraction and exponent applied.
/// `None` when the integer part has more than `max_digits` digits.
fn truncate(s: &str, max_digits: i64) -> std::result::Result<Option<BigInt>, String> {
    if let Ok(n) = s.parse::<i64>() {
        return Ok(Some(BigInt::from(n)));
    }
    let dec = parse_decimal(s)?;
    let digits = integer_digits(&dec);
    if digits <= 0 {
        return Ok(Some(BigInt::zero()));
    }
    if digits > max_digits {
        return Ok(None);
    }
    let (int, _) = dec.with_scale(0).into_bigint_and_exponent();
    Ok(Some(int))
}

fn max_integer_digits(target: NativeType) -> i64 {
    match target {
        NativeType::Byte => 3,
        NativeType::Short => 5,
        NativeType::Int => 10,
        NativeType::Long => 19,
        _ => MAX_BIG_INTEGER_DIGITS,
    }
}

fn parse_float(s: &str) -> std::result::Result<f64, String> {
    match s {
        "INF" | "+INF" => Ok(f64::INFINITY),
        "-INF" => Ok(f64::NEG_INFINITY),
        "NaN" => Ok(f64::NAN),
        _ => s.parse::<f64>().map_err(|_| format!("'{}' is not a number", s)),
    }
}

fn is_special_float(s: &str) -> bool {
    matches!(s, "INF" | "+INF" | "-INF" | "NaN")
}

fn parse_numeric(s: &str, target: NativeType) -> std::result::Result<NativeValue, String> {
    if target.is_integral() && is_special_float(s) {
        return Err(format!("'{}' has no integer value", s));
    }
    let out_of_range = || format!("{} is out of range for {}", s, target);
    if target.is_integral() {
        let n = truncate(s, max_integer_digits(target))?.ok_or_else(out_of_range)?;
        let value = match target {
            NativeType::Byte => n.to_i8().map(NativeValue::Byte),
            NativeType::Short => n.to_i16().map(NativeValue::Short),
            NativeType::Int => n.to_i32().map(NativeValue::Int),
            NativeType::Long => n.to_i64().map(NativeValue::Long),
            _ => Some(NativeValue::BigInteger(n)),
        };
        return value.ok_or_else(out_of_range);
    }
    match target {
        NativeType::Float => parse_float(s).map(|d| NativeValue::Float(d as f32)),
        NativeType::Double => parse_float(s).map(NativeValue::Double),
        NativeType::Decimal => BigDecimal::from_str(s)
            .map(NativeValue::Decimal)
            .map_err(|_| format!("'{}' is not a decimal", s)),
        NativeType::Number => parse_number(s),
        other => Err(format!("{} is not a numeric type", other)),
    }
}

/// Best-effort widening: i64, else arbitrary precision, else double
fn parse_number(s: &str) -> std::result::Result<NativeValue, String> {
    if is_special_float(s) || s.contains(['.', 'e', 'E']) {
        return parse_float(s).map(NativeValue::Double);
    }
    if let Ok(n) = s.parse::<i64>() {
        return Ok(NativeValue::Long(n));
    }
    let big = BigInt::from_str(s).map_err(|_| format!("'{}' is not a number", s))?;
    Ok(match big.to_i64() {
        Some(n) => NativeValue::Long(n),
        None => NativeValue::BigInteger(big),
    })
}
