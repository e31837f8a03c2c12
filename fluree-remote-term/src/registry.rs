//! Type registry: datatype IRI <-> wire type code <-> native type
//!
//! The registry is an immutable value built once at startup and passed by
//! reference to whatever needs it (the [`Converter`](crate::Converter), the
//! client, the CLI). There is no global instance.
//!
//! Two kinds of mapping are registered:
//! - **standard** mappings own a wire type code; at most one per code
//! - **custom** mappings cover extension datatypes and reuse the wire type
//!   of an existing standard mapping
//!
//! Every datatype IRI appears at most once across both kinds.

use crate::error::RegistryError;
use crate::native::NativeType;
use crate::node::Iri;
use crate::wire::WireType;
use fluree_vocab::{rdf, xsd};
use std::collections::HashMap;

/// One row of the registry table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeMapping {
    pub datatype: Iri,
    pub wire_type: WireType,
    pub native_type: NativeType,
    pub precision: i32,
    pub scale: Option<i32>,
    pub signed: Option<bool>,
    pub fixed_precision_scale: Option<bool>,
}

impl TypeMapping {
    pub fn new(
        datatype: &str,
        wire_type: WireType,
        native_type: NativeType,
        precision: i32,
    ) -> Self {
        Self {
            datatype: Iri::new(datatype),
            wire_type,
            native_type,
            precision,
            scale: None,
            signed: None,
            fixed_precision_scale: None,
        }
    }

    pub fn with_scale(mut self, scale: i32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_signed(mut self, signed: bool) -> Self {
        self.signed = Some(signed);
        self
    }

    pub fn with_fixed_precision_scale(mut self, fixed: bool) -> Self {
        self.fixed_precision_scale = Some(fixed);
        self
    }
}

/// Accumulates mappings and checks key uniqueness
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    standard: Vec<TypeMapping>,
    custom: Vec<TypeMapping>,
}

impl RegistryBuilder {
    pub fn standard(mut self, mapping: TypeMapping) -> Self {
        self.standard.push(mapping);
        self
    }

    pub fn custom(mut self, mapping: TypeMapping) -> Self {
        self.custom.push(mapping);
        self
    }

    pub fn build(self) -> Result<TypeRegistry, RegistryError> {
        let mut by_datatype: HashMap<String, TypeMapping> = HashMap::new();
        let mut by_wire_type: HashMap<WireType, String> = HashMap::new();

        for mapping in self.standard {
            let key = mapping.datatype.as_str().to_string();
            if by_datatype.contains_key(&key) {
                return Err(RegistryError::Duplicate(format!("datatype {}", key)));
            }
            if by_wire_type.contains_key(&mapping.wire_type) {
                return Err(RegistryError::Duplicate(format!(
                    "wire type {}",
                    mapping.wire_type
                )));
            }
            by_wire_type.insert(mapping.wire_type, key.clone());
            by_datatype.insert(key, mapping);
        }

        let mut custom = HashMap::new();
        for mapping in self.custom {
            let key = mapping.datatype.as_str().to_string();
            if by_datatype.contains_key(&key) || custom.contains_key(&key) {
                return Err(RegistryError::Duplicate(format!("datatype {}", key)));
            }
            if !by_wire_type.contains_key(&mapping.wire_type) {
                return Err(RegistryError::UnmappedWireType {
                    datatype: key,
                    wire_type: mapping.wire_type.to_string(),
                });
            }
            custom.insert(key, mapping);
        }

        let string = by_datatype
            .get(xsd::STRING)
            .cloned()
            .ok_or_else(|| RegistryError::UnmappedWireType {
                datatype: xsd::STRING.to_string(),
                wire_type: WireType::VarChar.to_string(),
            })?;

        tracing::debug!(
            standard = by_datatype.len(),
            custom = custom.len(),
            "type registry built"
        );

        Ok(TypeRegistry {
            standard: by_datatype,
            custom,
            by_wire_type,
            string,
        })
    }
}

/// Immutable datatype/wire-type/native-type table
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    standard: HashMap<String, TypeMapping>,
    custom: HashMap<String, TypeMapping>,
    by_wire_type: HashMap<WireType, String>,
    /// Fallback for unknown datatypes
    string: TypeMapping,
}

impl TypeRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// The full standard + extension table
    pub fn with_defaults() -> Result<Self, RegistryError> {
        use NativeType as N;
        use WireType as W;

        let mut builder = Self::builder()
            .standard(TypeMapping::new(xsd::BOOLEAN, W::Boolean, N::Boolean, 1))
            .standard(integral(xsd::BYTE, W::TinyInt, N::Byte, 3))
            .standard(integral(xsd::SHORT, W::SmallInt, N::Short, 5))
            .standard(integral(xsd::INT, W::Integer, N::Int, 10))
            .standard(integral(xsd::LONG, W::BigInt, N::Long, 19))
            .standard(integral(xsd::INTEGER, W::Numeric, N::BigInteger, 38))
            .standard(
                TypeMapping::new(xsd::DECIMAL, W::Decimal, N::Decimal, 38)
                    .with_signed(true)
                    .with_fixed_precision_scale(false),
            )
            .standard(TypeMapping::new(xsd::FLOAT, W::Real, N::Float, 7).with_signed(true))
            .standard(TypeMapping::new(xsd::DOUBLE, W::Double, N::Double, 15).with_signed(true))
            .standard(TypeMapping::new(xsd::DATE, W::Date, N::Date, 10))
            .standard(TypeMapping::new(xsd::TIME, W::Time, N::Time, 18))
            .standard(TypeMapping::new(xsd::DATE_TIME, W::Timestamp, N::DateTime, 29))
            .standard(TypeMapping::new(
                xsd::DATE_TIME_STAMP,
                W::TimestampWithTimezone,
                N::DateTime,
                35,
            ))
            .standard(TypeMapping::new(xsd::STRING, W::VarChar, N::String, i32::MAX));

        // Unsigned types widen to the next signed code
        builder = builder
            .custom(unsigned(xsd::UNSIGNED_BYTE, W::SmallInt, N::Short, 3))
            .custom(unsigned(xsd::UNSIGNED_SHORT, W::Integer, N::Int, 5))
            .custom(unsigned(xsd::UNSIGNED_INT, W::BigInt, N::Long, 10))
            .custom(unsigned(xsd::UNSIGNED_LONG, W::Numeric, N::BigInteger, 20))
            .custom(unsigned(xsd::NON_NEGATIVE_INTEGER, W::Numeric, N::BigInteger, 38))
            .custom(unsigned(xsd::POSITIVE_INTEGER, W::Numeric, N::BigInteger, 38))
            .custom(integral(xsd::NON_POSITIVE_INTEGER, W::Numeric, N::BigInteger, 38))
            .custom(integral(xsd::NEGATIVE_INTEGER, W::Numeric, N::BigInteger, 38));

        // Calendar fragments holding a single component read as integers
        builder = builder
            .custom(integral(xsd::G_YEAR, W::Integer, N::Int, 4))
            .custom(unsigned(xsd::G_MONTH, W::Integer, N::Int, 2))
            .custom(unsigned(xsd::G_DAY, W::Integer, N::Int, 2));

        for datatype in [
            xsd::G_YEAR_MONTH,
            xsd::G_MONTH_DAY,
            xsd::DURATION,
            xsd::DAY_TIME_DURATION,
            xsd::YEAR_MONTH_DURATION,
            xsd::ANY_URI,
            xsd::NORMALIZED_STRING,
            xsd::TOKEN,
            xsd::LANGUAGE,
            rdf::LANG_STRING,
        ] {
            builder = builder.custom(TypeMapping::new(
                datatype,
                W::VarChar,
                N::String,
                i32::MAX,
            ));
        }

        builder.build()
    }

    /// Standard mapping for a datatype; unknown datatypes get the string mapping
    pub fn standard_by_datatype(&self, datatype: &str) -> &TypeMapping {
        self.standard.get(datatype).unwrap_or(&self.string)
    }

    /// Standard mapping for a wire type, following aliases.
    ///
    /// `None` means values of this code cannot be marshalled at all.
    pub fn standard_by_wire_type(&self, wire_type: WireType) -> Option<&TypeMapping> {
        if wire_type.is_unsupported() {
            return None;
        }
        let code = wire_type.alias_of().unwrap_or(wire_type);
        self.by_wire_type
            .get(&code)
            .and_then(|dt| self.standard.get(dt))
    }

    /// Standard or extension mapping for a datatype; string fallback otherwise
    pub fn standard_or_custom(&self, datatype: &str) -> &TypeMapping {
        self.standard
            .get(datatype)
            .or_else(|| self.custom.get(datatype))
            .unwrap_or(&self.string)
    }

    /// Whether the datatype has any registered mapping
    pub fn is_known(&self, datatype: &str) -> bool {
        self.standard.contains_key(datatype) || self.custom.contains_key(datatype)
    }

    /// Number of registered mappings (standard + custom)
    pub fn len(&self) -> usize {
        self.standard.len() + self.custom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn integral(datatype: &str, wire: WireType, native: NativeType, precision: i32) -> TypeMapping {
    TypeMapping::new(datatype, wire, native, precision)
        .with_scale(0)
        .with_signed(true)
        .with_fixed_precision_scale(true)
}

fn unsigned(datatype: &str, wire: WireType, native: NativeType, precision: i32) -> TypeMapping {
    integral(datatype, wire, native, precision).with_signed(false)
}
