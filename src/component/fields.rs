//! Field extraction from raw search records.
//!
//! Every descriptor reads its parameters through one [`extract_fields`] call per
//! layer, driven by a static table of [`ParameterField`]s. A variant that builds on
//! another (Radial on Capacitor on Component) runs the lower layer's table first and
//! then its own, so fields accumulate layer by layer.
//!
//! Lookups never fail: a missing parameter is simply absent from the result.

use std::collections::HashMap;

use serde_json::Value;

use crate::RawRecord;

/// Which value of a parameter entry to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// Human-readable text (`ValueText`), e.g. `"±5%"`.
    Text,
    /// Value identifier (`ValueId`), e.g. `"4.7 kOhms"`.
    Id,
}

impl ValueSource {
    const fn key(self) -> &'static str {
        match self {
            Self::Text => "ValueText",
            Self::Id => "ValueId",
        }
    }
}

/// One named parameter lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterField {
    /// Name the value is stored under in [`ExtractedFields`].
    pub name: &'static str,
    /// `ParameterId` to look for.
    pub parameter_id: i64,
    /// Which value to read.
    pub source: ValueSource,
}

impl ParameterField {
    /// A field read from `ValueText`.
    #[must_use]
    pub const fn text(name: &'static str, parameter_id: i64) -> Self {
        Self {
            name,
            parameter_id,
            source: ValueSource::Text,
        }
    }

    /// A field read from `ValueId`.
    #[must_use]
    pub const fn id(name: &'static str, parameter_id: i64) -> Self {
        Self {
            name,
            parameter_id,
            source: ValueSource::Id,
        }
    }
}

/// Parameter id of "Size / Dimension".
pub const PARAM_DIMENSIONS: i64 = 46;
/// Parameter id of "Resistance".
pub const PARAM_RESISTANCE: i64 = 2085;
/// Parameter id of "Capacitance".
pub const PARAM_CAPACITANCE: i64 = 2049;

/// Fields shared by every component.
pub const COMPONENT_FIELDS: &[ParameterField] =
    &[ParameterField::text("dimensions", PARAM_DIMENSIONS)];

/// Resistor fields.
pub const RESISTOR_FIELDS: &[ParameterField] = &[
    ParameterField::id("resistance", PARAM_RESISTANCE),
    ParameterField::text("tolerance", 3),
    ParameterField::text("power", 2),
];

/// Capacitor fields.
pub const CAPACITOR_FIELDS: &[ParameterField] = &[
    ParameterField::id("capacitance", PARAM_CAPACITANCE),
    ParameterField::text("tolerance", 3),
    ParameterField::text("voltage", 2079),
];

/// Radial capacitor fields.
pub const RADIAL_FIELDS: &[ParameterField] = &[
    ParameterField::text("diameter", PARAM_DIMENSIONS),
    ParameterField::text("pin_pitch", 508),
];

/// Values found for one field table.
#[derive(Debug, Default)]
pub struct ExtractedFields(HashMap<&'static str, String>);

impl ExtractedFields {
    /// Removes and returns the value stored under `name`.
    pub fn take(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    /// Returns the value stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Number of fields found.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no field was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Looks up every field of `table` in `record`.
#[must_use]
pub fn extract_fields(record: &RawRecord, table: &[ParameterField]) -> ExtractedFields {
    let mut fields = ExtractedFields::default();
    for field in table {
        if let Some(value) = parameter_value(record, field.parameter_id, field.source) {
            fields.0.insert(field.name, value);
        }
    }
    fields
}

/// Returns the first `Parameters` entry value for `parameter_id`.
///
/// Empty strings and nulls count as absent. Numbers are rendered as text.
#[must_use]
pub fn parameter_value(record: &RawRecord, parameter_id: i64, source: ValueSource) -> Option<String> {
    record
        .get("Parameters")?
        .as_array()?
        .iter()
        .find(|p| p.get("ParameterId").and_then(Value::as_i64) == Some(parameter_id))
        .and_then(|p| p.get(source.key()))
        .and_then(value_to_string)
}

/// Returns a top-level string field, treating empty strings as absent.
#[must_use]
pub fn string_field(record: &RawRecord, key: &str) -> Option<String> {
    record.get(key).and_then(value_to_string)
}

/// Returns the record's unit price, if present and numeric.
#[must_use]
pub fn unit_price(record: &RawRecord) -> Option<f64> {
    record.get("UnitPrice").and_then(Value::as_f64)
}

/// Picks the distributor part number from the product variations.
///
/// Preference order: package type 2 (cut tape), package type 1 (tape and reel),
/// then the first variation.
#[must_use]
pub fn distributor_part_number(record: &RawRecord) -> Option<String> {
    let variations = record.get("ProductVariations")?.as_array()?;

    let part_of = |v: &Value| v.get("DigiKeyProductNumber").and_then(value_to_string);
    let with_package = |id: i64| {
        variations
            .iter()
            .filter(|v| {
                v.get("PackageType")
                    .and_then(|p| p.get("Id"))
                    .and_then(Value::as_i64)
                    == Some(id)
            })
            .find_map(part_of)
    };

    with_package(2)
        .or_else(|| with_package(1))
        .or_else(|| variations.first().and_then(part_of))
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
