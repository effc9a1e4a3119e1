//! Keyword search filters.
//!
//! A [`SearchFilter`] describes one category plus its parametric filters. The
//! fetcher turns it into a request payload for each page with [`SearchFilter::payload`].
//!
//! # Filter identifiers
//!
//! | Parameter | Id | Meaning |
//! |-----------|----|---------|
//! | 2 | 10879 / 16543 | Power 1/8 W / 1/4 W |
//! | 3 | 2503 | Tolerance ±5 % (resistors) |
//! | 3 | 1900 | Tolerance ±20 % (capacitors) |
//! | 16 | 392320 | Package: radial can |
//! | 52 | 388275 | Polarised |
//! | 69 | 411897 | Mounting: through hole |
//! | 2079 | `"<n> V"` | Rated voltage |

use serde_json::{json, Value};

/// Power filter id used when the requested rating is not in the table.
pub const DEFAULT_POWER_FILTER_ID: u32 = 16543;

/// Voltage filter id used when the requested rating is not in the table.
pub const DEFAULT_VOLTAGE_FILTER_ID: &str = "6.3 V";

const POWER_FILTERS: &[(&str, u32)] = &[
    ("0.125W", 10879),
    ("1/8W", 10879),
    ("0.25W", 16543),
    ("1/4W", 16543),
];

const VOLTAGE_FILTERS: &[&str] = &["6.3", "10", "16", "25", "35", "50", "63", "100"];

/// One parametric filter: a parameter id and the accepted value id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterFilter {
    /// Parameter id.
    pub parameter_id: u32,
    /// Accepted value id.
    pub value_id: String,
}

impl ParameterFilter {
    /// Creates a parametric filter.
    pub fn new(parameter_id: u32, value_id: impl Into<String>) -> Self {
        Self {
            parameter_id,
            value_id: value_id.into(),
        }
    }
}

/// A category search with parametric filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    /// Search keywords.
    pub keywords: String,
    /// Top-level category id.
    pub category_id: String,
    /// Parametric sub-category id.
    pub subcategory_id: String,
    /// Parametric filters.
    pub parameters: Vec<ParameterFilter>,
}

impl SearchFilter {
    /// Through-hole ±5 % resistors at the given power rating.
    #[must_use]
    pub fn through_hole_resistors(power: &str) -> Self {
        Self {
            keywords: "resistor".to_string(),
            category_id: "2".to_string(),
            subcategory_id: "53".to_string(),
            parameters: vec![
                ParameterFilter::new(3, "2503"),
                ParameterFilter::new(2, power_filter_id(power).to_string()),
            ],
        }
    }

    /// Polarised through-hole radial aluminium electrolytic capacitors at the given voltage.
    #[must_use]
    pub fn radial_electrolytic_capacitors(voltage: &str) -> Self {
        Self {
            keywords: "capacitor".to_string(),
            category_id: "3".to_string(),
            subcategory_id: "58".to_string(),
            parameters: vec![
                ParameterFilter::new(3, "1900"),
                ParameterFilter::new(2079, voltage_filter_id(voltage)),
                ParameterFilter::new(52, "388275"),
                ParameterFilter::new(69, "411897"),
                ParameterFilter::new(16, "392320"),
            ],
        }
    }

    /// Builds the request payload for one page.
    #[must_use]
    pub fn payload(&self, limit: u32, offset: u64) -> Value {
        let parameter_filters: Vec<Value> = self
            .parameters
            .iter()
            .map(|p| {
                json!({
                    "ParameterId": p.parameter_id,
                    "FilterValues": [{ "Id": p.value_id }],
                })
            })
            .collect();

        json!({
            "Keywords": self.keywords,
            "Limit": limit.to_string(),
            "Offset": offset.to_string(),
            "MinimumQuantityAvailable": 1,
            "FilterOptionsRequest": {
                "CategoryFilter": [{ "id": self.category_id }],
                "MarketPlaceFilter": "ExcludeMarketPlace",
                "ParameterFilterRequest": {
                    "CategoryFilter": { "id": self.subcategory_id },
                    "ParameterFilters": parameter_filters,
                },
                "SearchOptions": ["NormallyStocking"],
            },
            "ExcludedContent": ["FilterOptions"],
            "SortOptions": { "Field": "Price", "SortOrder": "Ascending" },
        })
    }
}

/// Maps a power rating string to its filter id.
///
/// Unknown ratings fall back to [`DEFAULT_POWER_FILTER_ID`] (1/4 W).
#[must_use]
pub fn power_filter_id(power: &str) -> u32 {
    let power = power.trim();
    POWER_FILTERS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(power))
        .map_or_else(
            || {
                tracing::warn!(
                    power,
                    fallback = DEFAULT_POWER_FILTER_ID,
                    "Unknown power rating, using default filter"
                );
                DEFAULT_POWER_FILTER_ID
            },
            |(_, id)| *id,
        )
}

/// Maps a voltage rating string (`"6.3v"`, `"10 V"`, `"16"`) to its filter id.
///
/// Unknown ratings fall back to [`DEFAULT_VOLTAGE_FILTER_ID`].
#[must_use]
pub fn voltage_filter_id(voltage: &str) -> String {
    let normalised = voltage.trim().trim_end_matches(['v', 'V']).trim();
    VOLTAGE_FILTERS
        .iter()
        .find(|v| **v == normalised)
        .map_or_else(
            || {
                tracing::warn!(
                    voltage,
                    fallback = DEFAULT_VOLTAGE_FILTER_ID,
                    "Unknown voltage rating, using default filter"
                );
                DEFAULT_VOLTAGE_FILTER_ID.to_string()
            },
            |v| format!("{v} V"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_mapping() {
        assert_eq!(power_filter_id("0.125W"), 10879);
        assert_eq!(power_filter_id("1/8W"), 10879);
        assert_eq!(power_filter_id("0.25w"), 16543);
        assert_eq!(power_filter_id("1/4W"), 16543);
        assert_eq!(power_filter_id("5W"), DEFAULT_POWER_FILTER_ID);
    }

    #[test]
    fn voltage_mapping() {
        assert_eq!(voltage_filter_id("6.3v"), "6.3 V");
        assert_eq!(voltage_filter_id("10 V"), "10 V");
        assert_eq!(voltage_filter_id("16"), "16 V");
        assert_eq!(voltage_filter_id("400V"), DEFAULT_VOLTAGE_FILTER_ID);
    }

    #[test]
    fn resistor_payload_shape() {
        let filter = SearchFilter::through_hole_resistors("1/8W");
        let payload = filter.payload(50, 100);

        assert_eq!(payload["Keywords"], "resistor");
        assert_eq!(payload["Limit"], "50");
        assert_eq!(payload["Offset"], "100");
        assert_eq!(payload["FilterOptionsRequest"]["CategoryFilter"][0]["id"], "2");

        let params = &payload["FilterOptionsRequest"]["ParameterFilterRequest"];
        assert_eq!(params["CategoryFilter"]["id"], "53");
        assert_eq!(params["ParameterFilters"][1]["ParameterId"], 2);
        assert_eq!(params["ParameterFilters"][1]["FilterValues"][0]["Id"], "10879");
        assert_eq!(payload["SortOptions"]["SortOrder"], "Ascending");
    }

    #[test]
    fn capacitor_payload_uses_voltage() {
        let filter = SearchFilter::radial_electrolytic_capacitors("25v");
        let payload = filter.payload(10, 0);
        let params = &payload["FilterOptionsRequest"]["ParameterFilterRequest"]["ParameterFilters"];

        assert_eq!(params.as_array().map(Vec::len), Some(5));
        assert_eq!(params[1]["ParameterId"], 2079);
        assert_eq!(params[1]["FilterValues"][0]["Id"], "25 V");
    }
}
