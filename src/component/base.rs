//! Fields common to every component.


use crate::component::fields::{self, COMPONENT_FIELDS};
use crate::RawRecord;

/// Placeholder for text fields that are absent from the record.
pub const UNKNOWN: &str = "Unknown";

/// Placeholder for a missing distributor part number.
pub const NOT_AVAILABLE: &str = "N/A";

/// Price reported for records without a unit price, so unpriced parts sort last.
pub const UNPRICED: f64 = 999.99;

/// Generic component descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Component {
    mpn: Option<String>,
    distributor_part: Option<String>,
    datasheet: Option<String>,
    price: Option<f64>,
    dimensions_raw: Option<String>,
}

impl Component {
    /// Parses the common fields of a record.
    #[must_use]
    pub fn parse(record: &RawRecord) -> Self {
        let mut extracted = fields::extract_fields(record, COMPONENT_FIELDS);
        Self {
            mpn: fields::string_field(record, "ManufacturerProductNumber"),
            distributor_part: fields::distributor_part_number(record),
            datasheet: fields::string_field(record, "DatasheetUrl"),
            price: fields::unit_price(record),
            dimensions_raw: extracted.take("dimensions"),
        }
    }

    /// Manufacturer part number, or `"Unknown"`.
    #[must_use]
    pub fn mpn(&self) -> &str {
        self.mpn.as_deref().unwrap_or(UNKNOWN)
    }

    /// Distributor part number, or `"N/A"`.
    #[must_use]
    pub fn distributor_part(&self) -> &str {
        self.distributor_part.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Datasheet URL, or an empty string.
    #[must_use]
    pub fn datasheet(&self) -> &str {
        self.datasheet.as_deref().unwrap_or_default()
    }

    /// Unit price, or [`UNPRICED`].
    #[must_use]
    pub fn price(&self) -> f64 {
        self.price.unwrap_or(UNPRICED)
    }

    /// Returns `true` if the record carried a unit price.
    #[must_use]
    pub const fn has_price(&self) -> bool {
        self.price.is_some()
    }

    /// Raw "Size / Dimension" text, or `"Unknown"`.
    #[must_use]
    pub fn dimensions_raw(&self) -> &str {
        self.dimensions_raw.as_deref().unwrap_or(UNKNOWN)
    }
}
