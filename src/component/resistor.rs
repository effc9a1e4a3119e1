//! Axial through-hole resistors.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::artifact::files::{file_exists, save_file, WriteMode};
use crate::artifact::templates::{escape, TemplateId};
use crate::artifact::{ArtifactContext, Artifacts, FootprintOutcome, SymbolLibrary};
use crate::component::base::{Component, UNKNOWN};
use crate::component::fields::{self, RESISTOR_FIELDS};
use crate::component::{format_mm, Descriptor};
use crate::units::{grid_round_up, round_to};
use crate::RawRecord;

/// Reported in place of the raw dimensions once they failed to parse.
pub const MALFORMED_DIMENSIONS: &str = "FUBAR";

const OHM_SIGN: &str = "\u{03A9}";

#[allow(clippy::expect_used)]
static AXIAL_DIMENSIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+\.[0-9]+)mm\sx\s([0-9]+\.[0-9]+)mm").expect("dimension regex is valid")
});

/// Body geometry of an axial component, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxialGeometry {
    /// Body diameter.
    pub diameter: f64,
    /// Body length.
    pub length: f64,
    /// Lead spacing: the body length rounded up to the 2.54 mm grid.
    pub pin_pitch: f64,
}

impl AxialGeometry {
    /// Parses `"<D>mm x <L>mm"` anywhere in the dimension text.
    ///
    /// # Examples
    ///
    /// ```
    /// use digikey_kicad_gen::component::resistor::AxialGeometry;
    ///
    /// let geometry = AxialGeometry::parse("0.071\" Dia x 0.130\" L (1.80mm x 3.30mm)").unwrap();
    /// assert_eq!(geometry.diameter, 1.8);
    /// assert_eq!(geometry.length, 3.3);
    /// assert_eq!(geometry.pin_pitch, 5.08);
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let caps = AXIAL_DIMENSIONS.captures(text)?;
        let diameter = round_to(caps[1].parse().ok()?, 3);
        let length = round_to(caps[2].parse().ok()?, 3);
        Some(Self {
            diameter,
            length,
            pin_pitch: grid_round_up(length),
        })
    }

    /// Footprint file name for this geometry.
    #[must_use]
    pub fn footprint_name(&self) -> String {
        format!(
            "R_Axial_L{}mm_D{}mm_P{}mm_Horizontal.kicad_mod",
            format_mm(self.length),
            format_mm(self.diameter),
            format_mm(self.pin_pitch)
        )
    }
}

/// Result of parsing the dimension text.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum BodyState {
    /// Not parsed yet.
    #[default]
    Unparsed,
    /// Geometry recognised.
    Axial(AxialGeometry),
    /// Dimension text did not match. Terminal: no footprint is generated.
    Malformed,
}

/// Resistor descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resistor {
    component: Component,
    resistance: Option<String>,
    tolerance: Option<String>,
    power: Option<String>,
    body: BodyState,
}

impl Resistor {
    /// Resistance with the ohm sign, e.g. `"4.7 kΩ"`, or `"Unknown"`.
    #[must_use]
    pub fn resistance(&self) -> &str {
        self.resistance.as_deref().unwrap_or(UNKNOWN)
    }

    /// Tolerance text, or `"Unknown"`.
    #[must_use]
    pub fn tolerance(&self) -> &str {
        self.tolerance.as_deref().unwrap_or(UNKNOWN)
    }

    /// Power rating text, or `"Unknown"`.
    #[must_use]
    pub fn power(&self) -> &str {
        self.power.as_deref().unwrap_or(UNKNOWN)
    }

    /// Symbol name, `R_<resistance>`.
    #[must_use]
    pub fn symbol_name(&self) -> String {
        format!("R_{}", self.resistance())
    }

    /// Body geometry, if the dimensions parsed.
    #[must_use]
    pub const fn geometry(&self) -> Option<&AxialGeometry> {
        match &self.body {
            BodyState::Axial(geometry) => Some(geometry),
            _ => None,
        }
    }

    /// Dimension parsing state.
    #[must_use]
    pub const fn body(&self) -> BodyState {
        self.body
    }

    /// Returns `true` if the dimensions were malformed.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self.body, BodyState::Malformed)
    }

    /// Raw dimension text, or [`MALFORMED_DIMENSIONS`] once parsing failed.
    #[must_use]
    pub fn dimensions_raw(&self) -> &str {
        if self.is_skipped() {
            MALFORMED_DIMENSIONS
        } else {
            self.component.dimensions_raw()
        }
    }

    /// Footprint file name, if the geometry is known.
    #[must_use]
    pub fn footprint_name(&self) -> Option<String> {
        self.geometry().map(AxialGeometry::footprint_name)
    }
}

impl Descriptor for Resistor {
    fn parse(record: &RawRecord) -> Self {
        let component = Component::parse(record);
        let mut extracted = fields::extract_fields(record, RESISTOR_FIELDS);

        let body = AxialGeometry::parse(component.dimensions_raw()).map_or_else(
            || {
                warn!(
                    part = component.distributor_part(),
                    dimensions = component.dimensions_raw(),
                    "Dimensions malformed"
                );
                BodyState::Malformed
            },
            BodyState::Axial,
        );

        Self {
            resistance: extracted
                .take("resistance")
                .map(|r| r.replace("Ohms", OHM_SIGN)),
            tolerance: extracted.take("tolerance"),
            power: extracted.take("power"),
            body,
            component,
        }
    }

    fn component(&self) -> &Component {
        &self.component
    }
}

impl Artifacts for Resistor {
    fn make_footprint(&self, ctx: &ArtifactContext<'_>) -> FootprintOutcome {
        let Some(geometry) = self.geometry() else {
            return FootprintOutcome::Skipped;
        };

        let name = geometry.footprint_name();
        if file_exists(&name, ctx.footprint_dir) {
            debug!(footprint = %name, "Footprint exists, skipping");
            return FootprintOutcome::Exists(name);
        }

        let half_diameter = geometry.diameter / 2.0;
        let body_start = round_to((geometry.pin_pitch - geometry.length) / 2.0, 3);
        let courtyard = round_to(ctx.pad_size / 2.0 + 0.25, 3);
        let data = json!({
            "name": name.trim_end_matches(".kicad_mod"),
            "padSize": ctx.pad_size,
            "drill": ctx.drill(),
            "length": geometry.length,
            "diameter": geometry.diameter,
            "pinPitch": geometry.pin_pitch,
            "powerRating": escape(self.power()),
            "bodyStartX": body_start,
            "bodyEndX": round_to(body_start + geometry.length, 3),
            "bodyTop": round_to(-half_diameter, 3),
            "bodyBottom": round_to(half_diameter, 3),
            "courtyard": courtyard,
            "courtyardEndX": round_to(geometry.pin_pitch + courtyard, 3),
            "courtyardY": round_to(half_diameter.max(ctx.pad_size / 2.0) + 0.25, 3),
            "refOffsetX": 2.5,
            "refOffsetY": round_to(-(half_diameter + 1.0), 3),
            "valueOffsetX": 0.5,
            "valueOffsetY": round_to(half_diameter + 0.5, 3),
        });

        let output = ctx.templates.render(TemplateId::AxialResistorFootprint, &data);
        if output.is_empty() {
            return FootprintOutcome::Empty(name);
        }

        if save_file(&output, &ctx.footprint_dir.join(&name), WriteMode::Truncate) {
            info!("Created footprint -> {name}");
            FootprintOutcome::Written(name)
        } else {
            FootprintOutcome::Failed(name)
        }
    }

    fn make_symbol(&self, library: &mut SymbolLibrary, ctx: &ArtifactContext<'_>) -> bool {
        if self.resistance.is_none() {
            return false;
        }

        let footprint = self
            .footprint_name()
            .map(|name| ctx.footprint_reference(&name))
            .unwrap_or_default();

        let data = json!({
            "symbol": escape(&self.symbol_name()),
            "value": escape(self.resistance()),
            "tolerance": escape(self.tolerance()),
            "power": escape(self.power()),
            "footprint": escape(&footprint),
            "datasheet": escape(self.component.datasheet()),
            "dkPart": escape(self.component.distributor_part()),
            "mfrPart": escape(self.component.mpn()),
            "price": self.component.price(),
        });

        let output = ctx.templates.render(TemplateId::ResistorSymbol, &data);
        library.append(&output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn record(dimensions: &str) -> Value {
        json!({
            "ManufacturerProductNumber": "CF14JT4K70",
            "UnitPrice": 0.1,
            "Parameters": [
                { "ParameterId": 2085, "ValueText": "4.7 kOhms", "ValueId": "4.7 kOhms" },
                { "ParameterId": 3, "ValueText": "±5%" },
                { "ParameterId": 2, "ValueText": "0.25W, 1/4W" },
                { "ParameterId": 46, "ValueText": dimensions }
            ],
            "ProductVariations": [
                { "DigiKeyProductNumber": "CF14JT4K70CT-ND", "PackageType": { "Id": 2 } }
            ]
        })
    }

    #[test]
    fn parses_resistor_fields() {
        let resistor = Resistor::parse(&record("0.094\" Dia x 0.248\" L (2.40mm x 6.30mm)"));

        assert_eq!(resistor.resistance(), "4.7 k\u{03A9}");
        assert_eq!(resistor.symbol_name(), "R_4.7 k\u{03A9}");
        assert_eq!(resistor.tolerance(), "±5%");
        assert_eq!(resistor.power(), "0.25W, 1/4W");
        assert_eq!(resistor.component().distributor_part(), "CF14JT4K70CT-ND");
        assert!(!resistor.is_skipped());

        let geometry = resistor.geometry().unwrap();
        assert!((geometry.diameter - 2.4).abs() < 1e-9);
        assert!((geometry.length - 6.3).abs() < 1e-9);
        assert!((geometry.pin_pitch - 7.62).abs() < 1e-9);
        assert_eq!(
            resistor.footprint_name().as_deref(),
            Some("R_Axial_L6.3mm_D2.4mm_P7.62mm_Horizontal.kicad_mod")
        );
    }

    #[test]
    fn malformed_dimensions_enter_skip_state() {
        let resistor = Resistor::parse(&record("0.094\" Dia x 0.248\" L"));
        assert!(resistor.is_skipped());
        assert_eq!(resistor.dimensions_raw(), MALFORMED_DIMENSIONS);
        assert_eq!(resistor.geometry(), None);
        assert_eq!(resistor.footprint_name(), None);
        // Electrical fields are still available.
        assert_eq!(resistor.resistance(), "4.7 k\u{03A9}");
    }

    #[test]
    fn missing_parameters_use_placeholders() {
        let resistor = Resistor::parse(&json!({}));
        assert_eq!(resistor.resistance(), "Unknown");
        assert_eq!(resistor.tolerance(), "Unknown");
        assert_eq!(resistor.power(), "Unknown");
        assert!(resistor.is_skipped());
    }

    #[test]
    fn default_is_unparsed() {
        let resistor = Resistor::default();
        assert_eq!(resistor.body(), BodyState::Unparsed);
        assert!(!resistor.is_skipped());
        assert_eq!(resistor.dimensions_raw(), "Unknown");
    }

    #[test]
    fn whole_millimetre_dimensions_keep_a_decimal() {
        let geometry = AxialGeometry::parse("(2.00mm x 5.00mm)").unwrap();
        assert_eq!(
            geometry.footprint_name(),
            "R_Axial_L5.0mm_D2.0mm_P5.08mm_Horizontal.kicad_mod"
        );
    }
}
