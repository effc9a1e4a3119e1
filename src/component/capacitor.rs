//! Capacitors.
//!
//! [`Capacitor`] holds the electrical fields, [`AluminumElectrolytic`] narrows it to
//! the electrolytic family, and [`Radial`] adds the can diameter and lead spacing.
//! Each layer owns the layer below it and parses it first.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::artifact::files::{file_exists, save_file, WriteMode};
use crate::artifact::templates::{escape, TemplateId};
use crate::artifact::{ArtifactContext, Artifacts, FootprintOutcome, SymbolLibrary};
use crate::component::base::{Component, UNKNOWN};
use crate::component::fields::{self, CAPACITOR_FIELDS, RADIAL_FIELDS};
use crate::component::{format_mm, Descriptor};
use crate::units::round_to;
use crate::RawRecord;

#[allow(clippy::expect_used)]
static PARENTHESISED_MM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(.*?\b([\d.]+)\s*mm?\b").expect("parenthesised dimension regex is valid")
});

/// Extracts the first millimetre value inside parentheses, e.g. `"0.197\" Dia (5.00mm)"`.
#[must_use]
pub fn parenthesised_mm(text: &str) -> Option<f64> {
    let caps = PARENTHESISED_MM.captures(text)?;
    caps[1].parse().ok().map(|v| round_to(v, 3))
}

/// Capacitor descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Capacitor {
    component: Component,
    capacitance: Option<String>,
    tolerance: Option<String>,
    voltage: Option<String>,
}

impl Capacitor {
    /// Capacitance text, e.g. `"100 µF"`, or `"Unknown"`.
    #[must_use]
    pub fn capacitance(&self) -> &str {
        self.capacitance.as_deref().unwrap_or(UNKNOWN)
    }

    /// Tolerance text, or `"Unknown"`.
    #[must_use]
    pub fn tolerance(&self) -> &str {
        self.tolerance.as_deref().unwrap_or(UNKNOWN)
    }

    /// Rated voltage text, or `"Unknown"`.
    #[must_use]
    pub fn voltage(&self) -> &str {
        self.voltage.as_deref().unwrap_or(UNKNOWN)
    }

    /// Symbol name, `CP_<capacitance>`.
    #[must_use]
    pub fn symbol_name(&self) -> String {
        format!("CP_{}", self.capacitance())
    }

    /// Returns `true` if the capacitance was present.
    #[must_use]
    pub const fn has_capacitance(&self) -> bool {
        self.capacitance.is_some()
    }
}

impl Descriptor for Capacitor {
    fn parse(record: &RawRecord) -> Self {
        let component = Component::parse(record);
        let mut extracted = fields::extract_fields(record, CAPACITOR_FIELDS);
        Self {
            component,
            capacitance: extracted.take("capacitance"),
            tolerance: extracted.take("tolerance"),
            voltage: extracted.take("voltage"),
        }
    }

    fn component(&self) -> &Component {
        &self.component
    }
}

/// Aluminium electrolytic capacitor descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AluminumElectrolytic {
    capacitor: Capacitor,
}

impl AluminumElectrolytic {
    /// Capacitor-level fields.
    #[must_use]
    pub const fn capacitor(&self) -> &Capacitor {
        &self.capacitor
    }
}

impl Descriptor for AluminumElectrolytic {
    fn parse(record: &RawRecord) -> Self {
        Self {
            capacitor: Capacitor::parse(record),
        }
    }

    fn component(&self) -> &Component {
        self.capacitor.component()
    }
}

/// Can geometry of a radial capacitor, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGeometry {
    /// Can diameter.
    pub diameter: f64,
    /// Lead spacing.
    pub pin_pitch: f64,
}

impl RadialGeometry {
    /// Footprint file name for this geometry.
    #[must_use]
    pub fn footprint_name(&self) -> String {
        format!(
            "CP_Radial_D{}mm_P{}mm.kicad_mod",
            format_mm(self.diameter),
            format_mm(self.pin_pitch)
        )
    }
}

/// Radial aluminium electrolytic capacitor descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Radial {
    electrolytic: AluminumElectrolytic,
    diameter: Option<f64>,
    pin_pitch: Option<f64>,
}

impl Radial {
    /// Capacitor-level fields.
    #[must_use]
    pub const fn capacitor(&self) -> &Capacitor {
        self.electrolytic.capacitor()
    }

    /// Can diameter, if parsed.
    #[must_use]
    pub const fn diameter(&self) -> Option<f64> {
        self.diameter
    }

    /// Lead spacing, if parsed.
    #[must_use]
    pub const fn pin_pitch(&self) -> Option<f64> {
        self.pin_pitch
    }

    /// Geometry, if both diameter and lead spacing parsed.
    #[must_use]
    pub fn geometry(&self) -> Option<RadialGeometry> {
        match (self.diameter, self.pin_pitch) {
            (Some(diameter), Some(pin_pitch)) => Some(RadialGeometry {
                diameter,
                pin_pitch,
            }),
            _ => None,
        }
    }

    /// Returns `true` if the geometry could not be parsed.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.geometry().is_none()
    }

    /// Footprint file name, if the geometry is known.
    #[must_use]
    pub fn footprint_name(&self) -> Option<String> {
        self.geometry().map(|g| g.footprint_name())
    }
}

impl Descriptor for Radial {
    fn parse(record: &RawRecord) -> Self {
        let electrolytic = AluminumElectrolytic::parse(record);
        let mut extracted = fields::extract_fields(record, RADIAL_FIELDS);

        let diameter = extracted.take("diameter").as_deref().and_then(parenthesised_mm);
        let pin_pitch = extracted.take("pin_pitch").as_deref().and_then(parenthesised_mm);

        if diameter.is_none() || pin_pitch.is_none() {
            warn!(
                part = electrolytic.component().distributor_part(),
                dimensions = %dimension_text(record),
                "Radial dimensions malformed"
            );
        }

        Self {
            electrolytic,
            diameter,
            pin_pitch,
        }
    }

    fn component(&self) -> &Component {
        self.electrolytic.component()
    }
}

fn dimension_text(record: &RawRecord) -> String {
    fields::parameter_value(record, fields::PARAM_DIMENSIONS, fields::ValueSource::Text)
        .unwrap_or_else(|| UNKNOWN.to_string())
}

impl Artifacts for Radial {
    fn make_footprint(&self, ctx: &ArtifactContext<'_>) -> FootprintOutcome {
        let Some(geometry) = self.geometry() else {
            return FootprintOutcome::Skipped;
        };

        let name = geometry.footprint_name();
        if file_exists(&name, ctx.footprint_dir) {
            debug!(footprint = %name, "Footprint exists, skipping");
            return FootprintOutcome::Exists(name);
        }

        let radius = geometry.diameter / 2.0;
        let data = json!({
            "name": name.trim_end_matches(".kicad_mod"),
            "padSize": ctx.pad_size,
            "drill": ctx.drill(),
            "diameter": geometry.diameter,
            "pinPitch": geometry.pin_pitch,
            "centreX": round_to(geometry.pin_pitch / 2.0, 3),
            "outlineX": round_to(geometry.pin_pitch / 2.0 + radius, 3),
            "silkX": round_to(geometry.pin_pitch / 2.0 + radius + 0.12, 3),
            "courtyardX": round_to(geometry.pin_pitch / 2.0 + radius + 0.25, 3),
            "refOffsetY": round_to(-(radius + 1.0), 3),
            "valueOffsetY": round_to(radius + 1.0, 3),
            "voltage": escape(self.capacitor().voltage()),
        });

        let output = ctx
            .templates
            .render(TemplateId::RadialCapacitorFootprint, &data);
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
        let capacitor = self.capacitor();
        if !capacitor.has_capacitance() {
            return false;
        }

        let footprint = self
            .footprint_name()
            .map(|name| ctx.footprint_reference(&name))
            .unwrap_or_default();
        let component = self.component();

        let data = json!({
            "symbol": escape(&capacitor.symbol_name()),
            "value": escape(capacitor.capacitance()),
            "tolerance": escape(capacitor.tolerance()),
            "voltage": escape(capacitor.voltage()),
            "footprint": escape(&footprint),
            "datasheet": escape(component.datasheet()),
            "dkPart": escape(component.distributor_part()),
            "mfrPart": escape(component.mpn()),
            "price": component.price(),
        });

        let output = ctx
            .templates
            .render(TemplateId::PolarizedCapacitorSymbol, &data);
        library.append(&output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn record() -> Value {
        json!({
            "ManufacturerProductNumber": "EEU-FR0J101",
            "UnitPrice": 0.25,
            "Parameters": [
                { "ParameterId": 2049, "ValueText": "100 µF", "ValueId": "100 µF" },
                { "ParameterId": 3, "ValueText": "±20%" },
                { "ParameterId": 2079, "ValueText": "6.3 V" },
                { "ParameterId": 46, "ValueText": "0.197\" Dia (5.00mm)" },
                { "ParameterId": 508, "ValueText": "0.079\" (2.00mm)" }
            ],
            "ProductVariations": [
                { "DigiKeyProductNumber": "P1234-ND", "PackageType": { "Id": 1 } }
            ]
        })
    }

    #[test]
    fn parenthesised_values() {
        assert_eq!(parenthesised_mm("0.197\" Dia (5.00mm)"), Some(5.0));
        assert_eq!(parenthesised_mm("0.138\" (3.50 mm)"), Some(3.5));
        assert_eq!(parenthesised_mm("0.197\" Dia x 0.433\" L (5.00mm x 11.00mm)"), Some(5.0));
        assert_eq!(parenthesised_mm("5.00mm"), None);
        assert_eq!(parenthesised_mm("Unknown"), None);
    }

    #[test]
    fn capacitor_fields() {
        let capacitor = Capacitor::parse(&record());
        assert_eq!(capacitor.capacitance(), "100 µF");
        assert_eq!(capacitor.symbol_name(), "CP_100 µF");
        assert_eq!(capacitor.tolerance(), "±20%");
        assert_eq!(capacitor.voltage(), "6.3 V");
        assert_eq!(capacitor.component().mpn(), "EEU-FR0J101");
    }

    #[test]
    fn radial_extraction_is_cumulative() {
        let radial = Radial::parse(&record());

        // Component layer.
        assert_eq!(radial.component().distributor_part(), "P1234-ND");
        assert!((radial.component().price() - 0.25).abs() < f64::EPSILON);
        // Capacitor layer.
        assert_eq!(radial.capacitor().capacitance(), "100 µF");
        // Radial layer.
        assert_eq!(radial.diameter(), Some(5.0));
        assert_eq!(radial.pin_pitch(), Some(2.0));
        assert_eq!(
            radial.footprint_name().as_deref(),
            Some("CP_Radial_D5.0mm_P2.0mm.kicad_mod")
        );
        assert!(!radial.is_skipped());
    }

    #[test]
    fn radial_without_lead_spacing_is_skipped() {
        let mut record = record();
        record["Parameters"]
            .as_array_mut()
            .unwrap()
            .retain(|p| p["ParameterId"] != 508);

        let radial = Radial::parse(&record);
        assert_eq!(radial.diameter(), Some(5.0));
        assert_eq!(radial.pin_pitch(), None);
        assert!(radial.is_skipped());
        assert_eq!(radial.footprint_name(), None);
    }

    #[test]
    fn empty_capacitor_placeholders() {
        let capacitor = Capacitor::default();
        assert_eq!(capacitor.capacitance(), "Unknown");
        assert_eq!(capacitor.symbol_name(), "CP_Unknown");
        assert!(!capacitor.has_capacitance());
    }
}
