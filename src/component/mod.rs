//! Typed component descriptors.
//!
//! A descriptor is a parsed projection of one raw search record. Descriptors are
//! built once with [`Descriptor::parse`] and are read-only afterwards; they keep no
//! reference to the record.
//!
//! # Variants
//!
//! - [`Component`] — fields every part has (part numbers, datasheet, price, dimensions)
//! - [`Resistor`] — resistance, tolerance, power, axial body geometry
//! - [`Capacitor`] — capacitance, tolerance, voltage
//! - [`AluminumElectrolytic`] — capacitor family marker
//! - [`Radial`] — electrolytic with can diameter and lead spacing
//!
//! Variants compose rather than inherit: each one owns the layer below and builds it
//! with that layer's own `parse` before extracting its own [`fields`] table.
//!
//! # Missing data
//!
//! Absent parameters are stored as `None` and reported through accessors as the
//! placeholders [`UNKNOWN`], [`NOT_AVAILABLE`] or [`UNPRICED`]. Dimension text that is
//! present but malformed puts the descriptor into a skip state in which no footprint
//! is generated.

pub mod base;
pub mod capacitor;
pub mod fields;
pub mod resistor;

use std::fmt;
use std::str::FromStr;

pub use base::{Component, NOT_AVAILABLE, UNKNOWN, UNPRICED};
pub use capacitor::{AluminumElectrolytic, Capacitor, Radial, RadialGeometry};
pub use resistor::{AxialGeometry, BodyState, Resistor};

use crate::RawRecord;

/// A descriptor that can be parsed from a raw record.
pub trait Descriptor: Sized {
    /// Parses every field this variant knows about. Never fails.
    fn parse(record: &RawRecord) -> Self;

    /// Fields shared by every component.
    fn component(&self) -> &Component;
}

impl Descriptor for Component {
    fn parse(record: &RawRecord) -> Self {
        Self::parse(record)
    }

    fn component(&self) -> &Component {
        self
    }
}

/// Component families the generator can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Axial through-hole resistors.
    Resistor,
    /// Radial through-hole aluminium electrolytic capacitors.
    CapacitorRadial,
    /// Diodes (not implemented).
    Diode,
}

impl ComponentKind {
    /// Canonical command-line name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Resistor => "resistor",
            Self::CapacitorRadial => "capacitor-radial",
            Self::Diode => "diode",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ComponentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "resistor" => Ok(Self::Resistor),
            "capacitor-radial" | "capthrad" | "capacitor" => Ok(Self::CapacitorRadial),
            "diode" => Ok(Self::Diode),
            other => Err(format!(
                "unknown component type '{other}' (expected resistor, capacitor-radial or diode)"
            )),
        }
    }
}

/// Formats a millimetre value for a footprint name.
///
/// Uses the shortest representation but always keeps one decimal, so `2.0` prints
/// as `"2.0"` and `5.08` as `"5.08"`.
#[must_use]
pub fn format_mm(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_str() {
        assert_eq!("resistor".parse::<ComponentKind>(), Ok(ComponentKind::Resistor));
        assert_eq!(
            "capTHRad".parse::<ComponentKind>(),
            Ok(ComponentKind::CapacitorRadial)
        );
        assert_eq!(
            "Capacitor-Radial".parse::<ComponentKind>(),
            Ok(ComponentKind::CapacitorRadial)
        );
        assert_eq!("diode".parse::<ComponentKind>(), Ok(ComponentKind::Diode));
        assert!("inductor".parse::<ComponentKind>().is_err());
    }

    #[test]
    fn kind_display_round_trips() {
        for kind in [
            ComponentKind::Resistor,
            ComponentKind::CapacitorRadial,
            ComponentKind::Diode,
        ] {
            assert_eq!(kind.to_string().parse::<ComponentKind>(), Ok(kind));
        }
    }

    #[test]
    fn mm_formatting() {
        assert_eq!(format_mm(2.0), "2.0");
        assert_eq!(format_mm(1.8), "1.8");
        assert_eq!(format_mm(5.08), "5.08");
        assert_eq!(format_mm(10.0), "10.0");
    }
}
