//! Electrical value normalisation.
//!
//! Distributor parameter text comes in many spellings (`"4.7kOhms"`, `"4.7 kOhms"`,
//! `"10µF"`, `"100 uF"`). This module turns those strings into a magnitude in base SI
//! units so that parts can be compared and grouped numerically.
//!
//! # Parsing policy
//!
//! The lenient parsers ([`parse_resistance`], [`parse_capacitance`]) never fail.
//! Unrecognised text yields `0.0`, which callers cannot tell apart from a literal zero.
//! The strict parsers ([`try_parse_resistance`], [`try_parse_capacitance`]) return
//! `None` instead.
//!
//! # Resistance prefixes
//!
//! Input is lowercased before matching, so `m` and `M` are indistinguishable and both
//! scale by 1e6. Distributor text always writes megaohms as `MOhms`; milliohm values are
//! not expected in the supported categories.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Number of decimal places used by [`GroupKey::new`].
pub const GROUP_KEY_DECIMALS: u32 = 3;

#[allow(clippy::expect_used)]
static RESISTANCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+\.?\d*)\s*([km]?)ohms?$").expect("resistance regex is valid")
});

#[allow(clippy::expect_used)]
static CAPACITANCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+\.?\d*)\s*([pnuµμm]?)f$").expect("capacitance regex is valid")
});

/// Base SI unit of an [`ElectricalValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Resistance in ohms.
    Ohm,
    /// Capacitance in farads.
    Farad,
}

impl Unit {
    /// Returns the unit symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Ohm => "\u{03A9}",
            Self::Farad => "F",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A normalised magnitude with its unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElectricalValue {
    /// Magnitude in the base unit. Never negative.
    pub magnitude: f64,
    /// Base unit of the magnitude.
    pub unit: Unit,
}

impl ElectricalValue {
    /// Creates a new electrical value.
    #[must_use]
    pub const fn new(magnitude: f64, unit: Unit) -> Self {
        Self { magnitude, unit }
    }
}

impl fmt::Display for ElectricalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit)
    }
}

/// A magnitude rounded to a fixed number of decimal places.
///
/// Stored as an integer count of `10^-decimals` steps so it can be hashed and compared
/// exactly. Two magnitudes belong to the same group when they round to the same key.
/// The count is 128 bits wide: a gigaohm at twelve decimals is `10^21` steps, past the
/// range of `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    steps: i128,
    decimals: u32,
}

impl GroupKey {
    /// Rounds `magnitude` to [`GROUP_KEY_DECIMALS`] decimal places.
    #[must_use]
    pub fn new(magnitude: f64) -> Self {
        Self::with_decimals(magnitude, GROUP_KEY_DECIMALS)
    }

    /// Rounds `magnitude` to `decimals` decimal places.
    #[must_use]
    pub fn with_decimals(magnitude: f64, decimals: u32) -> Self {
        let scale = 10f64.powi(i32::try_from(decimals).unwrap_or(i32::MAX));
        // Saturates only above 1.7e38 steps, far beyond any parsed magnitude.
        #[allow(clippy::cast_possible_truncation)]
        let steps = (magnitude * scale).round() as i128;
        Self { steps, decimals }
    }

    /// Returns the rounded magnitude.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value(&self) -> f64 {
        self.steps as f64 / 10f64.powi(i32::try_from(self.decimals).unwrap_or(i32::MAX))
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Parses resistance text into ohms, returning `0.0` when the text is not recognised.
///
/// # Examples
///
/// ```
/// use digikey_kicad_gen::units::parse_resistance;
///
/// assert_eq!(parse_resistance("4.7kOhms"), 4700.0);
/// assert_eq!(parse_resistance("220 Ohms"), 220.0);
/// assert_eq!(parse_resistance("n/a"), 0.0);
/// ```
#[must_use]
pub fn parse_resistance(text: &str) -> f64 {
    try_parse_resistance(text).map_or(0.0, |v| v.magnitude)
}

/// Parses capacitance text into farads, returning `0.0` when the text is not recognised.
///
/// # Examples
///
/// ```
/// use digikey_kicad_gen::units::parse_capacitance;
///
/// assert!((parse_capacitance("10uF") - 1e-5).abs() < 1e-18);
/// assert_eq!(parse_capacitance("-"), 0.0);
/// ```
#[must_use]
pub fn parse_capacitance(text: &str) -> f64 {
    try_parse_capacitance(text).map_or(0.0, |v| v.magnitude)
}

/// Parses resistance text, returning `None` when the text is not recognised.
#[must_use]
pub fn try_parse_resistance(text: &str) -> Option<ElectricalValue> {
    let value = text.trim().to_lowercase();
    let caps = RESISTANCE_PATTERN.captures(&value)?;
    let number: f64 = caps[1].parse().ok()?;

    let scale = match &caps[2] {
        "k" => 1e3,
        "m" => 1e6,
        _ => 1.0,
    };

    Some(ElectricalValue::new(number * scale, Unit::Ohm))
}

/// Parses capacitance text, returning `None` when the text is not recognised.
#[must_use]
pub fn try_parse_capacitance(text: &str) -> Option<ElectricalValue> {
    let value = text.trim().to_lowercase();
    let caps = CAPACITANCE_PATTERN.captures(&value)?;
    let number: f64 = caps[1].parse().ok()?;

    let scale = match &caps[2] {
        "p" => 1e-12,
        "n" => 1e-9,
        "u" | "µ" | "μ" => 1e-6,
        "m" => 1e-3,
        _ => 1.0,
    };

    Some(ElectricalValue::new(number * scale, Unit::Farad))
}

/// Rounds a length up to the next multiple of 0.1 inch (2.54 mm).
///
/// The result is rounded to 0.01 mm so that footprint names stay readable.
#[must_use]
pub fn grid_round_up(length_mm: f64) -> f64 {
    const GRID: f64 = 2.54;
    let snapped = (length_mm / GRID).ceil() * GRID;
    (snapped * 100.0).round() / 100.0
}

/// Rounds a value to `decimals` decimal places.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= b.abs() * 1e-12
    }

    #[test]
    fn resistance_prefixes() {
        assert!(approx_eq(parse_resistance("4.7kOhms"), 4700.0));
        assert!(approx_eq(parse_resistance("4.7 kOhms"), 4700.0));
        assert!(approx_eq(parse_resistance("10 Ohms"), 10.0));
        assert!(approx_eq(parse_resistance("1 Ohm"), 1.0));
        assert!(approx_eq(parse_resistance("2.2MOhms"), 2_200_000.0));
        assert!(approx_eq(parse_resistance("  330 ohms  "), 330.0));
    }

    #[test]
    fn resistance_milli_is_read_as_mega() {
        assert!(approx_eq(parse_resistance("5 mOhms"), 5_000_000.0));
    }

    #[test]
    fn capacitance_prefixes() {
        assert!(approx_eq(parse_capacitance("10uF"), 1e-5));
        assert!(approx_eq(parse_capacitance("10µF"), 1e-5));
        assert!(approx_eq(parse_capacitance("22 µF"), 22e-6));
        assert!(approx_eq(parse_capacitance("100pF"), 100e-12));
        assert!(approx_eq(parse_capacitance("47nF"), 47e-9));
        assert!(approx_eq(parse_capacitance("1.5mF"), 1.5e-3));
        assert!(approx_eq(parse_capacitance("1F"), 1.0));
    }

    #[test]
    fn unrecognised_text_is_zero() {
        for text in ["", "-", "Ohms", "4k7", "abc kOhms", "10 V", "1,000 Ohms", "10uH", "0.1in"] {
            assert_eq!(parse_resistance(text), 0.0, "{text}");
            assert_eq!(parse_capacitance(text), 0.0, "{text}");
        }
    }

    #[test]
    fn strict_parsers_separate_zero_from_garbage() {
        assert_eq!(
            try_parse_resistance("0 Ohms"),
            Some(ElectricalValue::new(0.0, Unit::Ohm))
        );
        assert_eq!(try_parse_resistance("garbage"), None);
        assert_eq!(try_parse_capacitance("0 F").map(|v| v.unit), Some(Unit::Farad));
        assert_eq!(try_parse_capacitance("x"), None);
    }

    #[test]
    fn group_key_rounds_to_three_decimals() {
        assert_eq!(GroupKey::new(4700.0), GroupKey::new(4700.0004));
        assert_ne!(GroupKey::new(4700.0), GroupKey::new(4700.001));
        assert!((GroupKey::new(1.23456).value() - 1.235).abs() < 1e-12);
    }

    #[test]
    fn group_key_custom_precision() {
        let a = GroupKey::with_decimals(10e-6, 9);
        let b = GroupKey::with_decimals(22e-6, 9);
        assert_ne!(a, b);
        assert_eq!(GroupKey::new(10e-6), GroupKey::new(22e-6));
    }

    #[test]
    fn group_key_keeps_large_values_apart_at_twelve_decimals() {
        let ten_meg = GroupKey::with_decimals(10e6, 12);
        let twenty_two_meg = GroupKey::with_decimals(22e6, 12);
        assert_ne!(ten_meg, twenty_two_meg);
        assert_ne!(
            GroupKey::with_decimals(1e9, 12),
            GroupKey::with_decimals(2e9, 12)
        );
        assert!((ten_meg.value() - 10e6).abs() < 1e-6);
    }

    #[test]
    fn grid_rounding() {
        assert!((grid_round_up(2.0) - 2.54).abs() < 1e-9);
        assert!((grid_round_up(2.54) - 2.54).abs() < 1e-9);
        assert!((grid_round_up(2.6) - 5.08).abs() < 1e-9);
        assert!((grid_round_up(6.3) - 7.62).abs() < 1e-9);
    }

    #[test]
    fn display_uses_unit_symbol() {
        assert_eq!(ElectricalValue::new(4700.0, Unit::Ohm).to_string(), "4700\u{03A9}");
        assert_eq!(Unit::Farad.to_string(), "F");
    }
}
