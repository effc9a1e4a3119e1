//! Cheapest-per-value selection.
//!
//! Records are grouped by their normalised electrical value and only the cheapest
//! record of each group is kept. Groups are returned in the order their first member
//! appeared in the input.

use indexmap::map::Entry;
use indexmap::IndexMap;
use tracing::debug;

use crate::component::fields::{self, ValueSource, PARAM_CAPACITANCE, PARAM_RESISTANCE};
use crate::units::{self, GroupKey, GROUP_KEY_DECIMALS};
use crate::RawRecord;

/// Resistance text used when a record has none; normalises to 0 Ω.
pub const DEFAULT_RESISTANCE_TEXT: &str = "0 Ohms";

/// Capacitance text used when a record has none; normalises to 0 F.
pub const DEFAULT_CAPACITANCE_TEXT: &str = "0 F";

/// Normalised resistance of a record in ohms.
#[must_use]
pub fn resistance_of(record: &RawRecord) -> f64 {
    let text = fields::parameter_value(record, PARAM_RESISTANCE, ValueSource::Text);
    units::parse_resistance(text.as_deref().unwrap_or(DEFAULT_RESISTANCE_TEXT))
}

/// Normalised capacitance of a record in farads.
#[must_use]
pub fn capacitance_of(record: &RawRecord) -> f64 {
    let text = fields::parameter_value(record, PARAM_CAPACITANCE, ValueSource::Text);
    units::parse_capacitance(text.as_deref().unwrap_or(DEFAULT_CAPACITANCE_TEXT))
}

/// Price used for comparison. Records without a price never beat a priced one.
fn comparison_price(record: &RawRecord) -> f64 {
    fields::unit_price(record).unwrap_or(f64::INFINITY)
}

/// Keeps the cheapest record per value, grouped at the default precision.
///
/// See [`select_cheapest_with_precision`].
pub fn select_cheapest<I, F>(records: I, value_of: F) -> Vec<RawRecord>
where
    I: IntoIterator<Item = RawRecord>,
    F: Fn(&RawRecord) -> f64,
{
    select_cheapest_with_precision(records, value_of, GROUP_KEY_DECIMALS)
}

/// Keeps the cheapest record per value.
///
/// `value_of` maps a record to its magnitude in base units; magnitudes that round to
/// the same value at `decimals` places form one group. Within a group a later record
/// replaces the current one only if it is strictly cheaper, so ties keep the first.
///
/// # Examples
///
/// ```
/// use digikey_kicad_gen::select::{resistance_of, select_cheapest};
/// use serde_json::json;
///
/// let record = |value: &str, price: f64| json!({
///     "UnitPrice": price,
///     "Parameters": [{ "ParameterId": 2085, "ValueText": value }]
/// });
///
/// let kept = select_cheapest(
///     vec![record("1 kOhms", 0.10), record("1000 Ohms", 0.05), record("2 kOhms", 0.20)],
///     resistance_of,
/// );
/// assert_eq!(kept.len(), 2);
/// assert_eq!(kept[0]["UnitPrice"], 0.05);
/// ```
pub fn select_cheapest_with_precision<I, F>(
    records: I,
    value_of: F,
    decimals: u32,
) -> Vec<RawRecord>
where
    I: IntoIterator<Item = RawRecord>,
    F: Fn(&RawRecord) -> f64,
{
    let mut groups: IndexMap<GroupKey, RawRecord> = IndexMap::new();
    let mut seen = 0usize;

    for record in records {
        seen += 1;
        let key = GroupKey::with_decimals(value_of(&record), decimals);
        match groups.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(mut slot) => {
                if comparison_price(&record) < comparison_price(slot.get()) {
                    slot.insert(record);
                }
            }
        }
    }

    debug!(records = seen, groups = groups.len(), "Selected cheapest per value");
    groups.into_values().collect()
}
