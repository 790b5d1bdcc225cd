//! # Selling Units
//!
//! Unit presets and list operations for a product's unit list. The first
//! unit in the list is the primary unit: new order lines use it and stock
//! is counted in it.

use crate::types::Unit;

/// Units offered when a product is created or a unit is added.
pub const UNIT_PRESETS: [(&str, f64); 8] = [
    ("pcs", 1.0),
    ("kg", 1.0),
    ("gram", 0.001),
    ("liter", 1.0),
    ("ml", 0.001),
    ("meter", 1.0),
    ("dozen", 12.0),
    ("box", 1.0),
];

/// Preset multiplier for a unit name, if it is one of the presets.
pub fn preset_multiplier(name: &str) -> Option<f64> {
    let name = name.trim();
    UNIT_PRESETS
        .iter()
        .find(|(preset, _)| preset.eq_ignore_ascii_case(name))
        .map(|(_, multiplier)| *multiplier)
}

/// A unit by name, using the preset multiplier or 1 when unknown.
pub fn unit_from_name(name: &str) -> Unit {
    let name = name.trim();
    Unit::new(name, preset_multiplier(name).unwrap_or(1.0))
}

pub fn primary_unit(units: &[Unit]) -> Option<&Unit> {
    units.first()
}

/// Moves the unit at `index` one slot down; the last unit wraps to the
/// front and so becomes primary. Out of range indexes are ignored.
pub fn rotate_unit(units: &mut [Unit], index: usize) {
    let len = units.len();
    if len < 2 || index >= len {
        return;
    }

    if index == len - 1 {
        units.rotate_right(1);
    } else {
        units.swap(index, index + 1);
    }
}

/// Quantity in base units.
pub fn to_base_quantity(qty: f64, unit: &Unit) -> f64 {
    qty * unit.multiplier
}
