//! Unit tables. Weight factors are grams per unit, volume factors millilitres per unit.

use super::SizeKind;

const GRAMS_PER_OUNCE: f64 = 28.349_523_125;
const GRAMS_PER_POUND: f64 = 453.592_37;
const MILLILITRES_PER_FLUID_OUNCE: f64 = 29.573_529_562_5;

pub const WEIGHT_UNITS: &[(&str, f64)] = &[
    ("mg", 0.001),
    ("g", 1.0),
    ("gr", 1.0),
    ("gram", 1.0),
    ("grams", 1.0),
    ("gramme", 1.0),
    ("grammes", 1.0),
    ("kg", 1000.0),
    ("kgs", 1000.0),
    ("kilo", 1000.0),
    ("kilos", 1000.0),
    ("kilogram", 1000.0),
    ("kilograms", 1000.0),
    ("oz", GRAMS_PER_OUNCE),
    ("lb", GRAMS_PER_POUND),
    ("lbs", GRAMS_PER_POUND),
    ("pound", GRAMS_PER_POUND),
    ("pounds", GRAMS_PER_POUND),
];

pub const VOLUME_UNITS: &[(&str, f64)] = &[
    ("ml", 1.0),
    ("mls", 1.0),
    ("millilitre", 1.0),
    ("millilitres", 1.0),
    ("milliliter", 1.0),
    ("milliliters", 1.0),
    ("cl", 10.0),
    ("dl", 100.0),
    ("l", 1000.0),
    ("lt", 1000.0),
    ("ltr", 1000.0),
    ("litre", 1000.0),
    ("litres", 1000.0),
    ("liter", 1000.0),
    ("liters", 1000.0),
    ("floz", MILLILITRES_PER_FLUID_OUNCE),
];

pub const COUNT_UNITS: &[&str] = &[
    "pack", "packs", "pk", "pc", "pcs", "piece", "pieces", "ea", "each", "ct", "count", "unit",
    "units",
];

/// Resolves a lowercase unit token to its canonical multiplier and kind.
///
/// Count units always have a multiplier of `1.0`.
pub fn lookup(unit: &str) -> Option<(f64, SizeKind)> {
    if let Some((_, factor)) = WEIGHT_UNITS.iter().find(|(name, _)| *name == unit) {
        return Some((*factor, SizeKind::Weight));
    }
    if let Some((_, factor)) = VOLUME_UNITS.iter().find(|(name, _)| *name == unit) {
        return Some((*factor, SizeKind::Volume));
    }
    if COUNT_UNITS.contains(&unit) {
        return Some((1.0, SizeKind::Count));
    }
    None
}
