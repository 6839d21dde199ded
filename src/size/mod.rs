//! Size normalization.
//!
//! Free-text size descriptions ("4 x 250g", "1L", "6 pack", "12") are parsed into a
//! canonical [`Size`]: weights in grams, volumes in millilitres, counts as-is.
//! Absence of a parseable size is `None`, which callers treat as "cannot compare".

pub mod units;


use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_COUNT_SLACK, DEFAULT_SIZE_TOLERANCE_PCT};

/// Physical dimension of a [`Size`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeKind {
    Weight,
    Volume,
    Count,
}

/// Canonical unit of a [`Size`]; fixed by its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeUnit {
    #[serde(rename = "g")]
    Grams,
    #[serde(rename = "ml")]
    Millilitres,
    #[serde(rename = "count")]
    Count,
}

impl SizeKind {
    #[inline]
    pub fn canonical_unit(&self) -> SizeUnit {
        match self {
            SizeKind::Weight => SizeUnit::Grams,
            SizeKind::Volume => SizeUnit::Millilitres,
            SizeKind::Count => SizeUnit::Count,
        }
    }
}

impl SizeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeUnit::Grams => "g",
            SizeUnit::Millilitres => "ml",
            SizeUnit::Count => "count",
        }
    }
}

/// A canonicalized physical quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub amount: f64,
    pub unit: SizeUnit,
    pub kind: SizeKind,
}

impl Size {
    pub fn new(amount: f64, kind: SizeKind) -> Self {
        Self {
            amount,
            unit: kind.canonical_unit(),
            kind,
        }
    }

    pub fn grams(amount: f64) -> Self {
        Self::new(amount, SizeKind::Weight)
    }

    pub fn millilitres(amount: f64) -> Self {
        Self::new(amount, SizeKind::Volume)
    }

    pub fn count(amount: f64) -> Self {
        Self::new(amount, SizeKind::Count)
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.as_str())
    }
}

/// Acceptable deviation between a required and an offered size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Allowed weight/volume deviation, in percent of the required amount.
    pub percent: f64,
    /// Allowed absolute deviation for counts.
    pub count_slack: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            percent: DEFAULT_SIZE_TOLERANCE_PCT,
            count_slack: DEFAULT_COUNT_SLACK,
        }
    }
}

static FLUID_OUNCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"fl\.?\s*oz").expect("fluid ounce pattern is valid"));

// The count must be a whole number, not the tail of a decimal like "1.5".
static MULTI_PACK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\d.])(\d+)\s*x\s*(\d+(?:\.\d+)?)\s*([a-z]+)\b")
        .expect("multi-pack pattern is valid")
});

static MULTI_PACK_TRAILING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*([a-z]+)\s*x\s*(\d+)(?:$|[^\d.])")
        .expect("trailing multi-pack pattern is valid")
});

static AMOUNT_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*([a-z]+)\b").expect("amount/unit pattern is valid")
});

static BARE_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)(?:\s*(?:pack|pk)s?)?$").expect("bare count pattern is valid")
});

fn normalize_text(text: &str) -> String {
    let lowered = text.trim().to_lowercase().replace('×', "x").replace(',', "");
    FLUID_OUNCE.replace_all(&lowered, "floz").into_owned()
}

/// Parses a free-text size description.
///
/// Tried in order: multi-pack (`<count> x <amount><unit>` or `<amount><unit> x <count>`),
/// single `<amount><unit>`,
/// then a bare count (`"<n> pack"` or a lone integer).
pub fn parse_size(text: &str) -> Option<Size> {
    let normalized = normalize_text(text);
    if normalized.is_empty() {
        return None;
    }

    parse_multi_pack(&normalized)
        .or_else(|| parse_amount_unit(&normalized))
        .or_else(|| parse_bare_count(&normalized))
}

fn parse_multi_pack(text: &str) -> Option<Size> {
    let leading = MULTI_PACK.captures_iter(text).find_map(|caps| {
        let count: f64 = caps[1].parse().ok()?;
        let amount: f64 = caps[2].parse().ok()?;
        let (factor, kind) = units::lookup(&caps[3])?;
        Some(Size::new(count * amount * factor, kind))
    });
    leading.or_else(|| {
        MULTI_PACK_TRAILING.captures_iter(text).find_map(|caps| {
            let amount: f64 = caps[1].parse().ok()?;
            let (factor, kind) = units::lookup(&caps[2])?;
            let count: f64 = caps[3].parse().ok()?;
            Some(Size::new(count * amount * factor, kind))
        })
    })
}

fn parse_amount_unit(text: &str) -> Option<Size> {
    AMOUNT_UNIT.captures_iter(text).find_map(|caps| {
        let amount: f64 = caps[1].parse().ok()?;
        let (factor, kind) = units::lookup(&caps[2])?;
        Some(Size::new(amount * factor, kind))
    })
}

fn parse_bare_count(text: &str) -> Option<Size> {
    let caps = BARE_COUNT.captures(text)?;
    let count: f64 = caps[1].parse().ok()?;
    Some(Size::count(count))
}

/// Returns `true` when `candidate` is an acceptable substitute for `required`.
///
/// Tolerance is relative to `required`, so the comparison is not symmetric.
/// Missing sizes and cross-kind comparisons are never within tolerance.
pub fn within_tolerance(
    required: Option<Size>,
    candidate: Option<Size>,
    tolerance: Tolerance,
) -> bool {
    let (Some(a), Some(b)) = (required, candidate) else {
        return false;
    };
    if a.kind != b.kind {
        return false;
    }

    let diff = (a.amount - b.amount).abs();
    match a.kind {
        SizeKind::Count => diff <= tolerance.count_slack,
        SizeKind::Weight | SizeKind::Volume => diff <= a.amount.abs() * tolerance.percent / 100.0,
    }
}
