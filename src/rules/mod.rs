//! Deterministic rule classifier for one (spec, candidate) pair.
//!
//! Hard bans are checked first and short-circuit:
//!
//! 1. banned category token in the category path → `fail` (0.1)
//! 2. banned title token in the title → `fail` (0.1)
//! 3. form-specific banned token in the title → `fail` (0.2)
//!
//! Otherwise an additive score starting at 0.5 decides the verdict: size within
//! tolerance (+0.2, or −0.2 when outside), name in title (+0.1), category path
//! present (+0.1), clamped to `[0, 0.9]`. `pass` at ≥ 0.8, `fail` at ≤ 0.3.
//!
//! Scores are kept in integer hundredths so threshold comparisons are exact.

pub mod tables;


use crate::model::{CandidateProduct, IngredientSpec, Quantity, Verdict};
use crate::size::{Size, Tolerance, parse_size, within_tolerance};

use tables::{
    BANNED_CATEGORY_TOKENS, BANNED_TITLE_TOKENS, find_substring, find_word, form_banned_tokens,
};

const BANNED_CATEGORY_SCORE: i32 = 10;
const BANNED_TITLE_SCORE: i32 = 10;
const BANNED_FORM_SCORE: i32 = 20;

const BASELINE_SCORE: i32 = 50;
const SIZE_MATCH_DELTA: i32 = 20;
const SIZE_MISMATCH_DELTA: i32 = -20;
const NAME_MATCH_DELTA: i32 = 10;
const CATEGORY_PRESENT_DELTA: i32 = 10;

/// The rule path never claims more than this; full certainty needs the judge.
const RULE_CEILING: i32 = 90;
const PASS_AT: i32 = 80;
const FAIL_AT: i32 = 30;

/// Verdict produced by the rule path alone.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    pub verdict: Verdict,
    pub rule_conf: f32,
    pub reason: String,
}

impl RuleOutcome {
    fn from_score(verdict: Verdict, score: i32, reason: String) -> Self {
        Self {
            verdict,
            rule_conf: score as f32 / 100.0,
            reason,
        }
    }
}

/// Classifies a candidate with the default size tolerance.
pub fn evaluate(spec: &IngredientSpec, candidate: &CandidateProduct) -> RuleOutcome {
    evaluate_with(spec, candidate, Tolerance::default())
}

/// Classifies a candidate against a spec.
pub fn evaluate_with(
    spec: &IngredientSpec,
    candidate: &CandidateProduct,
    tolerance: Tolerance,
) -> RuleOutcome {
    let title = candidate.title.to_lowercase();
    let categories = candidate.joined_categories().to_lowercase();

    if let Some(token) = find_substring(&categories, BANNED_CATEGORY_TOKENS) {
        return RuleOutcome::from_score(
            Verdict::Fail,
            BANNED_CATEGORY_SCORE,
            format!("banned category '{token}'"),
        );
    }

    if let Some(token) = find_word(&title, BANNED_TITLE_TOKENS) {
        return RuleOutcome::from_score(
            Verdict::Fail,
            BANNED_TITLE_SCORE,
            format!("banned title token '{token}'"),
        );
    }

    if let Some(form) = spec.form
        && let Some(token) = find_word(&title, form_banned_tokens(form))
    {
        return RuleOutcome::from_score(
            Verdict::Fail,
            BANNED_FORM_SCORE,
            format!("'{token}' conflicts with required form '{form}'"),
        );
    }

    let mut score = BASELINE_SCORE;
    let mut notes = Vec::with_capacity(3);

    let required = ingredient_size(spec);
    let offered = candidate_size(candidate);
    match (required, offered) {
        (Some(a), Some(b)) if within_tolerance(Some(a), Some(b), tolerance) => {
            score += SIZE_MATCH_DELTA;
            notes.push(format!("size within tolerance ({b} vs {a})"));
        }
        (Some(a), Some(b)) => {
            score += SIZE_MISMATCH_DELTA;
            notes.push(format!("size outside tolerance ({b} vs {a})"));
        }
        _ => notes.push("size unknown".to_string()),
    }

    let name = spec.name.trim().to_lowercase();
    if !name.is_empty() && title.contains(&name) {
        score += NAME_MATCH_DELTA;
        notes.push("title matches ingredient name".to_string());
    } else {
        notes.push("title does not contain ingredient name".to_string());
    }

    if candidate.category_path.iter().any(|c| !c.trim().is_empty()) {
        score += CATEGORY_PRESENT_DELTA;
        notes.push("category present".to_string());
    }

    let score = score.clamp(0, RULE_CEILING);
    let verdict = if score >= PASS_AT {
        Verdict::Pass
    } else if score <= FAIL_AT {
        Verdict::Fail
    } else {
        Verdict::Unsure
    };

    RuleOutcome::from_score(verdict, score, notes.join("; "))
}

/// Required size, if the spec carries a parseable quantity.
///
/// A whole-number amount with an unrecognized noun unit (`12` + `"eggs"`) is a count.
pub fn ingredient_size(spec: &IngredientSpec) -> Option<Size> {
    let quantity = spec.quantity.as_ref()?;
    parse_size(&quantity.as_size_text()).or_else(|| noun_count(quantity))
}

fn noun_count(quantity: &Quantity) -> Option<Size> {
    let unit = quantity.unit.trim();
    let is_noun = !unit.is_empty() && unit.chars().all(|c| c.is_alphabetic() || c == ' ');
    let amount = quantity.amount;
    (is_noun && amount.is_finite() && amount > 0.0 && amount.fract() == 0.0)
        .then(|| Size::count(amount))
}

/// Offered size from `size_text`, falling back to the title.
pub fn candidate_size(candidate: &CandidateProduct) -> Option<Size> {
    candidate
        .size_text
        .as_deref()
        .and_then(parse_size)
        .or_else(|| parse_size(&candidate.title))
}
