use serde::Serialize;

use crate::model::{CandidateProduct, IngredientSpec};

/// Fixed instruction sent with every batch.
pub const SYSTEM_INSTRUCTION: &str = "\
You are a grocery product matcher. For each item, decide whether the candidate store \
product is an acceptable purchase for the required ingredient.

A candidate passes only if all of the following hold:
- it is the same base food as the ingredient, not a flavouring, sauce, snack or other derivative of it;
- its form matches the required form when one is given (raw, fresh, dry, frozen, cooked, canned, liquid, powder);
- its size is within ±15% of the required quantity when both are known;
- it does not belong to an unrelated category such as pet food, household, toiletries, cosmetics or baby care.

Reply with a JSON array only, no prose and no code fences. Return exactly one element per \
item, in the same order as the items:
[{\"verdict\": \"pass\" | \"fail\" | \"unsure\", \"confidence\": <number between 0 and 1>, \"reason\": \"<short explanation>\"}]";

/// One (spec, candidate) pair as serialized for the judge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JudgeItem {
    pub ingredient: String,

    pub candidate_title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_size: Option<String>,
}

impl JudgeItem {
    pub fn new(spec: &IngredientSpec, candidate: &CandidateProduct) -> Self {
        let category = candidate.joined_categories();
        Self {
            ingredient: spec.describe(),
            candidate_title: candidate.title.clone(),
            candidate_category: (!category.is_empty()).then_some(category),
            candidate_size: candidate
                .size_text
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

/// Renders the user message carrying the serialized item list.
pub fn render_items(items: &[JudgeItem]) -> Result<String, serde_json::Error> {
    let payload = serde_json::to_string_pretty(items)?;
    Ok(format!(
        "Judge these {} items:\n{}\n\nRespond with a JSON array of {} elements.",
        items.len(),
        payload,
        items.len()
    ))
}
