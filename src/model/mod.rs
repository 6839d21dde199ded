//! Request/response types shared by the classifier, judge, cache and gateway.
//!
//! Wire names follow the public JSON contract: candidate fields are camelCase
//! (`productId`, `sizeText`, `categoryPath`) while `signals` uses snake_case
//! (`rule_conf`, `ai_conf`).


use serde::{Deserialize, Serialize};

use crate::constants::DECISIVE_CONFIDENCE;

/// Preparation or physical state an ingredient must be bought in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientForm {
    Raw,
    Fresh,
    Dry,
    Frozen,
    Cooked,
    Canned,
    Liquid,
    Powder,
}

impl IngredientForm {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngredientForm::Raw => "raw",
            IngredientForm::Fresh => "fresh",
            IngredientForm::Dry => "dry",
            IngredientForm::Frozen => "frozen",
            IngredientForm::Cooked => "cooked",
            IngredientForm::Canned => "canned",
            IngredientForm::Liquid => "liquid",
            IngredientForm::Powder => "powder",
        }
    }
}

impl std::fmt::Display for IngredientForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target amount in the caller's own unit (e.g. `500` + `"g"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub amount: f64,
    pub unit: String,
}

impl Quantity {
    /// Renders the quantity as a size string understood by [`crate::size::parse_size`].
    pub fn as_size_text(&self) -> String {
        format!("{}{}", self.amount, self.unit.trim())
    }
}

/// What must be bought.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientSpec {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<IngredientForm>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Quantity>,
}

impl IngredientSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            form: None,
            quantity: None,
        }
    }

    pub fn with_form(mut self, form: IngredientForm) -> Self {
        self.form = Some(form);
        self
    }

    pub fn with_quantity(mut self, amount: f64, unit: impl Into<String>) -> Self {
        self.quantity = Some(Quantity {
            amount,
            unit: unit.into(),
        });
        self
    }

    /// Single-line description used in judge prompts, e.g. `chicken breast (raw, 500g)`.
    pub fn describe(&self) -> String {
        let mut qualifiers = Vec::with_capacity(2);
        if let Some(form) = self.form {
            qualifiers.push(form.as_str().to_string());
        }
        if let Some(quantity) = &self.quantity {
            qualifiers.push(quantity.as_size_text());
        }

        if qualifiers.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, qualifiers.join(", "))
        }
    }
}

/// One store listing being evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProduct {
    pub product_id: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_text: Option<String>,

    #[serde(default)]
    pub category_path: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl CandidateProduct {
    pub fn new(product_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            title: title.into(),
            size_text: None,
            category_path: Vec::new(),
            brand: None,
            price: None,
        }
    }

    pub fn with_size_text(mut self, size_text: impl Into<String>) -> Self {
        self.size_text = Some(size_text.into());
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category_path = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Category path joined with `" > "`; empty when the listing has no categories.
    pub fn joined_categories(&self) -> String {
        self.category_path.join(" > ")
    }
}

/// Outcome for one (spec, candidate) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
    Unsure,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Pass => "pass",
            Verdict::Fail => "fail",
            Verdict::Unsure => "unsure",
        }
    }

    /// `true` for `pass` and `fail`.
    #[inline]
    pub fn is_decided(&self) -> bool {
        !matches!(self, Verdict::Unsure)
    }

    /// Lenient parse used on judge output; anything unrecognised is `None`.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pass" => Some(Verdict::Pass),
            "fail" => Some(Verdict::Fail),
            "unsure" => Some(Verdict::Unsure),
            _ => None,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-source confidences behind a [`ValidationOutput`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signals {
    pub rule_conf: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_conf: Option<f32>,
}

impl Signals {
    pub fn rule_only(rule_conf: f32) -> Self {
        Self {
            rule_conf,
            ai_conf: None,
        }
    }

    pub fn with_judge(rule_conf: f32, ai_conf: f32) -> Self {
        Self {
            rule_conf,
            ai_conf: Some(ai_conf),
        }
    }
}

/// Decision for one (spec, candidate) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutput {
    pub verdict: Verdict,
    pub confidence: f32,
    pub reason: String,
    pub signals: Signals,
}

impl ValidationOutput {
    /// A `pass`/`fail` outcome at or above the caching threshold.
    #[inline]
    pub fn is_decisive(&self) -> bool {
        self.verdict.is_decided() && self.confidence >= DECISIVE_CONFIDENCE
    }
}
