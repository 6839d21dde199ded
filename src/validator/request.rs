//! Wire shapes for the validate entrypoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ValidatorError;
use crate::model::{CandidateProduct, IngredientSpec, ValidationOutput};

/// `{ spec, candidates, model? }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidateRequest {
    pub spec: IngredientSpec,

    pub candidates: Vec<CandidateProduct>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// `{ results }`, one entry per candidate in request order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub results: Vec<ValidationOutput>,
}

impl ValidateRequest {
    /// Decodes and checks an untyped body, naming the first offending field.
    pub fn from_value(value: Value) -> Result<Self, ValidatorError> {
        let Value::Object(mut body) = value else {
            return Err(ValidatorError::invalid("request body must be a JSON object"));
        };

        let spec = match body.remove("spec") {
            Some(spec @ Value::Object(_)) => serde_json::from_value::<IngredientSpec>(spec)
                .map_err(|e| ValidatorError::invalid(format!("invalid spec: {e}")))?,
            Some(_) => return Err(ValidatorError::invalid("'spec' must be an object")),
            None => return Err(ValidatorError::invalid("missing 'spec'")),
        };

        let raw_candidates = match body.remove("candidates") {
            Some(Value::Array(items)) => items,
            Some(_) => return Err(ValidatorError::invalid("'candidates' must be an array")),
            None => return Err(ValidatorError::invalid("missing 'candidates'")),
        };

        let candidates = raw_candidates
            .into_iter()
            .enumerate()
            .map(|(i, raw)| {
                serde_json::from_value::<CandidateProduct>(raw)
                    .map_err(|e| ValidatorError::invalid(format!("invalid candidates[{i}]: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let model = match body.remove("model") {
            None | Some(Value::Null) => None,
            Some(Value::String(model)) => Some(model.trim().to_string()).filter(|m| !m.is_empty()),
            Some(_) => return Err(ValidatorError::invalid("'model' must be a string")),
        };

        let request = Self {
            spec,
            candidates,
            model,
        };
        request.validate()?;
        Ok(request)
    }

    /// Semantic checks serde cannot express.
    pub fn validate(&self) -> Result<(), ValidatorError> {
        if self.spec.name.trim().is_empty() {
            return Err(ValidatorError::invalid("spec.name must not be blank"));
        }

        if let Some(quantity) = &self.spec.quantity
            && !(quantity.amount.is_finite() && quantity.amount > 0.0)
        {
            return Err(ValidatorError::invalid(format!(
                "spec.quantity.amount must be a positive number, got {}",
                quantity.amount
            )));
        }

        for (i, candidate) in self.candidates.iter().enumerate() {
            if candidate.product_id.trim().is_empty() {
                return Err(ValidatorError::invalid(format!(
                    "candidates[{i}].productId must not be blank"
                )));
            }
        }

        Ok(())
    }
}
