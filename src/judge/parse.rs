//! Lenient decoding of the judge's JSON array.

use serde_json::Value;
use tracing::warn;

use super::error::JudgeError;
use crate::constants::JUDGE_DEFAULT_CONFIDENCE;
use crate::model::Verdict;

/// One judged item.
#[derive(Debug, Clone, PartialEq)]
pub struct JudgeVerdict {
    pub verdict: Verdict,
    pub confidence: f32,
    pub reason: String,
}

impl JudgeVerdict {
    /// Placeholder for an element the judge left out or garbled.
    pub fn undecided() -> Self {
        Self {
            verdict: Verdict::Unsure,
            confidence: JUDGE_DEFAULT_CONFIDENCE,
            reason: String::new(),
        }
    }

    fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::undecided();
        };

        let verdict = obj
            .get("verdict")
            .and_then(Value::as_str)
            .and_then(Verdict::parse_lenient)
            .unwrap_or(Verdict::Unsure);

        let confidence = obj
            .get("confidence")
            .and_then(|c| c.as_f64().or_else(|| c.as_str()?.trim().parse().ok()))
            .filter(|c| c.is_finite())
            .map(|c| c.clamp(0.0, 1.0) as f32)
            .unwrap_or(JUDGE_DEFAULT_CONFIDENCE);

        let reason = obj
            .get("reason")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Self {
            verdict,
            confidence,
            reason,
        }
    }
}

/// Decodes a judge response into exactly `expected` verdicts.
///
/// The text is parsed directly first; failing that, the first well-formed `[...]`
/// substring is used. Short arrays are padded with [`JudgeVerdict::undecided`],
/// long ones truncated.
pub fn parse_verdicts(text: &str, expected: usize) -> Result<Vec<JudgeVerdict>, JudgeError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(JudgeError::EmptyResponse);
    }

    let elements = match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Array(elements)) => elements,
        _ => extract_first_array(trimmed).ok_or_else(|| {
            JudgeError::InvalidResponse("no JSON array found in judge response".to_string())
        })?,
    };

    if elements.is_empty() {
        return Err(JudgeError::InvalidResponse(
            "judge returned an empty array".to_string(),
        ));
    }

    if elements.len() != expected {
        warn!(
            expected = expected,
            received = elements.len(),
            "judge array length mismatch"
        );
    }

    let mut verdicts: Vec<JudgeVerdict> = elements
        .iter()
        .take(expected)
        .map(JudgeVerdict::from_value)
        .collect();
    verdicts.resize_with(expected, JudgeVerdict::undecided);

    Ok(verdicts)
}

/// Finds the first bracket-balanced `[...]` substring that parses as a JSON array.
///
/// Brackets inside string literals are ignored while balancing.
pub fn extract_first_array(text: &str) -> Option<Vec<Value>> {
    let bytes = text.as_bytes();

    for (start, _) in text.match_indices('[') {
        let Some(end) = matching_bracket(bytes, start) else {
            continue;
        };
        if let Ok(elements) = serde_json::from_str::<Vec<Value>>(&text[start..=end]) {
            return Some(elements);
        }
    }

    None
}

fn matching_bracket(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }

    None
}
