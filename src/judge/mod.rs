//! Batched AI judgement of (ingredient, candidate) pairs.
//!
//! One outbound call per batch: the items are serialized into a single prompt and
//! the model is expected to answer with a JSON array of the same length.

pub mod backend;
pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod parse;
pub mod prompt;
pub mod retry;

#[cfg(test)]
mod tests;

pub use backend::{ConfiguredBackend, GenaiBackend, JudgeBackend, OpenAiCompatBackend};
pub use client::BatchJudgeClient;
pub use error::JudgeError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockJudgeBackend, RecordedCall};
pub use parse::{JudgeVerdict, extract_first_array, parse_verdicts};
pub use prompt::{JudgeItem, SYSTEM_INSTRUCTION, render_items};
pub use retry::RetryConfig;
