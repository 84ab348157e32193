//! Script parsing capability.
//!
//! Converts a raw practice-test script into ordered transcript rows. The
//! extraction itself is delegated to an LLM behind the [`ScriptParser`]
//! trait; the pipeline only depends on the contract.

pub mod gemini;

pub use gemini::GeminiParser;

use async_trait::async_trait;

use crate::error::Result;
use crate::tasks::TaskProfile;
use crate::transcript::TranscriptRow;

/// Structured extraction: raw script text plus task role hints in, ordered
/// `{role, text}` rows out.
#[async_trait]
pub trait ScriptParser: Send + Sync {
    async fn parse(&self, raw_text: &str, task: &TaskProfile) -> Result<Vec<TranscriptRow>>;
}
