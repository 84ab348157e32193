//! Gemini-backed script parser.
//!
//! Sends the raw script together with the task's role hints to the Gemini
//! `generateContent` endpoint and post-processes the reply into transcript
//! rows. The model is asked for raw JSON, but replies wrapped in markdown
//! fences or using alternate key names are normalized rather than rejected.

use std::time::Duration;

use async_trait::async_trait;
use log::{info, warn};
use reqwest::Client;
use serde_json::{json, Value};

use crate::error::{Result, StudioError};
use crate::parser::ScriptParser;
use crate::tasks::TaskProfile;
use crate::transcript::{self, TranscriptRow};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Key names the model is known to use for the speaker column.
const ROLE_KEYS: &[&str] = &["role", "speaker", "name"];
/// Key names the model is known to use for the spoken-line column.
const TEXT_KEYS: &[&str] = &["text", "line", "dialogue", "content"];

pub struct GeminiParser {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiParser {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: API_BASE.to_string(),
        })
    }

    fn build_prompt(&self, raw_text: &str, task: &TaskProfile) -> String {
        let styles = task
            .voice_style_hints
            .iter()
            .map(|(role, style)| format!("{}: {}", role, style))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "You are a TOEFL Script Formatter.\n\
             Task Type: {name}\n\
             Description: {desc}\n\
             Expected Roles: {roles}\n\
             Voice Styles: {styles}\n\
             \n\
             Instructions:\n\
             1. Parse the input script into a JSON array of objects with \"role\" and \"text\" keys.\n\
             2. Map the speakers to the Expected Roles.\n\
                - \"M:\" -> \"Man\" or \"Student (M)\"\n\
                - \"W:\" -> \"Woman\" or \"Student (F)\"\n\
                - \"Narrator:\" lines ARE spoken text. Must be included.\n\
                - If there is unlabeled intro text, assign it to \"Narrator\".\n\
             3. Include ALL spoken lines, especially the introductory Narrator line.\n\
             4. Drop strictly non-spoken text (page numbers, '(listening)'), but keep the intro sentence.\n\
             5. Output raw JSON only, no markdown.\n\
             \n\
             Script:\n{script}",
            name = task.name,
            desc = task.description,
            roles = task.expected_roles.join(", "),
            styles = styles,
            script = raw_text,
        )
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let response = self
            .client
            .post(&url)
            .json(&json!({
                "contents": [{ "parts": [{ "text": prompt }] }]
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StudioError::ScriptParsing(format!(
                "Gemini API returned status {}: {}",
                status, body
            )));
        }

        let body: Value = response.json().await?;
        let text = body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                StudioError::ScriptParsing("Gemini reply carried no text part".to_string())
            })?;
        Ok(text.to_string())
    }
}

#[async_trait]
impl ScriptParser for GeminiParser {
    async fn parse(&self, raw_text: &str, task: &TaskProfile) -> Result<Vec<TranscriptRow>> {
        if raw_text.trim().is_empty() {
            return Err(StudioError::ScriptParsing("script text is empty".to_string()));
        }

        info!("Parsing script with {} ({} task)", self.model, task.name);
        let prompt = self.build_prompt(raw_text, task);
        let reply = self.generate(&prompt).await?;

        let mut rows = rows_from_reply(&reply)?;
        transcript::normalize_rows(&mut rows);
        info!("Parsed {} transcript rows", rows.len());
        Ok(rows)
    }
}

/// Turn a model reply into transcript rows.
///
/// Tolerates markdown code fences around the JSON and alternate key names
/// for the two columns; anything else is a parsing error.
pub fn rows_from_reply(reply: &str) -> Result<Vec<TranscriptRow>> {
    let payload = strip_code_fences(reply);
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| StudioError::ScriptParsing(format!("reply is not valid JSON: {}", e)))?;

    let items = value
        .as_array()
        .ok_or_else(|| StudioError::ScriptParsing("reply is not a JSON array".to_string()))?;

    let mut rows = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let object = item.as_object().ok_or_else(|| {
            StudioError::ScriptParsing(format!("entry {} is not an object", index))
        })?;

        let role = pick_key(object, ROLE_KEYS);
        let text = pick_key(object, TEXT_KEYS);
        match (role, text) {
            (Some(role), Some(text)) => rows.push(TranscriptRow::new(role, text)),
            _ => {
                warn!("entry {} has no recognizable role/text pair, skipping", index);
            }
        }
    }

    if rows.is_empty() {
        return Err(StudioError::ScriptParsing(
            "no usable rows in the model reply".to_string(),
        ));
    }
    Ok(rows)
}

fn pick_key(object: &serde_json::Map<String, Value>, candidates: &[&str]) -> Option<String> {
    for key in candidates {
        if let Some(value) = object.get(*key).and_then(Value::as_str) {
            return Some(value.to_string());
        }
    }
    None
}

fn strip_code_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string ("json") on the opening fence line.
    let inner = match inner.find('\n') {
        Some(pos) => &inner[pos + 1..],
        None => inner,
    };
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_json_reply() {
        let reply = r#"[
            {"role": "Narrator", "text": "Listen to a conversation."},
            {"role": "Man", "text": "Hi, how are you?"}
        ]"#;
        let rows = rows_from_reply(reply).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].role, "Narrator");
        assert_eq!(rows[1].text, "Hi, how are you?");
    }

    #[test]
    fn fenced_reply_is_unwrapped() {
        let reply = "```json\n[{\"role\": \"Narrator\", \"text\": \"Intro.\"}]\n```";
        let rows = rows_from_reply(reply).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text, "Intro.");
    }

    #[test]
    fn alternate_key_names_are_normalized() {
        let reply = r#"[{"speaker": "Professor", "line": "Today we discuss glaciers."}]"#;
        let rows = rows_from_reply(reply).unwrap();
        assert_eq!(rows[0].role, "Professor");
        assert_eq!(rows[0].text, "Today we discuss glaciers.");
    }

    #[test]
    fn entries_without_both_columns_are_skipped() {
        let reply = r#"[
            {"role": "Narrator", "text": "Intro."},
            {"note": "page 3"}
        ]"#;
        let rows = rows_from_reply(reply).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn garbage_reply_is_an_error() {
        assert!(rows_from_reply("Sure! Here are your rows:").is_err());
        assert!(rows_from_reply("{}").is_err());
        assert!(rows_from_reply("[]").is_err());
    }
}
