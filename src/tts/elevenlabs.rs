//! ElevenLabs text-to-speech client.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use log::{error, info};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::error::{Result, StudioError};
use crate::tts::{SpeechRequest, SpeechSynthesizer};

const API_BASE: &str = "https://api.elevenlabs.io/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the ElevenLabs API.
pub struct ElevenLabsClient {
    client: Client,
    api_key: String,
    model_id: String,
    base_url: String,
}

impl ElevenLabsClient {
    pub fn new(api_key: String, model_id: String) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key,
            model_id,
            base_url: API_BASE.to_string(),
        })
    }

    /// Cheap authenticated request to catch bad credentials before a
    /// production run burns through synthesis quota.
    pub async fn validate_api_key(&self) -> Result<()> {
        let response = self
            .client
            .get(format!("{}/user", self.base_url))
            .header("xi-api-key", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("ElevenLabs key validation failed (status {}): {}", status, body);
            return Err(StudioError::Configuration(format!(
                "invalid ElevenLabs API key (status {})",
                status
            )));
        }
        info!("ElevenLabs API key validated");
        Ok(())
    }

    /// List the voices available to the account.
    pub async fn list_voices(&self) -> Result<Vec<VoiceInfo>> {
        let response = self
            .client
            .get(format!("{}/voices", self.base_url))
            .header("xi-api-key", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StudioError::Other(format!(
                "voice listing failed (status {}): {}",
                status, body
            )));
        }

        let listing: VoicesResponse = response.json().await?;
        Ok(listing.voices)
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>> {
        let url = format!("{}/text-to-speech/{}", self.base_url, request.voice_id);
        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .json(&json!({
                "text": request.text,
                "model_id": self.model_id,
                "voice_settings": {
                    "stability": request.stability,
                    "similarity_boost": request.similarity,
                    "use_speaker_boost": true,
                },
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("ElevenLabs API error (status {}): {}", status, body);
            return Err(StudioError::SpeechGeneration(format!(
                "API returned status {}: {}",
                status, body
            )));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(StudioError::SpeechGeneration(
                "API returned an empty audio response".to_string(),
            ));
        }
        Ok(bytes.to_vec())
    }
}

/// One account voice, as reported by the voice listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceInfo {
    pub voice_id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl VoiceInfo {
    /// A label value ("accent", "gender", ...) or "N/A" when absent.
    pub fn label(&self, key: &str) -> &str {
        self.labels.get(key).map(String::as_str).unwrap_or("N/A")
    }
}

#[derive(Debug, Deserialize)]
struct VoicesResponse {
    voices: Vec<VoiceInfo>,
}
