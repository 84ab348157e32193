//! Studio configuration.
//!
//! All runtime settings travel in one immutable value that is explicitly
//! passed into the pipeline, so independent production runs can use
//! different configurations without cross-contamination.

use std::path::PathBuf;

use crate::error::{Result, StudioError};
use crate::voices::VoiceRegistry;

/// Default name of the assembled master track.
pub const MASTER_FILENAME: &str = "toefl_master_track.mp3";

/// TTS model used for all speech requests.
pub const DEFAULT_TTS_MODEL: &str = "eleven_multilingual_v2";

/// Placeholder the .env template ships with; treated the same as a missing key.
const PLACEHOLDER_KEY_MARKER: &str = "your_";

/// Configuration for one production run.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Directory for per-row speech clips (the synthesis cache).
    pub raw_dir: PathBuf,
    /// Directory for the master track and the clip archive.
    pub final_dir: PathBuf,
    /// File name of the assembled master track inside `final_dir`.
    pub master_filename: String,
    /// TTS model identifier passed to the synthesis service.
    pub tts_model: String,
    /// Optional tempo re-render factor applied to every clip before assembly
    /// (ffmpeg's atempo filter, valid range 0.5..=2.0).
    pub tempo_factor: Option<f64>,
    /// Package all generated clips into a ZIP next to the master track.
    pub bundle_clips: bool,
    /// Voice profiles used by role resolution.
    pub voices: VoiceRegistry,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("output_toefl_raw"),
            final_dir: PathBuf::from("output_toefl_final"),
            master_filename: MASTER_FILENAME.to_string(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            tempo_factor: None,
            bundle_clips: false,
            voices: VoiceRegistry::builtin(),
        }
    }
}

impl StudioConfig {
    /// Full path of the master track.
    pub fn master_path(&self) -> PathBuf {
        self.final_dir.join(&self.master_filename)
    }

    /// Reject tempo factors outside ffmpeg's atempo range before any work runs.
    pub fn validate(&self) -> Result<()> {
        if let Some(factor) = self.tempo_factor {
            if !(0.5..=2.0).contains(&factor) {
                return Err(StudioError::Configuration(format!(
                    "tempo factor {} is outside the supported 0.5..=2.0 range",
                    factor
                )));
            }
        }
        Ok(())
    }
}

/// Read a required API key from the environment.
///
/// Empty values and un-replaced `.env` template placeholders both count as
/// missing; credentials problems are reported before any work begins.
pub fn api_key_from_env(var: &str) -> Result<String> {
    let value = std::env::var(var)
        .map_err(|_| StudioError::Configuration(format!("{} is not set", var)))?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(StudioError::Configuration(format!("{} is empty", var)));
    }
    if value.starts_with(PLACEHOLDER_KEY_MARKER) {
        return Err(StudioError::Configuration(format!(
            "{} still holds the template placeholder; paste your real key",
            var
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths() {
        let config = StudioConfig::default();
        assert_eq!(
            config.master_path(),
            PathBuf::from("output_toefl_final").join(MASTER_FILENAME)
        );
    }

    #[test]
    fn tempo_factor_range_is_enforced() {
        let mut config = StudioConfig::default();
        assert!(config.validate().is_ok());

        config.tempo_factor = Some(0.9);
        assert!(config.validate().is_ok());

        config.tempo_factor = Some(0.3);
        assert!(config.validate().is_err());

        config.tempo_factor = Some(2.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn placeholder_api_key_is_rejected() {
        // Env vars are process-global; use a name unique to this test.
        std::env::set_var("TOEFL_STUDIO_TEST_KEY", "your_elevenlabs_api_key_here");
        assert!(api_key_from_env("TOEFL_STUDIO_TEST_KEY").is_err());

        std::env::set_var("TOEFL_STUDIO_TEST_KEY", "  ");
        assert!(api_key_from_env("TOEFL_STUDIO_TEST_KEY").is_err());

        std::env::set_var("TOEFL_STUDIO_TEST_KEY", "sk-real-key");
        assert_eq!(api_key_from_env("TOEFL_STUDIO_TEST_KEY").unwrap(), "sk-real-key");
        std::env::remove_var("TOEFL_STUDIO_TEST_KEY");
    }

    #[test]
    fn missing_api_key_is_reported() {
        std::env::remove_var("TOEFL_STUDIO_MISSING_KEY");
        let err = api_key_from_env("TOEFL_STUDIO_MISSING_KEY").unwrap_err();
        assert!(err.to_string().contains("not set"));
    }
}
