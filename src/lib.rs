//! Multi-speaker practice-audio assembly for TOEFL listening/speaking items.
//!
//! The pipeline turns a role-tagged transcript into one master MP3: every
//! row is synthesized with its resolved voice, task-appropriate silence gaps
//! are generated between the clips, and everything is merged losslessly with
//! a stream-copy concatenation. Execution is strictly sequential; any fatal
//! error aborts the run without producing a partial track.

pub mod archive;
pub mod config;
pub mod error;
pub mod generate;
pub mod media;
pub mod parser;
pub mod pause;
pub mod tasks;
pub mod transcript;
pub mod tts;
pub mod voices;

use std::path::PathBuf;

use log::{info, warn};

use crate::config::StudioConfig;
use crate::error::Result;
use crate::generate::{ClipGenerator, GeneratedClip};
use crate::media::{concat, probe, tempo, MediaTools};
use crate::tasks::TaskProfile;
use crate::transcript::TranscriptRow;
use crate::tts::SpeechSynthesizer;

/// Name of the optional per-clip archive next to the master track.
pub const CLIP_ARCHIVE_FILENAME: &str = "toefl_clips.zip";

/// Result of one production run.
#[derive(Debug)]
pub struct ProduceOutcome {
    pub master_track: PathBuf,
    /// Present when clip bundling was requested and succeeded.
    pub archive: Option<PathBuf>,
    pub clips: Vec<GeneratedClip>,
}

/// The production pipeline, carrying one immutable configuration.
pub struct Studio {
    config: StudioConfig,
}

impl Studio {
    pub fn new(config: StudioConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    /// Produce the master track for a transcript under a task preset.
    ///
    /// Stages run strictly in order: validate, synthesize per-row clips,
    /// optionally re-render tempo, assemble with silence gaps, optionally
    /// bundle the clips. Archive failure is the only non-fatal stage; the
    /// master track is already on disk by then.
    pub async fn produce(
        &self,
        rows: &[TranscriptRow],
        task: &TaskProfile,
        synth: &dyn SpeechSynthesizer,
        tools: &MediaTools,
    ) -> Result<ProduceOutcome> {
        self.config.validate()?;
        transcript::validate_rows(rows)?;

        info!(
            "Producing {} rows under \"{}\" ({} pause rule)",
            rows.len(),
            task.name,
            task.mix_logic.as_str()
        );

        let generator = ClipGenerator::new(&self.config.voices, &self.config.raw_dir);
        let mut clips = generator.generate(rows, task, synth).await?;

        if let Some(factor) = self.config.tempo_factor {
            clips = self.retime_clips(&clips, factor, tools)?;
        }

        let master_track = concat::assemble(tools, &clips, task.mix_logic, &self.config.master_path())?;

        let duration = probe::duration_seconds(tools, &master_track);
        if duration > 0.0 {
            info!("Master track duration: {:.1}s", duration);
        }

        let archive = if self.config.bundle_clips {
            let archive_path = self.config.final_dir.join(CLIP_ARCHIVE_FILENAME);
            match archive::bundle_clips(&clips, &archive_path) {
                Ok(path) => Some(path),
                Err(e) => {
                    // The master track is already valid; report and move on.
                    warn!("Clip archive failed: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Ok(ProduceOutcome {
            master_track,
            archive,
            clips,
        })
    }

    /// Re-render every clip at the configured tempo factor.
    ///
    /// Always re-renders (the factor may differ between runs against the
    /// same cache directory), writing into a sibling directory of the raw
    /// clips.
    fn retime_clips(
        &self,
        clips: &[GeneratedClip],
        factor: f64,
        tools: &MediaTools,
    ) -> Result<Vec<GeneratedClip>> {
        let retimed_dir = PathBuf::from(format!("{}_retimed", self.config.raw_dir.display()));
        std::fs::create_dir_all(&retimed_dir)?;
        info!("Re-rendering {} clips at tempo {}", clips.len(), factor);

        let mut retimed = Vec::with_capacity(clips.len());
        for clip in clips {
            let file_name = clip.path.file_name().unwrap_or_default();
            let output = retimed_dir.join(file_name);
            tempo::adjust_tempo(tools, &clip.path, &output, factor)?;
            retimed.push(GeneratedClip {
                source_row_index: clip.source_row_index,
                role: clip.role.clone(),
                path: output,
            });
        }
        Ok(retimed)
    }
}
