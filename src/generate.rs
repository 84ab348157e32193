//! Clip generation: one speech file per transcript row.
//!
//! Rows are synthesized strictly in order (row order is playback order).
//! Per-row files are named deterministically from the row index and role, so
//! an interrupted run can be re-invoked and only the missing clips are
//! synthesized again. Any synthesis failure aborts the whole run; a partial
//! multi-speaker track is unusable for test practice.

use std::path::{Path, PathBuf};

use log::info;

use crate::error::{Result, StudioError};
use crate::tasks::{MixLogic, TaskProfile};
use crate::transcript::{self, TranscriptRow};
use crate::tts::{SpeechRequest, SpeechSynthesizer};
use crate::voices::VoiceRegistry;

/// Stability forced onto student voices in fast-paced peer-to-peer tasks,
/// for a less monotone delivery.
pub const FAST_STUDENT_STABILITY: f32 = 0.45;

/// One synthesized clip on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedClip {
    pub source_row_index: usize,
    pub role: String,
    pub path: PathBuf,
}

/// Deterministic per-row cache file name: zero-padded row index plus the
/// first five alphanumeric characters of the role label.
pub fn clip_filename(index: usize, role: &str) -> String {
    let prefix: String = role
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(5)
        .collect();
    format!("{:03}_{}.mp3", index, prefix)
}

/// Generates per-row speech clips into an output directory.
pub struct ClipGenerator<'a> {
    registry: &'a VoiceRegistry,
    output_dir: PathBuf,
}

impl<'a> ClipGenerator<'a> {
    pub fn new(registry: &'a VoiceRegistry, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            output_dir: output_dir.into(),
        }
    }

    /// Synthesize every row, in row order, returning the ordered clip list.
    ///
    /// Rows already present on disk (from a previous run against the same
    /// directory) are skipped without a synthesis call. The first synthesis
    /// failure aborts with the offending row in the error; clips written so
    /// far stay on disk for reuse on re-run.
    pub async fn generate(
        &self,
        rows: &[TranscriptRow],
        task: &TaskProfile,
        synth: &dyn SpeechSynthesizer,
    ) -> Result<Vec<GeneratedClip>> {
        transcript::validate_rows(rows)?;
        std::fs::create_dir_all(&self.output_dir)?;

        let mut clips = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let path = self.output_dir.join(clip_filename(index, &row.role));

            if path.exists() {
                info!("Row {} ({}) already generated, skipping", index, row.role);
                clips.push(GeneratedClip {
                    source_row_index: index,
                    role: row.role.clone(),
                    path,
                });
                continue;
            }

            let request = self.request_for_row(row, task);
            info!(
                "Generating row {}/{} ({}) with voice {}",
                index + 1,
                rows.len(),
                row.role,
                request.voice_id
            );

            let audio = synth.synthesize(&request).await.map_err(|e| {
                StudioError::SpeechGeneration(format!("row {} ({}): {}", index, row.role, e))
            })?;
            std::fs::write(&path, &audio)?;

            clips.push(GeneratedClip {
                source_row_index: index,
                role: row.role.clone(),
                path,
            });
        }
        Ok(clips)
    }

    /// Resolve the row's voice and apply the fast-task student override.
    ///
    /// The override lives here rather than in the resolver so resolution
    /// stays pure; it only fires when the *resolved category* is a student,
    /// never for professors or narrators in the same task.
    fn request_for_row(&self, row: &TranscriptRow, task: &TaskProfile) -> SpeechRequest {
        let (category, profile) = self.registry.resolve(&row.role);

        let stability = if task.mix_logic == MixLogic::Fast && category.is_student() {
            FAST_STUDENT_STABILITY
        } else {
            profile.stability
        };

        SpeechRequest {
            text: row.text.clone(),
            voice_id: profile.voice_id.clone(),
            stability,
            similarity: profile.similarity,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Records every request; optionally fails on the Nth call (1-based).
    struct MockSynth {
        calls: Mutex<Vec<SpeechRequest>>,
        fail_on_call: Option<usize>,
        counter: AtomicUsize,
    }

    impl MockSynth {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on_call: None,
                counter: AtomicUsize::new(0),
            }
        }

        fn failing_on(call: usize) -> Self {
            Self {
                fail_on_call: Some(call),
                ..Self::new()
            }
        }

        fn call_count(&self) -> usize {
            self.counter.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SpeechSynthesizer for MockSynth {
        async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>> {
            let call = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
            self.calls.lock().unwrap().push(request.clone());
            if self.fail_on_call == Some(call) {
                return Err(StudioError::SpeechGeneration("simulated outage".to_string()));
            }
            Ok(vec![0xffu8; 64])
        }
    }

    fn sample_rows() -> Vec<TranscriptRow> {
        vec![
            TranscriptRow::new("Narrator", "Listen to a talk."),
            TranscriptRow::new("Professor", "Today we discuss glaciers."),
            TranscriptRow::new("Student", "I have a question."),
        ]
    }

    #[test]
    fn filenames_are_deterministic() {
        assert_eq!(clip_filename(0, "Narrator"), "000_Narra.mp3");
        assert_eq!(clip_filename(3, "Student (M)"), "003_Stude.mp3");
        assert_eq!(clip_filename(12, "Man"), "012_Man.mp3");
    }

    #[tokio::test]
    async fn generates_clips_in_row_order() {
        let dir = tempfile::tempdir().unwrap();
        let registry = VoiceRegistry::builtin();
        let generator = ClipGenerator::new(&registry, dir.path());
        let synth = MockSynth::new();
        let task = tasks::find_task("academic-lecture").unwrap();

        let clips = generator.generate(&sample_rows(), task, &synth).await.unwrap();

        assert_eq!(clips.len(), 3);
        assert_eq!(synth.call_count(), 3);
        for (index, clip) in clips.iter().enumerate() {
            assert_eq!(clip.source_row_index, index);
            assert!(clip.path.exists(), "missing {}", clip.path.display());
        }

        let calls = synth.calls.lock().unwrap();
        assert_eq!(calls[0].text, "Listen to a talk.");
        assert_eq!(calls[2].text, "I have a question.");
    }

    #[tokio::test]
    async fn rerun_makes_no_new_synthesis_calls() {
        let dir = tempfile::tempdir().unwrap();
        let registry = VoiceRegistry::builtin();
        let generator = ClipGenerator::new(&registry, dir.path());
        let synth = MockSynth::new();
        let task = tasks::find_task("academic-lecture").unwrap();
        let rows = sample_rows();

        let first = generator.generate(&rows, task, &synth).await.unwrap();
        assert_eq!(synth.call_count(), 3);

        let second = generator.generate(&rows, task, &synth).await.unwrap();
        assert_eq!(synth.call_count(), 3, "cached rows must not be re-synthesized");
        let first_paths: Vec<_> = first.iter().map(|c| c.path.clone()).collect();
        let second_paths: Vec<_> = second.iter().map(|c| c.path.clone()).collect();
        assert_eq!(first_paths, second_paths);
    }

    #[tokio::test]
    async fn synthesis_failure_aborts_and_names_the_row() {
        let dir = tempfile::tempdir().unwrap();
        let registry = VoiceRegistry::builtin();
        let generator = ClipGenerator::new(&registry, dir.path());
        let synth = MockSynth::failing_on(2);
        let task = tasks::find_task("academic-lecture").unwrap();

        let err = generator.generate(&sample_rows(), task, &synth).await.unwrap_err();
        assert!(err.to_string().contains("row 1 (Professor)"), "got: {}", err);

        // The failed run stops immediately: no call for row 2.
        assert_eq!(synth.call_count(), 2);
        // Row 0's clip stays cached for the next run.
        assert!(dir.path().join(clip_filename(0, "Narrator")).exists());
        assert!(!dir.path().join(clip_filename(2, "Student")).exists());
    }

    #[tokio::test]
    async fn invalid_rows_are_rejected_before_synthesis() {
        let dir = tempfile::tempdir().unwrap();
        let registry = VoiceRegistry::builtin();
        let generator = ClipGenerator::new(&registry, dir.path());
        let synth = MockSynth::new();
        let task = tasks::find_task("academic-lecture").unwrap();

        let rows = vec![TranscriptRow::new("Narrator", "")];
        assert!(generator.generate(&rows, task, &synth).await.is_err());
        assert_eq!(synth.call_count(), 0);
    }

    #[tokio::test]
    async fn fast_task_overrides_student_stability_only() {
        let dir = tempfile::tempdir().unwrap();
        let registry = VoiceRegistry::builtin();
        let generator = ClipGenerator::new(&registry, dir.path());
        let synth = MockSynth::new();
        let task = tasks::find_task("peer-to-peer").unwrap();

        let rows = vec![
            TranscriptRow::new("Professor", "Settle down, everyone."),
            TranscriptRow::new("Student A", "Did you start the project?"),
        ];
        generator.generate(&rows, task, &synth).await.unwrap();

        let calls = synth.calls.lock().unwrap();
        // Professor keeps the registry stability even under the fast tag.
        assert_eq!(calls[0].stability, 0.80);
        assert_eq!(calls[1].stability, FAST_STUDENT_STABILITY);
    }

    #[tokio::test]
    async fn standard_task_keeps_registry_stability() {
        let dir = tempfile::tempdir().unwrap();
        let registry = VoiceRegistry::builtin();
        let generator = ClipGenerator::new(&registry, dir.path());
        let synth = MockSynth::new();
        let task = tasks::find_task("campus-conversation").unwrap();

        let rows = vec![TranscriptRow::new("Student", "Where is the library?")];
        generator.generate(&rows, task, &synth).await.unwrap();

        let calls = synth.calls.lock().unwrap();
        // Student (F) registry stability, untouched outside fast tasks.
        assert_eq!(calls[0].stability, 0.45);
    }
}
