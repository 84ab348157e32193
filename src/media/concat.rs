//! Track assembly: concatenation plan and lossless merge.
//!
//! The plan is a flat ordered list alternating speech clips and silence
//! gaps, always ending on a clip. Building the plan is pure (silence
//! durations only); realizing it synthesizes the silence files into a
//! throwaway directory and hands ffmpeg a concat list of absolute paths for
//! a stream-copy merge, so the original codec data is preserved exactly.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use log::info;

use crate::error::{Result, StudioError};
use crate::generate::GeneratedClip;
use crate::media::{probe, silence, MediaTools};
use crate::pause::pause_after;
use crate::tasks::MixLogic;

/// One entry of the concatenation plan.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanEntry {
    Clip { path: PathBuf },
    Silence { duration_seconds: f64 },
}

/// Build the concatenation plan for `clips` under the given pause rule.
///
/// For `N` clips the plan holds exactly `2N - 1` entries: a silence gap
/// after every clip except the last. `probe` is only consulted for the
/// listen-and-repeat rule, where the gap scales with the preceding clip;
/// a probe result of `0.0` is treated as a failed measurement.
pub fn build_plan<F>(clips: &[GeneratedClip], logic: MixLogic, mut probe: F) -> Vec<PlanEntry>
where
    F: FnMut(&Path) -> f64,
{
    let mut plan = Vec::with_capacity(clips.len() * 2);
    for (index, clip) in clips.iter().enumerate() {
        plan.push(PlanEntry::Clip {
            path: clip.path.clone(),
        });

        let is_last = index + 1 == clips.len();
        if is_last {
            continue;
        }

        let preceding = match logic {
            MixLogic::ListenRepeat => {
                let duration = probe(&clip.path);
                (duration > 0.0).then_some(duration)
            }
            _ => None,
        };
        plan.push(PlanEntry::Silence {
            duration_seconds: pause_after(logic, preceding),
        });
    }
    plan
}

/// Merge the clips and their silence gaps into one master file.
///
/// Silence clips live in a temporary directory for the duration of the
/// merge. The concat list uses absolute paths to avoid working-directory
/// ambiguity; the merge itself is a stream copy (`-c copy`). Merge failure
/// aborts with ffmpeg's diagnostics and no partial output is considered
/// valid.
pub fn assemble(
    tools: &MediaTools,
    clips: &[GeneratedClip],
    logic: MixLogic,
    output: &Path,
) -> Result<PathBuf> {
    if clips.is_empty() {
        return Err(StudioError::AudioProcessing(
            "no clips to assemble".to_string(),
        ));
    }
    for clip in clips {
        if !clip.path.exists() {
            return Err(StudioError::FileNotFound(clip.path.display().to_string()));
        }
    }

    let plan = build_plan(clips, logic, |path| probe::duration_seconds(tools, path));
    info!(
        "Assembling {} clips and {} silence gaps ({} rule)",
        clips.len(),
        plan.len() - clips.len(),
        logic.as_str()
    );

    let work_dir = tempfile::tempdir()?;
    let mut listing = String::new();
    let mut silence_index = 0usize;

    for entry in &plan {
        let path = match entry {
            PlanEntry::Clip { path } => path.clone(),
            PlanEntry::Silence { duration_seconds } => {
                let path = work_dir.path().join(format!("sil_{}.mp3", silence_index));
                silence_index += 1;
                silence::make_silence(tools, *duration_seconds, &path)?;
                path
            }
        };
        let absolute = std::fs::canonicalize(&path)?;
        writeln!(listing, "file '{}'", absolute.display())
            .map_err(|e| StudioError::Other(e.to_string()))?;
    }

    let concat_list = work_dir.path().join("concat_list.txt");
    std::fs::write(&concat_list, listing)?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let list_str = concat_list.to_string_lossy();
    let output_str = output.to_string_lossy();
    tools.run_ffmpeg(&[
        "-y",
        "-f",
        "concat",
        "-safe",
        "0",
        "-i",
        &list_str,
        "-c",
        "copy",
        &output_str,
    ])?;

    info!("Master track written to {}", output.display());
    Ok(output.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn clips(n: usize) -> Vec<GeneratedClip> {
        (0..n)
            .map(|i| GeneratedClip {
                source_row_index: i,
                role: "Narrator".to_string(),
                path: PathBuf::from(format!("/clips/{:03}_Narra.mp3", i)),
            })
            .collect()
    }

    fn silences(plan: &[PlanEntry]) -> Vec<f64> {
        plan.iter()
            .filter_map(|e| match e {
                PlanEntry::Silence { duration_seconds } => Some(*duration_seconds),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn plan_alternates_and_never_ends_on_silence() {
        let plan = build_plan(&clips(3), MixLogic::Standard, |_| panic!("probe not needed"));

        // N clips -> 2N - 1 entries.
        assert_eq!(plan.len(), 5);
        for (i, entry) in plan.iter().enumerate() {
            match entry {
                PlanEntry::Clip { .. } => assert_eq!(i % 2, 0, "clip at odd slot {}", i),
                PlanEntry::Silence { .. } => assert_eq!(i % 2, 1, "silence at even slot {}", i),
            }
        }
        assert!(matches!(plan.last(), Some(PlanEntry::Clip { .. })));
        assert_eq!(silences(&plan), vec![0.5, 0.5]);
    }

    #[test]
    fn single_clip_has_no_silence() {
        let plan = build_plan(&clips(1), MixLogic::Interview, |_| panic!("probe not needed"));
        assert_eq!(plan.len(), 1);
        assert!(matches!(plan[0], PlanEntry::Clip { .. }));
    }

    #[test]
    fn constant_rules_never_probe() {
        for logic in [MixLogic::Standard, MixLogic::Fast, MixLogic::Interview] {
            build_plan(&clips(4), logic, |_| panic!("{:?} must not probe", logic));
        }
    }

    #[test]
    fn fast_and_interview_gap_durations() {
        let plan = build_plan(&clips(2), MixLogic::Fast, |_| 0.0);
        assert_eq!(silences(&plan), vec![0.1]);

        let plan = build_plan(&clips(2), MixLogic::Interview, |_| 0.0);
        assert_eq!(silences(&plan), vec![5.0]);
    }

    #[test]
    fn listen_repeat_probes_every_gap() {
        let probed = Cell::new(0usize);
        let durations = [4.0, 1.0, 7.0];
        let plan = build_plan(&clips(3), MixLogic::ListenRepeat, |path| {
            let i = probed.get();
            probed.set(i + 1);
            // Probe order follows clip order.
            assert!(path.to_string_lossy().contains(&format!("{:03}", i)));
            durations[i]
        });

        // Final clip is never probed.
        assert_eq!(probed.get(), 2);
        // 4.0s clip -> 6.0s gap; 1.0s clip hits the 2.0s floor.
        assert_eq!(silences(&plan), vec![6.0, 2.0]);
    }

    #[test]
    fn failed_probe_degrades_to_floor() {
        let plan = build_plan(&clips(2), MixLogic::ListenRepeat, |_| 0.0);
        assert_eq!(silences(&plan), vec![2.0]);
    }

    #[test]
    fn planned_duration_matches_invariant() {
        // Total output duration = clip durations + inserted pauses.
        let durations = [3.0, 2.0, 5.0];
        let plan = build_plan(&clips(3), MixLogic::Standard, |_| 0.0);
        let pause_total: f64 = silences(&plan).iter().sum();
        let expected = durations.iter().sum::<f64>() + pause_total;
        assert!((expected - 11.0).abs() < f64::EPSILON);
    }
}
