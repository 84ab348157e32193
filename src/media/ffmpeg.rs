//! ffmpeg/ffprobe discovery and invocation.

use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info, warn};
use regex::Regex;
use semver::Version;

use crate::error::{Result, StudioError};

/// Oldest ffmpeg the concat/lavfi invocations are known to work with.
const MIN_FFMPEG_VERSION: Version = Version::new(4, 0, 0);

/// Located media tools. Both binaries must be present; silence generation
/// and the final merge have no fallback.
#[derive(Debug, Clone)]
pub struct MediaTools {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl MediaTools {
    /// Locate ffmpeg and ffprobe on PATH.
    pub fn locate() -> Result<Self> {
        let ffmpeg = which::which("ffmpeg").map_err(|_| {
            StudioError::Configuration(
                "ffmpeg not found in PATH; install it to produce audio".to_string(),
            )
        })?;
        let ffprobe = which::which("ffprobe").map_err(|_| {
            StudioError::Configuration(
                "ffprobe not found in PATH; it ships with ffmpeg".to_string(),
            )
        })?;

        let tools = Self { ffmpeg, ffprobe };
        match tools.ffmpeg_version() {
            Ok(version) => {
                info!("Found ffmpeg {} at {}", version, tools.ffmpeg.display());
                if version < MIN_FFMPEG_VERSION {
                    warn!(
                        "ffmpeg {} is older than the supported {}; merges may fail",
                        version, MIN_FFMPEG_VERSION
                    );
                }
            }
            Err(e) => debug!("Could not determine ffmpeg version: {}", e),
        }
        Ok(tools)
    }

    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg
    }

    /// Parse `ffmpeg -version` output into a semantic version.
    pub fn ffmpeg_version(&self) -> Result<Version> {
        let output = Command::new(&self.ffmpeg).arg("-version").output()?;
        if !output.status.success() {
            return Err(StudioError::AudioProcessing(
                "failed to query ffmpeg version".to_string(),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let re = Regex::new(r"ffmpeg version (\d+\.\d+(?:\.\d+)?)")
            .map_err(|e| StudioError::Other(e.to_string()))?;
        let captured = re
            .captures(&stdout)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                StudioError::AudioProcessing("unrecognized ffmpeg version banner".to_string())
            })?;

        // Some builds report only MAJOR.MINOR.
        let normalized = match captured.matches('.').count() {
            1 => format!("{}.0", captured),
            _ => captured,
        };
        Version::parse(&normalized)
            .map_err(|e| StudioError::AudioProcessing(format!("bad ffmpeg version: {}", e)))
    }

    /// Run ffmpeg, surfacing its stderr verbatim on failure.
    pub fn run_ffmpeg(&self, args: &[&str]) -> Result<()> {
        debug!("Running ffmpeg {}", args.join(" "));
        let output = Command::new(&self.ffmpeg).args(args).output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StudioError::AudioProcessing(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }

    /// Run ffprobe and return its stdout.
    pub fn run_ffprobe(&self, args: &[&str]) -> Result<String> {
        debug!("Running ffprobe {}", args.join(" "));
        let output = Command::new(&self.ffprobe).args(args).output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StudioError::AudioProcessing(format!(
                "ffprobe exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
