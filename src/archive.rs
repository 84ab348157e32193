//! Clip archive: ZIP bundle of all generated clips.

use std::fs::File;
use std::io::{BufReader, Write as _};
use std::path::{Path, PathBuf};

use log::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Result, StudioError};
use crate::generate::GeneratedClip;

/// Package the clips into a ZIP at `archive_path`.
///
/// Each clip lands under its base file name, no directory nesting. This is
/// a convenience side output; callers treat failures here as non-fatal once
/// the master track exists.
pub fn bundle_clips(clips: &[GeneratedClip], archive_path: &Path) -> Result<PathBuf> {
    if clips.is_empty() {
        return Err(StudioError::Other("no clips to bundle".to_string()));
    }

    let file = File::create(archive_path)?;
    let mut writer = ZipWriter::new(file);

    for clip in clips {
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let name = clip
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StudioError::Other(format!("bad clip path {}", clip.path.display())))?;

        writer.start_file(name, options)?;
        let mut reader = BufReader::new(File::open(&clip.path)?);
        std::io::copy(&mut reader, &mut writer)?;
    }

    let mut file = writer.finish()?;
    file.flush()?;

    info!("Bundled {} clips into {}", clips.len(), archive_path.display());
    Ok(archive_path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(dir: &Path, name: &str, contents: &[u8]) -> GeneratedClip {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        GeneratedClip {
            source_row_index: 0,
            role: "Narrator".to_string(),
            path,
        }
    }

    #[test]
    fn archive_holds_clip_base_names() {
        let dir = tempfile::tempdir().unwrap();
        let clips = vec![
            clip(dir.path(), "000_Narra.mp3", b"aaaa"),
            clip(dir.path(), "001_Profe.mp3", b"bbbb"),
        ];
        let archive_path = dir.path().join("clips.zip");

        bundle_clips(&clips, &archive_path).unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);
        assert!(archive.by_name("000_Narra.mp3").is_ok());
        assert!(archive.by_name("001_Profe.mp3").is_ok());
    }

    #[test]
    fn empty_clip_list_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(bundle_clips(&[], &dir.path().join("clips.zip")).is_err());
    }
}
