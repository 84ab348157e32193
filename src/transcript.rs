//! Role-tagged transcript rows.
//!
//! Rows come out of the script parser, may be hand-edited by a reviewer, and
//! are immutable once production starts. Playback order is the row order.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StudioError};

/// One spoken line. The row's position in the transcript is its playback order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptRow {
    /// Free-text speaker label ("Narrator", "Student B", "Professor (Main)").
    pub role: String,
    /// The line to be spoken.
    pub text: String,
}

impl TranscriptRow {
    pub fn new(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            text: text.into(),
        }
    }
}

/// Collapse runs of whitespace (including newlines) into single spaces.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Normalize every row in place.
pub fn normalize_rows(rows: &mut [TranscriptRow]) {
    for row in rows.iter_mut() {
        row.role = normalize_text(&row.role);
        row.text = normalize_text(&row.text);
    }
}

/// Reject transcripts that cannot be produced.
///
/// A row with an empty role or empty text after normalization is a fatal
/// input error; it is reported before any synthesis call is made.
pub fn validate_rows(rows: &[TranscriptRow]) -> Result<()> {
    if rows.is_empty() {
        return Err(StudioError::TranscriptValidation(
            "transcript contains no rows".to_string(),
        ));
    }
    for (index, row) in rows.iter().enumerate() {
        if normalize_text(&row.role).is_empty() {
            return Err(StudioError::TranscriptValidation(format!(
                "row {} has an empty role",
                index
            )));
        }
        if normalize_text(&row.text).is_empty() {
            return Err(StudioError::TranscriptValidation(format!(
                "row {} ({}) has no text",
                index, row.role
            )));
        }
    }
    Ok(())
}

/// Load a transcript from a JSON file.
pub fn load_rows(path: &Path) -> Result<Vec<TranscriptRow>> {
    if !path.exists() {
        return Err(StudioError::FileNotFound(path.display().to_string()));
    }
    let data = std::fs::read_to_string(path)?;
    let mut rows: Vec<TranscriptRow> = serde_json::from_str(&data)?;
    normalize_rows(&mut rows);
    Ok(rows)
}

/// Save a transcript as pretty-printed JSON for human review.
pub fn save_rows(path: &Path, rows: &[TranscriptRow]) -> Result<()> {
    let data = serde_json::to_string_pretty(rows)?;
    std::fs::write(path, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize_text("  Hello,\n  world  "), "Hello, world");
        assert_eq!(normalize_text("\t\n "), "");
    }

    #[test]
    fn validation_rejects_empty_transcript() {
        assert!(validate_rows(&[]).is_err());
    }

    #[test]
    fn validation_reports_offending_row() {
        let rows = vec![
            TranscriptRow::new("Narrator", "Listen to a talk."),
            TranscriptRow::new("Professor", "   "),
        ];
        let err = validate_rows(&rows).unwrap_err();
        assert!(err.to_string().contains("row 1"), "got: {}", err);
    }

    #[test]
    fn validation_rejects_blank_role() {
        let rows = vec![TranscriptRow::new(" ", "Some line.")];
        let err = validate_rows(&rows).unwrap_err();
        assert!(err.to_string().contains("empty role"), "got: {}", err);
    }

    #[test]
    fn validation_accepts_good_rows() {
        let rows = vec![
            TranscriptRow::new("Narrator", "Listen to a conversation."),
            TranscriptRow::new("Man", "Hi, how are you?"),
        ];
        assert!(validate_rows(&rows).is_ok());
    }

    #[test]
    fn rows_round_trip_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.json");

        let rows = vec![
            TranscriptRow::new("Narrator", "Listen to a talk."),
            TranscriptRow::new("Student", "I have a question, actually."),
        ];
        save_rows(&path, &rows).unwrap();
        let loaded = load_rows(&path).unwrap();
        assert_eq!(loaded, rows);
    }

    #[test]
    fn load_missing_file_is_reported() {
        let err = load_rows(Path::new("/no/such/transcript.json")).unwrap_err();
        assert!(matches!(err, StudioError::FileNotFound(_)));
    }
}
