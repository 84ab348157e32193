//! TOEFL task presets.
//!
//! Each preset describes one listening/speaking exercise type: the speakers
//! the script is expected to contain, how lines are voiced, and which pause
//! rule governs the gaps between clips. The table is read-only; a production
//! run selects one preset and carries it by reference through the pipeline.

use serde::{Deserialize, Serialize};

/// Test section a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Section {
    Listening,
    Speaking,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Listening => "Listening",
            Self::Speaking => "Speaking",
        }
    }
}

/// Pause rule selecting the silence duration between clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixLogic {
    /// Constant 0.5s gap.
    Standard,
    /// Constant 0.1s gap for fast peer-to-peer pacing.
    Fast,
    /// Gap scaled to the preceding clip so the student can repeat it.
    ListenRepeat,
    /// Constant 5s response window after each question.
    Interview,
}

impl MixLogic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Fast => "fast",
            Self::ListenRepeat => "listen_repeat",
            Self::Interview => "interview",
        }
    }
}

/// One exercise-type preset.
#[derive(Debug, Clone)]
pub struct TaskProfile {
    pub name: &'static str,
    pub slug: &'static str,
    pub section: Section,
    pub description: &'static str,
    pub expected_roles: &'static [&'static str],
    pub pause_rule: &'static str,
    pub mix_logic: MixLogic,
    /// role category -> delivery style, shown to the user and fed to the parser prompt.
    pub voice_style_hints: &'static [(&'static str, &'static str)],
}

/// The full preset table.
pub static TASKS: &[TaskProfile] = &[
    TaskProfile {
        name: "Academic Lecture",
        slug: "academic-lecture",
        section: Section::Listening,
        description: "Professors delivering an academic talk, possibly with student interaction.",
        expected_roles: &["Narrator (Intro)", "Professor (Main)", "Student (Optional)"],
        pause_rule: "Standard (0.5s)",
        mix_logic: MixLogic::Standard,
        voice_style_hints: &[("Professor", "Stable/Authoritative"), ("Student", "Neutral")],
    },
    TaskProfile {
        name: "Campus Conversation",
        slug: "campus-conversation",
        section: Section::Listening,
        description: "A student speaking with a university employee (Librarian, Registrar, etc.).",
        expected_roles: &["Narrator", "Student", "Service Employee"],
        pause_rule: "Standard (0.5s)",
        mix_logic: MixLogic::Standard,
        voice_style_hints: &[("Student", "Casual"), ("Employee", "Professional")],
    },
    TaskProfile {
        name: "Peer-to-Peer",
        slug: "peer-to-peer",
        section: Section::Listening,
        description: "Two students discussing a project/issue. Needs fast pacing and natural tone.",
        expected_roles: &["Narrator", "Student A", "Student B"],
        pause_rule: "Fast (0.1s)",
        mix_logic: MixLogic::Fast,
        voice_style_hints: &[("Student A", "Unstable/Natural"), ("Student B", "Unstable/Natural")],
    },
    TaskProfile {
        name: "Listen & Repeat",
        slug: "listen-repeat",
        section: Section::Speaking,
        description: "Short sentences for the student to repeat. Needs silence gaps after each line.",
        expected_roles: &["Narrator"],
        pause_rule: "Dynamic (1.5x clip length, 2s floor)",
        mix_logic: MixLogic::ListenRepeat,
        voice_style_hints: &[("Narrator", "High Clarity")],
    },
    TaskProfile {
        name: "Virtual Interview",
        slug: "virtual-interview",
        section: Section::Speaking,
        description: "An interviewer asking sequential questions with a response window after each.",
        expected_roles: &["Interviewer"],
        pause_rule: "Fixed response window (5s)",
        mix_logic: MixLogic::Interview,
        voice_style_hints: &[("Interviewer", "Encouraging")],
    },
    TaskProfile {
        name: "Integrated Task (Campus)",
        slug: "integrated-campus",
        section: Section::Speaking,
        description: "Two students discussing a reading passage/notice.",
        expected_roles: &["Narrator", "Man", "Woman"],
        pause_rule: "Standard (0.5s)",
        mix_logic: MixLogic::Standard,
        voice_style_hints: &[("Man", "Casual"), ("Woman", "Casual")],
    },
    TaskProfile {
        name: "Integrated Task (Academic)",
        slug: "integrated-academic",
        section: Section::Speaking,
        description: "A professor lecturing on a topic.",
        expected_roles: &["Narrator", "Professor"],
        pause_rule: "Standard (0.5s)",
        mix_logic: MixLogic::Standard,
        voice_style_hints: &[("Professor", "Stable")],
    },
];

/// Look up a preset by its CLI slug.
pub fn find_task(slug: &str) -> Option<&'static TaskProfile> {
    TASKS.iter().find(|t| t.slug == slug)
}
