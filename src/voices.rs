//! Voice registry and role-to-voice resolution.
//!
//! Free-text speaker labels coming out of the script parser ("Professor
//! (Main)", "Student B", "Librarian") are mapped onto a small fixed registry
//! of voice profiles by ordered substring rules. Resolution is pure and
//! total: an unmatched label falls back to the Narrator voice rather than
//! failing, since every row must be synthesizable.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Synthesis parameters bound to one speaker category.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceProfile {
    /// Provider voice identity (opaque to the pipeline).
    pub voice_id: String,
    pub stability: f32,
    pub similarity: f32,
}

impl VoiceProfile {
    fn new(voice_id: &str, stability: f32, similarity: f32) -> Self {
        Self {
            voice_id: voice_id.to_string(),
            stability,
            similarity,
        }
    }
}

/// Canonical speaker categories the registry is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleCategory {
    Narrator,
    Professor,
    Interviewer,
    ServiceEmployee,
    StudentMale,
    StudentFemale,
}

impl RoleCategory {
    /// Student-like categories are eligible for the fast-task stability override.
    pub fn is_student(&self) -> bool {
        matches!(self, Self::StudentMale | Self::StudentFemale)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Narrator => "Narrator",
            Self::Professor => "Professor",
            Self::Interviewer => "Interviewer",
            Self::ServiceEmployee => "Service Employee",
            Self::StudentMale => "Student (M)",
            Self::StudentFemale => "Student (F)",
        }
    }
}

/// Ordered decision table: first keyword hit wins, later rules never
/// override earlier matches. Keywords are matched as lowercase substrings.
const ROLE_RULES: &[(&[&str], RoleCategory)] = &[
    (&["narrator"], RoleCategory::Narrator),
    (&["interview"], RoleCategory::Interviewer),
    (&["prof", "lecturer", "teacher"], RoleCategory::Professor),
    (&["man", "male", "driver"], RoleCategory::StudentMale),
    (&["woman", "female", "librarian"], RoleCategory::StudentFemale),
    // Generic "student" with no gender cue defaults to the female voice.
    (&["student"], RoleCategory::StudentFemale),
];

/// The built-in ElevenLabs voice set, built once.
static BUILTIN_PROFILES: Lazy<HashMap<RoleCategory, VoiceProfile>> = Lazy::new(|| {
    let mut profiles = HashMap::new();
    // Eric
    profiles.insert(
        RoleCategory::Narrator,
        VoiceProfile::new("cjVigY5qzO86Huf0OWal", 0.90, 0.75),
    );
    // Chris
    profiles.insert(
        RoleCategory::Professor,
        VoiceProfile::new("iP95p4xoKVk53GoZ742B", 0.80, 0.80),
    );
    // Sarah
    profiles.insert(
        RoleCategory::Interviewer,
        VoiceProfile::new("EXAVITQu4vr4xnSDxMaL", 0.75, 0.75),
    );
    // Sarah, steadier delivery
    profiles.insert(
        RoleCategory::ServiceEmployee,
        VoiceProfile::new("EXAVITQu4vr4xnSDxMaL", 0.80, 0.75),
    );
    // Roger
    profiles.insert(
        RoleCategory::StudentMale,
        VoiceProfile::new("CwhRBWXzGAHq8TQ4Fs17", 0.50, 0.75),
    );
    // Laura
    profiles.insert(
        RoleCategory::StudentFemale,
        VoiceProfile::new("FGY2WhTYpPnrIDTdsKH5", 0.45, 0.75),
    );
    profiles
});

/// Fixed registry of voice profiles, keyed by role category.
#[derive(Debug, Clone)]
pub struct VoiceRegistry {
    profiles: HashMap<RoleCategory, VoiceProfile>,
}

impl VoiceRegistry {
    /// Registry with the built-in voice set.
    pub fn builtin() -> Self {
        Self {
            profiles: BUILTIN_PROFILES.clone(),
        }
    }

    pub fn profile(&self, category: RoleCategory) -> &VoiceProfile {
        // Every category is populated by construction.
        &self.profiles[&category]
    }

    /// Resolve a free-text role label to a category and its voice profile.
    pub fn resolve(&self, role_label: &str) -> (RoleCategory, &VoiceProfile) {
        let category = categorize(role_label);
        (category, self.profile(category))
    }
}

impl Default for VoiceRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Walk the rule table top to bottom; fall back to Narrator.
fn categorize(role_label: &str) -> RoleCategory {
    let label = role_label.to_lowercase();
    for (keywords, category) in ROLE_RULES {
        if keywords.iter().any(|kw| label.contains(kw)) {
            return *category;
        }
    }
    RoleCategory::Narrator
}
