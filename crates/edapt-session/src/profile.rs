//! Student profile types and the durable profile store.
//!
//! The profile is a single flat record describing a student's
//! accessibility needs and preferences. It is written wholesale on every
//! save and read back with defaults when no record exists, so loading
//! never fails. The on-disk format uses snake_case field names and
//! string-valued enums so records written by earlier versions of the
//! assistant remain readable.

use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, SessionError};

/// Accessibility-need categories that drive content adaptation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disability {
    /// Reading difficulty; content gets short sentences and bolded key terms.
    Dyslexia,
    /// Attention difficulty; content gets chunking and break reminders.
    Adhd,
    /// Content gets literal language and predictable structure.
    Autism,
    /// Content gets audio-friendly framing without visual dependencies.
    VisualImpairment,
    /// Content gets visual cues and text alternatives.
    HearingImpairment,
    /// Interactions are kept simple; no content template of its own.
    MotorDifficulties,
}

impl Disability {
    /// All recognized disability tags, in UI display order.
    pub const ALL: [Self; 6] = [
        Self::Dyslexia,
        Self::Adhd,
        Self::Autism,
        Self::VisualImpairment,
        Self::HearingImpairment,
        Self::MotorDifficulties,
    ];

    /// Parses a string into a `Disability`, case-insensitively.
    ///
    /// Accepts spaces or hyphens in place of underscores so records written
    /// with display names ("Visual Impairment") still parse.
    fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "dyslexia" => Some(Self::Dyslexia),
            "adhd" => Some(Self::Adhd),
            "autism" => Some(Self::Autism),
            "visual_impairment" => Some(Self::VisualImpairment),
            "hearing_impairment" => Some(Self::HearingImpairment),
            "motor_difficulties" => Some(Self::MotorDifficulties),
            _ => None,
        }
    }

    /// Returns the human-readable display name used in prompts and the UI.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Dyslexia => "Dyslexia",
            Self::Adhd => "ADHD",
            Self::Autism => "Autism",
            Self::VisualImpairment => "Visual Impairment",
            Self::HearingImpairment => "Hearing Impairment",
            Self::MotorDifficulties => "Motor Difficulties",
        }
    }

    /// Returns the snake_case wire name.
    const fn wire_name(&self) -> &'static str {
        match self {
            Self::Dyslexia => "dyslexia",
            Self::Adhd => "adhd",
            Self::Autism => "autism",
            Self::VisualImpairment => "visual_impairment",
            Self::HearingImpairment => "hearing_impairment",
            Self::MotorDifficulties => "motor_difficulties",
        }
    }
}

impl std::fmt::Display for Disability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for Disability {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_str_case_insensitive(s)
            .ok_or_else(|| format!("unrecognized disability tag '{s}'"))
    }
}

impl<'de> Deserialize<'de> for Disability {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str_case_insensitive(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid disability tag '{s}': expected one of 'dyslexia', 'adhd', 'autism', 'visual_impairment', 'hearing_impairment', 'motor_difficulties'"
            ))
        })
    }
}

impl Serialize for Disability {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.wire_name())
    }
}

/// How quickly the student reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadingSpeed {
    /// Very slow reading pace.
    VerySlow,
    /// Slow reading pace (default).
    #[default]
    Slow,
    /// Medium reading pace.
    Medium,
    /// Fast reading pace.
    Fast,
}

impl ReadingSpeed {
    /// Parses a string into a `ReadingSpeed`, case-insensitively.
    fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "very_slow" => Some(Self::VerySlow),
            "slow" => Some(Self::Slow),
            "medium" => Some(Self::Medium),
            "fast" => Some(Self::Fast),
            _ => None,
        }
    }
}

impl std::str::FromStr for ReadingSpeed {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_str_case_insensitive(s)
            .ok_or_else(|| format!("unrecognized reading speed '{s}'"))
    }
}

impl<'de> Deserialize<'de> for ReadingSpeed {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str_case_insensitive(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid reading speed '{s}': expected one of 'very_slow', 'slow', 'medium', 'fast'"
            ))
        })
    }
}

impl Serialize for ReadingSpeed {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let s = match self {
            Self::VerySlow => "very_slow",
            Self::Slow => "slow",
            Self::Medium => "medium",
            Self::Fast => "fast",
        };
        serializer.serialize_str(s)
    }
}

/// Visual rendering preference. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VisualPreference {
    /// Standard rendering (default).
    #[default]
    Normal,
    /// High-contrast rendering.
    HighContrast,
    /// Dark background rendering.
    DarkMode,
    /// Dyslexia-friendly font and spacing.
    DyslexiaFriendly,
}

impl VisualPreference {
    /// Parses a string into a `VisualPreference`, case-insensitively.
    fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "normal" => Some(Self::Normal),
            "high_contrast" => Some(Self::HighContrast),
            "dark_mode" => Some(Self::DarkMode),
            "dyslexia_friendly" => Some(Self::DyslexiaFriendly),
            _ => None,
        }
    }
}

impl std::str::FromStr for VisualPreference {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_str_case_insensitive(s)
            .ok_or_else(|| format!("unrecognized visual preference '{s}'"))
    }
}

impl<'de> Deserialize<'de> for VisualPreference {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str_case_insensitive(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid visual preference '{s}': expected one of 'normal', 'high_contrast', 'dark_mode', 'dyslexia_friendly'"
            ))
        })
    }
}

impl Serialize for VisualPreference {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let s = match self {
            Self::Normal => "normal",
            Self::HighContrast => "high_contrast",
            Self::DarkMode => "dark_mode",
            Self::DyslexiaFriendly => "dyslexia_friendly",
        };
        serializer.serialize_str(s)
    }
}

/// Default attention span in minutes.
const fn default_attention_span() -> u32 {
    10
}

/// Default audio preference.
const fn default_true() -> bool {
    true
}

/// Default learning style label.
fn default_learning_style() -> String {
    "visual".to_string()
}

/// A student's accessibility preferences.
///
/// Created with defaults on first run and replaced wholesale on each
/// save. There is exactly one profile per deployment (single student).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    /// Active disability tags, in the order the student selected them.
    #[serde(default)]
    pub disabilities: Vec<Disability>,

    /// Reading pace used to tune pacing hints.
    #[serde(default)]
    pub reading_speed: ReadingSpeed,

    /// Whether content should be read aloud when possible.
    #[serde(default = "default_true")]
    pub audio_preference: bool,

    /// Active visual rendering mode.
    #[serde(default)]
    pub visual_preference: VisualPreference,

    /// Attention span in minutes before a break is suggested.
    #[serde(default = "default_attention_span")]
    pub attention_span: u32,

    /// Free-form learning style label (e.g. "visual").
    #[serde(default = "default_learning_style")]
    pub learning_style: String,
}

impl Default for StudentProfile {
    fn default() -> Self {
        Self {
            disabilities: Vec::new(),
            reading_speed: ReadingSpeed::Slow,
            audio_preference: true,
            visual_preference: VisualPreference::Normal,
            attention_span: default_attention_span(),
            learning_style: default_learning_style(),
        }
    }
}

impl StudentProfile {
    /// Removes duplicate disability tags, keeping first occurrences in order.
    pub fn normalize(&mut self) {
        let mut seen = Vec::with_capacity(self.disabilities.len());
        self.disabilities.retain(|d| {
            if seen.contains(d) {
                false
            } else {
                seen.push(*d);
                true
            }
        });
    }

    /// Returns the primary disability: the first tag the student selected.
    ///
    /// Text adaptation uses the primary tag's template; students with
    /// multiple tags get the template of whichever they listed first.
    #[must_use]
    pub fn primary_disability(&self) -> Option<Disability> {
        self.disabilities.first().copied()
    }

    /// Checks whether the given tag is active on this profile.
    #[must_use]
    pub fn has(&self, disability: Disability) -> bool {
        self.disabilities.contains(&disability)
    }
}

/// Fixed list of break activities suggested by the attention monitor.
pub const BREAK_ACTIVITIES: [&str; 8] = [
    "🤸 Do 10 jumping jacks",
    "🎨 Draw your favorite animal",
    "🎵 Listen to calming music for 3 minutes",
    "🧘 Deep breathing: in for 4, hold for 4, out for 4",
    "🚶 Walk around the room 3 times",
    "🤹 Juggle with imaginary balls",
    "🌟 Do 5 star jumps",
    "🦆 Walk like a duck for 30 seconds",
];

/// Result of an attention-span check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakCheck {
    /// Whether the student has exceeded their attention span.
    pub need_break: bool,
    /// Break suggestion text, present when a break is due.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// A concrete break activity, present when a break is due.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
}

/// Checks whether the student should take a break.
///
/// A break is due once the elapsed session time exceeds the profile's
/// attention span. The suggested activity is picked at random from a
/// fixed list.
#[must_use]
pub fn attention_check(profile: &StudentProfile, elapsed_secs: u64) -> BreakCheck {
    if elapsed_secs > u64::from(profile.attention_span) * 60 {
        BreakCheck {
            need_break: true,
            suggestion: Some(
                "Time for a 5-minute movement break! Stand up and stretch.".to_string(),
            ),
            activity: Some(break_activity()),
        }
    } else {
        BreakCheck {
            need_break: false,
            suggestion: None,
            activity: None,
        }
    }
}

/// Picks a break activity at random from the fixed list.
#[must_use]
pub fn break_activity() -> String {
    let mut rng = rand::thread_rng();
    BREAK_ACTIVITIES
        .choose(&mut rng)
        .copied()
        .unwrap_or(BREAK_ACTIVITIES[0])
        .to_string()
}

/// Durable store for the single student profile record.
///
/// Saves are atomic from a reader's perspective: the record is written
/// to a sibling temp file and renamed into place, so a concurrent load
/// sees either the old or the new record in full.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    /// Creates a store backed by the given record path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the record path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the profile, returning defaults when no usable record exists.
    ///
    /// A missing record is the normal first-run case. A malformed record is
    /// logged and treated the same way, so loading never fails.
    pub async fn load(&self) -> StudentProfile {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return StudentProfile::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read profile, using defaults");
                return StudentProfile::default();
            }
        };

        match serde_json::from_str::<StudentProfile>(&contents) {
            Ok(mut profile) => {
                profile.normalize();
                profile
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Malformed profile record, using defaults");
                StudentProfile::default()
            }
        }
    }

    /// Saves the profile wholesale, replacing any existing record.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::StoreWriteError` if the record cannot be
    /// serialized or written.
    pub async fn save(&self, profile: &StudentProfile) -> Result<()> {
        let mut profile = profile.clone();
        profile.normalize();

        let json = serde_json::to_string_pretty(&profile)
            .map_err(|e| SessionError::store_write(&self.path, e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| SessionError::store_write(&self.path, e.to_string()))?;
            }
        }

        // Write-then-rename keeps the record whole for concurrent readers
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, json.as_bytes())
            .await
            .map_err(|e| SessionError::store_write(&tmp_path, e.to_string()))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| SessionError::store_write(&self.path, e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_default_values() {
        let profile = StudentProfile::default();

        assert!(profile.disabilities.is_empty());
        assert_eq!(profile.reading_speed, ReadingSpeed::Slow);
        assert!(profile.audio_preference);
        assert_eq!(profile.visual_preference, VisualPreference::Normal);
        assert_eq!(profile.attention_span, 10);
        assert_eq!(profile.learning_style, "visual");
    }

    #[test]
    fn test_disability_serialization() {
        assert_eq!(
            serde_json::to_string(&Disability::Dyslexia).unwrap(),
            "\"dyslexia\""
        );
        assert_eq!(
            serde_json::to_string(&Disability::VisualImpairment).unwrap(),
            "\"visual_impairment\""
        );
    }

    #[test]
    fn test_disability_case_insensitive() {
        let d: Disability = serde_json::from_str("\"Dyslexia\"").unwrap();
        assert_eq!(d, Disability::Dyslexia);

        let d: Disability = serde_json::from_str("\"ADHD\"").unwrap();
        assert_eq!(d, Disability::Adhd);

        // Display names with spaces parse too
        let d: Disability = serde_json::from_str("\"Visual Impairment\"").unwrap();
        assert_eq!(d, Disability::VisualImpairment);

        let d: Disability = serde_json::from_str("\"motor-difficulties\"").unwrap();
        assert_eq!(d, Disability::MotorDifficulties);
    }

    #[test]
    fn test_invalid_disability_error() {
        let result: std::result::Result<Disability, _> = serde_json::from_str("\"dysgraphia\"");
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("invalid disability tag"));
        assert!(err.contains("dysgraphia"));
    }

    #[test]
    fn test_reading_speed_round_trip() {
        for speed in [
            ReadingSpeed::VerySlow,
            ReadingSpeed::Slow,
            ReadingSpeed::Medium,
            ReadingSpeed::Fast,
        ] {
            let json = serde_json::to_string(&speed).unwrap();
            let back: ReadingSpeed = serde_json::from_str(&json).unwrap();
            assert_eq!(back, speed);
        }

        // Legacy records used spaces
        let speed: ReadingSpeed = serde_json::from_str("\"Very Slow\"").unwrap();
        assert_eq!(speed, ReadingSpeed::VerySlow);
    }

    #[test]
    fn test_visual_preference_accepts_hyphens() {
        let pref: VisualPreference = serde_json::from_str("\"dyslexia-friendly\"").unwrap();
        assert_eq!(pref, VisualPreference::DyslexiaFriendly);

        let pref: VisualPreference = serde_json::from_str("\"High Contrast\"").unwrap();
        assert_eq!(pref, VisualPreference::HighContrast);
    }

    #[test]
    fn test_profile_deserializes_legacy_record() {
        // Shape written by earlier versions of the assistant
        let json = r#"{
            "reading_speed": "slow",
            "visual_preference": "normal",
            "audio_preference": true,
            "attention_span": 10,
            "learning_style": "visual",
            "disabilities": ["Dyslexia", "ADHD"]
        }"#;

        let profile: StudentProfile = serde_json::from_str(json).unwrap();
        assert_eq!(
            profile.disabilities,
            vec![Disability::Dyslexia, Disability::Adhd]
        );
        assert_eq!(profile.attention_span, 10);
    }

    #[test]
    fn test_normalize_removes_duplicates_preserving_order() {
        let mut profile = StudentProfile {
            disabilities: vec![
                Disability::Adhd,
                Disability::Dyslexia,
                Disability::Adhd,
                Disability::Dyslexia,
            ],
            ..Default::default()
        };
        profile.normalize();
        assert_eq!(
            profile.disabilities,
            vec![Disability::Adhd, Disability::Dyslexia]
        );
    }

    #[test]
    fn test_primary_disability() {
        let profile = StudentProfile {
            disabilities: vec![Disability::Autism, Disability::Adhd],
            ..Default::default()
        };
        assert_eq!(profile.primary_disability(), Some(Disability::Autism));

        let empty = StudentProfile::default();
        assert_eq!(empty.primary_disability(), None);
    }

    #[test]
    fn test_attention_check_below_span() {
        let profile = StudentProfile::default();
        let check = attention_check(&profile, 9 * 60);
        assert!(!check.need_break);
        assert!(check.activity.is_none());
    }

    #[test]
    fn test_attention_check_above_span() {
        let profile = StudentProfile::default();
        let check = attention_check(&profile, 11 * 60);
        assert!(check.need_break);
        assert!(check.suggestion.unwrap().contains("movement break"));
        assert!(BREAK_ACTIVITIES.contains(&check.activity.unwrap().as_str()));
    }

    #[tokio::test]
    async fn test_store_load_missing_returns_defaults() {
        let store = ProfileStore::new("/nonexistent/dir/student_profile.json");
        let profile = store.load().await;
        assert_eq!(profile, StudentProfile::default());
    }

    #[tokio::test]
    async fn test_store_save_load_round_trip() {
        let dir = std::env::temp_dir().join("edapt_profile_roundtrip");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let store = ProfileStore::new(dir.join("student_profile.json"));

        let profile = StudentProfile {
            disabilities: vec![Disability::Dyslexia, Disability::VisualImpairment],
            reading_speed: ReadingSpeed::VerySlow,
            audio_preference: false,
            visual_preference: VisualPreference::DarkMode,
            attention_span: 20,
            learning_style: "auditory".to_string(),
        };

        store.save(&profile).await.unwrap();
        let loaded = store.load().await;
        assert_eq!(loaded, profile);

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_store_load_malformed_returns_defaults() {
        let dir = std::env::temp_dir().join("edapt_profile_malformed");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("student_profile.json");
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        let store = ProfileStore::new(&path);
        let profile = store.load().await;
        assert_eq!(profile, StudentProfile::default());

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_store_save_deduplicates() {
        let dir = std::env::temp_dir().join("edapt_profile_dedup");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let store = ProfileStore::new(dir.join("student_profile.json"));

        let profile = StudentProfile {
            disabilities: vec![Disability::Adhd, Disability::Adhd],
            ..Default::default()
        };
        store.save(&profile).await.unwrap();

        let loaded = store.load().await;
        assert_eq!(loaded.disabilities, vec![Disability::Adhd]);

        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
