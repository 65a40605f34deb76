//! Progress history types and the append-only progress log.
//!
//! Every tracked activity appends one immutable record. Records are
//! stored one JSON object per line so each is independently parseable;
//! a malformed line never blocks the rest of the history from loading.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::warn;

use crate::error::{Result, SessionError};
use crate::profile::Disability;

/// The kind of learning activity a progress record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    /// A multi-sensory lesson.
    Lesson,
    /// Reading practice (text adaptation or simplification).
    Reading,
    /// A visual learning guide.
    Visual,
    /// A scored practice quiz.
    Quiz,
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lesson => write!(f, "lesson"),
            Self::Reading => write!(f, "reading"),
            Self::Visual => write!(f, "visual"),
            Self::Quiz => write!(f, "quiz"),
        }
    }
}

/// One immutable learning-activity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    /// When the activity finished.
    pub timestamp: DateTime<Utc>,
    /// What the student worked on.
    pub topic: String,
    /// Minutes spent, rounded to two decimals.
    pub time_spent: f64,
    /// Quiz score percentage, present for quiz activities.
    pub quiz_score: Option<f64>,
    /// The kind of activity.
    pub activity_type: ActivityKind,
    /// Snapshot of the disability tags active when the record was written.
    #[serde(default)]
    pub disabilities: Vec<Disability>,
}

impl ProgressEntry {
    /// Creates a record timestamped now, with minutes rounded to two decimals.
    #[must_use]
    pub fn new(
        topic: impl Into<String>,
        time_spent: f64,
        quiz_score: Option<f64>,
        activity_type: ActivityKind,
        disabilities: Vec<Disability>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            topic: topic.into(),
            time_spent: (time_spent * 100.0).round() / 100.0,
            quiz_score,
            activity_type,
            disabilities,
        }
    }
}

/// Append-only durable log of progress records.
#[derive(Debug, Clone)]
pub struct ProgressLog {
    path: PathBuf,
}

impl ProgressLog {
    /// Creates a log backed by the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the log path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record to the log.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::StoreWriteError` if the record cannot be
    /// serialized or written.
    pub async fn append(&self, entry: &ProgressEntry) -> Result<()> {
        let mut line = serde_json::to_string(entry)
            .map_err(|e| SessionError::store_write(&self.path, e.to_string()))?;
        line.push('\n');

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| SessionError::store_write(&self.path, e.to_string()))?;
            }
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| SessionError::store_write(&self.path, e.to_string()))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| SessionError::store_write(&self.path, e.to_string()))?;

        Ok(())
    }

    /// Loads the full history, in append order.
    ///
    /// A missing log means no activity yet and yields an empty history.
    /// Malformed lines are skipped with a warning; valid records before
    /// and after them still load.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::StoreReadError` only when the log exists
    /// but cannot be read at all.
    pub async fn load_history(&self) -> Result<Vec<ProgressEntry>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SessionError::store_read(&self.path, e.to_string())),
        };

        let mut history = Vec::new();
        let mut skipped = 0usize;
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<ProgressEntry>(line) {
                Ok(entry) => history.push(entry),
                Err(e) => {
                    skipped += 1;
                    warn!(path = %self.path.display(), error = %e, "Skipping malformed progress record");
                }
            }
        }

        if skipped > 0 {
            warn!(
                path = %self.path.display(),
                skipped,
                loaded = history.len(),
                "Progress history loaded with malformed records skipped"
            );
        }

        Ok(history)
    }
}
