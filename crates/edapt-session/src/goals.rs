//! Learning goals and their append-only log.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::warn;

use crate::error::{Result, SessionError};

/// Lifecycle status of a goal. Only `Active` is ever written today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    /// The goal is being worked toward.
    #[default]
    Active,
}

/// A student-set learning goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningGoal {
    /// The goal text as the student typed it.
    pub goal: String,
    /// When the goal was set.
    pub created: DateTime<Utc>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: GoalStatus,
}

impl LearningGoal {
    /// Creates an active goal timestamped now.
    #[must_use]
    pub fn new(goal: impl Into<String>) -> Self {
        Self {
            goal: goal.into(),
            created: Utc::now(),
            status: GoalStatus::Active,
        }
    }
}

/// Append-only durable log of learning goals.
#[derive(Debug, Clone)]
pub struct GoalLog {
    path: PathBuf,
}

impl GoalLog {
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

    /// Appends one goal to the log.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::StoreWriteError` if the goal cannot be
    /// serialized or written.
    pub async fn append(&self, goal: &LearningGoal) -> Result<()> {
        let mut line = serde_json::to_string(goal)
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

    /// Loads all goals in the order they were set.
    ///
    /// A missing log yields an empty list; malformed lines are skipped
    /// with a warning.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::StoreReadError` only when the log exists
    /// but cannot be read at all.
    pub async fn load_all(&self) -> Result<Vec<LearningGoal>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SessionError::store_read(&self.path, e.to_string())),
        };

        let mut goals = Vec::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<LearningGoal>(line) {
                Ok(goal) => goals.push(goal),
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Skipping malformed goal record");
                }
            }
        }

        Ok(goals)
    }
}
