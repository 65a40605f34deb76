//! EdAPT Progress Analytics
//!
//! This crate turns the append-only progress history into summaries,
//! insights, and personalized recommendations, and renders them as a
//! Markdown report for students and caregivers.
//!
//! # Types
//!
//! - [`ProgressSummary`] - Aggregate metrics over the whole history
//! - [`Insight`] - An earned achievement-style observation
//! - [`LearningReport`] - Everything above bundled for rendering
//!
//! # Generators
//!
//! - [`MarkdownGenerator`] - Render a report as a Markdown document

mod markdown;

pub use markdown::MarkdownGenerator;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use edapt_session::{Disability, ProgressEntry, StudentProfile};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to serialize the report to JSON.
    #[error("failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to read or write report files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

// ============================================================================
// Summary
// ============================================================================

/// Aggregate metrics computed from the full progress history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressSummary {
    /// Total learning time in minutes.
    pub total_minutes: f64,
    /// Number of recorded activities.
    pub activity_count: usize,
    /// Number of distinct days with at least one activity.
    pub learning_days: usize,
    /// Mean quiz score over entries that carry one.
    pub average_quiz_score: Option<f64>,
    /// Consecutive learning days ending at the latest entry.
    pub streak_days: u32,
    /// Total minutes per topic, most-studied first.
    pub topic_minutes: Vec<(String, f64)>,
}

impl ProgressSummary {
    /// Computes the summary from a progress history.
    #[must_use]
    pub fn from_history(history: &[ProgressEntry]) -> Self {
        let total_minutes: f64 = history.iter().map(|e| e.time_spent).sum();

        let scores: Vec<f64> = history.iter().filter_map(|e| e.quiz_score).collect();
        let average_quiz_score = if scores.is_empty() {
            None
        } else {
            #[allow(clippy::cast_precision_loss)]
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        };

        // Per-topic totals, first-seen order preserved for ties
        let mut topic_minutes: Vec<(String, f64)> = Vec::new();
        for entry in history {
            match topic_minutes.iter_mut().find(|(t, _)| *t == entry.topic) {
                Some((_, minutes)) => *minutes += entry.time_spent,
                None => topic_minutes.push((entry.topic.clone(), entry.time_spent)),
            }
        }
        topic_minutes.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        Self {
            total_minutes,
            activity_count: history.len(),
            learning_days: unique_dates(history).len(),
            average_quiz_score,
            streak_days: learning_streak(history),
            topic_minutes,
        }
    }

    /// Mean minutes per recorded activity, zero for an empty history.
    #[must_use]
    pub fn average_session_minutes(&self) -> f64 {
        if self.activity_count == 0 {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let count = self.activity_count as f64;
            self.total_minutes / count
        }
    }

    /// The most-studied topic, when any exists.
    #[must_use]
    pub fn top_topic(&self) -> Option<&str> {
        self.topic_minutes.first().map(|(t, _)| t.as_str())
    }
}

fn unique_dates(history: &[ProgressEntry]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = history.iter().map(|e| e.timestamp.date_naive()).collect();
    dates.sort_unstable();
    dates.dedup();
    dates
}

/// Counts consecutive learning days ending at the most recent entry.
///
/// Days with multiple activities count once. The walk starts at the
/// latest unique date and extends backward while each previous date is
/// exactly one day earlier. An empty history has a streak of zero.
#[must_use]
pub fn learning_streak(history: &[ProgressEntry]) -> u32 {
    let dates = unique_dates(history);
    if dates.is_empty() {
        return 0;
    }

    let mut streak = 1;
    for pair in dates.windows(2).rev() {
        if (pair[1] - pair[0]).num_days() == 1 {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

// ============================================================================
// Insights
// ============================================================================

/// An achievement-style observation earned from the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    /// Decorative emoji shown next to the title.
    pub emoji: String,
    /// Short achievement title.
    pub title: String,
    /// One-sentence description with the earned numbers.
    pub description: String,
}

impl Insight {
    fn new(emoji: &str, title: &str, description: String) -> Self {
        Self {
            emoji: emoji.to_string(),
            title: title.to_string(),
            description,
        }
    }
}

/// Generates up to three achievement insights from the history.
///
/// Thresholds are fixed: over an hour of total time, more than five
/// learning days, more than three topics, and an average quiz score
/// above 80 percent.
#[must_use]
pub fn insights(summary: &ProgressSummary) -> Vec<Insight> {
    let mut insights = Vec::new();

    if summary.total_minutes > 60.0 {
        let hours = summary.total_minutes / 60.0;
        insights.push(Insight::new(
            "⏰",
            "Time Champion",
            format!("You've learned for {hours:.1} hours total!"),
        ));
    }

    if summary.learning_days > 5 {
        insights.push(Insight::new(
            "📅",
            "Consistent Learner",
            format!("You've practiced on {} different days!", summary.learning_days),
        ));
    }

    if summary.topic_minutes.len() > 3 {
        insights.push(Insight::new(
            "🌈",
            "Explorer",
            format!("You've explored {} different topics!", summary.topic_minutes.len()),
        ));
    }

    if let Some(avg) = summary.average_quiz_score {
        if avg > 80.0 {
            insights.push(Insight::new(
                "🏆",
                "Quiz Master",
                format!("Average score of {avg:.0}%!"),
            ));
        }
    }

    insights.truncate(3);
    insights
}

// ============================================================================
// Recommendations
// ============================================================================

/// Generates up to four personalized recommendations.
///
/// Draws on session length, the most-studied topic, the disability
/// profile, and the three most recent quiz scores.
#[must_use]
pub fn recommendations(
    summary: &ProgressSummary,
    history: &[ProgressEntry],
    profile: &StudentProfile,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if summary.activity_count > 0 && summary.average_session_minutes() < 10.0 {
        recommendations.push(
            "🕒 Try longer learning sessions (15-20 minutes) for deeper understanding".to_string(),
        );
    }

    if let Some(top) = summary.top_topic() {
        recommendations.push(format!("💡 You enjoy {top} - explore related topics!"));
    }

    if profile.has(Disability::Adhd) {
        recommendations.push("🎯 Remember to take breaks every 10 minutes".to_string());
    }

    if profile.has(Disability::Dyslexia) {
        recommendations.push("📖 Use the text simplifier for all reading materials".to_string());
    }

    let recent_scores: Vec<f64> = history
        .iter()
        .rev()
        .filter_map(|e| e.quiz_score)
        .take(3)
        .collect();
    if !recent_scores.is_empty() {
        #[allow(clippy::cast_precision_loss)]
        let mean = recent_scores.iter().sum::<f64>() / recent_scores.len() as f64;
        if mean < 70.0 {
            recommendations
                .push("📚 Review lessons before taking practice quizzes".to_string());
        }
    }

    recommendations.truncate(4);
    recommendations
}

// ============================================================================
// Report
// ============================================================================

/// A complete learning report ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct LearningReport {
    /// Aggregate metrics.
    pub summary: ProgressSummary,
    /// Earned achievement insights.
    pub insights: Vec<Insight>,
    /// Personalized recommendations.
    pub recommendations: Vec<String>,
    /// The five most recent activities, latest first.
    pub recent: Vec<ProgressEntry>,
    /// When the report was generated.
    pub generated: DateTime<Utc>,
}

impl LearningReport {
    /// Builds a report from the progress history and the profile.
    #[must_use]
    pub fn build(history: &[ProgressEntry], profile: &StudentProfile) -> Self {
        let summary = ProgressSummary::from_history(history);
        let insights = insights(&summary);
        let recommendations = recommendations(&summary, history, profile);
        let recent: Vec<ProgressEntry> = history.iter().rev().take(5).cloned().collect();

        Self {
            summary,
            insights,
            recommendations,
            recent,
            generated: Utc::now(),
        }
    }

    /// Serializes the report as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
