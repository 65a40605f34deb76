//! Markdown rendering of learning reports.
//!
//! Produces a document a caregiver can read or print: summary metrics,
//! the current streak, earned insights, topic ranking, recommendations,
//! and the most recent activities.

use std::fmt::Write;

use crate::LearningReport;

/// Number of topics shown in the topic ranking table.
const TOP_TOPIC_COUNT: usize = 5;

/// Generates Markdown documents from a [`LearningReport`].
pub struct MarkdownGenerator<'a> {
    report: &'a LearningReport,
}

impl<'a> MarkdownGenerator<'a> {
    /// Creates a generator for the given report.
    #[must_use]
    pub const fn new(report: &'a LearningReport) -> Self {
        Self { report }
    }

    /// Generates the complete Markdown report.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();

        let _ = writeln!(output, "# 🌟 My Learning Journey\n");
        self.write_summary(&mut output);
        self.write_insights(&mut output);
        self.write_topics(&mut output);
        self.write_recommendations(&mut output);
        self.write_recent(&mut output);
        self.write_footer(&mut output);

        output
    }

    fn write_summary(&self, output: &mut String) {
        let summary = &self.report.summary;

        let _ = writeln!(output, "## Summary\n");
        let _ = writeln!(output, "| Metric | Value |");
        let _ = writeln!(output, "|--------|-------|");
        let _ = writeln!(
            output,
            "| Total Learning Time | {:.1} minutes |",
            summary.total_minutes
        );
        let _ = writeln!(output, "| Activities | {} |", summary.activity_count);
        let _ = writeln!(output, "| Learning Days | {} |", summary.learning_days);
        let _ = writeln!(
            output,
            "| Topics Explored | {} |",
            summary.topic_minutes.len()
        );
        match summary.average_quiz_score {
            Some(avg) => {
                let _ = writeln!(output, "| Average Quiz Score | {avg:.0}% |");
            }
            None => {
                let _ = writeln!(output, "| Average Quiz Score | no quizzes yet |");
            }
        }
        let _ = writeln!(output);

        if summary.streak_days > 0 {
            let _ = writeln!(
                output,
                "🔥 Learning Streak: {} days in a row! Keep it up!\n",
                summary.streak_days
            );
        }
    }

    fn write_insights(&self, output: &mut String) {
        let _ = writeln!(output, "## 🧠 Your Learning Insights\n");

        if self.report.insights.is_empty() {
            let _ = writeln!(output, "*Keep learning to unlock insights!*\n");
            return;
        }

        for insight in &self.report.insights {
            let _ = writeln!(
                output,
                "- {} **{}**: {}",
                insight.emoji, insight.title, insight.description
            );
        }
        let _ = writeln!(output);
    }

    fn write_topics(&self, output: &mut String) {
        if self.report.summary.topic_minutes.is_empty() {
            return;
        }

        let _ = writeln!(output, "## 🎯 Learning by Topic\n");
        let _ = writeln!(output, "| Topic | Minutes |");
        let _ = writeln!(output, "|-------|---------|");
        for (topic, minutes) in self
            .report
            .summary
            .topic_minutes
            .iter()
            .take(TOP_TOPIC_COUNT)
        {
            let _ = writeln!(output, "| {topic} | {minutes:.1} |");
        }
        let _ = writeln!(output);
    }

    fn write_recommendations(&self, output: &mut String) {
        let _ = writeln!(output, "## 💡 Personalized Recommendations\n");

        if self.report.recommendations.is_empty() {
            let _ = writeln!(output, "*No recommendations yet.*\n");
            return;
        }

        for rec in &self.report.recommendations {
            let _ = writeln!(output, "- {rec}");
        }
        let _ = writeln!(output);
    }

    fn write_recent(&self, output: &mut String) {
        if self.report.recent.is_empty() {
            return;
        }

        let _ = writeln!(output, "## 📋 Recent Activities\n");
        let _ = writeln!(output, "| Date | Topic | Activity | Minutes | Score |");
        let _ = writeln!(output, "|------|-------|----------|---------|-------|");
        for entry in &self.report.recent {
            let score = entry
                .quiz_score
                .map_or_else(|| "-".to_string(), |s| format!("{s:.0}%"));
            let _ = writeln!(
                output,
                "| {} | {} | {} | {:.1} | {} |",
                entry.timestamp.format("%Y-%m-%d"),
                entry.topic,
                entry.activity_type,
                entry.time_spent,
                score
            );
        }
        let _ = writeln!(output);
    }

    fn write_footer(&self, output: &mut String) {
        let _ = writeln!(output, "---\n");
        let _ = writeln!(
            output,
            "*Remember: You're doing great! Every step counts!*\n");
        let _ = writeln!(
            output,
            "*Generated {}*",
            self.report.generated.format("%Y-%m-%d %H:%M UTC")
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use edapt_session::{ActivityKind, ProgressEntry, StudentProfile};

    use super::*;

    fn sample_history() -> Vec<ProgressEntry> {
        (1..=6)
            .map(|day| ProgressEntry {
                timestamp: Utc.with_ymd_and_hms(2026, 8, day, 9, 0, 0).unwrap(),
                topic: format!("Topic {day}"),
                time_spent: 15.0,
                quiz_score: Some(90.0),
                activity_type: ActivityKind::Quiz,
                disabilities: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn test_generate_full_report() {
        let report = LearningReport::build(&sample_history(), &StudentProfile::default());
        let markdown = MarkdownGenerator::new(&report).generate();

        assert!(markdown.contains("# 🌟 My Learning Journey"));
        assert!(markdown.contains("| Total Learning Time | 90.0 minutes |"));
        assert!(markdown.contains("Learning Streak: 6 days in a row"));
        assert!(markdown.contains("Time Champion"));
        assert!(markdown.contains("## 💡 Personalized Recommendations"));
        assert!(markdown.contains("## 📋 Recent Activities"));
    }

    #[test]
    fn test_generate_empty_history() {
        let report = LearningReport::build(&[], &StudentProfile::default());
        let markdown = MarkdownGenerator::new(&report).generate();

        assert!(markdown.contains("no quizzes yet"));
        assert!(markdown.contains("Keep learning to unlock insights!"));
        assert!(!markdown.contains("Learning Streak"));
        assert!(!markdown.contains("Recent Activities"));
    }

    #[test]
    fn test_topic_table_capped_at_five() {
        let history: Vec<ProgressEntry> = (1..=8)
            .map(|day| ProgressEntry {
                timestamp: Utc.with_ymd_and_hms(2026, 8, day, 9, 0, 0).unwrap(),
                topic: format!("Subject {day}"),
                time_spent: f64::from(day) * 2.0,
                quiz_score: None,
                activity_type: ActivityKind::Lesson,
                disabilities: Vec::new(),
            })
            .collect();
        let report = LearningReport::build(&history, &StudentProfile::default());
        let markdown = MarkdownGenerator::new(&report).generate();

        // The three least-studied subjects fall off the table
        assert!(markdown.contains("| Subject 8 | 16.0 |"));
        assert!(!markdown.contains("| Subject 1 |"));
    }
}
