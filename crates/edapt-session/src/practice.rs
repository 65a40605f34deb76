//! Practice question types, the response interpreter, and answer checking.
//!
//! Model output for practice questions is free text that should contain
//! a JSON array. The interpreter recovers that array by bracket
//! scanning, and falls back to a fixed, topic-interpolated set of three
//! questions whenever recovery fails. The bracket scan is deliberately
//! isolated here so a stricter structured-output mode could replace it
//! without touching callers.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// The answer format of a practice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Four-option multiple choice.
    MultipleChoice,
    /// Two-option yes/no.
    YesNo,
    /// True or false.
    TrueFalse,
}

/// One practice question in the shape the generation prompt requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeQuestion {
    /// The question text.
    pub question: String,
    /// The answer format.
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// Answer options, in display order.
    pub options: Vec<String>,
    /// The correct option's text.
    pub correct_answer: String,
    /// Shown when the student answers incorrectly.
    pub feedback: String,
    /// Shown when the student answers correctly.
    pub success_message: String,
}

/// Extracts practice questions from raw model output.
///
/// Locates the first `[` and the last `]`, slices that span, and parses
/// it as a JSON array of questions. If no such span exists or parsing
/// fails, returns the fixed fallback set for the topic. Well-formed
/// arrays are returned as-is, in model output order; that includes an
/// empty array, which only the caller can decide how to present.
#[must_use]
pub fn extract_questions(raw: &str, topic: &str) -> Vec<PracticeQuestion> {
    let Some(start) = raw.find('[') else {
        warn!(topic, "No JSON array in model output, using fallback questions");
        return fallback_questions(topic);
    };
    let Some(end) = raw.rfind(']') else {
        warn!(topic, "Unterminated JSON array in model output, using fallback questions");
        return fallback_questions(topic);
    };
    if end < start {
        warn!(topic, "Mismatched brackets in model output, using fallback questions");
        return fallback_questions(topic);
    }

    match serde_json::from_str::<Vec<PracticeQuestion>>(&raw[start..=end]) {
        Ok(questions) => questions,
        Err(e) => {
            warn!(topic, error = %e, "Failed to parse question array, using fallback questions");
            fallback_questions(topic)
        }
    }
}

/// Returns the fixed fallback set of three encouragement-oriented
/// questions, with the topic interpolated into each question text.
#[must_use]
pub fn fallback_questions(topic: &str) -> Vec<PracticeQuestion> {
    vec![
        PracticeQuestion {
            question: format!("Is {topic} something you enjoy learning about?"),
            kind: QuestionKind::YesNo,
            options: vec!["Yes! 😊".to_string(), "No 😕".to_string()],
            correct_answer: "Yes! 😊".to_string(),
            feedback: "That's okay! Let's make it more fun!".to_string(),
            success_message: "Wonderful! Learning is always better when we enjoy it!".to_string(),
        },
        PracticeQuestion {
            question: format!("Can you name one thing about {topic}?"),
            kind: QuestionKind::MultipleChoice,
            options: vec![
                "Yes, I can!".to_string(),
                "I need help".to_string(),
                "Maybe".to_string(),
                "Not sure".to_string(),
            ],
            correct_answer: "Yes, I can!".to_string(),
            feedback: "That's alright! Let's think together!".to_string(),
            success_message: "Excellent thinking! You're doing great!".to_string(),
        },
        PracticeQuestion {
            question: format!("Would you like to learn more about {topic}?"),
            kind: QuestionKind::YesNo,
            options: vec!["Yes! 🎯".to_string(), "Maybe later 😴".to_string()],
            correct_answer: "Yes! 🎯".to_string(),
            feedback: "That's fine! We can learn when you're ready!".to_string(),
            success_message: "That's the spirit! Keep being curious!".to_string(),
        },
    ]
}

/// Judges a submitted answer against the correct one.
///
/// Correct when the submission equals the correct answer exactly, or
/// when the correct answer (case-insensitive) appears as a substring of
/// the submission. The substring fallback tolerates decorated answer
/// labels but can produce false positives for very short correct
/// answers; that behavior is intentional and kept as-is.
#[must_use]
pub fn check_answer(submitted: &str, correct: &str) -> bool {
    submitted == correct || submitted.to_lowercase().contains(&correct.to_lowercase())
}
