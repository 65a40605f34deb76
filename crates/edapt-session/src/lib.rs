//! EdAPT Session Core
//!
//! Manages the student profile, progress records, prompt composition,
//! and the HTTP API of the learning assistant.

pub mod api;
pub mod assistant;
pub mod config;
pub mod error;
pub mod generate;
pub mod goals;
pub mod practice;
pub mod profile;
pub mod progress;
pub mod prompts;

pub use api::{
    create_router, AppState, AttentionRequest, CheckRequest, CheckResponse, ContentResponse,
    ErrorResponse, GoalRequest, LessonRequest, PracticeRequest, ProgressRequest, QuestionsResponse,
    TextRequest, VisualGuideRequest,
};
pub use assistant::{Assistant, GuideOutcome};
pub use config::{Config, ModelConfig, CONFIG_FILE_NAME};
pub use error::{GenerationErrorKind, Result, SessionError};
pub use generate::Generator;
pub use goals::{GoalLog, GoalStatus, LearningGoal};
pub use practice::{
    check_answer, extract_questions, fallback_questions, PracticeQuestion, QuestionKind,
};
pub use profile::{
    attention_check, break_activity, BreakCheck, Disability, ProfileStore, ReadingSpeed,
    StudentProfile, VisualPreference, BREAK_ACTIVITIES,
};
pub use progress::{ActivityKind, ProgressEntry, ProgressLog};
pub use prompts::{Difficulty, GenOptions, ModelRole, TaskKind};
