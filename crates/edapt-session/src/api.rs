//! HTTP API endpoints for the EdAPT session server.
//!
//! This module provides the REST API consumed by the browser front end.
//! All content endpoints await one generation at a time; the front end
//! shows a progress indicator while waiting.
//!
//! # Endpoints
//!
//! - `GET /api/profile` / `PUT /api/profile` - Load and replace the profile
//! - `POST /api/adapt` - Adapt text for the student's primary disability
//! - `POST /api/simplify` - Simplify text with the general template
//! - `POST /api/comprehension` - Generate comprehension questions
//! - `POST /api/lesson` - Build a multi-sensory lesson plan
//! - `POST /api/visual-guide` - Build a learning guide, optionally from an image
//! - `POST /api/practice` - Generate practice questions
//! - `POST /api/practice/check` - Check a submitted answer
//! - `GET /api/progress` / `POST /api/progress` - History and recording
//! - `GET /api/goals` / `POST /api/goals` - Learning goals
//! - `POST /api/attention` - Attention-span break check

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::assistant::{Assistant, GuideOutcome};
use crate::config::Config;
use crate::error::SessionError;
use crate::generate::Generator;
use crate::goals::{GoalLog, LearningGoal};
use crate::practice::{check_answer, PracticeQuestion};
use crate::profile::{attention_check, BreakCheck, ProfileStore, StudentProfile};
use crate::progress::{ActivityKind, ProgressEntry, ProgressLog};
use crate::prompts::Difficulty;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for the text endpoints (`adapt`, `simplify`, `comprehension`).
#[derive(Debug, Clone, Deserialize)]
pub struct TextRequest {
    /// The text to process.
    pub text: String,
}

/// Request body for the lesson endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LessonRequest {
    /// The topic to teach.
    pub topic: String,
}

/// Request body for the visual-guide endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualGuideRequest {
    /// The learning objective.
    pub objective: String,
    /// Base64-encoded image bytes, when the student supplied an image.
    #[serde(default)]
    pub image_base64: Option<String>,
}

/// Request body for the practice endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PracticeRequest {
    /// The topic to practice.
    pub topic: String,
    /// Requested difficulty level.
    #[serde(default)]
    pub difficulty: Difficulty,
}

/// Request body for the answer-check endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckRequest {
    /// The answer the student submitted.
    pub submitted: String,
    /// The question being answered.
    pub question: PracticeQuestion,
}

/// Request body for recording a progress entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    /// What the student worked on.
    pub topic: String,
    /// Minutes spent.
    pub time_spent: f64,
    /// Quiz score percentage, for quiz activities.
    #[serde(default)]
    pub quiz_score: Option<f64>,
    /// The kind of activity.
    pub activity_type: ActivityKind,
}

/// Request body for setting a learning goal.
#[derive(Debug, Clone, Deserialize)]
pub struct GoalRequest {
    /// The goal text.
    pub goal: String,
}

/// Request body for the attention-check endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttentionRequest {
    /// Seconds elapsed in the current session.
    pub elapsed_secs: u64,
}

/// Response body carrying generated free-text content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentResponse {
    /// The generated content.
    pub content: String,
}

/// Response body for the practice endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionsResponse {
    /// The generated (or fallback) questions.
    pub questions: Vec<PracticeQuestion>,
}

/// Response body for the answer-check endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    /// Whether the submission was judged correct.
    pub correct: bool,
    /// The question's success message or retry feedback.
    pub message: String,
}

/// Error response body returned on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Description of the error.
    pub error: String,
}

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the HTTP server.
#[derive(Debug, Clone)]
pub struct AppState<G> {
    /// Configuration for the session server.
    pub config: Config,
    /// The content-generation orchestrator.
    pub assistant: Assistant<G>,
    /// Durable profile store.
    pub profile_store: ProfileStore,
    /// Append-only progress log.
    pub progress_log: ProgressLog,
    /// Append-only goal log.
    pub goal_log: GoalLog,
}

impl<G: Generator> AppState<G> {
    /// Creates application state with stores derived from the config.
    #[must_use]
    pub fn new(config: Config, generator: G) -> Self {
        let profile_store = ProfileStore::new(config.profile_path());
        let progress_log = ProgressLog::new(config.progress_path());
        let goal_log = GoalLog::new(config.goals_path());
        Self {
            config,
            assistant: Assistant::new(generator),
            profile_store,
            progress_log,
            goal_log,
        }
    }
}

// ============================================================================
// API Error Type
// ============================================================================

/// Internal error type for API handlers.
#[derive(Debug)]
enum ApiError {
    /// The generation service failed; the action is abandoned, not fatal.
    Generation(String),
    /// A durable store could not be read or written.
    Store(String),
    /// The request payload was unusable.
    BadRequest(String),
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        if e.is_generation() {
            Self::Generation(e.to_string())
        } else {
            Self::Store(e.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Generation(msg) => (StatusCode::BAD_GATEWAY, msg),
            Self::Store(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the HTTP router with all API endpoints.
///
/// # Returns
///
/// An axum `Router` configured with:
/// - All API routes under `/api`
/// - CORS middleware for development
/// - Tracing middleware for request logging
pub fn create_router<G>(state: AppState<G>) -> Router
where
    G: Generator + Clone + Send + Sync + 'static,
{
    // Configure CORS for development (allow all origins)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/profile", get(get_profile).put(put_profile))
        .route("/adapt", post(post_adapt))
        .route("/simplify", post(post_simplify))
        .route("/comprehension", post(post_comprehension))
        .route("/lesson", post(post_lesson))
        .route("/visual-guide", post(post_visual_guide))
        .route("/practice", post(post_practice))
        .route("/practice/check", post(post_practice_check))
        .route("/progress", get(get_progress).post(post_progress))
        .route("/goals", get(get_goals).post(post_goal))
        .route("/attention", post(post_attention));

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

// ============================================================================
// Handlers
// ============================================================================

/// Handler for `GET /api/profile`.
async fn get_profile<G: Generator>(
    State(state): State<Arc<AppState<G>>>,
) -> Json<StudentProfile> {
    Json(state.profile_store.load().await)
}

/// Handler for `PUT /api/profile`.
///
/// Replaces the profile wholesale and returns the record as saved.
async fn put_profile<G: Generator>(
    State(state): State<Arc<AppState<G>>>,
    Json(mut profile): Json<StudentProfile>,
) -> Result<Json<StudentProfile>, ApiError> {
    profile.normalize();
    state.profile_store.save(&profile).await?;
    info!(disabilities = profile.disabilities.len(), "Profile saved");
    Ok(Json(profile))
}

/// Handler for `POST /api/adapt`.
async fn post_adapt<G: Generator>(
    State(state): State<Arc<AppState<G>>>,
    Json(request): Json<TextRequest>,
) -> Result<Json<ContentResponse>, ApiError> {
    let profile = state.profile_store.load().await;
    let content = state.assistant.adapt(&request.text, &profile).await?;
    Ok(Json(ContentResponse { content }))
}

/// Handler for `POST /api/simplify`.
async fn post_simplify<G: Generator>(
    State(state): State<Arc<AppState<G>>>,
    Json(request): Json<TextRequest>,
) -> Result<Json<ContentResponse>, ApiError> {
    let content = state.assistant.simplify(&request.text).await?;
    Ok(Json(ContentResponse { content }))
}

/// Handler for `POST /api/comprehension`.
async fn post_comprehension<G: Generator>(
    State(state): State<Arc<AppState<G>>>,
    Json(request): Json<TextRequest>,
) -> Result<Json<ContentResponse>, ApiError> {
    let content = state.assistant.comprehension(&request.text).await?;
    Ok(Json(ContentResponse { content }))
}

/// Handler for `POST /api/lesson`.
async fn post_lesson<G: Generator>(
    State(state): State<Arc<AppState<G>>>,
    Json(request): Json<LessonRequest>,
) -> Result<Json<ContentResponse>, ApiError> {
    let profile = state.profile_store.load().await;
    info!(topic = %request.topic, "Building lesson");
    let content = state.assistant.lesson(&request.topic, &profile).await?;
    Ok(Json(ContentResponse { content }))
}

/// Handler for `POST /api/visual-guide`.
///
/// A vision failure is absorbed inside the assistant; only a failure of
/// the objective-only fallback surfaces as an error here.
async fn post_visual_guide<G: Generator>(
    State(state): State<Arc<AppState<G>>>,
    Json(request): Json<VisualGuideRequest>,
) -> Result<Json<GuideOutcome>, ApiError> {
    let image = match &request.image_base64 {
        Some(encoded) => Some(
            base64::engine::general_purpose::STANDARD
                .decode(encoded)
                .map_err(|e| ApiError::BadRequest(format!("invalid imageBase64: {e}")))?,
        ),
        None => None,
    };

    let outcome = state
        .assistant
        .visual_guide(&request.objective, image.as_deref())
        .await?;
    Ok(Json(outcome))
}

/// Handler for `POST /api/practice`.
///
/// Never fails on generation problems; the fallback question set is
/// returned instead.
async fn post_practice<G: Generator>(
    State(state): State<Arc<AppState<G>>>,
    Json(request): Json<PracticeRequest>,
) -> Json<QuestionsResponse> {
    let profile = state.profile_store.load().await;
    let questions = state
        .assistant
        .practice(&request.topic, request.difficulty, &profile)
        .await;
    Json(QuestionsResponse { questions })
}

/// Handler for `POST /api/practice/check`.
async fn post_practice_check(Json(request): Json<CheckRequest>) -> Json<CheckResponse> {
    let correct = check_answer(&request.submitted, &request.question.correct_answer);
    let message = if correct {
        request.question.success_message
    } else {
        request.question.feedback
    };
    Json(CheckResponse { correct, message })
}

/// Handler for `GET /api/progress`.
async fn get_progress<G: Generator>(
    State(state): State<Arc<AppState<G>>>,
) -> Result<Json<Vec<ProgressEntry>>, ApiError> {
    let history = state.progress_log.load_history().await?;
    Ok(Json(history))
}

/// Handler for `POST /api/progress`.
///
/// The disability snapshot is taken from the current profile at record
/// time, not supplied by the client.
async fn post_progress<G: Generator>(
    State(state): State<Arc<AppState<G>>>,
    Json(request): Json<ProgressRequest>,
) -> Result<Json<ProgressEntry>, ApiError> {
    if request.time_spent < 0.0 {
        return Err(ApiError::BadRequest(
            "timeSpent must not be negative".to_string(),
        ));
    }
    if let Some(score) = request.quiz_score {
        if !(0.0..=100.0).contains(&score) {
            return Err(ApiError::BadRequest(
                "quizScore must be between 0 and 100".to_string(),
            ));
        }
    }

    let profile = state.profile_store.load().await;
    let entry = ProgressEntry::new(
        request.topic,
        request.time_spent,
        request.quiz_score,
        request.activity_type,
        profile.disabilities,
    );
    state.progress_log.append(&entry).await?;
    Ok(Json(entry))
}

/// Handler for `GET /api/goals`.
async fn get_goals<G: Generator>(
    State(state): State<Arc<AppState<G>>>,
) -> Result<Json<Vec<LearningGoal>>, ApiError> {
    let goals = state.goal_log.load_all().await?;
    Ok(Json(goals))
}

/// Handler for `POST /api/goals`.
async fn post_goal<G: Generator>(
    State(state): State<Arc<AppState<G>>>,
    Json(request): Json<GoalRequest>,
) -> Result<Json<LearningGoal>, ApiError> {
    if request.goal.trim().is_empty() {
        warn!("Rejected empty goal");
        return Err(ApiError::BadRequest("goal must not be empty".to_string()));
    }

    let goal = LearningGoal::new(request.goal);
    state.goal_log.append(&goal).await?;
    info!(goal = %goal.goal, "Goal set");
    Ok(Json(goal))
}

/// Handler for `POST /api/attention`.
async fn post_attention<G: Generator>(
    State(state): State<Arc<AppState<G>>>,
    Json(request): Json<AttentionRequest>,
) -> Json<BreakCheck> {
    let profile = state.profile_store.load().await;
    Json(attention_check(&profile, request.elapsed_secs))
}

// ============================================================================
// Tests
// ============================================================================
