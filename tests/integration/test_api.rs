//! End-to-end tests for the EdAPT HTTP API
//!
//! These tests drive the full router with a scripted generator standing
//! in for the model runtime, exercising a complete student journey:
//! profile setup, content generation, practice, and progress recording.

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use tower::util::ServiceExt;

use edapt_session::{
    create_router, AppState, Config, GenOptions, GenerationErrorKind, Generator, ModelRole,
    Result, SessionError,
};

/// Generator returning a canned response per model role, or failing
/// outright when no response is configured.
#[derive(Debug, Clone, Default)]
struct MockGenerator {
    fast: Option<String>,
    accurate: Option<String>,
    vision: Option<String>,
}

impl MockGenerator {
    fn with_fast(response: &str) -> Self {
        Self {
            fast: Some(response.to_string()),
            ..Default::default()
        }
    }

    fn with_accurate(response: &str) -> Self {
        Self {
            accurate: Some(response.to_string()),
            ..Default::default()
        }
    }
}

impl Generator for MockGenerator {
    async fn generate(
        &self,
        role: ModelRole,
        _prompt: &str,
        _options: GenOptions,
    ) -> Result<String> {
        let response = match role {
            ModelRole::Fast => &self.fast,
            ModelRole::Accurate => &self.accurate,
            ModelRole::Vision => &self.vision,
        };
        response.clone().ok_or_else(|| {
            SessionError::generation(GenerationErrorKind::Unavailable, "connection refused")
        })
    }

    async fn describe(&self, _prompt: &str, _image: &[u8]) -> Result<String> {
        self.vision.clone().ok_or_else(|| {
            SessionError::generation(GenerationErrorKind::Unavailable, "no vision model")
        })
    }
}

/// Builds a router with stores under a fresh scratch directory.
fn test_router(name: &str, generator: MockGenerator) -> (Router, PathBuf) {
    let dir = std::env::temp_dir().join(format!("edapt_integration_{name}"));
    std::fs::remove_dir_all(&dir).ok();
    std::fs::create_dir_all(&dir).expect("Failed to create scratch directory");

    let config = Config {
        data_dir: dir.to_string_lossy().to_string(),
        ..Default::default()
    };
    (create_router(AppState::new(config, generator)), dir)
}

fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

/// Full journey: set up a profile, generate a lesson, take a quiz, and
/// verify everything lands in the progress history.
#[tokio::test]
async fn test_full_student_journey() {
    let (router, dir) = test_router("journey", MockGenerator::with_accurate("A lesson plan"));

    // Set up the profile
    let response = router
        .clone()
        .oneshot(json_request(
            Method::PUT,
            "/api/profile",
            serde_json::json!({"disabilities": ["dyslexia"], "attention_span": 15}),
        ))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);

    // Generate a lesson (routes to the accurate model)
    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/lesson",
            serde_json::json!({"topic": "Counting to 10"}),
        ))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["content"], "A lesson plan");

    // Record the lesson and a quiz result
    for payload in [
        serde_json::json!({"topic": "Counting to 10", "timeSpent": 12.5, "activityType": "lesson"}),
        serde_json::json!({"topic": "Quiz: Counting to 10", "timeSpent": 5.0, "quizScore": 100.0, "activityType": "quiz"}),
    ] {
        let response = router
            .clone()
            .oneshot(json_request(Method::POST, "/api/progress", payload))
            .await
            .expect("Request failed");
        assert_eq!(response.status(), StatusCode::OK);
    }

    // History carries both entries, in order, with the profile snapshot
    let response = router
        .clone()
        .oneshot(get_request("/api/progress"))
        .await
        .expect("Request failed");
    let history = body_json(response).await;
    let entries = history.as_array().expect("History is not an array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["topic"], "Counting to 10");
    assert_eq!(entries[1]["quiz_score"], 100.0);
    assert_eq!(entries[0]["disabilities"][0], "dyslexia");

    std::fs::remove_dir_all(&dir).ok();
}

/// A dead model runtime turns content endpoints into 502s but leaves
/// practice serving its fallback set.
#[tokio::test]
async fn test_runtime_outage_degrades_gracefully() {
    let (router, dir) = test_router("outage", MockGenerator::default());

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/adapt",
            serde_json::json!({"text": "The water cycle"}),
        ))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert!(body["error"]
        .as_str()
        .expect("Missing error field")
        .contains("Generation error"));

    // Practice never surfaces the outage
    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/practice",
            serde_json::json!({"topic": "the water cycle"}),
        ))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let questions = body["questions"].as_array().expect("Missing questions");
    assert_eq!(questions.len(), 3);
    assert!(questions[0]["question"]
        .as_str()
        .expect("Missing question text")
        .contains("the water cycle"));

    std::fs::remove_dir_all(&dir).ok();
}

/// Practice questions parsed from model output flow through checking.
#[tokio::test]
async fn test_practice_generation_and_checking() {
    let raw = serde_json::json!([
        {
            "question": "How many sides does a triangle have?",
            "type": "multiple_choice",
            "options": ["Two", "Three", "Four", "Five"],
            "correct_answer": "Three",
            "feedback": "Count the corners!",
            "success_message": "Great job! You got it!"
        }
    ])
    .to_string();
    let (router, dir) = test_router(
        "practice_check",
        MockGenerator::with_fast(&format!("Here you go!\n{raw}")),
    );

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/practice",
            serde_json::json!({"topic": "shapes", "difficulty": "medium"}),
        ))
        .await
        .expect("Request failed");
    let body = body_json(response).await;
    let question = body["questions"][0].clone();
    assert_eq!(question["correct_answer"], "Three");

    // Substring matching tolerates a decorated submission
    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/practice/check",
            serde_json::json!({"submitted": "three, I think", "question": question}),
        ))
        .await
        .expect("Request failed");
    let body = body_json(response).await;
    assert_eq!(body["correct"], true);
    assert_eq!(body["message"], "Great job! You got it!");

    std::fs::remove_dir_all(&dir).ok();
}

/// The profile survives a router rebuild because it lives on disk.
#[tokio::test]
async fn test_profile_persists_across_restarts() {
    let (router, dir) = test_router("restart", MockGenerator::default());

    router
        .clone()
        .oneshot(json_request(
            Method::PUT,
            "/api/profile",
            serde_json::json!({"disabilities": ["autism", "adhd"], "reading_speed": "medium"}),
        ))
        .await
        .expect("Request failed");

    // Fresh state over the same data directory
    let config = Config {
        data_dir: dir.to_string_lossy().to_string(),
        ..Default::default()
    };
    let rebuilt = create_router(AppState::new(config, MockGenerator::default()));

    let response = rebuilt
        .oneshot(get_request("/api/profile"))
        .await
        .expect("Request failed");
    let profile = body_json(response).await;
    assert_eq!(profile["disabilities"][0], "autism");
    assert_eq!(profile["disabilities"][1], "adhd");
    assert_eq!(profile["reading_speed"], "medium");

    std::fs::remove_dir_all(&dir).ok();
}

/// Goals accumulate across requests and come back in order.
#[tokio::test]
async fn test_goal_accumulation() {
    let (router, dir) = test_router("goals", MockGenerator::default());

    for goal in ["Learn 10 new words this week", "Practice math daily"] {
        let response = router
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/goals",
                serde_json::json!({"goal": goal}),
            ))
            .await
            .expect("Request failed");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = router
        .clone()
        .oneshot(get_request("/api/goals"))
        .await
        .expect("Request failed");
    let goals = body_json(response).await;
    let goals = goals.as_array().expect("Goals is not an array");
    assert_eq!(goals.len(), 2);
    assert_eq!(goals[0]["goal"], "Learn 10 new words this week");
    assert_eq!(goals[0]["status"], "active");
    assert_eq!(goals[1]["goal"], "Practice math daily");

    std::fs::remove_dir_all(&dir).ok();
}
