//! The assistant: orchestration of prompts, routing, and fallbacks.
//!
//! Each method composes the task's prompt, routes it to the right model
//! role, and applies the task's fallback rule. Generation failures are
//! recoverable everywhere: the vision path silently falls back to
//! objective-only content, practice questions fall back to a fixed set,
//! and the remaining tasks surface the error to the caller as a notice.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::generate::Generator;
use crate::practice::{self, PracticeQuestion};
use crate::profile::{Disability, StudentProfile};
use crate::prompts::{self, Difficulty, TaskKind};

/// Outcome of a visual-guide request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideOutcome {
    /// The generated guide text.
    pub content: String,
    /// Whether the image actually contributed to the guide.
    pub used_image: bool,
}

/// Orchestrates content generation for one student.
#[derive(Debug, Clone)]
pub struct Assistant<G> {
    generator: G,
}

impl<G: Generator> Assistant<G> {
    /// Creates an assistant backed by the given generator.
    #[must_use]
    pub const fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Adapts text using the student's primary disability template.
    ///
    /// An empty disability set gets the general simplification template.
    pub async fn adapt(&self, text: &str, profile: &StudentProfile) -> Result<String> {
        self.adapt_for(text, profile.primary_disability()).await
    }

    /// Simplifies text with the general template, regardless of profile.
    pub async fn simplify(&self, text: &str) -> Result<String> {
        self.adapt_for(text, None).await
    }

    async fn adapt_for(&self, text: &str, disability: Option<Disability>) -> Result<String> {
        let (role, options) = prompts::route(TaskKind::AdaptText);
        let prompt = prompts::adapt_text(text, disability);
        debug!(?disability, "Adapting text");
        self.generator.generate(role, &prompt, options).await
    }

    /// Generates three comprehension questions for a text.
    ///
    /// The output is free text in the prompt's lettered-options format;
    /// it is rendered verbatim, not parsed.
    pub async fn comprehension(&self, text: &str) -> Result<String> {
        let (role, options) = prompts::route(TaskKind::Comprehension);
        let prompt = prompts::comprehension(text);
        self.generator.generate(role, &prompt, options).await
    }

    /// Builds a multi-sensory lesson plan for a topic.
    pub async fn lesson(&self, topic: &str, profile: &StudentProfile) -> Result<String> {
        let (role, options) = prompts::route(TaskKind::Lesson);
        let prompt = prompts::lesson(topic, &profile.disabilities);
        debug!(topic, "Building lesson plan");
        self.generator.generate(role, &prompt, options).await
    }

    /// Builds a learning guide for an objective, from an image when one
    /// is supplied.
    ///
    /// Any failure on the image path (vision description or the guide
    /// synthesis that follows it) falls back silently to objective-only
    /// content; the image is simply not used. Only a failure of the
    /// objective-only generation itself is surfaced.
    pub async fn visual_guide(
        &self,
        objective: &str,
        image: Option<&[u8]>,
    ) -> Result<GuideOutcome> {
        if let Some(image) = image {
            match self.guide_from_image(objective, image).await {
                Ok(content) => {
                    return Ok(GuideOutcome {
                        content,
                        used_image: true,
                    })
                }
                Err(e) => {
                    warn!(error = %e, "Vision path failed, falling back to objective-only content");
                }
            }
        }

        let content = self.objective_content(objective).await?;
        Ok(GuideOutcome {
            content,
            used_image: false,
        })
    }

    async fn guide_from_image(&self, objective: &str, image: &[u8]) -> Result<String> {
        let describe_prompt = prompts::describe_image(objective);
        let description = self.generator.describe(&describe_prompt, image).await?;

        let (role, options) = prompts::route(TaskKind::VisualGuide);
        let prompt = prompts::visual_guide(&description, objective);
        self.generator.generate(role, &prompt, options).await
    }

    /// Builds the five-section guide from the objective alone.
    pub async fn objective_content(&self, objective: &str) -> Result<String> {
        let (role, options) = prompts::route(TaskKind::ObjectiveContent);
        let prompt = prompts::objective_content(objective);
        self.generator.generate(role, &prompt, options).await
    }

    /// Generates practice questions for a topic.
    ///
    /// Never fails: a generation error or unusable model output yields
    /// the fixed fallback set for the topic.
    pub async fn practice(
        &self,
        topic: &str,
        difficulty: Difficulty,
        profile: &StudentProfile,
    ) -> Vec<PracticeQuestion> {
        let (role, options) = prompts::route(TaskKind::Practice);
        let prompt = prompts::practice(topic, difficulty, &profile.disabilities);

        match self.generator.generate(role, &prompt, options).await {
            Ok(raw) => practice::extract_questions(&raw, topic),
            Err(e) => {
                warn!(topic, error = %e, "Practice generation failed, using fallback questions");
                practice::fallback_questions(topic)
            }
        }
    }
}
