//! Prompt composition and generation routing rules.
//!
//! Every generation task has a fixed prompt template and a fixed routing
//! rule (which model role to use, with which sampling options). Prompt
//! construction is pure: it never fails, performs no I/O, and always
//! returns a non-empty string. Downstream parsing of practice questions
//! depends on the JSON shape requested here, so the templates are not
//! free to drift.

use serde::{Deserialize, Serialize};

use crate::profile::Disability;

/// The generation tasks the assistant can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Reformat text for the student's primary disability.
    AdaptText,
    /// Describe an image in service of a learning objective.
    DescribeImage,
    /// Build a five-section learning guide from an image description.
    VisualGuide,
    /// Build the same five-section guide from the objective alone.
    ObjectiveContent,
    /// Build a multi-sensory lesson plan.
    Lesson,
    /// Generate three comprehension questions for a text.
    Comprehension,
    /// Generate three practice questions as a JSON array.
    Practice,
}

/// The three model roles a task can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelRole {
    /// Fast general-purpose model.
    Fast,
    /// Higher-quality, slower model for lesson plans.
    Accurate,
    /// Vision-capable model for image description.
    Vision,
}

/// Sampling options passed to the generation service.
///
/// Unset fields fall back to the model runtime's own defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GenOptions {
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Top-k sampling cutoff.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// Nucleus sampling cutoff.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

impl GenOptions {
    /// Options for text adaptation: moderate temperature with wide sampling.
    #[must_use]
    pub const fn adaptation() -> Self {
        Self {
            temperature: Some(0.7),
            top_k: Some(64),
            top_p: Some(0.95),
        }
    }

    /// Options for content and lesson synthesis: slightly higher temperature.
    #[must_use]
    pub const fn creative() -> Self {
        Self {
            temperature: Some(0.8),
            top_k: None,
            top_p: None,
        }
    }

    /// Options for practice questions: moderate temperature only.
    #[must_use]
    pub const fn practice() -> Self {
        Self {
            temperature: Some(0.7),
            top_k: None,
            top_p: None,
        }
    }

    /// Returns `true` if no option is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.top_k.is_none() && self.top_p.is_none()
    }
}

/// Returns the model role and sampling options for a task.
///
/// The rule is fixed: adaptation, questions, and guide synthesis use the
/// fast model; lesson plans use the accurate model; image description
/// uses the vision model. Callers handle the vision fallback themselves.
#[must_use]
pub const fn route(kind: TaskKind) -> (ModelRole, GenOptions) {
    match kind {
        TaskKind::AdaptText => (ModelRole::Fast, GenOptions::adaptation()),
        TaskKind::DescribeImage => (ModelRole::Vision, GenOptions::default_const()),
        TaskKind::VisualGuide | TaskKind::ObjectiveContent => {
            (ModelRole::Fast, GenOptions::creative())
        }
        TaskKind::Lesson => (ModelRole::Accurate, GenOptions::creative()),
        TaskKind::Comprehension => (ModelRole::Fast, GenOptions::default_const()),
        TaskKind::Practice => (ModelRole::Fast, GenOptions::practice()),
    }
}

impl GenOptions {
    /// `Default::default()` usable in const context.
    const fn default_const() -> Self {
        Self {
            temperature: None,
            top_k: None,
            top_p: None,
        }
    }
}

/// Difficulty levels for practice questions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Difficulty {
    /// Gentlest level.
    Beginner,
    /// Easy level (default).
    #[default]
    Easy,
    /// Medium level.
    Medium,
    /// Hardest level offered.
    Challenging,
}

impl Difficulty {
    /// Parses a string into a `Difficulty`, case-insensitively.
    fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "challenging" => Some(Self::Challenging),
            _ => None,
        }
    }

    /// Returns the label used in prompts and the UI.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Challenging => "Challenging",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_str_case_insensitive(s)
            .ok_or_else(|| format!("unrecognized difficulty '{s}'"))
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str_case_insensitive(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid difficulty '{s}': expected one of 'beginner', 'easy', 'medium', 'challenging'"
            ))
        })
    }
}

impl Serialize for Difficulty {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let s = match self {
            Self::Beginner => "beginner",
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Challenging => "challenging",
        };
        serializer.serialize_str(s)
    }
}

// ============================================================================
// Prompt templates
// ============================================================================

/// Builds the text-adaptation prompt for the given primary disability.
///
/// An absent tag (or one without a template of its own) falls back to the
/// general simplification template.
#[must_use]
pub fn adapt_text(text: &str, disability: Option<Disability>) -> String {
    match disability {
        Some(Disability::Dyslexia) => format!(
            "Reformat this text for a student with dyslexia:\n\
             1. Use simple, clear sentences (max 10 words each)\n\
             2. Break into small paragraphs (2-3 sentences max)\n\
             3. Put **key words** in bold\n\
             4. Add bullet points where helpful\n\
             5. Use active voice only\n\
             \n\
             Text: {text}\n\
             \n\
             Output the reformatted text with clear structure."
        ),
        Some(Disability::Adhd) => format!(
            "Reformat this content for a student with ADHD:\n\
             1. Break into bite-sized chunks (50 words max per section)\n\
             2. Add 🎯 emoji markers for important points\n\
             3. Include \"Brain Break!\" reminders every 3 sections\n\
             4. Use exciting, engaging language\n\
             5. Add interactive prompts like \"Think about this!\"\n\
             \n\
             Content: {text}\n\
             \n\
             Make it super engaging and easy to focus on."
        ),
        Some(Disability::Autism) => format!(
            "Adapt this content for a student with autism:\n\
             1. Use clear, literal language (no metaphors or idioms)\n\
             2. Number each step or point clearly\n\
             3. Include predictable structure with headers\n\
             4. Be very specific and concrete\n\
             5. Add \"What comes next:\" transitions\n\
             \n\
             Content: {text}\n\
             \n\
             Make it structured and predictable."
        ),
        _ => format!(
            "Simplify this text for easier understanding:\n\
             1. Use simple words (grade 3-4 level)\n\
             2. Short sentences (10 words or less)\n\
             3. Explain any hard words\n\
             4. Add helpful examples\n\
             \n\
             Text: {text}\n\
             \n\
             Make it very easy to understand."
        ),
    }
}

/// Builds the image-description prompt for the vision model.
#[must_use]
pub fn describe_image(learning_objective: &str) -> String {
    format!(
        "Describe this image for a special needs student learning about: {learning_objective}\n\
         Be simple, clear, and encouraging."
    )
}

/// Builds the five-section learning guide prompt from an image description.
#[must_use]
pub fn visual_guide(image_description: &str, learning_objective: &str) -> String {
    format!(
        "Create a special needs learning guide based on this image: {image_description}\n\
         Learning objective: {learning_objective}\n\
         \n\
         Include:\n\
         1. 📸 What We See (simple description)\n\
         2. 📚 Learning Points (3-5 bullet points)\n\
         3. 🌍 Real World Examples (2-3 examples)\n\
         4. ❓ Check Understanding (2 simple questions)\n\
         5. 🎨 Fun Activity (1 hands-on activity)\n\
         \n\
         Use very simple language and be encouraging!"
    )
}

/// Builds the five-section learning guide prompt from the objective alone.
///
/// Used when no image is supplied or when the vision model fails.
#[must_use]
pub fn objective_content(learning_objective: &str) -> String {
    format!(
        "Create an engaging educational guide for special needs students about: {learning_objective}\n\
         \n\
         Structure:\n\
         1. 🎯 What is {learning_objective}? (super simple explanation)\n\
         2. 📚 Key Things to Know (3-5 points with emojis)\n\
         3. 🌍 Where We See It (real-life examples)\n\
         4. ❓ Quick Check (2 yes/no questions)\n\
         5. 🎮 Fun Activity (something hands-on)\n\
         \n\
         Remember: Very simple language, lots of encouragement, use emojis!"
    )
}

/// Builds the multi-sensory lesson plan prompt.
///
/// An empty disability set frames the lesson for "general learning needs".
#[must_use]
pub fn lesson(topic: &str, disabilities: &[Disability]) -> String {
    let disabilities_text = if disabilities.is_empty() {
        "general learning needs".to_string()
    } else {
        disabilities
            .iter()
            .map(Disability::display_name)
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "Create a multi-sensory lesson plan for: {topic}\n\
         Student has: {disabilities_text}\n\
         \n\
         Structure the lesson with these sections:\n\
         \n\
         🎯 LESSON GOAL\n\
         - One clear, simple learning objective\n\
         \n\
         👀 VISUAL ACTIVITIES\n\
         - 2-3 things to look at or draw\n\
         - Simple, clear instructions\n\
         \n\
         👂 AUDIO ELEMENTS\n\
         - Sounds or songs related to {topic}\n\
         - Rhythm or rhyme to remember key facts\n\
         \n\
         🤸 MOVEMENT ACTIVITIES\n\
         - 2-3 physical activities\n\
         - Include \"Simon Says\" style games\n\
         \n\
         📝 SIMPLE EXPLANATIONS\n\
         - Key facts in 5 words or less\n\
         - Use comparisons to familiar things\n\
         \n\
         🎮 INTERACTIVE CHECKPOINTS\n\
         - \"Show me\" activities\n\
         - Yes/no understanding checks\n\
         \n\
         😴 SENSORY BREAKS\n\
         - When: every 5-7 minutes\n\
         - What: stretching, deep breathing, or quiet time\n\
         \n\
         Make everything super engaging and appropriate for {disabilities_text}!"
    )
}

/// Builds the comprehension-questions prompt.
#[must_use]
pub fn comprehension(text: &str) -> String {
    format!(
        "Create 3 simple comprehension questions about this text:\n\
         {text}\n\
         \n\
         Requirements:\n\
         - Use yes/no or multiple choice format\n\
         - Very simple language\n\
         - Test basic understanding only\n\
         - Include encouraging feedback options\n\
         \n\
         Format as:\n\
         Q1: [Question]\n\
         Options: a) ... b) ... c) ... d) ...\n\
         Correct: [letter]\n\
         \n\
         Make them appropriate for special needs students."
    )
}

/// Builds the practice-questions prompt.
///
/// The requested JSON shape must stay in sync with
/// [`crate::practice::PracticeQuestion`], which the response interpreter
/// decodes. Adaptation hints are appended per active disability.
#[must_use]
pub fn practice(topic: &str, difficulty: Difficulty, disabilities: &[Disability]) -> String {
    let mut adaptations = Vec::new();
    if disabilities.contains(&Disability::VisualImpairment) {
        adaptations.push("audio-friendly, no visual dependencies");
    }
    if disabilities.contains(&Disability::Dyslexia) {
        adaptations.push("simple language, short sentences");
    }
    if disabilities.contains(&Disability::Adhd) {
        adaptations.push("engaging, quick to answer");
    }
    let adaptations_text = if adaptations.is_empty() {
        "general special needs".to_string()
    } else {
        adaptations.join(", ")
    };

    format!(
        "Create 3 practice questions about: {topic}\n\
         Difficulty: {difficulty}\n\
         Adaptations needed: {adaptations_text}\n\
         \n\
         Return a JSON array with exactly 3 questions:\n\
         [{{\n\
         \"question\": \"Simple question text\",\n\
         \"type\": \"multiple_choice\",\n\
         \"options\": [\"Option A\", \"Option B\", \"Option C\", \"Option D\"],\n\
         \"correct_answer\": \"Option A\",\n\
         \"feedback\": \"Try again! Hint: ...\",\n\
         \"success_message\": \"Great job! You got it!\"\n\
         }}]\n\
         \n\
         Make questions fun, encouraging, and appropriate for special needs students."
    )
}
