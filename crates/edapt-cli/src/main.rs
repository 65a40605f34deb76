//! EdAPT CLI
//!
//! Main entry point for the learning assistant: serves the HTTP API for
//! the browser front end and offers terminal equivalents of the main
//! learning activities.

use std::io::Write as _;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use edapt_generate::OllamaClient;
use edapt_report::{LearningReport, MarkdownGenerator};
use edapt_session::{
    attention_check, check_answer, create_router, ActivityKind, AppState, Assistant, Config,
    Difficulty, Disability, GoalLog, LearningGoal, ProfileStore, ProgressEntry, ProgressLog,
    QuestionKind, ReadingSpeed, StudentProfile, VisualPreference,
};

/// Default port for the HTTP API server.
const DEFAULT_PORT: u16 = 3000;

/// Minimum quiz percentage for the celebration message.
const CELEBRATION_THRESHOLD: f64 = 70.0;

/// EdAPT - Learning Assistant for Students with Disabilities
///
/// Adapts learning content to a student's accessibility profile using a
/// locally hosted model runtime. All records stay on this machine.
#[derive(Parser, Debug)]
#[command(name = "edapt")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (default: edapt.json in current directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP API server for the browser front end
    Serve {
        /// Port for the HTTP API server
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },

    /// Adapt a text for the student's profile
    Adapt {
        /// The text to adapt
        text: String,

        /// Use the general simplification template regardless of profile
        #[arg(long)]
        general: bool,
    },

    /// Generate comprehension questions for a text
    Comprehension {
        /// The text to question
        text: String,
    },

    /// Build a multi-sensory lesson plan for a topic
    Lesson {
        /// The topic to teach
        topic: String,
    },

    /// Run an interactive practice quiz
    Practice {
        /// The topic to practice
        topic: String,

        /// Difficulty level: beginner, easy, medium, or challenging
        #[arg(short, long, default_value = "easy")]
        difficulty: Difficulty,
    },

    /// Show progress summary, insights, and recommendations
    Progress {
        /// Write Markdown and JSON reports to this directory
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<String>,
    },

    /// Show or update the student profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Set or list learning goals
    Goal {
        #[command(subcommand)]
        action: GoalAction,
    },
}

#[derive(Subcommand, Debug)]
enum ProfileAction {
    /// Print the current profile
    Show,

    /// Update profile fields; unspecified fields keep their values
    Set {
        /// Comma-separated disability tags (e.g. dyslexia,adhd); pass an
        /// empty string to clear
        #[arg(long, value_name = "TAGS")]
        disabilities: Option<String>,

        /// Reading speed: very_slow, slow, medium, or fast
        #[arg(long)]
        reading_speed: Option<ReadingSpeed>,

        /// Attention span in minutes
        #[arg(long)]
        attention_span: Option<u32>,

        /// Whether audio support is preferred (true or false)
        #[arg(long)]
        audio_preference: Option<bool>,

        /// Visual preference: normal, high_contrast, dark_mode, or
        /// dyslexia_friendly
        #[arg(long)]
        visual_preference: Option<VisualPreference>,

        /// Free-form learning style label
        #[arg(long)]
        learning_style: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum GoalAction {
    /// Set a new learning goal
    Set {
        /// The goal text
        goal: String,
    },

    /// List all learning goals
    List,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Serve { port } => serve(config, port).await,
        Command::Adapt { text, general } => adapt(config, &text, general).await,
        Command::Comprehension { text } => comprehension(config, &text).await,
        Command::Lesson { topic } => lesson(config, &topic).await,
        Command::Practice { topic, difficulty } => practice(config, &topic, difficulty).await,
        Command::Progress { output_dir } => progress(config, output_dir.as_deref()).await,
        Command::Profile { action } => profile(config, action).await,
        Command::Goal { action } => goal(config, action).await,
    }
}

/// Loads configuration from the specified path or default location.
fn load_config(config_path: Option<&str>) -> anyhow::Result<Config> {
    match config_path {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Config::load_from_file(path).map_err(|e| anyhow::anyhow!("{e}"))
        }
        None => Config::load().map_err(|e| anyhow::anyhow!("{e}")),
    }
}

/// Creates the generation-backed assistant from the configuration.
fn assistant(config: &Config) -> anyhow::Result<Assistant<OllamaClient>> {
    let client = OllamaClient::from_config(config).map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(Assistant::new(client))
}

// ============================================================================
// Serve
// ============================================================================

async fn serve(config: Config, port: u16) -> anyhow::Result<()> {
    let client = OllamaClient::from_config(&config).map_err(|e| anyhow::anyhow!("{e}"))?;
    let state = AppState::new(config, client);

    println!("Configuration loaded:");
    println!("  Data directory: {}", state.config.data_dir);
    println!("  Model runtime: {}", state.config.endpoint);
    println!("  Fast model: {}", state.config.models.fast);
    println!("  Accurate model: {}", state.config.models.accurate);
    println!("  Vision model: {}", state.config.models.vision);

    let router = create_router(state);

    let addr: SocketAddr = ([127, 0, 0, 1], port).into();
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to bind to {addr}: {e}\n\nSuggestion: Try a different port with --port"
        )
    })?;

    println!();
    println!("EdAPT API server running on http://{addr}");
    println!("Press Ctrl+C to stop");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!();
    println!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Received Ctrl+C, shutting down");
    }
}

// ============================================================================
// Content Commands
// ============================================================================

async fn adapt(config: Config, text: &str, general: bool) -> anyhow::Result<()> {
    let assistant = assistant(&config)?;
    let profile_store = ProfileStore::new(config.profile_path());
    let profile = profile_store.load().await;

    let started = Instant::now();
    let content = if general {
        assistant.simplify(text).await
    } else {
        assistant.adapt(text, &profile).await
    }
    .map_err(|e| anyhow::anyhow!("{e}"))?;

    println!("{content}");

    record_progress(
        &config,
        &profile,
        "Reading Practice",
        started.elapsed().as_secs_f64() / 60.0,
        None,
        ActivityKind::Reading,
    )
    .await;
    Ok(())
}

async fn comprehension(config: Config, text: &str) -> anyhow::Result<()> {
    let assistant = assistant(&config)?;
    let content = assistant
        .comprehension(text)
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    println!("{content}");
    Ok(())
}

async fn lesson(config: Config, topic: &str) -> anyhow::Result<()> {
    let assistant = assistant(&config)?;
    let profile_store = ProfileStore::new(config.profile_path());
    let profile = profile_store.load().await;

    println!("Building a lesson about {topic}...");
    let started = Instant::now();
    let content = assistant
        .lesson(topic, &profile)
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    println!();
    println!("{content}");

    record_progress(
        &config,
        &profile,
        topic,
        started.elapsed().as_secs_f64() / 60.0,
        None,
        ActivityKind::Lesson,
    )
    .await;
    Ok(())
}

// ============================================================================
// Practice Quiz
// ============================================================================

async fn practice(config: Config, topic: &str, difficulty: Difficulty) -> anyhow::Result<()> {
    let assistant = assistant(&config)?;
    let profile_store = ProfileStore::new(config.profile_path());
    let profile = profile_store.load().await;

    println!("Creating practice questions about {topic}...");
    let questions = assistant.practice(topic, difficulty, &profile).await;

    let started = Instant::now();
    let mut correct_count = 0usize;

    for (index, question) in questions.iter().enumerate() {
        println!();
        println!("Question {} of {}", index + 1, questions.len());
        println!("{}", question.question);

        let options: Vec<String> = if question.kind == QuestionKind::TrueFalse {
            vec!["✅ True".to_string(), "❌ False".to_string()]
        } else {
            question.options.clone()
        };
        for (n, option) in options.iter().enumerate() {
            println!("  {}) {option}", n + 1);
        }

        let answer = read_answer(&options)?;
        if check_answer(&answer, &question.correct_answer) {
            println!("{}", question.success_message);
            correct_count += 1;
        } else {
            println!("{}", question.feedback);
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let percentage = if questions.is_empty() {
        0.0
    } else {
        correct_count as f64 / questions.len() as f64 * 100.0
    };

    println!();
    println!("🎉 Practice Complete!");
    println!(
        "Your Score: {correct_count}/{} ({percentage:.0}%)",
        questions.len()
    );
    if percentage >= CELEBRATION_THRESHOLD {
        println!("🌟 Amazing work! You're a star learner!");
    } else {
        println!("💪 Good effort! Practice makes perfect!");
    }

    record_progress(
        &config,
        &profile,
        &format!("Quiz: {topic}"),
        5.0,
        Some(percentage),
        ActivityKind::Quiz,
    )
    .await;

    // Quiz sessions can run long; honor the attention span setting
    let check = attention_check(&profile, started.elapsed().as_secs());
    if check.need_break {
        println!();
        if let Some(suggestion) = check.suggestion {
            println!("{suggestion}");
        }
        if let Some(activity) = check.activity {
            println!("Try this: {activity}");
        }
    }

    Ok(())
}

/// Reads an answer from stdin, accepting an option number or free text.
fn read_answer(options: &[String]) -> anyhow::Result<String> {
    print!("Your answer: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let trimmed = line.trim();

    if let Ok(number) = trimmed.parse::<usize>() {
        if number >= 1 && number <= options.len() {
            return Ok(options[number - 1].clone());
        }
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// Progress
// ============================================================================

async fn progress(config: Config, output_dir: Option<&str>) -> anyhow::Result<()> {
    let progress_log = ProgressLog::new(config.progress_path());
    let profile_store = ProfileStore::new(config.profile_path());

    let history = progress_log
        .load_history()
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    let profile = profile_store.load().await;

    let report = LearningReport::build(&history, &profile);
    let markdown = MarkdownGenerator::new(&report).generate();
    println!("{markdown}");

    if let Some(dir) = output_dir {
        let dir = PathBuf::from(dir);
        std::fs::create_dir_all(&dir)?;

        let md_path = dir.join("learning-report.md");
        std::fs::write(&md_path, &markdown)?;
        println!("Markdown report: {}", md_path.display());

        let json_path = dir.join("learning-report.json");
        std::fs::write(&json_path, report.to_json_pretty()?)?;
        println!("JSON report: {}", json_path.display());
    }

    Ok(())
}

// ============================================================================
// Profile
// ============================================================================

async fn profile(config: Config, action: ProfileAction) -> anyhow::Result<()> {
    let profile_store = ProfileStore::new(config.profile_path());

    match action {
        ProfileAction::Show => {
            let profile = profile_store.load().await;
            print_profile(&profile);
        }
        ProfileAction::Set {
            disabilities,
            reading_speed,
            attention_span,
            audio_preference,
            visual_preference,
            learning_style,
        } => {
            let mut profile = profile_store.load().await;

            if let Some(tags) = disabilities {
                profile.disabilities = parse_disabilities(&tags)?;
            }
            if let Some(speed) = reading_speed {
                profile.reading_speed = speed;
            }
            if let Some(span) = attention_span {
                profile.attention_span = span;
            }
            if let Some(audio) = audio_preference {
                profile.audio_preference = audio;
            }
            if let Some(visual) = visual_preference {
                profile.visual_preference = visual;
            }
            if let Some(style) = learning_style {
                profile.learning_style = style;
            }

            profile_store
                .save(&profile)
                .await
                .map_err(|e| anyhow::anyhow!("{e}"))?;
            println!("Profile saved");
            print_profile(&profile);
        }
    }

    Ok(())
}

/// Parses a comma-separated disability tag list; empty input clears.
fn parse_disabilities(tags: &str) -> anyhow::Result<Vec<Disability>> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<Disability>().map_err(|e| {
                anyhow::anyhow!("{e}\n\nSuggestion: Valid tags are dyslexia, adhd, autism, visual_impairment, hearing_impairment, motor_difficulties")
            })
        })
        .collect()
}

fn print_profile(profile: &StudentProfile) {
    println!("Student profile:");
    if profile.disabilities.is_empty() {
        println!("  Disabilities: none");
    } else {
        let names: Vec<&str> = profile
            .disabilities
            .iter()
            .map(Disability::display_name)
            .collect();
        println!("  Disabilities: {}", names.join(", "));
    }
    println!("  Reading speed: {:?}", profile.reading_speed);
    println!("  Attention span: {} minutes", profile.attention_span);
    println!("  Audio preference: {}", profile.audio_preference);
    println!("  Visual preference: {:?}", profile.visual_preference);
    println!("  Learning style: {}", profile.learning_style);
}

// ============================================================================
// Goals
// ============================================================================

async fn goal(config: Config, action: GoalAction) -> anyhow::Result<()> {
    let goal_log = GoalLog::new(config.goals_path());

    match action {
        GoalAction::Set { goal } => {
            if goal.trim().is_empty() {
                anyhow::bail!("Goal must not be empty");
            }
            let goal = LearningGoal::new(goal);
            goal_log
                .append(&goal)
                .await
                .map_err(|e| anyhow::anyhow!("{e}"))?;
            println!("🎯 Goal set!");
        }
        GoalAction::List => {
            let goals = goal_log.load_all().await.map_err(|e| anyhow::anyhow!("{e}"))?;
            if goals.is_empty() {
                println!("No learning goals yet");
            } else {
                for goal in goals {
                    println!(
                        "  [{}] {} (set {})",
                        format!("{:?}", goal.status).to_lowercase(),
                        goal.goal,
                        goal.created.format("%Y-%m-%d")
                    );
                }
            }
        }
    }

    Ok(())
}

// ============================================================================
// Progress Recording
// ============================================================================

/// Appends a progress entry, logging instead of failing on error.
///
/// Recording is best-effort from the CLI: a failed append must not turn
/// a successful learning activity into an error.
async fn record_progress(
    config: &Config,
    profile: &StudentProfile,
    topic: &str,
    minutes: f64,
    quiz_score: Option<f64>,
    activity_type: ActivityKind,
) {
    let progress_log = ProgressLog::new(config.progress_path());
    let entry = ProgressEntry::new(
        topic,
        minutes,
        quiz_score,
        activity_type,
        profile.disabilities.clone(),
    );
    if let Err(e) = progress_log.append(&entry).await {
        tracing::warn!(error = %e, "Failed to record progress");
    }
}
