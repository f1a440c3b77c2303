// src/main.rs
// Homework Copilot CLI

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use copilot::config::{CopilotConfig, EnvConfig, LlmSettings};
use copilot::curriculum::{CurriculumSource, NoCurriculum, StaticCurriculum};
use copilot::llm::{ModelRegistry, Orchestrator, ProviderFactory};
use copilot::policy::{GlobalPreferences, compile_policy};
use copilot::state::{
    AbstractionLevel, FeedbackEvent, FeedbackKind, HintDepth, InMemoryTopicStore, LearnerId,
    StateReducer, TopicState, subject_of,
};
use copilot::tutor::{AnalyzeRequest, Tutor};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "copilot")]
#[command(about = "Homework analysis with adaptive tutoring policy")]
#[command(version)]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Learner-wide settings shared by `prompt` and `analyze`
#[derive(clap::Args)]
struct PreferenceArgs {
    /// Grade code (year_1 .. year_8)
    #[arg(long, default_value = "year_3")]
    grade: String,

    /// Curriculum authority code
    #[arg(long, default_value = "NSW")]
    curriculum: String,

    /// Response language ("zh" for Chinese)
    #[arg(long, default_value = "en")]
    language: String,

    /// File holding curriculum text to embed
    #[arg(long)]
    context_file: Option<PathBuf>,
}

impl PreferenceArgs {
    fn preferences(&self) -> GlobalPreferences {
        GlobalPreferences {
            grade_alignment: self.grade.clone(),
            curriculum_code: self.curriculum.clone(),
            language_preference: self.language.clone(),
            ..Default::default()
        }
    }

    fn curriculum_context(&self) -> Result<Option<String>> {
        self.context_file
            .as_ref()
            .map(|path| {
                std::fs::read_to_string(path)
                    .with_context(|| format!("reading curriculum context {}", path.display()))
            })
            .transpose()
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List available models as JSON
    Models,

    /// Print the compiled system instructions
    Prompt {
        #[command(flatten)]
        prefs: PreferenceArgs,

        /// Topic mastery in [0, 1]
        #[arg(long)]
        mastery: Option<f64>,

        /// more_concrete, balanced or more_abstract
        #[arg(long)]
        abstraction: Option<String>,

        /// light_hints, moderate or step_by_step
        #[arg(long)]
        depth: Option<String>,
    },

    /// Analyze a homework image and print the structured result
    Analyze {
        /// Image file (JPEG, PNG, GIF or WEBP)
        image: PathBuf,

        /// Public model id (see `copilot models`)
        #[arg(short, long)]
        model: Option<String>,

        #[command(flatten)]
        prefs: PreferenceArgs,

        /// Per-call timeout override
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Replay feedback events from default state and print each result
    Simulate {
        /// Feedback kinds, e.g. too_advanced still_confused understood
        #[arg(required = true)]
        events: Vec<String>,

        /// Topic key the events apply to
        #[arg(long, default_value = "math.general.practice")]
        topic: String,
    },
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_prompt(
    prefs: &PreferenceArgs,
    mastery: Option<f64>,
    abstraction: Option<String>,
    depth: Option<String>,
) -> Result<()> {
    let overridden = mastery.is_some() || abstraction.is_some() || depth.is_some();
    let topic = if overridden {
        let mut state = TopicState::new(LearnerId::new(), "math", "math.general.practice");
        if let Some(m) = mastery {
            if !(0.0..=1.0).contains(&m) {
                bail!("mastery must be within [0, 1], got {m}");
            }
            state.mastery = m;
        }
        if let Some(a) = abstraction {
            state.preferred_abstraction = a
                .parse::<AbstractionLevel>()
                .with_context(|| format!("unknown abstraction level: {a}"))?;
        }
        if let Some(d) = depth {
            state.preferred_hint_depth = d
                .parse::<HintDepth>()
                .with_context(|| format!("unknown hint depth: {d}"))?;
        }
        Some(state)
    } else {
        None
    };

    let context = prefs.curriculum_context()?;
    println!(
        "{}",
        compile_policy(&prefs.preferences(), topic.as_ref(), context.as_deref())
    );
    Ok(())
}

async fn run_analyze(
    image: PathBuf,
    model: Option<String>,
    prefs: PreferenceArgs,
    timeout_secs: Option<u64>,
) -> Result<()> {
    let env = EnvConfig::load();
    let mut settings = LlmSettings::resolve(&CopilotConfig::load(), &env);
    if let Some(secs) = timeout_secs {
        settings.request_timeout = Duration::from_secs(secs);
    }

    if !env.api_keys.has_llm_provider() {
        bail!("No LLM provider configured. Set OPENAI_API_KEY (or unset COPILOT_DISABLE_LLM).");
    }

    let bytes = tokio::fs::read(&image)
        .await
        .with_context(|| format!("reading image {}", image.display()))?;

    let providers = ProviderFactory::from_api_keys(&env.api_keys, &settings);
    let orchestrator = Arc::new(Orchestrator::new(
        Arc::new(ModelRegistry::builtin()),
        providers,
        settings,
    ));

    let curriculum: Arc<dyn CurriculumSource> = match prefs.curriculum_context()? {
        Some(text) => Arc::new(StaticCurriculum::new().with_entry(
            prefs.curriculum.as_str(),
            prefs.grade.as_str(),
            text,
        )),
        None => Arc::new(NoCurriculum),
    };

    let tutor = Tutor::new(
        orchestrator,
        StateReducer::new(Arc::new(InMemoryTopicStore::new())),
        curriculum,
    );

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling analysis");
            on_interrupt.cancel();
        }
    });

    let mut request = AnalyzeRequest::new(LearnerId::new(), bytes, prefs.preferences());
    if let Some(model) = model {
        request = request.with_model(model);
    }

    let record = tutor.analyze(request, &cancel).await?;
    info!(topic = %record.topic_key, repaired = record.repaired, "Analysis complete");
    print_json(&record)
}

async fn run_simulate(events: Vec<String>, topic: String) -> Result<()> {
    let kinds = events
        .iter()
        .map(|e| {
            e.parse::<FeedbackKind>()
                .with_context(|| format!("unknown feedback kind: {e}"))
        })
        .collect::<Result<Vec<_>>>()?;

    let reducer = StateReducer::new(Arc::new(InMemoryTopicStore::new()));
    let learner = LearnerId::new();

    print_json(
        &reducer
            .get_or_create(learner, subject_of(&topic), &topic)
            .await?,
    )?;

    for kind in kinds {
        let state = reducer
            .process_feedback(&FeedbackEvent::new(learner, topic.as_str(), kind))
            .await?;
        println!("# {kind}");
        print_json(&state)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Some(home) = dirs::home_dir() {
        let _ = dotenvy::from_path(home.join(".copilot/.env"));
    }
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Models => print_json(&ModelRegistry::builtin().model_infos()),
        Commands::Prompt {
            prefs,
            mastery,
            abstraction,
            depth,
        } => run_prompt(&prefs, mastery, abstraction, depth),
        Commands::Analyze {
            image,
            model,
            prefs,
            timeout_secs,
        } => run_analyze(image, model, prefs, timeout_secs).await,
        Commands::Simulate { events, topic } => run_simulate(events, topic).await,
    }
}
