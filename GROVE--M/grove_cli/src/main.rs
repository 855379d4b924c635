use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use grove_voice::{
    AmbientContext, Clock, CreationRequest, FixedClock, InMemoryProjectDirectory,
    JsonlRecordStore, MemoryRecordStore, ProjectRef, RecordStore, SystemClock, UserId,
    VoiceClassifier, VoiceCommandRuntime, VoiceConfig, VoiceTelemetry,
};
use serde::Serialize;
use shared_event_bus::FileEventPublisher;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "grove", version, about = "Interpret Grove voice commands")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Prints the creation request for one transcript without saving it.
    Classify {
        transcript: String,
        #[command(flatten)]
        context: ContextArgs,
    },
    /// Classifies one transcript and appends it to the record file.
    Submit {
        transcript: String,
        #[command(flatten)]
        context: ContextArgs,
        /// JSON-lines record file; overrides `[storage] records_path`.
        #[arg(long)]
        records: Option<PathBuf>,
    },
    /// Classifies one transcript per line and prints JSON lines.
    Batch {
        #[arg(long)]
        input: PathBuf,
        #[command(flatten)]
        context: ContextArgs,
    },
}

#[derive(Args, Debug, Clone)]
struct ContextArgs {
    /// Id of the project open in the caller's view.
    #[arg(long, requires = "project_title")]
    project_id: Option<String>,
    /// Title of the open project.
    #[arg(long, requires = "project_id")]
    project_title: Option<String>,
    /// Acting user id.
    #[arg(long, default_value = "voice-user")]
    user: String,
    /// Pins "today" (YYYY-MM-DD) for relative dates.
    #[arg(long)]
    today: Option<NaiveDate>,
    /// JSON project list used to resolve spoken project names.
    #[arg(long)]
    projects: Option<PathBuf>,
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl ContextArgs {
    fn ambient(&self) -> AmbientContext {
        let user = UserId::new(self.user.clone());
        match (&self.project_id, &self.project_title) {
            (Some(id), Some(title)) => {
                AmbientContext::in_project(user, ProjectRef::new(id.clone(), title.clone()))
            }
            _ => AmbientContext::for_user(user),
        }
    }

    fn config(&self) -> Result<VoiceConfig> {
        match &self.config {
            Some(path) => VoiceConfig::load(path),
            None => Ok(VoiceConfig::default()),
        }
    }
}

#[derive(Debug, Serialize)]
struct BatchLine<'a> {
    line: usize,
    transcript: &'a str,
    request: CreationRequest,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let runtime = Runtime::new()?;
    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Classify {
            transcript,
            context,
        } => {
            let runtime = build_runtime(&context, &context.config()?, None)?;
            let request = runtime.preview(&transcript, &context.ambient()).await?;
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
        Commands::Submit {
            transcript,
            context,
            records,
        } => {
            let config = context.config()?;
            let records = records.unwrap_or_else(|| config.storage.records_path.clone());
            let store = JsonlRecordStore::new(&records)
                .with_context(|| format!("opening record file {}", records.display()))?;
            let runtime = build_runtime(&context, &config, Some(Arc::new(store)))?;
            let outcome = runtime.handle(&transcript, &context.ambient()).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Commands::Batch { input, context } => {
            let raw = fs::read_to_string(&input)
                .with_context(|| format!("reading transcripts {}", input.display()))?;
            let runtime = build_runtime(&context, &context.config()?, None)?;
            let ambient = context.ambient();
            for (index, transcript) in transcript_lines(&raw) {
                let request = runtime.preview(transcript, &ambient).await?;
                let line = BatchLine {
                    line: index + 1,
                    transcript,
                    request,
                };
                println!("{}", serde_json::to_string(&line)?);
            }
        }
    }
    Ok(())
}

/// Non-blank lines with their zero-based index.
fn transcript_lines(raw: &str) -> impl Iterator<Item = (usize, &str)> {
    raw.lines()
        .enumerate()
        .map(|(index, line)| (index, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

fn build_runtime(
    args: &ContextArgs,
    config: &VoiceConfig,
    store: Option<Arc<dyn RecordStore>>,
) -> Result<VoiceCommandRuntime> {
    let clock: Arc<dyn Clock> = match args.today {
        Some(date) => Arc::new(FixedClock(date)),
        None => Arc::new(SystemClock),
    };
    let mut builder = VoiceClassifier::builder()
        .clock(clock)
        .settings(config.classifier_settings());
    if let Some(path) = args
        .projects
        .clone()
        .or_else(|| config.storage.projects_path.clone())
    {
        builder = builder.directory(Arc::new(load_projects(&path)?));
    }
    let telemetry = build_telemetry(config)?;
    let classifier = builder.telemetry(telemetry.clone()).build();
    let store = store.unwrap_or_else(|| Arc::new(MemoryRecordStore::new()));
    Ok(VoiceCommandRuntime::new(classifier, store).with_telemetry(telemetry))
}

fn load_projects(path: &Path) -> Result<InMemoryProjectDirectory> {
    InMemoryProjectDirectory::from_json_file(path)
        .with_context(|| format!("loading projects {}", path.display()))
}

fn build_telemetry(config: &VoiceConfig) -> Result<VoiceTelemetry> {
    let mut builder = VoiceTelemetry::builder("grove").min_level(config.telemetry.min_level);
    if let Some(path) = &config.telemetry.log_path {
        builder = builder.log_path(path);
    }
    if let Some(path) = &config.telemetry.event_log {
        builder = builder.event_publisher(Arc::new(FileEventPublisher::new(path)?));
    }
    builder.build()
}
