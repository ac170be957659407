// copechat - Conversational mental-health support assistant
// Main entry point

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use copechat::assistant::{AssistantSettings, SupportAssistant};
use copechat::cli::{Conversation, Repl};
use copechat::config::{load_config, load_config_from, ClassifierMode, Config, ReplyFormat};
use copechat::crisis::detector_from_config;
use copechat::data::ReferenceData;
use copechat::errors::{data_file_missing_error, wrap_error_with_suggestion, DataError};
use copechat::providers::create_provider;
use copechat::server::SupportServer;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "copechat")]
#[command(about = "Mental-health support chat with local symptom matching", version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Config file (default: ~/.copechat/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the reference data files
    #[arg(long = "data-dir", global = true)]
    data_dir: Option<PathBuf>,

    /// Chat-completion model
    #[arg(long, global = true)]
    model: Option<String>,

    /// Resource classifier: keywords or llm
    #[arg(long, global = true, value_parser = parse_classifier)]
    classifier: Option<ClassifierMode>,

    /// Ask the model for a JSON reply with a resource_type
    #[arg(long = "json-reply", global = true)]
    json_reply: bool,

    /// Conversation file to resume (REPL mode)
    #[arg(long = "restore-session")]
    restore_session: Option<PathBuf>,
}

#[derive(Parser, Debug)]
enum Command {
    /// Send a single message and print the reply
    Query {
        /// Message text
        message: String,
    },
    /// Run the HTTP chat service
    Serve {
        /// Bind address (default from config: 127.0.0.1:8000)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Load the reference data and print what was found
    CheckData,
}

fn parse_classifier(value: &str) -> Result<ClassifierMode, String> {
    match value.to_lowercase().as_str() {
        "keywords" => Ok(ClassifierMode::Keywords),
        "llm" => Ok(ClassifierMode::Llm),
        other => Err(format!("unknown classifier '{}' (expected keywords or llm)", other)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let config = resolve_config(&args)?;

    match args.command {
        Some(Command::CheckData) => run_check_data(&config),
        Some(Command::Query { ref message }) => run_query(&config, message).await,
        Some(Command::Serve { ref bind }) => run_serve(config.clone(), bind.clone()).await,
        None => {
            // Piped input is handled as a single query
            if !io::stdin().is_terminal() {
                let mut input = String::new();
                io::stdin().read_to_string(&mut input)?;
                if input.trim().is_empty() {
                    return Ok(());
                }
                return run_query(&config, input.trim()).await;
            }
            run_repl(&config, args.restore_session.as_deref()).await
        }
    }
}

/// Logs go to stderr so chat output on stdout stays clean
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("copechat=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    // Bridge log crate → tracing (for dependencies using log crate)
    tracing_log::LogTracer::init().ok();
}

/// Config file and environment, then command-line flags on top
fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    if let Some(data_dir) = &args.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(classifier) = args.classifier {
        config.classifier = classifier;
    }
    if args.json_reply {
        config.reply_format = ReplyFormat::Json;
    }

    Ok(config)
}

fn load_reference_data(config: &Config) -> Result<Arc<ReferenceData>> {
    match ReferenceData::load(&config.data_dir) {
        Ok(data) => Ok(Arc::new(data)),
        Err(DataError::Missing { path }) => Err(anyhow!(data_file_missing_error(
            &path.display().to_string(),
            "Reference data file"
        ))),
        Err(e) => {
            let suggestion = format!("Check {} for syntax errors", e.path().display());
            Err(anyhow!(wrap_error_with_suggestion(&e, &suggestion)))
                .context("Failed to load reference data")
        }
    }
}

fn build_assistant(config: &Config) -> Result<SupportAssistant> {
    let data = load_reference_data(config)?;
    let detector = detector_from_config(config)?;
    let provider = create_provider(config)?;

    Ok(SupportAssistant::new(
        data,
        detector,
        provider,
        AssistantSettings::from(config),
    ))
}

async fn run_repl(config: &Config, restore_session: Option<&Path>) -> Result<()> {
    let assistant = build_assistant(config)?;

    let conversation = match restore_session {
        Some(path) => {
            let conversation = Conversation::load(path, config.history.max_messages)?;
            tracing::info!(
                messages = conversation.message_count(),
                "Restored conversation from {}",
                path.display()
            );
            conversation
        }
        None => Conversation::with_limit(config.history.max_messages),
    };

    Repl::new(assistant, conversation).run().await
}

async fn run_query(config: &Config, message: &str) -> Result<()> {
    let assistant = build_assistant(config)?;
    let mut conversation = Conversation::with_limit(config.history.max_messages);

    let turn = assistant.respond(&mut conversation, message).await?;
    println!("{}", turn.rendered);

    Ok(())
}

async fn run_serve(mut config: Config, bind: Option<String>) -> Result<()> {
    if let Some(bind) = bind {
        config.server.bind_address = bind;
    }

    let assistant = build_assistant(&config)?;
    let server = SupportServer::new(assistant, config.server.clone(), config.history.max_messages);

    server.serve().await
}

fn run_check_data(config: &Config) -> Result<()> {
    let data = load_reference_data(config)?;
    let hotlines = data.resources.iter().filter(|r| r.kind == "hotline").count();
    let warmlines = data.resources.iter().filter(|r| r.kind == "warmline").count();

    println!("Data directory: {}", config.data_dir.display());
    println!("  Ontology symptoms:   {}", data.ontology.len());
    println!("  Known symptom terms: {}", data.symptom_list().len());
    println!("  Coping skills:       {}", data.coping_skills.len());
    println!("  Glossary terms:      {}", data.glossary.len());
    println!(
        "  Resources:           {} ({} hotline, {} warmline)",
        data.resources.len(),
        hotlines,
        warmlines
    );

    Ok(())
}
