//! CLI entrypoint for llm-council
//!
//! This is the main binary that wires together all layers using
//! dependency injection: configuration becomes the backend registry, the
//! registry becomes the gateway behind the council use case, and the
//! finished result is printed and optionally persisted.

mod progress;

use anyhow::{Context, Result, bail};
use clap::Parser;
use council_application::{NoProgress, ResultSink, RunCouncilInput, RunCouncilUseCase};
use council_domain::{ImagePayload, TaskPrompts};
use council_infrastructure::{
    ConfigLoader, HttpImageSource, JsonConversationStore, RegistryGateway,
};
use progress::ConsoleProgress;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "llm-council", version, about = "Multi-backend deliberation engine")]
struct Cli {
    /// The task query sent to the council
    query: Option<String>,

    /// Path to a local image file to attach
    #[arg(long)]
    image: Option<PathBuf>,

    /// Public URL of an image to attach
    #[arg(long)]
    image_url: Option<String>,

    /// Task family to run (overrides the config file)
    #[arg(long)]
    family: Option<String>,

    /// Explicit config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Conversation id to persist the run under
    #[arg(long)]
    conversation: Option<String>,

    /// List stored conversations and exit
    #[arg(long)]
    list: bool,

    /// Print the full result as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = ConfigLoader::load(cli.config.as_ref())
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))?;

    let store = JsonConversationStore::new(&config.storage.data_dir);

    if cli.list {
        for summary in store.list_conversations()? {
            println!(
                "{}  {}  [{} messages]  {}",
                summary.created_at, summary.id, summary.message_count, summary.title
            );
        }
        return Ok(());
    }

    let Some(query) = cli.query.clone() else {
        bail!("A task query is required (or use --list).");
    };

    // Resolve the task family
    let family_name = cli
        .family
        .clone()
        .unwrap_or_else(|| config.council.family.clone());
    let Some(prompts) = council_domain::family_by_name(&family_name) else {
        bail!("Unknown task family: {family_name}");
    };
    let prompts: Arc<dyn TaskPrompts> = Arc::from(prompts);

    // === Dependency Injection ===
    let settings = config.to_settings()?;
    settings.validate()?;
    let descriptors = config.to_descriptors()?;
    let image_source = Arc::new(HttpImageSource::new());
    let gateway = Arc::new(RegistryGateway::from_descriptors(
        descriptors,
        Some(image_source),
    ));

    info!(family = %family_name, "Starting llm-council");

    let mut input = RunCouncilInput::new(query.clone());
    if let Some(image) = build_image_payload(cli.image.as_deref(), cli.image_url.clone())? {
        input = input.with_image(image);
    }

    let use_case = RunCouncilUseCase::new(gateway, prompts, settings);

    let result = if cli.quiet {
        use_case
            .execute_with_progress(input, &NoProgress)
            .await
    } else {
        use_case
            .execute_with_progress(input, &ConsoleProgress)
            .await
    };

    // Persist under the requested conversation, creating it on first use.
    if let Some(conversation_id) = &cli.conversation {
        if store.get_conversation(conversation_id)?.is_none() {
            store.create_conversation(conversation_id)?;
        }
        store.add_user_message(conversation_id, &query, cli.image_url.as_deref())?;
        store.persist(conversation_id, &result).await?;
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if let Some(selection) = &result.final_result {
        println!("{}", selection.response);
        if let Some(reason) = &selection.fallback {
            eprintln!("(fallback: {reason})");
        }
    } else if let Some(error) = &result.error {
        bail!("{error}");
    }

    Ok(())
}

/// Assemble the image payload from a local file and/or a reference URL.
fn build_image_payload(
    path: Option<&Path>,
    url: Option<String>,
) -> Result<Option<ImagePayload>> {
    let payload = match (path, url) {
        (Some(path), url) => {
            let data = std::fs::read(path)
                .with_context(|| format!("Failed to read image {}", path.display()))?;
            let mut image = ImagePayload::from_bytes(data, mime_for_path(path));
            if let Some(url) = url {
                image = image.with_url(url);
            }
            Some(image)
        }
        (None, Some(url)) => Some(ImagePayload::from_url(url)),
        (None, None) => None,
    };
    Ok(payload)
}

/// MIME type from the file extension, JPEG by default.
fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}
