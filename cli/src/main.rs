//! CLI entrypoint for consilium
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod commands;
mod observer;
mod output;

use anyhow::{anyhow, bail, Result};
use clap::Parser;
use commands::{Cli, Command};
use consilium_application::{
    ChatRequest, ContinueChatUseCase, CouncilGateway, ReplayConversationUseCase,
    RunCouncilUseCase, RunRequest,
};
use consilium_domain::{ConversationId, DeliberationSession, Model, RunStrategy};
use consilium_infrastructure::{ConfigLoader, FileConfig, HttpCouncilGateway};
use observer::ConsoleObserver;
use output::ConsoleRenderer;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("failed to load configuration: {e}"))?
    };
    config.validate()?;

    info!("Starting consilium");

    // === Dependency Injection ===
    let gateway = Arc::new(HttpCouncilGateway::new(
        &config.server.base_url,
        config.server.api_token.clone(),
    ));

    match cli.command {
        Command::Run {
            prompt,
            model,
            chairman,
            strategy,
            max_iterations,
        } => {
            let members = resolve_members(model, &config)?;
            let chairman = resolve_chairman(chairman, &config);
            let strategy: RunStrategy = match strategy {
                Some(s) => s.parse().map_err(|e: String| anyhow!(e))?,
                None => config.council.parse_strategy()?,
            };

            let request = RunRequest::new(prompt, members, chairman)
                .with_strategy(strategy)
                .with_max_iterations(max_iterations.unwrap_or(config.council.max_iterations));

            let use_case = RunCouncilUseCase::new(gateway);
            let session = if cli.quiet {
                use_case.execute(request).await?
            } else {
                let observer = ConsoleObserver::new();
                let session = use_case.execute_with_observer(request, &observer).await;
                observer.finish();
                session?
            };

            finish(&session);
            println!("{}", ConsoleRenderer::render_session(&session));
        }

        Command::Chat {
            prompt,
            conversation,
            model,
            chairman,
            attachments,
        } => {
            let members = resolve_members(model, &config)?;
            let chairman = resolve_chairman(chairman, &config);

            let mut request = ChatRequest::new(prompt, members, chairman)
                .with_attachments(attachments);
            if let Some(id) = conversation {
                request = request.continuing(ConversationId(id));
            }

            let use_case = ContinueChatUseCase::new(gateway);
            let session = if cli.quiet {
                use_case.execute(request).await?
            } else {
                let observer = ConsoleObserver::new();
                let session = use_case.execute_with_observer(request, &observer).await;
                observer.finish();
                session?
            };

            finish(&session);
            println!("{}", ConsoleRenderer::render_turns(session.log()));
            if let Some(id) = session.conversation_id() {
                println!("(continue with: consilium chat --conversation {id} \"...\")");
            }
        }

        Command::History { id: Some(id) } => {
            let use_case = ReplayConversationUseCase::new(gateway);
            let replayed = use_case.execute(ConversationId(id)).await?;
            println!(
                "{}",
                ConsoleRenderer::render_replay(&replayed.summary, &replayed.log)
            );
        }

        Command::History { id: None } => {
            let rows = gateway.list_conversations().await?;
            println!("{}", ConsoleRenderer::render_history(&rows));
        }

        Command::Models => {
            let models = gateway.available_models().await?;
            for model in models {
                println!("{model}");
            }
        }
    }

    Ok(())
}

/// CLI-supplied models win over configuration; an empty roster is an error.
fn resolve_members(flags: Vec<String>, config: &FileConfig) -> Result<Vec<Model>> {
    let names = if flags.is_empty() {
        config.council.members.clone()
    } else {
        flags
    };
    if names.is_empty() {
        bail!("No council members configured. Use -m/--model or set council.members in consilium.toml.");
    }
    Ok(names.into_iter().map(Model::new).collect())
}

fn resolve_chairman(flag: Option<String>, config: &FileConfig) -> Model {
    Model::new(flag.unwrap_or_else(|| config.council.chairman.clone()))
}

/// Resolve the session's terminal contract for the process exit code.
fn finish(session: &DeliberationSession) {
    if let Some(error) = session.error() {
        eprintln!("{}", ConsoleRenderer::render_error(error));
        std::process::exit(1);
    }
}
