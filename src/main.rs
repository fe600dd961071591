//! Subrelay - Subtitle and Text Translation Relay
//!
//! Command-line entry point: translates SRT files and text through the
//! configured translation backends.

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use subrelay::cli::{Args, Commands};
use subrelay::config::Config;
use subrelay::handler::RequestHandler;
use subrelay::job::Upload;
use subrelay::language;
use subrelay::preferences::InMemoryPreferences;
use subrelay::progress::{ConsoleReporter, LogReporter, ProgressReporter};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    setup_logging(args.verbose)?;
    info!("Starting Subrelay");

    match args.command {
        Commands::Languages => {
            println!("\nSupported languages ({}):", language::LANGUAGES.len());
            println!("{:<8} {:<8} {:<24}", "Command", "Code", "Name");
            println!("{}", "-".repeat(42));
            for entry in language::LANGUAGES {
                println!("{:<8} {:<8} {:<24}", entry.command, entry.code, entry.name);
            }
        }
        Commands::InitConfig { path, force } => {
            if path.exists() && !force {
                anyhow::bail!("{} already exists, use --force to overwrite", path.display());
            }
            Config::default().save_to_file(&path)?;
            println!("Wrote default configuration to {}", path.display());
        }
        Commands::Text { text, lang } => {
            let handler = build_handler(args.config.as_deref())?;
            select_language(&handler, &args.user, lang.as_deref()).await?;

            match handler.translate_message(&args.user, &text).await {
                Ok(translated) => println!("{}", translated),
                Err(e) => anyhow::bail!(RequestHandler::user_message(&e)),
            }
        }
        Commands::File {
            input,
            lang,
            output_dir,
            quiet,
        } => {
            let handler = build_handler(args.config.as_deref())?;
            select_language(&handler, &args.user, lang.as_deref()).await?;

            let output_dir = match output_dir {
                Some(dir) => dir,
                None => input
                    .parent()
                    .map(|parent| parent.to_path_buf())
                    .unwrap_or_default(),
            };

            let upload = Upload::from_path(&input).await?;
            let reporter: Box<dyn ProgressReporter> = if quiet {
                Box::new(LogReporter)
            } else {
                Box::new(ConsoleReporter::new())
            };

            match handler
                .translate_document(&args.user, &upload, reporter.as_ref())
                .await
            {
                Ok(document) => {
                    let saved = document.save_to(&output_dir).await?;
                    println!("Saved {}", saved.display());
                }
                // Already shown through the reporter's Failed event
                Err(_) => return Ok(ExitCode::FAILURE),
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn build_handler(config_path: Option<&std::path::Path>) -> Result<RequestHandler> {
    let config = Config::load(config_path)?;
    let preferences = Arc::new(InMemoryPreferences::new());
    Ok(RequestHandler::from_config(&config, preferences)?)
}

async fn select_language(handler: &RequestHandler, user: &str, lang: Option<&str>) -> Result<()> {
    if let Some(command) = lang {
        if let Err(e) = handler.select_language(user, command).await {
            anyhow::bail!(RequestHandler::user_message(&e));
        }
    }
    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = std::env::current_dir()?.join(".subrelay").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "subrelay.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(_guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(verbose)
        .with_line_number(verbose);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(
        "Logging initialized - console: {}, file: {}",
        log_level,
        log_dir.join("subrelay.log").display()
    );

    Ok(())
}
