// Main entry point
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;

use lingo::application::dispatch::{DispatchOptions, Dispatcher};
use lingo::domain::model::validate_input;
use lingo::domain::model::TranslationResult;
use lingo::infrastructure::config::{self, load_config, Logging};
use lingo::infrastructure::engine::{default_preload_pairs, NullLoader};
use lingo::interfaces::cli::Cli;
use lingo::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup graceful shutdown handler
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for shutdown signal: {}", e);
        } else {
            let _ = shutdown_tx.send(());
        }
    });

    let cli = Cli::parse();
    let config = load_config()?;

    if config.logging.enable {
        init_logging(&config.logging)?;
    }

    if cli.generate_config {
        config::generate_config_sample()?;
        return Ok(());
    }

    let state = AppState::new(config.clone()).await?;

    if cli.clear_cache {
        let cleared = state.cache.clear_translations().await;
        println!("Cleared {} cached translations", cleared);
        return Ok(());
    }

    if cli.history {
        print_history(&state).await?;
        return Ok(());
    }

    let mut options = DispatchOptions::from_config(&config);
    if cli.offline {
        options.offline_mode = true;
    }
    options.bypass_cache = cli.nocache;

    let dispatcher = Dispatcher::new(
        state.cache.clone(),
        Arc::new(NullLoader),
        state.http_client.clone(),
        options,
    );

    if cli.status {
        print_status(&dispatcher).await?;
        return Ok(());
    }

    if cli.preload {
        // Use select! to allow interrupting a long preload
        tokio::select! {
            _ = preload_models(&dispatcher) => {}
            _ = shutdown_rx => {
                eprintln!("Preload interrupted");
                return Ok(());
            }
        }
        return Ok(());
    }

    // Handle translation
    if cli.text.is_empty() {
        eprintln!("{}", "Please provide text to translate".red());
        std::process::exit(1);
    }

    let Some(target) = cli.to.as_deref() else {
        eprintln!("{}", "Please specify a target language with --to".red());
        std::process::exit(1);
    };

    let text = cli.text.join(" ");

    let errors = validate_input(&text, &cli.from, target);
    if !errors.is_empty() {
        for error in &errors {
            eprintln!("{}", error.red());
        }
        std::process::exit(1);
    }

    match dispatcher.smart_translate(&text, &cli.from, target).await {
        Some(result) => {
            if let Some(history) = &state.history {
                if let Err(e) = history.record(&text, target, &result).await {
                    tracing::warn!("history write failed: {}", e);
                }
            }

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&result, target);
            }
        }
        None => {
            eprintln!("{}", "Translation failed: all backends exhausted".red());
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Initialize logging with path and level configuration
fn init_logging(logging: &Logging) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let level = match logging.level.as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARN" => "warn",
        "ERROR" => "error",
        _ => "warn",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if let Some(path) = &logging.path {
        if !path.is_empty() {
            // Log to file
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .init();
            return Ok(());
        }
    }

    // Log to stderr (default)
    tracing_subscriber::fmt().with_env_filter(filter).init();

    Ok(())
}

fn print_result(result: &TranslationResult, target: &str) {
    let source_indicator = if result.cached {
        "[cached]"
    } else if result.offline {
        "[offline]"
    } else {
        "[online]"
    };

    println!(
        "{} {}",
        format!("{} -> {}", result.source_lang, target).cyan(),
        source_indicator.cyan()
    );
    println!("{}", result.translation.green());
    println!(
        "  {} {}  {} {:.2}  {} {:.3}s",
        "method:".dimmed(),
        result.method,
        "confidence:".dimmed(),
        result.confidence,
        "time:".dimmed(),
        result.time
    );
    if result.pivot {
        println!("  {}", "via English pivot".yellow());
    }
    if let Some(error) = &result.error {
        println!("  {}", error.yellow());
    }
}

async fn preload_models(dispatcher: &Dispatcher) {
    use indicatif::{ProgressBar, ProgressStyle};

    let pairs = default_preload_pairs();
    let pb = ProgressBar::new(pairs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut loaded = 0usize;
    let mut failed = 0usize;

    for pair in &pairs {
        pb.set_message(format!("{} -> {}", pair.0, pair.1));
        let report = dispatcher.preload_models(std::slice::from_ref(pair)).await;
        loaded += report.loaded.len();
        failed += report.errors.len();
        pb.inc(1);
    }

    pb.finish_and_clear();
    println!("Preloaded {} models, {} failed", loaded, failed);
}

async fn print_status(dispatcher: &Dispatcher) -> anyhow::Result<()> {
    let status = dispatcher.status().await;

    println!("{}", "lingo Status".green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "Offline mode: {}",
        if status.offline_mode { "on" } else { "off" }
    );
    println!(
        "Backends: local models {}, google {}, mymemory {}",
        enabled(status.use_ai_models),
        enabled(status.use_google),
        enabled(status.use_mymemory)
    );
    println!(
        "Local pairs: {} ({} languages)",
        status.local_pairs, status.local_languages
    );
    println!("Models loaded: {}", status.cache.models_cached);
    println!(
        "Disk cache: {} entries ({} bytes)",
        status.cache.disk_entries, status.cache.disk_bytes
    );
    if status.cache.redis_connected {
        println!(
            "Redis: connected ({} entries)",
            status
                .cache
                .redis_entries
                .map(|n| n.to_string())
                .unwrap_or_else(|| "?".to_string())
        );
    } else {
        println!("Redis: not connected");
    }

    Ok(())
}

fn enabled(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

async fn print_history(state: &AppState) -> anyhow::Result<()> {
    let Some(history) = &state.history else {
        eprintln!("{}", "History is disabled in config".yellow());
        return Ok(());
    };

    let entries = history.recent(20).await?;
    if entries.is_empty() {
        println!("No translations recorded yet.");
        return Ok(());
    }

    for entry in &entries {
        println!(
            "{} {} {}",
            entry.timestamp.dimmed(),
            format!("{} -> {}", entry.source_lang, entry.target_lang).cyan(),
            format!("[{}]", entry.method).dimmed()
        );
        println!("  {}", entry.original_text);
        println!("  {}", entry.translated_text.green());
    }

    let stats = history.stats().await?;
    println!(
        "\n{} translations, average confidence {:.2}",
        stats.total, stats.avg_confidence
    );

    Ok(())
}
