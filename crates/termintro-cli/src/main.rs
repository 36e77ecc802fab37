//! termintro CLI: play a typed terminal intro

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use termintro_engine::{
    player_from_config, start_intro, IntroConfig, PlayerEvent, DEFAULT_CONFIG_PATH,
};
use tracing_subscriber::EnvFilter;

/// Typed terminal intro with skip support
#[derive(Parser)]
#[command(name = "termintro")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (defaults to .termintro/config.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for typing jitter, for reproducible playback
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Disallow skipping
    #[arg(long, global = true)]
    no_skip: bool,

    /// Write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the intro in the terminal UI (default when no command specified)
    Play,

    /// Type the intro to stdout as plain text
    Plain,

    /// Write a default config file
    Init {
        /// Where to write the config
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate a config file and print a summary
    Check {
        /// Config file to check
        path: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let interactive = matches!(cli.command, None | Some(Commands::Play));
    if let Err(e) = init_tracing(cli.log_file.as_deref(), interactive) {
        eprintln!("Failed to open log file: {e}");
        std::process::exit(1);
    }

    match cli.command {
        None | Some(Commands::Play) => {
            let config = load_config(cli.config.as_deref(), cli.no_skip);
            cmd_play(&config, cli.seed);
        }
        Some(Commands::Plain) => {
            let config = load_config(cli.config.as_deref(), cli.no_skip);
            cmd_plain(&config, cli.seed);
        }
        Some(Commands::Init { path, force }) => {
            cmd_init(&path, force);
        }
        Some(Commands::Check { path, json }) => {
            cmd_check(&path, json);
        }
    }
}

/// Install the log subscriber.
///
/// The terminal UI owns the screen, so without a log file it gets no
/// subscriber at all. Other commands log warnings to stderr.
fn init_tracing(log_file: Option<&Path>, interactive: bool) -> std::io::Result<()> {
    if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    } else if !interactive {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn load_config(path: Option<&Path>, no_skip: bool) -> IntroConfig {
    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    let path = match path {
        Some(path) => Some(path),
        None if default_path.exists() => Some(default_path),
        None => None,
    };

    let mut config = match path {
        Some(path) => match IntroConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => IntroConfig::default(),
    };

    if no_skip {
        config.skippable = false;
    }
    config
}

fn cmd_play(config: &IntroConfig, seed: Option<u64>) {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    match rt.block_on(termintro_tui::run_tui(config, seed)) {
        Ok(Some(completion)) => {
            tracing::info!(%completion, "intro dismissed");
        }
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_plain(config: &IntroConfig, seed: Option<u64>) {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let mut out = std::io::stdout();
    if let Err(e) = rt.block_on(type_plain(config, seed, &mut out)) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Type the intro into `out` as plain text, returning once it completes.
async fn type_plain(
    config: &IntroConfig,
    seed: Option<u64>,
    out: &mut impl Write,
) -> std::io::Result<()> {
    let mut handle = start_intro(player_from_config(config, seed));
    let Some(mut events) = handle.take_events() else {
        return Ok(());
    };

    while let Some(event) = events.recv().await {
        match event {
            PlayerEvent::CharRevealed { ch, .. } => write!(out, "{ch}")?,
            PlayerEvent::LineTyped { .. } | PlayerEvent::Skipped { .. } => writeln!(out)?,
            PlayerEvent::TypingComplete => writeln!(out, "\n✓ Ready to launch...")?,
            PlayerEvent::Completed { .. } => break,
            _ => continue,
        }
        out.flush()?;
    }

    let _ = handle.wait_complete().await;
    handle.shutdown().await;
    Ok(())
}

fn cmd_init(path: &Path, force: bool) {
    if path.exists() && !force {
        println!("Config already exists at {}", path.display());
        return;
    }

    match IntroConfig::default().save(path) {
        Ok(()) => println!("Wrote {}", path.display()),
        Err(e) => {
            eprintln!("Failed to write {}: {e}", path.display());
            std::process::exit(1);
        }
    }
}

fn cmd_check(path: &Path, json: bool) {
    let config = match IntroConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid config {}: {e}", path.display());
            std::process::exit(1);
        }
    };

    let summary = check_summary(&config);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).expect("failed to serialize")
        );
        return;
    }

    println!("Config OK: {}\n", path.display());
    println!("  Title:     {}", config.title);
    println!("  Lines:     {}", config.script.len());
    println!("  Chars:     {}", config.script.total_chars());
    println!("  Skippable: {}", if config.skippable { "yes" } else { "no" });
    #[allow(clippy::cast_precision_loss)]
    let seconds = summary["estimated_ms"].as_u64().unwrap_or_default() as f64 / 1000.0;
    println!("  Duration:  ~{seconds:.1}s");
}

/// Summary printed by `check`.
fn check_summary(config: &IntroConfig) -> serde_json::Value {
    let estimated = config.script.estimated_duration(&config.timing);
    let estimated_ms = u64::try_from(estimated.as_millis()).unwrap_or(u64::MAX);
    serde_json::json!({
        "title": config.title,
        "lines": config.script.len(),
        "chars": config.script.total_chars(),
        "skippable": config.skippable,
        "estimated_ms": estimated_ms,
    })
}
