//! Tabwright entrypoint: replay an editing script against a text buffer.
//!
//! The final text goes to stdout; selection, focus and optional history go
//! to stderr.
mod script;

use anyhow::{Context, Result};
use clap::Parser;
use core_text::BufferState;
use script::{Replay, parse_script};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "tabwright", version, about = "Replay editing scripts through the tabwright engine")]
struct Args {
    /// Text file to start from (UTF-8). If omitted the buffer starts empty.
    pub path: Option<PathBuf>,
    /// Script of host events to replay.
    #[arg(long = "script")]
    pub script: PathBuf,
    /// Optional configuration file path (overrides discovery of `tabwright.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Write logs to this file instead of stderr.
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
    /// Print the history stack after the replay.
    #[arg(long = "history")]
    pub history: bool,
}

fn configure_logging(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let Some(path) = log_file else {
        // Err means a global subscriber is already installed.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let name = path
        .file_name()
        .with_context(|| format!("log file {} has no file name", path.display()))?;
    if path.exists() {
        let _ = std::fs::remove_file(path);
    }

    let file_appender = tracing_appender::rolling::never(dir, name);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Ok(Some(guard)),
        // Subscriber already installed; dropping the guard shuts the writer down.
        Err(_err) => Ok(None),
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn load_initial(path: Option<&Path>) -> Result<BufferState> {
    let Some(path) = path else {
        return Ok(BufferState::empty());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let normalized = content.replace("\r\n", "\n");
    debug!(
        target: "runtime",
        file = %path.display(),
        size_bytes = content.len(),
        crlf_normalized = normalized.len() != content.len(),
        "file_read_ok"
    );
    Ok(BufferState::caret(normalized, 0)?)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging(args.log_file.as_deref())?;
    install_panic_hook();
    info!(target: "runtime", "startup");

    let config = core_config::load_from(args.config.clone())?;
    let settings = config.resolve();
    let initial = load_initial(args.path.as_deref())?;
    let source = std::fs::read_to_string(&args.script)
        .with_context(|| format!("reading script {}", args.script.display()))?;
    let steps = parse_script(&source)?;
    info!(
        target: "runtime.startup",
        steps = steps.len(),
        config_override = args.config.is_some(),
        len = initial.value().len(),
        "bootstrap_complete"
    );

    let mut replay = Replay::new(initial, settings);
    replay.run(&steps)?;

    print!("{}", replay.surface().value());
    eprint!("{}", replay.summary(args.history));
    info!(
        target: "runtime",
        depth = replay.session().history().len(),
        blurred = replay.blurred(),
        "shutdown"
    );
    Ok(())
}
