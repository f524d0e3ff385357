//! midnight CLI - Binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI bridges [`midnight_engine`] (countdown state) and [`midnight_tui`]
//! (rendering), providing RAII-based terminal management with guaranteed cleanup.
//!
//! ```text
//! main() -> Settings::resolve() -> TerminalSession::new() -> run_app() -> App + TUI
//! ```
//!
//! # Event Loop
//!
//! A fixed 33ms (~30 FPS) render cadence:
//!
//! 1. Wait for frame tick
//! 2. Drain input queue (non-blocking via [`midnight_tui::InputPump`])
//! 3. Advance application state (`app.tick(now)`)
//! 4. Render frame

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::{
    fs::{self, OpenOptions},
    io::{Stdout, Write, stdout},
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use midnight_config::target_from_env;
use midnight_engine::{App, MidnightConfig, Overrides, Settings};
use midnight_tui::{InputPump, draw, handle_events};

/// Full-screen New Year countdown for the terminal
#[derive(Parser, Debug)]
#[command(name = "midnight")]
#[command(version)]
struct Args {
    /// Countdown target, RFC 3339 or a local `YYYY-MM-DDTHH:MM:SS` timestamp
    #[arg(long, value_name = "TIMESTAMP")]
    target: Option<String>,

    /// Year shown after the roll-over
    #[arg(long)]
    year: Option<i32>,

    /// Config file to read instead of ~/.midnight/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Use ASCII glyphs only
    #[arg(long)]
    ascii: bool,

    /// High-contrast palette
    #[arg(long)]
    high_contrast: bool,

    /// Skip particles and the digit roll animation
    #[arg(long)]
    reduced_motion: bool,

    /// Do not ring the terminal bell at midnight
    #[arg(long)]
    no_chime: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            target: self.target.clone(),
            env_target: target_from_env(),
            year: self.year,
            ascii_only: self.ascii,
            high_contrast: self.high_contrast,
            reduced_motion: self.reduced_motion,
            no_chime: self.no_chime,
        }
    }

    fn load_config(&self) -> Result<Option<MidnightConfig>> {
        let config = match &self.config {
            Some(path) => Some(MidnightConfig::load_from(path)?),
            None => MidnightConfig::load()?,
        };
        Ok(config)
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // No log file: stay silent rather than write over the TUI.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.midnight/logs/midnight.log
    if let Some(config_path) = MidnightConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("midnight.log"));
    }

    // Fallback: ./.midnight/logs/midnight.log
    candidates.push(PathBuf::from(".midnight").join("logs").join("midnight.log"));

    candidates
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Holds raw mode, the alternate screen and the hidden cursor; all of it is
/// restored on drop, including after early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            let _ = execute!(out, LeaveAlternateScreen, Show);
            return Err(err.into());
        }

        let terminal = match Terminal::new(CrosstermBackend::new(out)) {
            Ok(t) => t,
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen, Show);
                return Err(err.into());
            }
        };

        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen, Show);
        let _ = Write::flush(self.terminal.backend_mut());
        let _ = self.terminal.show_cursor();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let config = args.load_config().context("loading config")?;
    let settings = Settings::resolve(config.as_ref(), &args.overrides(), Utc::now())
        .context("resolving countdown target")?;
    tracing::info!(
        target_ts = %settings.target,
        year = settings.years.next,
        "Counting down"
    );

    let mut app = App::new(settings, Utc::now());

    let result = {
        let mut session = TerminalSession::new()?;
        run_app(&mut session.terminal, &mut app).await
    };

    app.shutdown();

    if let Err(err) = &result {
        tracing::error!("{err:?}");
    }
    result
}

const FRAME_DURATION: Duration = Duration::from_millis(33);

async fn run_app<B>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let mut input = InputPump::new();
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result: Result<()> = loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        match handle_events(app, &mut input) {
            Ok(true) => break Ok(()),
            Ok(false) => {}
            Err(e) => break Err(e),
        }

        app.tick(Utc::now());

        if let Err(e) = terminal.draw(|frame| draw(frame, app)) {
            break Err(e.into());
        }
    };

    input.shutdown().await;
    result
}
