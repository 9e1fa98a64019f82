//! Borderwatch: host entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  ScriptedSampler   LogOverlay          LogEventSink            │
//! │  (SamplerPort)     (Render+Geometry)   (EventSink)             │
//! │  FileStore / MemoryStore               MonotonicClock          │
//! │  (StoragePort)                                                 │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            MonitorService (pure logic)                 │    │
//! │  │  settings · classifier · intensity · scheduler         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use borderwatch::adapters::display::{LogOverlay, ScreenGeometry, ScreenSize};
use borderwatch::adapters::log_sink::LogEventSink;
use borderwatch::adapters::sampler::ScriptedSampler;
use borderwatch::adapters::store::{FileStore, MemoryStore};
use borderwatch::adapters::time::MonotonicClock;
use borderwatch::app::commands::AppCommand;
use borderwatch::app::ports::StoragePort;
use borderwatch::app::service::MonitorService;
use borderwatch::config::MonitorConfig;
use borderwatch::settings::ThresholdSettings;

/// Low-battery screen border monitor
#[derive(Parser)]
#[command(name = "borderwatch")]
#[command(about = "Turns battery samples into a screen-border warning", long_about = None)]
#[command(version)]
struct Cli {
    /// Monitor configuration file (JSON)
    #[arg(short, long, env = "BORDERWATCH_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a sample script through the monitor
    Run(RunArgs),

    /// Show or change the persisted thresholds
    Thresholds {
        /// Directory holding persisted preferences
        #[arg(long, env = "BORDERWATCH_STORE")]
        store_dir: PathBuf,

        /// New alert percentage
        #[arg(long)]
        alert: Option<u8>,

        /// New critical percentage
        #[arg(long)]
        critical: Option<u8>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Comma-separated readings: `50`, `9.5`, `4+` (charging), `-` (no source)
    #[arg(long, default_value = "50,15,9,4,25")]
    script: String,

    /// Screen size, repeatable (e.g. `--screen 2560x1440`)
    #[arg(long = "screen", value_parser = parse_screen)]
    screens: Vec<ScreenSize>,

    /// Alert percentage override (persisted)
    #[arg(long)]
    alert: Option<u8>,

    /// Critical percentage override (persisted)
    #[arg(long)]
    critical: Option<u8>,

    /// Directory holding persisted preferences; in-memory when absent
    #[arg(long, env = "BORDERWATCH_STORE")]
    store_dir: Option<PathBuf>,

    /// Stop after this many milliseconds
    #[arg(long)]
    duration_ms: Option<u64>,

    /// Keep reporting the last reading after the script runs out
    #[arg(long)]
    hold_last: bool,
}

fn parse_screen(s: &str) -> Result<ScreenSize, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width: f32 = w.trim().parse().map_err(|_| format!("bad width '{w}'"))?;
    let height: f32 = h.trim().parse().map_err(|_| format!("bad height '{h}'"))?;
    if !(width > 0.0 && height > 0.0) {
        return Err(format!("screen '{s}' must have positive dimensions"));
    }
    Ok(ScreenSize::new(width, height))
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run(args) => match args.store_dir.clone() {
            Some(dir) => {
                let store = FileStore::open(&dir)
                    .with_context(|| format!("opening store at {}", dir.display()))?;
                run(config, args, store)
            }
            None => run(config, args, MemoryStore::new()),
        },
        Commands::Thresholds {
            store_dir,
            alert,
            critical,
        } => {
            let store = FileStore::open(&store_dir)
                .with_context(|| format!("opening store at {}", store_dir.display()))?;
            let mut settings = ThresholdSettings::load(store);
            if let Some(a) = alert {
                settings.set_alert(a);
            }
            if let Some(c) = critical {
                settings.set_critical(c);
            }
            let t = settings.thresholds();
            println!("alert={} critical={}", t.alert(), t.critical());
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<MonitorConfig> {
    let Some(path) = path else {
        return Ok(MonitorConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = MonitorConfig::from_json(&json)
        .with_context(|| format!("parsing config {}", path.display()))?;
    info!("Config loaded from {}", path.display());
    Ok(config)
}

/// Host run-loop: sleep until the next timer deadline, then advance the
/// service to the current time.
fn run<P: StoragePort>(config: MonitorConfig, args: RunArgs, store: P) -> Result<()> {
    info!("Borderwatch v{}", env!("CARGO_PKG_VERSION"));

    let sampler = ScriptedSampler::parse(&args.script)
        .context("parsing --script")?
        .hold_last(args.hold_last);
    let geometry = ScreenGeometry::new(args.screens, &config);
    let mut overlay = LogOverlay::new(geometry, config.warning_text.clone());
    let mut events = LogEventSink::new();
    let clock = MonotonicClock::new();
    let sample_interval = config.sample_interval_ms;

    let mut svc = MonitorService::new(config, sampler, store).context("building monitor")?;
    if let Some(a) = args.alert {
        svc.handle_command(AppCommand::SetAlert(a), &mut overlay, &mut events);
    }
    if let Some(c) = args.critical {
        svc.handle_command(AppCommand::SetCritical(c), &mut overlay, &mut events);
    }
    svc.handle_command(AppCommand::StartMonitoring, &mut overlay, &mut events);

    let mut exhausted_at: Option<u64> = None;
    loop {
        let now = clock.uptime_ms();
        if args.duration_ms.is_some_and(|limit| now >= limit) {
            break;
        }
        svc.advance(now, &mut overlay, &mut events);

        if !args.hold_last && svc.sampler_mut().remaining() == 0 {
            // Leave one more sample period so the final reading gets its
            // flash cycle on screen.
            let since = *exhausted_at.get_or_insert(now);
            if args.duration_ms.is_none() && now >= since + sample_interval {
                break;
            }
        }

        let Some(next) = svc.next_deadline() else {
            break;
        };
        let wake = args.duration_ms.map_or(next, |limit| next.min(limit));
        std::thread::sleep(clock.until(wake));
    }

    svc.shutdown(&mut overlay, &mut events);
    if let Some(status) = events.status() {
        println!("{status}");
    }
    Ok(())
}
