use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quickreturn_core::{AppConfig, RevealMode, SnapPolicy};

mod commands;

#[derive(Parser)]
#[command(name = "quickreturn")]
#[command(author, version, about = "Replay scroll traces against the quick-return engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded scroll trace and print bar positions after each step
    Replay {
        /// Trace file (.json or .toml)
        trace: PathBuf,
        /// How bars follow scrolling
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
        /// Where bars settle when scrolling stops
        #[arg(long, value_enum)]
        snap: Option<SnapArg>,
        /// Bar speed relative to the content
        #[arg(long)]
        parallax: Option<f32>,
        /// Reveal all bars after scrolling has been idle
        #[arg(long)]
        reveal_on_idle: bool,
        /// Let running animations and timers finish after the last step
        #[arg(long)]
        settle: bool,
        /// Print snapshots as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

impl Commands {
    /// `config init` and `config path` must work even when the file is broken
    fn reads_config(&self) -> bool {
        !matches!(
            self,
            Commands::Config {
                action: ConfigAction::Init { .. } | ConfigAction::Path
            }
        )
    }
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration file location
    Path,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    ScrollLinked,
    Animated,
}

impl From<ModeArg> for RevealMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::ScrollLinked => RevealMode::ScrollLinked,
            ModeArg::Animated => RevealMode::Animated,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SnapArg {
    None,
    ToIntent,
    ToMidpoint,
}

impl From<SnapArg> for SnapPolicy {
    fn from(snap: SnapArg) -> Self {
        match snap {
            SnapArg::None => SnapPolicy::None,
            SnapArg::ToIntent => SnapPolicy::ToIntent,
            SnapArg::ToMidpoint => SnapPolicy::ToMidpoint,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = if cli.command.reads_config() {
        AppConfig::load()?
    } else {
        AppConfig::default()
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Replay {
            trace,
            mode,
            snap,
            parallax,
            reveal_on_idle,
            settle,
            json,
        } => {
            let overrides = commands::replay::Overrides {
                mode: mode.map(Into::into),
                snap: snap.map(Into::into),
                parallax,
                reveal_on_idle,
            };
            commands::replay::run(&config, &trace, overrides, settle, json)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Init { force } => commands::config::init(force),
            ConfigAction::Path => commands::config::path(),
        },
    }
}
