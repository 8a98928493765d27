//! Clap derive structures for the `rigwatch` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// rigwatch -- poll and monitor NiceHash Excavator rigs
#[derive(Debug, Parser)]
#[command(
    name = "rigwatch",
    version,
    about = "Monitor NiceHash Excavator mining rigs from the command line",
    long_about = "Polls the Excavator JSON-RPC HTTP API, keeps a live snapshot of\n\
        GPUs, algorithms and workers, and renders it on every refresh.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Rig profile to use
    #[arg(long, short = 'r', env = "RIGWATCH_RIG", global = true)]
    pub rig: Option<String>,

    /// Excavator host (overrides profile)
    #[arg(long, short = 'H', env = "RIGWATCH_HOST", global = true)]
    pub host: Option<String>,

    /// Excavator API port (overrides profile)
    #[arg(long, short = 'P', env = "RIGWATCH_PORT", global = true)]
    pub port: Option<u32>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "RIGWATCH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "RIGWATCH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "RIGWATCH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll a rig once and show its devices, algorithms and workers
    #[command(alias = "st")]
    Status,

    /// Poll continuously and re-render after every refresh
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Check a rig setup: ranges first, then an info query
    Probe,

    /// Manage CLI configuration and rig profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Start in fast mode (the profile's fast update interval)
    #[arg(long, short = 'f')]
    pub fast: bool,

    /// Watch every configured rig instead of just the active one
    #[arg(long, short = 'a')]
    pub all: bool,

    /// Override the normal update interval (e.g. "30s", "2m")
    #[arg(long, value_parser = humantime::parse_duration)]
    pub interval: Option<Duration>,

    /// Log one structured metrics record per device on each refresh
    #[arg(long)]
    pub metrics: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Add or replace a rig profile
    Init(InitArgs),

    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// Range-check every rig profile (add --probe to contact each rig)
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Profile name
    #[arg(long, short = 'n', default_value = "default")]
    pub name: String,

    /// Excavator host
    #[arg(long)]
    pub host: String,

    /// Excavator API port
    #[arg(long, default_value_t = rigwatch_core::DEFAULT_PORT)]
    pub port: u32,

    /// Normal update interval in seconds
    #[arg(long, default_value = "60")]
    pub update_interval: u64,

    /// Fast update interval in seconds
    #[arg(long, default_value = "1")]
    pub update_interval_fast: u64,

    /// Log every request URL
    #[arg(long)]
    pub debug: bool,

    /// Make this the default rig
    #[arg(long)]
    pub default: bool,

    /// Replace an existing profile with the same name
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Also send an info query to each rig
    #[arg(long)]
    pub probe: bool,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
