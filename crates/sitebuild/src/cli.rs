//! Clap derive structures for the `sitebuild` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// sitebuild -- create a site from templates and assign inventory devices
#[derive(Debug, Parser)]
#[command(
    name = "sitebuild",
    version,
    about = "Create a network site from templates and assign inventory devices to it",
    long_about = "Creates a new site in the organization using the configured gateway,\n\
        WLAN and network templates, applies site variables, then assigns\n\
        unassigned inventory devices to it by MAC address.\n\n\
        Device MACs are read from ./devices.txt (one per line) when present,\n\
        otherwise you are prompted for a comma-separated list.",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Option<Command>,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration file (default: ./env.json, then the user config dir)
    #[arg(long, short = 'c', env = "SITEBUILD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Name of the site to create (prompted for when omitted)
    #[arg(long, short = 'n', env = "SITEBUILD_SITE_NAME")]
    pub site_name: Option<String>,

    /// File of device MACs, one per line
    #[arg(
        long,
        short = 'd',
        env = "SITEBUILD_DEVICES_FILE",
        default_value = "devices.txt"
    )]
    pub devices_file: PathBuf,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, env = "SITEBUILD_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress output (the final summary is still printed)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Subcommands ──────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
