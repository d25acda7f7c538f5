//! Clap derive structures for the `unireap` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use unireap_config::{ConfigFormat, SchemaVersion};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// unireap -- forget idle ghost clients from UniFi controllers
#[derive(Debug, Parser)]
#[command(
    name = "unireap",
    version,
    about = "Forget idle ghost clients from UniFi network controllers",
    long_about = "Logs in to each configured UniFi controller site, lists every known\n\
        client, and forgets the ones that have no name and have never moved a\n\
        byte or packet. Sites run one after another in configuration order.",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    /// Defaults to `run` when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Path to the configuration file
    #[arg(long, env = "UNIREAP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Configuration file syntax
    #[arg(long, value_enum, default_value = "auto", global = true)]
    pub config_type: ConfigType,

    /// Configuration file schema version
    #[arg(long, value_enum, default_value = "0.2", global = true)]
    pub config_version: ConfigVersion,

    /// List and classify clients without forgetting any
    #[arg(long, short = 'n', global = true)]
    pub dry_run: bool,

    /// Continue with the next site when one fails
    #[arg(long, global = true)]
    pub keep_going: bool,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "UNIREAP_OUTPUT",
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
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigType {
    /// Infer from the file extension
    Auto,
    Yaml,
    Json,
    Toml,
}

impl From<ConfigType> for ConfigFormat {
    fn from(value: ConfigType) -> Self {
        match value {
            ConfigType::Auto => Self::Auto,
            ConfigType::Yaml => Self::Yaml,
            ConfigType::Json => Self::Json,
            ConfigType::Toml => Self::Toml,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigVersion {
    /// Single-site JSON object
    #[value(name = "0.1")]
    V0_1,
    /// Multi-site file with a `sites` list
    #[value(name = "0.2")]
    V0_2,
}

impl From<ConfigVersion> for SchemaVersion {
    fn from(value: ConfigVersion) -> Self {
        match value {
            ConfigVersion::V0_1 => Self::V0_1,
            ConfigVersion::V0_2 => Self::V0_2,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Summary table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
    /// One MAC address per line (scripting)
    Plain,
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

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reap idle clients from every configured site
    Run,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
