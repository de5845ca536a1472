//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::conflict::Severity;
use crate::report::OutputFormat;

/// pitfall - Detect conflicts between AI development tools.
#[derive(Debug, Parser)]
#[command(name = "pitfall")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides .pitfall/config.yml layering)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Registry file replacing the built-in tool registry
    #[arg(long, global = true, env = "PITFALL_REGISTRY")]
    pub registry: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Detect conflicts between tools (default if no command specified)
    Analyze(AnalyzeArgs),

    /// Collect evidence and show the aggregated tool list
    Scan(ScanArgs),

    /// Detect agent frameworks in the project tree
    Agents(AgentsArgs),

    /// Print a supplementary analysis prompt for the collected tools
    Prompt(PromptArgs),

    /// Query the tool registry
    Registry(RegistryArgs),

    /// Print the JSON Schema of the analysis result
    Schema,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Evidence inputs shared by commands that build a tool list.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InputArgs {
    /// Tool descriptor file (YAML or JSON list of tools)
    #[arg(short, long, value_name = "FILE")]
    pub tools: Option<PathBuf>,

    /// Pre-collected evidence source (JSON); may be repeated
    #[arg(short, long = "evidence", value_name = "FILE")]
    pub evidence: Vec<PathBuf>,

    /// Installed package listing (`pip list --format=json`)
    #[arg(long, value_name = "FILE")]
    pub packages: Option<PathBuf>,

    /// Do not scan the project directory
    #[arg(long)]
    pub no_scan: bool,

    /// Skip agent framework detection
    #[arg(long)]
    pub no_agents: bool,

    /// Probe registry default ports on localhost
    #[arg(long)]
    pub probe: bool,
}

/// Severity threshold for a failing exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailOn {
    High,
    Medium,
    Low,
}

impl FailOn {
    /// Whether a conflict of `severity` meets this threshold.
    pub fn matches(&self, severity: Severity) -> bool {
        let threshold = match self {
            Self::High => Severity::High,
            Self::Medium => Severity::Medium,
            Self::Low => Severity::Low,
        };
        severity.rank() <= threshold.rank()
    }
}

/// Arguments for the `analyze` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Supplementary analysis response to merge (text or JSON)
    #[arg(short, long, value_name = "FILE")]
    pub response: Option<PathBuf>,

    /// Output format: human, json (overrides config)
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Exit with status 1 when a conflict at or above this severity is found
    #[arg(long, value_enum)]
    pub fail_on: Option<FailOn>,
}

/// Arguments for the `scan` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ScanArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `agents` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct AgentsArgs {
    /// Minimum confidence to report (overrides config)
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `prompt` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct PromptArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Also print the system prompt
    #[arg(long)]
    pub system: bool,
}

/// Arguments for the `registry` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RegistryArgs {
    /// Search term matched against names and descriptions
    pub query: Option<String>,

    /// Only tools in this category
    #[arg(long)]
    pub category: Option<String>,

    /// Look up the tool installed by a package
    #[arg(long, conflicts_with_all = ["query", "category"])]
    pub package: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
