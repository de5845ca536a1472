//! pitfall - Detect operational conflicts between AI development tools.
//!
//! pitfall turns noisy signals about a tool set (declared descriptors,
//! installed packages, running services, project files, framework layouts
//! and inferred agent frameworks) into a deduplicated, ranked list of
//! conflicts such as port collisions, shared environment variables,
//! functional overlap and known dependency clashes.
//!
//! # Modules
//!
//! - [`analysis`] - Conflict analysis and the end-to-end pipeline
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Layered configuration loading
//! - [`conflict`] - Conflict candidates, deduplication and ranking
//! - [`dynamic`] - Agent-framework detection over a project tree
//! - [`error`] - Error types and result aliases
//! - [`extract`] - Evidence extractors
//! - [`registry`] - Known-tool registry and heuristic tables
//! - [`report`] - Human and JSON renderers
//! - [`rules`] - Static conflict rules
//! - [`signal`] - Evidence records and aggregation into tool signals
//! - [`supplementary`] - Prompt building and response parsing for a free-text analysis
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use pitfall::analysis::ConflictAnalyzer;
//! use pitfall::registry::{Heuristics, ToolRegistry};
//! use pitfall::signal::{aggregate, ToolDescriptor};
//!
//! let registry = ToolRegistry::builtin().unwrap();
//! let heuristics = Heuristics::builtin().unwrap();
//! let descriptors = vec![
//!     ToolDescriptor::new("streamlit").with_port(8501),
//!     ToolDescriptor::new("report-server").with_port(8501),
//! ];
//!
//! let tools = aggregate(&registry, &heuristics.readme, &descriptors, &[], &[]);
//! let result = ConflictAnalyzer::new(&registry, &heuristics.conflicts).analyze(&tools, None);
//! assert_eq!(result.conflicts.len(), 1);
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod conflict;
pub mod dynamic;
pub mod error;
pub mod extract;
pub mod registry;
pub mod report;
pub mod rules;
pub mod signal;
pub mod supplementary;
pub mod ui;

pub use error::{PitfallError, Result};
