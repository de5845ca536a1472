//! Conflict analysis.
//!
//! [`ConflictAnalyzer`] runs the static rules over aggregated
//! [`ToolSignal`](crate::signal::ToolSignal)s, merges an optional
//! supplementary analysis and deduplicates the result. [`Pipeline`] drives a
//! whole run from raw inputs.

pub mod analyzer;
pub mod pipeline;
pub mod result;

pub use analyzer::{ConflictAnalyzer, MIN_TOOLS};
pub use pipeline::{Collected, Pipeline, PipelineOptions};
pub use result::{AnalysisResult, AnalysisType};
