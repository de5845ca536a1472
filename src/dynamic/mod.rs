//! Dynamic agent-framework detection.
//!
//! Infers that a project uses some agent or orchestration framework without
//! a registry entry for it. Three channels are scored over a bounded walk of
//! the project tree:
//!
//! - structure: agent-related directory and file names, config file count
//! - code: agent imports, classes, functions and keyword density in sources
//! - config: agent keywords and framework hints in config file contents
//!
//! The detection confidence is the mean of the three scores. Keyword tables
//! come from [`DynamicHeuristics`](crate::registry::DynamicHeuristics).

pub mod channels;
pub mod code;
pub mod detector;
pub mod walk;

pub use channels::{CodeAnalysis, ConfigAnalysis, StructureAnalysis};
pub use code::{CodeExtractor, CodeSymbols, FallbackExtractor, RegexExtractor, TreeSitterExtractor};
pub use detector::{
    AgentDetector, DetectionEvidence, DetectorLimits, DynamicDetection, UNKNOWN_FRAMEWORK,
};
pub use walk::ProjectWalk;
