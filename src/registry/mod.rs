//! Known-tool registry and heuristic tables.
//!
//! The registry maps canonical tool names to default ports, environment
//! variables, categories and detection patterns. It is loaded once (from the
//! embedded `data/registry.yml` or a user-supplied file) and passed around
//! as an immutable [`ToolRegistry`] value.
//!
//! # Example
//!
//! ```
//! use pitfall::registry::ToolRegistry;
//!
//! let registry = ToolRegistry::builtin().unwrap();
//! assert_eq!(registry.canonical_name("pyautogen"), Some("autogen"));
//! ```

pub mod builtin;
pub mod entry;
pub mod heuristics;
pub mod resolver;

pub use entry::{DetectionPatterns, RegistryEntry, RegistryManifest};
pub use heuristics::{
    CategoryKeywords, ConflictHeuristics, DependencyConflict, DirectoryLabel, DynamicHeuristics,
    FrameworkHint, Heuristics, ImportFramework, ReadmeHeuristics,
};
pub use resolver::ToolRegistry;

impl Heuristics {
    /// Load the heuristic tables embedded in the binary.
    pub fn builtin() -> crate::error::Result<Self> {
        builtin::load_heuristics()
    }
}
