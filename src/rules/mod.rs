//! Static conflict rules.
//!
//! Each rule implements [`ConflictRule`] and sees the aggregated tool list
//! plus a [`RuleContext`] carrying the registry and heuristic tables. The
//! [`RuleEngine`] runs rules in a fixed order and concatenates their output.
//!
//! # Built-in rules
//!
//! - [`PortCollisionRule`] - two tools on one port
//! - [`SharedEnvironmentRule`] - environment variables read by several tools
//! - [`FunctionalOverlapRule`] - several tools from one category
//! - [`DependencyClashRule`] - packages known to be incompatible

pub mod dependency;
pub mod engine;
pub mod environment;
pub mod overlap;
pub mod port;
pub mod rule;

pub use dependency::DependencyClashRule;
pub use engine::RuleEngine;
pub use environment::SharedEnvironmentRule;
pub use overlap::FunctionalOverlapRule;
pub use port::PortCollisionRule;
pub use rule::{ConflictRule, RuleContext, RuleId};
