//! Evidence extractors.
//!
//! Each extractor turns one raw source into an
//! [`EvidenceSource`](crate::signal::EvidenceSource):
//!
//! - [`readme`] - ports, env vars and categories from documentation
//! - [`packages`] - installed package listings
//! - [`services`] - local port probe
//! - [`project_files`] - dependency manifests, compose files and app imports
//! - [`framework`] - registry-driven framework layout markers
//!
//! Extractors never abort on a single bad input; unreadable files and
//! malformed entries are logged at debug level and skipped.

pub mod framework;
pub mod packages;
pub mod project_files;
pub mod readme;
pub mod services;

pub use framework::{detect_frameworks, find_indicators, FrameworkIndicators};
pub use packages::{installed_packages, installed_packages_from_file};
pub use project_files::{split_requirement, ProjectFileExtractor};
pub use readme::{excerpt, ReadmeMetadata};
pub use services::{is_port_open, probe_services, services_from_open_ports};
