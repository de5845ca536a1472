//! Evidence aggregation.
//!
//! Merges tool descriptors, extractor output and dynamic detections into one
//! [`ToolSignal`] per logical tool. Names are grouped case-insensitively
//! after resolution through the registry (tool key or package name); there
//! is no fuzzy matching. Output order is first appearance.

use std::collections::HashMap;

use crate::dynamic::DynamicDetection;
use crate::extract::ReadmeMetadata;
use crate::registry::{ReadmeHeuristics, ToolRegistry};
use crate::signal::evidence::{EvidenceRecord, EvidenceSource};
use crate::signal::types::{SignalStatus, ToolDescriptor, ToolSignal};

/// Detection method recorded for user-declared tools.
pub const DECLARED_METHOD: &str = "declared";
/// Detection method recorded for dynamic agent-framework detections.
pub const DYNAMIC_METHOD: &str = "dynamic_agent_detection";

const DECLARED_CONFIDENCE: f32 = 1.0;

/// Incremental builder of tool signals.
pub struct Aggregator<'a> {
    registry: &'a ToolRegistry,
    readme_tables: &'a ReadmeHeuristics,
    signals: Vec<ToolSignal>,
    index: HashMap<String, usize>,
    skipped: usize,
}

impl<'a> Aggregator<'a> {
    pub fn new(registry: &'a ToolRegistry, readme_tables: &'a ReadmeHeuristics) -> Self {
        Self {
            registry,
            readme_tables,
            signals: Vec::new(),
            index: HashMap::new(),
            skipped: 0,
        }
    }

    /// Canonical form of a raw tool name.
    pub fn canonicalize(&self, raw: &str) -> String {
        self.registry
            .canonical_name(raw)
            .map(str::to_string)
            .unwrap_or_else(|| raw.trim().to_lowercase())
    }

    fn signal_mut(&mut self, raw_name: &str) -> &mut ToolSignal {
        let canonical = self.canonicalize(raw_name);
        let index = match self.index.get(&canonical) {
            Some(&i) => i,
            None => {
                let display = self
                    .registry
                    .get(&canonical)
                    .map(|e| e.name.clone())
                    .unwrap_or_else(|| raw_name.trim().to_string());
                self.signals.push(ToolSignal::new(canonical.clone(), display));
                self.index.insert(canonical, self.signals.len() - 1);
                self.signals.len() - 1
            }
        };
        &mut self.signals[index]
    }

    /// Add user-declared tools.
    ///
    /// README text, when present, contributes ports, env vars and
    /// categories as declared attributes.
    pub fn add_descriptors(&mut self, descriptors: &[ToolDescriptor]) -> &mut Self {
        for descriptor in descriptors {
            if descriptor.name.trim().is_empty() {
                tracing::debug!("Skipping tool descriptor without a name");
                self.skipped += 1;
                continue;
            }

            let readme_tables = self.readme_tables;
            let signal = self.signal_mut(&descriptor.name);
            signal.display_name = descriptor.name.trim().to_string();
            signal.add_detection_method(DECLARED_METHOD);
            signal.raise_confidence(DECLARED_CONFIDENCE);
            if !descriptor.description.is_empty() {
                signal.description = descriptor.description.clone();
            }
            signal.declared_ports.extend(descriptor.ports.iter().copied());
            signal
                .declared_env_vars
                .extend(descriptor.env_vars.iter().cloned());
            signal
                .declared_categories
                .extend(descriptor.categories.iter().cloned());

            if let Some(readme) = descriptor.readme.as_deref() {
                let metadata = ReadmeMetadata::extract(readme, readme_tables);
                if metadata != ReadmeMetadata::default() {
                    signal.add_detection_method("readme");
                }
                signal.declared_ports.extend(metadata.ports);
                signal.declared_env_vars.extend(metadata.env_vars);
                signal.declared_categories.extend(metadata.categories);
                signal.readme = Some(readme.to_string());
            }
        }
        self
    }

    /// Add one extractor's output.
    pub fn add_source(&mut self, source: &EvidenceSource) -> &mut Self {
        for (key, record) in &source.records {
            let Some(subject) = record.subject() else {
                tracing::debug!(
                    "Skipping malformed evidence {} from {}: no tool, name or service",
                    key,
                    source.origin
                );
                self.skipped += 1;
                continue;
            };
            let subject = subject.to_string();
            let status = record.status.unwrap_or_else(|| source.kind.default_status());
            let confidence = record
                .confidence
                .unwrap_or_else(|| source.kind.default_confidence());
            let method = record
                .detection_method
                .clone()
                .unwrap_or_else(|| source.kind.as_str().to_string());

            let signal = self.signal_mut(&subject);
            merge_record(signal, record, method, status, confidence);
        }
        self
    }

    /// Add dynamic agent-framework detections.
    ///
    /// An existing tool gains the dynamic method and takes the detection's
    /// confidence; an unknown name becomes a new signal.
    pub fn add_dynamic(&mut self, detections: &[DynamicDetection]) -> &mut Self {
        for detection in detections {
            if detection.name.trim().is_empty() {
                self.skipped += 1;
                continue;
            }
            let signal = self.signal_mut(&detection.name);
            signal.add_detection_method(DYNAMIC_METHOD);
            signal.set_confidence(detection.confidence);
            signal.promote(SignalStatus::AgentFrameworkDetected);
            if signal.description.is_empty() {
                signal.description = detection.description.clone();
            }
            if !detection.project_path.is_empty()
                && !signal.locations.contains(&detection.project_path)
            {
                signal.locations.push(detection.project_path.clone());
            }
        }
        self
    }

    /// Number of records skipped as malformed.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn finish(self) -> Vec<ToolSignal> {
        if self.skipped > 0 {
            tracing::debug!("Skipped {} malformed evidence records", self.skipped);
        }
        self.signals
    }
}

fn merge_record(
    signal: &mut ToolSignal,
    record: &EvidenceRecord,
    method: String,
    status: SignalStatus,
    confidence: f32,
) {
    signal.add_detection_method(method);
    signal.promote(status);
    signal.raise_confidence(confidence);
    if let Some(version) = &record.version {
        signal.versions.push(version.clone());
    }
    if let Some(location) = &record.location {
        signal.locations.push(location.clone());
    }
    signal.observed_ports.extend(record.all_ports());
    signal
        .declared_env_vars
        .extend(record.env_vars.iter().cloned());
    signal
        .declared_categories
        .extend(record.categories.iter().cloned());
}

/// Aggregate all evidence in the fixed order: descriptors, then sources in
/// the order given, then dynamic detections.
pub fn aggregate(
    registry: &ToolRegistry,
    readme_tables: &ReadmeHeuristics,
    descriptors: &[ToolDescriptor],
    sources: &[EvidenceSource],
    detections: &[DynamicDetection],
) -> Vec<ToolSignal> {
    let mut aggregator = Aggregator::new(registry, readme_tables);
    aggregator.add_descriptors(descriptors);
    for source in sources {
        aggregator.add_source(source);
    }
    aggregator.add_dynamic(detections);
    aggregator.finish()
}
