//! End-to-end run: collect evidence, aggregate, analyze.

use std::path::PathBuf;
use std::time::Duration;

use crate::analysis::analyzer::ConflictAnalyzer;
use crate::analysis::result::AnalysisResult;
use crate::dynamic::{AgentDetector, DetectorLimits, DynamicDetection};
use crate::error::Result;
use crate::extract::{detect_frameworks, installed_packages_from_file, probe_services};
use crate::extract::ProjectFileExtractor;
use crate::registry::{Heuristics, ToolRegistry};
use crate::signal::{aggregate, EvidenceSource, ToolDescriptor, ToolSignal};
use crate::supplementary::SupplementaryAnalysis;

/// What to collect for one run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Project root to scan. `None` skips every project-based extractor.
    pub project: Option<PathBuf>,
    pub descriptors: Vec<ToolDescriptor>,
    /// Pre-collected evidence sources in JSON form.
    pub evidence_files: Vec<PathBuf>,
    /// A `pip list --format=json` listing.
    pub packages_file: Option<PathBuf>,
    pub probe_services: bool,
    pub probe_timeout: Duration,
    pub detect_agents: bool,
    pub limits: DetectorLimits,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            project: None,
            descriptors: Vec::new(),
            evidence_files: Vec::new(),
            packages_file: None,
            probe_services: false,
            probe_timeout: Duration::from_millis(200),
            detect_agents: true,
            limits: DetectorLimits::default(),
        }
    }
}

/// Everything gathered before aggregation.
#[derive(Debug, Clone, Default)]
pub struct Collected {
    pub sources: Vec<EvidenceSource>,
    pub detections: Vec<DynamicDetection>,
}

/// Wires extractors, the aggregator and the analyzer together.
pub struct Pipeline<'a> {
    registry: &'a ToolRegistry,
    heuristics: &'a Heuristics,
}

impl<'a> Pipeline<'a> {
    pub fn new(registry: &'a ToolRegistry, heuristics: &'a Heuristics) -> Self {
        Self {
            registry,
            heuristics,
        }
    }

    /// Run every enabled extractor.
    ///
    /// Sources are returned in a fixed order: evidence files as given, the
    /// package listing, project files, framework structure, then the
    /// service probe. Explicitly named files that cannot be read or parsed
    /// are errors; problems inside a scanned project are not.
    pub fn collect(&self, options: &PipelineOptions) -> Result<Collected> {
        let mut collected = Collected::default();

        for path in &options.evidence_files {
            collected.sources.push(EvidenceSource::from_file(path)?);
        }

        if let Some(path) = &options.packages_file {
            collected
                .sources
                .push(installed_packages_from_file(path, self.registry)?);
        }

        if let Some(root) = &options.project {
            tracing::debug!("Scanning project {}", root.display());
            collected
                .sources
                .push(ProjectFileExtractor::new(self.registry).extract(root));
            collected
                .sources
                .push(detect_frameworks(root, self.registry));

            if options.detect_agents {
                let detector = AgentDetector::new(&self.heuristics.dynamic, options.limits);
                collected.detections = detector.detect(root);
            }
        }

        if options.probe_services {
            collected
                .sources
                .push(probe_services(self.registry, options.probe_timeout));
        }

        collected.sources.retain(|source| !source.is_empty());
        tracing::debug!(
            "Collected {} evidence source(s) and {} agent detection(s)",
            collected.sources.len(),
            collected.detections.len()
        );
        Ok(collected)
    }

    /// Collect and aggregate into tool signals.
    pub fn signals(&self, options: &PipelineOptions) -> Result<Vec<ToolSignal>> {
        let collected = self.collect(options)?;
        Ok(aggregate(
            self.registry,
            &self.heuristics.readme,
            &options.descriptors,
            &collected.sources,
            &collected.detections,
        ))
    }

    /// Collect, aggregate and analyze.
    pub fn run(
        &self,
        options: &PipelineOptions,
        supplementary: Option<Result<SupplementaryAnalysis>>,
    ) -> Result<AnalysisResult> {
        let tools = self.signals(options)?;
        Ok(self.analyze(&tools, supplementary))
    }

    /// Analyze already-aggregated signals.
    pub fn analyze(
        &self,
        tools: &[ToolSignal],
        supplementary: Option<Result<SupplementaryAnalysis>>,
    ) -> AnalysisResult {
        ConflictAnalyzer::new(self.registry, &self.heuristics.conflicts).analyze(tools, supplementary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisType;
    use std::fs;
    use tempfile::TempDir;

    fn fixtures() -> (ToolRegistry, Heuristics) {
        (
            ToolRegistry::builtin().unwrap(),
            Heuristics::builtin().unwrap(),
        )
    }

    #[test]
    fn descriptors_only() {
        let (registry, heuristics) = fixtures();
        let options = PipelineOptions {
            descriptors: vec![
                ToolDescriptor::new("Streamlit").with_port(8501),
                ToolDescriptor::new("report-server").with_port(8501),
            ],
            ..Default::default()
        };

        let result = Pipeline::new(&registry, &heuristics)
            .run(&options, None)
            .unwrap();
        assert_eq!(result.analysis_type, AnalysisType::StaticOnly);
        assert_eq!(result.tool_count, 2);
        assert_eq!(result.conflicts.len(), 1);
    }

    #[test]
    fn scans_project_requirements() {
        let (registry, heuristics) = fixtures();
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("requirements.txt"),
            "streamlit==1.30.0\ngradio>=4.0\n",
        )
        .unwrap();

        let options = PipelineOptions {
            project: Some(temp.path().to_path_buf()),
            detect_agents: false,
            ..Default::default()
        };
        let pipeline = Pipeline::new(&registry, &heuristics);
        let tools = pipeline.signals(&options).unwrap();
        let names: Vec<&str> = tools.iter().map(|t| t.canonical_name.as_str()).collect();
        assert!(names.contains(&"streamlit"));
        assert!(names.contains(&"gradio"));
    }

    #[test]
    fn missing_evidence_file_is_an_error() {
        let (registry, heuristics) = fixtures();
        let options = PipelineOptions {
            evidence_files: vec![PathBuf::from("/nonexistent/evidence.json")],
            ..Default::default()
        };
        assert!(Pipeline::new(&registry, &heuristics)
            .collect(&options)
            .is_err());
    }

    #[test]
    fn nothing_to_collect() {
        let (registry, heuristics) = fixtures();
        let collected = Pipeline::new(&registry, &heuristics)
            .collect(&PipelineOptions::default())
            .unwrap();
        assert!(collected.sources.is_empty());
        assert!(collected.detections.is_empty());
    }
}
