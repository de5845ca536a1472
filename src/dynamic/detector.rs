//! Agent-framework detection from channel scores.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dynamic::channels::{CodeAnalysis, ConfigAnalysis, StructureAnalysis};
use crate::dynamic::code::{CodeExtractor, FallbackExtractor};
use crate::dynamic::walk::{lower_name, ProjectWalk};
use crate::registry::DynamicHeuristics;

/// Name reported when nothing better can be inferred.
pub const UNKNOWN_FRAMEWORK: &str = "unknown-agent-framework";

/// Bounds and threshold for one detection run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorLimits {
    pub max_source_files: usize,
    pub max_config_files: usize,
    pub max_depth: usize,
    pub confidence_threshold: f32,
}

impl Default for DetectorLimits {
    fn default() -> Self {
        Self {
            max_source_files: 50,
            max_config_files: 30,
            max_depth: 8,
            confidence_threshold: 0.1,
        }
    }
}

/// Per-channel evidence behind a detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionEvidence {
    pub structure: StructureAnalysis,
    pub code: CodeAnalysis,
    pub config: ConfigAnalysis,
}

impl DetectionEvidence {
    /// Mean of the three channel scores.
    pub fn confidence(&self) -> f32 {
        (self.structure.score + self.code.score + self.config.score) / 3.0
    }
}

/// An agent framework inferred from a project tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicDetection {
    pub name: String,
    pub confidence: f32,
    pub description: String,
    /// Sorted, deduplicated terms for resolving the framework's identity.
    pub search_terms: Vec<String>,
    pub project_path: String,
    pub evidence: DetectionEvidence,
}

/// Scores a project tree for signs of an agent framework.
pub struct AgentDetector<'a> {
    tables: &'a DynamicHeuristics,
    limits: DetectorLimits,
}

impl<'a> AgentDetector<'a> {
    pub fn new(tables: &'a DynamicHeuristics, limits: DetectorLimits) -> Self {
        Self { tables, limits }
    }

    /// Detect with the default structural-then-regex code extractor.
    pub fn detect(&self, root: &Path) -> Vec<DynamicDetection> {
        self.detect_with(root, &mut FallbackExtractor::new())
    }

    /// Detect using a specific code extractor.
    ///
    /// Returns at most one detection; an empty list when the root is not a
    /// directory or the confidence is below the threshold.
    pub fn detect_with(
        &self,
        root: &Path,
        extractor: &mut dyn CodeExtractor,
    ) -> Vec<DynamicDetection> {
        if !root.is_dir() {
            tracing::debug!("Skipping agent detection, {} is not a directory", root.display());
            return Vec::new();
        }

        let evidence = self.evidence(root, extractor);
        let confidence = evidence.confidence();
        tracing::debug!(
            "Agent framework scores for {}: structure={:.2} code={:.2} config={:.2}",
            root.display(),
            evidence.structure.score,
            evidence.code.score,
            evidence.config.score
        );

        if confidence < self.limits.confidence_threshold {
            return Vec::new();
        }

        let name = self.infer_name(&evidence, root);
        let description = describe(&evidence);
        let search_terms = self.search_terms(&name, &evidence);
        vec![DynamicDetection {
            name,
            confidence,
            description,
            search_terms,
            project_path: root.display().to_string(),
            evidence,
        }]
    }

    /// Run all three channels without applying the threshold.
    pub fn evidence(&self, root: &Path, extractor: &mut dyn CodeExtractor) -> DetectionEvidence {
        let walk = ProjectWalk::scan(root, self.limits.max_depth, &self.tables.skip_directories);
        DetectionEvidence {
            structure: StructureAnalysis::analyze(&walk, self.tables),
            code: CodeAnalysis::analyze(
                &walk,
                self.tables,
                extractor,
                self.limits.max_source_files,
            ),
            config: ConfigAnalysis::analyze(&walk, self.tables, self.limits.max_config_files),
        }
    }

    fn infer_name(&self, evidence: &DetectionEvidence, root: &Path) -> String {
        if let Some(hint) = evidence.config.dominant_hint() {
            return hint.to_string();
        }

        for import in &evidence.code.agent_imports {
            let lower = import.to_lowercase();
            if let Some(framework) = self
                .tables
                .import_frameworks
                .iter()
                .find(|f| lower.contains(f.pattern.as_str()))
            {
                return framework.name.clone();
            }
        }

        for dir in &evidence.structure.agent_directories {
            let name = lower_name(Path::new(dir));
            if let Some(label) = self
                .tables
                .directory_labels
                .iter()
                .find(|l| name.contains(l.keyword.as_str()))
            {
                return label.label.clone();
            }
        }

        let project = project_name(root);
        if self
            .tables
            .project_name_keywords
            .iter()
            .any(|k| project.contains(k.as_str()))
        {
            return format!("custom-agent-framework-{}", project);
        }

        UNKNOWN_FRAMEWORK.to_string()
    }

    fn search_terms(&self, name: &str, evidence: &DetectionEvidence) -> Vec<String> {
        let mut terms = BTreeSet::new();
        if name != UNKNOWN_FRAMEWORK {
            terms.insert(name.to_string());
            terms.insert(format!("{} ai agent", name));
        }

        for extra in &self.tables.directory_search_terms {
            if evidence
                .structure
                .agent_directories
                .iter()
                .any(|d| d.to_lowercase().contains(extra.keyword.as_str()))
            {
                terms.insert(extra.term.clone());
            }
        }

        terms.extend(self.tables.generic_search_terms.iter().cloned());
        terms.into_iter().collect()
    }
}

fn project_name(root: &Path) -> String {
    let resolved = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    lower_name(&resolved)
}

fn describe(evidence: &DetectionEvidence) -> String {
    let mut features = Vec::new();
    if !evidence.structure.agent_directories.is_empty() {
        features.push(format!(
            "{} agent directories",
            evidence.structure.agent_directories.len()
        ));
    }
    if !evidence.code.agent_classes.is_empty() {
        features.push(format!("{} agent classes", evidence.code.agent_classes.len()));
    }
    if !evidence.code.agent_functions.is_empty() {
        features.push(format!(
            "{} agent functions",
            evidence.code.agent_functions.len()
        ));
    }
    if !evidence.config.agent_configs.is_empty() {
        features.push("configuration files".to_string());
    }

    if features.is_empty() {
        "Detected AI agent framework".to_string()
    } else {
        format!("AI agent framework with {}", features.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::code::RegexExtractor;
    use crate::registry::Heuristics;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn tables() -> DynamicHeuristics {
        Heuristics::builtin().unwrap().dynamic
    }

    fn project(temp: &TempDir, name: &str) -> PathBuf {
        let root = temp.path().join(name);
        fs::create_dir(&root).unwrap();
        root
    }

    #[test]
    fn plain_project_reports_nothing() {
        let temp = TempDir::new().unwrap();
        let root = project(&temp, "calculator");
        fs::create_dir(root.join("src")).unwrap();
        fs::write(root.join("src/main.py"), "def add(a, b):\n    return a + b\n").unwrap();

        let tables = tables();
        let detector = AgentDetector::new(&tables, DetectorLimits::default());
        assert!(detector.detect(&root).is_empty());
    }

    #[test]
    fn missing_root_reports_nothing() {
        let tables = tables();
        let detector = AgentDetector::new(&tables, DetectorLimits::default());
        assert!(detector.detect(Path::new("/nonexistent/project")).is_empty());
    }

    #[test]
    fn config_hint_names_the_framework() {
        let temp = TempDir::new().unwrap();
        let root = project(&temp, "myproject");
        fs::create_dir(root.join("agents")).unwrap();
        fs::write(
            root.join("agents/researcher.py"),
            "from crewai import Agent\nclass ResearchAgent:\n    pass\n",
        )
        .unwrap();
        fs::write(root.join("crew.yaml"), "framework: crewai\nagents:\n  - researcher\n").unwrap();

        let tables = tables();
        let detector = AgentDetector::new(&tables, DetectorLimits::default());
        let detections = detector.detect(&root);
        assert_eq!(detections.len(), 1);

        let detection = &detections[0];
        assert_eq!(detection.name, "crewai");
        assert!(detection.confidence > 0.5);
        assert!(detection.description.contains("1 agent directories"));
        assert!(detection.description.contains("1 agent classes"));
        assert!(detection.description.ends_with("configuration files"));
        assert!(detection.search_terms.contains(&"crewai ai agent".to_string()));

        let mut sorted = detection.search_terms.clone();
        sorted.sort();
        assert_eq!(sorted, detection.search_terms);
    }

    #[test]
    fn import_names_the_framework_without_hints() {
        let temp = TempDir::new().unwrap();
        let root = project(&temp, "research");
        fs::write(
            root.join("main.py"),
            "from langchain.agents import initialize_agent\nclass PlannerAgent:\n    pass\n",
        )
        .unwrap();

        let tables = tables();
        let detector = AgentDetector::new(&tables, DetectorLimits::default());
        let detections = detector.detect_with(&root, &mut RegexExtractor);
        assert_eq!(detections[0].name, "langchain");
    }

    #[test]
    fn directory_label_names_the_framework() {
        let temp = TempDir::new().unwrap();
        let root = project(&temp, "sandbox");
        fs::create_dir(root.join("agents")).unwrap();
        fs::create_dir(root.join("workflows")).unwrap();

        let tables = tables();
        let detector = AgentDetector::new(&tables, DetectorLimits::default());
        let detections = detector.detect(&root);
        assert_eq!(detections[0].name, "multi-agent-framework");
        assert!(detections[0]
            .search_terms
            .contains(&"ai workflow agent framework".to_string()));
    }

    #[test]
    fn project_name_fallback() {
        let temp = TempDir::new().unwrap();
        let root = project(&temp, "my-ai-app");
        fs::create_dir(root.join("workflows")).unwrap();
        fs::create_dir(root.join("tasks")).unwrap();

        let tables = tables();
        let detector = AgentDetector::new(&tables, DetectorLimits::default());
        let detections = detector.detect(&root);
        assert_eq!(detections[0].name, "custom-agent-framework-my-ai-app");
        assert_eq!(detections[0].description, "AI agent framework with 2 agent directories");
    }

    #[test]
    fn unknown_framework_has_only_generic_terms() {
        let temp = TempDir::new().unwrap();
        let root = project(&temp, "sandbox");
        fs::create_dir(root.join("workflows")).unwrap();
        fs::create_dir(root.join("tasks")).unwrap();

        let tables = tables();
        let detector = AgentDetector::new(&tables, DetectorLimits::default());
        let detection = &detector.detect(&root)[0];
        assert_eq!(detection.name, UNKNOWN_FRAMEWORK);
        assert_eq!(
            detection.search_terms,
            [
                "ai agent orchestration",
                "ai workflow agent framework",
                "llm agent framework",
                "multi agent framework",
            ]
        );
    }

    #[test]
    fn noise_directories_are_ignored() {
        let temp = TempDir::new().unwrap();
        let root = project(&temp, "sandbox");
        fs::create_dir_all(root.join("node_modules/agents/crew")).unwrap();
        fs::write(root.join("node_modules/agents/crew/agent.yaml"), "agents: []").unwrap();

        let tables = tables();
        let detector = AgentDetector::new(&tables, DetectorLimits::default());
        assert!(detector.detect(&root).is_empty());
    }

    #[test]
    fn confidence_is_monotonic_and_clamped() {
        let temp = TempDir::new().unwrap();
        let root = project(&temp, "sandbox");
        let tables = tables();
        let detector = AgentDetector::new(&tables, DetectorLimits::default());

        let mut previous = 0.0;
        for dir in ["agents", "crew", "tasks", "tools", "prompts", "sessions"] {
            fs::create_dir(root.join(dir)).unwrap();
            fs::write(
                root.join(dir).join(format!("{}_agent.py", dir)),
                "class TaskAgent:\n    pass\n",
            )
            .unwrap();
            let confidence = detector.evidence(&root, &mut RegexExtractor).confidence();
            assert!(confidence >= previous);
            assert!((0.0..=1.0).contains(&confidence));
            previous = confidence;
        }
    }

    #[test]
    fn threshold_is_configurable() {
        let temp = TempDir::new().unwrap();
        let root = project(&temp, "sandbox");
        fs::create_dir(root.join("agents")).unwrap();
        fs::create_dir(root.join("workflows")).unwrap();

        let tables = tables();
        let strict = DetectorLimits {
            confidence_threshold: 0.9,
            ..Default::default()
        };
        assert!(AgentDetector::new(&tables, strict).detect(&root).is_empty());
    }
}
