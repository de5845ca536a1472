//! Project dependency and deployment file extraction.
//!
//! Looks at the well-known files in a project root and reports every
//! dependency, compose service or import that resolves to a known tool.
//! A file that cannot be read or parsed is logged and skipped.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;

use crate::registry::ToolRegistry;
use crate::signal::{EvidenceKind, EvidenceRecord, EvidenceSource};

static REQUIREMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z0-9][A-Za-z0-9._\-]*)\s*(?:\[[^\]]*\])?\s*([^;#]*)")
        .expect("REQUIREMENT_REGEX must compile")
});

static IMPORT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:from|import)\s+([A-Za-z_][A-Za-z0-9_]*)")
        .expect("IMPORT_REGEX must compile")
});

static PIP_INSTALL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"pip3?\s+install\s+([^&|;\n]+)").expect("PIP_INSTALL_REGEX must compile")
});

type FileParser<'a> = fn(&ProjectFileExtractor<'a>, &str, &str, &mut EvidenceSource);

/// Extracts tool references from project files.
pub struct ProjectFileExtractor<'a> {
    registry: &'a ToolRegistry,
}

impl<'a> ProjectFileExtractor<'a> {
    pub fn new(registry: &'a ToolRegistry) -> Self {
        Self { registry }
    }

    /// Scan the project root.
    pub fn extract(&self, root: &Path) -> EvidenceSource {
        let mut source =
            EvidenceSource::new(EvidenceKind::ProjectFiles, root.display().to_string());

        let parsers: [(&str, FileParser<'a>); 9] = [
            ("requirements.txt", Self::parse_requirements),
            ("pyproject.toml", Self::parse_pyproject),
            ("environment.yml", Self::parse_conda_env),
            ("conda.yml", Self::parse_conda_env),
            ("package.json", Self::parse_package_json),
            ("Dockerfile", Self::parse_dockerfile),
            ("docker-compose.yml", Self::parse_docker_compose),
            ("app.py", Self::parse_app_file),
            ("main.py", Self::parse_app_file),
        ];

        for (file_name, parse) in parsers {
            let path = root.join(file_name);
            if !path.is_file() {
                continue;
            }
            match fs::read_to_string(&path) {
                Ok(content) => parse(self, file_name, &content, &mut source),
                Err(e) => tracing::debug!("Skipping unreadable {}: {}", path.display(), e),
            }
        }

        source
    }

    fn record_package(&self, file: &str, spec: &str, method: &str, source: &mut EvidenceSource) {
        let Some((package, version)) = split_requirement(spec) else {
            return;
        };
        if let Some((tool, _)) = self.registry.by_package(&package) {
            let mut record = EvidenceRecord::for_tool(tool)
                .with_method(method)
                .with_location(file);
            if let Some(version) = version {
                record = record.with_version(version);
            }
            source.insert(format!("{}:{}", method, tool), record);
        }
    }

    fn parse_requirements(&self, file: &str, content: &str, source: &mut EvidenceSource) {
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
                continue;
            }
            self.record_package(file, line, "requirements_txt", source);
        }
    }

    fn parse_pyproject(&self, file: &str, content: &str, source: &mut EvidenceSource) {
        let doc: toml::Value = match toml::from_str(content) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::debug!("Skipping unparseable {}: {}", file, e);
                return;
            }
        };

        let project = doc.get("project");
        let dependencies = project
            .and_then(|p| p.get("dependencies"))
            .and_then(toml::Value::as_array)
            .into_iter()
            .flatten();
        let optional = project
            .and_then(|p| p.get("optional-dependencies"))
            .and_then(toml::Value::as_table)
            .into_iter()
            .flat_map(|t| t.values())
            .filter_map(toml::Value::as_array)
            .flatten();

        for dep in dependencies.chain(optional).filter_map(toml::Value::as_str) {
            self.record_package(file, dep, "pyproject_toml", source);
        }

        let poetry = doc
            .get("tool")
            .and_then(|t| t.get("poetry"))
            .and_then(|p| p.get("dependencies"))
            .and_then(toml::Value::as_table);
        for (name, spec) in poetry.into_iter().flatten() {
            let version = match spec {
                toml::Value::String(v) => v.clone(),
                toml::Value::Table(t) => t
                    .get("version")
                    .and_then(toml::Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                _ => String::new(),
            };
            self.record_package(file, &format!("{} {}", name, version), "pyproject_toml", source);
        }
    }

    fn parse_conda_env(&self, file: &str, content: &str, source: &mut EvidenceSource) {
        let doc: YamlValue = match serde_yaml::from_str(content) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::debug!("Skipping unparseable {}: {}", file, e);
                return;
            }
        };

        let Some(deps) = doc.get("dependencies").and_then(YamlValue::as_sequence) else {
            return;
        };

        for dep in deps {
            match dep {
                YamlValue::String(spec) => {
                    self.record_package(file, spec, "conda_environment_yml", source)
                }
                YamlValue::Mapping(map) => {
                    let pip = map.get("pip").and_then(YamlValue::as_sequence);
                    for spec in pip.into_iter().flatten().filter_map(YamlValue::as_str) {
                        self.record_package(file, spec, "conda_environment_yml", source);
                    }
                }
                _ => {}
            }
        }
    }

    fn parse_package_json(&self, file: &str, content: &str, source: &mut EvidenceSource) {
        let doc: JsonValue = match serde_json::from_str(content) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::debug!("Skipping unparseable {}: {}", file, e);
                return;
            }
        };

        for section in ["dependencies", "devDependencies"] {
            let Some(deps) = doc.get(section).and_then(JsonValue::as_object) else {
                continue;
            };
            for (name, version) in deps {
                let unscoped = name
                    .strip_prefix('@')
                    .and_then(|n| n.split('/').next())
                    .unwrap_or(name);
                let resolved = self
                    .registry
                    .by_package(name)
                    .or_else(|| self.registry.by_package(unscoped));
                if let Some((tool, _)) = resolved {
                    let mut record = EvidenceRecord::for_tool(tool)
                        .with_method("package_json")
                        .with_location(file);
                    if let Some(v) = version.as_str() {
                        record = record.with_version(v);
                    }
                    source.insert(format!("package_json:{}", tool), record);
                }
            }
        }
    }

    fn parse_dockerfile(&self, file: &str, content: &str, source: &mut EvidenceSource) {
        for caps in PIP_INSTALL_REGEX.captures_iter(content) {
            for spec in caps[1].split_whitespace().filter(|s| !s.starts_with('-')) {
                self.record_package(file, spec.trim_matches(['"', '\'']), "dockerfile", source);
            }
        }
    }

    fn parse_docker_compose(&self, file: &str, content: &str, source: &mut EvidenceSource) {
        let doc: YamlValue = match serde_yaml::from_str(content) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::debug!("Skipping unparseable {}: {}", file, e);
                return;
            }
        };

        let Some(services) = doc.get("services").and_then(YamlValue::as_mapping) else {
            return;
        };

        for (name, service) in services {
            let Some(name) = name.as_str() else {
                continue;
            };
            let image = service
                .get("image")
                .and_then(YamlValue::as_str)
                .unwrap_or_default();

            let tool = std::iter::once(name)
                .chain(image.split(['/', ':']))
                .find_map(|part| self.registry.canonical_name(part));
            let Some(tool) = tool else {
                continue;
            };

            let mut record = EvidenceRecord::for_tool(tool)
                .with_method("docker_compose")
                .with_location(file);
            let ports = service.get("ports").and_then(YamlValue::as_sequence);
            for mapping in ports.into_iter().flatten() {
                if let Some(port) = host_port(mapping) {
                    record = record.with_port(port);
                }
            }
            source.insert(format!("docker_compose:{}", name), record);
        }
    }

    fn parse_app_file(&self, file: &str, content: &str, source: &mut EvidenceSource) {
        for caps in IMPORT_REGEX.captures_iter(content) {
            if let Some(tool) = self.registry.canonical_name(&caps[1]) {
                let record = EvidenceRecord::for_tool(tool)
                    .with_method("code_analysis")
                    .with_location(file);
                source.insert(format!("import:{}:{}", file, tool), record);
            }
        }
    }
}

/// Split a requirement spec into package name and version constraint.
///
/// Handles pip (`pkg>=1.0`), extras (`pkg[extra]==2`), markers and conda's
/// single `=` form (`pkg=1.2`).
pub fn split_requirement(spec: &str) -> Option<(String, Option<String>)> {
    let caps = REQUIREMENT_REGEX.captures(spec)?;
    let name = caps[1].trim_end_matches(['.', '-']).to_string();
    let version = caps
        .get(2)
        .map(|m| m.as_str().trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string);
    Some((name, version))
}

/// Host side of a compose port mapping such as `"8080:80"`.
fn host_port(mapping: &YamlValue) -> Option<u16> {
    match mapping {
        YamlValue::Number(n) => n.as_u64().and_then(|p| u16::try_from(p).ok()),
        YamlValue::String(s) => {
            let parts: Vec<&str> = s.split(':').collect();
            let host = if parts.len() >= 2 {
                parts[parts.len() - 2]
            } else {
                parts[0]
            };
            host.split('/').next()?.trim().parse().ok()
        }
        _ => None,
    }
}
