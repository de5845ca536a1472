//! Tool name resolution against known registry data.
//!
//! [`ToolRegistry`] is an immutable value built once per process and passed
//! to the aggregator and the rule engine. Derived indexes (package names,
//! shared environment variables, categories) are computed at construction.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::error::{PitfallError, Result};
use crate::registry::builtin;
use crate::registry::entry::{RegistryEntry, RegistryManifest};

/// Immutable lookup table of known tools.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, RegistryEntry>,
    package_index: HashMap<String, String>,
    shared_env_vars: BTreeMap<String, Vec<String>>,
    categories: BTreeMap<String, Vec<String>>,
}

impl ToolRegistry {
    /// Build a registry from entries keyed by canonical name.
    ///
    /// Keys are lowercased. Package names map back to their tool key; when
    /// two tools claim a package the alphabetically first key keeps it.
    pub fn new(tools: BTreeMap<String, RegistryEntry>) -> Self {
        let tools: BTreeMap<String, RegistryEntry> = tools
            .into_iter()
            .map(|(key, entry)| (key.to_lowercase(), entry))
            .collect();

        let mut package_index = HashMap::new();
        let mut env_users: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut categories: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for (key, entry) in &tools {
            for package in &entry.package_names {
                package_index
                    .entry(package.to_lowercase())
                    .or_insert_with(|| key.clone());
            }
            for var in &entry.common_env_vars {
                env_users.entry(var.clone()).or_default().push(key.clone());
            }
            if let Some(category) = &entry.category {
                categories
                    .entry(category.clone())
                    .or_default()
                    .push(key.clone());
            }
        }

        let shared_env_vars = env_users
            .into_iter()
            .filter(|(_, users)| users.len() >= 2)
            .collect();

        Self {
            tools,
            package_index,
            shared_env_vars,
            categories,
        }
    }

    /// A registry with no known tools.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the registry embedded in the binary.
    pub fn builtin() -> Result<Self> {
        let manifest = builtin::load_manifest()?;
        Ok(Self::from_manifest(manifest))
    }

    /// Load a registry from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PitfallError::ConfigNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                PitfallError::Io(e)
            }
        })?;

        let manifest: RegistryManifest =
            serde_yaml::from_str(&content).map_err(|e| PitfallError::ConfigParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(Self::from_manifest(manifest))
    }

    /// Load from `path` if given, else the built-in data.
    ///
    /// Any failure is logged and yields an empty registry, so rules relying
    /// on registry data simply find nothing.
    pub fn load_or_empty(path: Option<&Path>) -> Self {
        let loaded = match path {
            Some(p) => Self::from_file(p),
            None => Self::builtin(),
        };

        match loaded {
            Ok(registry) => {
                tracing::debug!("Loaded tool registry with {} tools", registry.len());
                registry
            }
            Err(e) => {
                let err = PitfallError::RegistryUnavailable {
                    message: e.to_string(),
                };
                tracing::warn!("{}; continuing with an empty registry", err);
                Self::empty()
            }
        }
    }

    pub fn from_manifest(manifest: RegistryManifest) -> Self {
        Self::new(manifest.tools)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get an entry by canonical key (case-insensitive).
    pub fn get(&self, key: &str) -> Option<&RegistryEntry> {
        self.tools.get(&key.to_lowercase())
    }

    /// Iterate over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegistryEntry)> {
        self.tools.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Resolve a tool or package name to its canonical key.
    ///
    /// Matching is case-insensitive and exact; there is no fuzzy matching.
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        let lower = name.trim().to_lowercase();
        if let Some((key, _)) = self.tools.get_key_value(&lower) {
            return Some(key.as_str());
        }
        self.package_index.get(&lower).map(|k| k.as_str())
    }

    /// Find the tool that a package installs.
    pub fn by_package(&self, package: &str) -> Option<(&str, &RegistryEntry)> {
        let key = self.package_index.get(&package.to_lowercase())?;
        self.tools.get(key).map(|entry| (key.as_str(), entry))
    }

    /// All tools in a category.
    pub fn by_category(&self, category: &str) -> Vec<(&str, &RegistryEntry)> {
        self.categories
            .get(category)
            .into_iter()
            .flatten()
            .filter_map(|key| self.tools.get(key).map(|entry| (key.as_str(), entry)))
            .collect()
    }

    /// Tools whose key, name, description or packages contain `query`.
    pub fn search(&self, query: &str) -> Vec<(&str, &RegistryEntry)> {
        let needle = query.to_lowercase();
        self.iter()
            .filter(|(key, entry)| {
                key.contains(&needle)
                    || entry.name.to_lowercase().contains(&needle)
                    || entry.description.to_lowercase().contains(&needle)
                    || entry
                        .package_names
                        .iter()
                        .any(|p| p.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Environment variables used by two or more known tools, with the tools
    /// that use each.
    pub fn shared_env_vars(&self) -> &BTreeMap<String, Vec<String>> {
        &self.shared_env_vars
    }

    /// Tool keys grouped by category.
    pub fn categories(&self) -> &BTreeMap<String, Vec<String>> {
        &self.categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn entry(name: &str, packages: &[&str], category: Option<&str>, vars: &[&str]) -> RegistryEntry {
        RegistryEntry {
            name: name.to_string(),
            package_names: packages.iter().map(|s| s.to_string()).collect(),
            category: category.map(str::to_string),
            common_env_vars: vars.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn fixture() -> ToolRegistry {
        let mut tools = BTreeMap::new();
        tools.insert(
            "autogen".to_string(),
            entry("AutoGen", &["pyautogen"], Some("agent-framework"), &["OPENAI_API_KEY"]),
        );
        tools.insert(
            "CrewAI".to_string(),
            entry("CrewAI", &["crewai"], Some("agent-framework"), &["OPENAI_API_KEY"]),
        );
        tools.insert(
            "streamlit".to_string(),
            entry("Streamlit", &["streamlit"], Some("web-interface"), &["STREAMLIT_SERVER_PORT"]),
        );
        ToolRegistry::new(tools)
    }

    #[test]
    fn canonical_name_resolves_key_case_insensitively() {
        let registry = fixture();
        assert_eq!(registry.canonical_name("Streamlit"), Some("streamlit"));
        assert_eq!(registry.canonical_name("crewai"), Some("crewai"));
    }

    #[test]
    fn canonical_name_resolves_package_names() {
        let registry = fixture();
        assert_eq!(registry.canonical_name("PyAutoGen"), Some("autogen"));
        assert_eq!(registry.canonical_name("unknown-tool"), None);
    }

    #[test]
    fn shared_env_vars_only_include_multi_tool_vars() {
        let registry = fixture();
        let shared = registry.shared_env_vars();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared["OPENAI_API_KEY"], ["autogen", "crewai"]);
    }

    #[test]
    fn categories_group_tool_keys() {
        let registry = fixture();
        assert_eq!(registry.categories()["agent-framework"], ["autogen", "crewai"]);
        assert_eq!(registry.by_category("web-interface").len(), 1);
        assert!(registry.by_category("nothing").is_empty());
    }

    #[test]
    fn by_package_returns_entry() {
        let registry = fixture();
        let (key, entry) = registry.by_package("pyautogen").unwrap();
        assert_eq!(key, "autogen");
        assert_eq!(entry.name, "AutoGen");
    }

    #[test]
    fn search_matches_descriptions_and_packages() {
        let registry = fixture();
        let hits: Vec<_> = registry.search("autogen").into_iter().map(|(k, _)| k).collect();
        assert_eq!(hits, ["autogen"]);
        assert_eq!(registry.search("STREAM").len(), 1);
    }

    #[test]
    fn builtin_registry_inverts_shared_env_vars() {
        let registry = ToolRegistry::builtin().unwrap();
        let users = &registry.shared_env_vars()["OPENAI_API_KEY"];
        assert!(users.contains(&"crewai".to_string()));
        assert!(users.contains(&"autogen".to_string()));
        assert!(!registry.shared_env_vars().contains_key("STREAMLIT_SERVER_PORT"));
    }

    #[test]
    fn from_file_reads_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "tools:\n  mytool:\n    name: My Tool\n    default_ports: [9000]"
        )
        .unwrap();
        let registry = ToolRegistry::from_file(file.path()).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("MyTool").is_some());
    }

    #[test]
    fn load_or_empty_degrades_on_missing_file() {
        let registry = ToolRegistry::load_or_empty(Some(Path::new("/nonexistent/registry.yml")));
        assert!(registry.is_empty());
    }

    #[test]
    fn load_or_empty_degrades_on_bad_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "tools: [not, a, map]").unwrap();
        let registry = ToolRegistry::load_or_empty(Some(file.path()));
        assert!(registry.is_empty());
    }
}
