//! Layering of YAML configuration values.
//!
//! - Mappings merge key by key, recursively
//! - Sequences and scalars in the overlay replace the base value
//! - A null in the overlay removes the key, restoring the built-in default

use serde_yaml::Value;

/// Merge `overlay` onto `base`.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in overlay_map {
                if value.is_null() {
                    merged.remove(key);
                    continue;
                }
                let next = match base_map.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Mapping(merged)
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Merge layers in order; the last layer wins.
pub fn merge_configs(layers: &[Value]) -> Value {
    layers
        .iter()
        .fold(Value::Mapping(Default::default()), |acc, layer| {
            deep_merge(&acc, layer)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn project_overrides_single_limit() {
        let user = yaml("limits:\n  max_depth: 4\n  max_source_files: 20\n");
        let project = yaml("limits:\n  max_depth: 10\n");

        let merged = deep_merge(&user, &project);
        assert_eq!(merged["limits"]["max_depth"], 10);
        assert_eq!(merged["limits"]["max_source_files"], 20);
    }

    #[test]
    fn null_restores_default() {
        let user = yaml("registry: /opt/tools.yml\noutput:\n  format: json\n");
        let project = yaml("registry: ~\n");

        let merged = deep_merge(&user, &project);
        assert!(merged.get("registry").is_none());
        assert_eq!(merged["output"]["format"], "json");
    }

    #[test]
    fn scalar_replaces_mapping() {
        let merged = deep_merge(&yaml("detection:\n  agents: true\n"), &yaml("detection: off\n"));
        assert_eq!(merged["detection"], "off");
    }

    #[test]
    fn layers_apply_in_order() {
        let merged = merge_configs(&[
            yaml("output:\n  color: true\n"),
            yaml("output:\n  color: false\n"),
            yaml("output:\n  format: json\n"),
        ]);
        assert_eq!(merged["output"]["color"], false);
        assert_eq!(merged["output"]["format"], "json");
    }

    #[test]
    fn no_layers_is_empty_mapping() {
        assert_eq!(merge_configs(&[]), Value::Mapping(Default::default()));
    }
}
