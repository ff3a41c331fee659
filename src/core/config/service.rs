use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::paths::AppPaths;

/// Loads the application configuration from `config.yml`, deep-merged with
/// `secrets.yaml` from the user data directory. Secrets win on conflict so
/// API keys never need to live in the checked-in config file.
#[derive(Clone)]
pub struct ConfigService {
    paths: Arc<AppPaths>,
}

impl ConfigService {
    pub fn new(paths: Arc<AppPaths>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    pub fn config_path(&self) -> PathBuf {
        if let Ok(path) = env::var("DOCCHAT_CONFIG_PATH") {
            return PathBuf::from(path);
        }

        let user_config = self.paths.user_data_dir.join("config.yml");
        if user_config.exists() {
            return user_config;
        }

        self.paths.project_root.join("config.yml")
    }

    pub fn load(&self) -> Value {
        let public_config = load_yaml_file(&self.config_path());
        let secrets_config = load_yaml_file(&self.paths.secrets_path);
        deep_merge(&public_config, &secrets_config)
    }

    /// Deserialize one top-level section into a typed config struct,
    /// falling back to the struct's defaults when the section is absent
    /// or malformed.
    pub fn section<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        section_from(&self.load(), key)
    }
}

pub fn section_from<T>(config: &Value, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    config
        .get(key)
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

fn load_yaml_file(path: &Path) -> Value {
    let Ok(raw) = fs::read_to_string(path) else {
        return Value::Null;
    };

    match serde_yaml::from_str::<Value>(&raw) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {}", path.display(), err);
            Value::Null
        }
    }
}

fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut merged: Map<String, Value> = base_map.clone();
            for (key, overlay_value) in overlay_map {
                let entry = merged
                    .get(key)
                    .map(|base_value| deep_merge(base_value, overlay_value))
                    .unwrap_or_else(|| overlay_value.clone());
                merged.insert(key.clone(), entry);
            }
            Value::Object(merged)
        }
        (_, Value::Null) => base.clone(),
        _ => overlay.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    #[serde(default)]
    struct RetrievalSection {
        top_k: usize,
    }

    impl Default for RetrievalSection {
        fn default() -> Self {
            Self { top_k: 50 }
        }
    }

    #[test]
    fn deep_merge_prefers_overlay_leaves() {
        let base = json!({"index": {"base_url": "http://a", "dimension": 384}});
        let overlay = json!({"index": {"api_key": "k"}});

        let merged = deep_merge(&base, &overlay);
        assert_eq!(merged["index"]["base_url"], "http://a");
        assert_eq!(merged["index"]["dimension"], 384);
        assert_eq!(merged["index"]["api_key"], "k");
    }

    #[test]
    fn deep_merge_ignores_null_overlay() {
        let base = json!({"a": 1});
        assert_eq!(deep_merge(&base, &Value::Null), base);
    }

    #[test]
    fn missing_section_falls_back_to_defaults() {
        let config = json!({});
        let section: RetrievalSection = section_from(&config, "retrieval");
        assert_eq!(section.top_k, 50);
    }

    #[test]
    fn present_section_overrides_defaults() {
        let config = json!({"retrieval": {"top_k": 8}});
        let section: RetrievalSection = section_from(&config, "retrieval");
        assert_eq!(section.top_k, 8);
    }

    #[test]
    fn secrets_merge_over_public_config() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths {
            project_root: dir.path().to_path_buf(),
            user_data_dir: dir.path().to_path_buf(),
            log_dir: dir.path().join("logs"),
            secrets_path: dir.path().join("secrets.yaml"),
        };

        fs::write(
            dir.path().join("config.yml"),
            "index:\n  dimension: 128\n  api_key: \"\"\n",
        )
        .unwrap();
        fs::write(&paths.secrets_path, "index:\n  api_key: hush\n").unwrap();

        let service = ConfigService::new(Arc::new(paths));
        let config = service.load();

        assert_eq!(config["index"]["dimension"], 128);
        assert_eq!(config["index"]["api_key"], "hush");
    }
}
