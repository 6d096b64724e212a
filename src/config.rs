//! Configuration: collector store layout and output defaults.
//!
//! ```toml
//! [store]
//! root = "data"
//!
//! [[collector]]
//! name = "srs"
//! path = "data/srs"   # optional, defaults to <root>/<name>
//!
//! [defaults]
//! verbosity = 1
//! precision = 3
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::collector::{DirectoryCollector, InputResolver};
use crate::{MungeError, MungeResult};

/// Config file looked up when none is given.
pub const DEFAULT_CONFIG_PATH: &str = "munge.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MungeConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default, rename = "collector")]
    pub collectors: Vec<CollectorConfig>,
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub root: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            root: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    pub name: String,
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default = "default_verbosity")]
    pub verbosity: u8,
    #[serde(default)]
    pub precision: Option<usize>,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            verbosity: default_verbosity(),
            precision: None,
        }
    }
}

fn default_verbosity() -> u8 {
    1
}

/// Load a config file; `.yaml`/`.yml` are read as YAML, anything else as TOML.
pub fn load_config(path: &Path) -> MungeResult<MungeConfig> {
    let s = std::fs::read_to_string(path)
        .map_err(|e| MungeError::Config(format!("{}: {e}", path.display())))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let cfg = if is_yaml {
        serde_yaml::from_str(&s).map_err(|e| MungeError::Config(format!("{}: {e}", path.display())))?
    } else {
        toml::from_str(&s).map_err(|e| MungeError::Config(format!("{}: {e}", path.display())))?
    };
    debug!(path = %path.display(), "loaded config");
    Ok(cfg)
}

/// Load `path` if given, else `munge.toml` if present, else defaults.
pub fn load_or_default(path: Option<&Path>) -> MungeResult<MungeConfig> {
    match path {
        Some(p) => load_config(p),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.is_file() {
                load_config(default_path)
            } else {
                Ok(MungeConfig::default())
            }
        }
    }
}

impl MungeConfig {
    /// Collector name -> directory, explicit entries or discovered sub-directories.
    pub fn collector_dirs(&self) -> MungeResult<Vec<(String, PathBuf)>> {
        if !self.collectors.is_empty() {
            return Ok(self
                .collectors
                .iter()
                .map(|c| {
                    let path = c
                        .path
                        .clone()
                        .unwrap_or_else(|| self.store.root.join(&c.name));
                    (c.name.clone(), path)
                })
                .collect());
        }

        if !self.store.root.is_dir() {
            warn!(root = %self.store.root.display(), "store root not found, no collectors registered");
            return Ok(Vec::new());
        }

        let mut found = Vec::new();
        for entry in std::fs::read_dir(&self.store.root)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if !name.starts_with('.') {
                    found.push((name.to_string(), path.clone()));
                }
            }
        }
        found.sort();
        Ok(found)
    }

    /// Build a resolver over the configured directory collectors.
    pub fn resolver(&self) -> MungeResult<InputResolver> {
        let mut resolver = InputResolver::new();
        for (name, path) in self.collector_dirs()? {
            resolver.register(DirectoryCollector::new(name, path))?;
        }
        Ok(resolver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("munge.toml");
        std::fs::write(
            &path,
            "[store]\nroot = \"store\"\n\n[[collector]]\nname = \"srs\"\n\n[[collector]]\nname = \"web\"\npath = \"/tmp/web\"\n\n[defaults]\nprecision = 2\n",
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.defaults.verbosity, 1);
        assert_eq!(cfg.defaults.precision, Some(2));
        assert_eq!(
            cfg.collector_dirs().unwrap(),
            vec![
                ("srs".to_string(), PathBuf::from("store/srs")),
                ("web".to_string(), PathBuf::from("/tmp/web")),
            ]
        );
    }

    #[test]
    fn test_yaml_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("munge.yaml");
        std::fs::write(&path, "defaults:\n  verbosity: 0\ncollector:\n  - name: srs\n").unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.defaults.verbosity, 0);
        assert_eq!(cfg.collectors[0].name, "srs");
        assert_eq!(cfg.store.root, PathBuf::from("data"));
    }

    #[test]
    fn test_discovers_collector_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("web")).unwrap();
        std::fs::create_dir(dir.path().join("srs")).unwrap();
        std::fs::create_dir(dir.path().join(".cache")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let cfg = MungeConfig {
            store: StoreConfig {
                root: dir.path().to_path_buf(),
            },
            ..Default::default()
        };
        let resolver = cfg.resolver().unwrap();
        assert_eq!(resolver.names(), vec!["srs", "web"]);
    }

    #[test]
    fn test_invalid_config_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "defaults = 3").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, MungeError::Config(msg) if msg.contains("bad.toml")));
    }
}
