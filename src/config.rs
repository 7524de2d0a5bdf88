use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::location::WatchOptions;

/// Persisted defaults for the watch options and the simulated feed.
/// Run data itself is never written to disk; only these knobs are.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub high_accuracy: bool,
    pub sample_timeout_secs: u64,
    pub max_sample_age_secs: u64,
    pub sim_speed_kmh: f64,
    pub sim_interval_ms: u64,
    pub start_lat: f64,
    pub start_lon: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            sample_timeout_secs: 5,
            max_sample_age_secs: 0,
            sim_speed_kmh: 10.0,
            sim_interval_ms: 2000,
            start_lat: 51.5074,
            start_lon: -0.1278,
        }
    }
}

impl Config {
    pub fn watch_options(&self) -> WatchOptions {
        WatchOptions {
            high_accuracy: self.high_accuracy,
            sample_timeout: Duration::from_secs(self.sample_timeout_secs),
            max_sample_age: Duration::from_secs(self.max_sample_age_secs),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "stride") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("stride_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg;
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            high_accuracy: false,
            sample_timeout_secs: 10,
            max_sample_age_secs: 30,
            sim_speed_kmh: 14.5,
            sim_interval_ms: 500,
            start_lat: 59.3293,
            start_lon: 18.0686,
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn missing_or_corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        assert_eq!(store.load(), Config::default());

        fs::write(&path, b"not json").unwrap();
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn watch_options_are_derived_from_the_config() {
        let cfg = Config {
            sample_timeout_secs: 7,
            max_sample_age_secs: 2,
            high_accuracy: false,
            ..Config::default()
        };
        let opts = cfg.watch_options();
        assert!(!opts.high_accuracy);
        assert_eq!(opts.sample_timeout, Duration::from_secs(7));
        assert_eq!(opts.max_sample_age, Duration::from_secs(2));
    }
}
