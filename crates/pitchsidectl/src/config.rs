use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// CLI settings stored in `~/.pitchside/config.yaml`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Tournament backend URL used by `login`
    #[serde(default)]
    pub server_url: Option<String>,
    /// Credential storage file; defaults to `~/.pitchside/storage.json`
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn get_config_path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join("config.yaml"))
    }

    fn home_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".pitchside"))
    }

    /// Backend URL: command line, then config file, then the default.
    pub fn resolve_server_url(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.server_url.clone())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
    }

    /// Credential storage path: command line, then config file, then the default.
    pub fn resolve_store_path(&self, flag: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = flag.map(Path::to_path_buf).or_else(|| self.store_path.clone()) {
            return Ok(path);
        }
        Ok(Self::home_dir()?.join("storage.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let config = Config {
            server_url: Some("http://api.example.com".to_string()),
            store_path: Some(PathBuf::from("/tmp/storage.json")),
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_resolve_server_url_precedence() {
        let config = Config {
            server_url: Some("http://from-config".to_string()),
            store_path: None,
        };
        assert_eq!(config.resolve_server_url(Some("http://from-flag")), "http://from-flag");
        assert_eq!(config.resolve_server_url(None), "http://from-config");
        assert_eq!(Config::default().resolve_server_url(None), DEFAULT_SERVER_URL);
    }

    #[test]
    fn test_resolve_store_path_precedence() {
        let config = Config {
            server_url: None,
            store_path: Some(PathBuf::from("/from/config.json")),
        };
        assert_eq!(
            config.resolve_store_path(Some(Path::new("/from/flag.json"))).unwrap(),
            PathBuf::from("/from/flag.json")
        );
        assert_eq!(config.resolve_store_path(None).unwrap(), PathBuf::from("/from/config.json"));
    }
}
