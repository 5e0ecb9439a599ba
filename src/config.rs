use crate::render::RenderMode;
use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_VERSION: i64 = 1;
const APP_NAME: &str = "sqlite-cli";
const CONFIG_PATH_ENV: &str = "SQLITE_CLI_CONFIG_PATH";
const HISTORY_FILE_NAME: &str = ".vsqlite_history";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub history: History,
    #[serde(default)]
    pub display: Display,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            history: History::default(),
            display: Display::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct History {
    pub enabled: Option<bool>,
    pub path: Option<String>,
}

impl Default for History {
    fn default() -> Self {
        Self {
            enabled: Some(true),
            path: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Display {
    pub mode: Option<RenderMode>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    /// Read the config at `path`; a missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        if value.get("version").and_then(toml::Value::as_integer).is_none() {
            bail!(
                "config file {} is not versioned. Add `version = {CONFIG_VERSION}` at the top",
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = {}",
                self.version,
                path.display(),
                CONFIG_VERSION
            );
        }
        if let Some(history_path) = &self.history.path {
            if history_path.trim().is_empty() {
                bail!("history.path in {} must not be empty", path.display());
            }
        }
        Ok(())
    }

    pub fn history_enabled(&self) -> bool {
        self.history.enabled.unwrap_or(true)
    }

    /// Configured history file, else `~/.vsqlite_history`. `None` when no
    /// home directory can be resolved.
    pub fn history_path(&self) -> Option<PathBuf> {
        match &self.history.path {
            Some(path) => Some(PathBuf::from(path)),
            None => dirs::home_dir().map(|home| home.join(HISTORY_FILE_NAME)),
        }
    }

    pub fn display_mode(&self) -> RenderMode {
        self.display.mode.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_config(contents: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, contents)?;
        Ok((dir, path))
    }

    #[test]
    fn missing_file_uses_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = Config::load(&dir.path().join("absent.toml"))?;
        assert!(config.history_enabled());
        assert_eq!(config.display_mode(), RenderMode::Table);
        Ok(())
    }

    #[test]
    fn reads_history_and_display_sections() -> Result<()> {
        let (_dir, path) = write_config(
            r#"
version = 1

[history]
enabled = false
path = "/tmp/custom_history"

[display]
mode = "expanded"
"#,
        )?;
        let config = Config::load(&path)?;
        assert!(!config.history_enabled());
        assert_eq!(
            config.history_path(),
            Some(PathBuf::from("/tmp/custom_history"))
        );
        assert_eq!(config.display_mode(), RenderMode::Expanded);
        Ok(())
    }

    #[test]
    fn sections_are_optional() -> Result<()> {
        let (_dir, path) = write_config("version = 1\n")?;
        let config = Config::load(&path)?;
        assert!(config.history_enabled());
        assert_eq!(config.display_mode(), RenderMode::Table);
        Ok(())
    }

    #[test]
    fn loaded_config_keeps_its_version() -> Result<()> {
        let (_dir, path) = write_config("version = 1\n[display]\nmode = \"json\"\n")?;
        let config = Config::load(&path)?;
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.display_mode(), RenderMode::Json);
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected() -> Result<()> {
        let (_dir, path) = write_config("[display]\nmode = \"json\"\n")?;
        let error = Config::load(&path).unwrap_err().to_string();
        assert!(error.contains("not versioned"));
        Ok(())
    }

    #[test]
    fn unsupported_version_is_rejected() -> Result<()> {
        let (_dir, path) = write_config("version = 7\n")?;
        let error = Config::load(&path).unwrap_err().to_string();
        assert!(error.contains("unsupported config version 7"));
        Ok(())
    }

    #[test]
    fn unknown_display_mode_is_rejected() -> Result<()> {
        let (_dir, path) = write_config("version = 1\n[display]\nmode = \"vertical\"\n")?;
        assert!(Config::load(&path).is_err());
        Ok(())
    }

    #[test]
    fn empty_history_path_is_rejected() -> Result<()> {
        let (_dir, path) = write_config("version = 1\n[history]\npath = \"  \"\n")?;
        let error = format!("{:#}", Config::load(&path).unwrap_err());
        assert!(error.contains("history.path"));
        Ok(())
    }

    #[test]
    fn malformed_toml_is_reported_with_the_path() -> Result<()> {
        let (_dir, path) = write_config("version = \n")?;
        let error = Config::load(&path).unwrap_err().to_string();
        assert!(error.contains("parse TOML config"));
        Ok(())
    }
}
