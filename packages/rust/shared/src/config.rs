//! Application configuration for pipeverb.
//!
//! User config lives at `~/.pipeverb/pipeverb.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PipeVerbError, Result};
use crate::types::PipelineDef;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "pipeverb.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".pipeverb";

// ---------------------------------------------------------------------------
// Config structs (matching pipeverb.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Named pipelines runnable with `--pipeline`.
    #[serde(default)]
    pub pipelines: Vec<PipelineDef>,
}

impl AppConfig {
    /// Look up a named pipeline.
    pub fn pipeline(&self, name: &str) -> Result<&PipelineDef> {
        self.pipelines
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| PipeVerbError::config(format!("no pipeline named '{name}'")))
    }
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// How results are printed.
    #[serde(default)]
    pub output: OutputFormat,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output: OutputFormat::Pretty,
        }
    }
}

/// JSON rendering style for pipeline results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented, multi-line JSON.
    #[default]
    Pretty,
    /// Single-line JSON.
    Compact,
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.pipeverb/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PipeVerbError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.pipeverb/pipeverb.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PipeVerbError::io(path, e))?;
    parse_config(&content)
        .map_err(|e| PipeVerbError::config(format!("failed to parse {}: {e}", path.display())))
}

fn parse_config(content: &str) -> std::result::Result<AppConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PipeVerbError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let content = render_config(&AppConfig::default())?;

    std::fs::write(&path, content).map_err(|e| PipeVerbError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Serialize a config back to TOML.
pub fn render_config(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(config).map_err(|e| PipeVerbError::config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_config_serializes() {
        let toml_str = render_config(&AppConfig::default()).expect("serialize default config");
        assert!(toml_str.contains("output = \"pretty\""));
    }

    #[test]
    fn config_roundtrip() {
        let toml_str = render_config(&AppConfig::default()).expect("serialize");
        let parsed = parse_config(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.output, OutputFormat::Pretty);
        assert!(parsed.pipelines.is_empty());
    }

    #[test]
    fn config_with_pipelines() {
        let toml_str = r#"
[defaults]
output = "compact"

[[pipelines]]
name = "mean-by-b"
description = "Average every column per value of b"
steps = [
  { verb = "groupby", args = ["b"] },
  { verb = "summarize_mean" },
]

[[pipelines]]
name = "pad"
steps = [{ verb = "append_col", kwargs = { x = 5 } }]
"#;
        let config = parse_config(toml_str).expect("parse");
        assert_eq!(config.defaults.output, OutputFormat::Compact);
        assert_eq!(config.pipelines.len(), 2);

        let pad = config.pipeline("pad").expect("pad pipeline");
        assert_eq!(pad.steps[0].kwargs.get("x"), Some(&json!(5)));
    }

    #[test]
    fn missing_pipeline_is_config_error() {
        let err = AppConfig::default().pipeline("nope").unwrap_err();
        assert!(err.to_string().contains("no pipeline named 'nope'"));
    }

    #[test]
    fn load_from_file() {
        let dir = std::env::temp_dir().join(format!("pipeverb-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("mkdir");
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[defaults]\noutput = \"compact\"\n").expect("write");

        let config = load_config_from(&path).expect("load");
        assert_eq!(config.defaults.output, OutputFormat::Compact);

        std::fs::write(&path, "[defaults]\noutput = \"loud\"\n").expect("write");
        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
