use anyhow::Context;
use dox_core::ErrorPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for dox
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub documents: DocumentsConfig,

    #[serde(default)]
    pub errors: ErrorsConfig,

    #[serde(default)]
    pub masking: MaskingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Used when `--out` is not given
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsConfig {
    #[serde(default = "default_extension")]
    pub extension: String,

    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub follow_links: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorsConfig {
    #[serde(default)]
    pub on_document_error: ErrorPolicy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaskingConfig {
    /// Applied after the built-in card, phone and email rules
    #[serde(default)]
    pub extra_rules: Vec<RuleDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub pattern: String,
    pub token: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            exclude: default_exclude(),
            follow_links: false,
        }
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from("raw_docx.jsonl")
}

fn default_extension() -> String {
    "docx".to_string()
}

fn default_exclude() -> Vec<String> {
    // Word owner/lock files
    vec!["**/~$*".to_string()]
}

impl Config {
    /// Load config from the default location, or defaults if there is none
    pub fn load() -> anyhow::Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Config::default()),
        }
    }

    /// Load config from an explicit file, which must exist
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Get config file path
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "dox", "dox")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
