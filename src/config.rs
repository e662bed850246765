use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{Result, ScanError};
use crate::extract::ExtractorKind;

/// Scanner configuration, mirroring the host build tool's shape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Content sources and per-file-type extraction rules
    pub content: ContentConfig,

    /// Theme configuration, passed through to the host tool unmodified
    pub theme: serde_json::Value,

    /// Plugin references, passed through to the host tool unmodified
    pub plugins: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            content: ContentConfig::default(),
            theme: serde_json::json!({ "extend": {} }),
            plugins: Vec::new(),
        }
    }
}

/// Which files the host tool scans, and how tokens are extracted from them
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Glob patterns for the host tool's file discovery. Held as data and
    /// syntax-checked here; expansion belongs to the host tool.
    pub files: Vec<String>,

    /// Per-file-type extraction rule overrides, keyed by extension tag
    pub extract: IndexMap<String, ExtractorKind>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        let mut extract = IndexMap::new();
        extract.insert("rs".to_string(), ExtractorKind::InlineClass);

        Self {
            files: vec!["*.html".to_string(), "./src/**/*.rs".to_string()],
            extract,
        }
    }
}

impl ScannerConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ScanError::ConfigError {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        serde_yaml::from_str(&content).map_err(|e| ScanError::ConfigError {
            message: format!("Failed to parse YAML config: {}", e),
        })
    }

    /// Load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ScanError::ConfigError {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        serde_json::from_str(&content).map_err(|e| ScanError::ConfigError {
            message: format!("Failed to parse JSON config: {}", e),
        })
    }

    /// Load configuration from a file (auto-detect format)
    pub fn from_file(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(ScanError::ConfigError {
                message: format!(
                    "Unsupported config file format: {}. Use .yaml, .yml, or .json",
                    path.display()
                ),
            }),
        }
    }

    /// Merge with another configuration
    pub fn merge(mut self, other: Self) -> Self {
        // Merge content file patterns
        for path in other.content.files {
            if !self.content.files.contains(&path) {
                self.content.files.push(path);
            }
        }

        // Later rule overrides win
        self.content.extract.extend(other.content.extract);

        // Theme is opaque; a non-empty theme replaces the current one
        if other.theme.as_object().is_some_and(|m| !m.is_empty()) {
            self.theme = other.theme;
        }

        for plugin in other.plugins {
            if !self.plugins.contains(&plugin) {
                self.plugins.push(plugin);
            }
        }

        self
    }

    /// Check that every content file pattern is a valid glob
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.content.files {
            glob::Pattern::new(pattern)?;
        }
        Ok(())
    }

    /// Resolve the extraction rule for a file-type tag
    pub fn rule_for(&self, file_type: &str) -> ExtractorKind {
        self.content
            .extract
            .get(file_type)
            .copied()
            .unwrap_or(ExtractorKind::Default)
    }

    /// Resolve the extraction rule for a path by its extension
    pub fn rule_for_path(&self, path: &Path) -> ExtractorKind {
        match path.extension().and_then(|s| s.to_str()) {
            Some(ext) => self.rule_for(ext),
            None => ExtractorKind::Default,
        }
    }
}
