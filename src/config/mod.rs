//! Pipeline configuration files.
//!
//! A [`PipelineConfig`] is the persisted form of a panel's transformation
//! list. It is stored as JSON or TOML, chosen by file extension:
//!
//! ```json
//! {
//!   "version": 1,
//!   "errorPolicy": "passthrough",
//!   "transformations": [
//!     { "id": "filterFields", "options": { "include": { "id": "numeric" } } },
//!     { "id": "limit", "options": { "limitField": 5 } }
//!   ]
//! }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use frameflow::config::PipelineConfig;
//! use frameflow::registry::Catalog;
//!
//! let config = PipelineConfig::load("panel.json")?;
//! config.validate(&Catalog::standard())?;
//! let output = config.compile(&Catalog::standard()).execute(frames)?;
//! ```

use crate::pipeline::{
    CompiledPlan, ErrorPolicy, PipelineCompiler, SkipReason, TransformError, TransformerConfig,
};
use crate::registry::Catalog;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current config file version
pub const CONFIG_VERSION: u32 = 1;

/// Default config filename
pub const DEFAULT_CONFIG_FILE: &str = "pipeline.json";

/// Extensions recognised as JSON
pub const JSON_EXTENSIONS: &[&str] = &["json"];

/// Extensions recognised as TOML
pub const TOML_EXTENSIONS: &[&str] = &["toml"];

/// Errors raised while loading, saving or validating configs.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Unsupported config version {found} (expected at most {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Transformation {index} ({id}) is invalid: {source}")]
    InvalidStep {
        index: usize,
        id: String,
        #[source]
        source: TransformError,
    },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// On-disk encoding of a config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Pick the format from a path's extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        if JSON_EXTENSIONS.contains(&ext.as_str()) {
            Ok(ConfigFormat::Json)
        } else if TOML_EXTENSIONS.contains(&ext.as_str()) {
            Ok(ConfigFormat::Toml)
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_path_buf()))
        }
    }
}

/// Persisted transformation list for one panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Version for future migration support
    #[serde(default = "default_version")]
    pub version: u32,

    /// How failing transformations are handled
    #[serde(default)]
    pub error_policy: ErrorPolicy,

    /// Transformations in execution order
    #[serde(default)]
    pub transformations: Vec<TransformerConfig>,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            error_policy: ErrorPolicy::default(),
            transformations: Vec::new(),
        }
    }
}

impl PipelineConfig {
    pub fn new(transformations: Vec<TransformerConfig>) -> Self {
        Self {
            transformations,
            ..Default::default()
        }
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Load a config, picking JSON or TOML by extension.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::parse(&content, format).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                supported: CONFIG_VERSION,
            });
        }

        tracing::debug!(
            "Loaded {} transformation(s) from {}",
            config.transformations.len(),
            path.display()
        );
        Ok(config)
    }

    /// Load a config, returning defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load pipeline config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save the config, picking JSON or TOML by extension.
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let content = self.to_string(ConfigFormat::from_path(path)?)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse(content: &str, format: ConfigFormat) -> Result<Self, String> {
        match format {
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        }
    }

    /// Serialize in the given format.
    pub fn to_string(&self, format: ConfigFormat) -> ConfigResult<String> {
        match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| ConfigError::Serialize(e.to_string())),
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
            }
        }
    }

    /// Compile against `catalog`, applying this config's error policy.
    pub fn compile(&self, catalog: &Catalog) -> CompiledPlan {
        PipelineCompiler::compile(&self.transformations, catalog).with_policy(self.error_policy)
    }

    /// Check that every enabled transformation resolves and accepts its
    /// options. Returns the first failure.
    pub fn validate(&self, catalog: &Catalog) -> ConfigResult<()> {
        let plan = PipelineCompiler::compile(&self.transformations, catalog);
        for skipped in plan.skipped {
            if let SkipReason::Error(source) = skipped.reason {
                return Err(ConfigError::InvalidStep {
                    index: skipped.index,
                    id: skipped.id,
                    source,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample() -> PipelineConfig {
        PipelineConfig::new(vec![
            TransformerConfig::new(
                "filterFields",
                json!({ "include": { "id": "byType", "options": "number" } }),
            ),
            TransformerConfig::new("limit", json!({ "limitField": 5 })).disabled(),
        ])
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("a/panel.JSON")).unwrap(),
            ConfigFormat::Json
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("panel.toml")).unwrap(),
            ConfigFormat::Toml
        );
        assert!(matches!(
            ConfigFormat::from_path(Path::new("panel.yaml")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_json_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        let config = sample().with_error_policy(ErrorPolicy::Fail);

        config.save(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"errorPolicy\": \"fail\""));
        assert_eq!(PipelineConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_toml_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pipeline.toml");
        let config = sample();

        config.save(&path).unwrap();
        assert_eq!(PipelineConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_toml_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pipeline.toml");
        std::fs::write(
            &path,
            r#"
[[transformations]]
id = "limit"

[transformations.options]
limitField = 3
"#,
        )
        .unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.error_policy, ErrorPolicy::Passthrough);
        assert_eq!(config.transformations[0].options, json!({ "limitField": 3 }));
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig::load_or_default(dir.path().join("missing.json"));
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_newer_version_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pipeline.json");
        std::fs::write(&path, r#"{ "version": 99 }"#).unwrap();
        assert!(matches!(
            PipelineConfig::load(&path),
            Err(ConfigError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pipeline.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            PipelineConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_validate() {
        let catalog = Catalog::standard();
        sample().validate(&catalog).unwrap();

        let bad = PipelineConfig::new(vec![
            TransformerConfig::new("noop", ()),
            TransformerConfig::new("seriesToColumns", ()),
        ]);
        assert!(matches!(
            bad.validate(&catalog),
            Err(ConfigError::InvalidStep { index: 1, ref id, .. }) if id == "seriesToColumns"
        ));
    }
}
