//! Configuration for model rewriting.
//!
//! Fixed layout names live on `RewriteConfig`; per-rewriter settings are plain
//! serde structs that can be loaded from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, RewriteError};

/// Layout constants shared by the rewriters.
pub struct RewriteConfig;

impl RewriteConfig {
    /// Asset directory inside a SavedModel.
    pub const ASSETS_DIRECTORY: &'static str = "assets";
    /// Extra asset directory inside a SavedModel (not read by the converter).
    pub const EXTRA_ASSETS_DIRECTORY: &'static str = "assets.extra";
    /// Files marking a directory as a SavedModel.
    pub const SAVED_MODEL_FILENAMES: [&'static str; 2] = ["saved_model.pb", "saved_model.pbtxt"];
    /// Prefix of the scratch directory created under the rewrite target.
    pub const TMP_DIR_PREFIX: &'static str = "tmp-rewrite-";
    /// Default output filename for lite models.
    pub const DEFAULT_LITE_FILENAME: &'static str = "tflite";
    /// Default external converter program.
    pub const DEFAULT_CONVERTER_PROGRAM: &'static str = "tflite_convert";
}

/// Settings for a [`crate::LiteRewriter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LiteRewriterConfig {
    /// Name used to identify the rewriter in diagnostics.
    pub name: String,
    /// Filename of the lite model written inside the target directory.
    #[serde(default = "default_filename")]
    pub filename: String,
    /// Whether to ask the converter for its experimental (MLIR) path.
    #[serde(default)]
    pub enable_experimental_new_converter: bool,
    /// Copy `assets/` from the original model next to the lite model.
    #[serde(default = "default_true")]
    pub copy_assets: bool,
    /// Copy `assets.extra/` from the original model next to the lite model.
    #[serde(default = "default_true")]
    pub copy_assets_extra: bool,
}

fn default_filename() -> String {
    RewriteConfig::DEFAULT_LITE_FILENAME.to_string()
}

fn default_true() -> bool {
    true
}

impl LiteRewriterConfig {
    /// Config with the given name and defaults for everything else.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filename: default_filename(),
            enable_experimental_new_converter: false,
            copy_assets: true,
            copy_assets_extra: true,
        }
    }

    /// Load and validate a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| RewriteError::io("reading rewriter config", path, e))?;

        let config: LiteRewriterConfig =
            serde_json::from_str(&content).map_err(|e| RewriteError::Json {
                message: format!(
                    "Failed to parse rewriter config from {}: {}",
                    path.display(),
                    e
                ),
                source: Some(e),
            })?;

        config.validate()?;
        debug!("Loaded rewriter config '{}' from {}", config.name, path.display());
        Ok(config)
    }

    /// Check required fields.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(RewriteError::InvalidConfig {
                message: "rewriter name must not be empty".to_string(),
            });
        }

        // The output must land directly inside the target directory.
        if self.filename.is_empty()
            || self.filename.contains(['/', '\\'])
            || self.filename == "."
            || self.filename == ".."
        {
            return Err(RewriteError::InvalidConfig {
                message: format!("invalid lite model filename: {:?}", self.filename),
            });
        }
        Ok(())
    }
}
