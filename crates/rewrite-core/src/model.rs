//! Model descriptions handed to rewriters.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RewriteError;

/// Types of models used or created by a rewriter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    /// Wildcard; matches any concrete format when used as an acceptance criterion.
    AnyModel,
    /// Directory-based, self-contained model.
    SavedModel,
    /// Compact single-file inference model.
    LiteModel,
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::AnyModel => "any_model",
            ModelType::SavedModel => "saved_model",
            ModelType::LiteModel => "lite_model",
        }
    }

    /// Whether `self` and `other` are compatible, treating `AnyModel` on
    /// either side as a wildcard.
    pub fn matches(self, other: ModelType) -> bool {
        self == other || self == ModelType::AnyModel || other == ModelType::AnyModel
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = RewriteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any_model" | "any" => Ok(ModelType::AnyModel),
            "saved_model" => Ok(ModelType::SavedModel),
            "lite_model" | "tflite" => Ok(ModelType::LiteModel),
            other => Err(RewriteError::Other(format!("Unknown model type: {other}"))),
        }
    }
}

/// Location and format of a model artifact.
///
/// This is a descriptor, not a handle: nothing is opened or locked by
/// constructing one, and it is never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelDescription {
    model_type: ModelType,
    path: PathBuf,
}

impl ModelDescription {
    pub fn new(model_type: ModelType, path: impl Into<PathBuf>) -> Self {
        Self {
            model_type,
            path: path.into(),
        }
    }

    pub fn model_type(&self) -> ModelType {
        self.model_type
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for ModelDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ModelDescription(model_type={}, path={})",
            self.model_type,
            self.path.display()
        )
    }
}
