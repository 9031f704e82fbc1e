//! Rewriter that copies a model artifact without changing its format.
//!
//! Useful for staging a model into a serving directory through the same
//! validated path as real conversions. It has no acceptance checks of its own:
//! post-rewrite validation always passes.

use tracing::{error, info};

use crate::error::{Result, RewriteError};
use crate::fs_util;
use crate::model::{ModelDescription, ModelType};
use crate::rewriter::Rewriter;

pub struct CopyRewriter {
    name: String,
}

impl CopyRewriter {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RewriteError::InvalidConfig {
                message: "rewriter name must not be empty".to_string(),
            });
        }
        Ok(Self { name })
    }

    fn try_rewrite(
        &self,
        original_model: &ModelDescription,
        rewritten_model: &ModelDescription,
    ) -> Result<()> {
        if !rewritten_model
            .model_type()
            .matches(original_model.model_type())
        {
            return Err(RewriteError::UnsupportedModelType {
                expected: original_model.model_type(),
                actual: rewritten_model.model_type(),
            });
        }

        let src = original_model.path();
        let dst = rewritten_model.path();
        if src.is_dir() {
            fs_util::copy_dir(src, dst)?;
        } else {
            if let Some(parent) = dst.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| RewriteError::io("creating parent directory", parent, e))?;
            }
            std::fs::copy(src, dst).map_err(|e| RewriteError::io("copying model", src, e))?;
        }

        info!("{} copied {} to {}", self.name, src.display(), dst.display());
        Ok(())
    }
}

impl Rewriter for CopyRewriter {
    fn name(&self) -> &str {
        &self.name
    }

    fn pre_rewrite_validate(&self, original_model: &ModelDescription) -> bool {
        if original_model.model_type() == ModelType::AnyModel {
            error!("{}: original model needs a concrete type", self.name);
            return false;
        }
        if !original_model.path().exists() {
            error!(
                "{}: nothing to copy at {}",
                self.name,
                original_model.path().display()
            );
            return false;
        }
        true
    }

    fn rewrite(
        &self,
        original_model: &ModelDescription,
        rewritten_model: &ModelDescription,
    ) -> bool {
        match self.try_rewrite(original_model, rewritten_model) {
            Ok(()) => true,
            Err(e) => {
                error!("{}: {}", self.name, e);
                false
            }
        }
    }

    fn post_rewrite_validate(&self, _rewritten_model: &ModelDescription) -> bool {
        true
    }
}
