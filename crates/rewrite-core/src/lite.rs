//! Rewriter that converts a SavedModel into a lite model.
//!
//! The conversion itself is delegated to a [`LiteConverter`]. The default
//! [`CommandConverter`] shells out to `tflite_convert`, so the toolchain only
//! needs to be installed where rewrites actually run.
//!
//! Output layout under the rewritten model path:
//!
//! ```text
//! {target}/{filename}        converted model
//! {target}/assets/           copied when `copy_assets` is set
//! {target}/assets.extra/     copied when `copy_assets_extra` is set
//! ```

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, error, info, warn};

use crate::config::{LiteRewriterConfig, RewriteConfig};
use crate::error::{Result, RewriteError};
use crate::fs_util;
use crate::model::{ModelDescription, ModelType};
use crate::rewriter::Rewriter;

// ---------------------------------------------------------------------------
// Converter seam
// ---------------------------------------------------------------------------

/// Options forwarded to the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConverterOptions {
    pub enable_experimental_new_converter: bool,
}

/// Converts a SavedModel directory into serialized lite model bytes.
pub trait LiteConverter: Send + Sync {
    fn convert(&self, saved_model_dir: &Path, options: &ConverterOptions) -> Result<Vec<u8>>;
}

impl<F> LiteConverter for F
where
    F: Fn(&Path, &ConverterOptions) -> Result<Vec<u8>> + Send + Sync,
{
    fn convert(&self, saved_model_dir: &Path, options: &ConverterOptions) -> Result<Vec<u8>> {
        self(saved_model_dir, options)
    }
}

/// Runs an external converter program.
///
/// The program is invoked as
/// `{program} {args..} --saved_model_dir=<dir> --output_file=<file> --experimental_new_converter=<bool>`
/// and the output file is read back once it exits successfully.
#[derive(Debug, Clone)]
pub struct CommandConverter {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandConverter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Arguments placed before the converter flags, e.g.
    /// `["-m", "tensorflow.lite.python.tflite_convert"]` with `python3`.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for CommandConverter {
    fn default() -> Self {
        Self::new(RewriteConfig::DEFAULT_CONVERTER_PROGRAM)
    }
}

impl LiteConverter for CommandConverter {
    fn convert(&self, saved_model_dir: &Path, options: &ConverterOptions) -> Result<Vec<u8>> {
        let scratch = tempfile::Builder::new()
            .prefix("lite-convert-")
            .tempdir()
            .map_err(|e| RewriteError::io("creating converter scratch dir", std::env::temp_dir(), e))?;
        let output_file = scratch.path().join("model.tflite");

        debug!(
            "Running {} on {}",
            self.program.display(),
            saved_model_dir.display()
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(format!("--saved_model_dir={}", saved_model_dir.display()))
            .arg(format!("--output_file={}", output_file.display()))
            .arg(format!(
                "--experimental_new_converter={}",
                options.enable_experimental_new_converter
            ))
            .output()
            .map_err(|e| {
                RewriteError::conversion(format!(
                    "Failed to run {}: {e}",
                    self.program.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RewriteError::conversion(format!(
                "{} exited with status {}: {}",
                self.program.display(),
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        std::fs::read(&output_file).map_err(|e| {
            RewriteError::conversion(format!(
                "{} produced no output at {}: {e}",
                self.program.display(),
                output_file.display()
            ))
        })
    }
}

// ---------------------------------------------------------------------------
// Rewriter
// ---------------------------------------------------------------------------

/// Converts SavedModels into lite models.
pub struct LiteRewriter {
    config: LiteRewriterConfig,
    converter: Box<dyn LiteConverter>,
}

impl LiteRewriter {
    /// Create a rewriter that uses the default `tflite_convert` program.
    pub fn new(config: LiteRewriterConfig) -> Result<Self> {
        Self::with_converter(config, CommandConverter::default())
    }

    /// Create a rewriter backed by a specific converter.
    pub fn with_converter(
        config: LiteRewriterConfig,
        converter: impl LiteConverter + 'static,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            converter: Box::new(converter),
        })
    }

    pub fn config(&self) -> &LiteRewriterConfig {
        &self.config
    }

    /// Where the converted model is written for a given rewritten model.
    pub fn output_path(&self, rewritten_model: &ModelDescription) -> PathBuf {
        rewritten_model.path().join(&self.config.filename)
    }

    fn try_rewrite(
        &self,
        original_model: &ModelDescription,
        rewritten_model: &ModelDescription,
    ) -> Result<()> {
        if !matches!(
            rewritten_model.model_type(),
            ModelType::LiteModel | ModelType::AnyModel
        ) {
            return Err(RewriteError::UnsupportedModelType {
                expected: ModelType::LiteModel,
                actual: rewritten_model.model_type(),
            });
        }

        let target_dir = rewritten_model.path();
        // The converter cannot handle asset directories, so it runs on a
        // stripped copy that lives under the target until conversion ends.
        let tmp_dir = target_dir.join(format!(
            "{}{}",
            RewriteConfig::TMP_DIR_PREFIX,
            chrono::Utc::now().timestamp()
        ));
        std::fs::create_dir_all(&tmp_dir)
            .map_err(|e| RewriteError::io("creating temporary model dir", &tmp_dir, e))?;

        let converted = fs_util::create_lite_compatible_saved_model(original_model.path(), &tmp_dir)
            .and_then(|()| {
                self.converter.convert(
                    &tmp_dir,
                    &ConverterOptions {
                        enable_experimental_new_converter: self
                            .config
                            .enable_experimental_new_converter,
                    },
                )
            });

        if let Err(e) = std::fs::remove_dir_all(&tmp_dir) {
            warn!(
                "Failed to remove temporary model dir {}: {}",
                tmp_dir.display(),
                e
            );
        }
        let lite_model = converted?;

        let output_path = self.output_path(rewritten_model);
        std::fs::write(&output_path, &lite_model)
            .map_err(|e| RewriteError::io("writing lite model", &output_path, e))?;
        info!(
            "{} wrote {} bytes to {}",
            self.config.name,
            lite_model.len(),
            output_path.display()
        );

        let asset_dirs = [
            (self.config.copy_assets, RewriteConfig::ASSETS_DIRECTORY),
            (
                self.config.copy_assets_extra,
                RewriteConfig::EXTRA_ASSETS_DIRECTORY,
            ),
        ];
        for (enabled, name) in asset_dirs {
            let src = original_model.path().join(name);
            if enabled && src.is_dir() {
                fs_util::copy_dir(&src, &target_dir.join(name))?;
            }
        }

        Ok(())
    }
}

impl Rewriter for LiteRewriter {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn pre_rewrite_validate(&self, original_model: &ModelDescription) -> bool {
        if original_model.model_type() != ModelType::SavedModel {
            error!(
                "{}: can only convert SavedModels, got {}",
                self.config.name,
                original_model.model_type()
            );
            return false;
        }
        if !fs_util::is_saved_model_dir(original_model.path()) {
            error!(
                "{}: no SavedModel found at {}",
                self.config.name,
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
                error!("{}: {}", self.config.name, e);
                false
            }
        }
    }

    fn post_rewrite_validate(&self, rewritten_model: &ModelDescription) -> bool {
        let output_path = self.output_path(rewritten_model);
        match std::fs::metadata(&output_path) {
            Ok(meta) if meta.is_file() && meta.len() > 0 => true,
            Ok(_) => {
                error!(
                    "{}: lite model at {} is empty or not a file",
                    self.config.name,
                    output_path.display()
                );
                false
            }
            Err(e) => {
                error!(
                    "{}: lite model missing at {}: {}",
                    self.config.name,
                    output_path.display(),
                    e
                );
                false
            }
        }
    }
}
