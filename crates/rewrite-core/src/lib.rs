//! Model Rewrite - validated conversion of model artifacts between formats.
//!
//! A [`Rewriter`] turns one model artifact into another (for example a
//! SavedModel directory into a lite model file). [`perform_rewrite`] drives any
//! rewriter through pre-rewrite validation, the rewrite, and post-rewrite
//! validation, stopping at the first failure.
//!
//! # Example
//!
//! ```rust,ignore
//! use model_rewrite::{perform_rewrite, LiteRewriter, LiteRewriterConfig, ModelDescription, ModelType};
//!
//! fn main() -> model_rewrite::Result<()> {
//!     let rewriter = LiteRewriter::new(LiteRewriterConfig::new("mobile"))?;
//!     let original = ModelDescription::new(ModelType::SavedModel, "/models/export/1");
//!     let rewritten = ModelDescription::new(ModelType::LiteModel, "/models/lite/1");
//!
//!     if !perform_rewrite(&original, &rewritten, &rewriter) {
//!         eprintln!("rewrite failed, see log");
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod copy;
pub mod error;
pub mod fs_util;
pub mod lite;
pub mod model;
pub mod orchestrator;
pub mod rewriter;

pub use config::{LiteRewriterConfig, RewriteConfig};
pub use copy::CopyRewriter;
pub use error::{Result, RewriteError};
pub use lite::{CommandConverter, ConverterOptions, LiteConverter, LiteRewriter};
pub use model::{ModelDescription, ModelType};
pub use orchestrator::{
    perform_rewrite, perform_rewrite_with_sink, DiagnosticSink, RewriteDiagnostic, RewriteStage,
    TracingSink,
};
pub use rewriter::Rewriter;
