//! model-rewrite - command-line front end for model rewriting.
//!
//! Converts a SavedModel into a lite model through the validated
//! `perform_rewrite` protocol and exits non-zero if any step fails.

use anyhow::{Context, Result};
use clap::Parser;
use model_rewrite::{
    perform_rewrite, CommandConverter, LiteRewriter, LiteRewriterConfig, ModelDescription,
    ModelType,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "model-rewrite")]
#[command(about = "Rewrite a model artifact into another format with validation")]
struct Args {
    /// Path of the original model
    #[arg(long)]
    src: PathBuf,

    /// Format of the original model
    #[arg(long, default_value = "saved_model")]
    src_type: ModelType,

    /// Directory that receives the rewritten model
    #[arg(long)]
    dst: PathBuf,

    /// Format to produce
    #[arg(long, default_value = "lite_model")]
    dst_type: ModelType,

    /// JSON rewriter config; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rewriter name used in diagnostics
    #[arg(long)]
    name: Option<String>,

    /// Output filename inside the destination directory
    #[arg(long)]
    filename: Option<String>,

    /// Use the converter's experimental (MLIR) path
    #[arg(long)]
    experimental_new_converter: bool,

    /// Do not copy assets/ next to the converted model
    #[arg(long)]
    no_copy_assets: bool,

    /// Do not copy assets.extra/ next to the converted model
    #[arg(long)]
    no_copy_assets_extra: bool,

    /// Converter program to run
    #[arg(long, default_value = model_rewrite::RewriteConfig::DEFAULT_CONVERTER_PROGRAM)]
    converter: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    /// Merge the optional config file with command-line overrides.
    fn rewriter_config(&self) -> Result<LiteRewriterConfig> {
        let mut config = match &self.config {
            Some(path) => LiteRewriterConfig::load(path)
                .with_context(|| format!("loading rewriter config {}", path.display()))?,
            None => LiteRewriterConfig::new("model-rewrite"),
        };

        if let Some(name) = &self.name {
            config.name = name.clone();
        }
        if let Some(filename) = &self.filename {
            config.filename = filename.clone();
        }
        if self.experimental_new_converter {
            config.enable_experimental_new_converter = true;
        }
        if self.no_copy_assets {
            config.copy_assets = false;
        }
        if self.no_copy_assets_extra {
            config.copy_assets_extra = false;
        }
        Ok(config)
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    let config = args.rewriter_config()?;
    let rewriter = LiteRewriter::with_converter(config, CommandConverter::new(&args.converter))
        .context("invalid rewriter configuration")?;

    let original = ModelDescription::new(args.src_type, &args.src);
    let rewritten = ModelDescription::new(args.dst_type, &args.dst);

    std::fs::create_dir_all(&args.dst)
        .with_context(|| format!("creating output directory {}", args.dst.display()))?;

    info!("Rewriting {} into {}", original, rewritten);
    if perform_rewrite(&original, &rewritten, &rewriter) {
        info!("Rewrite complete: {}", rewriter.output_path(&rewritten).display());
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
