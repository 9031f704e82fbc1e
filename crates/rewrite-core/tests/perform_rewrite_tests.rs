//! Integration tests for `perform_rewrite` driving the bundled rewriters.

use std::cell::RefCell;
use std::path::Path;

use model_rewrite::{
    perform_rewrite, perform_rewrite_with_sink, ConverterOptions, CopyRewriter, LiteRewriter,
    LiteRewriterConfig, ModelDescription, ModelType, RewriteDiagnostic, RewriteError,
    RewriteStage, Rewriter,
};
use tempfile::TempDir;

/// Create a minimal SavedModel under `root/export` and return it with a lite target.
fn create_test_env() -> (TempDir, ModelDescription, ModelDescription) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let export = temp_dir.path().join("export");

    std::fs::create_dir_all(export.join("variables")).unwrap();
    std::fs::create_dir_all(export.join("assets")).unwrap();
    std::fs::write(export.join("saved_model.pb"), "graph").unwrap();
    std::fs::write(export.join("variables/variables.index"), "index").unwrap();
    std::fs::write(export.join("assets/labels.txt"), "cat\ndog\n").unwrap();

    let lite = temp_dir.path().join("lite");
    std::fs::create_dir_all(&lite).unwrap();

    (
        temp_dir,
        ModelDescription::new(ModelType::SavedModel, export),
        ModelDescription::new(ModelType::LiteModel, lite),
    )
}

fn converter(_dir: &Path, _options: &ConverterOptions) -> model_rewrite::Result<Vec<u8>> {
    Ok(b"TFL3-model".to_vec())
}

fn collect(
    original: &ModelDescription,
    rewritten: &ModelDescription,
    rewriter: &LiteRewriter,
) -> (bool, Vec<RewriteDiagnostic>) {
    let seen = RefCell::new(Vec::new());
    let sink = |d: &RewriteDiagnostic| seen.borrow_mut().push(d.clone());
    let ok = perform_rewrite_with_sink(original, rewritten, rewriter, &sink);
    (ok, seen.into_inner())
}

#[test]
fn test_lite_rewrite_end_to_end() {
    let (_temp_dir, original, rewritten) = create_test_env();
    let rewriter =
        LiteRewriter::with_converter(LiteRewriterConfig::new("mobile"), converter).unwrap();

    let (ok, diagnostics) = collect(&original, &rewritten, &rewriter);

    assert!(ok);
    assert!(diagnostics.is_empty());
    assert_eq!(
        std::fs::read(rewritten.path().join("tflite")).unwrap(),
        b"TFL3-model"
    );
    assert_eq!(
        std::fs::read_to_string(rewritten.path().join("assets/labels.txt")).unwrap(),
        "cat\ndog\n"
    );
}

#[test]
fn test_lite_rewrite_rejects_wrong_original_type() {
    let (_temp_dir, original, rewritten) = create_test_env();
    let rewriter =
        LiteRewriter::with_converter(LiteRewriterConfig::new("mobile"), converter).unwrap();
    let lite_original = ModelDescription::new(ModelType::LiteModel, original.path());

    let (ok, diagnostics) = collect(&lite_original, &rewritten, &rewriter);

    assert!(!ok);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].stage, RewriteStage::PreRewriteValidation);
    assert_eq!(diagnostics[0].rewriter, "mobile");
    assert_eq!(diagnostics[0].model, lite_original);
    // Nothing written when validation fails.
    assert_eq!(std::fs::read_dir(rewritten.path()).unwrap().count(), 0);
}

#[test]
fn test_lite_rewrite_reports_converter_failure() {
    let (_temp_dir, original, rewritten) = create_test_env();
    let failing = |_: &Path, _: &ConverterOptions| -> model_rewrite::Result<Vec<u8>> {
        Err(RewriteError::Conversion {
            message: "input model has unsupported ops".to_string(),
        })
    };
    let rewriter = LiteRewriter::with_converter(LiteRewriterConfig::new("mobile"), failing).unwrap();

    let (ok, diagnostics) = collect(&original, &rewritten, &rewriter);

    assert!(!ok);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].stage, RewriteStage::Rewrite);
    assert_eq!(diagnostics[0].model, original);
    assert_eq!(std::fs::read_dir(rewritten.path()).unwrap().count(), 0);
}

#[test]
fn test_lite_rewrite_reports_empty_output() {
    let (_temp_dir, original, rewritten) = create_test_env();
    let empty = |_: &Path, _: &ConverterOptions| -> model_rewrite::Result<Vec<u8>> { Ok(Vec::new()) };
    let rewriter = LiteRewriter::with_converter(LiteRewriterConfig::new("mobile"), empty).unwrap();

    let (ok, diagnostics) = collect(&original, &rewritten, &rewriter);

    assert!(!ok);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].stage, RewriteStage::PostRewriteValidation);
    assert_eq!(diagnostics[0].model, rewritten);
    assert_eq!(
        diagnostics[0].to_string(),
        format!("mobile failed to validate rewritten model. Rewritten model: {rewritten}")
    );
}

#[test]
fn test_copy_rewrite_through_orchestrator() {
    let (temp_dir, original, _rewritten) = create_test_env();
    let staged = ModelDescription::new(ModelType::SavedModel, temp_dir.path().join("serving/1"));
    let rewriter = CopyRewriter::new("stage").unwrap();

    assert!(perform_rewrite(&original, &staged, &rewriter));
    assert!(staged.path().join("saved_model.pb").is_file());
    assert!(staged.path().join("assets/labels.txt").is_file());
}

#[test]
fn test_rewriters_as_trait_objects() {
    let (temp_dir, original, rewritten) = create_test_env();
    let staged = ModelDescription::new(ModelType::AnyModel, temp_dir.path().join("staged"));

    let lite: Box<dyn Rewriter> = Box::new(
        LiteRewriter::with_converter(LiteRewriterConfig::new("mobile"), converter).unwrap(),
    );
    let copy: Box<dyn Rewriter> = Box::new(CopyRewriter::new("stage").unwrap());
    let rewriters = vec![(lite, rewritten), (copy, staged)];

    for (rewriter, target) in &rewriters {
        assert!(
            perform_rewrite(&original, target, rewriter.as_ref()),
            "{} failed",
            rewriter.name()
        );
    }
}
