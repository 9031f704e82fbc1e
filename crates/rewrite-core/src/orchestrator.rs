//! Sequencing of the three rewrite steps.
//!
//! `perform_rewrite` runs pre-rewrite validation, the rewrite itself, and
//! post-rewrite validation, stopping at the first step that fails. Each failure
//! produces exactly one diagnostic naming the rewriter and the model involved.
//! The orchestrator holds no state and touches no files.

use std::fmt;

use tracing::{debug, error};

use crate::model::ModelDescription;
use crate::rewriter::Rewriter;

/// The step of the rewrite protocol that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RewriteStage {
    PreRewriteValidation,
    Rewrite,
    PostRewriteValidation,
}

impl RewriteStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RewriteStage::PreRewriteValidation => "pre_rewrite_validation",
            RewriteStage::Rewrite => "rewrite",
            RewriteStage::PostRewriteValidation => "post_rewrite_validation",
        }
    }
}

impl fmt::Display for RewriteStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed rewrite, as reported to a [`DiagnosticSink`].
///
/// `model` is the original model for the first two stages and the rewritten
/// model for post-rewrite validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteDiagnostic {
    pub rewriter: String,
    pub stage: RewriteStage,
    pub model: ModelDescription,
}

impl fmt::Display for RewriteDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stage {
            RewriteStage::PreRewriteValidation => write!(
                f,
                "{} failed to perform pre-rewrite validation. Original model: {}",
                self.rewriter, self.model
            ),
            RewriteStage::Rewrite => write!(
                f,
                "{} failed to rewrite model. Original model: {}",
                self.rewriter, self.model
            ),
            RewriteStage::PostRewriteValidation => write!(
                f,
                "{} failed to validate rewritten model. Rewritten model: {}",
                self.rewriter, self.model
            ),
        }
    }
}

/// Destination for rewrite failure diagnostics.
pub trait DiagnosticSink {
    fn report(&self, diagnostic: &RewriteDiagnostic);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&RewriteDiagnostic),
{
    fn report(&self, diagnostic: &RewriteDiagnostic) {
        self(diagnostic)
    }
}

/// Sink that logs each diagnostic at error level through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &RewriteDiagnostic) {
        error!(
            rewriter = %diagnostic.rewriter,
            stage = %diagnostic.stage,
            "{}",
            diagnostic
        );
    }
}

/// Invoke all validations and perform the rewrite, logging failures via `tracing`.
///
/// Returns whether the rewrite succeeded.
pub fn perform_rewrite<R>(
    original_model: &ModelDescription,
    rewritten_model: &ModelDescription,
    rewriter: &R,
) -> bool
where
    R: Rewriter + ?Sized,
{
    perform_rewrite_with_sink(original_model, rewritten_model, rewriter, &TracingSink)
}

/// Same as [`perform_rewrite`], reporting failures to `sink` instead.
pub fn perform_rewrite_with_sink<R, S>(
    original_model: &ModelDescription,
    rewritten_model: &ModelDescription,
    rewriter: &R,
    sink: &S,
) -> bool
where
    R: Rewriter + ?Sized,
    S: DiagnosticSink + ?Sized,
{
    let fail = |stage: RewriteStage, model: &ModelDescription| {
        sink.report(&RewriteDiagnostic {
            rewriter: rewriter.name().to_string(),
            stage,
            model: model.clone(),
        });
        false
    };

    if !rewriter.pre_rewrite_validate(original_model) {
        return fail(RewriteStage::PreRewriteValidation, original_model);
    }

    if !rewriter.rewrite(original_model, rewritten_model) {
        return fail(RewriteStage::Rewrite, original_model);
    }

    if !rewriter.post_rewrite_validate(rewritten_model) {
        return fail(RewriteStage::PostRewriteValidation, rewritten_model);
    }

    debug!(
        "{} rewrote {} into {}",
        rewriter.name(),
        original_model,
        rewritten_model
    );
    true
}
