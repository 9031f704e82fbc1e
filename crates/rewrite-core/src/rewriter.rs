//! The contract every rewrite strategy implements.

use crate::model::ModelDescription;

/// A pluggable strategy that turns one model artifact into another.
///
/// The three steps are driven in order by [`crate::perform_rewrite`]. Each
/// step reports only success or failure: implementations must contain every
/// error raised underneath them (I/O, converter toolchains, ...) and turn it
/// into `false`. Nothing should propagate or panic past these methods.
///
/// Configuration is fixed at construction, so all methods take `&self`.
pub trait Rewriter {
    /// Name used to identify the rewriter in diagnostics. Never empty.
    fn name(&self) -> &str;

    /// Check that the original model has the structure this rewriter expects.
    ///
    /// Read-only: must not modify the original artifact.
    fn pre_rewrite_validate(&self, original_model: &ModelDescription) -> bool;

    /// Produce `rewritten_model` from `original_model`.
    ///
    /// This is the only step allowed to write.
    fn rewrite(
        &self,
        original_model: &ModelDescription,
        rewritten_model: &ModelDescription,
    ) -> bool;

    /// Check that the freshly written artifact is acceptable.
    fn post_rewrite_validate(&self, rewritten_model: &ModelDescription) -> bool;
}

impl<R: Rewriter + ?Sized> Rewriter for Box<R> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn pre_rewrite_validate(&self, original_model: &ModelDescription) -> bool {
        (**self).pre_rewrite_validate(original_model)
    }

    fn rewrite(
        &self,
        original_model: &ModelDescription,
        rewritten_model: &ModelDescription,
    ) -> bool {
        (**self).rewrite(original_model, rewritten_model)
    }

    fn post_rewrite_validate(&self, rewritten_model: &ModelDescription) -> bool {
        (**self).post_rewrite_validate(rewritten_model)
    }
}
