//! Error kinds for the synthesis core.
//!
//! `thiserror` is used here rather than a hand-rolled `Diagnostic` because
//! these errors have no source span to render — they're either input
//! validation failures or internal consistency checks, not compiler
//! diagnostics.

use thiserror::Error;

/// Everything that can go wrong building or running a synthesis problem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthError {
    /// The `Spec` as constructed (typically by a parser) is internally
    /// inconsistent: zero variables, mismatched vector lengths, or a
    /// variable whose height exceeds the solution height bound.
    #[error("malformed spec: {0}")]
    MalformedSpec(String),

    /// A reconstructed term failed `Expression::assert_constant_height`.
    /// This indicates a bug in the enumerator or reconstructor, not a
    /// problem with the input — the bank should never produce a term
    /// whose height disagrees with the pass that introduced it.
    #[error("height violation: expected height {expected}, got {actual}")]
    HeightViolation { expected: u32, actual: u32 },

    /// `Spec::validate` found a disagreement between a reconstructed
    /// expression and the target on the current example set. Like
    /// `HeightViolation`, this is a correctness assertion: the bank's own
    /// bookkeeping says the candidate matches, so this should never fire.
    #[error("validation mismatch on example {example}: expected {expected}, got {actual}")]
    ValidationMismatch {
        example: u32,
        expected: bool,
        actual: bool,
    },

    /// Enumeration exhausted every height up to `sol_height` without
    /// producing a term whose signature matches the target. The caller
    /// may retry with a larger bound.
    #[error("no circuit of height <= {0} matches the target")]
    UnsatWithinBound(u32),

    /// The CEGIS loop absorbed `limit` counterexamples without the
    /// resulting candidate generalizing to the full truth table.
    #[error("CEGIS did not converge within {limit} iterations")]
    CegisNonConvergence { limit: u32 },
}

pub type Result<T> = std::result::Result<T, SynthError>;
