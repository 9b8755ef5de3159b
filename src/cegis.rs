//! The top-level counterexample-guided driver.
//!
//! Grounded on `synth_cpu_st.hpp`'s outer CEGIS loop (the file's `main`-
//! adjacent driver that repeatedly calls the enumerator, checks the
//! result against the full truth table, and folds any disagreement back
//! into the working example set before trying again). spec.md §4.6
//! doesn't bound the iteration count; the source's own example-window
//! capacity (`MAX_EXAMPLES`, see `spec::MAX_EXAMPLES`) bounds how many
//! distinct counterexamples can be absorbed before the window starts
//! overwriting earlier ones, so a generous multiple of that is used as
//! the non-convergence backstop.
use crate::enumerate::{enumerator_for, EnumerateMode, Enumerator};
use crate::error::SynthError;
use crate::expr::Expr;
use crate::reconstruct::reconstruct;
use crate::spec::{Spec, MAX_EXAMPLES};

/// CEGIS is expected to converge in a handful of rounds; this bounds
/// pathological non-termination rather than ordinary usage.
const MAX_ITERATIONS: u32 = 16 * MAX_EXAMPLES;

/// A synthesized circuit together with how many counterexamples CEGIS
/// had to absorb before it converged (0 means the first enumeration
/// already matched the full truth table).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub expr: Expr,
    pub cegis_iterations: u32,
}

/// Search for an expression over `{AND, OR, XOR, NOT}` that matches
/// `spec`'s target on every row of its full truth table, within
/// `spec.sol_height()`.
///
/// Each iteration discards the previous term bank and signature set
/// entirely and re-enumerates from height 0 — see `SPEC_FULL.md` §9 for
/// why this (rather than incremental re-use) matches the source's
/// behavior.
pub fn synthesize(spec: &mut Spec, mode: EnumerateMode) -> Result<Solution, SynthError> {
    let enumerator = enumerator_for(mode);
    let mut iteration = 0u32;

    loop {
        let expr = run_one_enumeration(enumerator.as_ref(), spec)?;

        match spec.advance_cegis_iteration(&expr) {
            None => {
                log::info!("CEGIS converged after {iteration} counterexample(s)");
                spec.validate(&expr)?;
                return Ok(Solution {
                    expr,
                    cegis_iterations: iteration,
                });
            }
            Some(row) => {
                log::debug!("CEGIS iteration {iteration}: counterexample at row {row}");
                iteration += 1;
                if iteration >= MAX_ITERATIONS {
                    return Err(SynthError::CegisNonConvergence { limit: MAX_ITERATIONS });
                }
            }
        }
    }
}

fn run_one_enumeration(enumerator: &dyn Enumerator, spec: &Spec) -> Result<Expr, SynthError> {
    let (bank, found) = enumerator.run(spec);
    let index = found.ok_or(SynthError::UnsatWithinBound(spec.sol_height()))?;
    Ok(reconstruct(&bank, index))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_from_rows(
        num_vars: u32,
        names: &[&str],
        heights: Vec<u32>,
        sol_height: u32,
        rows: Vec<bool>,
    ) -> Spec {
        Spec::from_truth_table(
            num_vars,
            names.iter().map(|s| s.to_string()).collect(),
            heights,
            sol_height,
            rows,
        )
        .unwrap()
    }

    #[test]
    fn synthesizes_xor_of_two_variables() {
        let mut spec = spec_from_rows(2, &["a", "b"], vec![0, 0], 1, vec![false, true, true, false]);
        let expr = synthesize(&mut spec, EnumerateMode::Sequential).unwrap().expr;
        assert_eq!(expr.eval(&[false, false]), false);
        assert_eq!(expr.eval(&[true, false]), true);
        assert_eq!(expr.eval(&[false, true]), true);
        assert_eq!(expr.eval(&[true, true]), false);
    }

    #[test]
    fn synthesizes_parity_of_three_variables() {
        let rows: Vec<bool> = (0u32..8)
            .map(|row| (0..3).filter(|v| (row >> v) & 1 != 0).count() % 2 == 1)
            .collect();
        let mut spec = spec_from_rows(3, &["a", "b", "c"], vec![0, 0, 0], 2, rows);
        let expr = synthesize(&mut spec, EnumerateMode::Sequential).unwrap().expr;
        for row in 0u32..8 {
            let vars: Vec<bool> = (0..3).map(|v| (row >> v) & 1 != 0).collect();
            let expected = vars.iter().filter(|&&b| b).count() % 2 == 1;
            assert_eq!(expr.eval(&vars), expected, "row {row}");
        }
    }

    #[test]
    fn unsat_within_bound_when_height_too_small() {
        // 3-input parity cannot be expressed in height 1.
        let rows: Vec<bool> = (0u32..8)
            .map(|row| (0..3).filter(|v| (row >> v) & 1 != 0).count() % 2 == 1)
            .collect();
        let mut spec = spec_from_rows(3, &["a", "b", "c"], vec![0, 0, 0], 1, rows);
        let err = synthesize(&mut spec, EnumerateMode::Sequential).unwrap_err();
        assert!(matches!(err, SynthError::UnsatWithinBound(1)));
    }

    #[test]
    fn sequential_and_parallel_modes_agree() {
        let rows = vec![false, true, true, false];
        let mut seq_spec = spec_from_rows(2, &["a", "b"], vec![0, 0], 1, rows.clone());
        let mut par_spec = spec_from_rows(2, &["a", "b"], vec![0, 0], 1, rows);
        let seq = synthesize(&mut seq_spec, EnumerateMode::Sequential).unwrap();
        let par = synthesize(&mut par_spec, EnumerateMode::Parallel).unwrap();
        assert_eq!(seq, par);
        assert_eq!(seq.cegis_iterations, par.cegis_iterations);
    }
}
