//! The problem statement the enumerator and CEGIS driver consume.
//!
//! Grounded on `synth/spec.hpp`'s `Spec` class: same fields, same
//! `validate`/`counterexample` operations, plus `advanceCEGISIteration`
//! (spec.md §4.2), which the excerpted source doesn't show directly but
//! which follows from spec.md's description of round-robin example
//! eviction over a 32-column window.

use serde::{Deserialize, Serialize};

use crate::error::SynthError;
use crate::expr::Expr;

/// Signatures are packed into a 32-bit word; no example set can exceed 32
/// rows regardless of how large the full input space is.
pub const MAX_EXAMPLES: u32 = 32;

/// A synthesis problem: named input variables with height budgets, a
/// working example set the enumerator dedupes against, and the complete
/// truth table CEGIS checks candidates against.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Spec {
    num_vars: u32,
    /// `E`: number of rows currently loaded into the working example set.
    num_examples: u32,
    var_names: Vec<String>,
    var_heights: Vec<u32>,
    /// `var_values[i]`'s bit `j` is variable `i`'s value in example `j`.
    var_values: Vec<u32>,
    /// Target column; bit `j` is the desired output in example `j`.
    sol_result: u32,
    /// Height bound for the solution's root.
    sol_height: u32,
    /// Complete truth table: one row per assignment, `all_inputs.len() ==
    /// 2^num_vars`.
    all_inputs: Vec<Vec<bool>>,
    all_sols: Vec<bool>,
    /// Rotating slot `[0, 32)` CEGIS will overwrite next.
    example_iter: u32,
}

impl Spec {
    /// Build a `Spec` from a full solution vector over the entire input
    /// space (`full_sol.len() == 2^num_vars`), the way both of the
    /// original parsers ultimately do: derive the initial example window
    /// (the first `min(2^num_vars, 32)` rows) from the full truth table,
    /// then retain the whole table for CEGIS.
    pub fn from_truth_table(
        num_vars: u32,
        var_names: Vec<String>,
        var_heights: Vec<u32>,
        sol_height: u32,
        full_sol: Vec<bool>,
    ) -> Result<Spec, SynthError> {
        if num_vars == 0 {
            return Err(SynthError::MalformedSpec(
                "num_vars must be nonzero".to_string(),
            ));
        }
        if var_names.len() != num_vars as usize || var_heights.len() != num_vars as usize {
            return Err(SynthError::MalformedSpec(format!(
                "expected {} variable names/heights, got {}/{}",
                num_vars,
                var_names.len(),
                var_heights.len()
            )));
        }
        if let Some(bad) = var_heights.iter().find(|&&h| h > sol_height) {
            return Err(SynthError::MalformedSpec(format!(
                "variable height {} exceeds sol_height {}",
                bad, sol_height
            )));
        }
        let total_rows = 1u64
            .checked_shl(num_vars)
            .ok_or_else(|| SynthError::MalformedSpec("num_vars too large".to_string()))?;
        if full_sol.len() as u64 != total_rows {
            return Err(SynthError::MalformedSpec(format!(
                "expected {} truth table rows, got {}",
                total_rows,
                full_sol.len()
            )));
        }

        let mut all_inputs = Vec::with_capacity(full_sol.len());
        for row in 0..total_rows {
            let mut vars = Vec::with_capacity(num_vars as usize);
            for v in 0..num_vars {
                vars.push((row >> v) & 1 != 0);
            }
            all_inputs.push(vars);
        }

        let num_examples = total_rows.min(u64::from(MAX_EXAMPLES)) as u32;
        let mut var_values = vec![0u32; num_vars as usize];
        let mut sol_result = 0u32;
        for j in 0..num_examples {
            let row = &all_inputs[j as usize];
            for (i, &bit) in row.iter().enumerate() {
                if bit {
                    var_values[i] |= 1 << j;
                }
            }
            if full_sol[j as usize] {
                sol_result |= 1 << j;
            }
        }

        Ok(Spec {
            num_vars,
            num_examples,
            var_names,
            var_heights,
            var_values,
            sol_result,
            sol_height,
            all_inputs,
            all_sols: full_sol,
            example_iter: 0,
        })
    }

    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    pub fn num_examples(&self) -> u32 {
        self.num_examples
    }

    pub fn var_names(&self) -> &[String] {
        &self.var_names
    }

    pub fn var_heights(&self) -> &[u32] {
        &self.var_heights
    }

    pub fn var_values(&self) -> &[u32] {
        &self.var_values
    }

    pub fn sol_result(&self) -> u32 {
        self.sol_result
    }

    pub fn sol_height(&self) -> u32 {
        self.sol_height
    }

    /// `(1 << E) - 1`, taken modulo 32-bit width (all-ones when `E == 32`).
    pub fn sol_mask(&self) -> u32 {
        if self.num_examples >= 32 {
            u32::MAX
        } else {
            (1u32 << self.num_examples) - 1
        }
    }

    /// Reconstruct each current example's variable assignment, evaluate
    /// `expr`, and assert it matches the target bit; also asserts
    /// `expr`'s height equals `sol_height` exactly.
    pub fn validate(&self, expr: &Expr) -> Result<(), SynthError> {
        expr.assert_constant_height(self.sol_height, &self.var_heights)?;
        for example in 0..self.num_examples {
            let vars: Vec<bool> = (0..self.num_vars)
                .map(|v| (self.var_values[v as usize] >> example) & 1 != 0)
                .collect();
            let expected = (self.sol_result >> example) & 1 != 0;
            let actual = expr.eval(&vars);
            if actual != expected {
                return Err(SynthError::ValidationMismatch {
                    example,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// First row of the full truth table `expr` disagrees with, or `None`
    /// if `expr` matches every row.
    pub fn counterexample(&self, expr: &Expr) -> Option<usize> {
        for (row, (vars, &expected)) in self.all_inputs.iter().zip(&self.all_sols).enumerate() {
            if expr.eval(vars) != expected {
                return Some(row);
            }
        }
        None
    }

    /// If `expr` has a counterexample, install it into the rotating
    /// example slot (evicting whatever row currently lives there) and
    /// advance the slot; returns the row index installed, or `None` if
    /// `expr` already matches the full truth table.
    pub fn advance_cegis_iteration(&mut self, expr: &Expr) -> Option<usize> {
        let row = self.counterexample(expr)?;
        let slot = self.example_iter;
        let mask = !(1u32 << slot);
        let bit = 1u32 << slot;
        for (i, &value) in self.all_inputs[row].iter().enumerate() {
            let cell = &mut self.var_values[i];
            *cell = (*cell & mask) | if value { bit } else { 0 };
        }
        self.sol_result = (self.sol_result & mask) | if self.all_sols[row] { bit } else { 0 };
        self.example_iter = (self.example_iter + 1) % MAX_EXAMPLES;
        Some(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xor2() -> Spec {
        // num_vars=2, target = a XOR b.
        Spec::from_truth_table(
            2,
            vec!["a".to_string(), "b".to_string()],
            vec![0, 0],
            1,
            vec![false, true, true, false],
        )
        .unwrap()
    }

    #[test]
    fn construction_rejects_zero_vars() {
        let err = Spec::from_truth_table(0, vec![], vec![], 0, vec![false]);
        assert!(matches!(err, Err(SynthError::MalformedSpec(_))));
    }

    #[test]
    fn construction_rejects_height_over_budget() {
        let err = Spec::from_truth_table(
            1,
            vec!["a".to_string()],
            vec![2],
            1,
            vec![false, true],
        );
        assert!(matches!(err, Err(SynthError::MalformedSpec(_))));
    }

    #[test]
    fn validate_accepts_matching_expr() {
        let spec = xor2();
        let xor = Expr::xor(Expr::var(0), Expr::var(1));
        assert!(spec.validate(&xor).is_ok());
    }

    #[test]
    fn validate_rejects_wrong_height() {
        let spec = xor2();
        let and = Expr::and(Expr::var(0), Expr::var(1));
        // `a && b` disagrees with `a ^ b` on example 3 (both true).
        assert!(matches!(
            spec.validate(&and),
            Err(SynthError::ValidationMismatch { .. })
        ));
    }

    #[test]
    fn counterexample_finds_first_mismatch() {
        let spec = xor2();
        let and = Expr::and(Expr::var(0), Expr::var(1));
        assert_eq!(spec.counterexample(&and), Some(0));
        let xor = Expr::xor(Expr::var(0), Expr::var(1));
        assert_eq!(spec.counterexample(&xor), None);
    }

    #[test]
    fn advance_cegis_rotates_in_counterexample() {
        let mut spec = xor2();
        let and = Expr::and(Expr::var(0), Expr::var(1));
        let row = spec.advance_cegis_iteration(&and).unwrap();
        assert_eq!(row, 0);
        // Slot 0 now holds row 0's assignment (a=0,b=0 -> sol=0).
        assert_eq!(spec.var_values()[0] & 1, 0);
        assert_eq!(spec.var_values()[1] & 1, 0);
        assert_eq!(spec.sol_result() & 1, 0);
    }

    #[test]
    fn advance_cegis_returns_none_when_fully_matched() {
        let mut spec = xor2();
        let xor = Expr::xor(Expr::var(0), Expr::var(1));
        assert_eq!(spec.advance_cegis_iteration(&xor), None);
    }
}
