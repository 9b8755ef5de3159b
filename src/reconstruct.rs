//! Walks a winning bank index back into an `Expr` tree.
//!
//! Grounded on `synth_cpu_st.hpp`'s implicit reconstruction (the original
//! keeps the bank around and a caller-side recursive `build` walks
//! `term_lefts`/`term_rights` using the same pass-kind bookkeeping this
//! crate keeps explicit in `bank::TermBank::pass_kind_for`).

use crate::bank::{PassKind, TermBank};
use crate::expr::Expr;

/// Build the `Expr` rooted at bank index `root`. Every child index is
/// strictly smaller than its parent's (`alloc_term` only ever references
/// already-allocated terms), so the recursion always terminates.
pub fn reconstruct(bank: &TermBank, root: usize) -> Expr {
    match bank.pass_kind_for(root) {
        PassKind::Variable => Expr::var(bank.left(root)),
        PassKind::Not => {
            let child = reconstruct(bank, bank.left(root) as usize);
            Expr::not(child)
        }
        PassKind::And => {
            let (l, r) = reconstruct_children(bank, root);
            Expr::and(l, r)
        }
        PassKind::Or => {
            let (l, r) = reconstruct_children(bank, root);
            Expr::or(l, r)
        }
        PassKind::Xor => {
            let (l, r) = reconstruct_children(bank, root);
            Expr::xor(l, r)
        }
    }
}

fn reconstruct_children(bank: &TermBank, index: usize) -> (Expr, Expr) {
    let left = reconstruct(bank, bank.left(index) as usize);
    let right = reconstruct(bank, bank.right(index) as usize);
    (left, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumerate::{Enumerator, SequentialEnumerator};
    use crate::spec::Spec;

    fn xor2() -> Spec {
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
    fn reconstructs_a_variable_term() {
        let mut bank = TermBank::new();
        bank.add_unary_term(0b10, 3);
        bank.record_pass(PassKind::Variable, 0);
        assert_eq!(reconstruct(&bank, 0), Expr::var(3));
    }

    #[test]
    fn reconstructs_a_not_term() {
        let mut bank = TermBank::new();
        bank.add_unary_term(0b01, 0);
        bank.record_pass(PassKind::Variable, 0);
        bank.add_unary_term(0b10, 0);
        bank.record_pass(PassKind::Not, 0);
        assert_eq!(reconstruct(&bank, 1), Expr::not(Expr::var(0)));
    }

    #[test]
    fn reconstructs_xor_of_two_variables() {
        let mut bank = TermBank::new();
        bank.add_unary_term(0b01, 0);
        bank.add_unary_term(0b10, 1);
        bank.record_pass(PassKind::Variable, 0);
        bank.add_binary_term(0b11, 0, 1);
        bank.record_pass(PassKind::Xor, 1);
        assert_eq!(reconstruct(&bank, 2), Expr::xor(Expr::var(0), Expr::var(1)));
    }

    #[test]
    fn end_to_end_reconstruction_validates_against_spec() {
        let spec = xor2();
        let (bank, found) = SequentialEnumerator.run(&spec);
        let expr = reconstruct(&bank, found.expect("xor found at height 1"));
        spec.validate(&expr).expect("reconstructed circuit must match the target");
    }
}
