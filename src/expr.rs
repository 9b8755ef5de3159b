//! The synthesized expression tree.
//!
//! Immutable once built: the reconstructor is the only producer, the
//! validator and printer are the only consumers. Grounded on the original
//! `Expr` class (`synth/expr.hpp`), translated from a `type` tag plus
//! nullable child pointers into a proper tagged enum.

use serde::{Deserialize, Serialize};

use crate::error::SynthError;

/// A Boolean circuit over `{AND, OR, XOR, NOT}` and named leaf variables.
///
/// `Var` is always a leaf; `Not` always has exactly one child; `And`/`Or`/
/// `Xor` always have exactly two. The type itself enforces this — there is
/// no way to construct a `Not` with zero or two children.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expr {
    Var(u32),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Xor(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn var(i: u32) -> Self {
        Expr::Var(i)
    }

    pub fn not(e: Expr) -> Self {
        Expr::Not(Box::new(e))
    }

    pub fn and(l: Expr, r: Expr) -> Self {
        Expr::And(Box::new(l), Box::new(r))
    }

    pub fn or(l: Expr, r: Expr) -> Self {
        Expr::Or(Box::new(l), Box::new(r))
    }

    pub fn xor(l: Expr, r: Expr) -> Self {
        Expr::Xor(Box::new(l), Box::new(r))
    }

    /// Evaluate against a full assignment: `vars[i]` is the value of
    /// variable `i`. Tree-recursive; depth is bounded by the solution
    /// height, which is small in practice, so no explicit stack is used.
    pub fn eval(&self, vars: &[bool]) -> bool {
        match self {
            Expr::Var(i) => vars[*i as usize],
            Expr::Not(x) => !x.eval(vars),
            Expr::And(l, r) => l.eval(vars) && r.eval(vars),
            Expr::Or(l, r) => l.eval(vars) || r.eval(vars),
            Expr::Xor(l, r) => l.eval(vars) ^ r.eval(vars),
        }
    }

    /// `height(Var(i)) = var_heights[i]`, `height(Not x) = height(x)`
    /// (Not does not raise height — the source's Not pass never consults
    /// height), `height(bin l r) = 1 + max(height(l), height(r))`.
    pub fn height(&self, var_heights: &[u32]) -> u32 {
        match self {
            Expr::Var(i) => var_heights[*i as usize],
            Expr::Not(x) => x.height(var_heights),
            Expr::And(l, r) | Expr::Or(l, r) | Expr::Xor(l, r) => {
                1 + l.height(var_heights).max(r.height(var_heights))
            }
        }
    }

    /// Succeeds iff the root's height equals `max_height` exactly — the
    /// solution must use the full height budget. (Open question in
    /// spec.md §9, resolved to match the source, which asserts equality.)
    pub fn assert_constant_height(
        &self,
        max_height: u32,
        var_heights: &[u32],
    ) -> Result<(), SynthError> {
        let actual = self.height(var_heights);
        if actual == max_height {
            Ok(())
        } else {
            Err(SynthError::HeightViolation {
                expected: max_height,
                actual,
            })
        }
    }
}

impl std::fmt::Display for Expr {
    /// Prints with `x<i>` variable names and parentheses around every
    /// binary operation, matching the original `operator<<` with no name
    /// table. Use `crate::print` for a name-aware variant.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Var(i) => write!(f, "x{}", i),
            Expr::Not(x) => write!(f, "!{}", x),
            Expr::And(l, r) => write!(f, "({} && {})", l, r),
            Expr::Or(l, r) => write!(f, "({} || {})", l, r),
            Expr::Xor(l, r) => write!(f, "({} ^ {})", l, r),
        }
    }
}
