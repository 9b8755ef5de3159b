//! Append-only columnar store of synthesized terms.
//!
//! Grounded on the term arrays implied by `synth_cpu_st.hpp`
//! (`term_results`, `term_lefts`, `term_rights`, `num_terms`,
//! `alloc_term`/`add_unary_term`/`add_binary_term`, `record_pass`) — the
//! struct-of-arrays layout that file's `Synthesizer` maintains as private
//! fields. Indices are stable for the bank's lifetime: nothing is ever
//! removed or reordered, so a term's index can be embedded in later terms
//! as a child reference without invalidation.

use serde::{Deserialize, Serialize};

/// The kind of pass that introduced a run of bank entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassKind {
    Variable,
    Not,
    And,
    Or,
    Xor,
}

/// One completed enumeration pass: its kind, the height it ran at, and the
/// bank size immediately after it (so `[previous pass's end, end)` is the
/// half-open range of indices it produced).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct PassRecord {
    kind: PassKind,
    height: u32,
    end: usize,
}

/// Columnar, append-only arena of synthesized terms.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TermBank {
    term_results: Vec<u32>,
    /// For `Var` terms, the variable index. For `Not`, the child bank
    /// index. For binary terms, the left child bank index.
    term_lefts: Vec<u32>,
    /// Unused for `Var`/`Not`; the right child bank index for binary terms.
    term_rights: Vec<u32>,
    passes: Vec<PassRecord>,
}

impl TermBank {
    pub fn new() -> Self {
        TermBank::default()
    }

    pub fn len(&self) -> usize {
        self.term_results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.term_results.is_empty()
    }

    pub fn result(&self, index: usize) -> u32 {
        self.term_results[index]
    }

    pub fn left(&self, index: usize) -> u32 {
        self.term_lefts[index]
    }

    pub fn right(&self, index: usize) -> u32 {
        self.term_rights[index]
    }

    /// Append a `Var` or `Not` term (one meaningful child reference).
    pub fn add_unary_term(&mut self, result: u32, left: u32) -> usize {
        let index = self.term_results.len();
        self.term_results.push(result);
        self.term_lefts.push(left);
        self.term_rights.push(0);
        index
    }

    /// Append an `And`/`Or`/`Xor` term (two child references).
    pub fn add_binary_term(&mut self, result: u32, left: u32, right: u32) -> usize {
        let index = self.term_results.len();
        self.term_results.push(result);
        self.term_lefts.push(left);
        self.term_rights.push(right);
        index
    }

    /// Record that a pass of the given kind, run at the given height, has
    /// just finished; the bank's current size becomes that pass's end
    /// boundary.
    pub fn record_pass(&mut self, kind: PassKind, height: u32) {
        self.passes.push(PassRecord {
            kind,
            height,
            end: self.term_results.len(),
        });
    }

    /// The pass kind that introduced bank index `t`. Used by the
    /// reconstructor to decide whether `term_lefts[t]` is a variable index
    /// (`Variable`) or a bank index (`Not`/binary), and whether
    /// `term_rights[t]` is meaningful.
    pub fn pass_kind_for(&self, index: usize) -> PassKind {
        let mut prev_end = 0usize;
        for pass in &self.passes {
            if index >= prev_end && index < pass.end {
                return pass.kind;
            }
            prev_end = pass.end;
        }
        unreachable!("bank index {index} not covered by any recorded pass")
    }

    /// The bank size immediately after the most recent pass of `kind`, or
    /// `None` if no such pass has run yet. The `Not` pass uses this to
    /// scan only terms introduced since its own previous run.
    pub fn last_pass_end(&self, kind: PassKind) -> Option<usize> {
        self.passes.iter().rev().find(|p| p.kind == kind).map(|p| p.end)
    }

    /// Half-open range `[start, end)` of bank indices introduced by passes
    /// run at exactly `height`. Empty (and positioned right after the
    /// previous height's terms) if no pass has run at `height` yet.
    pub fn terms_with_height_start(&self, height: u32) -> usize {
        self.passes
            .iter()
            .rev()
            .find(|p| p.height < height)
            .map(|p| p.end)
            .unwrap_or(0)
    }

    pub fn terms_with_height_end(&self, height: u32) -> usize {
        self.passes
            .iter()
            .rev()
            .find(|p| p.height == height)
            .map(|p| p.end)
            .unwrap_or_else(|| self.terms_with_height_start(height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_height_range_before_any_pass() {
        let bank = TermBank::new();
        assert_eq!(bank.terms_with_height_start(0), 0);
        assert_eq!(bank.terms_with_height_end(0), 0);
    }

    #[test]
    fn height_ranges_track_recorded_passes() {
        let mut bank = TermBank::new();
        bank.add_unary_term(0b01, 0);
        bank.add_unary_term(0b10, 1);
        bank.record_pass(PassKind::Variable, 0);
        assert_eq!(bank.terms_with_height_start(0), 0);
        assert_eq!(bank.terms_with_height_end(0), 2);
        // Nothing recorded at height 1 yet: empty range positioned after
        // height 0's terms.
        assert_eq!(bank.terms_with_height_start(1), 2);
        assert_eq!(bank.terms_with_height_end(1), 2);

        bank.add_binary_term(0b11, 0, 1);
        bank.record_pass(PassKind::And, 1);
        assert_eq!(bank.terms_with_height_start(1), 2);
        assert_eq!(bank.terms_with_height_end(1), 3);
    }

    #[test]
    fn last_pass_end_tracks_most_recent_occurrence() {
        let mut bank = TermBank::new();
        assert_eq!(bank.last_pass_end(PassKind::Not), None);
        bank.add_unary_term(1, 0);
        bank.record_pass(PassKind::Variable, 0);
        bank.add_unary_term(2, 0);
        bank.record_pass(PassKind::Not, 1);
        assert_eq!(bank.last_pass_end(PassKind::Not), Some(2));
        bank.add_binary_term(3, 0, 1);
        bank.record_pass(PassKind::And, 1);
        bank.add_unary_term(4, 1);
        bank.record_pass(PassKind::Not, 2);
        assert_eq!(bank.last_pass_end(PassKind::Not), Some(4));
    }

    #[test]
    fn pass_kind_lookup() {
        let mut bank = TermBank::new();
        bank.add_unary_term(1, 0);
        bank.record_pass(PassKind::Variable, 0);
        bank.add_binary_term(1, 0, 0);
        bank.record_pass(PassKind::Xor, 1);
        assert_eq!(bank.pass_kind_for(0), PassKind::Variable);
        assert_eq!(bank.pass_kind_for(1), PassKind::Xor);
    }

    #[test]
    fn indices_are_stable_across_appends() {
        let mut bank = TermBank::new();
        let a = bank.add_unary_term(1, 0);
        let b = bank.add_unary_term(2, 1);
        bank.record_pass(PassKind::Variable, 0);
        let c = bank.add_binary_term(3, a as u32, b as u32);
        assert_eq!(bank.left(c), a as u32);
        assert_eq!(bank.right(c), b as u32);
        assert_eq!(bank.result(a), 1);
        assert_eq!(bank.result(b), 2);
    }
}
