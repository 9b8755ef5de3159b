//! The height-stratified pass engine.
//!
//! Grounded on `synth_cpu_st.hpp`'s `Synthesizer::run`: a `DO_PASS` loop
//! over increasing height that, at each height, runs a `Variable` pass and
//! then (for `height > 0`) `Not`, `And`, `Or`, `Xor` passes in that exact
//! order, bailing out the instant a term's signature matches the target.
//! `SequentialEnumerator` is the direct translation; `RayonEnumerator` is
//! an additional implementation permitted by spec.md §5's concurrency
//! allowance, described in full in `SPEC_FULL.md` §5.

use rayon::prelude::*;

use crate::bank::{PassKind, TermBank};
use crate::bitset::SignatureSet;
use crate::spec::Spec;

/// Selects which `Enumerator` implementation `cegis::synthesize` drives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnumerateMode {
    #[default]
    Sequential,
    Parallel,
}

/// Runs one full height-stratified enumeration against `spec`, returning
/// the term bank it built and, if a match was found, the bank index of
/// the first term whose signature equals `spec.sol_result()`.
pub trait Enumerator {
    fn run(&self, spec: &Spec) -> (TermBank, Option<usize>);
}

/// Build an enumerator for `mode`.
pub fn enumerator_for(mode: EnumerateMode) -> Box<dyn Enumerator> {
    match mode {
        EnumerateMode::Sequential => Box::new(SequentialEnumerator),
        EnumerateMode::Parallel => Box::new(RayonEnumerator),
    }
}

/// Single `Vec`-backed bank, single `SignatureSet`, passes run in order on
/// the calling thread. The reference implementation; every other
/// `Enumerator` must agree with it on every input.
pub struct SequentialEnumerator;

impl Enumerator for SequentialEnumerator {
    fn run(&self, spec: &Spec) -> (TermBank, Option<usize>) {
        let mut bank = TermBank::new();
        let mut seen = SignatureSet::new(spec.num_examples());
        let sol_mask = spec.sol_mask();
        let target = spec.sol_result() & sol_mask;

        for height in 0..=spec.sol_height() {
            if let Some(found) = pass_variable(spec, &mut bank, &mut seen, sol_mask, target, height) {
                bank.record_pass(PassKind::Variable, height);
                log::debug!("pass=Variable height={height} terms={} (match)", bank.len());
                return (bank, Some(found));
            }
            bank.record_pass(PassKind::Variable, height);
            log::debug!("pass=Variable height={height} terms={}", bank.len());

            if height == 0 {
                continue;
            }

            if let Some(found) = pass_not(&mut bank, &mut seen, sol_mask, target) {
                bank.record_pass(PassKind::Not, height);
                log::debug!("pass=Not height={height} terms={} (match)", bank.len());
                return (bank, Some(found));
            }
            bank.record_pass(PassKind::Not, height);
            log::debug!("pass=Not height={height} terms={}", bank.len());

            if let Some(found) = pass_and(&mut bank, &mut seen, sol_mask, target, height) {
                bank.record_pass(PassKind::And, height);
                log::debug!("pass=And height={height} terms={} (match)", bank.len());
                return (bank, Some(found));
            }
            bank.record_pass(PassKind::And, height);
            log::debug!("pass=And height={height} terms={}", bank.len());

            if let Some(found) = pass_or(&mut bank, &mut seen, sol_mask, target, height) {
                bank.record_pass(PassKind::Or, height);
                log::debug!("pass=Or height={height} terms={} (match)", bank.len());
                return (bank, Some(found));
            }
            bank.record_pass(PassKind::Or, height);
            log::debug!("pass=Or height={height} terms={}", bank.len());

            if let Some(found) = pass_xor(&mut bank, &mut seen, sol_mask, target, height) {
                bank.record_pass(PassKind::Xor, height);
                log::debug!("pass=Xor height={height} terms={} (match)", bank.len());
                return (bank, Some(found));
            }
            bank.record_pass(PassKind::Xor, height);
            log::debug!("pass=Xor height={height} terms={}", bank.len());
        }

        (bank, None)
    }
}

/// `Variable` pass: admit every variable whose declared height equals the
/// current height. Variable indices, not bank indices, are stored in
/// `term_lefts` for these terms; `bank::pass_kind_for` tells the
/// reconstructor which interpretation applies.
fn pass_variable(
    spec: &Spec,
    bank: &mut TermBank,
    seen: &mut SignatureSet,
    sol_mask: u32,
    target: u32,
    height: u32,
) -> Option<usize> {
    for i in 0..spec.num_vars() {
        if spec.var_heights()[i as usize] != height {
            continue;
        }
        let result = spec.var_values()[i as usize] & sol_mask;
        if seen.test_and_set(result) {
            continue;
        }
        let index = bank.add_unary_term(result, i);
        if result == target {
            return Some(index);
        }
    }
    None
}

/// `Not` pass: negate every term introduced since the previous `Not` pass
/// (or from the start of the bank, if this is the first one).
fn pass_not(
    bank: &mut TermBank,
    seen: &mut SignatureSet,
    sol_mask: u32,
    target: u32,
) -> Option<usize> {
    let start = bank.last_pass_end(PassKind::Not).unwrap_or(0);
    let end = bank.len();
    for child in start..end {
        let result = !bank.result(child) & sol_mask;
        if seen.test_and_set(result) {
            continue;
        }
        let index = bank.add_unary_term(result, child as u32);
        if result == target {
            return Some(index);
        }
    }
    None
}

/// `And` pass at `height`: combine every pair of terms from height
/// `height - 1` with `right < left` (strict diagonal — `And` is
/// commutative and `a && a` is already representable at a lower height).
fn pass_and(
    bank: &mut TermBank,
    seen: &mut SignatureSet,
    sol_mask: u32,
    target: u32,
    height: u32,
) -> Option<usize> {
    run_binary_pass(bank, seen, sol_mask, target, height, Diagonal::Strict, |l, r| l & r)
}

/// `Or` pass: same shape as `And`, strict diagonal.
fn pass_or(
    bank: &mut TermBank,
    seen: &mut SignatureSet,
    sol_mask: u32,
    target: u32,
    height: u32,
) -> Option<usize> {
    run_binary_pass(bank, seen, sol_mask, target, height, Diagonal::Strict, |l, r| l | r)
}

/// `Xor` pass: `right <= left`, inclusive — unlike `And`/`Or`, `a ^ a` is
/// the constant-false signature and is not reachable any other way at
/// this height, so the diagonal itself is a valid candidate.
fn pass_xor(
    bank: &mut TermBank,
    seen: &mut SignatureSet,
    sol_mask: u32,
    target: u32,
    height: u32,
) -> Option<usize> {
    run_binary_pass(bank, seen, sol_mask, target, height, Diagonal::Inclusive, |l, r| l ^ r)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Diagonal {
    /// `right < left`.
    Strict,
    /// `right <= left`.
    Inclusive,
}

/// Shared shape of `And`/`Or`/`Xor`: `left` ranges over terms of height
/// `height - 1`, `right` ranges over `0..left` (or `0..=left`) regardless
/// of `right`'s own height — the source imposes no height floor on
/// `right`, only that it not exceed `left`'s index.
fn run_binary_pass(
    bank: &mut TermBank,
    seen: &mut SignatureSet,
    sol_mask: u32,
    target: u32,
    height: u32,
    diagonal: Diagonal,
    combine: impl Fn(u32, u32) -> u32,
) -> Option<usize> {
    let lefts_start = bank.terms_with_height_start(height - 1);
    let lefts_end = bank.terms_with_height_end(height - 1);
    for left in lefts_start..lefts_end {
        let right_end = match diagonal {
            Diagonal::Strict => left,
            Diagonal::Inclusive => left + 1,
        };
        for right in 0..right_end {
            let result = combine(bank.result(left), bank.result(right)) & sol_mask;
            if seen.test_and_set(result) {
                continue;
            }
            let index = bank.add_binary_term(result, left as u32, right as u32);
            if result == target {
                return Some(index);
            }
        }
    }
    None
}

/// Parallel variant permitted by spec.md §5: the compute phase of each
/// And/Or/Xor/Not pass runs over `rayon`'s global pool; the reservation
/// phase (the `seen.test_and_set` + bank append) stays single-threaded so
/// tie-breaking matches `SequentialEnumerator` exactly. See `SPEC_FULL.md`
/// §5 for the full rationale.
pub struct RayonEnumerator;

impl Enumerator for RayonEnumerator {
    fn run(&self, spec: &Spec) -> (TermBank, Option<usize>) {
        let mut bank = TermBank::new();
        let mut seen = SignatureSet::new(spec.num_examples());
        let sol_mask = spec.sol_mask();
        let target = spec.sol_result() & sol_mask;

        for height in 0..=spec.sol_height() {
            if let Some(found) = pass_variable(spec, &mut bank, &mut seen, sol_mask, target, height) {
                bank.record_pass(PassKind::Variable, height);
                log::debug!("pass=Variable height={height} terms={} (match)", bank.len());
                return (bank, Some(found));
            }
            bank.record_pass(PassKind::Variable, height);
            log::debug!("pass=Variable height={height} terms={}", bank.len());

            if height == 0 {
                continue;
            }

            if let Some(found) = parallel_unary_pass(&mut bank, &mut seen, sol_mask, target, |x| !x) {
                bank.record_pass(PassKind::Not, height);
                log::debug!("pass=Not height={height} terms={} (match)", bank.len());
                return (bank, Some(found));
            }
            bank.record_pass(PassKind::Not, height);
            log::debug!("pass=Not height={height} terms={}", bank.len());

            if let Some(found) =
                parallel_binary_pass(&mut bank, &mut seen, sol_mask, target, height, Diagonal::Strict, |l, r| l & r)
            {
                bank.record_pass(PassKind::And, height);
                log::debug!("pass=And height={height} terms={} (match)", bank.len());
                return (bank, Some(found));
            }
            bank.record_pass(PassKind::And, height);
            log::debug!("pass=And height={height} terms={}", bank.len());

            if let Some(found) =
                parallel_binary_pass(&mut bank, &mut seen, sol_mask, target, height, Diagonal::Strict, |l, r| l | r)
            {
                bank.record_pass(PassKind::Or, height);
                log::debug!("pass=Or height={height} terms={} (match)", bank.len());
                return (bank, Some(found));
            }
            bank.record_pass(PassKind::Or, height);
            log::debug!("pass=Or height={height} terms={}", bank.len());

            if let Some(found) = parallel_binary_pass(
                &mut bank,
                &mut seen,
                sol_mask,
                target,
                height,
                Diagonal::Inclusive,
                |l, r| l ^ r,
            ) {
                bank.record_pass(PassKind::Xor, height);
                log::debug!("pass=Xor height={height} terms={} (match)", bank.len());
                return (bank, Some(found));
            }
            bank.record_pass(PassKind::Xor, height);
            log::debug!("pass=Xor height={height} terms={}", bank.len());
        }

        (bank, None)
    }
}

/// Parallel compute phase for the `Not` pass: map `[start, end)` to
/// `(child, result)` pairs, dropping anything already known-duplicate as
/// of the start of the pass, then reserve sequentially in order.
fn parallel_unary_pass(
    bank: &mut TermBank,
    seen: &mut SignatureSet,
    sol_mask: u32,
    target: u32,
    combine: impl Fn(u32) -> u32 + Sync,
) -> Option<usize> {
    let start = bank.last_pass_end(PassKind::Not).unwrap_or(0);
    let end = bank.len();
    let candidates: Vec<(usize, u32)> = {
        let bank: &TermBank = bank;
        let seen: &SignatureSet = seen;
        (start..end)
            .into_par_iter()
            .filter_map(|child| {
                let result = combine(bank.result(child)) & sol_mask;
                if seen.contains(result) {
                    None
                } else {
                    Some((child, result))
                }
            })
            .collect()
    };

    reserve_unary(bank, seen, candidates, target)
}

/// Parallel compute phase for And/Or/Xor: map the `(left, right)`
/// diagonal at `height` to `(left, right, result)` triples, in
/// left-ascending then right-ascending order (guaranteed by `rayon`'s
/// indexed `collect`, independent of which worker finishes first), then
/// reserve sequentially in that same order.
fn parallel_binary_pass(
    bank: &mut TermBank,
    seen: &mut SignatureSet,
    sol_mask: u32,
    target: u32,
    height: u32,
    diagonal: Diagonal,
    combine: impl Fn(u32, u32) -> u32 + Sync,
) -> Option<usize> {
    let lefts_start = bank.terms_with_height_start(height - 1);
    let lefts_end = bank.terms_with_height_end(height - 1);

    let pairs: Vec<(usize, usize)> = (lefts_start..lefts_end)
        .into_par_iter()
        .flat_map_iter(|left| {
            let right_end = match diagonal {
                Diagonal::Strict => left,
                Diagonal::Inclusive => left + 1,
            };
            (0..right_end).map(move |right| (left, right))
        })
        .collect();

    let candidates: Vec<(usize, usize, u32)> = {
        let bank: &TermBank = bank;
        let seen: &SignatureSet = seen;
        pairs
            .into_par_iter()
            .filter_map(|(left, right)| {
                let result = combine(bank.result(left), bank.result(right)) & sol_mask;
                if seen.contains(result) {
                    None
                } else {
                    Some((left, right, result))
                }
            })
            .collect()
    };

    reserve_binary(bank, seen, candidates, target)
}

/// The reservation phase: a plain, single-threaded walk over
/// already-ordered candidates, doing the authoritative `test_and_set`
/// (which also catches duplicates created within this same pass, not
/// just ones seen before it started) and appending to the bank.
fn reserve_unary(
    bank: &mut TermBank,
    seen: &mut SignatureSet,
    candidates: Vec<(usize, u32)>,
    target: u32,
) -> Option<usize> {
    for (child, result) in candidates {
        if seen.test_and_set(result) {
            continue;
        }
        let index = bank.add_unary_term(result, child as u32);
        if result == target {
            return Some(index);
        }
    }
    None
}

fn reserve_binary(
    bank: &mut TermBank,
    seen: &mut SignatureSet,
    candidates: Vec<(usize, usize, u32)>,
    target: u32,
) -> Option<usize> {
    for (left, right, result) in candidates {
        if seen.test_and_set(result) {
            continue;
        }
        let index = bank.add_binary_term(result, left as u32, right as u32);
        if result == target {
            return Some(index);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn const_true(num_vars: u32) -> Spec {
        let rows = 1usize << num_vars;
        Spec::from_truth_table(
            num_vars,
            (0..num_vars).map(|i| format!("v{i}")).collect(),
            vec![0; num_vars as usize],
            0,
            vec![true; rows],
        )
        .unwrap()
    }

    #[test]
    fn sequential_finds_xor_at_height_one() {
        let spec = xor2();
        let (bank, found) = SequentialEnumerator.run(&spec);
        let index = found.expect("xor is representable at height 1");
        assert_eq!(bank.result(index) & spec.sol_mask(), spec.sol_result());
    }

    #[test]
    fn sequential_finds_variable_at_height_zero() {
        let spec = const_true(1);
        let (_, found) = SequentialEnumerator.run(&spec);
        assert!(found.is_none(), "constant true is not representable by a bare variable");
    }

    #[test]
    fn parallel_agrees_with_sequential_on_xor() {
        let spec = xor2();
        let (seq_bank, seq_found) = SequentialEnumerator.run(&spec);
        let (par_bank, par_found) = RayonEnumerator.run(&spec);
        let seq_index = seq_found.unwrap();
        let par_index = par_found.unwrap();
        assert_eq!(seq_bank.result(seq_index), par_bank.result(par_index));
        assert_eq!(seq_index, par_index, "reservation order must match exactly");
    }
}
