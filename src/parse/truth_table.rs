//! Truth-table files: `max-depth:`, `variables:`, `input/output:` sections,
//! each terminated by a line containing `done`.
//!
//! Grounded on `Parser::parseTruthTableInput`: unlike the SyGuS format,
//! this one already stores each variable's *height* directly (the file
//! calls it "depth" but never flips it the way `Parser::parseInput`
//! does) and gives every row of the full truth table explicitly rather
//! than a reference circuit to evaluate. A row's input bit string is
//! read positionally: character `v` is variable `v`'s value, matching
//! the `(row >> v) & 1` convention `Spec::from_truth_table` expects — so
//! the row index is computed from the bits rather than trusted to equal
//! the file's line order.

use crate::error::SynthError;
use crate::spec::Spec;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Depth,
    Variables,
    InputOutput,
    None,
}

pub fn parse(text: &str) -> Result<Spec, SynthError> {
    let mut section = Section::None;
    let mut max_depth: Option<u32> = None;
    let mut var_names = Vec::new();
    let mut var_heights = Vec::new();
    let mut rows: Vec<(Vec<bool>, bool)> = Vec::new();

    for line in text.lines() {
        let line = line.trim_end();
        if line.contains("done") {
            section = Section::None;
            continue;
        }
        match section {
            Section::Depth => {
                let value: u32 = line.trim().parse().map_err(|_| {
                    SynthError::MalformedSpec(format!("invalid max-depth line: {line:?}"))
                })?;
                max_depth = Some(value);
                continue;
            }
            Section::Variables => {
                let (name, height) = line.trim().rsplit_once(' ').ok_or_else(|| {
                    SynthError::MalformedSpec(format!("invalid variable line: {line:?}"))
                })?;
                let height: u32 = height.parse().map_err(|_| {
                    SynthError::MalformedSpec(format!("invalid variable height: {height:?}"))
                })?;
                var_names.push(name.to_string());
                var_heights.push(height);
                continue;
            }
            Section::InputOutput => {
                let trimmed = line.trim();
                let (inputs, output) = trimmed.rsplit_once(' ').ok_or_else(|| {
                    SynthError::MalformedSpec(format!("invalid input/output line: {line:?}"))
                })?;
                let output_bit = parse_bit(output, line)?;
                let input_bits: Vec<bool> = inputs
                    .chars()
                    .map(|c| parse_bit_char(c, line))
                    .collect::<Result<_, _>>()?;
                rows.push((input_bits, output_bit));
                continue;
            }
            Section::None => {}
        }

        if line.contains("max-depth:") {
            section = Section::Depth;
        } else if line.contains("variables:") {
            section = Section::Variables;
        } else if line.contains("input/output:") {
            section = Section::InputOutput;
        }
    }

    let num_vars = var_names.len() as u32;
    if num_vars == 0 {
        return Err(SynthError::MalformedSpec(
            "truth-table input declared no variables".to_string(),
        ));
    }
    let max_depth = max_depth.ok_or_else(|| {
        SynthError::MalformedSpec("truth-table input is missing a max-depth section".to_string())
    })?;

    let total_rows = 1usize << num_vars;
    let mut full_sol = vec![None; total_rows];
    for (inputs, output) in rows {
        if inputs.len() != num_vars as usize {
            return Err(SynthError::MalformedSpec(format!(
                "expected {} input bits, got {}",
                num_vars,
                inputs.len()
            )));
        }
        let row = inputs
            .iter()
            .enumerate()
            .fold(0usize, |acc, (v, &bit)| acc | ((bit as usize) << v));
        full_sol[row] = Some(output);
    }
    let full_sol: Vec<bool> = full_sol
        .into_iter()
        .enumerate()
        .map(|(row, bit)| {
            bit.ok_or_else(|| {
                SynthError::MalformedSpec(format!("truth table is missing row {row}"))
            })
        })
        .collect::<Result<_, _>>()?;

    Spec::from_truth_table(num_vars, var_names, var_heights, max_depth, full_sol)
}

fn parse_bit(s: &str, line: &str) -> Result<bool, SynthError> {
    match s {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(SynthError::MalformedSpec(format!(
            "expected '0' or '1' output bit in line {line:?}"
        ))),
    }
}

fn parse_bit_char(c: char, line: &str) -> Result<bool, SynthError> {
    match c {
        '0' => Ok(false),
        '1' => Ok(true),
        _ => Err(SynthError::MalformedSpec(format!(
            "expected '0'/'1' input bits in line {line:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XOR_INPUT: &str = "\
max-depth:
1
done
variables:
a 0
b 0
done
input/output:
00 0
10 1
01 1
11 0
done
";

    #[test]
    fn parses_variables_and_heights() {
        let spec = parse(XOR_INPUT).unwrap();
        assert_eq!(spec.var_names(), &["a".to_string(), "b".to_string()]);
        assert_eq!(spec.var_heights(), &[0, 0]);
        assert_eq!(spec.sol_height(), 1);
    }

    #[test]
    fn rows_are_placed_by_bit_value_not_file_order() {
        let spec = parse(XOR_INPUT).unwrap();
        // row 0b01 (a=1,b=0) -> 1, row 0b10 (a=0,b=1) -> 1, matching a ^ b.
        assert_eq!(spec.sol_result() & spec.sol_mask(), 0b0110);
    }

    #[test]
    fn rejects_missing_rows() {
        let text = "\
max-depth:
1
done
variables:
a 0
b 0
done
input/output:
00 0
done
";
        let err = parse(text).unwrap_err();
        assert!(matches!(err, SynthError::MalformedSpec(_)));
    }

    #[test]
    fn rejects_input_with_no_variables() {
        let text = "max-depth:\n0\ndone\nvariables:\ndone\ninput/output:\ndone\n";
        let err = parse(text).unwrap_err();
        assert!(matches!(err, SynthError::MalformedSpec(_)));
    }
}
