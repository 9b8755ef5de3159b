//! SyGuS-style grammar files.
//!
//! Grounded on `Parser::parseInput`: a line-oriented scanner that looks
//! for `define-fun origCir`/`define-fun Spec` (the next line holds the
//! reference circuit, in prefix notation) and `synth-fun` (the start of
//! the grammar block, whose `(depth ...)` markers and bare variable
//! names build `var_names`/`var_heights`). The original flips depth into
//! height with `var_heights[i] = max_depth - depth(i)` once the grammar
//! block closes; this parser does the same.

use crate::error::SynthError;
use crate::spec::Spec;

pub fn parse(text: &str) -> Result<Spec, SynthError> {
    let mut var_names = Vec::new();
    let mut var_depths = Vec::new();
    let mut depth = 0u32;
    let mut started_grammar = false;
    let mut finished_grammar = false;
    let mut original_circuit_next = false;
    let mut orig_circuit = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with(';') {
            continue;
        }
        if original_circuit_next {
            original_circuit_next = false;
            orig_circuit = Some(trimmed.to_string());
            continue;
        }
        if trimmed.contains("define-fun origCir") || trimmed.contains("define-fun Spec") {
            original_circuit_next = true;
            continue;
        }
        if trimmed.contains("synth-fun") {
            started_grammar = true;
            continue;
        }
        if started_grammar && !finished_grammar {
            if trimmed == ")" {
                finished_grammar = true;
            } else if trimmed.contains("(depth") {
                depth += 1;
            } else if !trimmed.contains('(') && !trimmed.contains(')') && !trimmed.is_empty() {
                let name: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
                var_depths.push(depth);
                var_names.push(name);
            }
        }
    }

    let max_depth = depth;
    let var_heights: Vec<u32> = var_depths.iter().map(|&d| max_depth - d).collect();
    let num_vars = var_names.len() as u32;

    if num_vars == 0 {
        return Err(SynthError::MalformedSpec(
            "sygus input declared no grammar variables".to_string(),
        ));
    }
    let orig_circuit = orig_circuit.ok_or_else(|| {
        SynthError::MalformedSpec("sygus input is missing an origCir/Spec definition".to_string())
    })?;

    let circuit = parse_prefix_expr(&orig_circuit)?;
    let full_sol = evaluate_truth_table(&circuit, &var_names);

    Spec::from_truth_table(num_vars, var_names, var_heights, max_depth, full_sol)
}

/// A Boolean circuit in the reference-circuit grammar: `and`/`or`/`xor`
/// are binary, `not` is unary, everything else is a variable reference.
enum Node {
    Var(String),
    Not(Box<Node>),
    And(Box<Node>, Box<Node>),
    Or(Box<Node>, Box<Node>),
    Xor(Box<Node>, Box<Node>),
}

fn parse_prefix_expr(text: &str) -> Result<Node, SynthError> {
    let tokens = tokenize(text);
    let mut pos = 0;
    let node = parse_node(&tokens, &mut pos)?;
    Ok(node)
}

fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        match c {
            '(' | ')' => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                tokens.push(c.to_string());
            }
            c if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn parse_node(tokens: &[String], pos: &mut usize) -> Result<Node, SynthError> {
    let token = tokens
        .get(*pos)
        .ok_or_else(|| SynthError::MalformedSpec("unexpected end of origCir expression".to_string()))?;
    *pos += 1;

    if token == "(" {
        let head = tokens
            .get(*pos)
            .ok_or_else(|| SynthError::MalformedSpec("expected operator after '('".to_string()))?
            .clone();
        *pos += 1;
        let node = match head.as_str() {
            "not" => Node::Not(Box::new(parse_node(tokens, pos)?)),
            "and" => {
                let l = parse_node(tokens, pos)?;
                let r = parse_node(tokens, pos)?;
                Node::And(Box::new(l), Box::new(r))
            }
            "or" => {
                let l = parse_node(tokens, pos)?;
                let r = parse_node(tokens, pos)?;
                Node::Or(Box::new(l), Box::new(r))
            }
            "xor" => {
                let l = parse_node(tokens, pos)?;
                let r = parse_node(tokens, pos)?;
                Node::Xor(Box::new(l), Box::new(r))
            }
            other => return Err(SynthError::MalformedSpec(format!("unknown gate '{other}'"))),
        };
        match tokens.get(*pos) {
            Some(t) if t == ")" => {
                *pos += 1;
                Ok(node)
            }
            _ => Err(SynthError::MalformedSpec("expected closing ')'".to_string())),
        }
    } else {
        Ok(Node::Var(token.clone()))
    }
}

fn eval_node(node: &Node, values: &std::collections::HashMap<&str, bool>) -> bool {
    match node {
        Node::Var(name) => values[name.as_str()],
        Node::Not(x) => !eval_node(x, values),
        Node::And(l, r) => eval_node(l, values) && eval_node(r, values),
        Node::Or(l, r) => eval_node(l, values) || eval_node(r, values),
        Node::Xor(l, r) => eval_node(l, values) ^ eval_node(r, values),
    }
}

/// Evaluate `circuit` over every assignment of `var_names`, in the same
/// row order `Spec::from_truth_table` expects: row `i`'s variable `v` is
/// `(i >> v) & 1`.
fn evaluate_truth_table(circuit: &Node, var_names: &[String]) -> Vec<bool> {
    let num_vars = var_names.len() as u32;
    let rows = 1usize << num_vars;
    let mut table = Vec::with_capacity(rows);
    for row in 0..rows {
        let values: std::collections::HashMap<&str, bool> = var_names
            .iter()
            .enumerate()
            .map(|(v, name)| (name.as_str(), (row >> v) & 1 != 0))
            .collect();
        table.push(eval_node(circuit, &values));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    const XOR_INPUT: &str = "\
; comment line, ignored
(synth-fun Start () Bool
    ((Start Bool ((depth
        (a Bool)
        (b Bool)
    )))
    )
)
(define-fun origCir () Bool
(xor a b)
";

    #[test]
    fn parses_variables_and_heights() {
        let spec = parse(XOR_INPUT).unwrap();
        assert_eq!(spec.var_names(), &["a".to_string(), "b".to_string()]);
        // max_depth = 1, both variables declared at depth 1 -> height 0.
        assert_eq!(spec.var_heights(), &[0, 0]);
        assert_eq!(spec.sol_height(), 1);
    }

    #[test]
    fn evaluates_origcir_as_xor() {
        let spec = parse(XOR_INPUT).unwrap();
        assert_eq!(spec.sol_result() & spec.sol_mask(), 0b0110);
    }

    #[test]
    fn rejects_input_with_no_grammar_variables() {
        let err = parse("(define-fun origCir () Bool\n(not a)\n").unwrap_err();
        assert!(matches!(err, SynthError::MalformedSpec(_)));
    }
}
