//! The `boolsynth synth` subcommand.
//!
//! Thin glue: load a `Spec` from one of the two file formats (`parse`),
//! run the CEGIS driver (`cegis::synthesize`), and print the result. Not
//! part of the synthesis core (see `SPEC_FULL.md` §2), but the only
//! consumer of `parse`/`print` outside their own tests.

use std::path::PathBuf;
use std::process;

use clap::Args;
use serde::Serialize;

use boolsynth::enumerate::EnumerateMode;
use boolsynth::error::SynthError;
use boolsynth::parse::{self, Format};
use boolsynth::print;

#[derive(Args)]
pub struct SynthArgs {
    /// SyGuS grammar (.sl) or truth-table (.tt) input file
    pub input: PathBuf,
    /// Input file format
    #[arg(long, value_enum, default_value = "sygus")]
    pub format: InputFormat,
    /// Run the rayon-parallel enumerator instead of the sequential one
    #[arg(long)]
    pub parallel: bool,
    /// Emit a machine-readable JSON report instead of pretty-printed text
    #[arg(long)]
    pub json: bool,
    /// Print variables by their declared names instead of `x<i>`
    #[arg(long)]
    pub names: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum InputFormat {
    Sygus,
    TruthTable,
}

#[derive(Serialize)]
struct Report {
    status: &'static str,
    expression: Option<String>,
    height: Option<u32>,
    cegis_iterations: Option<u32>,
}

pub fn cmd_synth(args: SynthArgs) {
    let format = match args.format {
        InputFormat::Sygus => Format::Sygus,
        InputFormat::TruthTable => Format::TruthTable,
    };

    let mut spec = match parse::parse_file(&args.input, format) {
        Ok(spec) => spec,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };

    let mode = if args.parallel {
        EnumerateMode::Parallel
    } else {
        EnumerateMode::Sequential
    };

    match boolsynth::synthesize(&mut spec, mode) {
        Ok(solution) => {
            let height = solution.expr.height(spec.var_heights());
            let rendered = if args.names {
                print::format_with_names(&solution.expr, spec.var_names())
            } else {
                solution.expr.to_string()
            };
            if args.json {
                let report = Report {
                    status: "sat",
                    expression: Some(rendered),
                    height: Some(height),
                    cegis_iterations: Some(solution.cegis_iterations),
                };
                println!("{}", serde_json::to_string(&report).unwrap());
            } else {
                println!("{rendered}");
            }
        }
        Err(SynthError::UnsatWithinBound(bound)) => {
            if args.json {
                let report = Report {
                    status: "unsat",
                    expression: None,
                    height: None,
                    cegis_iterations: None,
                };
                println!("{}", serde_json::to_string(&report).unwrap());
            } else {
                eprintln!("unsat-within-bound: no circuit of height <= {bound} matches the target");
            }
            process::exit(1);
        }
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    }
}
