mod cli;

use clap::{Parser, Subcommand};

use cli::synth::SynthArgs;

#[derive(Parser)]
#[command(
    name = "boolsynth",
    version,
    about = "Enumerative CEGIS synthesizer for Boolean circuits"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Synthesize a circuit matching a SyGuS grammar or truth-table spec
    Synth(SynthArgs),
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Synth(args) => cli::synth::cmd_synth(args),
    }
}
