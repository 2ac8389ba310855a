use clap::Parser;
use stockscout::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
