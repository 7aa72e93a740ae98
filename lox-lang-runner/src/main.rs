mod repl;
mod runner;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use log::debug;

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum Emit {
    /// Evaluate the program
    Run,
    /// Print the scanned tokens
    Tokens,
    /// Print the parsed syntax tree
    Ast,
    /// Print every expression in reverse Polish notation
    Rpn,
}

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short, long, value_enum, default_value_t = Emit::Run)]
    emit: Emit,
    /// Script to run. Starts an interactive session when omitted.
    script: Option<PathBuf>,
}

/// Help and version requests succeed; every other argument error is a
/// usage error.
fn usage_status(error: &clap::Error) -> u8 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => runner::EX_USAGE,
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let code = usage_status(&error);
            if let Err(print_error) = error.print() {
                debug!("could not print usage: {}", print_error);
            }
            return ExitCode::from(code);
        }
    };

    match cli.script {
        None => match repl::start(cli.emit) {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                eprintln!("Could not start the prompt: {}", error);
                ExitCode::from(runner::EX_IOERR)
            }
        },
        Some(path) => runner::execute(&path, cli.emit),
    }
}
