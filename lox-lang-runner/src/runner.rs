use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use log::debug;
use lox_lang_core::parser::Parsed;
use lox_lang_core::rpn::{program_to_rpn, Rpn};
use lox_lang_interpreter::session::{Outcome, Session};

use crate::Emit;

pub const EX_USAGE: u8 = 64;
pub const EX_DATAERR: u8 = 65;
pub const EX_NOINPUT: u8 = 66;
pub const EX_SOFTWARE: u8 = 70;
pub const EX_IOERR: u8 = 74;

pub fn execute(path: &Path, emit: Emit) -> ExitCode {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Could not read '{}': {}", path.display(), error);
            return ExitCode::from(EX_NOINPUT);
        }
    };
    debug!("running {} ({} bytes)", path.display(), source.len());

    let mut session = Session::new(io::stdout());
    if emit != Emit::Run {
        let had_error = show(&mut session, &source, emit, false);
        return ExitCode::from(emit_status(had_error));
    }

    let outcome = session.run(&source);
    report_diagnostics(&mut session);
    flush(&mut session);

    if let Outcome::RuntimeError(error) = &outcome {
        eprintln!("{}", error.report());
    }
    ExitCode::from(exit_status(&outcome))
}

/// Process status for a finished batch run.
pub fn exit_status(outcome: &Outcome) -> u8 {
    match outcome {
        Outcome::Completed | Outcome::Exited => 0,
        Outcome::StaticErrors => EX_DATAERR,
        Outcome::RuntimeError(_) => EX_SOFTWARE,
    }
}

pub fn emit_status(had_error: bool) -> u8 {
    if had_error {
        EX_DATAERR
    } else {
        0
    }
}

/// Prints the tokens, syntax tree or RPN form of `source` instead of
/// running it. Returns whether any error was reported.
pub fn show<W: Write>(session: &mut Session<W>, source: &str, emit: Emit, interactive: bool) -> bool {
    match emit {
        Emit::Tokens => {
            for token in session.scan(source) {
                println!("{}", token);
            }
        }
        Emit::Ast | Emit::Rpn | Emit::Run => {
            let parsed = if interactive {
                session.parse_interactive(source)
            } else {
                Parsed::Program(session.parse(source))
            };
            match (emit, parsed) {
                (Emit::Rpn, Parsed::Expression(expression)) => println!("{}", Rpn(&expression)),
                (Emit::Rpn, Parsed::Program(program)) => {
                    for line in program_to_rpn(&program) {
                        println!("{}", line);
                    }
                }
                (_, Parsed::Expression(expression)) => println!("{}", expression),
                (_, Parsed::Program(program)) => print!("{}", program),
            }
        }
    }

    let had_error = session.diagnostics().had_error();
    report_diagnostics(session);
    had_error
}

pub fn report_diagnostics<W: Write>(session: &mut Session<W>) {
    for diagnostic in session.take_diagnostics() {
        eprintln!("{}", diagnostic);
    }
}

pub fn flush<W: Write>(session: &mut Session<W>) {
    if let Err(error) = session.output_mut().flush() {
        debug!("could not flush output: {}", error);
    }
}
