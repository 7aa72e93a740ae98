mod reader;

use std::io;

use log::debug;
use lox_lang_interpreter::session::{Outcome, Session};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::runner;
use crate::Emit;
use reader::{ReadOutput, Reader};

pub fn start(emit: Emit) -> Result<(), ReadlineError> {
    let mut reader = Reader::new(DefaultEditor::new()?);
    let mut session = Session::new(io::stdout());

    loop {
        let line = match reader.read() {
            ReadOutput::Exit => break,
            ReadOutput::Clear => continue,
            ReadOutput::Line(line) => line,
        };

        if emit != Emit::Run {
            runner::show(&mut session, &line, emit, true);
            continue;
        }

        let outcome = session.run_interactive(&line);
        runner::report_diagnostics(&mut session);
        runner::flush(&mut session);
        match outcome {
            Outcome::Completed | Outcome::StaticErrors => {}
            Outcome::Exited => {
                debug!("session ended by exit");
                break;
            }
            Outcome::RuntimeError(error) => eprintln!("{}", error.report()),
        }
    }
    Ok(())
}
