use log::debug;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const PROMPT: &str = "> ";

pub enum ReadOutput {
    Exit,
    Clear,
    Line(String),
}

pub struct Reader {
    rl: DefaultEditor,
}

impl Reader {
    pub fn new(rl: DefaultEditor) -> Self {
        Self { rl }
    }

    pub fn read(&mut self) -> ReadOutput {
        match self.rl.readline(PROMPT) {
            Err(ReadlineError::Interrupted) => ReadOutput::Clear,
            Err(ReadlineError::Eof) => ReadOutput::Exit,
            Err(err) => {
                eprintln!("Error: {}", err);
                ReadOutput::Exit
            }
            Ok(line) => {
                if let Err(err) = self.rl.add_history_entry(line.as_str()) {
                    debug!("could not record history: {}", err);
                }
                ReadOutput::Line(line)
            }
        }
    }
}
