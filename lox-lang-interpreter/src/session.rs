use std::io::Write;

use log::debug;
use lox_lang_core::ast::Program;
use lox_lang_core::diagnostics::{Diagnostic, Diagnostics};
use lox_lang_core::lexer::Tokenizer;
use lox_lang_core::parser::{Parsed, Parser};
use lox_lang_core::token::Token;

use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::evaluator::{interpret, interpret_expression, Completion};

#[derive(Debug)]
pub enum Outcome {
    Completed,
    Exited,
    /// Lexical or syntax errors were reported; nothing was evaluated.
    StaticErrors,
    RuntimeError(RuntimeError),
}

/// Runs source text against one global environment that persists across
/// runs, writing program output to `output`.
pub struct Session<W: Write> {
    environment: Environment,
    diagnostics: Diagnostics,
    output: W,
}

impl<W: Write> Session<W> {
    pub fn new(output: W) -> Self {
        Self {
            environment: Environment::new(),
            diagnostics: Diagnostics::new(),
            output,
        }
    }

    /// Diagnostics reported by the latest run.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.drain()
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn scan(&mut self, source: &str) -> Vec<Token> {
        self.diagnostics.drain();
        Tokenizer::new(source).scan_tokens(&mut self.diagnostics)
    }

    pub fn parse(&mut self, source: &str) -> Program {
        let tokens = self.scan(source);
        Parser::new(tokens).parse(&mut self.diagnostics)
    }

    pub fn parse_interactive(&mut self, source: &str) -> Parsed {
        let tokens = self.scan(source);
        Parser::new(tokens).parse_interactive(&mut self.diagnostics)
    }

    /// Runs a whole program.
    pub fn run(&mut self, source: &str) -> Outcome {
        let program = self.parse(source);
        if self.diagnostics.had_error() {
            debug!("skipping evaluation: {} diagnostics", self.diagnostics.len());
            return Outcome::StaticErrors;
        }

        self.execute(&program)
    }

    /// Runs one line typed at the prompt. A bare expression has its value
    /// written to the output.
    pub fn run_interactive(&mut self, source: &str) -> Outcome {
        let parsed = self.parse_interactive(source);
        if self.diagnostics.had_error() {
            return Outcome::StaticErrors;
        }

        match parsed {
            Parsed::Program(program) => self.execute(&program),
            Parsed::Expression(expression) => {
                let rendered = match interpret_expression(&expression, &mut self.environment) {
                    Ok(rendered) => rendered,
                    Err(error) => return Outcome::RuntimeError(error),
                };
                match writeln!(self.output, "{}", rendered) {
                    Ok(()) => Outcome::Completed,
                    Err(error) => Outcome::RuntimeError(error.into()),
                }
            }
        }
    }

    fn execute(&mut self, program: &Program) -> Outcome {
        match interpret(&program.statements, &mut self.environment, &mut self.output) {
            Ok(Completion::Finished) => Outcome::Completed,
            Ok(Completion::Exited) => Outcome::Exited,
            Err(error) => {
                debug!("runtime error: {}", error);
                Outcome::RuntimeError(error)
            }
        }
    }
}
