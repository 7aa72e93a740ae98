use std::fmt::Display;
use std::rc::Rc;

use log::debug;

use crate::token::{Token, TokenKind};

#[derive(Debug, PartialEq, Clone)]
pub enum Location {
    Unknown,
    End,
    Lexeme(Rc<str>),
}

impl Location {
    pub fn of(token: &Token) -> Self {
        if token.kind == TokenKind::Eof {
            Location::End
        } else {
            Location::Lexeme(token.lexeme.clone())
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Diagnostic {
    pub line: usize,
    pub location: Location,
    pub message: String,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {}] Error", self.line)?;
        match &self.location {
            Location::Unknown => {}
            Location::End => write!(f, " at end")?,
            Location::Lexeme(lexeme) => write!(f, " at '{}'", lexeme)?,
        }
        write!(f, ": {}", self.message)
    }
}

/// Lexical and syntax errors gathered during one run. The driver inspects
/// `had_error` to decide whether evaluation may proceed.
#[derive(Debug, Default)]
pub struct Diagnostics {
    reports: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, line: usize, message: impl Into<String>) {
        self.report(Diagnostic {
            line,
            location: Location::Unknown,
            message: message.into(),
        });
    }

    pub fn error_at(&mut self, token: &Token, message: impl Into<String>) {
        self.report(Diagnostic {
            line: token.line,
            location: Location::of(token),
            message: message.into(),
        });
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        debug!("recorded diagnostic: {}", diagnostic);
        self.reports.push(diagnostic);
    }

    pub fn had_error(&self) -> bool {
        !self.reports.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.reports.iter()
    }

    /// Hands back every report, leaving the error flag cleared.
    pub fn drain(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_format() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.error(4, "Unexpected character.");
        diagnostics.error_at(&Token::eof(7), "Expect expression.");
        diagnostics.error_at(
            &Token::new(TokenKind::RightParen, ")", 2),
            "Expect ';' after value.",
        );

        let rendered = diagnostics
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            rendered,
            vec![
                "[line 4] Error: Unexpected character.",
                "[line 7] Error at end: Expect expression.",
                "[line 2] Error at ')': Expect ';' after value.",
            ]
        );
    }

    #[test]
    fn test_drain_resets_flag() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.error(1, "Unterminated string.");
        assert!(diagnostics.had_error());

        assert_eq!(diagnostics.drain().len(), 1);
        assert!(!diagnostics.had_error());
    }
}
