pub mod error;
pub mod expressions;
pub mod statements;

use log::trace;

use crate::ast::{Expression, Program};
use crate::diagnostics::Diagnostics;
use crate::token::{Token, TokenKind};
pub use error::{Expected, ParseError};
use statements::declaration;

/// Result of parsing a line typed at the prompt.
#[derive(Debug, PartialEq)]
pub enum Parsed {
    Program(Program),
    Expression(Expression),
}

pub struct Parser {
    pub iter: std::iter::Peekable<std::vec::IntoIter<Token>>,
    errors: Vec<ParseError>,
    loop_depth: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::Eof) {
            let line = tokens.last().map(|token| token.line).unwrap_or(1);
            tokens.push(Token::eof(line));
        }
        let iter = tokens.into_iter().peekable();
        Self {
            iter,
            errors: Vec::new(),
            loop_depth: 0,
        }
    }

    pub(crate) fn peek_kind(&mut self) -> TokenKind {
        self.iter
            .peek()
            .map(|token| token.kind)
            .unwrap_or(TokenKind::Eof)
    }

    pub(crate) fn current_token(&mut self) -> Token {
        self.iter.peek().cloned().unwrap_or_else(|| Token::eof(0))
    }

    pub(crate) fn check(&mut self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn is_at_end(&mut self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// Consumes the current token. The trailing EOF is never consumed.
    pub(crate) fn advance(&mut self) -> Option<Token> {
        self.iter.next_if(|token| token.kind != TokenKind::Eof)
    }

    pub(crate) fn match_any(&mut self, kinds: &[TokenKind]) -> Option<Token> {
        self.iter.next_if(|token| kinds.contains(&token.kind))
    }

    pub(crate) fn expect_token(
        &mut self,
        kind: TokenKind,
        context: &'static str,
    ) -> Result<Token, ParseError> {
        match self.match_any(&[kind]) {
            Some(token) => Ok(token),
            None => Err(ParseError::unexpected_token(
                kind,
                context,
                self.current_token(),
            )),
        }
    }

    pub(crate) fn record(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    /// Discards the current token, then everything up to a statement
    /// boundary: just past a `;`, or right before a statement keyword.
    pub(crate) fn synchronize(&mut self) {
        let mut previous = self.advance();

        while !self.is_at_end() {
            if matches!(previous, Some(Token { kind: TokenKind::SemiColon, .. })) {
                return;
            }

            match self.peek_kind() {
                TokenKind::Class
                | TokenKind::Fun
                | TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Switch
                | TokenKind::Return => return,
                _ => {}
            }

            previous = self.advance();
        }
    }

    fn report(&mut self, diagnostics: &mut Diagnostics) {
        for error in self.errors.drain(..) {
            diagnostics.error_at(error.token(), error.to_string());
        }
    }

    /// Parses a whole program. Every syntax error is reported to
    /// `diagnostics`; the statements that did parse are still returned.
    pub fn parse(mut self, diagnostics: &mut Diagnostics) -> Program {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if let Some(statement) = declaration(&mut self) {
                statements.push(statement);
            }
        }
        self.report(diagnostics);

        let program = Program { statements };
        trace!("parsed program:\n{}", program);
        program
    }

    /// Like `parse`, but input consisting of exactly one expression with no
    /// trailing `;` comes back as that bare expression.
    pub fn parse_interactive(self, diagnostics: &mut Diagnostics) -> Parsed {
        let mut probe = Parser {
            iter: self.iter.clone(),
            errors: Vec::new(),
            loop_depth: 0,
        };
        if let Ok(expression) = expressions::expression(&mut probe) {
            if probe.errors.is_empty() && probe.is_at_end() {
                trace!("parsed bare expression: {}", expression);
                return Parsed::Expression(expression);
            }
        }

        Parsed::Program(self.parse(diagnostics))
    }
}
