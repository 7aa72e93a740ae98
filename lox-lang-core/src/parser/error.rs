use std::fmt::Display;

use thiserror::Error;

use crate::token::{Token, TokenKind};

#[derive(Debug, PartialEq, Clone, Error)]
pub enum ParseError {
    #[error("Expect {expected}.")]
    UnexpectedToken { expected: Expected, got: Token },
    #[error("Invalid assignment target.")]
    InvalidAssignmentTarget(Token),
    #[error("A switch can only have one 'default' branch.")]
    DuplicateDefault(Token),
    #[error("Expect 'case' or 'default' in switch body.")]
    UnexpectedSwitchBranch(Token),
    #[error("Can't use '{}' outside of a loop.", .0.lexeme)]
    OutsideLoop(Token),
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expected {
    Expression,
    VariableName,
    Token {
        kind: TokenKind,
        context: &'static str,
    },
}

impl Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Expression => write!(f, "expression"),
            Expected::VariableName => write!(f, "variable name"),
            Expected::Token { kind, context } => write!(f, "{} {}", kind, context),
        }
    }
}

impl ParseError {
    pub fn unexpected_token(kind: TokenKind, context: &'static str, got: Token) -> Self {
        ParseError::UnexpectedToken {
            expected: Expected::Token { kind, context },
            got,
        }
    }

    pub fn unexpected_other(expected: Expected, got: Token) -> Self {
        ParseError::UnexpectedToken { expected, got }
    }

    /// The token the error is reported at.
    pub fn token(&self) -> &Token {
        match self {
            ParseError::UnexpectedToken { got, .. } => got,
            ParseError::InvalidAssignmentTarget(token)
            | ParseError::DuplicateDefault(token)
            | ParseError::UnexpectedSwitchBranch(token)
            | ParseError::OutsideLoop(token) => token,
        }
    }
}
