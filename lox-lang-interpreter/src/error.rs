use std::io;

use lox_lang_core::token::Token;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{message}")]
    TypeError { operator: Token, message: String },
    #[error("Undefined variable '{}'.", .name.lexeme)]
    UndefinedVariable { name: Token },
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl RuntimeError {
    pub fn operand_not_number(operator: &Token) -> Self {
        RuntimeError::TypeError {
            message: format!("Operand of '{}' must be a number.", operator.lexeme),
            operator: operator.clone(),
        }
    }

    pub fn operands_not_numbers(operator: &Token) -> Self {
        RuntimeError::TypeError {
            message: format!("Operands of '{}' must be numbers.", operator.lexeme),
            operator: operator.clone(),
        }
    }

    pub fn operands_not_matching(operator: &Token) -> Self {
        RuntimeError::TypeError {
            message: format!(
                "Operands of '{}' must be two numbers or two strings.",
                operator.lexeme
            ),
            operator: operator.clone(),
        }
    }

    pub fn unknown_operator(operator: &Token) -> Self {
        RuntimeError::TypeError {
            message: format!("Unknown operator '{}'.", operator.lexeme),
            operator: operator.clone(),
        }
    }

    pub fn undefined_variable(name: &Token) -> Self {
        RuntimeError::UndefinedVariable { name: name.clone() }
    }

    /// Source line of the offending token; output failures have none.
    pub fn line(&self) -> Option<usize> {
        match self {
            RuntimeError::TypeError { operator, .. } => Some(operator.line),
            RuntimeError::UndefinedVariable { name } => Some(name.line),
            RuntimeError::Output(_) => None,
        }
    }

    /// The message followed by the line it happened on, as shown to the user.
    pub fn report(&self) -> String {
        match self.line() {
            Some(line) => format!("{}\n[line {}]", self, line),
            None => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lox_lang_core::token::TokenKind;

    #[test]
    fn test_report() {
        let minus = Token::new(TokenKind::Minus, "-", 3);
        let name = Token::new(TokenKind::Identifier, "count", 7);

        let tests = vec![
            (
                RuntimeError::operand_not_number(&minus),
                "Operand of '-' must be a number.\n[line 3]",
            ),
            (
                RuntimeError::operands_not_matching(&Token::new(TokenKind::Plus, "+", 1)),
                "Operands of '+' must be two numbers or two strings.\n[line 1]",
            ),
            (
                RuntimeError::undefined_variable(&name),
                "Undefined variable 'count'.\n[line 7]",
            ),
        ];

        for (error, expected) in tests {
            assert_eq!(error.report(), expected);
        }
    }
}
