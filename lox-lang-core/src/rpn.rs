//! Reverse Polish rendering of expressions.

use std::fmt::Display;

use crate::ast::{Expression, Program, Statement};
use crate::token::{Literal, TokenKind};

pub struct Rpn<'a>(pub &'a Expression);

impl Display for Rpn<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Expression::Literal(Literal::String(value)) => write!(f, "\"{}\"", value),
            Expression::Literal(value) => write!(f, "{}", value),
            Expression::Grouping(inner) => write!(f, "{}", Rpn(inner)),
            Expression::Unary { operator, operand } => {
                let name = match operator.kind {
                    TokenKind::Bang => "not",
                    TokenKind::Minus => "neg",
                    _ => operator.lexeme.as_ref(),
                };
                write!(f, "{} {}", Rpn(operand), name)
            }
            Expression::Binary {
                left,
                operator,
                right,
            }
            | Expression::Logical {
                left,
                operator,
                right,
            } => write!(f, "{} {} {}", Rpn(left), Rpn(right), operator.lexeme),
            Expression::Ternary {
                condition,
                if_true,
                if_false,
            } => write!(
                f,
                "{} {} {} ?:",
                Rpn(condition),
                Rpn(if_true),
                Rpn(if_false)
            ),
            Expression::Variable(name) => write!(f, "{}", name.lexeme),
            Expression::Assign { name, value } => write!(f, "{} {} =", Rpn(value), name.lexeme),
        }
    }
}

/// One line per expression found in the program, in source order.
pub fn program_to_rpn(program: &Program) -> Vec<String> {
    let mut lines = Vec::new();
    for statement in &program.statements {
        collect_statement(statement, &mut lines);
    }
    lines
}

fn collect_statement(statement: &Statement, lines: &mut Vec<String>) {
    match statement {
        Statement::Expression(expression) | Statement::Print(expression) => {
            lines.push(Rpn(expression).to_string())
        }
        Statement::Var { initializer, .. } => lines.push(Rpn(initializer).to_string()),
        Statement::Block(statements) => {
            for statement in statements {
                collect_statement(statement, lines);
            }
        }
        Statement::If {
            condition,
            then_branch,
            else_branch,
        } => {
            lines.push(Rpn(condition).to_string());
            collect_statement(then_branch, lines);
            if let Some(else_branch) = else_branch {
                collect_statement(else_branch, lines);
            }
        }
        Statement::While {
            condition, body, ..
        } => {
            lines.push(Rpn(condition).to_string());
            collect_statement(body, lines);
        }
        Statement::Switch {
            subject,
            cases,
            default,
        } => {
            lines.push(Rpn(subject).to_string());
            for case in cases {
                lines.push(Rpn(&case.condition).to_string());
                collect_statement(&case.body, lines);
            }
            if let Some(default) = default {
                collect_statement(default, lines);
            }
        }
        Statement::Break | Statement::Continue | Statement::Exit => {}
    }
}
