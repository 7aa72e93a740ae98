use std::fmt::Display;

use crate::token::{Literal, Token};

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Literal(Literal),
    Grouping(Box<Expression>),
    Unary {
        operator: Token,
        operand: Box<Expression>,
    },
    Binary {
        left: Box<Expression>,
        operator: Token,
        right: Box<Expression>,
    },
    Logical {
        left: Box<Expression>,
        operator: Token,
        right: Box<Expression>,
    },
    Ternary {
        condition: Box<Expression>,
        if_true: Box<Expression>,
        if_false: Box<Expression>,
    },
    Variable(Token),
    Assign {
        name: Token,
        value: Box<Expression>,
    },
}

#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    Expression(Expression),
    Print(Expression),
    Var {
        name: Token,
        initializer: Expression,
    },
    Block(Vec<Statement>),
    If {
        condition: Expression,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
    },
    /// `is_genuine_while` is false when the loop was desugared from a `for`;
    /// the body is then a block whose second statement is the increment.
    While {
        condition: Expression,
        body: Box<Statement>,
        is_genuine_while: bool,
    },
    Switch {
        subject: Expression,
        cases: Vec<SwitchCase>,
        default: Option<Box<Statement>>,
    },
    Break,
    Continue,
    Exit,
}

#[derive(Debug, PartialEq, Clone)]
pub struct SwitchCase {
    pub condition: Expression,
    pub body: Statement,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Expression {
    pub fn nil() -> Self {
        Expression::Literal(Literal::Nil)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(Literal::String(value)) => write!(f, "\"{}\"", value),
            Self::Literal(value) => write!(f, "{}", value),
            Self::Grouping(inner) => write!(f, "{}", inner),
            Self::Unary { operator, operand } => write!(f, "({}{})", operator.lexeme, operand),
            Self::Binary {
                left,
                operator,
                right,
            }
            | Self::Logical {
                left,
                operator,
                right,
            } => write!(f, "({} {} {})", left, operator.lexeme, right),
            Self::Ternary {
                condition,
                if_true,
                if_false,
            } => write!(f, "({} ? {} : {})", condition, if_true, if_false),
            Self::Variable(name) => write!(f, "{}", name.lexeme),
            Self::Assign { name, value } => write!(f, "({} = {})", name.lexeme, value),
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expression(expression) => write!(f, "{};", expression),
            Self::Print(expression) => write!(f, "print {};", expression),
            Self::Var { name, initializer } => write!(f, "var {} = {};", name.lexeme, initializer),
            Self::Block(statements) => {
                write!(f, "{{")?;
                for statement in statements {
                    write!(f, " {}", statement)?;
                }
                write!(f, " }}")
            }
            Self::If {
                condition,
                then_branch,
                else_branch,
            } => {
                write!(f, "if {} {}", condition, then_branch)?;
                if let Some(else_branch) = else_branch {
                    write!(f, " else {}", else_branch)?;
                }
                Ok(())
            }
            Self::While {
                condition,
                body,
                is_genuine_while,
            } => {
                let keyword = if *is_genuine_while { "while" } else { "for" };
                write!(f, "{} {} {}", keyword, condition, body)
            }
            Self::Switch {
                subject,
                cases,
                default,
            } => {
                write!(f, "switch {} {{", subject)?;
                for case in cases {
                    write!(f, " {}", case)?;
                }
                if let Some(default) = default {
                    write!(f, " default: {}", default)?;
                }
                write!(f, " }}")
            }
            Self::Break => write!(f, "break;"),
            Self::Continue => write!(f, "continue;"),
            Self::Exit => write!(f, "exit;"),
        }
    }
}

impl Display for SwitchCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "case {}: {}", self.condition, self.body)
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for statement in &self.statements {
            writeln!(f, "{}", statement)?;
        }
        Ok(())
    }
}
