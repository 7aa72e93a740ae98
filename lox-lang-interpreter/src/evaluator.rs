use std::io::Write;

use log::{debug, trace};
use lox_lang_core::ast::{Expression, Statement};
use lox_lang_core::token::{Token, TokenKind};

use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::value::Value;

/// How a statement finished. Anything but `Normal` unwinds the enclosing
/// blocks until a loop (for `Break`/`Continue`) or the top level takes it.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Flow {
    Normal,
    Break,
    Continue,
    Exit,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Completion {
    Finished,
    Exited,
}

pub fn interpret(
    statements: &[Statement],
    environment: &mut Environment,
    output: &mut dyn Write,
) -> Result<Completion, RuntimeError> {
    for statement in statements {
        match execute(statement, environment, output)? {
            Flow::Exit => {
                debug!("exit requested");
                return Ok(Completion::Exited);
            }
            Flow::Normal | Flow::Break | Flow::Continue => {}
        }
    }
    Ok(Completion::Finished)
}

/// Evaluates a lone expression and renders its value.
pub fn interpret_expression(
    expression: &Expression,
    environment: &mut Environment,
) -> Result<String, RuntimeError> {
    evaluate(expression, environment).map(|value| value.to_string())
}

fn execute(
    statement: &Statement,
    environment: &mut Environment,
    output: &mut dyn Write,
) -> Result<Flow, RuntimeError> {
    match statement {
        Statement::Expression(expression) => {
            evaluate(expression, environment)?;
        }
        Statement::Print(expression) => {
            let value = evaluate(expression, environment)?;
            writeln!(output, "{}", value)?;
        }
        Statement::Var { name, initializer } => {
            let value = evaluate(initializer, environment)?;
            environment.define(name.lexeme.clone(), value);
        }
        Statement::Block(statements) => {
            return execute_block(statements, &mut environment.enter_scope(), output)
        }
        Statement::If {
            condition,
            then_branch,
            else_branch,
        } => {
            if evaluate(condition, environment)?.is_truthy() {
                return execute(then_branch, environment, output);
            } else if let Some(else_branch) = else_branch {
                return execute(else_branch, environment, output);
            }
        }
        Statement::While {
            condition,
            body,
            is_genuine_while,
        } => return execute_while(condition, body, *is_genuine_while, environment, output),
        Statement::Switch {
            subject,
            cases,
            default,
        } => {
            let subject = evaluate(subject, environment)?;
            for case in cases {
                if evaluate(&case.condition, environment)? == subject {
                    return execute(&case.body, environment, output);
                }
            }
            if let Some(default) = default {
                return execute(default, environment, output);
            }
        }
        Statement::Break => return Ok(Flow::Break),
        Statement::Continue => return Ok(Flow::Continue),
        Statement::Exit => return Ok(Flow::Exit),
    }
    Ok(Flow::Normal)
}

fn execute_block(
    statements: &[Statement],
    environment: &mut Environment,
    output: &mut dyn Write,
) -> Result<Flow, RuntimeError> {
    for statement in statements {
        match execute(statement, environment, output)? {
            Flow::Normal => {}
            flow => return Ok(flow),
        }
    }
    Ok(Flow::Normal)
}

fn execute_while(
    condition: &Expression,
    body: &Statement,
    is_genuine_while: bool,
    environment: &mut Environment,
    output: &mut dyn Write,
) -> Result<Flow, RuntimeError> {
    while evaluate(condition, environment)?.is_truthy() {
        match execute(body, environment, output)? {
            Flow::Normal => {}
            Flow::Break => {
                trace!("break");
                break;
            }
            Flow::Continue => {
                trace!("continue");
                if !is_genuine_while {
                    run_increment(body, environment, output)?;
                }
            }
            Flow::Exit => return Ok(Flow::Exit),
        }
    }
    Ok(Flow::Normal)
}

/// A loop desugared from `for` keeps its increment as the second statement
/// of the body block. A `continue` skipped it, so it runs here.
fn run_increment(
    body: &Statement,
    environment: &mut Environment,
    output: &mut dyn Write,
) -> Result<(), RuntimeError> {
    if let Statement::Block(statements) = body {
        if let [_, increment] = statements.as_slice() {
            execute(increment, environment, output)?;
        }
    }
    Ok(())
}

fn evaluate(expression: &Expression, environment: &mut Environment) -> Result<Value, RuntimeError> {
    match expression {
        Expression::Literal(literal) => Ok(Value::from(literal)),
        Expression::Grouping(inner) => evaluate(inner, environment),
        Expression::Unary { operator, operand } => {
            let operand = evaluate(operand, environment)?;
            eval_unary_operation(operator, operand)
        }
        Expression::Binary {
            left,
            operator,
            right,
        } => {
            let left = evaluate(left, environment)?;
            let right = evaluate(right, environment)?;
            eval_binary_operation(operator, left, right)
        }
        Expression::Logical {
            left,
            operator,
            right,
        } => {
            let left = evaluate(left, environment)?;
            let short_circuits = match operator.kind {
                TokenKind::Or => left.is_truthy(),
                _ => !left.is_truthy(),
            };
            if short_circuits {
                Ok(left)
            } else {
                evaluate(right, environment)
            }
        }
        Expression::Ternary {
            condition,
            if_true,
            if_false,
        } => {
            if evaluate(condition, environment)?.is_truthy() {
                evaluate(if_true, environment)
            } else {
                evaluate(if_false, environment)
            }
        }
        Expression::Variable(name) => environment.get(name),
        Expression::Assign { name, value } => {
            let value = evaluate(value, environment)?;
            environment.assign(name, value.clone())?;
            Ok(value)
        }
    }
}

fn eval_unary_operation(operator: &Token, operand: Value) -> Result<Value, RuntimeError> {
    match (operator.kind, operand) {
        (TokenKind::Bang, operand) => Ok(Value::Boolean(!operand.is_truthy())),
        (TokenKind::Minus, Value::Number(value)) => Ok(Value::Number(-value)),
        (TokenKind::Minus, _) => Err(RuntimeError::operand_not_number(operator)),
        _ => Err(RuntimeError::unknown_operator(operator)),
    }
}

fn compare<T: PartialOrd + ?Sized>(kind: TokenKind, left: &T, right: &T) -> bool {
    match kind {
        TokenKind::Greater => left > right,
        TokenKind::GreaterEqual => left >= right,
        TokenKind::Less => left < right,
        _ => left <= right,
    }
}

fn eval_binary_operation(
    operator: &Token,
    left: Value,
    right: Value,
) -> Result<Value, RuntimeError> {
    use TokenKind::*;
    match (operator.kind, &left, &right) {
        (EqualEqual, _, _) => Ok(Value::Boolean(left == right)),
        (BangEqual, _, _) => Ok(Value::Boolean(left != right)),
        (Plus, Value::Number(left), Value::Number(right)) => Ok(Value::Number(left + right)),
        (Plus, Value::String(left), Value::String(right)) => {
            Ok(Value::String(format!("{}{}", left, right).into()))
        }
        (Minus, Value::Number(left), Value::Number(right)) => Ok(Value::Number(left - right)),
        (Star, Value::Number(left), Value::Number(right)) => Ok(Value::Number(left * right)),
        (Slash, Value::Number(left), Value::Number(right)) => Ok(Value::Number(left / right)),
        (Greater | GreaterEqual | Less | LessEqual, Value::Number(left), Value::Number(right)) => {
            Ok(Value::Boolean(compare(operator.kind, left, right)))
        }
        (Greater | GreaterEqual | Less | LessEqual, Value::String(left), Value::String(right)) => {
            Ok(Value::Boolean(compare(operator.kind, left.as_ref(), right.as_ref())))
        }
        (Plus | Greater | GreaterEqual | Less | LessEqual, _, _) => {
            Err(RuntimeError::operands_not_matching(operator))
        }
        (Minus | Star | Slash, _, _) => Err(RuntimeError::operands_not_numbers(operator)),
        _ => Err(RuntimeError::unknown_operator(operator)),
    }
}
