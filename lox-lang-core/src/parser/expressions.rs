use super::error::{Expected, ParseError};
use super::Parser;
use crate::ast::Expression;
use crate::token::{Literal, Token, TokenKind};

type Operand = fn(&mut Parser) -> Result<Expression, ParseError>;
type Combine = fn(Box<Expression>, Token, Box<Expression>) -> Expression;

pub fn expression(parser: &mut Parser) -> Result<Expression, ParseError> {
    assignment(parser)
}

fn assignment(parser: &mut Parser) -> Result<Expression, ParseError> {
    let expression = or(parser)?;

    if let Some(equals) = parser.match_any(&[TokenKind::Equal]) {
        let value = assignment(parser)?;
        return match expression {
            Expression::Variable(name) => Ok(Expression::Assign {
                name,
                value: Box::new(value),
            }),
            other => {
                parser.record(ParseError::InvalidAssignmentTarget(equals));
                Ok(other)
            }
        };
    }

    Ok(expression)
}

fn binary(left: Box<Expression>, operator: Token, right: Box<Expression>) -> Expression {
    Expression::Binary {
        left,
        operator,
        right,
    }
}

fn logical(left: Box<Expression>, operator: Token, right: Box<Expression>) -> Expression {
    Expression::Logical {
        left,
        operator,
        right,
    }
}

/// Keeps wrapping the left operand while the next token is one of `operators`.
fn left_associative(
    parser: &mut Parser,
    operators: &[TokenKind],
    operand: Operand,
    combine: Combine,
) -> Result<Expression, ParseError> {
    let mut left = operand(parser)?;

    while let Some(operator) = parser.match_any(operators) {
        let right = operand(parser)?;
        left = combine(Box::new(left), operator, Box::new(right));
    }

    Ok(left)
}

fn or(parser: &mut Parser) -> Result<Expression, ParseError> {
    left_associative(parser, &[TokenKind::Or], and, logical)
}

fn and(parser: &mut Parser) -> Result<Expression, ParseError> {
    left_associative(parser, &[TokenKind::And], ternary, logical)
}

fn ternary(parser: &mut Parser) -> Result<Expression, ParseError> {
    let condition = equality(parser)?;

    if parser.match_any(&[TokenKind::Question]).is_none() {
        return Ok(condition);
    }

    let if_true = ternary(parser)?;
    parser.expect_token(
        TokenKind::Colon,
        "after then branch of conditional expression",
    )?;
    let if_false = ternary(parser)?;

    Ok(Expression::Ternary {
        condition: Box::new(condition),
        if_true: Box::new(if_true),
        if_false: Box::new(if_false),
    })
}

fn equality(parser: &mut Parser) -> Result<Expression, ParseError> {
    left_associative(
        parser,
        &[TokenKind::BangEqual, TokenKind::EqualEqual],
        comparison,
        binary,
    )
}

fn comparison(parser: &mut Parser) -> Result<Expression, ParseError> {
    left_associative(
        parser,
        &[
            TokenKind::Greater,
            TokenKind::GreaterEqual,
            TokenKind::Less,
            TokenKind::LessEqual,
        ],
        term,
        binary,
    )
}

fn term(parser: &mut Parser) -> Result<Expression, ParseError> {
    left_associative(parser, &[TokenKind::Minus, TokenKind::Plus], factor, binary)
}

fn factor(parser: &mut Parser) -> Result<Expression, ParseError> {
    left_associative(parser, &[TokenKind::Slash, TokenKind::Star], unary, binary)
}

fn unary(parser: &mut Parser) -> Result<Expression, ParseError> {
    match parser.match_any(&[TokenKind::Bang, TokenKind::Minus]) {
        Some(operator) => Ok(Expression::Unary {
            operator,
            operand: Box::new(unary(parser)?),
        }),
        None => primary(parser),
    }
}

fn primary(parser: &mut Parser) -> Result<Expression, ParseError> {
    let literal = match parser.peek_kind() {
        TokenKind::False => Some(Literal::Boolean(false)),
        TokenKind::True => Some(Literal::Boolean(true)),
        TokenKind::Nil => Some(Literal::Nil),
        _ => None,
    };
    if let Some(literal) = literal {
        parser.advance();
        return Ok(Expression::Literal(literal));
    }

    if let Some(token) = parser.match_any(&[TokenKind::Number, TokenKind::String]) {
        return Ok(Expression::Literal(token.literal.unwrap_or(Literal::Nil)));
    }

    if let Some(name) = parser.match_any(&[TokenKind::Identifier]) {
        return Ok(Expression::Variable(name));
    }

    if parser.match_any(&[TokenKind::LeftParen]).is_some() {
        let inner = expression(parser)?;
        parser.expect_token(TokenKind::RightParen, "after expression")?;
        return Ok(Expression::Grouping(Box::new(inner)));
    }

    Err(ParseError::unexpected_other(
        Expected::Expression,
        parser.current_token(),
    ))
}
