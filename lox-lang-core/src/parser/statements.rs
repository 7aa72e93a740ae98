use super::error::{Expected, ParseError};
use super::expressions::expression;
use super::Parser;
use crate::ast::{Expression, Statement, SwitchCase};
use crate::token::{Literal, TokenKind};

/// Parses one declaration, recording the error and resynchronizing on
/// failure so the caller can keep going.
pub fn declaration(parser: &mut Parser) -> Option<Statement> {
    let result = if parser.match_any(&[TokenKind::Var]).is_some() {
        var_declaration(parser)
    } else {
        statement(parser)
    };

    match result {
        Ok(statement) => Some(statement),
        Err(error) => {
            parser.record(error);
            parser.synchronize();
            None
        }
    }
}

fn var_declaration(parser: &mut Parser) -> Result<Statement, ParseError> {
    let Some(name) = parser.match_any(&[TokenKind::Identifier]) else {
        return Err(ParseError::unexpected_other(
            Expected::VariableName,
            parser.current_token(),
        ));
    };

    let initializer = if parser.match_any(&[TokenKind::Equal]).is_some() {
        expression(parser)?
    } else {
        Expression::nil()
    };
    parser.expect_token(TokenKind::SemiColon, "after variable declaration")?;

    Ok(Statement::Var { name, initializer })
}

pub fn statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    match parser.peek_kind() {
        TokenKind::For => for_statement(parser),
        TokenKind::If => if_statement(parser),
        TokenKind::Print => print_statement(parser),
        TokenKind::While => while_statement(parser),
        TokenKind::LeftBrace => Ok(Statement::Block(block(parser)?)),
        TokenKind::Exit => exit_statement(parser),
        TokenKind::Break | TokenKind::Continue => loop_control_statement(parser),
        TokenKind::Switch => switch_statement(parser),
        _ => expression_statement(parser),
    }
}

fn block(parser: &mut Parser) -> Result<Vec<Statement>, ParseError> {
    parser.expect_token(TokenKind::LeftBrace, "before block")?;

    let mut statements = Vec::new();
    while !parser.check(TokenKind::RightBrace) && !parser.is_at_end() {
        if let Some(statement) = declaration(parser) {
            statements.push(statement);
        }
    }
    parser.expect_token(TokenKind::RightBrace, "after block")?;

    Ok(statements)
}

fn loop_body(parser: &mut Parser) -> Result<Statement, ParseError> {
    parser.loop_depth += 1;
    let body = statement(parser);
    parser.loop_depth -= 1;
    body
}

fn for_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    parser.advance();
    parser.expect_token(TokenKind::LeftParen, "after 'for'")?;

    let initializer = if parser.match_any(&[TokenKind::SemiColon]).is_some() {
        None
    } else if parser.match_any(&[TokenKind::Var]).is_some() {
        Some(var_declaration(parser)?)
    } else {
        Some(expression_statement(parser)?)
    };

    let condition = if parser.check(TokenKind::SemiColon) {
        None
    } else {
        Some(expression(parser)?)
    };
    parser.expect_token(TokenKind::SemiColon, "after loop condition")?;

    let increment = if parser.check(TokenKind::RightParen) {
        None
    } else {
        Some(expression(parser)?)
    };
    parser.expect_token(TokenKind::RightParen, "after for clauses")?;

    let body = loop_body(parser)?;

    // The increment, when present, is always the second statement of the
    // loop body; a continue relies on finding it there.
    let body = match increment {
        Some(increment) => Statement::Block(vec![body, Statement::Expression(increment)]),
        None => Statement::Block(vec![body]),
    };
    let condition = condition.unwrap_or(Expression::Literal(Literal::Boolean(true)));
    let while_loop = Statement::While {
        condition,
        body: Box::new(body),
        is_genuine_while: false,
    };

    Ok(match initializer {
        Some(initializer) => Statement::Block(vec![initializer, while_loop]),
        None => while_loop,
    })
}

fn if_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    parser.advance();
    parser.expect_token(TokenKind::LeftParen, "after 'if'")?;
    let condition = expression(parser)?;
    parser.expect_token(TokenKind::RightParen, "after if condition")?;

    let then_branch = Box::new(statement(parser)?);
    let else_branch = if parser.match_any(&[TokenKind::Else]).is_some() {
        Some(Box::new(statement(parser)?))
    } else {
        None
    };

    Ok(Statement::If {
        condition,
        then_branch,
        else_branch,
    })
}

fn print_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    parser.advance();
    let value = expression(parser)?;
    parser.expect_token(TokenKind::SemiColon, "after value")?;

    Ok(Statement::Print(value))
}

fn while_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    parser.advance();
    parser.expect_token(TokenKind::LeftParen, "after 'while'")?;
    let condition = expression(parser)?;
    parser.expect_token(TokenKind::RightParen, "after condition")?;
    let body = loop_body(parser)?;

    Ok(Statement::While {
        condition,
        body: Box::new(body),
        is_genuine_while: true,
    })
}

fn exit_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    parser.advance();
    parser.expect_token(TokenKind::SemiColon, "after 'exit'")?;

    Ok(Statement::Exit)
}

fn loop_control_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    let keyword = parser.current_token();
    parser.advance();
    if parser.loop_depth == 0 {
        parser.record(ParseError::OutsideLoop(keyword.clone()));
    }

    if keyword.kind == TokenKind::Break {
        parser.expect_token(TokenKind::SemiColon, "after 'break'")?;
        Ok(Statement::Break)
    } else {
        parser.expect_token(TokenKind::SemiColon, "after 'continue'")?;
        Ok(Statement::Continue)
    }
}

fn ends_switch_branch(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Case | TokenKind::Default | TokenKind::RightBrace | TokenKind::Eof
    )
}

/// Statements up to the next branch head, run in their own scope.
fn switch_branch_body(parser: &mut Parser) -> Statement {
    let mut statements = Vec::new();
    while !ends_switch_branch(parser.peek_kind()) {
        if let Some(statement) = declaration(parser) {
            statements.push(statement);
        }
    }
    Statement::Block(statements)
}

fn switch_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    parser.advance();
    parser.expect_token(TokenKind::LeftParen, "after 'switch'")?;
    let subject = expression(parser)?;
    parser.expect_token(TokenKind::RightParen, "after switch subject")?;
    parser.expect_token(TokenKind::LeftBrace, "before switch body")?;

    let mut cases = Vec::new();
    let mut default = None;

    loop {
        match parser.peek_kind() {
            TokenKind::RightBrace | TokenKind::Eof => break,
            TokenKind::Case => {
                parser.advance();
                let condition = expression(parser)?;
                parser.expect_token(TokenKind::Colon, "after case value")?;
                let body = switch_branch_body(parser);
                cases.push(SwitchCase { condition, body });
            }
            TokenKind::Default => {
                let keyword = parser.current_token();
                parser.advance();
                parser.expect_token(TokenKind::Colon, "after 'default'")?;
                let body = switch_branch_body(parser);
                if default.is_some() {
                    parser.record(ParseError::DuplicateDefault(keyword));
                } else {
                    default = Some(Box::new(body));
                }
            }
            _ => {
                let unexpected = parser.current_token();
                parser.record(ParseError::UnexpectedSwitchBranch(unexpected));
                parser.advance();
                while !ends_switch_branch(parser.peek_kind()) {
                    parser.advance();
                }
            }
        }
    }
    parser.expect_token(TokenKind::RightBrace, "after switch body")?;

    Ok(Statement::Switch {
        subject,
        cases,
        default,
    })
}

fn expression_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    let value = expression(parser)?;
    parser.expect_token(TokenKind::SemiColon, "after expression")?;

    Ok(Statement::Expression(value))
}
