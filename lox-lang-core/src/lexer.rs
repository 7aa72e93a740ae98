use log::trace;
use thiserror::Error;

use crate::diagnostics::Diagnostics;
use crate::token::{keyword, Literal, Token, TokenKind};

#[derive(Debug, PartialEq, Clone, Error)]
pub enum LexError {
    #[error("Unexpected character.")]
    UnexpectedCharacter { character: char, line: usize },
    #[error("Unterminated string.")]
    UnterminatedString { line: usize },
}

impl LexError {
    pub fn line(&self) -> usize {
        match self {
            LexError::UnexpectedCharacter { line, .. }
            | LexError::UnterminatedString { line } => *line,
        }
    }
}

#[derive(Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    iter: std::iter::Peekable<std::str::CharIndices<'a>>,
    line: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        let iter = input.char_indices().peekable();
        Self {
            input,
            iter,
            line: 1,
        }
    }

    /// Scans the whole input. Lexical errors go to `diagnostics` and the
    /// offending input is skipped; the result always ends with one EOF token.
    pub fn scan_tokens(mut self, diagnostics: &mut Diagnostics) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(result) = self.next() {
            match result {
                Ok(token) => tokens.push(token),
                Err(error) => diagnostics.error(error.line(), error.to_string()),
            }
        }
        tokens.push(Token::eof(self.line));
        trace!("scanned {} tokens", tokens.len());
        tokens
    }

    fn is_letter(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    fn next_idx(&mut self) -> usize {
        self.iter
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }

    fn token(&mut self, kind: TokenKind, start: usize) -> Token {
        let end = self.next_idx();
        Token::new(kind, &self.input[start..end], self.line)
    }

    /// One character of lookahead for the two-character operators.
    fn either(
        &mut self,
        second: char,
        matched: TokenKind,
        single: TokenKind,
        start: usize,
    ) -> Token {
        if self.iter.next_if(|(_, ch)| *ch == second).is_some() {
            self.token(matched, start)
        } else {
            self.token(single, start)
        }
    }

    fn skip_line_comment(&mut self) {
        while self.iter.next_if(|(_, ch)| *ch != '\n').is_some() {}
    }

    fn read_identifier(&mut self, start: usize) -> Token {
        while self
            .iter
            .next_if(|(_, ch)| Self::is_letter(*ch) || ch.is_ascii_digit())
            .is_some()
        {}

        let end = self.next_idx();
        let ident = &self.input[start..end];
        let kind = keyword(ident).unwrap_or(TokenKind::Identifier);
        Token::new(kind, ident, self.line)
    }

    fn read_number(&mut self, start: usize) -> Token {
        while self.iter.next_if(|(_, ch)| ch.is_ascii_digit()).is_some() {}

        let mut ahead = self.iter.clone();
        let fraction_follows = matches!(ahead.next(), Some((_, '.')))
            && matches!(ahead.peek(), Some((_, ch)) if ch.is_ascii_digit());
        if fraction_follows {
            self.iter.next();
            while self.iter.next_if(|(_, ch)| ch.is_ascii_digit()).is_some() {}
        }

        let end = self.next_idx();
        let lexeme = &self.input[start..end];
        // `digits[.digits]` always parses.
        let value = lexeme.parse::<f64>().unwrap_or_default();

        Token::new(TokenKind::Number, lexeme, self.line).with_literal(Literal::Number(value))
    }

    fn read_string(&mut self, start: usize) -> Result<Token, LexError> {
        let mut value = String::new();
        loop {
            match self.iter.next() {
                Some((_, '"')) => break,
                Some((_, '\\')) => match self.iter.next_if(|(_, ch)| *ch == '"' || *ch == '\\') {
                    Some((_, escaped)) => value.push(escaped),
                    None => value.push('\\'),
                },
                Some((_, ch)) => {
                    if ch == '\n' {
                        self.line += 1;
                    }
                    value.push(ch);
                }
                None => return Err(LexError::UnterminatedString { line: self.line }),
            }
        }

        let token = self.token(TokenKind::String, start);
        Ok(token.with_literal(Literal::String(value.into())))
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (idx, ch) = self.iter.next()?;
            let tok = match ch {
                ' ' | '\r' | '\t' => continue,
                '\n' => {
                    self.line += 1;
                    continue;
                }
                '/' => {
                    if self.iter.next_if(|(_, ch)| *ch == '/').is_some() {
                        self.skip_line_comment();
                        continue;
                    }
                    self.token(TokenKind::Slash, idx)
                }
                '(' => self.token(TokenKind::LeftParen, idx),
                ')' => self.token(TokenKind::RightParen, idx),
                '{' => self.token(TokenKind::LeftBrace, idx),
                '}' => self.token(TokenKind::RightBrace, idx),
                ',' => self.token(TokenKind::Comma, idx),
                '.' => self.token(TokenKind::Dot, idx),
                '-' => self.token(TokenKind::Minus, idx),
                '+' => self.token(TokenKind::Plus, idx),
                ';' => self.token(TokenKind::SemiColon, idx),
                '*' => self.token(TokenKind::Star, idx),
                '?' => self.token(TokenKind::Question, idx),
                ':' => self.token(TokenKind::Colon, idx),
                '!' => self.either('=', TokenKind::BangEqual, TokenKind::Bang, idx),
                '=' => self.either('=', TokenKind::EqualEqual, TokenKind::Equal, idx),
                '<' => self.either('=', TokenKind::LessEqual, TokenKind::Less, idx),
                '>' => self.either('=', TokenKind::GreaterEqual, TokenKind::Greater, idx),
                '"' => return Some(self.read_string(idx)),
                c if c.is_ascii_digit() => self.read_number(idx),
                c if Tokenizer::is_letter(c) => self.read_identifier(idx),
                _ => {
                    return Some(Err(LexError::UnexpectedCharacter {
                        character: ch,
                        line: self.line,
                    }))
                }
            };
            return Some(Ok(tok));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut diagnostics = Diagnostics::new();
        let tokens = Tokenizer::new(input).scan_tokens(&mut diagnostics);
        assert!(!diagnostics.had_error(), "{:?}", diagnostics);
        tokens.into_iter().map(|token| token.kind).collect()
    }

    #[test]
    fn test_punctuation() {
        let input = "(){},.-+;*/?:";

        assert_eq!(
            kinds(input),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::Comma,
                TokenKind::Dot,
                TokenKind::Minus,
                TokenKind::Plus,
                TokenKind::SemiColon,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Question,
                TokenKind::Colon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_two_character_operators() {
        let input = "! != = == < <= > >= !!=";

        assert_eq!(
            kinds(input),
            vec![
                TokenKind::Bang,
                TokenKind::BangEqual,
                TokenKind::Equal,
                TokenKind::EqualEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Bang,
                TokenKind::BangEqual,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let input = "var five_5 = nil; while (true) { break; continue; } switch case default exit orchid";

        assert_eq!(
            kinds(input),
            vec![
                TokenKind::Var,
                TokenKind::Identifier,
                TokenKind::Equal,
                TokenKind::Nil,
                TokenKind::SemiColon,
                TokenKind::While,
                TokenKind::LeftParen,
                TokenKind::True,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::Break,
                TokenKind::SemiColon,
                TokenKind::Continue,
                TokenKind::SemiColon,
                TokenKind::RightBrace,
                TokenKind::Switch,
                TokenKind::Case,
                TokenKind::Default,
                TokenKind::Exit,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let mut diagnostics = Diagnostics::new();
        let tokens = Tokenizer::new("12 3.25 7. .5").scan_tokens(&mut diagnostics);

        let summary = tokens
            .iter()
            .map(|token| (token.kind, token.lexeme.as_ref(), token.literal.clone()))
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            vec![
                (TokenKind::Number, "12", Some(Literal::Number(12.0))),
                (TokenKind::Number, "3.25", Some(Literal::Number(3.25))),
                (TokenKind::Number, "7", Some(Literal::Number(7.0))),
                (TokenKind::Dot, ".", None),
                (TokenKind::Dot, ".", None),
                (TokenKind::Number, "5", Some(Literal::Number(5.0))),
                (TokenKind::Eof, "", None),
            ]
        );
    }

    #[test]
    fn test_strings_and_lines() {
        let mut diagnostics = Diagnostics::new();
        let tokens = Tokenizer::new("// leading comment\n\"one\ntwo\" x\n\"say \\\"hi\\\"\"")
            .scan_tokens(&mut diagnostics);

        assert!(!diagnostics.had_error());
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].literal, Some(Literal::String("one\ntwo".into())));
        assert_eq!(tokens[0].lexeme.as_ref(), "\"one\ntwo\"");
        assert_eq!(tokens[1].line, 3);
        assert_eq!(tokens[2].literal, Some(Literal::String("say \"hi\"".into())));
        assert_eq!(tokens[3], Token::eof(4));
    }

    #[test]
    fn test_errors_are_reported_and_skipped() {
        let mut diagnostics = Diagnostics::new();
        let tokens = Tokenizer::new("1 @ 2\n# \"open").scan_tokens(&mut diagnostics);

        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![TokenKind::Number, TokenKind::Number, TokenKind::Eof]
        );
        let rendered = diagnostics
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            rendered,
            vec![
                "[line 1] Error: Unexpected character.",
                "[line 2] Error: Unexpected character.",
                "[line 2] Error: Unterminated string.",
            ]
        );
    }
}
