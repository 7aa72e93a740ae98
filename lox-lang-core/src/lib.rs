pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod rpn;
pub mod token;
