pub mod environment;
pub mod error;
pub mod evaluator;
pub mod session;
pub mod value;
