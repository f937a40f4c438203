pub mod ast;
pub mod cmdline;
pub mod environment;
pub mod evaluator;
pub mod interpreter;
pub mod lexer;
pub mod macro_expansion;
pub mod parser;
pub mod printer;
pub mod token;

#[macro_use]
extern crate lazy_static;

mod builtins;
mod types;

pub use types::Object;
