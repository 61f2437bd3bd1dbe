// PieQL query language
// Scanner, parser, AST and the executor that runs a parsed SELECT against a Database

pub mod ast;
pub mod executor;
pub mod lexer;
pub mod parser;

pub use ast::*;
pub use executor::*;
pub use lexer::*;
pub use parser::*;
