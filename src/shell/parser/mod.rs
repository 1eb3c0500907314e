mod ast;
mod lexer;
#[allow(clippy::module_inception)]
mod parser;

pub use ast::Command;
pub use lexer::tokenize;
pub use parser::{build, ParseError};
