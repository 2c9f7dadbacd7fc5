mod error;
pub use error::{Error, Expected};

mod parser;
pub use parser::locations::{Locatable, Location, Span};
pub use parser::tokenizer::{tokenize, Token, TokenType, Tokenizer};
pub use parser::{tokenize_file, tokenize_string, Parser};

mod interpreter;
pub use interpreter::{
    evaluate, evaluate_file, Evaluator, Operator, OutputFormat, Semantics, SymbolTable,
};
