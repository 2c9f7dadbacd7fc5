mod grammar;
pub mod locations;
pub mod tokenizer;

pub use grammar::Parser;
pub use tokenizer::{tokenize_file, tokenize_string};
