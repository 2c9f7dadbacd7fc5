use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use num_bigint::BigUint;

use crate::error::Error;
use crate::parser::tokenizer::{Token, Tokenizer};
use crate::parser::Parser;

mod symbols;
pub use symbols::SymbolTable;

/// Binary operators of the language, loosest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Xor,
    Or,
    And,
}

impl Operator {
    pub fn apply(self, lhs: BigUint, rhs: BigUint) -> BigUint {
        match self {
            Self::Xor => lhs ^ rhs,
            Self::Or => lhs | rhs,
            Self::And => lhs & rhs,
        }
    }
}

/// What the parser does with each construct it recognizes.
///
/// The grammar calls these hooks as it descends, so values are produced on the
/// fly while the token stream is consumed. [`Evaluator`] computes bitmasks; an
/// implementation that builds a tree instead plugs in the same way.
pub trait Semantics {
    type Value;

    fn number(&mut self, token: &Token) -> Result<Self::Value, Error>;
    fn variable(&mut self, token: &Token) -> Result<Self::Value, Error>;
    fn apply(&mut self, op: Operator, lhs: Self::Value, rhs: Self::Value) -> Self::Value;
    fn assign(&mut self, target: &Token, value: Self::Value) -> Result<(), Error>;
    fn print(&mut self, value: Self::Value) -> Result<(), Error>;
}

/// How `print` renders a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Decimal,
    Binary,
}

impl OutputFormat {
    pub fn render(self, value: &BigUint) -> String {
        match self {
            Self::Decimal => value.to_string(),
            Self::Binary => value.to_str_radix(2),
        }
    }
}

pub struct Evaluator<W> {
    symbols: SymbolTable,
    output: W,
    format: OutputFormat,
}

impl<W: Write> Evaluator<W> {
    pub fn new(output: W, format: OutputFormat) -> Self {
        Self {
            symbols: SymbolTable::new(),
            output,
            format,
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn into_symbols(self) -> SymbolTable {
        self.symbols
    }
}

impl<W: Write> Semantics for Evaluator<W> {
    type Value = BigUint;

    // Literals have no width limit; a lexeme that is not base 2 never comes
    // out of the tokenizer, but is still reported as a scanner failure.
    fn number(&mut self, token: &Token) -> Result<BigUint, Error> {
        BigUint::parse_bytes(token.lexeme.as_bytes(), 2).ok_or_else(|| Error::Lex {
            found: token.lexeme.chars().next().unwrap_or('\0'),
            location: token.span.start,
        })
    }

    fn variable(&mut self, token: &Token) -> Result<BigUint, Error> {
        self.symbols.get(&token.lexeme, token.span.start)
    }

    fn apply(&mut self, op: Operator, lhs: BigUint, rhs: BigUint) -> BigUint {
        op.apply(lhs, rhs)
    }

    fn assign(&mut self, target: &Token, value: BigUint) -> Result<(), Error> {
        log::trace!("{} = {}", target.lexeme, value);
        self.symbols.set(target.lexeme.as_str(), value);
        Ok(())
    }

    fn print(&mut self, value: BigUint) -> Result<(), Error> {
        writeln!(self.output, "{}", self.format.render(&value))?;
        Ok(())
    }
}

/// Runs a whole program read from `input`, printing to `output`.
///
/// Lines printed before a failure stay printed. On success the final
/// variable bindings are returned.
pub fn evaluate<R, W>(input: R, output: W, format: OutputFormat) -> Result<SymbolTable, Error>
where
    R: BufRead,
    W: Write,
{
    let evaluator = Evaluator::new(output, format);
    let parser = Parser::new(Tokenizer::new(input), evaluator)?;
    let evaluator = parser.parse()?;
    log::debug!("program finished with {} variable(s)", evaluator.symbols().len());
    Ok(evaluator.into_symbols())
}

pub fn evaluate_file<P, W>(path: P, output: W, format: OutputFormat) -> Result<SymbolTable, Error>
where
    P: AsRef<Path>,
    W: Write,
{
    let path = path.as_ref();
    log::debug!("reading program from {}", path.display());
    let file = File::open(path)?;
    evaluate(BufReader::new(file), output, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::locations::Span;
    use crate::parser::tokenizer::TokenType;

    fn number(lexeme: &str) -> Token {
        Token {
            typ: TokenType::NUMBER,
            lexeme: lexeme.to_string(),
            span: Span::new(1, 0, lexeme.len()),
        }
    }

    fn big(value: u32) -> BigUint {
        BigUint::from(value)
    }

    #[test]
    fn operators_are_bitwise() {
        assert_eq!(Operator::And.apply(big(0b1100), big(0b1010)), big(0b1000));
        assert_eq!(Operator::Or.apply(big(0b1100), big(0b1010)), big(0b1110));
        assert_eq!(Operator::Xor.apply(big(0b1100), big(0b1010)), big(0b0110));
    }

    #[test]
    fn render_formats() {
        assert_eq!(OutputFormat::Decimal.render(&big(5)), "5");
        assert_eq!(OutputFormat::Binary.render(&big(5)), "101");
        assert_eq!(OutputFormat::Binary.render(&big(0)), "0");
    }

    #[test]
    fn literals_wider_than_a_machine_word() {
        let mut out = Vec::new();
        let mut evaluator = Evaluator::new(&mut out, OutputFormat::Decimal);
        let wide = evaluator.number(&number(&"1".repeat(129))).unwrap();
        assert_eq!(wide, (BigUint::from(1u32) << 129u32) - 1u32);
        assert_eq!(wide.bits(), 129);
        let padded = format!("{}1", "0".repeat(200));
        assert_eq!(evaluator.number(&number(&padded)).unwrap(), big(1));
        let high_bit = format!("1{}", "0".repeat(300));
        let masked = Operator::And.apply(evaluator.number(&number(&high_bit)).unwrap(), big(1));
        assert_eq!(masked, big(0));
    }

    #[test]
    fn print_writes_one_line() {
        let mut out = Vec::new();
        let mut evaluator = Evaluator::new(&mut out, OutputFormat::Binary);
        evaluator.print(big(6)).unwrap();
        evaluator.print(big(1)).unwrap();
        drop(evaluator);
        assert_eq!(String::from_utf8(out).unwrap(), "110\n1\n");
    }
}
