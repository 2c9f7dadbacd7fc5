//! The error type shared by the tokenizer, the parser and the evaluator.
//!
//! Every failure is fatal: it is raised where it is detected and travels up the
//! recursive descent unchanged until the caller of [`crate::evaluate`] sees it.

use std::fmt;

use thiserror::Error;

use crate::parser::locations::Location;
use crate::parser::tokenizer::TokenType;

#[derive(Debug, Error)]
pub enum Error {
    /// The current character does not start any token. `found` only shows up
    /// in `Debug` output and logs.
    #[error("Scanner Error: at {location}")]
    Lex { found: char, location: Location },

    /// `match_` saw a different token than the one the rule requires.
    #[error("Parser Error: found {found} instead of {expected} at {location}")]
    Unexpected {
        found: TokenType,
        expected: TokenType,
        location: Location,
    },

    /// The lookahead is outside the FIRST or FOLLOW set of a rule.
    #[error("Parser Error: in {rule}: {expected} expected, found {found} at {location}")]
    Syntax {
        rule: &'static str,
        found: TokenType,
        expected: Expected,
        location: Location,
    },

    #[error("Runtime Error: undefined variable '{name}' at {location}")]
    UndefinedVariable { name: String, location: Location },

    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Where the failure was detected, if it came from the source text.
    #[must_use]
    pub fn location(&self) -> Option<Location> {
        match self {
            Self::Lex { location, .. }
            | Self::Unexpected { location, .. }
            | Self::Syntax { location, .. }
            | Self::UndefinedVariable { location, .. } => Some(*location),
            Self::Io(_) => None,
        }
    }

    #[must_use]
    pub fn is_syntax_error(&self) -> bool {
        matches!(self, Self::Unexpected { .. } | Self::Syntax { .. })
    }
}

/// The token types a rule would have accepted, rendered as `a, b or c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expected(pub &'static [TokenType]);

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types = self.0;
        for (i, typ) in types.iter().enumerate() {
            if i > 0 {
                let sep = if i + 1 == types.len() { " or " } else { ", " };
                f.write_str(sep)?;
            }
            write!(f, "{typ}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_lists_alternatives() {
        let expected = Expected(&[TokenType::LPAR, TokenType::NAME, TokenType::NUMBER]);
        assert_eq!(
            expected.to_string(),
            "\"(\", identifier or binary literal"
        );
        assert_eq!(Expected(&[TokenType::XOR]).to_string(), "\"xor\"");
    }

    #[test]
    fn scanner_error_message() {
        let err = Error::Lex {
            found: '2',
            location: Location::new(2, 4),
        };
        assert_eq!(
            err.to_string(),
            "Scanner Error: at line 2 char 5"
        );
        assert_eq!(err.location(), Some(Location::new(2, 4)));
        assert!(!err.is_syntax_error());
    }
}
