use super::locations::{Locatable, Location, Span};
use crate::error::Error;
use const_format::concatcp;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub typ: TokenType,
    pub lexeme: String,
    pub span: Span,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}('{}')", self.typ, self.lexeme)
    }
}

impl Locatable for Token {
    fn span(&self) -> Span {
        self.span
    }
}

#[allow(non_camel_case_types)]
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenType {
    LPAR,
    RPAR,
    EQUAL,
    PRINT,
    AND,
    OR,
    XOR,
    NAME,
    NUMBER,
    ENDMARKER,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let repr = match self {
            Self::LPAR => "\"(\"",
            Self::RPAR => "\")\"",
            Self::EQUAL => "\"=\"",
            Self::PRINT => "\"print\"",
            Self::AND => "\"and\"",
            Self::OR => "\"or\"",
            Self::XOR => "\"xor\"",
            Self::NAME => "identifier",
            Self::NUMBER => "binary literal",
            Self::ENDMARKER => "end of input",
        };
        f.write_str(repr)
    }
}

const LPAR: (&str, TokenType) = ("(", TokenType::LPAR);
const RPAR: (&str, TokenType) = (")", TokenType::RPAR);
const EQUAL: (&str, TokenType) = ("=", TokenType::EQUAL);

const SIMPLE_TOKENS: [(&str, TokenType); 3] = [LPAR, RPAR, EQUAL];

const KEYWORDS: [(&str, TokenType); 4] = [
    ("print", TokenType::PRINT),
    ("and", TokenType::AND),
    ("or", TokenType::OR),
    ("xor", TokenType::XOR),
];

const S_WHITESPACE: &str = r"[ \t\n]+";
const S_NAME: &str = r"[A-Za-z][A-Za-z0-9]*";
// Any digit run; digits outside {0,1} are rejected after the match.
const S_DIGITS: &str = r"[0-9]+";

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(concatcp!("^", S_WHITESPACE)).expect("Error compiling regex."));
static NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(concatcp!("^", S_NAME)).expect("Error compiling regex."));
static DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(concatcp!("^", S_DIGITS)).expect("Error compiling regex."));

/// Pull-based scanner over a line-oriented source.
///
/// The source is read forward only, one line at a time. Once the input is
/// exhausted every call to [`Tokenizer::next_token`] yields `ENDMARKER`.
pub struct Tokenizer<R> {
    lines: io::Lines<R>,
    line: String,
    lineno: usize,
    start: usize,
    last_end: Location,
    exhausted: bool,
}

impl<R: BufRead> Tokenizer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: String::new(),
            lineno: 0,
            start: 0,
            last_end: Location::origin(),
            exhausted: false,
        }
    }

    pub fn next_token(&mut self) -> Result<Token, Error> {
        loop {
            if self.start >= self.line.len() {
                if self.next_line()? {
                    continue;
                }
                return Ok(self.end_marker());
            }
            if let Some(m) = WHITESPACE.find(&self.line[self.start..]) {
                self.start += m.end();
                continue;
            }
            let token = self.scan()?;
            log::trace!("{} at {}", token, token.span.start);
            return Ok(token);
        }
    }

    /// Current read position, for diagnostics.
    pub fn location(&self) -> Location {
        if self.lineno == 0 {
            Location::origin()
        } else {
            Location::new(self.lineno, self.start)
        }
    }

    fn next_line(&mut self) -> Result<bool, Error> {
        if self.exhausted {
            return Ok(false);
        }
        match self.lines.next() {
            Some(line) => {
                self.line = line?;
                self.lineno += 1;
                self.start = 0;
                Ok(true)
            }
            None => {
                self.exhausted = true;
                self.line.clear();
                self.start = 0;
                Ok(false)
            }
        }
    }

    fn scan(&mut self) -> Result<Token, Error> {
        let rest = &self.line[self.start..];
        let (typ, len) = if let Some((lexeme, typ)) = SIMPLE_TOKENS
            .iter()
            .find(|(lexeme, _)| rest.starts_with(lexeme))
        {
            (*typ, lexeme.len())
        } else if let Some(m) = NAME.find(rest) {
            (keyword_or_name(m.as_str()), m.end())
        } else if let Some(m) = DIGITS.find(rest) {
            if let Some(bad) = m.as_str().find(|c: char| c != '0' && c != '1') {
                return Err(self.lex_error(self.start + bad));
            }
            (TokenType::NUMBER, m.end())
        } else {
            return Err(self.lex_error(self.start));
        };
        let lexeme = rest[..len].to_string();
        let span = Span::new(self.lineno, self.start, self.start + len);
        self.start += len;
        self.last_end = span.end;
        Ok(Token { typ, lexeme, span })
    }

    fn lex_error(&self, column: usize) -> Error {
        let found = self.line[column..].chars().next().unwrap_or('\0');
        let location = Location::new(self.lineno, column);
        log::debug!("unexpected character {found:?} at {location}");
        Error::Lex { found, location }
    }

    // Sits right after the last real token, so a missing operand is reported
    // where it was expected rather than on some trailing blank line.
    fn end_marker(&self) -> Token {
        Token {
            typ: TokenType::ENDMARKER,
            lexeme: String::new(),
            span: Span::empty(self.last_end),
        }
    }
}

fn keyword_or_name(lexeme: &str) -> TokenType {
    KEYWORDS
        .iter()
        .find(|(keyword, _)| *keyword == lexeme)
        .map_or(TokenType::NAME, |(_, typ)| *typ)
}

/// Scans a whole source up to and including `ENDMARKER`.
pub fn tokenize<R: BufRead>(reader: R) -> Result<Vec<Token>, Error> {
    let mut tokenizer = Tokenizer::new(reader);
    let mut tokens = vec![];
    loop {
        let token = tokenizer.next_token()?;
        let done = token.typ == TokenType::ENDMARKER;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

pub fn tokenize_string(input: &str) -> Result<Vec<Token>, Error> {
    tokenize(input.as_bytes())
}

pub fn tokenize_file<P>(path: P) -> Result<Vec<Token>, Error>
where
    P: AsRef<Path>,
{
    let file = File::open(path)?;
    tokenize(io::BufReader::new(file))
}
