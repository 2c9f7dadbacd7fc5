// # GRAMMAR
// # =======
// #
// # program: stmt*
// # stmt:    NAME '=' expr | 'print' expr
// # expr:    term ('xor' term)*
// # term:    factor ('or' factor)*
// # factor:  atom ('and' atom)*
// # atom:    '(' expr ')' | NAME | NUMBER
// #
// # One token of lookahead decides every production; nothing is ever
// # backtracked. Each rule hands its value to the `Semantics` it was built with
// # as soon as the rule is recognized.

use std::io::BufRead;

use super::locations::Span;
use super::tokenizer::{Token, TokenType as TT, Tokenizer};
use crate::error::{Error, Expected};
use crate::interpreter::{Operator, Semantics};

const FIRST_PROGRAM: &[TT] = &[TT::NAME, TT::PRINT, TT::ENDMARKER];
const FIRST_STMT: &[TT] = &[TT::NAME, TT::PRINT];
const FIRST_EXPR: &[TT] = &[TT::LPAR, TT::NAME, TT::NUMBER];
const FOLLOW_EXPR: &[TT] = &[TT::RPAR, TT::NAME, TT::PRINT, TT::ENDMARKER];
const FOLLOW_TERM: &[TT] = &[TT::XOR, TT::RPAR, TT::NAME, TT::PRINT, TT::ENDMARKER];
const FOLLOW_FACTOR: &[TT] = &[
    TT::OR,
    TT::XOR,
    TT::RPAR,
    TT::NAME,
    TT::PRINT,
    TT::ENDMARKER,
];

pub struct Parser<R, S> {
    tokenizer: Tokenizer<R>,
    lookahead: Token,
    previous: Span,
    semantics: S,
}

impl<R: BufRead, S: Semantics> Parser<R, S> {
    /// Primes the lookahead with the first token of the input.
    pub fn new(mut tokenizer: Tokenizer<R>, semantics: S) -> Result<Self, Error> {
        let lookahead = tokenizer.next_token()?;
        Ok(Self {
            tokenizer,
            previous: Span::empty(lookahead.span.start),
            lookahead,
            semantics,
        })
    }

    /// Runs the program to the end and returns the semantics it drove.
    pub fn parse(mut self) -> Result<S, Error> {
        self.program()?;
        Ok(self.semantics)
    }

    fn match_(&mut self, expected: TT) -> Result<Token, Error> {
        if self.lookahead.typ != expected {
            return Err(Error::Unexpected {
                found: self.lookahead.typ,
                expected,
                location: self.lookahead.span.start,
            });
        }
        let next = self.tokenizer.next_token()?;
        let token = std::mem::replace(&mut self.lookahead, next);
        self.previous = token.span;
        Ok(token)
    }

    fn syntax_error(&self, rule: &'static str, expected: &'static [TT]) -> Error {
        Error::Syntax {
            rule,
            found: self.lookahead.typ,
            expected: Expected(expected),
            location: self.lookahead.span.start,
        }
    }

    fn expect_one_of(&self, rule: &'static str, types: &'static [TT]) -> Result<(), Error> {
        if types.contains(&self.lookahead.typ) {
            Ok(())
        } else {
            Err(self.syntax_error(rule, types))
        }
    }

    fn log_statement(&self, kind: &str, start: Span) {
        let span = start.till(&self.previous);
        log::debug!("{kind} from {} to {}", span.start, span.end);
    }

    // program: stmt*
    fn program(&mut self) -> Result<(), Error> {
        loop {
            match self.lookahead.typ {
                TT::NAME | TT::PRINT => self.stmt()?,
                TT::ENDMARKER => return Ok(()),
                _ => return Err(self.syntax_error("program", FIRST_PROGRAM)),
            }
        }
    }

    // stmt: NAME '=' expr | 'print' expr
    fn stmt(&mut self) -> Result<(), Error> {
        let start = self.lookahead.span;
        match self.lookahead.typ {
            TT::NAME => {
                let target = self.match_(TT::NAME)?;
                self.match_(TT::EQUAL)?;
                let value = self.expr()?;
                self.log_statement("assignment", start);
                self.semantics.assign(&target, value)
            }
            TT::PRINT => {
                self.match_(TT::PRINT)?;
                let value = self.expr()?;
                self.log_statement("print", start);
                self.semantics.print(value)
            }
            _ => Err(self.syntax_error("stmt", FIRST_STMT)),
        }
    }

    // expr: term ('xor' term)*
    fn expr(&mut self) -> Result<S::Value, Error> {
        self.expect_one_of("expr", FIRST_EXPR)?;
        let mut lhs = self.term()?;
        while self.lookahead.typ == TT::XOR {
            self.match_(TT::XOR)?;
            let rhs = self.term()?;
            lhs = self.semantics.apply(Operator::Xor, lhs, rhs);
        }
        // Unreachable in practice: factor already checked a wider FOLLOW set.
        self.expect_one_of("expr", FOLLOW_EXPR)?;
        Ok(lhs)
    }

    // term: factor ('or' factor)*
    fn term(&mut self) -> Result<S::Value, Error> {
        self.expect_one_of("term", FIRST_EXPR)?;
        let mut lhs = self.factor()?;
        while self.lookahead.typ == TT::OR {
            self.match_(TT::OR)?;
            let rhs = self.factor()?;
            lhs = self.semantics.apply(Operator::Or, lhs, rhs);
        }
        // Same as in expr, factor has already rejected anything outside this.
        self.expect_one_of("term", FOLLOW_TERM)?;
        Ok(lhs)
    }

    // factor: atom ('and' atom)*
    fn factor(&mut self) -> Result<S::Value, Error> {
        self.expect_one_of("factor", FIRST_EXPR)?;
        let mut lhs = self.atom()?;
        while self.lookahead.typ == TT::AND {
            self.match_(TT::AND)?;
            let rhs = self.atom()?;
            lhs = self.semantics.apply(Operator::And, lhs, rhs);
        }
        self.expect_one_of("factor", FOLLOW_FACTOR)?;
        Ok(lhs)
    }

    // atom: '(' expr ')' | NAME | NUMBER
    fn atom(&mut self) -> Result<S::Value, Error> {
        match self.lookahead.typ {
            TT::LPAR => {
                self.match_(TT::LPAR)?;
                let value = self.expr()?;
                self.match_(TT::RPAR)?;
                Ok(value)
            }
            TT::NAME => {
                let name = self.match_(TT::NAME)?;
                self.semantics.variable(&name)
            }
            TT::NUMBER => {
                let number = self.match_(TT::NUMBER)?;
                self.semantics.number(&number)
            }
            _ => Err(self.syntax_error("atom", FIRST_EXPR)),
        }
    }
}
