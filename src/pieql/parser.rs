// PieQL Parser
use std::fmt;

use thiserror::Error;

use super::ast::{Field, SelectStatement};
use super::lexer::{Scanner, Token};

/// What the parser was looking for when it hit an unexpected token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Select,
    Field,
    From,
    TableName,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Select => write!(f, "SELECT"),
            Expected::Field => write!(f, "field"),
            Expected::From => write!(f, "FROM"),
            Expected::TableName => write!(f, "table name"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("found {found:?}, expected {expected}")]
pub struct ParseError {
    pub found: String,
    pub expected: Expected,
}

/// Recursive-descent parser for `SELECT <fields> FROM <table>`.
pub struct Parser {
    scanner: Scanner,
    /// A token handed back with [`Parser::unscan`], returned by the next scan.
    buffered: Option<(Token, String)>,
}

impl Parser {
    pub fn new(query: &str) -> Self {
        Parser {
            scanner: Scanner::new(query),
            buffered: None,
        }
    }

    /// Parses one statement. Anything after the table name is not read.
    pub fn parse(&mut self) -> Result<SelectStatement, ParseError> {
        let fields = self.parse_fields()?;
        let source = self.parse_source()?;

        Ok(SelectStatement { fields, source })
    }

    fn parse_fields(&mut self) -> Result<Vec<Field>, ParseError> {
        self.expect(Token::Select, Expected::Select)?;

        let mut fields = Vec::new();
        loop {
            match self.scan_ignore_whitespace() {
                (Token::Identifier | Token::Star, lit) => fields.push(Field::new(lit)),
                (_, found) => {
                    return Err(ParseError {
                        found,
                        expected: Expected::Field,
                    })
                }
            }

            let (token, lit) = self.scan_ignore_whitespace();
            if token != Token::Comma {
                self.unscan(token, lit);
                break;
            }
        }

        Ok(fields)
    }

    fn parse_source(&mut self) -> Result<String, ParseError> {
        self.expect(Token::From, Expected::From)?;
        self.expect(Token::Identifier, Expected::TableName)
    }

    fn expect(&mut self, token: Token, expected: Expected) -> Result<String, ParseError> {
        let (found_token, lit) = self.scan_ignore_whitespace();
        if found_token == token {
            Ok(lit)
        } else {
            Err(ParseError {
                found: lit,
                expected,
            })
        }
    }

    fn scan(&mut self) -> (Token, String) {
        match self.buffered.take() {
            Some(buffered) => buffered,
            None => self.scanner.scan(),
        }
    }

    fn unscan(&mut self, token: Token, lit: String) {
        self.buffered = Some((token, lit));
    }

    // The scanner folds a whitespace run into one token, so one skip is enough
    fn scan_ignore_whitespace(&mut self) -> (Token, String) {
        let (token, lit) = self.scan();
        if token == Token::Whitespace {
            return self.scan();
        }
        (token, lit)
    }
}

/// Parses a single PieQL statement.
pub fn parse(query: &str) -> Result<SelectStatement, ParseError> {
    Parser::new(query).parse()
}
