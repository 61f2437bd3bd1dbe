// PieQL Lexer
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    // Special
    Illegal,
    Eof,
    Whitespace,

    // Delimiters
    Comma,

    // Literals
    Identifier,

    // Operators
    Star,

    // Keywords
    Select,
    From,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Illegal => write!(f, "ILLEGAL"),
            Token::Eof => write!(f, "EOF"),
            Token::Whitespace => write!(f, "WS"),
            Token::Comma => write!(f, ","),
            Token::Identifier => write!(f, "IDENT"),
            Token::Star => write!(f, "*"),
            Token::Select => write!(f, "SELECT"),
            Token::From => write!(f, "FROM"),
        }
    }
}

/// Splits query text into tokens, one call to [`Scanner::scan`] at a time.
///
/// The scanner never fails: anything it does not recognise comes back as
/// [`Token::Illegal`] carrying the offending character.
pub struct Scanner {
    input: Vec<char>,
    position: usize,
}

impl Scanner {
    pub fn new(input: &str) -> Self {
        Scanner {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    /// Returns the next token and the literal text it was read from.
    pub fn scan(&mut self) -> (Token, String) {
        let ch = match self.current_char() {
            None => return (Token::Eof, String::new()),
            Some(ch) => ch,
        };

        if is_whitespace(ch) {
            return self.scan_whitespace();
        }
        if ch.is_ascii_alphabetic() {
            return self.scan_identifier();
        }

        self.advance();
        match ch {
            '*' => (Token::Star, ch.to_string()),
            ',' => (Token::Comma, ch.to_string()),
            _ => (Token::Illegal, ch.to_string()),
        }
    }

    fn scan_whitespace(&mut self) -> (Token, String) {
        let mut ws = String::new();

        while let Some(ch) = self.current_char() {
            if !is_whitespace(ch) {
                break;
            }
            ws.push(ch);
            self.advance();
        }

        (Token::Whitespace, ws)
    }

    fn scan_identifier(&mut self) -> (Token, String) {
        let mut ident = String::new();

        while let Some(ch) = self.current_char() {
            if !(ch.is_ascii_alphanumeric() || ch == '_') {
                break;
            }
            ident.push(ch);
            self.advance();
        }

        // Keywords are matched case-insensitively, the literal keeps its case
        let token = match ident.to_ascii_uppercase().as_str() {
            "SELECT" => Token::Select,
            "FROM" => Token::From,
            _ => Token::Identifier,
        };
        (token, ident)
    }

    /// Scans the whole input, including the trailing `Eof`.
    pub fn tokenize(&mut self) -> Vec<(Token, String)> {
        let mut tokens = Vec::new();

        loop {
            let (token, lit) = self.scan();
            tokens.push((token, lit));
            if token == Token::Eof {
                break;
            }
        }

        tokens
    }
}

// NUL is an ordinary character here and scans as ILLEGAL, never as EOF
fn is_whitespace(ch: char) -> bool {
    ch == ' ' || ch == '\t' || ch == '\n'
}
