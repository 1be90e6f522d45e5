//! Lexical analysis: turn source text into a flat list of tokens
//!
//! Individual lexemes are small nom parsers over the remaining input, the
//! `Lexer` drives them one token at a time and keeps track of row and column.
//!
//! The lexer never gives up on a file. A malformed construct is recorded as a
//! `Diagnostic` and scanning continues, so that all the lexical errors of a
//! file are reported together.
//!
//! A few keywords consume more than one word:
//!
//! ```txt
//! syscall 3                     SYSCALL 3
//! import std.io                 IMPORT std.io
//! proc add int a int b in       PROC add, INT_ARG a, INT_ARG b, IN
//! ```
use crate::core::{ArgType, Diagnostic, Keyword, Operator, Token, TokenKind};
use nom::{
    branch::alt,
    bytes::complete::{take_till, take_while, take_while1},
    character::complete::{char, digit1, one_of, satisfy},
    combinator::{map_opt, recognize},
    sequence::pair,
    IResult,
};

const OPERATORS: &str = "+-*/=<>!";

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident(c: char) -> bool {
    is_alpha(c) || c.is_ascii_digit()
}

fn is_space(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\n' || c == '\r'
}

/// Whitespace or a comment running to the end of the line
fn blank(i: &str) -> IResult<&str, &str> {
    alt((take_while1(is_space), recognize(pair(char('#'), take_till(|c| c == '\n')))))(i)
}

fn integer(i: &str) -> IResult<&str, &str> {
    digit1(i)
}

fn operator(i: &str) -> IResult<&str, Operator> {
    map_opt(one_of(OPERATORS), Operator::from)(i)
}

fn identifier(i: &str) -> IResult<&str, &str> {
    recognize(pair(satisfy(is_alpha), take_while(is_ident)))(i)
}

fn quote(i: &str) -> IResult<&str, char> {
    char('"')(i)
}

/// Contents of a string literal, up to but excluding the closing quote
fn string_body(i: &str) -> IResult<&str, &str> {
    take_till(|c| c == '"' || c == '\n')(i)
}

/// Dotted library path like `std.io`
fn path(i: &str) -> IResult<&str, &str> {
    take_while(|c| is_alpha(c) || c == '.')(i)
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    row: usize,
    col: usize,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Lexer { src, pos: 0, row: 1, col: 1, tokens: vec![], diagnostics: vec![] }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Move past some consumed text, updating the position
    fn advance(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.row += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        self.pos += text.len();
    }

    /// Run a parser at the current position and consume whatever it matched
    fn eat<O>(&mut self, mut parser: impl FnMut(&'a str) -> IResult<&'a str, O>) -> Option<O> {
        let input = self.rest();
        match parser(input) {
            Ok((rest, out)) => {
                self.advance(&input[..input.len() - rest.len()]);
                Some(out)
            }
            Err(_) => None,
        }
    }

    fn skip(&mut self) {
        while self.eat(blank).is_some() {}
    }

    fn push(&mut self, kind: TokenKind, row: usize, col: usize) {
        self.tokens.push(Token { kind, row, col })
    }

    fn error<S: Into<String>>(&mut self, row: usize, col: usize, message: S) {
        self.diagnostics.push(Diagnostic { row, col, message: message.into() })
    }

    /// Describe the next character for diagnostics
    fn found(&self) -> String {
        match self.peek() {
            Some(c) => format!("`{}`", c),
            None => String::from("end of file"),
        }
    }

    fn run(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        loop {
            self.skip();
            if self.peek().is_none() {
                break;
            }
            self.token();
        }

        (self.tokens, self.diagnostics)
    }

    fn token(&mut self) {
        let (row, col) = (self.row, self.col);

        if let Some(digits) = self.eat(integer) {
            match digits.parse::<i64>() {
                Ok(i) => self.push(TokenKind::Int(i), row, col),
                Err(_) => self.error(row, col, format!("Integer literal out of range : `{}`", digits)),
            }
        } else if let Some(op) = self.eat(operator) {
            self.push(TokenKind::Operator(op), row, col)
        } else if self.eat(quote).is_some() {
            self.string(row, col)
        } else if let Some(word) = self.eat(identifier) {
            self.word(word, row, col)
        } else if let Some(c) = self.peek() {
            self.error(row, col, format!("Unknown character : `{}`", c));
            self.advance(&self.rest()[..c.len_utf8()]);
        }
    }

    fn string(&mut self, row: usize, col: usize) {
        let body = self.eat(string_body).unwrap_or_default();

        match self.peek() {
            Some('"') => self.advance("\""),
            Some('\n') => {
                self.error(row, col, "Unclosed string");
                self.advance("\n");
            }
            _ => self.error(row, col, "Unclosed string"),
        }

        self.push(TokenKind::Str(body.to_string()), row, col)
    }

    fn word(&mut self, word: &str, row: usize, col: usize) {
        match word {
            "true" | "false" => self.push(TokenKind::Bool(word == "true"), row, col),
            "syscall" => self.syscall(row, col),
            "proc" => self.proc(row, col),
            "import" => {
                self.skip();
                let dotted = self.eat(path).unwrap_or_default();
                self.push(TokenKind::Import(dotted.to_string()), row, col)
            }
            _ => match Keyword::from(word) {
                Some(k) => self.push(TokenKind::Keyword(k), row, col),
                None => self.push(TokenKind::Call(word.to_string()), row, col),
            },
        }
    }

    fn syscall(&mut self, row: usize, col: usize) {
        self.skip();

        match self.eat(integer) {
            Some(digits) => match digits.parse::<u64>() {
                Ok(n) => self.push(TokenKind::Syscall(n), row, col),
                Err(_) => self.error(row, col, format!("Invalid number : `{}`", digits)),
            },
            None => {
                let found = self.found();
                self.error(self.row, self.col, format!("Expected integer got : {}", found))
            }
        }
    }

    /// A procedure header: name followed by typed arguments up to `in`
    ///
    /// The argument list is always terminated with an `ArgsEnd` token, even
    /// when it was cut short by an error.
    fn proc(&mut self, row: usize, col: usize) {
        self.skip();

        let name = match self.eat(identifier) {
            Some(name) => name.to_string(),
            None => {
                let found = self.found();
                self.error(self.row, self.col, format!("Expected ident got : {}", found));
                String::new()
            }
        };
        self.push(TokenKind::Proc(name), row, col);

        loop {
            self.skip();
            let (row, col) = (self.row, self.col);
            let arg = self.arg();
            let end = arg == TokenKind::ArgsEnd;
            self.push(arg, row, col);

            if end {
                break;
            }
        }
    }

    fn arg(&mut self) -> TokenKind {
        let (row, col) = (self.row, self.col);

        let ty = match self.eat(identifier) {
            Some("ptr") => ArgType::Ptr,
            Some("int") => ArgType::Int,
            Some("bool") => ArgType::Bool,
            Some("char") => ArgType::Char,
            Some("in") | Some("void") => return TokenKind::ArgsEnd,
            Some(other) => {
                self.error(row, col, format!("Invalid type : `{}`", other));
                return TokenKind::ArgsEnd;
            }
            None => {
                let found = self.found();
                self.error(row, col, format!("Expected type got : {}", found));
                return TokenKind::ArgsEnd;
            }
        };

        self.skip();

        match self.eat(identifier) {
            Some(name) => TokenKind::Arg { ty, name: name.to_string() },
            None => {
                let found = self.found();
                self.error(self.row, self.col, format!("Invalid char : {}", found));
                TokenKind::ArgsEnd
            }
        }
    }
}

/// Lex a whole source file.
///
/// Returns every token that could be recognised along with all diagnostics;
/// the caller decides what to do if there are any.
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    Lexer::new(source).run()
}
