//! Core types shared by most of the program
use colored::Colorize;
use std::{fmt, io, path::PathBuf};

/// A lexical token with the position it started at
///
/// Tokens are produced once by the lexer and only ever read afterwards.
#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub row: usize,
    pub col: usize,
}

/// Every kind of token the lexer can produce
//
// The code generator matches on this exhaustively, so adding a new instruction
// is a compile error until it is handled there as well.
#[derive(Debug, PartialEq, Clone)]
pub enum TokenKind {
    Operator(Operator),
    // Anything that isn't a keyword; a procedure call or an argument reference
    Call(String),
    Int(i64),
    Bool(bool),
    Str(String),
    Keyword(Keyword),
    // `syscall N`, with the literal argument count
    Syscall(u64),
    // `proc name`, followed by `Arg`s and exactly one `ArgsEnd`
    Proc(String),
    // `import some.dotted.path`
    Import(String),
    Arg { ty: ArgType, name: String },
    ArgsEnd,
}

/// Single character binary operators
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Gt,
}

/// Fixed stack instructions
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Keyword {
    Dup,
    Drop,
    Swap,
    Inc,
    Dec,
    Dump,
    Return,
    If,
    End,
    Else,
    While,
    Do,
    Derefc,
    Derefi,
    Buffer,
}

/// Argument type tags of a procedure declaration.
///
/// These are parsed and then ignored; there is no type checking.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ArgType {
    Char,
    Bool,
    Int,
    Ptr,
}

impl Operator {
    pub fn from(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Sub),
            '*' => Some(Self::Mul),
            '/' => Some(Self::Div),
            '=' => Some(Self::Eq),
            '!' => Some(Self::Ne),
            '<' => Some(Self::Lt),
            '>' => Some(Self::Gt),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
            Self::Eq => '=',
            Self::Ne => '!',
            Self::Lt => '<',
            Self::Gt => '>',
        }
    }
}

impl Keyword {
    pub fn from(word: &str) -> Option<Self> {
        match word {
            "dup" => Some(Self::Dup),
            "drop" => Some(Self::Drop),
            "swap" => Some(Self::Swap),
            "inc" => Some(Self::Inc),
            "dec" => Some(Self::Dec),
            "dump" => Some(Self::Dump),
            "return" => Some(Self::Return),
            "if" => Some(Self::If),
            "end" => Some(Self::End),
            "else" => Some(Self::Else),
            "while" => Some(Self::While),
            "do" => Some(Self::Do),
            "derefc" => Some(Self::Derefc),
            "derefi" => Some(Self::Derefi),
            "buffer" => Some(Self::Buffer),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dup => "dup",
            Self::Drop => "drop",
            Self::Swap => "swap",
            Self::Inc => "inc",
            Self::Dec => "dec",
            Self::Dump => "dump",
            Self::Return => "return",
            Self::If => "if",
            Self::End => "end",
            Self::Else => "else",
            Self::While => "while",
            Self::Do => "do",
            Self::Derefc => "derefc",
            Self::Derefi => "derefi",
            Self::Buffer => "buffer",
        }
    }
}

impl ArgType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Char => "char",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Ptr => "ptr",
        }
    }
}

/// A declared procedure
///
/// Argument order is declaration order, and the position of an argument is
/// what its frame offset is computed from.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Function {
    pub name: String,
    pub args: Vec<String>,
}

impl Function {
    pub fn new<S: Into<String>>(name: S, args: Vec<String>) -> Self {
        Self { name: name.into(), args }
    }

    /// Declared position of an argument
    pub fn index(&self, arg: &str) -> Option<usize> {
        self.args.iter().position(|a| a == arg)
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

/// A position in a source file, used for reporting
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Location {
    pub file: PathBuf,
    pub row: usize,
    pub col: usize,
}

/// A recoverable error found by the lexer
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Diagnostic {
    pub row: usize,
    pub col: usize,
    pub message: String,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Operator(op) => write!(f, "OPERATOR {}", op.symbol()),
            Self::Call(name) => write!(f, "CALL {}", name),
            Self::Int(i) => write!(f, "INT {}", i),
            Self::Bool(b) => write!(f, "BOOL {}", b),
            Self::Str(s) => write!(f, "STRING \"{}\"", s),
            Self::Keyword(k) => write!(f, "KEYWORD {}", k.name()),
            Self::Syscall(n) => write!(f, "SYSCALL {}", n),
            Self::Proc(name) => write!(f, "PROC {}", name),
            Self::Import(path) => write!(f, "IMPORT {}", path),
            Self::Arg { ty, name } => write!(f, "{}_ARG {}", ty.name().to_uppercase(), name),
            Self::ArgsEnd => write!(f, "IN"),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{} {}", self.row, self.col, self.kind)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.row, self.col)
    }
}

/// Control behavior and external interaction of the program.
pub struct Config {
    /// Source file of the program
    pub file: PathBuf,
    /// Name of the generated executable; asm and object files derive from it
    pub output: String,
    /// Value of `XYL_HOME`, the libraries live in `$XYL_HOME/lib`
    pub home: Option<PathBuf>,
    /// Remove the intermediate files after a successful build
    pub clean: bool,
}

impl Config {
    pub fn asm(&self) -> String {
        format!("{}.asm", self.output)
    }

    pub fn object(&self) -> String {
        format!("{}.o", self.output)
    }
}

/// Custom error type for all of xyl
#[derive(Debug)]
pub enum Error {
    // Everything the lexer found wrong with one file
    Lexical { file: PathBuf, diagnostics: Vec<Diagnostic> },
    // Structural errors like unknown symbols and unmatched blocks
    Compilation { at: Option<Location>, message: String },
    // Missing or broken environment
    Config(String),
    // Internal errors are unexpected errors within the compiler
    Internal { message: String, e: Option<io::Error> },
    // The assembler or linker failed
    Toolchain { message: String, output: String },
}

impl Error {
    pub fn at<S: Into<String>>(at: Location, message: S) -> Self {
        Error::Compilation { at: Some(at), message: message.into() }
    }

    /// Human readable message without location or decoration
    pub fn message(&self) -> String {
        match self {
            Self::Lexical { diagnostics, .. } => {
                diagnostics.iter().map(|d| d.message.as_str()).collect::<Vec<_>>().join("\n")
            }
            Self::Compilation { message, .. } => message.clone(),
            Self::Config(message) => message.clone(),
            Self::Internal { message, .. } => message.clone(),
            Self::Toolchain { message, .. } => message.clone(),
        }
    }
}

// Implement std::convert::From for Error; from io::Error
impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Internal { message: String::from(""), e: Some(error) }
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Lexical { file, diagnostics } => {
                writeln!(f, "{}\n", "Failed to tokenize program".red().bold())?;
                for d in diagnostics {
                    writeln!(f, "{}:{}:{}: {}", file.display(), d.row, d.col, d.message)?;
                }
                Ok(())
            }
            Self::Compilation { at, message } => {
                writeln!(f, "{}\n", "Failed to compile program".red().bold())?;
                match at {
                    Some(at) => writeln!(f, "{}: {}", at, message),
                    None => writeln!(f, "{}", message),
                }
            }
            Self::Config(message) => {
                writeln!(f, "{}\n", "Invalid configuration".red().bold())?;
                writeln!(f, "{}", message)
            }
            Self::Internal { message, e } => {
                writeln!(f, "{}\n", "Something went wrong!".red().bold())?;
                writeln!(f, "{}", message)?;
                match e {
                    Some(e) => writeln!(f, "{}", e),
                    None => Ok(()),
                }
            }
            Self::Toolchain { message, output } => {
                writeln!(f, "{}\n", "Failed to build executable".red().bold())?;
                writeln!(f, "{}", message)?;
                writeln!(f, "{}", output)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn function_index() {
        let f = Function::new("add", vec!["a".into(), "b".into()]);
        assert_eq!(f.index("a"), Some(0));
        assert_eq!(f.index("b"), Some(1));
        assert_eq!(f.index("c"), None);
        assert_eq!(f.arity(), 2);
    }

    #[test]
    fn display() {
        assert_eq!(TokenKind::Int(2).to_string(), "INT 2");
        assert_eq!(TokenKind::Operator(Operator::Add).to_string(), "OPERATOR +");
        assert_eq!(TokenKind::Keyword(Keyword::Dump).to_string(), "KEYWORD dump");
        assert_eq!(
            TokenKind::Arg { ty: ArgType::Ptr, name: "p".into() }.to_string(),
            "PTR_ARG p"
        );
    }

    #[test]
    fn keywords() {
        for k in &[Keyword::Dup, Keyword::While, Keyword::Derefi, Keyword::Buffer] {
            assert_eq!(Keyword::from(k.name()), Some(*k));
        }
        assert_eq!(Keyword::from("proc"), None);
    }

    #[test]
    fn config() {
        let c = Config { file: "a.xyl".into(), output: "out/a".into(), home: None, clean: false };
        assert_eq!(c.asm(), "out/a.asm");
        assert_eq!(c.object(), "out/a.o");
    }
}
