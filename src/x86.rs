//! A tiny typed layer over x86-64 AT&T assembly
//!
//! Instructions are plain strings once emitted, but building them through the
//! helpers here keeps operand order and syntax in one place. Helpers take the
//! destination first (like Intel syntax) and print it last (like AT&T).
//!
//! ```txt
//! mov(RAX.into(), 42.into())  =>  mov $42, %rax
//! ```
//!
//! Useful references:
//!
//! - [x86-64 machine-level programming](https://www.cs.cmu.edu/~fp/courses/15213-s07/misc/asm64-handout.pdf)
//! - [Linux system call table](https://blog.rchapman.org/posts/Linux_System_Call_Table_for_x86_64/)
use std::{
    fmt,
    ops::{Add, AddAssign},
};

pub const WORDSIZE: i64 = 8;

/// Bytes between the frame pointer and the last argument pushed by a caller:
/// the saved frame pointer and the return address.
pub const FRAME_BIAS: i64 = 2 * WORDSIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    RAX,
    RBX,
    RCX,
    RDX,
    RSI,
    RDI,
    RBP,
    RSP,
    R8,
    R9,
    R10,
}

use Register::*;

/// Linux syscall registers; the syscall number goes into RAX and the
/// arguments follow in order.
pub const SYSCALL: [Register; 7] = [RAX, RDI, RSI, RDX, R10, R8, R9];

/// Memory at a fixed offset from a register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relative {
    pub register: Register,
    pub offset: i64,
}

/// Any instruction operand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    Register(Register),
    Relative(Relative),
    Const(i64),
    // The address of a label as an immediate
    Label(String),
}

/// A single line of assembly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ins(pub String);

/// A sequence of instructions
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ASM(pub Vec<Ins>);

impl ASM {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Add<i64> for Register {
    type Output = Relative;

    // Not quite an addition, but `RBP + 16` reads a lot like `16(%rbp)`
    fn add(self, offset: i64) -> Relative {
        Relative { register: self, offset }
    }
}

impl From<Register> for Reference {
    fn from(r: Register) -> Self {
        Reference::Register(r)
    }
}

impl From<Relative> for Reference {
    fn from(r: Relative) -> Self {
        Reference::Relative(r)
    }
}

impl From<i64> for Reference {
    fn from(i: i64) -> Self {
        Reference::Const(i)
    }
}

impl From<&str> for Ins {
    fn from(s: &str) -> Self {
        Ins(s.to_string())
    }
}

impl From<Ins> for ASM {
    fn from(i: Ins) -> Self {
        ASM(vec![i])
    }
}

impl Add<Ins> for Ins {
    type Output = ASM;

    fn add(self, other: Ins) -> ASM {
        ASM(vec![self, other])
    }
}

impl Add<ASM> for Ins {
    type Output = ASM;

    fn add(self, mut other: ASM) -> ASM {
        other.0.insert(0, self);
        other
    }
}

impl Add<Ins> for ASM {
    type Output = ASM;

    fn add(mut self, other: Ins) -> ASM {
        self.0.push(other);
        self
    }
}

impl Add<ASM> for ASM {
    type Output = ASM;

    fn add(mut self, other: ASM) -> ASM {
        self.0.extend(other.0);
        self
    }
}

impl AddAssign<Ins> for ASM {
    fn add_assign(&mut self, other: Ins) {
        self.0.push(other)
    }
}

impl AddAssign<ASM> for ASM {
    fn add_assign(&mut self, other: ASM) {
        self.0.extend(other.0)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            RAX => "rax",
            RBX => "rbx",
            RCX => "rcx",
            RDX => "rdx",
            RSI => "rsi",
            RDI => "rdi",
            RBP => "rbp",
            RSP => "rsp",
            R8 => "r8",
            R9 => "r9",
            R10 => "r10",
        };
        write!(f, "%{}", name)
    }
}

impl fmt::Display for Relative {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.offset == 0 {
            write!(f, "({})", self.register)
        } else {
            write!(f, "{}({})", self.offset, self.register)
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Reference::Register(r) => write!(f, "{}", r),
            Reference::Relative(r) => write!(f, "{}", r),
            Reference::Const(i) => write!(f, "${}", i),
            Reference::Label(l) => write!(f, "${}", l),
        }
    }
}

impl fmt::Display for Ins {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Labels and directives start at the first column
        if self.0.ends_with(':') || self.0.starts_with('.') || self.0.is_empty() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "    {}", self.0)
        }
    }
}

impl fmt::Display for ASM {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for ins in &self.0 {
            writeln!(f, "{}", ins)?;
        }
        Ok(())
    }
}

pub fn push(r: Reference) -> Ins {
    Ins(format!("push {}", r))
}

pub fn pop(r: Register) -> Ins {
    Ins(format!("pop {}", r))
}

pub fn mov(to: Reference, from: Reference) -> Ins {
    Ins(format!("mov {}, {}", from, to))
}

/// Load a single byte and zero extend it into a full register
pub fn movzb(to: Register, from: Reference) -> Ins {
    Ins(format!("movzbq {}, {}", from, to))
}

pub fn add(to: Reference, from: Reference) -> Ins {
    Ins(format!("add {}, {}", from, to))
}

pub fn sub(to: Reference, from: Reference) -> Ins {
    Ins(format!("sub {}, {}", from, to))
}

pub fn imul(to: Register, from: Reference) -> Ins {
    Ins(format!("imul {}, {}", from, to))
}

pub fn xor(to: Register, from: Register) -> Ins {
    Ins(format!("xor {}, {}", from, to))
}

/// Compare `a` with `b`, setting flags as if computing `a - b`
pub fn cmp(a: Reference, b: Reference) -> Ins {
    Ins(format!("cmp {}, {}", b, a))
}

pub fn test(a: Register, b: Register) -> Ins {
    Ins(format!("test {}, {}", b, a))
}

/// Conditional move, `cc` is a condition code like `e` or `l`
pub fn cmov(cc: &str, to: Register, from: Register) -> Ins {
    Ins(format!("cmov{} {}, {}", cc, from, to))
}

pub fn inc(r: Register) -> Ins {
    Ins(format!("inc {}", r))
}

pub fn jmp(label: &str) -> Ins {
    Ins(format!("jmp {}", label))
}

pub fn je(label: &str) -> Ins {
    Ins(format!("je {}", label))
}

pub fn call(label: &str) -> Ins {
    Ins(format!("call {}", label))
}

pub fn label(name: &str) -> Ins {
    Ins(format!("{}:", name))
}

pub fn ret() -> Ins {
    Ins::from("ret")
}

pub fn syscall() -> Ins {
    Ins::from("syscall")
}

pub fn section(name: &str) -> Ins {
    Ins(format!(".section {}", name))
}

pub fn global(name: &str) -> Ins {
    Ins(format!(".global {}", name))
}

/// A NUL terminated static string
pub fn asciz(text: &str) -> Ins {
    Ins(format!(".asciz \"{}\"", text))
}

/// Function prologue, sets up a new frame
pub fn enter() -> ASM {
    push(RBP.into()) + mov(RBP.into(), RSP.into())
}

/// Function epilogue, RAX holds the return value
pub fn leave() -> ASM {
    mov(RSP.into(), RBP.into()) + pop(RBP) + ret()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn operands() {
        assert_eq!(mov(RAX.into(), 42.into()).0, "mov $42, %rax");
        assert_eq!(mov(RAX.into(), (RBP + 24).into()).0, "mov 24(%rbp), %rax");
        assert_eq!(movzb(RBX, (RAX + 0).into()).0, "movzbq (%rax), %rbx");
        assert_eq!(mov(RAX.into(), Reference::Label(".Lstr_1".into())).0, "mov $.Lstr_1, %rax");
        assert_eq!(cmp(RBX.into(), RAX.into()).0, "cmp %rax, %rbx");
        assert_eq!(cmov("l", RCX, RDX).0, "cmovl %rdx, %rcx");
    }

    #[test]
    fn layout() {
        let asm = label("main") + enter() + push(RAX.into()) + leave();
        assert_eq!(
            asm.to_string(),
            "main:\n    push %rbp\n    mov %rsp, %rbp\n    push %rax\n    mov %rbp, %rsp\n    pop %rbp\n    ret\n"
        );
    }
}
