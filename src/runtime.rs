//! Runtime routines written in assembly
//!
//! Programs are linked without libc, so everything a program needs at runtime
//! besides raw syscalls lives here and is emitted once into every executable.
use crate::x86::{self, Ins, Register::*, ASM};

/// Label of the decimal printing routine, the target of `dump`
pub const DUMP: &str = "dump";

/// Label of the process entry point
pub const START: &str = "_start";

/// Symbols defined by the runtime; user procedures may not reuse them
pub const RESERVED: [&str; 2] = [DUMP, START];

/// Print the signed integer in RDI in decimal followed by a newline
///
/// Digits are written backwards into a buffer on the stack ending just below
/// the frame pointer, then the whole buffer goes out with one `write(2)`. The
/// magnitude is divided unsigned, so `i64::MIN` prints correctly as well.
pub fn dump() -> ASM {
    x86::label(DUMP)
        + x86::enter()
        + x86::sub(RSP.into(), 32.into())
        + x86::mov(RAX.into(), RDI.into())
        + Ins::from("lea -1(%rbp), %rsi")
        + Ins::from("movb $10, (%rsi)")
        + x86::mov(RCX.into(), 10.into())
        + x86::xor(R8, R8)
        + x86::test(RAX, RAX)
        + Ins::from("jns .Ldump_digits")
        + Ins::from("neg %rax")
        + x86::mov(R8.into(), 1.into())
        + x86::label(".Ldump_digits")
        + x86::xor(RDX, RDX)
        + Ins::from("div %rcx")
        + Ins::from("add $48, %dl")
        + Ins::from("dec %rsi")
        + Ins::from("mov %dl, (%rsi)")
        + x86::test(RAX, RAX)
        + Ins::from("jnz .Ldump_digits")
        + x86::test(R8, R8)
        + Ins::from("jz .Ldump_write")
        + Ins::from("dec %rsi")
        + Ins::from("movb $45, (%rsi)")
        + x86::label(".Ldump_write")
        + x86::mov(RDX.into(), RBP.into())
        + x86::sub(RDX.into(), RSI.into())
        + x86::mov(RDI.into(), 1.into())
        + x86::mov(RAX.into(), 1.into())
        + x86::syscall()
        + x86::leave()
}

/// Entry point: call `main` and exit with whatever it returned
pub fn start() -> ASM {
    x86::label(START)
        + x86::call("main")
        + x86::mov(RDI.into(), RAX.into())
        + x86::mov(RAX.into(), 60.into())
        + x86::syscall()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn entry() {
        assert_eq!(
            start().to_string(),
            "_start:\n    call main\n    mov %rax, %rdi\n    mov $60, %rax\n    syscall\n"
        );
    }

    #[test]
    fn helper() {
        let asm = dump().to_string();
        assert!(asm.starts_with("dump:\n"));
        assert!(asm.ends_with("    ret\n"));
        assert_eq!(asm.matches("syscall").count(), 1);
    }
}
