/*!

# xyl, a tiny stack language compiler

xyl compiles a small concatenative language straight to x86-64 assembly for
Linux, then hands it to `as` and `ld` for a static executable without libc.

```txt
# Prints 42
proc add int a int b in
    a b +
end

proc main in
    40 2 add dump
    0
end
```

## Where do I get started? 🕵️‍♀️

The compiler is single pass. [lexer](crate::lexer) turns a file into tokens
and [emit](crate::compiler::emit) translates each token to assembly as soon
as it sees it, with no syntax tree in between. Every value lives on the machine
stack.

Imports are handled by [modules](crate::modules): a library is compiled like
any other file and pasted into its importer, at most once per program.

## Language at a glance

| syntax                      | meaning                                           |
|-----------------------------|---------------------------------------------------|
| `42`, `true`, `"hi"`        | push a constant, strings push their address       |
| `+ - * = ! < >`             | pop two, push the result; comparisons push 0 or 1 |
| `dup drop swap inc dec`     | stack shuffling                                   |
| `derefc derefi`             | load a byte or a word from an address             |
| `dump`                      | pop and print in decimal                          |
| `cond if .. else .. end`    | conditionals                                      |
| `while cond do .. end`      | loops                                             |
| `proc f int a in .. end`    | procedures, the value on top is returned          |
| `syscall N`                 | Linux syscall with N stack values (number first)  |
| `import std.io`             | `$XYL_HOME/lib/std/io.xyl` or `./std/io.xyl`      |

## Background Reading 📚

- [x86 module documentation](crate::x86) contains links to a few good x86 tutorials.
- [The Rust Programming language][book] book is a good place to start learning rust.

[book]: https://doc.rust-lang.org/book/#the-rust-programming-language

*/

pub mod cli;
pub mod compiler;
pub mod core;
pub mod lexer;
pub mod modules;
pub mod runtime;
pub mod x86;
