//! Entry point for the xyl compiler

/// State for the code generator
pub mod state {
    use crate::core::{Function, Location, Token};
    use crate::x86::ASM;
    use std::{
        collections::HashSet,
        path::{Path, PathBuf},
    };

    /// State of a whole compilation, shared by the program and every library
    /// it imports, directly or not.
    ///
    /// `li` is label index, a counter used to generate unique labels. See
    /// `gen_label`
    ///
    /// `merged` is the set of canonical library paths already compiled and
    /// merged somewhere in the import graph. A library in this set is never
    /// compiled again.
    ///
    /// `pending` are the units currently being compiled, outermost first.
    /// Finding an import in here means the graph has a cycle.
    pub struct Context {
        li: u64,
        pub home: Option<PathBuf>,
        pub cwd: PathBuf,
        pub merged: HashSet<PathBuf>,
        pub pending: Vec<PathBuf>,
    }

    impl Context {
        pub fn new(home: Option<PathBuf>, cwd: PathBuf) -> Self {
            Context { li: 0, home, cwd, merged: HashSet::new(), pending: vec![] }
        }

        /// Generate a unique label index for jump targets.
        pub fn gen_label(&mut self) -> u64 {
            self.li += 1;
            self.li
        }
    }

    /// Name of a generated label, like `.Lelse_4`
    ///
    /// The `.L` prefix keeps these local to the object file and out of the
    /// way of user procedure names.
    pub fn label(prefix: &str, id: u64) -> String {
        format!(".L{}_{}", prefix, id)
    }

    /// Kinds of blocks closed by `end`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Block {
        If { id: u64, has_else: bool },
        While { id: u64 },
        Proc,
    }

    impl Block {
        pub fn name(&self) -> &'static str {
            match self {
                Block::If { .. } => "if",
                Block::While { .. } => "while",
                Block::Proc => "proc",
            }
        }
    }

    /// An open block and where it was opened
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Scope {
        pub block: Block,
        pub row: usize,
        pub col: usize,
    }

    impl Scope {
        pub fn new(block: Block, token: &Token) -> Self {
            Scope { block, row: token.row, col: token.col }
        }
    }

    /// Result of compiling one unit
    ///
    /// `functions` are only the ones this unit added, either declared or
    /// merged from its own imports, and `imports` are the libraries it merged.
    #[derive(Debug, Default)]
    pub struct Fragment {
        pub text: ASM,
        pub data: ASM,
        pub functions: Vec<Function>,
        pub imports: Vec<PathBuf>,
    }

    /// State for the code generator of a single unit; easier to bundle it all
    /// into a struct than pass several arguments in.
    ///
    /// `inherited` are functions the importing unit already knew about. They
    /// can be called but are not exported again.
    ///
    /// `scopes` are the open blocks, innermost last, and `active` the open
    /// procedures whose arguments bare identifiers resolve to.
    pub struct State {
        pub file: PathBuf,
        pub text: ASM,
        pub data: ASM,
        inherited: Vec<Function>,
        pub functions: Vec<Function>,
        pub imports: Vec<PathBuf>,
        pub scopes: Vec<Scope>,
        pub active: Vec<Function>,
    }

    impl State {
        pub fn new(file: &Path, inherited: &[Function]) -> Self {
            State {
                file: file.to_path_buf(),
                text: ASM::default(),
                data: ASM::default(),
                inherited: inherited.to_vec(),
                functions: vec![],
                imports: vec![],
                scopes: vec![],
                active: vec![],
            }
        }

        /// Location of a token in the current file
        pub fn at(&self, token: &Token) -> Location {
            Location { file: self.file.clone(), row: token.row, col: token.col }
        }

        /// Look up a callable function by name
        pub fn function(&self, name: &str) -> Option<&Function> {
            self.inherited.iter().chain(self.functions.iter()).find(|f| f.name == name)
        }

        /// Every function callable from this unit, handed down to imports
        pub fn visible(&self) -> Vec<Function> {
            self.inherited.iter().chain(self.functions.iter()).cloned().collect()
        }

        pub fn finish(self) -> Fragment {
            Fragment {
                text: self.text,
                data: self.data,
                functions: self.functions,
                imports: self.imports,
            }
        }
    }
}

/// Emit machine code for a token stream.
///
/// This module implements bulk of the compiler and is a good place to start
/// reading code. There is no syntax tree, every token is translated to
/// assembly as soon as it is seen and the only memory of what came before are
/// the scope stack and the function table in `State`.
///
/// All values live on the machine stack; every instruction pops its operands
/// and pushes its result.
pub mod emit {
    use crate::{
        compiler::state::{label, Block, Context, Fragment, Scope, State},
        core::{Error, Function, Keyword, Location, Operator, Token, TokenKind},
        modules, runtime,
        x86::{self, pop, push, Ins, Reference, Register::*, ASM, FRAME_BIAS, WORDSIZE},
    };
    use std::{path::Path, slice::Iter};

    /// Frame offset of argument `index` of a procedure with `arity` arguments
    ///
    /// Arguments are pushed by the caller in declaration order, so the last
    /// one sits right above the return address and saved frame pointer.
    pub fn offset(arity: usize, index: usize) -> i64 {
        (arity - 1 - index) as i64 * WORDSIZE + FRAME_BIAS
    }

    /// Compile the tokens of one unit
    pub fn unit(
        ctx: &mut Context,
        file: &Path,
        tokens: &[Token],
        inherited: &[Function],
    ) -> Result<Fragment, Error> {
        let mut s = State::new(file, inherited);
        let mut tokens = tokens.iter();

        while let Some(token) = tokens.next() {
            eval(ctx, &mut s, token, &mut tokens)?;
        }

        if let Some(Scope { block, row, col }) = s.scopes.last() {
            let at = Location { file: s.file.clone(), row: *row, col: *col };
            return Err(Error::at(at, format!("Unclosed `{}` block", block.name())));
        }

        Ok(s.finish())
    }

    /// Emit code for a single token
    ///
    /// A procedure header consumes its argument tokens from `rest` as well.
    pub fn eval(
        ctx: &mut Context,
        s: &mut State,
        token: &Token,
        rest: &mut Iter<Token>,
    ) -> Result<(), Error> {
        let asm = match &token.kind {
            TokenKind::Int(i) => constant(*i),
            TokenKind::Bool(b) => constant(i64::from(*b)),
            TokenKind::Operator(op) => binary(s, token, *op)?,
            TokenKind::Str(text) => string(ctx, s, text),
            TokenKind::Keyword(k) => keyword(ctx, s, token, *k)?,
            TokenKind::Syscall(n) => syscall(s, token, *n)?,
            TokenKind::Call(name) => call(s, token, name)?,
            TokenKind::Proc(name) => proc(s, token, name, rest)?,
            TokenKind::Import(path) => {
                if !s.scopes.is_empty() {
                    return Err(Error::at(s.at(token), "Import inside a block"));
                }
                modules::import(ctx, s, token, path)?;
                ASM::default()
            }
            TokenKind::Arg { .. } | TokenKind::ArgsEnd => {
                return Err(Error::at(s.at(token), "Argument outside of a procedure header"))
            }
        };

        s.text += asm;
        Ok(())
    }

    fn constant(i: i64) -> ASM {
        x86::mov(RAX.into(), i.into()) + push(RAX.into())
    }

    /// Pop the right then the left operand and push the result
    fn binary(s: &State, token: &Token, op: Operator) -> Result<ASM, Error> {
        let arith = |ins: Ins| pop(RBX) + pop(RAX) + ins + push(RAX.into());

        let cc = match op {
            Operator::Add => return Ok(arith(x86::add(RAX.into(), RBX.into()))),
            Operator::Sub => return Ok(arith(x86::sub(RAX.into(), RBX.into()))),
            Operator::Mul => return Ok(arith(x86::imul(RAX, RBX.into()))),
            Operator::Div => return Err(Error::at(s.at(token), "Division not implemented")),
            Operator::Eq => "e",
            Operator::Ne => "ne",
            Operator::Lt => "l",
            Operator::Gt => "g",
        };

        Ok(pop(RAX)
            + pop(RBX)
            + x86::xor(RCX, RCX)
            + x86::mov(RDX.into(), 1.into())
            + x86::cmp(RBX.into(), RAX.into())
            + x86::cmov(cc, RCX, RDX)
            + push(RCX.into()))
    }

    /// Place the string in the data section and push its address
    fn string(ctx: &mut Context, s: &mut State, text: &str) -> ASM {
        let name = label("str", ctx.gen_label());
        s.data += x86::label(&name) + x86::asciz(text);

        x86::mov(RAX.into(), Reference::Label(name)) + push(RAX.into())
    }

    fn keyword(ctx: &mut Context, s: &mut State, token: &Token, k: Keyword) -> Result<ASM, Error> {
        let asm: ASM = match k {
            Keyword::Dup => pop(RAX) + push(RAX.into()) + push(RAX.into()),
            Keyword::Drop => pop(RAX).into(),
            Keyword::Swap => pop(RAX) + pop(RBX) + push(RAX.into()) + push(RBX.into()),
            Keyword::Inc => pop(RAX) + x86::inc(RAX) + push(RAX.into()),
            Keyword::Dec => pop(RAX) + x86::sub(RAX.into(), 1.into()) + push(RAX.into()),
            Keyword::Dump => pop(RDI) + x86::call(runtime::DUMP),
            Keyword::Derefc => pop(RAX) + x86::movzb(RBX, (RAX + 0).into()) + push(RBX.into()),
            Keyword::Derefi => pop(RAX) + x86::mov(RBX.into(), (RAX + 0).into()) + push(RBX.into()),
            Keyword::Return => {
                if s.active.is_empty() {
                    return Err(Error::at(s.at(token), "`return` outside of a procedure"));
                }
                pop(RAX) + x86::leave()
            }
            Keyword::If => {
                let id = ctx.gen_label();
                s.scopes.push(Scope::new(Block::If { id, has_else: false }, token));
                pop(RAX) + x86::test(RAX, RAX) + x86::je(&label("else", id))
            }
            Keyword::Else => otherwise(s, token)?,
            Keyword::While => {
                let id = ctx.gen_label();
                s.scopes.push(Scope::new(Block::While { id }, token));
                x86::label(&label("while", id)).into()
            }
            Keyword::Do => match s.scopes.last().map(|scope| scope.block) {
                Some(Block::If { id, .. }) | Some(Block::While { id }) => {
                    pop(RAX) + x86::test(RAX, RAX) + x86::je(&label("end", id))
                }
                _ => return Err(no_opener(s, token, k)),
            },
            Keyword::End => end(s, token)?,
            Keyword::Buffer => {
                return Err(Error::at(s.at(token), "`buffer` is not implemented"));
            }
        };

        Ok(asm)
    }

    fn no_opener(s: &State, token: &Token, k: Keyword) -> Error {
        Error::at(s.at(token), format!("No matching opener for `{}`", k.name()))
    }

    /// `else` of the innermost `if`, which must not have one yet
    fn otherwise(s: &mut State, token: &Token) -> Result<ASM, Error> {
        let id = match s.scopes.last().map(|scope| scope.block) {
            Some(Block::If { id, has_else: false }) => id,
            _ => return Err(no_opener(s, token, Keyword::Else)),
        };

        if let Some(scope) = s.scopes.last_mut() {
            scope.block = Block::If { id, has_else: true };
        }

        Ok(x86::jmp(&label("end", id)) + x86::label(&label("else", id)))
    }

    /// Close the innermost block
    fn end(s: &mut State, token: &Token) -> Result<ASM, Error> {
        let scope = match s.scopes.pop() {
            Some(scope) => scope,
            None => return Err(no_opener(s, token, Keyword::End)),
        };

        let asm = match scope.block {
            Block::If { id, has_else: true } => x86::label(&label("end", id)).into(),
            // Without an explicit else branch the else label falls through
            Block::If { id, has_else: false } => {
                x86::label(&label("else", id)) + x86::label(&label("end", id))
            }
            Block::While { id } => x86::jmp(&label("while", id)) + x86::label(&label("end", id)),
            Block::Proc => {
                s.active.pop();
                pop(RAX) + x86::leave()
            }
        };

        Ok(asm)
    }

    /// Pop the syscall arguments into registers, last argument first
    fn syscall(s: &State, token: &Token, n: u64) -> Result<ASM, Error> {
        if n > x86::SYSCALL.len() as u64 {
            return Err(Error::at(
                s.at(token),
                format!("Syscall can only range from 0-7 got : `{}`", n),
            ));
        }

        let mut asm = ASM::default();
        for r in x86::SYSCALL[..n as usize].iter().rev() {
            asm += pop(*r);
        }

        Ok(asm + x86::syscall() + push(RAX.into()))
    }

    /// Call a known function or read an argument of the current procedure
    ///
    /// The caller cleans up the arguments it pushed and then pushes the return
    /// value left in RAX.
    fn call(s: &State, token: &Token, name: &str) -> Result<ASM, Error> {
        if let Some(f) = s.function(name) {
            let mut asm: ASM = x86::call(name).into();
            for _ in 0..f.arity() {
                asm += pop(RBX);
            }
            return Ok(asm + push(RAX.into()));
        }

        if let Some(f) = s.active.last() {
            if let Some(index) = f.index(name) {
                let at = RBP + offset(f.arity(), index);
                return Ok(x86::mov(RAX.into(), at.into()) + push(RAX.into()));
            }
        }

        Err(Error::at(s.at(token), format!("Unknown symbol `{}`", name)))
    }

    /// Declare a procedure and open its body
    fn proc(s: &mut State, token: &Token, name: &str, rest: &mut Iter<Token>) -> Result<ASM, Error> {
        if !s.scopes.is_empty() {
            return Err(Error::at(
                s.at(token),
                format!("Procedure `{}` declared inside a block", name),
            ));
        }

        if runtime::RESERVED.contains(&name) {
            return Err(Error::at(s.at(token), format!("Reserved procedure name `{}`", name)));
        }

        if s.function(name).is_some() {
            return Err(Error::at(s.at(token), format!("Duplicate function `{}`", name)));
        }

        let mut args: Vec<String> = vec![];

        loop {
            let t = match rest.next() {
                Some(t) => t,
                None => {
                    return Err(Error::at(
                        s.at(token),
                        format!("Unterminated argument list of `{}`", name),
                    ))
                }
            };

            match &t.kind {
                TokenKind::ArgsEnd => break,
                TokenKind::Arg { name: arg, .. } => {
                    if args.contains(arg) {
                        return Err(Error::at(
                            s.at(t),
                            format!("Duplicate argument name : `{}`", arg),
                        ));
                    }
                    args.push(arg.clone());
                }
                other => {
                    return Err(Error::at(s.at(t), format!("Unknown argument : `{}`", other)))
                }
            }
        }

        let f = Function::new(name, args);
        s.functions.push(f.clone());
        s.active.push(f);
        s.scopes.push(Scope::new(Block::Proc, token));

        Ok(x86::label(name) + x86::enter())
    }

    /// Top level interface to the emit module
    ///
    /// Lays out the final assembly file of a program: static data, the
    /// runtime, every procedure and finally the entry point calling `main`.
    pub fn program(fragment: &Fragment) -> Result<String, Error> {
        if !fragment.functions.iter().any(|f| f.name == "main") {
            return Err(Error::Compilation {
                at: None,
                message: String::from("No `main` procedure defined"),
            });
        }

        let asm = x86::section(".data")
            + fragment.data.clone()
            + x86::section(".text")
            + x86::global(runtime::START)
            + runtime::dump()
            + fragment.text.clone()
            + runtime::start();

        Ok(asm.to_string())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::lexer::tokenize;
        use pretty_assertions::assert_eq;
        use std::path::PathBuf;

        fn compile(source: &str) -> Result<Fragment, Error> {
            let (tokens, diagnostics) = tokenize(source);
            assert_eq!(diagnostics, vec![]);

            let mut ctx = Context::new(None, PathBuf::from("."));
            unit(&mut ctx, Path::new("test.xyl"), &tokens, &[])
        }

        fn asm(source: &str) -> Vec<String> {
            match compile(source) {
                Ok(f) => f.text.0.into_iter().map(|i| i.0).collect(),
                Err(e) => panic!("{}", e),
            }
        }

        fn fails(source: &str) -> String {
            match compile(source) {
                Ok(_) => panic!("`{}` should not compile", source),
                Err(e) => e.message(),
            }
        }

        #[test]
        fn arithmetic() {
            let f = compile("2 3 + dump").unwrap();

            assert_eq!(
                f.text.0.iter().map(|i| i.0.as_str()).collect::<Vec<_>>(),
                vec![
                    "mov $2, %rax",
                    "push %rax",
                    "mov $3, %rax",
                    "push %rax",
                    "pop %rbx",
                    "pop %rax",
                    "add %rbx, %rax",
                    "push %rax",
                    "pop %rdi",
                    "call dump"
                ]
            );
            assert!(f.data.is_empty());
        }

        #[test]
        fn comparisons() {
            let code = asm("1 2 <");
            assert_eq!(
                &code[4..],
                [
                    "pop %rax",
                    "pop %rbx",
                    "xor %rcx, %rcx",
                    "mov $1, %rdx",
                    "cmp %rax, %rbx",
                    "cmovl %rdx, %rcx",
                    "push %rcx"
                ]
            );

            assert!(asm("1 2 =").contains(&String::from("cmove %rdx, %rcx")));
            assert!(asm("1 2 !").contains(&String::from("cmovne %rdx, %rcx")));
            assert!(asm("1 2 >").contains(&String::from("cmovg %rdx, %rcx")));
        }

        #[test]
        fn booleans() {
            assert_eq!(asm("true false"), ["mov $1, %rax", "push %rax", "mov $0, %rax", "push %rax"]);
        }

        #[test]
        fn division() {
            assert_eq!(fails("4 2 /"), "Division not implemented");
        }

        #[test]
        fn stack() {
            assert_eq!(asm("dec"), ["pop %rax", "sub $1, %rax", "push %rax"]);
            assert_eq!(asm("swap"), ["pop %rax", "pop %rbx", "push %rax", "push %rbx"]);
            assert_eq!(asm("derefc"), ["pop %rax", "movzbq (%rax), %rbx", "push %rbx"]);
            assert_eq!(asm("derefi"), ["pop %rax", "mov (%rax), %rbx", "push %rbx"]);
        }

        #[test]
        fn strings() {
            let f = compile(r#""hello" "world""#).unwrap();

            assert_eq!(
                f.data.0.iter().map(|i| i.0.as_str()).collect::<Vec<_>>(),
                vec![".Lstr_1:", ".asciz \"hello\"", ".Lstr_2:", ".asciz \"world\""]
            );
            assert_eq!(f.text.0[0].0, "mov $.Lstr_1, %rax");
        }

        #[test]
        fn syscalls() {
            for n in 0..=7 {
                assert!(compile(&format!("syscall {}", n)).is_ok());
            }

            assert_eq!(
                asm("syscall 3"),
                ["pop %rsi", "pop %rdi", "pop %rax", "syscall", "push %rax"]
            );

            assert_eq!(fails("syscall 8"), "Syscall can only range from 0-7 got : `8`");
        }

        #[test]
        fn procedures() {
            let f = compile("proc add int a int b in a b + end 3 4 add").unwrap();
            assert_eq!(f.functions, vec![Function::new("add", vec!["a".into(), "b".into()])]);

            let code: Vec<String> = f.text.0.into_iter().map(|i| i.0).collect();
            let call = code.iter().position(|i| i == "call add").unwrap();

            assert_eq!(
                &code[..6],
                [
                    "add:",
                    "push %rbp",
                    "mov %rsp, %rbp",
                    "mov 24(%rbp), %rax",
                    "push %rax",
                    "mov 16(%rbp), %rax"
                ]
            );
            assert_eq!(&code[call - 4..call], ["mov $3, %rax", "push %rax", "mov $4, %rax", "push %rax"]);
            assert_eq!(&code[call + 1..], ["pop %rbx", "pop %rbx", "push %rax"]);
        }

        #[test]
        fn offsets() {
            assert_eq!(offset(1, 0), 16);
            assert_eq!(offset(2, 0), 24);
            assert_eq!(offset(2, 1), 16);
            assert_eq!(offset(4, 0), 40);
        }

        #[test]
        fn returns() {
            let code = asm("proc f in 1 return end");
            assert_eq!(
                &code[3..],
                [
                    "mov $1, %rax",
                    "push %rax",
                    "pop %rax",
                    "mov %rbp, %rsp",
                    "pop %rbp",
                    "ret",
                    "pop %rax",
                    "mov %rbp, %rsp",
                    "pop %rbp",
                    "ret"
                ]
            );

            assert_eq!(fails("1 return"), "`return` outside of a procedure");
        }

        #[test]
        fn conditionals() {
            assert_eq!(
                asm("true if 1 end"),
                [
                    "mov $1, %rax",
                    "push %rax",
                    "pop %rax",
                    "test %rax, %rax",
                    "je .Lelse_1",
                    "mov $1, %rax",
                    "push %rax",
                    ".Lelse_1:",
                    ".Lend_1:"
                ]
            );

            assert_eq!(
                &asm("true if 1 else 2 end")[7..],
                ["jmp .Lend_1", ".Lelse_1:", "mov $2, %rax", "push %rax", ".Lend_1:"]
            );
        }

        #[test]
        fn loops() {
            assert_eq!(
                asm("while true do end"),
                [
                    ".Lwhile_1:",
                    "mov $1, %rax",
                    "push %rax",
                    "pop %rax",
                    "test %rax, %rax",
                    "je .Lend_1",
                    "jmp .Lwhile_1",
                    ".Lend_1:"
                ]
            );
        }

        #[test]
        fn nesting() {
            let code = asm("while true do true if 1 else 2 end end true if end");
            for l in &[".Lwhile_1:", ".Lend_1:", ".Lelse_2:", ".Lend_2:", ".Lelse_3:", ".Lend_3:"] {
                assert_eq!(code.iter().filter(|i| i == l).count(), 1, "{}", l);
            }
        }

        #[test]
        fn unmatched() {
            assert_eq!(fails("end"), "No matching opener for `end`");
            assert_eq!(fails("else"), "No matching opener for `else`");
            assert_eq!(fails("1 do"), "No matching opener for `do`");
            assert_eq!(fails("true if else else end"), "No matching opener for `else`");
            assert_eq!(fails("while true do else end"), "No matching opener for `else`");
            assert_eq!(fails("proc f in 1 do end"), "No matching opener for `do`");
            assert_eq!(fails("proc f in end end"), "No matching opener for `end`");
        }

        #[test]
        fn unclosed() {
            match compile("proc main in\n  true if\n  0\nend") {
                Err(Error::Compilation { at: Some(at), message }) => {
                    assert_eq!(message, "Unclosed `proc` block");
                    assert_eq!((at.row, at.col), (1, 1));
                }
                _ => panic!("expected an unclosed block"),
            }
            assert_eq!(fails("while"), "Unclosed `while` block");
        }

        #[test]
        fn symbols() {
            match compile("1\n  foo") {
                Err(Error::Compilation { at: Some(at), message }) => {
                    assert_eq!(message, "Unknown symbol `foo`");
                    assert_eq!((at.row, at.col), (2, 3));
                }
                _ => panic!("expected an unknown symbol"),
            }

            // Arguments are only visible within their procedure
            assert_eq!(fails("proc f int a in a end a"), "Unknown symbol `a`");
            assert_eq!(fails("proc f int a in end proc g in a end"), "Unknown symbol `a`");
        }

        #[test]
        fn declarations() {
            assert_eq!(fails("proc f int a int a in end"), "Duplicate argument name : `a`");
            assert_eq!(fails("proc f in end proc f in end"), "Duplicate function `f`");
            assert_eq!(fails("proc dump in end"), "Reserved procedure name `dump`");
            assert_eq!(
                fails("proc f in proc g in end end"),
                "Procedure `g` declared inside a block"
            );
        }

        #[test]
        fn recursion() {
            let code = asm("proc f int n in n f end");
            assert!(code.contains(&String::from("call f")));
        }

        #[test]
        fn unsupported() {
            assert_eq!(fails("buffer"), "`buffer` is not implemented");
        }

        #[test]
        fn programs() {
            let f = compile("proc main in \"hi\" drop 0 end").unwrap();
            let out = program(&f).unwrap();

            let data = out.find(".section .data").unwrap();
            let string = out.find(".asciz \"hi\"").unwrap();
            let text = out.find(".section .text").unwrap();
            let dump = out.find("dump:").unwrap();
            let main = out.find("main:").unwrap();
            let start = out.find("_start:").unwrap();

            assert!(data < string && string < text && text < dump && dump < main && main < start);
            assert!(out.contains(".global _start"));

            let f = compile("proc helper in 0 end").unwrap();
            match program(&f) {
                Err(e) => assert_eq!(e.message(), "No `main` procedure defined"),
                Ok(_) => panic!("a program needs a main procedure"),
            }
        }
    }
}
