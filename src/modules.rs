//! Imports: finding library files and merging them into the importer
//!
//! `import std.io` looks for `$XYL_HOME/lib/std/io.xyl` first and falls back
//! to `std/io.xyl` under the working directory.
//!
//! A library is compiled like any other unit, except that the result is
//! handed back to the importer instead of being turned into an executable.
//! Its code and data are pasted into the importer at the point of the import
//! and its functions join the importer's function table.
//!
//! Every library is compiled at most once per compilation, no matter how many
//! units import it. Diamond shaped import graphs are fine, cycles are an error.
use crate::{
    compiler::{
        emit,
        state::{Context, Fragment, State},
    },
    core::{Error, Function, Location, Token},
    lexer,
};
use std::{
    fs,
    iter::once,
    path::{Path, PathBuf},
};

/// File extension of xyl sources
pub const EXTENSION: &str = "xyl";

/// Read, lex and compile one source file
///
/// `inherited` are the functions already known to the importer, empty for
/// the program itself.
pub fn compile(ctx: &mut Context, file: &Path, inherited: &[Function]) -> Result<Fragment, Error> {
    let source = read(file)?;

    let (tokens, diagnostics) = lexer::tokenize(&source);
    if !diagnostics.is_empty() {
        return Err(Error::Lexical { file: file.to_path_buf(), diagnostics });
    }

    ctx.pending.push(canonical(file)?);
    let fragment = emit::unit(ctx, file, &tokens, inherited);
    ctx.pending.pop();

    fragment
}

pub fn read(file: &Path) -> Result<String, Error> {
    fs::read_to_string(file).map_err(|e| Error::Internal {
        message: format!("Failed to read {}", file.display()),
        e: Some(e),
    })
}

fn canonical(file: &Path) -> Result<PathBuf, Error> {
    file.canonicalize().map_err(|e| Error::Internal {
        message: format!("Failed to resolve {}", file.display()),
        e: Some(e),
    })
}

/// Find the source file a dotted import path refers to
pub fn resolve(ctx: &Context, dotted: &str, at: &Location) -> Result<PathBuf, Error> {
    let parts: Vec<&str> = dotted.split('.').filter(|part| !part.is_empty()).collect();

    if parts.is_empty() {
        return Err(Error::at(at.clone(), "Import statement missing library"));
    }

    let home = match &ctx.home {
        Some(home) => home,
        None => return Err(Error::Config(String::from("Could not find `XYL_HOME` env variable"))),
    };

    let relative = parts.iter().collect::<PathBuf>().with_extension(EXTENSION);

    let lib = home.join("lib").join(&relative);
    if lib.is_file() {
        return Ok(lib);
    }

    let local = ctx.cwd.join(&relative);
    if local.is_file() {
        return Ok(local);
    }

    Err(Error::at(at.clone(), format!("Imported library could not be found : `{}`", dotted)))
}

/// Compile and merge an imported library, unless it already was
pub fn import(ctx: &mut Context, s: &mut State, token: &Token, dotted: &str) -> Result<(), Error> {
    let at = s.at(token);
    let path = canonical(&resolve(ctx, dotted, &at)?)?;

    if ctx.merged.contains(&path) {
        return Ok(());
    }

    if ctx.pending.contains(&path) {
        let chain: Vec<String> = ctx
            .pending
            .iter()
            .skip_while(|p| **p != path)
            .chain(once(&path))
            .map(|p| p.display().to_string())
            .collect();

        return Err(Error::at(at, format!("Import cycle : {}", chain.join(" -> "))));
    }

    let fragment = compile(ctx, &path, &s.visible())?;
    merge(s, fragment, &at)?;

    ctx.merged.insert(path.clone());
    s.imports.push(path);

    Ok(())
}

/// Paste a library into the importer
fn merge(s: &mut State, fragment: Fragment, at: &Location) -> Result<(), Error> {
    for f in &fragment.functions {
        if s.function(&f.name).is_some() {
            return Err(Error::at(at.clone(), format!("Duplicate function `{}` imported", f.name)));
        }
    }

    s.text += fragment.text;
    s.data += fragment.data;
    s.functions.extend(fragment.functions);
    s.imports.extend(fragment.imports);

    Ok(())
}
