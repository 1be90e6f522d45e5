//! Command line interface for xyl

use crate::{
    compiler::{emit, state::Context},
    core::{Config, Error},
    lexer, modules,
};

use std::{env, fs, process::Command};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Tokens,
    GenASM,
    Build,
}

pub fn run(config: &Config, action: Action) -> Result<Option<String>, Error> {
    match action {
        Action::Tokens => tokens(config).map(Some),
        Action::GenASM => {
            gen(config)?;

            Ok(None)
        }
        Action::Build => {
            gen(config)?;
            build(config)?;

            if config.clean {
                clean(config)?;
            }

            Ok(None)
        }
    }
}

/// The token stream of the program, one token per line
pub fn tokens(config: &Config) -> Result<String, Error> {
    let source = modules::read(&config.file)?;
    let (tokens, diagnostics) = lexer::tokenize(&source);

    if !diagnostics.is_empty() {
        return Err(Error::Lexical { file: config.file.clone(), diagnostics });
    }

    Ok(tokens.iter().map(|t| t.to_string()).collect::<Vec<_>>().join("\n"))
}

/// Compile the program and its imports into a single assembly file
pub fn gen(config: &Config) -> Result<(), Error> {
    let mut ctx = Context::new(config.home.clone(), env::current_dir()?);

    let fragment = modules::compile(&mut ctx, &config.file, &[])?;
    let asm = emit::program(&fragment)?;

    fs::write(config.asm(), asm).map_err(|e| Error::Internal {
        message: format!("Failed to write to {}", config.asm()),
        e: Some(e),
    })
}

/// Assemble and link the generated code into a static executable
///
/// There is no libc, the runtime in the assembly file is all there is.
pub fn build(config: &Config) -> Result<(), Error> {
    invoke(Command::new("as").arg("-o").arg(config.object()).arg(config.asm()), "as")?;
    invoke(Command::new("ld").arg("-o").arg(&config.output).arg(config.object()), "ld")
}

fn invoke(command: &mut Command, tool: &str) -> Result<(), Error> {
    let out = command.output().map_err(|e| Error::Internal {
        message: format!("Failed to execute `{}`", tool),
        e: Some(e),
    })?;

    if out.status.success() {
        Ok(())
    } else {
        Err(Error::Toolchain {
            message: format!("`{}` failed with {}", tool, out.status),
            output: String::from_utf8_lossy(&out.stderr).to_string(),
        })
    }
}

/// Remove the intermediate assembly and object files
pub fn clean(config: &Config) -> Result<(), Error> {
    for file in &[config.asm(), config.object()] {
        fs::remove_file(file).map_err(|e| Error::Internal {
            message: format!("Failed to remove {}", file),
            e: Some(e),
        })?;
    }

    Ok(())
}
