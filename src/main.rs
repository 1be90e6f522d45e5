extern crate getopts;
extern crate xyl;

use getopts::Options;
use xyl::{
    cli::{run, Action::*},
    core::Config,
};
use std::{env, path::PathBuf, process::exit};

fn main() {
    let args: Vec<String> = env::args().collect();
    let bin = args[0].clone();

    let mut opts = Options::new();
    opts.optflag("c", "clean", "Remove the intermediate asm and object files");
    opts.optopt("o", "", "Output file name", "FILE");
    opts.optflag("S", "", "Only generate asm");
    opts.optflag("t", "", "Print the token stream");
    opts.optflag("h", "help", "print this help menu");
    opts.optflag("", "version", "print the version");

    let usage = opts.usage(&format!("Usage: {} [options] FILE.xyl", bin));

    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(f) => {
            eprintln!("{}\n\n{}", f, usage);
            exit(1)
        }
    };

    if matches.opt_present("h") {
        print!("{}", usage);
        return;
    }

    if matches.opt_present("version") {
        println!("v{}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let file = match matches.free.as_slice() {
        [file] => PathBuf::from(file),
        _ => {
            eprint!("{}", usage);
            exit(1)
        }
    };

    // Executables are named after the source file unless asked otherwise
    let output = match (matches.opt_str("o"), file.file_stem()) {
        (Some(output), _) => output,
        (None, Some(stem)) => stem.to_string_lossy().to_string(),
        (None, None) => String::from("a.out"),
    };

    let config = Config {
        file,
        output,
        home: env::var_os("XYL_HOME").map(PathBuf::from),
        clean: matches.opt_present("c"),
    };

    let action = if matches.opt_present("t") {
        Tokens
    } else if matches.opt_present("S") {
        GenASM
    } else {
        Build
    };

    // Run the entire CLI with config
    match run(&config, action) {
        Err(e) => {
            eprintln!("{}", e);
            exit(1)
        }
        Ok(Some(out)) => println!("{}", out),
        Ok(None) => {}
    }
}
