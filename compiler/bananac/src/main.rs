//! Banana CLI

use std::io::Write;

use banana_eval::stdout_handler;
use bananac::commands::{eval_source, lex_source, parse_program, run_sources};
use bananac::options::MAX_STEPS_ENV;
use bananac::report::SourceFile;
use bananac::Options;

fn main() {
    bananac::init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let env_max_steps = std::env::var(MAX_STEPS_ENV).ok();
    let (options, positional) = match Options::parse(&args[2..], env_max_steps.as_deref()) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();

    let result = match args[1].as_str() {
        "run" => {
            if positional.is_empty() {
                eprintln!("Usage: banana run <file>... [--max-steps=N] [--color=auto|always|never]");
                std::process::exit(1);
            }
            let files: Vec<SourceFile> = positional.iter().map(|path| read_file(path)).collect();
            run_sources(&files, &options, stdout_handler(), &mut stderr)
        }
        "eval" => {
            let [source] = positional.as_slice() else {
                eprintln!("Usage: banana eval <source> [--max-steps=N]");
                std::process::exit(1);
            };
            eval_source(source, &options, stdout_handler(), &mut stdout, &mut stderr)
        }
        "lex" => {
            let [path] = positional.as_slice() else {
                eprintln!("Usage: banana lex <file>");
                std::process::exit(1);
            };
            lex_source(&read_file(path), &mut stdout)
        }
        "parse" => {
            let [path] = positional.as_slice() else {
                eprintln!("Usage: banana parse <file>");
                std::process::exit(1);
            };
            parse_program(&read_file(path), &options, &mut stdout, &mut stderr)
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(true)
        }
        "version" | "--version" | "-V" => {
            println!("banana {}", env!("CARGO_PKG_VERSION"));
            Ok(true)
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    let _ = stdout.flush();
    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

/// Read a file, exiting with a user-friendly message on failure.
fn read_file(path: &str) -> SourceFile {
    match SourceFile::read(path) {
        Ok(file) => file,
        Err(message) => {
            eprintln!("error: {message}");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Banana interpreter");
    eprintln!();
    eprintln!("Usage: banana <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <file>...     Run files concurrently, one thread per file");
    eprintln!("  eval <source>     Evaluate inline source and print its value");
    eprintln!("  lex <file>        Dump the token stream");
    eprintln!("  parse <file>      Print the parsed program");
    eprintln!("  help              Show this message");
    eprintln!("  version           Show the version");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --max-steps=N     Retire any thread after N steps (default: ${MAX_STEPS_ENV})");
    eprintln!("  --color=MODE      Diagnostic colors: auto, always, never");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  RUST_LOG          Enable tracing, e.g. RUST_LOG=banana_eval=debug");
}
