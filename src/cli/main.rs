//! # Sprig CLI
//!
//! Parses SQL from a file or stdin and prints the normalized statements, one
//! per line. With `--tokens` it prints the token stream instead.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use sprig::sql::{Lexer, Parser};

const USAGE: &str = "usage: sprig [--tokens] [FILE]";

fn main() {
    let mut tokens_only = false;
    let mut path = None;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--tokens" => tokens_only = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                println!();
                println!("Reads SQL from FILE, or stdin when FILE is omitted.");
                println!("  --tokens    Print the token stream instead of statements");
                return;
            }
            flag if flag.starts_with('-') && flag != "-" => {
                eprintln!("Error: unknown option: {flag}");
                eprintln!("{USAGE}");
                process::exit(2);
            }
            _ if path.is_some() => {
                eprintln!("Error: more than one input file given");
                eprintln!("{USAGE}");
                process::exit(2);
            }
            _ => path = Some(arg),
        }
    }

    let source = match read_source(path.as_deref()) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading input: {e}");
            process::exit(1);
        }
    };

    let result = if tokens_only {
        print_tokens(&source)
    } else {
        print_statements(&source)
    };
    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn read_source(path: Option<&str>) -> io::Result<String> {
    match path {
        Some(path) if path != "-" => fs::read_to_string(path),
        _ => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}

fn print_tokens(source: &str) -> sprig::Result<()> {
    let tokens = Lexer::new(source).tokenize()?;
    for token in &tokens {
        println!(
            "{}:{}\t{}\t{}",
            token.location.line, token.location.column, token.kind, token
        );
    }
    Ok(())
}

fn print_statements(source: &str) -> sprig::Result<()> {
    let ast = Parser::parse(source)?;
    for statement in &ast.statements {
        println!("{statement};");
    }
    Ok(())
}
