// src/main.rs
// Tokenize a file (or stdin) with the standard rules or a JSON rule file.
// Usage:
//   cargo run -- path/to/input.txt
//   cargo run -- - --rules rules.json --json < input.txt
//   cargo run -- input.txt --symbols

use std::{
    env, fs,
    io::{self, Read},
    path::PathBuf,
};

use anyhow::{Context, Result, anyhow};
use relex::lexer::{Lexer, LexerConfig};

struct Args {
    input: Option<PathBuf>,
    rules: Option<PathBuf>,
    json: bool,
    symbols: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        input: None,
        rules: None,
        json: false,
        symbols: false,
    };
    let mut it = env::args().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--rules" => {
                let p = it.next().ok_or_else(|| anyhow!("--rules needs a path"))?;
                args.rules = Some(PathBuf::from(p));
            }
            "--json" => args.json = true,
            "--symbols" => args.symbols = true,
            "-" => args.input = None,
            other if other.starts_with("--") => return Err(anyhow!("unknown flag {other}")),
            other => args.input = Some(PathBuf::from(other)),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    let args = parse_args()?;

    let config = match &args.rules {
        Some(p) => LexerConfig::from_json_path(p)
            .with_context(|| format!("loading rules from {}", p.display()))?,
        None => LexerConfig::default(),
    };
    let mut lexer = Lexer::new(&config).context("compiling rules")?;

    let src = match &args.input {
        Some(p) => fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?,
        None => {
            let mut s = String::new();
            io::stdin()
                .read_to_string(&mut s)
                .context("reading stdin")?;
            s
        }
    };

    let tokens = lexer.tokenize(&src)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    } else {
        println!("TOKENS:");
        for t in &tokens {
            println!("{:<16} {:?}", t.tag, t.text);
        }
    }

    if args.symbols {
        if args.json {
            let entries: Vec<_> = lexer.symbols().iter().collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else {
            print!("{}", lexer.symbols());
        }
    }
    Ok(())
}
