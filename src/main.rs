use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use exparse::{lexer, parse, token};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Parse an arithmetic token stream and print its syntax tree
#[derive(Debug, Parser)]
#[command(name = "exparse", version)]
struct Args {
    /// Input file, stdin when omitted
    input: Option<PathBuf>,

    /// How the input is encoded
    #[arg(short, long, value_enum, default_value_t = InputFormat::Json)]
    format: InputFormat,

    /// What to print on success
    #[arg(short, long, value_enum, default_value_t = Emit::Json)]
    emit: Emit,

    /// Pretty-print JSON output with this many spaces, compact when 0
    #[arg(short, long, default_value_t = 0)]
    indent: usize,

    /// Trace every grammar rule to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    /// A JSON array of tokens
    Json,
    /// Plain arithmetic text
    Source,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// The compiled tree as JSON
    Json,
    /// The tree in parenthesised infix form
    Ast,
    /// The ingested tokens as JSON
    Tokens,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("exparse=trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();
}

fn read_input(path: Option<&PathBuf>) -> anyhow::Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn to_json(value: &Value, indent: usize) -> anyhow::Result<String> {
    if indent == 0 {
        return Ok(serde_json::to_string(value)?);
    }

    let indent = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut buffer = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buffer)?)
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    let input = read_input(args.input.as_ref())?;

    let tokens = match args.format {
        InputFormat::Json => token::json::from_str(&input).map_err(anyhow::Error::from),
        InputFormat::Source => lexer::lex(&input).map_err(anyhow::Error::from),
    };
    let tokens = match tokens {
        Ok(tokens) => tokens,
        Err(err) => {
            eprintln!("error: {err}");
            return Ok(ExitCode::FAILURE);
        }
    };

    if args.emit == Emit::Tokens {
        println!("{}", to_json(&token::json::to_value(&tokens)?, args.indent)?);
        return Ok(ExitCode::SUCCESS);
    }

    match parse(tokens) {
        Ok(ast) => {
            match args.emit {
                Emit::Ast => println!("{ast}"),
                _ => println!("{}", to_json(&ast.compile(), args.indent)?),
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::debug!(%err, "parse failed");
            eprintln!("error: {err}");
            Ok(ExitCode::FAILURE)
        }
    }
}
