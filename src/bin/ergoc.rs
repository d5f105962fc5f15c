//! # ergoc
//!
//! CLI front end driving the lexer and parser: `check` runs both phases and
//! reports the first diagnostic (if any); `tokens` dumps the raw token
//! stream for debugging. Mirrors the teacher's `why` binary's `clap` +
//! `simple_logger`/`LogLevel` shape.

use std::{fs, path::PathBuf, process::ExitCode};

use bumpalo::Bump;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{error, info};
use serde::Serialize;

use ergo_lang::{diagnostic::Diagnostic, lexer, parser};

#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Specify the log level of the compiler.
    #[arg(value_enum, short, long, default_value_t = LogLevel::default())]
    verbosity: LogLevel,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Lex and parse a source file, reporting the first diagnostic found.
    Check(FileArgs),
    /// Lex a source file and dump its token stream.
    Tokens(FileArgs),
}

#[derive(Args, Debug, Clone)]
struct FileArgs {
    /// The path to the ergo source file.
    #[arg(index = 1)]
    file: PathBuf,

    /// Emit a diagnostic as a single JSON object instead of plain text.
    #[arg(long)]
    json: bool,
}

#[derive(ValueEnum, Clone, Default, Debug)]
enum LogLevel {
    #[default]
    #[value(alias("0"))]
    Error,
    #[value(alias("1"))]
    Warn,
    #[value(alias("2"))]
    Info,
    #[value(alias("3"))]
    Debug,
    #[value(alias("4"))]
    Trace,
}

impl From<&LogLevel> for log::Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    path: &'a str,
    line: usize,
    col: usize,
    message: &'a str,
}

fn report(diag: &Diagnostic, json: bool) {
    let Some(msg) = &diag.message else { return };
    if json {
        let payload = JsonDiagnostic { path: diag.path, line: msg.position.line, col: msg.position.col, message: msg.text };
        println!("{}", serde_json::to_string(&payload).expect("diagnostic payload is always serializable"));
    } else {
        println!("{diag}");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    simple_logger::init_with_level((&cli.verbosity).into()).expect("logger is only initialized once");

    match cli.command {
        Commands::Check(args) => run_check(args),
        Commands::Tokens(args) => run_tokens(args),
    }
}

fn run_check(args: FileArgs) -> ExitCode {
    let raw = match fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            error!("{}: {e}", args.file.display());
            return ExitCode::FAILURE;
        }
    };
    let arena = Bump::new();
    let path = arena.alloc_str(&args.file.display().to_string());
    let source = arena.alloc_str(&raw);
    let mut diag = Diagnostic::new(path);

    let Some(tokens) = lexer::lex(source, &arena, &mut diag) else {
        report(&diag, args.json);
        return ExitCode::FAILURE;
    };

    match parser::parse_module(&tokens, path, &arena, &mut diag) {
        Some(module) => {
            info!("parsed {} declarations", module.decls.len());
            ExitCode::SUCCESS
        }
        None => {
            report(&diag, args.json);
            ExitCode::FAILURE
        }
    }
}

fn run_tokens(args: FileArgs) -> ExitCode {
    let raw = match fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            error!("{}: {e}", args.file.display());
            return ExitCode::FAILURE;
        }
    };
    let arena = Bump::new();
    let path = arena.alloc_str(&args.file.display().to_string());
    let source = arena.alloc_str(&raw);
    let mut diag = Diagnostic::new(path);

    match lexer::lex(source, &arena, &mut diag) {
        Some(tokens) => {
            for tok in &tokens {
                println!("{}:{} {:?}", tok.line, tok.col, tok.kind);
            }
            ExitCode::SUCCESS
        }
        None => {
            report(&diag, args.json);
            ExitCode::FAILURE
        }
    }
}
