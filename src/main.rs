//! Diagnostic front end for the term engine.
use std::io::IsTerminal;
use std::process::ExitCode;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use plterm::{ParseError, TermEnv, Tokenizer, report};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

/// Prolog term toolkit
#[derive(Parser, Debug)]
#[clap(name = "plterm", version)]
struct Cli {
  /// Enable debug logging (repeat for trace logging)
  #[clap(short = 'v', long, global = true, action = clap::ArgAction::Count)]
  debug: u8,
  #[clap(subcommand)]
  cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Print the tokens of a file, one per line
  Tokenize {
    /// Sets the input file
    input: String,
  },
  /// Parse a file and print each clause back
  Parse {
    /// Sets the input file
    input: String,
  },
  /// Unify the first two clauses of a file
  Unify {
    /// Sets the input file
    input: String,
  },
}

fn print_error(text: &str, input: &str, e: &ParseError) -> ExitCode {
  eprintln!("{}", report::render(text, input, e, std::io::stderr().is_terminal()));
  ExitCode::FAILURE
}

fn main() -> std::io::Result<ExitCode> {
  let cli = Cli::parse();
  let level = match cli.debug {
    0 => LevelFilter::Warn,
    1 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  };
  let _ = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto);
  match cli.cmd {
    Command::Tokenize { input } => {
      let text = std::fs::read_to_string(&input)?;
      for tok in Tokenizer::new(&text) {
        match tok {
          Ok(tok) => println!("{}", tok.str()),
          Err(e) => {
            eprintln!("{input}: {e}");
            return Ok(ExitCode::FAILURE)
          }
        }
      }
    }
    Command::Parse { input } => {
      let text = std::fs::read_to_string(&input)?;
      let mut env = TermEnv::new();
      let clauses = match env.parse_all(&text) {
        Ok(clauses) => clauses,
        Err(e) => return Ok(print_error(&text, &input, &e)),
      };
      for t in clauses {
        println!("{}", env.to_clause(t))
      }
      log::info!("{}", env.status());
    }
    Command::Unify { input } => {
      let text = std::fs::read_to_string(&input)?;
      let mut env = TermEnv::new();
      let clauses = match env.parse_all(&text) {
        Ok(clauses) => clauses,
        Err(e) => return Ok(print_error(&text, &input, &e)),
      };
      let &[a, b, ..] = &clauses[..] else {
        eprintln!("{input}: expected at least two clauses");
        return Ok(ExitCode::FAILURE)
      };
      if env.unify(a, b) {
        println!("yes: {}", env.to_string(a));
      } else {
        println!("no");
      }
      println!("{}", env.status());
    }
  }
  Ok(ExitCode::SUCCESS)
}
