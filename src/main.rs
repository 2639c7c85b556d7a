use ccslayout::cli::{self, CheckOptions, CheckResult, CliError};
use clap::{Parser as ClapParser, Subcommand};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "ccslayout")]
#[command(about = "ccslayout - Parse layout rules like `width += 25%` into rule trees")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a rule and print its canonical form or tree
    Check {
        /// The rule to parse (reads from stdin if not provided)
        rule: Option<String>,

        /// Print the tree as JSON
        #[arg(short, long)]
        json: bool,

        /// Pretty-print the JSON tree
        #[arg(short, long)]
        pretty: bool,

        /// Log every shifted token and built node
        #[arg(long)]
        trace: bool,

        /// Reject rules longer than this many bytes
        #[arg(long)]
        max_len: Option<usize>,
    },

    /// List the tokens a rule is classified into
    Tokens {
        /// The rule to classify (reads from stdin if not provided)
        rule: Option<String>,
    },
}

fn init_logging(trace: bool) {
    let filter = if trace {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let trace = matches!(cli.command, Commands::Check { trace: true, .. });
    init_logging(trace);

    let result = match cli.command {
        Commands::Check {
            rule,
            json,
            pretty,
            trace,
            max_len,
        } => run_check(rule, json, pretty, trace, max_len),
        Commands::Tokens { rule } => run_tokens(rule),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_rule(rule: Option<String>) -> Result<Option<String>, CliError> {
    match rule {
        Some(s) => Ok(Some(s)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(Some(buffer))
        }
        None => Ok(None),
    }
}

fn run_check(
    rule: Option<String>,
    json: bool,
    pretty: bool,
    trace: bool,
    max_len: Option<usize>,
) -> Result<(), CliError> {
    let options = CheckOptions {
        rule: read_rule(rule)?,
        json,
        pretty,
        trace,
        max_len,
    };

    match cli::execute_check(&options)? {
        CheckResult::Canonical(text) => println!("{}", text),
        CheckResult::Json(json) => println!("{}", json),
    }
    Ok(())
}

fn run_tokens(rule: Option<String>) -> Result<(), CliError> {
    let rule = read_rule(rule)?.ok_or(CliError::NoInput)?;
    for line in cli::execute_tokens(&rule)? {
        println!("{}", line);
    }
    Ok(())
}
