//! Quoin CLI
//!
//! Two subcommands mirror the two operations of the engine: `solve` runs
//! an optimization request against a template, `template` prints the
//! parsed rate card. The structured JSON response goes to stdout;
//! diagnostics and the optional receipt go to stderr, so the result
//! stream is always parseable on its own.

use std::{
    error::Error,
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quoin::prelude::*;

/// Budget-constrained tier allocation over a spec template
#[derive(Debug, Parser)]
#[command(name = "quoin", version, about)]
struct Cli {
    /// Increase diagnostic verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve an optimization request against a template
    Solve {
        /// Path to the template CSV
        #[arg(short, long)]
        template: PathBuf,

        /// Path to the request JSON; reads stdin when omitted
        #[arg(short, long)]
        request: Option<PathBuf>,

        /// Also write a human-readable receipt to stderr
        #[arg(long)]
        receipt: bool,
    },

    /// Print the parsed template as JSON
    Template {
        /// Path to the template CSV
        #[arg(short, long)]
        template: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    match cli.command {
        Command::Solve {
            template,
            request,
            receipt,
        } => solve(&template, request.as_deref(), receipt),
        Command::Template { template } => print_template(&template),
    }
}

fn solve(
    template_path: &Path,
    request_path: Option<&Path>,
    receipt: bool,
) -> Result<ExitCode, Box<dyn Error>> {
    let template = Template::from_path(template_path)?;
    let request = OptimizeRequest::from_json(&read_request(request_path)?)?;

    // Invalid input is reported as a structured error payload too, but
    // unlike a solver outcome it exits non-zero.
    let categories = match categories_for(&template, &request) {
        Ok(categories) => categories,
        Err(err) => {
            write_response(&OptimizeResponse::Error {
                error: err.to_string(),
            })?;

            return Ok(ExitCode::FAILURE);
        }
    };

    let mut observer = TracingObserver;
    let outcome = DpSolver::solve_with_observer(&categories, request.budget, &mut observer);

    if receipt {
        if let Ok(solution) = &outcome {
            Receipt::new(&categories, solution, request.budget).write_to(io::stderr().lock())?;
        }
    }

    // Pre-check and solver failures are part of the response contract, so
    // they still exit zero with an error payload.
    write_response(&OptimizeResponse::from_outcome(&outcome))?;

    Ok(ExitCode::SUCCESS)
}

fn print_template(template_path: &Path) -> Result<ExitCode, Box<dyn Error>> {
    let template = Template::from_path(template_path)?;

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &template)?;
    writeln!(stdout)?;

    Ok(ExitCode::SUCCESS)
}

fn write_response(response: &OptimizeResponse) -> Result<(), Box<dyn Error>> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;

    Ok(())
}

fn read_request(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;

            Ok(buffer)
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "quoin=debug",
        _ => "quoin=trace",
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_err| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
