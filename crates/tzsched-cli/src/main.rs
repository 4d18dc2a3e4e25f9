use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod compile_cmd;
mod error;
mod explain_cmd;
mod localize_cmd;
mod plan_cmd;
mod shared;

use cli::{Cli, Commands};
use compile_cmd::run_compile;
use error::{CliResult, OutputFormat, output_format_hint, parse_output_format, render_error};
use explain_cmd::run_explain;
use localize_cmd::run_localize;
use plan_cmd::run_plan;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Compile(args) => dispatch(&args.output_format.clone(), |format| {
            run_compile(args, format)
        }),
        Commands::Plan(args) => {
            dispatch(&args.output_format.clone(), |format| run_plan(args, format))
        }
        Commands::Localize(args) => dispatch(&args.output_format.clone(), |format| {
            run_localize(args, format)
        }),
        Commands::Explain(args) => dispatch(&args.output_format.clone(), |format| {
            run_explain(args, format)
        }),
    }
}

fn dispatch<F>(raw_format: &str, run: F) -> ExitCode
where
    F: FnOnce(OutputFormat) -> CliResult<ExitCode>,
{
    let fallback = output_format_hint(raw_format);
    let output_format = match parse_output_format(raw_format) {
        Ok(format) => format,
        Err(err) => return render_error(&err, fallback),
    };

    match run(output_format) {
        Ok(code) => code,
        Err(err) => render_error(&err, output_format),
    }
}

/// Logs go to stderr so JSON on stdout stays clean. `RUST_LOG` wins over
/// `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
