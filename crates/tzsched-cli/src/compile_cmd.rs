use std::process::ExitCode;

use tracing::info;
use tzsched_core::build_schedule_set;

use crate::cli::CompileArgs;
use crate::error::{CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{load_schedule, print_json, print_regime_text, resolve_zone};

pub fn run_compile(args: CompileArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let config = load_schedule(&args.schedule)?;
    let zone = resolve_zone(
        args.tz.as_deref(),
        config.timezone.as_deref(),
        args.year,
        config.year,
    )?;

    let set = build_schedule_set(&config.weekly, &zone.rule);
    info!(tz = %zone.tz, year = zone.year, regimes = set.len(), "compiled schedule");

    match output_format {
        OutputFormat::Json => print_json(&set)?,
        OutputFormat::Text => {
            println!("Timezone: {} ({})", zone.tz, zone.year);
            for regime in &set {
                print_regime_text(regime);
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}
