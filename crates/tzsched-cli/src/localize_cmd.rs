use std::process::ExitCode;

use chrono::{Datelike, Utc};
use serde::Serialize;
use tzsched_core::tz::{is_dst_active, zone_rule};
use tzsched_core::{DayCode, WeeklyLocalSchedule, localize};

use crate::cli::LocalizeArgs;
use crate::error::{CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{load_published, parse_rfc3339_to_utc, parse_tz_or_input_error, print_json};

#[derive(Debug, Serialize)]
struct LocalizeOutput {
    tz: String,
    dst_active: bool,
    weekly: WeeklyLocalSchedule,
}

pub fn run_localize(args: LocalizeArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let tz = parse_tz_or_input_error(&args.tz)?;
    let at = match args.at.as_deref() {
        Some(s) => parse_rfc3339_to_utc(s)?,
        None => Utc::now(),
    };
    let regimes = load_published(&args.published)?;

    let rule = zone_rule(tz, at.year())?;
    let dst_active = is_dst_active(tz, at);
    let weekly = localize(&regimes, &rule, dst_active);

    match output_format {
        OutputFormat::Json => print_json(&LocalizeOutput {
            tz: tz.to_string(),
            dst_active,
            weekly,
        })?,
        OutputFormat::Text => {
            println!("Timezone: {}", tz);
            println!("DST active: {}", if dst_active { "yes" } else { "no" });
            for day in DayCode::ALL {
                match weekly.get(day) {
                    Some(interval) => println!("{}: {}", day.name(), interval),
                    None => println!("{}: closed", day.name()),
                }
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}
