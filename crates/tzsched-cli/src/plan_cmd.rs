use std::collections::BTreeSet;
use std::process::ExitCode;

use serde::Serialize;
use tzsched_core::{ScheduleSession, ScheduleSet, build_schedule_set};

use crate::cli::PlanArgs;
use crate::error::{CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{
    load_schedule, parse_known_months, print_json, print_regime_text, resolve_zone,
};

#[derive(Debug, Serialize)]
struct PlanOutput<'a> {
    publish: &'a ScheduleSet,
    retract: &'a BTreeSet<String>,
    known_after: BTreeSet<String>,
}

pub fn run_plan(args: PlanArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let config = load_schedule(&args.schedule)?;
    let zone = resolve_zone(
        args.tz.as_deref(),
        config.timezone.as_deref(),
        args.year,
        config.year,
    )?;
    let known = parse_known_months(&args.known)?;

    let set = build_schedule_set(&config.weekly, &zone.rule);
    let session = ScheduleSession::new(known);
    let plan = session.plan(&set);

    match output_format {
        OutputFormat::Json => print_json(&PlanOutput {
            publish: &plan.to_publish,
            retract: &plan.to_retract,
            known_after: set.months(),
        })?,
        OutputFormat::Text => {
            println!("Publish {} regime(s):", plan.to_publish.len());
            for regime in &plan.to_publish {
                print_regime_text(regime);
            }
            if plan.to_retract.is_empty() {
                println!("Retract: none");
            } else {
                let months: Vec<&str> = plan.to_retract.iter().map(String::as_str).collect();
                println!("Retract: {}", months.join(", "));
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}
