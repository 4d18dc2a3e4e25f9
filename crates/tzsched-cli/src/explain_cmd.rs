use std::process::ExitCode;

use chrono::{Datelike, Utc};
use serde::Serialize;
use tzsched_core::ZoneRule;
use tzsched_core::tz::zone_rule;

use crate::cli::ExplainArgs;
use crate::error::{CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{parse_tz_or_input_error, print_json};

#[derive(Debug, Serialize)]
struct ExplainResult {
    tz: String,
    year: i32,
    supports_dst: bool,
    rule: ZoneRule,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

pub fn run_explain(args: ExplainArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let tz = parse_tz_or_input_error(&args.tz)?;
    let year = args.year.unwrap_or_else(|| Utc::now().year());
    let rule = zone_rule(tz, year)?;

    let result = explain_rule(tz.to_string(), year, rule);

    match output_format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Text => {
            println!("Timezone: {} ({})", result.tz, result.year);
            match result.rule {
                ZoneRule::Fixed { offset_hours } => println!("UTC offset: {:+}h", offset_hours),
                ZoneRule::Daylight(rule) => {
                    println!("UTC offset: {:+}h", rule.base_offset_hours)
                }
            }
            println!(
                "Supports Daylight Saving Time: {}",
                if result.supports_dst { "Yes" } else { "No" }
            );
            if let Some(description) = result.description {
                println!("{}", description);
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

fn explain_rule(tz: String, year: i32, rule: ZoneRule) -> ExplainResult {
    let description = match &rule {
        ZoneRule::Fixed { .. } => None,
        ZoneRule::Daylight(dst) => Some(dst.describe()),
    };

    ExplainResult {
        tz,
        year,
        supports_dst: description.is_some(),
        rule,
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tzsched_core::tz::parse_tz;

    #[test]
    fn fixed_zone_has_no_description() {
        let result = explain_rule("Asia/Tokyo".into(), 2026, ZoneRule::Fixed { offset_hours: 9 });
        assert!(!result.supports_dst);
        assert!(result.description.is_none());
    }

    #[test]
    fn daylight_zone_is_described() {
        let rule = zone_rule(parse_tz("Europe/Berlin").unwrap(), 2026).unwrap();
        let result = explain_rule("Europe/Berlin".into(), 2026, rule);
        assert!(result.supports_dst);
        assert!(result.description.unwrap().contains("last Sunday of March"));
    }
}
