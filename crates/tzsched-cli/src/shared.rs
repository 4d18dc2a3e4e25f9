use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Read};

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tzsched_core::{ScheduleRegime, WeeklyLocalSchedule, WeeklyUtcSchedule, ZoneRule};

use crate::error::{CliError, CliResult};

/// Schedule file accepted by `compile` and `plan`.
#[derive(Debug, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    pub weekly: WeeklyLocalSchedule,
}

/// A timezone together with the rule derived for one year.
#[derive(Debug)]
pub struct ResolvedZone {
    pub tz: Tz,
    pub year: i32,
    pub rule: ZoneRule,
}

pub fn read_input(path: &str) -> CliResult<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| CliError::runtime(format!("Failed to read stdin: {}", e)))?;
        return Ok(buf);
    }

    fs::read_to_string(path)
        .map_err(|e| CliError::runtime(format!("Failed to open file '{}': {}", path, e)))
}

pub fn parse_json<T: DeserializeOwned>(path: &str) -> CliResult<T> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw)
        .map_err(|e| CliError::input(format!("Invalid JSON in '{}': {}", path, e)))
}

pub fn load_schedule(path: &str) -> CliResult<ScheduleConfig> {
    parse_json(path)
}

pub fn load_published(path: &str) -> CliResult<Vec<ScheduleRegime>> {
    parse_json(path)
}

/// Resolve the zone from flags first, then the schedule file.
pub fn resolve_zone(
    tz_flag: Option<&str>,
    tz_file: Option<&str>,
    year_flag: Option<i32>,
    year_file: Option<i32>,
) -> CliResult<ResolvedZone> {
    let name = tz_flag.or(tz_file).ok_or_else(|| {
        CliError::input("No timezone given. Pass --tz or set \"timezone\" in the schedule file")
    })?;
    let tz = parse_tz_or_input_error(name)?;
    let year = year_flag
        .or(year_file)
        .unwrap_or_else(|| Utc::now().year());
    let rule = tzsched_core::tz::zone_rule(tz, year)?;

    Ok(ResolvedZone { tz, year, rule })
}

pub fn parse_tz_or_input_error(name: &str) -> CliResult<Tz> {
    tzsched_core::tz::parse_tz(name)
        .map_err(|e| CliError::input(format!("Invalid timezone '{}': {}", name, e)))
}

pub fn parse_rfc3339_to_utc(s: &str) -> CliResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CliError::input(format!("Failed to parse RFC3339 '{}': {}", s, e)))
}

/// Normalize month keys to the two-digit form, so `3` and `03` agree.
pub fn parse_known_months(values: &[String]) -> CliResult<BTreeSet<String>> {
    values
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| match s.parse::<u32>() {
            Ok(month @ 1..=12) => Ok(format!("{:02}", month)),
            _ => Err(CliError::input(format!(
                "Invalid month '{}'. Expected: 01..12",
                s
            ))),
        })
        .collect()
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::runtime(format!("Failed to serialize JSON: {}", e)))?;
    println!("{}", json);
    Ok(())
}

pub fn print_regime_text(regime: &ScheduleRegime) {
    let at = match (regime.anchor.hour, regime.anchor.minute) {
        (Some(hour), Some(minute)) => format!(" at {}:{:02} UTC", hour, minute),
        (Some(hour), None) => format!(" at {}:00 UTC", hour),
        _ => String::new(),
    };
    println!(
        "{} (month {}, date {}{})",
        regime.kind,
        regime.month_key(),
        regime.anchor.date,
        at
    );
    print_utc_week(&regime.schedule);
}

fn print_utc_week(schedule: &WeeklyUtcSchedule) {
    if schedule.is_empty() {
        println!("  closed all week");
        return;
    }
    for (day, slots) in schedule.iter() {
        let rendered: Vec<String> = slots.iter().map(ToString::to_string).collect();
        println!("  {}: {}", day, rendered.join(", "));
    }
}
