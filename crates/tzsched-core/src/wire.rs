//! Wire records exchanged with the schedule API.
//!
//! A regime travels as
//! `{description, month: "MM", dates: [{date, hour?, minute?, schedule}]}`.
//! The API allows several `dates` per record; the compiler always emits
//! exactly one, and reads back the first.

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::models::{Anchor, AnchorDate, RegimeKind, ScheduleRegime, WeeklyUtcSchedule};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeRecord {
    pub description: RegimeKind,
    pub month: String,
    pub dates: Vec<DateEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateEntry {
    pub date: AnchorDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute: Option<u32>,
    pub schedule: WeeklyUtcSchedule,
}

impl From<ScheduleRegime> for RegimeRecord {
    fn from(regime: ScheduleRegime) -> Self {
        RegimeRecord {
            description: regime.kind,
            month: regime.anchor.month_key(),
            dates: vec![DateEntry {
                date: regime.anchor.date,
                hour: regime.anchor.hour,
                minute: regime.anchor.minute,
                schedule: regime.schedule,
            }],
        }
    }
}

impl TryFrom<RegimeRecord> for ScheduleRegime {
    type Error = ScheduleError;

    fn try_from(record: RegimeRecord) -> Result<Self, Self::Error> {
        let month = record
            .month
            .parse::<u32>()
            .ok()
            .filter(|m| (1..=12).contains(m))
            .ok_or_else(|| {
                ScheduleError::ParseError(format!("Invalid month: '{}'", record.month))
            })?;
        let entry = record.dates.into_iter().next().ok_or_else(|| {
            ScheduleError::ParseError(format!(
                "Regime '{}' for month {} has no dates",
                record.description, record.month
            ))
        })?;

        Ok(ScheduleRegime {
            kind: record.description,
            anchor: Anchor {
                month,
                date: entry.date,
                hour: entry.hour,
                minute: entry.minute,
            },
            schedule: entry.schedule,
        })
    }
}
