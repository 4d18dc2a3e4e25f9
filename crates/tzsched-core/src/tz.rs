//! Timezone handling utilities.
//!
//! This module parses IANA timezone names and derives the recurring DST
//! rule of a zone from its actual offset transitions. Zones the compiler
//! cannot express (fractional-hour offsets, fixed-date transitions,
//! irregular years) are rejected here, before any schedule is built.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Offset, TimeZone, Timelike, Utc};
use chrono_tz::{OffsetComponents, Tz, TzOffset};
use tracing::debug;

use crate::error::{Result, ScheduleError};
use crate::models::{DayCode, DstRule, LAST_WEEK, TimeOfDay, TransitionRule, ZoneRule};

const SECONDS_PER_HOUR: i64 = 3600;

/// Parse an IANA timezone name into a [`chrono_tz::Tz`].
///
/// # Examples
///
/// ```
/// use tzsched_core::tz::parse_tz;
///
/// let tz = parse_tz("Europe/Berlin").unwrap();
/// assert_eq!(tz.to_string(), "Europe/Berlin");
/// ```
pub fn parse_tz(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| ScheduleError::InvalidTimezone(name.to_string()))
}

/// Whether daylight saving time is in effect at `instant`.
///
/// Daylight time is any offset above the zone's standard offset for the
/// year, so zones whose database marks winter as the DST period
/// (Europe/Dublin) still report summer as daylight time.
pub fn is_dst_active(tz: Tz, instant: DateTime<Utc>) -> bool {
    let total = offset_at(tz, instant).fix().local_minus_utc();
    standard_offset(tz, instant.year()).is_some_and(|standard| total > standard)
}

/// Lowest offset in force at the start of January or July.
fn standard_offset(tz: Tz, year: i32) -> Option<i32> {
    [1, 7]
        .into_iter()
        .filter_map(|month| Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single())
        .map(|instant| offset_at(tz, instant).fix().local_minus_utc())
        .min()
}

/// Derive the offset rule a zone follows in `year`.
///
/// The weekday and week ordinal of each transition are confirmed against
/// `year + 1`; a transition that does not recur on the same weekday rule
/// is treated as fixed-date and rejected.
///
/// # Examples
///
/// ```
/// use tzsched_core::models::ZoneRule;
/// use tzsched_core::tz::{parse_tz, zone_rule};
///
/// let rule = zone_rule(parse_tz("Asia/Tokyo").unwrap(), 2026).unwrap();
/// assert_eq!(rule, ZoneRule::Fixed { offset_hours: 9 });
/// ```
pub fn zone_rule(tz: Tz, year: i32) -> Result<ZoneRule> {
    let Some(current) = daylight_pair(tz, year)? else {
        let offset = tz
            .offset_from_utc_datetime(&year_start(year)?.naive_utc())
            .fix()
            .local_minus_utc();
        let offset_hours = whole_hours(offset as i64, "base offset")?;
        debug!(%tz, year, offset_hours, "zone has no DST");
        return Ok(ZoneRule::Fixed { offset_hours });
    };
    let following = daylight_pair(tz, following_year(year)?)?;

    let base = current.end.after.base_utc_offset().num_seconds();
    let delta = current.start.after.dst_offset().num_seconds();

    let mut rule = DstRule {
        base_offset_hours: whole_hours(base, "base offset")?,
        daylight_delta_hours: whole_hours(delta, "DST delta")?,
        transition_start: confirm(
            current.start.observe(),
            following.as_ref().map(|pair| pair.start.observe()),
        ),
        transition_end: confirm(
            current.end.observe(),
            following.as_ref().map(|pair| pair.end.observe()),
        ),
    };
    if rule.daylight_delta_hours < 0 {
        // Negative DST: the higher offset is daylight time.
        rule.base_offset_hours += rule.daylight_delta_hours;
        rule.daylight_delta_hours = -rule.daylight_delta_hours;
        std::mem::swap(&mut rule.transition_start, &mut rule.transition_end);
    }
    rule.check_supported()?;

    debug!(%tz, year, rule = %rule.describe(), "derived DST rule");
    Ok(ZoneRule::Daylight(rule))
}

fn whole_hours(seconds: i64, what: &str) -> Result<i32> {
    if seconds % SECONDS_PER_HOUR != 0 {
        return Err(ScheduleError::InvalidTimezoneOffset(format!(
            "{} of {} seconds is not a whole number of hours",
            what, seconds
        )));
    }
    i32::try_from(seconds / SECONDS_PER_HOUR).map_err(|_| {
        ScheduleError::InvalidTimezoneOffset(format!("{} of {} seconds is out of range", what, seconds))
    })
}

fn year_out_of_range(year: i32) -> ScheduleError {
    ScheduleError::InvalidTimezoneOffset(format!("Year {} out of range", year))
}

fn following_year(year: i32) -> Result<i32> {
    year.checked_add(1).ok_or_else(|| year_out_of_range(year))
}

fn year_start(year: i32) -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| year_out_of_range(year))
}

/// An offset change observed in the zone's data.
#[derive(Debug, Clone, Copy)]
struct Transition {
    /// Offset in force just before the change.
    before: FixedOffset,
    /// Offset in force from the change on.
    after: TzOffset,
    instant: DateTime<Utc>,
}

/// Calendar position of one transition in one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Observation {
    month: u32,
    weekday: DayCode,
    ordinal: u8,
    is_last: bool,
    time: TimeOfDay,
}

impl Transition {
    /// Locate the transition on the local wall clock in force before it.
    fn observe(&self) -> Observation {
        let local = self.instant.naive_utc() + Duration::seconds(self.before.local_minus_utc() as i64);
        let date = local.date();
        let day = date.day();

        Observation {
            month: date.month(),
            weekday: date.weekday().into(),
            ordinal: ((day - 1) / 7 + 1) as u8,
            is_last: day + 7 > days_in_month(date),
            time: TimeOfDay {
                hour: local.hour(),
                minute: local.minute(),
            },
        }
    }
}

/// Transition into and out of DST within one year.
struct DaylightPair {
    start: Transition,
    end: Transition,
}

fn daylight_pair(tz: Tz, year: i32) -> Result<Option<DaylightPair>> {
    let transitions = transitions_in_year(tz, year)?;
    if transitions.is_empty() {
        return Ok(None);
    }

    let (starts, ends): (Vec<Transition>, Vec<Transition>) = transitions
        .into_iter()
        .partition(|t| t.after.dst_offset().num_seconds() != 0);

    match (starts.as_slice(), ends.as_slice()) {
        ([start], [end]) => Ok(Some(DaylightPair {
            start: *start,
            end: *end,
        })),
        _ => Err(ScheduleError::InvalidTimezoneOffset(format!(
            "{} has {} DST starts and {} DST ends in {}",
            tz,
            starts.len(),
            ends.len(),
            year
        ))),
    }
}

/// Scan a year hour by hour, then minute by minute around each change.
fn transitions_in_year(tz: Tz, year: i32) -> Result<Vec<Transition>> {
    let end = year_start(following_year(year)?)?;
    let mut cursor = year_start(year)?;
    let mut current = offset_at(tz, cursor).fix();
    let mut found = Vec::new();

    while cursor < end {
        let next = cursor + Duration::hours(1);
        if offset_at(tz, next).fix() != current {
            let mut instant = cursor;
            while offset_at(tz, instant).fix() == current {
                instant += Duration::minutes(1);
            }
            let after = offset_at(tz, instant);
            found.push(Transition {
                before: current,
                after,
                instant,
            });
            current = after.fix();
        }
        cursor = next;
    }

    Ok(found)
}

fn offset_at(tz: Tz, instant: DateTime<Utc>) -> TzOffset {
    tz.offset_from_utc_datetime(&instant.naive_utc())
}

fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(31, |last| last.day())
}

/// Turn observations from two consecutive years into a recurring rule.
fn confirm(current: Observation, following: Option<Observation>) -> TransitionRule {
    let mut rule = TransitionRule {
        month: current.month,
        week: if current.is_last { LAST_WEEK } else { current.ordinal },
        weekday: current.weekday,
        time: current.time,
        is_fixed_date: false,
    };

    let Some(following) = following else {
        return rule;
    };

    if current.is_last && following.is_last {
        rule.week = LAST_WEEK;
    } else if current.ordinal == following.ordinal {
        rule.week = current.ordinal;
    } else {
        rule.is_fixed_date = true;
    }
    if current.month != following.month
        || current.weekday != following.weekday
        || current.time != following.time
    {
        rule.is_fixed_date = true;
    }

    rule
}
