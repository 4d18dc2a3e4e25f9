//! Weekly interval shifting.
//!
//! Moves a weekly set of per-day intervals by a whole-hour UTC offset.
//! Slices that cross midnight are handed to the neighbouring day, with
//! Sunday and Monday treated as neighbours. Days are processed in week
//! order, so the result depends only on the input, never on map layout.

use std::collections::BTreeMap;

use tracing::trace;

use crate::models::{
    DayCode, DaySlots, HOURS_PER_DAY, Interval, WeeklyLocalSchedule, WeeklyUtcSchedule,
};

/// Convert a local weekly schedule to UTC.
///
/// `offset_hours` is the zone's UTC offset (e.g. `-5` for New York in
/// winter); each interval moves by `-offset_hours`.
///
/// # Examples
///
/// ```
/// use tzsched_core::models::{DayCode, Interval, WeeklyLocalSchedule};
/// use tzsched_core::shift::shift;
///
/// let weekly = WeeklyLocalSchedule::new().with(DayCode::Mo, 0, 5).unwrap();
/// let utc = shift(&weekly, 3);
///
/// assert_eq!(utc.day(DayCode::Su), &[Interval::new(21, 24)]);
/// assert_eq!(utc.day(DayCode::Mo), &[Interval::new(0, 2)]);
/// ```
pub fn shift(weekly: &WeeklyLocalSchedule, offset_hours: i32) -> WeeklyUtcSchedule {
    shift_entries(weekly.iter(), offset_hours)
}

/// Shift an already-compiled schedule, e.g. back to local time with the
/// negated offset.
pub fn shift_utc(schedule: &WeeklyUtcSchedule, offset_hours: i32) -> WeeklyUtcSchedule {
    shift_entries(
        schedule
            .iter()
            .flat_map(|(day, slots)| slots.iter().map(move |interval| (day, *interval))),
        offset_hours,
    )
}

fn shift_entries<I>(entries: I, offset_hours: i32) -> WeeklyUtcSchedule
where
    I: IntoIterator<Item = (DayCode, Interval)>,
{
    let mut days: BTreeMap<DayCode, DaySlots> = DayCode::ALL
        .into_iter()
        .map(|day| (day, DaySlots::new()))
        .collect();

    for (day, interval) in entries {
        let placement = place(interval, offset_hours);

        if let Some(slice) = placement.previous {
            slots_mut(&mut days, day.prev()).extend_latest(slice);
        }
        if let Some(slice) = placement.next {
            slots_mut(&mut days, day.next()).extend_earliest(slice);
        }
        match placement.current {
            Some(slice) => slots_mut(&mut days, day).insert_or_merge(slice),
            None => trace!(%day, %interval, offset_hours, "dropped degenerate slice"),
        }
    }

    WeeklyUtcSchedule::from_days(days)
}

fn slots_mut(days: &mut BTreeMap<DayCode, DaySlots>, day: DayCode) -> &mut DaySlots {
    days.entry(day).or_default()
}

/// Where the pieces of one shifted interval land.
#[derive(Debug, Default, PartialEq, Eq)]
struct Placement {
    previous: Option<Interval>,
    current: Option<Interval>,
    next: Option<Interval>,
}

fn place(interval: Interval, offset_hours: i32) -> Placement {
    let mut start = interval.start - offset_hours;
    let mut end = interval.end - offset_hours;
    let mut placement = Placement::default();

    if start < 0 {
        let prev_end = if end < 0 { HOURS_PER_DAY + end } else { HOURS_PER_DAY };
        placement.previous = non_degenerate(HOURS_PER_DAY + start, prev_end);
        start = 0;
        end = end.max(0);
    }

    if end > HOURS_PER_DAY {
        let next_start = if start > HOURS_PER_DAY {
            start - HOURS_PER_DAY
        } else {
            0
        };
        placement.next = non_degenerate(next_start, end - HOURS_PER_DAY);
        start = start.min(HOURS_PER_DAY);
        end = HOURS_PER_DAY;
    }

    placement.current = non_degenerate(start, end);
    placement
}

fn non_degenerate(start: i32, end: i32) -> Option<Interval> {
    (start < end).then_some(Interval::new(start, end))
}
