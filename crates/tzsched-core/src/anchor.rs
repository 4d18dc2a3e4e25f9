//! DST transition anchors.
//!
//! A transition such as "02:00 on the 1st Sunday of October" is expressed
//! in local time. Publishing it in UTC can push the hour outside the day;
//! when that also pushes a 1st or last occurrence across a month edge, a
//! second "overlap" anchor in the adjacent month is needed so the schedule
//! switch is not missed in years where the occurrence falls near the edge.
//!
//! Only the hour is offset. Minute-level zone offsets are not supported.

use crate::models::{
    Anchor, AnchorDate, LAST_OCCURRENCE, LAST_WEEK, OVERLAP_NEXT_MONTH, OVERLAP_PREV_MONTH,
    TransitionRule,
};

/// Primary anchor of a transition plus its optional overlap anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTransition {
    pub anchor: Anchor,
    pub overlap: Option<Anchor>,
}

/// Resolve a transition rule against the UTC offset in force before it.
///
/// # Examples
///
/// ```
/// use tzsched_core::anchor::resolve;
/// use tzsched_core::models::{DayCode, TimeOfDay, TransitionRule};
///
/// let rule = TransitionRule {
///     month: 3,
///     week: 2,
///     weekday: DayCode::Su,
///     time: TimeOfDay { hour: 2, minute: 0 },
///     is_fixed_date: false,
/// };
/// let resolved = resolve(&rule, -5);
///
/// assert_eq!(resolved.anchor.hour, Some(7));
/// assert_eq!(resolved.anchor.date.to_string(), "Su2");
/// assert!(resolved.overlap.is_none());
/// ```
pub fn resolve(transition: &TransitionRule, offset_hours: i32) -> ResolvedTransition {
    let hour = transition.time.hour as i32 - offset_hours;
    let minute = transition.time.minute;

    let ordinal = if transition.week == LAST_WEEK {
        LAST_OCCURRENCE
    } else {
        transition.week as i8
    };

    let anchor = Anchor {
        month: transition.month,
        date: AnchorDate::Weekday {
            day: transition.weekday,
            ordinal,
        },
        hour: Some(hour),
        minute: Some(minute),
    };

    let overlap_at = |month: u32, ordinal: i8| Anchor {
        month,
        date: AnchorDate::Weekday {
            day: transition.weekday,
            ordinal,
        },
        ..anchor
    };

    let overlap = if hour < 0 && transition.week == 1 {
        Some(overlap_at(prev_month(transition.month), OVERLAP_PREV_MONTH))
    } else if hour > 23 && transition.week == LAST_WEEK {
        Some(overlap_at(next_month(transition.month), OVERLAP_NEXT_MONTH))
    } else {
        None
    };

    ResolvedTransition { anchor, overlap }
}

fn prev_month(month: u32) -> u32 {
    if month == 1 { 12 } else { month - 1 }
}

fn next_month(month: u32) -> u32 {
    if month == 12 { 1 } else { month + 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayCode, TimeOfDay};

    fn rule(month: u32, week: u8, hour: u32) -> TransitionRule {
        TransitionRule {
            month,
            week,
            weekday: DayCode::Su,
            time: TimeOfDay { hour, minute: 0 },
            is_fixed_date: false,
        }
    }

    #[test]
    fn second_week_west_of_utc_has_no_overlap() {
        let resolved = resolve(&rule(3, 2, 2), -5);

        assert_eq!(resolved.anchor.hour, Some(7));
        assert_eq!(resolved.anchor.minute, Some(0));
        assert_eq!(resolved.anchor.month_key(), "03");
        assert_eq!(resolved.anchor.date.to_string(), "Su2");
        assert!(resolved.overlap.is_none());
    }

    #[test]
    fn first_week_pushed_before_midnight_overlaps_previous_month() {
        let resolved = resolve(&rule(3, 1, 2), 5);

        assert_eq!(resolved.anchor.hour, Some(-3));
        assert_eq!(resolved.anchor.date.to_string(), "Su1");

        let overlap = resolved.overlap.unwrap();
        assert_eq!(overlap.month_key(), "02");
        assert_eq!(overlap.date.to_string(), "Su6");
        assert_eq!(overlap.hour, Some(-3));
        assert_eq!(overlap.minute, Some(0));
    }

    #[test]
    fn last_week_pushed_past_midnight_overlaps_next_month() {
        let resolved = resolve(&rule(10, 5, 23), -3);

        assert_eq!(resolved.anchor.hour, Some(26));
        assert_eq!(resolved.anchor.date.to_string(), "Su-1");

        let overlap = resolved.overlap.unwrap();
        assert_eq!(overlap.month_key(), "11");
        assert_eq!(overlap.date.to_string(), "Su0");
    }

    #[test]
    fn overlap_wraps_year_edges() {
        let january = resolve(&rule(1, 1, 1), 3).overlap.unwrap();
        assert_eq!(january.month_key(), "12");

        let december = resolve(&rule(12, 5, 22), -4).overlap.unwrap();
        assert_eq!(december.month_key(), "01");
    }

    #[test]
    fn negative_hour_without_first_week_has_no_overlap() {
        let resolved = resolve(&rule(3, 5, 1), 2);

        assert_eq!(resolved.anchor.hour, Some(-1));
        assert_eq!(resolved.anchor.date.to_string(), "Su-1");
        assert!(resolved.overlap.is_none());
    }

    #[test]
    fn late_hour_without_last_week_has_no_overlap() {
        let resolved = resolve(&rule(11, 1, 2), -23);

        assert_eq!(resolved.anchor.hour, Some(25));
        assert!(resolved.overlap.is_none());
    }

    #[test]
    fn minutes_pass_through() {
        let mut transition = rule(4, 1, 2);
        transition.time.minute = 30;
        let resolved = resolve(&transition, 1);

        assert_eq!(resolved.anchor.hour, Some(1));
        assert_eq!(resolved.anchor.minute, Some(30));
    }
}
