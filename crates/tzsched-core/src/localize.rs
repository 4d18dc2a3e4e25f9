//! Conversion of published regimes back to a local weekly schedule.

use tracing::debug;

use crate::models::{RegimeKind, ScheduleRegime, WeeklyLocalSchedule, ZoneRule};
use crate::shift::shift_utc;

/// Recover the local weekly schedule from published regimes.
///
/// Picks the `DST` regime while daylight time is active and the `Regular`
/// regime otherwise, falling back to the first regime. The chosen schedule
/// is shifted back by the matching offset and the first interval of each
/// day is kept.
pub fn localize(regimes: &[ScheduleRegime], zone: &ZoneRule, dst_active: bool) -> WeeklyLocalSchedule {
    let dst_active = dst_active && matches!(zone, ZoneRule::Daylight(_));
    let wanted = if dst_active {
        RegimeKind::Dst
    } else {
        RegimeKind::Regular
    };

    let Some(regime) = regimes
        .iter()
        .find(|regime| regime.kind == wanted)
        .or_else(|| regimes.first())
    else {
        return WeeklyLocalSchedule::new();
    };

    let offset_hours = zone.offset_hours(dst_active);
    debug!(kind = %regime.kind, offset_hours, "localizing published regime");

    let local = shift_utc(&regime.schedule, -offset_hours);
    let mut weekly = WeeklyLocalSchedule::new();
    for (day, slots) in local.iter() {
        weekly.set(day, slots.first().copied());
    }
    weekly
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build_schedule_set;
    use crate::models::{DayCode, DstRule, Interval, TimeOfDay, TransitionRule};

    fn berlin() -> ZoneRule {
        let transition = |month, hour| TransitionRule {
            month,
            week: 5,
            weekday: DayCode::Su,
            time: TimeOfDay { hour, minute: 0 },
            is_fixed_date: false,
        };
        ZoneRule::Daylight(DstRule {
            base_offset_hours: 1,
            daylight_delta_hours: 1,
            transition_start: transition(3, 2),
            transition_end: transition(10, 3),
        })
    }

    fn weekly() -> WeeklyLocalSchedule {
        WeeklyLocalSchedule::new()
            .with(DayCode::Mo, 1, 6)
            .and_then(|w| w.with(DayCode::We, 9, 17))
            .and_then(|w| w.with(DayCode::Su, 20, 24))
            .unwrap()
    }

    #[test]
    fn round_trips_through_both_regimes() {
        let zone = berlin();
        let set = build_schedule_set(&weekly(), &zone);

        assert_eq!(localize(set.regimes(), &zone, true), weekly());
        assert_eq!(localize(set.regimes(), &zone, false), weekly());
    }

    #[test]
    fn picks_regime_matching_dst_state() {
        let zone = berlin();
        let set = build_schedule_set(&weekly(), &zone);
        let regular_only: Vec<_> = set
            .iter()
            .filter(|r| r.kind == RegimeKind::Regular)
            .cloned()
            .collect();

        // Only the regular regime is available, so it is read back with the
        // daylight offset and comes out one hour late.
        let skewed = localize(&regular_only, &zone, true);
        assert_eq!(skewed.get(DayCode::We), Some(Interval::new(10, 18)));
    }

    #[test]
    fn fixed_zone_ignores_dst_flag() {
        let zone = ZoneRule::Fixed { offset_hours: -7 };
        let set = build_schedule_set(&weekly(), &zone);

        assert_eq!(localize(set.regimes(), &zone, true), weekly());
    }

    #[test]
    fn empty_input_gives_closed_week() {
        assert!(localize(&[], &berlin(), false).is_empty());
    }
}
