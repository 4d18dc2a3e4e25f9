//! Schedule set construction.
//!
//! Combines interval shifting and transition anchors into the full list of
//! regimes published for one zone and weekly configuration.

use tracing::debug;

use crate::anchor::resolve;
use crate::models::{
    Anchor, RegimeKind, ScheduleRegime, ScheduleSet, WeeklyLocalSchedule, WeeklyUtcSchedule,
    ZoneRule,
};
use crate::shift::shift;

/// Build every regime for a weekly schedule in the given zone.
///
/// Zones without DST get a single `Regular` regime anchored on January 1st.
/// Zones with DST get, in order: `DST`, optional `DST - overlap`, `Regular`,
/// optional `Regular - overlap`. Overlap regimes repeat the schedule of
/// their primary regime and are kept even though the content is identical.
///
/// # Examples
///
/// ```
/// use tzsched_core::build::build_schedule_set;
/// use tzsched_core::models::{DayCode, WeeklyLocalSchedule, ZoneRule};
///
/// let weekly = WeeklyLocalSchedule::new().with(DayCode::Mo, 9, 17).unwrap();
/// let set = build_schedule_set(&weekly, &ZoneRule::Fixed { offset_hours: 9 });
///
/// assert_eq!(set.len(), 1);
/// assert_eq!(set.regimes()[0].month_key(), "01");
/// ```
pub fn build_schedule_set(weekly: &WeeklyLocalSchedule, zone: &ZoneRule) -> ScheduleSet {
    let rule = match zone {
        ZoneRule::Fixed { offset_hours } => {
            debug!(offset_hours, "building single regular regime");
            return ScheduleSet::new(vec![ScheduleRegime {
                kind: RegimeKind::Regular,
                anchor: Anchor::year_start(),
                schedule: shift(weekly, *offset_hours),
            }]);
        }
        ZoneRule::Daylight(rule) => rule,
    };

    let mut regimes = Vec::with_capacity(4);

    let daylight = resolve(&rule.transition_start, rule.base_offset_hours);
    let daylight_schedule = shift(weekly, rule.daylight_offset_hours());
    push_with_overlap(
        &mut regimes,
        RegimeKind::Dst,
        RegimeKind::DstOverlap,
        daylight.anchor,
        daylight.overlap,
        &daylight_schedule,
    );

    let regular = resolve(&rule.transition_end, rule.daylight_offset_hours());
    let regular_schedule = shift(weekly, rule.base_offset_hours);
    push_with_overlap(
        &mut regimes,
        RegimeKind::Regular,
        RegimeKind::RegularOverlap,
        regular.anchor,
        regular.overlap,
        &regular_schedule,
    );

    debug!(
        regimes = regimes.len(),
        base_offset = rule.base_offset_hours,
        daylight_offset = rule.daylight_offset_hours(),
        "built daylight schedule set"
    );

    ScheduleSet::new(regimes)
}

fn push_with_overlap(
    regimes: &mut Vec<ScheduleRegime>,
    kind: RegimeKind,
    overlap_kind: RegimeKind,
    anchor: Anchor,
    overlap: Option<Anchor>,
    schedule: &WeeklyUtcSchedule,
) {
    regimes.push(ScheduleRegime {
        kind,
        anchor,
        schedule: schedule.clone(),
    });
    if let Some(anchor) = overlap {
        regimes.push(ScheduleRegime {
            kind: overlap_kind,
            anchor,
            schedule: schedule.clone(),
        });
    }
}
