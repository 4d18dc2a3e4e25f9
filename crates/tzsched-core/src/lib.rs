//! # tzsched-core
//!
//! A timezone-aware weekly schedule compiler.
//!
//! This library turns a weekly local-time availability pattern (one open
//! interval per day) and a timezone's DST rule into the calendar-anchored
//! UTC schedules a reminder service publishes, and works out which
//! previously published months must be retracted.
//!
//! ## Features
//!
//! - **Midnight wrap**: Intervals shifted past midnight are split across
//!   neighbouring days, Sunday and Monday included, and merged per day.
//! - **DST regimes**: Separate `DST` and `Regular` schedules anchored on the
//!   zone's transition rules, plus overlap anchors where the UTC shift
//!   moves a transition across a month boundary.
//! - **Reconciliation**: Whole-batch publish and retract against a
//!   pluggable transport, committing the known months only on success.
//! - **IANA Timezones**: DST rules derived from the IANA database via
//!   chrono-tz.
//!
//! ## Example
//!
//! ```rust
//! use tzsched_core::prelude::*;
//!
//! let weekly = WeeklyLocalSchedule::new()
//!     .with(DayCode::Mo, 9, 17)
//!     .unwrap();
//!
//! let tz = parse_tz("America/New_York").unwrap();
//! let zone = zone_rule(tz, 2026).unwrap();
//! let set = build_schedule_set(&weekly, &zone);
//!
//! for regime in &set {
//!     println!("{} {}: {:?}", regime.kind, regime.month_key(), regime.schedule);
//! }
//! ```

pub mod anchor;
pub mod build;
pub mod error;
pub mod localize;
pub mod models;
pub mod reconcile;
pub mod shift;
pub mod tz;
pub mod wire;

// Re-export commonly used types at the crate root
pub use anchor::{ResolvedTransition, resolve};
pub use build::build_schedule_set;
pub use error::{Result, ScheduleError};
pub use localize::localize;
pub use models::{
    Anchor, AnchorDate, DayCode, DaySlots, DstRule, Interval, RegimeKind, ScheduleRegime,
    ScheduleSet, TimeOfDay, TransitionRule, WeeklyLocalSchedule, WeeklyUtcSchedule, ZoneRule,
};
pub use reconcile::{
    PublishReport, ReconcilePlan, ScheduleSession, ScheduleTransport, TransportError, reconcile,
};
pub use shift::{shift, shift_utc};

/// Prelude module for convenient imports.
///
/// ```
/// use tzsched_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::build::build_schedule_set;
    pub use crate::error::{Result, ScheduleError};
    pub use crate::localize::localize;
    pub use crate::models::*;
    pub use crate::reconcile::{ReconcilePlan, ScheduleSession, ScheduleTransport, reconcile};
    pub use crate::shift::{shift, shift_utc};
    pub use crate::tz::{is_dst_active, parse_tz, zone_rule};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn full_workflow_new_york() {
        let weekly = WeeklyLocalSchedule::new().with(DayCode::Mo, 9, 17).unwrap();
        let zone = tz::zone_rule(tz::parse_tz("America/New_York").unwrap(), 2026).unwrap();
        let set = build_schedule_set(&weekly, &zone);

        assert_eq!(set.len(), 2);
        let dst = set.find(RegimeKind::Dst).unwrap();
        assert_eq!(dst.month_key(), "03");
        assert_eq!(dst.schedule.day(DayCode::Mo), &[Interval::new(13, 21)]);

        let known: BTreeSet<String> = ["01".to_string(), "03".to_string()].into();
        let plan = reconcile(&set, &known);
        assert_eq!(plan.to_retract, BTreeSet::from(["01".to_string()]));
    }

    #[test]
    fn full_workflow_wire_output() {
        let weekly = WeeklyLocalSchedule::new().with(DayCode::Su, 20, 24).unwrap();
        let set = build_schedule_set(&weekly, &ZoneRule::Fixed { offset_hours: -3 });

        let value = serde_json::to_value(&set).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "description": "Regular",
                "month": "01",
                "dates": [{
                    "date": "1",
                    "schedule": {
                        "Mo": [{"start": 0, "end": 3}],
                        "Su": [{"start": 23, "end": 24}]
                    }
                }]
            }])
        );
    }

    #[test]
    fn prelude_exports() {
        use crate::prelude::*;

        let _tz = parse_tz("UTC").unwrap();
        let _day = DayCode::Mo;
        let _session = ScheduleSession::default();
    }
}
