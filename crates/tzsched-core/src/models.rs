//! Core data types for tzsched.
//!
//! This module defines the primary types used throughout the library:
//! - [`DayCode`] - Day of week, cyclically ordered Monday to Sunday
//! - [`Interval`] - An open interval in whole hours on a 0-24 clock
//! - [`DaySlots`] - The merged interval sequence of one day
//! - [`WeeklyLocalSchedule`] - At most one local interval per day
//! - [`WeeklyUtcSchedule`] - Merged UTC intervals per day
//! - [`TransitionRule`] / [`DstRule`] / [`ZoneRule`] - Timezone descriptors
//! - [`AnchorDate`] / [`Anchor`] - Calendar triggers for a regime
//! - [`RegimeKind`] / [`ScheduleRegime`] / [`ScheduleSet`] - Compiled output

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::wire::RegimeRecord;

/// Hours in a civil day.
pub const HOURS_PER_DAY: i32 = 24;

/// Day of week, ordered Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayCode {
    Mo,
    Tu,
    We,
    Th,
    Fr,
    Sa,
    Su,
}

impl DayCode {
    /// All days in week order.
    pub const ALL: [DayCode; 7] = [
        DayCode::Mo,
        DayCode::Tu,
        DayCode::We,
        DayCode::Th,
        DayCode::Fr,
        DayCode::Sa,
        DayCode::Su,
    ];

    /// The day before, wrapping Monday to Sunday.
    pub fn prev(self) -> DayCode {
        Self::ALL[(self.index() + 6) % 7]
    }

    /// The day after, wrapping Sunday to Monday.
    pub fn next(self) -> DayCode {
        Self::ALL[(self.index() + 1) % 7]
    }

    /// Zero-based position, Monday = 0.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Two-letter code used on the wire.
    pub fn code(self) -> &'static str {
        match self {
            DayCode::Mo => "Mo",
            DayCode::Tu => "Tu",
            DayCode::We => "We",
            DayCode::Th => "Th",
            DayCode::Fr => "Fr",
            DayCode::Sa => "Sa",
            DayCode::Su => "Su",
        }
    }

    /// English day name.
    pub fn name(self) -> &'static str {
        match self {
            DayCode::Mo => "Monday",
            DayCode::Tu => "Tuesday",
            DayCode::We => "Wednesday",
            DayCode::Th => "Thursday",
            DayCode::Fr => "Friday",
            DayCode::Sa => "Saturday",
            DayCode::Su => "Sunday",
        }
    }
}

impl fmt::Display for DayCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DayCode {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        DayCode::ALL
            .into_iter()
            .find(|day| day.code() == s)
            .ok_or_else(|| ScheduleError::ParseError(format!("Unknown day code: '{}'", s)))
    }
}

impl From<chrono::Weekday> for DayCode {
    fn from(weekday: chrono::Weekday) -> Self {
        DayCode::ALL[weekday.num_days_from_monday() as usize]
    }
}

/// An interval of whole hours, `start < end`.
///
/// Values may leave `[0, 24]` while a shift is in progress; everything
/// stored in a [`DaySlots`] has been clamped back into range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: i32,
    pub end: i32,
}

impl Interval {
    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Validated constructor for local civil-time input.
    pub fn local(start: i32, end: i32) -> Result<Self> {
        if !(0..HOURS_PER_DAY).contains(&start) || end > HOURS_PER_DAY || start >= end {
            return Err(ScheduleError::InvalidInterval(format!(
                "[{}, {}] must satisfy 0 <= start < end <= 24",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Zero or negative width.
    pub fn is_degenerate(&self) -> bool {
        self.start >= self.end
    }

    /// Overlapping or sharing an endpoint.
    pub fn touches(&self, other: &Interval) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Smallest interval covering both.
    pub fn hull(&self, other: &Interval) -> Interval {
        Interval::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.start, self.end)
    }
}

/// Intervals of one day, sorted by descending start and maximally merged.
///
/// The chronologically latest interval sits at the front, the earliest at
/// the back. Deserialized lists are normalized the same way, so unsorted
/// or overlapping input is merged and degenerate entries are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Interval>", into = "Vec<Interval>")]
pub struct DaySlots(Vec<Interval>);

impl DaySlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an interval, absorbing every entry it overlaps or abuts.
    pub fn insert_or_merge(&mut self, interval: Interval) {
        if interval.is_degenerate() {
            return;
        }

        let mut merged = interval;
        self.0.retain(|existing| {
            if existing.touches(&merged) {
                merged = merged.hull(existing);
                false
            } else {
                true
            }
        });

        let pos = self
            .0
            .iter()
            .position(|existing| existing.start < merged.start)
            .unwrap_or(self.0.len());
        self.0.insert(pos, merged);
    }

    /// Add a slice that closes out the day (spill from the following day).
    ///
    /// The chronologically last entry is widened first. Because the slots
    /// stay maximally merged, the result always equals
    /// [`DaySlots::insert_or_merge`]; a slice that misses the last entry
    /// still merges with whatever it touches.
    pub fn extend_latest(&mut self, interval: Interval) {
        if interval.is_degenerate() {
            return;
        }
        match self.0.first() {
            Some(latest) if latest.touches(&interval) => {
                let widened = self.0.remove(0).hull(&interval);
                self.insert_or_merge(widened);
            }
            _ => self.insert_or_merge(interval),
        }
    }

    /// Add a slice that opens the day (spill from the preceding day).
    ///
    /// Mirror of [`DaySlots::extend_latest`] starting from the
    /// chronologically first entry; the merged result is the same.
    pub fn extend_earliest(&mut self, interval: Interval) {
        if interval.is_degenerate() {
            return;
        }
        match self.0.last() {
            Some(earliest) if earliest.touches(&interval) => {
                let widened = self.0.pop().map_or(interval, |e| e.hull(&interval));
                self.insert_or_merge(widened);
            }
            _ => self.insert_or_merge(interval),
        }
    }

    pub fn as_slice(&self) -> &[Interval] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.0.iter()
    }

    pub fn first(&self) -> Option<&Interval> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<Interval>> for DaySlots {
    type Error = ScheduleError;

    fn try_from(intervals: Vec<Interval>) -> Result<Self> {
        let mut slots = DaySlots::new();
        for interval in intervals {
            if interval.start < 0 || interval.end > HOURS_PER_DAY || interval.start > interval.end {
                return Err(ScheduleError::ParseError(format!(
                    "UTC interval {} is outside 00-24",
                    interval
                )));
            }
            slots.insert_or_merge(interval);
        }
        Ok(slots)
    }
}

impl From<DaySlots> for Vec<Interval> {
    fn from(slots: DaySlots) -> Self {
        slots.0
    }
}

impl<'a> IntoIterator for &'a DaySlots {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<BTreeMap<DayCode, DaySlots>> for WeeklyUtcSchedule {
    fn from(days: BTreeMap<DayCode, DaySlots>) -> Self {
        WeeklyUtcSchedule::from_days(days)
    }
}

impl From<WeeklyUtcSchedule> for BTreeMap<DayCode, DaySlots> {
    fn from(schedule: WeeklyUtcSchedule) -> Self {
        schedule.0
    }
}

/// Weekly availability in local civil time, at most one interval per day.
///
/// A missing day is closed all day. JSON input may spell a closed day as
/// `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<DayCode, Option<Interval>>",
    into = "BTreeMap<DayCode, Interval>"
)]
pub struct WeeklyLocalSchedule(BTreeMap<DayCode, Interval>);

impl WeeklyLocalSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`WeeklyLocalSchedule::set`].
    pub fn with(mut self, day: DayCode, start: i32, end: i32) -> Result<Self> {
        self.set(day, Some(Interval::local(start, end)?));
        Ok(self)
    }

    /// Open or close a day.
    pub fn set(&mut self, day: DayCode, interval: Option<Interval>) {
        match interval {
            Some(interval) => self.0.insert(day, interval),
            None => self.0.remove(&day),
        };
    }

    pub fn get(&self, day: DayCode) -> Option<Interval> {
        self.0.get(&day).copied()
    }

    /// Open days in week order.
    pub fn iter(&self) -> impl Iterator<Item = (DayCode, Interval)> + '_ {
        self.0.iter().map(|(day, interval)| (*day, *interval))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<BTreeMap<DayCode, Option<Interval>>> for WeeklyLocalSchedule {
    type Error = ScheduleError;

    fn try_from(days: BTreeMap<DayCode, Option<Interval>>) -> Result<Self> {
        let mut schedule = WeeklyLocalSchedule::new();
        for (day, interval) in days {
            if let Some(interval) = interval {
                let checked = Interval::local(interval.start, interval.end)
                    .map_err(|e| ScheduleError::InvalidInterval(format!("{}: {}", day, e)))?;
                schedule.set(day, Some(checked));
            }
        }
        Ok(schedule)
    }
}

impl From<WeeklyLocalSchedule> for BTreeMap<DayCode, Interval> {
    fn from(schedule: WeeklyLocalSchedule) -> Self {
        schedule.0
    }
}

/// Merged UTC intervals per day. Days without intervals are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<DayCode, DaySlots>",
    into = "BTreeMap<DayCode, DaySlots>"
)]
pub struct WeeklyUtcSchedule(BTreeMap<DayCode, DaySlots>);

impl WeeklyUtcSchedule {
    pub(crate) fn from_days(days: BTreeMap<DayCode, DaySlots>) -> Self {
        Self(
            days.into_iter()
                .filter(|(_, slots)| !slots.is_empty())
                .collect(),
        )
    }

    pub fn get(&self, day: DayCode) -> Option<&DaySlots> {
        self.0.get(&day)
    }

    /// Intervals of a day as a slice; empty for an absent day.
    pub fn day(&self, day: DayCode) -> &[Interval] {
        self.0.get(&day).map(DaySlots::as_slice).unwrap_or(&[])
    }

    /// Days present, in week order.
    pub fn days(&self) -> impl Iterator<Item = DayCode> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DayCode, &DaySlots)> + '_ {
        self.0.iter().map(|(day, slots)| (*day, slots))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Clock time of a DST transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
}

/// Week ordinal meaning "last occurrence in the month".
pub const LAST_WEEK: u8 = 5;

/// A recurring DST transition, e.g. "02:00 on the second Sunday of March".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRule {
    /// Month, 1..=12.
    pub month: u32,
    /// Occurrence of `weekday` within the month, 1..=5 where 5 is "last".
    pub week: u8,
    pub weekday: DayCode,
    /// Local wall-clock time just before the transition.
    pub time: TimeOfDay,
    pub is_fixed_date: bool,
}

impl TransitionRule {
    /// "the last Sunday of March" style phrase.
    pub fn describe(&self) -> String {
        let ordinal = match self.week {
            1 => "1st",
            2 => "2nd",
            3 => "3rd",
            4 => "4th",
            _ => "last",
        };
        let month = u8::try_from(self.month)
            .ok()
            .and_then(|m| chrono::Month::try_from(m).ok())
            .map_or("?", |m| m.name());
        format!(
            "{:02}:{:02} on the {} {} of {}",
            self.time.hour,
            self.time.minute,
            ordinal,
            self.weekday.name(),
            month
        )
    }
}

/// Daylight saving rule of a timezone, whole hours only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DstRule {
    pub base_offset_hours: i32,
    pub daylight_delta_hours: i32,
    pub transition_start: TransitionRule,
    pub transition_end: TransitionRule,
}

impl DstRule {
    /// UTC offset while daylight time is in effect.
    pub fn daylight_offset_hours(&self) -> i32 {
        self.base_offset_hours + self.daylight_delta_hours
    }

    /// Reject rules the compiler cannot express.
    pub fn check_supported(&self) -> Result<()> {
        if self.transition_start.is_fixed_date || self.transition_end.is_fixed_date {
            return Err(ScheduleError::InvalidTimezoneOffset(
                "fixed-date DST transitions are not supported".to_string(),
            ));
        }
        Ok(())
    }

    /// Human description of the rule.
    pub fn describe(&self) -> String {
        format!(
            "{:+}h from {} to {}",
            self.daylight_delta_hours,
            self.transition_start.describe(),
            self.transition_end.describe()
        )
    }
}

/// Offset behaviour of a timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ZoneRule {
    /// No daylight saving time.
    Fixed { offset_hours: i32 },
    /// Alternates between base and daylight offsets.
    Daylight(DstRule),
}

impl ZoneRule {
    /// Offset applied to the schedule currently in effect.
    pub fn offset_hours(&self, dst_active: bool) -> i32 {
        match self {
            ZoneRule::Fixed { offset_hours } => *offset_hours,
            ZoneRule::Daylight(rule) if dst_active => rule.daylight_offset_hours(),
            ZoneRule::Daylight(rule) => rule.base_offset_hours,
        }
    }
}

/// Ordinal code for "last occurrence of the weekday".
pub const LAST_OCCURRENCE: i8 = -1;
/// Overlap ordinal placed in the month after a shifted "last" transition.
pub const OVERLAP_NEXT_MONTH: i8 = 0;
/// Overlap ordinal placed in the month before a shifted "first" transition.
pub const OVERLAP_PREV_MONTH: i8 = 6;

/// Day part of an anchor.
///
/// Renders as a bare day number (`"1"`) or as weekday plus ordinal
/// (`"Su2"`, `"Su-1"`, and the overlap codes `"Su0"`/`"Su6"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum AnchorDate {
    DayOfMonth(u32),
    Weekday { day: DayCode, ordinal: i8 },
}

impl fmt::Display for AnchorDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorDate::DayOfMonth(day) => write!(f, "{}", day),
            AnchorDate::Weekday { day, ordinal } => write!(f, "{}{}", day, ordinal),
        }
    }
}

impl FromStr for AnchorDate {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ScheduleError::ParseError(format!("Invalid anchor date: '{}'", s));

        if let Ok(day) = s.parse::<u32>() {
            return Ok(AnchorDate::DayOfMonth(day));
        }
        let (code, ordinal) = s.split_at_checked(2).ok_or_else(invalid)?;
        Ok(AnchorDate::Weekday {
            day: code.parse().map_err(|_| invalid())?,
            ordinal: ordinal.parse().map_err(|_| invalid())?,
        })
    }
}

impl From<AnchorDate> for String {
    fn from(date: AnchorDate) -> Self {
        date.to_string()
    }
}

impl TryFrom<String> for AnchorDate {
    type Error = ScheduleError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Calendar trigger at which a regime takes effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    /// Month, 1..=12.
    pub month: u32,
    pub date: AnchorDate,
    pub hour: Option<i32>,
    pub minute: Option<u32>,
}

impl Anchor {
    /// January 1st, no time of day. Used by zones without DST.
    pub const fn year_start() -> Self {
        Self {
            month: 1,
            date: AnchorDate::DayOfMonth(1),
            hour: None,
            minute: None,
        }
    }

    /// Two-digit month key, `"01"`..`"12"`.
    pub fn month_key(&self) -> String {
        format!("{:02}", self.month)
    }
}

/// Name of a schedule variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegimeKind {
    #[serde(rename = "Regular")]
    Regular,
    #[serde(rename = "DST")]
    Dst,
    #[serde(rename = "Regular - overlap")]
    RegularOverlap,
    #[serde(rename = "DST - overlap")]
    DstOverlap,
}

impl RegimeKind {
    pub fn description(self) -> &'static str {
        match self {
            RegimeKind::Regular => "Regular",
            RegimeKind::Dst => "DST",
            RegimeKind::RegularOverlap => "Regular - overlap",
            RegimeKind::DstOverlap => "DST - overlap",
        }
    }
}

impl fmt::Display for RegimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A named schedule anchored to a calendar period.
///
/// Serializes to the wire record
/// `{description, month, dates: [{date, hour?, minute?, schedule}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "RegimeRecord", try_from = "RegimeRecord")]
pub struct ScheduleRegime {
    pub kind: RegimeKind,
    pub anchor: Anchor,
    pub schedule: WeeklyUtcSchedule,
}

impl ScheduleRegime {
    pub fn month_key(&self) -> String {
        self.anchor.month_key()
    }
}

/// All regimes compiled for one year, in publication order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleSet(Vec<ScheduleRegime>);

impl ScheduleSet {
    pub fn new(regimes: Vec<ScheduleRegime>) -> Self {
        Self(regimes)
    }

    pub fn regimes(&self) -> &[ScheduleRegime] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScheduleRegime> {
        self.0.iter()
    }

    pub fn find(&self, kind: RegimeKind) -> Option<&ScheduleRegime> {
        self.0.iter().find(|regime| regime.kind == kind)
    }

    /// Month keys of every regime.
    pub fn months(&self) -> BTreeSet<String> {
        self.0.iter().map(ScheduleRegime::month_key).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a ScheduleSet {
    type Item = &'a ScheduleRegime;
    type IntoIter = std::slice::Iter<'a, ScheduleRegime>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_code_wraps() {
        assert_eq!(DayCode::Mo.prev(), DayCode::Su);
        assert_eq!(DayCode::Su.next(), DayCode::Mo);
        assert_eq!(DayCode::We.next(), DayCode::Th);
    }

    #[test]
    fn day_code_from_chrono_weekday() {
        assert_eq!(DayCode::from(chrono::Weekday::Mon), DayCode::Mo);
        assert_eq!(DayCode::from(chrono::Weekday::Sun), DayCode::Su);
    }

    #[test]
    fn local_interval_validation() {
        assert!(Interval::local(9, 17).is_ok());
        assert!(Interval::local(0, 24).is_ok());
        assert!(Interval::local(17, 9).is_err());
        assert!(Interval::local(5, 5).is_err());
        assert!(Interval::local(-1, 5).is_err());
        assert!(Interval::local(20, 25).is_err());
    }

    #[test]
    fn insert_or_merge_keeps_descending_order() {
        let mut slots = DaySlots::new();
        slots.insert_or_merge(Interval::new(0, 3));
        slots.insert_or_merge(Interval::new(10, 12));
        slots.insert_or_merge(Interval::new(5, 7));

        assert_eq!(
            slots.as_slice(),
            &[Interval::new(10, 12), Interval::new(5, 7), Interval::new(0, 3)]
        );
    }

    #[test]
    fn insert_or_merge_bridges_neighbours() {
        let mut slots = DaySlots::new();
        slots.insert_or_merge(Interval::new(0, 3));
        slots.insert_or_merge(Interval::new(5, 8));
        slots.insert_or_merge(Interval::new(3, 5));

        assert_eq!(slots.as_slice(), &[Interval::new(0, 8)]);
    }

    #[test]
    fn insert_or_merge_drops_degenerate() {
        let mut slots = DaySlots::new();
        slots.insert_or_merge(Interval::new(4, 4));
        assert!(slots.is_empty());
    }

    #[test]
    fn extend_latest_merges_with_last_entry() {
        let mut slots = DaySlots::new();
        slots.insert_or_merge(Interval::new(20, 23));
        slots.insert_or_merge(Interval::new(0, 2));
        slots.extend_latest(Interval::new(23, 24));

        assert_eq!(
            slots.as_slice(),
            &[Interval::new(20, 24), Interval::new(0, 2)]
        );
    }

    #[test]
    fn extend_latest_without_contact_inserts_in_order() {
        let mut slots = DaySlots::new();
        slots.insert_or_merge(Interval::new(0, 6));
        slots.extend_latest(Interval::new(22, 24));

        assert_eq!(
            slots.as_slice(),
            &[Interval::new(22, 24), Interval::new(0, 6)]
        );
    }

    #[test]
    fn extend_earliest_merges_with_first_entry() {
        let mut slots = DaySlots::new();
        slots.insert_or_merge(Interval::new(3, 5));
        slots.insert_or_merge(Interval::new(10, 12));
        slots.extend_earliest(Interval::new(0, 3));

        assert_eq!(
            slots.as_slice(),
            &[Interval::new(10, 12), Interval::new(0, 5)]
        );
    }

    #[test]
    fn spill_directions_agree_with_insert_or_merge() {
        let mut base = DaySlots::new();
        base.insert_or_merge(Interval::new(20, 22));
        base.insert_or_merge(Interval::new(0, 2));

        // The slice misses the last entry but touches the first one.
        let slice = Interval::new(1, 5);
        let mut latest = base.clone();
        latest.extend_latest(slice);
        let mut earliest = base.clone();
        earliest.extend_earliest(slice);
        let mut merged = base;
        merged.insert_or_merge(slice);

        assert_eq!(latest.as_slice(), &[Interval::new(20, 22), Interval::new(0, 5)]);
        assert_eq!(latest, merged);
        assert_eq!(earliest, merged);
    }

    #[test]
    fn day_slots_deserialize_normalizes() {
        let slots: DaySlots = serde_json::from_str(
            r#"[{"start": 0, "end": 2}, {"start": 20, "end": 24}, {"start": 1, "end": 4}, {"start": 6, "end": 6}]"#,
        )
        .unwrap();

        assert_eq!(slots.as_slice(), &[Interval::new(20, 24), Interval::new(0, 4)]);
    }

    #[test]
    fn day_slots_deserialize_rejects_out_of_day() {
        let result: std::result::Result<DaySlots, _> =
            serde_json::from_str(r#"[{"start": -2, "end": 3}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn weekly_utc_deserialize_drops_empty_days() {
        let schedule: WeeklyUtcSchedule = serde_json::from_str(
            r#"{"Mo": [], "Tu": [{"start": 9, "end": 12}, {"start": 12, "end": 17}]}"#,
        )
        .unwrap();

        assert_eq!(schedule.days().collect::<Vec<_>>(), vec![DayCode::Tu]);
        assert_eq!(schedule.day(DayCode::Tu), &[Interval::new(9, 17)]);
        assert_eq!(
            serde_json::to_value(&schedule).unwrap(),
            serde_json::json!({"Tu": [{"start": 9, "end": 17}]})
        );
    }

    #[test]
    fn weekly_local_deserialize_skips_null_days() {
        let schedule: WeeklyLocalSchedule =
            serde_json::from_str(r#"{"Mo": {"start": 9, "end": 17}, "Tu": null}"#).unwrap();

        assert_eq!(schedule.get(DayCode::Mo), Some(Interval::new(9, 17)));
        assert_eq!(schedule.get(DayCode::Tu), None);
    }

    #[test]
    fn weekly_local_deserialize_rejects_bad_interval() {
        let result: std::result::Result<WeeklyLocalSchedule, _> =
            serde_json::from_str(r#"{"Mo": {"start": 17, "end": 9}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn anchor_date_display() {
        assert_eq!(AnchorDate::DayOfMonth(1).to_string(), "1");
        let last = AnchorDate::Weekday {
            day: DayCode::Su,
            ordinal: LAST_OCCURRENCE,
        };
        assert_eq!(last.to_string(), "Su-1");
    }

    #[test]
    fn anchor_date_parse() {
        assert_eq!("1".parse::<AnchorDate>().unwrap(), AnchorDate::DayOfMonth(1));
        assert_eq!(
            "Su6".parse::<AnchorDate>().unwrap(),
            AnchorDate::Weekday {
                day: DayCode::Su,
                ordinal: OVERLAP_PREV_MONTH
            }
        );
        assert_eq!(
            "Fr-1".parse::<AnchorDate>().unwrap(),
            AnchorDate::Weekday {
                day: DayCode::Fr,
                ordinal: LAST_OCCURRENCE
            }
        );
        assert!("Xx2".parse::<AnchorDate>().is_err());
        assert!("S".parse::<AnchorDate>().is_err());
    }

    #[test]
    fn regime_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&RegimeKind::DstOverlap).unwrap(),
            "\"DST - overlap\""
        );
        assert_eq!(
            serde_json::to_string(&RegimeKind::Regular).unwrap(),
            "\"Regular\""
        );
    }

    #[test]
    fn transition_describe() {
        let rule = TransitionRule {
            month: 3,
            week: LAST_WEEK,
            weekday: DayCode::Su,
            time: TimeOfDay { hour: 2, minute: 0 },
            is_fixed_date: false,
        };
        assert_eq!(rule.describe(), "02:00 on the last Sunday of March");
    }
}
