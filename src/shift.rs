use chrono::NaiveTime;

use crate::{entity::schedule, utils};

/// One contiguous block of a workday. Either boundary may be unset when the
/// admin only filled half of the pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct Shift {
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
}

/// A day's schedule, up to two shifts (split by lunch).
#[derive(Debug, Clone, Copy, Default)]
pub struct DaySchedule {
    pub shift1: Shift,
    pub shift2: Shift,
}

impl From<&schedule::Model> for DaySchedule {
    fn from(model: &schedule::Model) -> Self {
        Self {
            shift1: Shift { start: model.shift1_start, end: model.shift1_end },
            shift2: Shift { start: model.shift2_start, end: model.shift2_end },
        }
    }
}

/// The shift-start a check-in is measured against.
pub fn resolve_entry_target(day: &DaySchedule, observed: NaiveTime) -> Option<NaiveTime> {
    closest_boundary(day.shift1.start, day.shift2.start, observed)
}

/// The shift-end a check-out is measured against.
pub fn resolve_exit_target(day: &DaySchedule, observed: NaiveTime) -> Option<NaiveTime> {
    closest_boundary(day.shift1.end, day.shift2.end, observed)
}

/// Picks the boundary nearest to the observed clock reading. The second
/// shift wins only when strictly closer; ties stay on shift 1. A missing
/// first boundary always yields to a present second one.
fn closest_boundary(
    first: Option<NaiveTime>,
    second: Option<NaiveTime>,
    observed: NaiveTime,
) -> Option<NaiveTime> {
    match (first, second) {
        (Some(first), Some(second)) => {
            let observed = utils::minutes_of_day(observed);
            let to_first = (observed - utils::minutes_of_day(first)).abs();
            let to_second = (observed - utils::minutes_of_day(second)).abs();

            if to_second < to_first { Some(second) } else { Some(first) }
        },
        (Some(first), None) => Some(first),
        (None, second) => second,
    }
}
