// Per-day calendar markings derived from reservations and the current selection

use crate::date::DateOnly;
use crate::interval_set::IntervalSet;
use crate::selection::SelectionState;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayMarking {
    Free,
    Blocked,
    SelectionStart,
    SelectionMiddle,
    SelectionEnd,
}

// Days absent from the map are Free
pub type Markings = BTreeMap<DateOnly, DayMarking>;

pub fn marking_for(markings: &Markings, day: DateOnly) -> DayMarking {
    markings.get(&day).copied().unwrap_or(DayMarking::Free)
}

/// Rebuilds the full marking map. Selection endpoints win over `Blocked`.
pub fn project(interval_set: &IntervalSet, selection: &SelectionState) -> Markings {
    let mut markings = Markings::new();

    for interval in interval_set {
        for day in interval.days() {
            markings.insert(day, DayMarking::Blocked);
        }
    }

    if let SelectionState::Confirmed { interval } = selection {
        // inner days never hide a reservation
        for day in interval.days() {
            markings.entry(day).or_insert(DayMarking::SelectionMiddle);
        }
        markings.insert(interval.end(), DayMarking::SelectionEnd);
    }
    // written last so a single-day range reads as a start
    if let Some(start) = selection.start() {
        markings.insert(start, DayMarking::SelectionStart);
    }

    markings
}
