// Two-tap range selection over a calendar

use crate::date::{DateOnly, Interval};
use crate::interval_set::IntervalSet;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SelectionState {
    #[default]
    Empty,
    PartialStart { date: DateOnly },
    Confirmed { interval: Interval },
}

impl SelectionState {
    pub fn confirmed(&self) -> Option<Interval> {
        match self {
            SelectionState::Confirmed { interval } => Some(*interval),
            _ => None,
        }
    }

    pub fn start(&self) -> Option<DateOnly> {
        match self {
            SelectionState::Empty => None,
            SelectionState::PartialStart { date } => Some(*date),
            SelectionState::Confirmed { interval } => Some(interval.start()),
        }
    }
}

// What the caller must do after a tap has been applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SideEffect {
    None,
    DateUnavailable,
    RangeUnavailable,
    RecomputeCost,
}

impl SideEffect {
    // User-facing notice, if any
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            SideEffect::DateUnavailable => Some("This date is not available"),
            SideEffect::RangeUnavailable => Some("This range contains reserved days"),
            SideEffect::None | SideEffect::RecomputeCost => None,
        }
    }
}

/// Applies one day tap to the current selection.
///
/// A reserved day never changes the state. From `Empty` or `Confirmed` the tap
/// starts a fresh selection; from `PartialStart` it closes the range in either
/// direction, or restarts from the tapped day when the range crosses a reservation.
pub fn on_day_tapped(
    date: DateOnly,
    state: SelectionState,
    interval_set: &IntervalSet,
) -> (SelectionState, SideEffect) {
    if interval_set.contains_day(date) {
        debug!(%date, "tap on reserved day");
        return (state, SideEffect::DateUnavailable);
    }

    match state {
        SelectionState::Empty | SelectionState::Confirmed { .. } => {
            (SelectionState::PartialStart { date }, SideEffect::None)
        }
        SelectionState::PartialStart { date: start } => {
            let candidate = Interval::spanning(start, date);
            match interval_set.check(&candidate) {
                Ok(()) => (
                    SelectionState::Confirmed {
                        interval: candidate,
                    },
                    SideEffect::RecomputeCost,
                ),
                Err(err) => {
                    debug!(error = %err, "selection reset");
                    (
                        SelectionState::PartialStart { date },
                        SideEffect::RangeUnavailable,
                    )
                }
            }
        }
    }
}
