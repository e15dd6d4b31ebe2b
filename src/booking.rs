// Booking dialog: loads the reserved intervals for one vehicle, applies day taps,
// and submits the confirmed range. One writer per dialog; the fetch is the only
// suspension point and its result is dropped if the dialog moved on meanwhile.

use crate::api::{ApiError, ClientConfig, FetchPolicy, ReservationApi, VehicleId};
use crate::cost::{cost, validate_rate, Cost, CostError};
use crate::date::DateOnly;
use crate::interval_set::IntervalSet;
use crate::marking::{project, Markings};
use crate::selection::{on_day_tapped, SelectionState, SideEffect};
use crate::wire::{CreateReservationRequest, ReservationRecord};
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Could not load reservations: {0}")]
    Fetch(#[source] ApiError),

    #[error(transparent)]
    InvalidRate(#[from] CostError),

    #[error("Reservation rejected: {message}")]
    ReservationRejected { message: String },

    #[error("Could not submit reservation: {0}")]
    Submit(#[source] ApiError),

    #[error("No confirmed date range selected")]
    NoSelection,

    #[error("Booking dialog is not open")]
    NotOpen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogPhase {
    Closed,
    Loading,
    Ready,
    Submitting,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Ready { intervals: usize },
    // The dialog was closed or reopened while the fetch was in flight
    Discarded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TapOutcome {
    Ignored,
    Applied {
        selection: SelectionState,
        effect: SideEffect,
        cost: Option<Cost>,
    },
}

/// Lower bound for pickable days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EarliestDay {
    #[default]
    Unrestricted,
    // Read from the local clock on every tap, so a long-lived dialog follows midnight
    Today,
    Fixed(DateOnly),
}

impl EarliestDay {
    pub fn resolve(&self) -> Option<DateOnly> {
        match self {
            EarliestDay::Unrestricted => None,
            EarliestDay::Today => Some(DateOnly::today()),
            EarliestDay::Fixed(day) => Some(*day),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DialogOptions {
    pub fetch_policy: FetchPolicy,
    pub earliest_day: EarliestDay,
}

impl Default for DialogOptions {
    fn default() -> Self {
        Self {
            fetch_policy: FetchPolicy::FailClosed,
            earliest_day: EarliestDay::Unrestricted,
        }
    }
}

impl DialogOptions {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            fetch_policy: config.fetch_policy,
            earliest_day: EarliestDay::Today,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DialogView {
    pub phase: DialogPhase,
    pub vehicle_id: Option<VehicleId>,
    pub intervals: IntervalSet,
    pub selection: SelectionState,
    pub cost: Option<Cost>,
    pub markings: Markings,
}

struct DialogState {
    phase: DialogPhase,
    session: u64,
    vehicle_id: Option<VehicleId>,
    daily_rate: f64,
    intervals: IntervalSet,
    selection: SelectionState,
    cost: Option<Cost>,
    markings: Markings,
}

impl DialogState {
    fn closed() -> Self {
        Self {
            phase: DialogPhase::Closed,
            session: 0,
            vehicle_id: None,
            daily_rate: 0.0,
            intervals: IntervalSet::empty(),
            selection: SelectionState::Empty,
            cost: None,
            markings: Markings::new(),
        }
    }

    // Starts a new session; results tagged with an older one are stale
    fn begin_loading(&mut self) -> u64 {
        self.session += 1;
        self.phase = DialogPhase::Loading;
        self.intervals = IntervalSet::empty();
        self.reset_selection();
        self.session
    }

    fn reset_selection(&mut self) {
        self.selection = SelectionState::Empty;
        self.cost = None;
        self.markings = project(&self.intervals, &self.selection);
    }

    fn install(&mut self, intervals: IntervalSet) {
        self.intervals = intervals;
        self.phase = DialogPhase::Ready;
        self.reset_selection();
    }
}

pub struct BookingDialog<A> {
    api: Arc<A>,
    options: DialogOptions,
    state: Mutex<DialogState>,
}

impl<A: ReservationApi> BookingDialog<A> {
    pub fn new(api: Arc<A>, options: DialogOptions) -> Self {
        Self {
            api,
            options,
            state: Mutex::new(DialogState::closed()),
        }
    }

    pub async fn open(
        &self,
        vehicle_id: VehicleId,
        daily_rate: f64,
    ) -> Result<LoadOutcome, BookingError> {
        let daily_rate = validate_rate(daily_rate)?;
        let session = {
            let mut state = self.state.lock();
            state.vehicle_id = Some(vehicle_id);
            state.daily_rate = daily_rate;
            state.begin_loading()
        };
        info!(vehicle_id, daily_rate, "booking dialog opened");
        self.load(session, vehicle_id).await
    }

    // Manual retry after a failed load
    pub async fn retry(&self) -> Result<LoadOutcome, BookingError> {
        let (session, vehicle_id) = {
            let mut state = self.state.lock();
            let vehicle_id = match (&state.phase, state.vehicle_id) {
                (DialogPhase::Failed(_), Some(vehicle_id)) => vehicle_id,
                _ => return Err(BookingError::NotOpen),
            };
            (state.begin_loading(), vehicle_id)
        };
        self.load(session, vehicle_id).await
    }

    pub fn close(&self) {
        let mut state = self.state.lock();
        let session = state.session;
        *state = DialogState::closed();
        state.session = session + 1;
        debug!("booking dialog closed");
    }

    async fn load(&self, session: u64, vehicle_id: VehicleId) -> Result<LoadOutcome, BookingError> {
        let result = self.api.fetch_reserved_intervals(vehicle_id).await;

        let mut state = self.state.lock();
        if state.session != session || state.phase != DialogPhase::Loading {
            debug!(vehicle_id, "discarding reserved intervals for a stale dialog");
            return Ok(LoadOutcome::Discarded);
        }

        match result {
            Ok(intervals) => {
                let count = intervals.len();
                state.install(intervals);
                Ok(LoadOutcome::Ready { intervals: count })
            }
            Err(err) if self.options.fetch_policy == FetchPolicy::FailOpen => {
                warn!(vehicle_id, error = %err, "reserved intervals unavailable, treating vehicle as free");
                state.install(IntervalSet::empty());
                Ok(LoadOutcome::Ready { intervals: 0 })
            }
            Err(err) => {
                warn!(vehicle_id, error = %err, "reserved intervals unavailable");
                state.phase = DialogPhase::Failed(err.to_string());
                Err(BookingError::Fetch(err))
            }
        }
    }

    pub fn tap(&self, date: DateOnly) -> Result<TapOutcome, BookingError> {
        let mut state = self.state.lock();
        match state.phase {
            DialogPhase::Loading | DialogPhase::Submitting => return Ok(TapOutcome::Ignored),
            DialogPhase::Closed | DialogPhase::Failed(_) => return Err(BookingError::NotOpen),
            DialogPhase::Ready => {}
        }

        if self.options.earliest_day.resolve().map_or(false, |earliest| date < earliest) {
            debug!(%date, "tap before earliest bookable day");
            return Ok(TapOutcome::Applied {
                selection: state.selection,
                effect: SideEffect::DateUnavailable,
                cost: state.cost,
            });
        }

        let (selection, effect) = on_day_tapped(date, state.selection, &state.intervals);
        let total = match selection.confirmed() {
            Some(interval) => Some(cost(&interval, state.daily_rate)?),
            None => None,
        };

        state.selection = selection;
        state.cost = total;
        state.markings = project(&state.intervals, &state.selection);

        Ok(TapOutcome::Applied {
            selection,
            effect,
            cost: total,
        })
    }

    pub fn view(&self) -> DialogView {
        let state = self.state.lock();
        DialogView {
            phase: state.phase.clone(),
            vehicle_id: state.vehicle_id,
            intervals: state.intervals.clone(),
            selection: state.selection,
            cost: state.cost,
            markings: state.markings.clone(),
        }
    }

    /// Sends the confirmed range to the backend. A rejection means the local
    /// interval set is stale: the selection is cleared and the set re-fetched.
    pub async fn submit(&self) -> Result<ReservationRecord, BookingError> {
        let (session, vehicle_id, interval) = {
            let mut state = self.state.lock();
            if state.phase != DialogPhase::Ready {
                return Err(BookingError::NotOpen);
            }
            let vehicle_id = state.vehicle_id.ok_or(BookingError::NotOpen)?;
            let interval = state.selection.confirmed().ok_or(BookingError::NoSelection)?;
            state.phase = DialogPhase::Submitting;
            (state.session, vehicle_id, interval)
        };

        let result = self
            .api
            .create_reservation(CreateReservationRequest::new(vehicle_id, interval))
            .await;

        match result {
            Ok(record) => {
                info!(vehicle_id, %interval, id = ?record.id, "reservation created");
                let mut state = self.state.lock();
                if state.session == session {
                    let next = state.session + 1;
                    *state = DialogState::closed();
                    state.session = next;
                }
                Ok(record)
            }
            Err(ApiError::Rejected { message, .. }) => {
                warn!(vehicle_id, %interval, %message, "reservation rejected, reloading");
                let reload = {
                    let mut state = self.state.lock();
                    if state.session == session {
                        Some(state.begin_loading())
                    } else {
                        None
                    }
                };
                if let Some(reload) = reload {
                    if let Err(err) = self.load(reload, vehicle_id).await {
                        warn!(vehicle_id, error = %err, "reload after rejection failed");
                    }
                }
                Err(BookingError::ReservationRejected { message })
            }
            Err(err) => {
                let mut state = self.state.lock();
                if state.session == session && state.phase == DialogPhase::Submitting {
                    state.phase = DialogPhase::Ready;
                }
                Err(BookingError::Submit(err))
            }
        }
    }
}
