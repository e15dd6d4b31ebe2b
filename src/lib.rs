// Client-side booking logic for the vehicle rental marketplace

pub mod api;
pub mod booking;
pub mod cost;
pub mod date;
pub mod interval_set;
pub mod marking;
pub mod selection;
pub mod wire;

// Re-export key types for convenience
pub use api::{
    ApiError, ClientConfig, ClientError, FetchPolicy, HttpReservationApi, ReservationApi,
    ReservationId, VehicleId,
};
pub use booking::{BookingDialog, BookingError, DialogOptions, DialogPhase, DialogView, EarliestDay, LoadOutcome, TapOutcome};
pub use cost::{cost, Cost, CostError};
pub use date::{DateError, DateOnly, Interval};
pub use interval_set::{overlaps, IntervalSet, OverlapError};
pub use marking::{marking_for, project, DayMarking, Markings};
pub use selection::{on_day_tapped, SelectionState, SideEffect};
pub use wire::{CreateReservationRequest, ReservationRecord, VehicleSummary};
