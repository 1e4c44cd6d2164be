pub mod tracker;
pub mod window;

pub use tracker::{AvailabilityTracker, CatalogOutcome, EntityState, FlagInventoryOutcome, TransitionEvent};
pub use window::{HourRange, ScheduleWindow};
