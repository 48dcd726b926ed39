pub mod error;
pub mod finalize;
pub mod round_robin;
pub mod slots;
pub mod validation;

pub use error::{FinalizeError, FinalizeStep, ScheduleError};
pub use finalize::LeagueFinalizer;
pub use slots::{SlotAssigner, SlotDefaults};
