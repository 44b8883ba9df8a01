//! Domain entities.

pub mod catalog;
pub mod countdown;
pub mod roster;

pub use catalog::{Catalog, ProblemStatement};
pub use countdown::{Countdown, DEFAULT_DURATION_MS, TickOutcome};
pub use roster::{Roster, Task, TaskStatus, Team};
