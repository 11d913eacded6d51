//! Domain models for the Q.Farm planner

mod advisory;
mod forecast;
mod plan;
mod record;
mod schedule;
mod weather;

pub use advisory::*;
pub use forecast::*;
pub use plan::*;
pub use record::*;
pub use schedule::*;
pub use weather::*;
