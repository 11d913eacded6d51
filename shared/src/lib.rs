//! Planning core for the Q.Farm crop planner
//!
//! This crate contains the price forecaster, the weekly resource optimizer and
//! the domain types shared between the backend, the frontend (via WASM), and
//! other components of the system.

pub mod artifact;
pub mod cleaning;
pub mod error;
pub mod forecaster;
pub mod models;
pub mod optimizer;
pub mod pricing;
pub mod regression;
pub mod resolution;
pub mod season;
pub mod types;
pub mod validation;

pub use error::{PlannerError, PlannerResult};
pub use models::*;
pub use types::*;
pub use validation::*;
