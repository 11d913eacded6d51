//! Business logic services

pub mod advisory;
pub mod forecast;
pub mod plan;
pub mod uploads;

pub use advisory::AdvisoryService;
pub use forecast::ForecastService;
pub use plan::PlanService;
