//! HTTP handlers for the Q.Farm planner API

pub mod advisory;
pub mod forecast;
pub mod form;
pub mod health;
pub mod optimize;
pub mod plan;

pub use advisory::{create_advisory, list_advisories};
pub use forecast::{export_dataset, predict_price, train_price_model};
pub use health::health_check;
pub use optimize::optimize;
pub use plan::{generate_plan, get_plan, list_plans};
