//! External API integrations

pub mod classifier;
pub mod weather;

pub use classifier::{CropClassifier, FilenameClassifier};
pub use weather::WeatherClient;
