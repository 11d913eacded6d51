//! Crop and soil image classification
//!
//! Images are classified from their file name. The [`CropClassifier`] trait
//! is the seam where a hosted vision model would plug in.

use std::path::Path;

use shared::{ClassificationResult, SoilMoisture, SoilSummary};

/// Classifies crop health from an uploaded image
pub trait CropClassifier: Send + Sync {
    fn classify(&self, image: &Path) -> ClassificationResult;
}

/// Keyword classifier over the image file name
#[derive(Debug, Clone, Copy, Default)]
pub struct FilenameClassifier;

fn file_name_lower(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

impl CropClassifier for FilenameClassifier {
    fn classify(&self, image: &Path) -> ClassificationResult {
        let name = file_name_lower(image);
        let (label, confidence) = if name.contains("aphid") {
            ("Aphid infestation", 0.92)
        } else if name.contains("blight") {
            ("Blight disease", 0.89)
        } else {
            ("Healthy crop", 0.80)
        };
        ClassificationResult {
            label: label.to_string(),
            confidence,
        }
    }
}

/// Soil moisture summary from a soil photo's file name
pub fn soil_summary(image: Option<&Path>) -> SoilSummary {
    let Some(image) = image else {
        return SoilSummary {
            moisture: SoilMoisture::Unknown,
            notes: "No image".to_string(),
        };
    };
    let name = file_name_lower(image);
    let (moisture, notes) = if name.contains("dry") {
        (SoilMoisture::Low, "Add compost/green manure")
    } else if name.contains("wet") {
        (SoilMoisture::High, "Improve drainage; avoid waterlogging")
    } else {
        (SoilMoisture::Moderate, "Maintain mulch; add organic matter")
    };
    SoilSummary {
        moisture,
        notes: notes.to_string(),
    }
}
