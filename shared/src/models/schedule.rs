//! Weekly resource schedule models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fertilizer dose for one week, in kg per acre
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FertilizerDose {
    pub week: u32,
    #[serde(rename = "N")]
    pub nitrogen: f64,
    #[serde(rename = "P")]
    pub phosphorus: f64,
    #[serde(rename = "K")]
    pub potassium: f64,
}

impl FertilizerDose {
    pub fn zero(week: u32) -> Self {
        Self {
            week,
            nitrogen: 0.0,
            phosphorus: 0.0,
            potassium: 0.0,
        }
    }

    /// Total nutrient mass of the dose (kg per acre)
    pub fn nutrient_kg(&self) -> f64 {
        self.nitrogen + self.phosphorus + self.potassium
    }

    /// Scale the dose down, truncating to 0.1 kg so a cap is never exceeded
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            week: self.week,
            nitrogen: floor_to_tenth(self.nitrogen * factor),
            phosphorus: floor_to_tenth(self.phosphorus * factor),
            potassium: floor_to_tenth(self.potassium * factor),
        }
    }
}

/// Irrigation depth for one week
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IrrigationEntry {
    pub week: u32,
    pub mm: f64,
}

/// A discrete pest intervention
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PestAction {
    pub week: u32,
    pub action: String,
}

/// Output of a resource optimizer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizationResult {
    pub objective_value: f64,
    pub fertilizer_plan: Vec<FertilizerDose>,
    pub irrigation_plan: Vec<IrrigationEntry>,
    pub pest_actions: Vec<PestAction>,
    /// Total irrigation depth over the season (mm)
    pub total_irrigation_mm: f64,
    /// Projected spend on fertilizer and pest actions (INR)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub projected_cost: Option<Decimal>,
}

impl OptimizationResult {
    pub fn weeks(&self) -> usize {
        self.fertilizer_plan.len()
    }

    /// Per-week view joining the three schedules
    pub fn allocations(&self) -> Vec<WeeklyAllocation> {
        self.fertilizer_plan
            .iter()
            .zip(self.irrigation_plan.iter())
            .map(|(fert, irr)| WeeklyAllocation {
                week: fert.week,
                fertilizer: *fert,
                irrigation_mm: irr.mm,
                pest_action: self
                    .pest_actions
                    .iter()
                    .find(|p| p.week == fert.week)
                    .map(|p| p.action.clone()),
            })
            .collect()
    }
}

/// Everything scheduled for a single week
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklyAllocation {
    pub week: u32,
    pub fertilizer: FertilizerDose,
    pub irrigation_mm: f64,
    pub pest_action: Option<String>,
}

/// Inputs to a resource optimizer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizationRequest {
    pub area_acres: f64,
    /// Total spend allowed for the season (INR)
    pub budget: Option<f64>,
    /// Total irrigation depth allowed for the season (mm)
    pub water_limit: Option<f64>,
    pub weeks: u32,
}

pub(crate) fn floor_to_tenth(value: f64) -> f64 {
    (value * 10.0 + 1e-9).floor() / 10.0
}
