//! Weekly resource optimizer
//!
//! The rule-based optimizer lays out a basal + three top-dressing fertilizer
//! pattern, an alternating wet/dry irrigation cycle and two preventive neem
//! sprays, then enforces the optional budget and water caps by scaling the
//! schedule down. Any other solver plugs in behind [`ResourceOptimizer`] with
//! the same request and result types.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::{
    FertilizerDose, IrrigationEntry, OptimizationRequest, OptimizationResult, PestAction,
};

/// Weeks receiving a fertilizer dose (basal, then top-dressings)
pub const FERTILIZER_WEEKS: [u32; 4] = [1, 4, 8, 12];
/// Weeks receiving a pest intervention
pub const PEST_WEEKS: [u32; 2] = [6, 10];
pub const PEST_ACTION: &str = "Neem spray";

/// Dose per application, kg per acre
pub const DOSE_NITROGEN: f64 = 30.0;
pub const DOSE_PHOSPHORUS: f64 = 15.0;
pub const DOSE_POTASSIUM: f64 = 15.0;

/// Irrigation depth on even (wet) and odd (dry) weeks, mm
pub const WET_WEEK_MM: f64 = 25.0;
pub const DRY_WEEK_MM: f64 = 15.0;

/// Score of a plan that delivers its full nominal schedule
pub const BASELINE_OBJECTIVE: f64 = 0.75;

/// Input prices used to cost a schedule
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CostModel {
    /// INR per kg of N, P or K
    pub nutrient_cost_per_kg: f64,
    /// INR per acre for one pest intervention
    pub pest_action_cost_per_acre: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            nutrient_cost_per_kg: 28.0,
            pest_action_cost_per_acre: 350.0,
        }
    }
}

/// A solver producing a weekly resource schedule
pub trait ResourceOptimizer: Send + Sync {
    fn name(&self) -> &'static str;

    fn optimize(&self, request: &OptimizationRequest) -> OptimizationResult;
}

/// Deterministic fixed-rule optimizer with cap enforcement
#[derive(Debug, Clone, Default)]
pub struct RuleBasedOptimizer {
    costs: CostModel,
}

impl RuleBasedOptimizer {
    pub fn new(costs: CostModel) -> Self {
        Self { costs }
    }

    pub fn costs(&self) -> &CostModel {
        &self.costs
    }
}

/// Nominal (unconstrained) schedule for a season
fn nominal_schedule(weeks: u32) -> (Vec<FertilizerDose>, Vec<IrrigationEntry>, Vec<PestAction>) {
    let mut fertilizer = Vec::with_capacity(weeks as usize);
    let mut irrigation = Vec::with_capacity(weeks as usize);
    let mut pests = Vec::new();

    for week in 1..=weeks {
        fertilizer.push(if FERTILIZER_WEEKS.contains(&week) {
            FertilizerDose {
                week,
                nitrogen: DOSE_NITROGEN,
                phosphorus: DOSE_PHOSPHORUS,
                potassium: DOSE_POTASSIUM,
            }
        } else {
            FertilizerDose::zero(week)
        });

        irrigation.push(IrrigationEntry {
            week,
            mm: if week % 2 == 0 { WET_WEEK_MM } else { DRY_WEEK_MM },
        });

        if PEST_WEEKS.contains(&week) {
            pests.push(PestAction {
                week,
                action: PEST_ACTION.to_string(),
            });
        }
    }

    (fertilizer, irrigation, pests)
}

/// Delivered over nominal, 1 when nothing was planned
fn fulfilment(delivered: f64, nominal: f64) -> f64 {
    if nominal > 0.0 {
        (delivered / nominal).clamp(0.0, 1.0)
    } else {
        1.0
    }
}

/// Spend rounded to cents. Rounding never lifts it above the budget.
fn spend_in_currency(cost: f64, budget: Option<f64>) -> Decimal {
    let Some(budget) = budget else {
        return Decimal::from_f64_retain(cost).unwrap_or_default().round_dp(2);
    };
    // Scaling noise can leave the float a hair over the cap
    let exact = Decimal::from_f64_retain(cost.min(budget)).unwrap_or_default();
    let cap = Decimal::from_f64_retain(budget).unwrap_or_default();
    let rounded = exact.round_dp(2);
    if rounded > cap {
        exact.round_dp_with_strategy(2, RoundingStrategy::ToZero)
    } else {
        rounded
    }
}

/// Finite, non-negative cap; non-finite caps are ignored
fn sanitize_cap(cap: Option<f64>) -> Option<f64> {
    cap.filter(|c| c.is_finite()).map(|c| c.max(0.0))
}

impl ResourceOptimizer for RuleBasedOptimizer {
    fn name(&self) -> &'static str {
        "rule_based"
    }

    fn optimize(&self, request: &OptimizationRequest) -> OptimizationResult {
        let area = if request.area_acres.is_finite() {
            request.area_acres.max(0.0)
        } else {
            0.0
        };
        let (mut fertilizer, mut irrigation, mut pests) = nominal_schedule(request.weeks);

        // Water cap: scale every week by the same factor
        let nominal_water: f64 = irrigation.iter().map(|i| i.mm).sum();
        if let Some(limit) = sanitize_cap(request.water_limit) {
            if nominal_water > limit {
                let factor = limit / nominal_water;
                for entry in irrigation.iter_mut() {
                    entry.mm = crate::models::floor_to_tenth(entry.mm * factor);
                }
                tracing::info!(limit, nominal_water, factor, "Irrigation scaled to water limit");
            }
        }
        let total_irrigation_mm: f64 = irrigation.iter().map(|i| i.mm).sum();

        // Budget: pest actions first, fertilizer scaled into what remains
        let nominal_nutrients: f64 = fertilizer.iter().map(FertilizerDose::nutrient_kg).sum();
        let nominal_pests = pests.len();
        let pest_cost_each = area * self.costs.pest_action_cost_per_acre;
        let fertilizer_cost = |nutrients: f64| area * nutrients * self.costs.nutrient_cost_per_kg;

        if let Some(budget) = sanitize_cap(request.budget) {
            if pest_cost_each > 0.0 {
                let affordable = (budget / pest_cost_each).floor() as usize;
                if affordable < pests.len() {
                    pests.truncate(affordable);
                    tracing::info!(budget, kept = affordable, "Pest actions dropped to fit budget");
                }
            }
            let remaining = (budget - pests.len() as f64 * pest_cost_each).max(0.0);
            let nominal_fertilizer_cost = fertilizer_cost(nominal_nutrients);
            if nominal_fertilizer_cost > remaining {
                let factor = remaining / nominal_fertilizer_cost;
                fertilizer = fertilizer.iter().map(|dose| dose.scaled(factor)).collect();
                tracing::info!(budget, factor, "Fertilizer scaled to budget");
            }
        }

        let delivered_nutrients: f64 = fertilizer.iter().map(FertilizerDose::nutrient_kg).sum();
        let projected_cost = spend_in_currency(
            fertilizer_cost(delivered_nutrients) + pests.len() as f64 * pest_cost_each,
            sanitize_cap(request.budget),
        );

        let objective_value = BASELINE_OBJECTIVE
            * (fulfilment(delivered_nutrients, nominal_nutrients)
                + fulfilment(total_irrigation_mm, nominal_water)
                + fulfilment(pests.len() as f64, nominal_pests as f64))
            / 3.0;

        OptimizationResult {
            objective_value,
            fertilizer_plan: fertilizer,
            irrigation_plan: irrigation,
            pest_actions: pests,
            total_irrigation_mm,
            projected_cost: Some(projected_cost),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(weeks: u32) -> OptimizationRequest {
        OptimizationRequest {
            area_acres: 5.0,
            budget: None,
            water_limit: None,
            weeks,
        }
    }

    #[test]
    fn test_fixed_rule_literals() {
        let result = RuleBasedOptimizer::default().optimize(&request(12));

        for dose in &result.fertilizer_plan {
            if FERTILIZER_WEEKS.contains(&dose.week) {
                assert_eq!((dose.nitrogen, dose.phosphorus, dose.potassium), (30.0, 15.0, 15.0));
            } else {
                assert_eq!(dose.nutrient_kg(), 0.0);
            }
        }
        assert_eq!(result.irrigation_plan[1].mm, 25.0);
        assert_eq!(result.irrigation_plan[2].mm, 15.0);
        let pest_weeks: Vec<u32> = result.pest_actions.iter().map(|p| p.week).collect();
        assert_eq!(pest_weeks, vec![6, 10]);
        assert!(result.pest_actions.iter().all(|p| p.action == "Neem spray"));
        assert_eq!(result.objective_value, BASELINE_OBJECTIVE);
        assert_eq!(result.total_irrigation_mm, 240.0);
    }

    #[test]
    fn test_short_season_clips_rules() {
        let result = RuleBasedOptimizer::default().optimize(&request(5));
        assert_eq!(result.fertilizer_plan.len(), 5);
        let dosed: Vec<u32> = result
            .fertilizer_plan
            .iter()
            .filter(|d| d.nutrient_kg() > 0.0)
            .map(|d| d.week)
            .collect();
        assert_eq!(dosed, vec![1, 4]);
        assert!(result.pest_actions.is_empty());
    }

    #[test]
    fn test_empty_season() {
        let result = RuleBasedOptimizer::default().optimize(&request(0));
        assert!(result.fertilizer_plan.is_empty());
        assert!(result.irrigation_plan.is_empty());
        assert!(result.pest_actions.is_empty());
        assert!(result.objective_value.is_finite());
        assert_eq!(result.projected_cost, Some(Decimal::ZERO));
    }

    #[test]
    fn test_water_limit_scales_irrigation() {
        let mut req = request(12);
        req.water_limit = Some(120.0);
        let result = RuleBasedOptimizer::default().optimize(&req);
        assert!(result.total_irrigation_mm <= 120.0);
        assert_eq!(result.irrigation_plan[1].mm, 12.5);
        assert_eq!(result.irrigation_plan[0].mm, 7.5);
        assert!(result.objective_value < BASELINE_OBJECTIVE);
    }

    #[test]
    fn test_generous_caps_change_nothing() {
        let mut req = request(12);
        req.budget = Some(1_000_000.0);
        req.water_limit = Some(10_000.0);
        let constrained = RuleBasedOptimizer::default().optimize(&req);
        let free = RuleBasedOptimizer::default().optimize(&request(12));
        assert_eq!(constrained, free);
    }

    #[test]
    fn test_budget_scales_fertilizer_and_keeps_pests() {
        // Nominal: 4 doses x 60 kg x 5 acres x 28 = 33600, pests 2 x 5 x 350 = 3500
        let mut req = request(12);
        req.budget = Some(3500.0 + 16800.0);
        let result = RuleBasedOptimizer::default().optimize(&req);
        assert_eq!(result.pest_actions.len(), 2);
        assert_eq!(result.fertilizer_plan[0].nitrogen, 15.0);
        assert_eq!(result.fertilizer_plan[0].phosphorus, 7.5);
        assert_eq!(result.projected_cost, Some(Decimal::from(20300)));
    }

    #[test]
    fn test_tiny_budget_drops_pests_latest_first() {
        let mut req = request(12);
        req.budget = Some(2000.0);
        let result = RuleBasedOptimizer::default().optimize(&req);
        assert_eq!(result.pest_actions.len(), 1);
        assert_eq!(result.pest_actions[0].week, 6);
        let cost = result.projected_cost.unwrap();
        assert!(cost <= Decimal::from(2000));
    }

    #[test]
    fn test_spend_rounding_stays_under_budget() {
        let cap = 10023.239;
        let spend = spend_in_currency(10023.238, Some(cap));
        assert_eq!(spend, Decimal::new(1002323, 2));

        let mut req = request(12);
        req.area_acres = 1.4659;
        req.budget = Some(cap);
        let cost = RuleBasedOptimizer::default().optimize(&req).projected_cost.unwrap();
        assert!(cost <= Decimal::from_f64_retain(cap).unwrap());
    }

    #[test]
    fn test_spend_without_budget_rounds_to_nearest_cent() {
        assert_eq!(spend_in_currency(20299.999999996, None), Decimal::from(20300));
    }

    #[test]
    fn test_zero_area_costs_nothing() {
        let mut req = request(12);
        req.area_acres = -3.0;
        req.budget = Some(0.0);
        let result = RuleBasedOptimizer::default().optimize(&req);
        assert_eq!(result.pest_actions.len(), 2);
        assert_eq!(result.projected_cost, Some(Decimal::ZERO));
        assert_eq!(result.objective_value, BASELINE_OBJECTIVE);
    }

    #[test]
    fn test_allocations_join_weeks() {
        let result = RuleBasedOptimizer::default().optimize(&request(12));
        let allocations = result.allocations();
        assert_eq!(allocations.len(), 12);
        assert_eq!(allocations[5].pest_action.as_deref(), Some("Neem spray"));
        assert_eq!(allocations[4].pest_action, None);
        assert_eq!(allocations[0].irrigation_mm, 15.0);
    }
}
