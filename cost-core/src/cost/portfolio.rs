use serde::{Deserialize, Serialize};
use super::engine::PricingResult;
use super::services::ServiceIdentifier;
use super::timeline::{TimelineSeries, MONTHS_PER_YEAR};
use crate::error::{CostError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemShare {
    pub label: String,
    pub service: ServiceIdentifier,
    pub total_cost: f64,
    /// Fraction of the portfolio total, 0 when the total is 0
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub horizon_months: u32,
    pub horizon_years: u32,
    pub total_timeline_cost: f64,
    pub average_monthly_cost: f64,
    pub average_yearly_cost: f64,
    pub total_base_monthly_cost: f64,
    pub total_discounted_monthly_cost: f64,
    /// Sum of per-item monthly commitment savings
    pub total_commitment_savings: f64,
    pub shares: Vec<ItemShare>,
    /// Month-wise sum of every item's series
    pub combined: TimelineSeries,
}

#[derive(Debug, Clone, Copy)]
pub struct PortfolioAggregator {
    horizon_months: u32,
}

impl PortfolioAggregator {
    pub fn new(horizon_months: u32) -> Self {
        Self { horizon_months }
    }

    pub fn aggregate(&self, results: &[PricingResult]) -> Result<PortfolioSummary> {
        let months = self.horizon_months as usize;
        let years = months.div_ceil(MONTHS_PER_YEAR);
        if months == 0 {
            return Err(CostError::InvalidSettings(
                "cannot average over a zero-length horizon".to_string(),
            ));
        }

        let mut combined = vec![0.0; months];
        for result in results {
            if result.timeline.len() != months {
                return Err(CostError::InvalidSettings(format!(
                    "{} spans {} months, expected {}",
                    result.label,
                    result.timeline.len(),
                    months
                )));
            }
            for (slot, point) in combined.iter_mut().zip(&result.timeline.monthly) {
                *slot += point.cost;
            }
        }

        let total: f64 = results.iter().map(|r| r.total_timeline_cost).sum();
        let shares = results
            .iter()
            .map(|r| ItemShare {
                label: r.label.clone(),
                service: r.service.clone(),
                total_cost: r.total_timeline_cost,
                share: if total == 0.0 {
                    0.0
                } else {
                    r.total_timeline_cost / total
                },
            })
            .collect();

        Ok(PortfolioSummary {
            horizon_months: self.horizon_months,
            horizon_years: years as u32,
            total_timeline_cost: total,
            average_monthly_cost: total / months as f64,
            average_yearly_cost: total / years as f64,
            total_base_monthly_cost: results.iter().map(|r| r.base_monthly_cost).sum(),
            total_discounted_monthly_cost: results.iter().map(|r| r.discounted_monthly_cost).sum(),
            total_commitment_savings: results.iter().map(|r| r.commitment_savings).sum(),
            shares,
            combined: TimelineSeries::from_costs(combined),
        })
    }
}
