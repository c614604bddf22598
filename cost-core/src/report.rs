use std::fmt::Write;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::cost::engine::{PricingResult, TimelineSettings};
use crate::cost::portfolio::PortfolioSummary;
use crate::error::Result;

/// Export document handed to reporting and visualization consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateReport {
    pub id: String,
    pub generated_at: DateTime<Utc>,
    pub settings: TimelineSettings,
    pub items: Vec<PricingResult>,
    pub summary: PortfolioSummary,
}

impl EstimateReport {
    pub fn new(settings: TimelineSettings, items: Vec<PricingResult>, summary: PortfolioSummary) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            settings,
            items,
            summary,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn render_table(&self) -> String {
        let mut out = String::new();
        let s = &self.summary;

        let _ = writeln!(
            out,
            "{:<20} {:<12} {:>12} {:>12} {:>12} {:>14} {:>7}",
            "ITEM", "SERVICE", "BASE/MO", "ADJ/MO", "NET/MO", "TOTAL", "SHARE"
        );
        for (item, share) in self.items.iter().zip(&s.shares) {
            let note = if item.informational { " *" } else { "" };
            let _ = writeln!(
                out,
                "{:<20} {:<12} {:>12.2} {:>12.2} {:>12.2} {:>14.2} {:>6.1}%{}",
                item.label,
                item.service.as_str(),
                item.base_monthly_cost,
                item.adjusted_monthly_cost,
                item.discounted_monthly_cost,
                item.total_timeline_cost,
                share.share * 100.0,
                note
            );
        }

        let _ = writeln!(out);
        for year in &s.combined.yearly {
            let _ = writeln!(out, "Year {:<3} ({:>2} months) {:>14.2}", year.year, year.months, year.cost);
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Horizon:              {} months", s.horizon_months);
        let _ = writeln!(out, "Total cost:           {:.2}", s.total_timeline_cost);
        let _ = writeln!(out, "Average monthly:      {:.2}", s.average_monthly_cost);
        let _ = writeln!(out, "Average yearly:       {:.2}", s.average_yearly_cost);
        let _ = writeln!(out, "Commitment savings:   {:.2}/month", s.total_commitment_savings);
        if self.items.iter().any(|i| i.informational) {
            let _ = writeln!(out, "* unrecognized service, shown for information only");
        }
        out
    }
}
