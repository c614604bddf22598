use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use super::calculator::BasePriceCalculator;
use super::pricing::{PriceLookup, PriceTable};
use super::services::{ServiceConfiguration, ServiceIdentifier, ServiceKind};
use super::timeline::{TimelineProjector, TimelineSeries, MONTHS_PER_YEAR};
use crate::error::{CostError, Result};
use crate::validation::{ensure_non_negative, ensure_positive, ensure_retained_fraction};

/// Expected utilization intensity of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsagePattern {
    /// Roughly 8 hours on weekdays
    Development,
    BusinessHours,
    Extended,
    #[default]
    AlwaysOn,
}

impl UsagePattern {
    pub fn multiplier(&self) -> f64 {
        match self {
            UsagePattern::Development => 0.25,
            UsagePattern::BusinessHours => 0.5,
            UsagePattern::Extended => 0.75,
            UsagePattern::AlwaysOn => 1.0,
        }
    }
}

impl FromStr for UsagePattern {
    type Err = CostError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "development" | "dev" => Ok(UsagePattern::Development),
            "business_hours" => Ok(UsagePattern::BusinessHours),
            "extended" => Ok(UsagePattern::Extended),
            "always_on" | "24x7" | "production" => Ok(UsagePattern::AlwaysOn),
            other => Err(CostError::InvalidSettings(format!("unknown usage pattern: {}", other))),
        }
    }
}

/// Purchase commitment, expressed as the fraction of the price retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitmentType {
    #[default]
    OnDemand,
    SavingsPlan,
    #[serde(rename = "reserved_1_year")]
    Reserved1Year,
    #[serde(rename = "reserved_3_year")]
    Reserved3Year,
}

impl CommitmentType {
    pub fn discount_factor(&self) -> f64 {
        match self {
            CommitmentType::OnDemand => 1.0,
            CommitmentType::SavingsPlan => 0.8,
            CommitmentType::Reserved1Year => 0.7,
            CommitmentType::Reserved3Year => 0.5,
        }
    }
}

impl FromStr for CommitmentType {
    type Err = CostError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "on_demand" | "none" => Ok(CommitmentType::OnDemand),
            "savings_plan" => Ok(CommitmentType::SavingsPlan),
            "reserved_1_year" | "reserved_1yr" => Ok(CommitmentType::Reserved1Year),
            "reserved_3_year" | "reserved_3yr" => Ok(CommitmentType::Reserved3Year),
            other => Err(CostError::InvalidSettings(format!("unknown commitment type: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineSettings {
    pub total_months: u32,
    pub usage_multiplier: f64,
    /// Fractional month-over-month growth
    pub growth_rate: f64,
    /// Fraction of the adjusted price retained, in (0, 1]
    pub commitment_discount: f64,
}

impl TimelineSettings {
    pub fn new(
        total_months: u32,
        usage_multiplier: f64,
        growth_rate: f64,
        commitment_discount: f64,
    ) -> Result<Self> {
        let settings = Self {
            total_months,
            usage_multiplier,
            growth_rate,
            commitment_discount,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_choices(
        total_months: u32,
        usage: UsagePattern,
        commitment: CommitmentType,
        growth_rate: f64,
    ) -> Result<Self> {
        Self::new(total_months, usage.multiplier(), growth_rate, commitment.discount_factor())
    }

    pub fn validate(&self) -> Result<()> {
        if self.total_months == 0 {
            return Err(CostError::InvalidSettings(
                "total_months must be a positive integer".to_string(),
            ));
        }
        ensure_positive("usage_multiplier", self.usage_multiplier)?;
        ensure_non_negative("growth_rate", self.growth_rate)?;
        if self.growth_rate > 0.0 && 1.0 + self.growth_rate == 1.0 {
            return Err(CostError::InvalidSettings(format!(
                "growth_rate {} is below f64 resolution and would project a flat series",
                self.growth_rate
            )));
        }
        ensure_retained_fraction("commitment_discount", self.commitment_discount)?;
        Ok(())
    }

    /// Whole or partial years covered by the horizon.
    pub fn years(&self) -> u32 {
        (self.total_months as usize).div_ceil(MONTHS_PER_YEAR) as u32
    }
}

/// One configured service instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub service: ServiceIdentifier,
    #[serde(default)]
    pub config: ServiceConfiguration,
}

impl LineItem {
    pub fn new(
        name: impl Into<String>,
        service: impl Into<ServiceIdentifier>,
        config: ServiceConfiguration,
    ) -> Self {
        Self {
            name: name.into(),
            service: service.into(),
            config,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub label: String,
    pub service: ServiceIdentifier,
    /// Set for unrecognized services, which price at zero.
    pub informational: bool,
    pub base_monthly_cost: f64,
    pub adjusted_monthly_cost: f64,
    pub discounted_monthly_cost: f64,
    pub commitment_savings: f64,
    pub timeline: TimelineSeries,
    pub total_timeline_cost: f64,
}

impl fmt::Display for PricingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {:.2}/month, {:.2} over {} months",
            self.label,
            self.service,
            self.discounted_monthly_cost,
            self.total_timeline_cost,
            self.timeline.len()
        )
    }
}

pub struct PricingEngine {
    calculator: BasePriceCalculator,
    projector: TimelineProjector,
}

impl PricingEngine {
    pub fn new(prices: Arc<dyn PriceLookup>) -> Self {
        Self {
            calculator: BasePriceCalculator::new(prices),
            projector: TimelineProjector::new(),
        }
    }

    pub fn with_default_prices() -> Self {
        Self::new(Arc::new(PriceTable::new()))
    }

    pub fn price(
        &self,
        service: &ServiceIdentifier,
        config: &ServiceConfiguration,
        settings: &TimelineSettings,
    ) -> Result<PricingResult> {
        self.price_labelled(service.as_str(), service, config, settings)
    }

    pub fn price_line_item(&self, item: &LineItem, settings: &TimelineSettings) -> Result<PricingResult> {
        self.price_labelled(&item.name, &item.service, &item.config, settings)
    }

    /// Price every item in order; the first failure aborts the run.
    pub fn price_all(&self, items: &[LineItem], settings: &TimelineSettings) -> Result<Vec<PricingResult>> {
        settings.validate()?;
        items
            .iter()
            .map(|item| self.price_line_item(item, settings))
            .collect()
    }

    fn price_labelled(
        &self,
        label: &str,
        service: &ServiceIdentifier,
        config: &ServiceConfiguration,
        settings: &TimelineSettings,
    ) -> Result<PricingResult> {
        settings.validate()?;

        let base = self.calculator.compute_base_price(service, config)?;
        let adjusted = base * settings.usage_multiplier;
        let discounted = adjusted * settings.commitment_discount;
        let timeline = self
            .projector
            .project(discounted, settings.total_months, settings.growth_rate);
        let total_timeline_cost = timeline.total();

        tracing::debug!(
            label,
            service = %service,
            base,
            discounted,
            total = total_timeline_cost,
            "Priced line item"
        );

        Ok(PricingResult {
            label: label.to_string(),
            service: service.clone(),
            informational: ServiceKind::from_identifier(service).is_none(),
            base_monthly_cost: base,
            adjusted_monthly_cost: adjusted,
            discounted_monthly_cost: discounted,
            commitment_savings: adjusted - discounted,
            timeline,
            total_timeline_cost,
        })
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::with_default_prices()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// Engine whose `flat` service costs exactly `base` per month.
    fn flat_engine(base: f64) -> (PricingEngine, ServiceIdentifier, ServiceConfiguration) {
        let mut table = PriceTable::empty();
        table.insert("s3", "flat", base);
        let config = ServiceConfiguration::new()
            .with("storage_class", "flat")
            .with("storage_size", 1);
        (PricingEngine::new(Arc::new(table)), "s3".into(), config)
    }

    #[test]
    fn test_settings_validation() {
        assert!(TimelineSettings::new(12, 1.0, 0.0, 1.0).is_ok());
        assert!(TimelineSettings::new(0, 1.0, 0.0, 1.0).is_err());
        assert!(TimelineSettings::new(12, 0.0, 0.0, 1.0).is_err());
        assert!(TimelineSettings::new(12, 1.0, -0.1, 1.0).is_err());
        assert!(TimelineSettings::new(12, 1.0, 0.0, 0.0).is_err());
        assert!(TimelineSettings::new(12, 1.0, 0.0, 1.5).is_err());
    }

    #[test]
    fn test_unrepresentable_growth_rejected() {
        let err = TimelineSettings::new(12, 1.0, 1e-17, 1.0).unwrap_err();
        assert!(matches!(err, CostError::InvalidSettings(_)));
        assert!(TimelineSettings::new(12, 1.0, 1e-15, 1.0).is_ok());
    }

    #[test]
    fn test_settings_years() {
        assert_eq!(TimelineSettings::new(12, 1.0, 0.0, 1.0).unwrap().years(), 1);
        assert_eq!(TimelineSettings::new(13, 1.0, 0.0, 1.0).unwrap().years(), 2);
        assert_eq!(TimelineSettings::new(36, 1.0, 0.0, 1.0).unwrap().years(), 3);
    }

    #[test]
    fn test_choice_parsing() {
        assert_eq!("always-on".parse::<UsagePattern>().unwrap(), UsagePattern::AlwaysOn);
        assert_eq!("dev".parse::<UsagePattern>().unwrap(), UsagePattern::Development);
        assert_eq!(
            "reserved_3yr".parse::<CommitmentType>().unwrap(),
            CommitmentType::Reserved3Year
        );
        assert!("weekly".parse::<UsagePattern>().is_err());

        let settings = TimelineSettings::from_choices(
            24,
            UsagePattern::BusinessHours,
            CommitmentType::Reserved1Year,
            0.01,
        )
        .unwrap();
        assert_eq!(settings.usage_multiplier, 0.5);
        assert_eq!(settings.commitment_discount, 0.7);
    }

    #[test]
    fn test_adjustment_order() {
        let (engine, service, config) = flat_engine(200.0);
        let settings = TimelineSettings::new(6, 0.5, 0.0, 0.7).unwrap();
        let result = engine.price(&service, &config, &settings).unwrap();

        assert_eq!(result.base_monthly_cost, 200.0);
        assert_eq!(result.adjusted_monthly_cost, 200.0 * 0.5);
        assert_eq!(result.discounted_monthly_cost, 200.0 * 0.5 * 0.7);
        assert!(approx(result.commitment_savings, 30.0));
        assert_eq!(result.timeline.len(), 6);
        assert!(approx(result.total_timeline_cost, 420.0));
        assert!(!result.informational);
    }

    #[test]
    fn test_invalid_settings_rejected_before_lookup() {
        let engine = PricingEngine::with_default_prices();
        let config = ServiceConfiguration::new().with("instance_type", "x9.mega");
        let settings = TimelineSettings {
            total_months: 12,
            usage_multiplier: 1.0,
            growth_rate: 0.0,
            commitment_discount: 2.0,
        };
        let err = engine.price(&"ec2".into(), &config, &settings).unwrap_err();
        assert!(matches!(err, CostError::InvalidSettings(_)));
    }

    #[test]
    fn test_unrecognized_service_is_informational() {
        let engine = PricingEngine::with_default_prices();
        let settings = TimelineSettings::new(12, 1.0, 0.02, 1.0).unwrap();
        let result = engine
            .price(&"cloudfront".into(), &ServiceConfiguration::new(), &settings)
            .unwrap();
        assert!(result.informational);
        assert_eq!(result.total_timeline_cost, 0.0);
        assert_eq!(result.timeline.len(), 12);
    }

    #[test]
    fn test_price_all_keeps_order_and_labels() {
        let engine = PricingEngine::with_default_prices();
        let settings = TimelineSettings::new(12, 1.0, 0.0, 1.0).unwrap();
        let items = vec![
            LineItem::new("web", "ec2", ServiceConfiguration::new()),
            LineItem::new("assets", "s3", ServiceConfiguration::new()),
        ];
        let results = engine.price_all(&items, &settings).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].label, "web");
        assert_eq!(results[1].label, "assets");
        assert!(results[1].to_string().starts_with("assets (s3)"));
    }

    #[test]
    fn test_price_all_propagates_unknown_attribute() {
        let engine = PricingEngine::with_default_prices();
        let settings = TimelineSettings::new(12, 1.0, 0.0, 1.0).unwrap();
        let items = vec![
            LineItem::new("ok", "s3", ServiceConfiguration::new()),
            LineItem::new("bad", "ec2", ServiceConfiguration::new().with("instance_type", "nope")),
        ];
        let err = engine.price_all(&items, &settings).unwrap_err();
        assert!(matches!(err, CostError::UnknownAttribute { .. }));
    }
}
