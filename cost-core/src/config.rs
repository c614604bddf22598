/// Estimate file: horizon settings, line items and optional price overrides

use std::collections::HashSet;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::cost::engine::{CommitmentType, LineItem, TimelineSettings, UsagePattern};
use crate::cost::pricing::PriceTable;
use crate::error::{CostError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsSection {
    pub months: u32,
    #[serde(default)]
    pub usage: UsagePattern,
    /// Overrides `usage` when set
    #[serde(default)]
    pub usage_multiplier: Option<f64>,
    #[serde(default)]
    pub commitment: CommitmentType,
    /// Overrides `commitment` when set
    #[serde(default)]
    pub commitment_discount: Option<f64>,
    #[serde(default)]
    pub growth_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateConfig {
    pub settings: SettingsSection,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub prices: PriceTable,
}

impl EstimateConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EstimateConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<()> {
        self.prices.validate()?;

        let mut seen = HashSet::new();
        for item in &self.items {
            if item.name.trim().is_empty() {
                return Err(CostError::InvalidConfig(format!(
                    "line item for service {} has an empty name",
                    item.service
                )));
            }
            if !seen.insert(item.name.as_str()) {
                return Err(CostError::InvalidConfig(format!(
                    "duplicate line item name: {}",
                    item.name
                )));
            }
        }
        Ok(())
    }

    pub fn timeline_settings(&self) -> Result<TimelineSettings> {
        let s = &self.settings;
        TimelineSettings::new(
            s.months,
            s.usage_multiplier.unwrap_or_else(|| s.usage.multiplier()),
            s.growth_rate,
            s.commitment_discount
                .unwrap_or_else(|| s.commitment.discount_factor()),
        )
    }

    /// Built-in prices with this file's overrides applied.
    pub fn price_table(&self) -> PriceTable {
        PriceTable::new().with_overrides(&self.prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::pricing::PriceLookup;
    use crate::cost::services::ServiceIdentifier;

    const SAMPLE: &str = r#"
        [settings]
        months = 36
        usage = "business_hours"
        commitment = "reserved_1_year"
        growth_rate = 0.02

        [[items]]
        name = "web"
        service = "ec2"
        config = { instance_type = "t3.large", instance_count = 2, storage_size = 50 }

        [[items]]
        name = "orders-db"
        service = "rds"
        config = { instance_type = "db.m5.large", storage_size = 100, multi_az = true }

        [[items]]
        name = "cdn"
        service = "cloudfront"

        [prices.ec2]
        "t3.large" = 0.09
    "#;

    #[test]
    fn test_parse_sample() {
        let config = EstimateConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.items.len(), 3);
        assert_eq!(config.items[1].service, ServiceIdentifier::new("rds"));
        assert_eq!(config.items[1].config.flag("multi_az").unwrap(), Some(true));
        assert_eq!(config.items[0].config.number("instance_count").unwrap(), Some(2.0));
        assert!(config.items[2].config.is_empty());

        let settings = config.timeline_settings().unwrap();
        assert_eq!(settings.total_months, 36);
        assert_eq!(settings.usage_multiplier, 0.5);
        assert_eq!(settings.commitment_discount, 0.7);
        assert_eq!(settings.growth_rate, 0.02);

        let prices = config.price_table();
        assert_eq!(prices.lookup("ec2", "t3.large").unwrap(), 0.09);
        assert_eq!(prices.lookup("ec2", "t3.micro").unwrap(), 0.0104);
    }

    #[test]
    fn test_explicit_factors_win() {
        let config = EstimateConfig::from_toml_str(
            r#"
            [settings]
            months = 12
            usage = "development"
            usage_multiplier = 0.9
            commitment_discount = 0.65
            "#,
        )
        .unwrap();
        let settings = config.timeline_settings().unwrap();
        assert_eq!(settings.usage_multiplier, 0.9);
        assert_eq!(settings.commitment_discount, 0.65);
        assert_eq!(settings.growth_rate, 0.0);
    }

    #[test]
    fn test_invalid_settings_surface_on_conversion() {
        let config = EstimateConfig::from_toml_str("[settings]\nmonths = 0\n").unwrap();
        assert!(matches!(
            config.timeline_settings(),
            Err(CostError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = EstimateConfig::from_toml_str(
            r#"
            [settings]
            months = 12

            [[items]]
            name = "a"
            service = "s3"

            [[items]]
            name = "a"
            service = "ec2"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, CostError::InvalidConfig(_)));
    }

    #[test]
    fn test_unknown_usage_pattern_is_parse_error() {
        let err = EstimateConfig::from_toml_str("[settings]\nmonths = 12\nusage = \"weekly\"\n").unwrap_err();
        assert!(matches!(err, CostError::ConfigParse(_)));
    }
}
