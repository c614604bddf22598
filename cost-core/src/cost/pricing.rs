use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::error::{CostError, Result};
use crate::validation::ensure_unit_price;

/// Resolved unit prices consumed by the calculator.
///
/// Implementations are pure reads: the same `(service, attribute)` pair must
/// always resolve to the same price for the lifetime of the value.
pub trait PriceLookup: Send + Sync {
    fn lookup(&self, service: &str, attribute: &str) -> Result<f64>;

    /// Resolve a price, substituting a documented fallback when the table has
    /// no entry for `attribute`. Any other failure is propagated.
    fn lookup_or(&self, service: &str, attribute: &str, fallback: f64) -> Result<f64> {
        match self.lookup(service, attribute) {
            Err(CostError::UnknownAttribute { .. }) => {
                tracing::warn!(
                    service,
                    attribute,
                    fallback,
                    "No price entry, applying fallback unit price"
                );
                Ok(fallback)
            }
            other => other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceTable {
    prices: HashMap<String, HashMap<String, f64>>,
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}

impl PriceTable {
    /// Built-in list prices (USD, us-east-1 style).
    pub fn new() -> Self {
        let mut table = Self::empty();

        // EC2 on-demand, per instance-hour
        for (instance_type, price) in [
            ("t3.nano", 0.0052),
            ("t3.micro", 0.0104),
            ("t3.small", 0.0208),
            ("t3.medium", 0.0416),
            ("t3.large", 0.0832),
            ("t3.xlarge", 0.1664),
            ("m5.large", 0.096),
            ("m5.xlarge", 0.192),
            ("m5.2xlarge", 0.384),
            ("c5.large", 0.085),
            ("c5.xlarge", 0.17),
            ("r5.large", 0.126),
            ("r5.xlarge", 0.252),
        ] {
            table.insert("ec2", instance_type, price);
        }

        // EBS volumes attached to instances, per GB-month
        for (volume, price) in [
            ("gp3", 0.08),
            ("gp2", 0.10),
            ("io1", 0.125),
            ("st1", 0.045),
            ("sc1", 0.015),
        ] {
            table.insert("ebs", volume, price);
        }

        // RDS single-AZ, per instance-hour
        for (instance_type, price) in [
            ("db.t3.micro", 0.017),
            ("db.t3.small", 0.034),
            ("db.t3.medium", 0.068),
            ("db.t3.large", 0.136),
            ("db.m5.large", 0.171),
            ("db.m5.xlarge", 0.342),
            ("db.r5.large", 0.24),
        ] {
            table.insert("rds", instance_type, price);
        }
        table.insert("rds_storage", "gb_month", 0.115);

        // S3, per GB-month
        for (class, price) in [
            ("standard", 0.023),
            ("intelligent_tiering", 0.023),
            ("standard_ia", 0.0125),
            ("one_zone_ia", 0.01),
            ("glacier", 0.004),
            ("deep_archive", 0.00099),
        ] {
            table.insert("s3", class, price);
        }

        // Lambda
        table.insert("lambda", "requests", 0.0000002);
        table.insert("lambda", "gb_second", 0.0000166667);

        table
    }

    pub fn empty() -> Self {
        Self {
            prices: HashMap::new(),
        }
    }

    /// Parse an injected table of the form `[service] "attribute" = price`.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: PriceTable = toml::from_str(content)?;
        raw.validate()?;
        Ok(Self::empty().with_overrides(&raw))
    }

    /// Reject negative or non-finite prices.
    pub fn validate(&self) -> Result<()> {
        for (service, attributes) in &self.prices {
            for (attribute, price) in attributes {
                ensure_unit_price(service, attribute, *price)?;
            }
        }
        Ok(())
    }

    pub fn insert(&mut self, service: &str, attribute: &str, price: f64) {
        self.prices
            .entry(normalize_key(service))
            .or_default()
            .insert(normalize_key(attribute), price);
    }

    /// Layer `overrides` on top of this table; entries in `overrides` win.
    pub fn with_overrides(mut self, overrides: &PriceTable) -> Self {
        for (service, attributes) in &overrides.prices {
            for (attribute, price) in attributes {
                self.insert(service, attribute, *price);
            }
        }
        self
    }

    pub fn get_price(&self, service: &str, attribute: &str) -> Option<f64> {
        self.prices
            .get(&normalize_key(service))
            .and_then(|attributes| attributes.get(&normalize_key(attribute)))
            .copied()
    }

    pub fn services(&self) -> Vec<&str> {
        let mut services: Vec<&str> = self.prices.keys().map(String::as_str).collect();
        services.sort_unstable();
        services
    }

    /// Number of `(service, attribute)` entries.
    pub fn len(&self) -> usize {
        self.prices.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PriceLookup for PriceTable {
    fn lookup(&self, service: &str, attribute: &str) -> Result<f64> {
        self.get_price(service, attribute)
            .ok_or_else(|| CostError::unknown_attribute(service, attribute))
    }
}
