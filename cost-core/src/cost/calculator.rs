use std::sync::Arc;
use super::pricing::{PriceLookup, PriceTable};
use super::services::{
    ComputeSpec, DatabaseSpec, ObjectStorageSpec, ServerlessSpec, ServiceConfiguration,
    ServiceIdentifier, ServiceKind, ServiceSpec,
};
use crate::error::Result;

/// Average hours in a month.
pub const HOURS_PER_MONTH: f64 = 730.0;

/// Price-table key for volume classes attached to compute instances. Kept
/// apart from `ec2` so a volume class never resolves as an instance type.
pub const VOLUME_PRICE_KEY: &str = "ebs";
/// Price-table key and attribute for database storage, per GB-month.
pub const DATABASE_STORAGE_PRICE_KEY: &str = "rds_storage";
pub const DATABASE_STORAGE_ATTRIBUTE: &str = "gb_month";

/// Fallback for an unpriced attached volume class, per GB-month.
pub const FALLBACK_COMPUTE_STORAGE_PRICE: f64 = 0.10;
/// Fallback for database storage, per GB-month.
pub const FALLBACK_DATABASE_STORAGE_PRICE: f64 = 0.115;
/// Fallback per serverless invocation.
pub const FALLBACK_INVOCATION_PRICE: f64 = 0.0000002;
/// Fallback per serverless GB-second.
pub const FALLBACK_GB_SECOND_PRICE: f64 = 0.0000166667;

pub struct BasePriceCalculator {
    prices: Arc<dyn PriceLookup>,
}

impl BasePriceCalculator {
    pub fn new(prices: Arc<dyn PriceLookup>) -> Self {
        Self { prices }
    }

    /// Base monthly cost for one line item.
    ///
    /// Unrecognized services price at zero. Instance types and object storage
    /// classes missing from the table fail with `UnknownAttribute`; the other
    /// attributes fall back to the `FALLBACK_*` unit prices.
    pub fn compute_base_price(
        &self,
        service: &ServiceIdentifier,
        config: &ServiceConfiguration,
    ) -> Result<f64> {
        match ServiceSpec::resolve(service, config)? {
            ServiceSpec::Compute(spec) => self.compute(&spec),
            ServiceSpec::ManagedDatabase(spec) => self.database(&spec),
            ServiceSpec::ObjectStorage(spec) => self.object_storage(&spec),
            ServiceSpec::Serverless(spec) => self.serverless(&spec),
            ServiceSpec::Unrecognized(id) => {
                tracing::debug!(service = %id, "Unrecognized service, pricing at zero");
                Ok(0.0)
            }
        }
    }

    fn compute(&self, spec: &ComputeSpec) -> Result<f64> {
        let hourly = self
            .prices
            .lookup(ServiceKind::Compute.price_key(), &spec.instance_type)?;
        let storage_unit = self.prices.lookup_or(
            VOLUME_PRICE_KEY,
            &spec.storage_class,
            FALLBACK_COMPUTE_STORAGE_PRICE,
        )?;
        Ok(hourly * HOURS_PER_MONTH * spec.instance_count + spec.storage_size * storage_unit)
    }

    fn database(&self, spec: &DatabaseSpec) -> Result<f64> {
        let hourly = self
            .prices
            .lookup(ServiceKind::ManagedDatabase.price_key(), &spec.instance_type)?;
        let storage_unit = self.prices.lookup_or(
            DATABASE_STORAGE_PRICE_KEY,
            DATABASE_STORAGE_ATTRIBUTE,
            FALLBACK_DATABASE_STORAGE_PRICE,
        )?;
        let subtotal = hourly * HOURS_PER_MONTH + spec.storage_size * storage_unit;
        // Standby replica bills instance and storage alike.
        if spec.high_availability {
            Ok(subtotal * 2.0)
        } else {
            Ok(subtotal)
        }
    }

    fn object_storage(&self, spec: &ObjectStorageSpec) -> Result<f64> {
        let unit = self
            .prices
            .lookup(ServiceKind::ObjectStorage.price_key(), &spec.storage_class)?;
        Ok(spec.storage_size * unit)
    }

    fn serverless(&self, spec: &ServerlessSpec) -> Result<f64> {
        let key = ServiceKind::Serverless.price_key();
        let invocation_unit = self
            .prices
            .lookup_or(key, "requests", FALLBACK_INVOCATION_PRICE)?;
        let compute_unit = self
            .prices
            .lookup_or(key, "gb_second", FALLBACK_GB_SECOND_PRICE)?;
        Ok(spec.requests * invocation_unit + spec.gb_seconds() * compute_unit)
    }
}

impl Default for BasePriceCalculator {
    fn default() -> Self {
        Self::new(Arc::new(PriceTable::new()))
    }
}
