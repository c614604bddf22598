/// Service identifiers, attribute maps and their typed per-service views

use std::collections::BTreeMap;
use std::fmt;
use serde::{Deserialize, Serialize};
use crate::error::{CostError, Result};
use crate::validation::ensure_non_negative;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceIdentifier(String);

impl ServiceIdentifier {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServiceIdentifier {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ServiceIdentifier {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Flag(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Number(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        ConfigValue::Number(value as f64)
    }
}

impl From<u32> for ConfigValue {
    fn from(value: u32) -> Self {
        ConfigValue::Number(value as f64)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Number(value as f64)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Text(value)
    }
}

/// Attribute map for one line item. Keys are service specific.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceConfiguration {
    values: BTreeMap<String, ConfigValue>,
}

impl ServiceConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Non-negative number, if present. Numeric strings are accepted.
    pub fn number(&self, key: &str) -> Result<Option<f64>> {
        let value = match self.values.get(key) {
            None => return Ok(None),
            Some(ConfigValue::Number(n)) => *n,
            Some(ConfigValue::Text(s)) => s.trim().parse::<f64>().map_err(|_| {
                CostError::InvalidSettings(format!("{} must be numeric, got {:?}", key, s))
            })?,
            Some(ConfigValue::Flag(_)) => {
                return Err(CostError::InvalidSettings(format!("{} must be numeric, got a flag", key)));
            }
        };
        ensure_non_negative(key, value).map(Some)
    }

    pub fn text(&self, key: &str) -> Result<Option<&str>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(ConfigValue::Text(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(CostError::InvalidSettings(format!(
                "{} must be text, got {:?}",
                key, other
            ))),
        }
    }

    pub fn flag(&self, key: &str) -> Result<Option<bool>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(ConfigValue::Flag(b)) => Ok(Some(*b)),
            Some(ConfigValue::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" => Ok(Some(true)),
                "false" | "no" => Ok(Some(false)),
                _ => Err(CostError::InvalidSettings(format!("{} must be a flag, got {:?}", key, s))),
            },
            Some(other) => Err(CostError::InvalidSettings(format!(
                "{} must be a flag, got {:?}",
                key, other
            ))),
        }
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for ServiceConfiguration {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    Compute,
    ManagedDatabase,
    ObjectStorage,
    Serverless,
}

impl ServiceKind {
    pub fn from_identifier(service: &ServiceIdentifier) -> Option<Self> {
        match service.as_str().trim().to_ascii_lowercase().as_str() {
            "ec2" | "compute" => Some(ServiceKind::Compute),
            "rds" | "database" => Some(ServiceKind::ManagedDatabase),
            "s3" | "object_storage" => Some(ServiceKind::ObjectStorage),
            "lambda" | "serverless" => Some(ServiceKind::Serverless),
            _ => None,
        }
    }

    /// Service key used for price-table lookups.
    pub fn price_key(&self) -> &'static str {
        match self {
            ServiceKind::Compute => "ec2",
            ServiceKind::ManagedDatabase => "rds",
            ServiceKind::ObjectStorage => "s3",
            ServiceKind::Serverless => "lambda",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComputeSpec {
    pub instance_type: String,
    pub instance_count: f64,
    pub storage_size: f64,
    pub storage_class: String,
}

impl ComputeSpec {
    pub const DEFAULT_INSTANCE_TYPE: &'static str = "t3.micro";
    pub const DEFAULT_INSTANCE_COUNT: f64 = 1.0;
    pub const DEFAULT_STORAGE_SIZE: f64 = 30.0;
    pub const DEFAULT_STORAGE_CLASS: &'static str = "gp3";

    fn from_config(config: &ServiceConfiguration) -> Result<Self> {
        Ok(Self {
            instance_type: config
                .text("instance_type")?
                .unwrap_or(Self::DEFAULT_INSTANCE_TYPE)
                .to_string(),
            instance_count: config
                .number("instance_count")?
                .unwrap_or(Self::DEFAULT_INSTANCE_COUNT),
            storage_size: config
                .number("storage_size")?
                .unwrap_or(Self::DEFAULT_STORAGE_SIZE),
            storage_class: config
                .text("storage_class")?
                .unwrap_or(Self::DEFAULT_STORAGE_CLASS)
                .to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseSpec {
    pub instance_type: String,
    pub storage_size: f64,
    pub high_availability: bool,
}

impl DatabaseSpec {
    pub const DEFAULT_INSTANCE_TYPE: &'static str = "db.t3.micro";
    pub const DEFAULT_STORAGE_SIZE: f64 = 20.0;

    fn from_config(config: &ServiceConfiguration) -> Result<Self> {
        let high_availability = match config.flag("multi_az")? {
            Some(flag) => flag,
            None => config.flag("high_availability")?.unwrap_or(false),
        };
        Ok(Self {
            instance_type: config
                .text("instance_type")?
                .unwrap_or(Self::DEFAULT_INSTANCE_TYPE)
                .to_string(),
            storage_size: config
                .number("storage_size")?
                .unwrap_or(Self::DEFAULT_STORAGE_SIZE),
            high_availability,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectStorageSpec {
    pub storage_size: f64,
    pub storage_class: String,
}

impl ObjectStorageSpec {
    pub const DEFAULT_STORAGE_SIZE: f64 = 100.0;
    pub const DEFAULT_STORAGE_CLASS: &'static str = "standard";

    fn from_config(config: &ServiceConfiguration) -> Result<Self> {
        Ok(Self {
            storage_size: config
                .number("storage_size")?
                .unwrap_or(Self::DEFAULT_STORAGE_SIZE),
            storage_class: config
                .text("storage_class")?
                .unwrap_or(Self::DEFAULT_STORAGE_CLASS)
                .to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerlessSpec {
    pub requests: f64,
    pub duration_ms: f64,
    pub memory_mb: f64,
}

impl ServerlessSpec {
    pub const DEFAULT_REQUESTS: f64 = 1_000_000.0;
    pub const DEFAULT_DURATION_MS: f64 = 100.0;
    pub const DEFAULT_MEMORY_MB: f64 = 128.0;

    fn from_config(config: &ServiceConfiguration) -> Result<Self> {
        Ok(Self {
            requests: config.number("requests")?.unwrap_or(Self::DEFAULT_REQUESTS),
            duration_ms: config
                .number("duration_ms")?
                .unwrap_or(Self::DEFAULT_DURATION_MS),
            memory_mb: config.number("memory_mb")?.unwrap_or(Self::DEFAULT_MEMORY_MB),
        })
    }

    pub fn gb_seconds(&self) -> f64 {
        self.requests * self.duration_ms * self.memory_mb / (1000.0 * 1024.0)
    }
}

/// A line item's configuration resolved into its service-specific schema.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceSpec {
    Compute(ComputeSpec),
    ManagedDatabase(DatabaseSpec),
    ObjectStorage(ObjectStorageSpec),
    Serverless(ServerlessSpec),
    Unrecognized(ServiceIdentifier),
}

impl ServiceSpec {
    pub fn resolve(service: &ServiceIdentifier, config: &ServiceConfiguration) -> Result<Self> {
        let Some(kind) = ServiceKind::from_identifier(service) else {
            return Ok(ServiceSpec::Unrecognized(service.clone()));
        };
        Ok(match kind {
            ServiceKind::Compute => ServiceSpec::Compute(ComputeSpec::from_config(config)?),
            ServiceKind::ManagedDatabase => {
                ServiceSpec::ManagedDatabase(DatabaseSpec::from_config(config)?)
            }
            ServiceKind::ObjectStorage => {
                ServiceSpec::ObjectStorage(ObjectStorageSpec::from_config(config)?)
            }
            ServiceKind::Serverless => ServiceSpec::Serverless(ServerlessSpec::from_config(config)?),
        })
    }

    pub fn kind(&self) -> Option<ServiceKind> {
        match self {
            ServiceSpec::Compute(_) => Some(ServiceKind::Compute),
            ServiceSpec::ManagedDatabase(_) => Some(ServiceKind::ManagedDatabase),
            ServiceSpec::ObjectStorage(_) => Some(ServiceKind::ObjectStorage),
            ServiceSpec::Serverless(_) => Some(ServiceKind::Serverless),
            ServiceSpec::Unrecognized(_) => None,
        }
    }
}
