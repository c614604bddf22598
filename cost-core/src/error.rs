use thiserror::Error;
use serde_json::Error as JsonError;
use std::io::Error as IoError;
use toml::de::Error as TomlError;

#[derive(Error, Debug)]
pub enum CostError {
    #[error("Unknown price attribute: {service}/{attribute}")]
    UnknownAttribute { service: String, attribute: String },

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] TomlError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] JsonError),

    #[error("IO error: {0}")]
    Io(#[from] IoError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Task failed: {0}")]
    Task(String),
}

impl CostError {
    pub fn unknown_attribute(service: impl Into<String>, attribute: impl Into<String>) -> Self {
        CostError::UnknownAttribute {
            service: service.into(),
            attribute: attribute.into(),
        }
    }
}

impl From<tokio::task::JoinError> for CostError {
    fn from(err: tokio::task::JoinError) -> Self {
        CostError::Task(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CostError>;
