use std::path::PathBuf;
use async_trait::async_trait;
use tokio::fs;
use super::pricing::PriceTable;
use crate::error::Result;

/// Supplies the resolved price table the engine reads from.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn load(&self) -> Result<PriceTable>;
}

/// The built-in list prices.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceSource;

#[async_trait]
impl PriceSource for StaticPriceSource {
    async fn load(&self) -> Result<PriceTable> {
        Ok(PriceTable::new())
    }
}

/// TOML price overrides layered over the built-in table.
///
/// A missing file falls back to the built-in table; a malformed one is an
/// error.
#[derive(Debug, Clone)]
pub struct FilePriceSource {
    path: PathBuf,
}

impl FilePriceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PriceSource for FilePriceSource {
    async fn load(&self) -> Result<PriceTable> {
        if !fs::try_exists(&self.path).await? {
            tracing::warn!(path = %self.path.display(), "Price file not found, using built-in prices");
            return Ok(PriceTable::new());
        }

        let content = fs::read_to_string(&self.path).await?;
        let overrides = PriceTable::from_toml_str(&content)?;
        tracing::info!(
            path = %self.path.display(),
            entries = overrides.len(),
            "Loaded price overrides"
        );
        Ok(PriceTable::new().with_overrides(&overrides))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::pricing::PriceLookup;
    use crate::error::CostError;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{}-{}.toml", name, uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_static_source() {
        let table = StaticPriceSource.load().await.unwrap();
        assert_eq!(table, PriceTable::new());
    }

    #[tokio::test]
    async fn test_missing_file_falls_back() {
        let source = FilePriceSource::new(scratch_path("missing-prices"));
        let table = source.load().await.unwrap();
        assert_eq!(table, PriceTable::new());
    }

    #[tokio::test]
    async fn test_file_overrides() {
        let path = scratch_path("prices");
        fs::write(&path, "[ec2]\n\"t3.micro\" = 0.5\n").await.unwrap();

        let table = FilePriceSource::new(&path).load().await.unwrap();
        assert_eq!(table.lookup("ec2", "t3.micro").unwrap(), 0.5);
        assert_eq!(table.lookup("s3", "standard").unwrap(), 0.023);

        fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let path = scratch_path("bad-prices");
        fs::write(&path, "[ec2]\n\"t3.micro\" = \"cheap\"\n").await.unwrap();

        let err = FilePriceSource::new(&path).load().await.unwrap_err();
        assert!(matches!(err, CostError::ConfigParse(_)));

        fs::remove_file(&path).await.unwrap();
    }
}
