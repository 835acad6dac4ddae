use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::engine::MEMORY_DB_PATH;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolkitConfig {
    /// Database file path, or ":memory:" for an in-memory database.
    pub db_path: String,
    /// Region applied via `SET s3_region` when the httpfs setup succeeds.
    pub s3_region: String,
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            db_path: MEMORY_DB_PATH.to_string(),
            s3_region: "us-east-1".to_string(),
        }
    }
}

impl ToolkitConfig {
    /// Load configuration: defaults layered under `MALLARD_`-prefixed
    /// environment variables (e.g. `MALLARD_DB_PATH`, `MALLARD_S3_REGION`).
    pub fn load() -> anyhow::Result<Self> {
        let defaults_json = serde_json::to_string(&Self::default())
            .with_context(|| "failed to serialize defaults")?;
        let settings = config::Config::builder()
            .add_source(
                config::File::from_str(&defaults_json, config::FileFormat::Json).required(false),
            )
            .add_source(config::Environment::with_prefix("MALLARD"))
            .build()
            .with_context(|| "failed to load configuration")?;
        let cfg: ToolkitConfig = settings
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_in_memory() {
        let cfg = ToolkitConfig::default();
        assert_eq!(cfg.db_path, ":memory:");
        assert_eq!(cfg.s3_region, "us-east-1");
    }
}
