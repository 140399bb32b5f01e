use std::path::PathBuf;
use std::time::Duration;

use figment::providers::{Env, Serialized};
use figment::Figment;
use gemp_stats_core::credentials::DEFAULT_SECRET_ID;
use gemp_stats_core::object_keys::{ObjectNaming, DEFAULT_OBJECT_NAME, DEFAULT_OBJECT_PREFIX};
use serde::{Deserialize, Serialize};

use crate::logging::LogFormat;

pub const ENV_PREFIX: &str = "GEMP_STATS_";
pub const BUCKET_ENV_VAR: &str = "S3_BUCKET_NAME";
pub const DEFAULT_BUCKET: &str = "gemp-stats";
pub const DEFAULT_REGION: &str = "us-east-2";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ObjectNamingMode {
    #[default]
    Fixed,
    SinceDate,
}

/// Settings shared by the Lambda runtime and the local runner.
///
/// Sources, lowest precedence first: built-in defaults, `S3_BUCKET_NAME`,
/// then `GEMP_STATS_*` variables (for example `GEMP_STATS_OBJECT_NAMING`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExporterConfig {
    pub secret_id: String,
    pub region: String,
    pub bucket: String,
    pub object_naming: ObjectNamingMode,
    pub object_name: String,
    pub object_prefix: String,
    pub scratch_dir: PathBuf,
    pub connect_timeout_secs: u64,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            secret_id: DEFAULT_SECRET_ID.to_string(),
            region: DEFAULT_REGION.to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
            object_naming: ObjectNamingMode::default(),
            object_name: DEFAULT_OBJECT_NAME.to_string(),
            object_prefix: DEFAULT_OBJECT_PREFIX.to_string(),
            scratch_dir: std::env::temp_dir(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl ExporterConfig {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::raw().only(&[BUCKET_ENV_VAR]).map(|_| "bucket".into()))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn object_naming(&self) -> ObjectNaming {
        match self.object_naming {
            ObjectNamingMode::Fixed => ObjectNaming::Fixed {
                name: self.object_name.clone(),
            },
            ObjectNamingMode::SinceDate => ObjectNaming::SinceDate {
                prefix: self.object_prefix.clone(),
            },
        }
    }
}
