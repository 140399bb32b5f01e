use std::fmt;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

pub const DEFAULT_SECRET_ID: &str = "gempdb_stats";
pub const DEFAULT_RDS_HOST: &str = "localhost";
pub const DEFAULT_RDS_USERNAME: &str = "gemp";
pub const DEFAULT_RDS_PASSWORD: &str = "Four_mason8pirate";
pub const DEFAULT_RDS_DBNAME: &str = "gemp-swccg";
pub const DEFAULT_RDS_PORT: u16 = 3306;
pub const DEFAULT_RDS_ENGINE: &str = "mysql";

pub const RDS_HOST_VAR: &str = "RDS_HOST";
pub const RDS_USERNAME_VAR: &str = "RDS_USERNAME";
pub const RDS_PASSWORD_VAR: &str = "RDS_PASSWORD";
pub const RDS_DBNAME_VAR: &str = "RDS_DBNAME";
pub const RDS_PORT_VAR: &str = "RDS_PORT";
pub const RDS_ENGINE_VAR: &str = "RDS_ENGINE";

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("secret is not a valid credential bundle: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("secret field `{0}` is empty")]
    EmptyField(&'static str),
}

/// Connection parameters for the statistics database.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct CredentialBundle {
    pub host: String,
    pub username: String,
    pub password: String,
    pub dbname: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
    pub engine: String,
}

impl fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"***REDACTED***")
            .field("dbname", &self.dbname)
            .field("port", &self.port)
            .field("engine", &self.engine)
            .finish()
    }
}

impl CredentialBundle {
    /// Parses the `SecretString` of a Secrets Manager database secret.
    pub fn from_secret_json(secret: &str) -> Result<Self, CredentialError> {
        let bundle: Self = serde_json::from_str(secret)?;
        if bundle.host.trim().is_empty() {
            return Err(CredentialError::EmptyField("host"));
        }
        if bundle.username.trim().is_empty() {
            return Err(CredentialError::EmptyField("username"));
        }
        if bundle.dbname.trim().is_empty() {
            return Err(CredentialError::EmptyField("dbname"));
        }
        Ok(bundle)
    }

    /// Builds the fallback bundle from `RDS_*` variables, applying the literal
    /// default for every variable `lookup` does not provide.
    pub fn from_env_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Self {
            host: var_or(RDS_HOST_VAR, DEFAULT_RDS_HOST),
            username: var_or(RDS_USERNAME_VAR, DEFAULT_RDS_USERNAME),
            password: var_or(RDS_PASSWORD_VAR, DEFAULT_RDS_PASSWORD),
            dbname: var_or(RDS_DBNAME_VAR, DEFAULT_RDS_DBNAME),
            port: lookup(RDS_PORT_VAR)
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(DEFAULT_RDS_PORT),
            engine: var_or(RDS_ENGINE_VAR, DEFAULT_RDS_ENGINE),
        }
    }

    pub fn defaults() -> Self {
        Self::from_env_lookup(|_| None)
    }
}

fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u16),
        Text(String),
    }

    match Port::deserialize(deserializer)? {
        Port::Number(port) => Ok(port),
        Port::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid port `{text}`"))),
    }
}
