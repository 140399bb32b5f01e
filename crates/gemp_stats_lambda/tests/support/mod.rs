#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDateTime;
use gemp_stats_core::credentials::CredentialBundle;
use gemp_stats_core::document::Cell;
use gemp_stats_core::query::BoundQuery;
use gemp_stats_lambda::adapters::database::{DatabaseConnector, StatsDatabase};
use gemp_stats_lambda::adapters::object_store::ObjectStore;
use gemp_stats_lambda::adapters::secret_store::SecretStore;
use gemp_stats_lambda::config::ExporterConfig;

pub struct StaticSecretStore {
    secret: Result<String, String>,
    lookups: Mutex<Vec<String>>,
}

impl StaticSecretStore {
    pub fn available(secret: &str) -> Self {
        Self {
            secret: Ok(secret.to_string()),
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            secret: Err("ResourceNotFoundException: secret not found".to_string()),
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().expect("poisoned mutex").clone()
    }
}

impl SecretStore for StaticSecretStore {
    fn secret_string(&self, secret_id: &str) -> Result<String, String> {
        self.lookups
            .lock()
            .expect("poisoned mutex")
            .push(secret_id.to_string());
        self.secret.clone()
    }
}

#[derive(Default)]
struct ConnectorLog {
    connections: Vec<CredentialBundle>,
    timeouts: Vec<Duration>,
    queries: Vec<BoundQuery>,
}

/// Hands out databases that return a fixed row set, or refuses to connect.
#[derive(Clone)]
pub struct ScriptedConnector {
    rows: Option<Result<Vec<Vec<Cell>>, String>>,
    log: Arc<Mutex<ConnectorLog>>,
}

impl ScriptedConnector {
    pub fn returning(rows: Vec<Vec<Cell>>) -> Self {
        Self {
            rows: Some(Ok(rows)),
            log: Arc::default(),
        }
    }

    pub fn query_error(message: &str) -> Self {
        Self {
            rows: Some(Err(message.to_string())),
            log: Arc::default(),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            rows: None,
            log: Arc::default(),
        }
    }

    pub fn connections(&self) -> Vec<CredentialBundle> {
        self.log.lock().expect("poisoned mutex").connections.clone()
    }

    pub fn timeouts(&self) -> Vec<Duration> {
        self.log.lock().expect("poisoned mutex").timeouts.clone()
    }

    pub fn queries(&self) -> Vec<BoundQuery> {
        self.log.lock().expect("poisoned mutex").queries.clone()
    }
}

impl DatabaseConnector for ScriptedConnector {
    fn connect(
        &self,
        credentials: &CredentialBundle,
        timeout: Duration,
    ) -> Result<Box<dyn StatsDatabase>, String> {
        let mut log = self.log.lock().expect("poisoned mutex");
        log.connections.push(credentials.clone());
        log.timeouts.push(timeout);

        match &self.rows {
            Some(rows) => Ok(Box::new(ScriptedDatabase {
                rows: rows.clone(),
                log: Arc::clone(&self.log),
            })),
            None => Err(format!(
                "Can't connect to MySQL server on '{}' (timed out)",
                credentials.host
            )),
        }
    }
}

struct ScriptedDatabase {
    rows: Result<Vec<Vec<Cell>>, String>,
    log: Arc<Mutex<ConnectorLog>>,
}

impl StatsDatabase for ScriptedDatabase {
    fn fetch_rows(&mut self, query: &BoundQuery) -> Result<Vec<Vec<Cell>>, String> {
        self.log
            .lock()
            .expect("poisoned mutex")
            .queries
            .push(query.clone());
        self.rows.clone()
    }
}

pub struct RecordingStore {
    writes: Mutex<Vec<(String, Vec<u8>)>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn writes(&self) -> Vec<(String, Vec<u8>)> {
        self.writes.lock().expect("poisoned mutex").clone()
    }

    pub fn bodies(&self) -> HashMap<String, Vec<u8>> {
        self.writes().into_iter().collect()
    }
}

impl ObjectStore for RecordingStore {
    fn write_object(&self, key: &str, body: &[u8]) -> Result<(), String> {
        self.writes
            .lock()
            .expect("poisoned mutex")
            .push((key.to_string(), body.to_vec()));
        Ok(())
    }
}

pub fn no_env(_key: &str) -> Option<String> {
    None
}

pub fn test_config(scratch_dir: &Path) -> ExporterConfig {
    ExporterConfig {
        scratch_dir: scratch_dir.to_path_buf(),
        ..ExporterConfig::default()
    }
}

pub fn timestamp(text: &str) -> Cell {
    Cell::Timestamp(
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S").expect("valid timestamp"),
    )
}

pub fn scratch_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).expect("scratch dir readable").count()
}
