use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use gemp_stats_core::contract::{decode_export_event, ExportResponse};
use gemp_stats_core::document::{content_fingerprint, ExportDocument};
use gemp_stats_core::object_keys::scratch_file_name;
use gemp_stats_core::query::{deck_archetype_query, BoundQuery};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::adapters::database::{DatabaseConnector, StatsDatabase};
use crate::adapters::object_store::ObjectStore;
use crate::adapters::secret_store::SecretStore;
use crate::config::ExporterConfig;
use crate::error::ExportError;
use crate::handlers::credentials::resolve_credentials;

const COMPONENT: &str = "export_handler";

/// External systems one invocation talks to.
pub struct ExportCollaborators<'a> {
    pub secret_store: &'a dyn SecretStore,
    pub env: &'a dyn Fn(&str) -> Option<String>,
    pub connector: &'a dyn DatabaseConnector,
    pub object_store: &'a dyn ObjectStore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub object_key: String,
    pub rows: usize,
    pub bytes: usize,
    pub fingerprint: String,
    pub scratch_path: PathBuf,
}

/// Entry point for one invocation: decode `since`, resolve credentials,
/// connect, then run the export. Every failure is terminal and reported
/// through the returned [`ExportResponse`]; details only go to the logs.
pub fn handle_export_event(
    event: Value,
    config: &ExporterConfig,
    collaborators: &ExportCollaborators<'_>,
) -> ExportResponse {
    let started_at = Instant::now();

    let request = match decode_export_event(event) {
        Ok(value) => value,
        Err(error) => {
            warn!(
                component = COMPONENT,
                event = "invalid_request",
                error = %error
            );
            return ExportResponse::invalid_request(error.message());
        }
    };
    info!(
        component = COMPONENT,
        event = "invocation_started",
        since = %request.since
    );

    let credentials = resolve_credentials(
        collaborators.secret_store,
        &config.secret_id,
        collaborators.env,
    );

    info!(
        component = COMPONENT,
        event = "database_connect_started",
        host = %credentials.host,
        dbname = %credentials.dbname,
        username = %credentials.username
    );
    let mut database = match collaborators
        .connector
        .connect(&credentials, config.connect_timeout())
    {
        Ok(value) => value,
        Err(message) => {
            error!(
                component = COMPONENT,
                event = "database_connect_failed",
                host = %credentials.host,
                error = %message
            );
            return ExportResponse::unable_to_connect();
        }
    };

    let query = deck_archetype_query(&request.since);
    let object_key = config.object_naming().object_key(&request.since);

    match run_export(
        database.as_mut(),
        &query,
        &object_key,
        &config.scratch_dir,
        collaborators.object_store,
    ) {
        Ok(summary) => {
            info!(
                component = COMPONENT,
                event = "invocation_completed",
                bucket = %config.bucket,
                object_key = %summary.object_key,
                rows = summary.rows,
                bytes = summary.bytes,
                fingerprint = %summary.fingerprint,
                duration_ms = started_at.elapsed().as_millis() as u64
            );
            ExportResponse::ok(summary.object_key, summary.rows)
        }
        Err(error) => {
            error!(
                component = COMPONENT,
                event = "invocation_failed",
                step = error.step(),
                object_key = %object_key,
                duration_ms = started_at.elapsed().as_millis() as u64,
                error = %error
            );
            ExportResponse::export_failed()
        }
    }
}

/// Runs `query`, writes the resulting document to the scratch directory and
/// uploads the file's bytes to `object_key`. Succeeds only once the upload
/// has been accepted; no step is retried.
pub fn run_export(
    database: &mut dyn StatsDatabase,
    query: &BoundQuery,
    object_key: &str,
    scratch_dir: &Path,
    object_store: &dyn ObjectStore,
) -> Result<ExportSummary, ExportError> {
    let query_started = Instant::now();
    info!(component = COMPONENT, event = "query_started", query = query.name);
    let rows = database.fetch_rows(query).map_err(|message| {
        error!(
            component = COMPONENT,
            event = "query_failed",
            query = query.name,
            error = %message
        );
        ExportError::Query {
            query: query.name.to_string(),
            message,
        }
    })?;
    info!(
        component = COMPONENT,
        event = "query_completed",
        query = query.name,
        rows = rows.len(),
        duration_ms = query_started.elapsed().as_millis() as u64
    );

    let document = ExportDocument::from_rows(rows);
    let body = document.to_json_bytes().map_err(|error| {
        error!(component = COMPONENT, event = "serialize_failed", error = %error);
        ExportError::Serialize(error)
    })?;

    let scratch_path = scratch_dir.join(scratch_file_name(object_key));
    info!(
        component = COMPONENT,
        event = "scratch_write_started",
        path = %scratch_path.display()
    );
    fs::write(&scratch_path, &body).map_err(|source| {
        error!(
            component = COMPONENT,
            event = "scratch_write_failed",
            path = %scratch_path.display(),
            error = %source
        );
        ExportError::WriteScratch {
            path: scratch_path.clone(),
            source,
        }
    })?;

    let upload_body = fs::read(&scratch_path).map_err(|source| {
        error!(
            component = COMPONENT,
            event = "scratch_read_failed",
            path = %scratch_path.display(),
            error = %source
        );
        ExportError::ReadScratch {
            path: scratch_path.clone(),
            source,
        }
    })?;

    info!(component = COMPONENT, event = "upload_started", object_key);
    object_store
        .write_object(object_key, &upload_body)
        .map_err(|message| {
            error!(
                component = COMPONENT,
                event = "upload_failed",
                object_key,
                error = %message
            );
            ExportError::Upload {
                key: object_key.to_string(),
                message,
            }
        })?;

    Ok(ExportSummary {
        object_key: object_key.to_string(),
        rows: document.row_count(),
        bytes: upload_body.len(),
        fingerprint: content_fingerprint(&upload_body),
        scratch_path,
    })
}
