use gemp_stats_core::contract::ExportResponse;
use gemp_stats_lambda::adapters::aws::load_sdk_config;
use gemp_stats_lambda::adapters::database::MySqlConnector;
use gemp_stats_lambda::adapters::object_store::S3ObjectStore;
use gemp_stats_lambda::adapters::secret_store::SecretsManagerStore;
use gemp_stats_lambda::config::ExporterConfig;
use gemp_stats_lambda::handlers::export::{handle_export_event, ExportCollaborators};
use gemp_stats_lambda::logging::init_tracing;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

struct RuntimeDependencies {
    config: ExporterConfig,
    secret_store: SecretsManagerStore,
    object_store: S3ObjectStore,
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &RuntimeDependencies,
) -> Result<ExportResponse, Error> {
    let collaborators = ExportCollaborators {
        secret_store: &deps.secret_store,
        env: &process_env,
        connector: &MySqlConnector,
        object_store: &deps.object_store,
    };

    Ok(handle_export_event(
        event.payload,
        &deps.config,
        &collaborators,
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();

    let config = ExporterConfig::load()
        .map_err(|error| Error::from(format!("invalid exporter configuration: {error}")))?;
    init_tracing(&config.log_level, config.log_format);

    let sdk_config = load_sdk_config(&config.region, config.connect_timeout()).await;
    let deps = RuntimeDependencies {
        secret_store: SecretsManagerStore::new(aws_sdk_secretsmanager::Client::new(&sdk_config)),
        object_store: S3ObjectStore::new(
            config.bucket.clone(),
            aws_sdk_s3::Client::new(&sdk_config),
        ),
        config,
    };

    let deps_ref = &deps;
    lambda_runtime::run(service_fn(move |event| handle_request(event, deps_ref))).await
}
