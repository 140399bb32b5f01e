use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use gemp_stats_core::contract::DEFAULT_SINCE;
use gemp_stats_lambda::adapters::aws::load_sdk_config;
use gemp_stats_lambda::adapters::database::MySqlConnector;
use gemp_stats_lambda::adapters::object_store::S3ObjectStore;
use gemp_stats_lambda::adapters::secret_store::SecretsManagerStore;
use gemp_stats_lambda::config::{ExporterConfig, ObjectNamingMode};
use gemp_stats_lambda::handlers::export::{handle_export_event, ExportCollaborators};
use gemp_stats_lambda::logging::{init_tracing, LogFormat};
use serde_json::json;

#[derive(Parser)]
#[command(
    name = "gemp_stats_local",
    about = "Run one GEMP stats export from a workstation",
    long_about = "Runs the same handler as the Lambda function once, using credentials\n\
                  from Secrets Manager or RDS_* variables (a .env file is honoured),\n\
                  and prints the invocation response as JSON."
)]
struct Cli {
    /// Lower bound for `enddatetime`, e.g. "2021-06-01 00:19"
    #[arg(long, default_value = DEFAULT_SINCE)]
    since: String,
    /// How the destination object is named
    #[arg(value_enum, long)]
    object_naming: Option<NamingArg>,
    /// Directory for the local copy of the document
    #[arg(long)]
    scratch_dir: Option<PathBuf>,
    /// Destination bucket (overrides S3_BUCKET_NAME)
    #[arg(long)]
    bucket: Option<String>,
    /// Emit JSON logs instead of human-readable ones
    #[arg(long)]
    json_logs: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum NamingArg {
    /// Always write `deck_archetype.json`
    Fixed,
    /// Write `gemp-stats-<since date>.json`
    SinceDate,
}

impl From<NamingArg> for ObjectNamingMode {
    fn from(value: NamingArg) -> Self {
        match value {
            NamingArg::Fixed => Self::Fixed,
            NamingArg::SinceDate => Self::SinceDate,
        }
    }
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(error) = dotenvy::dotenv() {
        if !error.not_found() {
            eprintln!("warning: failed to load .env: {error}");
        }
    }

    let cli = Cli::parse();
    let mut config = match ExporterConfig::load() {
        Ok(value) => value,
        Err(error) => {
            eprintln!("invalid exporter configuration: {error}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(naming) = cli.object_naming {
        config.object_naming = naming.into();
    }
    if let Some(scratch_dir) = cli.scratch_dir {
        config.scratch_dir = scratch_dir;
    }
    if let Some(bucket) = cli.bucket {
        config.bucket = bucket;
    }
    let log_format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_tracing(&config.log_level, log_format);

    let sdk_config = load_sdk_config(&config.region, config.connect_timeout()).await;
    let secret_store = SecretsManagerStore::new(aws_sdk_secretsmanager::Client::new(&sdk_config));
    let object_store = S3ObjectStore::new(
        config.bucket.clone(),
        aws_sdk_s3::Client::new(&sdk_config),
    );
    let collaborators = ExportCollaborators {
        secret_store: &secret_store,
        env: &process_env,
        connector: &MySqlConnector,
        object_store: &object_store,
    };

    let response = handle_export_event(json!({ "since": cli.since }), &config, &collaborators);
    match serde_json::to_string_pretty(&response) {
        Ok(rendered) => println!("{rendered}"),
        Err(error) => eprintln!("failed to render response: {error}"),
    }

    if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
