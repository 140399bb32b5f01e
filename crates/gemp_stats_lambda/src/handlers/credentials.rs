use gemp_stats_core::credentials::CredentialBundle;
use tracing::{info, warn};

use crate::adapters::secret_store::SecretStore;

/// Resolves database credentials for one invocation.
///
/// Reads `secret_id` from the secret store; when the secret is unavailable or
/// malformed, falls back to the `RDS_*` variables visible through `env`. This
/// never fails.
pub fn resolve_credentials(
    secret_store: &dyn SecretStore,
    secret_id: &str,
    env: &dyn Fn(&str) -> Option<String>,
) -> CredentialBundle {
    info!(
        component = "credentials",
        event = "secret_lookup_started",
        secret_id
    );

    let failure = match secret_store.secret_string(secret_id) {
        Ok(secret) => match CredentialBundle::from_secret_json(&secret) {
            Ok(bundle) => {
                info!(
                    component = "credentials",
                    event = "secret_resolved",
                    secret_id,
                    host = %bundle.host,
                    dbname = %bundle.dbname
                );
                return bundle;
            }
            Err(error) => error.to_string(),
        },
        Err(error) => error,
    };

    warn!(
        component = "credentials",
        event = "secret_fallback_to_env",
        secret_id,
        error = %failure,
        "expected a JSON secret with host, username, password, dbname, port and engine"
    );
    CredentialBundle::from_env_lookup(env)
}
