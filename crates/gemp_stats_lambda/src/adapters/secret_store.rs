pub trait SecretStore {
    fn secret_string(&self, secret_id: &str) -> Result<String, String>;
}

pub struct SecretsManagerStore {
    client: aws_sdk_secretsmanager::Client,
}

impl SecretsManagerStore {
    pub fn new(client: aws_sdk_secretsmanager::Client) -> Self {
        Self { client }
    }
}

impl SecretStore for SecretsManagerStore {
    fn secret_string(&self, secret_id: &str) -> Result<String, String> {
        let client = self.client.clone();
        let secret_id = secret_id.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let output = client
                    .get_secret_value()
                    .secret_id(&secret_id)
                    .send()
                    .await
                    .map_err(|error| format!("failed to read secret {secret_id}: {error}"))?;

                output
                    .secret_string()
                    .map(str::to_string)
                    .ok_or_else(|| format!("secret {secret_id} has no string value"))
            })
        })
    }
}
