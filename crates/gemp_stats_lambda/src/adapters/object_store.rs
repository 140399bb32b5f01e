use aws_sdk_s3::primitives::ByteStream;
use gemp_stats_core::document::content_fingerprint;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const FINGERPRINT_METADATA_KEY: &str = "sha256";

pub trait ObjectStore {
    /// Writes `body` under `key`, replacing any existing object.
    fn write_object(&self, key: &str, body: &[u8]) -> Result<(), String>;
}

pub struct S3ObjectStore {
    bucket: String,
    s3_client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(bucket: impl Into<String>, s3_client: aws_sdk_s3::Client) -> Self {
        Self {
            bucket: bucket.into(),
            s3_client,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl ObjectStore for S3ObjectStore {
    fn write_object(&self, key: &str, body: &[u8]) -> Result<(), String> {
        let bucket = self.bucket.clone();
        let object_key = key.to_string();
        let fingerprint = content_fingerprint(body);
        let body_bytes = body.to_vec();
        let client = self.s3_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .put_object()
                    .bucket(bucket)
                    .key(object_key)
                    .content_type(JSON_CONTENT_TYPE)
                    .metadata(FINGERPRINT_METADATA_KEY, fingerprint)
                    .body(ByteStream::from(body_bytes))
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to write object to s3: {error}"))
            })
        })
    }
}
