use async_trait::async_trait;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::{debug, info};

use crate::error::{ExportError, Result};

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Where exported records end up.
#[async_trait]
pub trait ObjectSink: Send + Sync {
    /// Writes `body` to `object_key` as `application/json`, replacing any existing object.
    async fn put_json(&self, object_key: &str, body: String) -> Result<()>;
}

/// S3 connection options. Anything left as `None` comes from the SDK default chain.
#[derive(Debug, Clone, Default)]
pub struct S3Options {
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
}

pub struct S3Sink {
    client: Client,
    bucket: String,
}

impl S3Sink {
    pub async fn new(bucket: impl Into<String>, options: &S3Options) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &options.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(url) = &options.endpoint_url {
            loader = loader.endpoint_url(url);
        }
        let sdk_config = loader.load().await;

        let conf = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(options.force_path_style)
            .build();
        debug!("S3 region {:?}", conf.region());
        S3Sink::from_client(Client::from_conf(conf), bucket)
    }

    pub fn from_client(client: Client, bucket: impl Into<String>) -> Self {
        S3Sink {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectSink for S3Sink {
    async fn put_json(&self, object_key: &str, body: String) -> Result<()> {
        let len = body.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(object_key)
            .content_type(JSON_CONTENT_TYPE)
            .body(ByteStream::from(body.into_bytes()))
            .send()
            .await
            .map_err(|e| ExportError::Upload {
                object_key: object_key.to_string(),
                source: Box::new(aws_sdk_s3::Error::from(e)),
            })?;
        info!("Uploaded s3://{}/{object_key} ({len} bytes)", self.bucket);
        Ok(())
    }
}
