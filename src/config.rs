use std::time::Duration;

use clap::Parser;
use serde_json::Value;
use tracing::info;

use crate::error::{ExportError, Result};
use crate::object_store::S3Options;
use crate::pipeline::ExportSettings;
use crate::redis_comm::{REDIS_DEFAULT_PORT, REDIS_QUERY_TIMEOUT_MS};
use crate::ValueEncoding;

pub const DEFAULT_KEY: &str = "your_key";
pub const DEFAULT_VALUE: &str = r#"{"message": "This is a test value"}"#;

#[derive(Parser, Debug)]
#[command(version, about = "Export a redis key to S3 as JSON", long_about = None)]
pub struct Args {
    /// Redis host
    #[arg(long, env = "REDIS_HOST", default_value = "127.0.0.1")]
    pub redis_host: String,

    /// Redis port
    #[arg(long, env = "REDIS_PORT", default_value_t = REDIS_DEFAULT_PORT)]
    pub redis_port: u16,

    /// Redis database index
    #[arg(long, env = "REDIS_DB", default_value_t = 0)]
    pub redis_db: i64,

    /// Per-query redis timeout in milliseconds
    #[arg(long, env = "REDIS_TIMEOUT_MS", default_value_t = REDIS_QUERY_TIMEOUT_MS)]
    pub redis_timeout_ms: u64,

    /// Destination bucket
    #[arg(short, long, env = "BUCKET_NAME")]
    pub bucket_name: String,

    /// Redis key to export
    #[arg(short, long, env = "REDIS_KEY", default_value = DEFAULT_KEY)]
    pub key: String,

    /// JSON value written to the key when it is missing
    #[arg(long, env = "DEFAULT_VALUE", default_value = DEFAULT_VALUE)]
    pub default_value: String,

    /// How the stored value is turned into JSON
    #[arg(short, long, env = "VALUE_ENCODING", value_enum, default_value_t = ValueEncoding::Auto)]
    pub encoding: ValueEncoding,

    /// S3 region, otherwise taken from the AWS environment
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Custom S3 endpoint, e.g. a MinIO server
    #[arg(long, env = "S3_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    /// Use path-style bucket addressing
    #[arg(long, env = "S3_FORCE_PATH_STYLE")]
    pub force_path_style: bool,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub redis_host: String,
    pub redis_port: u16,
    pub redis_db: i64,
    pub redis_timeout: Duration,
    pub bucket_name: String,
    pub export: ExportSettings,
    pub s3: S3Options,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self> {
        if args.bucket_name.trim().is_empty() {
            return Err(ExportError::Config("bucket name is empty".to_string()));
        }
        if args.key.is_empty() {
            return Err(ExportError::Config("redis key is empty".to_string()));
        }
        let default_value: Value = serde_json::from_str(&args.default_value).map_err(|e| {
            ExportError::Config(format!("default value is not JSON: {e}"))
        })?;

        info!(
            "Exporting '{}' from {}:{}/{} to bucket '{}' ({:?})",
            args.key, args.redis_host, args.redis_port, args.redis_db, args.bucket_name, args.encoding
        );

        Ok(Config {
            redis_host: args.redis_host,
            redis_port: args.redis_port,
            redis_db: args.redis_db,
            redis_timeout: Duration::from_millis(args.redis_timeout_ms),
            bucket_name: args.bucket_name,
            export: ExportSettings {
                key: args.key,
                default_value,
                encoding: args.encoding,
            },
            s3: S3Options {
                region: args.region,
                endpoint_url: args.endpoint_url,
                force_path_style: args.force_path_style,
            },
        })
    }
}
