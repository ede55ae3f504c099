use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use redis_export::config::{Args, Config};
use redis_export::object_store::S3Sink;
use redis_export::redis_comm::{redis_client, RedisStore};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_args(Args::parse())?;

    let client = redis_client(&config.redis_host, config.redis_port, config.redis_db)?;
    let mut store = RedisStore::connect(&client, config.redis_timeout)
        .await
        .with_context(|| format!("connecting to redis at {}", config.redis_host))?;
    let sink = S3Sink::new(config.bucket_name.clone(), &config.s3).await;

    let record = redis_export::export(&mut store, &sink, &config.export)
        .await
        .with_context(|| {
            format!(
                "exporting '{}' to bucket '{}'",
                config.export.key,
                sink.bucket()
            )
        })?;

    println!("Data uploaded to S3 in JSON format: {}", record.to_json()?);
    Ok(())
}
