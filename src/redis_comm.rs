use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, ConnectionAddr, ConnectionInfo, RedisConnectionInfo};
use redis_macros::ToRedisArgs;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::error::{ExportError, Result};

// Time delay in ms before we consider a no-response to a redis query to
// be an error.
pub const REDIS_QUERY_TIMEOUT_MS: u64 = 2000;

pub const REDIS_DEFAULT_PORT: u16 = 6379;

/// A value that is written to redis as its JSON text.
#[derive(Debug, Clone, PartialEq, Serialize, ToRedisArgs)]
pub struct JsonRecord(pub serde_json::Value);

/// The key-value side of an export: one read, and one write when the key is missing.
#[async_trait]
pub trait RecordStore: Send {
    /// Returns the string stored at `key`, or `None` when the key does not exist.
    async fn fetch(&mut self, key: &str) -> Result<Option<String>>;

    /// Unconditionally stores `value` as JSON text at `key`, without expiry.
    async fn seed(&mut self, key: &str, value: &JsonRecord) -> Result<()>;
}

/// Builds a redis client for a plain TCP endpoint.
///
/// No connection is made until [`RedisStore::connect`] is called.
///
/// # Arguments
///
/// * `host` - Hostname or ip of the redis server.
/// * `port` - TCP port, normally [`REDIS_DEFAULT_PORT`].
/// * `db` - Logical database index selected on connect.
///
pub fn redis_client(host: &str, port: u16, db: i64) -> Result<Client> {
    let info = ConnectionInfo {
        addr: ConnectionAddr::Tcp(host.to_string(), port),
        redis: RedisConnectionInfo {
            db,
            ..Default::default()
        },
    };
    Ok(Client::open(info)?)
}

pub struct RedisStore {
    conn: MultiplexedConnection,
    timeout: Duration,
}

impl RedisStore {
    /// Opens a connection to redis and wraps it as a [`RecordStore`].
    ///
    /// Every query made through the store, including the initial connect, is bounded
    /// by `timeout`. A query that does not answer in time is reported as
    /// [`ExportError::Timeout`].
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot be reached or rejects the connection.
    ///
    pub async fn connect(client: &Client, timeout: Duration) -> Result<Self> {
        let conn = timed(timeout, || "connect".to_string(), async {
            client.get_multiplexed_async_connection().await
        })
        .await?;
        info!("Connected to redis at {:?}", client.get_connection_info().addr);
        Ok(RedisStore { conn, timeout })
    }
}

#[async_trait]
impl RecordStore for RedisStore {
    async fn fetch(&mut self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = timed(
            self.timeout,
            || format!("GET {key}"),
            self.conn.get::<_, Option<String>>(key),
        )
        .await?;
        debug!("GET {key} -> {}", if value.is_some() { "hit" } else { "miss" });
        Ok(value)
    }

    async fn seed(&mut self, key: &str, value: &JsonRecord) -> Result<()> {
        timed(
            self.timeout,
            || format!("SET {key}"),
            self.conn.set::<_, _, ()>(key, value),
        )
        .await?;
        debug!("SET {key} done");
        Ok(())
    }
}

async fn timed<T, F>(timeout: Duration, op: impl FnOnce() -> String, fut: F) -> Result<T>
where
    F: Future<Output = redis::RedisResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(res) => Ok(res?),
        Err(_) => {
            let op = op();
            let timeout_ms = millis(timeout);
            error!("Redis {op} got no response within {timeout_ms}ms");
            Err(ExportError::Timeout { op, timeout_ms })
        }
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
