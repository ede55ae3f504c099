use serde_json::Value;
use tracing::debug;

pub mod config;
pub mod error;
pub mod object_store;
pub mod pipeline;
pub mod redis_comm;

#[cfg(test)]
mod testing;

pub use error::{ExportError, Result};
pub use pipeline::{export, ExportSettings};

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub key: String,
    pub value: Value,
    pub seeded: bool,
}

impl Record {
    pub fn fetched(key: &str, raw: &str, encoding: ValueEncoding) -> Result<Self> {
        Ok(Record {
            key: key.to_string(),
            value: encoding.decode(key, raw)?,
            seeded: false,
        })
    }

    pub fn seeded(key: &str, value: Value) -> Self {
        Record {
            key: key.to_string(),
            value,
            seeded: true,
        }
    }

    pub fn object_key(&self) -> String {
        object_key(&self.key)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.value)?)
    }
}

/// Object storage path for a redis key.
pub fn object_key(key: &str) -> String {
    format!("{key}.json")
}

/// How a value read from redis is turned into the JSON that gets uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ValueEncoding {
    /// Parse the stored text as JSON, fall back to a JSON string.
    #[default]
    Auto,
    /// Always upload the stored text as a JSON string.
    Raw,
    /// The stored text must be JSON.
    Json,
}

impl ValueEncoding {
    pub fn decode(&self, key: &str, raw: &str) -> Result<Value> {
        match self {
            ValueEncoding::Raw => Ok(Value::String(raw.to_string())),
            ValueEncoding::Json => {
                serde_json::from_str(raw).map_err(|source| ExportError::InvalidJson {
                    key: key.to_string(),
                    source,
                })
            }
            ValueEncoding::Auto => Ok(serde_json::from_str(raw).unwrap_or_else(|e| {
                debug!("Value at '{key}' is not JSON ({e}), uploading it as a string");
                Value::String(raw.to_string())
            })),
        }
    }
}
