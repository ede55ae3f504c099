use serde_json::Value;
use tracing::info;

use crate::error::Result;
use crate::object_store::ObjectSink;
use crate::redis_comm::{JsonRecord, RecordStore};
use crate::{Record, ValueEncoding};

/// What to export and how to treat a missing key.
#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub key: String,
    pub default_value: Value,
    pub encoding: ValueEncoding,
}

/// Reads `settings.key` from the store, seeds it with the default value when it is
/// missing, and uploads the resulting value as `{key}.json`.
///
/// An empty string in redis counts as missing. A seeded record is uploaded as the
/// default value itself, a fetched one is decoded according to `settings.encoding`.
///
/// # Errors
///
/// Any store, decoding or upload error ends the export. If the upload fails after a
/// seed, the seeded value stays in redis.
///
pub async fn export<S, O>(store: &mut S, sink: &O, settings: &ExportSettings) -> Result<Record>
where
    S: RecordStore + ?Sized,
    O: ObjectSink + ?Sized,
{
    let key = settings.key.as_str();
    let record = match store.fetch(key).await? {
        Some(raw) if !raw.is_empty() => {
            info!("Key '{key}' found in redis");
            Record::fetched(key, &raw, settings.encoding)?
        }
        _ => {
            info!("Key '{key}' not set, seeding default value");
            let default = JsonRecord(settings.default_value.clone());
            store.seed(key, &default).await?;
            Record::seeded(key, default.0)
        }
    };

    let body = record.to_json()?;
    sink.put_json(&record.object_key(), body).await?;
    Ok(record)
}
