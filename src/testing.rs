//! In-memory stand-ins for redis and S3.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use redis::ToRedisArgs;

use crate::error::{ExportError, Result};
use crate::object_store::ObjectSink;
use crate::redis_comm::{JsonRecord, RecordStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn with(key: &str, value: &str) -> Self {
        let mut store = MemoryStore::default();
        store.values.insert(key.to_string(), value.to_string());
        store
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch(&mut self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    async fn seed(&mut self, key: &str, value: &JsonRecord) -> Result<()> {
        // same bytes the redis connection would send
        let arg = value.to_redis_args().concat();
        let text = String::from_utf8(arg).expect("JSON text is utf-8");
        self.values.insert(key.to_string(), text);
        self.writes += 1;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemorySink {
    objects: Mutex<HashMap<String, String>>,
    fail: bool,
}

impl MemorySink {
    pub fn failing() -> Self {
        MemorySink {
            fail: true,
            ..Default::default()
        }
    }

    pub fn get(&self, object_key: &str) -> Option<String> {
        self.objects.lock().unwrap().get(object_key).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectSink for MemorySink {
    async fn put_json(&self, object_key: &str, body: String) -> Result<()> {
        if self.fail {
            return Err(ExportError::Upload {
                object_key: object_key.to_string(),
                source: "access denied".into(),
            });
        }
        self.objects
            .lock()
            .unwrap()
            .insert(object_key.to_string(), body);
        Ok(())
    }
}
