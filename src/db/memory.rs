use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use bson::oid::ObjectId;

use crate::db::models::{parse_id, ContentRecord};
use crate::db::repository::ContentRepository;
use crate::error::AppError;

/// ContentRepository kept in process memory.
///
/// Same ordering and not-found semantics as the MongoDB implementation.
/// Used by the test suite and by `storage.backend = "memory"`.
#[derive(Default)]
pub struct InMemoryContentRepository {
    records: Mutex<HashMap<ObjectId, ContentRecord>>,
}

impl InMemoryContentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<ObjectId, ContentRecord>>, AppError> {
        self.records
            .lock()
            .map_err(|_| AppError::Database("in-memory store poisoned".into()))
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn ready(&self) -> Result<(), AppError> {
        self.lock().map(|_| ())
    }

    async fn insert(&self, record: &ContentRecord) -> Result<(), AppError> {
        let mut records = self.lock()?;
        if records.contains_key(&record.id) {
            return Err(AppError::Database(format!(
                "duplicate key: {}",
                record.id.to_hex()
            )));
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ContentRecord>, AppError> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };
        Ok(self.lock()?.get(&oid).cloned())
    }

    async fn list_newest_first(&self) -> Result<Vec<ContentRecord>, AppError> {
        let mut records: Vec<ContentRecord> = self.lock()?.values().cloned().collect();
        records.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(records)
    }

    async fn replace(&self, record: &ContentRecord) -> Result<bool, AppError> {
        let mut records = self.lock()?;
        match records.get_mut(&record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let Some(oid) = parse_id(id) else {
            return Ok(false);
        };
        Ok(self.lock()?.remove(&oid).is_some())
    }
}
