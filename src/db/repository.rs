use async_trait::async_trait;

use crate::db::models::ContentRecord;
use crate::error::AppError;

/// Repository trait for content records.
///
/// This trait allows swapping the database for the in-memory store or a mock
/// in tests. Identifiers are passed as client-supplied strings; a malformed
/// id simply matches nothing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Fail with a connection error if the backing store cannot be reached.
    async fn ready(&self) -> Result<(), AppError>;

    /// Persist a new record.
    async fn insert(&self, record: &ContentRecord) -> Result<(), AppError>;

    /// Find a record by id.
    async fn find_by_id(&self, id: &str) -> Result<Option<ContentRecord>, AppError>;

    /// All records, newest-created first.
    async fn list_newest_first(&self) -> Result<Vec<ContentRecord>, AppError>;

    /// Overwrite an existing record (matched by its id).
    /// Returns `false` if the record no longer exists.
    async fn replace(&self, record: &ContentRecord) -> Result<bool, AppError>;

    /// Delete a record by id. Returns `false` if nothing matched.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
}

/// MongoDB implementation of the ContentRepository.
///
/// Only available when the `server` feature is enabled.
#[cfg(feature = "server")]
pub struct MongoContentRepository {
    connection: std::sync::Arc<crate::db::connection::MongoConnection>,
}

#[cfg(feature = "server")]
impl MongoContentRepository {
    pub const COLLECTION: &'static str = "contents";

    pub fn new(connection: std::sync::Arc<crate::db::connection::MongoConnection>) -> Self {
        Self { connection }
    }

    async fn collection(&self) -> Result<mongodb::Collection<ContentRecord>, AppError> {
        Ok(self
            .connection
            .database()
            .await?
            .collection(Self::COLLECTION))
    }
}

#[cfg(feature = "server")]
#[async_trait]
impl ContentRepository for MongoContentRepository {
    async fn ready(&self) -> Result<(), AppError> {
        self.connection.database().await?;
        Ok(())
    }

    async fn insert(&self, record: &ContentRecord) -> Result<(), AppError> {
        self.collection().await?.insert_one(record).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ContentRecord>, AppError> {
        use mongodb::bson::doc;

        // Connect first: an unreachable database outranks a malformed id.
        let collection = self.collection().await?;
        let Some(oid) = crate::db::models::parse_id(id) else {
            return Ok(None);
        };

        Ok(collection.find_one(doc! { "_id": oid }).await?)
    }

    async fn list_newest_first(&self) -> Result<Vec<ContentRecord>, AppError> {
        use futures::TryStreamExt;
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        // ObjectIds grow monotonically, so they break createdAt ties in
        // insertion order.
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .build();

        let mut cursor = self
            .collection()
            .await?
            .find(doc! {})
            .with_options(options)
            .await?;

        let mut records = Vec::new();
        while let Some(record) = cursor.try_next().await? {
            records.push(record);
        }

        Ok(records)
    }

    async fn replace(&self, record: &ContentRecord) -> Result<bool, AppError> {
        use mongodb::bson::doc;

        let result = self
            .collection()
            .await?
            .replace_one(doc! { "_id": record.id }, record)
            .await?;

        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        use mongodb::bson::doc;

        let collection = self.collection().await?;
        let Some(oid) = crate::db::models::parse_id(id) else {
            return Ok(false);
        };

        let result = collection.delete_one(doc! { "_id": oid }).await?;

        Ok(result.deleted_count > 0)
    }
}
