use mongodb::bson::doc;
use tokio::sync::OnceCell;

use crate::config::DatabaseSettings;
use crate::error::AppError;

/// The process-wide MongoDB handle.
///
/// Built once at startup and shared by reference. The handshake runs on
/// first use; once it succeeds the database handle is reused for the life of
/// the process. A failed handshake is reported to the caller and attempted
/// again by the next operation, never retried within one.
pub struct MongoConnection {
    settings: DatabaseSettings,
    database: OnceCell<mongodb::Database>,
}

impl MongoConnection {
    pub fn new(settings: DatabaseSettings) -> Self {
        Self {
            settings,
            database: OnceCell::new(),
        }
    }

    /// Wrap an already connected database (tests, embedding).
    pub fn from_database(database: mongodb::Database) -> Self {
        Self {
            settings: DatabaseSettings {
                name: database.name().to_string(),
                ..Default::default()
            },
            database: OnceCell::new_with(Some(database)),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.database.initialized()
    }

    /// The connected database, connecting first if needed.
    pub async fn database(&self) -> Result<&mongodb::Database, AppError> {
        self.database.get_or_try_init(|| self.handshake()).await
    }

    async fn handshake(&self) -> Result<mongodb::Database, AppError> {
        let uri = self.settings.connection_uri()?;

        let client = mongodb::Client::with_uri_str(&uri).await.map_err(|e| {
            tracing::error!("MongoDB connection error: {e}");
            AppError::Connection(e.to_string())
        })?;

        let database = client.database(&self.settings.name);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| {
                tracing::error!("MongoDB connection error: {e}");
                AppError::Connection(e.to_string())
            })?;

        tracing::info!(database = %self.settings.name, "MongoDB connected successfully");
        Ok(database)
    }
}
