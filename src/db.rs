use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::Document,
    options::{ClientOptions, FindOptions},
    Client, Database,
};
use std::sync::Arc;

use crate::config::{Config, StoreBackend};
use crate::errors::StorageError;
use crate::memory_store::MemoryStore;
use crate::models::id_to_string;

/// The only seam through which the service touches storage.
///
/// Implementations must be safe to share between concurrent requests;
/// no locking is layered on top of them.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Appends `record` to `collection` and returns the new identifier as a string.
    async fn insert(&self, collection: &str, record: Document) -> Result<String, StorageError>;

    /// Returns at most `limit` documents matching `filter`, in the store's
    /// natural order. An empty filter matches everything.
    async fn query(
        &self,
        collection: &str,
        filter: Document,
        limit: i64,
    ) -> Result<Vec<Document>, StorageError>;

    /// Whether a session to the store was established at startup.
    fn is_connected(&self) -> bool;

    async fn list_collection_names(&self) -> Result<Vec<String>, StorageError>;

    /// Releases the underlying connection. Called once at process stop.
    async fn shutdown(&self);
}

/// MongoDB-backed store.
///
/// Built in a degraded state when the connection settings are missing or
/// unusable; in that state every operation fails with
/// [`StorageError::NotConnected`].
pub struct MongoStore {
    session: Option<MongoSession>,
}

struct MongoSession {
    client: Client,
    database: Database,
}

impl MongoStore {
    /// Creates the client without waiting for the server. The driver
    /// connects lazily, so an unreachable server surfaces as a
    /// [`StorageError::Driver`] on first use rather than here.
    pub async fn connect(database_url: Option<&str>, database_name: Option<&str>) -> Self {
        let (url, name) = match (database_url, database_name) {
            (Some(url), Some(name)) => (url, name),
            _ => {
                tracing::warn!("Database connection settings missing, store disabled");
                return Self::disconnected();
            }
        };

        match Self::build_session(url, name).await {
            Ok(session) => {
                tracing::info!("✓ MongoDB client initialized for database '{}'", name);
                Self {
                    session: Some(session),
                }
            }
            Err(e) => {
                tracing::error!("Failed to initialize MongoDB client: {}", e);
                Self::disconnected()
            }
        }
    }

    /// A store with no session; every operation fails.
    pub fn disconnected() -> Self {
        Self { session: None }
    }

    async fn build_session(url: &str, name: &str) -> Result<MongoSession, mongodb::error::Error> {
        let mut options = ClientOptions::parse(url).await?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        let client = Client::with_options(options)?;
        let database = client.database(name);
        Ok(MongoSession { client, database })
    }

    fn session(&self) -> Result<&MongoSession, StorageError> {
        self.session.as_ref().ok_or(StorageError::NotConnected)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert(&self, collection: &str, record: Document) -> Result<String, StorageError> {
        let session = self.session()?;
        let result = session
            .database
            .collection::<Document>(collection)
            .insert_one(record, None)
            .await?;
        Ok(id_to_string(&result.inserted_id))
    }

    async fn query(
        &self,
        collection: &str,
        filter: Document,
        limit: i64,
    ) -> Result<Vec<Document>, StorageError> {
        let session = self.session()?;
        let options = FindOptions::builder().limit(limit).build();
        let cursor = session
            .database
            .collection::<Document>(collection)
            .find(filter, options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, StorageError> {
        let session = self.session()?;
        Ok(session.database.list_collection_names(None).await?)
    }

    async fn shutdown(&self) {
        if let Some(session) = &self.session {
            session.client.clone().shutdown().await;
            tracing::info!("MongoDB client shut down");
        }
    }
}

/// Builds the store selected by the configuration.
pub async fn connect_store(config: &Config) -> Arc<dyn DocumentStore> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, leads will not survive a restart");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Mongo => Arc::new(
            MongoStore::connect(
                config.database_url.as_deref(),
                config.database_name.as_deref(),
            )
            .await,
        ),
    }
}
