use mongodb::bson::Document;
use std::sync::Arc;

use crate::db::DocumentStore;
use crate::errors::StorageError;
use crate::models::{Lead, LeadResponse, LEAD_COLLECTION};

/// Lead persistence on top of the document store gateway.
#[derive(Clone)]
pub struct LeadStorage {
    store: Arc<dyn DocumentStore>,
}

impl LeadStorage {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Stores a validated lead and returns its identifier.
    pub async fn create_lead(&self, lead: &Lead) -> Result<String, StorageError> {
        let id = self
            .store
            .insert(LEAD_COLLECTION, lead.to_document())
            .await?;
        tracing::info!("Stored lead {} ({})", id, lead.email);
        Ok(id)
    }

    /// Lists up to `limit` leads in the store's natural order.
    ///
    /// No sort is applied, so two calls may return leads in different orders.
    pub async fn list_leads(&self, limit: i64) -> Result<Vec<LeadResponse>, StorageError> {
        let documents = self
            .store
            .query(LEAD_COLLECTION, Document::new(), limit)
            .await?;
        tracing::debug!("Fetched {} lead documents (limit {})", documents.len(), limit);
        Ok(documents.iter().map(LeadResponse::from_document).collect())
    }
}
