use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::invoice::{Invoice, NewInvoice};
use crate::database::repository::InvoiceStore;

/// Process-local invoice store with optional injected latency and failure.
#[derive(Clone, Default)]
pub struct MemoryInvoiceStore {
    rows: Arc<RwLock<Vec<Invoice>>>,
    completed_lists: Arc<AtomicUsize>,
    latency: Option<Duration>,
    failure: Option<String>,
}

impl MemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every read sleeps this long before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Every call fails with `DatabaseError::Unavailable(reason)`.
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }

    /// Number of `get_all` calls that ran to the end, whether or not anyone
    /// was still waiting for the answer.
    pub fn completed_lists(&self) -> usize {
        self.completed_lists.load(Ordering::SeqCst)
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    async fn simulate(&self) -> Result<(), DatabaseError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match &self.failure {
            Some(reason) => Err(DatabaseError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl InvoiceStore for MemoryInvoiceStore {
    async fn create(&self, invoice: NewInvoice) -> Result<Invoice, DatabaseError> {
        if let Some(reason) = &self.failure {
            return Err(DatabaseError::Unavailable(reason.clone()));
        }

        let id = {
            let mut rows = self.rows.write().await;
            let id = rows.last().map(|i| i.id + 1).unwrap_or(1);
            rows.push(Invoice::from_new(id, invoice));
            id
        };

        self.get_by_id(id).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Invoice, DatabaseError> {
        self.simulate().await?;
        self.rows
            .read()
            .await
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or(DatabaseError::NotFound(id))
    }

    async fn get_all(&self) -> Result<Vec<Invoice>, DatabaseError> {
        let outcome = self.simulate().await;
        self.completed_lists.fetch_add(1, Ordering::SeqCst);
        outcome?;
        Ok(self.rows.read().await.clone())
    }
}
