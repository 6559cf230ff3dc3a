use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::invoice::{Invoice, NewInvoice};

const COLUMNS: &str = "id, customer_id, due_date, amount, description";

/// Create/read access to invoices.
///
/// Each call is a future: dropping it before completion cancels the
/// underlying query, which is how a disconnecting client aborts its request.
#[async_trait]
pub trait InvoiceStore: Send + Sync + 'static {
    /// Insert and return the persisted row, including its assigned id.
    async fn create(&self, invoice: NewInvoice) -> Result<Invoice, DatabaseError>;

    /// `DatabaseError::NotFound` when no row has this id.
    async fn get_by_id(&self, id: i64) -> Result<Invoice, DatabaseError>;

    /// Every invoice, in storage order. Empty is not an error.
    async fn get_all(&self) -> Result<Vec<Invoice>, DatabaseError>;
}

/// Postgres-backed store over the `invoices` table
#[derive(Clone)]
pub struct PgInvoiceRepository {
    pool: PgPool,
}

impl PgInvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvoiceStore for PgInvoiceRepository {
    async fn create(&self, invoice: NewInvoice) -> Result<Invoice, DatabaseError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO invoices (customer_id, due_date, amount, description) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(invoice.customer_id)
        .bind(invoice.due_date)
        .bind(invoice.amount)
        .bind(&invoice.description)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("inserted invoice ID={}", id);

        // Re-read so the caller sees what storage actually kept
        self.get_by_id(id).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Invoice, DatabaseError> {
        let sql = format!("SELECT {} FROM invoices WHERE id = $1", COLUMNS);

        sqlx::query_as::<_, Invoice>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DatabaseError::NotFound(id))
    }

    async fn get_all(&self) -> Result<Vec<Invoice>, DatabaseError> {
        let sql = format!("SELECT {} FROM invoices", COLUMNS);

        let invoices = sqlx::query_as::<_, Invoice>(&sql).fetch_all(&self.pool).await?;
        Ok(invoices)
    }
}
