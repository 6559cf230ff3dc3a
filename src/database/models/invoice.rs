use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};

/// Invoice sent to a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    #[serde(rename = "customerID")]
    pub customer_id: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(rename = "dueDate", default = "zero_timestamp")]
    pub due_date: DateTime<Utc>,
    pub amount: f64,
}

/// Client payload for creating an invoice. Any `id` in the body is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvoice {
    #[serde(rename = "customerID")]
    pub customer_id: i64,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "dueDate", default = "zero_timestamp")]
    pub due_date: DateTime<Utc>,
    pub amount: f64,
}

impl Invoice {
    pub fn from_new(id: i64, new: NewInvoice) -> Self {
        Self {
            id,
            customer_id: new.customer_id,
            description: new.description,
            due_date: new.due_date,
            amount: new.amount,
        }
    }
}

/// `0001-01-01T00:00:00Z`, the stand-in for an unset due date.
pub fn zero_timestamp() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

// NULL description and due_date collapse to their zero values
impl<'r> FromRow<'r, PgRow> for Invoice {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let description: Option<String> = row.try_get("description")?;
        let due_date: Option<DateTime<Utc>> = row.try_get("due_date")?;

        Ok(Self {
            id: row.try_get("id")?,
            customer_id: row.try_get("customer_id")?,
            description: description.unwrap_or_default(),
            due_date: due_date.unwrap_or_else(zero_timestamp),
            amount: row.try_get("amount")?,
        })
    }
}
