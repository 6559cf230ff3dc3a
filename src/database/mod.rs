pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryInvoiceStore;
pub use models::invoice::{Invoice, NewInvoice};
pub use repository::{InvoiceStore, PgInvoiceRepository};
