// handlers/invoices - the /invoices resource
//
// GET    /invoices       list, raced against the configured deadline
// POST   /invoices       create
// GET    /invoices/:id   show
// OPTIONS on both paths  preflight

pub mod create;
pub mod list;
pub mod options;
pub mod show;

pub use create::create_invoice;
pub use list::list_invoices;
pub use options::{invoice_options, invoices_options};
pub use show::get_invoice;
