pub mod invoices;
pub mod not_found;

pub use not_found::route_not_found;
