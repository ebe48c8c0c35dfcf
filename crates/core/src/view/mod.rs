//! Page model and the shared builders used by billing pages.

pub mod charges;
pub mod datetime;
pub mod transactions;
pub mod types;

pub use charges::build_charges_table;
pub use datetime::format_datetime;
pub use transactions::{TransactionView, user_link};
pub use types::*;
