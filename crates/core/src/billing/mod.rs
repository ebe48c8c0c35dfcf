//! Billing domain: accounts, payment methods, carts, charges, and their audit log.

pub mod types;
pub mod uri;

pub use types::*;
