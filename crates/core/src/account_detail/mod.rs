//! Account detail page assembly.
//!
//! Resolves an account under policy, then builds the page in order:
//! - Summary (crumbs, header, action menu, properties)
//! - Payment methods
//! - Order history
//! - Charge history
//! - Account history (audit log)

mod error;
mod service;
mod types;


pub use error::AccountDetailError;
pub use service::{AccountDetailAssembler, BillingRepository};
pub use types::{AccountDetailPage, PaymentMethodsSection};
