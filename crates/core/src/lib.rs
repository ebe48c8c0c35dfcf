//! Core business logic for Phortune.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, policy rules, and page assembly live here.
//!
//! # Modules
//!
//! - `billing` - Accounts, payment methods, carts, charges, audit transactions
//! - `policy` - Viewer capabilities over accounts
//! - `view` - Display-ready page model and shared table/timeline builders
//! - `account_detail` - The account detail page assembler

pub mod account_detail;
pub mod billing;
pub mod policy;
pub mod view;
