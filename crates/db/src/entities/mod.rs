//! `SeaORM` entity definitions for the billing schema.

pub mod account_members;
pub mod account_transactions;
pub mod accounts;
pub mod carts;
pub mod charges;
pub mod payment_methods;
pub mod purchases;
pub mod sea_orm_active_enums;
pub mod users;
