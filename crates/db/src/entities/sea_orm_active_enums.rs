//! Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "policy_kind")]
pub enum PolicyKind {
    #[sea_orm(string_value = "public")]
    Public,
    #[sea_orm(string_value = "members")]
    Members,
    #[sea_orm(string_value = "no_one")]
    NoOne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "payment_method_status"
)]
pub enum PaymentMethodStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "disabled")]
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "cart_status")]
pub enum CartStatus {
    #[sea_orm(string_value = "building")]
    Building,
    #[sea_orm(string_value = "ready")]
    Ready,
    #[sea_orm(string_value = "purchasing")]
    Purchasing,
    #[sea_orm(string_value = "charged")]
    Charged,
    #[sea_orm(string_value = "hold")]
    Hold,
    #[sea_orm(string_value = "review")]
    Review,
    #[sea_orm(string_value = "purchased")]
    Purchased,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "charge_status")]
pub enum ChargeStatus {
    #[sea_orm(string_value = "charging")]
    Charging,
    #[sea_orm(string_value = "charged")]
    Charged,
    #[sea_orm(string_value = "hold")]
    Hold,
    #[sea_orm(string_value = "failed")]
    Failed,
}
