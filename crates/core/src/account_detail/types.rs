//! Account detail page model.

use serde::Serialize;

use crate::view::{Action, Crumb, ObjectItem, PropertyList, TableSection, TransactionView};

/// Payment methods list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentMethodsSection {
    /// Section header.
    pub header: String,
    /// Shown when the account has no payment methods.
    pub no_data: String,
    /// One item per payment method.
    pub items: Vec<ObjectItem>,
}

/// Everything the account detail page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountDetailPage {
    /// Page title (the account name).
    pub title: String,
    /// Breadcrumb trail.
    pub crumbs: Vec<Crumb>,
    /// Object header text.
    pub header: String,
    /// Action menu.
    pub actions: Vec<Action>,
    /// Account properties.
    pub properties: PropertyList,
    /// Payment methods section.
    pub payment_methods: PaymentMethodsSection,
    /// Order history table.
    pub purchase_history: TableSection,
    /// Charge history table.
    pub charge_history: TableSection,
    /// Audit log.
    pub account_history: TransactionView,
}
