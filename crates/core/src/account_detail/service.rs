//! Account detail assembler implementation.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::error::AccountDetailError;
use super::types::{AccountDetailPage, PaymentMethodsSection};
use crate::billing::{
    Account, AccountTransaction, Cart, CartStatus, Charge, PaymentMethod, PaymentMethodStatus,
    UserHandle, uri,
};
use crate::policy::{Capability, PolicyFilter, Viewer};
use crate::view::{
    Action, BarColor, Cell, Crumb, ItemAction, Link, ObjectItem, Property, PropertyList,
    TableSection, TableView, TransactionView, build_charges_table, format_datetime, user_link,
};
use phortune_shared::types::{AccountId, UserId};

/// Repository trait for the billing reads the account page needs.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait BillingRepository: Send + Sync {
    /// Find an account by ID, with its member list.
    fn find_account(
        &self,
        id: AccountId,
    ) -> impl std::future::Future<Output = Result<Option<Account>, AccountDetailError>> + Send;

    /// List every payment method owned by the account.
    fn list_payment_methods(
        &self,
        account_id: AccountId,
    ) -> impl std::future::Future<Output = Result<Vec<PaymentMethod>, AccountDetailError>> + Send;

    /// List the account's carts in the given statuses, purchases preloaded.
    fn list_carts(
        &self,
        account_id: AccountId,
        statuses: &[CartStatus],
    ) -> impl std::future::Future<Output = Result<Vec<Cart>, AccountDetailError>> + Send;

    /// List the account's charges. Charges whose cart is missing are skipped.
    fn list_charges(
        &self,
        account_id: AccountId,
    ) -> impl std::future::Future<Output = Result<Vec<Charge>, AccountDetailError>> + Send;

    /// List audit transactions targeting the account.
    fn list_account_transactions(
        &self,
        account_id: AccountId,
    ) -> impl std::future::Future<Output = Result<Vec<AccountTransaction>, AccountDetailError>> + Send;

    /// Load handles for the given users. Unknown IDs are omitted.
    fn load_user_handles(
        &self,
        ids: &[UserId],
    ) -> impl std::future::Future<Output = Result<Vec<UserHandle>, AccountDetailError>> + Send;
}

/// Builds the account detail page for one viewer and one account.
pub struct AccountDetailAssembler<R: BillingRepository> {
    repo: Arc<R>,
}

impl<R: BillingRepository> AccountDetailAssembler<R> {
    /// Create a new assembler.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Build the whole page.
    ///
    /// Sections are fetched one after another; the first failure aborts.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotAccessible` if the account cannot be resolved for
    /// the viewer, or `Repository` if any query fails.
    pub async fn assemble(
        &self,
        viewer: &Viewer,
        account_id: AccountId,
    ) -> Result<AccountDetailPage, AccountDetailError> {
        debug!(
            account_id = %account_id,
            viewer = %viewer.user_id,
            "Assembling account detail page"
        );

        let account = self.resolve_account(viewer, account_id).await?;

        let crumbs = vec![
            Crumb {
                name: "Phortune".to_string(),
                href: uri::APPLICATION_URI.to_string(),
            },
            Crumb {
                name: "Account".to_string(),
                href: uri::account(account.id),
            },
        ];

        let properties = self.build_properties(&account).await?;
        let payment_methods = self.build_payment_methods_section(&account, viewer).await?;
        let purchase_history = self.build_purchase_history_section(&account, viewer).await?;
        let charge_history = self.build_charge_history_section(&account, viewer).await?;
        let account_history = self.build_account_history_section(&account, viewer).await?;

        Ok(AccountDetailPage {
            title: account.name.clone(),
            crumbs,
            header: account.name.clone(),
            actions: Self::build_actions(),
            properties,
            payment_methods,
            purchase_history,
            charge_history,
            account_history,
        })
    }

    /// Load the account, requiring both view and edit capability.
    ///
    /// Merchants need broad view access to process orders, so view alone is
    /// not enough to see account details.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotAccessible` when the account does not exist or the
    /// viewer lacks either capability.
    pub async fn resolve_account(
        &self,
        viewer: &Viewer,
        account_id: AccountId,
    ) -> Result<Account, AccountDetailError> {
        let account = self
            .repo
            .find_account(account_id)
            .await?
            .ok_or(AccountDetailError::AccountNotAccessible(account_id))?;

        if !PolicyFilter::has_all(viewer, &account, &[Capability::View, Capability::Edit]) {
            debug!(
                account_id = %account_id,
                viewer = %viewer.user_id,
                "Viewer lacks capability on account"
            );
            return Err(AccountDetailError::AccountNotAccessible(account_id));
        }

        Ok(account)
    }

    /// Build the payment methods list.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn build_payment_methods_section(
        &self,
        account: &Account,
        viewer: &Viewer,
    ) -> Result<PaymentMethodsSection, AccountDetailError> {
        let can_edit = PolicyFilter::has_capability(viewer, account, Capability::Edit);
        let methods = self.repo.list_payment_methods(account.id).await?;

        let items = methods
            .iter()
            .map(|method| Self::payment_method_item(method, can_edit))
            .collect();

        Ok(PaymentMethodsSection {
            header: "Payment Methods".to_string(),
            no_data: "No payment methods associated with this account.".to_string(),
            items,
        })
    }

    /// Build the order history table.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn build_purchase_history_section(
        &self,
        account: &Account,
        viewer: &Viewer,
    ) -> Result<TableSection, AccountDetailError> {
        let carts = self
            .repo
            .list_carts(account.id, &CartStatus::ORDER_HISTORY)
            .await?;

        Ok(TableSection {
            header: "Order History".to_string(),
            table: order_history_table(&carts, viewer),
        })
    }

    /// Build the charge history table.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn build_charge_history_section(
        &self,
        account: &Account,
        viewer: &Viewer,
    ) -> Result<TableSection, AccountDetailError> {
        let charges = self.repo.list_charges(account.id).await?;
        Ok(build_charges_table(&charges, viewer))
    }

    /// Build the audit log.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn build_account_history_section(
        &self,
        account: &Account,
        viewer: &Viewer,
    ) -> Result<TransactionView, AccountDetailError> {
        let xactions = self.repo.list_account_transactions(account.id).await?;

        let mut user_ids: Vec<UserId> = xactions
            .iter()
            .flat_map(AccountTransaction::referenced_users)
            .collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let handles = self.load_handles(&user_ids).await?;

        Ok(TransactionView::build(account.id, &xactions, &handles, viewer))
    }

    async fn build_properties(&self, account: &Account) -> Result<PropertyList, AccountDetailError> {
        let handles = self.load_handles(&account.member_ids).await?;
        let members = account
            .member_ids
            .iter()
            .map(|id| Cell::link(user_link(*id, &handles)))
            .collect();

        Ok(PropertyList {
            properties: vec![Property {
                label: "Members".to_string(),
                values: members,
            }],
        })
    }

    async fn load_handles(
        &self,
        ids: &[UserId],
    ) -> Result<HashMap<UserId, UserHandle>, AccountDetailError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let handles = self.repo.load_user_handles(ids).await?;
        Ok(handles.into_iter().map(|h| (h.id, h)).collect())
    }

    fn build_actions() -> Vec<Action> {
        vec![
            Action {
                name: "Edit Account".to_string(),
                icon: "fa-pencil".to_string(),
                href: "#".to_string(),
                disabled: true,
            },
            Action {
                name: "Edit Members".to_string(),
                icon: "fa-users".to_string(),
                href: "#".to_string(),
                disabled: true,
            },
        ]
    }

    fn payment_method_item(method: &PaymentMethod, can_edit: bool) -> ObjectItem {
        let mut item = ObjectItem {
            header: method.full_display_name(),
            bar_color: None,
            disabled: false,
            attributes: Vec::new(),
            actions: Vec::new(),
        };

        match method.status {
            PaymentMethodStatus::Active => {
                item.bar_color = Some(BarColor::Green);
                item.actions.push(ItemAction {
                    name: "Disable".to_string(),
                    icon: "fa-times".to_string(),
                    href: uri::card_disable(method.id),
                    disabled: !can_edit,
                    workflow: true,
                });
            }
            PaymentMethodStatus::Disabled => {
                item.disabled = true;
            }
        }

        item.attributes
            .push(method.provider.payment_method_provider_description().to_string());

        item.actions.push(ItemAction {
            name: "Edit".to_string(),
            icon: "fa-pencil".to_string(),
            href: uri::card_edit(method.id),
            disabled: !can_edit,
            workflow: !can_edit,
        });

        item
    }
}

/// Lays out carts as table rows.
///
/// A cart with exactly one purchase shows it inline; a cart with several gets
/// one sub-row per purchase carrying only its name and price.
pub(crate) fn order_history_table(carts: &[Cart], viewer: &Viewer) -> TableView {
    let mut table = TableView::new(
        &["ID", "Order", "Purchase", "Amount", "Status", "Updated"],
        &["", "", "wide", "right", "", "right"],
    );
    table.no_data = "No orders found.".to_string();

    for cart in carts {
        let (purchase_name, sub_rows) = match cart.purchases.as_slice() {
            [only] => (
                Cell::link(Link::new(only.name.clone(), uri::purchase(only.id))),
                &[][..],
            ),
            purchases => (Cell::Empty, purchases),
        };

        table.push_row(
            vec![
                Cell::text(cart.id.to_string()),
                Cell::strong_link(Link::new(format!("Cart {}", cart.id), uri::cart(cart.id))),
                purchase_name,
                Cell::strong_text(cart.total_price.format_for_display()),
                Cell::text(cart.status.name()),
                Cell::text(format_datetime(cart.updated_at, viewer)),
            ],
            "",
        );

        for purchase in sub_rows {
            table.push_row(
                vec![
                    Cell::Empty,
                    Cell::link(Link::new(purchase.name.clone(), uri::purchase(purchase.id))),
                    Cell::text(purchase.total_price.format_for_display()),
                    Cell::Empty,
                    Cell::Empty,
                ],
                "",
            );
        }
    }

    table
}
