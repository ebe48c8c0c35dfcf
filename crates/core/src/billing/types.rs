//! Billing domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use phortune_shared::types::{
    AccountId, AccountTransactionId, CartId, ChargeId, Money, PaymentMethodId, PurchaseId, UserId,
};

/// Who a policy grants a capability to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Any signed-in user.
    Public,
    /// Only users in the account's member list.
    Members,
    /// Nobody (members still hold every capability on their own account).
    NoOne,
}

/// A payment account: the owner of payment methods, carts, and charges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account ID.
    pub id: AccountId,
    /// Display name.
    pub name: String,
    /// Users who manage this account.
    pub member_ids: Vec<UserId>,
    /// Who may view the account.
    pub view_policy: PolicyKind,
    /// Who may edit the account.
    pub edit_policy: PolicyKind,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Returns true if the user is one of the account's members.
    #[must_use]
    pub fn is_member(&self, user_id: UserId) -> bool {
        self.member_ids.contains(&user_id)
    }
}

/// Payment method status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodStatus {
    /// Usable for new charges.
    Active,
    /// Retired by a member; kept for history.
    Disabled,
}

/// Payment processors a method can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentProvider {
    /// Stripe.
    Stripe,
    /// Braintree.
    Braintree,
    /// Balanced Payments.
    Balanced,
    /// PayPal.
    PayPal,
    /// WePay.
    WePay,
    /// Local test provider; never moves real money.
    Test,
}

impl PaymentProvider {
    /// Returns the stable key stored with payment methods and charges.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Stripe => "stripe",
            Self::Braintree => "braintree",
            Self::Balanced => "balanced",
            Self::PayPal => "paypal",
            Self::WePay => "wepay",
            Self::Test => "test",
        }
    }

    /// Resolves a provider from its stored key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "stripe" => Some(Self::Stripe),
            "braintree" => Some(Self::Braintree),
            "balanced" => Some(Self::Balanced),
            "paypal" => Some(Self::PayPal),
            "wepay" => Some(Self::WePay),
            "test" => Some(Self::Test),
            _ => None,
        }
    }

    /// Human-readable provider name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Stripe => "Stripe",
            Self::Braintree => "Braintree",
            Self::Balanced => "Balanced",
            Self::PayPal => "PayPal",
            Self::WePay => "WePay",
            Self::Test => "Test Payments",
        }
    }

    /// Description shown under each payment method.
    #[must_use]
    pub const fn payment_method_provider_description(self) -> &'static str {
        match self {
            Self::Stripe => "Processed by Stripe.",
            Self::Braintree => "Processed by Braintree.",
            Self::Balanced => "Processed by Balanced.",
            Self::PayPal => "Processed by PayPal.",
            Self::WePay => "Processed by WePay.",
            Self::Test => "Processed by the test payment provider.",
        }
    }
}

/// A stored card or other payment instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    /// Payment method ID.
    pub id: PaymentMethodId,
    /// Owning account.
    pub account_id: AccountId,
    /// User who added the method.
    pub author_id: UserId,
    /// User-chosen name; may be empty.
    pub name: String,
    /// Current status.
    pub status: PaymentMethodStatus,
    /// Processor holding the instrument.
    pub provider: PaymentProvider,
    /// Card brand, e.g. "Visa".
    pub brand: String,
    /// Last four digits of the card number.
    pub last_four_digits: String,
}

impl PaymentMethod {
    /// Returns the brand and masked number, e.g. `Visa x4242`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{} x{}", self.brand, self.last_four_digits)
    }

    /// Returns the name shown in lists, e.g. `Work Card (Visa x4242)`.
    #[must_use]
    pub fn full_display_name(&self) -> String {
        if self.name.trim().is_empty() {
            self.summary()
        } else {
            format!("{} ({})", self.name, self.summary())
        }
    }
}

/// Cart lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    /// Items are still being added.
    Building,
    /// Ready for checkout.
    Ready,
    /// Checkout in progress.
    Purchasing,
    /// Payment captured, fulfilment pending.
    Charged,
    /// Held by the provider or merchant.
    Hold,
    /// Awaiting merchant review.
    Review,
    /// Fully purchased.
    Purchased,
}

impl CartStatus {
    /// Statuses that appear in an account's order history.
    pub const ORDER_HISTORY: [Self; 4] = [Self::Purchasing, Self::Charged, Self::Hold, Self::Purchased];

    /// Human-readable status name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Building => "Building",
            Self::Ready => "Ready",
            Self::Purchasing => "Purchasing",
            Self::Charged => "Charged",
            Self::Hold => "Hold",
            Self::Review => "Review",
            Self::Purchased => "Purchased",
        }
    }
}

/// A single line item within a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    /// Purchase ID.
    pub id: PurchaseId,
    /// Cart the purchase belongs to.
    pub cart_id: CartId,
    /// Display name (usually the product name).
    pub name: String,
    /// Line total.
    pub total_price: Money,
}

/// An order aggregating purchases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Cart ID.
    pub id: CartId,
    /// Owning account.
    pub account_id: AccountId,
    /// Current status.
    pub status: CartStatus,
    /// Total price of all purchases.
    pub total_price: Money,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// Line items, in creation order.
    pub purchases: Vec<Purchase>,
}

/// Charge status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeStatus {
    /// Capture in flight.
    Charging,
    /// Capture succeeded.
    Charged,
    /// Held for review.
    Hold,
    /// Capture failed.
    Failed,
}

impl ChargeStatus {
    /// Human-readable status name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Charging => "Charging",
            Self::Charged => "Charged",
            Self::Hold => "Hold",
            Self::Failed => "Failed",
        }
    }
}

/// A capture attempt against a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Charge {
    /// Charge ID.
    pub id: ChargeId,
    /// Owning account.
    pub account_id: AccountId,
    /// Cart being paid for.
    pub cart_id: CartId,
    /// Processor used.
    pub provider: PaymentProvider,
    /// Payment method used, if any.
    pub payment_method_id: Option<PaymentMethodId>,
    /// Display name of the payment method, loaded with the charge.
    pub payment_method_name: Option<String>,
    /// Amount captured.
    pub amount: Money,
    /// Current status.
    pub status: ChargeStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// What an account audit transaction changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransactionKind {
    /// The account was created.
    Create,
    /// The account was named or renamed.
    Name {
        /// Previous name; `None` when first set.
        old: Option<String>,
        /// New name.
        new: String,
    },
    /// Members were added or removed.
    Members {
        /// Users added.
        added: Vec<UserId>,
        /// Users removed.
        removed: Vec<UserId>,
    },
}

/// An audit-log record targeting an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTransaction {
    /// Transaction ID.
    pub id: AccountTransactionId,
    /// Target account.
    pub account_id: AccountId,
    /// User who made the change.
    pub author_id: UserId,
    /// The change.
    pub kind: TransactionKind,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl AccountTransaction {
    /// Returns every user referenced by this transaction, author first.
    #[must_use]
    pub fn referenced_users(&self) -> Vec<UserId> {
        let mut users = vec![self.author_id];
        if let TransactionKind::Members { added, removed } = &self.kind {
            users.extend(added.iter().chain(removed.iter()).copied());
        }
        users
    }
}

/// The minimum needed to name and link a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserHandle {
    /// User ID.
    pub id: UserId,
    /// Username, used in links.
    pub username: String,
    /// Full name.
    pub real_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn method(name: &str) -> PaymentMethod {
        PaymentMethod {
            id: PaymentMethodId::new(1),
            account_id: AccountId::new(1),
            author_id: UserId::new(),
            name: name.to_string(),
            status: PaymentMethodStatus::Active,
            provider: PaymentProvider::Stripe,
            brand: "Visa".to_string(),
            last_four_digits: "4242".to_string(),
        }
    }

    #[test]
    fn test_full_display_name_with_name() {
        assert_eq!(method("Work Card").full_display_name(), "Work Card (Visa x4242)");
    }

    #[test]
    fn test_full_display_name_without_name() {
        assert_eq!(method("  ").full_display_name(), "Visa x4242");
    }

    #[rstest]
    #[case(PaymentProvider::Stripe)]
    #[case(PaymentProvider::Braintree)]
    #[case(PaymentProvider::Balanced)]
    #[case(PaymentProvider::PayPal)]
    #[case(PaymentProvider::WePay)]
    #[case(PaymentProvider::Test)]
    fn test_provider_key_is_stable(#[case] provider: PaymentProvider) {
        assert_eq!(PaymentProvider::from_key(provider.key()), Some(provider));
    }

    #[test]
    fn test_unknown_provider_key() {
        assert_eq!(PaymentProvider::from_key("bitcoin"), None);
    }

    #[test]
    fn test_order_history_statuses() {
        assert!(!CartStatus::ORDER_HISTORY.contains(&CartStatus::Building));
        assert!(!CartStatus::ORDER_HISTORY.contains(&CartStatus::Ready));
        assert!(!CartStatus::ORDER_HISTORY.contains(&CartStatus::Review));
        assert!(CartStatus::ORDER_HISTORY.contains(&CartStatus::Hold));
    }

    #[test]
    fn test_referenced_users_includes_member_changes() {
        let author = UserId::new();
        let added = UserId::new();
        let removed = UserId::new();
        let xaction = AccountTransaction {
            id: AccountTransactionId::new(1),
            account_id: AccountId::new(1),
            author_id: author,
            kind: TransactionKind::Members {
                added: vec![added],
                removed: vec![removed],
            },
            created_at: Utc::now(),
        };

        assert_eq!(xaction.referenced_users(), vec![author, added, removed]);
    }
}
