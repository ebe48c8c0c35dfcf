//! Billing repository for database operations.
//!
//! Implements the account page reads using SeaORM.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde_json::Value as JsonValue;
use tracing::warn;
use uuid::Uuid;

use crate::entities::{
    account_members, account_transactions, accounts, carts, charges, payment_methods, purchases,
    sea_orm_active_enums::CartStatus as DbCartStatus,
    sea_orm_active_enums::ChargeStatus as DbChargeStatus,
    sea_orm_active_enums::PaymentMethodStatus as DbPaymentMethodStatus,
    sea_orm_active_enums::PolicyKind as DbPolicyKind, users,
};
use phortune_core::account_detail::{AccountDetailError, BillingRepository as BillingRepoTrait};
use phortune_core::billing::{
    Account, AccountTransaction, Cart, CartStatus, Charge, ChargeStatus, PaymentMethod,
    PaymentMethodStatus, PaymentProvider, PolicyKind, Purchase, TransactionKind, UserHandle,
};
use phortune_shared::types::{
    AccountId, AccountTransactionId, CartId, ChargeId, Currency, Money, PaymentMethodId,
    PurchaseId, UserId,
};

/// Billing repository implementation.
#[derive(Debug, Clone)]
pub struct BillingRepository {
    db: DatabaseConnection,
}

impl BillingRepository {
    /// Create a new billing repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl BillingRepoTrait for BillingRepository {
    async fn find_account(&self, id: AccountId) -> Result<Option<Account>, AccountDetailError> {
        let Some(model) = accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| AccountDetailError::repository(e.to_string()))?
        else {
            return Ok(None);
        };

        let members = account_members::Entity::find()
            .filter(account_members::Column::AccountId.eq(model.id))
            .order_by_asc(account_members::Column::CreatedAt)
            .order_by_asc(account_members::Column::UserId)
            .all(&self.db)
            .await
            .map_err(|e| AccountDetailError::repository(e.to_string()))?;

        Ok(Some(Account {
            id: AccountId::new(model.id),
            name: model.name,
            member_ids: members
                .into_iter()
                .map(|m| UserId::from_uuid(m.user_id))
                .collect(),
            view_policy: to_domain_policy(model.view_policy),
            edit_policy: to_domain_policy(model.edit_policy),
            created_at: to_utc(model.created_at),
            updated_at: to_utc(model.updated_at),
        }))
    }

    async fn list_payment_methods(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<PaymentMethod>, AccountDetailError> {
        let models = payment_methods::Entity::find()
            .filter(payment_methods::Column::AccountId.eq(account_id.into_inner()))
            .order_by_asc(payment_methods::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AccountDetailError::repository(e.to_string()))?;

        models.into_iter().map(to_domain_payment_method).collect()
    }

    async fn list_carts(
        &self,
        account_id: AccountId,
        statuses: &[CartStatus],
    ) -> Result<Vec<Cart>, AccountDetailError> {
        let db_statuses: Vec<DbCartStatus> =
            statuses.iter().copied().map(to_db_cart_status).collect();

        let rows = carts::Entity::find()
            .filter(carts::Column::AccountId.eq(account_id.into_inner()))
            .filter(carts::Column::Status.is_in(db_statuses))
            .order_by_asc(carts::Column::Id)
            .find_with_related(purchases::Entity)
            .all(&self.db)
            .await
            .map_err(|e| AccountDetailError::repository(e.to_string()))?;

        rows.into_iter()
            .map(|(cart, purchases)| to_domain_cart(cart, purchases))
            .collect()
    }

    async fn list_charges(&self, account_id: AccountId) -> Result<Vec<Charge>, AccountDetailError> {
        let models = charges::Entity::find()
            .inner_join(carts::Entity)
            .filter(charges::Column::AccountId.eq(account_id.into_inner()))
            .order_by_asc(charges::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AccountDetailError::repository(e.to_string()))?;

        let mut method_ids: Vec<i64> = models.iter().filter_map(|c| c.payment_method_id).collect();
        method_ids.sort_unstable();
        method_ids.dedup();

        let method_names: HashMap<i64, String> = if method_ids.is_empty() {
            HashMap::new()
        } else {
            payment_methods::Entity::find()
                .filter(payment_methods::Column::Id.is_in(method_ids))
                .all(&self.db)
                .await
                .map_err(|e| AccountDetailError::repository(e.to_string()))?
                .into_iter()
                .map(|m| Ok((m.id, to_domain_payment_method(m)?.full_display_name())))
                .collect::<Result<_, AccountDetailError>>()?
        };

        models
            .into_iter()
            .map(|charge| {
                let name = charge
                    .payment_method_id
                    .and_then(|id| method_names.get(&id).cloned());
                to_domain_charge(charge, name)
            })
            .collect()
    }

    async fn list_account_transactions(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<AccountTransaction>, AccountDetailError> {
        let models = account_transactions::Entity::find()
            .filter(account_transactions::Column::AccountId.eq(account_id.into_inner()))
            .order_by_asc(account_transactions::Column::CreatedAt)
            .order_by_asc(account_transactions::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AccountDetailError::repository(e.to_string()))?;

        models.into_iter().map(to_domain_transaction).collect()
    }

    async fn load_user_handles(
        &self,
        ids: &[UserId],
    ) -> Result<Vec<UserHandle>, AccountDetailError> {
        let uuids: Vec<Uuid> = ids.iter().map(|id| id.into_inner()).collect();

        let models = users::Entity::find()
            .filter(users::Column::Id.is_in(uuids))
            .all(&self.db)
            .await
            .map_err(|e| AccountDetailError::repository(e.to_string()))?;

        Ok(models
            .into_iter()
            .map(|u| UserHandle {
                id: UserId::from_uuid(u.id),
                username: u.username,
                real_name: u.real_name,
            })
            .collect())
    }
}

fn to_utc(at: DateTime<FixedOffset>) -> DateTime<Utc> {
    at.with_timezone(&Utc)
}

/// Convert database policy to domain policy.
const fn to_domain_policy(db: DbPolicyKind) -> PolicyKind {
    match db {
        DbPolicyKind::Public => PolicyKind::Public,
        DbPolicyKind::Members => PolicyKind::Members,
        DbPolicyKind::NoOne => PolicyKind::NoOne,
    }
}

/// Convert domain cart status to database enum.
const fn to_db_cart_status(status: CartStatus) -> DbCartStatus {
    match status {
        CartStatus::Building => DbCartStatus::Building,
        CartStatus::Ready => DbCartStatus::Ready,
        CartStatus::Purchasing => DbCartStatus::Purchasing,
        CartStatus::Charged => DbCartStatus::Charged,
        CartStatus::Hold => DbCartStatus::Hold,
        CartStatus::Review => DbCartStatus::Review,
        CartStatus::Purchased => DbCartStatus::Purchased,
    }
}

/// Convert database cart status to domain status.
const fn to_domain_cart_status(db: DbCartStatus) -> CartStatus {
    match db {
        DbCartStatus::Building => CartStatus::Building,
        DbCartStatus::Ready => CartStatus::Ready,
        DbCartStatus::Purchasing => CartStatus::Purchasing,
        DbCartStatus::Charged => CartStatus::Charged,
        DbCartStatus::Hold => CartStatus::Hold,
        DbCartStatus::Review => CartStatus::Review,
        DbCartStatus::Purchased => CartStatus::Purchased,
    }
}

const fn to_domain_charge_status(db: DbChargeStatus) -> ChargeStatus {
    match db {
        DbChargeStatus::Charging => ChargeStatus::Charging,
        DbChargeStatus::Charged => ChargeStatus::Charged,
        DbChargeStatus::Hold => ChargeStatus::Hold,
        DbChargeStatus::Failed => ChargeStatus::Failed,
    }
}

fn parse_provider(key: &str) -> Result<PaymentProvider, AccountDetailError> {
    PaymentProvider::from_key(key)
        .ok_or_else(|| AccountDetailError::repository(format!("unknown payment provider: {key}")))
}

fn parse_currency(code: &str) -> Result<Currency, AccountDetailError> {
    code.trim()
        .parse::<Currency>()
        .map_err(AccountDetailError::repository)
}

fn to_domain_payment_method(
    model: payment_methods::Model,
) -> Result<PaymentMethod, AccountDetailError> {
    Ok(PaymentMethod {
        id: PaymentMethodId::new(model.id),
        account_id: AccountId::new(model.account_id),
        author_id: UserId::from_uuid(model.author_id),
        provider: parse_provider(&model.provider_key)?,
        name: model.name,
        status: match model.status {
            DbPaymentMethodStatus::Active => PaymentMethodStatus::Active,
            DbPaymentMethodStatus::Disabled => PaymentMethodStatus::Disabled,
        },
        brand: model.brand,
        last_four_digits: model.last_four_digits.trim().to_string(),
    })
}

/// Builds a cart; its total is the sum of its purchases' totals.
fn to_domain_cart(
    cart: carts::Model,
    mut purchases: Vec<purchases::Model>,
) -> Result<Cart, AccountDetailError> {
    let currency = parse_currency(&cart.currency)?;
    purchases.sort_by_key(|p| p.id);

    let purchases: Vec<Purchase> = purchases
        .into_iter()
        .map(|p| Purchase {
            id: PurchaseId::new(p.id),
            cart_id: CartId::new(p.cart_id),
            name: p.name,
            total_price: Money::new(p.base_price * Decimal::from(p.quantity), currency),
        })
        .collect();

    let total: Decimal = purchases.iter().map(|p| p.total_price.amount).sum();

    Ok(Cart {
        id: CartId::new(cart.id),
        account_id: AccountId::new(cart.account_id),
        status: to_domain_cart_status(cart.status),
        total_price: Money::new(total, currency),
        updated_at: to_utc(cart.updated_at),
        purchases,
    })
}

fn to_domain_charge(
    model: charges::Model,
    payment_method_name: Option<String>,
) -> Result<Charge, AccountDetailError> {
    Ok(Charge {
        id: ChargeId::new(model.id),
        account_id: AccountId::new(model.account_id),
        cart_id: CartId::new(model.cart_id),
        provider: parse_provider(&model.provider_key)?,
        payment_method_id: model.payment_method_id.map(PaymentMethodId::new),
        payment_method_name,
        amount: Money::new(model.amount, parse_currency(&model.currency)?),
        status: to_domain_charge_status(model.status),
        created_at: to_utc(model.created_at),
    })
}

fn to_domain_transaction(
    model: account_transactions::Model,
) -> Result<AccountTransaction, AccountDetailError> {
    let kind = decode_transaction_kind(
        &model.transaction_type,
        model.old_value.as_ref(),
        model.new_value.as_ref(),
    )?;

    Ok(AccountTransaction {
        id: AccountTransactionId::new(model.id),
        account_id: AccountId::new(model.account_id),
        author_id: UserId::from_uuid(model.author_id),
        kind,
        created_at: to_utc(model.created_at),
    })
}

/// Decodes a stored transaction into its kind.
///
/// Member transactions store the full member list before and after the edit;
/// the kind carries the difference.
fn decode_transaction_kind(
    transaction_type: &str,
    old: Option<&JsonValue>,
    new: Option<&JsonValue>,
) -> Result<TransactionKind, AccountDetailError> {
    match transaction_type {
        "create" => Ok(TransactionKind::Create),
        "name" => {
            let new = new
                .and_then(JsonValue::as_str)
                .ok_or_else(|| AccountDetailError::repository("name transaction without new value"))?;
            Ok(TransactionKind::Name {
                old: old
                    .and_then(JsonValue::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
                new: new.to_string(),
            })
        }
        "members" => {
            let old = decode_user_list(old)?;
            let new = decode_user_list(new)?;
            Ok(TransactionKind::Members {
                added: new.iter().filter(|id| !old.contains(id)).copied().collect(),
                removed: old.iter().filter(|id| !new.contains(id)).copied().collect(),
            })
        }
        other => {
            warn!(transaction_type = %other, "Unknown account transaction type");
            Err(AccountDetailError::repository(format!(
                "unknown transaction type: {other}"
            )))
        }
    }
}

fn decode_user_list(value: Option<&JsonValue>) -> Result<Vec<UserId>, AccountDetailError> {
    match value {
        None | Some(JsonValue::Null) => Ok(Vec::new()),
        Some(v) => serde_json::from_value::<Vec<Uuid>>(v.clone())
            .map(|ids| ids.into_iter().map(UserId::from_uuid).collect())
            .map_err(|e| AccountDetailError::repository(format!("bad member list: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn timestamp() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(7 * 3600)
            .unwrap()
            .with_ymd_and_hms(2015, 1, 5, 22, 4, 0)
            .unwrap()
    }

    fn purchase(id: i64, name: &str, price: Decimal, quantity: i32) -> purchases::Model {
        purchases::Model {
            id,
            cart_id: 1,
            name: name.to_string(),
            base_price: price,
            quantity,
            created_at: timestamp(),
        }
    }

    fn cart_model(currency: &str) -> carts::Model {
        carts::Model {
            id: 1,
            account_id: 9,
            author_id: Uuid::new_v4(),
            status: DbCartStatus::Hold,
            currency: currency.to_string(),
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    #[test]
    fn test_cart_status_round_trip() {
        for status in [
            CartStatus::Building,
            CartStatus::Ready,
            CartStatus::Purchasing,
            CartStatus::Charged,
            CartStatus::Hold,
            CartStatus::Review,
            CartStatus::Purchased,
        ] {
            assert_eq!(to_domain_cart_status(to_db_cart_status(status)), status);
        }
    }

    #[test]
    fn test_cart_total_sums_purchases_in_id_order() {
        let cart = to_domain_cart(
            cart_model("USD"),
            vec![
                purchase(3, "Gizmo", dec!(3.50), 2),
                purchase(2, "Gadget", dec!(5), 1),
            ],
        )
        .unwrap();

        assert_eq!(cart.total_price, Money::new(dec!(12), Currency::Usd));
        assert_eq!(cart.purchases[0].name, "Gadget");
        assert_eq!(cart.purchases[1].total_price.amount, dec!(7));
        assert_eq!(cart.status, CartStatus::Hold);
        assert_eq!(cart.updated_at, Utc.with_ymd_and_hms(2015, 1, 5, 15, 4, 0).unwrap());
    }

    #[test]
    fn test_unknown_currency_is_an_error() {
        let result = to_domain_cart(cart_model("XXX"), vec![]);
        assert!(matches!(result, Err(AccountDetailError::Repository(_))));
    }

    #[test]
    fn test_payment_method_conversion() {
        let method = to_domain_payment_method(payment_methods::Model {
            id: 4,
            account_id: 9,
            author_id: Uuid::new_v4(),
            name: String::new(),
            status: DbPaymentMethodStatus::Disabled,
            provider_key: "braintree".to_string(),
            brand: "Visa".to_string(),
            last_four_digits: "4242".to_string(),
            created_at: timestamp(),
            updated_at: timestamp(),
        })
        .unwrap();

        assert_eq!(method.provider, PaymentProvider::Braintree);
        assert_eq!(method.status, PaymentMethodStatus::Disabled);
        assert_eq!(method.full_display_name(), "Visa x4242");
    }

    #[test]
    fn test_unknown_provider_is_an_error() {
        assert!(parse_provider("bitcoin").is_err());
        assert_eq!(parse_provider("wepay").unwrap(), PaymentProvider::WePay);
    }

    #[test]
    fn test_decode_name_transactions() {
        assert_eq!(
            decode_transaction_kind("name", None, Some(&json!("Acme"))).unwrap(),
            TransactionKind::Name {
                old: None,
                new: "Acme".to_string()
            }
        );
        assert_eq!(
            decode_transaction_kind("name", Some(&json!("Old")), Some(&json!("New"))).unwrap(),
            TransactionKind::Name {
                old: Some("Old".to_string()),
                new: "New".to_string()
            }
        );
        assert!(decode_transaction_kind("name", None, None).is_err());
    }

    #[test]
    fn test_decode_member_diff() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();

        let kind = decode_transaction_kind(
            "members",
            Some(&json!([a, b])),
            Some(&json!([b, c])),
        )
        .unwrap();

        assert_eq!(
            kind,
            TransactionKind::Members {
                added: vec![UserId::from_uuid(c)],
                removed: vec![UserId::from_uuid(a)],
            }
        );

        let kind = decode_transaction_kind("members", Some(&JsonValue::Null), Some(&json!([a])))
            .unwrap();
        assert_eq!(
            kind,
            TransactionKind::Members {
                added: vec![UserId::from_uuid(a)],
                removed: vec![],
            }
        );
    }

    #[test]
    fn test_decode_rejects_unknown_type() {
        assert!(decode_transaction_kind("delete", None, None).is_err());
        assert!(decode_transaction_kind("members", None, Some(&json!("nope"))).is_err());
        assert_eq!(
            decode_transaction_kind("create", None, None).unwrap(),
            TransactionKind::Create
        );
    }
}
