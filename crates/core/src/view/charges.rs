//! Charge history table, shared by account and cart pages.

use super::datetime::format_datetime;
use super::types::{Cell, Link, TableSection, TableView};
use crate::billing::{Charge, uri};
use crate::policy::Viewer;

/// Builds the "Charge History" table: one row per charge.
#[must_use]
pub fn build_charges_table(charges: &[Charge], viewer: &Viewer) -> TableSection {
    let mut table = TableView::new(
        &["ID", "Cart", "Provider", "Method", "Amount", "Status", "Created"],
        &["", "strong", "", "", "wide right", "", ""],
    );
    table.no_data = "No charges found.".to_string();

    for charge in charges {
        let method = match (charge.payment_method_id, &charge.payment_method_name) {
            (Some(id), Some(name)) => Cell::link(Link::new(name.clone(), uri::card_edit(id))),
            (Some(id), None) => Cell::link(Link::new(
                format!("Payment Method {id}"),
                uri::card_edit(id),
            )),
            (None, _) => Cell::Empty,
        };

        table.push_row(
            vec![
                Cell::text(charge.id.to_string()),
                Cell::link(Link::new(
                    format!("Cart {}", charge.cart_id),
                    uri::cart(charge.cart_id),
                )),
                Cell::text(charge.provider.name()),
                method,
                Cell::text(charge.amount.format_for_display()),
                Cell::text(charge.status.name()),
                Cell::text(format_datetime(charge.created_at, viewer)),
            ],
            "",
        );
    }

    TableSection {
        header: "Charge History".to_string(),
        table,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::{ChargeStatus, PaymentProvider};
    use chrono::{TimeZone, Utc};
    use phortune_shared::types::{
        AccountId, CartId, ChargeId, Currency, Money, PaymentMethodId, UserId,
    };
    use rust_decimal_macros::dec;

    fn charge(id: i64, method: Option<(i64, &str)>) -> Charge {
        Charge {
            id: ChargeId::new(id),
            account_id: AccountId::new(1),
            cart_id: CartId::new(10 + id),
            provider: PaymentProvider::Stripe,
            payment_method_id: method.map(|(id, _)| PaymentMethodId::new(id)),
            payment_method_name: method.map(|(_, name)| name.to_string()),
            amount: Money::new(dec!(25), Currency::Usd),
            status: ChargeStatus::Charged,
            created_at: Utc.with_ymd_and_hms(2015, 1, 5, 15, 4, 0).unwrap(),
        }
    }

    #[test]
    fn test_charge_rows() {
        let viewer = Viewer::new(UserId::new());
        let section = build_charges_table(&[charge(1, Some((3, "Visa x4242"))), charge(2, None)], &viewer);

        assert_eq!(section.header, "Charge History");
        assert_eq!(section.table.headers.len(), 7);
        assert_eq!(section.table.rows.len(), 2);

        let first = &section.table.rows[0];
        assert_eq!(first[0].display_text(), "1");
        assert_eq!(
            first[1],
            Cell::link(Link::new("Cart 11", "/phortune/cart/11/"))
        );
        assert_eq!(first[2].display_text(), "Stripe");
        assert_eq!(
            first[3],
            Cell::link(Link::new("Visa x4242", "/phortune/card/3/edit/"))
        );
        assert_eq!(first[4].display_text(), "$25.00 USD");
        assert_eq!(first[5].display_text(), "Charged");
        assert_eq!(first[6].display_text(), "Mon, Jan 5, 3:04 PM");

        assert!(section.table.rows[1][3].is_empty());
    }

    #[test]
    fn test_no_charges() {
        let section = build_charges_table(&[], &Viewer::new(UserId::new()));
        assert!(section.table.rows.is_empty());
        assert_eq!(section.table.no_data, "No charges found.");
    }
}
