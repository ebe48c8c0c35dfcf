//! Application URIs for billing objects.

use phortune_shared::types::{AccountId, CartId, PaymentMethodId, PurchaseId};

/// Base URI of the billing application.
pub const APPLICATION_URI: &str = "/phortune/";

/// Account detail page.
#[must_use]
pub fn account(id: AccountId) -> String {
    format!("{APPLICATION_URI}{id}/")
}

/// Cart detail page.
#[must_use]
pub fn cart(id: CartId) -> String {
    format!("{APPLICATION_URI}cart/{id}/")
}

/// Purchase detail page.
#[must_use]
pub fn purchase(id: PurchaseId) -> String {
    format!("{APPLICATION_URI}purchase/{id}/")
}

/// Payment method edit workflow.
#[must_use]
pub fn card_edit(id: PaymentMethodId) -> String {
    format!("{APPLICATION_URI}card/{id}/edit/")
}

/// Payment method disable workflow.
#[must_use]
pub fn card_disable(id: PaymentMethodId) -> String {
    format!("{APPLICATION_URI}card/{id}/disable/")
}

/// User profile page.
#[must_use]
pub fn user(username: &str) -> String {
    format!("/p/{username}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uris() {
        assert_eq!(account(AccountId::new(3)), "/phortune/3/");
        assert_eq!(cart(CartId::new(9)), "/phortune/cart/9/");
        assert_eq!(purchase(PurchaseId::new(12)), "/phortune/purchase/12/");
        assert_eq!(card_edit(PaymentMethodId::new(5)), "/phortune/card/5/edit/");
        assert_eq!(
            card_disable(PaymentMethodId::new(5)),
            "/phortune/card/5/disable/"
        );
        assert_eq!(user("alice"), "/p/alice/");
    }
}
