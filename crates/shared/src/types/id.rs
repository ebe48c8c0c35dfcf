//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `CartId` where an `AccountId` is expected.
//! Billing objects use sequential integer IDs (they appear in URIs and tables);
//! users are identified by UUID.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate integer-backed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Creates an ID from its raw database value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw database value.
            #[must_use]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

typed_id!(AccountId, "Unique identifier for a payment account.");
typed_id!(PaymentMethodId, "Unique identifier for a payment method.");
typed_id!(CartId, "Unique identifier for a cart (purchase order).");
typed_id!(PurchaseId, "Unique identifier for a purchase line item.");
typed_id!(ChargeId, "Unique identifier for a charge attempt.");
typed_id!(
    AccountTransactionId,
    "Unique identifier for an account audit transaction."
);

/// Unique identifier for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Creates a new random ID using UUID v7 (time-ordered).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates an ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_typed_id_display_and_parse() {
        let id = CartId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(CartId::from_str("42").unwrap(), id);
        assert!(CartId::from_str("forty-two").is_err());
    }

    #[test]
    fn test_typed_id_serializes_transparently() {
        let json = serde_json::to_string(&AccountId::new(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn test_user_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = UserId::from_uuid(uuid);
        assert_eq!(id.into_inner(), uuid);
        assert_eq!(UserId::from_str(&uuid.to_string()).unwrap(), id);
    }

    #[test]
    fn test_user_id_default_is_unique() {
        assert_ne!(UserId::default(), UserId::default());
    }
}
