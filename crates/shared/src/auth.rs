//! Authentication types for JWT access tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Viewer's IANA timezone, used when rendering timestamps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tz: Option<String>,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, timezone: Option<&str>, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            tz: timezone.map(ToString::to_string),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the viewer's timezone name, if the token carries one.
    #[must_use]
    pub fn timezone(&self) -> Option<&str> {
        self.tz.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_new_sets_correct_fields() {
        let user_id = Uuid::new_v4();
        let expires_at = Utc::now() + Duration::hours(1);

        let claims = Claims::new(user_id, Some("America/New_York"), expires_at);

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.timezone(), Some("America/New_York"));
        assert!(claims.iat <= Utc::now().timestamp());
        assert_eq!(claims.exp, expires_at.timestamp());
    }

    #[test]
    fn test_claims_without_timezone_omit_field() {
        let claims = Claims::new(Uuid::new_v4(), None, Utc::now() + Duration::hours(1));
        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("tz").is_none());

        let decoded: Claims = serde_json::from_value(json).unwrap();
        assert_eq!(decoded.timezone(), None);
    }
}
