//! Capability checks for billing objects.
//!
//! Payment methods, carts, charges, and audit transactions have no policy of
//! their own: they inherit the capabilities of the account that owns them.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::billing::{Account, PolicyKind};
use phortune_shared::types::UserId;

/// A permission a viewer may hold over an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// May see the object.
    View,
    /// May change the object.
    Edit,
}

/// The signed-in user a page is built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    /// User ID.
    pub user_id: UserId,
    /// Timezone used to render timestamps.
    pub timezone: Tz,
}

impl Viewer {
    /// Creates a viewer rendering times in UTC.
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            timezone: Tz::UTC,
        }
    }

    /// Sets the viewer's timezone.
    #[must_use]
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Sets the timezone from an IANA name, keeping the current one if the
    /// name is unknown.
    #[must_use]
    pub fn with_timezone_name(self, name: Option<&str>) -> Self {
        match name.and_then(|n| n.parse::<Tz>().ok()) {
            Some(tz) => self.with_timezone(tz),
            None => self,
        }
    }
}

/// Evaluates account policies.
pub struct PolicyFilter;

impl PolicyFilter {
    /// Returns true if the viewer holds the capability on the account.
    #[must_use]
    pub fn has_capability(viewer: &Viewer, account: &Account, capability: Capability) -> bool {
        if account.is_member(viewer.user_id) {
            return true;
        }

        let policy = match capability {
            Capability::View => account.view_policy,
            Capability::Edit => account.edit_policy,
        };

        matches!(policy, PolicyKind::Public)
    }

    /// Returns true if the viewer holds every listed capability.
    #[must_use]
    pub fn has_all(viewer: &Viewer, account: &Account, capabilities: &[Capability]) -> bool {
        capabilities
            .iter()
            .all(|&capability| Self::has_capability(viewer, account, capability))
    }
}
