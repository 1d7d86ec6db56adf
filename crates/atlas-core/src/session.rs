//! # Session Context
//!
//! The decoded identity of the signed-in employee. The access token's claims
//! are decoded ONCE at login into a [`SessionContext`]; every later role
//! check reads this value instead of re-decoding the token.
//!
//! ```text
//! POST /api/token/ ──► { access, refresh }
//!                          │
//!                          ▼ decode claims once
//!                  SessionContext { username, groups, expires_at }
//!                          │
//!                          ▼
//!          role checks, header display, refresh scheduling
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// Group names as the backend assigns them.
pub const GROUP_MANAGER: &str = "Manager";
pub const GROUP_SALER: &str = "Saler";
pub const GROUP_SHOP_OWNER: &str = "Shop Owner";
pub const GROUP_WAREHOUSE_MANAGER: &str = "Warehouse Manager";

/// Identity and permissions of the signed-in employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SessionContext {
    pub username: String,
    /// Group names from the token, verbatim.
    pub groups: Vec<String>,
    /// Access-token expiry as Unix seconds.
    pub expires_at: i64,
}

impl SessionContext {
    pub fn new(username: impl Into<String>, groups: Vec<String>, expires_at: i64) -> Self {
        SessionContext {
            username: username.into(),
            groups,
            expires_at,
        }
    }

    pub fn has_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }

    /// Back-office access: managers and salers share the store screens.
    pub fn can_manage_store(&self) -> bool {
        self.has_group(GROUP_MANAGER) || self.has_group(GROUP_SALER)
    }

    /// The purchasing screens admit owners and warehouse staff.
    pub fn can_view_purchases(&self) -> bool {
        self.has_group(GROUP_SHOP_OWNER) || self.has_group(GROUP_WAREHOUSE_MANAGER)
    }

    /// Creating a purchase order is owner-only; warehouse staff receive
    /// and cancel but never open new orders.
    pub fn can_create_purchases(&self) -> bool {
        self.has_group(GROUP_SHOP_OWNER)
    }

    /// Whether the access token has already expired at `now` (Unix seconds).
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }

    /// Whether the token expires within `margin_secs` of `now`. The refresh
    /// flow uses this to renew before the backend starts rejecting calls.
    pub fn expires_within(&self, margin_secs: i64, now: i64) -> bool {
        now + margin_secs >= self.expires_at
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(groups: &[&str]) -> SessionContext {
        SessionContext::new(
            "nga",
            groups.iter().map(|g| g.to_string()).collect(),
            2_000_000_000,
        )
    }

    #[test]
    fn test_manager_and_saler_share_store_screens() {
        assert!(ctx(&[GROUP_MANAGER]).can_manage_store());
        assert!(ctx(&[GROUP_SALER]).can_manage_store());
        assert!(!ctx(&[GROUP_WAREHOUSE_MANAGER]).can_manage_store());
    }

    #[test]
    fn test_purchase_screen_roles() {
        assert!(ctx(&[GROUP_SHOP_OWNER]).can_view_purchases());
        assert!(ctx(&[GROUP_WAREHOUSE_MANAGER]).can_view_purchases());
        assert!(!ctx(&[GROUP_SALER]).can_view_purchases());
    }

    #[test]
    fn test_only_owner_creates_purchases() {
        assert!(ctx(&[GROUP_SHOP_OWNER]).can_create_purchases());
        assert!(!ctx(&[GROUP_WAREHOUSE_MANAGER]).can_create_purchases());
    }

    #[test]
    fn test_multiple_groups_combine() {
        let both = ctx(&[GROUP_SALER, GROUP_WAREHOUSE_MANAGER]);
        assert!(both.can_manage_store());
        assert!(both.can_view_purchases());
        assert!(!both.can_create_purchases());
    }

    #[test]
    fn test_expiry_checks() {
        let session = SessionContext::new("nga", vec![], 1_000);
        assert!(!session.is_expired(999));
        assert!(session.is_expired(1_000));
        assert!(session.expires_within(60, 950));
        assert!(!session.expires_within(60, 900));
    }
}
