//! User profile document.

use serde::{Deserialize, Serialize};

use stockvision_core::{UserId, UserRole};

/// A user profile, keyed by the authentication provider's stable user id.
///
/// The profile's `role` field is the single source of truth for privilege
/// resolution; it is re-read whenever the acting identity changes rather
/// than cached across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}
