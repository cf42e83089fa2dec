//! User domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tienda_core::{Email, UserId, Username};

/// A registered user.
///
/// The public projection returned by the account API. The password exists
/// only as a hash inside the store and is not a field here, so it can
/// never be echoed back in a response.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID, assigned by the store.
    pub id: UserId,
    /// Login name, unique.
    pub username: Username,
    /// Email address, unique.
    pub email: Email,
    /// Optional given name (empty string when not provided).
    pub first_name: String,
    /// Optional family name (empty string when not provided).
    pub last_name: String,
    /// Deactivated accounts keep their row but cannot log in.
    pub is_active: bool,
    /// When the account was created.
    pub date_joined: DateTime<Utc>,
}
