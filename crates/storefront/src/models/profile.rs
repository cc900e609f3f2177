//! Customer profile domain type.

use serde::{Deserialize, Serialize};

use posie_core::UserId;

/// A customer's saved contact details.
///
/// Upserted best-effort after a successful checkout and used to prefill the
/// next checkout form. Fields are plain optional strings: this is display
/// prefill data, and validation happens at submission, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerProfile {
    /// Profile ID (= user ID).
    pub user_id: UserId,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl CustomerProfile {
    /// An empty profile for a user who has never checked out.
    #[must_use]
    pub const fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            full_name: None,
            phone: None,
            email: None,
            address: None,
        }
    }
}
