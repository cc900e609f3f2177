//! Session-related types.
//!
//! Authentication is handled by an external managed service; the storefront
//! only reads the identity it left in the session. The cart itself is also
//! stored in the session so it survives reloads (the session store is the
//! persistent key-value collaborator).

use serde::{Deserialize, Serialize};

use posie_core::{Email, UserId};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's ID as issued by the auth service.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
}

/// Session keys for storefront data.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for storing the serialized cart.
    pub const CART: &str = "cart";
}
