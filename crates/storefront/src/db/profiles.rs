//! Customer profile repository.
//!
//! Profiles exist to prefill the checkout form and are refreshed best-effort
//! after each successful checkout. They are never load-bearing: a failed
//! upsert is logged by the caller and the order stands.

use sqlx::PgPool;

use posie_core::{Address, Email, FullName, Phone, UserId};

use super::RepositoryError;
use crate::models::CustomerProfile;

/// Raw profile row as stored.
#[derive(sqlx::FromRow)]
struct ProfileRow {
    user_id: UserId,
    full_name: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
}

impl From<ProfileRow> for CustomerProfile {
    fn from(row: ProfileRow) -> Self {
        Self {
            user_id: row.user_id,
            full_name: row.full_name,
            phone: row.phone,
            email: row.email,
            address: row.address,
        }
    }
}

/// Repository for customer profiles.
pub struct ProfileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProfileRepository<'a> {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user's profile, if one has been saved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, user_id: UserId) -> Result<Option<CustomerProfile>, RepositoryError> {
        let row: Option<ProfileRow> = sqlx::query_as(
            r"
            SELECT user_id, full_name, phone, email, address
            FROM profiles
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(CustomerProfile::from))
    }

    /// Upsert the contact details submitted at checkout.
    ///
    /// Name, phone, and address are refreshed on every checkout; the email
    /// is only written when the profile is first created (it belongs to the
    /// auth service after that).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn upsert(
        &self,
        user_id: UserId,
        full_name: &FullName,
        phone: &Phone,
        email: &Email,
        address: &Address,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO profiles (user_id, full_name, phone, email, address)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE
            SET full_name = EXCLUDED.full_name,
                phone = EXCLUDED.phone,
                address = EXCLUDED.address,
                updated_at = NOW()
            ",
        )
        .bind(user_id)
        .bind(full_name.as_str())
        .bind(phone.as_str())
        .bind(email.as_str())
        .bind(address.as_str())
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
