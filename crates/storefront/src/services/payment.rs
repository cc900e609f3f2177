//! Payment confirmation.
//!
//! The actual payment flow lives with an external UPI provider; this module
//! drives it through the [`PaymentProvider`] trait and finalizes the order
//! afterwards through the [`OrderStore`] seam. The order's stored
//! `payment_reference` is handed to the provider on every attempt, so a user
//! retrying after a network error settles at most once.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use posie_core::{OrderId, Price, UserId};

use crate::db::{OrderRepository, RepositoryError};
use crate::models::Order;

/// Errors from payment confirmation.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// No such order (or not owned by the requesting user).
    #[error("order not found")]
    OrderNotFound,

    /// The external provider rejected the settlement.
    #[error("payment was declined: {0}")]
    Declined(String),

    /// The provider settled but the status transition did not apply; the
    /// order remains pending and the user may retry.
    #[error("failed to record payment")]
    UpdateFailed,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// The external payment redirect collaborator.
///
/// Implementations are expected to treat `payment_reference` as an
/// idempotency key: settling the same reference twice must have one effect.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Run the external payment flow for an order.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Declined`] if the provider rejects the payment.
    async fn settle(
        &self,
        order_id: OrderId,
        payment_reference: Uuid,
        amount: Price,
    ) -> Result<(), PaymentError>;
}

/// Simulated UPI provider: waits out a fixed redirect delay, then succeeds.
#[derive(Debug, Clone)]
pub struct SimulatedUpiProvider {
    delay: Duration,
}

impl SimulatedUpiProvider {
    /// Create a provider with the given simulated redirect delay.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl PaymentProvider for SimulatedUpiProvider {
    async fn settle(
        &self,
        order_id: OrderId,
        payment_reference: Uuid,
        amount: Price,
    ) -> Result<(), PaymentError> {
        info!(%order_id, %payment_reference, %amount, "Redirecting to UPI provider");
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

/// The order persistence the service needs: a read and the guarded
/// status-pair transition.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the read fails.
    async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError>;

    /// Flip a pending order to completed/confirmed; `false` if no pending
    /// order matched.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the write fails.
    async fn mark_paid(&self, id: OrderId) -> Result<bool, RepositoryError>;
}

#[async_trait]
impl OrderStore for OrderRepository<'_> {
    async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        // Inherent methods take precedence, so this is not self-recursive.
        Self::get(self, id).await
    }

    async fn mark_paid(&self, id: OrderId) -> Result<bool, RepositoryError> {
        Self::mark_paid(self, id).await
    }
}

/// Service that finalizes an order's payment.
pub struct PaymentService<'a> {
    orders: &'a dyn OrderStore,
    provider: &'a dyn PaymentProvider,
}

impl<'a> PaymentService<'a> {
    /// Create a new payment service.
    #[must_use]
    pub const fn new(orders: &'a dyn OrderStore, provider: &'a dyn PaymentProvider) -> Self {
        Self { orders, provider }
    }

    /// Confirm payment for an order owned by `user_id`.
    ///
    /// Idempotent: an already-completed order is returned as-is without
    /// re-running the external flow. Otherwise the provider settles against
    /// the order's payment reference and the status pair flips to
    /// completed/confirmed in one guarded update; both fields transition
    /// together or not at all.
    ///
    /// # Errors
    ///
    /// - [`PaymentError::OrderNotFound`] if the order is absent or owned by
    ///   someone else (ownership is not leaked).
    /// - [`PaymentError::Declined`] if the provider rejects the payment.
    /// - [`PaymentError::UpdateFailed`] if the transition did not apply and
    ///   the order is still pending; the user sees a retry prompt.
    pub async fn confirm(&self, order_id: OrderId, user_id: UserId) -> Result<Order, PaymentError> {
        let order = self
            .orders
            .get(order_id)
            .await?
            .filter(|o| o.user_id == user_id)
            .ok_or(PaymentError::OrderNotFound)?;

        if order.is_paid() {
            info!(%order_id, "Payment already completed; skipping settlement");
            return Ok(order);
        }

        self.provider
            .settle(order.id, order.payment_reference, order.total_amount)
            .await?;

        if !self.orders.mark_paid(order_id).await? {
            // Lost a race with a concurrent confirmation: accept if the
            // other attempt completed, otherwise surface the failure.
            let current = self
                .orders
                .get(order_id)
                .await?
                .ok_or(PaymentError::OrderNotFound)?;
            if current.is_paid() {
                return Ok(current);
            }
            return Err(PaymentError::UpdateFailed);
        }

        self.orders
            .get(order_id)
            .await?
            .ok_or(PaymentError::OrderNotFound)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{Duration as ChronoDuration, Utc};

    use posie_core::{Address, Email, FullName, OrderStatus, PaymentStatus, Phone};

    use super::*;

    fn pending_order(user_id: UserId) -> Order {
        let now = Utc::now();
        Order {
            id: OrderId::new_v4(),
            user_id,
            full_name: FullName::parse("Priya Sharma").unwrap(),
            phone: Phone::parse("9876543210").unwrap(),
            email: Email::parse("priya@example.com").unwrap(),
            address: Address::parse("12 MG Road, Bandra West, Mumbai 400050").unwrap(),
            total_amount: Price::from_rupees(499).unwrap(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_reference: Uuid::new_v4(),
            expected_delivery_date: now + ChronoDuration::days(7),
            created_at: now,
        }
    }

    /// How the guarded update behaves when the order is still pending.
    enum MarkPaid {
        /// The transition applies normally.
        Applies,
        /// A concurrent confirmation completed the order first.
        LosesRaceToWinner,
        /// The transition does not apply and the order stays pending.
        DoesNotApply,
    }

    struct FakeOrders {
        order: Mutex<Order>,
        mark_paid: MarkPaid,
    }

    impl FakeOrders {
        fn new(order: Order, mark_paid: MarkPaid) -> Self {
            Self {
                order: Mutex::new(order),
                mark_paid,
            }
        }

        fn current(&self) -> Order {
            self.order.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl OrderStore for FakeOrders {
        async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
            let order = self.current();
            Ok((order.id == id).then_some(order))
        }

        async fn mark_paid(&self, id: OrderId) -> Result<bool, RepositoryError> {
            let mut order = self.order.lock().unwrap();
            if order.id != id || order.payment_status != PaymentStatus::Pending {
                return Ok(false);
            }
            match self.mark_paid {
                MarkPaid::Applies => {
                    order.payment_status = PaymentStatus::Completed;
                    order.status = OrderStatus::Confirmed;
                    Ok(true)
                }
                MarkPaid::LosesRaceToWinner => {
                    order.payment_status = PaymentStatus::Completed;
                    order.status = OrderStatus::Confirmed;
                    Ok(false)
                }
                MarkPaid::DoesNotApply => Ok(false),
            }
        }
    }

    #[derive(Default)]
    struct CountingProvider {
        settlements: AtomicUsize,
    }

    impl CountingProvider {
        fn settlement_count(&self) -> usize {
            self.settlements.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PaymentProvider for CountingProvider {
        async fn settle(
            &self,
            _order_id: OrderId,
            _payment_reference: Uuid,
            _amount: Price,
        ) -> Result<(), PaymentError> {
            self.settlements.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct DecliningProvider;

    #[async_trait]
    impl PaymentProvider for DecliningProvider {
        async fn settle(
            &self,
            _order_id: OrderId,
            _payment_reference: Uuid,
            _amount: Price,
        ) -> Result<(), PaymentError> {
            Err(PaymentError::Declined("insufficient funds".to_string()))
        }
    }

    #[tokio::test]
    async fn test_confirm_flips_both_statuses_together() {
        let user_id = UserId::new_v4();
        let order = pending_order(user_id);
        let order_id = order.id;
        let orders = FakeOrders::new(order, MarkPaid::Applies);
        let provider = CountingProvider::default();

        let confirmed = PaymentService::new(&orders, &provider)
            .confirm(order_id, user_id)
            .await
            .unwrap();

        assert_eq!(confirmed.status, OrderStatus::Confirmed);
        assert_eq!(confirmed.payment_status, PaymentStatus::Completed);
        assert_eq!(provider.settlement_count(), 1);
    }

    #[tokio::test]
    async fn test_confirm_already_paid_skips_settlement() {
        let user_id = UserId::new_v4();
        let mut order = pending_order(user_id);
        order.status = OrderStatus::Confirmed;
        order.payment_status = PaymentStatus::Completed;
        let order_id = order.id;
        let orders = FakeOrders::new(order, MarkPaid::Applies);
        let provider = CountingProvider::default();

        let confirmed = PaymentService::new(&orders, &provider)
            .confirm(order_id, user_id)
            .await
            .unwrap();

        assert!(confirmed.is_paid());
        assert_eq!(provider.settlement_count(), 0);
    }

    #[tokio::test]
    async fn test_confirm_replay_settles_once() {
        let user_id = UserId::new_v4();
        let order = pending_order(user_id);
        let order_id = order.id;
        let orders = FakeOrders::new(order, MarkPaid::Applies);
        let provider = CountingProvider::default();
        let service = PaymentService::new(&orders, &provider);

        service.confirm(order_id, user_id).await.unwrap();
        let replay = service.confirm(order_id, user_id).await.unwrap();

        assert!(replay.is_paid());
        assert_eq!(provider.settlement_count(), 1);
    }

    #[tokio::test]
    async fn test_confirm_foreign_order_is_not_found() {
        let order = pending_order(UserId::new_v4());
        let order_id = order.id;
        let orders = FakeOrders::new(order, MarkPaid::Applies);
        let provider = CountingProvider::default();

        let result = PaymentService::new(&orders, &provider)
            .confirm(order_id, UserId::new_v4())
            .await;

        assert!(matches!(result, Err(PaymentError::OrderNotFound)));
        assert_eq!(provider.settlement_count(), 0);
    }

    #[tokio::test]
    async fn test_confirm_lost_race_but_paid_succeeds() {
        let user_id = UserId::new_v4();
        let order = pending_order(user_id);
        let order_id = order.id;
        let orders = FakeOrders::new(order, MarkPaid::LosesRaceToWinner);
        let provider = CountingProvider::default();

        let confirmed = PaymentService::new(&orders, &provider)
            .confirm(order_id, user_id)
            .await
            .unwrap();

        assert!(confirmed.is_paid());
        assert_eq!(confirmed.status, OrderStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_confirm_update_not_applied_is_update_failed() {
        let user_id = UserId::new_v4();
        let order = pending_order(user_id);
        let order_id = order.id;
        let orders = FakeOrders::new(order, MarkPaid::DoesNotApply);
        let provider = CountingProvider::default();

        let result = PaymentService::new(&orders, &provider)
            .confirm(order_id, user_id)
            .await;

        assert!(matches!(result, Err(PaymentError::UpdateFailed)));

        // Neither status may have moved on its own.
        let current = orders.current();
        assert_eq!(current.status, OrderStatus::Pending);
        assert_eq!(current.payment_status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_confirm_declined_leaves_order_pending() {
        let user_id = UserId::new_v4();
        let order = pending_order(user_id);
        let order_id = order.id;
        let orders = FakeOrders::new(order, MarkPaid::Applies);

        let result = PaymentService::new(&orders, &DecliningProvider)
            .confirm(order_id, user_id)
            .await;

        assert!(matches!(result, Err(PaymentError::Declined(_))));

        let current = orders.current();
        assert_eq!(current.status, OrderStatus::Pending);
        assert_eq!(current.payment_status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_simulated_provider_settles() {
        let provider = SimulatedUpiProvider::new(Duration::from_millis(1));
        let result = provider
            .settle(
                OrderId::new_v4(),
                Uuid::new_v4(),
                Price::from_rupees(499).unwrap(),
            )
            .await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(PaymentError::OrderNotFound.to_string(), "order not found");
        assert_eq!(
            PaymentError::UpdateFailed.to_string(),
            "failed to record payment"
        );
        assert_eq!(
            PaymentError::Declined("insufficient funds".to_string()).to_string(),
            "payment was declined: insufficient funds"
        );
    }
}
