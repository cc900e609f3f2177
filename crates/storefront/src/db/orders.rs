//! Order repository.
//!
//! Checkout inserts the order and all of its line items in a single
//! transaction: an order row never exists without its items. The only
//! mutation after creation is the paired payment-status transition.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use posie_core::{
    Address, Email, FullName, OrderId, OrderItemId, OrderStatus, PaymentStatus, Phone, Price,
    ProductId, UserId,
};

use super::RepositoryError;
use crate::models::{Order, OrderItem, OrderItemDetail, OrderWithItems, Product};

/// Raw order row as stored.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    full_name: String,
    phone: String,
    email: String,
    address: String,
    total_amount: Price,
    status: String,
    payment_status: String,
    payment_reference: Uuid,
    expected_delivery_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_domain(self) -> Result<Order, RepositoryError> {
        let corrupt = |what: &str, id: OrderId| {
            RepositoryError::DataCorruption(format!("invalid {what} in order {id}"))
        };

        let full_name =
            FullName::parse(&self.full_name).map_err(|_| corrupt("full name", self.id))?;
        let phone = Phone::parse(&self.phone).map_err(|_| corrupt("phone", self.id))?;
        let email = Email::parse(&self.email).map_err(|_| corrupt("email", self.id))?;
        let address = Address::parse(&self.address).map_err(|_| corrupt("address", self.id))?;
        let status: OrderStatus = self
            .status
            .parse()
            .map_err(|_| corrupt("status", self.id))?;
        let payment_status: PaymentStatus = self
            .payment_status
            .parse()
            .map_err(|_| corrupt("payment status", self.id))?;

        Ok(Order {
            id: self.id,
            user_id: self.user_id,
            full_name,
            phone,
            email,
            address,
            total_amount: self.total_amount,
            status,
            payment_status,
            payment_reference: self.payment_reference,
            expected_delivery_date: self.expected_delivery_date,
            created_at: self.created_at,
        })
    }
}

/// Order item row joined with the current product snapshot (LEFT JOIN).
#[derive(sqlx::FromRow)]
struct OrderItemJoinRow {
    id: OrderItemId,
    order_id: OrderId,
    product_id: ProductId,
    quantity: i32,
    price: Price,
    p_name: Option<String>,
    p_description: Option<String>,
    p_price: Option<Price>,
    p_image_url: Option<String>,
    p_category: Option<String>,
    p_stock_quantity: Option<i32>,
    p_is_available: Option<bool>,
    p_created_at: Option<DateTime<Utc>>,
}

impl OrderItemJoinRow {
    fn into_domain(self) -> Result<OrderItemDetail, RepositoryError> {
        let quantity = u32::try_from(self.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!("negative quantity in order item {}", self.id))
        })?;

        let item = OrderItem {
            id: self.id,
            order_id: self.order_id,
            product_id: self.product_id,
            quantity,
            price: self.price,
        };

        // All product columns are NULL together when the product is gone.
        let product = match (
            self.p_name,
            self.p_description,
            self.p_price,
            self.p_image_url,
            self.p_category,
            self.p_stock_quantity,
            self.p_is_available,
            self.p_created_at,
        ) {
            (
                Some(name),
                Some(description),
                Some(price),
                Some(image_url),
                Some(category),
                Some(stock_quantity),
                Some(is_available),
                Some(created_at),
            ) => {
                let stock_quantity = u32::try_from(stock_quantity).map_err(|_| {
                    RepositoryError::DataCorruption(format!(
                        "negative stock quantity for product {}",
                        self.product_id
                    ))
                })?;
                Some(Product {
                    id: self.product_id,
                    name,
                    description,
                    price,
                    image_url,
                    category,
                    stock_quantity,
                    is_available,
                    created_at,
                })
            }
            _ => None,
        };

        Ok(OrderItemDetail { item, product })
    }
}

/// Repository for order persistence and reads.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist an order together with all of its items, atomically.
    ///
    /// The order ID is generated by the caller, so both the order row and
    /// every item row go into one transaction; either all land or none do.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails; nothing is
    /// committed in that case.
    pub async fn create_with_items(
        &self,
        order: &Order,
        items: &[OrderItem],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO orders (id, user_id, full_name, phone, email, address,
                                total_amount, status, payment_status, payment_reference,
                                expected_delivery_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(order.id)
        .bind(order.user_id)
        .bind(order.full_name.as_str())
        .bind(order.phone.as_str())
        .bind(order.email.as_str())
        .bind(order.address.as_str())
        .bind(order.total_amount)
        .bind(order.status.to_string())
        .bind(order.payment_status.to_string())
        .bind(order.payment_reference)
        .bind(order.expected_delivery_date)
        .bind(order.created_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r"
                INSERT INTO order_items (id, order_id, product_id, quantity, price)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(item.id)
            .bind(item.order_id)
            .bind(item.product_id)
            .bind(i64::from(item.quantity))
            .bind(item.price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(
            r"
            SELECT id, user_id, full_name, phone, email, address, total_amount,
                   status, payment_status, payment_reference,
                   expected_delivery_date, created_at
            FROM orders
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(OrderRow::into_domain).transpose()
    }

    /// List a user's orders with their items, most recent first.
    ///
    /// A user with no orders gets an empty vec, not an error. Each item is
    /// joined with the current product snapshot; a deleted product leaves
    /// the item with `product: None`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let order_rows: Vec<OrderRow> = sqlx::query_as(
            r"
            SELECT id, user_id, full_name, phone, email, address, total_amount,
                   status, payment_status, payment_reference,
                   expected_delivery_date, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        if order_rows.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<Uuid> = order_rows.iter().map(|r| r.id.as_uuid()).collect();

        let item_rows: Vec<OrderItemJoinRow> = sqlx::query_as(
            r"
            SELECT i.id, i.order_id, i.product_id, i.quantity, i.price,
                   p.name AS p_name, p.description AS p_description,
                   p.price AS p_price, p.image_url AS p_image_url,
                   p.category AS p_category, p.stock_quantity AS p_stock_quantity,
                   p.is_available AS p_is_available, p.created_at AS p_created_at
            FROM order_items i
            LEFT JOIN products p ON p.id = i.product_id
            WHERE i.order_id = ANY($1)
            ",
        )
        .bind(&order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut items_by_order: std::collections::HashMap<OrderId, Vec<OrderItemDetail>> =
            std::collections::HashMap::new();
        for row in item_rows {
            let order_id = row.order_id;
            items_by_order
                .entry(order_id)
                .or_default()
                .push(row.into_domain()?);
        }

        order_rows
            .into_iter()
            .map(|row| {
                let order = row.into_domain()?;
                let items = items_by_order.remove(&order.id).unwrap_or_default();
                Ok(OrderWithItems { order, items })
            })
            .collect()
    }

    /// Mark an order as paid: `payment_status` -> completed and `status` ->
    /// confirmed in one statement, guarded on the order still being pending.
    ///
    /// Returns `true` if the transition applied, `false` if no pending order
    /// matched (already completed, or absent).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn mark_paid(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE orders
            SET payment_status = 'completed', status = 'confirmed'
            WHERE id = $1 AND payment_status = 'pending'
            ",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
