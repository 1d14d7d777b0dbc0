//! Storage layer
//!
//! [`Store`] covers single-statement reads and writes. [`StoreTx`] is one
//! unit of work used by order assembly: everything done through it lands on
//! `commit` or not at all (dropping it rolls back).

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use shared::models::{
    CartLine, Customer, Food, GeoPoint, Order, OrderStatus, Promo, Shipper, Transaction, Vendor,
};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Seed error: {0}")]
    Seed(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Field changes applied together with a lifecycle transition
#[derive(Debug, Clone)]
pub struct OrderTransition {
    pub from: OrderStatus,
    pub to: OrderStatus,
    /// Overwrites the notes when present
    pub notes: Option<String>,
    /// Overwrites the ready time when present
    pub ready_time_minutes: Option<i32>,
    pub updated_at: i64,
}

/// Persistent storage used by the services
#[async_trait]
pub trait Store: Send + Sync {
    // ── Customers ──
    async fn find_customer(&self, id: i64) -> RepoResult<Option<Customer>>;
    async fn find_customer_by_email(&self, email: &str) -> RepoResult<Option<Customer>>;
    /// Overwrite the pending one-time code
    async fn save_otp(&self, customer_id: i64, otp: &str, expires_at: i64) -> RepoResult<()>;
    /// Mark verified and drop the pending code
    async fn mark_customer_verified(&self, customer_id: i64) -> RepoResult<()>;

    // ── Cart ──
    async fn cart(&self, customer_id: i64) -> RepoResult<Vec<CartLine>>;
    /// Insert or replace the line for `line.food_id`; `quantity <= 0` removes it.
    /// Returns the resulting cart.
    async fn upsert_cart_line(&self, customer_id: i64, line: CartLine)
    -> RepoResult<Vec<CartLine>>;
    async fn clear_cart(&self, customer_id: i64) -> RepoResult<()>;

    // ── Catalog ──
    /// Foods that still exist among `ids`, in no particular order
    async fn find_foods(&self, ids: &[i64]) -> RepoResult<Vec<Food>>;
    async fn find_vendor(&self, id: i64) -> RepoResult<Option<Vendor>>;
    async fn find_vendor_by_email(&self, email: &str) -> RepoResult<Option<Vendor>>;
    /// Flip `service_available`; `None` when the vendor is missing
    async fn toggle_vendor_service(&self, id: i64) -> RepoResult<Option<Vendor>>;

    // ── Shippers ──
    async fn find_shipper(&self, id: i64) -> RepoResult<Option<Shipper>>;
    async fn find_shipper_by_email(&self, email: &str) -> RepoResult<Option<Shipper>>;
    async fn update_shipper_status(
        &self,
        id: i64,
        is_available: bool,
        location: Option<GeoPoint>,
    ) -> RepoResult<Option<Shipper>>;
    async fn set_shipper_verified(&self, id: i64, verified: bool) -> RepoResult<Option<Shipper>>;
    async fn list_shippers(&self) -> RepoResult<Vec<Shipper>>;

    // ── Promos ──
    async fn find_promo(&self, id: i64) -> RepoResult<Option<Promo>>;
    async fn create_promo(&self, promo: &Promo) -> RepoResult<()>;
    /// Overwrite every field of the stored promo with the same id
    async fn replace_promo(&self, promo: &Promo) -> RepoResult<Option<Promo>>;
    /// GENERIC promos plus those listing `vendor_id`, by id
    async fn promos_for_vendor(&self, vendor_id: i64) -> RepoResult<Vec<Promo>>;

    // ── Transactions ──
    async fn insert_transaction(&self, txn: &Transaction) -> RepoResult<()>;
    async fn find_transaction(&self, id: i64) -> RepoResult<Option<Transaction>>;
    async fn list_transactions(&self) -> RepoResult<Vec<Transaction>>;

    // ── Orders ──
    async fn find_order(&self, id: i64) -> RepoResult<Option<Order>>;
    /// Orders in the customer's history, oldest first
    async fn orders_for_customer(&self, customer_id: i64) -> RepoResult<Vec<Order>>;
    /// One order, only if it is in the customer's history
    async fn find_customer_order(&self, customer_id: i64, order_id: i64)
    -> RepoResult<Option<Order>>;
    async fn orders_for_vendor(&self, vendor_id: i64) -> RepoResult<Vec<Order>>;
    /// Apply `change` only if the order is still in `change.from`.
    /// `None` when the order is missing or its status moved on.
    async fn transition_order(
        &self,
        id: i64,
        change: &OrderTransition,
    ) -> RepoResult<Option<Order>>;

    /// Start a unit of work
    async fn begin(&self) -> RepoResult<Box<dyn StoreTx>>;
}

/// One atomic unit of work
#[async_trait]
pub trait StoreTx: Send {
    async fn find_transaction(&mut self, id: i64) -> RepoResult<Option<Transaction>>;
    /// Flip `OPEN -> SUCCESS` for the customer's transaction.
    /// `None` when it is not OPEN (or not theirs).
    async fn mark_transaction_spent(
        &mut self,
        id: i64,
        customer_id: i64,
    ) -> RepoResult<Option<Transaction>>;
    /// Verified, available shippers in `zone`
    async fn available_shippers(&mut self, zone: &str) -> RepoResult<Vec<Shipper>>;
    async fn insert_order(&mut self, order: &Order) -> RepoResult<()>;
    async fn attach_order(&mut self, transaction_id: i64, order_id: i64) -> RepoResult<()>;
    async fn clear_cart(&mut self, customer_id: i64) -> RepoResult<()>;
    async fn append_customer_order(&mut self, customer_id: i64, order_id: i64) -> RepoResult<()>;
    async fn commit(self: Box<Self>) -> RepoResult<()>;
}
