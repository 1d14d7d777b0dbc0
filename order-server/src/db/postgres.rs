//! PostgreSQL store

use async_trait::async_trait;
use shared::models::{
    CartLine, Customer, Food, GeoPoint, Order, Promo, Shipper, Transaction, Vendor,
};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres};

use super::{OrderTransition, RepoResult, Store, StoreTx};

/// Store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and apply pending migrations
    pub async fn connect(database_url: &str) -> RepoResult<Self> {
        let pool = PgPool::connect(database_url).await?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| super::RepoError::Database(e.to_string()))?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn cart_lines(&self, customer_id: i64) -> RepoResult<Vec<CartLine>> {
        let rows: Vec<CartLine> = sqlx::query_as(
            "SELECT food_id, quantity FROM cart_lines WHERE customer_id = $1 ORDER BY added_at, food_id",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl Store for PgStore {
    // ── Customers ──

    async fn find_customer(&self, id: i64) -> RepoResult<Option<Customer>> {
        let row = sqlx::query_as("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_customer_by_email(&self, email: &str) -> RepoResult<Option<Customer>> {
        let row = sqlx::query_as("SELECT * FROM customers WHERE email = lower(trim($1))")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn save_otp(&self, customer_id: i64, otp: &str, expires_at: i64) -> RepoResult<()> {
        sqlx::query("UPDATE customers SET otp = $1, otp_expires_at = $2 WHERE id = $3")
            .bind(otp)
            .bind(expires_at)
            .bind(customer_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn mark_customer_verified(&self, customer_id: i64) -> RepoResult<()> {
        sqlx::query(
            "UPDATE customers SET verified = TRUE, otp = NULL, otp_expires_at = NULL WHERE id = $1",
        )
        .bind(customer_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // ── Cart ──

    async fn cart(&self, customer_id: i64) -> RepoResult<Vec<CartLine>> {
        self.cart_lines(customer_id).await
    }

    async fn upsert_cart_line(
        &self,
        customer_id: i64,
        line: CartLine,
    ) -> RepoResult<Vec<CartLine>> {
        if line.quantity <= 0 {
            sqlx::query("DELETE FROM cart_lines WHERE customer_id = $1 AND food_id = $2")
                .bind(customer_id)
                .bind(line.food_id)
                .execute(&self.pool)
                .await?;
        } else {
            sqlx::query(
                r#"
                INSERT INTO cart_lines (customer_id, food_id, quantity, added_at)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (customer_id, food_id)
                DO UPDATE SET quantity = EXCLUDED.quantity
                "#,
            )
            .bind(customer_id)
            .bind(line.food_id)
            .bind(line.quantity)
            .bind(shared::util::now_millis())
            .execute(&self.pool)
            .await?;
        }
        self.cart_lines(customer_id).await
    }

    async fn clear_cart(&self, customer_id: i64) -> RepoResult<()> {
        sqlx::query("DELETE FROM cart_lines WHERE customer_id = $1")
            .bind(customer_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ── Catalog ──

    async fn find_foods(&self, ids: &[i64]) -> RepoResult<Vec<Food>> {
        let rows = sqlx::query_as("SELECT * FROM foods WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_vendor(&self, id: i64) -> RepoResult<Option<Vendor>> {
        let row = sqlx::query_as("SELECT * FROM vendors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_vendor_by_email(&self, email: &str) -> RepoResult<Option<Vendor>> {
        let row = sqlx::query_as("SELECT * FROM vendors WHERE email = lower(trim($1))")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn toggle_vendor_service(&self, id: i64) -> RepoResult<Option<Vendor>> {
        let row = sqlx::query_as(
            "UPDATE vendors SET service_available = NOT service_available WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    // ── Shippers ──

    async fn find_shipper(&self, id: i64) -> RepoResult<Option<Shipper>> {
        let row = sqlx::query_as("SELECT * FROM shippers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_shipper_by_email(&self, email: &str) -> RepoResult<Option<Shipper>> {
        let row = sqlx::query_as("SELECT * FROM shippers WHERE email = lower(trim($1))")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_shipper_status(
        &self,
        id: i64,
        is_available: bool,
        location: Option<GeoPoint>,
    ) -> RepoResult<Option<Shipper>> {
        let row = sqlx::query_as(
            r#"
            UPDATE shippers SET
                is_available = $2,
                lat = COALESCE($3, lat),
                lng = COALESCE($4, lng)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(is_available)
        .bind(location.map(|p| p.lat))
        .bind(location.map(|p| p.lng))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn set_shipper_verified(&self, id: i64, verified: bool) -> RepoResult<Option<Shipper>> {
        let row = sqlx::query_as("UPDATE shippers SET verified = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(verified)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_shippers(&self) -> RepoResult<Vec<Shipper>> {
        let rows = sqlx::query_as("SELECT * FROM shippers ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    // ── Promos ──

    async fn find_promo(&self, id: i64) -> RepoResult<Option<Promo>> {
        let row = sqlx::query_as("SELECT * FROM promos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_promo(&self, promo: &Promo) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO promos (
                id, code, title, description, scope, requirement, minimum_order_value,
                discount_amount, starts_at, ends_at, zone, active, vendor_ids
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(promo.id)
        .bind(&promo.code)
        .bind(&promo.title)
        .bind(&promo.description)
        .bind(promo.scope)
        .bind(promo.requirement)
        .bind(promo.minimum_order_value)
        .bind(promo.discount_amount)
        .bind(promo.starts_at)
        .bind(promo.ends_at)
        .bind(&promo.zone)
        .bind(promo.active)
        .bind(&promo.vendor_ids)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn replace_promo(&self, promo: &Promo) -> RepoResult<Option<Promo>> {
        let row = sqlx::query_as(
            r#"
            UPDATE promos SET
                code = $2, title = $3, description = $4, scope = $5, requirement = $6,
                minimum_order_value = $7, discount_amount = $8, starts_at = $9,
                ends_at = $10, zone = $11, active = $12, vendor_ids = $13
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(promo.id)
        .bind(&promo.code)
        .bind(&promo.title)
        .bind(&promo.description)
        .bind(promo.scope)
        .bind(promo.requirement)
        .bind(promo.minimum_order_value)
        .bind(promo.discount_amount)
        .bind(promo.starts_at)
        .bind(promo.ends_at)
        .bind(&promo.zone)
        .bind(promo.active)
        .bind(&promo.vendor_ids)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn promos_for_vendor(&self, vendor_id: i64) -> RepoResult<Vec<Promo>> {
        let rows = sqlx::query_as(
            "SELECT * FROM promos WHERE scope = 'GENERIC' OR $1 = ANY(vendor_ids) ORDER BY id",
        )
        .bind(vendor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // ── Transactions ──

    async fn insert_transaction(&self, txn: &Transaction) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, customer_id, status, requested_amount, discount_amount, order_amount,
                promo_id, payment_mode, payment_note, order_id, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(txn.id)
        .bind(txn.customer_id)
        .bind(txn.status)
        .bind(txn.requested_amount)
        .bind(txn.discount_amount)
        .bind(txn.order_amount)
        .bind(txn.promo_id)
        .bind(txn.payment_mode)
        .bind(&txn.payment_note)
        .bind(txn.order_id)
        .bind(txn.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_transaction(&self, id: i64) -> RepoResult<Option<Transaction>> {
        let row = sqlx::query_as("SELECT * FROM transactions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_transactions(&self) -> RepoResult<Vec<Transaction>> {
        let rows = sqlx::query_as("SELECT * FROM transactions ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    // ── Orders ──

    async fn find_order(&self, id: i64) -> RepoResult<Option<Order>> {
        let row = sqlx::query_as("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn orders_for_customer(&self, customer_id: i64) -> RepoResult<Vec<Order>> {
        let rows = sqlx::query_as(
            r#"
            SELECT o.* FROM customer_orders co
            JOIN orders o ON o.id = co.order_id
            WHERE co.customer_id = $1
            ORDER BY co.position
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_customer_order(
        &self,
        customer_id: i64,
        order_id: i64,
    ) -> RepoResult<Option<Order>> {
        let row = sqlx::query_as(
            r#"
            SELECT o.* FROM customer_orders co
            JOIN orders o ON o.id = co.order_id
            WHERE co.customer_id = $1 AND co.order_id = $2
            "#,
        )
        .bind(customer_id)
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn orders_for_vendor(&self, vendor_id: i64) -> RepoResult<Vec<Order>> {
        let rows = sqlx::query_as("SELECT * FROM orders WHERE vendor_id = $1 ORDER BY created_at, id")
            .bind(vendor_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn transition_order(
        &self,
        id: i64,
        change: &OrderTransition,
    ) -> RepoResult<Option<Order>> {
        let row = sqlx::query_as(
            r#"
            UPDATE orders SET
                status = $3,
                notes = COALESCE($4, notes),
                ready_time_minutes = COALESCE($5, ready_time_minutes),
                updated_at = $6
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(change.from)
        .bind(change.to)
        .bind(&change.notes)
        .bind(change.ready_time_minutes)
        .bind(change.updated_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn begin(&self) -> RepoResult<Box<dyn StoreTx>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTx { tx }))
    }
}

/// `sqlx::Transaction` wrapper; dropped without commit means rollback
struct PgTx {
    tx: sqlx::Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTx for PgTx {
    async fn find_transaction(&mut self, id: i64) -> RepoResult<Option<Transaction>> {
        let row = sqlx::query_as("SELECT * FROM transactions WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row)
    }

    async fn mark_transaction_spent(
        &mut self,
        id: i64,
        customer_id: i64,
    ) -> RepoResult<Option<Transaction>> {
        let row = sqlx::query_as(
            r#"
            UPDATE transactions SET status = 'SUCCESS'
            WHERE id = $1 AND customer_id = $2 AND status = 'OPEN'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(customer_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn available_shippers(&mut self, zone: &str) -> RepoResult<Vec<Shipper>> {
        let rows = sqlx::query_as(
            "SELECT * FROM shippers WHERE verified AND is_available AND zone = $1 ORDER BY id",
        )
        .bind(zone)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows)
    }

    async fn insert_order(&mut self, order: &Order) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_code, customer_id, vendor_id, transaction_id, items,
                total_amount, final_amount, status, delivery_id, ready_time_minutes,
                notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(order.id)
        .bind(&order.order_code)
        .bind(order.customer_id)
        .bind(order.vendor_id)
        .bind(order.transaction_id)
        .bind(Json(&order.items))
        .bind(order.total_amount)
        .bind(order.final_amount)
        .bind(order.status)
        .bind(order.delivery_id)
        .bind(order.ready_time_minutes)
        .bind(&order.notes)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn attach_order(&mut self, transaction_id: i64, order_id: i64) -> RepoResult<()> {
        sqlx::query("UPDATE transactions SET order_id = $2 WHERE id = $1")
            .bind(transaction_id)
            .bind(order_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn clear_cart(&mut self, customer_id: i64) -> RepoResult<()> {
        sqlx::query("DELETE FROM cart_lines WHERE customer_id = $1")
            .bind(customer_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn append_customer_order(&mut self, customer_id: i64, order_id: i64) -> RepoResult<()> {
        sqlx::query("INSERT INTO customer_orders (customer_id, order_id) VALUES ($1, $2)")
            .bind(customer_id)
            .bind(order_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
