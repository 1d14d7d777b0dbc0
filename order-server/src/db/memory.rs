//! In-memory store for development and tests
//!
//! All data sits behind one tokio `Mutex`. A unit of work holds the lock for
//! its whole life and writes to a staged copy, which replaces the live data
//! on commit.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use shared::models::{
    CartLine, Customer, Food, GeoPoint, Order, Promo, PromoScope, Shipper, Transaction,
    TransactionStatus, Vendor,
};
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{OrderTransition, RepoError, RepoResult, Store, StoreTx};
use crate::auth::credential;

#[derive(Debug, Clone, Default)]
struct MemoryData {
    customers: HashMap<i64, Customer>,
    /// Lines kept in insertion order
    carts: HashMap<i64, Vec<CartLine>>,
    /// Order ids per customer, oldest first
    customer_orders: HashMap<i64, Vec<i64>>,
    vendors: HashMap<i64, Vendor>,
    foods: HashMap<i64, Food>,
    shippers: HashMap<i64, Shipper>,
    promos: HashMap<i64, Promo>,
    transactions: HashMap<i64, Transaction>,
    orders: HashMap<i64, Order>,
}

impl MemoryData {
    fn upsert_cart_line(&mut self, customer_id: i64, line: CartLine) -> Vec<CartLine> {
        let cart = self.carts.entry(customer_id).or_default();
        match cart.iter().position(|l| l.food_id == line.food_id) {
            Some(idx) if line.quantity <= 0 => {
                cart.remove(idx);
            }
            Some(idx) => cart[idx].quantity = line.quantity,
            None if line.quantity > 0 => cart.push(line),
            None => {}
        }
        cart.clone()
    }

    fn mark_transaction_spent(&mut self, id: i64, customer_id: i64) -> Option<Transaction> {
        let txn = self.transactions.get_mut(&id)?;
        if txn.customer_id != customer_id || txn.status != TransactionStatus::Open {
            return None;
        }
        txn.status = TransactionStatus::Success;
        Some(txn.clone())
    }

    fn sorted_orders<'a>(orders: impl Iterator<Item = &'a Order>) -> Vec<Order> {
        let mut list: Vec<Order> = orders.cloned().collect();
        list.sort_by_key(|o| (o.created_at, o.id));
        list
    }
}

/// Seed document for [`MemoryStore::load_seed`]
///
/// Accounts may carry a plain `password`, which is hashed with a fresh salt
/// on load.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Seed {
    pub customers: Vec<SeedAccount<Customer>>,
    pub vendors: Vec<SeedAccount<Vendor>>,
    pub shippers: Vec<SeedAccount<Shipper>>,
    pub foods: Vec<Food>,
    pub promos: Vec<Promo>,
}

#[derive(Debug, Deserialize)]
pub struct SeedAccount<T> {
    #[serde(flatten)]
    pub account: T,
    pub password: Option<String>,
}

fn salted(password: Option<&str>) -> RepoResult<Option<(String, String)>> {
    let Some(password) = password else {
        return Ok(None);
    };
    let salt = credential::generate_salt();
    let hash = credential::hash(password, &salt).map_err(|e| RepoError::Seed(e.to_string()))?;
    Ok(Some((salt, hash)))
}

/// Stored form of an account email
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Store backed by process memory
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<MemoryData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON seed file into a fresh store
    pub async fn from_seed_file(path: &Path) -> RepoResult<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RepoError::Seed(format!("{}: {e}", path.display())))?;
        let seed: Seed = serde_json::from_str(&raw).map_err(|e| RepoError::Seed(e.to_string()))?;
        let store = Self::new();
        store.load_seed(seed).await?;
        Ok(store)
    }

    pub async fn load_seed(&self, seed: Seed) -> RepoResult<()> {
        let customers = seed.customers.len();
        let vendors = seed.vendors.len();
        let shippers = seed.shippers.len();
        for entry in seed.customers {
            let mut customer = entry.account;
            if let Some((salt, hash)) = salted(entry.password.as_deref())? {
                customer.salt = salt;
                customer.password_hash = hash;
            }
            self.insert_customer(customer).await;
        }
        for entry in seed.vendors {
            let mut vendor = entry.account;
            if let Some((salt, hash)) = salted(entry.password.as_deref())? {
                vendor.salt = salt;
                vendor.password_hash = hash;
            }
            self.insert_vendor(vendor).await;
        }
        for entry in seed.shippers {
            let mut shipper = entry.account;
            if let Some((salt, hash)) = salted(entry.password.as_deref())? {
                shipper.salt = salt;
                shipper.password_hash = hash;
            }
            self.insert_shipper(shipper).await;
        }
        for food in seed.foods {
            self.insert_food(food).await;
        }
        for promo in seed.promos {
            self.insert_promo(promo).await;
        }
        tracing::info!(customers, vendors, shippers, "Seed data loaded");
        Ok(())
    }

    pub async fn insert_customer(&self, mut customer: Customer) {
        customer.email = normalize_email(&customer.email);
        self.data.lock().await.customers.insert(customer.id, customer);
    }

    pub async fn insert_vendor(&self, mut vendor: Vendor) {
        vendor.email = normalize_email(&vendor.email);
        self.data.lock().await.vendors.insert(vendor.id, vendor);
    }

    pub async fn insert_food(&self, food: Food) {
        self.data.lock().await.foods.insert(food.id, food);
    }

    pub async fn insert_shipper(&self, mut shipper: Shipper) {
        shipper.email = normalize_email(&shipper.email);
        self.data.lock().await.shippers.insert(shipper.id, shipper);
    }

    pub async fn insert_promo(&self, promo: Promo) {
        self.data.lock().await.promos.insert(promo.id, promo);
    }

    pub async fn remove_food(&self, id: i64) {
        self.data.lock().await.foods.remove(&id);
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_customer(&self, id: i64) -> RepoResult<Option<Customer>> {
        Ok(self.data.lock().await.customers.get(&id).cloned())
    }

    async fn find_customer_by_email(&self, email: &str) -> RepoResult<Option<Customer>> {
        let email = normalize_email(email);
        let data = self.data.lock().await;
        Ok(data.customers.values().find(|c| c.email == email).cloned())
    }

    async fn save_otp(&self, customer_id: i64, otp: &str, expires_at: i64) -> RepoResult<()> {
        let mut data = self.data.lock().await;
        let customer = data
            .customers
            .get_mut(&customer_id)
            .ok_or_else(|| RepoError::NotFound(format!("customer {customer_id}")))?;
        customer.otp = Some(otp.to_string());
        customer.otp_expires_at = Some(expires_at);
        Ok(())
    }

    async fn mark_customer_verified(&self, customer_id: i64) -> RepoResult<()> {
        let mut data = self.data.lock().await;
        let customer = data
            .customers
            .get_mut(&customer_id)
            .ok_or_else(|| RepoError::NotFound(format!("customer {customer_id}")))?;
        customer.verified = true;
        customer.otp = None;
        customer.otp_expires_at = None;
        Ok(())
    }

    async fn cart(&self, customer_id: i64) -> RepoResult<Vec<CartLine>> {
        let data = self.data.lock().await;
        Ok(data.carts.get(&customer_id).cloned().unwrap_or_default())
    }

    async fn upsert_cart_line(
        &self,
        customer_id: i64,
        line: CartLine,
    ) -> RepoResult<Vec<CartLine>> {
        Ok(self.data.lock().await.upsert_cart_line(customer_id, line))
    }

    async fn clear_cart(&self, customer_id: i64) -> RepoResult<()> {
        self.data.lock().await.carts.remove(&customer_id);
        Ok(())
    }

    async fn find_foods(&self, ids: &[i64]) -> RepoResult<Vec<Food>> {
        let data = self.data.lock().await;
        Ok(ids.iter().filter_map(|id| data.foods.get(id).cloned()).collect())
    }

    async fn find_vendor(&self, id: i64) -> RepoResult<Option<Vendor>> {
        Ok(self.data.lock().await.vendors.get(&id).cloned())
    }

    async fn find_vendor_by_email(&self, email: &str) -> RepoResult<Option<Vendor>> {
        let email = normalize_email(email);
        let data = self.data.lock().await;
        Ok(data.vendors.values().find(|v| v.email == email).cloned())
    }

    async fn toggle_vendor_service(&self, id: i64) -> RepoResult<Option<Vendor>> {
        let mut data = self.data.lock().await;
        Ok(data.vendors.get_mut(&id).map(|vendor| {
            vendor.service_available = !vendor.service_available;
            vendor.clone()
        }))
    }

    async fn find_shipper(&self, id: i64) -> RepoResult<Option<Shipper>> {
        Ok(self.data.lock().await.shippers.get(&id).cloned())
    }

    async fn find_shipper_by_email(&self, email: &str) -> RepoResult<Option<Shipper>> {
        let email = normalize_email(email);
        let data = self.data.lock().await;
        Ok(data.shippers.values().find(|s| s.email == email).cloned())
    }

    async fn update_shipper_status(
        &self,
        id: i64,
        is_available: bool,
        location: Option<GeoPoint>,
    ) -> RepoResult<Option<Shipper>> {
        let mut data = self.data.lock().await;
        let Some(shipper) = data.shippers.get_mut(&id) else {
            return Ok(None);
        };
        shipper.is_available = is_available;
        if let Some(point) = location {
            shipper.lat = point.lat;
            shipper.lng = point.lng;
        }
        Ok(Some(shipper.clone()))
    }

    async fn set_shipper_verified(&self, id: i64, verified: bool) -> RepoResult<Option<Shipper>> {
        let mut data = self.data.lock().await;
        Ok(data.shippers.get_mut(&id).map(|shipper| {
            shipper.verified = verified;
            shipper.clone()
        }))
    }

    async fn list_shippers(&self) -> RepoResult<Vec<Shipper>> {
        let data = self.data.lock().await;
        let mut list: Vec<Shipper> = data.shippers.values().cloned().collect();
        list.sort_by_key(|s| s.id);
        Ok(list)
    }

    async fn find_promo(&self, id: i64) -> RepoResult<Option<Promo>> {
        Ok(self.data.lock().await.promos.get(&id).cloned())
    }

    async fn create_promo(&self, promo: &Promo) -> RepoResult<()> {
        let mut data = self.data.lock().await;
        if data.promos.contains_key(&promo.id) {
            return Err(RepoError::Duplicate(format!("promo {}", promo.id)));
        }
        data.promos.insert(promo.id, promo.clone());
        Ok(())
    }

    async fn replace_promo(&self, promo: &Promo) -> RepoResult<Option<Promo>> {
        let mut data = self.data.lock().await;
        Ok(data.promos.get_mut(&promo.id).map(|stored| {
            *stored = promo.clone();
            stored.clone()
        }))
    }

    async fn promos_for_vendor(&self, vendor_id: i64) -> RepoResult<Vec<Promo>> {
        let data = self.data.lock().await;
        let mut list: Vec<Promo> = data
            .promos
            .values()
            .filter(|p| p.scope == PromoScope::Generic || p.vendor_ids.contains(&vendor_id))
            .cloned()
            .collect();
        list.sort_by_key(|p| p.id);
        Ok(list)
    }

    async fn insert_transaction(&self, txn: &Transaction) -> RepoResult<()> {
        let mut data = self.data.lock().await;
        if data.transactions.contains_key(&txn.id) {
            return Err(RepoError::Duplicate(format!("transaction {}", txn.id)));
        }
        data.transactions.insert(txn.id, txn.clone());
        Ok(())
    }

    async fn find_transaction(&self, id: i64) -> RepoResult<Option<Transaction>> {
        Ok(self.data.lock().await.transactions.get(&id).cloned())
    }

    async fn list_transactions(&self) -> RepoResult<Vec<Transaction>> {
        let data = self.data.lock().await;
        let mut list: Vec<Transaction> = data.transactions.values().cloned().collect();
        list.sort_by_key(|t| (t.created_at, t.id));
        Ok(list)
    }

    async fn find_order(&self, id: i64) -> RepoResult<Option<Order>> {
        Ok(self.data.lock().await.orders.get(&id).cloned())
    }

    async fn orders_for_customer(&self, customer_id: i64) -> RepoResult<Vec<Order>> {
        let data = self.data.lock().await;
        let ids = data.customer_orders.get(&customer_id);
        Ok(ids
            .into_iter()
            .flatten()
            .filter_map(|id| data.orders.get(id).cloned())
            .collect())
    }

    async fn find_customer_order(
        &self,
        customer_id: i64,
        order_id: i64,
    ) -> RepoResult<Option<Order>> {
        let data = self.data.lock().await;
        let owned = data
            .customer_orders
            .get(&customer_id)
            .is_some_and(|ids| ids.contains(&order_id));
        Ok(owned.then(|| data.orders.get(&order_id).cloned()).flatten())
    }

    async fn orders_for_vendor(&self, vendor_id: i64) -> RepoResult<Vec<Order>> {
        let data = self.data.lock().await;
        Ok(MemoryData::sorted_orders(
            data.orders.values().filter(|o| o.vendor_id == vendor_id),
        ))
    }

    async fn transition_order(
        &self,
        id: i64,
        change: &OrderTransition,
    ) -> RepoResult<Option<Order>> {
        let mut data = self.data.lock().await;
        let Some(order) = data.orders.get_mut(&id) else {
            return Ok(None);
        };
        if order.status != change.from {
            return Ok(None);
        }
        order.status = change.to;
        if let Some(notes) = &change.notes {
            order.notes = Some(notes.clone());
        }
        if let Some(minutes) = change.ready_time_minutes {
            order.ready_time_minutes = Some(minutes);
        }
        order.updated_at = change.updated_at;
        Ok(Some(order.clone()))
    }

    async fn begin(&self) -> RepoResult<Box<dyn StoreTx>> {
        let guard = self.data.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryTx { guard, staged }))
    }
}

/// Unit of work over a staged copy; dropped without commit means rollback
struct MemoryTx {
    guard: OwnedMutexGuard<MemoryData>,
    staged: MemoryData,
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn find_transaction(&mut self, id: i64) -> RepoResult<Option<Transaction>> {
        Ok(self.staged.transactions.get(&id).cloned())
    }

    async fn mark_transaction_spent(
        &mut self,
        id: i64,
        customer_id: i64,
    ) -> RepoResult<Option<Transaction>> {
        Ok(self.staged.mark_transaction_spent(id, customer_id))
    }

    async fn available_shippers(&mut self, zone: &str) -> RepoResult<Vec<Shipper>> {
        let mut list: Vec<Shipper> = self
            .staged
            .shippers
            .values()
            .filter(|s| s.can_deliver_in(zone))
            .cloned()
            .collect();
        list.sort_by_key(|s| s.id);
        Ok(list)
    }

    async fn insert_order(&mut self, order: &Order) -> RepoResult<()> {
        if self.staged.orders.contains_key(&order.id) {
            return Err(RepoError::Duplicate(format!("order {}", order.id)));
        }
        self.staged.orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn attach_order(&mut self, transaction_id: i64, order_id: i64) -> RepoResult<()> {
        let txn = self
            .staged
            .transactions
            .get_mut(&transaction_id)
            .ok_or_else(|| RepoError::NotFound(format!("transaction {transaction_id}")))?;
        txn.order_id = Some(order_id);
        Ok(())
    }

    async fn clear_cart(&mut self, customer_id: i64) -> RepoResult<()> {
        self.staged.carts.remove(&customer_id);
        Ok(())
    }

    async fn append_customer_order(&mut self, customer_id: i64, order_id: i64) -> RepoResult<()> {
        self.staged
            .customer_orders
            .entry(customer_id)
            .or_default()
            .push(order_id);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        let MemoryTx { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::PaymentMode;

    fn open_txn(id: i64, customer_id: i64) -> Transaction {
        Transaction {
            id,
            customer_id,
            status: TransactionStatus::Open,
            requested_amount: Decimal::from(10),
            discount_amount: Decimal::ZERO,
            order_amount: Decimal::from(10),
            promo_id: None,
            payment_mode: PaymentMode::Cod,
            payment_note: String::new(),
            order_id: None,
            created_at: 1,
        }
    }

    #[tokio::test]
    async fn test_cart_upsert_replaces_and_removes() {
        let store = MemoryStore::new();
        let line = |food_id, quantity| CartLine { food_id, quantity };

        store.upsert_cart_line(1, line(10, 2)).await.unwrap();
        store.upsert_cart_line(1, line(11, 1)).await.unwrap();
        let cart = store.upsert_cart_line(1, line(10, 5)).await.unwrap();
        assert_eq!(cart, vec![line(10, 5), line(11, 1)]);

        let cart = store.upsert_cart_line(1, line(10, 0)).await.unwrap();
        assert_eq!(cart, vec![line(11, 1)]);

        let cart = store.upsert_cart_line(1, line(11, -3)).await.unwrap();
        assert!(cart.is_empty());

        // Non-positive quantity for an absent line is a no-op
        let cart = store.upsert_cart_line(1, line(12, 0)).await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_uncommitted_unit_of_work_is_discarded() {
        let store = MemoryStore::new();
        store.insert_transaction(&open_txn(7, 1)).await.unwrap();
        store
            .upsert_cart_line(1, CartLine { food_id: 3, quantity: 1 })
            .await
            .unwrap();

        {
            let mut tx = store.begin().await.unwrap();
            assert!(tx.mark_transaction_spent(7, 1).await.unwrap().is_some());
            tx.clear_cart(1).await.unwrap();
        }

        let txn = store.find_transaction(7).await.unwrap().unwrap();
        assert_eq!(txn.status, TransactionStatus::Open);
        assert_eq!(store.cart(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_commit_publishes_staged_writes() {
        let store = MemoryStore::new();
        store.insert_transaction(&open_txn(7, 1)).await.unwrap();

        let mut tx = store.begin().await.unwrap();
        tx.mark_transaction_spent(7, 1).await.unwrap();
        tx.attach_order(7, 99).await.unwrap();
        tx.commit().await.unwrap();

        let txn = store.find_transaction(7).await.unwrap().unwrap();
        assert_eq!(txn.status, TransactionStatus::Success);
        assert_eq!(txn.order_id, Some(99));
    }

    #[tokio::test]
    async fn test_spend_is_compare_and_set() {
        let store = MemoryStore::new();
        store.insert_transaction(&open_txn(7, 1)).await.unwrap();

        let mut tx = store.begin().await.unwrap();
        // Wrong owner never flips the status
        assert!(tx.mark_transaction_spent(7, 2).await.unwrap().is_none());
        assert!(tx.mark_transaction_spent(7, 1).await.unwrap().is_some());
        assert!(tx.mark_transaction_spent(7, 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_seed_hashes_plain_passwords() {
        let raw = r#"{
            "vendors": [{
                "id": 1, "name": "Pho 24", "owner_name": "Linh", "email": " Pho@Example.com",
                "phone": "555", "address": "2 Side St", "zone": "70000",
                "lat": 10.0, "lng": 106.0, "service_available": true, "rating": 4.5,
                "password": "pho-secret"
            }],
            "foods": [{
                "id": 10, "vendor_id": 1, "name": "Pho bo", "description": "", "category": "soup",
                "food_type": "non-veg", "ready_time_minutes": 10, "price": 5.5, "rating": 4.0
            }]
        }"#;
        let seed: Seed = serde_json::from_str(raw).unwrap();
        let store = MemoryStore::new();
        store.load_seed(seed).await.unwrap();

        let vendor = store.find_vendor(1).await.unwrap().unwrap();
        assert!(credential::verify("pho-secret", &vendor.salt, &vendor.password_hash));
        assert_eq!(store.find_foods(&[10, 11]).await.unwrap().len(), 1);

        // Emails are stored lowercased and found whatever the case
        assert_eq!(vendor.email, "pho@example.com");
        for typed in ["pho@example.com", "PHO@EXAMPLE.COM", "Pho@Example.com "] {
            let found = store.find_vendor_by_email(typed).await.unwrap();
            assert_eq!(found.map(|v| v.id), Some(1));
        }
    }

    #[tokio::test]
    async fn test_seed_file_load_and_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        tokio::fs::write(&path, r#"{"promos": []}"#).await.unwrap();
        let store = MemoryStore::from_seed_file(&path).await.unwrap();
        assert!(store.list_shippers().await.unwrap().is_empty());

        let missing = dir.path().join("absent.json");
        assert!(matches!(
            MemoryStore::from_seed_file(&missing).await,
            Err(RepoError::Seed(_))
        ));

        tokio::fs::write(&path, "not json").await.unwrap();
        assert!(matches!(
            MemoryStore::from_seed_file(&path).await,
            Err(RepoError::Seed(_))
        ));
    }
}
