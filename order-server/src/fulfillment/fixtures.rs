//! Builders for service tests

use rust_decimal::Decimal;
use shared::models::{
    Customer, Food, PaymentMode, Promo, PromoRequirement, PromoScope, Shipper, Transaction,
    TransactionStatus, Vendor,
};

use crate::db::MemoryStore;

pub const CUSTOMER_ID: i64 = 100;
pub const VENDOR_ID: i64 = 200;
pub const ZONE: &str = "700000";

pub fn customer(id: i64) -> Customer {
    Customer {
        id,
        email: format!("customer{id}@example.com"),
        phone: format!("+1555{id}"),
        password_hash: String::new(),
        salt: String::new(),
        first_name: "Test".into(),
        last_name: "Customer".into(),
        address: "1 Main St".into(),
        verified: true,
        otp: None,
        otp_expires_at: None,
        lat: 0.0,
        lng: 0.0,
    }
}

pub fn vendor(id: i64, lat: f64, lng: f64) -> Vendor {
    Vendor {
        id,
        name: format!("Vendor {id}"),
        owner_name: "Owner".into(),
        email: format!("vendor{id}@example.com"),
        password_hash: String::new(),
        salt: String::new(),
        phone: String::new(),
        address: String::new(),
        zone: ZONE.into(),
        lat,
        lng,
        service_available: true,
        rating: 4.0,
    }
}

pub fn food(id: i64, vendor_id: i64, price: Decimal) -> Food {
    Food {
        id,
        vendor_id,
        name: format!("Food {id}"),
        description: String::new(),
        category: "main".into(),
        food_type: "veg".into(),
        ready_time_minutes: 15,
        price,
        rating: 4.0,
    }
}

pub fn shipper(id: i64, lat: f64, lng: f64) -> Shipper {
    Shipper {
        id,
        email: format!("shipper{id}@example.com"),
        password_hash: String::new(),
        salt: String::new(),
        phone: String::new(),
        first_name: "Ship".into(),
        last_name: "Per".into(),
        address: String::new(),
        zone: ZONE.into(),
        verified: true,
        is_available: true,
        lat,
        lng,
    }
}

pub fn promo(id: i64, discount: Decimal, active: bool) -> Promo {
    Promo {
        id,
        code: format!("PROMO{id}"),
        title: "Promo".into(),
        description: String::new(),
        scope: PromoScope::Generic,
        requirement: PromoRequirement::None,
        minimum_order_value: Decimal::ZERO,
        discount_amount: discount,
        starts_at: None,
        ends_at: None,
        zone: ZONE.into(),
        active,
        vendor_ids: Vec::new(),
    }
}

pub fn open_transaction(id: i64, customer_id: i64, discount: Decimal) -> Transaction {
    Transaction {
        id,
        customer_id,
        status: TransactionStatus::Open,
        requested_amount: Decimal::from(100),
        discount_amount: discount,
        order_amount: Decimal::from(100) - discount,
        promo_id: None,
        payment_mode: PaymentMode::Card,
        payment_note: String::new(),
        order_id: None,
        created_at: 1,
    }
}

/// Customer 100, vendor 200 at (0, 0) with foods 1 (10.00) and 2 (5.50),
/// one verified available shipper 300 at (1, 1)
pub async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.insert_customer(customer(CUSTOMER_ID)).await;
    store.insert_vendor(vendor(VENDOR_ID, 0.0, 0.0)).await;
    store.insert_food(food(1, VENDOR_ID, Decimal::new(1000, 2))).await;
    store.insert_food(food(2, VENDOR_ID, Decimal::new(550, 2))).await;
    store.insert_shipper(shipper(300, 1.0, 1.0)).await;
    store
}
