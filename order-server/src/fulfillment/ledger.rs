//! Transaction ledger
//!
//! A transaction records a payment intent. It is created OPEN and consumed
//! by exactly one order, after which only its `order_id` may change.

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{COD_PAYMENT_NOTE, PaymentMode, Transaction, TransactionStatus};

use super::promo;
use crate::db::{Store, StoreTx};
use crate::error::ServiceResult;
use crate::util::snowflake_id;

/// Payment intent submitted by a customer
#[derive(Debug, Clone)]
pub struct OpenTransaction {
    pub total_amount: Decimal,
    pub payment_mode: PaymentMode,
    pub promo_id: Option<i64>,
}

/// Record an OPEN transaction, applying the promo when one is given
pub async fn open(
    store: &dyn Store,
    customer_id: i64,
    input: OpenTransaction,
    now: i64,
) -> ServiceResult<Transaction> {
    if input.total_amount.is_sign_negative() {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            "total_amount must be non-negative",
        )
        .with_detail("total_amount", input.total_amount.to_string())
        .into());
    }

    let order_amount = match input.promo_id {
        Some(promo_id) => promo::evaluate(store, promo_id, input.total_amount).await?,
        None => input.total_amount,
    };

    let payment_note = match input.payment_mode {
        PaymentMode::Cod => COD_PAYMENT_NOTE.to_string(),
        _ => String::new(),
    };

    let txn = Transaction {
        id: snowflake_id(),
        customer_id,
        status: TransactionStatus::Open,
        requested_amount: input.total_amount,
        discount_amount: input.total_amount - order_amount,
        order_amount,
        promo_id: input.promo_id,
        payment_mode: input.payment_mode,
        payment_note,
        order_id: None,
        created_at: now,
    };
    store.insert_transaction(&txn).await?;

    tracing::info!(
        transaction_id = txn.id,
        customer_id,
        order_amount = %txn.order_amount,
        promo_id = ?txn.promo_id,
        "Transaction opened"
    );
    Ok(txn)
}

/// Flip the customer's transaction `OPEN -> SUCCESS` inside `tx`.
///
/// Someone else's transaction is reported as not found.
pub async fn consume(
    tx: &mut dyn StoreTx,
    transaction_id: i64,
    customer_id: i64,
) -> ServiceResult<Transaction> {
    let current = tx
        .find_transaction(transaction_id)
        .await?
        .filter(|t| t.customer_id == customer_id)
        .ok_or_else(|| AppError::new(ErrorCode::TransactionNotFound))?;

    if current.status != TransactionStatus::Open {
        return Err(not_open(transaction_id).into());
    }

    // Conditional update; losing a race surfaces as not open
    tx.mark_transaction_spent(transaction_id, customer_id)
        .await?
        .ok_or_else(|| not_open(transaction_id).into())
}

fn not_open(transaction_id: i64) -> AppError {
    AppError::new(ErrorCode::TransactionNotOpen).with_detail("transaction_id", transaction_id)
}

/// Back-reference from a consumed transaction to its order
pub async fn attach_order(
    tx: &mut dyn StoreTx,
    transaction_id: i64,
    order_id: i64,
) -> ServiceResult<()> {
    tx.attach_order(transaction_id, order_id).await?;
    Ok(())
}

pub async fn find(store: &dyn Store, transaction_id: i64) -> ServiceResult<Transaction> {
    store
        .find_transaction(transaction_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TransactionNotFound).into())
}

pub async fn list(store: &dyn Store) -> ServiceResult<Vec<Transaction>> {
    Ok(store.list_transactions().await?)
}
