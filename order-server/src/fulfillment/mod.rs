//! Order fulfillment services
//!
//! Cart → transaction (promo applied) → order (priced, shipper matched,
//! transaction consumed, all in one unit of work) → vendor lifecycle.

pub mod assembler;
pub mod cart;
pub mod ledger;
pub mod lifecycle;
pub mod matching;
pub mod otp;
pub mod promo;
pub mod shippers;
pub mod vendors;

#[cfg(test)]
pub(crate) mod fixtures;
