//! Identity, credentials and login

pub mod credential;
pub mod identity;
pub mod login;

pub use identity::{Principal, Role, admin_auth, create_token, customer_auth, shipper_auth, vendor_auth};
