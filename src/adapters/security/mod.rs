//! Security adapters - form tokens and password hashing.

mod anti_forgery;
mod password_hash;

pub use anti_forgery::HmacAntiForgery;
pub use password_hash::{
    hash_password, hash_password_blocking, verify_password, PasswordHashError,
};
