//! AntiForgery port - short-lived tokens tying a form post to this site.

use std::fmt;

/// What a token may be used for. Tokens are not interchangeable between scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NonceScope {
    Register,
    Payment,
}

impl NonceScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            NonceScope::Register => "tocc_register_nonce",
            NonceScope::Payment => "tocc_payment_nonce",
        }
    }
}

impl fmt::Display for NonceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait AntiForgery: Send + Sync {
    fn issue(&self, scope: NonceScope) -> String;

    /// False for forged, expired or wrong-scope tokens.
    fn verify(&self, token: &str, scope: NonceScope) -> bool;
}
