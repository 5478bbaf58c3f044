//! HMAC-backed anti-forgery tokens.
//!
//! A token is `hex(HMAC-SHA256(secret, "{scope}|{tick}"))` where the tick
//! advances every half lifetime. Tokens from the current and the previous
//! tick verify, so a token lives between one half and one full lifetime.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::domain::foundation::Timestamp;
use crate::ports::{AntiForgery, NonceScope};

pub struct HmacAntiForgery {
    secret: SecretString,
    half_lifetime_secs: i64,
}

impl HmacAntiForgery {
    pub fn new(secret: SecretString, lifetime_secs: u64) -> Self {
        let half = i64::try_from(lifetime_secs / 2).unwrap_or(i64::MAX).max(1);
        Self {
            secret,
            half_lifetime_secs: half,
        }
    }

    fn tick_at(&self, now_secs: i64) -> i64 {
        now_secs.div_euclid(self.half_lifetime_secs) + 1
    }

    fn token_for(&self, scope: NonceScope, tick: i64) -> Option<Vec<u8>> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.expose_secret().as_bytes()).ok()?;
        mac.update(scope.as_str().as_bytes());
        mac.update(b"|");
        mac.update(tick.to_string().as_bytes());
        Some(mac.finalize().into_bytes().to_vec())
    }

    pub(crate) fn issue_at(&self, scope: NonceScope, now_secs: i64) -> String {
        self.token_for(scope, self.tick_at(now_secs))
            .map(hex::encode)
            .unwrap_or_default()
    }

    pub(crate) fn verify_at(&self, token: &str, scope: NonceScope, now_secs: i64) -> bool {
        let Ok(presented) = hex::decode(token.trim()) else {
            return false;
        };
        if presented.is_empty() {
            return false;
        }

        let tick = self.tick_at(now_secs);
        [tick, tick - 1].into_iter().any(|candidate| {
            self.token_for(scope, candidate)
                .map(|expected| {
                    expected.len() == presented.len() && bool::from(expected.ct_eq(&presented))
                })
                .unwrap_or(false)
        })
    }
}

impl AntiForgery for HmacAntiForgery {
    fn issue(&self, scope: NonceScope) -> String {
        self.issue_at(scope, Timestamp::now().as_unix_secs())
    }

    fn verify(&self, token: &str, scope: NonceScope) -> bool {
        self.verify_at(token, scope, Timestamp::now().as_unix_secs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: u64 = 86_400;
    const NOW: i64 = 1_704_067_200;

    fn tokens() -> HmacAntiForgery {
        HmacAntiForgery::new(
            SecretString::new("a-very-long-nonce-secret-for-tests-only".to_string()),
            DAY,
        )
    }

    #[test]
    fn issued_token_verifies_in_same_scope() {
        let forgery = tokens();
        let token = forgery.issue_at(NonceScope::Register, NOW);

        assert_eq!(token.len(), 64);
        assert!(forgery.verify_at(&token, NonceScope::Register, NOW));
    }

    #[test]
    fn token_is_bound_to_its_scope() {
        let forgery = tokens();
        let token = forgery.issue_at(NonceScope::Register, NOW);
        assert!(!forgery.verify_at(&token, NonceScope::Payment, NOW));
    }

    #[test]
    fn token_survives_into_next_half_lifetime() {
        let forgery = tokens();
        let token = forgery.issue_at(NonceScope::Payment, NOW);
        let later = NOW + (DAY as i64) / 2;
        assert!(forgery.verify_at(&token, NonceScope::Payment, later));
    }

    #[test]
    fn token_expires_after_full_lifetime() {
        let forgery = tokens();
        let token = forgery.issue_at(NonceScope::Payment, NOW);
        let much_later = NOW + DAY as i64 + 1;
        assert!(!forgery.verify_at(&token, NonceScope::Payment, much_later));
    }

    #[test]
    fn other_secret_rejects_token() {
        let token = tokens().issue_at(NonceScope::Register, NOW);
        let other = HmacAntiForgery::new(SecretString::new("another-secret".to_string()), DAY);
        assert!(!other.verify_at(&token, NonceScope::Register, NOW));
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        let forgery = tokens();
        assert!(!forgery.verify_at("", NonceScope::Register, NOW));
        assert!(!forgery.verify_at("not hex", NonceScope::Register, NOW));
        assert!(!forgery.verify_at("abcd", NonceScope::Register, NOW));
    }

    #[test]
    fn trait_issue_and_verify_use_clock() {
        let forgery = tokens();
        let token = forgery.issue(NonceScope::Register);
        assert!(forgery.verify(&token, NonceScope::Register));
    }
}
