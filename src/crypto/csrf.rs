//! Stateless anti-forgery tokens for the HTML forms.
//!
//! Token layout: `<issued_at>.<nonce>.<signature>`, where `issued_at` is a unix
//! timestamp, `nonce` is 16 random bytes in hex and `signature` is the hex
//! HMAC-SHA256 of `<issued_at>.<nonce>` keyed with the session secret.

use chrono::Utc;
use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Why a submitted token was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsrfRejection {
    Missing,
    Malformed,
    BadSignature,
    Expired,
}

impl CsrfRejection {
    /// Text shown next to the form.
    pub fn message(&self) -> &'static str {
        match self {
            CsrfRejection::Missing => "The CSRF token is missing.",
            CsrfRejection::Malformed | CsrfRejection::BadSignature => "The CSRF token is invalid.",
            CsrfRejection::Expired => "The CSRF token has expired.",
        }
    }
}

/// Issues and checks tokens signed with the session secret.
#[derive(Clone)]
pub struct CsrfGuard {
    keyed_mac: HmacSha256,
    time_limit_secs: i64,
}

impl CsrfGuard {
    pub fn new(secret: impl AsRef<[u8]>, time_limit_secs: i64) -> Result<Self, InvalidLength> {
        Ok(Self {
            keyed_mac: HmacSha256::new_from_slice(secret.as_ref())?,
            time_limit_secs,
        })
    }

    pub fn issue(&self) -> String {
        self.issue_at(Utc::now().timestamp())
    }

    fn issue_at(&self, issued_at: i64) -> String {
        let nonce = hex::encode(rand::random::<[u8; 16]>());
        let signature = hex::encode(self.mac(issued_at, &nonce).finalize().into_bytes());
        format!("{}.{}.{}", issued_at, nonce, signature)
    }

    pub fn verify(&self, token: Option<&str>) -> Result<(), CsrfRejection> {
        self.verify_at(token, Utc::now().timestamp())
    }

    fn verify_at(&self, token: Option<&str>, now: i64) -> Result<(), CsrfRejection> {
        let token = match token {
            Some(t) if !t.is_empty() => t,
            _ => return Err(CsrfRejection::Missing),
        };

        let mut parts = token.splitn(3, '.');
        let (issued_at, nonce, signature) = match (parts.next(), parts.next(), parts.next()) {
            (Some(ts), Some(nonce), Some(sig)) => (ts, nonce, sig),
            _ => return Err(CsrfRejection::Malformed),
        };
        let issued_at: i64 = issued_at.parse().map_err(|_| CsrfRejection::Malformed)?;
        let signature = hex::decode(signature).map_err(|_| CsrfRejection::Malformed)?;

        // `verify_slice` compares in constant time.
        self.mac(issued_at, nonce)
            .verify_slice(&signature)
            .map_err(|_| CsrfRejection::BadSignature)?;

        let age = now - issued_at;
        if age < 0 || age > self.time_limit_secs {
            return Err(CsrfRejection::Expired);
        }
        Ok(())
    }

    fn mac(&self, issued_at: i64, nonce: &str) -> HmacSha256 {
        let mut mac = self.keyed_mac.clone();
        mac.update(issued_at.to_string().as_bytes());
        mac.update(b".");
        mac.update(nonce.as_bytes());
        mac
    }
}

/// Equality whose running time depends only on the input lengths.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies() {
        let guard = CsrfGuard::new("session-secret", 3600).unwrap();
        let token = guard.issue();
        assert_eq!(guard.verify(Some(&token)), Ok(()));
    }

    #[test]
    fn tokens_are_unique() {
        let guard = CsrfGuard::new("session-secret", 3600).unwrap();
        assert_ne!(guard.issue(), guard.issue());
    }

    #[test]
    fn rejects_missing_and_malformed() {
        let guard = CsrfGuard::new("session-secret", 3600).unwrap();
        assert_eq!(guard.verify(None), Err(CsrfRejection::Missing));
        assert_eq!(guard.verify(Some("")), Err(CsrfRejection::Missing));
        assert_eq!(guard.verify(Some("abc")), Err(CsrfRejection::Malformed));
        assert_eq!(
            guard.verify(Some("soon.00ff.deadbeef")),
            Err(CsrfRejection::Malformed)
        );
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let ours = CsrfGuard::new("session-secret", 3600).unwrap();
        let theirs = CsrfGuard::new("someone-else", 3600).unwrap();
        assert_eq!(
            ours.verify(Some(&theirs.issue())),
            Err(CsrfRejection::BadSignature)
        );
    }

    #[test]
    fn rejects_tampered_timestamp() {
        let guard = CsrfGuard::new("session-secret", 3600).unwrap();
        let token = guard.issue_at(1_000);
        let forged = token.replacen("1000", "2000", 1);
        assert_eq!(
            guard.verify_at(Some(&forged), 2_000),
            Err(CsrfRejection::BadSignature)
        );
    }

    #[test]
    fn expires_after_time_limit() {
        let guard = CsrfGuard::new("session-secret", 60).unwrap();
        let token = guard.issue_at(1_000);
        assert_eq!(guard.verify_at(Some(&token), 1_060), Ok(()));
        assert_eq!(
            guard.verify_at(Some(&token), 1_061),
            Err(CsrfRejection::Expired)
        );
        assert_eq!(
            guard.verify_at(Some(&token), 999),
            Err(CsrfRejection::Expired)
        );
    }

    #[test]
    fn signature_is_hmac_of_timestamp_and_nonce() {
        let guard = CsrfGuard::new("session-secret", 3600).unwrap();
        let token = guard.issue_at(1_000);
        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);

        let mut mac = HmacSha256::new_from_slice(b"session-secret").unwrap();
        mac.update(format!("1000.{}", parts[1]).as_bytes());
        assert_eq!(parts[2], hex::encode(mac.finalize().into_bytes()));
    }

    #[test]
    fn rejects_signature_that_is_not_hex() {
        let guard = CsrfGuard::new("session-secret", 3600).unwrap();
        let token = guard.issue_at(1_000);
        let (payload, _) = token.rsplit_once('.').unwrap();
        assert_eq!(
            guard.verify_at(Some(&format!("{}.not-hex", payload)), 1_000),
            Err(CsrfRejection::Malformed)
        );
    }

    #[test]
    fn constant_time_eq_matches_plain_equality() {
        assert!(constant_time_eq(b"TopSecret", b"TopSecret"));
        assert!(!constant_time_eq(b"TopSecret", b"TopSecreT"));
        assert!(!constant_time_eq(b"Top", b"TopSecret"));
    }
}
