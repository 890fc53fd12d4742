// src/auth/token.rs
use std::fmt;

use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

pub const TOKEN_BYTES: usize = 32;

/// SHA-256 of a session token; the registry only ever keys on this.
pub type TokenDigest = [u8; 32];

/// Opaque browser-session token carried in the session cookie.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn generate() -> Self {
        Self::generate_with(&mut OsRng)
    }

    /// URL-safe base64 without padding; 32 bytes give a 43 char token.
    pub fn generate_with<R: RngCore>(rng: &mut R) -> Self {
        let mut buf = [0u8; TOKEN_BYTES];
        rng.fill_bytes(&mut buf);
        Self(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf))
    }

    /// Accept a token coming back from a cookie only if it has the shape we mint.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let decoded = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(raw)
            .ok()?;
        (decoded.len() == TOKEN_BYTES).then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn digest(&self) -> TokenDigest {
        let out = Sha256::digest(self.0.as_bytes());
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&out);
        arr
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn token_is_url_safe_no_pad() {
        let mut rng = StdRng::seed_from_u64(123);
        let t = SessionToken::generate_with(&mut rng);

        assert!(t
            .as_str()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(t.as_str().len(), 43);
    }

    #[test]
    fn parse_accepts_minted_tokens_only() {
        let t = SessionToken::generate();
        assert_eq!(SessionToken::parse(t.as_str()), Some(t));
        assert_eq!(SessionToken::parse("short"), None);
        assert_eq!(SessionToken::parse("not base64 !!"), None);
    }

    #[test]
    fn digest_is_deterministic_and_input_sensitive() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = SessionToken::generate_with(&mut rng);
        let b = SessionToken::generate_with(&mut rng);

        assert_eq!(a.digest(), a.clone().digest());
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn debug_does_not_leak() {
        let t = SessionToken::generate();
        assert!(!format!("{t:?}").contains(t.as_str()));
    }
}
