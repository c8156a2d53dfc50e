//! Signed bearer tokens
//!
//! A token is `<id>.<tag>`: `id` is 32 bytes from the OS CSPRNG
//! (base64url) and `tag` is HMAC-SHA256 over `<purpose>:<id>` under the
//! server secret. The id is the server-side lookup key; the tag lets the
//! server reject forged or cross-purpose tokens before touching a store.

use std::fmt;

use platform::crypto::{from_base64url, hmac_sha256, random_token, to_base64url, verify_hmac_sha256};

/// Random bytes in a token id
pub const TOKEN_ID_BYTES: usize = 32;

/// What a token is allowed to unlock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPurpose {
    /// Remember-me session
    Session,
    /// Admin privilege marker
    Privilege,
}

impl TokenPurpose {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TokenPurpose::Session => "session",
            TokenPurpose::Privilege => "privilege",
        }
    }
}

/// Server-side key of a session or privilege grant
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TokenId(String);

impl TokenId {
    /// Fresh id, unrelated to any identity or clock
    pub fn generate() -> Self {
        Self(random_token(TOKEN_ID_BYTES))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix, safe to put in logs
    pub fn short(&self) -> &str {
        let end = self.0.len().min(8);
        &self.0[..end]
    }

    /// Bearer form handed to the client
    pub fn sign(&self, purpose: TokenPurpose, secret: &[u8]) -> String {
        let tag = hmac_sha256(secret, &signing_input(purpose, &self.0));
        format!("{}.{}", self.0, to_base64url(&tag))
    }

    /// Parse a bearer token and check its tag.
    ///
    /// `None` for anything malformed, forged, or signed for another purpose.
    pub fn from_signed(token: &str, purpose: TokenPurpose, secret: &[u8]) -> Option<Self> {
        let (id, tag_b64) = token.split_once('.')?;
        if id.is_empty() || tag_b64.contains('.') {
            return None;
        }

        let tag = from_base64url(tag_b64).ok()?;
        if !verify_hmac_sha256(secret, &signing_input(purpose, id), &tag) {
            return None;
        }

        Some(Self(id.to_string()))
    }
}

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenId({}…)", self.short())
    }
}

fn signing_input(purpose: TokenPurpose, id: &str) -> Vec<u8> {
    format!("{}:{}", purpose.as_str(), id).into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: [u8; 32] = [7u8; 32];

    #[test]
    fn test_sign_and_parse() {
        let id = TokenId::generate();
        let token = id.sign(TokenPurpose::Session, &SECRET);

        let parsed = TokenId::from_signed(&token, TokenPurpose::Session, &SECRET).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(TokenId::generate(), TokenId::generate());
    }

    #[test]
    fn test_rejects_other_purpose() {
        let token = TokenId::generate().sign(TokenPurpose::Session, &SECRET);
        assert!(TokenId::from_signed(&token, TokenPurpose::Privilege, &SECRET).is_none());
    }

    #[test]
    fn test_rejects_other_secret() {
        let token = TokenId::generate().sign(TokenPurpose::Session, &SECRET);
        assert!(TokenId::from_signed(&token, TokenPurpose::Session, &[8u8; 32]).is_none());
    }

    #[test]
    fn test_rejects_malformed() {
        for token in ["", "true", "admin", ".", "abc.", ".abc", "a.b.c", "abc.!!!"] {
            assert!(
                TokenId::from_signed(token, TokenPurpose::Privilege, &SECRET).is_none(),
                "accepted {token:?}"
            );
        }
    }

    #[test]
    fn test_rejects_swapped_id() {
        let token = TokenId::generate().sign(TokenPurpose::Session, &SECRET);
        let (_, tag) = token.split_once('.').unwrap();
        let forged = format!("{}.{}", TokenId::generate().as_str(), tag);
        assert!(TokenId::from_signed(&forged, TokenPurpose::Session, &SECRET).is_none());
    }

    #[test]
    fn test_debug_is_truncated() {
        let id = TokenId::generate();
        let debug = format!("{:?}", id);
        assert!(!debug.contains(id.as_str()));
    }
}
