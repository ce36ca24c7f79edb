use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Deterministic keyed digest for remember tokens.
///
/// The same raw token always maps to the same output, so the store can
/// index on the digest without ever holding a usable token. Keyed with a
/// deployment secret distinct from the password pepper. Unsalted: an
/// indexed equality lookup needs a repeatable key, which is also what
/// separates this from password hashing.
#[derive(Clone)]
pub struct TokenDigest {
    key: Vec<u8>,
}

impl TokenDigest {
    pub fn new(key: impl AsRef<[u8]>) -> Self {
        Self {
            key: key.as_ref().to_vec(),
        }
    }

    /// Reduce a raw token to its storage lookup key.
    pub fn digest(&self, token: &str) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC can accept any key length");
        mac.update(token.as_bytes());
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }
}
