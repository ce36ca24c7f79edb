use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};

use crate::error::Error;

/// Bytes of entropy behind a remember token.
pub const REMEMBER_TOKEN_BYTES: usize = 32;

/// Generate a remember token from the OS CSPRNG, base64url-encoded for
/// cookies and headers.
///
/// Failure to obtain randomness is an error for the requesting operation;
/// there is no weaker fallback source.
pub fn remember_token() -> Result<String, Error> {
    random_token(REMEMBER_TOKEN_BYTES)
}

fn random_token(n_bytes: usize) -> Result<String, Error> {
    let mut buf = vec![0u8; n_bytes];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| Error::TokenEntropy(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(buf))
}
