//! Credential digests and session tokens. bcrypt is treated as an opaque
//! one-way function: `digest` produces a salted hash and `verify` compares
//! a candidate against it without ever recovering the secret.

use bcrypt::hash;
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::error::Result;

/// Length of a freshly minted session token, pre-digest.
const TOKEN_LEN: usize = 22;

// The default work factor is far too slow for the test suites, which
// digest on every seeded user.
#[cfg(not(test))]
const COST: u32 = bcrypt::DEFAULT_COST;
#[cfg(test)]
const COST: u32 = 4;

/// Produce a one-way digest of a secret.
pub fn digest(secret: &str) -> Result<String> {
    Ok(hash(secret, COST)?)
}

/// Check a candidate secret against a stored digest. A malformed digest
/// counts as a mismatch rather than an error.
pub fn verify(candidate: &str, digest: &str) -> bool {
    bcrypt::verify(candidate, digest).unwrap_or(false)
}

/// A fresh random token for persistent sessions. Callers hand the token
/// to the client and store only its digest.
pub fn new_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}
