//! Opaque token minting and at-rest digests.

use rand::Rng;
use rand::distributions::Alphanumeric;
use sha2::{Digest, Sha256};

/// Prefix carried by every minted token.
pub const TOKEN_PREFIX: &str = "qap_";

/// Number of random characters after the prefix.
pub const TOKEN_RANDOM_LEN: usize = 48;

/// Mint a new random token (`qap_` followed by 48 alphanumerics).
pub fn generate_token() -> String {
    let random: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_RANDOM_LEN)
        .map(char::from)
        .collect();
    format!("{TOKEN_PREFIX}{random}")
}

/// Hex SHA-256 digest of a secret. Used as the storage key for tokens and
/// for comparing secrets without keeping them around.
pub fn digest(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = generate_token();
        assert!(token.starts_with(TOKEN_PREFIX));
        assert_eq!(token.len(), TOKEN_PREFIX.len() + TOKEN_RANDOM_LEN);
        assert!(token[TOKEN_PREFIX.len()..].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn test_digest_is_stable_hex() {
        let d = digest("QAP-SUPER-KEY-0001");
        assert_eq!(d.len(), 64);
        assert_eq!(d, digest("QAP-SUPER-KEY-0001"));
        assert_ne!(d, digest("WRONG-KEY"));
    }
}
