//! Password hashing.
//!
//! Hashes are stored as `hex(salt):hex(sha256(password || salt))` and
//! compared in constant time.

use rand::RngCore;
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;

pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = salted_digest(password, &salt);
    format!("{}:{}", hex::encode(salt), hex::encode(digest))
}

pub fn verify_password(candidate: &str, stored_hash: &str) -> bool {
    let Some((salt_hex, hash_hex)) = stored_hash.split_once(':') else {
        return false;
    };

    let (Ok(salt), Ok(hash)) = (hex::decode(salt_hex), hex::decode(hash_hex)) else {
        return false;
    };

    let candidate_hash = salted_digest(candidate, &salt);
    if hash.len() != candidate_hash.len() {
        return false;
    }

    let mut diff = 0u8;
    for (a, b) in hash.iter().zip(candidate_hash.iter()) {
        diff |= a ^ b;
    }
    diff == 0
}

fn salted_digest(password: &str, salt: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt);
    hasher.finalize().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let stored = hash_password("hunter2");
        assert!(verify_password("hunter2", &stored));
        assert!(!verify_password("hunter3", &stored));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same");
        let b = hash_password("same");
        assert_ne!(a, b);
        assert!(verify_password("same", &a));
        assert!(verify_password("same", &b));
    }

    #[test]
    fn test_plaintext_is_not_stored() {
        let stored = hash_password("secret-password");
        assert!(!stored.contains("secret-password"));
    }

    #[test]
    fn test_malformed_hashes_never_verify() {
        assert!(!verify_password("key", "nocolonshere"));
        assert!(!verify_password("key", "zz:zz"));
        assert!(!verify_password("key", "abcd:"));
        assert!(!verify_password("", ""));
    }
}
