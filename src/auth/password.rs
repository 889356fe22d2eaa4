use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// Salt length in bytes; one SHA-512 block, the HMAC key size.
pub const SALT_LEN: usize = 128;

/// Digest and per-user salt, stored side by side on the user row.
#[derive(Debug, Clone)]
pub struct PasswordHash {
    pub digest: Vec<u8>,
    pub salt: Vec<u8>,
}

/// HMAC-SHA512 of the password keyed by a fresh random salt.
pub fn hash_password(password: &str) -> PasswordHash {
    let mut salt = vec![0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let mut mac = HmacSha512::new_from_slice(&salt).expect("HMAC accepts keys of any length");
    mac.update(password.as_bytes());

    PasswordHash {
        digest: mac.finalize().into_bytes().to_vec(),
        salt,
    }
}

/// Recomputes the HMAC with the stored salt. Comparison is constant time.
pub fn verify_password(password: &str, digest: &[u8], salt: &[u8]) -> bool {
    let Ok(mut mac) = HmacSha512::new_from_slice(salt) else {
        return false;
    };
    mac.update(password.as_bytes());
    mac.verify_slice(digest).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("pw123");
        assert_eq!(hash.digest.len(), 64);
        assert_eq!(hash.salt.len(), SALT_LEN);
        assert!(verify_password("pw123", &hash.digest, &hash.salt));
    }

    #[test]
    fn test_other_passwords_rejected() {
        let hash = hash_password("pw123");
        for wrong in ["pw124", "PW123", "", "pw123 ", "wrongpw"] {
            assert!(!verify_password(wrong, &hash.digest, &hash.salt), "{wrong}");
        }
    }

    #[test]
    fn test_fresh_salt_per_hash() {
        let a = hash_password("same");
        let b = hash_password("same");
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.digest, b.digest);
    }

    #[test]
    fn test_empty_digest_never_matches() {
        let hash = hash_password("pw123");
        assert!(!verify_password("pw123", &[], &hash.salt));
        assert!(!verify_password("", &[], &[]));
    }
}
