use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Sign a document path for a time-limited download URL
///
/// The signature covers both the relative storage path and the expiry
/// timestamp, so neither can be altered without invalidating the link.
///
/// # Arguments
/// * `path` - Relative storage path, e.g. `transcripts/1715-ab12cd34.pdf`
/// * `expires_at` - Unix timestamp after which the link is rejected
/// * `secret` - The server-side signing key (from environment)
///
/// # Returns
/// * Hex-encoded HMAC-SHA256 signature
pub fn sign_document_path(path: &str, expires_at: i64, secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(path.as_bytes());
    mac.update(b":");
    mac.update(expires_at.to_string().as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verify the HMAC-SHA256 signature of a document link
pub fn verify_document_signature(
    path: &str,
    expires_at: i64,
    signature: &str,
    secret: &str,
) -> bool {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            tracing::error!("Failed to create HMAC instance");
            return false;
        }
    };

    mac.update(path.as_bytes());
    mac.update(b":");
    mac.update(expires_at.to_string().as_bytes());

    let sig_bytes = match hex::decode(signature) {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::warn!("Invalid hex signature format");
            return false;
        }
    };

    mac.verify_slice(&sig_bytes).is_ok()
}

/// Check that a link expiry timestamp has not passed
pub fn link_is_live(expires_at: i64, now: i64) -> bool {
    now <= expires_at
}

/// Generate a short random token for collision-resistant storage names
pub fn random_token(len: usize) -> String {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify_roundtrip() {
        let secret = "test-secret-key";
        let path = "transcripts/1715000000000-ab12cd34.pdf";
        let expires = 1_900_000_000;

        let signature = sign_document_path(path, expires, secret);
        assert!(verify_document_signature(path, expires, &signature, secret));
    }

    #[test]
    fn test_verify_rejects_tampered_path() {
        let secret = "test-secret-key";
        let signature = sign_document_path("transcripts/a.pdf", 1_900_000_000, secret);

        assert!(!verify_document_signature(
            "transcripts/b.pdf",
            1_900_000_000,
            &signature,
            secret
        ));
    }

    #[test]
    fn test_verify_rejects_tampered_expiry() {
        let secret = "test-secret-key";
        let signature = sign_document_path("transcripts/a.pdf", 1_900_000_000, secret);

        assert!(!verify_document_signature(
            "transcripts/a.pdf",
            1_999_999_999,
            &signature,
            secret
        ));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let signature = sign_document_path("transcripts/a.pdf", 1_900_000_000, "secret-one");

        assert!(!verify_document_signature(
            "transcripts/a.pdf",
            1_900_000_000,
            &signature,
            "secret-two"
        ));
    }

    #[test]
    fn test_verify_rejects_non_hex_signature() {
        assert!(!verify_document_signature(
            "transcripts/a.pdf",
            1_900_000_000,
            "not hex!",
            "secret"
        ));
    }

    #[test]
    fn test_link_is_live() {
        assert!(link_is_live(1000, 999));
        assert!(link_is_live(1000, 1000));
        assert!(!link_is_live(1000, 1001));
    }

    #[test]
    fn test_random_token_length_and_charset() {
        let token = random_token(8);
        assert_eq!(token.len(), 8);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_random_tokens_differ() {
        // Collisions across a handful of draws would indicate a broken RNG
        let tokens: Vec<String> = (0..16).map(|_| random_token(8)).collect();
        let mut deduped = tokens.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(tokens.len(), deduped.len());
    }
}
