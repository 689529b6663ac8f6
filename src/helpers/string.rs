//! Token encryption
//!
//! The session token is stored at rest with AES-256-GCM, Base64-encoded as
//! `[nonce (12 bytes)][ciphertext]`.

use crate::error::{Error, Result};
use aes_gcm::{
    Aes256Gcm,
    aead::{Aead, AeadCore, KeyInit, Nonce, OsRng},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

/// WARNING: a key compiled into the binary only obfuscates the token; an OS
/// keychain would be needed for real secrecy.
const MASTER_KEY: &[u8; 32] = b"TaskDeskSessionKey#2026#AtRest!!";

const NONCE_LEN: usize = 12;

pub fn encrypt(plain_text: &str) -> Result<String> {
    let cipher = Aes256Gcm::new(MASTER_KEY.into());
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plain_text.as_bytes())
        .map_err(|e| Error::Invalid {
            message: format!("Encryption failed: {e}"),
        })?;

    let mut combined = nonce.to_vec();
    combined.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(combined))
}

pub fn decrypt(cipher_text: &str) -> Result<String> {
    let data = BASE64.decode(cipher_text).map_err(|e| Error::Invalid {
        message: format!("Base64 decode failed: {e}"),
    })?;

    if data.len() < NONCE_LEN {
        return Err(Error::Invalid {
            message: "Ciphertext too short".to_string(),
        });
    }

    let cipher = Aes256Gcm::new(MASTER_KEY.into());
    let (nonce_bytes, ciphertext) = data.split_at(NONCE_LEN);
    let nonce = Nonce::<Aes256Gcm>::from_slice(nonce_bytes);

    let plaintext = cipher.decrypt(nonce, ciphertext).map_err(|e| Error::Invalid {
        message: format!("Decryption failed: {e}"),
    })?;

    String::from_utf8(plaintext).map_err(|e| Error::Invalid {
        message: format!("UTF-8 decode failed: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt() {
        let token = "eyJhbGciOiJIUzI1NiJ9.payload.signature";
        let encrypted = encrypt(token).expect("Encryption failed");
        assert_ne!(encrypted, token);
        assert_eq!(decrypt(&encrypted).expect("Decryption failed"), token);
    }

    #[test]
    fn test_nonce_changes_ciphertext() {
        let a = encrypt("same").expect("Encryption failed");
        let b = encrypt("same").expect("Encryption failed");
        assert_ne!(a, b);
    }

    #[test]
    fn test_decrypt_rejects_garbage() {
        assert!(decrypt("not_valid_base64!!!").is_err());
        assert!(decrypt("AQIDBA==").is_err());
    }
}
