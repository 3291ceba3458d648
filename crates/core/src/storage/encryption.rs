use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::errors::CoreError;

// Argon2id profile for the store-file key. Fixed for every file; changing
// it means bumping the container version so old files stay readable.
const MEMORY_COST_KIB: u32 = 65_536; // 64 MB
const TIME_COST: u32 = 3;
const PARALLELISM: u32 = 4;

/// Derive a 256-bit key from the store passphrase using Argon2id.
///
/// The salt is random per store file and lives in the container header.
pub fn derive_key(passphrase: &str, salt: &[u8; 16]) -> Result<[u8; 32], CoreError> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, Some(32))
        .map_err(|e| CoreError::database("key setup", e))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = [0u8; 32];
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut key)
        .map_err(|e| CoreError::database("key derivation", e))?;
    Ok(key)
}

/// Encrypt with AES-256-GCM. The 16-byte auth tag rides at the end of the
/// ciphertext; no separate MAC is needed.
pub fn seal(plaintext: &[u8], key: &[u8; 32], nonce: &[u8; 12]) -> Result<Vec<u8>, CoreError> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| CoreError::database("store encryption", e))?;
    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|e| CoreError::database("store encryption", e))
}

/// Decrypt and verify. Fails on a wrong passphrase or tampered data.
pub fn open(ciphertext: &[u8], key: &[u8; 32], nonce: &[u8; 12]) -> Result<Vec<u8>, CoreError> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| CoreError::database("store decryption", e))?;
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CoreError::Database {
            operation: "store decryption".into(),
            message: "wrong passphrase or corrupted store file".into(),
        })
}

/// Cryptographically secure random salt.
pub fn generate_salt() -> Result<[u8; 16], CoreError> {
    let mut salt = [0u8; 16];
    getrandom::getrandom(&mut salt).map_err(|e| CoreError::database("salt generation", e))?;
    Ok(salt)
}

/// Cryptographically secure random nonce. Must be fresh per encryption.
pub fn generate_nonce() -> Result<[u8; 12], CoreError> {
    let mut nonce = [0u8; 12];
    getrandom::getrandom(&mut nonce).map_err(|e| CoreError::database("nonce generation", e))?;
    Ok(nonce)
}
