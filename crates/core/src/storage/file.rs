use crate::errors::CoreError;

/// Magic bytes identifying a Portfel store file.
pub const MAGIC: &[u8; 4] = b"PFDB";

/// Current container version.
pub const CURRENT_VERSION: u16 = 1;

/// magic(4) + version(2) + salt(16) + nonce(12)
pub const HEADER_SIZE: usize = 34;

/// Assemble a store file: fixed header followed by ciphertext to EOF.
///
/// Layout:
/// ```text
/// [PFDB: 4B] [version: 2B LE] [salt: 16B] [nonce: 12B] [ciphertext: rest]
/// ```
pub fn write_container(salt: &[u8; 16], nonce: &[u8; 12], ciphertext: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + ciphertext.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&CURRENT_VERSION.to_le_bytes());
    buf.extend_from_slice(salt);
    buf.extend_from_slice(nonce);
    buf.extend_from_slice(ciphertext);
    buf
}

/// Split a store file into (salt, nonce, ciphertext), validating the header.
pub fn read_container(data: &[u8]) -> Result<([u8; 16], [u8; 12], &[u8]), CoreError> {
    let invalid = |message: String| CoreError::Database {
        operation: "store file read".into(),
        message,
    };

    if data.len() < HEADER_SIZE {
        return Err(invalid("file too small to be a Portfel store".into()));
    }
    if &data[0..4] != MAGIC {
        return Err(invalid("invalid magic bytes — not a Portfel store file".into()));
    }

    let version = u16::from_le_bytes([data[4], data[5]]);
    if version == 0 || version > CURRENT_VERSION {
        return Err(invalid(format!("unsupported store version: {version}")));
    }

    let mut salt = [0u8; 16];
    salt.copy_from_slice(&data[6..22]);
    let mut nonce = [0u8; 12];
    nonce.copy_from_slice(&data[22..34]);

    Ok((salt, nonce, &data[HEADER_SIZE..]))
}
