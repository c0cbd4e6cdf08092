//! File persistence under ~/.connect-five/: JSON documents and checksummed
//! binary snapshots.
//!
//! Snapshot file format:
//! - Version magic (8 bytes)
//! - Data length (4 bytes)
//! - bincode payload (variable length)
//! - SHA256 checksum over the three fields above (32 bytes)

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::core::constants::{APP_DIR_NAME, SNAPSHOT_VERSION_MAGIC};

/// Get the ~/.connect-five/ directory path, creating it if needed.
pub fn app_dir() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    let dir = home_dir.join(APP_DIR_NAME);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get the full path for a file in ~/.connect-five/.
pub fn app_path(filename: &str) -> io::Result<PathBuf> {
    Ok(app_dir()?.join(filename))
}

/// Load a JSON file, returning `T::default()` if missing or invalid.
pub fn load_json_or_default<T: Default + DeserializeOwned>(path: &Path) -> T {
    match fs::read_to_string(path) {
        Ok(json) => serde_json::from_str(&json).unwrap_or_default(),
        Err(_) => T::default(),
    }
}

/// Save a value as pretty-printed JSON, creating parent directories.
pub fn save_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, json)
}

/// Encode a value into the checksummed snapshot format.
pub fn encode_snapshot<T: Serialize>(value: &T) -> io::Result<Vec<u8>> {
    let data =
        bincode::serialize(value).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let data_len = data.len() as u32;

    let mut hasher = Sha256::new();
    hasher.update(SNAPSHOT_VERSION_MAGIC.to_le_bytes());
    hasher.update(data_len.to_le_bytes());
    hasher.update(&data);
    let checksum = hasher.finalize();

    let mut out = Vec::with_capacity(8 + 4 + data.len() + 32);
    out.extend_from_slice(&SNAPSHOT_VERSION_MAGIC.to_le_bytes());
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(&data);
    out.extend_from_slice(&checksum);
    Ok(out)
}

/// Decode a snapshot, verifying magic, length and checksum.
pub fn decode_snapshot<T: DeserializeOwned>(bytes: &[u8]) -> io::Result<T> {
    let invalid = |msg: String| io::Error::new(io::ErrorKind::InvalidData, msg);

    if bytes.len() < 12 + 32 {
        return Err(invalid(format!("Snapshot too short: {} bytes", bytes.len())));
    }
    let (version_bytes, rest) = bytes.split_at(8);
    let (length_bytes, rest) = rest.split_at(4);

    let mut magic = [0u8; 8];
    magic.copy_from_slice(version_bytes);
    let version = u64::from_le_bytes(magic);
    if version != SNAPSHOT_VERSION_MAGIC {
        return Err(invalid(format!(
            "Invalid snapshot version: expected 0x{:016X}, got 0x{:016X}",
            SNAPSHOT_VERSION_MAGIC, version
        )));
    }

    let mut len = [0u8; 4];
    len.copy_from_slice(length_bytes);
    let data_len = u32::from_le_bytes(len) as usize;
    if rest.len() != data_len + 32 {
        return Err(invalid(format!(
            "Snapshot length mismatch: header says {} bytes, found {}",
            data_len,
            rest.len().saturating_sub(32)
        )));
    }
    let (data, stored_checksum) = rest.split_at(data_len);

    let mut hasher = Sha256::new();
    hasher.update(version_bytes);
    hasher.update(length_bytes);
    hasher.update(data);
    let computed_checksum = hasher.finalize();
    if stored_checksum != computed_checksum.as_slice() {
        return Err(invalid("Checksum verification failed".to_string()));
    }

    bincode::deserialize(data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Write a checksummed snapshot to `path`.
pub fn save_snapshot<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, encode_snapshot(value)?)
}

/// Read and verify a checksummed snapshot from `path`.
pub fn load_snapshot<T: DeserializeOwned>(path: &Path) -> io::Result<T> {
    decode_snapshot(&fs::read(path)?)
}
