//! Bookkeeping values kept in the `meta` database.

use heed::types::Bytes;
use heed::{Database, RoTxn, RwTxn};

use crate::LmdbError;

pub(crate) const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";
/// Highest sequence number assigned in `processed_txns`.
pub(crate) const SEQUENCE_KEY: &[u8] = b"sequence";
/// Confirmation height of the record under `SEQUENCE_KEY`.
pub(crate) const LAST_HEIGHT_KEY: &[u8] = b"last_height";
pub(crate) const CONSENSUS_HEIGHT_KEY: &[u8] = b"consensus_height";

pub(crate) fn get_u64(
    db: &Database<Bytes, Bytes>,
    txn: &RoTxn,
    key: &[u8],
) -> Result<Option<u64>, LmdbError> {
    match db.get(txn, key)? {
        Some(bytes) => {
            let arr: [u8; 8] = bytes.try_into().map_err(|_| {
                LmdbError::Corruption(format!(
                    "meta key '{}' has {} bytes, expected 8",
                    String::from_utf8_lossy(key),
                    bytes.len()
                ))
            })?;
            Ok(Some(u64::from_be_bytes(arr)))
        }
        None => Ok(None),
    }
}

pub(crate) fn put_u64(
    db: &Database<Bytes, Bytes>,
    txn: &mut RwTxn,
    key: &[u8],
    value: u64,
) -> Result<(), LmdbError> {
    db.put(txn, key, &value.to_be_bytes())?;
    Ok(())
}

pub(crate) fn get_schema_version(
    db: &Database<Bytes, Bytes>,
    txn: &RoTxn,
) -> Result<u32, LmdbError> {
    match db.get(txn, SCHEMA_VERSION_KEY)? {
        Some(bytes) if bytes.len() == 4 => {
            let mut arr = [0u8; 4];
            arr.copy_from_slice(bytes);
            Ok(u32::from_le_bytes(arr))
        }
        Some(_) => Err(LmdbError::Corruption(
            "schema_version has unexpected byte length".to_string(),
        )),
        None => Ok(0),
    }
}

pub(crate) fn put_schema_version(
    db: &Database<Bytes, Bytes>,
    txn: &mut RwTxn,
    version: u32,
) -> Result<(), LmdbError> {
    db.put(txn, SCHEMA_VERSION_KEY, &version.to_le_bytes())?;
    Ok(())
}
