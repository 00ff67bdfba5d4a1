//! LMDB database integrity checks.
//!
//! Run on startup to detect corruption early, before the wallet starts
//! answering history queries. The check walks the whole primary index once,
//! so it is not part of the query path.

use std::collections::HashMap;
use std::path::Path;

use skein_types::TransactionId;

use crate::history::{decode_record, decode_sequence};
use crate::meta::{self, SEQUENCE_KEY};
use crate::{LmdbEnvironment, LmdbError};

/// Summary of an integrity check run.
#[derive(Debug, Default)]
pub struct IntegrityReport {
    pub records_checked: u64,
    pub id_entries_checked: u64,
    pub address_entries_checked: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check the history indexes.
///
/// Verifies that sequence numbers are dense from 1, that every record decodes,
/// that confirmation heights never decrease, and that every secondary index
/// entry points at an existing record. Violations are recorded in the report
/// rather than causing a hard error; only a failure to read LMDB at all is
/// returned as `Err`.
pub fn check_integrity(env: &LmdbEnvironment) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport::default();
    let rtxn = env.env().read_txn()?;
    let dbs = &env.dbs;

    // sequence -> transaction id, for records that decoded
    let mut records: HashMap<u64, Option<TransactionId>> = HashMap::new();
    let mut expected = 1u64;
    let mut previous_height = None;

    for entry in dbs.processed.iter(&rtxn)? {
        let (key, val) = entry?;
        let sequence = match decode_sequence(key) {
            Ok(s) => s,
            Err(e) => {
                report.errors.push(e.to_string());
                continue;
            }
        };
        report.records_checked += 1;
        if sequence != expected {
            report.errors.push(format!(
                "sequence gap: expected {}, found {}",
                expected, sequence
            ));
        }
        expected = sequence + 1;

        match decode_record(sequence, val) {
            Ok(pt) => {
                if let Some(prev) = previous_height {
                    if pt.confirmation_height < prev {
                        report.errors.push(format!(
                            "record {} at height {} follows height {}",
                            sequence, pt.confirmation_height, prev
                        ));
                    }
                }
                previous_height = Some(pt.confirmation_height);
                records.insert(sequence, Some(pt.transaction_id));
            }
            Err(e) => {
                report.errors.push(e.to_string());
                records.insert(sequence, None);
            }
        }
    }

    let counter = meta::get_u64(&dbs.meta, &rtxn, SEQUENCE_KEY)?.unwrap_or(0);
    if counter != expected - 1 {
        report.errors.push(format!(
            "sequence counter is {} but the last record is {}",
            counter,
            expected - 1
        ));
    }

    for entry in dbs.txn_index.iter(&rtxn)? {
        let (key, val) = entry?;
        report.id_entries_checked += 1;
        let sequence = match decode_sequence(val) {
            Ok(s) => s,
            Err(e) => {
                report.errors.push(e.to_string());
                continue;
            }
        };
        match records.get(&sequence) {
            None => report.errors.push(format!(
                "transaction id index points at missing record {}",
                sequence
            )),
            Some(Some(id)) if id.as_bytes().as_slice() != key => {
                report.errors.push(format!(
                    "transaction id index entry for record {} does not match its id {}",
                    sequence, id
                ))
            }
            Some(_) => {}
        }
    }

    for entry in dbs.addr_txns.iter(&rtxn)? {
        let (key, _) = entry?;
        report.address_entries_checked += 1;
        if key.len() != 40 {
            report
                .errors
                .push(format!("address index key has {} bytes", key.len()));
            continue;
        }
        let sequence = decode_sequence(&key[32..])?;
        if !records.contains_key(&sequence) {
            report.errors.push(format!(
                "address index points at missing record {}",
                sequence
            ));
        }
    }

    Ok(report)
}

/// Check if the LMDB data directory looks valid before opening.
///
/// Returns `Ok(())` for a fresh (nonexistent) directory. Returns an error
/// if the directory exists but `data.mdb` is missing, which suggests
/// corruption or misconfiguration.
pub fn check_data_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Ok(()); // Fresh start
    }
    let data_file = path.join("data.mdb");
    if !data_file.exists() {
        return Err(format!(
            "LMDB directory exists but data.mdb is missing at {}",
            path.display()
        ));
    }
    Ok(())
}
