//! Database schema migration engine.
//!
//! Tracks a monotonically increasing schema version in the meta database and
//! runs sequential migration functions to bring an older database up to date.

use crate::meta;
use crate::{LmdbEnvironment, LmdbError};

/// The schema version that the current code expects.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Runs database migrations to bring the schema up to date.
pub struct Migrator;

impl Migrator {
    /// Check the stored schema version and run any needed migrations.
    ///
    /// - Version 0 means a fresh database (no version stored yet).
    /// - If the stored version matches `CURRENT_SCHEMA_VERSION`, this is a no-op.
    /// - If the stored version is *higher* than what this code supports,
    ///   the database was written by a newer wallet and we refuse to open it.
    pub fn run(env: &LmdbEnvironment) -> Result<(), LmdbError> {
        let mut wtxn = env.env().write_txn()?;
        let current = meta::get_schema_version(&env.dbs.meta, &wtxn)?;

        if current == CURRENT_SCHEMA_VERSION {
            tracing::info!(version = current, "wallet schema is up to date");
            return Ok(());
        }

        if current > CURRENT_SCHEMA_VERSION {
            return Err(LmdbError::SchemaTooNew {
                found: current,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }

        for version in current..CURRENT_SCHEMA_VERSION {
            tracing::info!(from = version, to = version + 1, "running migration");
            run_migration(version, version + 1)?;
        }

        meta::put_schema_version(&env.dbs.meta, &mut wtxn, CURRENT_SCHEMA_VERSION)?;
        wtxn.commit()?;

        tracing::info!(version = CURRENT_SCHEMA_VERSION, "migration complete");
        Ok(())
    }

    /// The schema version recorded on disk (0 for a fresh database).
    pub fn stored_version(env: &LmdbEnvironment) -> Result<u32, LmdbError> {
        let rtxn = env.env().read_txn()?;
        meta::get_schema_version(&env.dbs.meta, &rtxn)
    }
}

fn run_migration(from: u32, to: u32) -> Result<(), LmdbError> {
    match (from, to) {
        (0, 1) => {
            // Initial schema: the databases are created by `LmdbEnvironment::open`.
            Ok(())
        }
        _ => Err(LmdbError::Corruption(format!(
            "no migration path from schema {} to {}",
            from, to
        ))),
    }
}
