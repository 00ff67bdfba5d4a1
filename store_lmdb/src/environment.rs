//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::history::{HistoryDbs, LmdbHistoryStore};
use crate::LmdbError;

pub(crate) const PROCESSED_TXNS_DB: &str = "processed_txns";
pub(crate) const TXN_INDEX_DB: &str = "txn_index";
pub(crate) const ADDR_TXNS_DB: &str = "addr_txns";
pub(crate) const META_DB: &str = "meta";

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    pub(crate) dbs: HistoryDbs,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    ///
    /// The directory is created if missing. All wallet databases are created
    /// on first open so later read transactions never have to.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per path by this process and
        // the memory map is never accessed outside heed.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(max_dbs)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let processed: Database<Bytes, Bytes> =
            env.create_database(&mut wtxn, Some(PROCESSED_TXNS_DB))?;
        let txn_index: Database<Bytes, Bytes> =
            env.create_database(&mut wtxn, Some(TXN_INDEX_DB))?;
        let addr_txns: Database<Bytes, Bytes> =
            env.create_database(&mut wtxn, Some(ADDR_TXNS_DB))?;
        let meta: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(META_DB))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), map_size, max_dbs, "opened LMDB environment");

        Ok(Self {
            env: Arc::new(env),
            dbs: HistoryDbs {
                processed,
                txn_index,
                addr_txns,
                meta,
            },
        })
    }

    /// The underlying heed environment.
    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }

    /// A history store sharing this environment.
    pub fn history_store(&self) -> LmdbHistoryStore {
        LmdbHistoryStore {
            env: Arc::clone(&self.env),
            dbs: self.dbs,
        }
    }
}
