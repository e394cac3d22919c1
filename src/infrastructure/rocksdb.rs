use crate::domain::application::Application;
use crate::domain::ports::ApplicationStore;
use crate::error::{PortalError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Column Family for storing scholarship applications.
pub const CF_APPLICATIONS: &str = "applications";

/// A persistent application store backed by RocksDB.
///
/// Applications are keyed by their UUID bytes and stored as JSON values in a
/// dedicated column family, so the registry survives restarts when a database
/// path is configured.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbApplicationStore {
    db: Arc<DB>,
}

impl RocksDbApplicationStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// the applications column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_applications = ColumnFamilyDescriptor::new(CF_APPLICATIONS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_applications])
            .map_err(|e| PortalError::Storage(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(CF_APPLICATIONS)
            .ok_or_else(|| PortalError::Storage("applications column family not found".to_string()))
    }
}

#[async_trait]
impl ApplicationStore for RocksDbApplicationStore {
    async fn put(&self, application: Application) -> Result<()> {
        let cf = self.cf()?;
        let value = serde_json::to_vec(&application)?;
        self.db
            .put_cf(cf, application.id.as_bytes(), value)
            .map_err(|e| PortalError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Application>> {
        let cf = self.cf()?;
        let result = self
            .db
            .get_cf(cf, id.as_bytes())
            .map_err(|e| PortalError::Storage(e.to_string()))?;

        match result {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn all(&self) -> Result<Vec<Application>> {
        let cf = self.cf()?;
        let mut applications = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item.map_err(|e| PortalError::Storage(e.to_string()))?;
            applications.push(serde_json::from_slice(&value)?);
        }
        Ok(applications)
    }
}
