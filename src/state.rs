//! Shared application state for all routes.

use crate::error::AppError;
use crate::service::RecordSet;
use crate::store::SchemaStore;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<SchemaStore>>,
    /// Working record sets keyed by module id, seeded on first access. Not persisted.
    pub records: Arc<RwLock<HashMap<String, RecordSet>>>,
}

impl AppState {
    pub fn new(store: SchemaStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn read_store(&self) -> Result<RwLockReadGuard<'_, SchemaStore>, AppError> {
        self.store.read().map_err(|_| AppError::Internal("schema store lock poisoned".into()))
    }

    pub fn write_store(&self) -> Result<RwLockWriteGuard<'_, SchemaStore>, AppError> {
        self.store.write().map_err(|_| AppError::Internal("schema store lock poisoned".into()))
    }

    pub fn write_records(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, RecordSet>>, AppError> {
        self.records.write().map_err(|_| AppError::Internal("record lock poisoned".into()))
    }
}
