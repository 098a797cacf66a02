use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::PassThrough;


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeReport {
    pub entity: String,
    pub cascaded: bool,
    pub statements: usize,
    pub dependents_deleted: u64,
    pub root_deleted: u64,
    pub completed_at: DateTime<Utc>,
}

impl CascadeReport {
    pub(crate) fn cascaded(entity: &str, statements: usize, dependents_deleted: u64, root_deleted: u64) -> Self {
        Self {
            entity: entity.to_string(),
            cascaded: true,
            statements,
            dependents_deleted,
            root_deleted,
            completed_at: Utc::now(),
        }
    }

    pub(crate) fn root_only(entity: &str, root_deleted: u64) -> Self {
        Self {
            entity: entity.to_string(),
            cascaded: false,
            statements: 0,
            dependents_deleted: 0,
            root_deleted,
            completed_at: Utc::now(),
        }
    }

    pub fn total_deleted(&self) -> u64 {
        self.dependents_deleted + self.root_deleted
    }
}


/// Options for a single destroy call.
///
/// `extra` is handed unchanged to the final non-cascading delete; the
/// cascade itself never reads it.
pub struct DestroyOptions<'a, T> {
    pub cascade_delete: bool,
    pub transacting: Option<&'a mut T>,
    pub extra: PassThrough,
}

impl<'a, T> DestroyOptions<'a, T> {
    pub fn new() -> Self {
        Self {
            cascade_delete: true,
            transacting: None,
            extra: PassThrough::new(),
        }
    }

    pub fn cascade(mut self, cascade_delete: bool) -> Self {
        self.cascade_delete = cascade_delete;
        self
    }

    /// Run inside the caller's transaction; it is neither committed nor
    /// rolled back here.
    pub fn transacting(mut self, tx: &'a mut T) -> Self {
        self.transacting = Some(tx);
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl<T> Default for DestroyOptions<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}
