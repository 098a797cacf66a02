use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, info};

use super::store::{PassThrough, Storage, StorageError, Transaction};
use crate::plan::{Condition, DeleteDescriptor, Filter, RowSet, Value};
use crate::sql::{Dialect, explain_delete, explain_destroy};


pub type Row = BTreeMap<String, Value>;


pub fn row(pairs: &[(&str, Value)]) -> Row {
    pairs
        .iter()
        .map(|(column, value)| (column.to_string(), value.clone()))
        .collect()
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub column: String,
    pub referenced_table: String,
    pub referenced_column: String,
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    pub name: String,
    pub primary_key: Option<String>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl TableDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: None,
            foreign_keys: Vec::new(),
        }
    }

    /// Auto-incrementing integer key, assigned on insert when absent.
    pub fn with_primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = Some(column.into());
        self
    }

    /// Restrict-on-delete reference from `column` to `table.referenced_column`.
    pub fn references(
        mut self,
        column: impl Into<String>,
        table: impl Into<String>,
        referenced_column: impl Into<String>,
    ) -> Self {
        self.foreign_keys.push(ForeignKey {
            column: column.into(),
            referenced_table: table.into(),
            referenced_column: referenced_column.into(),
        });
        self
    }
}


#[derive(Debug, Clone)]
struct Table {
    def: TableDef,
    rows: Vec<Row>,
    next_id: i64,
}


#[derive(Debug, Clone, Default)]
struct Database {
    tables: BTreeMap<String, Table>,
}

impl Database {
    fn table(&self, name: &str) -> Result<&Table, StorageError> {
        self.tables
            .get(name)
            .ok_or_else(|| StorageError::UnknownTable(name.to_string()))
    }

    fn create_table(&mut self, def: TableDef) -> Result<(), StorageError> {
        if self.tables.contains_key(&def.name) {
            return Err(StorageError::Statement(format!("table {} already exists", def.name)));
        }
        self.tables.insert(
            def.name.clone(),
            Table {
                def,
                rows: Vec::new(),
                next_id: 1,
            },
        );
        Ok(())
    }

    fn insert(&mut self, table_name: &str, mut row: Row) -> Result<Option<Value>, StorageError> {
        let def = self.table(table_name)?.def.clone();

        for fk in &def.foreign_keys {
            if let Some(value) = row.get(&fk.column) {
                let parent = self.table(&fk.referenced_table)?;
                if !parent.rows.iter().any(|r| r.get(&fk.referenced_column) == Some(value)) {
                    return Err(StorageError::ForeignKeyViolation {
                        table: table_name.to_string(),
                        column: fk.column.clone(),
                        referenced_table: fk.referenced_table.clone(),
                        referenced_column: fk.referenced_column.clone(),
                        value: value.clone(),
                    });
                }
            }
        }

        let table = self
            .tables
            .get_mut(table_name)
            .ok_or_else(|| StorageError::UnknownTable(table_name.to_string()))?;

        let key = match &def.primary_key {
            Some(pk) => {
                let value = match row.get(pk) {
                    Some(value) => value.clone(),
                    None => Value::Int(table.next_id),
                };
                if table.rows.iter().any(|r| r.get(pk) == Some(&value)) {
                    return Err(StorageError::UniqueViolation {
                        table: table_name.to_string(),
                        column: pk.clone(),
                        value,
                    });
                }
                if let Value::Int(n) = value {
                    table.next_id = table.next_id.max(n + 1);
                }
                row.insert(pk.clone(), value.clone());
                Some(value)
            }
            None => None,
        };

        table.rows.push(row);
        Ok(key)
    }

    fn evaluate(&self, filter: &Filter) -> Result<BTreeSet<Value>, StorageError> {
        match filter {
            Filter::Values(values) => Ok(values.iter().cloned().collect()),
            Filter::Select(select) => {
                let table = self.table(&select.from.table)?;
                let mask = self.matching(&select.from)?;
                Ok(table
                    .rows
                    .iter()
                    .zip(mask)
                    .filter(|(_, hit)| *hit)
                    .filter_map(|(r, _)| r.get(&select.column).cloned())
                    .collect())
            }
        }
    }

    fn matching(&self, rows: &RowSet) -> Result<Vec<bool>, StorageError> {
        let table = self.table(&rows.table)?;
        match &rows.condition {
            Condition::In { column, filter } => {
                let values = self.evaluate(filter)?;
                Ok(table
                    .rows
                    .iter()
                    .map(|r| r.get(column).is_some_and(|v| values.contains(v)))
                    .collect())
            }
            Condition::Equals(pairs) => Ok(table
                .rows
                .iter()
                .map(|r| pairs.iter().all(|(column, value)| r.get(column) == Some(value)))
                .collect()),
        }
    }

    /// Statement-atomic: either every matching row goes or none does.
    fn delete(&mut self, rows: &RowSet) -> Result<u64, StorageError> {
        let mask = self.matching(rows)?;
        let removed = mask.iter().filter(|hit| **hit).count();
        if removed == 0 {
            return Ok(0);
        }

        self.check_restrict(&rows.table, &mask)?;

        let table = self
            .tables
            .get_mut(&rows.table)
            .ok_or_else(|| StorageError::UnknownTable(rows.table.clone()))?;
        let mut hits = mask.into_iter();
        table.rows.retain(|_| !hits.next().unwrap_or(false));

        Ok(removed as u64)
    }

    fn check_restrict(&self, table_name: &str, mask: &[bool]) -> Result<(), StorageError> {
        let table = self.table(table_name)?;

        for (referencing_name, referencing) in &self.tables {
            for fk in referencing
                .def
                .foreign_keys
                .iter()
                .filter(|fk| fk.referenced_table == table_name)
            {
                let mut gone = BTreeSet::new();
                let mut kept = BTreeSet::new();
                for (r, hit) in table.rows.iter().zip(mask) {
                    if let Some(v) = r.get(&fk.referenced_column) {
                        if *hit {
                            gone.insert(v);
                        } else {
                            kept.insert(v);
                        }
                    }
                }
                let orphaned: BTreeSet<&Value> = gone.difference(&kept).copied().collect();
                if orphaned.is_empty() {
                    continue;
                }

                let self_referencing = referencing_name == table_name;
                let violation = referencing
                    .rows
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| !(self_referencing && mask[*i]))
                    .find_map(|(_, r)| r.get(&fk.column).filter(|v| orphaned.contains(v)));

                if let Some(value) = violation {
                    return Err(StorageError::ForeignKeyViolation {
                        table: referencing_name.clone(),
                        column: fk.column.clone(),
                        referenced_table: table_name.to_string(),
                        referenced_column: fk.referenced_column.clone(),
                        value: value.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}


/// In-process relational store with restrict foreign keys and snapshot
/// transactions. Transactions are serialized: `begin` waits for the
/// previous one to finish.
#[derive(Clone)]
pub struct MemoryStore {
    db: Arc<AsyncMutex<Database>>,
    dialect: Dialect,
    log: Arc<Mutex<Vec<String>>>,
    closed: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new(dialect: Dialect) -> Self {
        info!("MemoryStore created ({})", <&'static str>::from(dialect));
        Self {
            db: Arc::new(AsyncMutex::new(Database::default())),
            dialect,
            log: Arc::new(Mutex::new(Vec::new())),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn create_table(&self, def: TableDef) -> Result<(), StorageError> {
        self.ensure_open()?;
        self.db.lock().await.create_table(def)
    }

    /// Returns the primary key value, if the table has one.
    pub async fn insert(&self, table: &str, row: Row) -> Result<Option<Value>, StorageError> {
        self.ensure_open()?;
        self.db.lock().await.insert(table, row)
    }

    pub async fn count(&self, table: &str) -> Result<usize, StorageError> {
        Ok(self.db.lock().await.table(table)?.rows.len())
    }

    pub async fn rows(&self, table: &str) -> Result<Vec<Row>, StorageError> {
        Ok(self.db.lock().await.table(table)?.rows.clone())
    }

    /// Every delete issued so far, inlined, in issue order.
    pub fn statements(&self) -> Vec<String> {
        self.log.lock().clone()
    }

    /// Simulates a dropped connection: later calls fail.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Relaxed);
    }

    fn ensure_open(&self) -> Result<(), StorageError> {
        if self.closed.load(Ordering::Relaxed) {
            return Err(StorageError::Connection("memory store is closed".to_string()));
        }
        Ok(())
    }

    fn record(&self, sql: String) {
        debug!("{}", sql);
        self.log.lock().push(sql);
    }
}

#[async_trait]
impl Storage for MemoryStore {
    type Tx = MemoryTransaction;

    async fn begin(&self) -> Result<MemoryTransaction, StorageError> {
        self.ensure_open()?;
        let guard = Arc::clone(&self.db).lock_owned().await;
        let working = (*guard).clone();

        Ok(MemoryTransaction {
            guard,
            working,
            store: self.clone(),
        })
    }

    async fn destroy(&self, rows: &RowSet, _options: &PassThrough) -> Result<u64, StorageError> {
        self.ensure_open()?;
        self.record(explain_destroy(self.dialect, rows));
        self.db.lock().await.delete(rows)
    }
}


/// Works on a private copy of the database; `commit` publishes it.
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<Database>,
    working: Database,
    store: MemoryStore,
}

impl MemoryTransaction {
    pub fn insert(&mut self, table: &str, row: Row) -> Result<Option<Value>, StorageError> {
        self.store.ensure_open()?;
        self.working.insert(table, row)
    }

    pub fn count(&self, table: &str) -> Result<usize, StorageError> {
        Ok(self.working.table(table)?.rows.len())
    }
}

#[async_trait]
impl Transaction for MemoryTransaction {
    async fn delete_where(&mut self, descriptor: &DeleteDescriptor) -> Result<u64, StorageError> {
        self.store.ensure_open()?;
        self.store.record(explain_delete(self.store.dialect, descriptor));
        self.working.delete(&descriptor.rows())
    }

    async fn destroy(&mut self, rows: &RowSet, _options: &PassThrough) -> Result<u64, StorageError> {
        self.store.ensure_open()?;
        self.store.record(explain_destroy(self.store.dialect, rows));
        self.working.delete(rows)
    }

    async fn commit(self) -> Result<(), StorageError> {
        self.store.ensure_open()?;
        let MemoryTransaction {
            mut guard, working, ..
        } = self;
        *guard = working;
        Ok(())
    }

    async fn rollback(self) -> Result<(), StorageError> {
        Ok(())
    }
}
