pub mod memory;
pub mod store;

pub use memory::{ForeignKey, MemoryStore, MemoryTransaction, Row, TableDef, row};
pub use store::{PassThrough, Storage, StorageError, Transaction, run_in_transaction};
