pub mod cascade;
pub mod core;
pub mod db;
pub mod plan;
pub mod schema;
pub mod sql;

#[cfg(test)]
pub(crate) mod fixtures;


pub use cascade::{CascadeExecutor, CascadeReport, DestroyOptions, Query, Target};
pub use crate::core::config::{CascadeConfig, ForeignKeyConvention};
pub use crate::core::error::{CascadeError, Result};
pub use db::{MemoryStore, Storage, StorageError, Transaction};
pub use plan::{DeleteDescriptor, DeletePlan, ParentRef, PlanBuilder, Value};
pub use schema::{EntityType, Record, RelationDef, RelationKind, Schema};
pub use sql::Dialect;


pub const DEFAULT_MAX_DEPTH: usize = 32;
