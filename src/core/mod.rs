

pub mod config;
pub mod error;

pub use config::{CascadeConfig, ForeignKeyConvention};
pub use error::{CascadeError, Result};
