

use thiserror::Error;

use crate::db::StorageError;


#[derive(Error, Debug)]
pub enum CascadeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown entity type: {0}")]
    UnknownEntity(String),

    #[error("Entity type registered twice: {0}")]
    DuplicateEntity(String),

    #[error("{entity} declares dependent \"{relation}\" but defines no such relation")]
    UnknownRelation { entity: String, relation: String },

    #[error("Missing relation parent id attribute \"{attribute}\" for cascade")]
    MissingParentKey { entity: String, attribute: String },

    #[error("Empty identifier list for {0}")]
    EmptyParentRef(String),

    #[error("Refusing to cascade from an unfiltered query on {0}")]
    UnfilteredRoot(String),

    #[error("Cyclic dependency declaration: {}", path.join(" -> "))]
    CyclicDependency { path: Vec<String> },

    #[error("Dependency graph of {entity} exceeds {max_depth} levels")]
    DepthExceeded { entity: String, max_depth: usize },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CascadeError {
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::Storage(_) | Self::Serialization(_))
    }
}

impl From<config::ConfigError> for CascadeError {
    fn from(e: config::ConfigError) -> Self {
        CascadeError::Config(e.to_string())
    }
}


pub type Result<T> = std::result::Result<T, CascadeError>;
