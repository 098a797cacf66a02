

use std::path::Path;

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};

use super::error::Result;
use crate::sql::Dialect;


#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ForeignKeyConvention {
    /// `Author` -> `authorId`
    #[default]
    CamelCase,
    /// `Author` -> `author_id`
    SnakeCase,
}

impl ForeignKeyConvention {
    pub fn foreign_key_for(self, parent_type: &str) -> String {
        match self {
            Self::CamelCase => format!("{}Id", parent_type.to_case(Case::Camel)),
            Self::SnakeCase => format!("{}_id", parent_type.to_case(Case::Snake)),
        }
    }
}


#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    pub dialect: Dialect,
    pub max_depth: usize,
    pub foreign_key_convention: ForeignKeyConvention,
}

impl CascadeConfig {

    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            max_depth: crate::DEFAULT_MAX_DEPTH,
            foreign_key_convention: ForeignKeyConvention::default(),
        }
    }


    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dialect) = std::env::var("CASCADE_DIALECT")
            .ok()
            .and_then(|d| d.parse().ok())
        {
            config.dialect = dialect;
        }
        if let Some(depth) = std::env::var("CASCADE_MAX_DEPTH")
            .ok()
            .and_then(|d| d.parse().ok())
        {
            config.max_depth = depth;
        }
        if let Some(convention) = std::env::var("CASCADE_FOREIGN_KEY_CONVENTION")
            .ok()
            .and_then(|c| c.parse().ok())
        {
            config.foreign_key_convention = convention;
        }

        config
    }

    /// Layers an optional config file under `CASCADE_*` environment variables.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CASCADE").try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self::new(Dialect::default())
    }
}
