use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::relation::RelationDef;
use crate::plan::Value;


/// A record kind: its table, identifying column and declared dependents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityType {
    pub name: String,
    pub table: String,
    #[serde(default = "default_id_attribute")]
    pub id_attribute: Option<String>,
    /// Relation names to cascade into, in the order they are planned.
    #[serde(default)]
    pub dependents: Vec<String>,
    #[serde(default)]
    pub relations: BTreeMap<String, RelationDef>,
}

fn default_id_attribute() -> Option<String> {
    Some("id".to_string())
}

impl EntityType {

    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            id_attribute: default_id_attribute(),
            dependents: Vec::new(),
            relations: BTreeMap::new(),
        }
    }


    pub fn with_id_attribute(mut self, id_attribute: impl Into<String>) -> Self {
        self.id_attribute = Some(id_attribute.into());
        self
    }

    /// Pure join types have no identifying column.
    pub fn without_id_attribute(mut self) -> Self {
        self.id_attribute = None;
        self
    }


    pub fn with_relation(mut self, name: impl Into<String>, relation: RelationDef) -> Self {
        self.relations.insert(name.into(), relation);
        self
    }


    pub fn with_dependents(mut self, dependents: &[&str]) -> Self {
        self.dependents = dependents.iter().map(|d| d.to_string()).collect();
        self
    }
}


/// A loaded row of some entity type; only the columns the caller knows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub entity: String,
    pub values: BTreeMap<String, Value>,
}

impl Record {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(column.into(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }
}
