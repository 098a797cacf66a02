use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::entity::EntityType;
use super::relation::{EntityId, Relation};
use super::resolver::RelationResolver;
use crate::core::config::ForeignKeyConvention;
use crate::core::error::{CascadeError, Result};


/// Serialized form of a schema, as read by the explain tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub foreign_key_convention: Option<ForeignKeyConvention>,
    pub entities: Vec<EntityType>,
}


/// Every registered entity type with its relations resolved once, up front.
#[derive(Debug, Clone)]
pub struct Schema {
    entities: Vec<EntityType>,
    index: HashMap<String, EntityId>,
    relations: Vec<Vec<Relation>>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn from_document(document: SchemaDocument, convention: ForeignKeyConvention) -> Result<Self> {
        let mut builder = Self::builder()
            .with_convention(document.foreign_key_convention.unwrap_or(convention));
        for entity in document.entities {
            builder = builder.register(entity);
        }
        builder.build()
    }

    pub fn from_json(json: &str, convention: ForeignKeyConvention) -> Result<Self> {
        let document: SchemaDocument = serde_json::from_str(json)?;
        Self::from_document(document, convention)
    }

    pub fn lookup(&self, name: &str) -> Result<EntityId> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| CascadeError::UnknownEntity(name.to_string()))
    }

    pub fn entity(&self, id: EntityId) -> &EntityType {
        &self.entities[id.0]
    }

    pub fn relations(&self, id: EntityId) -> &[Relation] {
        &self.relations[id.0]
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}


#[derive(Debug, Default)]
pub struct SchemaBuilder {
    entities: Vec<EntityType>,
    convention: ForeignKeyConvention,
}

impl SchemaBuilder {
    pub fn with_convention(mut self, convention: ForeignKeyConvention) -> Self {
        self.convention = convention;
        self
    }

    pub fn register(mut self, entity: EntityType) -> Self {
        self.entities.push(entity);
        self
    }

    /// Resolves every entity's dependents; any bad declaration fails the build.
    pub fn build(self) -> Result<Schema> {
        let mut index = HashMap::with_capacity(self.entities.len());
        for (i, entity) in self.entities.iter().enumerate() {
            if index.insert(entity.name.clone(), EntityId(i)).is_some() {
                return Err(CascadeError::DuplicateEntity(entity.name.clone()));
            }
        }

        let resolver = RelationResolver::new(&self.entities, &index, self.convention);
        let relations = self
            .entities
            .iter()
            .map(|entity| resolver.resolve(entity))
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Schema built: {} entity types, {} dependent relations",
            self.entities.len(),
            relations.iter().map(Vec::len).sum::<usize>()
        );

        Ok(Schema {
            entities: self.entities,
            index,
            relations,
        })
    }
}
