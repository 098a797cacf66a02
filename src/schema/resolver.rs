use std::collections::HashMap;

use tracing::debug;

use super::entity::EntityType;
use super::relation::{EntityId, Relation, RelationKind};
use crate::core::config::ForeignKeyConvention;
use crate::core::error::{CascadeError, Result};


/// Resolves declared dependents into typed relations.
pub struct RelationResolver<'a> {
    entities: &'a [EntityType],
    index: &'a HashMap<String, EntityId>,
    convention: ForeignKeyConvention,
}

impl<'a> RelationResolver<'a> {
    pub fn new(
        entities: &'a [EntityType],
        index: &'a HashMap<String, EntityId>,
        convention: ForeignKeyConvention,
    ) -> Self {
        Self {
            entities,
            index,
            convention,
        }
    }

    /// Declaration order of `entity.dependents` is preserved.
    pub fn resolve(&self, entity: &EntityType) -> Result<Vec<Relation>> {
        if entity.dependents.is_empty() {
            return Ok(Vec::new());
        }

        entity
            .dependents
            .iter()
            .map(|name| self.resolve_one(entity, name))
            .collect()
    }

    fn resolve_one(&self, parent: &EntityType, name: &str) -> Result<Relation> {
        let def = parent
            .relations
            .get(name)
            .ok_or_else(|| CascadeError::UnknownRelation {
                entity: parent.name.clone(),
                relation: name.to_string(),
            })?;

        let target_id = *self
            .index
            .get(&def.target)
            .ok_or_else(|| CascadeError::UnknownEntity(def.target.clone()))?;
        let target = &self.entities[target_id.0];

        let foreign_key = def
            .foreign_key
            .clone()
            .unwrap_or_else(|| self.convention.foreign_key_for(&parent.name));

        let parent_key = def
            .foreign_key_target
            .clone()
            .or_else(|| parent.id_attribute.clone())
            .ok_or_else(|| {
                CascadeError::Config(format!(
                    "{}.{}: parent has no id attribute and no foreign key target",
                    parent.name, name
                ))
            })?;

        let table = match def.kind {
            RelationKind::AssociativeManyToMany => def
                .join_table
                .clone()
                .unwrap_or_else(|| default_join_table(&parent.table, &target.table)),
            _ => target.table.clone(),
        };

        debug!(
            "Resolved {}.{} -> {} ({}) on {}.{}",
            parent.name,
            name,
            target.name,
            <&'static str>::from(def.kind),
            table,
            foreign_key
        );

        Ok(Relation {
            name: name.to_string(),
            kind: def.kind,
            target: target_id,
            table,
            foreign_key,
            parent_key,
        })
    }
}


/// Both table names, sorted, joined by `_`.
pub fn default_join_table(left: &str, right: &str) -> String {
    let mut tables = [left, right];
    tables.sort_unstable();
    tables.join("_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RelationDef;

    fn index_of(entities: &[EntityType]) -> HashMap<String, EntityId> {
        entities
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.clone(), EntityId(i)))
            .collect()
    }

    fn entities() -> Vec<EntityType> {
        vec![
            EntityType::new("Author", "authors")
                .with_relation("posts", RelationDef::has_many("Post"))
                .with_relation("profile", RelationDef::has_one("Profile").foreign_key("owner"))
                .with_relation(
                    "badge",
                    RelationDef::belongs_to("Badge").foreign_key("holder").foreign_key_target("name"),
                )
                .with_relation("tags", RelationDef::belongs_to_many("Tag"))
                .with_dependents(&["profile", "posts", "tags", "badge"]),
            EntityType::new("Post", "posts"),
            EntityType::new("Profile", "profiles"),
            EntityType::new("Badge", "badges"),
            EntityType::new("Tag", "tags"),
        ]
    }

    #[test]
    fn test_no_dependents_is_terminal() {
        let entities = entities();
        let index = index_of(&entities);
        let resolver = RelationResolver::new(&entities, &index, ForeignKeyConvention::CamelCase);

        assert!(resolver.resolve(&entities[1]).unwrap().is_empty());
    }

    #[test]
    fn test_resolution_follows_declaration_order() {
        let entities = entities();
        let index = index_of(&entities);
        let resolver = RelationResolver::new(&entities, &index, ForeignKeyConvention::CamelCase);

        let names: Vec<String> = resolver
            .resolve(&entities[0])
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["profile", "posts", "tags", "badge"]);
    }

    #[test]
    fn test_keys_and_tables() {
        let entities = entities();
        let index = index_of(&entities);
        let resolver = RelationResolver::new(&entities, &index, ForeignKeyConvention::CamelCase);
        let relations = resolver.resolve(&entities[0]).unwrap();

        let profile = &relations[0];
        assert_eq!(profile.kind, RelationKind::OwningSingle);
        assert_eq!(profile.table, "profiles");
        assert_eq!(profile.foreign_key, "owner");
        assert_eq!(profile.parent_key, "id");

        let posts = &relations[1];
        assert_eq!(posts.foreign_key, "authorId");
        assert_eq!(posts.target, EntityId(1));

        let tags = &relations[2];
        assert!(tags.kind.is_associative());
        assert_eq!(tags.table, "authors_tags");
        assert_eq!(tags.foreign_key, "authorId");

        let badge = &relations[3];
        assert_eq!(badge.kind, RelationKind::BelongsToParent);
        assert_eq!(badge.foreign_key, "holder");
        assert_eq!(badge.parent_key, "name");
    }

    #[test]
    fn test_snake_case_convention() {
        let entities = entities();
        let index = index_of(&entities);
        let resolver = RelationResolver::new(&entities, &index, ForeignKeyConvention::SnakeCase);
        let relations = resolver.resolve(&entities[0]).unwrap();

        assert_eq!(relations[1].foreign_key, "author_id");
    }

    #[test]
    fn test_unknown_dependent_fails_loudly() {
        let entities = vec![EntityType::new("Author", "authors").with_dependents(&["ghosts"])];
        let index = index_of(&entities);
        let resolver = RelationResolver::new(&entities, &index, ForeignKeyConvention::CamelCase);

        let err = resolver.resolve(&entities[0]).unwrap_err();
        assert!(matches!(
            err,
            CascadeError::UnknownRelation { ref relation, .. } if relation == "ghosts"
        ));
    }

    #[test]
    fn test_unknown_target_fails() {
        let entities = vec![
            EntityType::new("Author", "authors")
                .with_relation("posts", RelationDef::has_many("Post"))
                .with_dependents(&["posts"]),
        ];
        let index = index_of(&entities);
        let resolver = RelationResolver::new(&entities, &index, ForeignKeyConvention::CamelCase);

        assert!(matches!(
            resolver.resolve(&entities[0]),
            Err(CascadeError::UnknownEntity(name)) if name == "Post"
        ));
    }

    #[test]
    fn test_parent_without_key_fails() {
        let entities = vec![
            EntityType::new("Link", "links")
                .without_id_attribute()
                .with_relation("notes", RelationDef::has_many("Note"))
                .with_dependents(&["notes"]),
            EntityType::new("Note", "notes"),
        ];
        let index = index_of(&entities);
        let resolver = RelationResolver::new(&entities, &index, ForeignKeyConvention::CamelCase);

        assert!(matches!(resolver.resolve(&entities[0]), Err(CascadeError::Config(_))));
    }

    #[test]
    fn test_default_join_table() {
        assert_eq!(default_join_table("posts", "tags"), "posts_tags");
        assert_eq!(default_join_table("tags", "posts"), "posts_tags");
    }
}
