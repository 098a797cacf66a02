use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};


/// Index of an entity type inside a built `Schema`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) usize);


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RelationKind {
    OwningSingle,
    OwningMany,
    BelongsToParent,
    AssociativeManyToMany,
}

impl RelationKind {
    pub fn is_associative(self) -> bool {
        matches!(self, Self::AssociativeManyToMany)
    }

    /// Whether planning recurses into the target's own dependents.
    pub fn cascades(self) -> bool {
        !self.is_associative()
    }
}


/// A relation as declared on an entity type, before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDef {
    pub kind: RelationKind,
    pub target: String,
    #[serde(default)]
    pub foreign_key: Option<String>,
    /// Parent column the foreign key references, when it is not the id attribute.
    #[serde(default)]
    pub foreign_key_target: Option<String>,
    #[serde(default)]
    pub join_table: Option<String>,
}

impl RelationDef {
    fn of(kind: RelationKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            foreign_key: None,
            foreign_key_target: None,
            join_table: None,
        }
    }

    pub fn has_one(target: impl Into<String>) -> Self {
        Self::of(RelationKind::OwningSingle, target)
    }

    pub fn has_many(target: impl Into<String>) -> Self {
        Self::of(RelationKind::OwningMany, target)
    }

    pub fn belongs_to(target: impl Into<String>) -> Self {
        Self::of(RelationKind::BelongsToParent, target)
    }

    /// Only rows of `join_table` are ever deleted for this relation.
    pub fn belongs_to_many(target: impl Into<String>) -> Self {
        Self::of(RelationKind::AssociativeManyToMany, target)
    }

    pub fn foreign_key(mut self, column: impl Into<String>) -> Self {
        self.foreign_key = Some(column.into());
        self
    }

    pub fn foreign_key_target(mut self, column: impl Into<String>) -> Self {
        self.foreign_key_target = Some(column.into());
        self
    }

    pub fn join_table(mut self, table: impl Into<String>) -> Self {
        self.join_table = Some(table.into());
        self
    }
}


/// A resolved dependent edge, ready for planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub name: String,
    pub kind: RelationKind,
    pub target: EntityId,
    /// Target table, or the join table for associative relations.
    pub table: String,
    /// Column in `table` that references the parent.
    pub foreign_key: String,
    /// Parent column referenced by `foreign_key`.
    pub parent_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_associative_stops_recursion() {
        assert!(RelationKind::OwningSingle.cascades());
        assert!(RelationKind::OwningMany.cascades());
        assert!(RelationKind::BelongsToParent.cascades());
        assert!(!RelationKind::AssociativeManyToMany.cascades());
    }

    #[test]
    fn test_relation_def_from_json() {
        let def: RelationDef = serde_json::from_str(
            r#"{ "kind": "associative_many_to_many", "target": "Tag", "join_table": "TagPost", "foreign_key": "postId" }"#,
        )
        .unwrap();

        assert_eq!(
            def,
            RelationDef::belongs_to_many("Tag").join_table("TagPost").foreign_key("postId")
        );
    }
}
