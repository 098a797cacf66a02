pub mod entity;
pub mod registry;
pub mod relation;
pub mod resolver;

pub use entity::{EntityType, Record};
pub use registry::{Schema, SchemaBuilder, SchemaDocument};
pub use relation::{EntityId, Relation, RelationDef, RelationKind};
pub use resolver::{RelationResolver, default_join_table};
