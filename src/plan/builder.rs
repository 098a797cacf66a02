use tracing::debug;

use super::descriptor::{DeleteDescriptor, DeletePlan};
use super::parent::{ParentRef, resolve_parent_value};
use crate::core::config::CascadeConfig;
use crate::core::error::{CascadeError, Result};
use crate::schema::{EntityId, Schema};


/// Walks a schema's dependent relations into a leaf-first delete plan.
pub struct PlanBuilder<'s> {
    schema: &'s Schema,
    max_depth: usize,
}

impl<'s> PlanBuilder<'s> {
    pub fn new(schema: &'s Schema, config: &CascadeConfig) -> Self {
        Self {
            schema,
            max_depth: config.max_depth,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn build(&self, entity: EntityId, parent: &ParentRef) -> Result<DeletePlan> {
        let mut path = vec![entity];
        let mut descriptors = Vec::new();

        self.walk(entity, parent, &mut path, &mut descriptors)?;

        // Emitted parent-before-child; execution needs the reverse.
        descriptors.reverse();

        debug!(
            "Planned {} deletes for {}: {:?}",
            descriptors.len(),
            self.schema.entity(entity).name,
            descriptors.iter().map(|d| d.table.as_str()).collect::<Vec<_>>()
        );

        Ok(DeletePlan::new(descriptors))
    }

    fn walk(
        &self,
        entity: EntityId,
        parent: &ParentRef,
        path: &mut Vec<EntityId>,
        out: &mut Vec<DeleteDescriptor>,
    ) -> Result<()> {
        let entity_type = self.schema.entity(entity);

        // the root is level 0
        if path.len() - 1 > self.max_depth {
            return Err(CascadeError::DepthExceeded {
                entity: entity_type.name.clone(),
                max_depth: self.max_depth,
            });
        }

        for relation in self.schema.relations(entity) {
            let filter = resolve_parent_value(entity_type, parent, &relation.parent_key)?;
            let descriptor = DeleteDescriptor::new(relation.table.clone(), relation.foreign_key.clone(), filter);
            let rows = descriptor.rows();
            out.push(descriptor);

            if !relation.kind.cascades() {
                continue;
            }

            if path.contains(&relation.target) {
                let mut names: Vec<String> = path
                    .iter()
                    .map(|id| self.schema.entity(*id).name.clone())
                    .collect();
                names.push(self.schema.entity(relation.target).name.clone());
                return Err(CascadeError::CyclicDependency { path: names });
            }

            path.push(relation.target);
            self.walk(relation.target, &ParentRef::Rows(rows), path, out)?;
            path.pop();
        }

        Ok(())
    }
}
