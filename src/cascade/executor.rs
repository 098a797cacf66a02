use std::sync::Arc;

use tracing::{debug, info, warn};

use super::models::{CascadeReport, DestroyOptions};
use super::target::Target;
use crate::core::config::CascadeConfig;
use crate::core::error::Result;
use crate::db::{PassThrough, Storage, Transaction, run_in_transaction};
use crate::plan::{DeletePlan, PlanBuilder, RowSet};
use crate::schema::Schema;
use crate::sql::{explain_delete, explain_destroy};


/// Plans and runs cascading deletes against one storage backend.
pub struct CascadeExecutor<S> {
    storage: S,
    schema: Arc<Schema>,
    config: CascadeConfig,
}

impl<S: Storage> CascadeExecutor<S> {
    pub fn new(storage: S, schema: Arc<Schema>, config: CascadeConfig) -> Self {
        info!(
            "Initializing CascadeExecutor ({}, max depth {})",
            <&'static str>::from(config.dialect),
            config.max_depth
        );
        Self {
            storage,
            schema,
            config,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn config(&self) -> &CascadeConfig {
        &self.config
    }


    pub fn plan(&self, target: &Target) -> Result<DeletePlan> {
        let entity = self.schema.lookup(target.entity())?;
        let parent = target.parent_ref(self.schema.entity(entity))?;
        PlanBuilder::new(&self.schema, &self.config).build(entity, &parent)
    }

    /// Inline SQL for every statement `destroy` would run, root delete last.
    pub fn explain(&self, target: &Target) -> Result<Vec<String>> {
        let entity = self.schema.lookup(target.entity())?;
        let rows = target.rows(self.schema.entity(entity))?;
        let plan = self.plan(target)?;

        let mut statements: Vec<String> = plan
            .iter()
            .map(|descriptor| explain_delete(self.config.dialect, descriptor))
            .collect();
        statements.push(explain_destroy(self.config.dialect, &rows));
        Ok(statements)
    }


    pub async fn destroy(&self, target: &Target, options: DestroyOptions<'_, S::Tx>) -> Result<CascadeReport> {
        let entity = self.schema.lookup(target.entity())?;
        let entity_type = self.schema.entity(entity);
        let rows = target.rows(entity_type)?;

        let DestroyOptions {
            cascade_delete,
            transacting,
            extra,
        } = options;

        if !cascade_delete {
            debug!("Cascade disabled, destroying {} only", entity_type.name);
            let root_deleted = match transacting {
                Some(tx) => tx.destroy(&rows, &extra).await?,
                None => self.storage.destroy(&rows, &extra).await?,
            };
            return Ok(CascadeReport::root_only(&entity_type.name, root_deleted));
        }

        let plan = PlanBuilder::new(&self.schema, &self.config)
            .build(entity, &target.parent_ref(entity_type)?)?;
        let statements = plan.len() + 1;

        let (dependents_deleted, root_deleted) = match transacting {
            Some(tx) => {
                debug!("Cascading {} inside caller transaction", entity_type.name);
                apply_cascade(tx, &plan, &rows, &extra).await?
            }
            None => {
                run_in_transaction(&self.storage, move |tx| {
                    Box::pin(async move { apply_cascade(tx, &plan, &rows, &extra).await })
                })
                .await?
            }
        };

        info!(
            "Cascade delete of {} completed: {} statements, {} dependent rows, {} root rows",
            entity_type.name, statements, dependents_deleted, root_deleted
        );

        Ok(CascadeReport::cascaded(
            &entity_type.name,
            statements,
            dependents_deleted,
            root_deleted,
        ))
    }
}


/// Runs the plan leaf-first, then the root delete, stopping at the first error.
async fn apply_cascade<T: Transaction>(
    tx: &mut T,
    plan: &DeletePlan,
    root: &RowSet,
    options: &PassThrough,
) -> Result<(u64, u64)> {
    let mut dependents_deleted = 0;

    for (step, descriptor) in plan.iter().enumerate() {
        match tx.delete_where(descriptor).await {
            Ok(removed) => {
                debug!(
                    "Step {}/{}: removed {} rows from {}",
                    step + 1,
                    plan.len(),
                    removed,
                    descriptor.table
                );
                dependents_deleted += removed;
            }
            Err(e) => {
                warn!("Cascade step {} on {} failed: {}", step + 1, descriptor.table, e);
                return Err(e.into());
            }
        }
    }

    let root_deleted = tx.destroy(root, options).await?;
    Ok((dependents_deleted, root_deleted))
}
