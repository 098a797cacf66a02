use crate::core::error::{CascadeError, Result};
use crate::plan::{Condition, Filter, ParentRef, RowSet, Value};
use crate::schema::{EntityType, Record};


/// Root rows picked by equality filters rather than a loaded record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub entity: String,
    pub conditions: Vec<(String, Value)>,
}

impl Query {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            conditions: Vec::new(),
        }
    }

    pub fn where_eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((column.into(), value.into()));
        self
    }
}


/// The root of a destroy call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Record(Record),
    Query(Query),
}

impl Target {
    pub fn entity(&self) -> &str {
        match self {
            Target::Record(record) => &record.entity,
            Target::Query(query) => &query.entity,
        }
    }

    /// Parent reference the plan is built from.
    pub fn parent_ref(&self, entity: &EntityType) -> Result<ParentRef> {
        match self {
            Target::Record(record) => Ok(ParentRef::Record(record.clone())),
            Target::Query(_) => Ok(ParentRef::Rows(self.rows(entity)?)),
        }
    }

    /// Rows removed by the final, non-cascading delete.
    pub fn rows(&self, entity: &EntityType) -> Result<RowSet> {
        match self {
            Target::Record(record) => {
                let id_attribute = entity.id_attribute.as_deref().ok_or_else(|| {
                    CascadeError::Config(format!(
                        "{} has no id attribute; destroy it through a query",
                        entity.name
                    ))
                })?;
                let id = record
                    .get(id_attribute)
                    .ok_or_else(|| CascadeError::MissingParentKey {
                        entity: entity.name.clone(),
                        attribute: id_attribute.to_string(),
                    })?;

                Ok(RowSet::new(
                    entity.table.clone(),
                    Condition::column_in(id_attribute, Filter::Values(vec![id.clone()])),
                ))
            }
            Target::Query(query) => {
                if query.conditions.is_empty() {
                    return Err(CascadeError::UnfilteredRoot(entity.name.clone()));
                }
                Ok(RowSet::new(
                    entity.table.clone(),
                    Condition::Equals(query.conditions.clone()),
                ))
            }
        }
    }
}

impl From<Record> for Target {
    fn from(record: Record) -> Self {
        Target::Record(record)
    }
}

impl From<Query> for Target {
    fn from(query: Query) -> Self {
        Target::Query(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author() -> EntityType {
        EntityType::new("Author", "authors").with_id_attribute("author_id")
    }

    #[test]
    fn test_record_rows_use_id() {
        let target = Target::from(Record::new("Author").with("author_id", 5));
        let rows = target.rows(&author()).unwrap();

        assert_eq!(rows.table, "authors");
        assert_eq!(
            rows.condition,
            Condition::column_in("author_id", Filter::Values(vec![Value::Int(5)]))
        );
    }

    #[test]
    fn test_unsaved_record_fails() {
        let target = Target::from(Record::new("Author").with("name", "foo"));
        assert!(matches!(
            target.rows(&author()),
            Err(CascadeError::MissingParentKey { .. })
        ));
    }

    #[test]
    fn test_unfiltered_query_rejected() {
        let target = Target::from(Query::new("Author"));
        assert!(matches!(
            target.parent_ref(&author()),
            Err(CascadeError::UnfilteredRoot(_))
        ));
    }

    #[test]
    fn test_query_parent_ref_is_lazy() {
        let target = Target::from(Query::new("Author").where_eq("name", "foo"));
        let parent = target.parent_ref(&author()).unwrap();

        assert_eq!(
            parent,
            ParentRef::Rows(RowSet::new(
                "authors",
                Condition::Equals(vec![("name".to_string(), Value::from("foo"))])
            ))
        );
    }
}
