use crate::core::error::{CascadeError, Result};
use crate::schema::{EntityType, Record};

use super::filter::{Condition, Filter, RowSet};
use super::value::Value;


/// What identifies the parent rows whose dependents are being planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentRef {
    Id(Value),
    Ids(Vec<Value>),
    Record(Record),
    Rows(RowSet),
}

impl From<Value> for ParentRef {
    fn from(value: Value) -> Self {
        ParentRef::Id(value)
    }
}

impl From<RowSet> for ParentRef {
    fn from(rows: RowSet) -> Self {
        ParentRef::Rows(rows)
    }
}


/// Turns `parent` into a filter over the parent's `column`, embeddable in
/// `WHERE fk IN (...)`. Row sets stay sub-queries; nothing is fetched.
pub fn resolve_parent_value(entity: &EntityType, parent: &ParentRef, column: &str) -> Result<Filter> {
    match parent {
        ParentRef::Id(id) => by_ids(entity, std::slice::from_ref(id), column),
        ParentRef::Ids(ids) => by_ids(entity, ids, column),
        ParentRef::Record(record) => {
            if let Some(value) = record.get(column) {
                return Ok(Filter::Values(vec![value.clone()]));
            }

            match entity.id_attribute.as_deref() {
                Some(id_attribute) if id_attribute != column => match record.get(id_attribute) {
                    Some(id) => by_ids(entity, std::slice::from_ref(id), column),
                    None => Err(missing_key(entity, column)),
                },
                _ => Err(missing_key(entity, column)),
            }
        }
        ParentRef::Rows(rows) => Ok(rows.clone().select(column)),
    }
}

fn by_ids(entity: &EntityType, ids: &[Value], column: &str) -> Result<Filter> {
    if ids.is_empty() {
        return Err(CascadeError::EmptyParentRef(entity.name.clone()));
    }

    let id_attribute = entity
        .id_attribute
        .as_deref()
        .ok_or_else(|| missing_key(entity, column))?;

    if id_attribute == column {
        return Ok(Filter::Values(ids.to_vec()));
    }

    Ok(RowSet::new(
        entity.table.clone(),
        Condition::column_in(id_attribute, Filter::Values(ids.to_vec())),
    )
    .select(column))
}

fn missing_key(entity: &EntityType, column: &str) -> CascadeError {
    CascadeError::MissingParentKey {
        entity: entity.name.clone(),
        attribute: column.to_string(),
    }
}
