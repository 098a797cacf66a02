use serde::{Deserialize, Serialize};

use super::filter::{Condition, Filter, RowSet};


/// Delete every row of `table` whose `column` is in `filter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteDescriptor {
    pub table: String,
    pub column: String,
    pub filter: Filter,
}

impl DeleteDescriptor {
    pub fn new(table: impl Into<String>, column: impl Into<String>, filter: Filter) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            filter,
        }
    }

    /// The rows this descriptor removes, as a lazy row set.
    pub fn rows(&self) -> RowSet {
        RowSet::new(
            self.table.clone(),
            Condition::column_in(self.column.clone(), self.filter.clone()),
        )
    }
}


/// Leaf-first sequence of deletes. The root's own delete is never part of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePlan {
    descriptors: Vec<DeleteDescriptor>,
}

impl DeletePlan {
    pub fn new(descriptors: Vec<DeleteDescriptor>) -> Self {
        Self { descriptors }
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeleteDescriptor> {
        self.descriptors.iter()
    }

    pub fn tables(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.table.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a DeletePlan {
    type Item = &'a DeleteDescriptor;
    type IntoIter = std::slice::Iter<'a, DeleteDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}

impl IntoIterator for DeletePlan {
    type Item = DeleteDescriptor;
    type IntoIter = std::vec::IntoIter<DeleteDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.into_iter()
    }
}
