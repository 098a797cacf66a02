use serde::{Deserialize, Serialize};

use super::value::Value;


/// Rows of a table selected by a condition, never fetched eagerly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSet {
    pub table: String,
    pub condition: Condition,
}

impl RowSet {
    pub fn new(table: impl Into<String>, condition: Condition) -> Self {
        Self {
            table: table.into(),
            condition,
        }
    }

    pub fn select(self, column: impl Into<String>) -> Filter {
        Filter::Select(Box::new(Select {
            column: column.into(),
            from: self,
        }))
    }
}


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    In { column: String, filter: Filter },
    Equals(Vec<(String, Value)>),
}

impl Condition {
    pub fn column_in(column: impl Into<String>, filter: Filter) -> Self {
        Condition::In {
            column: column.into(),
            filter,
        }
    }
}


/// Right-hand side of a `column IN (...)` clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    Values(Vec<Value>),
    Select(Box<Select>),
}

impl Filter {
    /// Nesting depth of sub-queries; literal lists are depth 0.
    pub fn depth(&self) -> usize {
        match self {
            Filter::Values(_) => 0,
            Filter::Select(select) => match &select.from.condition {
                Condition::In { filter, .. } => 1 + filter.depth(),
                Condition::Equals(_) => 1,
            },
        }
    }
}


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Select {
    pub column: String,
    pub from: RowSet,
}
