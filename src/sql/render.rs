use serde::Serialize;

use super::dialect::Dialect;
use crate::plan::{Condition, DeleteDescriptor, Filter, RowSet, Value};


/// SQL text with its bound parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    Parameters,
    Inline,
}

struct Renderer {
    dialect: Dialect,
    binding: Binding,
    sql: String,
    params: Vec<Value>,
}

impl Renderer {
    fn new(dialect: Dialect, binding: Binding) -> Self {
        Self {
            dialect,
            binding,
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    fn ident(&mut self, ident: &str) {
        let quoted = self.dialect.quote_ident(ident);
        self.sql.push_str(&quoted);
    }

    fn value(&mut self, value: &Value) {
        match self.binding {
            Binding::Inline => {
                let literal = self.dialect.literal(value);
                self.sql.push_str(&literal);
            }
            Binding::Parameters => {
                self.params.push(value.clone());
                let placeholder = self.dialect.placeholder(self.params.len());
                self.sql.push_str(&placeholder);
            }
        }
    }

    fn delete_from(&mut self, rows: &RowSet) {
        self.push("DELETE FROM ");
        self.ident(&rows.table);
        self.push(" WHERE ");
        self.condition(&rows.condition);
    }

    fn condition(&mut self, condition: &Condition) {
        match condition {
            Condition::In { column, filter } => {
                self.ident(column);
                self.push(" IN (");
                self.filter(filter);
                self.push(")");
            }
            Condition::Equals(pairs) if pairs.is_empty() => self.push("1 = 1"),
            Condition::Equals(pairs) => {
                for (i, (column, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        self.push(" AND ");
                    }
                    self.ident(column);
                    self.push(" = ");
                    self.value(value);
                }
            }
        }
    }

    fn filter(&mut self, filter: &Filter) {
        match filter {
            Filter::Values(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.value(value);
                }
            }
            Filter::Select(select) => {
                self.push("SELECT ");
                self.ident(&select.column);
                self.push(" FROM ");
                self.ident(&select.from.table);
                self.push(" WHERE ");
                self.condition(&select.from.condition);
            }
        }
    }

    fn finish(self) -> Statement {
        Statement {
            sql: self.sql,
            params: self.params,
        }
    }
}


pub fn render_delete(dialect: Dialect, descriptor: &DeleteDescriptor) -> Statement {
    render_destroy(dialect, &descriptor.rows())
}

pub fn render_destroy(dialect: Dialect, rows: &RowSet) -> Statement {
    let mut renderer = Renderer::new(dialect, Binding::Parameters);
    renderer.delete_from(rows);
    renderer.finish()
}

/// Literal-inlined SQL for logs and explain output. Never execute it.
pub fn explain_delete(dialect: Dialect, descriptor: &DeleteDescriptor) -> String {
    explain_destroy(dialect, &descriptor.rows())
}

pub fn explain_destroy(dialect: Dialect, rows: &RowSet) -> String {
    let mut renderer = Renderer::new(dialect, Binding::Inline);
    renderer.delete_from(rows);
    renderer.finish().sql
}
