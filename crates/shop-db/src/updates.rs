//! # Partial Update SQL
//!
//! Turns a [`FieldUpdates`] list into `UPDATE <table> SET col = $n, ...`.
//! Column names come from `&'static str` literals in the domain code;
//! every value is a bind parameter.

use shop_core::{FieldUpdates, FieldValue};
use sqlx::{Postgres, QueryBuilder};

/// Start an `UPDATE` for `updates`. The caller appends the `WHERE` clause.
pub fn update_statement(table: &'static str, updates: &FieldUpdates) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("UPDATE {} SET ", table));
    {
        let mut assignments = builder.separated(", ");
        for (column, value) in updates.iter() {
            assignments.push(column);
            assignments.push_unseparated(" = ");
            match value {
                FieldValue::Text(v) => assignments.push_bind_unseparated(v.clone()),
                FieldValue::OptionalText(v) => assignments.push_bind_unseparated(v.clone()),
                FieldValue::Bool(v) => assignments.push_bind_unseparated(*v),
            };
        }
    }
    builder
}
