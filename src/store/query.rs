#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

use serde_json::Value;

/// Name of the primary key column every table carries.
pub const ID_FIELD: &str = "Id";

/// A field requested from the store, optionally pulled through a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Column name in the store.
    pub name:            String,
    /// For reference columns, the field of the referenced record to include
    /// alongside its id.
    pub reference_field: Option<String>,
}

impl FieldSpec {
    /// A plain column.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:            name.into(),
            reference_field: None,
        }
    }

    /// A reference column, expanded to `{Id, <field>}` of the referenced
    /// record.
    pub fn reference(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name:            name.into(),
            reference_field: Some(field.into()),
        }
    }
}

/// Comparison operators understood by the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `field == value`
    EqualTo,
    /// `field != value`
    NotEqualTo,
    /// `field > value`
    GreaterThan,
    /// `field >= value`
    GreaterThanOrEqualTo,
    /// `field < value`
    LessThan,
    /// `field <= value`
    LessThanOrEqualTo,
}

/// A single `field <op> value` condition. All filters of a query must hold.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Column the condition applies to.
    pub field:    String,
    /// Comparison to apply.
    pub operator: Operator,
    /// Right-hand side of the comparison.
    pub value:    Value,
}

impl Filter {
    /// Creates a new filter.
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Returns the value as it appears in a query string; strings are used
    /// verbatim, everything else is JSON-encoded.
    pub fn value_text(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:?} {}", self.field, self.operator, self.value_text())
    }
}

/// Field list and conditions for a read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchParams {
    /// Fields to return.
    pub fields:  Vec<FieldSpec>,
    /// Conditions every returned record satisfies.
    pub filters: Vec<Filter>,
}

impl FetchParams {
    /// Creates params that return `fields` with no conditions.
    pub fn new<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = FieldSpec>,
    {
        Self {
            fields:  fields.into_iter().collect(),
            filters: Vec::new(),
        }
    }

    /// Adds a condition.
    pub fn filter(
        mut self,
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<Value>,
    ) -> Self {
        self.filters.push(Filter::new(field, operator, value));
        self
    }

    /// Builds a PostgREST `select` clause. `Id` always comes first; reference
    /// fields are embedded as `name(Id,field)`.
    pub fn select_clause(&self) -> String {
        let mut columns = vec![ID_FIELD.to_string()];
        for spec in &self.fields {
            if spec.name == ID_FIELD {
                continue;
            }
            match &spec.reference_field {
                Some(field) => columns.push(format!("{}({ID_FIELD},{field})", spec.name)),
                None => columns.push(spec.name.clone()),
            }
        }
        columns.join(",")
    }
}
