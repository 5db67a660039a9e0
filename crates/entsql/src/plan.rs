//! Dialect-neutral query plans.

use crate::column::{ColumnDescriptor, EntityShape, OperationType};
use crate::column_map::ColumnMap;
use crate::error::{CompileError, CompileResult};
use crate::router::route;
use crate::settings::RoutingOptions;

/// Table an entity maps to.
///
/// # Example
/// ```
/// use entsql::TableInfo;
///
/// let t = TableInfo::new("dbo.LineItems").with_alias("li").with_source_type("Shop.LineItem");
/// assert_eq!(t.alias(), Some("li"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableInfo {
    name: String,
    alias: Option<String>,
    source_type: String,
}

impl TableInfo {
    /// A table whose declared source type defaults to the table name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            source_type: name.clone(),
            name,
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Type name of the entity mapped to this table, used in diagnostics.
    pub fn with_source_type(mut self, source_type: impl Into<String>) -> Self {
        self.source_type = source_type.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn source_type(&self) -> &str {
        &self.source_type
    }
}

/// Rendering knobs carried by a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanKnobs {
    pub dirty_reads: bool,
    /// `Some` only when read limiting is enabled.
    pub read_limit: Option<u32>,
    pub encapsulate_identifiers: bool,
}

/// Everything the renderer needs, with no dialect syntax decided yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    operation: OperationType,
    shape: EntityShape,
    table: String,
    table_alias: Option<String>,
    source_type: String,
    predicate: ColumnMap,
    payload: ColumnMap,
    knobs: PlanKnobs,
}

impl QueryPlan {
    /// Validate inputs, route the columns and collect the knobs.
    ///
    /// Exists always plans a dirty read.
    pub fn build(
        operation: OperationType,
        shape: EntityShape,
        columns: &[ColumnDescriptor],
        table: &TableInfo,
        options: &RoutingOptions,
    ) -> CompileResult<Self> {
        if table.name().trim().is_empty() {
            return Err(CompileError::invalid_argument("Table name cannot be empty"));
        }
        if table.name().contains('\0') {
            return Err(CompileError::invalid_argument(
                "Table name cannot contain NUL character",
            ));
        }
        if columns.is_empty() {
            return Err(CompileError::invalid_argument(format!(
                "No column metadata supplied for '{}'",
                table.source_type()
            )));
        }
        for column in columns {
            column.validate()?;
        }
        if options.read_limit_enabled && options.read_limit == 0 {
            return Err(CompileError::invalid_argument(
                "Read limit must be greater than zero when enabled",
            ));
        }

        let table_alias = options
            .table_alias
            .as_deref()
            .or(table.alias())
            .filter(|a| !a.trim().is_empty())
            .map(str::to_string);

        let routed = route(operation, shape, columns, options);

        Ok(Self {
            operation,
            shape,
            table: table.name().to_string(),
            table_alias,
            source_type: table.source_type().to_string(),
            predicate: routed.predicate,
            payload: routed.payload,
            knobs: PlanKnobs {
                dirty_reads: options.dirty_reads || operation == OperationType::Exists,
                read_limit: options.read_limit_enabled.then_some(options.read_limit),
                encapsulate_identifiers: options.encapsulate_identifiers,
            },
        })
    }

    pub fn operation(&self) -> OperationType {
        self.operation
    }

    pub fn shape(&self) -> EntityShape {
        self.shape
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn table_alias(&self) -> Option<&str> {
        self.table_alias.as_deref()
    }

    pub fn source_type(&self) -> &str {
        &self.source_type
    }

    pub fn predicate(&self) -> &ColumnMap {
        &self.predicate
    }

    pub fn payload(&self) -> &ColumnMap {
        &self.payload
    }

    pub fn knobs(&self) -> PlanKnobs {
        self.knobs
    }
}
