use crate::column::{ColumnDescriptor, EntityShape, OperationType};
use crate::error::CompileResult;
use crate::plan::{QueryPlan, TableInfo};
use crate::query::RenderedQuery;
use crate::render::render;
use crate::settings::RoutingOptions;

/// Compile one statement for an entity.
///
/// Deterministic and side-effect free (apart from `tracing` events): the same
/// inputs always yield the same SQL text and parameter order, so results may
/// be memoized by the caller (see [`StatementCache`](crate::StatementCache)).
///
/// # Example
/// ```
/// use entsql::{compile, ColumnDescriptor, DbType, EntityShape, OperationType, RoutingOptions, TableInfo};
///
/// let columns = [
///     ColumnDescriptor::new("Id", DbType::Int64).primary_key(),
///     ColumnDescriptor::new("Name", DbType::Text),
/// ];
/// let q = compile(
///     OperationType::Update,
///     EntityShape::SingleEntity,
///     &columns,
///     &TableInfo::new("T"),
///     &RoutingOptions::new(),
/// )?;
/// assert_eq!(q.sql(), "UPDATE T SET Name = @Name WHERE Id = @Id");
/// assert_eq!(q.parameter_names(), ["@Name", "@Id"]);
/// # Ok::<(), entsql::CompileError>(())
/// ```
pub fn compile(
    operation: OperationType,
    shape: EntityShape,
    columns: &[ColumnDescriptor],
    table: &TableInfo,
    options: &RoutingOptions,
) -> CompileResult<RenderedQuery> {
    let dialect = options.dialect.dialect();
    let result = QueryPlan::build(operation, shape, columns, table, options)
        .and_then(|plan| render(&plan, dialect))
        .map(|q| q.with_command_timeout(options.command_timeout));

    #[cfg(feature = "tracing")]
    match &result {
        Ok(q) => tracing::debug!(
            target: "entsql.compile",
            operation = %operation,
            shape = %shape,
            table = table.name(),
            dialect = dialect.name(),
            params = q.parameters().len(),
            sql = q.sql(),
            "compiled statement"
        ),
        Err(e) => tracing::warn!(
            target: "entsql.compile",
            operation = %operation,
            shape = %shape,
            source_type = table.source_type(),
            error = %e,
            "compile failed"
        ),
    }

    result
}
