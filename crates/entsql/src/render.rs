//! Render a [`QueryPlan`] into SQL text and parameters.

use crate::column::{ColumnDescriptor, OperationType};
use crate::column_map::ColumnMap;
use crate::dialect::{Dialect, write_ident};
use crate::error::{CompileError, CompileResult};
use crate::param::{Param, ProviderParameter, bind};
use crate::plan::QueryPlan;
use crate::query::RenderedQuery;

/// Accumulates SQL text and the parameters its placeholders reference.
struct SqlWriter<'a> {
    dialect: &'a dyn Dialect,
    encapsulate: bool,
    sql: String,
    params: Vec<ProviderParameter>,
}

impl<'a> SqlWriter<'a> {
    fn new(dialect: &'a dyn Dialect, encapsulate: bool) -> Self {
        Self {
            dialect,
            encapsulate,
            sql: String::with_capacity(128),
            params: Vec::new(),
        }
    }

    fn push(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    fn ident(&mut self, ident: &str) {
        write_ident(self.dialect, ident, self.encapsulate, &mut self.sql);
    }

    fn placeholder(&mut self, column: &ColumnDescriptor) {
        self.params.push(bind(column, Param::null()));
        self.dialect
            .write_placeholder(column.parameter(), self.params.len(), &mut self.sql);
    }

    /// `table[ AS alias][ hint]`
    fn from_target(&mut self, plan: &QueryPlan) {
        self.ident(plan.table());
        if let Some(alias) = plan.table_alias() {
            self.push(" AS ");
            self.ident(alias);
        }
        if plan.knobs().dirty_reads
            && let Some(hint) = self.dialect.dirty_read_hint()
        {
            self.push(" ");
            self.push(hint);
        }
    }

    /// `a = @a AND b = @b`
    fn predicate(&mut self, map: &ColumnMap) {
        self.push(" WHERE ");
        for (i, column) in map.iter().enumerate() {
            if i > 0 {
                self.push(" AND ");
            }
            self.ident(column.name());
            self.push(" = ");
            self.placeholder(column);
        }
    }

    fn finish(self) -> RenderedQuery {
        RenderedQuery::new(self.sql, self.params)
    }
}

/// Render `plan` with `dialect`.
///
/// Fails with [`CompileError::MissingPredicate`] rather than emit an
/// unconditional Exists/Delete/Update/Select, and with
/// [`CompileError::MissingPayload`] when there is nothing to insert, assign
/// or select.
pub fn render(plan: &QueryPlan, dialect: &dyn Dialect) -> CompileResult<RenderedQuery> {
    let op = plan.operation();
    if op.requires_predicate() && plan.predicate().is_empty() {
        return Err(CompileError::missing_predicate(op, plan.source_type()));
    }
    if op.requires_payload() && plan.payload().is_empty() {
        return Err(CompileError::missing_payload(op, plan.source_type()));
    }

    let knobs = plan.knobs();
    let mut w = SqlWriter::new(dialect, knobs.encapsulate_identifiers);

    match op {
        OperationType::Exists => {
            w.push("SELECT 1 FROM ");
            w.from_target(plan);
            w.predicate(plan.predicate());
        }
        OperationType::Delete => {
            w.push("DELETE FROM ");
            w.ident(plan.table());
            w.predicate(plan.predicate());
        }
        OperationType::Insert => {
            w.push("INSERT INTO ");
            w.ident(plan.table());
            w.push(" (");
            for (i, column) in plan.payload().iter().enumerate() {
                if i > 0 {
                    w.push(", ");
                }
                w.ident(column.name());
            }
            w.push(") VALUES (");
            for (i, column) in plan.payload().iter().enumerate() {
                if i > 0 {
                    w.push(", ");
                }
                w.placeholder(column);
            }
            w.push(")");
        }
        OperationType::Update => {
            w.push("UPDATE ");
            w.ident(plan.table());
            w.push(" SET ");
            for (i, column) in plan.payload().iter().enumerate() {
                if i > 0 {
                    w.push(", ");
                }
                w.ident(column.name());
                w.push(" = ");
                w.placeholder(column);
            }
            w.predicate(plan.predicate());
        }
        OperationType::Select => {
            w.push("SELECT ");
            if let Some(limit) = knobs.read_limit {
                dialect.write_limit_prefix(limit, &mut w.sql);
            }
            for (i, column) in plan.payload().iter().enumerate() {
                if i > 0 {
                    w.push(", ");
                }
                w.ident(column.name());
                if let Some(alias) = column.alias() {
                    w.push(" AS ");
                    w.ident(alias);
                }
            }
            w.push(" FROM ");
            w.from_target(plan);
            w.predicate(plan.predicate());
            if let Some(limit) = knobs.read_limit {
                dialect.write_limit_suffix(limit, &mut w.sql);
            }
        }
    }

    Ok(w.finish())
}
