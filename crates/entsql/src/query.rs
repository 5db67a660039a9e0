//! Rendered statements handed to the execution layer.

use std::time::Duration;
use tokio_postgres::types::ToSql;

use crate::param::{Param, ProviderParameter, ValueSource};

/// SQL text plus its ordered parameters.
///
/// Parameters appear in the order their placeholders occur in the text. A
/// freshly compiled query binds every parameter to NULL; attach runtime
/// values with [`RenderedQuery::bind_values`].
#[derive(Debug, Clone)]
pub struct RenderedQuery {
    sql: String,
    parameters: Vec<ProviderParameter>,
    command_timeout: Option<Duration>,
}

impl RenderedQuery {
    pub(crate) fn new(sql: String, parameters: Vec<ProviderParameter>) -> Self {
        Self {
            sql,
            parameters,
            command_timeout: None,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn parameters(&self) -> &[ProviderParameter] {
        &self.parameters
    }

    /// Declared parameter names, in placeholder order.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(ProviderParameter::name).collect()
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout
    }

    pub fn with_command_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Bind values from `source`; columns it has no value for are bound to NULL.
    pub fn bind_values(self, source: &impl ValueSource) -> Self {
        let parameters = self
            .parameters
            .into_iter()
            .map(|p| {
                let value = source.value_for(p.column()).unwrap_or_else(Param::null);
                p.with_value(value)
            })
            .collect();
        Self { parameters, ..self }
    }

    /// Get parameters as references for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.parameters.iter().map(|p| p.value().as_ref()).collect()
    }
}

impl std::fmt::Display for RenderedQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.sql)
    }
}
