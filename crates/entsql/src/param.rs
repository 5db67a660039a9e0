//! Parameter values and binding.
//!
//! [`bind`] turns a column descriptor plus its runtime value into a
//! [`ProviderParameter`]. Provider type, direction and nullability are copied
//! from the descriptor as-is; the value is not checked against the declared
//! type (a mismatch surfaces from the driver at execution time).

use bytes::BytesMut;
use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;
use tokio_postgres::types::{IsNull, ToSql, Type};

use crate::column::{ColumnDescriptor, DbType, ParameterDirection};

/// A clone-friendly parameter value using Arc.
///
/// Rendered queries can be cached and cloned without copying the values
/// bound into them.
#[derive(Clone)]
pub struct Param(pub(crate) Arc<dyn ToSql + Send + Sync>);

impl Param {
    /// Create a new parameter from any ToSql value.
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Param(Arc::new(value))
    }

    /// The NULL sentinel. Accepted for every provider type.
    pub fn null() -> Self {
        Param(Arc::new(Null))
    }

    /// Serialize `value` to JSON and bind it as `jsonb`.
    pub fn json<T: serde::Serialize>(value: &T) -> serde_json::Result<Self> {
        Ok(Param::new(serde_json::to_value(value)?))
    }

    /// Get a reference to the inner value as a ToSql trait object.
    pub fn as_ref(&self) -> &(dyn ToSql + Sync) {
        &*self.0 as &(dyn ToSql + Sync)
    }
}

impl std::fmt::Debug for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Param").field(&self.0).finish()
    }
}

impl Default for Param {
    fn default() -> Self {
        Param::null()
    }
}

/// SQL NULL, independent of the target column type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Null;

impl ToSql for Null {
    fn to_sql(&self, _ty: &Type, _out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        Ok(IsNull::Yes)
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

/// A parameter bound for the execution layer.
#[derive(Debug, Clone)]
pub struct ProviderParameter {
    column: ColumnDescriptor,
    value: Param,
}

impl ProviderParameter {
    /// Declared parameter name (e.g. `@Id`).
    pub fn name(&self) -> &str {
        self.column.parameter()
    }

    /// Descriptor the parameter was bound from.
    pub fn column(&self) -> &ColumnDescriptor {
        &self.column
    }

    pub fn db_type(&self) -> DbType {
        self.column.db_type()
    }

    /// Wire type for the Postgres driver.
    pub fn pg_type(&self) -> Type {
        self.column.db_type().pg_type()
    }

    pub fn direction(&self) -> ParameterDirection {
        self.column.direction()
    }

    pub fn is_nullable(&self) -> bool {
        self.column.is_nullable()
    }

    pub fn value(&self) -> &Param {
        &self.value
    }

    /// Same parameter with a different value.
    pub fn with_value(mut self, value: Param) -> Self {
        self.value = value;
        self
    }
}

/// Bind `value` to the parameter described by `column`.
pub fn bind(column: &ColumnDescriptor, value: Param) -> ProviderParameter {
    ProviderParameter {
        column: column.clone(),
        value,
    }
}

/// Supplies runtime values per column.
pub trait ValueSource {
    /// Value for `column`, or `None` when the source has nothing for it
    /// (bound as NULL).
    fn value_for(&self, column: &ColumnDescriptor) -> Option<Param>;
}

/// Values keyed by column name.
impl ValueSource for HashMap<String, Param> {
    fn value_for(&self, column: &ColumnDescriptor) -> Option<Param> {
        self.get(column.name()).cloned()
    }
}
