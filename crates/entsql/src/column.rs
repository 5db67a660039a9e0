//! Column metadata and classification.
//!
//! A [`ColumnDescriptor`] is the resolved, immutable description of one mapped
//! column: its name, optional select alias, bound parameter name, provider type
//! and role tags. [`classify`] filters a descriptor list down to one role while
//! keeping the caller's ordering.

use crate::error::{CompileError, CompileResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio_postgres::types::Type;

/// The statement kind being compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Exists,
    Delete,
    Insert,
    Select,
    Update,
}

impl OperationType {
    /// All operations, in declaration order.
    pub const ALL: [OperationType; 5] = [
        OperationType::Exists,
        OperationType::Delete,
        OperationType::Insert,
        OperationType::Select,
        OperationType::Update,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Exists => "Exists",
            OperationType::Delete => "Delete",
            OperationType::Insert => "Insert",
            OperationType::Select => "Select",
            OperationType::Update => "Update",
        }
    }

    /// Parse an operation name (case-insensitive).
    ///
    /// `source_type` is the entity's declared type name; it is carried into the
    /// error so a bad mapping can be traced back to its owner.
    pub fn parse(value: &str, source_type: &str) -> CompileResult<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CompileError::invalid_operation(value, source_type))
    }

    /// Resolve a numeric operation code (`0..=4`, declaration order).
    pub fn from_code(code: i64, source_type: &str) -> CompileResult<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or_else(|| CompileError::invalid_operation(code.to_string(), source_type))
    }

    /// Whether the statement must be scoped by a WHERE clause.
    ///
    /// Collection selects are included: without a foreign key they would load
    /// every row of the child table.
    pub fn requires_predicate(&self) -> bool {
        !matches!(self, OperationType::Insert)
    }

    /// Whether the statement needs at least one payload column.
    pub fn requires_payload(&self) -> bool {
        matches!(
            self,
            OperationType::Insert | OperationType::Update | OperationType::Select
        )
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the caller stands for one record or a set of child records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityShape {
    #[default]
    SingleEntity,
    EntityCollection,
}

impl EntityShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityShape::SingleEntity => "single",
            EntityShape::EntityCollection => "collection",
        }
    }
}

impl fmt::Display for EntityShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider-level data type of a bound parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DbType {
    Bool,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    #[default]
    Text,
    Bytes,
    Uuid,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    Json,
}

impl DbType {
    /// The Postgres wire type this provider type binds as.
    pub fn pg_type(&self) -> Type {
        match self {
            DbType::Bool => Type::BOOL,
            DbType::Int16 => Type::INT2,
            DbType::Int32 => Type::INT4,
            DbType::Int64 => Type::INT8,
            DbType::Float32 => Type::FLOAT4,
            DbType::Float64 => Type::FLOAT8,
            DbType::Decimal => Type::NUMERIC,
            DbType::Text => Type::TEXT,
            DbType::Bytes => Type::BYTEA,
            DbType::Uuid => Type::UUID,
            DbType::Date => Type::DATE,
            DbType::Time => Type::TIME,
            DbType::Timestamp => Type::TIMESTAMP,
            DbType::TimestampTz => Type::TIMESTAMPTZ,
            DbType::Json => Type::JSONB,
        }
    }
}

/// Direction of a bound parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterDirection {
    #[default]
    Input,
    Output,
    InputOutput,
    ReturnValue,
}

/// Resolved metadata for one mapped column.
///
/// Built once by the metadata source and then only read.
///
/// # Example
/// ```
/// use entsql::{ColumnDescriptor, DbType};
///
/// let id = ColumnDescriptor::new("Id", DbType::Int64).primary_key().db_generated();
/// assert_eq!(id.parameter(), "@Id");
/// assert!(id.is_primary_key());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnDescriptor {
    name: String,
    alias: Option<String>,
    parameter: String,
    db_type: DbType,
    nullable: bool,
    direction: ParameterDirection,
    primary_key: bool,
    foreign_key: bool,
    db_generated: bool,
}

impl ColumnDescriptor {
    /// Create a plain input column whose parameter is `@<name>`.
    pub fn new(name: impl Into<String>, db_type: DbType) -> Self {
        let name = name.into();
        let parameter = format!("@{name}");
        Self {
            name,
            alias: None,
            parameter,
            db_type,
            nullable: false,
            direction: ParameterDirection::Input,
            primary_key: false,
            foreign_key: false,
            db_generated: false,
        }
    }

    /// Override the bound parameter name.
    pub fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameter = parameter.into();
        self
    }

    /// Project the column under a different name in SELECT lists.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_direction(mut self, direction: ParameterDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn foreign_key(mut self) -> Self {
        self.foreign_key = true;
        self
    }

    /// Mark the column as filled by the database (identity, computed, default).
    pub fn db_generated(mut self) -> Self {
        self.db_generated = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    pub fn db_type(&self) -> DbType {
        self.db_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn direction(&self) -> ParameterDirection {
        self.direction
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn is_foreign_key(&self) -> bool {
        self.foreign_key
    }

    pub fn is_db_generated(&self) -> bool {
        self.db_generated
    }

    pub(crate) fn validate(&self) -> CompileResult<()> {
        if self.name.trim().is_empty() {
            return Err(CompileError::invalid_argument("Column name cannot be empty"));
        }
        if self.name.contains('\0') {
            return Err(CompileError::invalid_argument(format!(
                "Column '{}' cannot contain NUL character",
                self.name
            )));
        }
        if !is_parameter_name(&self.parameter) {
            return Err(CompileError::invalid_argument(format!(
                "Column '{}' has invalid parameter name '{}' (expected @[A-Za-z_][A-Za-z0-9_]*)",
                self.name, self.parameter
            )));
        }
        if let Some(alias) = &self.alias
            && (alias.trim().is_empty() || alias.contains('\0'))
        {
            return Err(CompileError::invalid_argument(format!(
                "Column '{}' has an invalid alias",
                self.name
            )));
        }
        Ok(())
    }
}

/// `@` followed by an ASCII identifier. Placeholders are written verbatim.
fn is_parameter_name(parameter: &str) -> bool {
    let Some(ident) = parameter.strip_prefix('@') else {
        return false;
    };
    let mut chars = ident.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Role filter accepted by [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    PrimaryKey,
    ForeignKey,
    /// Everything the database does not fill in itself.
    ExcludeDatabaseGenerated,
    All,
}

impl ColumnRole {
    pub fn matches(&self, column: &ColumnDescriptor) -> bool {
        match self {
            ColumnRole::PrimaryKey => column.is_primary_key(),
            ColumnRole::ForeignKey => column.is_foreign_key(),
            ColumnRole::ExcludeDatabaseGenerated => !column.is_db_generated(),
            ColumnRole::All => true,
        }
    }
}

/// Filter `columns` to those matching `role`, preserving input order.
pub fn classify(columns: &[ColumnDescriptor], role: ColumnRole) -> Vec<&ColumnDescriptor> {
    columns.iter().filter(|c| role.matches(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("Id", DbType::Int64).primary_key().db_generated(),
            ColumnDescriptor::new("OrderId", DbType::Int64).foreign_key(),
            ColumnDescriptor::new("Sku", DbType::Text),
            ColumnDescriptor::new("Region", DbType::Text).primary_key(),
        ]
    }

    fn names(cols: Vec<&ColumnDescriptor>) -> Vec<&str> {
        cols.into_iter().map(ColumnDescriptor::name).collect()
    }

    #[test]
    fn classify_primary_keys_keeps_order() {
        let cols = sample();
        assert_eq!(names(classify(&cols, ColumnRole::PrimaryKey)), ["Id", "Region"]);
    }

    #[test]
    fn classify_foreign_keys() {
        let cols = sample();
        assert_eq!(names(classify(&cols, ColumnRole::ForeignKey)), ["OrderId"]);
    }

    #[test]
    fn classify_excludes_db_generated() {
        let cols = sample();
        assert_eq!(
            names(classify(&cols, ColumnRole::ExcludeDatabaseGenerated)),
            ["OrderId", "Sku", "Region"]
        );
    }

    #[test]
    fn classify_empty_match_is_empty() {
        let cols = vec![ColumnDescriptor::new("Sku", DbType::Text)];
        assert!(classify(&cols, ColumnRole::PrimaryKey).is_empty());
        assert!(classify(&[], ColumnRole::All).is_empty());
    }

    #[test]
    fn operation_parse_is_case_insensitive() {
        assert_eq!(OperationType::parse("update", "Order").unwrap(), OperationType::Update);
        assert_eq!(OperationType::parse(" EXISTS ", "Order").unwrap(), OperationType::Exists);
    }

    #[test]
    fn operation_parse_rejects_unknown_with_source_type() {
        let err = OperationType::parse("Merge", "Shop.Order").unwrap_err();
        assert_eq!(
            err,
            CompileError::InvalidOperation {
                value: "Merge".to_string(),
                source_type: "Shop.Order".to_string(),
            }
        );
        assert!(err.to_string().contains("Shop.Order"));
    }

    #[test]
    fn operation_from_code() {
        assert_eq!(OperationType::from_code(3, "Order").unwrap(), OperationType::Select);
        assert!(OperationType::from_code(5, "Order").unwrap_err().is_invalid_operation());
        assert!(OperationType::from_code(-1, "Order").unwrap_err().is_invalid_operation());
    }

    #[test]
    fn descriptor_validation() {
        assert!(ColumnDescriptor::new("", DbType::Text).validate().is_err());
        assert!(
            ColumnDescriptor::new("Sku", DbType::Text)
                .with_parameter(" ")
                .validate()
                .is_err()
        );
        assert!(ColumnDescriptor::new("Sku", DbType::Text).validate().is_ok());
    }

    #[test]
    fn parameter_names_must_be_at_identifiers() {
        let with = |p: &str| ColumnDescriptor::new("Sku", DbType::Text).with_parameter(p);
        for ok in ["@Sku", "@_sku", "@sku_2"] {
            assert!(with(ok).validate().is_ok(), "{ok}");
        }
        for bad in ["Sku", "@", "@2sku", "@Sku OR 1=1", "@Sku;--", "@@Sku", "$1", "@Sku\0"] {
            assert!(with(bad).validate().unwrap_err().is_invalid_argument(), "{bad}");
        }
        // Default parameters inherit the column name.
        assert!(ColumnDescriptor::new("Unit Price", DbType::Decimal).validate().is_err());
    }
}
