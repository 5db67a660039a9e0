//! # entsql
//!
//! Compile declarative entity metadata into CRUD SQL.
//!
//! Given an entity's column descriptors (name, roles, parameter binding,
//! alias), its table, and a requested operation, entsql produces one
//! dialect-specific statement plus its ordered parameters.
//!
//! ## Features
//!
//! - **Role-aware routing**: primary/foreign keys locate rows, the rest is payload
//! - **Collection loading**: child collections filter by foreign key, optionally bulk-loaded
//! - **Safe defaults**: Delete/Update/Exists/Select without a predicate fail instead of
//!   touching every row
//! - **Parameters only**: values are never inlined into SQL text
//! - **Dialects**: SQL Server (`[ident]`, `TOP`, `NOLOCK`) and Postgres (`"ident"`, `$n`, `LIMIT`)
//!
//! ## Example
//!
//! ```
//! use entsql::{compile, ColumnDescriptor, DbType, EntityShape, OperationType, RoutingOptions, TableInfo};
//!
//! let columns = [
//!     ColumnDescriptor::new("Id", DbType::Int64).primary_key().db_generated(),
//!     ColumnDescriptor::new("OrderId", DbType::Int64).foreign_key(),
//!     ColumnDescriptor::new("Sku", DbType::Text),
//! ];
//! let table = TableInfo::new("LineItems");
//!
//! let insert = compile(
//!     OperationType::Insert,
//!     EntityShape::SingleEntity,
//!     &columns,
//!     &table,
//!     &RoutingOptions::new(),
//! )?;
//! assert_eq!(insert.sql(), "INSERT INTO LineItems (OrderId, Sku) VALUES (@OrderId, @Sku)");
//!
//! let children = compile(
//!     OperationType::Select,
//!     EntityShape::EntityCollection,
//!     &columns,
//!     &table,
//!     &RoutingOptions::new().with_bulk_load(true),
//! )?;
//! assert_eq!(children.sql(), "SELECT Id, Sku FROM LineItems WHERE OrderId = @OrderId");
//! # Ok::<(), entsql::CompileError>(())
//! ```

pub mod cache;
pub mod column;
pub mod column_map;
pub mod dialect;
pub mod error;
pub mod param;
pub mod plan;
pub mod query;
pub mod render;
pub mod router;
pub mod settings;

mod compile;

pub use cache::{StatementCache, StatementKey};
pub use column::{
    ColumnDescriptor, ColumnRole, DbType, EntityShape, OperationType, ParameterDirection, classify,
};
pub use column_map::ColumnMap;
pub use compile::compile;
pub use dialect::{Dialect, DialectKind, Postgres, SqlServer};
pub use error::{CompileError, CompileResult};
pub use param::{Null, Param, ProviderParameter, ValueSource, bind};
pub use plan::{PlanKnobs, QueryPlan, TableInfo};
pub use query::RenderedQuery;
pub use render::render;
pub use router::{RoutedColumns, route};
pub use settings::{AdapterSettings, DataSourceSettings, RoutingOptions};
