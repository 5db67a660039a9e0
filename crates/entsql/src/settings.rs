//! Data-source, adapter and per-call routing settings.

use serde::Deserialize;
use std::time::Duration;

use crate::dialect::DialectKind;

/// Data-source level defaults shared by every entity mapped to one database.
///
/// Deserializable so it can sit in a `[data_source]` config table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DataSourceSettings {
    /// SQL dialect used for rendering.
    pub dialect: DialectKind,
    /// Read without taking shared locks.
    pub dirty_reads: bool,
    /// Wrap table/column identifiers in dialect delimiters.
    pub encapsulate_identifiers: bool,
    /// Timeout handed to the execution layer, in seconds. `None` means the
    /// driver default.
    pub command_timeout_secs: Option<u64>,
}

impl DataSourceSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dialect(mut self, dialect: DialectKind) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_dirty_reads(mut self, enabled: bool) -> Self {
        self.dirty_reads = enabled;
        self
    }

    pub fn with_encapsulated_identifiers(mut self, enabled: bool) -> Self {
        self.encapsulate_identifiers = enabled;
        self
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout_secs = Some(timeout.as_secs());
        self
    }
}

/// Adapter level settings: how one entity's collections are loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AdapterSettings {
    /// Load child collections in one batched query (see [`RoutingOptions::bulk_load`]).
    pub bulk_load: bool,
    /// Maximum number of rows a select may return.
    pub read_limit: Option<u32>,
}

impl AdapterSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bulk_load(mut self, enabled: bool) -> Self {
        self.bulk_load = enabled;
        self
    }

    pub fn with_read_limit(mut self, limit: u32) -> Self {
        self.read_limit = Some(limit);
        self
    }
}

/// Per-call knobs for routing and rendering.
///
/// Nothing here is shared between calls; build one per compile or reuse a
/// clone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RoutingOptions {
    /// Collection selects filter by foreign key and project every column
    /// (primary keys first) instead of only the primary keys.
    pub bulk_load: bool,
    pub dirty_reads: bool,
    pub read_limit_enabled: bool,
    /// Only consulted when `read_limit_enabled` is set.
    pub read_limit: u32,
    pub encapsulate_identifiers: bool,
    /// Overrides the alias declared on the table, if any.
    pub table_alias: Option<String>,
    pub dialect: DialectKind,
    pub command_timeout: Option<Duration>,
}

impl RoutingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge data-source and adapter settings into per-call options.
    pub fn from_settings(data_source: &DataSourceSettings, adapter: &AdapterSettings) -> Self {
        Self {
            bulk_load: adapter.bulk_load,
            dirty_reads: data_source.dirty_reads,
            read_limit_enabled: adapter.read_limit.is_some(),
            read_limit: adapter.read_limit.unwrap_or_default(),
            encapsulate_identifiers: data_source.encapsulate_identifiers,
            table_alias: None,
            dialect: data_source.dialect,
            command_timeout: data_source.command_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn with_bulk_load(mut self, enabled: bool) -> Self {
        self.bulk_load = enabled;
        self
    }

    pub fn with_dirty_reads(mut self, enabled: bool) -> Self {
        self.dirty_reads = enabled;
        self
    }

    /// Enable the row limit.
    pub fn with_read_limit(mut self, limit: u32) -> Self {
        self.read_limit_enabled = true;
        self.read_limit = limit;
        self
    }

    pub fn with_encapsulated_identifiers(mut self, enabled: bool) -> Self {
        self.encapsulate_identifiers = enabled;
        self
    }

    pub fn with_table_alias(mut self, alias: impl Into<String>) -> Self {
        self.table_alias = Some(alias.into());
        self
    }

    pub fn with_dialect(mut self, dialect: DialectKind) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = Some(timeout);
        self
    }
}
