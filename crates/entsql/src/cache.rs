//! Memoization of compiled statements, kept outside the compile pipeline.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::column::{ColumnDescriptor, EntityShape, OperationType};
use crate::compile::compile;
use crate::error::CompileResult;
use crate::plan::TableInfo;
use crate::query::RenderedQuery;
use crate::settings::RoutingOptions;

/// Everything besides the column list that shapes a rendered statement.
///
/// Columns are identified by the table's source type: one source type maps
/// to one column list. Call [`StatementCache::invalidate`] when that mapping
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatementKey {
    table: TableInfo,
    operation: OperationType,
    shape: EntityShape,
    options: RoutingOptions,
}

impl StatementKey {
    pub fn new(
        operation: OperationType,
        shape: EntityShape,
        table: &TableInfo,
        options: &RoutingOptions,
    ) -> Self {
        Self {
            table: table.clone(),
            operation,
            shape,
            options: options.clone(),
        }
    }

    pub fn source_type(&self) -> &str {
        self.table.source_type()
    }

    pub fn operation(&self) -> OperationType {
        self.operation
    }

    pub fn shape(&self) -> EntityShape {
        self.shape
    }
}

/// Capacity-bounded cache of compiled statements, least recently used out.
///
/// Entries are value-free templates (every parameter bound to NULL); clone one
/// and call [`RenderedQuery::bind_values`] per execution.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use entsql::{ColumnDescriptor, DbType, EntityShape, OperationType, RoutingOptions, StatementCache, TableInfo};
///
/// let cache = StatementCache::new(128);
/// let columns = [
///     ColumnDescriptor::new("Id", DbType::Int64).primary_key(),
///     ColumnDescriptor::new("Name", DbType::Text),
/// ];
/// let table = TableInfo::new("Widgets").with_source_type("Shop.Widget");
/// let opts = RoutingOptions::new();
///
/// let a = cache.compile(OperationType::Delete, EntityShape::SingleEntity, &columns, &table, &opts)?;
/// let b = cache.compile(OperationType::Delete, EntityShape::SingleEntity, &columns, &table, &opts)?;
/// assert!(Arc::ptr_eq(&a, &b));
/// # Ok::<(), entsql::CompileError>(())
/// ```
#[derive(Debug)]
pub struct StatementCache {
    capacity: usize,
    slots: Mutex<Slots>,
}

#[derive(Debug, Default)]
struct Slots {
    /// Bumped on every hit or insert; slots with the lowest stamp go first.
    clock: u64,
    entries: HashMap<StatementKey, Slot>,
}

#[derive(Debug)]
struct Slot {
    query: Arc<RenderedQuery>,
    used_at: u64,
}

impl Slots {
    fn hit(&mut self, key: &StatementKey) -> Option<Arc<RenderedQuery>> {
        self.clock += 1;
        let now = self.clock;
        let slot = self.entries.get_mut(key)?;
        slot.used_at = now;
        Some(Arc::clone(&slot.query))
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, slot)| slot.used_at)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}

impl StatementCache {
    /// A cache holding at most `capacity` statements. Zero disables storage.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            slots: Mutex::new(Slots::default()),
        }
    }

    fn slots(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Compile through the cache.
    ///
    /// Compile errors are returned and nothing is stored for them. Two callers
    /// missing on the same key may both compile; the first stored result is
    /// the one both get back.
    pub fn compile(
        &self,
        operation: OperationType,
        shape: EntityShape,
        columns: &[ColumnDescriptor],
        table: &TableInfo,
        options: &RoutingOptions,
    ) -> CompileResult<Arc<RenderedQuery>> {
        let key = StatementKey::new(operation, shape, table, options);
        if let Some(hit) = self.slots().hit(&key) {
            return Ok(hit);
        }

        let query = Arc::new(compile(operation, shape, columns, table, options)?);
        if self.capacity == 0 {
            return Ok(query);
        }

        let mut slots = self.slots();
        if let Some(raced) = slots.hit(&key) {
            return Ok(raced);
        }
        if slots.entries.len() >= self.capacity {
            slots.evict_oldest();
        }
        let used_at = slots.clock;
        slots.entries.insert(
            key,
            Slot {
                query: Arc::clone(&query),
                used_at,
            },
        );
        Ok(query)
    }

    pub fn get(&self, key: &StatementKey) -> Option<Arc<RenderedQuery>> {
        self.slots().hit(key)
    }

    /// Drop every statement compiled for `source_type`; returns how many.
    pub fn invalidate(&self, source_type: &str) -> usize {
        let mut slots = self.slots();
        let before = slots.entries.len();
        slots.entries.retain(|key, _| key.source_type() != source_type);
        before - slots.entries.len()
    }

    pub fn clear(&self) {
        self.slots().entries.clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
