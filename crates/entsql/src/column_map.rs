//! Ordered column → parameter mapping with first-writer-wins de-duplication.

use crate::column::ColumnDescriptor;

/// Insertion-ordered map keyed by both column name and parameter name.
///
/// A candidate whose column name OR parameter name is already present is
/// skipped; the earlier entry stays.
///
/// ```
/// use entsql::{ColumnMap, ColumnDescriptor, DbType};
///
/// let mut map = ColumnMap::new();
/// assert!(map.insert_if_absent(&ColumnDescriptor::new("Id", DbType::Int64)));
/// // Same parameter name, different column: dropped.
/// let clash = ColumnDescriptor::new("LegacyId", DbType::Int64).with_parameter("@Id");
/// assert!(!map.insert_if_absent(&clash));
/// assert_eq!(map.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    entries: Vec<ColumnDescriptor>,
}

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the descriptor unless its column or parameter is already mapped.
    ///
    /// Returns `true` when the entry was added.
    pub fn insert_if_absent(&mut self, descriptor: &ColumnDescriptor) -> bool {
        if self.contains_column(descriptor.name()) || self.contains_parameter(descriptor.parameter())
        {
            return false;
        }
        self.entries.push(descriptor.clone());
        true
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.entries.iter().any(|e| e.name() == column)
    }

    pub fn contains_parameter(&self, parameter: &str) -> bool {
        self.entries.iter().any(|e| e.parameter() == parameter)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[ColumnDescriptor] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnDescriptor> {
        self.entries.iter()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(ColumnDescriptor::name)
    }

    pub fn parameters(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(ColumnDescriptor::parameter)
    }
}

impl<'a> IntoIterator for &'a ColumnMap {
    type Item = &'a ColumnDescriptor;
    type IntoIter = std::slice::Iter<'a, ColumnDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
