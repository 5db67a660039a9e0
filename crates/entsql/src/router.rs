//! Column routing: which columns locate rows and which carry data.
//!
//! | Operation | Shape | Predicate | Payload |
//! |---|---|---|---|
//! | Exists, Delete | any | primary keys | none |
//! | Insert | any | none | all but database-generated |
//! | Update | any | primary keys | all |
//! | Select | single | primary keys | all |
//! | Select | collection | foreign keys | primary keys (+ all when bulk loading) |
//!
//! Before routing, the input list is reduced to first writers: a descriptor
//! whose column or parameter name was claimed by an earlier one is dropped,
//! whatever its role. The predicate map is then filled first, and payload
//! candidates already present in it are skipped, so no name appears twice in
//! one plan.

use crate::column::{ColumnDescriptor, ColumnRole, EntityShape, OperationType, classify};
use crate::column_map::ColumnMap;
use crate::settings::RoutingOptions;

/// Predicate and payload columns for one compile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutedColumns {
    pub predicate: ColumnMap,
    pub payload: ColumnMap,
}

fn predicate_roles(op: OperationType, shape: EntityShape) -> &'static [ColumnRole] {
    match (op, shape) {
        (OperationType::Insert, _) => &[],
        (OperationType::Select, EntityShape::EntityCollection) => &[ColumnRole::ForeignKey],
        _ => &[ColumnRole::PrimaryKey],
    }
}

fn payload_roles(op: OperationType, shape: EntityShape, bulk_load: bool) -> &'static [ColumnRole] {
    match (op, shape) {
        (OperationType::Exists | OperationType::Delete, _) => &[],
        (OperationType::Insert, _) => &[ColumnRole::ExcludeDatabaseGenerated],
        (OperationType::Update, _) => &[ColumnRole::All],
        (OperationType::Select, EntityShape::SingleEntity) => &[ColumnRole::All],
        (OperationType::Select, EntityShape::EntityCollection) if bulk_load => {
            &[ColumnRole::PrimaryKey, ColumnRole::All]
        }
        (OperationType::Select, EntityShape::EntityCollection) => &[ColumnRole::PrimaryKey],
    }
}

/// Route `columns` into predicate and payload maps.
pub fn route(
    op: OperationType,
    shape: EntityShape,
    columns: &[ColumnDescriptor],
    options: &RoutingOptions,
) -> RoutedColumns {
    let mut owners = ColumnMap::new();
    for column in columns {
        owners.insert_if_absent(column);
    }
    let columns = owners.as_slice();

    let mut routed = RoutedColumns::default();

    for role in predicate_roles(op, shape) {
        for column in classify(columns, *role) {
            routed.predicate.insert_if_absent(column);
        }
    }

    for role in payload_roles(op, shape, options.bulk_load) {
        for column in classify(columns, *role) {
            if routed.predicate.contains_column(column.name())
                || routed.predicate.contains_parameter(column.parameter())
            {
                continue;
            }
            routed.payload.insert_if_absent(column);
        }
    }

    routed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::DbType;

    fn line_item() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("Qty", DbType::Int32),
            ColumnDescriptor::new("OrderId", DbType::Int64).foreign_key(),
            ColumnDescriptor::new("Id", DbType::Int64).primary_key().db_generated(),
            ColumnDescriptor::new("Sku", DbType::Text),
        ]
    }

    fn cols(map: &ColumnMap) -> Vec<&str> {
        map.columns().collect()
    }

    #[test]
    fn exists_and_delete_use_primary_keys_only() {
        for op in [OperationType::Exists, OperationType::Delete] {
            let r = route(op, EntityShape::SingleEntity, &line_item(), &RoutingOptions::new());
            assert_eq!(cols(&r.predicate), ["Id"]);
            assert!(r.payload.is_empty());
        }
    }

    #[test]
    fn insert_skips_db_generated() {
        let r = route(
            OperationType::Insert,
            EntityShape::SingleEntity,
            &line_item(),
            &RoutingOptions::new(),
        );
        assert!(r.predicate.is_empty());
        assert_eq!(cols(&r.payload), ["Qty", "OrderId", "Sku"]);
    }

    #[test]
    fn update_never_sets_key_columns() {
        let r = route(
            OperationType::Update,
            EntityShape::SingleEntity,
            &line_item(),
            &RoutingOptions::new(),
        );
        assert_eq!(cols(&r.predicate), ["Id"]);
        assert_eq!(cols(&r.payload), ["Qty", "OrderId", "Sku"]);
    }

    #[test]
    fn collection_select_filters_by_foreign_key() {
        let r = route(
            OperationType::Select,
            EntityShape::EntityCollection,
            &line_item(),
            &RoutingOptions::new(),
        );
        assert_eq!(cols(&r.predicate), ["OrderId"]);
        assert_eq!(cols(&r.payload), ["Id"]);
    }

    #[test]
    fn bulk_load_puts_primary_keys_first() {
        let opts = RoutingOptions::new().with_bulk_load(true);
        let r = route(
            OperationType::Select,
            EntityShape::EntityCollection,
            &line_item(),
            &opts,
        );
        assert_eq!(cols(&r.predicate), ["OrderId"]);
        assert_eq!(cols(&r.payload), ["Id", "Qty", "Sku"]);
    }

    #[test]
    fn bulk_load_ignored_for_single_entity() {
        let opts = RoutingOptions::new().with_bulk_load(true);
        let r = route(OperationType::Select, EntityShape::SingleEntity, &line_item(), &opts);
        assert_eq!(cols(&r.predicate), ["Id"]);
        assert_eq!(cols(&r.payload), ["Qty", "OrderId", "Sku"]);
    }

    #[test]
    fn shared_parameter_name_first_writer_wins() {
        let columns = vec![
            ColumnDescriptor::new("Id", DbType::Int64).primary_key(),
            ColumnDescriptor::new("Name", DbType::Text),
            ColumnDescriptor::new("DisplayName", DbType::Text).with_parameter("@Name"),
        ];
        let r = route(
            OperationType::Update,
            EntityShape::SingleEntity,
            &columns,
            &RoutingOptions::new(),
        );
        assert_eq!(cols(&r.payload), ["Name"]);
    }

    #[test]
    fn earlier_plain_column_owns_shared_parameter() {
        let columns = vec![
            ColumnDescriptor::new("LegacyId", DbType::Int64).with_parameter("@Id"),
            ColumnDescriptor::new("Id", DbType::Int64).primary_key(),
            ColumnDescriptor::new("Name", DbType::Text),
        ];
        let r = route(
            OperationType::Update,
            EntityShape::SingleEntity,
            &columns,
            &RoutingOptions::new(),
        );
        assert!(r.predicate.is_empty());
        assert_eq!(cols(&r.payload), ["LegacyId", "Name"]);
    }

    #[test]
    fn duplicate_column_name_keeps_first_descriptor() {
        let columns = vec![
            ColumnDescriptor::new("Id", DbType::Int64).primary_key(),
            ColumnDescriptor::new("Code", DbType::Text),
            ColumnDescriptor::new("Code", DbType::Text)
                .with_parameter("@Code2")
                .primary_key(),
        ];
        let r = route(
            OperationType::Delete,
            EntityShape::SingleEntity,
            &columns,
            &RoutingOptions::new(),
        );
        assert_eq!(cols(&r.predicate), ["Id"]);
    }

    #[test]
    fn payload_skips_parameter_taken_by_predicate() {
        let columns = vec![
            ColumnDescriptor::new("Id", DbType::Int64).primary_key(),
            ColumnDescriptor::new("ExternalId", DbType::Int64).with_parameter("@Id"),
            ColumnDescriptor::new("Name", DbType::Text),
        ];
        let r = route(
            OperationType::Update,
            EntityShape::SingleEntity,
            &columns,
            &RoutingOptions::new(),
        );
        assert_eq!(cols(&r.predicate), ["Id"]);
        assert_eq!(cols(&r.payload), ["Name"]);
    }
}
