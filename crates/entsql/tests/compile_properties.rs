use std::collections::HashSet;

use entsql::{
    ColumnDescriptor, CompileError, DbType, EntityShape, OperationType, QueryPlan, RoutingOptions,
    TableInfo, compile,
};
use proptest::prelude::*;

const NAMES: [&str; 6] = ["Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Zeta"];
const PARAMS: [&str; 6] = ["@pa", "@pb", "@pc", "@pd", "@pe", "@pf"];

fn column() -> impl Strategy<Value = ColumnDescriptor> {
    (
        0..NAMES.len(),
        0..PARAMS.len(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(n, p, pk, fk, generated)| {
            let mut c = ColumnDescriptor::new(NAMES[n], DbType::Text).with_parameter(PARAMS[p]);
            if pk {
                c = c.primary_key();
            }
            if fk {
                c = c.foreign_key();
            }
            if generated {
                c = c.db_generated();
            }
            c
        })
}

fn columns() -> impl Strategy<Value = Vec<ColumnDescriptor>> {
    prop::collection::vec(column(), 1..8)
}

fn operation() -> impl Strategy<Value = OperationType> {
    prop::sample::select(OperationType::ALL.to_vec())
}

fn shape() -> impl Strategy<Value = EntityShape> {
    prop::sample::select(vec![EntityShape::SingleEntity, EntityShape::EntityCollection])
}

fn options() -> impl Strategy<Value = RoutingOptions> {
    (any::<bool>(), any::<bool>(), any::<bool>(), prop::option::of(1u32..500)).prop_map(
        |(bulk, dirty, encapsulate, limit)| {
            let mut opts = RoutingOptions::new()
                .with_bulk_load(bulk)
                .with_dirty_reads(dirty)
                .with_encapsulated_identifiers(encapsulate);
            if let Some(limit) = limit {
                opts = opts.with_read_limit(limit);
            }
            opts
        },
    )
}

/// `@name` tokens in SQL text, in order of appearance.
fn referenced_params(sql: &str) -> Vec<&str> {
    sql.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '@'))
        .filter(|t| t.starts_with('@'))
        .collect()
}

/// Reference model of first-writer-wins over column and parameter names,
/// applied to the input list in order.
fn first_writers(columns: &[ColumnDescriptor]) -> Vec<ColumnDescriptor> {
    let mut names = HashSet::new();
    let mut params = HashSet::new();
    let mut out = Vec::new();
    for c in columns {
        if names.contains(c.name()) || params.contains(c.parameter()) {
            continue;
        }
        names.insert(c.name());
        params.insert(c.parameter());
        out.push(c.clone());
    }
    out
}

/// Predicate columns expected from the routing table, in input order.
fn expected_predicate(
    op: OperationType,
    shape: EntityShape,
    owners: &[ColumnDescriptor],
) -> Vec<String> {
    owners
        .iter()
        .filter(|c| match (op, shape) {
            (OperationType::Insert, _) => false,
            (OperationType::Select, EntityShape::EntityCollection) => c.is_foreign_key(),
            _ => c.is_primary_key(),
        })
        .map(|c| c.name().to_string())
        .collect()
}

proptest! {
    #[test]
    fn compile_is_deterministic(cols in columns(), op in operation(), shape in shape(), opts in options()) {
        let table = TableInfo::new("Things");
        let a = compile(op, shape, &cols, &table, &opts);
        let b = compile(op, shape, &cols, &table, &opts);
        match (a, b) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(a.sql(), b.sql());
                prop_assert_eq!(a.parameter_names(), b.parameter_names());
            }
            (Err(a), Err(b)) => prop_assert_eq!(a, b),
            _ => prop_assert!(false, "outcome changed between runs"),
        }
    }

    #[test]
    fn placeholders_match_bound_parameters(cols in columns(), op in operation(), shape in shape(), opts in options()) {
        if let Ok(q) = compile(op, shape, &cols, &TableInfo::new("Things"), &opts) {
            prop_assert_eq!(referenced_params(q.sql()), q.parameter_names());
            let unique: HashSet<_> = q.parameter_names().into_iter().collect();
            prop_assert_eq!(unique.len(), q.parameters().len());
        }
    }

    #[test]
    fn plan_never_repeats_a_name(cols in columns(), op in operation(), shape in shape(), opts in options()) {
        if let Ok(plan) = QueryPlan::build(op, shape, &cols, &TableInfo::new("Things"), &opts) {
            let all: Vec<_> = plan.predicate().iter().chain(plan.payload().iter()).collect();
            let names: HashSet<_> = all.iter().map(|c| c.name()).collect();
            let params: HashSet<_> = all.iter().map(|c| c.parameter()).collect();
            prop_assert_eq!(names.len(), all.len());
            prop_assert_eq!(params.len(), all.len());
        }
    }

    #[test]
    fn insert_keeps_first_writer(cols in columns()) {
        let expected: Vec<String> = first_writers(&cols)
            .into_iter()
            .filter(|c| !c.is_db_generated())
            .map(|c| c.parameter().to_string())
            .collect();
        let result = compile(
            OperationType::Insert,
            EntityShape::SingleEntity,
            &cols,
            &TableInfo::new("Things"),
            &RoutingOptions::new(),
        );
        match result {
            Ok(q) => prop_assert_eq!(
                q.parameter_names().into_iter().map(str::to_string).collect::<Vec<_>>(),
                expected
            ),
            Err(e) => {
                prop_assert!(expected.is_empty());
                let is_missing_payload = matches!(e, CompileError::MissingPayload { .. });
                prop_assert!(is_missing_payload);
            }
        }
    }

    #[test]
    fn every_operation_keeps_first_writer(cols in columns(), op in operation(), shape in shape(), opts in options()) {
        let owners = first_writers(&cols);
        let predicate = expected_predicate(op, shape, &owners);
        match QueryPlan::build(op, shape, &cols, &TableInfo::new("Things"), &opts) {
            Ok(plan) => {
                for c in plan.predicate().iter().chain(plan.payload().iter()) {
                    prop_assert!(owners.contains(c), "{} ({}) lost its names to an earlier column", c.name(), c.parameter());
                }
                prop_assert_eq!(plan.predicate().columns().collect::<Vec<_>>(), predicate.clone());
            }
            Err(e) => prop_assert!(false, "plan failed: {}", e),
        }
        if op.requires_predicate() && predicate.is_empty() {
            let err = compile(op, shape, &cols, &TableInfo::new("Things"), &opts).unwrap_err();
            prop_assert!(err.is_missing_predicate());
        }
    }

    #[test]
    fn bulk_load_projects_keys_first(cols in columns()) {
        let opts = RoutingOptions::new().with_bulk_load(true);
        if let Ok(plan) = QueryPlan::build(
            OperationType::Select,
            EntityShape::EntityCollection,
            &cols,
            &TableInfo::new("Things"),
            &opts,
        ) {
            let keys: Vec<bool> = plan.payload().iter().map(|c| c.is_primary_key()).collect();
            let first_plain = keys.iter().position(|k| !k).unwrap_or(keys.len());
            prop_assert!(keys[first_plain..].iter().all(|k| !k));
        }
    }

    #[test]
    fn keyless_entities_never_compile_row_scoped_statements(cols in columns(), opts in options()) {
        let keyless: Vec<_> = cols
            .into_iter()
            .map(|c| ColumnDescriptor::new(c.name(), c.db_type()).with_parameter(c.parameter()))
            .collect();
        for op in [OperationType::Delete, OperationType::Update, OperationType::Exists, OperationType::Select] {
            let err = compile(op, EntityShape::SingleEntity, &keyless, &TableInfo::new("Things"), &opts)
                .unwrap_err();
            prop_assert!(err.is_missing_predicate());
        }
    }
}
