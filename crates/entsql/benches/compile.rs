use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use entsql::{
    ColumnDescriptor, DbType, EntityShape, OperationType, RoutingOptions, StatementCache,
    TableInfo, compile,
};

/// An entity with one key, one foreign key and `n` plain columns.
fn entity(n: usize) -> Vec<ColumnDescriptor> {
    let mut cols = vec![
        ColumnDescriptor::new("Id", DbType::Int64).primary_key().db_generated(),
        ColumnDescriptor::new("ParentId", DbType::Int64).foreign_key(),
    ];
    for i in 0..n {
        cols.push(ColumnDescriptor::new(format!("col{i}"), DbType::Text));
    }
    cols
}

fn bench_compile(c: &mut Criterion) {
    let table = TableInfo::new("dbo.Things").with_alias("t");
    let opts = RoutingOptions::new()
        .with_encapsulated_identifiers(true)
        .with_dirty_reads(true);

    for op in [OperationType::Insert, OperationType::Update, OperationType::Select] {
        let mut group = c.benchmark_group(format!("compile/{op}"));
        for n in [1, 10, 50, 200] {
            let cols = entity(n);
            group.bench_with_input(BenchmarkId::from_parameter(n), &cols, |b, cols| {
                b.iter(|| {
                    black_box(compile(op, EntityShape::SingleEntity, cols, &table, &opts).unwrap())
                });
            });
        }
        group.finish();
    }
}

fn bench_bulk_collection(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/bulk_collection");
    let table = TableInfo::new("Things");
    let opts = RoutingOptions::new().with_bulk_load(true);

    for n in [10, 200] {
        let cols = entity(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &cols, |b, cols| {
            b.iter(|| {
                black_box(
                    compile(OperationType::Select, EntityShape::EntityCollection, cols, &table, &opts)
                        .unwrap(),
                )
            });
        });
    }

    group.finish();
}

fn bench_cache_hit(c: &mut Criterion) {
    let cache = StatementCache::new(64);
    let cols = entity(50);
    let table = TableInfo::new("Things");
    let opts = RoutingOptions::new();

    c.bench_function("cache/hit", |b| {
        b.iter(|| {
            black_box(
                cache
                    .compile(OperationType::Update, EntityShape::SingleEntity, &cols, &table, &opts)
                    .unwrap(),
            )
        });
    });
}

criterion_group!(benches, bench_compile, bench_bulk_collection, bench_cache_hit);
criterion_main!(benches);
