use crate::cli::CheckArgs;
use crate::config::{EntityConfig, ProjectConfig};
use colored::Colorize;
use entsql::{CompileError, EntityShape, OperationType, RenderedQuery, compile};

pub fn run(args: CheckArgs) -> anyhow::Result<()> {
    let project = ProjectConfig::load(args.config)?;
    println!("Checking {}", project.config_path.display());

    let mut failures = 0usize;
    for entity in &project.file.entities {
        println!("\n{}", entity.name.bold());
        for (operation, shape, bulk_load) in statements(entity) {
            let options = project
                .file
                .routing_options(entity, args.dialect)
                .with_bulk_load(bulk_load);
            let result = compile(
                operation,
                shape,
                &entity.descriptors(),
                &entity.table_info(),
                &options,
            );
            if result.is_err() {
                failures += 1;
            }
            print_result(operation, shape, bulk_load, &result);
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} statement(s) failed to compile");
    }
    println!("\n{}", "All statements compiled.".green().bold());
    Ok(())
}

/// Statements worth checking for an entity, with the bulk-load flag to
/// compile them under. Collection selects are only meaningful for entities
/// that carry a foreign key, and are checked with and without bulk loading.
fn statements(entity: &EntityConfig) -> Vec<(OperationType, EntityShape, bool)> {
    let mut out: Vec<_> = OperationType::ALL
        .iter()
        .map(|&op| (op, EntityShape::SingleEntity, false))
        .collect();
    if entity.has_foreign_key() {
        for bulk_load in [false, true] {
            out.push((OperationType::Select, EntityShape::EntityCollection, bulk_load));
        }
    }
    out
}

fn print_result(
    operation: OperationType,
    shape: EntityShape,
    bulk_load: bool,
    result: &Result<RenderedQuery, CompileError>,
) {
    let label = if bulk_load {
        format!("{operation} ({}, bulk)", shape.as_str())
    } else {
        format!("{operation} ({})", shape.as_str())
    };
    match result {
        Ok(q) => println!("  {} {:<28} {}", "✓".green().bold(), label, q.sql()),
        Err(e) => println!("  {} {:<28} {}", "✗".red().bold(), label, e.to_string().red()),
    }
}
