use crate::cli::CompileArgs;
use crate::config::ProjectConfig;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use entsql::{DialectKind, OperationType, ProviderParameter, RenderedQuery, compile};

pub fn run(args: CompileArgs) -> anyhow::Result<()> {
    let project = ProjectConfig::load(args.config)?;
    let entity = project.entity(&args.entity)?;

    let operation = OperationType::parse(&args.operation, entity.source_type())?;
    let mut options = project.file.routing_options(entity, args.dialect);
    if args.bulk_load {
        options = options.with_bulk_load(true);
    }

    let query = compile(
        operation,
        args.shape,
        &entity.descriptors(),
        &entity.table_info(),
        &options,
    )
    .map_err(|e| anyhow::anyhow!("{}: {e}", entity.name))?;

    println!("{}", query.sql());
    if !query.parameters().is_empty() {
        println!("{}", parameter_table(&query, options.dialect));
    }
    if let Some(timeout) = query.command_timeout() {
        println!("timeout: {}s", timeout.as_secs());
    }
    Ok(())
}

/// Provider type as the target database names it.
fn type_label(p: &ProviderParameter, dialect: DialectKind) -> String {
    match dialect {
        DialectKind::Postgres => p.pg_type().to_string(),
        DialectKind::SqlServer => format!("{:?}", p.db_type()),
    }
}

fn parameter_table(query: &RenderedQuery, dialect: DialectKind) -> Table {
    let header = ["#", "Parameter", "Column", "Type", "Nullable", "Direction"]
        .into_iter()
        .map(|h| Cell::new(h).add_attribute(Attribute::Bold).fg(Color::Cyan));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.collect::<Vec<_>>());

    for (i, p) in query.parameters().iter().enumerate() {
        table.add_row(vec![
            Cell::new((i + 1).to_string()).fg(Color::Yellow),
            Cell::new(p.name()).fg(Color::Green),
            Cell::new(p.column().name()),
            Cell::new(type_label(p, dialect)).fg(Color::Magenta),
            Cell::new(if p.is_nullable() { "yes" } else { "no" }),
            Cell::new(format!("{:?}", p.direction())).fg(Color::DarkGrey),
        ]);
    }
    table
}
