use entsql::{DialectKind, EntityShape};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Compile,
    Check,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Compile(CompileArgs),
    Check(CheckArgs),
}

#[derive(Debug, Clone)]
pub struct CompileArgs {
    pub config: PathBuf,
    pub entity: String,
    /// Raw operation name; validated against the entity's source type later.
    pub operation: String,
    pub shape: EntityShape,
    pub bulk_load: bool,
    pub dialect: Option<DialectKind>,
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct CheckArgs {
    pub config: PathBuf,
    pub dialect: Option<DialectKind>,
    pub verbose: bool,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" => Ok(Command::Help(HelpTopic::Root)),
        "compile" => parse_compile(it.map(|s| s.as_str())),
        "check" => parse_check(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

fn parse_shape(v: &str) -> anyhow::Result<EntityShape> {
    match v {
        "single" => Ok(EntityShape::SingleEntity),
        "collection" => Ok(EntityShape::EntityCollection),
        other => anyhow::bail!("invalid --shape: {other} (expected single or collection)"),
    }
}

fn parse_dialect(v: &str) -> anyhow::Result<DialectKind> {
    v.parse::<DialectKind>()
        .map_err(|e| anyhow::anyhow!("invalid --dialect: {e}"))
}

fn parse_compile<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from("entsql.toml");
    let mut entity: Option<String> = None;
    let mut operation: Option<String> = None;
    let mut shape = EntityShape::SingleEntity;
    let mut bulk_load = false;
    let mut dialect: Option<DialectKind> = None;
    let mut verbose = false;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Compile)),
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = PathBuf::from(v);
            }
            _ if token.starts_with("--config=") => {
                config = PathBuf::from(token.trim_start_matches("--config="));
            }
            "--entity" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--entity requires a value");
                };
                entity = Some(v.to_string());
            }
            _ if token.starts_with("--entity=") => {
                entity = Some(token.trim_start_matches("--entity=").to_string());
            }
            "--op" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--op requires a value");
                };
                operation = Some(v.to_string());
            }
            _ if token.starts_with("--op=") => {
                operation = Some(token.trim_start_matches("--op=").to_string());
            }
            "--shape" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--shape requires a value");
                };
                shape = parse_shape(v)?;
            }
            _ if token.starts_with("--shape=") => {
                shape = parse_shape(token.trim_start_matches("--shape="))?;
            }
            "--dialect" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--dialect requires a value");
                };
                dialect = Some(parse_dialect(v)?);
            }
            _ if token.starts_with("--dialect=") => {
                dialect = Some(parse_dialect(token.trim_start_matches("--dialect="))?);
            }
            "--bulk-load" => bulk_load = true,
            "-v" | "--verbose" => verbose = true,
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    let Some(entity) = entity else {
        anyhow::bail!("missing --entity");
    };
    let Some(operation) = operation else {
        anyhow::bail!("missing --op");
    };

    Ok(Command::Compile(CompileArgs {
        config,
        entity,
        operation,
        shape,
        bulk_load,
        dialect,
        verbose,
    }))
}

fn parse_check<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from("entsql.toml");
    let mut dialect: Option<DialectKind> = None;
    let mut verbose = false;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Check)),
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = PathBuf::from(v);
            }
            _ if token.starts_with("--config=") => {
                config = PathBuf::from(token.trim_start_matches("--config="));
            }
            "--dialect" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--dialect requires a value");
                };
                dialect = Some(parse_dialect(v)?);
            }
            _ if token.starts_with("--dialect=") => {
                dialect = Some(parse_dialect(token.trim_start_matches("--dialect="))?);
            }
            "-v" | "--verbose" => verbose = true,
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    Ok(Command::Check(CheckArgs {
        config,
        dialect,
        verbose,
    }))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
entsql - compile entity mappings into CRUD SQL

USAGE:
  entsql <COMMAND> [OPTIONS]

COMMANDS:
  compile       Print the SQL and parameters for one entity operation
  check         Compile every entity operation and report failures

Run `entsql <command> --help` for more."
            );
        }
        HelpTopic::Compile => {
            println!(
                "\
USAGE:
  entsql compile --entity <NAME> --op <OPERATION> [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: entsql.toml)
  --entity <NAME>       Entity name from [[entities]]
  --op <OPERATION>      exists | delete | insert | select | update
  --shape <SHAPE>       single | collection (default: single)
  --bulk-load           Bulk-load collection selects
  --dialect <DIALECT>   Override data_source.dialect (sqlserver | postgres)
  -v, --verbose         Emit compile events to stderr
  -h, --help            Print help"
            );
        }
        HelpTopic::Check => {
            println!(
                "\
USAGE:
  entsql check [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: entsql.toml)
  --dialect <DIALECT>   Override data_source.dialect (sqlserver | postgres)
  -v, --verbose         Emit compile events to stderr
  -h, --help            Print help"
            );
        }
    }
}
