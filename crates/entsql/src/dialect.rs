//! SQL dialects: identifier delimiters, placeholders, row limits, lock hints.
//!
//! Routing and planning are dialect-neutral; everything that differs between
//! databases goes through the [`Dialect`] trait so another database only needs
//! a new implementation here.

use crate::error::CompileError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Rendering strategy for one SQL dialect.
pub trait Dialect: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Write one identifier part wrapped in the dialect's delimiters.
    fn write_quoted(&self, ident: &str, out: &mut String);

    /// Write the placeholder for a parameter.
    ///
    /// `position` is the 1-based index of the parameter in the rendered
    /// query's parameter list.
    fn write_placeholder(&self, parameter: &str, position: usize, out: &mut String);

    /// Table hint appended after the FROM target for dirty reads, if the
    /// dialect has one.
    fn dirty_read_hint(&self) -> Option<&'static str> {
        None
    }

    /// Row limit written right after `SELECT`.
    fn write_limit_prefix(&self, _limit: u32, _out: &mut String) {}

    /// Row limit written at the end of the statement.
    fn write_limit_suffix(&self, _limit: u32, _out: &mut String) {}
}

/// T-SQL: `[ident]`, named `@param` placeholders, `TOP (n)`, `WITH (NOLOCK)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServer;

impl Dialect for SqlServer {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn write_quoted(&self, ident: &str, out: &mut String) {
        out.push('[');
        for ch in ident.chars() {
            if ch == ']' {
                out.push_str("]]");
            } else {
                out.push(ch);
            }
        }
        out.push(']');
    }

    fn write_placeholder(&self, parameter: &str, _position: usize, out: &mut String) {
        out.push_str(parameter);
    }

    fn dirty_read_hint(&self) -> Option<&'static str> {
        Some("WITH (NOLOCK)")
    }

    fn write_limit_prefix(&self, limit: u32, out: &mut String) {
        out.push_str("TOP (");
        out.push_str(&limit.to_string());
        out.push_str(") ");
    }
}

/// PostgreSQL: `"ident"`, positional `$n` placeholders, trailing `LIMIT n`.
///
/// Postgres never exposes uncommitted rows, so dirty reads render nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Dialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn write_quoted(&self, ident: &str, out: &mut String) {
        out.push('"');
        for ch in ident.chars() {
            if ch == '"' {
                out.push_str("\"\"");
            } else {
                out.push(ch);
            }
        }
        out.push('"');
    }

    fn write_placeholder(&self, _parameter: &str, position: usize, out: &mut String) {
        out.push('$');
        out.push_str(&position.to_string());
    }

    fn write_limit_suffix(&self, limit: u32, out: &mut String) {
        out.push_str(" LIMIT ");
        out.push_str(&limit.to_string());
    }
}

/// Selectable dialect, usable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialectKind {
    #[default]
    #[serde(alias = "sqlserver", alias = "mssql")]
    SqlServer,
    #[serde(alias = "postgresql", alias = "pg")]
    Postgres,
}

impl DialectKind {
    pub fn dialect(&self) -> &'static dyn Dialect {
        match self {
            DialectKind::SqlServer => &SqlServer,
            DialectKind::Postgres => &Postgres,
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dialect().name())
    }
}

impl FromStr for DialectKind {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlserver" | "sql_server" | "mssql" => Ok(DialectKind::SqlServer),
            "postgres" | "postgresql" | "pg" => Ok(DialectKind::Postgres),
            other => Err(CompileError::invalid_argument(format!(
                "Unknown dialect '{other}'"
            ))),
        }
    }
}

/// Write an identifier, delimiting each dotted part when `encapsulate` is set.
///
/// `dbo.Orders` becomes `[dbo].[Orders]` on SQL Server.
pub(crate) fn write_ident(dialect: &dyn Dialect, ident: &str, encapsulate: bool, out: &mut String) {
    if !encapsulate {
        out.push_str(ident);
        return;
    }
    for (i, part) in ident.split('.').enumerate() {
        if i > 0 {
            out.push('.');
        }
        dialect.write_quoted(part, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(dialect: &dyn Dialect, s: &str, encapsulate: bool) -> String {
        let mut out = String::new();
        write_ident(dialect, s, encapsulate, &mut out);
        out
    }

    #[test]
    fn sqlserver_brackets() {
        assert_eq!(ident(&SqlServer, "Orders", true), "[Orders]");
        assert_eq!(ident(&SqlServer, "dbo.Orders", true), "[dbo].[Orders]");
        assert_eq!(ident(&SqlServer, "odd]name", true), "[odd]]name]");
    }

    #[test]
    fn postgres_quotes() {
        assert_eq!(ident(&Postgres, "public.users", true), r#""public"."users""#);
        assert_eq!(ident(&Postgres, r#"has"quote"#, true), r#""has""quote""#);
    }

    #[test]
    fn bare_when_not_encapsulated() {
        assert_eq!(ident(&SqlServer, "dbo.Orders", false), "dbo.Orders");
    }

    #[test]
    fn placeholders() {
        let mut out = String::new();
        SqlServer.write_placeholder("@Id", 3, &mut out);
        out.push(' ');
        Postgres.write_placeholder("@Id", 3, &mut out);
        assert_eq!(out, "@Id $3");
    }

    #[test]
    fn dialect_from_str() {
        assert_eq!("MSSQL".parse::<DialectKind>().unwrap(), DialectKind::SqlServer);
        assert_eq!("pg".parse::<DialectKind>().unwrap(), DialectKind::Postgres);
        assert!("oracle".parse::<DialectKind>().unwrap_err().is_invalid_argument());
    }
}
