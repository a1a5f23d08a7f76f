#![deny(missing_docs)]

//! # Get Command
//!
//! Resolves one record and prints it as JSON.

use crate::args::{parse_kind, QueryOptions};
use crate::error::CliResult;
use staticdata_core::query::keys;
use staticdata_core::{EntityKind, Query, StaticDataSource};
use std::io::Write;

/// Arguments for the get command.
#[derive(clap::Args, Debug, Clone)]
pub struct GetArgs {
    /// Entity kind, e.g. `champion`, `item-list`, `realm`.
    #[clap(value_parser = parse_kind)]
    pub kind: EntityKind,

    /// Target platform, e.g. `NA1`.
    #[clap(long)]
    pub platform: String,

    /// Entity id.
    #[clap(long)]
    pub id: Option<i64>,

    /// Entity name.
    #[clap(long)]
    pub name: Option<String>,

    #[clap(flatten)]
    #[allow(missing_docs)]
    pub options: QueryOptions,
}

impl GetArgs {
    /// The query these arguments describe.
    pub fn query(&self) -> Query {
        let mut query = Query::new().with(keys::PLATFORM, self.platform.as_str());
        if let Some(id) = self.id {
            query.insert(keys::ID, id);
        }
        if let Some(name) = &self.name {
            query.insert(keys::NAME, name.as_str());
        }
        self.options.apply(query)
    }
}

/// Executes the get command.
///
/// # Arguments
///
/// * `args` - Command arguments.
/// * `source` - The engine to resolve through.
/// * `out` - Where the JSON document is written.
pub fn execute(args: &GetArgs, source: &StaticDataSource, out: &mut impl Write) -> CliResult<()> {
    let record = source.resolve(args.kind, &args.query())?;
    serde_json::to_writer_pretty(&mut *out, &record)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use serde_json::Value;

    fn args(id: Option<i64>, name: Option<&str>) -> GetArgs {
        GetArgs {
            kind: EntityKind::Champion,
            platform: "NA1".into(),
            id,
            name: name.map(String::from),
            options: QueryOptions {
                version: Some("7.24.1".into()),
                ..QueryOptions::default()
            },
        }
    }

    #[test]
    fn test_execute_prints_record() {
        let mut out = Vec::new();
        execute(&args(None, Some("Teemo")), &test_support::source(), &mut out).unwrap();

        let printed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed["id"], 17);
        assert_eq!(printed["region"], "NA");
        assert_eq!(printed["locale"], "en_US");
    }

    #[test]
    fn test_execute_reports_invalid_query() {
        let mut out = Vec::new();
        let err = execute(&args(Some(17), Some("Teemo")), &test_support::source(), &mut out)
            .unwrap_err();
        assert!(matches!(err, crate::error::CliError::App(ref e) if e.is_invalid_query()));
        assert!(out.is_empty());
    }
}
