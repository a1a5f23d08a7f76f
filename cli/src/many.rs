#![deny(missing_docs)]

//! # Many Command
//!
//! Resolves many ids on one platform, or one request on many platforms. Each
//! element is printed as its own JSON document; failed elements are reported
//! on stderr and do not stop the rest.

use crate::args::{parse_kind, QueryOptions};
use crate::error::{CliError, CliResult};
use staticdata_core::query::keys;
use staticdata_core::{EntityKind, Query, StaticDataSource};
use std::io::Write;

/// Arguments for the many command.
#[derive(clap::Args, Debug, Clone)]
pub struct ManyArgs {
    /// Entity kind, e.g. `champion`, `champion-list`, `realm`.
    #[clap(value_parser = parse_kind)]
    pub kind: EntityKind,

    /// Target platform of an id fan-out.
    #[clap(long, requires = "ids", conflicts_with = "platforms")]
    pub platform: Option<String>,

    /// Entity ids, comma separated.
    #[clap(long, value_delimiter = ',')]
    pub ids: Vec<i64>,

    /// Target platforms, comma separated.
    #[clap(long, value_delimiter = ',')]
    pub platforms: Vec<String>,

    #[clap(flatten)]
    #[allow(missing_docs)]
    pub options: QueryOptions,
}

impl ManyArgs {
    /// The query these arguments describe.
    pub fn query(&self) -> Query {
        let mut query = Query::new();
        if let Some(platform) = &self.platform {
            query.insert(keys::PLATFORM, platform.as_str());
        }
        if !self.ids.is_empty() {
            query.insert(keys::IDS, self.ids.clone());
        }
        if !self.platforms.is_empty() {
            query.insert(keys::PLATFORMS, self.platforms.clone());
        }
        self.options.apply(query)
    }
}

/// Executes the many command.
///
/// Returns an error once every element has been printed if any of them failed.
pub fn execute(args: &ManyArgs, source: &StaticDataSource, out: &mut impl Write) -> CliResult<()> {
    let records = source.resolve_many(args.kind, &args.query())?;

    let mut failed = 0usize;
    let mut total = 0usize;
    for result in records {
        total += 1;
        match result {
            Ok(record) => {
                serde_json::to_writer_pretty(&mut *out, &record)?;
                writeln!(out)?;
            }
            Err(err) => {
                failed += 1;
                eprintln!("error: {}", err);
            }
        }
    }

    tracing::debug!(kind = %args.kind, total, failed, "many finished");
    if failed > 0 {
        return Err(CliError::General(format!(
            "{} of {} elements failed",
            failed, total
        )));
    }
    Ok(())
}
