pub mod cli;
pub mod dates;
pub mod geo;
pub mod ingest;
pub mod observe;
pub mod patterns;
pub mod profile;
mod semantic;
pub mod structural;
pub mod temporal;
pub mod types;

use std::{collections::HashMap, env, sync::OnceLock};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{LevelFilter, info};
use serde::Serialize;

pub use crate::profile::{
    ColumnProfile, ColumnProfiler, DatasetType, ManualOverride, determine_dataset_type,
};
use crate::{
    cli::{Cli, Commands, ProfileArgs},
    observe::LogObserver,
    types::{ColumnMeta, SemanticTypes, StructuralType},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("column_probe", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Profile(args) => handle_profile(&args),
    }
}

/// One column's entry in the JSON report.
#[derive(Debug, Serialize)]
struct ColumnReport {
    name: String,
    structural_type: StructuralType,
    semantic_types: SemanticTypes,
    meta: ColumnMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    dataset_type: Option<DatasetType>,
}

fn handle_profile(args: &ProfileArgs) -> Result<()> {
    let delimiter = ingest::resolve_delimiter(&args.input, args.delimiter);
    info!(
        "Profiling '{}' with delimiter '{}'",
        args.input.display(),
        printable_delimiter(delimiter)
    );

    let limit = (args.limit > 0).then_some(args.limit);
    let columns = ingest::load_columns(&args.input, delimiter, limit)
        .with_context(|| format!("Loading columns from {:?}", args.input))?;
    let overrides = parse_overrides(&args.overrides)?;

    let selected: Vec<&ingest::Column> = if args.columns.is_empty() {
        columns.iter().collect()
    } else {
        args.columns
            .iter()
            .map(|name| {
                columns
                    .iter()
                    .find(|column| column.name == *name)
                    .ok_or_else(|| anyhow!("Column '{name}' not found in input"))
            })
            .collect::<Result<Vec<_>>>()?
    };

    let observer = LogObserver;
    let profiler = ColumnProfiler::new().with_observer(&observer);
    let reports: Vec<ColumnReport> = selected
        .iter()
        .map(|column| {
            let manual = overrides.get(&column.name);
            let profile = profiler.profile(&column.name, &column.values, manual);
            let dataset_type = determine_dataset_type(
                profile.structural_type,
                profile.semantic_types.keys().copied(),
            );
            ColumnReport {
                name: column.name.clone(),
                structural_type: profile.structural_type,
                semantic_types: profile.semantic_types,
                meta: profile.meta,
                dataset_type,
            }
        })
        .collect();

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&reports)?
    } else {
        serde_json::to_string(&reports)?
    };
    println!("{rendered}");
    info!("Profiled {} column(s)", reports.len());
    Ok(())
}

/// Parses `--override column=structural_type[:tag+tag...]` directives.
fn parse_overrides(specs: &[String]) -> Result<HashMap<String, ManualOverride>> {
    let mut overrides = HashMap::new();
    for spec in specs {
        let (name, rest) = spec
            .split_once('=')
            .ok_or_else(|| anyhow!("Override '{spec}' must look like column=structural_type"))?;
        let (structural, tags) = match rest.split_once(':') {
            Some((structural, tags)) => (structural, Some(tags)),
            None => (rest, None),
        };
        let structural_type: StructuralType = structural
            .parse()
            .with_context(|| format!("Override '{spec}'"))?;
        let semantic_types = tags
            .map(|tags| {
                tags.split('+')
                    .filter(|tag| !tag.is_empty())
                    .map(|tag| tag.parse().with_context(|| format!("Override '{spec}'")))
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?
            .unwrap_or_default();
        overrides.insert(
            name.trim().to_string(),
            ManualOverride {
                structural_type,
                semantic_types,
            },
        );
    }
    Ok(overrides)
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SemanticTag;

    #[test]
    fn overrides_parse_structural_and_tags() {
        let specs = vec!["flag=integer:boolean+categorical".to_string()];
        let overrides = parse_overrides(&specs).expect("parse overrides");
        let manual = overrides.get("flag").expect("flag override");
        assert_eq!(manual.structural_type, StructuralType::Integer);
        assert_eq!(
            manual.semantic_types,
            vec![SemanticTag::Boolean, SemanticTag::Categorical]
        );
    }

    #[test]
    fn overrides_allow_structural_only() {
        let specs = vec!["value=float".to_string()];
        let overrides = parse_overrides(&specs).expect("parse overrides");
        assert!(overrides["value"].semantic_types.is_empty());
    }

    #[test]
    fn malformed_overrides_are_rejected() {
        assert!(parse_overrides(&["nonsense".to_string()]).is_err());
        assert!(parse_overrides(&["col=quaternion".to_string()]).is_err());
        assert!(parse_overrides(&["col=text:quaternion".to_string()]).is_err());
    }
}
