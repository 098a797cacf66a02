use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use cascade_delete::{CascadeConfig, CascadeExecutor, Dialect, MemoryStore, Query, Record, Schema, Target, Value};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("cascade_delete=warn".parse()?))
        .init();

    let args: Vec<String> = env::args().collect();

    let mut schema_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut entity: Option<String> = None;
    let mut id: Option<String> = None;
    let mut conditions: Vec<(String, Value)> = Vec::new();
    let mut dialect: Option<Dialect> = None;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        if flag == "--help" || flag == "-h" {
            print_help();
            return Ok(());
        }

        let Some(value) = args.get(i + 1) else {
            bail!("{} expects a value", flag);
        };
        match flag {
            "--schema" | "-s" => schema_path = Some(PathBuf::from(value)),
            "--config" | "-c" => config_path = Some(PathBuf::from(value)),
            "--entity" | "-e" => entity = Some(value.clone()),
            "--id" => id = Some(value.clone()),
            "--where" | "-w" => {
                let (column, raw) = value
                    .split_once('=')
                    .with_context(|| format!("--where expects col=value, got {}", value))?;
                conditions.push((column.to_string(), Value::parse(raw)));
            }
            "--dialect" | "-d" => {
                dialect = Some(
                    value
                        .parse()
                        .map_err(|_| anyhow::anyhow!("unknown dialect {}", value))?,
                )
            }
            other => bail!("unknown argument {}", other),
        }
        i += 2;
    }

    let mut config = match &config_path {
        Some(path) => CascadeConfig::load(path)?,
        None => CascadeConfig::from_env(),
    };
    if let Some(dialect) = dialect {
        config.dialect = dialect;
    }

    let schema_path = schema_path.context("--schema is required")?;
    let entity = entity.context("--entity is required")?;

    let json = fs::read_to_string(&schema_path)
        .with_context(|| format!("reading {}", schema_path.display()))?;
    let schema = Schema::from_json(&json, config.foreign_key_convention)?;

    let target = match (id, conditions.is_empty()) {
        (Some(_), false) => bail!("--id and --where are mutually exclusive"),
        (Some(raw), true) => {
            let entity_id = schema.lookup(&entity)?;
            let id_attribute = schema
                .entity(entity_id)
                .id_attribute
                .clone()
                .with_context(|| format!("{} has no id attribute, use --where", entity))?;
            Target::from(Record::new(&entity).with(id_attribute, Value::parse(&raw)))
        }
        (None, _) => {
            let mut query = Query::new(&entity);
            for (column, value) in conditions {
                query = query.where_eq(column, value);
            }
            Target::from(query)
        }
    };

    let store = MemoryStore::new(config.dialect);
    let executor = CascadeExecutor::new(store, Arc::new(schema), config);

    for statement in executor.explain(&target)? {
        println!("{};", statement);
    }

    Ok(())
}

fn print_help() {
    println!("cascade-explain - print the deletes a cascading destroy would run");
    println!();
    println!("USAGE:");
    println!("    cascade-explain --schema <file.json> --entity <Name> (--id <value> | --where col=value ...)");
    println!();
    println!("OPTIONS:");
    println!("    -s, --schema <file>     Schema document (JSON)");
    println!("    -e, --entity <name>     Entity type to destroy");
    println!("        --id <value>        Root id; quote it ('\"42\"') to force text");
    println!("    -w, --where <col=val>   Root filter, repeatable");
    println!("    -d, --dialect <name>    postgres, mysql or sqlite");
    println!("    -c, --config <file>     Config file, overridden by CASCADE_* variables");
    println!("    -h, --help              Show this help");
}
