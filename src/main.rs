//! Hostlens CLI - Query live monitoring state

use anyhow::Context;
use bytesize::ByteSize;
use clap::Parser;
use hostlens::cli::{Args, SubCommand};
use hostlens::{
    format_output, format_table_info, logging, run_query, ConfigHandle, OutputFormat, Schema,
    Store,
};

fn main() {
    let args = Args::parse();
    logging::init(if args.verbose { "debug" } else { "info" });

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let output_format = if args.json { OutputFormat::Json } else { OutputFormat::Human };
    let config = load_config(&args)?;

    match &args.command {
        SubCommand::Query { query } => {
            let state = args
                .state
                .as_ref()
                .context("no state file given, use --state or HOSTLENS_STATE")?;
            let store = Store::load(state)?;
            let schema = Schema::new(&config)?;
            let result = run_query(query, &schema, &store)?;
            println!("{}", format_output(&result, &output_format));
        }

        SubCommand::Tables => {
            let schema = Schema::new(&config)?;
            match output_format {
                OutputFormat::Json => {
                    let tables: Vec<_> = schema
                        .tables()
                        .iter()
                        .map(|t| serde_json::json!({ "name": t.name(), "description": t.description() }))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&tables)?);
                }
                OutputFormat::Human => {
                    println!("Tables:");
                    println!("-------");
                    for table in schema.tables() {
                        println!("  {:<10} {}", table.name(), table.description());
                    }
                }
            }
        }

        SubCommand::Columns { table } => {
            let schema = Schema::new(&config)?;
            let table = schema.table(table)?;
            println!("{}", format_table_info(table, &output_format));
        }

        SubCommand::Config => {
            let current = config.get();
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&*current)?),
                OutputFormat::Human => {
                    println!("Host files");
                    println!("----------");
                    println!("Basepath:      {}", current.hostfiles.basepath.display());
                    println!("Max file size: {}", ByteSize(current.hostfiles.max_file_size));
                }
            }
        }
    }

    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<ConfigHandle> {
    let handle = match &args.config {
        Some(path) => ConfigHandle::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => ConfigHandle::default(),
    };

    if args.basepath.is_some() || args.max_file_size.is_some() {
        let mut config = (*handle.get()).clone();
        if let Some(basepath) = &args.basepath {
            config.hostfiles.basepath = basepath.clone();
        }
        if let Some(max_file_size) = args.max_file_size {
            config.hostfiles.max_file_size = max_file_size;
        }
        handle.update(config)?;
    }

    Ok(handle)
}
