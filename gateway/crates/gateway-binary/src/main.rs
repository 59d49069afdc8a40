#![cfg_attr(test, allow(unused_crate_dependencies))]

use std::sync::Arc;

use anyhow::{anyhow, Context};
use args::{Args, Command};
use clap::crate_version;
use mimalloc::MiMalloc;
use sqlite_connector_types::transport::{PoolingConfig, SqliteTransport};
use sqlite_graphql::{Engine, GraphqlRequest};
use sqlite_graphql_config::Config;
use tokio::runtime;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod args;
mod logging;

const THREAD_NAME: &str = "sqlite-graphql";

fn main() -> anyhow::Result<()> {
    let args = self::args::parse();
    let config = args.config()?;

    logging::init(&args, &config);

    let runtime = runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name(THREAD_NAME)
        .build()?;

    let crate_version = crate_version!();
    tracing::debug!("sqlite-graphql {crate_version}");

    let succeeded = runtime.block_on(run(args, config))?;

    if !succeeded {
        std::process::exit(1);
    }

    Ok(())
}

/// Runs the command, `false` if the response carries errors.
async fn run(args: Args, config: Config) -> anyhow::Result<bool> {
    let mut builder = Engine::builder(config);

    for (name, path) in args.databases()? {
        let pooling = PoolingConfig {
            read_only: true,
            ..Default::default()
        };

        let transport = SqliteTransport::new(&path.to_string_lossy(), pooling)
            .await
            .with_context(|| format!("could not open {}", path.display()))?;

        builder = builder.database(name, Arc::new(transport));
    }

    let engine = builder.build()?;

    match args.command {
        Command::Query {
            query,
            variables,
            operation_name,
            database,
        } => {
            let mut request = GraphqlRequest::new(query);

            if let Some(variables) = variables {
                let variables = serde_json::from_str(&variables).context("--variables must be a JSON object")?;
                request = request.variables(variables);
            }

            if let Some(operation_name) = operation_name {
                request = request.operation_name(operation_name);
            }

            let response = engine.execute(database.as_deref(), request).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);

            Ok(!response.is_err())
        }
        Command::Sdl { database } => {
            println!("{}", engine.sdl(database.as_deref()).await?);
            Ok(true)
        }
        Command::ExampleQuery { table, database } => {
            let query = engine
                .example_query(database.as_deref(), &table)
                .await?
                .ok_or_else(|| anyhow!("no table named {table}"))?;

            println!("{query}");
            Ok(true)
        }
    }
}
