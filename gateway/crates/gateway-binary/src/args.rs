use std::{collections::HashSet, path::PathBuf};

use anyhow::{anyhow, bail};
use clap::{Parser, Subcommand};
use sqlite_graphql_config::Config;
use tracing::Subscriber;
use tracing_subscriber::{registry::LookupSpan, Layer};

mod log;

pub(crate) use log::LogLevel;

use self::log::LogStyle;

pub(crate) type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

#[derive(Debug, Parser)]
#[command(name = "sqlite-graphql", version)]
#[command(arg_required_else_help = true)]
/// A GraphQL API for SQLite databases
pub struct Args {
    /// Path to the TOML configuration file
    #[arg(long, short, env = "SQLITE_GRAPHQL_CONFIG")]
    pub config: Option<PathBuf>,
    /// A database file to serve, named after the file without its extension. Repeatable.
    #[arg(long = "db", required = true)]
    pub databases: Vec<PathBuf>,
    /// Set the logging level, overrides RUST_LOG and the configuration
    #[arg(long = "log", env = "SQLITE_GRAPHQL_LOG")]
    pub log_level: Option<LogLevel>,
    /// Set the style of log output
    #[arg(long, env = "SQLITE_GRAPHQL_LOG_STYLE", default_value_t = LogStyle::Text)]
    log_style: LogStyle,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Runs a GraphQL query and prints the response as JSON
    Query {
        /// The GraphQL document
        query: String,
        /// Variables as a JSON object
        #[arg(long)]
        variables: Option<String>,
        /// The operation to run when the document holds several
        #[arg(long)]
        operation_name: Option<String>,
        /// The database to query, the first one by default
        #[arg(long)]
        database: Option<String>,
    },
    /// Prints the GraphQL schema
    Sdl {
        #[arg(long)]
        database: Option<String>,
    },
    /// Prints an example query of a table
    ExampleQuery {
        /// The table name in the database
        table: String,
        #[arg(long)]
        database: Option<String>,
    },
}

impl Args {
    pub fn config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Ok(Config::load(path)?),
            None => Ok(Config::default()),
        }
    }

    /// The databases by name.
    pub fn databases(&self) -> anyhow::Result<Vec<(String, PathBuf)>> {
        let mut names = HashSet::new();
        let mut databases = Vec::with_capacity(self.databases.len());

        for path in &self.databases {
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .ok_or_else(|| anyhow!("{} is not a database file", path.display()))?;

            if !names.insert(name.clone()) {
                bail!("two databases are named {name}");
            }

            databases.push((name, path.clone()));
        }

        Ok(databases)
    }

    pub fn log_format<S>(&self) -> BoxedLayer<S>
    where
        S: Subscriber + for<'span> LookupSpan<'span> + Send + Sync,
    {
        // stdout carries the results
        let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

        match self.log_style {
            // for interactive terminals we provide colored output
            LogStyle::Text if atty::is(atty::Stream::Stderr) => layer.with_ansi(true).boxed(),
            LogStyle::Text => layer.with_ansi(false).boxed(),
            LogStyle::Json => layer.json().boxed(),
        }
    }
}

pub(crate) fn parse() -> Args {
    Args::parse()
}
