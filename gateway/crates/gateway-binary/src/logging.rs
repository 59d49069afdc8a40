use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::args::Args;

/// Logs to stderr. `--log` wins over `RUST_LOG`, which wins over the configured level.
pub(crate) fn init(args: &Args, config: &sqlite_graphql_config::Config) {
    let filter = match args.log_level {
        Some(level) => EnvFilter::new(sqlite_graphql_config::LogLevel::from(level).as_filter_str()),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.log_level.unwrap_or_default().as_filter_str())),
    };

    tracing_subscriber::registry()
        .with(args.log_format())
        .with(filter)
        .init();
}
