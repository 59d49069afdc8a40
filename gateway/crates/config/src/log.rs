/// How much the libraries log.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    serde::Deserialize,
    strum::EnumString,
    strum::AsRefStr,
    strum::Display,
    strum::VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    /// Completely disables logging
    Off,
    /// Only errors from our libraries
    Error,
    /// Warnings and errors from our libraries
    #[default]
    Warn,
    /// Info, warning and error messages from our libraries
    Info,
    /// Debug, info, warning and error messages from our libraries
    Debug,
    /// Everything, dependencies included
    Trace,
}

impl LogLevel {
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "sqlite_graphql=error,parser_sqlite=error,sqlite_connector_types=error,off",
            LogLevel::Warn => "sqlite_graphql=warn,parser_sqlite=warn,sqlite_connector_types=warn,off",
            LogLevel::Info => "sqlite_graphql=info,parser_sqlite=info,sqlite_connector_types=info,off",
            LogLevel::Debug => "sqlite_graphql=debug,parser_sqlite=debug,sqlite_connector_types=debug,off",
            LogLevel::Trace => "trace",
        }
    }
}
