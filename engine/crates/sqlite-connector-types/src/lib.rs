pub mod database_definition;
mod error;
pub mod filter;
pub mod namer;
pub mod transport;

pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;
