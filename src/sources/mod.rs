//! Long-lived credential sources.

mod chain;
mod env;
mod static_credentials;

pub use chain::ChainCredentials;
pub use env::EnvCredentials;
pub use static_credentials::StaticCredentials;
