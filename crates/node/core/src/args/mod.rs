//! CLI argument structs for node infrastructure configuration.
//!
//! These args serve dual purposes:
//! - CLI parsing via clap (`#[derive(Args)]`)
//! - Configuration serialization via serde (`#[derive(Serialize, Deserialize)]`)

mod log;
mod root;

pub use log::LogArgs;
pub use root::RootArgs;
