//! oraplan Core - Core abstractions shared by the analyzer, drivers and CLI
//!
//! This crate defines:
//!
//! - `ConnectionConfig` - Connection descriptor for a single analysis run
//! - `DatabaseDriver` - Trait for opening sessions from a descriptor
//! - `Connection` - Trait for an open database session
//! - `Settings` - Optional on-disk defaults for the CLI
//! - Common types like `Value`, `Row`, `QueryResult`

mod connection;
mod driver;
mod error;
pub mod settings;
mod types;

pub use connection::*;
pub use driver::*;
pub use error::*;
pub use settings::Settings;
pub use types::*;
