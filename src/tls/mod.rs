//! Per-client TLS trust configuration.
//!
//! Trust decisions live on the HTTP client built for a run. Nothing here
//! touches process-wide TLS defaults, so runs with different policies can
//! share a process.

pub mod error;
pub mod policy;

pub use error::{TlsError, TlsResult};
pub use policy::{client_config, TlsPolicy};
