//! In-process HTTP targets for demos and tests.

pub mod server;

pub use server::{hello_router, TargetServer, HELLO_BODY};
