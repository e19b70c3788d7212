//! HTTP server for Bramble.
//!
//! Exposes book upload, narration-audio upload, and read-only navigation
//! over the loaded graph. Everything interesting happens in
//! [`bramble_engine`]; this crate is routing, auth plumbing, and error
//! mapping.

pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use auth::{Action, AllowAllAuth, AuthProvider, Credentials, Identity};
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::{build_router, AppState};
pub use server::BrambleServer;
