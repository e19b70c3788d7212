use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory narration audio is written under.
    pub audio_root: PathBuf,
    /// Public address prefix recorded on content rows.
    pub public_audio_base: String,
    /// Upper bound for uploaded document and audio bodies.
    pub max_upload_bytes: usize,
    pub allow_anonymous_uploads: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8370".parse().expect("valid literal address"),
            audio_root: PathBuf::from("audio"),
            public_audio_base: "/audio".into(),
            max_upload_bytes: 4 * 1024 * 1024,
            allow_anonymous_uploads: true,
        }
    }
}

impl ServerConfig {
    /// Parse a TOML configuration document. Missing keys fall back to the
    /// defaults.
    pub fn from_toml_str(raw: &str) -> ServerResult<Self> {
        toml::from_str(raw).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> ServerResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}
