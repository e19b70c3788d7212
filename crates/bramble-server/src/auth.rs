use async_trait::async_trait;
use axum::http::HeaderMap;
use uuid::Uuid;

use bramble_types::OwnerId;

use crate::error::ServerResult;

/// An authenticated caller. The `owner` is what loaded books are attributed
/// to; authentication *policy* lives in the provider, not here.
#[derive(Clone, Debug)]
pub struct Identity {
    pub name: String,
    pub owner: OwnerId,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self {
            name: "anonymous".into(),
            owner: OwnerId::anonymous(),
        }
    }

    pub fn user(name: impl Into<String>, owner: OwnerId) -> Self {
        Self {
            name: name.into(),
            owner,
        }
    }
}

#[derive(Clone, Debug)]
pub enum Credentials {
    Bearer(String),
    Anonymous,
}

impl Credentials {
    /// Extract credentials from request headers (`Authorization: Bearer ...`).
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| Self::Bearer(token.to_string()))
            .unwrap_or(Self::Anonymous)
    }
}

#[derive(Clone, Debug)]
pub enum Action {
    Read,
    UploadBook,
    AttachAudio,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::UploadBook => write!(f, "upload-book"),
            Self::AttachAudio => write!(f, "attach-audio"),
        }
    }
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Identity>;
    async fn authorize(&self, identity: &Identity, action: &Action) -> ServerResult<bool>;
}

/// Development provider: every caller is accepted.
///
/// Bearer tokens map deterministically to an owner id, so repeated uploads
/// with the same token are attributed to the same owner.
pub struct AllowAllAuth;

impl AllowAllAuth {
    fn owner_for_token(token: &str) -> OwnerId {
        let mut bytes = [0u8; 16];
        for (slot, byte) in bytes.iter_mut().zip(token.bytes()) {
            *slot = byte;
        }
        OwnerId::from(Uuid::from_bytes(bytes))
    }
}

#[async_trait]
impl AuthProvider for AllowAllAuth {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Identity> {
        match credentials {
            Credentials::Bearer(token) => Ok(Identity::user(
                format!("bearer:{}", &token[..8.min(token.len())]),
                Self::owner_for_token(token),
            )),
            Credentials::Anonymous => Ok(Identity::anonymous()),
        }
    }

    async fn authorize(&self, _identity: &Identity, _action: &Action) -> ServerResult<bool> {
        Ok(true)
    }
}
