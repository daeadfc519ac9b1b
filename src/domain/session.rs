// Authentication session passed explicitly to every store call
use serde::Serialize;

/// Bearer id token issued by the identity provider.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    id_token: String,
}

impl Session {
    pub fn new(id_token: impl Into<String>) -> Self {
        Self {
            id_token: id_token.into(),
        }
    }

    pub fn id_token(&self) -> &str {
        &self.id_token
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("id_token", &"<redacted>").finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignedInUser {
    pub id_token: String,
    pub local_id: String,
    pub email: String,
    pub expires_in_secs: u64,
}
