// Identity provider trait for password sign-in
use crate::domain::session::SignedInUser;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("email and password are required")]
    MissingCredentials,
    #[error("sign-in rejected: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange email and password for an id token. Bad credentials surface as `AuthError::Rejected`.
    async fn sign_in(&self, email: &str, password: &str) -> anyhow::Result<SignedInUser>;
}
