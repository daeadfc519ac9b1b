// Auth service - Use case for signing a user in
use crate::application::identity_provider::{AuthError, IdentityProvider};
use crate::domain::session::SignedInUser;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthService {
    provider: Arc<dyn IdentityProvider>,
}

impl AuthService {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    pub async fn login(&self, email: &str, password: &str) -> anyhow::Result<SignedInUser> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials.into());
        }

        match self.provider.sign_in(email, password).await {
            Ok(user) => {
                tracing::info!("Signed in {}", user.email);
                Ok(user)
            }
            Err(e) => {
                tracing::warn!("Sign-in failed for {}: {}", email, e);
                Err(e)
            }
        }
    }
}
