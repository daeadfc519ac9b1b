// Password sign-in against the hosted identity REST API
use crate::application::identity_provider::{AuthError, IdentityProvider};
use crate::domain::session::SignedInUser;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct FirebaseAuth {
    client: reqwest::Client,
    auth_url: String,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    id_token: String,
    local_id: String,
    email: String,
    /// Seconds, sent as a string
    expires_in: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl FirebaseAuth {
    pub fn new(client: reqwest::Client, auth_url: String, api_key: String) -> Self {
        Self {
            client,
            auth_url: auth_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn sign_in_url(&self) -> String {
        format!(
            "{}/v1/accounts:signInWithPassword?key={}",
            self.auth_url,
            urlencoding::encode(&self.api_key)
        )
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignedInUser> {
        let response = self
            .client
            .post(self.sign_in_url())
            .json(&SignInRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await
            .context("Failed to send sign-in request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(rejection(status, &body));
        }

        let body = response
            .json::<SignInResponse>()
            .await
            .context("Failed to parse sign-in response")?;

        Ok(into_user(body))
    }
}

fn into_user(body: SignInResponse) -> SignedInUser {
    SignedInUser {
        expires_in_secs: body.expires_in.parse().unwrap_or(0),
        id_token: body.id_token,
        local_id: body.local_id,
        email: body.email,
    }
}

/// Client errors carry a reason code such as `INVALID_PASSWORD`; anything
/// else is an upstream failure.
fn rejection(status: reqwest::StatusCode, body: &str) -> anyhow::Error {
    if status.is_client_error() {
        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
            return AuthError::Rejected(envelope.error.message).into();
        }
    }
    anyhow::anyhow!("Sign-in failed with status {}: {}", status, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_sign_in_url() {
        let auth = FirebaseAuth::new(
            reqwest::Client::new(),
            "https://identitytoolkit.googleapis.com/".to_string(),
            "abc key".to_string(),
        );
        assert_eq!(
            auth.sign_in_url(),
            "https://identitytoolkit.googleapis.com/v1/accounts:signInWithPassword?key=abc%20key"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(SignInRequest {
            email: "ops@example.com",
            password: "pw",
            return_secure_token: true,
        })
        .unwrap();
        assert_eq!(body["returnSecureToken"], true);
        assert_eq!(body["email"], "ops@example.com");
    }

    #[test]
    fn test_parse_success_body() {
        let body: SignInResponse = serde_json::from_str(
            r#"{"kind":"identitytoolkit#VerifyPasswordResponse","localId":"uid-7","email":"ops@example.com","displayName":"","idToken":"tok","registered":true,"refreshToken":"ref","expiresIn":"3600"}"#,
        )
        .unwrap();
        let user = into_user(body);
        assert_eq!(user.local_id, "uid-7");
        assert_eq!(user.id_token, "tok");
        assert_eq!(user.expires_in_secs, 3600);
    }

    #[test]
    fn test_rejection_mapping() {
        let err = rejection(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"code":400,"message":"INVALID_LOGIN_CREDENTIALS","errors":[]}}"#,
        );
        match err.downcast_ref::<AuthError>() {
            Some(AuthError::Rejected(reason)) => assert_eq!(reason, "INVALID_LOGIN_CREDENTIALS"),
            other => panic!("unexpected {:?}", other),
        }

        let err = rejection(StatusCode::SERVICE_UNAVAILABLE, "down");
        assert!(err.downcast_ref::<AuthError>().is_none());
    }
}
