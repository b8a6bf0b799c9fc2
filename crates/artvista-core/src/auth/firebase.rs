//! Firebase Authentication over the Identity Toolkit REST API.

use std::sync::RwLock;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use super::provider::{
    AuthOperation, AuthUser, FederatedChallenge, FederatedProvider, IdentityProvider,
    UserCredential,
};
use super::AuthError;

/// Identity Toolkit v1 base URL
pub const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// HTTP request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateAuthUriRequest<'a> {
    provider_id: &'a str,
    continue_uri: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInWithIdpRequest<'a> {
    request_uri: &'a str,
    session_id: &'a str,
    return_secure_token: bool,
    return_idp_credential: bool,
}

/// Shared shape of signUp / signInWithPassword / signInWithIdp responses
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    display_name: Option<String>,
    id_token: String,
    #[serde(default)]
    refresh_token: String,
    provider_id: Option<String>,
    is_new_user: Option<bool>,
}

impl AccountResponse {
    fn into_user(self, default_provider: &str) -> (AuthUser, Option<bool>) {
        let user = AuthUser {
            uid: self.local_id,
            email: self.email,
            display_name: self.display_name.filter(|n| !n.is_empty()),
            id_token: self.id_token,
            refresh_token: self.refresh_token,
            provider_id: self
                .provider_id
                .unwrap_or_else(|| default_provider.to_string()),
        };
        (user, self.is_new_user)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAuthUriResponse {
    auth_uri: String,
    session_id: String,
}

/// Firebase project client. Keeps the signed-in user in memory the way the
/// web SDK's `currentUser` does; sign-out is local.
pub struct FirebaseAuth {
    client: Client,
    api_key: String,
    base_url: String,
    redirect_uri: String,
    current: RwLock<Option<AuthUser>>,
}

impl FirebaseAuth {
    pub fn new(api_key: impl Into<String>, redirect_uri: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: IDENTITY_TOOLKIT_URL.to_string(),
            redirect_uri: redirect_uri.into(),
            current: RwLock::new(None),
        })
    }

    /// Point at a different Identity Toolkit host, e.g. the local auth emulator
    /// (`http://localhost:9099/identitytoolkit.googleapis.com/v1`).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/accounts:{}?key={}", self.base_url, method, self.api_key)
    }

    async fn call<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T, AuthError> {
        debug!(method = method, "Identity Toolkit request");

        let response = self
            .client
            .post(self.endpoint(method))
            .json(body)
            .send()
            .await
            .map_err(AuthError::network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = AuthError::from_response(status, &body);
            debug!(method = method, status = %status, code = %err.code, "Identity Toolkit error");
            return Err(err);
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::invalid_response(e.to_string()))
    }

    fn set_current(&self, user: Option<AuthUser>) {
        if let Ok(mut current) = self.current.write() {
            *current = user;
        }
    }

    fn finish(
        &self,
        response: AccountResponse,
        operation: AuthOperation,
        default_provider: &str,
    ) -> UserCredential {
        let (user, is_new_user) = response.into_user(default_provider);
        self.set_current(Some(user.clone()));
        UserCredential {
            user,
            operation,
            is_new_user: is_new_user.unwrap_or(operation == AuthOperation::SignUp),
        }
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuth {
    async fn create_user(&self, email: &str, password: &str) -> Result<UserCredential, AuthError> {
        let request = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let response: AccountResponse = self.call("signUp", &request).await?;
        Ok(self.finish(response, AuthOperation::SignUp, "password"))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserCredential, AuthError> {
        let request = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let response: AccountResponse = self.call("signInWithPassword", &request).await?;
        Ok(self.finish(response, AuthOperation::SignIn, "password"))
    }

    async fn begin_federated(&self, provider: FederatedProvider) -> Result<FederatedChallenge, AuthError> {
        let request = CreateAuthUriRequest {
            provider_id: provider.provider_id(),
            continue_uri: &self.redirect_uri,
        };
        let response: CreateAuthUriResponse = self.call("createAuthUri", &request).await?;
        Ok(FederatedChallenge {
            provider,
            auth_uri: response.auth_uri,
            session_id: response.session_id,
        })
    }

    async fn complete_federated(
        &self,
        challenge: &FederatedChallenge,
        callback_url: &str,
    ) -> Result<UserCredential, AuthError> {
        let callback_url = callback_url.trim();
        if callback_url.is_empty() {
            return Err(AuthError::new(
                super::AuthErrorKind::FederatedLoginFailed,
                "MISSING_CALLBACK_URL",
                "No redirect URL was provided",
            ));
        }

        let request = SignInWithIdpRequest {
            request_uri: callback_url,
            session_id: &challenge.session_id,
            return_secure_token: true,
            return_idp_credential: true,
        };
        let response: AccountResponse = self.call("signInWithIdp", &request).await?;
        Ok(self.finish(
            response,
            AuthOperation::Federated,
            challenge.provider.provider_id(),
        ))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.set_current(None);
        Ok(())
    }

    fn current_user(&self) -> Option<AuthUser> {
        self.current.read().ok().and_then(|current| current.clone())
    }
}
