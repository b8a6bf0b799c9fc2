use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::AuthError;

/// A signed-in user as the identity provider reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    /// Bearer token (a JWT) proving the session
    pub id_token: String,
    pub refresh_token: String,
    /// `password`, `google.com`, ...
    pub provider_id: String,
}

impl AuthUser {
    /// Name shown next to comments
    pub fn username(&self) -> String {
        match self.display_name.as_deref().filter(|n| !n.trim().is_empty()) {
            Some(name) => name.to_string(),
            None => self
                .email
                .split('@')
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or("user")
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOperation {
    SignUp,
    SignIn,
    Federated,
}

/// Result of a successful register/login call.
#[derive(Debug, Clone, PartialEq)]
pub struct UserCredential {
    pub user: AuthUser,
    pub operation: AuthOperation,
    pub is_new_user: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FederatedProvider {
    Google,
}

impl FederatedProvider {
    pub fn provider_id(&self) -> &'static str {
        match self {
            FederatedProvider::Google => "google.com",
        }
    }
}

/// An interactive federated login in progress: the user opens `auth_uri`,
/// signs in, and hands back the URL the browser was redirected to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedChallenge {
    pub provider: FederatedProvider,
    pub auth_uri: String,
    pub session_id: String,
}

/// External identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn create_user(&self, email: &str, password: &str) -> Result<UserCredential, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserCredential, AuthError>;

    async fn begin_federated(&self, provider: FederatedProvider) -> Result<FederatedChallenge, AuthError>;

    async fn complete_federated(
        &self,
        challenge: &FederatedChallenge,
        callback_url: &str,
    ) -> Result<UserCredential, AuthError>;

    /// Idempotent when nobody is signed in.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Locally cached user; never touches the network.
    fn current_user(&self) -> Option<AuthUser>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str, display_name: Option<&str>) -> AuthUser {
        AuthUser {
            uid: "uid".to_string(),
            email: email.to_string(),
            display_name: display_name.map(str::to_string),
            id_token: String::new(),
            refresh_token: String::new(),
            provider_id: "password".to_string(),
        }
    }

    #[test]
    fn test_username() {
        assert_eq!(user("kari@example.com", None).username(), "kari");
        assert_eq!(user("kari@example.com", Some("Kari N.")).username(), "Kari N.");
        assert_eq!(user("kari@example.com", Some("  ")).username(), "kari");
        assert_eq!(user("", None).username(), "user");
    }
}
