use std::sync::Arc;

use tracing::{error, info, warn};

use super::provider::{AuthUser, FederatedChallenge, FederatedProvider, IdentityProvider, UserCredential};
use super::AuthError;
use crate::session::SessionStore;

/// Authentication wrapper shared by the views and the route guard.
///
/// Successful register/login/federated login persist the user's ID token to
/// the session store; logout removes it.
#[derive(Clone)]
pub struct AuthService {
    provider: Arc<dyn IdentityProvider>,
    session: SessionStore,
}

impl AuthService {
    pub fn new(provider: Arc<dyn IdentityProvider>, session: SessionStore) -> Self {
        Self { provider, session }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<UserCredential, AuthError> {
        let credential = self.provider.create_user(email, password).await?;
        info!(uid = %credential.user.uid, "Registered new account");
        self.persist(&credential.user);
        Ok(credential)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let credential = self.provider.sign_in(email, password).await?;
        info!(uid = %credential.user.uid, "Login successful");
        self.persist(&credential.user);
        Ok(credential.user)
    }

    pub async fn logout(&self) -> Result<(), AuthError> {
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to clear session token");
        }
        self.provider.sign_out().await?;
        info!("Logged out");
        Ok(())
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.provider.current_user()
    }

    /// First half of Google sign-in: where to send the user.
    pub async fn start_google_signin(&self) -> Result<FederatedChallenge, AuthError> {
        self.provider.begin_federated(FederatedProvider::Google).await
    }

    /// Second half of Google sign-in, given the URL the browser landed on.
    pub async fn signin_with_google(
        &self,
        challenge: &FederatedChallenge,
        callback_url: &str,
    ) -> Result<AuthUser, AuthError> {
        match self.provider.complete_federated(challenge, callback_url).await {
            Ok(credential) => {
                info!(uid = %credential.user.uid, email = %credential.user.email, "User signed in with Google");
                self.persist(&credential.user);
                Ok(credential.user)
            }
            Err(e) => {
                error!(code = %e.code, error = %e, "Error signing in with Google");
                Err(e)
            }
        }
    }

    fn persist(&self, user: &AuthUser) {
        if let Err(e) = self.session.save(&user.id_token) {
            warn!(error = %e, "Failed to save session token");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::testing::MockProvider;
    use crate::auth::AuthErrorKind;

    fn service(provider: Arc<MockProvider>) -> AuthService {
        AuthService::new(provider, SessionStore::in_memory())
    }

    #[tokio::test]
    async fn test_login_persists_token() {
        let provider = Arc::new(MockProvider::new());
        let auth = service(provider.clone());

        let user = auth.login("kari@example.com", "hunter22").await.unwrap();

        let stored = auth.session().token().unwrap().expect("token stored");
        assert_eq!(stored.as_str(), user.id_token);
        assert_eq!(auth.current_user().map(|u| u.uid), Some(user.uid));
    }

    #[tokio::test]
    async fn test_register_returns_credential() {
        let provider = Arc::new(MockProvider::new());
        let auth = service(provider);

        let credential = auth.register("new@example.com", "hunter22").await.unwrap();
        assert!(credential.is_new_user);
        assert!(auth.session().token().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_login_error_is_passed_through() {
        let provider = Arc::new(MockProvider::failing(AuthError::new(
            AuthErrorKind::InvalidCredentials,
            "INVALID_LOGIN_CREDENTIALS",
            "INVALID_LOGIN_CREDENTIALS",
        )));
        let auth = service(provider);

        let err = auth.login("kari@example.com", "wrong").await.unwrap_err();
        assert_eq!(err.code, "INVALID_LOGIN_CREDENTIALS");
        assert!(auth.session().token().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_token() {
        let provider = Arc::new(MockProvider::new());
        let auth = service(provider.clone());

        auth.login("kari@example.com", "hunter22").await.unwrap();
        auth.logout().await.unwrap();

        assert!(auth.session().token().unwrap().is_none());
        assert!(auth.current_user().is_none());
        assert_eq!(provider.sign_out_calls(), 1);

        // No session: still fine
        auth.logout().await.unwrap();
    }

    #[tokio::test]
    async fn test_google_signin() {
        let provider = Arc::new(MockProvider::new());
        let auth = service(provider);

        let challenge = auth.start_google_signin().await.unwrap();
        assert_eq!(challenge.provider, FederatedProvider::Google);

        let user = auth
            .signin_with_google(&challenge, "http://localhost/?code=abc")
            .await
            .unwrap();
        assert_eq!(user.provider_id, "google.com");
        assert!(auth.session().token().unwrap().is_some());
    }
}
