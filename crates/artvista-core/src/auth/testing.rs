//! Scripted identity provider for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use super::provider::{
    AuthOperation, AuthUser, FederatedChallenge, FederatedProvider, IdentityProvider,
    UserCredential,
};
use super::AuthError;
use crate::session::encode_unsigned;

pub struct MockProvider {
    current: Mutex<Option<AuthUser>>,
    failure: Option<AuthError>,
    sign_out_failure: Option<AuthError>,
    sign_out_calls: AtomicUsize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(None),
            failure: None,
            sign_out_failure: None,
            sign_out_calls: AtomicUsize::new(0),
        }
    }

    /// Every sign-in style call fails with `err`.
    pub fn failing(err: AuthError) -> Self {
        Self {
            failure: Some(err),
            ..Self::new()
        }
    }

    pub fn failing_sign_out(err: AuthError) -> Self {
        Self {
            sign_out_failure: Some(err),
            ..Self::new()
        }
    }

    pub fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }

    fn issue(&self, email: &str, provider_id: &str, operation: AuthOperation) -> Result<UserCredential, AuthError> {
        if let Some(ref err) = self.failure {
            return Err(err.clone());
        }
        let token = encode_unsigned(&json!({
            "exp": Utc::now().timestamp() + 3600,
            "sub": "uid-test",
            "email": email,
        }));
        let user = AuthUser {
            uid: "uid-test".to_string(),
            email: email.to_string(),
            display_name: None,
            id_token: token.as_str().to_string(),
            refresh_token: "refresh".to_string(),
            provider_id: provider_id.to_string(),
        };
        *self.current.lock().unwrap() = Some(user.clone());
        Ok(UserCredential {
            user,
            operation,
            is_new_user: operation == AuthOperation::SignUp,
        })
    }
}

#[async_trait]
impl IdentityProvider for MockProvider {
    async fn create_user(&self, email: &str, _password: &str) -> Result<UserCredential, AuthError> {
        self.issue(email, "password", AuthOperation::SignUp)
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<UserCredential, AuthError> {
        self.issue(email, "password", AuthOperation::SignIn)
    }

    async fn begin_federated(&self, provider: FederatedProvider) -> Result<FederatedChallenge, AuthError> {
        Ok(FederatedChallenge {
            provider,
            auth_uri: "https://accounts.google.com/o/oauth2/auth?client_id=test".to_string(),
            session_id: "session-test".to_string(),
        })
    }

    async fn complete_federated(
        &self,
        challenge: &FederatedChallenge,
        _callback_url: &str,
    ) -> Result<UserCredential, AuthError> {
        self.issue("google@example.com", challenge.provider.provider_id(), AuthOperation::Federated)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        *self.current.lock().unwrap() = None;
        match self.sign_out_failure {
            Some(ref err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn current_user(&self) -> Option<AuthUser> {
        self.current.lock().unwrap().clone()
    }
}
