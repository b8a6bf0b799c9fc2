use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Boundary classification of identity-provider failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    EmailInUse,
    WeakPassword,
    InvalidEmail,
    InvalidCredentials,
    UserDisabled,
    TooManyAttempts,
    OperationNotAllowed,
    FederatedLoginFailed,
    Network,
    Provider,
}

/// An identity-provider failure. `code` is the provider's own error code, untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct AuthError {
    pub kind: AuthErrorKind,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn network(err: reqwest::Error) -> Self {
        let code = if err.is_timeout() { "TIMEOUT" } else { "NETWORK_ERROR" };
        Self::new(AuthErrorKind::Network, code, err.to_string())
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::Provider, "INVALID_RESPONSE", message)
    }

    /// Build from an Identity Toolkit error body:
    /// `{"error": {"code": 400, "message": "WEAK_PASSWORD : Password should be ..."}}`
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => {
                let (code, detail) = match envelope.error.message.split_once(" : ") {
                    Some((code, detail)) => (code.trim().to_string(), detail.trim().to_string()),
                    None => (envelope.error.message.trim().to_string(), String::new()),
                };
                let message = if detail.is_empty() { code.clone() } else { detail };
                Self::new(Self::kind_for_code(&code), code, message)
            }
            Err(_) => Self::new(
                AuthErrorKind::Provider,
                format!("HTTP_{}", status.as_u16()),
                body.chars().take(200).collect::<String>(),
            ),
        }
    }

    pub fn kind_for_code(code: &str) -> AuthErrorKind {
        match code {
            "EMAIL_EXISTS" => AuthErrorKind::EmailInUse,
            "WEAK_PASSWORD" => AuthErrorKind::WeakPassword,
            "INVALID_EMAIL" | "MISSING_EMAIL" => AuthErrorKind::InvalidEmail,
            "EMAIL_NOT_FOUND"
            | "INVALID_PASSWORD"
            | "INVALID_LOGIN_CREDENTIALS"
            | "MISSING_PASSWORD" => AuthErrorKind::InvalidCredentials,
            "USER_DISABLED" => AuthErrorKind::UserDisabled,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthErrorKind::TooManyAttempts,
            "OPERATION_NOT_ALLOWED" | "PASSWORD_LOGIN_DISABLED" => {
                AuthErrorKind::OperationNotAllowed
            }
            "INVALID_IDP_RESPONSE" | "INVALID_CONTINUE_URI" | "MISSING_CONTINUE_URI"
            | "FEDERATED_USER_ID_ALREADY_LINKED" => AuthErrorKind::FederatedLoginFailed,
            _ => AuthErrorKind::Provider,
        }
    }

    /// Short sentence suitable for a form error line.
    pub fn user_message(&self) -> String {
        match self.kind {
            AuthErrorKind::EmailInUse => "An account with this email already exists".to_string(),
            AuthErrorKind::WeakPassword => format!("Password too weak: {}", self.message),
            AuthErrorKind::InvalidEmail => "Please enter a valid email address".to_string(),
            AuthErrorKind::InvalidCredentials => "Invalid email or password".to_string(),
            AuthErrorKind::UserDisabled => "This account has been disabled".to_string(),
            AuthErrorKind::TooManyAttempts => "Too many attempts. Please try again later.".to_string(),
            AuthErrorKind::OperationNotAllowed => "This sign-in method is not enabled".to_string(),
            AuthErrorKind::FederatedLoginFailed => format!("Google sign-in failed: {}", self.code),
            AuthErrorKind::Network => {
                "Unable to connect to server. Check your internet connection.".to_string()
            }
            AuthErrorKind::Provider => format!("Authentication failed: {}", self.code),
        }
    }
}
