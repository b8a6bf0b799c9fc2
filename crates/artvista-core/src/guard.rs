//! Route guard consulted before entering protected views.
//!
//! `check` is the pure decision over the stored token and the current time.
//! `enforce` reads the session, runs `check`, and applies the forced-logout
//! side effects (clear token, provider logout, notice).

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::auth::AuthService;
use crate::router::Route;
use crate::session::SessionToken;

/// Shown when a protected navigation finds an expired session
pub const SESSION_EXPIRED_NOTICE: &str = "Your session has expired. Please log in again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// No token stored
    Redirect,
    /// Token expired or unreadable
    ForceLogout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    Redirect {
        to: Route,
        notice: Option<&'static str>,
    },
}

impl GuardOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardOutcome::Allow)
    }
}

/// Decide on a navigation given the stored token.
///
/// A token whose payload cannot be decoded, or that carries no `exp`, is
/// treated as expired.
pub fn check(token: Option<&SessionToken>, now: DateTime<Utc>) -> GuardDecision {
    let Some(token) = token else {
        return GuardDecision::Redirect;
    };

    match token.decode_claims().and_then(|claims| claims.exp) {
        Some(exp) if exp < now.timestamp() => GuardDecision::ForceLogout,
        Some(_) => GuardDecision::Allow,
        None => {
            debug!("Session token has no readable expiry");
            GuardDecision::ForceLogout
        }
    }
}

pub async fn enforce(auth: &AuthService, now: DateTime<Utc>) -> GuardOutcome {
    let token = match auth.session().token() {
        Ok(token) => token,
        Err(e) => {
            warn!(error = %e, "Failed to read session token, clearing it");
            if let Err(e) = auth.session().clear() {
                warn!(error = %e, "Failed to clear unreadable session token");
            }
            None
        }
    };

    match check(token.as_ref(), now) {
        GuardDecision::Allow => GuardOutcome::Allow,
        GuardDecision::Redirect => GuardOutcome::Redirect {
            to: Route::Authentication,
            notice: None,
        },
        GuardDecision::ForceLogout => {
            info!("Session expired, forcing logout");
            if let Err(e) = auth.session().clear() {
                warn!(error = %e, "Failed to clear expired session token");
            }
            if let Err(e) = auth.logout().await {
                warn!(code = %e.code, error = %e, "Provider logout failed after session expiry");
            }
            GuardOutcome::Redirect {
                to: Route::Authentication,
                notice: Some(SESSION_EXPIRED_NOTICE),
            }
        }
    }
}
