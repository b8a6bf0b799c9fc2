//! Authentication against the external identity provider.
//!
//! This module provides:
//! - `IdentityProvider`: the provider seam (register, sign in, federated login, sign out)
//! - `FirebaseAuth`: Firebase Authentication over the Identity Toolkit REST API
//! - `AuthService`: the wrapper views call; it keeps the session token in step
//! - `AuthError`: provider failures with a boundary `AuthErrorKind` and the raw code

pub mod error;
pub mod firebase;
pub mod provider;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{AuthError, AuthErrorKind};
pub use firebase::FirebaseAuth;
pub use provider::{
    AuthOperation, AuthUser, FederatedChallenge, FederatedProvider, IdentityProvider,
    UserCredential,
};
pub use service::AuthService;
