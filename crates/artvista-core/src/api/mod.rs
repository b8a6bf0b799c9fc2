//! REST client for the artwork backend.
//!
//! This module provides the `ApiClient` for listing, fetching, creating
//! and updating `ArtworkRecord`s. Requests carry the session's ID token
//! as a bearer credential.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
