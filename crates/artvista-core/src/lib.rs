//! Core library for ArtVista, a gallery client.
//!
//! - `models`: artwork, artist and comment records
//! - `auth`: identity provider seam, Firebase adapter and the `AuthService` wrapper
//! - `session`: the persisted bearer token and its key-value stores
//! - `guard`: allow/redirect decision for protected views
//! - `router`: the path table views are reached through
//! - `api`: REST client for the artwork backend
//! - `config`: configuration file and environment overrides

pub mod api;
pub mod auth;
pub mod config;
pub mod guard;
pub mod models;
pub mod router;
pub mod session;
pub mod utils;
