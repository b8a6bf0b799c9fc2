//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, title/status bars and overlays
//! - `input`: keyboard handling per view
//! - `styles`: color palette and text styles
//! - `views`: one renderer per route (home, details, authentication, upload)

pub mod input;
pub mod render;
pub mod styles;
pub mod views;
