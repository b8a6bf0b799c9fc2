//! Data models for ArtVista gallery entries.
//!
//! Wire names follow the backend's camelCase documents:
//!
//! - `ArtworkRecord`: a gallery entry with embedded artist, comments and likes
//! - `ArtistRecord`: the artist embedded in each artwork
//! - `CommentRecord`: a comment, numbered per artwork
//! - `ArtworkDraft`: an artwork on its way to the upload endpoint

pub mod artwork;

pub use artwork::{parse_hashtags, ArtistRecord, ArtworkDraft, ArtworkRecord, CommentRecord};
