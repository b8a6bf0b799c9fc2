//! Path-to-view table.
//!
//! Protected entries consult the route guard before they are entered; the
//! root path redirects to `/home`; `/authentication` is always reachable.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::auth::AuthService;
use crate::guard::{self, GuardOutcome};

/// Redirect chains longer than this are treated as a loop
const MAX_REDIRECTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Redirect(&'static str),
    Public,
    Protected,
}

#[derive(Debug, Clone, Copy)]
pub struct RouteEntry {
    pub pattern: &'static str,
    pub name: &'static str,
    pub kind: RouteKind,
}

pub const ROUTES: &[RouteEntry] = &[
    RouteEntry { pattern: "/", name: "Root", kind: RouteKind::Redirect("/home") },
    RouteEntry { pattern: "/home", name: "Home", kind: RouteKind::Protected },
    RouteEntry { pattern: "/authentication", name: "Authentication", kind: RouteKind::Public },
    RouteEntry { pattern: "/artwork/:id", name: "ArtworkDetails", kind: RouteKind::Protected },
    RouteEntry { pattern: "/upload-artwork", name: "UploadArtwork", kind: RouteKind::Protected },
];

/// A view the application can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Authentication,
    ArtworkDetails { id: String },
    UploadArtwork,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/home".to_string(),
            Route::Authentication => "/authentication".to_string(),
            Route::ArtworkDetails { id } => format!("/artwork/{}", id),
            Route::UploadArtwork => "/upload-artwork".to_string(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Authentication => "Authentication",
            Route::ArtworkDetails { .. } => "ArtworkDetails",
            Route::UploadArtwork => "UploadArtwork",
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Authentication)
    }

    fn from_match(name: &str, params: &mut HashMap<&'static str, String>) -> Option<Self> {
        match name {
            "Home" => Some(Route::Home),
            "Authentication" => Some(Route::Authentication),
            "ArtworkDetails" => params.remove("id").map(|id| Route::ArtworkDetails { id }),
            "UploadArtwork" => Some(Route::UploadArtwork),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("No route matches {0}")]
    NotFound(String),

    #[error("Too many redirects starting at {0}")]
    RedirectLoop(String),
}

/// Where a navigation ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: Route,
    /// Set when the guard redirected with something to tell the user
    pub notice: Option<&'static str>,
}

/// Drop query/fragment and trailing slashes; `""` becomes `/`.
fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn match_pattern(pattern: &'static str, path: &str) -> Option<HashMap<&'static str, String>> {
    let mut params = HashMap::new();
    let mut pattern_parts = segments(pattern);
    let mut path_parts = segments(path);

    loop {
        match (pattern_parts.next(), path_parts.next()) {
            (None, None) => return Some(params),
            (Some(expected), Some(actual)) => {
                if let Some(name) = expected.strip_prefix(':') {
                    params.insert(name, actual.to_string());
                } else if expected != actual {
                    return None;
                }
            }
            _ => return None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Router {
    routes: &'static [RouteEntry],
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self { routes: ROUTES }
    }

    /// Resolve a path to a route without consulting the guard.
    pub fn resolve(&self, path: &str) -> Result<Route, RouteError> {
        let mut current = normalize(path).to_string();

        for _ in 0..=MAX_REDIRECTS {
            let (entry, mut params) = self
                .routes
                .iter()
                .find_map(|entry| match_pattern(entry.pattern, &current).map(|p| (entry, p)))
                .ok_or_else(|| RouteError::NotFound(current.clone()))?;

            match entry.kind {
                RouteKind::Redirect(target) => {
                    debug!(from = %current, to = target, "Route redirect");
                    current = target.to_string();
                }
                RouteKind::Public | RouteKind::Protected => {
                    return Route::from_match(entry.name, &mut params)
                        .ok_or_else(|| RouteError::NotFound(current.clone()));
                }
            }
        }

        Err(RouteError::RedirectLoop(path.to_string()))
    }

    /// Resolve `path` and run the guard if the target is protected.
    pub async fn navigate(
        &self,
        path: &str,
        auth: &AuthService,
        now: DateTime<Utc>,
    ) -> Result<Navigation, RouteError> {
        let route = self.resolve(path)?;

        if !route.is_protected() {
            return Ok(Navigation { route, notice: None });
        }

        match guard::enforce(auth, now).await {
            GuardOutcome::Allow => {
                debug!(route = route.name(), "Navigation allowed");
                Ok(Navigation { route, notice: None })
            }
            GuardOutcome::Redirect { to, notice } => {
                debug!(route = route.name(), to = to.name(), "Navigation redirected by guard");
                Ok(Navigation { route: to, notice })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::auth::testing::MockProvider;
    use crate::guard::SESSION_EXPIRED_NOTICE;
    use crate::session::{encode_unsigned, SessionStore};

    #[test]
    fn test_resolve_table() {
        let router = Router::new();
        assert_eq!(router.resolve("/home"), Ok(Route::Home));
        assert_eq!(router.resolve("/authentication"), Ok(Route::Authentication));
        assert_eq!(router.resolve("/upload-artwork"), Ok(Route::UploadArtwork));
        assert_eq!(
            router.resolve("/artwork/abc123"),
            Ok(Route::ArtworkDetails { id: "abc123".to_string() })
        );
    }

    #[test]
    fn test_root_redirects_home() {
        let router = Router::new();
        assert_eq!(router.resolve("/"), Ok(Route::Home));
        assert_eq!(router.resolve(""), Ok(Route::Home));
    }

    #[test]
    fn test_resolve_normalizes() {
        let router = Router::new();
        assert_eq!(router.resolve("/home/"), Ok(Route::Home));
        assert_eq!(router.resolve("/home?tab=new#top"), Ok(Route::Home));
        assert_eq!(
            router.resolve("/artwork/xyz/?ref=feed"),
            Ok(Route::ArtworkDetails { id: "xyz".to_string() })
        );
    }

    #[test]
    fn test_resolve_unknown() {
        let router = Router::new();
        assert_eq!(
            router.resolve("/artwork"),
            Err(RouteError::NotFound("/artwork".to_string()))
        );
        assert!(router.resolve("/artwork/a/b").is_err());
        assert!(router.resolve("/settings").is_err());
    }

    #[test]
    fn test_redirect_loop_detected() {
        const LOOP: &[RouteEntry] = &[
            RouteEntry { pattern: "/a", name: "A", kind: RouteKind::Redirect("/b") },
            RouteEntry { pattern: "/b", name: "B", kind: RouteKind::Redirect("/a") },
        ];
        let router = Router { routes: LOOP };
        assert_eq!(router.resolve("/a"), Err(RouteError::RedirectLoop("/a".to_string())));
    }

    #[test]
    fn test_route_path_round_trip() {
        let router = Router::new();
        for route in [
            Route::Home,
            Route::Authentication,
            Route::ArtworkDetails { id: "a1".to_string() },
            Route::UploadArtwork,
        ] {
            assert_eq!(router.resolve(&route.path()), Ok(route));
        }
    }

    #[test]
    fn test_only_authentication_is_public() {
        assert!(!Route::Authentication.is_protected());
        assert!(Route::Home.is_protected());
        assert!(Route::UploadArtwork.is_protected());
        assert!(Route::ArtworkDetails { id: "x".to_string() }.is_protected());
    }

    #[tokio::test]
    async fn test_navigate_public_route_skips_guard() {
        let provider = Arc::new(MockProvider::new());
        let auth = AuthService::new(provider.clone(), SessionStore::in_memory());
        auth.session().save("garbage").unwrap();

        let nav = Router::new()
            .navigate("/authentication", &auth, Utc::now())
            .await
            .unwrap();

        assert_eq!(nav.route, Route::Authentication);
        // Guard did not run, so the bad token is still there
        assert!(auth.session().token().unwrap().is_some());
        assert_eq!(provider.sign_out_calls(), 0);
    }

    #[tokio::test]
    async fn test_navigate_protected_without_session() {
        let auth = AuthService::new(Arc::new(MockProvider::new()), SessionStore::in_memory());

        let nav = Router::new().navigate("/", &auth, Utc::now()).await.unwrap();
        assert_eq!(nav, Navigation { route: Route::Authentication, notice: None });
    }

    #[tokio::test]
    async fn test_navigate_with_expired_session() {
        let auth = AuthService::new(Arc::new(MockProvider::new()), SessionStore::in_memory());
        let now = Utc::now();
        let token = encode_unsigned(&json!({ "exp": now.timestamp() - 10 }));
        auth.session().save(token.as_str()).unwrap();

        let nav = Router::new()
            .navigate("/artwork/a1", &auth, now)
            .await
            .unwrap();

        assert_eq!(nav.route, Route::Authentication);
        assert_eq!(nav.notice, Some(SESSION_EXPIRED_NOTICE));
    }

    #[tokio::test]
    async fn test_navigate_after_login() {
        let auth = AuthService::new(Arc::new(MockProvider::new()), SessionStore::in_memory());
        auth.login("kari@example.com", "hunter22").await.unwrap();

        let nav = Router::new()
            .navigate("/upload-artwork", &auth, Utc::now())
            .await
            .unwrap();
        assert_eq!(nav.route, Route::UploadArtwork);
        assert_eq!(nav.notice, None);
    }

    #[tokio::test]
    async fn test_navigate_unknown_path() {
        let auth = AuthService::new(Arc::new(MockProvider::new()), SessionStore::in_memory());
        let err = Router::new().navigate("/nope", &auth, Utc::now()).await.unwrap_err();
        assert_eq!(err, RouteError::NotFound("/nope".to_string()));
    }
}
