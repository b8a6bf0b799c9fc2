//! Application state management for ArtVista.
//!
//! This module contains the core `App` struct: the current route, the loaded
//! artworks, form state for the authentication and upload views, and the
//! services (auth, router, API client) every view goes through.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::Utc;
use tracing::{debug, error, info, warn};

use artvista_core::api::{ApiClient, ApiError};
use artvista_core::auth::{AuthService, AuthUser, FederatedChallenge, FirebaseAuth};
use artvista_core::config::Config;
use artvista_core::models::{parse_hashtags, ArtistRecord, ArtworkDraft, ArtworkRecord};
use artvista_core::router::{Route, Router};
use artvista_core::session::{SessionStore, SessionToken};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for email input.
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for a comment or any single upload field.
const MAX_TEXT_LENGTH: usize = 2000;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Used when neither config nor environment names a backend
const DEFAULT_API_URL: &str = "http://localhost:8080/api";

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    Commenting,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    Login,
    Register,
}

impl LoginMode {
    pub fn title(&self) -> &'static str {
        match self {
            LoginMode::Login => "Log in",
            LoginMode::Register => "Create account",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            LoginMode::Login => LoginMode::Register,
            LoginMode::Register => LoginMode::Login,
        }
    }
}

/// Authentication form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Email,
    Password,
    Submit,
    Google,
    /// Only reachable while a Google sign-in is pending
    Callback,
}

/// Upload form fields in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadField {
    Title,
    Abstract,
    Year,
    ImageUrl,
    Category,
    Hashtags,
    ArtistName,
    ArtistCountry,
    ArtistBorn,
    ArtistDied,
    ArtistAbout,
    Submit,
}

impl UploadField {
    pub const ALL: [UploadField; 12] = [
        UploadField::Title,
        UploadField::Abstract,
        UploadField::Year,
        UploadField::ImageUrl,
        UploadField::Category,
        UploadField::Hashtags,
        UploadField::ArtistName,
        UploadField::ArtistCountry,
        UploadField::ArtistBorn,
        UploadField::ArtistDied,
        UploadField::ArtistAbout,
        UploadField::Submit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            UploadField::Title => "Title",
            UploadField::Abstract => "Abstract",
            UploadField::Year => "Year created",
            UploadField::ImageUrl => "Image URL",
            UploadField::Category => "Category",
            UploadField::Hashtags => "Hashtags",
            UploadField::ArtistName => "Artist",
            UploadField::ArtistCountry => "Country",
            UploadField::ArtistBorn => "Born",
            UploadField::ArtistDied => "Died",
            UploadField::ArtistAbout => "About artist",
            UploadField::Submit => "Upload",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    /// Get the next field (wrapping around)
    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Get the previous field (wrapping around)
    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Raw text of the upload form, one entry per input field.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    values: [String; 11],
}

impl UploadForm {
    pub fn value(&self, field: UploadField) -> &str {
        match field {
            UploadField::Submit => "",
            _ => &self.values[field.index()],
        }
    }

    pub fn value_mut(&mut self, field: UploadField) -> Option<&mut String> {
        match field {
            UploadField::Submit => None,
            _ => Some(&mut self.values[field.index()]),
        }
    }

    fn year(&self, field: UploadField, required: bool) -> Result<Option<i32>, String> {
        let raw = self.value(field).trim();
        if raw.is_empty() {
            return if required {
                Err(format!("{} is required", field.label()))
            } else {
                Ok(None)
            };
        }
        raw.parse::<i32>()
            .map(Some)
            .map_err(|_| format!("{} must be a year", field.label()))
    }

    /// Build a draft, or explain what is wrong with the form.
    pub fn to_draft(&self) -> Result<ArtworkDraft, String> {
        let text = |field: UploadField| self.value(field).trim().to_string();

        let draft = ArtworkDraft {
            title: text(UploadField::Title),
            abstract_text: text(UploadField::Abstract),
            year_created: self.year(UploadField::Year, true)?.unwrap_or_default(),
            image_url: text(UploadField::ImageUrl),
            category: text(UploadField::Category),
            hashtags: parse_hashtags(self.value(UploadField::Hashtags)),
            artist: ArtistRecord {
                name: text(UploadField::ArtistName),
                country: text(UploadField::ArtistCountry),
                year_born: self.year(UploadField::ArtistBorn, false)?.unwrap_or_default(),
                year_dead: self.year(UploadField::ArtistDied, false)?,
                about: text(UploadField::ArtistAbout),
            },
            comments: Vec::new(),
            users_who_liked: Vec::new(),
        };

        let missing = draft.missing_fields();
        if !missing.is_empty() {
            return Err(format!("Missing: {}", missing.join(", ")));
        }
        Ok(draft)
    }
}

/// The signed-in account as the views show it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub username: String,
    pub email: String,
}

impl Identity {
    pub fn from_user(user: &AuthUser) -> Self {
        Self {
            uid: user.uid.clone(),
            username: user.username(),
            email: user.email.clone(),
        }
    }

    /// Read from the token claims; used after a restart, when the provider
    /// has no cached user.
    pub fn from_token(token: &SessionToken) -> Option<Self> {
        let claims = token.decode_claims()?;
        let uid = claims.uid()?.to_string();
        let email = claims.email.unwrap_or_default();
        let username = email.split('@').next().filter(|s| !s.is_empty()).unwrap_or("user").to_string();
        Some(Self { uid, username, email })
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    // Core services
    pub config: Config,
    pub auth: AuthService,
    pub router: Router,
    api: ApiClient,

    // Navigation
    pub state: AppState,
    pub route: Route,
    /// Refreshed on navigation and login, read by every frame
    pub identity: Option<Identity>,

    // Home
    pub artworks: Vec<ArtworkRecord>,
    pub search_query: String,
    pub home_selection: usize,

    // Artwork details
    pub artwork: Option<ArtworkRecord>,
    pub comment_input: String,
    pub comment_scroll: usize,

    // Authentication form state
    pub login_mode: LoginMode,
    pub login_email: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,
    pub google_challenge: Option<FederatedChallenge>,
    pub google_callback: String,

    // Upload form state
    pub upload_form: UploadForm,
    pub upload_focus: UploadField,
    pub upload_error: Option<String>,

    // Status message
    pub status_message: Option<String>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| anyhow!("No Firebase API key configured (set ARTVISTA_API_KEY)"))?;

        let mut provider = FirebaseAuth::new(api_key, config.redirect_uri())?;
        if let Some(ref identity_url) = config.identity_url {
            debug!(identity_url = %identity_url, "Using custom Identity Toolkit host");
            provider = provider.with_base_url(identity_url.as_str());
        }

        let session = SessionStore::new(config.token_store()?);
        let auth = AuthService::new(Arc::new(provider), session);

        let api_url = config.api_base_url.as_deref().unwrap_or(DEFAULT_API_URL);
        let api = ApiClient::new(api_url)?;

        Ok(Self::with_services(config, auth, api))
    }

    pub fn with_services(config: Config, auth: AuthService, api: ApiClient) -> Self {
        let login_email = config.last_email.clone().unwrap_or_default();

        Self {
            config,
            auth,
            router: Router::new(),
            api,

            state: AppState::Normal,
            route: Route::Authentication,
            identity: None,

            artworks: Vec::new(),
            search_query: String::new(),
            home_selection: 0,

            artwork: None,
            comment_input: String::new(),
            comment_scroll: 0,

            login_mode: LoginMode::Login,
            login_email,
            login_password: String::new(),
            login_focus: LoginFocus::Email,
            login_error: None,
            google_challenge: None,
            google_callback: String::new(),

            upload_form: UploadForm::default(),
            upload_focus: UploadField::Title,
            upload_error: None,

            status_message: None,
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Navigate through the router; protected views run the session guard.
    pub async fn navigate(&mut self, path: &str) {
        let navigation = match self.router.navigate(path, &self.auth, Utc::now()).await {
            Ok(nav) => nav,
            Err(e) => {
                warn!(path = path, error = %e, "Navigation failed");
                self.status_message = Some(e.to_string());
                return;
            }
        };

        debug!(path = path, route = navigation.route.name(), "Navigated");
        self.route = navigation.route.clone();
        self.state = AppState::Normal;
        self.status_message = navigation.notice.map(str::to_string);
        self.refresh_identity();

        match navigation.route {
            Route::Home => self.load_artworks().await,
            Route::ArtworkDetails { id } => self.load_artwork(&id).await,
            Route::Authentication => self.start_login(),
            Route::UploadArtwork => {
                self.upload_form = UploadForm::default();
                self.upload_focus = UploadField::Title;
                self.upload_error = None;
            }
        }
    }

    pub async fn go_home(&mut self) {
        self.navigate(&Route::Home.path()).await;
    }

    /// API client carrying the current session token
    fn authed_api(&self) -> ApiClient {
        match self.auth.session().token() {
            Ok(Some(token)) => self.api.with_token(token.as_str().to_string()),
            Ok(None) => self.api.clone(),
            Err(e) => {
                warn!(error = %e, "Failed to read session token");
                self.api.clone()
            }
        }
    }

    /// Report an API failure; a rejected token sends the user back to log in.
    async fn handle_api_error(&mut self, context: &str, e: anyhow::Error) {
        error!(error = %e, "{}", context);
        if matches!(e.downcast_ref::<ApiError>(), Some(ApiError::Unauthorized)) {
            if let Err(e) = self.auth.logout().await {
                warn!(error = %e, "Logout after rejected token failed");
            }
            // Public route, resolved without the guard; navigate() would recurse
            // back through the loaders that called us.
            if let Ok(route) = self.router.resolve(&Route::Authentication.path()) {
                self.route = route;
            }
            self.identity = None;
            self.state = AppState::Normal;
            self.start_login();
            self.status_message = Some("Your session is no longer valid. Please log in again.".to_string());
        } else {
            self.status_message = Some(format!("{}: {}", context, e));
        }
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Signed-in user from the provider's cache or, failing that, the stored
    /// token's claims.
    fn refresh_identity(&mut self) {
        self.identity = match self.auth.current_user() {
            Some(user) => Some(Identity::from_user(&user)),
            None => match self.auth.session().token() {
                Ok(token) => token.as_ref().and_then(Identity::from_token),
                Err(e) => {
                    warn!(error = %e, "Failed to read session token");
                    None
                }
            },
        };
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Reset the authentication form
    pub fn start_login(&mut self) {
        self.login_focus = if self.login_email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };
        self.login_password.clear();
        self.login_error = None;
        self.google_challenge = None;
        self.google_callback.clear();
    }

    /// Submit the authentication form in its current mode. The caller
    /// decides where to go next.
    pub async fn attempt_login(&mut self) -> Result<()> {
        let email = self.login_email.trim().to_string();
        let password = self.login_password.clone();

        if email.is_empty() || password.is_empty() {
            self.login_error = Some("Email and password required".to_string());
            return Err(anyhow!("Email and password required"));
        }

        self.login_error = None;

        let result = match self.login_mode {
            LoginMode::Login => self.auth.login(&email, &password).await,
            LoginMode::Register => self.auth.register(&email, &password).await.map(|c| c.user),
        };

        match result {
            Ok(user) => {
                info!(uid = %user.uid, mode = self.login_mode.title(), "Authenticated");
                self.remember_email(email);
                self.login_password.clear();
                self.identity = Some(Identity::from_user(&user));
                Ok(())
            }
            Err(e) => {
                error!(code = %e.code, "Authentication failed");
                self.login_error = Some(e.user_message());
                Err(e.into())
            }
        }
    }

    /// Ask the provider for a Google sign-in page and try to open it.
    pub async fn start_google_signin(&mut self) {
        self.login_error = None;
        match self.auth.start_google_signin().await {
            Ok(challenge) => {
                if let Err(e) = open::that(&challenge.auth_uri) {
                    warn!(error = %e, "Failed to open browser for Google sign-in");
                }
                self.status_message = Some(
                    "Sign in with Google in your browser, then paste the URL you land on".to_string(),
                );
                self.google_challenge = Some(challenge);
                self.google_callback.clear();
                self.login_focus = LoginFocus::Callback;
            }
            Err(e) => {
                self.login_error = Some(e.user_message());
            }
        }
    }

    /// Finish Google sign-in with the pasted redirect URL.
    pub async fn complete_google_signin(&mut self) {
        let Some(challenge) = self.google_challenge.clone() else {
            return;
        };

        match self.auth.signin_with_google(&challenge, &self.google_callback).await {
            Ok(user) => {
                self.remember_email(user.email.clone());
                self.google_challenge = None;
                self.google_callback.clear();
                self.go_home().await;
            }
            Err(e) => {
                self.login_error = Some(e.user_message());
            }
        }
    }

    pub async fn logout(&mut self) {
        if let Err(e) = self.auth.logout().await {
            warn!(error = %e, "Logout failed");
        }
        self.artworks.clear();
        self.artwork = None;
        self.navigate(&Route::Authentication.path()).await;
        self.status_message = Some("Logged out".to_string());
    }

    fn remember_email(&mut self, email: String) {
        if self.config.last_email.as_deref() == Some(email.as_str()) {
            return;
        }
        self.login_email = email.clone();
        self.config.last_email = Some(email);
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }
    }

    // =========================================================================
    // Artworks
    // =========================================================================

    pub async fn load_artworks(&mut self) {
        match self.authed_api().list_artworks().await {
            Ok(artworks) => {
                self.artworks = artworks;
                self.clamp_home_selection();
            }
            Err(e) => self.handle_api_error("Failed to load artworks", e).await,
        }
    }

    pub async fn load_artwork(&mut self, id: &str) {
        self.comment_scroll = 0;
        self.comment_input.clear();
        match self.authed_api().fetch_artwork(id).await {
            Ok(artwork) => self.artwork = Some(artwork),
            Err(e) => {
                self.artwork = None;
                self.handle_api_error("Failed to load artwork", e).await;
            }
        }
    }

    /// Artworks matching the search query, in backend order
    pub fn filtered_artworks(&self) -> Vec<&ArtworkRecord> {
        self.artworks
            .iter()
            .filter(|a| a.matches_search(&self.search_query))
            .collect()
    }

    pub fn selected_artwork_id(&self) -> Option<String> {
        self.filtered_artworks()
            .get(self.home_selection)
            .map(|a| a.id.clone())
    }

    pub fn clamp_home_selection(&mut self) {
        let len = self.filtered_artworks().len();
        self.home_selection = self.home_selection.min(len.saturating_sub(1));
    }

    pub async fn toggle_like(&mut self) {
        let Some(artwork_id) = self.artwork.as_ref().map(|a| a.id.clone()) else {
            return;
        };
        let Some(uid) = self.identity.as_ref().map(|id| id.uid.clone()) else {
            self.status_message = Some("Log in to like artworks".to_string());
            return;
        };

        match self.authed_api().toggle_like(&artwork_id, &uid).await {
            Ok((artwork, liked)) => {
                self.status_message = Some(if liked { "Liked" } else { "Like removed" }.to_string());
                self.replace_artwork(artwork);
            }
            Err(e) => self.handle_api_error("Failed to update like", e).await,
        }
    }

    pub fn start_comment(&mut self) {
        if self.artwork.is_some() {
            self.comment_input.clear();
            self.state = AppState::Commenting;
        }
    }

    pub async fn submit_comment(&mut self) {
        let text = self.comment_input.trim().to_string();
        self.state = AppState::Normal;
        if text.is_empty() {
            return;
        }
        let Some(artwork_id) = self.artwork.as_ref().map(|a| a.id.clone()) else {
            return;
        };
        let Some(identity) = self.identity.clone() else {
            self.status_message = Some("Log in to comment".to_string());
            return;
        };

        match self
            .authed_api()
            .add_comment(&artwork_id, &identity.username, &identity.email, &text)
            .await
        {
            Ok(artwork) => {
                self.comment_input.clear();
                self.status_message = Some("Comment posted".to_string());
                self.replace_artwork(artwork);
            }
            Err(e) => self.handle_api_error("Failed to post comment", e).await,
        }
    }

    pub async fn submit_upload(&mut self) {
        let draft = match self.upload_form.to_draft() {
            Ok(draft) => draft,
            Err(msg) => {
                self.upload_error = Some(msg);
                return;
            }
        };
        self.upload_error = None;

        match self.authed_api().create_artwork(&draft).await {
            Ok(created) => {
                info!(id = %created.id, "Artwork uploaded");
                let path = Route::ArtworkDetails { id: created.id.clone() }.path();
                self.artworks.push(created);
                self.navigate(&path).await;
                self.status_message = Some("Artwork uploaded".to_string());
            }
            Err(e) => self.handle_api_error("Failed to upload artwork", e).await,
        }
    }

    /// Swap in a freshly stored record in both the detail and list views
    fn replace_artwork(&mut self, artwork: ArtworkRecord) {
        if let Some(existing) = self.artworks.iter_mut().find(|a| a.id == artwork.id) {
            *existing = artwork.clone();
        }
        self.artwork = Some(artwork);
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

pub fn can_add_email_char(current_len: usize, c: char) -> bool {
    current_len < MAX_EMAIL_LENGTH && is_valid_input_char(c) && !c.is_whitespace()
}

pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

pub fn can_add_text_char(current_len: usize, c: char) -> bool {
    current_len < MAX_TEXT_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use artvista_core::guard::SESSION_EXPIRED_NOTICE;
    use artvista_core::session::encode_unsigned;
    use serde_json::json;

    use super::*;

    fn test_app() -> App {
        let provider = FirebaseAuth::new("test-key", "http://localhost").unwrap();
        let auth = AuthService::new(Arc::new(provider), SessionStore::in_memory());
        let api = ApiClient::new("http://127.0.0.1:9/api").unwrap();
        App::with_services(Config::default(), auth, api)
    }

    fn store_token(app: &App, exp_offset_secs: i64) {
        let token = encode_unsigned(&json!({
            "exp": Utc::now().timestamp() + exp_offset_secs,
            "sub": "uid-1",
            "email": "kari@example.com",
        }));
        app.auth.session().save(token.as_str()).unwrap();
    }

    fn filled_form() -> UploadForm {
        let mut form = UploadForm::default();
        for (field, value) in [
            (UploadField::Title, "Harbour at Dusk"),
            (UploadField::Year, "2021"),
            (UploadField::ImageUrl, "https://example.com/h.jpg"),
            (UploadField::Category, "Photography"),
            (UploadField::Hashtags, "#sea, dusk #sea"),
            (UploadField::ArtistName, "Kari Nordmann"),
            (UploadField::ArtistBorn, "1990"),
        ] {
            value.clone_into(form.value_mut(field).unwrap());
        }
        form
    }

    // -------------------------------------------------------------------------
    // UploadField Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_upload_field_next() {
        assert_eq!(UploadField::Title.next(), UploadField::Abstract);
        assert_eq!(UploadField::ArtistAbout.next(), UploadField::Submit);
        assert_eq!(UploadField::Submit.next(), UploadField::Title); // Wraps around
    }

    #[test]
    fn test_upload_field_prev() {
        assert_eq!(UploadField::Title.prev(), UploadField::Submit); // Wraps around
        assert_eq!(UploadField::Abstract.prev(), UploadField::Title);
    }

    #[test]
    fn test_login_mode_toggle() {
        assert_eq!(LoginMode::Login.toggle(), LoginMode::Register);
        assert_eq!(LoginMode::Register.toggle(), LoginMode::Login);
    }

    // -------------------------------------------------------------------------
    // UploadForm Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_upload_form_to_draft() {
        let draft = filled_form().to_draft().expect("valid form");
        assert_eq!(draft.title, "Harbour at Dusk");
        assert_eq!(draft.year_created, 2021);
        assert_eq!(draft.hashtags, vec!["sea", "dusk"]);
        assert_eq!(draft.artist.year_born, 1990);
        assert!(draft.artist.year_dead.is_none());
    }

    #[test]
    fn test_upload_form_requires_year() {
        let mut form = filled_form();
        form.value_mut(UploadField::Year).unwrap().clear();
        assert_eq!(form.to_draft().unwrap_err(), "Year created is required");

        "soon".clone_into(form.value_mut(UploadField::Year).unwrap());
        assert_eq!(form.to_draft().unwrap_err(), "Year created must be a year");
    }

    #[test]
    fn test_upload_form_reports_missing_fields() {
        let mut form = filled_form();
        form.value_mut(UploadField::Title).unwrap().clear();
        form.value_mut(UploadField::ArtistName).unwrap().clear();
        assert_eq!(form.to_draft().unwrap_err(), "Missing: title, artist");
    }

    #[test]
    fn test_upload_form_submit_has_no_value() {
        let mut form = UploadForm::default();
        assert!(form.value_mut(UploadField::Submit).is_none());
        assert_eq!(form.value(UploadField::Submit), "");
    }

    // -------------------------------------------------------------------------
    // Input Validation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_can_add_email_char() {
        assert!(can_add_email_char(0, 'a'));
        assert!(can_add_email_char(0, '@'));
        assert!(!can_add_email_char(0, ' '));
        assert!(!can_add_email_char(MAX_EMAIL_LENGTH, 'a'));
        assert!(!can_add_email_char(0, '\n'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, 'a'));
        assert!(can_add_password_char(127, '!'));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\x00'));
        assert!(!can_add_password_char(0, '\r'));
    }

    #[test]
    fn test_can_add_text_char() {
        assert!(can_add_text_char(0, ' '));
        assert!(!can_add_text_char(MAX_TEXT_LENGTH, 'a'));
        assert!(!can_add_text_char(0, '\t'));
    }

    // -------------------------------------------------------------------------
    // Navigation and Session Tests
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_navigate_root_without_token_shows_login() {
        let mut app = test_app();
        app.navigate("/").await;

        assert_eq!(app.route, Route::Authentication);
        assert_eq!(app.status_message, None);
        assert_eq!(app.identity, None);
    }

    #[tokio::test]
    async fn test_navigate_with_expired_token_shows_notice() {
        let mut app = test_app();
        store_token(&app, -10);

        app.navigate("/").await;

        assert_eq!(app.route, Route::Authentication);
        assert_eq!(app.status_message.as_deref(), Some(SESSION_EXPIRED_NOTICE));
        assert!(app.auth.session().token().unwrap().is_none());
        assert_eq!(app.identity, None);
    }

    #[tokio::test]
    async fn test_navigate_with_valid_token_caches_identity() {
        let mut app = test_app();
        store_token(&app, 3600);

        app.navigate(&Route::UploadArtwork.path()).await;

        assert_eq!(app.route, Route::UploadArtwork);
        assert_eq!(
            app.identity,
            Some(Identity {
                uid: "uid-1".to_string(),
                username: "kari".to_string(),
                email: "kari@example.com".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_returns_to_login() {
        let mut app = test_app();
        store_token(&app, 3600);
        app.navigate(&Route::UploadArtwork.path()).await;
        assert!(app.identity.is_some());

        app.logout().await;

        assert_eq!(app.route, Route::Authentication);
        assert!(app.auth.session().token().unwrap().is_none());
        assert_eq!(app.identity, None);
        assert_eq!(app.status_message.as_deref(), Some("Logged out"));
    }

    #[tokio::test]
    async fn test_rejected_token_logs_out() {
        let mut app = test_app();
        store_token(&app, 3600);
        app.navigate(&Route::UploadArtwork.path()).await;

        app.handle_api_error("Failed to upload artwork", ApiError::Unauthorized.into())
            .await;

        assert_eq!(app.route, Route::Authentication);
        assert!(app.auth.session().token().unwrap().is_none());
        assert_eq!(app.identity, None);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Your session is no longer valid. Please log in again.")
        );
    }

    #[tokio::test]
    async fn test_other_api_errors_keep_session() {
        let mut app = test_app();
        store_token(&app, 3600);
        app.navigate(&Route::UploadArtwork.path()).await;

        app.handle_api_error("Failed to upload artwork", anyhow!("connection refused"))
            .await;

        assert_eq!(app.route, Route::UploadArtwork);
        assert!(app.auth.session().token().unwrap().is_some());
        assert_eq!(
            app.status_message.as_deref(),
            Some("Failed to upload artwork: connection refused")
        );
    }
}
