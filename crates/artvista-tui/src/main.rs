//! ArtVista TUI - a terminal gallery client.
//!
//! Browse artworks, read and write comments, like pieces and upload new
//! ones. Accounts live in Firebase Authentication; artworks come from the
//! configured REST backend.

mod app;
mod ui;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use artvista_core::config::Config;
use artvista_core::router::Route;
use artvista_core::session::SessionStore;

use app::{App, AppState, Identity};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

const LOG_FILE: &str = "artvista.log";

const USAGE: &str = "\
Usage: artvista [OPTION]

  (none)      Start the terminal UI
  --login     Log in from the command line
  --logout    Log out and remove the stored session
  --whoami    Show the signed-in account
  --help      Show this message";

/// Initialize the tracing subscriber for logging.
///
/// Logs go to a file in the cache directory so they don't draw over the
/// terminal UI. Use RUST_LOG to control the level (e.g. RUST_LOG=debug).
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let cache_dir = config.cache_dir().ok()?;
    std::fs::create_dir_all(&cache_dir).ok()?;

    let appender = tracing_appender::rolling::never(&cache_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Some(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = Config::load()?.with_env_overrides();

    // Held until exit so buffered log lines are flushed
    let _log_guard = init_tracing(&config);

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        None => {}
        Some("--login") => return cli_login(config).await,
        Some("--logout") => return cli_logout(&SessionStore::new(config.token_store()?)),
        Some("--whoami") => return cli_whoami(&SessionStore::new(config.token_store()?)),
        Some("--help") | Some("-h") => {
            println!("{}", USAGE);
            return Ok(());
        }
        Some(other) => {
            eprintln!("Unknown option: {}\n\n{}", other, USAGE);
            return Err(anyhow!("unknown option {}", other));
        }
    }

    info!("ArtVista TUI starting");

    // Create app before touching the terminal so config errors print normally
    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Root redirects to /home; the guard sends us to login if needed
    app.navigate("/").await;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("ArtVista TUI shutting down");
    Ok(())
}

async fn cli_login(config: Config) -> Result<()> {
    let mut app = App::new(config)?;

    let default_email = app.login_email.clone();
    if default_email.is_empty() {
        print!("Email: ");
    } else {
        print!("Email [{}]: ", default_email);
    }
    io::stdout().flush()?;

    let mut email = String::new();
    io::stdin().read_line(&mut email)?;
    let email = email.trim();
    app.login_email = if email.is_empty() { default_email } else { email.to_string() };

    app.login_password = rpassword::prompt_password("Password: ")?;

    match app.attempt_login().await {
        Ok(()) => {
            println!("Logged in as {}", app.login_email);
            Ok(())
        }
        Err(e) => {
            let message = app.login_error.clone().unwrap_or_else(|| e.to_string());
            eprintln!("Login failed: {}", message);
            Err(e)
        }
    }
}

/// Local only: the provider keeps no server-side session, so this needs
/// neither an API key nor the network.
fn cli_logout(session: &SessionStore) -> Result<()> {
    session.clear()?;
    println!("Logged out");
    Ok(())
}

fn cli_whoami(session: &SessionStore) -> Result<()> {
    for line in whoami_report(session, Utc::now())? {
        println!("{}", line);
    }
    Ok(())
}

fn whoami_report(session: &SessionStore, now: DateTime<Utc>) -> Result<Vec<String>> {
    let Some(token) = session.token()? else {
        return Ok(vec!["Not logged in".to_string()]);
    };

    let mut lines = vec![match Identity::from_token(&token) {
        Some(id) => format!("{} <{}> ({})", id.username, id.email, id.uid),
        None => "Logged in (account details unavailable)".to_string(),
    }];

    lines.push(match token.expires_at() {
        Some(expires) if expires < now => {
            format!("Session expired at {}; it will be cleared on next use", expires)
        }
        Some(expires) => format!("Session valid until {}", expires),
        None => "Session token is unreadable; it will be cleared on next use".to_string(),
    });
    Ok(lines)
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // Ctrl+L logs out from anywhere but the login view
                if key.code == KeyCode::Char('l')
                    && key.modifiers.contains(KeyModifiers::CONTROL)
                    && app.route != Route::Authentication
                {
                    app.logout().await;
                    continue;
                }

                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use serde_json::json;

    use artvista_core::session::encode_unsigned;

    use super::*;

    fn session_with(claims: serde_json::Value) -> SessionStore {
        let session = SessionStore::in_memory();
        session.save(encode_unsigned(&claims).as_str()).unwrap();
        session
    }

    #[test]
    fn test_whoami_without_session() {
        let session = SessionStore::in_memory();
        assert_eq!(whoami_report(&session, Utc::now()).unwrap(), vec!["Not logged in"]);
    }

    #[test]
    fn test_whoami_reads_claims_without_api_key() {
        let now = Utc::now();
        let exp = now + Duration::hours(1);
        let session = session_with(json!({
            "exp": exp.timestamp(),
            "user_id": "uid-7",
            "email": "kari@example.com",
        }));

        let lines = whoami_report(&session, now).unwrap();
        assert_eq!(lines[0], "kari <kari@example.com> (uid-7)");
        assert!(lines[1].starts_with("Session valid until"));
    }

    #[test]
    fn test_whoami_reports_expired_session() {
        let now = Utc::now();
        let session = session_with(json!({ "exp": now.timestamp() - 60, "sub": "uid-7" }));

        let lines = whoami_report(&session, now).unwrap();
        assert_eq!(lines[0], "user <> (uid-7)");
        assert!(lines[1].starts_with("Session expired at"));
    }

    #[test]
    fn test_logout_clears_session_without_api_key() {
        let session = session_with(json!({ "exp": Utc::now().timestamp() + 60, "sub": "uid-7" }));
        cli_logout(&session).unwrap();
        assert!(session.token().unwrap().is_none());
    }
}
