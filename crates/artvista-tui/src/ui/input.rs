//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes. Text-entry views (authentication, upload,
//! comment box, search) take printable keys as input, so their shortcuts
//! use non-character keys.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use artvista_core::router::Route;

use crate::app::{
    can_add_email_char, can_add_password_char, can_add_text_char, App, AppState, LoginFocus,
    UploadField, PAGE_SCROLL_SIZE,
};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    if matches!(app.state, AppState::Searching) {
        handle_search_input(app, key);
        return Ok(false);
    }

    if matches!(app.state, AppState::Commenting) {
        handle_comment_input(app, key).await;
        return Ok(false);
    }

    match app.route {
        Route::Authentication => return handle_login_input(app, key).await,
        Route::UploadArtwork => {
            handle_upload_input(app, key).await;
            return Ok(false);
        }
        Route::Home | Route::ArtworkDetails { .. } => {}
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        _ => {}
    }

    match app.route {
        Route::Home => handle_home_input(app, key).await,
        Route::ArtworkDetails { .. } => handle_details_input(app, key).await,
        Route::Authentication | Route::UploadArtwork => {}
    }
    Ok(false)
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.search_query.clear();
            app.home_selection = 0;
        }
        KeyCode::Enter => {
            // Keep search query active
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            app.search_query.pop();
            app.home_selection = 0;
        }
        KeyCode::Char(c) => {
            if can_add_text_char(app.search_query.len(), c) {
                app.search_query.push(c);
                // Reset selection when search changes
                app.home_selection = 0;
            }
        }
        _ => {}
    }
}

async fn handle_home_input(app: &mut App, key: KeyEvent) {
    let max_index = app.filtered_artworks().len().saturating_sub(1);

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.home_selection = app.home_selection.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.home_selection = (app.home_selection + 1).min(max_index);
        }
        KeyCode::PageUp => {
            app.home_selection = app.home_selection.saturating_sub(PAGE_SCROLL_SIZE);
        }
        KeyCode::PageDown => {
            app.home_selection = (app.home_selection + PAGE_SCROLL_SIZE).min(max_index);
        }
        KeyCode::Home => app.home_selection = 0,
        KeyCode::End => app.home_selection = max_index,
        KeyCode::Enter => {
            if let Some(id) = app.selected_artwork_id() {
                app.navigate(&Route::ArtworkDetails { id }.path()).await;
            }
        }
        KeyCode::Char('/') => {
            app.state = AppState::Searching;
        }
        KeyCode::Esc => {
            app.search_query.clear();
            app.clamp_home_selection();
        }
        KeyCode::Char('n') => {
            app.navigate(&Route::UploadArtwork.path()).await;
        }
        KeyCode::Char('r') => {
            // Through the router so an expired session is caught here too
            app.go_home().await;
        }
        KeyCode::Char('o') => {
            app.logout().await;
        }
        _ => {}
    }
}

async fn handle_details_input(app: &mut App, key: KeyEvent) {
    let max_scroll = app
        .artwork
        .as_ref()
        .map(|a| a.comments.len().saturating_sub(1))
        .unwrap_or(0);

    match key.code {
        KeyCode::Esc | KeyCode::Backspace => app.go_home().await,
        KeyCode::Char('l') => app.toggle_like().await,
        KeyCode::Char('c') => app.start_comment(),
        KeyCode::Up | KeyCode::Char('k') => {
            app.comment_scroll = app.comment_scroll.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.comment_scroll = (app.comment_scroll + 1).min(max_scroll);
        }
        KeyCode::Char('r') => {
            if let Some(id) = app.artwork.as_ref().map(|a| a.id.clone()) {
                app.navigate(&Route::ArtworkDetails { id }.path()).await;
            }
        }
        _ => {}
    }
}

async fn handle_comment_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.comment_input.clear();
        }
        KeyCode::Enter => app.submit_comment().await,
        KeyCode::Backspace => {
            app.comment_input.pop();
        }
        KeyCode::Char(c) => {
            if can_add_text_char(app.comment_input.len(), c) {
                app.comment_input.push(c);
            }
        }
        _ => {}
    }
}

fn next_login_focus(app: &App) -> LoginFocus {
    match app.login_focus {
        LoginFocus::Email => LoginFocus::Password,
        LoginFocus::Password => LoginFocus::Submit,
        LoginFocus::Submit => LoginFocus::Google,
        LoginFocus::Google if app.google_challenge.is_some() => LoginFocus::Callback,
        LoginFocus::Google | LoginFocus::Callback => LoginFocus::Email,
    }
}

fn prev_login_focus(app: &App) -> LoginFocus {
    match app.login_focus {
        LoginFocus::Email if app.google_challenge.is_some() => LoginFocus::Callback,
        LoginFocus::Email => LoginFocus::Google,
        LoginFocus::Password => LoginFocus::Email,
        LoginFocus::Submit => LoginFocus::Password,
        LoginFocus::Google => LoginFocus::Submit,
        LoginFocus::Callback => LoginFocus::Google,
    }
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            // Quit if on login screen
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::F(2) => {
            app.login_mode = app.login_mode.toggle();
            app.login_error = None;
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login_focus = next_login_focus(app);
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_focus = prev_login_focus(app);
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Email => app.login_focus = LoginFocus::Password,
            LoginFocus::Password => app.login_focus = LoginFocus::Submit,
            LoginFocus::Submit => {
                // On failure login_error is set and we stay on this view
                if app.attempt_login().await.is_ok() {
                    app.go_home().await;
                }
            }
            LoginFocus::Google => app.start_google_signin().await,
            LoginFocus::Callback => app.complete_google_signin().await,
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Email => {
                app.login_email.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Callback => {
                app.google_callback.pop();
            }
            LoginFocus::Submit | LoginFocus::Google => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Email => {
                if can_add_email_char(app.login_email.len(), c) {
                    app.login_email.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_password.len(), c) {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Callback => {
                if can_add_text_char(app.google_callback.len(), c) {
                    app.google_callback.push(c);
                }
            }
            // Ignore character input on buttons
            LoginFocus::Submit | LoginFocus::Google => {}
        },
        _ => {}
    }
    Ok(false)
}

async fn handle_upload_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.go_home().await,
        KeyCode::Down | KeyCode::Tab => {
            app.upload_focus = app.upload_focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.upload_focus = app.upload_focus.prev();
        }
        KeyCode::Enter => {
            if app.upload_focus == UploadField::Submit {
                app.submit_upload().await;
            } else {
                app.upload_focus = app.upload_focus.next();
            }
        }
        KeyCode::Backspace => {
            if let Some(value) = app.upload_form.value_mut(app.upload_focus) {
                value.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(value) = app.upload_form.value_mut(app.upload_focus) {
                if can_add_text_char(value.len(), c) {
                    value.push(c);
                }
            }
        }
        _ => {}
    }
}
