use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use artvista_core::router::Route;
use artvista_core::utils::mask_email;

use crate::app::{App, AppState};

use super::styles;
use super::views::{auth, details, home, upload};

const LOGO: [&str; 3] = [
    "   ╔═╗╦═╗╔╦╗  ╦  ╦╦╔═╗╔╦╗╔═╗",
    "   ╠═╣╠╦╝ ║   ╚╗╔╝║╚═╗ ║ ╠═╣",
    "   ╩ ╩╩╚═ ╩    ╚╝ ╩╚═╝ ╩ ╩ ╩",
];

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  ArtVista";
    let location = format!("  {}", app.route.path());
    let user = match app.identity {
        Some(ref id) if !id.email.is_empty() => format!("{}  ", mask_email(&id.email)),
        Some(ref id) => format!("{}  ", id.username),
        None => String::new(),
    };
    let help_hint = "[?] Help";

    let used = title.chars().count() + location.chars().count() + user.chars().count() + help_hint.len();
    let padding = (area.width as usize).saturating_sub(used + 2);

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::styled(location, styles::muted_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(user, styles::highlight_style()),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.route {
        Route::Home => home::render(frame, app, area),
        Route::ArtworkDetails { .. } => details::render(frame, app, area),
        Route::Authentication => auth::render(frame, app, area),
        Route::UploadArtwork => upload::render(frame, app, area),
    }
}

fn shortcuts_for(app: &App) -> &'static str {
    match (&app.route, app.state) {
        (_, AppState::Searching) => "[Enter] keep | [Esc] clear",
        (_, AppState::Commenting) => "[Enter] post | [Esc] cancel",
        (Route::Home, _) => "[/] search | [n]ew | [r]efresh | [o] logout | [q]uit",
        (Route::ArtworkDetails { .. }, _) => "[l]ike | [c]omment | [Esc] back | [q]uit",
        (Route::Authentication, _) => "[F2] login/register | [Esc] quit",
        (Route::UploadArtwork, _) => "[Tab] next field | [Esc] cancel",
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} ", msg),
        None => format!(" {} ", app.route.name()),
    };
    let right_text = format!(" {} ", shortcuts_for(app));

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());

    let left_style = if app.status_message.is_some() {
        styles::highlight_style()
    } else {
        styles::muted_style()
    };

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

/// Logo lines, also shown on the authentication view
pub fn logo_lines() -> Vec<Line<'static>> {
    LOGO.iter()
        .map(|l| Line::from(Span::styled(*l, styles::title_style())))
        .collect()
}

fn help_entry(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 26, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let mut help_text = logo_lines();
    help_text.extend([
        Line::from(Span::styled(
            format!("              version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Gallery", styles::highlight_style())),
        help_entry("↑/↓ j/k", "Move selection"),
        help_entry("Enter", "Open artwork"),
        help_entry("/", "Search title, artist, category, #tag"),
        help_entry("n", "Upload a new artwork"),
        help_entry("r", "Reload artworks"),
        help_entry("o", "Log out"),
        Line::from(""),
        Line::from(Span::styled(" Artwork", styles::highlight_style())),
        help_entry("l", "Like / unlike"),
        help_entry("c", "Write a comment"),
        help_entry("↑/↓", "Scroll comments"),
        help_entry("Esc", "Back to gallery"),
        Line::from(""),
        Line::from(Span::styled(" Forms", styles::highlight_style())),
        help_entry("Tab/↓", "Next field"),
        help_entry("F2", "Switch login / register"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);

    frame.render_widget(paragraph, area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 10, frame.area());

    frame.render_widget(Clear, area);

    let mut lines = logo_lines();
    lines.extend([
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
