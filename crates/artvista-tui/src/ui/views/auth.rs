use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use artvista_core::utils::truncate;

use crate::app::{App, LoginFocus};
use crate::ui::render::{centered_rect_fixed, logo_lines};
use crate::ui::styles;

use super::input_display;

/// Visible width of the email/callback fields
const FIELD_WIDTH: usize = 28;

fn field_line(label: &'static str, value: String, focused: bool) -> Line<'static> {
    Line::from(vec![
        Span::raw("   "),
        Span::styled(label, styles::muted_style()),
        Span::styled(" [", styles::muted_style()),
        Span::styled(
            format!("{:<width$}", value, width = FIELD_WIDTH),
            styles::field_style(focused),
        ),
        Span::styled("]", styles::muted_style()),
    ])
}

fn button_line(label: &str, focused: bool) -> Line<'static> {
    let text = if focused {
        format!(" ▶ {} ◀ ", label)
    } else {
        format!("   {}   ", label)
    };
    Line::from(vec![
        Span::raw("             ["),
        Span::styled(text, styles::field_style(focused)),
        Span::raw("]"),
    ])
}

/// Keep the tail of a long value visible while typing
fn tail(value: &str, width: usize) -> String {
    let count = value.chars().count();
    if count <= width {
        value.to_string()
    } else {
        value.chars().skip(count - width).collect()
    }
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let pending_google = app.google_challenge.is_some();
    let mut height = 15;
    if pending_google {
        height += 4;
    }
    if app.login_error.is_some() {
        height += 2;
    }
    let rect = centered_rect_fixed(52, height, area);

    frame.render_widget(Clear, rect);

    let mut lines = logo_lines();
    lines.push(Line::from(Span::styled(
        format!("                {}", app.login_mode.title()),
        styles::highlight_style(),
    )));
    lines.push(Line::from(""));

    let email_focused = app.login_focus == LoginFocus::Email;
    lines.push(field_line(
        "Email:   ",
        input_display(&tail(&app.login_email, FIELD_WIDTH - 1), email_focused),
        email_focused,
    ));

    let password_focused = app.login_focus == LoginFocus::Password;
    let masked = "*".repeat(app.login_password.chars().count().min(FIELD_WIDTH - 1));
    lines.push(field_line(
        "Password:",
        input_display(&masked, password_focused),
        password_focused,
    ));

    lines.push(Line::from(""));
    lines.push(button_line(app.login_mode.title(), app.login_focus == LoginFocus::Submit));
    lines.push(button_line("Sign in with Google", app.login_focus == LoginFocus::Google));

    if let Some(ref challenge) = app.google_challenge {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("   Opened {}", truncate(&challenge.auth_uri, 40)),
            styles::muted_style(),
        )));
        lines.push(Line::from(Span::styled(
            "   Paste the URL the browser lands on:",
            styles::muted_style(),
        )));
        let callback_focused = app.login_focus == LoginFocus::Callback;
        lines.push(field_line(
            "URL:     ",
            input_display(&tail(&app.google_callback, FIELD_WIDTH - 1), callback_focused),
            callback_focused,
        ));
    }

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });

    frame.render_widget(paragraph, rect);
}
