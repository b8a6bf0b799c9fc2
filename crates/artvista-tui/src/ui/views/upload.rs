use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use artvista_core::models::parse_hashtags;
use artvista_core::utils::format_hashtags;

use crate::app::{App, UploadField};
use crate::ui::styles;

use super::input_display;

/// Width reserved for field labels
const LABEL_WIDTH: usize = 14;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(16), Constraint::Length(3)])
        .split(area);

    render_form(frame, app, chunks[0]);
    render_feedback(frame, app, chunks[1]);
}

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let value_width = (area.width as usize).saturating_sub(LABEL_WIDTH + 6);
    let mut lines = Vec::new();

    for field in UploadField::ALL {
        let focused = app.upload_focus == field;

        if field == UploadField::Submit {
            lines.push(Line::from(""));
            let text = if focused { " ▶ Upload ◀ " } else { "   Upload   " };
            lines.push(Line::from(vec![
                Span::raw(" ".repeat(LABEL_WIDTH + 2)),
                Span::raw("["),
                Span::styled(text, styles::field_style(focused)),
                Span::raw("]"),
            ]));
            continue;
        }

        if field == UploadField::ArtistName {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(" Artist", styles::highlight_style())));
        }

        let value = app.upload_form.value(field);
        let count = value.chars().count();
        let visible: String = if count > value_width.saturating_sub(1) {
            value.chars().skip(count + 1 - value_width.max(1)).collect()
        } else {
            value.to_string()
        };

        lines.push(Line::from(vec![
            Span::styled(
                format!(" {:>width$}: ", field.label(), width = LABEL_WIDTH),
                if focused { styles::highlight_style() } else { styles::muted_style() },
            ),
            Span::styled(input_display(&visible, focused), styles::field_style(focused)),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Upload artwork ")
            .title_style(styles::title_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(true)),
    );
    frame.render_widget(paragraph, area);
}

fn render_feedback(frame: &mut Frame, app: &App, area: Rect) {
    let line = match app.upload_error {
        Some(ref error) => Line::from(Span::styled(format!(" {}", error), styles::error_style())),
        None => {
            let tags = parse_hashtags(app.upload_form.value(UploadField::Hashtags));
            if tags.is_empty() {
                Line::from(Span::styled(
                    " Title, image URL and artist are required",
                    styles::muted_style(),
                ))
            } else {
                Line::from(vec![
                    Span::styled(" Tags: ", styles::muted_style()),
                    Span::styled(format_hashtags(&tags), styles::hashtag_style()),
                ])
            }
        }
    };

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border_style(false)),
    );
    frame.render_widget(paragraph, area);
}
