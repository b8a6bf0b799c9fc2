use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use artvista_core::models::ArtworkRecord;
use artvista_core::utils::format_hashtags;

use crate::app::{App, AppState};
use crate::ui::styles;

use super::{input_display, wrap_text};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref artwork) = app.artwork else {
        let paragraph = Paragraph::new(Span::styled(
            " Artwork could not be loaded. Press Esc to go back.",
            styles::muted_style(),
        ))
        .block(Block::default().borders(Borders::ALL).border_style(styles::muted_style()));
        frame.render_widget(paragraph, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_artwork(frame, app, artwork, chunks[0]);

    let comment_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(chunks[1]);

    render_comments(frame, app, artwork, comment_chunks[0]);
    render_comment_input(frame, app, comment_chunks[1]);
}

fn render_artwork(frame: &mut Frame, app: &App, artwork: &ArtworkRecord, area: Rect) {
    let width = (area.width as usize).saturating_sub(4);
    let liked = app
        .identity
        .as_ref()
        .is_some_and(|id| artwork.is_liked_by(&id.uid));

    let mut lines = vec![
        Line::from(Span::styled(artwork.title.clone(), styles::title_style())),
        Line::from(vec![
            Span::styled(if liked { "♥ " } else { "♡ " }, styles::liked_style(liked)),
            Span::styled(
                format!("{} likes", artwork.like_count()),
                styles::muted_style(),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Year:     ", styles::muted_style()),
            Span::raw(artwork.year_created.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Category: ", styles::muted_style()),
            Span::raw(artwork.category.clone()),
        ]),
        Line::from(vec![
            Span::styled("Image:    ", styles::muted_style()),
            Span::raw(artwork.image_url.clone()),
        ]),
    ];

    if !artwork.hashtags.is_empty() {
        lines.push(Line::from(Span::styled(
            format_hashtags(&artwork.hashtags),
            styles::hashtag_style(),
        )));
    }

    if !artwork.abstract_text.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Abstract", styles::highlight_style())));
        for line in wrap_text(&artwork.abstract_text, width) {
            lines.push(Line::from(line));
        }
    }

    let artist = &artwork.artist;
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Artist", styles::highlight_style())));
    lines.push(Line::from(vec![
        Span::raw(artist.name.clone()),
        Span::styled(format!(" ({})", artist.lifespan_display()), styles::muted_style()),
    ]));
    if !artist.country.is_empty() {
        lines.push(Line::from(Span::styled(artist.country.clone(), styles::muted_style())));
    }
    if !artist.about.is_empty() {
        for line in wrap_text(&artist.about, width) {
            lines.push(Line::from(line));
        }
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styles::border_style(false)),
        );
    frame.render_widget(paragraph, area);
}

fn render_comments(frame: &mut Frame, app: &App, artwork: &ArtworkRecord, area: Rect) {
    let width = (area.width as usize).saturating_sub(4);
    let mut lines = Vec::new();

    if artwork.comments.is_empty() {
        lines.push(Line::from(Span::styled(
            "No comments yet. Press c to add one.",
            styles::muted_style(),
        )));
    }

    for comment in artwork.comments.iter().skip(app.comment_scroll) {
        lines.push(Line::from(Span::styled(
            comment.username.clone(),
            styles::highlight_style(),
        )));
        for line in wrap_text(&comment.text, width) {
            lines.push(Line::from(format!("  {}", line)));
        }
        lines.push(Line::from(""));
    }

    let title = format!(" Comments ({}) ", artwork.comments.len());
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(!matches!(app.state, AppState::Commenting))),
    );
    frame.render_widget(paragraph, area);
}

fn render_comment_input(frame: &mut Frame, app: &App, area: Rect) {
    let commenting = matches!(app.state, AppState::Commenting);

    let line = if commenting {
        Line::from(Span::styled(
            input_display(&app.comment_input, true),
            styles::list_item_style(),
        ))
    } else {
        Line::from(Span::styled(" Press c to comment", styles::muted_style()))
    };

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .title(" Add comment ")
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(commenting)),
    );
    frame.render_widget(paragraph, area);
}
