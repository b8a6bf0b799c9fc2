use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use artvista_core::utils::{format_hashtags, truncate};

use crate::app::{App, AppState};
use crate::ui::styles;

use super::wrap_text;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let list_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(chunks[0]);

    render_search_bar(frame, app, list_chunks[0]);
    render_artwork_list(frame, app, list_chunks[1]);
    render_preview(frame, app, chunks[1]);
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let searching = matches!(app.state, AppState::Searching);

    let content = if searching || !app.search_query.is_empty() {
        Line::from(vec![
            Span::styled(" / ", styles::search_style()),
            Span::styled(
                super::input_display(&app.search_query, searching),
                styles::list_item_style(),
            ),
        ])
    } else {
        Line::from(Span::styled(
            " Press / to search by title, artist, category or #tag",
            styles::muted_style(),
        ))
    };

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border_style(searching)),
    );
    frame.render_widget(paragraph, area);
}

fn render_artwork_list(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new([
        Cell::from("Title"),
        Cell::from("Artist"),
        Cell::from("Year"),
        Cell::from("♥"),
    ])
    .style(styles::title_style())
    .height(1);

    let user_id = app.identity.as_ref().map(|id| id.uid.as_str());
    let artworks = app.filtered_artworks();

    let rows: Vec<Row> = artworks
        .iter()
        .enumerate()
        .map(|(i, artwork)| {
            let style = if i == app.home_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            let liked = user_id.is_some_and(|uid| artwork.is_liked_by(uid));

            Row::new(vec![
                Cell::from(artwork.title.as_str()),
                Cell::from(artwork.artist.name.as_str()),
                Cell::from(artwork.year_created.to_string()),
                Cell::from(Span::styled(
                    artwork.like_count().to_string(),
                    styles::liked_style(liked),
                )),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(50),
        Constraint::Fill(1),
        Constraint::Length(6),
        Constraint::Length(4),
    ];

    let title = if app.search_query.is_empty() {
        format!(" Gallery ({}) ", app.artworks.len())
    } else {
        format!(" Gallery ({} of {}) ", artworks.len(), app.artworks.len())
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(!matches!(app.state, AppState::Searching))),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !artworks.is_empty() {
        state.select(Some(app.home_selection));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_preview(frame: &mut Frame, app: &App, area: Rect) {
    let artworks = app.filtered_artworks();
    let width = (area.width as usize).saturating_sub(4);

    let lines = match artworks.get(app.home_selection) {
        Some(artwork) => {
            let mut lines = vec![
                Line::from(Span::styled(artwork.title.clone(), styles::title_style())),
                Line::from(vec![
                    Span::styled(artwork.artist.name.clone(), styles::list_item_style()),
                    Span::styled(
                        format!(" ({})", artwork.artist.lifespan_display()),
                        styles::muted_style(),
                    ),
                ]),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Category: ", styles::muted_style()),
                    Span::raw(artwork.category.clone()),
                ]),
                Line::from(vec![
                    Span::styled("Year:     ", styles::muted_style()),
                    Span::raw(artwork.year_created.to_string()),
                ]),
                Line::from(vec![
                    Span::styled("Comments: ", styles::muted_style()),
                    Span::raw(artwork.comments.len().to_string()),
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
                for line in wrap_text(&truncate(&artwork.abstract_text, 400), width) {
                    lines.push(Line::from(line));
                }
            }
            lines
        }
        None if app.artworks.is_empty() => vec![Line::from(Span::styled(
            "No artworks yet. Press n to upload one.",
            styles::muted_style(),
        ))],
        None => vec![Line::from(Span::styled(
            "Nothing matches your search.",
            styles::muted_style(),
        ))],
    };

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" Preview ")
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(false)),
        );
    frame.render_widget(paragraph, area);
}
