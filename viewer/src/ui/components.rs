use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use apod_core::{ItemView, MediaKind, ModalLayout, ModalView};

/// Human label for a media kind.
pub fn kind_label(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Image => "image",
        MediaKind::DirectVideoFile => "video file",
        MediaKind::YouTubeVideo => "YouTube video",
        MediaKind::GenericEmbed => "embed",
        MediaKind::Empty => "no preview",
    }
}

/// Centered sub-rectangle taking the given percentages of `r`.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Map the controller's viewport-relative modal sizing onto terminal rows.
pub fn modal_area(layout: ModalLayout, viewport: Rect) -> Rect {
    let fraction = match layout {
        ModalLayout::VideoBox { height, max_height } => height.min(max_height),
        ModalLayout::FitBox { max_height } => max_height,
    };
    centered_rect(80, (fraction * 100.0).round() as u16, viewport)
}

pub fn draw_welcome(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Space Photo Gallery",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Press r to fetch the astronomy picture of the day feed."),
        Line::from("Navigation is shuffled forward, sequential backward."),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" apodview "));
    f.render_widget(paragraph, area);
}

pub fn draw_loading(f: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new("Loading space photos...")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(" apodview "));
    f.render_widget(paragraph, area);
}

pub fn draw_error(f: &mut Frame, message: &str, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Press r to try again."),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" apodview "));
    f.render_widget(paragraph, area);
}

/// Inline single-item card: media kind, source URL and (for videos) the
/// thumbnail a card context would show.
pub fn draw_item(f: &mut Frame, view: &ItemView, total: usize, area: Rect) {
    let descriptor = &view.descriptor;
    let mut lines = vec![Line::from(vec![
        Span::styled("Media: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            kind_label(descriptor.kind),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    ])];

    match descriptor.kind {
        MediaKind::Empty => {
            lines.push(Line::from(Span::styled(
                "No preview",
                Style::default().fg(Color::DarkGray),
            )));
        }
        _ => {
            lines.push(Line::from(vec![
                Span::styled("Source: ", Style::default().fg(Color::DarkGray)),
                Span::raw(descriptor.primary_url.clone()),
            ]));
            if let Some(thumbnail) = &descriptor.thumbnail_url {
                lines.push(Line::from(vec![
                    Span::styled("Thumbnail: ", Style::default().fg(Color::DarkGray)),
                    Span::raw(thumbnail.clone()),
                ]));
            }
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter opens the lightbox - n/p navigate",
        Style::default().fg(Color::DarkGray),
    )));

    let title = format!(" {} / {} ", view.index + 1, total);
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(paragraph, area);
}

/// The lightbox. Shows the embed (or its fallback), then the caption block
/// when any caption line is present.
pub fn draw_modal(f: &mut Frame, modal: &ModalView, area: Rect) {
    f.render_widget(Clear, area);

    let descriptor = &modal.descriptor;
    let mut lines = Vec::new();

    if let Some(link) = &modal.fallback_link {
        lines.push(Line::from(Span::styled(
            "Cannot play here",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(vec![
            Span::styled("Open on YouTube: ", Style::default().fg(Color::DarkGray)),
            Span::styled(link.clone(), Style::default().fg(Color::Blue)),
        ]));
    } else {
        match descriptor.kind {
            MediaKind::Empty => {
                lines.push(Line::from(Span::styled(
                    "No preview",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            _ => {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("[{}] ", kind_label(descriptor.kind)),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw(descriptor.primary_url.clone()),
                ]));
                if descriptor.kind == MediaKind::YouTubeVideo {
                    lines.push(Line::from(Span::styled(
                        "Space toggles playback",
                        Style::default().fg(Color::DarkGray),
                    )));
                }
            }
        }
    }

    if !modal.caption.is_empty() {
        lines.push(Line::from(""));
        for (i, caption_line) in modal.caption.iter().enumerate() {
            let style = if i == 0 {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(caption_line.clone(), style)));
        }
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" lightbox - Esc closes ")
                .border_style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(paragraph, area);
}

pub fn draw_fact_bar(f: &mut Frame, fact: Option<&str>, area: Rect) {
    let text = fact.unwrap_or("Press f for a space fact.");
    let paragraph = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Did you know? "));
    f.render_widget(paragraph, area);
}

pub fn draw_key_hints(f: &mut Frame, area: Rect) {
    let hints = Line::from(vec![
        Span::styled("r", Style::default().fg(Color::Cyan)),
        Span::raw(" load  "),
        Span::styled("n/p", Style::default().fg(Color::Cyan)),
        Span::raw(" next/prev  "),
        Span::styled("Enter", Style::default().fg(Color::Cyan)),
        Span::raw(" lightbox  "),
        Span::styled("Space", Style::default().fg(Color::Cyan)),
        Span::raw(" play/pause  "),
        Span::styled("f", Style::default().fg(Color::Cyan)),
        Span::raw(" fact  "),
        Span::styled("?", Style::default().fg(Color::Cyan)),
        Span::raw(" help  "),
        Span::styled("q", Style::default().fg(Color::Cyan)),
        Span::raw(" quit"),
    ]);
    f.render_widget(Paragraph::new(hints), area);
}

pub fn draw_status_message(f: &mut Frame, message: &str, color: Color, viewport: Rect) {
    let area = Rect {
        x: viewport.x,
        y: viewport.bottom().saturating_sub(2),
        width: viewport.width,
        height: 1,
    };
    f.render_widget(Clear, area);
    let paragraph = Paragraph::new(message).style(Style::default().fg(color));
    f.render_widget(paragraph, area);
}

pub fn draw_help_dialog(f: &mut Frame, viewport: Rect) {
    let area = centered_rect(50, 60, viewport);
    f.render_widget(Clear, area);
    let lines = vec![
        Line::from("r        load / reload the feed"),
        Line::from("n, l, →  next (shuffled)"),
        Line::from("p, h, ←  previous (sequential)"),
        Line::from("Enter, o open the lightbox"),
        Line::from("Esc      close the lightbox"),
        Line::from("Space    toggle embed playback"),
        Line::from("f        new space fact"),
        Line::from("mouse    drag left/right to swipe, double-click to toggle"),
        Line::from("q        quit"),
    ];
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Keys "));
    f.render_widget(paragraph, area);
}
