pub mod components;

use anyhow::Result;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::{App, Screen};

/// Draw the main UI
pub fn draw_ui(f: &mut Frame, app: &mut App) -> Result<()> {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(size);

    match &app.viewer.target().screen {
        Screen::Welcome => components::draw_welcome(f, chunks[0]),
        Screen::Loading => components::draw_loading(f, chunks[0]),
        Screen::Error(message) => components::draw_error(f, message, chunks[0]),
        Screen::Item(view) => {
            components::draw_item(f, view, app.viewer.len(), chunks[0]);
        }
    }

    components::draw_fact_bar(f, app.facts.current(), chunks[1]);
    components::draw_key_hints(f, chunks[2]);

    // Modal overlays everything; remember where its content landed so a
    // click on the overlay background can dismiss it.
    app.viewer.target_mut().modal_area = None;
    if let Some(modal) = app.viewer.target().modal.clone() {
        let area = components::modal_area(modal.layout, size);
        components::draw_modal(f, &modal, area);
        app.viewer.target_mut().modal_area = Some(area);
    }

    if let Some((message, _, color)) = app.status_message.clone() {
        components::draw_status_message(f, &message, color, size);
    }

    if app.show_help {
        components::draw_help_dialog(f, size);
    }

    Ok(())
}
