mod landing;
mod quiz;
mod results;

use ratatui::{prelude::*, widgets::Block};

use crate::app::{App, Screen};

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match &app.screen {
        Screen::Landing(form) => landing::render(frame, area, form),
        Screen::Quiz(view) => quiz::render(frame, area, view, app.warning_threshold()),
        Screen::Results(view) => results::render(frame, area, view),
    }
}
