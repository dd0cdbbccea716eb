use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::LandingForm;

pub fn render(frame: &mut Frame, area: Rect, form: &LandingForm) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(13),
        Constraint::Fill(1),
    ])
    .split(area);
    let columns = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(64),
        Constraint::Fill(1),
    ])
    .split(chunks[1]);

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "QUIZ CHALLENGE",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from("15 questions in 30 minutes".fg(Color::DarkGray)),
        Line::from(""),
        Line::from(vec![
            Span::styled("Email: ", Style::default().fg(Color::White)),
            Span::styled(form.input.as_str(), Style::default().fg(Color::Yellow)),
            Span::styled("_", Style::default().fg(Color::Yellow)),
        ]),
        Line::from(""),
    ];

    if form.loading {
        content.push(Line::from(Span::styled(
            "Loading Quiz...",
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(err) = &form.error {
        content.push(Line::from(Span::styled(
            err.as_str(),
            Style::default().fg(Color::Red),
        )));
    } else {
        content.push(Line::from(""));
    }

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        "[Enter] start quiz  ·  [Esc] quit",
        Style::default().fg(Color::DarkGray),
    )));

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );

    frame.render_widget(widget, columns[1]);
}
