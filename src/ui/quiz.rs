use std::time::Duration;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap},
};

use crate::app::{Focus, QuizView};
use crate::entities::decode_entities;
use crate::models::Difficulty;
use crate::session::{format_time, QuestionStatus};

const OPTION_LABELS: [char; 9] = ['1', '2', '3', '4', '5', '6', '7', '8', '9'];
const NAV_WIDTH: u16 = 22;

pub fn render(frame: &mut Frame, area: Rect, view: &QuizView, warning: Duration) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], view, warning);
    render_progress(frame, chunks[1], view);

    let body = Layout::horizontal([Constraint::Fill(1), Constraint::Length(NAV_WIDTH)])
        .spacing(2)
        .split(chunks[3]);

    render_question(frame, body[0], view);
    render_navigator(frame, body[1], view);
    render_controls(frame, chunks[4], view.focus);
}

fn render_header(frame: &mut Frame, area: Rect, view: &QuizView, warning: Duration) {
    let session = &view.session;
    let remaining = session.time_remaining();
    let timer_style = if remaining < warning {
        Style::default().fg(Color::Red).bold()
    } else {
        Style::default().fg(Color::Green).bold()
    };

    let columns = Layout::horizontal([Constraint::Fill(1), Constraint::Length(24)]).split(area);

    let position = Paragraph::new(format!(
        "Question {} of {}  ·  {}",
        session.current_index() + 1,
        session.total_questions(),
        session.email()
    ))
    .fg(Color::Cyan)
    .bold();
    frame.render_widget(position, columns[0]);

    let mut timer = vec![Span::styled(format_time(remaining), timer_style)];
    if remaining < warning {
        timer.insert(0, Span::styled("Hurry! ", Style::default().fg(Color::Red)));
    }
    frame.render_widget(
        Paragraph::new(Line::from(timer)).alignment(Alignment::Right),
        columns[1],
    );
}

fn render_progress(frame: &mut Frame, area: Rect, view: &QuizView) {
    let answered = view.session.answered_count();
    let total = view.session.total_questions().max(1);
    let widget = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
        .ratio((answered as f64 / total as f64).clamp(0.0, 1.0))
        .label(format!("{}/{} answered", answered, view.session.total_questions()));
    frame.render_widget(widget, area);
}

fn render_question(frame: &mut Frame, area: Rect, view: &QuizView) {
    let Some(question) = view.session.current_question() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(5),
        Constraint::Fill(1),
    ])
    .split(area);

    let meta = Line::from(vec![
        Span::styled(
            decode_entities(question.category()).into_owned(),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled("  ·  ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            question.difficulty().label(),
            difficulty_color(question.difficulty()),
        ),
    ]);
    frame.render_widget(Paragraph::new(meta), chunks[0]);

    let text = Paragraph::new(decode_entities(question.text()).into_owned())
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold()
        .block(Block::default().padding(Padding::vertical(1)));
    frame.render_widget(text, chunks[1]);

    let recorded = view.session.answer_for(view.session.current_index());
    render_options(frame, chunks[2], &question.choices, view, recorded);
}

fn difficulty_color(difficulty: Difficulty) -> Style {
    match difficulty {
        Difficulty::Easy => Style::default().fg(Color::Green),
        Difficulty::Medium => Style::default().fg(Color::Yellow),
        Difficulty::Hard => Style::default().fg(Color::Red),
    }
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    choices: &[String],
    view: &QuizView,
    recorded: Option<&str>,
) {
    let mut lines: Vec<Line> = Vec::with_capacity(choices.len() * 2);

    for (index, choice) in choices.iter().enumerate() {
        let is_highlighted = view.focus == Focus::Choices && index == view.highlighted;
        let is_recorded = recorded == Some(choice.as_str());

        let style = match (is_highlighted, is_recorded) {
            (true, _) => Style::default().fg(Color::Cyan).bold(),
            (false, true) => Style::default().fg(Color::Green).bold(),
            (false, false) => Style::default().fg(Color::Gray),
        };
        let marker = if is_highlighted { ">" } else { " " };
        let check = if is_recorded { " ●" } else { "" };
        let label = OPTION_LABELS.get(index).copied().unwrap_or(' ');

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", label), style),
            Span::styled(decode_entities(choice).into_owned(), style),
            Span::styled(check, Style::default().fg(Color::Green)),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_navigator(frame: &mut Frame, area: Rect, view: &QuizView) {
    let session = &view.session;
    let per_row = 4;

    let lines: Vec<Line> = (0..session.total_questions())
        .collect::<Vec<_>>()
        .chunks(per_row)
        .map(|row| {
            Line::from(
                row.iter()
                    .map(|&index| {
                        let mut style = status_style(session.question_status(index));
                        if view.focus == Focus::Navigator && index == view.nav_cursor {
                            style = style.reversed();
                        }
                        Span::styled(format!("{:>3} ", index + 1), style)
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let mut content = vec![
        Line::from(Span::styled(
            format!("Answered: {}/{}", session.answered_count(), session.total_questions()),
            Style::default().fg(Color::White).bold(),
        )),
        Line::from(""),
    ];
    content.extend(lines);
    content.push(Line::from(""));
    content.push(Line::from(Span::styled("■ answered", status_style(QuestionStatus::Answered))));
    content.push(Line::from(Span::styled("■ visited", status_style(QuestionStatus::Visited))));
    content.push(Line::from(Span::styled(
        "■ not visited",
        status_style(QuestionStatus::NotVisited),
    )));

    let border = if view.focus == Focus::Navigator {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let widget = Paragraph::new(content).block(
        Block::default()
            .title(" Questions ")
            .borders(Borders::ALL)
            .border_style(border),
    );
    frame.render_widget(widget, area);
}

fn status_style(status: QuestionStatus) -> Style {
    match status {
        QuestionStatus::Current => Style::default().fg(Color::Cyan).bold(),
        QuestionStatus::Answered => Style::default().fg(Color::Green),
        QuestionStatus::Visited => Style::default().fg(Color::Yellow),
        QuestionStatus::NotVisited => Style::default().fg(Color::DarkGray),
    }
}

fn render_controls(frame: &mut Frame, area: Rect, focus: Focus) {
    let text = match focus {
        Focus::Choices => "j/k choose  ·  enter select  ·  h/l prev/next  ·  tab questions  ·  s submit  ·  q quit",
        Focus::Navigator => "j/k move  ·  enter jump  ·  tab back  ·  s submit  ·  q quit",
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
