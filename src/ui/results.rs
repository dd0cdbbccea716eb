use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::ResultsView;
use crate::entities::decode_entities;
use crate::models::{Grade, Outcome, QuizResult};

const QUESTION_PREVIEW_LENGTH: usize = 60;

pub fn render(frame: &mut Frame, area: Rect, view: &ResultsView) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(8),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], &view.result);
    render_question_breakdown(frame, chunks[2], &view.result, view.scroll);
    render_controls(frame, chunks[3]);
}

fn grade_color(grade: Grade) -> Color {
    match grade {
        Grade::Excellent => Color::Green,
        Grade::Fair => Color::Yellow,
        Grade::Poor => Color::Red,
    }
}

fn render_score_summary(frame: &mut Frame, area: Rect, result: &QuizResult) {
    let card = result.score_card();
    let grade = Grade::from_percentage(card.percentage);
    let color = grade_color(grade);

    let outcomes = result.outcomes();
    let count = |wanted: Outcome| outcomes.iter().filter(|o| **o == wanted).count();

    let content = vec![
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(result.email.as_str().fg(Color::DarkGray)),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} / {}  ({}%)", card.score, card.total, card.percentage),
            Style::default().fg(color).bold(),
        )),
        Line::from(vec![
            Span::styled(grade.label(), Style::default().fg(color).bold()),
            Span::styled("  ·  ", Style::default().fg(Color::DarkGray)),
            Span::styled(grade.message(), Style::default().fg(color)),
        ]),
        Line::from(vec![
            Span::styled(
                format!("{} correct", count(Outcome::Correct)),
                Style::default().fg(Color::Green),
            ),
            Span::styled("  ·  ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{} incorrect", count(Outcome::Incorrect)),
                Style::default().fg(Color::Red),
            ),
            Span::styled("  ·  ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{} unanswered", count(Outcome::Unanswered)),
                Style::default().fg(Color::Yellow),
            ),
        ]),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_question_breakdown(frame: &mut Frame, area: Rect, result: &QuizResult, scroll: usize) {
    let mut lines: Vec<Line> = Vec::with_capacity(result.total_questions() * 3);

    for (index, question) in result.questions.iter().enumerate() {
        let (symbol, color) = match result.outcome(index) {
            Outcome::Correct => ("+", Color::Green),
            Outcome::Incorrect => ("-", Color::Red),
            Outcome::Unanswered => ("?", Color::Yellow),
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
            Span::styled(
                format!("{:2}. ", index + 1),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                truncate_question(&decode_entities(question.text())),
                Style::default().fg(Color::Gray),
            ),
        ]));

        let answer = result
            .user_answers
            .get(&index)
            .map(|a| decode_entities(a).into_owned())
            .unwrap_or_else(|| "(no answer)".to_string());
        lines.push(Line::from(vec![
            Span::raw("       "),
            Span::styled("yours: ", Style::default().fg(Color::DarkGray)),
            Span::styled(answer, Style::default().fg(color)),
            Span::styled("  correct: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                decode_entities(question.correct_answer()).into_owned(),
                Style::default().fg(Color::Green),
            ),
        ]));
    }

    // Two lines per question, so scroll by question.
    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll(((scroll * 2) as u16, 0));
    frame.render_widget(widget, area);
}

fn truncate_question(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > QUESTION_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(QUESTION_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  r retake  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
