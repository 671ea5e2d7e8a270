use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use lumi_core::dashboard::{Dashboard, ExerciseOutcome, EXERCISE_QUESTION};

use crate::app::App;
use crate::ui::styles::Palette;

pub fn render(frame: &mut Frame, app: &App, dashboard: &Dashboard, p: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Question
            Constraint::Length(3), // Answer
            Constraint::Min(3),    // Feedback
        ])
        .split(area);

    let question = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Quanto é ", p.text()),
            Span::styled(EXERCISE_QUESTION, p.title()),
            Span::styled("?", p.text()),
        ]),
    ])
    .block(
        Block::default()
            .title(" Exercício ")
            .title_style(p.title())
            .borders(Borders::ALL)
            .border_style(p.border(false)),
    );
    frame.render_widget(question, chunks[0]);

    let answer = Paragraph::new(Line::from(vec![
        Span::styled(app.exercise_input.clone(), p.text()),
        Span::styled("▌", p.muted()),
    ]))
    .block(
        Block::default()
            .title(" Resposta [Enter] verificar ")
            .title_style(p.muted())
            .borders(Borders::ALL)
            .border_style(p.border(true)),
    );
    frame.render_widget(answer, chunks[1]);

    let feedback = match dashboard.exercise {
        Some(outcome @ ExerciseOutcome::Correct) => Line::from(Span::styled(outcome.feedback(), p.success())),
        Some(outcome @ ExerciseOutcome::Wrong) => Line::from(Span::styled(outcome.feedback(), p.error())),
        None => Line::from(Span::styled("Escreva a resposta e prima Enter.", p.muted())),
    };
    frame.render_widget(Paragraph::new(vec![Line::from(""), feedback]), chunks[2]);
}
