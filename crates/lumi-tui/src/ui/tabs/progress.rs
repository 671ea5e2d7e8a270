use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use lumi_core::dashboard::report::{PROJECTS, SUBJECT_PROGRESS};

use crate::ui::styles::Palette;

pub fn render(frame: &mut Frame, p: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(SUBJECT_PROGRESS.len() as u16 * 3 + 2),
            Constraint::Min(4),
        ])
        .split(area);

    render_subjects(frame, p, chunks[0]);
    render_projects(frame, p, chunks[1]);
}

fn render_subjects(frame: &mut Frame, p: &Palette, area: Rect) {
    let block = Block::default()
        .title(" Progresso ")
        .title_style(p.title())
        .borders(Borders::ALL)
        .border_style(p.border(true));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(SUBJECT_PROGRESS.iter().map(|_| Constraint::Length(3)))
        .split(inner);

    for ((subject, percent), row) in SUBJECT_PROGRESS.iter().zip(rows.iter()) {
        let gauge = Gauge::default()
            .block(Block::default().title(*subject).title_style(p.text()))
            .gauge_style(p.own_message())
            .percent(*percent)
            .label(format!("{}%", percent));
        frame.render_widget(gauge, *row);
    }
}

fn render_projects(frame: &mut Frame, p: &Palette, area: Rect) {
    let lines: Vec<Line> = PROJECTS
        .iter()
        .map(|project| {
            Line::from(vec![
                Span::styled("  • ", p.highlight()),
                Span::styled(*project, p.text()),
            ])
        })
        .collect();

    let block = Block::default()
        .title(" Projetos ")
        .title_style(p.title())
        .borders(Borders::ALL)
        .border_style(p.border(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
