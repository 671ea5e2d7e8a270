use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use lumi_core::dashboard::{ChatMessage, Dashboard, Sender};
use lumi_core::utils::format_time;

use crate::app::App;
use crate::ui::styles::Palette;

pub fn render(frame: &mut Frame, app: &App, dashboard: &Dashboard, p: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(area);

    render_messages(frame, dashboard, p, chunks[0]);

    let input = Paragraph::new(Line::from(vec![
        Span::styled(app.chat_input.clone(), p.text()),
        Span::styled("▌", p.muted()),
    ]))
    .block(
        Block::default()
            .title(" Mensagem [Enter] enviar ")
            .title_style(p.muted())
            .borders(Borders::ALL)
            .border_style(p.border(true)),
    );
    frame.render_widget(input, chunks[1]);
}

fn message_lines<'a>(message: &'a ChatMessage, p: &Palette) -> [Line<'a>; 2] {
    let (who, style) = match message.sender {
        Sender::User => ("Eu", p.own_message()),
        Sender::Counterpart => ("Lumi", p.other_message()),
    };
    [
        Line::from(vec![
            Span::styled(format!("{} ", who), style),
            Span::styled(format_time(&message.timestamp), p.muted()),
        ]),
        Line::from(Span::styled(format!("  {}", message.text), p.text())),
    ]
}

fn render_messages(frame: &mut Frame, dashboard: &Dashboard, p: &Palette, area: Rect) {
    let block = Block::default()
        .title(format!(" Chat ({}) ", dashboard.chat.len()))
        .title_style(p.title())
        .borders(Borders::ALL)
        .border_style(p.border(false));
    let inner = block.inner(area);

    let lines: Vec<Line> = if dashboard.chat.is_empty() {
        vec![Line::from(Span::styled("Ainda não há mensagens.", p.muted()))]
    } else {
        dashboard
            .chat
            .messages()
            .iter()
            .flat_map(|m| message_lines(m, p))
            .collect()
    };

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    let scroll = bottom_scroll(&paragraph, inner);

    frame.render_widget(paragraph.block(block).scroll((scroll, 0)), area);
}

/// Rows to scroll so the last wrapped row sits on the bottom edge
fn bottom_scroll(paragraph: &Paragraph, inner: Rect) -> u16 {
    let rows = paragraph.line_count(inner.width);
    let scroll = rows.saturating_sub(inner.height as usize);
    u16::try_from(scroll).unwrap_or(u16::MAX)
}
