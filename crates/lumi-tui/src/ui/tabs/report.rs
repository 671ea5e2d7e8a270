use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::styles::Palette;

pub fn render(frame: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let block = Block::default()
        .title(" Relatório [g] gerar ")
        .title_style(p.title())
        .borders(Borders::ALL)
        .border_style(p.border(true));

    let paragraph = match app.report_text.as_deref() {
        Some(text) => Paragraph::new(text.lines().map(Line::from).collect::<Vec<_>>()).style(p.text()),
        None => Paragraph::new("Prima g ou Enter para gerar o relatório diário.").style(p.muted()),
    };

    frame.render_widget(paragraph.block(block).wrap(Wrap { trim: false }), area);
}
