use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use lumi_core::dashboard::report::display_name;
use lumi_core::dashboard::{Dashboard, Tab};

use crate::app::App;
use crate::ui::styles::Palette;

pub fn render(frame: &mut Frame, app: &App, dashboard: &Dashboard, p: &Palette, area: Rect) {
    let session = dashboard.session();
    let name = display_name(Some(&session.identifier));

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Olá, ", p.text()),
            Span::styled(name, p.title()),
            Span::styled("!", p.text()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Perfil:   ", p.highlight()),
            Span::styled(session.role.display_name(), p.text()),
        ]),
        Line::from(vec![
            Span::styled("Conta:    ", p.highlight()),
            Span::styled(session.identifier.clone(), p.text()),
        ]),
        Line::from(vec![
            Span::styled("Tema:     ", p.highlight()),
            Span::styled(app.theme.label(), p.text()),
        ]),
        Line::from(""),
        Line::from(Span::styled("Separadores disponíveis", p.highlight())),
    ];

    for (i, tab) in dashboard.tabs().iter().enumerate() {
        if *tab == Tab::Overview {
            continue;
        }
        lines.push(Line::from(vec![
            Span::styled(format!("  [{}] ", i + 1), p.help_key()),
            Span::styled(tab.title(), p.text()),
        ]));
    }

    if !dashboard.chat.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{} mensagens no chat", dashboard.chat.len()),
            p.muted(),
        )));
    }

    let block = Block::default()
        .title(" Visão geral ")
        .title_style(p.title())
        .borders(Borders::ALL)
        .border_style(p.border(true));

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}
