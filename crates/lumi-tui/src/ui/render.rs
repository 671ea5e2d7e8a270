use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use lumi_core::dashboard::Tab;

use crate::app::{App, AppState, LoginFocus};

use super::styles::{self, Palette};
use super::tabs::{chat, exercise, overview, progress, report};

const LOGO: [&str; 3] = [
    "     ╦  ╦ ╦╔╦╗╦",
    "     ║  ║ ║║║║║",
    "     ╩═╝╚═╝╩ ╩╩",
];

pub fn render(frame: &mut Frame, app: &App) {
    let p = styles::palette(app.theme);
    frame.render_widget(Block::default().style(p.base()), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, &p, chunks[0]);
    render_tabs(frame, app, &p, chunks[1]);
    render_main_content(frame, app, &p, chunks[2]);
    render_status_bar(frame, app, &p, chunks[3]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame, &p);
    }

    if matches!(app.state, AppState::LoggingIn) {
        render_login_overlay(frame, app, &p);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame, &p);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let title = match app.dashboard.as_ref() {
        Some(d) => format!("  LUMI • {}", d.destination().title()),
        None => "  LUMI".to_string(),
    };
    let right = format!("{}  [?] Ajuda", app.theme.label());

    let padding = (area.width as usize)
        .saturating_sub(title.chars().count() + right.chars().count() + 4);
    let title_line = Line::from(vec![
        Span::styled(title, p.title()),
        Span::raw(" ".repeat(padding)),
        Span::styled(right, p.muted()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(p.muted());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_tabs(frame: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let mut spans = vec![Span::raw(" ")];

    if let Some(dashboard) = app.dashboard.as_ref() {
        for (i, tab) in dashboard.tabs().iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", p.muted()));
            }
            let label = format!("[{}] {}", i + 1, tab.title());
            spans.push(Span::styled(label, p.tab(*tab == dashboard.tab)));
        }
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(p.muted());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let Some(dashboard) = app.dashboard.as_ref() else {
        render_entry(frame, p, area);
        return;
    };

    match dashboard.tab {
        Tab::Overview => overview::render(frame, app, dashboard, p, area),
        Tab::Progress => progress::render(frame, p, area),
        Tab::Exercise => exercise::render(frame, app, dashboard, p, area),
        Tab::Chat => chat::render(frame, app, dashboard, p, area),
        Tab::Report => report::render(frame, app, p, area),
    }
}

/// Anonymous entry view shown behind the login form
fn render_entry(frame: &mut Frame, p: &Palette, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Bem-vindo ao portal escolar Lumi", p.title())),
        Line::from(Span::styled(
            "Aprender, acompanhar e comunicar num só lugar.",
            p.muted(),
        )),
    ];
    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let left_text = match (&app.status_message, app.dashboard.as_ref()) {
        (Some(msg), _) => format!(" {} ", msg),
        (None, Some(d)) => format!(" {} ", d.session().identifier),
        (None, None) => " Sem sessão ".to_string(),
    };

    let shortcuts = if app.is_typing() {
        "^T tema | ^L sair | ^Q fechar"
    } else {
        "[t]ema | [l] sair | [q] fechar"
    };
    let right_text = format!(" {} ", shortcuts);

    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());
    let status_line = Line::from(vec![
        Span::styled(left_text, p.muted()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, p.muted()),
    ]);
    frame.render_widget(Paragraph::new(status_line).style(p.status_bar()), area);
}

fn logo_lines(p: &Palette) -> Vec<Line<'static>> {
    LOGO.iter()
        .map(|l| Line::from(Span::styled(*l, p.title())))
        .collect()
}

fn help_line(p: &Palette, key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), p.help_key()),
        Span::styled(desc, p.text()),
    ])
}

fn render_help_overlay(frame: &mut Frame, p: &Palette) {
    let area = centered_rect_fixed(52, 24, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let mut help_text = logo_lines(p);
    help_text.extend([
        Line::from(Span::styled(format!("          versão {}", version), p.muted())),
        Line::from(""),
        Line::from(Span::styled(" Navegação", p.highlight())),
        help_line(p, "1-5", "Mudar de separador"),
        help_line(p, "←/→ Tab", "Separador anterior/seguinte"),
        help_line(p, "Esc", "Limpar campo / fechar"),
        Line::from(""),
        Line::from(Span::styled(" Ações", p.highlight())),
        help_line(p, "Enter", "Verificar resposta / enviar"),
        help_line(p, "g", "Gerar relatório"),
        help_line(p, "t  ^T", "Alternar tema"),
        help_line(p, "l  ^L", "Terminar sessão"),
        help_line(p, "q  ^Q", "Fechar"),
        Line::from(""),
        Line::from(Span::styled(
            "  Nos separadores Exercício e Chat as letras",
            p.muted(),
        )),
        Line::from(Span::styled("  vão para o campo de texto; use ^T/^L/^Q.", p.muted())),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Prima ", p.muted()),
            Span::styled("?", p.help_key()),
            Span::styled(" ou ", p.muted()),
            Span::styled("Esc", p.help_key()),
            Span::styled(" para fechar", p.muted()),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(p.border(true))
        .style(p.base());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn field_style(p: &Palette, focused: bool) -> ratatui::style::Style {
    if focused {
        p.selected()
    } else {
        p.text()
    }
}

fn render_login_overlay(frame: &mut Frame, app: &App, p: &Palette) {
    let height = if app.login_error.is_some() || app.login_pending { 15 } else { 13 };
    let area = centered_rect_fixed(48, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = logo_lines(p);
    lines.push(Line::from(""));

    let identifier_focused = app.login_focus == LoginFocus::Identifier;
    let cursor = if identifier_focused { "▌" } else { "" };
    let identifier_display = format!("{:<20}", app.login_identifier);
    lines.push(Line::from(vec![
        Span::raw("   "),
        Span::styled("Email:    [", p.muted()),
        Span::styled(format!("{}{}", identifier_display, cursor), field_style(p, identifier_focused)),
        Span::styled("]", p.muted()),
    ]));

    let secret_focused = app.login_focus == LoginFocus::Secret;
    let cursor = if secret_focused { "▌" } else { "" };
    let masked: String = "*".repeat(app.login_secret.chars().count().min(20));
    lines.push(Line::from(vec![
        Span::raw("   "),
        Span::styled("Password: [", p.muted()),
        Span::styled(format!("{:<20}{}", masked, cursor), field_style(p, secret_focused)),
        Span::styled("]", p.muted()),
    ]));

    let remember_focused = app.login_focus == LoginFocus::Remember;
    let mark = if app.login_remember { "x" } else { " " };
    lines.push(Line::from(vec![
        Span::raw("   "),
        Span::styled(format!("[{}] Lembrar-me", mark), field_style(p, remember_focused)),
    ]));

    let button_focused = app.login_focus == LoginFocus::Button;
    lines.push(Line::from(""));
    let label = if button_focused { " ▶ Entrar ◀ " } else { "   Entrar   " };
    lines.push(Line::from(vec![
        Span::raw("              ["),
        Span::styled(label, field_style(p, button_focused)),
        Span::raw("]"),
    ]));

    if app.login_pending {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("   A verificar...", p.muted())));
    } else if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("   {}", error), p.error())));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(p.border(true))
        .style(p.base());

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

/// Create a centered rectangle with fixed dimensions
pub(crate) fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame, p: &Palette) {
    let area = centered_rect_fixed(46, 9, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = logo_lines(p);
    lines.extend([
        Line::from(""),
        Line::from(Span::styled("   Tem a certeza que quer sair?", p.highlight())),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Prima ", p.muted()),
            Span::styled("[S]", p.help_key()),
            Span::styled(" para sair, ", p.muted()),
            Span::styled("[N]", p.help_key()),
            Span::styled(" para cancelar", p.muted()),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(p.border(true))
        .style(p.base());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
