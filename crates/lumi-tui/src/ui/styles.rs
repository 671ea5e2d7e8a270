use ratatui::style::{Color, Modifier, Style};

use lumi_core::dashboard::Theme;

/// Colors for one theme
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub error: Color,
    pub muted: Color,
    pub highlight: Color,
    pub status_bg: Color,
}

const DARK: Palette = Palette {
    fg: Color::White,
    bg: Color::Rgb(18, 20, 28),
    primary: Color::Rgb(96, 165, 250),
    secondary: Color::Rgb(96, 160, 96),
    accent: Color::Rgb(192, 160, 64),
    error: Color::Rgb(239, 68, 68),
    muted: Color::Rgb(128, 128, 128),
    highlight: Color::Rgb(48, 48, 64),
    status_bg: Color::Rgb(32, 32, 40),
};

const LIGHT: Palette = Palette {
    fg: Color::Rgb(24, 24, 32),
    bg: Color::Rgb(248, 248, 250),
    primary: Color::Rgb(37, 99, 235),
    secondary: Color::Rgb(22, 128, 61),
    accent: Color::Rgb(161, 98, 7),
    error: Color::Rgb(220, 38, 38),
    muted: Color::Rgb(110, 110, 120),
    highlight: Color::Rgb(219, 226, 240),
    status_bg: Color::Rgb(226, 228, 236),
};

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => LIGHT,
        Theme::Dark => DARK,
    }
}

impl Palette {
    /// Base style for whole-screen backgrounds
    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.fg)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn highlight(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.secondary)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn tab(&self, selected: bool) -> Style {
        if selected {
            Style::default()
                .fg(self.primary)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(self.muted)
        }
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.primary)
        } else {
            Style::default().fg(self.muted)
        }
    }

    pub fn status_bar(&self) -> Style {
        Style::default().bg(self.status_bg).fg(self.fg)
    }

    pub fn help_key(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Chat bubble sent by the user
    pub fn own_message(&self) -> Style {
        Style::default().fg(self.primary)
    }

    /// Chat bubble from the counterpart
    pub fn other_message(&self) -> Style {
        Style::default().fg(self.secondary)
    }
}
