//! Status bar: mode label with keybindings, plus the last log line.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{
    C_ADOPTED, C_HEADER, C_MODE_BROWSE, C_MODE_DETAIL, C_MUTED, C_SECONDARY, C_SEPARATOR,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Detail,
    Help,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Browse => "BROWSE",
            Self::Detail => "DETAIL",
            Self::Help => "HELP",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Browse => C_MODE_BROWSE,
            Self::Detail => C_MODE_DETAIL,
            Self::Help => C_HEADER,
        }
    }

    fn keys(self) -> &'static str {
        match self {
            Self::Browse => {
                " ↑↓/jk move  g/G first/last  PgUp/PgDn page  Enter/l open  Space/h fold  K keys  ? help  q quit"
            }
            Self::Detail => " a/Enter adopt  Esc/q close",
            Self::Help => " Esc/?/q close",
        }
    }
}

/// Draw the log bar: adopted count and the last log line.
pub fn draw_log_bar(frame: &mut Frame, area: Rect, last_log: Option<&str>, adopted: usize) {
    let count_style = if adopted > 0 {
        Style::default().fg(C_ADOPTED)
    } else {
        Style::default().fg(C_MUTED)
    };
    let line = Line::from(vec![
        Span::styled(format!("♥ {adopted}"), count_style),
        Span::raw(" "),
        Span::styled(last_log.unwrap_or(""), Style::default().fg(C_SECONDARY)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw a horizontal separator line.
pub fn draw_separator(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        "─".repeat(area.width as usize),
        Style::default().fg(C_SEPARATOR),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: Mode) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default()
                .fg(mode.color())
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(mode.keys(), Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
