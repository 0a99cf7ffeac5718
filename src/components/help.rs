// ABOUTME: Help overlay listing the wizard's keyboard shortcuts

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use super::{CORNFLOWER_BLUE, GOLD, MUTED_GRAY, PANEL_BG, SOFT_WHITE};

pub struct HelpComponent;

impl HelpComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let width = 56.min(area.width.saturating_sub(4));
        let height = 20.min(area.height.saturating_sub(2));
        let popup = Rect {
            x: (area.width.saturating_sub(width)) / 2,
            y: (area.height.saturating_sub(height)) / 2,
            width,
            height,
        };

        frame.render_widget(Clear, popup);

        let entries: [(&str, &str); 14] = [
            ("↑/↓, j/k", "move selection"),
            ("Space", "select column (step 1)"),
            ("Enter", "confirm / toggle / submit"),
            ("Tab", "next panel (step 2)"),
            ("a / r", "accept / reject suggestion"),
            ("s", "start enrichment"),
            ("Ctrl+S", "start enrichment (anywhere)"),
            ("e", "expand/collapse preview rows"),
            ("y", "copy row's email to clipboard"),
            ("PgUp/PgDn", "move preview row cursor"),
            ("Esc", "back (step 2) / quit (step 1)"),
            ("q", "quit"),
            ("Ctrl+C", "quit (anywhere)"),
            ("?", "toggle this help"),
        ];

        let mut lines = vec![Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
        ))];
        lines.push(Line::default());
        for (keys, action) in entries {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<12}", keys), Style::default().fg(CORNFLOWER_BLUE)),
                Span::styled(action, Style::default().fg(SOFT_WHITE)),
            ]));
        }
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "  Press ? or Esc to close",
            Style::default().fg(MUTED_GRAY),
        )));

        let help = Paragraph::new(lines).block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(CORNFLOWER_BLUE))
                .style(Style::default().bg(PANEL_BG)),
        );
        frame.render_widget(help, popup);
    }
}

impl Default for HelpComponent {
    fn default() -> Self {
        Self::new()
    }
}
