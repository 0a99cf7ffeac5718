// ABOUTME: Step 1 screen: email column selection with detection badge and
// consumer-mail warning banner

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
};

use super::{
    CORNFLOWER_BLUE, GOLD, MUTED_GRAY, PANEL_BG, SELECTION_GREEN, SOFT_WHITE, SUBDUED_BORDER,
    WARNING_ORANGE,
};
use crate::app::AppState;

pub struct ColumnSelectComponent;

impl ColumnSelectComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Warning banner (or hint)
                Constraint::Min(4),    // Column list
            ])
            .split(area);

        self.render_banner(frame, chunks[0], state);
        self.render_column_list(frame, chunks[1], state);
    }

    fn render_banner(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let (line, color) = match state.free_mail_warning() {
            Some(count) if count > 0 => (
                Line::from(vec![
                    Span::styled("⚠ ", Style::default().fg(WARNING_ORANGE)),
                    Span::styled(
                        format!(
                            "{} emails look like personal addresses (gmail, yahoo, ...) and will likely be skipped",
                            count
                        ),
                        Style::default().fg(WARNING_ORANGE),
                    ),
                ]),
                WARNING_ORANGE,
            ),
            Some(_) => (
                Line::from(Span::styled(
                    "All emails look like business addresses",
                    Style::default().fg(SELECTION_GREEN),
                )),
                SUBDUED_BORDER,
            ),
            None => (
                Line::from(Span::styled(
                    "Pick the column that holds each record's email address",
                    Style::default().fg(MUTED_GRAY),
                )),
                SUBDUED_BORDER,
            ),
        };

        let banner = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color))
                .style(Style::default().bg(PANEL_BG)),
        );
        frame.render_widget(banner, area);
    }

    fn render_column_list(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let detected = state.detection.as_ref();

        let items: Vec<ListItem> = state
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let under_cursor = i == state.column_cursor;
                let selected = state.selected_column.as_deref() == Some(column.as_str());

                let mut spans = vec![
                    Span::styled(
                        if selected { "● " } else { "○ " },
                        Style::default().fg(if selected { SELECTION_GREEN } else { MUTED_GRAY }),
                    ),
                    Span::styled(
                        column.clone(),
                        if under_cursor {
                            Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
                        } else {
                            Style::default().fg(SOFT_WHITE)
                        },
                    ),
                ];

                if let Some(d) = detected.filter(|d| &d.column == column) {
                    spans.push(Span::styled(
                        format!("  detected ({}%)", d.confidence),
                        Style::default().fg(CORNFLOWER_BLUE),
                    ));
                }

                let mut item = ListItem::new(Line::from(spans));
                if under_cursor {
                    item = item.style(Style::default().bg(SUBDUED_BORDER));
                }
                item
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .title(" Columns ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(CORNFLOWER_BLUE))
                .style(Style::default().bg(PANEL_BG)),
        );
        frame.render_widget(list, area);
    }
}

impl Default for ColumnSelectComponent {
    fn default() -> Self {
        Self::new()
    }
}
