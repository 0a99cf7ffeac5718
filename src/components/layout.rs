// ABOUTME: Main layout component: step header, step content, preview table,
// footer keymap, and notification toasts

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use super::{
    ColumnSelectComponent, FieldSelectComponent, HelpComponent, PreviewTableComponent,
    CORNFLOWER_BLUE, DARK_BG, GOLD, MUTED_GRAY, PANEL_BG, SELECTION_GREEN, WARNING_ORANGE,
};
use crate::app::state::{AppState, NotificationType, WizardStep};

pub struct LayoutComponent {
    column_select: ColumnSelectComponent,
    field_select: FieldSelectComponent,
    preview_table: PreviewTableComponent,
    help: HelpComponent,
}

impl LayoutComponent {
    pub fn new() -> Self {
        Self {
            column_select: ColumnSelectComponent::new(),
            field_select: FieldSelectComponent::new(),
            preview_table: PreviewTableComponent::new(),
            help: HelpComponent::new(),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, state: &AppState) {
        let area = frame.size();
        frame.render_widget(Block::default().style(Style::default().bg(DARK_BG)), area);

        let preview_height = (state.visible_preview_rows() as u16 + 4).min(area.height / 2);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),              // Step header
                Constraint::Min(10),                // Step content
                Constraint::Length(preview_height), // Preview table
                Constraint::Length(1),              // Footer
            ])
            .split(area);

        self.render_header(frame, chunks[0], state);

        match state.step {
            WizardStep::EmailColumn => self.column_select.render(frame, chunks[1], state),
            WizardStep::Fields => self.field_select.render(frame, chunks[1], state),
        }

        self.preview_table.render(frame, chunks[2], state);
        self.render_footer(frame, chunks[3], state);

        if state.help_visible {
            self.help.render(frame, area);
        }

        self.render_notifications(frame, area, state);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let step = state.step;
        let title = Line::from(vec![
            Span::styled(
                format!("Step {}/{} ", step.number(), WizardStep::total()),
                Style::default().fg(CORNFLOWER_BLUE),
            ),
            Span::styled(
                step.title(),
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  — {}", step.description()),
                Style::default().fg(MUTED_GRAY),
            ),
        ]);

        let header = Paragraph::new(title).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(CORNFLOWER_BLUE))
                .style(Style::default().bg(PANEL_BG)),
        );
        frame.render_widget(header, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let hint = match state.step {
            WizardStep::EmailColumn => {
                "↑/↓ move  Space select  Enter continue  e expand  y copy  ? help  q quit"
            }
            WizardStep::Fields => {
                if state.can_start_enrichment() {
                    "Tab panel  Enter toggle/submit  s start enrichment  Esc back  ? help"
                } else {
                    "Tab panel  Enter toggle/submit  Esc back  ? help  (select a field to start)"
                }
            }
        };
        let footer = Paragraph::new(Span::styled(hint, Style::default().fg(MUTED_GRAY)))
            .style(Style::default().bg(DARK_BG));
        frame.render_widget(footer, area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let notifications = state.get_current_notifications();
        if notifications.is_empty() {
            return;
        }

        // Toasts stack in the top-right corner
        let notification_width = 50;
        let notification_area = Rect {
            x: area.width.saturating_sub(notification_width + 2),
            y: 1,
            width: notification_width,
            height: area.height.saturating_sub(2),
        };

        for (i, notification) in notifications.iter().enumerate() {
            let y_offset = i as u16 * 3;
            if y_offset + 3 > notification_area.height {
                break;
            }
            let toast_area = Rect {
                x: notification_area.x,
                y: notification_area.y + y_offset,
                width: notification_area.width,
                height: 3,
            };

            let (icon, color) = match notification.notification_type {
                NotificationType::Success => ("✓ ", SELECTION_GREEN),
                NotificationType::Error => ("✗ ", super::ERROR_RED),
                NotificationType::Warning => ("⚠ ", WARNING_ORANGE),
                NotificationType::Info => ("ℹ ", CORNFLOWER_BLUE),
            };

            let line = Line::from(vec![
                Span::styled(icon, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::styled(notification.message.as_str(), Style::default().fg(color)),
            ]);

            let toast = Paragraph::new(line)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(color))
                        .style(Style::default().bg(PANEL_BG)),
                )
                .wrap(Wrap { trim: true });

            frame.render_widget(toast, toast_area);
        }
    }
}

impl Default for LayoutComponent {
    fn default() -> Self {
        Self::new()
    }
}
