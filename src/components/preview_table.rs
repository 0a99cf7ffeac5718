// ABOUTME: Live preview table: original columns with email validation styling
// plus placeholder columns for pending enrichment fields

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Cell, Row as TableRow, Table},
};

use super::{
    CORNFLOWER_BLUE, ERROR_RED, GOLD, MUTED_GRAY, PANEL_BG, SELECTION_GREEN, SOFT_WHITE,
    SUBDUED_BORDER,
};
use crate::app::state::{AppState, PREVIEW_FIELD_LIMIT};
use crate::detect::{email_status, EmailStatus};

pub struct PreviewTableComponent;

impl PreviewTableComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        // Pending field columns appear once the user reaches step 2:
        // the most recent up to the limit, then a "+N more" marker.
        let pending = if state.step.number() >= 2 {
            let fields = state.fields.fields();
            let shown = fields.iter().rev().take(PREVIEW_FIELD_LIMIT);
            let overflow = fields.len().saturating_sub(PREVIEW_FIELD_LIMIT);
            (shown.collect::<Vec<_>>(), overflow)
        } else {
            (Vec::new(), 0)
        };
        let (pending_fields, overflow) = pending;

        let mut header_cells: Vec<Cell> = state
            .columns
            .iter()
            .map(|column| {
                let is_email = state.selected_column.as_deref() == Some(column.as_str());
                let style = if is_email {
                    Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(SOFT_WHITE)
                };
                Cell::from(column.clone()).style(style)
            })
            .collect();
        for field in &pending_fields {
            header_cells.push(
                Cell::from(field.display_name.clone())
                    .style(Style::default().fg(CORNFLOWER_BLUE)),
            );
        }
        if overflow > 0 {
            header_cells
                .push(Cell::from(format!("+{} more", overflow)).style(Style::default().fg(MUTED_GRAY)));
        }

        let visible = state.visible_preview_rows();
        let rows: Vec<TableRow> = state
            .rows
            .iter()
            .take(visible)
            .enumerate()
            .map(|(i, row)| {
                let mut cells: Vec<Cell> = state
                    .columns
                    .iter()
                    .map(|column| {
                        let value = row.get(column);
                        let is_email = state.selected_column.as_deref() == Some(column.as_str());
                        let style = if is_email {
                            match email_status(value) {
                                EmailStatus::Valid => Style::default().fg(SELECTION_GREEN),
                                EmailStatus::Invalid => Style::default().fg(ERROR_RED),
                                EmailStatus::Empty => Style::default().fg(MUTED_GRAY),
                            }
                        } else {
                            Style::default().fg(SOFT_WHITE)
                        };
                        Cell::from(value.to_string()).style(style)
                    })
                    .collect();

                // Placeholder cells only; no enrichment happens here
                for _ in &pending_fields {
                    cells.push(
                        Cell::from("loading…").style(
                            Style::default().fg(MUTED_GRAY).add_modifier(Modifier::ITALIC),
                        ),
                    );
                }
                if overflow > 0 {
                    cells.push(Cell::from(""));
                }

                let mut table_row = TableRow::new(cells);
                if i == state.preview_row_cursor {
                    table_row = table_row.style(Style::default().bg(SUBDUED_BORDER));
                }
                table_row
            })
            .collect();

        let total_columns = state.columns.len() + pending_fields.len() + usize::from(overflow > 0);
        let widths = vec![Constraint::Min(12); total_columns.max(1)];

        let hidden = state.rows.len().saturating_sub(visible);
        let title = if hidden > 0 {
            format!(" Preview — {} of {} rows, [e] shows all ", visible, state.rows.len())
        } else if state.preview_expanded {
            format!(" Preview — all {} rows, [e] collapses ", state.rows.len())
        } else {
            format!(" Preview — {} rows ", state.rows.len())
        };

        let table = Table::new(rows, widths)
            .header(TableRow::new(header_cells).style(Style::default().bg(SUBDUED_BORDER)))
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(SUBDUED_BORDER))
                    .style(Style::default().bg(PANEL_BG)),
            )
            .column_spacing(1);

        frame.render_widget(table, area);
    }
}

impl Default for PreviewTableComponent {
    fn default() -> Self {
        Self::new()
    }
}
