// ABOUTME: Step 2 screen: preset catalog, manual field entry, prompt-based
// generation, and suggestion cards

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph, Wrap},
};

use super::{
    CORNFLOWER_BLUE, GOLD, MUTED_GRAY, PANEL_BG, SELECTION_GREEN, SOFT_WHITE, SUBDUED_BORDER,
};
use crate::app::state::{AppState, FieldsFocus, ManualInput, TextInput};
use crate::models::{MAX_FIELDS, PRESET_FIELDS};

pub struct FieldSelectComponent;

impl FieldSelectComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        self.render_presets(frame, columns[0], state);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(8), // Manual form
                Constraint::Length(3), // Prompt input
                Constraint::Min(4),    // Suggestion cards
            ])
            .split(columns[1]);

        self.render_manual_form(frame, right[0], state);
        self.render_prompt(frame, right[1], state);
        self.render_suggestions(frame, right[2], state);
    }

    fn panel_border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(GOLD)
        } else {
            Style::default().fg(SUBDUED_BORDER)
        }
    }

    fn render_presets(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let focused = state.fields_focus == FieldsFocus::Presets;

        let items: Vec<ListItem> = PRESET_FIELDS
            .iter()
            .enumerate()
            .map(|(i, preset)| {
                let selected = state.fields.contains(preset.name);
                let under_cursor = focused && i == state.preset_cursor;

                let mut spans = vec![
                    Span::styled(
                        if selected { "[x] " } else { "[ ] " },
                        Style::default().fg(if selected { SELECTION_GREEN } else { MUTED_GRAY }),
                    ),
                    Span::styled(preset.display_name, Style::default().fg(SOFT_WHITE)),
                    Span::styled(
                        format!("  ({})", preset.field_type.label()),
                        Style::default().fg(MUTED_GRAY),
                    ),
                ];
                if under_cursor {
                    spans[1].style = Style::default().fg(GOLD).add_modifier(Modifier::BOLD);
                }

                let mut item = ListItem::new(Line::from(spans));
                if under_cursor {
                    item = item.style(Style::default().bg(SUBDUED_BORDER));
                }
                item
            })
            .collect();

        let title = format!(" Presets — {}/{} fields ", state.fields.len(), MAX_FIELDS);
        let list = List::new(items).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(self.panel_border(focused))
                .style(Style::default().bg(PANEL_BG)),
        );
        frame.render_widget(list, area);
    }

    fn render_manual_form(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let focused = state.fields_focus == FieldsFocus::ManualForm;
        let form = &state.manual_form;

        let block = Block::default()
            .title(" Custom Field ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.panel_border(focused))
            .style(Style::default().bg(PANEL_BG));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        self.render_form_input(
            frame,
            rows[0],
            "Name        ",
            &form.display_name,
            focused && form.focused == ManualInput::Name,
        );
        self.render_form_input(
            frame,
            rows[1],
            "Description ",
            &form.description,
            focused && form.focused == ManualInput::Description,
        );

        let type_focused = focused && form.focused == ManualInput::Type;
        let type_line = Line::from(vec![
            Span::styled("Type        ", Style::default().fg(MUTED_GRAY)),
            Span::styled(
                format!("< {} >", form.field_type.label()),
                if type_focused {
                    Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(SOFT_WHITE)
                },
            ),
        ]);
        frame.render_widget(Paragraph::new(type_line), rows[2]);

        let hint = Paragraph::new(Span::styled(
            "Enter adds the field",
            Style::default().fg(MUTED_GRAY),
        ));
        frame.render_widget(hint, rows[3]);
    }

    fn render_form_input(
        &self,
        frame: &mut Frame,
        area: Rect,
        label: &str,
        input: &TextInput,
        focused: bool,
    ) {
        let cursor_marker = if focused { "▏" } else { "" };
        let line = Line::from(vec![
            Span::styled(label.to_string(), Style::default().fg(MUTED_GRAY)),
            Span::styled(
                input.value.clone(),
                if focused {
                    Style::default().fg(SOFT_WHITE)
                } else {
                    Style::default().fg(MUTED_GRAY)
                },
            ),
            Span::styled(cursor_marker, Style::default().fg(GOLD)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_prompt(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let focused = state.fields_focus == FieldsFocus::Prompt;

        let title = if state.suggestion_in_flight {
            " Generate Fields — waiting for suggestions… "
        } else {
            " Generate Fields — describe what you need, Enter sends "
        };

        let content = if state.suggestion_in_flight {
            // Control is disabled for the duration of the request
            Line::from(Span::styled(
                state.prompt.value.clone(),
                Style::default().fg(MUTED_GRAY),
            ))
        } else {
            Line::from(vec![
                Span::styled(state.prompt.value.clone(), Style::default().fg(SOFT_WHITE)),
                Span::styled(if focused { "▏" } else { "" }, Style::default().fg(GOLD)),
            ])
        };

        let prompt = Paragraph::new(content).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(self.panel_border(focused))
                .style(Style::default().bg(PANEL_BG)),
        );
        frame.render_widget(prompt, area);
    }

    fn render_suggestions(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let focused = state.fields_focus == FieldsFocus::Suggestions;

        let block = Block::default()
            .title(format!(" Suggested Fields ({}) ", state.suggestions.len()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.panel_border(focused))
            .style(Style::default().bg(PANEL_BG));

        if state.suggestions.is_empty() {
            let empty = Paragraph::new(Span::styled(
                "No pending suggestions. Use the prompt above to generate some.",
                Style::default().fg(MUTED_GRAY),
            ))
            .block(block)
            .wrap(Wrap { trim: true });
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = state
            .suggestions
            .iter()
            .enumerate()
            .map(|(i, suggestion)| {
                let under_cursor = focused && i == state.suggestion_cursor;
                let name_style = if under_cursor {
                    Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(SOFT_WHITE)
                };

                let lines = vec![
                    Line::from(vec![
                        Span::styled(suggestion.display_name.clone(), name_style),
                        Span::styled(
                            format!("  ({})", suggestion.field_type.label()),
                            Style::default().fg(CORNFLOWER_BLUE),
                        ),
                        Span::styled("   [a]ccept  [r]eject", Style::default().fg(MUTED_GRAY)),
                    ]),
                    Line::from(Span::styled(
                        format!("  {}", suggestion.description),
                        Style::default().fg(MUTED_GRAY),
                    )),
                ];

                let mut item = ListItem::new(lines);
                if under_cursor {
                    item = item.style(Style::default().bg(SUBDUED_BORDER));
                }
                item
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }
}

impl Default for FieldSelectComponent {
    fn default() -> Self {
        Self::new()
    }
}
