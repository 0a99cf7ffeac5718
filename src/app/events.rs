// ABOUTME: Event handling system for keyboard input and wizard actions

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::app::state::{AppState, FieldsFocus, ManualInput, WizardStep};

#[derive(Debug, Clone)]
pub enum AppEvent {
    Quit,
    ToggleHelp,
    // Step navigation
    AdvanceStep,
    GoBack,
    // Step 1: column selection
    NextColumn,
    PreviousColumn,
    SelectColumn,
    // Step 2: panel focus
    FocusNextPanel,
    // Step 2: preset catalog
    NextPreset,
    PreviousPreset,
    TogglePreset,
    // Step 2: manual entry form
    ManualNextInput,
    ManualInputChar(char),
    ManualBackspace,
    ManualCursorLeft,
    ManualCursorRight,
    ManualCursorHome,
    ManualCursorEnd,
    ManualCycleType,
    ManualSubmit,
    // Step 2: prompt / generation
    PromptInputChar(char),
    PromptBackspace,
    PromptCursorLeft,
    PromptCursorRight,
    PromptCursorHome,
    PromptCursorEnd,
    PromptSubmit,
    // Step 2: suggestion cards
    NextSuggestion,
    PreviousSuggestion,
    AcceptSuggestion,
    RejectSuggestion,
    // Finalization
    StartEnrichment,
    // Preview table
    TogglePreviewRows,
    NextPreviewRow,
    PreviousPreviewRow,
    CopyEmail,
}

pub struct EventHandler;

impl EventHandler {
    /// Map a key press to an app event, given the current wizard state.
    pub fn handle_key_event(key_event: KeyEvent, state: &AppState) -> Option<AppEvent> {
        // Ctrl+C always quits
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            return Some(AppEvent::Quit);
        }

        if state.help_visible {
            return match key_event.code {
                KeyCode::Char('?') | KeyCode::Esc => Some(AppEvent::ToggleHelp),
                _ => None,
            };
        }

        match state.step {
            WizardStep::EmailColumn => Self::handle_column_step_keys(key_event),
            WizardStep::Fields => Self::handle_fields_step_keys(key_event, state),
        }
    }

    fn handle_column_step_keys(key_event: KeyEvent) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(AppEvent::Quit),
            KeyCode::Char('?') => Some(AppEvent::ToggleHelp),
            KeyCode::Up | KeyCode::Char('k') => Some(AppEvent::PreviousColumn),
            KeyCode::Down | KeyCode::Char('j') => Some(AppEvent::NextColumn),
            // Space selects without advancing; Enter confirms and advances
            KeyCode::Char(' ') => Some(AppEvent::SelectColumn),
            KeyCode::Enter => Some(AppEvent::AdvanceStep),
            KeyCode::Char('e') => Some(AppEvent::TogglePreviewRows),
            KeyCode::Char('y') => Some(AppEvent::CopyEmail),
            KeyCode::PageUp => Some(AppEvent::PreviousPreviewRow),
            KeyCode::PageDown => Some(AppEvent::NextPreviewRow),
            _ => None,
        }
    }

    fn handle_fields_step_keys(key_event: KeyEvent, state: &AppState) -> Option<AppEvent> {
        // Keys that apply regardless of panel focus
        match key_event.code {
            KeyCode::Esc => return Some(AppEvent::GoBack),
            KeyCode::Tab => return Some(AppEvent::FocusNextPanel),
            KeyCode::Char('s') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some(AppEvent::StartEnrichment);
            }
            KeyCode::PageUp => return Some(AppEvent::PreviousPreviewRow),
            KeyCode::PageDown => return Some(AppEvent::NextPreviewRow),
            _ => {}
        }

        match state.fields_focus {
            FieldsFocus::Presets => match key_event.code {
                KeyCode::Char('q') => Some(AppEvent::Quit),
                KeyCode::Char('?') => Some(AppEvent::ToggleHelp),
                KeyCode::Up | KeyCode::Char('k') => Some(AppEvent::PreviousPreset),
                KeyCode::Down | KeyCode::Char('j') => Some(AppEvent::NextPreset),
                KeyCode::Enter | KeyCode::Char(' ') => Some(AppEvent::TogglePreset),
                KeyCode::Char('s') => Some(AppEvent::StartEnrichment),
                KeyCode::Char('e') => Some(AppEvent::TogglePreviewRows),
                KeyCode::Char('y') => Some(AppEvent::CopyEmail),
                KeyCode::Left | KeyCode::Backspace => Some(AppEvent::GoBack),
                _ => None,
            },
            FieldsFocus::ManualForm => Self::handle_manual_form_keys(key_event, state),
            FieldsFocus::Prompt => match key_event.code {
                KeyCode::Enter => Some(AppEvent::PromptSubmit),
                KeyCode::Char(c) => Some(AppEvent::PromptInputChar(c)),
                KeyCode::Backspace => Some(AppEvent::PromptBackspace),
                KeyCode::Left => Some(AppEvent::PromptCursorLeft),
                KeyCode::Right => Some(AppEvent::PromptCursorRight),
                KeyCode::Home => Some(AppEvent::PromptCursorHome),
                KeyCode::End => Some(AppEvent::PromptCursorEnd),
                _ => None,
            },
            FieldsFocus::Suggestions => match key_event.code {
                KeyCode::Char('q') => Some(AppEvent::Quit),
                KeyCode::Char('?') => Some(AppEvent::ToggleHelp),
                KeyCode::Up | KeyCode::Char('k') => Some(AppEvent::PreviousSuggestion),
                KeyCode::Down | KeyCode::Char('j') => Some(AppEvent::NextSuggestion),
                KeyCode::Enter | KeyCode::Char('a') => Some(AppEvent::AcceptSuggestion),
                KeyCode::Delete | KeyCode::Char('r') => Some(AppEvent::RejectSuggestion),
                KeyCode::Char('s') => Some(AppEvent::StartEnrichment),
                KeyCode::Char('e') => Some(AppEvent::TogglePreviewRows),
                KeyCode::Char('y') => Some(AppEvent::CopyEmail),
                _ => None,
            },
        }
    }

    fn handle_manual_form_keys(key_event: KeyEvent, state: &AppState) -> Option<AppEvent> {
        let on_type_selector = state.manual_form.focused == ManualInput::Type;
        match key_event.code {
            KeyCode::Enter => Some(AppEvent::ManualSubmit),
            KeyCode::Up | KeyCode::Down => Some(AppEvent::ManualNextInput),
            KeyCode::Char(' ') if on_type_selector => Some(AppEvent::ManualCycleType),
            KeyCode::Left if on_type_selector => Some(AppEvent::ManualCycleType),
            KeyCode::Right if on_type_selector => Some(AppEvent::ManualCycleType),
            KeyCode::Char(c) if !on_type_selector => Some(AppEvent::ManualInputChar(c)),
            KeyCode::Backspace if !on_type_selector => Some(AppEvent::ManualBackspace),
            KeyCode::Left => Some(AppEvent::ManualCursorLeft),
            KeyCode::Right => Some(AppEvent::ManualCursorRight),
            KeyCode::Home => Some(AppEvent::ManualCursorHome),
            KeyCode::End => Some(AppEvent::ManualCursorEnd),
            _ => None,
        }
    }

    /// Apply an app event to the wizard state.
    pub fn process_event(event: AppEvent, state: &mut AppState) {
        debug!("Processing event: {:?}", event);
        match event {
            AppEvent::Quit => {
                state.abort_pending_suggestion();
                state.should_quit = true;
            }
            AppEvent::ToggleHelp => state.help_visible = !state.help_visible,
            AppEvent::AdvanceStep => {
                // Enter on step 1 confirms the hovered column, then advances
                state.select_column_under_cursor();
                state.advance_step();
            }
            AppEvent::GoBack => {
                state.go_back();
            }
            AppEvent::NextColumn => state.next_column(),
            AppEvent::PreviousColumn => state.previous_column(),
            AppEvent::SelectColumn => state.select_column_under_cursor(),
            AppEvent::FocusNextPanel => {
                state.fields_focus = state.fields_focus.next();
            }
            AppEvent::NextPreset => state.next_preset(),
            AppEvent::PreviousPreset => state.previous_preset(),
            AppEvent::TogglePreset => state.toggle_preset_under_cursor(),
            AppEvent::ManualNextInput => {
                state.manual_form.focused = state.manual_form.focused.next();
            }
            AppEvent::ManualInputChar(c) => {
                if let Some(input) = state.manual_form.focused_input_mut() {
                    input.input_char(c);
                }
            }
            AppEvent::ManualBackspace => {
                if let Some(input) = state.manual_form.focused_input_mut() {
                    input.backspace();
                }
            }
            AppEvent::ManualCursorLeft => {
                if let Some(input) = state.manual_form.focused_input_mut() {
                    input.cursor_left();
                }
            }
            AppEvent::ManualCursorRight => {
                if let Some(input) = state.manual_form.focused_input_mut() {
                    input.cursor_right();
                }
            }
            AppEvent::ManualCursorHome => {
                if let Some(input) = state.manual_form.focused_input_mut() {
                    input.cursor_home();
                }
            }
            AppEvent::ManualCursorEnd => {
                if let Some(input) = state.manual_form.focused_input_mut() {
                    input.cursor_end();
                }
            }
            AppEvent::ManualCycleType => {
                state.manual_form.field_type = state.manual_form.field_type.cycle();
            }
            AppEvent::ManualSubmit => state.submit_manual_field(),
            AppEvent::PromptInputChar(c) => state.prompt.input_char(c),
            AppEvent::PromptBackspace => state.prompt.backspace(),
            AppEvent::PromptCursorLeft => state.prompt.cursor_left(),
            AppEvent::PromptCursorRight => state.prompt.cursor_right(),
            AppEvent::PromptCursorHome => state.prompt.cursor_home(),
            AppEvent::PromptCursorEnd => state.prompt.cursor_end(),
            AppEvent::PromptSubmit => state.submit_prompt(),
            AppEvent::NextSuggestion => state.next_suggestion(),
            AppEvent::PreviousSuggestion => state.previous_suggestion(),
            AppEvent::AcceptSuggestion => state.accept_suggestion_under_cursor(),
            AppEvent::RejectSuggestion => state.reject_suggestion_under_cursor(),
            AppEvent::StartEnrichment => state.start_enrichment(),
            AppEvent::TogglePreviewRows => state.toggle_preview_expanded(),
            AppEvent::NextPreviewRow => state.next_preview_row(),
            AppEvent::PreviousPreviewRow => state.previous_preview_row(),
            AppEvent::CopyEmail => Self::copy_email_to_clipboard(state),
        }
    }

    /// Copy the selected row's email cell to the system clipboard.
    fn copy_email_to_clipboard(state: &mut AppState) {
        let Some(email) = state.email_under_preview_cursor() else {
            state.add_warning_notification("Select an email column first".to_string());
            return;
        };
        if email.trim().is_empty() {
            state.add_warning_notification("That row has no email value".to_string());
            return;
        }
        match Self::set_clipboard_text(&email) {
            Ok(()) => state.add_success_notification(format!("Copied {}", email)),
            Err(e) => state.add_error_notification(format!("Clipboard copy failed: {}", e)),
        }
    }

    fn set_clipboard_text(text: &str) -> Result<(), Box<dyn std::error::Error>> {
        use arboard::Clipboard;
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text.to_string())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Dataset;
    use crate::models::Row;

    fn state() -> AppState {
        AppState::new(Dataset {
            columns: vec!["email".to_string()],
            rows: vec![Row::from_pairs([("email", "a@acme.com")])],
        })
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_enter_on_step_one_confirms_and_advances() {
        let mut s = state();
        s.selected_column = None;
        let event = EventHandler::handle_key_event(key(KeyCode::Enter), &s).unwrap();
        EventHandler::process_event(event, &mut s);
        assert_eq!(s.step, WizardStep::Fields);
        assert_eq!(s.selected_column.as_deref(), Some("email"));
    }

    #[test]
    fn test_escape_on_step_two_goes_back() {
        let mut s = state();
        s.advance_step();
        let event = EventHandler::handle_key_event(key(KeyCode::Esc), &s).unwrap();
        EventHandler::process_event(event, &mut s);
        assert_eq!(s.step, WizardStep::EmailColumn);
        assert!(!s.should_quit);
    }

    #[test]
    fn test_tab_cycles_panel_focus() {
        let mut s = state();
        s.advance_step();
        assert_eq!(s.fields_focus, FieldsFocus::Presets);
        for expected in [
            FieldsFocus::ManualForm,
            FieldsFocus::Prompt,
            FieldsFocus::Suggestions,
            FieldsFocus::Presets,
        ] {
            let event = EventHandler::handle_key_event(key(KeyCode::Tab), &s).unwrap();
            EventHandler::process_event(event, &mut s);
            assert_eq!(s.fields_focus, expected);
        }
    }

    #[test]
    fn test_typing_in_prompt_is_not_a_global_shortcut() {
        let mut s = state();
        s.advance_step();
        s.fields_focus = FieldsFocus::Prompt;
        // 'q' while typing goes into the prompt instead of quitting
        let event = EventHandler::handle_key_event(key(KeyCode::Char('q')), &s).unwrap();
        EventHandler::process_event(event, &mut s);
        assert!(!s.should_quit);
        assert_eq!(s.prompt.value, "q");
    }

    #[test]
    fn test_ctrl_c_quits_from_anywhere() {
        let mut s = state();
        s.advance_step();
        s.fields_focus = FieldsFocus::Prompt;
        let event = EventHandler::handle_key_event(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &s,
        )
        .unwrap();
        EventHandler::process_event(event, &mut s);
        assert!(s.should_quit);
    }

    #[test]
    fn test_preset_toggle_via_keys() {
        let mut s = state();
        s.advance_step();
        let event = EventHandler::handle_key_event(key(KeyCode::Enter), &s).unwrap();
        EventHandler::process_event(event, &mut s);
        assert_eq!(s.fields.len(), 1);
    }

    #[test]
    fn test_help_swallows_other_keys() {
        let mut s = state();
        s.help_visible = true;
        assert!(EventHandler::handle_key_event(key(KeyCode::Char('j')), &s).is_none());
        let event = EventHandler::handle_key_event(key(KeyCode::Esc), &s).unwrap();
        EventHandler::process_event(event, &mut s);
        assert!(!s.help_visible);
    }
}
