// ABOUTME: Wizard state machine for the enrichment job configurator
// Tracks current step, column selection, selected fields, and transient UI state

use std::time::{Duration, Instant};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::AbortHandle;
use tracing::info;

use crate::detect::{self, Detection};
use crate::input::Dataset;
use crate::models::{
    unique_field_name, EnrichmentField, EnrichmentJob, FieldSet, FieldType, Row, PRESET_FIELDS,
};
use crate::suggest::{spawn_generate, SuggestOutcome, SuggestedField, SuggestionClient};

/// Handoff invoked exactly once when the user confirms the configuration.
pub type OnStart = Box<dyn FnOnce(&str, &[EnrichmentField]) + Send>;

/// Detector confidence above which the email column is pre-filled.
const PREFILL_CONFIDENCE: u8 = 50;

/// Preview shows at most this many pending field columns.
pub const PREVIEW_FIELD_LIMIT: usize = 5;

/// Preview shows at most this many rows unless expanded.
pub const PREVIEW_ROW_LIMIT: usize = 3;

/// Notification system for transient TUI messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationType {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub notification_type: NotificationType,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Notification {
    pub fn success(message: String) -> Self {
        Self {
            message,
            notification_type: NotificationType::Success,
            created_at: Instant::now(),
            duration: Duration::from_secs(3),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            message,
            notification_type: NotificationType::Error,
            created_at: Instant::now(),
            duration: Duration::from_secs(5),
        }
    }

    pub fn info(message: String) -> Self {
        Self {
            message,
            notification_type: NotificationType::Info,
            created_at: Instant::now(),
            duration: Duration::from_secs(3),
        }
    }

    pub fn warning(message: String) -> Self {
        Self {
            message,
            notification_type: NotificationType::Warning,
            created_at: Instant::now(),
            duration: Duration::from_secs(4),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.duration
    }
}

/// Steps in the configuration wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    EmailColumn,
    Fields,
}

impl WizardStep {
    /// Step number (1-indexed for display)
    pub fn number(&self) -> usize {
        match self {
            Self::EmailColumn => 1,
            Self::Fields => 2,
        }
    }

    pub fn total() -> usize {
        2
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::EmailColumn => "Email Column",
            Self::Fields => "Fields",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::EmailColumn => "Which column holds the lookup email address?",
            Self::Fields => "Which fields should the enrichment derive?",
        }
    }

    /// Can we go to the next step? Step 1 requires a selected column.
    pub fn can_advance(&self, state: &AppState) -> bool {
        match self {
            Self::EmailColumn => state.selected_column.is_some(),
            Self::Fields => false,
        }
    }

    pub fn next(&self) -> Option<Self> {
        match self {
            Self::EmailColumn => Some(Self::Fields),
            Self::Fields => None,
        }
    }

    pub fn previous(&self) -> Option<Self> {
        match self {
            Self::EmailColumn => None,
            Self::Fields => Some(Self::EmailColumn),
        }
    }
}

/// Focus areas within the field-selection step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldsFocus {
    Presets,
    ManualForm,
    Prompt,
    Suggestions,
}

impl FieldsFocus {
    /// Tab order through the step's panels.
    pub fn next(&self) -> Self {
        match self {
            Self::Presets => Self::ManualForm,
            Self::ManualForm => Self::Prompt,
            Self::Prompt => Self::Suggestions,
            Self::Suggestions => Self::Presets,
        }
    }
}

/// Which input of the manual-entry form is focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualInput {
    Name,
    Description,
    Type,
}

impl ManualInput {
    pub fn next(&self) -> Self {
        match self {
            Self::Name => Self::Description,
            Self::Description => Self::Type,
            Self::Type => Self::Name,
        }
    }
}

/// Single-line text input with cursor
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn input_char(&mut self, c: char) {
        let byte_pos = self.byte_pos();
        self.value.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = self.byte_pos();
            self.value.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let byte_pos = self.byte_pos();
            self.value.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    fn byte_pos(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map_or(self.value.len(), |(i, _)| i)
    }
}

/// Manual field entry form state
#[derive(Debug, Clone)]
pub struct ManualForm {
    pub display_name: TextInput,
    pub description: TextInput,
    pub field_type: FieldType,
    pub focused: ManualInput,
}

impl Default for ManualForm {
    fn default() -> Self {
        Self {
            display_name: TextInput::default(),
            description: TextInput::default(),
            field_type: FieldType::String,
            focused: ManualInput::Name,
        }
    }
}

impl ManualForm {
    pub fn focused_input_mut(&mut self) -> Option<&mut TextInput> {
        match self.focused {
            ManualInput::Name => Some(&mut self.display_name),
            ManualInput::Description => Some(&mut self.description),
            ManualInput::Type => None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Full wizard state
pub struct AppState {
    // Dataset (immutable once loaded)
    pub columns: Vec<String>,
    pub rows: Vec<Row>,

    // Wizard position
    pub step: WizardStep,

    // Step 1: email column selection
    pub column_cursor: usize,
    pub selected_column: Option<String>,
    pub detection: Option<Detection>,

    // Step 2: field selection
    pub fields: FieldSet,
    pub fields_focus: FieldsFocus,
    pub preset_cursor: usize,
    pub manual_form: ManualForm,
    pub prompt: TextInput,
    pub suggestions: Vec<SuggestedField>,
    pub suggestion_cursor: usize,
    pub suggestion_in_flight: bool,

    // Preview table
    pub preview_expanded: bool,
    pub preview_row_cursor: usize,

    // Transient UI
    pub notifications: Vec<Notification>,
    pub help_visible: bool,
    pub should_quit: bool,

    // Suggestion plumbing
    suggestion_client: Option<SuggestionClient>,
    suggest_tx: UnboundedSender<SuggestOutcome>,
    suggest_rx: UnboundedReceiver<SuggestOutcome>,
    suggest_abort: Option<AbortHandle>,
    submitted_prompt: Option<String>,

    // Handoff to the external owner, taken on finalization
    on_start: Option<OnStart>,
    pub completed: Option<EnrichmentJob>,
}

impl AppState {
    pub fn new(dataset: Dataset) -> Self {
        let detection = detect::detect_email_column(&dataset.columns, &dataset.rows);

        // Confidence above the threshold pre-fills the selection but never
        // advances the wizard; the user still confirms explicitly.
        let selected_column = detection
            .as_ref()
            .filter(|d| d.confidence > PREFILL_CONFIDENCE)
            .map(|d| d.column.clone());
        let column_cursor = selected_column
            .as_ref()
            .and_then(|c| dataset.columns.iter().position(|col| col == c))
            .unwrap_or(0);

        if let Some(ref d) = detection {
            info!(
                "Detected email column '{}' with confidence {}",
                d.column, d.confidence
            );
        }

        let (suggest_tx, suggest_rx) = mpsc::unbounded_channel();

        Self {
            columns: dataset.columns,
            rows: dataset.rows,
            step: WizardStep::EmailColumn,
            column_cursor,
            selected_column,
            detection,
            fields: FieldSet::new(),
            fields_focus: FieldsFocus::Presets,
            preset_cursor: 0,
            manual_form: ManualForm::default(),
            prompt: TextInput::default(),
            suggestions: Vec::new(),
            suggestion_cursor: 0,
            suggestion_in_flight: false,
            preview_expanded: false,
            preview_row_cursor: 0,
            notifications: Vec::new(),
            help_visible: false,
            should_quit: false,
            suggestion_client: None,
            suggest_tx,
            suggest_rx,
            suggest_abort: None,
            submitted_prompt: None,
            on_start: None,
            completed: None,
        }
    }

    /// Attach the suggestion service client.
    pub fn with_suggestion_client(mut self, client: SuggestionClient) -> Self {
        self.suggestion_client = Some(client);
        self
    }

    /// Attach the finalization handoff.
    pub fn with_on_start(mut self, on_start: OnStart) -> Self {
        self.on_start = Some(on_start);
        self
    }

    // --- Step navigation -------------------------------------------------

    /// Advance to the next step if the current step's guard allows it.
    pub fn advance_step(&mut self) -> bool {
        if self.step.can_advance(self) {
            if let Some(next) = self.step.next() {
                self.step = next;
                return true;
            }
        }
        false
    }

    /// Return to the previous step. Always allowed; selections are kept.
    pub fn go_back(&mut self) -> bool {
        if let Some(prev) = self.step.previous() {
            self.step = prev;
            return true;
        }
        false
    }

    // --- Step 1: column selection ----------------------------------------

    pub fn next_column(&mut self) {
        if !self.columns.is_empty() {
            self.column_cursor = (self.column_cursor + 1) % self.columns.len();
        }
    }

    pub fn previous_column(&mut self) {
        if !self.columns.is_empty() {
            self.column_cursor =
                (self.column_cursor + self.columns.len() - 1) % self.columns.len();
        }
    }

    /// Select the column under the cursor.
    pub fn select_column_under_cursor(&mut self) {
        if let Some(column) = self.columns.get(self.column_cursor) {
            self.selected_column = Some(column.clone());
        }
    }

    /// Warning count of rows with consumer-provider addresses, for the
    /// currently selected column.
    pub fn free_mail_warning(&self) -> Option<usize> {
        let column = self.selected_column.as_deref()?;
        Some(detect::free_mail_count(&self.rows, column))
    }

    // --- Step 2: preset catalog -------------------------------------------

    pub fn next_preset(&mut self) {
        if self.preset_cursor + 1 < PRESET_FIELDS.len() {
            self.preset_cursor += 1;
        }
    }

    pub fn previous_preset(&mut self) {
        self.preset_cursor = self.preset_cursor.saturating_sub(1);
    }

    /// Toggle the preset under the cursor: add when absent, remove when
    /// already selected.
    pub fn toggle_preset_under_cursor(&mut self) {
        let Some(preset) = PRESET_FIELDS.get(self.preset_cursor) else {
            return;
        };
        if self.fields.contains(preset.name) {
            self.fields.remove(preset.name);
            return;
        }
        match self.fields.add(preset.to_field()) {
            Ok(()) => {}
            Err(e) => self.add_warning_notification(e.to_string()),
        }
    }

    // --- Step 2: manual entry ---------------------------------------------

    /// Validate and submit the manual-entry form.
    ///
    /// Missing name or description is rejected before any state mutation.
    pub fn submit_manual_field(&mut self) {
        let display_name = self.manual_form.display_name.value.trim().to_string();
        let description = self.manual_form.description.value.trim().to_string();

        if display_name.is_empty() || description.is_empty() {
            self.add_error_notification(
                "Field name and description are both required".to_string(),
            );
            return;
        }

        let name = unique_field_name(&display_name, self.fields.names());
        let field = EnrichmentField {
            name,
            display_name,
            description,
            field_type: self.manual_form.field_type,
            required: false,
        };

        match self.fields.add(field) {
            Ok(()) => self.manual_form.reset(),
            Err(e) => self.add_warning_notification(e.to_string()),
        }
    }

    // --- Step 2: natural-language generation ------------------------------

    /// Submit the free-text prompt to the suggestion service.
    ///
    /// Rejected while a request is already in flight, so the Generate
    /// control cannot double-submit.
    pub fn submit_prompt(&mut self) {
        if self.suggestion_in_flight {
            return;
        }
        let prompt = self.prompt.value.trim().to_string();
        if prompt.is_empty() {
            self.add_error_notification("Describe the fields you want first".to_string());
            return;
        }
        let Some(client) = self.suggestion_client.clone() else {
            self.add_error_notification("No suggestion service configured".to_string());
            return;
        };

        info!("Submitting field-generation prompt");
        self.suggestion_in_flight = true;
        self.submitted_prompt = Some(prompt.clone());
        self.suggest_abort = Some(spawn_generate(client, prompt, self.suggest_tx.clone()));
    }

    /// Drain any completed suggestion request into state. Called from the
    /// app tick so the UI stays responsive while the request runs.
    pub fn poll_suggestions(&mut self) {
        while let Ok(outcome) = self.suggest_rx.try_recv() {
            self.suggestion_in_flight = false;
            self.suggest_abort = None;
            let submitted = self.submitted_prompt.take();
            match outcome {
                SuggestOutcome::Fields(fields) => {
                    if fields.is_empty() {
                        self.add_info_notification(
                            "The service suggested no fields for that prompt".to_string(),
                        );
                    } else {
                        self.add_success_notification(format!(
                            "Suggested {} fields",
                            fields.len()
                        ));
                    }
                    self.suggestions = fields;
                    self.suggestion_cursor = 0;
                    // Only consume the text that produced this outcome; a
                    // prompt retyped while the request ran stays put.
                    if submitted.as_deref() == Some(self.prompt.value.trim()) {
                        self.prompt.clear();
                    }
                }
                SuggestOutcome::Failed(message) => {
                    // Prior state is untouched; the user may retry.
                    self.add_error_notification(message);
                }
            }
        }
    }

    /// Abort any in-flight suggestion request. Tied to the wizard lifetime:
    /// called on quit so no resolution outlives the component.
    pub fn abort_pending_suggestion(&mut self) {
        if let Some(handle) = self.suggest_abort.take() {
            handle.abort();
            self.suggestion_in_flight = false;
            self.submitted_prompt = None;
        }
    }

    pub fn next_suggestion(&mut self) {
        if self.suggestion_cursor + 1 < self.suggestions.len() {
            self.suggestion_cursor += 1;
        }
    }

    pub fn previous_suggestion(&mut self) {
        self.suggestion_cursor = self.suggestion_cursor.saturating_sub(1);
    }

    /// Accept the suggestion under the cursor: assign a fresh unique
    /// identifier, funnel it through the capped add, and drop the card.
    pub fn accept_suggestion_under_cursor(&mut self) {
        if self.suggestion_cursor >= self.suggestions.len() {
            return;
        }
        let suggested = self.suggestions[self.suggestion_cursor].clone();
        let name = unique_field_name(&suggested.display_name, self.fields.names());
        let field = EnrichmentField {
            name,
            display_name: suggested.display_name,
            description: suggested.description,
            field_type: suggested.field_type,
            required: false,
        };
        match self.fields.add(field) {
            Ok(()) => {
                self.suggestions.remove(self.suggestion_cursor);
                self.clamp_suggestion_cursor();
            }
            Err(e) => self.add_warning_notification(e.to_string()),
        }
    }

    /// Discard the suggestion under the cursor.
    pub fn reject_suggestion_under_cursor(&mut self) {
        if self.suggestion_cursor < self.suggestions.len() {
            self.suggestions.remove(self.suggestion_cursor);
            self.clamp_suggestion_cursor();
        }
    }

    fn clamp_suggestion_cursor(&mut self) {
        if self.suggestion_cursor >= self.suggestions.len() {
            self.suggestion_cursor = self.suggestions.len().saturating_sub(1);
        }
    }

    // --- Finalization -----------------------------------------------------

    pub fn can_start_enrichment(&self) -> bool {
        self.step == WizardStep::Fields
            && self.selected_column.is_some()
            && !self.fields.is_empty()
    }

    /// Hand the finalized configuration to the external owner and quit.
    ///
    /// The handoff is `FnOnce` and taken out of state, so it fires exactly
    /// once even if the event arrives twice.
    pub fn start_enrichment(&mut self) {
        if !self.can_start_enrichment() {
            self.add_error_notification("Select at least one field first".to_string());
            return;
        }
        let email_column = match self.selected_column.clone() {
            Some(column) => column,
            None => return,
        };
        let fields = self.fields.fields().to_vec();

        info!(
            "Starting enrichment: column '{}', {} fields",
            email_column,
            fields.len()
        );

        if let Some(on_start) = self.on_start.take() {
            on_start(&email_column, &fields);
        }
        self.completed = Some(EnrichmentJob {
            email_column,
            fields,
        });
        self.abort_pending_suggestion();
        self.should_quit = true;
    }

    // --- Preview ----------------------------------------------------------

    pub fn toggle_preview_expanded(&mut self) {
        self.preview_expanded = !self.preview_expanded;
        let limit = self.visible_preview_rows();
        if self.preview_row_cursor >= limit {
            self.preview_row_cursor = limit.saturating_sub(1);
        }
    }

    pub fn visible_preview_rows(&self) -> usize {
        if self.preview_expanded {
            self.rows.len()
        } else {
            self.rows.len().min(PREVIEW_ROW_LIMIT)
        }
    }

    pub fn next_preview_row(&mut self) {
        let limit = self.visible_preview_rows();
        if self.preview_row_cursor + 1 < limit {
            self.preview_row_cursor += 1;
        }
    }

    pub fn previous_preview_row(&mut self) {
        self.preview_row_cursor = self.preview_row_cursor.saturating_sub(1);
    }

    /// Email value of the preview row under the cursor, for clipboard copy.
    pub fn email_under_preview_cursor(&self) -> Option<String> {
        let column = self.selected_column.as_deref()?;
        self.rows
            .get(self.preview_row_cursor)
            .map(|row| row.get(column).to_string())
    }

    // --- Notifications ----------------------------------------------------

    fn add_notification(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn add_success_notification(&mut self, message: String) {
        self.add_notification(Notification::success(message));
    }

    pub fn add_error_notification(&mut self, message: String) {
        self.add_notification(Notification::error(message));
    }

    pub fn add_info_notification(&mut self, message: String) {
        self.add_notification(Notification::info(message));
    }

    pub fn add_warning_notification(&mut self, message: String) {
        self.add_notification(Notification::warning(message));
    }

    /// Remove expired notifications
    pub fn cleanup_expired_notifications(&mut self) {
        self.notifications.retain(|n| !n.is_expired());
    }

    /// Get current notifications (non-expired)
    pub fn get_current_notifications(&self) -> Vec<&Notification> {
        self.notifications.iter().filter(|n| !n.is_expired()).collect()
    }
}

/// Application wrapper: state plus the periodic tick.
pub struct App {
    pub state: AppState,
}

impl App {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Periodic housekeeping: drain finished suggestion requests and expire
    /// old notifications.
    pub fn tick(&mut self) {
        self.state.poll_suggestions();
        self.state.cleanup_expired_notifications();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MAX_FIELDS;

    fn dataset() -> Dataset {
        Dataset {
            columns: vec!["email".to_string(), "company".to_string()],
            rows: vec![
                Row::from_pairs([("email", "a@gmail.com"), ("company", "A")]),
                Row::from_pairs([("email", "b@acme.com"), ("company", "B")]),
                Row::from_pairs([("email", "c@acme.com"), ("company", "C")]),
                Row::from_pairs([("email", ""), ("company", "D")]),
            ],
        }
    }

    fn state() -> AppState {
        AppState::new(dataset())
    }

    #[test]
    fn test_detection_prefills_without_advancing() {
        let s = state();
        assert_eq!(s.selected_column.as_deref(), Some("email"));
        assert_eq!(s.step, WizardStep::EmailColumn);
        assert!(s.detection.as_ref().unwrap().confidence > 50);
    }

    #[test]
    fn test_advance_requires_selected_column() {
        let mut s = state();
        s.selected_column = None;
        assert!(!s.advance_step());
        assert_eq!(s.step, WizardStep::EmailColumn);

        s.select_column_under_cursor();
        assert!(s.advance_step());
        assert_eq!(s.step, WizardStep::Fields);
    }

    #[test]
    fn test_go_back_is_unconditional_and_keeps_state() {
        let mut s = state();
        s.advance_step();
        s.toggle_preset_under_cursor();
        assert!(s.go_back());
        assert_eq!(s.step, WizardStep::EmailColumn);
        assert_eq!(s.fields.len(), 1);
        assert!(!s.go_back());
    }

    #[test]
    fn test_free_mail_warning_counts_consumer_domains() {
        let s = state();
        assert_eq!(s.free_mail_warning(), Some(1));
    }

    #[test]
    fn test_preset_toggle_adds_then_removes() {
        let mut s = state();
        s.advance_step();
        s.toggle_preset_under_cursor();
        assert_eq!(s.fields.len(), 1);
        assert!(s.fields.contains("company_name"));
        s.toggle_preset_under_cursor();
        assert!(s.fields.is_empty());
    }

    #[test]
    fn test_manual_submit_rejects_empty_description() {
        let mut s = state();
        s.advance_step();
        for c in "Revenue".chars() {
            s.manual_form.display_name.input_char(c);
        }
        s.submit_manual_field();
        assert!(s.fields.is_empty());
        assert_eq!(
            s.notifications.last().unwrap().notification_type,
            NotificationType::Error
        );
    }

    #[test]
    fn test_manual_submit_generates_unique_names() {
        let mut s = state();
        s.advance_step();
        for _ in 0..2 {
            for c in "Revenue".chars() {
                s.manual_form.display_name.input_char(c);
            }
            for c in "Annual revenue".chars() {
                s.manual_form.description.input_char(c);
            }
            s.submit_manual_field();
        }
        assert_eq!(s.fields.len(), 2);
        let names: Vec<&str> = s.fields.names().collect();
        assert_eq!(names[0], "revenue");
        assert_eq!(names[1], "revenue_2");
    }

    #[test]
    fn test_cap_leaves_set_unchanged_with_warning() {
        let mut s = state();
        s.advance_step();
        for i in 0..MAX_FIELDS {
            s.fields
                .add(EnrichmentField {
                    name: format!("f{}", i),
                    display_name: format!("F{}", i),
                    description: "d".to_string(),
                    field_type: FieldType::String,
                    required: false,
                })
                .unwrap();
        }
        s.toggle_preset_under_cursor();
        assert_eq!(s.fields.len(), MAX_FIELDS);
        assert_eq!(
            s.notifications.last().unwrap().notification_type,
            NotificationType::Warning
        );
    }

    #[test]
    fn test_accept_suggestion_moves_it_into_selected_set() {
        let mut s = state();
        s.advance_step();
        s.suggestions = vec![
            SuggestedField {
                display_name: "CEO Name".to_string(),
                description: "The CEO".to_string(),
                field_type: FieldType::String,
            },
            SuggestedField {
                display_name: "Stack".to_string(),
                description: "Tech stack".to_string(),
                field_type: FieldType::Array,
            },
        ];
        s.accept_suggestion_under_cursor();
        assert_eq!(s.suggestions.len(), 1);
        assert_eq!(s.fields.len(), 1);
        assert!(s.fields.contains("ceo_name"));
    }

    #[test]
    fn test_reject_suggestion_discards_it() {
        let mut s = state();
        s.advance_step();
        s.suggestions = vec![SuggestedField {
            display_name: "CEO Name".to_string(),
            description: "The CEO".to_string(),
            field_type: FieldType::String,
        }];
        s.reject_suggestion_under_cursor();
        assert!(s.suggestions.is_empty());
        assert!(s.fields.is_empty());
    }

    #[test]
    fn test_start_enrichment_fires_handoff_exactly_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);

        let mut s = state().with_on_start(Box::new(move |column, fields| {
            assert_eq!(column, "email");
            assert_eq!(fields.len(), 1);
            calls_clone.fetch_add(1, Ordering::SeqCst);
        }));
        s.advance_step();
        s.toggle_preset_under_cursor();

        s.start_enrichment();
        s.should_quit = false;
        s.start_enrichment();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(s.completed.as_ref().unwrap().email_column, "email");
    }

    #[test]
    fn test_start_enrichment_requires_a_field() {
        let mut s = state();
        s.advance_step();
        s.start_enrichment();
        assert!(!s.should_quit);
        assert!(s.completed.is_none());
    }

    #[test]
    fn test_preview_row_limit_and_expand() {
        let mut s = state();
        assert_eq!(s.visible_preview_rows(), PREVIEW_ROW_LIMIT);
        s.toggle_preview_expanded();
        assert_eq!(s.visible_preview_rows(), 4);
    }

    #[test]
    fn test_collapse_clamps_preview_cursor() {
        let mut s = state();
        s.toggle_preview_expanded();
        s.next_preview_row();
        s.next_preview_row();
        s.next_preview_row();
        assert_eq!(s.preview_row_cursor, 3);
        s.toggle_preview_expanded();
        assert_eq!(s.preview_row_cursor, PREVIEW_ROW_LIMIT - 1);
    }

    #[test]
    fn test_prompt_submit_rejected_while_in_flight() {
        let mut s = state();
        s.advance_step();
        s.suggestion_in_flight = true;
        for c in "ceo and cto names".chars() {
            s.prompt.input_char(c);
        }
        s.submit_prompt();
        // Ignored without a notification; the control is simply disabled.
        assert!(s.suggestion_in_flight);
        assert!(s.notifications.is_empty());
    }

    #[tokio::test]
    async fn test_quit_aborts_the_in_flight_request() {
        use crate::app::{AppEvent, EventHandler};

        // Bind but never accept, so the request cannot resolve on its own.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let client = SuggestionClient::new(url, 30).unwrap();

        let mut s = state().with_suggestion_client(client);
        s.advance_step();
        for c in "ceo name".chars() {
            s.prompt.input_char(c);
        }
        s.submit_prompt();
        assert!(s.suggestion_in_flight);
        assert!(s.suggest_abort.is_some());

        EventHandler::process_event(AppEvent::Quit, &mut s);
        assert!(s.should_quit);
        assert!(!s.suggestion_in_flight);
        assert!(s.suggest_abort.is_none());

        // The aborted task must not deliver a late outcome.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        s.poll_suggestions();
        assert!(s.suggestions.is_empty());
        assert!(s.notifications.is_empty());

        drop(listener);
    }

    #[test]
    fn test_resolution_consumes_an_unchanged_prompt() {
        let mut s = state();
        s.advance_step();
        for c in "ceo name".chars() {
            s.prompt.input_char(c);
        }
        s.suggestion_in_flight = true;
        s.submitted_prompt = Some("ceo name".to_string());
        s.suggest_tx
            .send(SuggestOutcome::Fields(vec![SuggestedField {
                display_name: "CEO Name".to_string(),
                description: "The CEO".to_string(),
                field_type: FieldType::String,
            }]))
            .unwrap();

        s.poll_suggestions();
        assert_eq!(s.suggestions.len(), 1);
        assert_eq!(s.prompt.value, "");
    }

    #[test]
    fn test_resolution_keeps_a_prompt_edited_while_in_flight() {
        let mut s = state();
        s.advance_step();
        for c in "ceo name".chars() {
            s.prompt.input_char(c);
        }
        s.suggestion_in_flight = true;
        s.submitted_prompt = Some("ceo name".to_string());
        s.suggest_tx
            .send(SuggestOutcome::Fields(vec![SuggestedField {
                display_name: "CEO Name".to_string(),
                description: "The CEO".to_string(),
                field_type: FieldType::String,
            }]))
            .unwrap();

        // The user keeps typing while the request runs.
        s.prompt.cursor_end();
        for c in " and cto".chars() {
            s.prompt.input_char(c);
        }

        s.poll_suggestions();
        assert_eq!(s.suggestions.len(), 1);
        assert_eq!(s.prompt.value, "ceo name and cto");
    }

    #[test]
    fn test_text_input_cursor_editing() {
        let mut input = TextInput::default();
        for c in "abc".chars() {
            input.input_char(c);
        }
        input.cursor_left();
        input.backspace();
        assert_eq!(input.value, "ac");
        input.cursor_end();
        input.input_char('d');
        assert_eq!(input.value, "acd");
    }

    #[test]
    fn test_email_under_preview_cursor() {
        let mut s = state();
        assert_eq!(s.email_under_preview_cursor().as_deref(), Some("a@gmail.com"));
        s.next_preview_row();
        assert_eq!(s.email_under_preview_cursor().as_deref(), Some("b@acme.com"));
    }
}
