//! Application state and core logic
//!
//! The [`App`] hosts one questionnaire session. Key presses become
//! [`Action`]s for the session reducer; the effects it returns are run as
//! tokio tasks whose outcomes come back through an mpsc channel as
//! [`AppEvent`]s.

use crate::api::{LoadedForm, Project, ProjectFormStore};
use crate::i18n::Catalog;
use crate::platform::has_shortcut_modifier;
use crate::schema::{FieldType, FormField, FormType};
use crate::state::{reduce, visible_fields, Action, Effect, Questionnaire, Screen, Transition};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Outcome of a background task
#[derive(Debug)]
pub enum AppEvent {
    Loaded(Result<LoadedForm, String>),
    SaveFinished(Result<usize, String>),
    SubmitFinished(Result<(), String>),
    CompletionElapsed,
}

/// What the app is showing outside of the questionnaire itself
#[derive(Debug)]
pub enum Phase {
    Loading,
    Failed(String),
    /// The project left draft; answers can no longer change
    Locked(Project),
    Ready(Questionnaire),
}

/// Clickable buttons under a section or the review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Previous,
    Save,
    Next,
    Submit,
}

/// Something that can hold keyboard focus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusTarget {
    Field(String),
    EditSection(usize),
    Button(ButtonKind),
}

/// Main application struct
pub struct App {
    pub phase: Phase,
    pub catalog: Catalog,
    /// Index into [`App::focus_targets`]
    pub focus: usize,
    /// Highlighted option of the focused choice field
    pub option_cursor: usize,
    /// Highlighted form type on the selection screen
    pub type_cursor: usize,
    /// Transient feedback shown in the status bar
    pub status_message: Option<String>,
    error_queue: VecDeque<String>,
    store: Arc<ProjectFormStore>,
    completion_delay: Duration,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
    /// Save and submit tasks that may still be writing
    writes: Vec<JoinHandle<()>>,
    quit: bool,
}

impl App {
    pub fn new(store: Arc<ProjectFormStore>, catalog: Catalog, completion_delay: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            phase: Phase::Loading,
            catalog,
            focus: 0,
            option_cursor: 0,
            type_cursor: 0,
            status_message: None,
            error_queue: VecDeque::new(),
            store,
            completion_delay,
            events_tx,
            events_rx,
            writes: Vec::new(),
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn project_id(&self) -> String {
        self.store.project_id().to_string()
    }

    pub fn session(&self) -> Option<&Questionnaire> {
        match &self.phase {
            Phase::Ready(session) => Some(session),
            _ => None,
        }
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.error_queue.push_back(message.into());
    }

    pub fn current_error(&self) -> Option<&str> {
        self.error_queue.front().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        self.error_queue.pop_front();
    }

    /// Fetch the project and its answers in the background
    pub fn start_loading(&mut self) {
        self.phase = Phase::Loading;
        let store = Arc::clone(&self.store);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = store.load().await.map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::Loaded(result));
        });
    }

    /// Handle every event that has arrived since the last call
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
        }
    }

    /// Wait up to `limit` for save and submit tasks still in flight
    pub async fn finish_pending(&mut self, limit: Duration) {
        self.writes.retain(|handle| !handle.is_finished());
        if self.writes.is_empty() {
            return;
        }
        info!("Waiting for {} pending writes", self.writes.len());
        let writes = std::mem::take(&mut self.writes);
        let all = async {
            for handle in writes {
                if let Err(e) = handle.await {
                    warn!("Write task failed: {}", e);
                }
            }
        };
        if tokio::time::timeout(limit, all).await.is_err() {
            warn!("Gave up on pending writes after {:?}", limit);
        }
    }

    /// Wait for the next background event
    #[cfg(test)]
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.events_rx.recv().await
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Loaded(Ok(loaded)) => {
                if loaded.is_editable() {
                    info!(
                        "Questionnaire ready for project {} ({} answers)",
                        loaded.project.id,
                        loaded.values.len()
                    );
                    let session =
                        Questionnaire::new(self.project_id(), loaded.form_type, loaded.values);
                    self.phase = Phase::Ready(session);
                    self.reset_focus();
                } else {
                    info!(
                        "Project {} is {:?}, questionnaire is read-only",
                        loaded.project.id, loaded.project.state
                    );
                    self.phase = Phase::Locked(loaded.project);
                }
            }
            AppEvent::Loaded(Err(message)) => {
                error!("Failed to load questionnaire: {}", message);
                self.phase = Phase::Failed(message);
            }
            AppEvent::SaveFinished(result) => {
                match &result {
                    Ok(written) => {
                        info!("Draft saved ({} answers written)", written);
                        self.status_message = Some(self.catalog.t("app.saved"));
                    }
                    Err(message) => {
                        warn!("Failed to save draft: {}", message);
                        self.push_error(message.clone());
                    }
                }
                self.dispatch(Action::SaveFinished(result.map(|_| ())));
            }
            AppEvent::SubmitFinished(result) => {
                if let Err(message) = &result {
                    error!("Failed to submit questionnaire: {}", message);
                    self.push_error(message.clone());
                }
                self.dispatch(Action::SubmitFinished(result));
            }
            AppEvent::CompletionElapsed => {
                info!("Questionnaire complete");
                self.quit = true;
            }
        }
    }

    /// Apply an action to the session and run the resulting effects
    pub fn dispatch(&mut self, action: Action) {
        let session = match std::mem::replace(&mut self.phase, Phase::Loading) {
            Phase::Ready(session) => session,
            other => {
                self.phase = other;
                return;
            }
        };

        let focus_errors = matches!(action, Action::Next | Action::Submit);
        let before = session.screen();
        let Transition { state, effects } = reduce(session, action);
        let after = state.screen();
        let has_errors = !state.errors.is_empty();
        self.phase = Phase::Ready(state);

        if before != after {
            self.reset_focus();
        }
        if focus_errors && has_errors {
            self.focus_first_error();
        }
        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Save { form_type, values } => {
                let store = Arc::clone(&self.store);
                let tx = self.events_tx.clone();
                self.track_write(tokio::spawn(async move {
                    let result = store
                        .save(form_type, &values)
                        .await
                        .map_err(|e| e.to_string());
                    let _ = tx.send(AppEvent::SaveFinished(result));
                }));
            }
            Effect::Submit { form_type, values } => {
                info!("Submitting {} questionnaire", form_type.as_str());
                let store = Arc::clone(&self.store);
                let tx = self.events_tx.clone();
                self.track_write(tokio::spawn(async move {
                    let result = store
                        .submit(form_type, &values)
                        .await
                        .map_err(|e| e.to_string());
                    let _ = tx.send(AppEvent::SubmitFinished(result));
                }));
            }
            Effect::ScheduleCompletion => {
                let delay = self.completion_delay;
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(AppEvent::CompletionElapsed);
                });
            }
            Effect::Exit => self.quit = true,
        }
    }

    fn track_write(&mut self, handle: JoinHandle<()>) {
        self.writes.retain(|handle| !handle.is_finished());
        self.writes.push(handle);
    }

    /// Focusable items of the current screen, in Tab order
    pub fn focus_targets(&self) -> Vec<FocusTarget> {
        let Some(session) = self.session() else {
            return Vec::new();
        };
        match session.screen() {
            Screen::Editing(index) => {
                let mut targets: Vec<FocusTarget> = session
                    .current_section()
                    .map(|section| {
                        visible_fields(section, &session.values)
                            .map(|field| FocusTarget::Field(field.key.clone()))
                            .collect()
                    })
                    .unwrap_or_default();
                if index > 0 {
                    targets.push(FocusTarget::Button(ButtonKind::Previous));
                }
                targets.push(FocusTarget::Button(ButtonKind::Save));
                targets.push(FocusTarget::Button(ButtonKind::Next));
                targets
            }
            Screen::Review => {
                let mut targets: Vec<FocusTarget> = (0..session.total_sections())
                    .map(FocusTarget::EditSection)
                    .collect();
                targets.push(FocusTarget::Button(ButtonKind::Previous));
                targets.push(FocusTarget::Button(ButtonKind::Save));
                targets.push(FocusTarget::Button(ButtonKind::Submit));
                targets
            }
            Screen::TypeSelection | Screen::Confirmation => Vec::new(),
        }
    }

    pub fn focused(&self) -> Option<FocusTarget> {
        self.focus_targets().get(self.focus).cloned()
    }

    /// The focused field of the current section
    pub fn focused_field(&self) -> Option<&'static FormField> {
        let FocusTarget::Field(key) = self.focused()? else {
            return None;
        };
        self.session()?.current_section()?.field(&key)
    }

    fn reset_focus(&mut self) {
        self.focus = 0;
        self.sync_option_cursor();
    }

    fn move_focus(&mut self, forward: bool) {
        let count = self.focus_targets().len();
        if count == 0 {
            return;
        }
        self.focus = if forward {
            (self.focus + 1) % count
        } else {
            (self.focus + count - 1) % count
        };
        self.sync_option_cursor();
    }

    fn focus_first_error(&mut self) {
        let Some(session) = self.session() else {
            return;
        };
        let position = self.focus_targets().iter().position(|target| {
            matches!(target, FocusTarget::Field(key) if session.errors.contains_key(key))
        });
        if let Some(position) = position {
            self.focus = position;
            self.sync_option_cursor();
        }
    }

    /// Put the option cursor on the selected option of the focused field
    fn sync_option_cursor(&mut self) {
        let cursor = match (self.focused_field(), self.session()) {
            (Some(field), Some(session)) => session
                .values
                .text(&field.key)
                .and_then(|value| field.options.iter().position(|o| o.value == value))
                .unwrap_or(0),
            _ => 0,
        };
        self.option_cursor = cursor;
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.current_error().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.dismiss_error();
            }
            return;
        }
        self.status_message = None;

        if let Some(screen) = self.session().map(Questionnaire::screen) {
            match screen {
                Screen::TypeSelection => self.handle_type_selection_key(key),
                Screen::Editing(_) => self.handle_editing_key(key),
                Screen::Review => self.handle_review_key(key),
                Screen::Confirmation => self.handle_confirmation_key(key),
            }
            return;
        }

        match &self.phase {
            Phase::Loading => {
                if key.code == KeyCode::Esc {
                    self.quit = true;
                }
            }
            Phase::Failed(_) => match key.code {
                KeyCode::Char('r') => self.start_loading(),
                KeyCode::Esc | KeyCode::Char('q') => self.quit = true,
                _ => {}
            },
            Phase::Locked(_) => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                    self.quit = true;
                }
            }
            Phase::Ready(_) => {}
        }
    }

    fn handle_type_selection_key(&mut self, key: KeyEvent) {
        let count = FormType::ALL.len();
        match key.code {
            KeyCode::Right | KeyCode::Down | KeyCode::Tab => {
                self.type_cursor = (self.type_cursor + 1) % count;
            }
            KeyCode::Left | KeyCode::Up | KeyCode::BackTab => {
                self.type_cursor = (self.type_cursor + count - 1) % count;
            }
            KeyCode::Char(c @ '1'..='3') => {
                self.type_cursor = (c as usize) - ('1' as usize);
                self.dispatch(Action::SelectFormType(FormType::ALL[self.type_cursor]));
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.dispatch(Action::SelectFormType(FormType::ALL[self.type_cursor]));
            }
            KeyCode::Esc => self.dispatch(Action::Cancel),
            _ => {}
        }
    }

    /// Shortcuts shared by the section and review screens
    fn handle_shortcut(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('s') if has_shortcut_modifier(key.modifiers) => {
                self.dispatch(Action::Save)
            }
            KeyCode::Char('n') if has_shortcut_modifier(key.modifiers) => {
                self.dispatch(Action::Next)
            }
            KeyCode::Char('p') if has_shortcut_modifier(key.modifiers) => {
                self.dispatch(Action::Previous)
            }
            KeyCode::Char(c @ '1'..='9') if key.modifiers.contains(KeyModifiers::ALT) => {
                self.dispatch(Action::SelectTab((c as usize) - ('1' as usize)))
            }
            KeyCode::Esc => self.dispatch(Action::Cancel),
            KeyCode::Tab => self.move_focus(true),
            KeyCode::BackTab => self.move_focus(false),
            _ => return false,
        }
        true
    }

    fn handle_editing_key(&mut self, key: KeyEvent) {
        if self.handle_shortcut(key) {
            return;
        }
        match self.focused() {
            Some(FocusTarget::Field(_)) => self.handle_field_key(key),
            Some(FocusTarget::Button(button)) => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.press(button);
                } else if matches!(key.code, KeyCode::Up | KeyCode::Left) {
                    self.move_focus(false);
                } else if matches!(key.code, KeyCode::Down | KeyCode::Right) {
                    self.move_focus(true);
                }
            }
            _ => {}
        }
    }

    fn handle_field_key(&mut self, key: KeyEvent) {
        let Some(field) = self.focused_field() else {
            return;
        };
        let typing = !key.modifiers.contains(KeyModifiers::CONTROL)
            && !key.modifiers.contains(KeyModifiers::ALT);

        if field.field_type.is_free_text() {
            match key.code {
                KeyCode::Char(c) if typing => self.edit_text(field, |text| text.push(c)),
                KeyCode::Backspace => self.edit_text(field, |text| {
                    text.pop();
                }),
                KeyCode::Enter if field.field_type == FieldType::Textarea => {
                    self.edit_text(field, |text| text.push('\n'))
                }
                KeyCode::Enter | KeyCode::Down => self.move_focus(true),
                KeyCode::Up => self.move_focus(false),
                _ => {}
            }
            return;
        }

        let option_count = field.options.len();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') if self.option_cursor + 1 < option_count => {
                self.option_cursor += 1;
            }
            KeyCode::Down => self.move_focus(true),
            KeyCode::Up | KeyCode::Char('k') if self.option_cursor > 0 => {
                self.option_cursor -= 1;
            }
            KeyCode::Up => self.move_focus(false),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let Some(option) = field.options.get(self.option_cursor) else {
                    return;
                };
                let action = if field.field_type.is_single_choice() {
                    Action::SetValue {
                        field: field.key.clone(),
                        value: option.value.as_str().into(),
                    }
                } else {
                    Action::ToggleOption {
                        field: field.key.clone(),
                        option: option.value.clone(),
                    }
                };
                self.dispatch(action);
            }
            _ => {}
        }
    }

    fn edit_text(&mut self, field: &FormField, edit: impl FnOnce(&mut String)) {
        let Some(session) = self.session() else {
            return;
        };
        let mut text = session.values.text(&field.key).unwrap_or_default().to_string();
        edit(&mut text);
        self.dispatch(Action::SetValue {
            field: field.key.clone(),
            value: text.into(),
        });
    }

    fn handle_review_key(&mut self, key: KeyEvent) {
        if self.handle_shortcut(key) {
            return;
        }
        match key.code {
            KeyCode::Down | KeyCode::Right | KeyCode::Char('j') => self.move_focus(true),
            KeyCode::Up | KeyCode::Left | KeyCode::Char('k') => self.move_focus(false),
            KeyCode::Enter | KeyCode::Char(' ') => match self.focused() {
                Some(FocusTarget::EditSection(index)) => {
                    self.dispatch(Action::EditSection(index))
                }
                Some(FocusTarget::Button(button)) => self.press(button),
                _ => {}
            },
            _ => {}
        }
    }

    fn handle_confirmation_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.dispatch(Action::BackToDashboard),
            KeyCode::Char('c') => match self.copy_to_clipboard(&self.project_id()) {
                Ok(()) => self.status_message = Some(self.catalog.t("app.copied")),
                Err(e) => self.push_error(format!("Failed to copy: {e}")),
            },
            _ => {}
        }
    }

    fn press(&mut self, button: ButtonKind) {
        let action = match button {
            ButtonKind::Previous => Action::Previous,
            ButtonKind::Save => Action::Save,
            ButtonKind::Next => Action::Next,
            ButtonKind::Submit => Action::Submit,
        };
        self.dispatch(action);
    }

    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        use arboard::Clipboard;
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }
}
