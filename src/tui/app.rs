use std::io::Stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::ListState;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::error::TryRecvError;

use crate::api::ApiClient;
use crate::models::{FormField, Task};
use crate::store::{Action, Effect, Store};
use crate::sync::SyncController;
use crate::tui::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Editor,
    TaskDetail,
    ConfirmDelete,
    HelpOverlay,
}

pub struct App {
    pub store: Store,
    sync: SyncController,
    rx: UnboundedReceiver<Action>,
    pub running: bool,
    /// View chosen by the user. The editor and the delete confirmation are
    /// driven by the store and take priority; see [`App::mode`].
    view: InputMode,
    pub selected_idx: usize,
    /// Scroll position of the task list, kept across frames so the
    /// selection stays inside the viewport.
    pub list_state: ListState,
}

/// Wraps an index by `delta` within `len`, returning `None` when the list is empty.
fn wrap_index(current: usize, len: usize, delta: isize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(((current as isize + delta).rem_euclid(len as isize)) as usize)
}

impl App {
    /// Must be called from within a tokio runtime: the initial loads are
    /// spawned immediately.
    pub fn new(client: ApiClient) -> Self {
        let (sync, rx) = SyncController::new(client);
        let mut app = Self {
            store: Store::new(),
            sync,
            rx,
            running: true,
            view: InputMode::Normal,
            selected_idx: 0,
            list_state: ListState::default(),
        };
        app.refresh();
        app
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        while self.running {
            self.drain_actions();

            terminal.draw(|frame| ui::draw(frame, self))?;

            if event::poll(Duration::from_millis(42))?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.sync.client().base_url()
    }

    pub fn mode(&self) -> InputMode {
        if self.store.pending_delete.is_some() {
            InputMode::ConfirmDelete
        } else if self.store.editor.is_some() {
            InputMode::Editor
        } else {
            self.view
        }
    }

    /// Applies every completion that has arrived since the last frame.
    fn drain_actions(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(action) => self.dispatch(action),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::error!("sync channel closed");
                    self.running = false;
                    break;
                }
            }
        }
    }

    fn dispatch(&mut self, action: Action) {
        if let Some(effect) = self.store.apply(action) {
            self.run_effect(effect);
        }
        self.selected_idx = self
            .selected_idx
            .min(self.store.tasks.len().saturating_sub(1));
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::FetchList => self.fetch_list(),
            Effect::Refresh => self.refresh(),
        }
    }

    fn fetch_list(&mut self) {
        let seq = self.sync.list(self.store.filter.clone());
        self.dispatch(Action::ListRequested { seq });
    }

    pub fn refresh(&mut self) {
        let seq = self.sync.refresh(self.store.filter.clone());
        self.dispatch(Action::ListRequested { seq });
    }

    /// Returns the currently selected task, if any.
    pub fn selected_task(&self) -> Option<&Task> {
        self.store.tasks.get(self.selected_idx)
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match self.mode() {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Search => self.handle_search_key(key),
            InputMode::Editor => self.handle_editor_key(key),
            InputMode::TaskDetail => self.handle_task_detail_key(key),
            InputMode::ConfirmDelete => self.handle_confirm_key(key),
            InputMode::HelpOverlay => self.handle_help_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('?') => self.view = InputMode::HelpOverlay,
            KeyCode::Char('j') | KeyCode::Down => self.navigate(1),
            KeyCode::Char('k') | KeyCode::Up => self.navigate(-1),
            KeyCode::Char('n') => self.dispatch(Action::BeginCreate),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(task) = self.selected_task().cloned() {
                    self.dispatch(Action::BeginEdit(task));
                }
            }
            KeyCode::Char('v') if self.selected_task().is_some() => {
                self.view = InputMode::TaskDetail;
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_task().and_then(|t| t.id) {
                    self.dispatch(Action::RequestDelete(id));
                }
            }
            KeyCode::Char('f') => {
                let next = self.store.filter.status.cycle();
                self.dispatch(Action::SetStatusFilter(next));
            }
            KeyCode::Char('/') => self.view = InputMode::Search,
            KeyCode::Char('x') => self.dispatch(Action::ResetFilters),
            KeyCode::Char('r') => self.refresh(),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.view = InputMode::Normal,
            KeyCode::Backspace => {
                let mut term = self.store.filter.search.clone();
                term.pop();
                self.dispatch(Action::SetSearch(term));
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.dispatch(Action::SetSearch(String::new()));
            }
            KeyCode::Char(c) => {
                let mut term = self.store.filter.search.clone();
                term.push(c);
                self.dispatch(Action::SetSearch(term));
            }
            _ => {}
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.dispatch(Action::CancelEdit);
            return;
        }
        if key.code == KeyCode::Enter {
            self.submit_form();
            return;
        }

        let Some(form) = self.store.editor.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Tab => form.focus = form.focus.next(),
            KeyCode::BackTab => form.focus = form.focus.prev(),
            KeyCode::Left if form.focus == FormField::Status => form.status = form.status.prev(),
            KeyCode::Right if form.focus == FormField::Status => form.status = form.status.next(),
            KeyCode::Char(' ') if form.focus == FormField::Status => {
                form.status = form.status.next();
            }
            KeyCode::Backspace => form.pop_char(),
            KeyCode::Char(c) => form.push_char(c),
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let Some(form) = self.store.editor.as_mut() else {
            return;
        };
        if form.submitting {
            return;
        }
        let Some(draft) = form.submit() else {
            return;
        };
        form.submitting = true;
        match form.target {
            Some(id) => self.sync.update(id, draft),
            None => self.sync.create(draft),
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Some(id) = self.store.pending_delete {
                    self.sync.delete(id);
                }
                self.dispatch(Action::CancelDelete);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.dispatch(Action::CancelDelete);
            }
            _ => {}
        }
    }

    fn handle_task_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('v') | KeyCode::Enter => {
                self.view = InputMode::Normal;
            }
            _ => {}
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
                self.view = InputMode::Normal;
            }
            _ => {}
        }
    }

    /// Moves the selection cursor by `delta`, wrapping around at both ends.
    fn navigate(&mut self, delta: isize) {
        if let Some(next) = wrap_index(self.selected_idx, self.store.tasks.len(), delta) {
            self.selected_idx = next;
        }
    }
}
