//! Client-side state container.
//!
//! Every change to what the UI shows goes through [`Store::apply`]. Applying an
//! action may yield an [`Effect`] that the caller must run against the backend;
//! the store itself never performs I/O.

use crate::models::{
    Counters, Filter, FormErrors, FormField, StatusFilter, Task, TaskDraft, TaskStatus,
    validation,
};

/// Which write an action refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update(i64),
    Delete(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A list read with sequence number `seq` was issued.
    ListRequested { seq: u64 },
    ListLoaded { seq: u64, tasks: Vec<Task> },
    ListFailed { seq: u64 },
    StatsLoaded(Counters),
    StatsFailed,
    SetStatusFilter(StatusFilter),
    SetSearch(String),
    ResetFilters,
    BeginCreate,
    BeginEdit(Task),
    CancelEdit,
    RequestDelete(i64),
    CancelDelete,
    MutationSucceeded(Mutation),
    MutationFailed(Mutation),
}

/// Follow-up work requested by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Re-read the task list with the current filter.
    FetchList,
    /// Re-read both the task list and the counters.
    Refresh,
}

/// Editable copy of a task. `target` is `None` when creating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub target: Option<i64>,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub focus: FormField,
    pub errors: FormErrors,
    /// Set while the write is in flight.
    pub submitting: bool,
}

impl TaskForm {
    pub fn new_task() -> Self {
        Self {
            target: None,
            title: String::new(),
            description: String::new(),
            status: TaskStatus::Pending,
            focus: FormField::Title,
            errors: FormErrors::new(),
            submitting: false,
        }
    }

    pub fn edit(task: &Task) -> Self {
        Self {
            target: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            ..Self::new_task()
        }
    }

    pub fn is_edit(&self) -> bool {
        self.target.is_some()
    }

    /// Appends a character to the focused text field, honoring the length caps.
    pub fn push_char(&mut self, c: char) {
        match self.focus {
            FormField::Title if self.title.chars().count() < validation::TITLE_MAX_CHARS => {
                self.title.push(c);
            }
            FormField::Description
                if self.description.chars().count() < validation::DESCRIPTION_MAX_CHARS =>
            {
                self.description.push(c);
            }
            _ => {}
        }
    }

    pub fn pop_char(&mut self) {
        match self.focus {
            FormField::Title => {
                self.title.pop();
            }
            FormField::Description => {
                self.description.pop();
            }
            FormField::Status => {}
        }
    }

    /// Runs validation, storing any errors on the form. Returns the draft to
    /// send when the input is valid.
    pub fn submit(&mut self) -> Option<TaskDraft> {
        match validation::build_draft(&self.title, &self.description, self.status) {
            Ok(draft) => {
                self.errors.clear();
                Some(draft)
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct Store {
    pub tasks: Vec<Task>,
    pub counters: Counters,
    pub filter: Filter,
    pub loading: bool,
    pub editor: Option<TaskForm>,
    /// Task awaiting delete confirmation.
    pub pending_delete: Option<i64>,
    /// Sequence number of the most recent list read; older completions are
    /// discarded.
    pub latest_list_seq: u64,
}

impl Store {
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn apply(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::ListRequested { seq } => {
                self.latest_list_seq = seq;
                self.loading = true;
                None
            }
            Action::ListLoaded { seq, tasks } => {
                if seq != self.latest_list_seq {
                    tracing::debug!(seq, latest = self.latest_list_seq, "discarding stale task list");
                    return None;
                }
                self.tasks = tasks;
                self.loading = false;
                None
            }
            Action::ListFailed { seq } => {
                if seq == self.latest_list_seq {
                    self.loading = false;
                }
                None
            }
            Action::StatsLoaded(counters) => {
                if !counters.is_consistent() {
                    tracing::warn!(?counters, "server counters do not add up to total");
                }
                self.counters = counters;
                None
            }
            Action::StatsFailed => None,
            Action::SetStatusFilter(status) => {
                if self.filter.status == status {
                    return None;
                }
                self.filter.status = status;
                Some(Effect::FetchList)
            }
            Action::SetSearch(term) => {
                if self.filter.search == term {
                    return None;
                }
                self.filter.search = term;
                Some(Effect::FetchList)
            }
            Action::ResetFilters => {
                if self.filter.is_default() {
                    return None;
                }
                self.filter = Filter::default();
                Some(Effect::FetchList)
            }
            Action::BeginCreate => {
                self.editor = Some(TaskForm::new_task());
                None
            }
            Action::BeginEdit(task) => {
                if task.id.is_none() {
                    tracing::warn!(title = %task.title, "cannot edit a task without an id");
                    return None;
                }
                self.editor = Some(TaskForm::edit(&task));
                None
            }
            Action::CancelEdit => {
                self.editor = None;
                None
            }
            Action::RequestDelete(id) => {
                self.pending_delete = Some(id);
                None
            }
            Action::CancelDelete => {
                self.pending_delete = None;
                None
            }
            Action::MutationSucceeded(mutation) => {
                match mutation {
                    Mutation::Create | Mutation::Update(_) => self.close_editor_for(mutation),
                    Mutation::Delete(id) => {
                        if self.pending_delete == Some(id) {
                            self.pending_delete = None;
                        }
                    }
                }
                Some(Effect::Refresh)
            }
            Action::MutationFailed(mutation) => {
                if let Some(form) = self.editor.as_mut()
                    && form_matches(form, mutation)
                {
                    form.submitting = false;
                }
                None
            }
        }
    }

    /// Closes the editor if it is the one the mutation was submitted from.
    fn close_editor_for(&mut self, mutation: Mutation) {
        if self
            .editor
            .as_ref()
            .is_some_and(|form| form_matches(form, mutation))
        {
            self.editor = None;
        }
    }

    pub fn editing_id(&self) -> Option<i64> {
        self.editor.as_ref().and_then(|form| form.target)
    }

    pub fn task(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == Some(id))
    }
}

fn form_matches(form: &TaskForm, mutation: Mutation) -> bool {
    match mutation {
        Mutation::Create => form.target.is_none(),
        Mutation::Update(id) => form.target == Some(id),
        Mutation::Delete(_) => false,
    }
}
