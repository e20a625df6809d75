//! Issues backend requests on the tokio runtime and reports completions back
//! to the UI loop as [`Action`]s.
//!
//! Nothing here retries. Transport errors and non-2xx responses are logged and
//! turned into the matching `*Failed` action.

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::api::ApiClient;
use crate::models::{Filter, TaskDraft};
use crate::store::{Action, Mutation};

pub struct SyncController {
    client: ApiClient,
    tx: UnboundedSender<Action>,
    next_seq: u64,
}

impl SyncController {
    pub fn new(client: ApiClient) -> (Self, UnboundedReceiver<Action>) {
        let (tx, rx) = unbounded_channel();
        let controller = Self {
            client,
            tx,
            next_seq: 0,
        };
        (controller, rx)
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Starts a list read and returns its sequence number. The caller must
    /// apply `Action::ListRequested { seq }` so the store can tell fresh
    /// completions from stale ones.
    pub fn list(&mut self, filter: Filter) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;
        let client = self.client.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let action = match client.list_tasks(&filter).await {
                Ok(tasks) => {
                    tracing::debug!(seq, count = tasks.len(), "task list loaded");
                    Action::ListLoaded { seq, tasks }
                }
                Err(e) => {
                    tracing::warn!(seq, error = %e, "failed to load tasks");
                    Action::ListFailed { seq }
                }
            };
            let _ = tx.send(action);
        });

        seq
    }

    pub fn stats(&self) {
        let client = self.client.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let action = match client.stats().await {
                Ok(counters) => Action::StatsLoaded(counters),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to load statistics");
                    Action::StatsFailed
                }
            };
            let _ = tx.send(action);
        });
    }

    /// Reloads both resources. Used after every successful write. Returns the
    /// sequence number of the list read.
    pub fn refresh(&mut self, filter: Filter) -> u64 {
        let seq = self.list(filter);
        self.stats();
        seq
    }

    pub fn create(&self, draft: TaskDraft) {
        let client = self.client.clone();
        self.mutate(Mutation::Create, async move {
            client.create(&draft).await.map(|()| {
                tracing::info!(title = %draft.title, "task created");
            })
        });
    }

    pub fn update(&self, id: i64, draft: TaskDraft) {
        let client = self.client.clone();
        self.mutate(Mutation::Update(id), async move {
            client.update(id, &draft).await.map(|()| {
                tracing::info!(id, "task updated");
            })
        });
    }

    /// Deletes a task. Callers are responsible for confirming with the user
    /// first.
    pub fn delete(&self, id: i64) {
        let client = self.client.clone();
        self.mutate(Mutation::Delete(id), async move {
            client.delete_task(id).await.map(|()| {
                tracing::info!(id, "task deleted");
            })
        });
    }

    fn mutate<F>(&self, mutation: Mutation, request: F)
    where
        F: Future<Output = Result<(), crate::error::ApiError>> + Send + 'static,
    {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let action = match request.await {
                Ok(()) => Action::MutationSucceeded(mutation),
                Err(e) => {
                    tracing::warn!(?mutation, status = ?e.status(), error = %e, "task write failed");
                    Action::MutationFailed(mutation)
                }
            };
            let _ = tx.send(action);
        });
    }
}
