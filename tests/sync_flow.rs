//! SyncController completions applied to a Store, against a wiremock backend.

use std::time::Duration;

use taskboard::ApiClient;
use taskboard::models::{Filter, StatusFilter, Task, TaskDraft, TaskStatus};
use taskboard::store::{Action, Effect, Mutation, Store};
use taskboard::sync::SyncController;
use tokio::sync::mpsc::UnboundedReceiver;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BASE: &str = "/api/tarefas";

fn test_task(id: i64, title: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "titulo": title,
        "descricao": null,
        "status": status,
        "dataCriacao": "2026-01-30T12:00:00"
    })
}

async fn next_action(rx: &mut UnboundedReceiver<Action>) -> Action {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for a completion")
        .expect("channel closed")
}

fn controller_for(server: &MockServer) -> (SyncController, UnboundedReceiver<Action>) {
    let client = ApiClient::new(&format!("{}{}", server.uri(), BASE)).unwrap();
    SyncController::new(client)
}

#[tokio::test]
async fn test_stale_list_response_is_discarded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(BASE))
        .and(query_param_is_missing("status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([test_task(1, "Slow", "PENDENTE")]))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(BASE))
        .and(query_param("status", "CONCLUIDA"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([test_task(2, "Fast", "CONCLUIDA")])),
        )
        .mount(&mock_server)
        .await;

    let (mut sync, mut rx) = controller_for(&mock_server);
    let mut store = Store::new();

    let slow = sync.list(Filter::default());
    store.apply(Action::ListRequested { seq: slow });
    let fast = sync.list(Filter::new(StatusFilter::Only(TaskStatus::Completed), ""));
    store.apply(Action::ListRequested { seq: fast });

    let first = next_action(&mut rx).await;
    assert!(matches!(first, Action::ListLoaded { seq, .. } if seq == fast));
    store.apply(first);
    let second = next_action(&mut rx).await;
    assert!(matches!(second, Action::ListLoaded { seq, .. } if seq == slow));
    store.apply(second);

    assert_eq!(store.tasks.len(), 1);
    assert_eq!(store.tasks[0].title, "Fast");
    assert!(store.tasks[0].description.is_empty());
    assert!(!store.loading);
}

#[tokio::test]
async fn test_failed_list_keeps_previous_tasks() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(BASE))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([test_task(1, "Kept", "PENDENTE")])),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(BASE))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let (mut sync, mut rx) = controller_for(&mock_server);
    let mut store = Store::new();

    for _ in 0..2 {
        let seq = sync.list(store.filter.clone());
        store.apply(Action::ListRequested { seq });
        let action = next_action(&mut rx).await;
        store.apply(action);
    }

    assert_eq!(store.tasks.len(), 1);
    assert_eq!(store.tasks[0].title, "Kept");
    assert!(!store.loading);
}

#[tokio::test]
async fn test_create_success_requests_refresh() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(BASE))
        .respond_with(ResponseTemplate::new(201).set_body_json(test_task(9, "New", "PENDENTE")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (sync, mut rx) = controller_for(&mock_server);
    let mut store = Store::new();
    store.apply(Action::BeginCreate);

    sync.create(TaskDraft {
        title: "New".to_string(),
        description: String::new(),
        status: TaskStatus::Pending,
    });

    let action = next_action(&mut rx).await;
    assert_eq!(action, Action::MutationSucceeded(Mutation::Create));
    assert_eq!(store.apply(action), Some(Effect::Refresh));
    assert!(store.editor.is_none());
}

#[tokio::test]
async fn test_bodiless_write_responses_count_as_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(BASE))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("{BASE}/3")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (sync, mut rx) = controller_for(&mock_server);
    let mut store = Store::new();
    let draft = TaskDraft {
        title: "New".to_string(),
        description: String::new(),
        status: TaskStatus::Pending,
    };

    store.apply(Action::BeginCreate);
    sync.create(draft.clone());
    let action = next_action(&mut rx).await;
    assert_eq!(action, Action::MutationSucceeded(Mutation::Create));
    assert_eq!(store.apply(action), Some(Effect::Refresh));
    assert!(store.editor.is_none());

    let existing: Task = serde_json::from_value(test_task(3, "Old", "CONCLUIDA")).unwrap();
    store.apply(Action::BeginEdit(existing));
    assert_eq!(store.editing_id(), Some(3));
    sync.update(3, draft);
    let action = next_action(&mut rx).await;
    assert_eq!(action, Action::MutationSucceeded(Mutation::Update(3)));
    assert_eq!(store.apply(action), Some(Effect::Refresh));
    assert_eq!(store.editing_id(), None);
}

#[tokio::test]
async fn test_delete_failure_reports_mutation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{BASE}/3")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let (sync, mut rx) = controller_for(&mock_server);
    sync.delete(3);

    assert_eq!(
        next_action(&mut rx).await,
        Action::MutationFailed(Mutation::Delete(3))
    );
}

#[tokio::test]
async fn test_stats_failure_keeps_counters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{BASE}/estatisticas")))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let (sync, mut rx) = controller_for(&mock_server);
    let mut store = Store::new();
    sync.stats();

    let action = next_action(&mut rx).await;
    assert_eq!(action, Action::StatsFailed);
    store.apply(action);
    assert_eq!(store.counters.total, 0);
}
