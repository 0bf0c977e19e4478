use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::controllayer::todos::serializer::{TodoResponse, TodoSerializer};
use crate::datalayer::CRUD::store::TodoStore;
use crate::datalayer::CRUD::types::Todo;
use crate::errors::ServiceResult;

/// All todos, ordered by priority then id
#[instrument(skip(store), fields(backend = store.backend()))]
pub async fn list_todos(store: &dyn TodoStore) -> ServiceResult<Vec<Todo>> {
    let todos = store.list().await?;
    info!(count = todos.len(), "Listed todos");
    Ok(todos)
}

#[instrument(skip(store), fields(backend = store.backend()))]
pub async fn get_todo(store: &dyn TodoStore, id: i64) -> ServiceResult<Todo> {
    store.get(id).await.map_err(|e| {
        warn!(todo_id = id, error = %e, "Todo lookup failed");
        e
    })
}

/// Validate `data` and persist a new todo.
/// Nothing is written when validation fails.
#[instrument(skip(store, data), fields(backend = store.backend()))]
pub async fn create_todo(store: &dyn TodoStore, data: &Value) -> ServiceResult<TodoResponse> {
    let new_todo = TodoSerializer::validate_create(data).map_err(|e| {
        warn!(error = %e, "Rejected todo payload");
        e
    })?;

    let todo = store.insert(new_todo).await?;
    info!(todo_id = todo.id, priority = todo.priority, "Todo created");
    Ok(TodoSerializer::to_representation(&todo))
}

/// Apply a validated update to `existing`, which the caller has already
/// fetched. `partial` relaxes the required-field check.
#[instrument(skip(store, existing, data), fields(backend = store.backend(), todo_id = existing.id))]
pub async fn update_todo(
    store: &dyn TodoStore,
    existing: Todo,
    data: &Value,
    partial: bool,
) -> ServiceResult<TodoResponse> {
    let changes = TodoSerializer::validate_update(data, partial).map_err(|e| {
        warn!(todo_id = existing.id, error = %e, "Rejected todo update");
        e
    })?;

    if changes.is_empty() {
        return Ok(TodoSerializer::to_representation(&existing));
    }

    let todo = store.update(existing.id, changes).await?;
    info!(todo_id = todo.id, partial, "Todo updated");
    Ok(TodoSerializer::to_representation(&todo))
}

#[instrument(skip(store), fields(backend = store.backend()))]
pub async fn destroy_todo(store: &dyn TodoStore, id: i64) -> ServiceResult<()> {
    store.delete(id).await?;
    info!(todo_id = id, "Todo deleted");
    Ok(())
}
