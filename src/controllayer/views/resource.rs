use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::controllayer::todos::{TodoResponse, TodoSerializer, todos_handler};
use crate::controllayer::users::{UserResponse, UserSerializer, users_handler};
use crate::datalayer::CRUD::types::{Todo, User};
use crate::errors::ServiceResult;
use crate::state::AppState;

/// A record type the generic views can list: where its queryset comes from
/// and how a record is serialized.
#[async_trait]
pub trait ModelResource: Send + Sync + 'static {
    type Record: Send + Sync + 'static;
    type Representation: Serialize + Send + 'static;

    /// Name used in logs and metrics
    fn name() -> &'static str;

    /// Records in their default listing order
    async fn queryset(state: &AppState) -> ServiceResult<Vec<Self::Record>>;

    fn to_representation(record: &Self::Record) -> Self::Representation;
}

/// A resource that supports single-record lookups and writes.
/// Writes validate their payload before touching the store.
#[async_trait]
pub trait WritableResource: ModelResource {
    async fn get_object(state: &AppState, id: i64) -> ServiceResult<Self::Record>;

    async fn perform_create(state: &AppState, data: &Value) -> ServiceResult<Self::Representation>;

    /// Validate `data` against an instance fetched by `get_object` and save it
    async fn perform_update(
        state: &AppState,
        instance: Self::Record,
        data: &Value,
        partial: bool,
    ) -> ServiceResult<Self::Representation>;

    async fn perform_destroy(state: &AppState, id: i64) -> ServiceResult<()>;
}

pub struct TodoResource;

#[async_trait]
impl ModelResource for TodoResource {
    type Record = Todo;
    type Representation = TodoResponse;

    fn name() -> &'static str {
        "todo"
    }

    async fn queryset(state: &AppState) -> ServiceResult<Vec<Todo>> {
        todos_handler::list_todos(state.todos.as_ref()).await
    }

    fn to_representation(record: &Todo) -> TodoResponse {
        TodoSerializer::to_representation(record)
    }
}

#[async_trait]
impl WritableResource for TodoResource {
    async fn get_object(state: &AppState, id: i64) -> ServiceResult<Todo> {
        todos_handler::get_todo(state.todos.as_ref(), id).await
    }

    async fn perform_create(state: &AppState, data: &Value) -> ServiceResult<TodoResponse> {
        todos_handler::create_todo(state.todos.as_ref(), data).await
    }

    async fn perform_update(
        state: &AppState,
        instance: Todo,
        data: &Value,
        partial: bool,
    ) -> ServiceResult<TodoResponse> {
        todos_handler::update_todo(state.todos.as_ref(), instance, data, partial).await
    }

    async fn perform_destroy(state: &AppState, id: i64) -> ServiceResult<()> {
        todos_handler::destroy_todo(state.todos.as_ref(), id).await
    }
}

/// Read-only user listing
pub struct UserResource;

#[async_trait]
impl ModelResource for UserResource {
    type Record = User;
    type Representation = UserResponse;

    fn name() -> &'static str {
        "user"
    }

    async fn queryset(state: &AppState) -> ServiceResult<Vec<User>> {
        users_handler::list_users(state.users.as_ref()).await
    }

    fn to_representation(record: &User) -> UserResponse {
        UserSerializer::to_representation(record)
    }
}
