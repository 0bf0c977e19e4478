//! Todo endpoints as view structs with one method per HTTP verb.

use axum::{
    Json, Router,
    extract::{FromRequest, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{MethodRouter, get},
};
use serde_json::Value;
use tracing::instrument;

use crate::controllayer::todos::{TodoSerializer, todos_handler};
use crate::controllayer::views::{ApiPayload, ObjectId};
use crate::datalayer::CRUD::types::Todo;
use crate::errors::ServiceResult;
use crate::handlers::fallback::method_not_allowed;
use crate::state::AppState;

/// Collection view: list and create
pub struct ManageTodoView {
    state: AppState,
}

impl ManageTodoView {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn get(&self) -> ServiceResult<Response> {
        let todos = todos_handler::list_todos(self.state.todos.as_ref()).await?;
        Ok(Json(TodoSerializer::many(&todos)).into_response())
    }

    pub async fn post(&self, data: &Value) -> ServiceResult<Response> {
        let created = todos_handler::create_todo(self.state.todos.as_ref(), data).await?;
        Ok((StatusCode::CREATED, Json(created)).into_response())
    }

    pub fn as_view() -> MethodRouter<AppState> {
        get(Self::handle_get)
            .post(Self::handle_post)
            .fallback(method_not_allowed)
    }

    #[instrument(skip(state), fields(service = "/api/class-views/todos"))]
    async fn handle_get(State(state): State<AppState>) -> ServiceResult<Response> {
        Self::new(state).get().await
    }

    #[instrument(skip(state, data), fields(service = "/api/class-views/todos"))]
    async fn handle_post(
        State(state): State<AppState>,
        ApiPayload(data): ApiPayload,
    ) -> ServiceResult<Response> {
        Self::new(state).post(&data).await
    }
}

/// Item view: retrieve, replace and delete one todo
pub struct TodoDetailView {
    state: AppState,
    todo_id: i64,
}

impl TodoDetailView {
    pub fn new(state: AppState, todo_id: i64) -> Self {
        Self { state, todo_id }
    }

    pub async fn get_object(&self) -> ServiceResult<Todo> {
        todos_handler::get_todo(self.state.todos.as_ref(), self.todo_id).await
    }

    pub async fn get(&self) -> ServiceResult<Response> {
        let todo = self.get_object().await?;
        Ok(Json(TodoSerializer::to_representation(&todo)).into_response())
    }

    /// Replace `todo`, previously fetched with `get_object`
    pub async fn put(&self, todo: Todo, data: &Value) -> ServiceResult<Response> {
        let updated = todos_handler::update_todo(self.state.todos.as_ref(), todo, data, false).await?;
        Ok((StatusCode::ACCEPTED, Json(updated)).into_response())
    }

    pub async fn delete(&self) -> ServiceResult<Response> {
        todos_handler::destroy_todo(self.state.todos.as_ref(), self.todo_id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    pub fn as_view() -> MethodRouter<AppState> {
        get(Self::handle_get)
            .put(Self::handle_put)
            .delete(Self::handle_delete)
            .fallback(method_not_allowed)
    }

    #[instrument(skip(state), fields(service = "/api/class-views/todos/:todo_id"))]
    async fn handle_get(
        State(state): State<AppState>,
        ObjectId(todo_id): ObjectId,
    ) -> ServiceResult<Response> {
        Self::new(state, todo_id).get().await
    }

    /// The body is only parsed once the todo is known to exist
    #[instrument(skip(state, request), fields(service = "/api/class-views/todos/:todo_id"))]
    async fn handle_put(
        State(state): State<AppState>,
        ObjectId(todo_id): ObjectId,
        request: Request,
    ) -> ServiceResult<Response> {
        let view = Self::new(state, todo_id);
        let todo = view.get_object().await?;
        let ApiPayload(data) = ApiPayload::from_request(request, &()).await?;
        view.put(todo, &data).await
    }

    #[instrument(skip(state), fields(service = "/api/class-views/todos/:todo_id"))]
    async fn handle_delete(
        State(state): State<AppState>,
        ObjectId(todo_id): ObjectId,
    ) -> ServiceResult<Response> {
        Self::new(state, todo_id).delete().await
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/class-views/todos", ManageTodoView::as_view())
        .route("/api/class-views/todos/:todo_id", TodoDetailView::as_view())
}
