//! Todo endpoints written as one plain handler per route that branches on
//! the request method.

use axum::{
    Json, Router,
    extract::{FromRequest, Request, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{MethodFilter, on},
};
use tracing::{info, instrument};

use crate::controllayer::todos::{TodoSerializer, todos_handler};
use crate::controllayer::views::{ApiPayload, ObjectId};
use crate::errors::ServiceResult;
use crate::handlers::fallback::method_not_allowed;
use crate::state::AppState;

/// GET, POST /api/function-views/todos
#[instrument(skip(state, request), fields(service = "/api/function-views/todos"))]
pub async fn todos(
    State(state): State<AppState>,
    method: Method,
    request: Request,
) -> ServiceResult<Response> {
    if method == Method::POST {
        let ApiPayload(data) = ApiPayload::from_request(request, &state).await?;
        let created = todos_handler::create_todo(state.todos.as_ref(), &data).await?;
        info!(todo_id = created.id, "Created todo");
        return Ok((StatusCode::CREATED, Json(created)).into_response());
    }

    let todos = todos_handler::list_todos(state.todos.as_ref()).await?;
    Ok(Json(TodoSerializer::many(&todos)).into_response())
}

/// GET, PUT, DELETE /api/function-views/todos/:todo_id
#[instrument(skip(state, request), fields(service = "/api/function-views/todos/:todo_id"))]
pub async fn todo_detail(
    State(state): State<AppState>,
    method: Method,
    ObjectId(todo_id): ObjectId,
    request: Request,
) -> ServiceResult<Response> {
    match method {
        Method::PUT => {
            let todo = todos_handler::get_todo(state.todos.as_ref(), todo_id).await?;
            let ApiPayload(data) = ApiPayload::from_request(request, &state).await?;
            let updated = todos_handler::update_todo(state.todos.as_ref(), todo, &data, false).await?;
            Ok((StatusCode::ACCEPTED, Json(updated)).into_response())
        }
        Method::DELETE => {
            todos_handler::destroy_todo(state.todos.as_ref(), todo_id).await?;
            Ok(StatusCode::NO_CONTENT.into_response())
        }
        _ => {
            let todo = todos_handler::get_todo(state.todos.as_ref(), todo_id).await?;
            Ok(Json(TodoSerializer::to_representation(&todo)).into_response())
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/function-views/todos",
            on(MethodFilter::GET.or(MethodFilter::POST), todos).fallback(method_not_allowed),
        )
        .route(
            "/api/function-views/todos/:todo_id",
            on(
                MethodFilter::GET
                    .or(MethodFilter::PUT)
                    .or(MethodFilter::DELETE),
                todo_detail,
            )
            .fallback(method_not_allowed),
        )
}
