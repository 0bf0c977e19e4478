//! Todo endpoints composed from the model mixins. Each HTTP method is a thin
//! wrapper around one mixin action.

use axum::{
    Router,
    extract::{OriginalUri, Request, State},
    response::Response,
    routing::get,
};
use tracing::instrument;

use crate::controllayer::views::{
    ApiPayload, CreateModelMixin, DestroyModelMixin, GenericApiView, ListModelMixin, ObjectId,
    RetrieveModelMixin, TodoResource, UpdateModelMixin,
};
use crate::errors::ServiceResult;
use crate::handlers::fallback::method_not_allowed;
use crate::state::AppState;

pub struct TodoListMixinsView {
    state: AppState,
}

impl GenericApiView for TodoListMixinsView {
    type Resource = TodoResource;

    fn state(&self) -> &AppState {
        &self.state
    }
}

impl ListModelMixin for TodoListMixinsView {}
impl CreateModelMixin for TodoListMixinsView {}

impl TodoListMixinsView {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    #[instrument(skip(state, uri), fields(service = "/api/mixins/todos"))]
    async fn get(State(state): State<AppState>, OriginalUri(uri): OriginalUri) -> ServiceResult<Response> {
        Self::new(state).list(&uri).await
    }

    #[instrument(skip(state, data), fields(service = "/api/mixins/todos"))]
    async fn post(
        State(state): State<AppState>,
        ApiPayload(data): ApiPayload,
    ) -> ServiceResult<Response> {
        Self::new(state).create(&data).await
    }
}

pub struct TodoDetailMixinsView {
    state: AppState,
}

impl GenericApiView for TodoDetailMixinsView {
    type Resource = TodoResource;

    fn state(&self) -> &AppState {
        &self.state
    }
}

impl RetrieveModelMixin for TodoDetailMixinsView {}
impl UpdateModelMixin for TodoDetailMixinsView {}
impl DestroyModelMixin for TodoDetailMixinsView {}

impl TodoDetailMixinsView {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    #[instrument(skip(state), fields(service = "/api/mixins/todos/:pk"))]
    async fn get(State(state): State<AppState>, ObjectId(pk): ObjectId) -> ServiceResult<Response> {
        Self::new(state).retrieve(pk).await
    }

    #[instrument(skip(state, request), fields(service = "/api/mixins/todos/:pk"))]
    async fn put(
        State(state): State<AppState>,
        ObjectId(pk): ObjectId,
        request: Request,
    ) -> ServiceResult<Response> {
        Self::new(state).update(pk, request).await
    }

    #[instrument(skip(state), fields(service = "/api/mixins/todos/:pk"))]
    async fn delete(State(state): State<AppState>, ObjectId(pk): ObjectId) -> ServiceResult<Response> {
        Self::new(state).destroy(pk).await
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/mixins/todos",
            get(TodoListMixinsView::get)
                .post(TodoListMixinsView::post)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/mixins/todos/:pk",
            get(TodoDetailMixinsView::get)
                .put(TodoDetailMixinsView::put)
                .delete(TodoDetailMixinsView::delete)
                .fallback(method_not_allowed),
        )
}
