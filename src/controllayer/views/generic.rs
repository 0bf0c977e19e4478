//! Concrete generic views assembled from the mixins.
//!
//! Each view is built per request from the shared [`AppState`] and exposes a
//! `router` that mounts its handlers on a path.

use std::marker::PhantomData;

use axum::{
    Router,
    extract::{OriginalUri, Request, State},
    middleware,
    response::Response,
    routing::get,
};
use crate::controllayer::pagination::PageNumberPagination;
use crate::controllayer::views::extract::{ApiPayload, ObjectId};
use crate::controllayer::views::mixins::{
    CreateModelMixin, DestroyModelMixin, GenericApiView, ListModelMixin, RetrieveModelMixin,
    UpdateModelMixin,
};
use crate::controllayer::views::resource::{ModelResource, WritableResource};
use crate::errors::ServiceResult;
use crate::handlers::fallback::method_not_allowed;
use crate::middleware::auth::basic_auth_middleware;
use crate::state::AppState;

/// Who may call a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    AllowAny,
    /// Requires HTTP Basic credentials of an active user
    IsAuthenticated,
}

impl Permission {
    fn protect(self, router: Router<AppState>, state: &AppState) -> Router<AppState> {
        match self {
            Permission::AllowAny => router,
            Permission::IsAuthenticated => router.route_layer(middleware::from_fn_with_state(
                state.clone(),
                basic_auth_middleware,
            )),
        }
    }
}

/// Unpaginated read-only listing
pub struct ListApiView<R> {
    state: AppState,
    _resource: PhantomData<fn() -> R>,
}

impl<R: ModelResource> ListApiView<R> {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            _resource: PhantomData,
        }
    }

    pub fn router(path: &str, permission: Permission, state: &AppState) -> Router<AppState> {
        let router = Router::new().route(path, get(Self::get).fallback(method_not_allowed));
        permission.protect(router, state)
    }

    async fn get(State(state): State<AppState>, OriginalUri(uri): OriginalUri) -> ServiceResult<Response> {
        Self::new(state).list(&uri).await
    }
}

impl<R: ModelResource> GenericApiView for ListApiView<R> {
    type Resource = R;

    fn state(&self) -> &AppState {
        &self.state
    }
}

impl<R: ModelResource> ListModelMixin for ListApiView<R> {}

/// Paginated listing plus creation
pub struct ListCreateApiView<R> {
    state: AppState,
    _resource: PhantomData<fn() -> R>,
}

impl<R: WritableResource> ListCreateApiView<R> {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            _resource: PhantomData,
        }
    }

    pub fn router(path: &str, permission: Permission, state: &AppState) -> Router<AppState> {
        let router = Router::new().route(
            path,
            get(Self::get)
                .post(Self::post)
                .fallback(method_not_allowed),
        );
        permission.protect(router, state)
    }

    async fn get(State(state): State<AppState>, OriginalUri(uri): OriginalUri) -> ServiceResult<Response> {
        Self::new(state).list(&uri).await
    }

    async fn post(
        State(state): State<AppState>,
        ApiPayload(data): ApiPayload,
    ) -> ServiceResult<Response> {
        Self::new(state).create(&data).await
    }
}

impl<R: WritableResource> GenericApiView for ListCreateApiView<R> {
    type Resource = R;

    fn state(&self) -> &AppState {
        &self.state
    }

    fn pagination(&self) -> Option<PageNumberPagination> {
        Some(self.state.pagination())
    }
}

impl<R: WritableResource> ListModelMixin for ListCreateApiView<R> {}
impl<R: WritableResource> CreateModelMixin for ListCreateApiView<R> {}

/// Single-record retrieve, update (PUT and PATCH) and destroy
pub struct RetrieveUpdateDestroyApiView<R> {
    state: AppState,
    _resource: PhantomData<fn() -> R>,
}

impl<R: WritableResource> RetrieveUpdateDestroyApiView<R> {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            _resource: PhantomData,
        }
    }

    pub fn router(path: &str, permission: Permission, state: &AppState) -> Router<AppState> {
        let router = Router::new().route(
            path,
            get(Self::get)
                .put(Self::put)
                .patch(Self::patch)
                .delete(Self::delete)
                .fallback(method_not_allowed),
        );
        permission.protect(router, state)
    }

    async fn get(State(state): State<AppState>, ObjectId(pk): ObjectId) -> ServiceResult<Response> {
        Self::new(state).retrieve(pk).await
    }

    async fn put(
        State(state): State<AppState>,
        ObjectId(pk): ObjectId,
        request: Request,
    ) -> ServiceResult<Response> {
        Self::new(state).update(pk, request).await
    }

    async fn patch(
        State(state): State<AppState>,
        ObjectId(pk): ObjectId,
        request: Request,
    ) -> ServiceResult<Response> {
        Self::new(state).partial_update(pk, request).await
    }

    async fn delete(State(state): State<AppState>, ObjectId(pk): ObjectId) -> ServiceResult<Response> {
        Self::new(state).destroy(pk).await
    }
}

impl<R: WritableResource> GenericApiView for RetrieveUpdateDestroyApiView<R> {
    type Resource = R;

    fn state(&self) -> &AppState {
        &self.state
    }
}

impl<R: WritableResource> RetrieveModelMixin for RetrieveUpdateDestroyApiView<R> {}
impl<R: WritableResource> UpdateModelMixin for RetrieveUpdateDestroyApiView<R> {}
impl<R: WritableResource> DestroyModelMixin for RetrieveUpdateDestroyApiView<R> {}
