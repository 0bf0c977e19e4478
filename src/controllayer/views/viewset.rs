use std::fmt;
use std::marker::PhantomData;

use axum::{
    Router,
    extract::{FromRequest, Request, State},
    http::Method,
    response::Response,
    routing::any,
};
use tracing::{debug, warn};

use crate::controllayer::views::extract::{ApiPayload, ObjectId};
use crate::controllayer::views::mixins::{
    CreateModelMixin, DestroyModelMixin, GenericApiView, ListModelMixin, RetrieveModelMixin,
    UpdateModelMixin,
};
use crate::controllayer::views::resource::{ModelResource, WritableResource};
use crate::errors::{ServiceError, ServiceResult};
use crate::state::AppState;

/// Viewset actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Create,
    Retrieve,
    Update,
    PartialUpdate,
    Destroy,
}

impl Action {
    /// Map an HTTP method on the list or detail route to an action.
    /// HEAD follows GET.
    pub fn for_request(method: &Method, detail: bool) -> Option<Action> {
        match (method, detail) {
            (&Method::GET | &Method::HEAD, false) => Some(Action::List),
            (&Method::POST, false) => Some(Action::Create),
            (&Method::GET | &Method::HEAD, true) => Some(Action::Retrieve),
            (&Method::PUT, true) => Some(Action::Update),
            (&Method::PATCH, true) => Some(Action::PartialUpdate),
            (&Method::DELETE, true) => Some(Action::Destroy),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::List => "list",
            Action::Create => "create",
            Action::Retrieve => "retrieve",
            Action::Update => "update",
            Action::PartialUpdate => "partial_update",
            Action::Destroy => "destroy",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// All six CRUD actions over one resource, routed on a list path and a
/// detail path.
pub struct ModelViewSet<R> {
    state: AppState,
    _resource: PhantomData<fn() -> R>,
}

impl<R: WritableResource> ModelViewSet<R> {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            _resource: PhantomData,
        }
    }

    /// Mount the viewset. `detail_path` must carry exactly one path parameter.
    pub fn router(list_path: &str, detail_path: &str) -> Router<AppState> {
        Router::new()
            .route(list_path, any(Self::dispatch_list))
            .route(detail_path, any(Self::dispatch_detail))
    }

    fn resolve(method: &Method, detail: bool) -> ServiceResult<Action> {
        Action::for_request(method, detail).ok_or_else(|| {
            warn!(resource = R::name(), method = %method, detail, "No viewset action for method");
            ServiceError::MethodNotAllowed(method.to_string())
        })
    }

    async fn dispatch_list(State(state): State<AppState>, request: Request) -> ServiceResult<Response> {
        let action = Self::resolve(request.method(), false)?;
        debug!(resource = R::name(), action = %action, "Dispatching viewset action");

        let view = Self::new(state);
        match action {
            Action::Create => {
                let ApiPayload(data) = ApiPayload::from_request(request, &()).await?;
                view.create(&data).await
            }
            _ => {
                let uri = request.uri().clone();
                view.list(&uri).await
            }
        }
    }

    async fn dispatch_detail(
        State(state): State<AppState>,
        ObjectId(pk): ObjectId,
        request: Request,
    ) -> ServiceResult<Response> {
        let action = Self::resolve(request.method(), true)?;
        debug!(resource = R::name(), action = %action, pk, "Dispatching viewset action");

        let view = Self::new(state);
        match action {
            Action::Update => view.update(pk, request).await,
            Action::PartialUpdate => view.partial_update(pk, request).await,
            Action::Destroy => view.destroy(pk).await,
            _ => view.retrieve(pk).await,
        }
    }
}

impl<R: WritableResource> GenericApiView for ModelViewSet<R> {
    type Resource = R;

    fn state(&self) -> &AppState {
        &self.state
    }
}

impl<R: WritableResource> ListModelMixin for ModelViewSet<R> {}
impl<R: WritableResource> CreateModelMixin for ModelViewSet<R> {}
impl<R: WritableResource> RetrieveModelMixin for ModelViewSet<R> {}
impl<R: WritableResource> UpdateModelMixin for ModelViewSet<R> {}
impl<R: WritableResource> DestroyModelMixin for ModelViewSet<R> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_route_actions() {
        assert_eq!(Action::for_request(&Method::GET, false), Some(Action::List));
        assert_eq!(Action::for_request(&Method::HEAD, false), Some(Action::List));
        assert_eq!(Action::for_request(&Method::POST, false), Some(Action::Create));
        assert_eq!(Action::for_request(&Method::PUT, false), None);
        assert_eq!(Action::for_request(&Method::DELETE, false), None);
    }

    #[test]
    fn test_detail_route_actions() {
        assert_eq!(Action::for_request(&Method::GET, true), Some(Action::Retrieve));
        assert_eq!(Action::for_request(&Method::PUT, true), Some(Action::Update));
        assert_eq!(Action::for_request(&Method::PATCH, true), Some(Action::PartialUpdate));
        assert_eq!(Action::for_request(&Method::DELETE, true), Some(Action::Destroy));
        assert_eq!(Action::for_request(&Method::POST, true), None);
    }

    #[test]
    fn test_action_names() {
        assert_eq!(Action::PartialUpdate.to_string(), "partial_update");
        assert_eq!(Action::Destroy.name(), "destroy");
    }
}
