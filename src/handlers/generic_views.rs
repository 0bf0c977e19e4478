use axum::Router;

use crate::controllayer::views::{
    ListCreateApiView, Permission, RetrieveUpdateDestroyApiView, TodoResource,
};
use crate::state::AppState;

/// Paginated collection open to anyone; the item endpoint needs Basic credentials
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(ListCreateApiView::<TodoResource>::router(
            "/api/generics/todos",
            Permission::AllowAny,
            state,
        ))
        .merge(RetrieveUpdateDestroyApiView::<TodoResource>::router(
            "/api/generics/todos/:pk",
            Permission::IsAuthenticated,
            state,
        ))
}
