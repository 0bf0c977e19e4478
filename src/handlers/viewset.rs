use axum::Router;

use crate::controllayer::views::{ModelViewSet, TodoResource};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    ModelViewSet::<TodoResource>::router("/api/viewset/todos", "/api/viewset/todos/:pk")
}
