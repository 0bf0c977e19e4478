use axum::Router;

use crate::controllayer::views::{ListApiView, Permission, UserResource};
use crate::state::AppState;

/// GET /api/users
/// Every user account ordered by id, without pagination
pub fn routes(state: &AppState) -> Router<AppState> {
    ListApiView::<UserResource>::router("/api/users", Permission::AllowAny, state)
}
