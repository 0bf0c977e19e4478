use tracing::{info, instrument};

use crate::controllayer::users::serializer::{CreateUserRequest, UserSerializer};
use crate::datalayer::CRUD::store::UserStore;
use crate::datalayer::CRUD::types::User;
use crate::errors::ServiceResult;
use crate::state::AppState;

/// All users ordered by id
#[instrument(skip(store))]
pub async fn list_users(store: &dyn UserStore) -> ServiceResult<Vec<User>> {
    let users = store.list().await?;
    info!(count = users.len(), "Listed users");
    Ok(users)
}

#[instrument(skip(store, request), fields(username = %request.username))]
pub async fn create_user(store: &dyn UserStore, request: CreateUserRequest) -> ServiceResult<User> {
    let new_user = UserSerializer::validate_create(request)?;
    let user = store.create(new_user).await?;
    info!(user_id = user.id, is_staff = user.is_staff, "User created");
    Ok(user)
}

/// Create the configured administrator unless that username already exists.
/// Returns the new user, or `None` when nothing was created.
#[instrument(skip(state))]
pub async fn bootstrap_admin(state: &AppState) -> ServiceResult<Option<User>> {
    let Some(admin) = state.settings.admin.as_ref() else {
        return Ok(None);
    };

    if state.users.find_by_username(&admin.username).await?.is_some() {
        info!(username = %admin.username, "Admin user already present");
        return Ok(None);
    }

    let request = CreateUserRequest {
        username: admin.username.clone(),
        email: Some(admin.email.clone()),
        first_name: String::new(),
        last_name: String::new(),
        password: admin.password.clone(),
        is_staff: true,
    };

    create_user(state.users.as_ref(), request).await.map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiSettings, StorageBackend};
    use crate::datalayer::CRUD::helper::password::check_password;

    fn settings() -> ApiSettings {
        ApiSettings::new()
            .set_storage(StorageBackend::Memory)
            .set_admin("admin", "changeme", "admin@example.com")
    }

    #[tokio::test]
    async fn test_bootstrap_admin_is_idempotent() {
        let state = AppState::in_memory(settings());

        let created = bootstrap_admin(&state).await.unwrap().unwrap();
        assert!(created.is_staff);
        assert!(check_password("changeme", &created.password));

        assert!(bootstrap_admin(&state).await.unwrap().is_none());
        assert_eq!(list_users(state.users.as_ref()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bootstrap_without_admin_does_nothing() {
        let state = AppState::in_memory(settings().without_admin());
        assert!(bootstrap_admin(&state).await.unwrap().is_none());
        assert!(list_users(state.users.as_ref()).await.unwrap().is_empty());
    }
}
