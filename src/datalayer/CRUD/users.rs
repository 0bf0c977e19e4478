use async_trait::async_trait;
use sea_query::Order;
use sqlx::{FromRow, PgPool, Postgres};
use std::sync::Arc;
use tracing::{error, instrument};

use crate::datalayer::CRUD::sql_generator::sql_generator::{
    FluentInsert, FluentSelect, bind_query,
};
use crate::datalayer::CRUD::store::UserStore;
use crate::datalayer::CRUD::types::{NewUser, User, Users};
use crate::errors::{ServiceError, ServiceResult};

/// Postgres SQLSTATE for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL-backed user store
#[derive(Clone)]
pub struct PgUserStore {
    pool: Arc<PgPool>,
}

impl PgUserStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    #[instrument(skip(self), fields(service = "PgUserStore"))]
    async fn list(&self) -> ServiceResult<Vec<User>> {
        let (sql, values) = FluentSelect::from(Users::Table)
            .order_by(Users::Id, Order::Asc)
            .render();
        let query = bind_query(sqlx::query::<Postgres>(&sql), values);

        let rows = query.fetch_all(&*self.pool).await.map_err(|e| {
            error!(error = %e, "Failed to list users");
            ServiceError::from(e)
        })?;

        rows.iter()
            .map(|row| User::from_row(row).map_err(|e| ServiceError::DatabaseError(e.to_string())))
            .collect()
    }

    #[instrument(skip(self), fields(service = "PgUserStore"))]
    async fn find_by_username(&self, username: &str) -> ServiceResult<Option<User>> {
        let (sql, values) = FluentSelect::from(Users::Table)
            .filter(Users::Username, username)
            .limit(1)
            .render();
        let query = bind_query(sqlx::query::<Postgres>(&sql), values);

        let row = query.fetch_optional(&*self.pool).await.map_err(|e| {
            error!(error = %e, "Failed to look up user");
            ServiceError::from(e)
        })?;

        row.map(|row| User::from_row(&row).map_err(|e| ServiceError::DatabaseError(e.to_string())))
            .transpose()
    }

    #[instrument(skip(self, user), fields(service = "PgUserStore", username = %user.username))]
    async fn create(&self, user: NewUser) -> ServiceResult<User> {
        let username = user.username.clone();
        let (sql, values) = FluentInsert::into(Users::Table)
            .value(Users::Username, user.username)
            .value(Users::Email, user.email)
            .value(Users::FirstName, user.first_name)
            .value(Users::LastName, user.last_name)
            .value(Users::Password, user.password)
            .value(Users::IsActive, user.is_active)
            .value(Users::IsStaff, user.is_staff)
            .value(Users::DateJoined, chrono::Utc::now())
            .returning_all()
            .render();
        let query = bind_query(sqlx::query::<Postgres>(&sql), values);

        let row = query.fetch_one(&*self.pool).await.map_err(|e| {
            let duplicate = matches!(
                &e,
                sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
            );
            if duplicate {
                ServiceError::UserAlreadyExists(username.clone())
            } else {
                error!(error = %e, "Failed to create user");
                ServiceError::from(e)
            }
        })?;

        User::from_row(&row).map_err(|e| ServiceError::DatabaseError(e.to_string()))
    }
}
