use async_trait::async_trait;
use sea_query::Order;
use sqlx::{FromRow, PgPool, Postgres};
use std::sync::Arc;
use tracing::{error, instrument};

use crate::datalayer::CRUD::sql_generator::sql_generator::{
    FluentDelete, FluentInsert, FluentSelect, FluentUpdate, bind_query,
};
use crate::datalayer::CRUD::store::TodoStore;
use crate::datalayer::CRUD::types::{NewTodo, Todo, TodoChanges, Todos};
use crate::errors::{ServiceError, ServiceResult};

/// PostgreSQL-backed todo store
#[derive(Clone)]
pub struct PgTodoStore {
    pool: Arc<PgPool>,
}

impl PgTodoStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn fetch_one(&self, rendered: (String, sea_query::Values), id: i64) -> ServiceResult<Todo> {
        let (sql, values) = rendered;
        let query = bind_query(sqlx::query::<Postgres>(&sql), values);

        let row = query.fetch_one(&*self.pool).await.map_err(|e| match e {
            sqlx::Error::RowNotFound => ServiceError::TodoNotFound(id),
            other => {
                error!(error = %other, todo_id = id, "Todo query failed");
                ServiceError::from(other)
            }
        })?;

        Todo::from_row(&row).map_err(|e| ServiceError::DatabaseError(e.to_string()))
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    #[instrument(skip(self), fields(service = "PgTodoStore"))]
    async fn list(&self) -> ServiceResult<Vec<Todo>> {
        let (sql, values) = FluentSelect::from(Todos::Table)
            .order_by(Todos::Priority, Order::Asc)
            .order_by(Todos::Id, Order::Asc)
            .render();
        let query = bind_query(sqlx::query::<Postgres>(&sql), values);

        let rows = query.fetch_all(&*self.pool).await.map_err(|e| {
            error!(error = %e, "Failed to list todos");
            ServiceError::from(e)
        })?;

        rows.iter()
            .map(|row| Todo::from_row(row).map_err(|e| ServiceError::DatabaseError(e.to_string())))
            .collect()
    }

    #[instrument(skip(self), fields(service = "PgTodoStore"))]
    async fn get(&self, id: i64) -> ServiceResult<Todo> {
        let rendered = FluentSelect::from(Todos::Table)
            .filter(Todos::Id, id)
            .render();
        self.fetch_one(rendered, id).await
    }

    #[instrument(skip(self, todo), fields(service = "PgTodoStore"))]
    async fn insert(&self, todo: NewTodo) -> ServiceResult<Todo> {
        let now = chrono::Utc::now();
        let (sql, values) = FluentInsert::into(Todos::Table)
            .value(Todos::Title, todo.title)
            .value(Todos::Content, todo.content)
            .value(Todos::Priority, todo.priority)
            .value(Todos::IsDone, todo.is_done)
            .value(Todos::CreatedAt, now)
            .value(Todos::UpdatedAt, now)
            .returning_all()
            .render();
        let query = bind_query(sqlx::query::<Postgres>(&sql), values);

        let row = query.fetch_one(&*self.pool).await.map_err(|e| {
            error!(error = %e, "Failed to insert todo");
            ServiceError::from(e)
        })?;

        Todo::from_row(&row).map_err(|e| ServiceError::DatabaseError(e.to_string()))
    }

    #[instrument(skip(self, changes), fields(service = "PgTodoStore"))]
    async fn update(&self, id: i64, changes: TodoChanges) -> ServiceResult<Todo> {
        let rendered = FluentUpdate::table(Todos::Table)
            .value(Todos::Title, changes.title)
            .value(Todos::Content, changes.content)
            .value(Todos::Priority, changes.priority)
            .value(Todos::IsDone, changes.is_done)
            .value(Todos::UpdatedAt, chrono::Utc::now())
            .filter(Todos::Id, id)
            .returning_all()
            .render();
        self.fetch_one(rendered, id).await
    }

    #[instrument(skip(self), fields(service = "PgTodoStore"))]
    async fn delete(&self, id: i64) -> ServiceResult<()> {
        let (sql, values) = FluentDelete::from(Todos::Table)
            .filter(Todos::Id, id)
            .render();
        let query = bind_query(sqlx::query::<Postgres>(&sql), values);

        let result = query.execute(&*self.pool).await.map_err(|e| {
            error!(error = %e, todo_id = id, "Failed to delete todo");
            ServiceError::from(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::TodoNotFound(id));
        }
        Ok(())
    }

    async fn ping(&self) -> ServiceResult<()> {
        sqlx::query("SELECT 1")
            .execute(&*self.pool)
            .await
            .map(|_| ())
            .map_err(ServiceError::from)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
