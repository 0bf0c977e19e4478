use sea_query::{Alias, Asterisk, Expr, Iden, Order, PostgresQueryBuilder, Query, Value};

/* ----------------------------- FLUENT BUILDER WRAPPER ----------------------------- */

// NULL values are skipped so optional builder inputs never overwrite columns
fn is_value_none(val: &Value) -> bool {
    matches!(
        val,
        Value::Bool(None)
            | Value::TinyInt(None)
            | Value::SmallInt(None)
            | Value::Int(None)
            | Value::BigInt(None)
            | Value::TinyUnsigned(None)
            | Value::SmallUnsigned(None)
            | Value::Unsigned(None)
            | Value::BigUnsigned(None)
            | Value::Float(None)
            | Value::Double(None)
            | Value::String(None)
            | Value::Char(None)
            | Value::Bytes(None)
            | Value::Json(None)
            | Value::ChronoDate(None)
            | Value::ChronoTime(None)
            | Value::ChronoDateTime(None)
            | Value::ChronoDateTimeUtc(None)
            | Value::ChronoDateTimeLocal(None)
            | Value::ChronoDateTimeWithTimeZone(None)
            | Value::Uuid(None)
    )
}

/// RETURNING clause shared by insert, update and delete
#[derive(Default)]
enum Returning {
    #[default]
    Nothing,
    All,
    Columns(Vec<Alias>),
}

impl Returning {
    fn push(&mut self, col: Alias) {
        match self {
            Returning::Columns(cols) => cols.push(col),
            Returning::All => {}
            Returning::Nothing => *self = Returning::Columns(vec![col]),
        }
    }

    fn clause(self) -> Option<sea_query::ReturningClause> {
        match self {
            Returning::Nothing => None,
            Returning::All => Some(Query::returning().all()),
            Returning::Columns(cols) => Some(Query::returning().columns(cols)),
        }
    }
}

// --- INSERT ---

pub struct FluentInsert {
    table: Alias,
    values: Vec<(Alias, Value)>,
    returning: Returning,
}

impl FluentInsert {
    pub fn into<T: Iden>(table: T) -> Self {
        Self {
            table: Alias::new(table.to_string()),
            values: vec![],
            returning: Returning::Nothing,
        }
    }

    pub fn value<C: Iden, V: Into<Value>>(mut self, col: C, v: V) -> Self {
        let val: Value = v.into();
        if !is_value_none(&val) {
            self.values.push((Alias::new(col.to_string()), val));
        }
        self
    }

    pub fn returning<C: Iden>(mut self, col: C) -> Self {
        self.returning.push(Alias::new(col.to_string()));
        self
    }

    pub fn returning_all(mut self) -> Self {
        self.returning = Returning::All;
        self
    }

    pub fn render(self) -> (String, sea_query::Values) {
        let mut query = Query::insert();
        query.into_table(self.table);

        let (cols, vals): (Vec<Alias>, Vec<Value>) = self.values.into_iter().unzip();

        query.columns(cols);
        query.values_panic(vals.into_iter().map(sea_query::SimpleExpr::Value));

        if let Some(clause) = self.returning.clause() {
            query.returning(clause);
        }

        query.build(PostgresQueryBuilder)
    }
}

// --- SELECT ---

pub struct FluentSelect {
    table: Alias,
    columns: Vec<Alias>,
    filters: Vec<(Alias, Value)>,
    limit: Option<u64>,
    offset: Option<u64>,
    order_by: Vec<(Alias, Order)>,
}

impl FluentSelect {
    pub fn from<T: Iden>(table: T) -> Self {
        Self {
            table: Alias::new(table.to_string()),
            columns: vec![],
            filters: vec![],
            limit: None,
            offset: None,
            order_by: vec![],
        }
    }

    pub fn column<C: Iden>(mut self, col: C) -> Self {
        self.columns.push(Alias::new(col.to_string()));
        self
    }

    pub fn filter<C: Iden, V: Into<Value>>(mut self, col: C, v: V) -> Self {
        let val: Value = v.into();
        if !is_value_none(&val) {
            self.filters.push((Alias::new(col.to_string()), val));
        }
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Append an ORDER BY key; keys apply in the order they were added
    pub fn order_by<C: Iden>(mut self, col: C, order: Order) -> Self {
        self.order_by.push((Alias::new(col.to_string()), order));
        self
    }

    pub fn render(self) -> (String, sea_query::Values) {
        let mut query = Query::select();
        query.from(self.table);

        if self.columns.is_empty() {
            query.column(Asterisk);
        } else {
            query.columns(self.columns);
        }

        for (col, val) in self.filters {
            query.and_where(Expr::col(col).eq(val));
        }

        for (col, order) in self.order_by {
            query.order_by(col, order);
        }

        if let Some(l) = self.limit {
            query.limit(l);
        }

        if let Some(o) = self.offset {
            query.offset(o);
        }

        query.build(PostgresQueryBuilder)
    }
}

// --- UPDATE ---

pub struct FluentUpdate {
    table: Alias,
    values: Vec<(Alias, Value)>,
    filters: Vec<(Alias, Value)>,
    returning: Returning,
}

impl FluentUpdate {
    pub fn table<T: Iden>(table: T) -> Self {
        Self {
            table: Alias::new(table.to_string()),
            values: vec![],
            filters: vec![],
            returning: Returning::Nothing,
        }
    }

    pub fn value<C: Iden, V: Into<Value>>(mut self, col: C, v: V) -> Self {
        let val: Value = v.into();
        if !is_value_none(&val) {
            self.values.push((Alias::new(col.to_string()), val));
        }
        self
    }

    pub fn filter<C: Iden, V: Into<Value>>(mut self, col: C, v: V) -> Self {
        let val: Value = v.into();
        if !is_value_none(&val) {
            self.filters.push((Alias::new(col.to_string()), val));
        }
        self
    }

    pub fn returning_all(mut self) -> Self {
        self.returning = Returning::All;
        self
    }

    pub fn render(self) -> (String, sea_query::Values) {
        let mut query = Query::update();
        query.table(self.table);

        query.values(
            self.values
                .into_iter()
                .map(|(col, val)| (col, sea_query::SimpleExpr::Value(val))),
        );

        for (col, val) in self.filters {
            query.and_where(Expr::col(col).eq(val));
        }

        if let Some(clause) = self.returning.clause() {
            query.returning(clause);
        }

        query.build(PostgresQueryBuilder)
    }
}

// --- DELETE ---

pub struct FluentDelete {
    table: Alias,
    filters: Vec<(Alias, Value)>,
}

impl FluentDelete {
    pub fn from<T: Iden>(table: T) -> Self {
        Self {
            table: Alias::new(table.to_string()),
            filters: vec![],
        }
    }

    pub fn filter<C: Iden, V: Into<Value>>(mut self, col: C, v: V) -> Self {
        let val: Value = v.into();
        if !is_value_none(&val) {
            self.filters.push((Alias::new(col.to_string()), val));
        }
        self
    }

    pub fn render(self) -> (String, sea_query::Values) {
        let mut query = Query::delete();
        query.from_table(self.table);

        for (col, val) in self.filters {
            query.and_where(Expr::col(col).eq(val));
        }

        query.build(PostgresQueryBuilder)
    }
}

/* ----------------------------- SQLX BINDING ----------------------------- */

/// Bind rendered sea-query values onto a sqlx query, in placeholder order
#[cfg(feature = "sqlx")]
pub fn bind_query(
    mut query: sqlx::query::Query<'_, sqlx::Postgres, sqlx::postgres::PgArguments>,
    values: sea_query::Values,
) -> sqlx::query::Query<'_, sqlx::Postgres, sqlx::postgres::PgArguments> {
    for value in values.0 {
        query = match value {
            Value::Bool(v) => query.bind(v),
            Value::TinyInt(v) => query.bind(v.map(|x| x as i16)),
            Value::SmallInt(v) => query.bind(v),
            Value::Int(v) => query.bind(v),
            Value::BigInt(v) => query.bind(v),
            Value::TinyUnsigned(v) => query.bind(v.map(|x| x as i16)),
            Value::SmallUnsigned(v) => query.bind(v.map(|x| x as i32)),
            Value::Unsigned(v) => query.bind(v.map(|x| x as i64)),
            Value::BigUnsigned(v) => query.bind(v.map(|x| x as i64)),
            Value::Float(v) => query.bind(v),
            Value::Double(v) => query.bind(v),
            Value::String(v) => query.bind(v.map(|s| *s)),
            Value::Char(v) => query.bind(v.map(|c| c.to_string())),
            Value::Bytes(v) => query.bind(v.map(|b| *b)),
            Value::Uuid(v) => query.bind(v.map(|u| *u)),
            Value::Json(v) => query.bind(v.map(|j| *j)),
            Value::ChronoDate(v) => query.bind(v.map(|d| *d)),
            Value::ChronoTime(v) => query.bind(v.map(|t| *t)),
            Value::ChronoDateTime(v) => query.bind(v.map(|dt| *dt)),
            Value::ChronoDateTimeUtc(v) => query.bind(v.map(|dt| *dt)),
            Value::ChronoDateTimeLocal(v) => query.bind(v.map(|dt| *dt)),
            Value::ChronoDateTimeWithTimeZone(v) => query.bind(v.map(|dt| *dt)),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datalayer::CRUD::types::{Todos, Users};

    #[test]
    fn test_fluent_insert_returning_all() {
        let now = chrono::Utc::now();
        let (sql, values) = FluentInsert::into(Todos::Table)
            .value(Todos::Title, "buy milk")
            .value(Todos::Content, "")
            .value(Todos::Priority, 2)
            .value(Todos::IsDone, false)
            .value(Todos::CreatedAt, now)
            .value(Todos::UpdatedAt, now)
            .returning_all()
            .render();

        assert!(sql.starts_with("INSERT INTO \"todos\""));
        assert!(sql.contains("\"title\", \"content\", \"priority\", \"is_done\""));
        assert!(sql.ends_with("RETURNING *"));
        assert_eq!(values.0.len(), 6);
    }

    #[test]
    fn test_fluent_insert_skips_none() {
        let (sql, _) = FluentInsert::into(Users::Table)
            .value(Users::Username, "alice")
            .value(Users::Email, Option::<String>::None)
            .returning(Users::Id)
            .render();

        assert!(!sql.contains("\"email\""));
        assert!(sql.contains("\"username\""));
        assert!(sql.contains("RETURNING \"id\""));
    }

    #[test]
    fn test_fluent_select_star_with_ordering() {
        let (sql, values) = FluentSelect::from(Todos::Table)
            .order_by(Todos::Priority, Order::Asc)
            .order_by(Todos::Id, Order::Asc)
            .render();

        assert_eq!(
            sql,
            "SELECT * FROM \"todos\" ORDER BY \"priority\" ASC, \"id\" ASC"
        );
        assert!(values.0.is_empty());
    }

    #[test]
    fn test_fluent_select_filter_and_limit() {
        let (sql, _) = FluentSelect::from(Users::Table)
            .filter(Users::Username, "alice")
            .limit(1)
            .render();

        assert!(sql.starts_with("SELECT * FROM \"users\""));
        assert!(sql.contains("WHERE \"username\" = $1"));
        assert!(sql.contains("LIMIT $2"));
    }

    #[test]
    fn test_fluent_update_only_set_values() {
        let (sql, values) = FluentUpdate::table(Todos::Table)
            .value(Todos::Title, Some("renamed".to_string()))
            .value(Todos::Priority, Option::<i32>::None)
            .filter(Todos::Id, 7i64)
            .returning_all()
            .render();

        assert!(sql.starts_with("UPDATE \"todos\" SET \"title\" = $1"));
        assert!(!sql.contains("\"priority\""));
        assert!(sql.contains("WHERE \"id\" = $2"));
        assert!(sql.ends_with("RETURNING *"));
        assert_eq!(values.0.len(), 2);
    }

    #[test]
    fn test_fluent_delete_by_id() {
        let (sql, values) = FluentDelete::from(Todos::Table)
            .filter(Todos::Id, 3i64)
            .render();

        assert_eq!(sql, "DELETE FROM \"todos\" WHERE \"id\" = $1");
        assert_eq!(values.0.len(), 1);
    }
}
