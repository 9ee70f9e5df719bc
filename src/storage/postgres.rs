//! PostgreSQL-backed shipment store.

use crate::domain::{
    ListFilter, ListRequest, ResultPage, ShipmentId, ShipmentRecord, ShipmentStatus,
    ShipmentWrite,
};
use crate::storage::{ShipmentStore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

const TABLE: &str = "shipments";

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS shipments (
    id BIGSERIAL PRIMARY KEY,
    title TEXT NOT NULL CHECK (length(btrim(title)) > 0),
    status TEXT NOT NULL DEFAULT 'PENDING'
        CHECK (status IN ('PENDING', 'IN_TRANSIT', 'DELIVERED', 'FAILED')),
    is_fragile BOOLEAN NOT NULL DEFAULT FALSE,
    weight_kg DOUBLE PRECISION NOT NULL CHECK (weight_kg >= 0),
    distance_km DOUBLE PRECISION NOT NULL CHECK (distance_km >= 0),
    shipping_cost DOUBLE PRECISION NOT NULL CHECK (shipping_cost >= 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)";

pub struct PostgresShipmentStore {
    pool: PgPool,
}

impl PostgresShipmentStore {
    /// Connects and makes sure the `shipments` table exists.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        let store = Self::from_pool(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        sqlx::query(CREATE_TABLE_SQL).execute(&self.pool).await?;
        Ok(())
    }
}

/// Escapes `%`, `_` and `\` so a search term matches literally inside an ILIKE pattern.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ListFilter) {
    let mut joiner = " WHERE ";

    if let Some(status) = filter.status {
        qb.push(joiner).push("status = ").push_bind(status.as_str());
        joiner = " AND ";
    }
    if let Some(term) = &filter.title_contains {
        qb.push(joiner)
            .push("title ILIKE ")
            .push_bind(like_pattern(term))
            .push(" ESCAPE '\\'");
    }
}

fn map_sqlx(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db) => StoreError::Rejected(db.message().to_string()),
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StoreError::Decode(err.to_string()),
        other => StoreError::Transport(other.to_string()),
    }
}

fn record_from_row(row: &PgRow) -> Result<ShipmentRecord, StoreError> {
    let status: String = row.try_get("status").map_err(map_sqlx)?;
    Ok(ShipmentRecord {
        id: ShipmentId(row.try_get("id").map_err(map_sqlx)?),
        title: row.try_get("title").map_err(map_sqlx)?,
        status: status
            .parse::<ShipmentStatus>()
            .map_err(|e| StoreError::Decode(e.to_string()))?,
        is_fragile: row.try_get("is_fragile").map_err(map_sqlx)?,
        weight_kg: row.try_get("weight_kg").map_err(map_sqlx)?,
        distance_km: row.try_get("distance_km").map_err(map_sqlx)?,
        shipping_cost: row.try_get("shipping_cost").map_err(map_sqlx)?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(map_sqlx)?,
    })
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl ShipmentStore for PostgresShipmentStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn list(&self, request: &ListRequest) -> Result<ResultPage, StoreError> {
        let direction = if request.sort.direction.is_ascending() {
            "ASC"
        } else {
            "DESC"
        };

        let mut rows_qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT id, title, status, is_fragile, weight_kg, distance_km, shipping_cost, created_at FROM ",
        );
        rows_qb.push(TABLE);
        push_filters(&mut rows_qb, &request.filter);
        rows_qb
            .push(" ORDER BY ")
            .push(request.sort.column.column_name())
            .push(" ")
            .push(direction)
            .push(", id ")
            .push(direction)
            .push(" OFFSET ")
            .push_bind(to_i64(request.offset))
            .push(" LIMIT ")
            .push_bind(to_i64(request.limit));

        let mut count_qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM ");
        count_qb.push(TABLE);
        push_filters(&mut count_qb, &request.filter);

        let (rows, count_row) = tokio::try_join!(
            rows_qb.build().fetch_all(&self.pool),
            count_qb.build().fetch_one(&self.pool),
        )
        .map_err(map_sqlx)?;

        let total: i64 = count_row.try_get(0).map_err(map_sqlx)?;
        let records = rows
            .iter()
            .map(record_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ResultPage {
            records,
            total_count: total.max(0) as u64,
        })
    }

    async fn insert(&self, row: &ShipmentWrite) -> Result<ShipmentId, StoreError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO shipments (title, status, is_fragile, weight_kg, distance_km, shipping_cost)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(row.title())
        .bind(row.status().as_str())
        .bind(row.is_fragile())
        .bind(row.weight_kg())
        .bind(row.distance_km())
        .bind(row.shipping_cost())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(ShipmentId(id))
    }

    async fn update(&self, id: ShipmentId, row: &ShipmentWrite) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE shipments
             SET title = $1, status = $2, is_fragile = $3,
                 weight_kg = $4, distance_km = $5, shipping_cost = $6
             WHERE id = $7",
        )
        .bind(row.title())
        .bind(row.status().as_str())
        .bind(row.is_fragile())
        .bind(row.weight_kg())
        .bind(row.distance_km())
        .bind(row.shipping_cost())
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn delete(&self, id: ShipmentId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM shipments WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
