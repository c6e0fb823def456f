//! Postgres-backed car repository.
//!
//! ## Error Mapping
//!
//! | SQLx Error | RepositoryError |
//! |------------|-----------------|
//! | Database | `Database` |
//! | PoolClosed / PoolTimedOut / Io / Tls | `Unavailable` |
//! | ColumnDecode / Decode / ColumnNotFound | `Corrupt` |
//! | Other | `Database` |

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool, Row};
use tracing::{Span, instrument};

use carhub_core::{Car, CarId};

use super::r#trait::{CarRepository, RepositoryError, RepositoryResult};

const SELECT_COLUMNS: &str = "id, manufacturer, model, cc, doors, color, release_date";

/// Postgres-backed car repository.
///
/// Identifiers come from the `BIGSERIAL` sequence on `cars.id`, which never
/// hands out the same value twice.
///
/// ## Thread Safety
///
/// Uses the SQLx connection pool, which is cheap to clone and `Send + Sync`.
#[derive(Debug, Clone)]
pub struct PostgresCarRepository {
    pool: PgPool,
}

impl PostgresCarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> RepositoryResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the `cars` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cars (
                id BIGSERIAL PRIMARY KEY,
                manufacturer TEXT,
                model TEXT,
                cc DOUBLE PRECISION,
                doors INTEGER,
                color TEXT,
                release_date DATE
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS cars_doors_idx ON cars (doors)")
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;

        Ok(())
    }

    async fn insert(&self, car: &Car) -> RepositoryResult<Car> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO cars (manufacturer, model, cc, doors, color, release_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(&car.manufacturer)
        .bind(&car.model)
        .bind(car.cc)
        .bind(car.doors)
        .bind(&car.color)
        .bind(car.release_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;

        decode(&row)
    }

    async fn update(&self, id: CarId, car: &Car) -> RepositoryResult<Option<Car>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE cars
            SET manufacturer = $2,
                model = $3,
                cc = $4,
                doors = $5,
                color = $6,
                release_date = $7
            WHERE id = $1
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(id.get())
        .bind(&car.manufacturer)
        .bind(&car.model)
        .bind(car.cc)
        .bind(car.doors)
        .bind(&car.color)
        .bind(car.release_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        row.as_ref().map(decode).transpose()
    }
}

#[async_trait]
impl CarRepository for PostgresCarRepository {
    #[instrument(skip(self), fields(row_count = tracing::field::Empty), err)]
    async fn find_all(&self) -> RepositoryResult<Vec<Car>> {
        let rows = sqlx::query(&format!("SELECT {SELECT_COLUMNS} FROM cars ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_all", e))?;

        Span::current().record("row_count", rows.len());
        rows.iter().map(decode).collect()
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn find_by_id(&self, id: CarId) -> RepositoryResult<Option<Car>> {
        let row = sqlx::query(&format!("SELECT {SELECT_COLUMNS} FROM cars WHERE id = $1"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.as_ref().map(decode).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_by_doors(&self, doors: i32) -> RepositoryResult<Vec<Car>> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM cars WHERE doors = $1 ORDER BY id ASC"
        ))
        .bind(doors)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_doors", e))?;

        rows.iter().map(decode).collect()
    }

    #[instrument(skip(self, car), fields(id = ?car.id), err)]
    async fn save(&self, car: Car) -> RepositoryResult<Car> {
        match car.id {
            Some(id) => match self.update(id, &car).await? {
                Some(saved) => Ok(saved),
                None => {
                    tracing::debug!(%id, "save with unknown id; inserting as new record");
                    self.insert(&car).await
                }
            },
            None => self.insert(&car).await,
        }
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn delete_by_id(&self, id: CarId) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_by_id", e))?;

        if result.rows_affected() == 0 {
            tracing::debug!(%id, "delete of unknown id");
        }
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn delete_all(&self) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM cars")
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_all", e))?;
        Ok(())
    }
}

/// Map SQLx errors to RepositoryError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => RepositoryError::Database(format!(
            "database error in {}: {}",
            operation,
            db_err.message()
        )),
        sqlx::Error::PoolClosed
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => {
            RepositoryError::Unavailable(format!("{} in {}", err, operation))
        }
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::ColumnNotFound(_) => {
            RepositoryError::Corrupt(format!("{} in {}", err, operation))
        }
        _ => RepositoryError::Database(format!("sqlx error in {}: {}", operation, err)),
    }
}

fn decode(row: &PgRow) -> RepositoryResult<Car> {
    CarRow::from_row(row)
        .map(Car::from)
        .map_err(|e| map_sqlx_error("decode", e))
}

// SQLx row types

#[derive(Debug)]
struct CarRow {
    id: i64,
    manufacturer: Option<String>,
    model: Option<String>,
    cc: Option<f64>,
    doors: Option<i32>,
    color: Option<String>,
    release_date: Option<NaiveDate>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for CarRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(CarRow {
            id: row.try_get("id")?,
            manufacturer: row.try_get("manufacturer")?,
            model: row.try_get("model")?,
            cc: row.try_get("cc")?,
            doors: row.try_get("doors")?,
            color: row.try_get("color")?,
            release_date: row.try_get("release_date")?,
        })
    }
}

impl From<CarRow> for Car {
    fn from(row: CarRow) -> Self {
        Car {
            id: Some(CarId::new(row.id)),
            manufacturer: row.manufacturer,
            model: row.model,
            cc: row.cc,
            doors: row.doors,
            color: row.color,
            release_date: row.release_date,
        }
    }
}
