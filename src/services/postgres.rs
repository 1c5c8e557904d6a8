use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};
use std::time::Duration;
use thiserror::Error;

use crate::config::{DatabaseSettings, SearchSettings};
use crate::core::distance::GeoConfig;
use crate::core::predicate::{render_where, Predicate, SqlParams, Value};
use crate::core::schema::{SchoolField, SchoolSchema, SchoolsTable};
use crate::models::{FilterError, GenderPolicy, OfstedRating, SchoolRecord};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid row: {0}")]
    InvalidRow(String),
}

impl From<FilterError> for RepositoryError {
    fn from(err: FilterError) -> Self {
        RepositoryError::InvalidRow(err.to_string())
    }
}

/// Executes conjoined predicates against the `schools` / `clubs` tables
#[derive(Clone)]
pub struct SchoolRepository {
    pool: PgPool,
    schools: SchoolsTable,
}

impl SchoolRepository {
    /// Wrap an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            schools: SchoolsTable::default(),
        }
    }

    /// Connect using the `database` settings section
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, RepositoryError> {
        tracing::info!(
            "Connecting to PostgreSQL (max: {} connections)",
            settings.max_connections.unwrap_or(10)
        );

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections.unwrap_or(10))
            .min_connections(settings.min_connections.unwrap_or(1))
            .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs.unwrap_or(5)))
            .idle_timeout(Duration::from_secs(settings.idle_timeout_secs.unwrap_or(600)))
            .test_before_acquire(true)
            .connect(&settings.url)
            .await?;

        Ok(Self::new(pool))
    }

    /// Query a differently named schools table. Predicates passed to
    /// [`Self::search`] must be built from the same binding.
    pub fn with_schema(mut self, schools: SchoolsTable) -> Self {
        self.schools = schools;
        self
    }

    /// Create tables and register the `haversine_km` function
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Whether `name(lat1, lng1, lat2, lng2)` taking four `double precision`
    /// arguments is callable from the connected database's search path
    pub async fn has_function(&self, name: &str) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar("SELECT to_regprocedure($1) IS NOT NULL")
            .bind(distance_signature(name))
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// Geo tuning from settings, with the exact-distance step dropped when
    /// the configured function is not registered
    pub async fn geo_config(&self, settings: &SearchSettings) -> Result<GeoConfig, RepositoryError> {
        let config = settings.geo_config();

        let Some(function) = config.haversine_function.clone() else {
            return Ok(config);
        };

        if self.has_function(&function).await? {
            Ok(config)
        } else {
            tracing::warn!(
                "SQL function {} is not registered, distance searches will use the bounding box only",
                function
            );
            Ok(config.without_haversine())
        }
    }

    /// Fetch every school satisfying all `predicates`
    pub async fn search(&self, predicates: &[Predicate]) -> Result<Vec<SchoolRecord>, RepositoryError> {
        let (sql, params) = self.select_statement(predicates);

        tracing::debug!("Executing school search: {}", sql);

        let query = params
            .values
            .into_iter()
            .fold(sqlx::query(&sql), bind_value);

        let rows = query.fetch_all(&self.pool).await?;

        let schools = rows
            .iter()
            .map(|row| self.school_from_row(row))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("School search returned {} rows", schools.len());

        Ok(schools)
    }

    /// The full `SELECT` statement issued by [`Self::search`]
    pub fn select_sql(&self, predicates: &[Predicate]) -> String {
        self.select_statement(predicates).0
    }

    fn select_statement(&self, predicates: &[Predicate]) -> (String, SqlParams) {
        let (where_clause, params) = render_where(predicates);
        let schools = &self.schools;

        let sql = format!(
            "SELECT {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}.name FROM {} WHERE {} ORDER BY {}",
            schools.urn(),
            schools.council(),
            schools.age_range_from(),
            schools.age_range_to(),
            schools.gender_policy(),
            schools.school_type(),
            schools.ofsted_rating(),
            schools.faith(),
            schools.is_private(),
            schools.lat(),
            schools.lng(),
            schools.table(),
            schools.table(),
            where_clause,
            schools.urn(),
        );

        (sql, params)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, RepositoryError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    fn school_from_row(&self, row: &PgRow) -> Result<SchoolRecord, RepositoryError> {
        let col = |field: SchoolField| self.schools.column_name(field);

        let ofsted_rating = row
            .try_get::<Option<i16>, _>(col(SchoolField::OfstedRating))?
            .map(|rating| OfstedRating::try_from(i64::from(rating)))
            .transpose()?;

        Ok(SchoolRecord {
            urn: row.try_get(col(SchoolField::Urn))?,
            name: row.try_get("name")?,
            council: row.try_get(col(SchoolField::Council))?,
            age_range_from: row.try_get(col(SchoolField::AgeRangeFrom))?,
            age_range_to: row.try_get(col(SchoolField::AgeRangeTo))?,
            gender_policy: GenderPolicy::from(row.try_get::<String, _>(col(SchoolField::GenderPolicy))?),
            school_type: row.try_get(col(SchoolField::SchoolType))?,
            ofsted_rating,
            faith: row.try_get(col(SchoolField::Faith))?,
            is_private: row.try_get(col(SchoolField::IsPrivate))?,
            lat: row.try_get(col(SchoolField::Lat))?,
            lng: row.try_get(col(SchoolField::Lng))?,
        })
    }
}

fn distance_signature(name: &str) -> String {
    format!("{}(double precision,double precision,double precision,double precision)", name)
}

fn bind_value<'q>(query: Query<'q, Postgres, PgArguments>, value: Value) -> Query<'q, Postgres, PgArguments> {
    match value {
        Value::Text(text) => query.bind(text),
        Value::Int(int) => query.bind(int),
        Value::Float(float) => query.bind(float),
        Value::Bool(flag) => query.bind(flag),
    }
}
