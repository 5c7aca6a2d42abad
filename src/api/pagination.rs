use serde::Serialize;

use crate::api::error;

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

/// Page envelope returned by every list endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

impl<T: Serialize> Page<T> {
    pub fn new(items: Vec<T>, total: i64, page: &PageRequest) -> Self {
        Self { items, total, offset: page.offset, limit: page.limit }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Sort key resolved against an allow-list, safe to interpolate into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: &'static str,
    pub direction: SortDirection,
}

impl Sort {
    /// Parses `field` or `field:asc|desc`. `allowed` maps public field names to
    /// SQL columns.
    pub fn parse(
        raw: Option<&str>,
        allowed: &[(&str, &'static str)],
        default: Sort,
    ) -> Result<Sort, error::SystemError> {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(default);
        };

        let (field, direction) = match raw.split_once(':') {
            Some((field, dir)) => (field, dir),
            None => (raw, "asc"),
        };

        let direction = match direction.to_ascii_lowercase().as_str() {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            other => {
                return Err(error::SystemError::bad_request(format!(
                    "Invalid sort direction '{other}'"
                )))
            }
        };

        let column = allowed
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
            .ok_or_else(|| {
                error::SystemError::bad_request(format!("Cannot sort by '{field}'"))
            })?;

        Ok(Sort { column, direction })
    }

    pub fn to_sql(&self) -> String {
        format!("{} {}", self.column, self.direction.as_sql())
    }
}

/// Normalised offset/limit/sort handed to repositories.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub offset: i64,
    pub limit: i64,
    pub sort: Sort,
}

impl PageRequest {
    pub fn new(offset: Option<i64>, limit: Option<i64>, sort: Sort) -> Self {
        Self {
            offset: offset.unwrap_or(0).max(0),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            sort,
        }
    }
}

/// Opens a REPEATABLE READ transaction so a page and its total count see the
/// same snapshot.
pub async fn begin_snapshot(
    pool: &sqlx::PgPool,
) -> Result<sqlx::Transaction<'static, sqlx::Postgres>, error::SystemError> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
        .execute(&mut *tx)
        .await?;
    Ok(tx)
}
