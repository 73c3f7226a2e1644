//! SurrealDB implementation of [`UserRepository`].
//!
//! Passport uniqueness is enforced by the `idx_user_passport` UNIQUE
//! index; a rejected insert is reported as
//! [`WorklogError::UserAlreadyExists`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;
use worklog_core::error::{WorklogError, WorklogResult};
use worklog_core::models::user::{CreateUser, User, UserFilter};
use worklog_core::repository::{PaginatedResult, Pagination, UserRepository};

use crate::error::{DbError, is_index_violation, is_write_conflict};

const PASSPORT_INDEX: &str = "idx_user_passport";

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct UserRow {
    surname: String,
    name: String,
    patronymic: String,
    address: String,
    passport_serie: u32,
    passport_number: u32,
    created_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct UserRowWithId {
    record_id: String,
    surname: String,
    name: String,
    patronymic: String,
    address: String,
    passport_serie: u32,
    passport_number: u32,
    created_at: DateTime<Utc>,
}

fn passport_serie(value: u32) -> Result<u16, DbError> {
    u16::try_from(value).map_err(|_| DbError::Decode(format!("passport serie out of range: {value}")))
}

impl UserRow {
    fn into_user(self, id: Uuid) -> Result<User, DbError> {
        Ok(User {
            id,
            surname: self.surname,
            name: self.name,
            patronymic: self.patronymic,
            address: self.address,
            passport_serie: passport_serie(self.passport_serie)?,
            passport_number: self.passport_number,
            created_at: self.created_at,
        })
    }
}

impl UserRowWithId {
    fn try_into_user(self) -> Result<User, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        Ok(User {
            id,
            surname: self.surname,
            name: self.name,
            patronymic: self.patronymic,
            address: self.address,
            passport_serie: passport_serie(self.passport_serie)?,
            passport_number: self.passport_number,
            created_at: self.created_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// Case-insensitive prefix conditions, one per set filter field.
/// Each prefix is bound as `$<column>`.
fn filter_clause(prefixes: &[(&'static str, String)]) -> String {
    if prefixes.is_empty() {
        return String::new();
    }
    let conditions = prefixes
        .iter()
        .map(|(column, _)| format!("string::starts_with(string::lowercase({column}), ${column})"))
        .collect::<Vec<_>>();
    format!("WHERE {}", conditions.join(" AND "))
}

/// SurrealDB integers are signed; larger counts clamp to `i64::MAX`.
fn as_db_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// SurrealDB implementation of the user directory.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn passport_taken(&self, serie: u16, number: u32) -> Result<bool, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM user \
                 WHERE passport_serie = $passport_serie \
                 AND passport_number = $passport_number \
                 GROUP ALL",
            )
            .bind(("passport_serie", u32::from(serie)))
            .bind(("passport_number", number))
            .await?;

        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }

    /// Classify a failed insert. A losing write race is re-read rather
    /// than retried.
    async fn create_failure(&self, serie: u16, number: u32, message: String) -> WorklogError {
        if is_index_violation(&message, PASSPORT_INDEX) {
            return WorklogError::UserAlreadyExists;
        }
        if is_write_conflict(&message) {
            match self.passport_taken(serie, number).await {
                Ok(true) => {
                    debug!(serie, number, "Onboarding lost a write race");
                    return WorklogError::UserAlreadyExists;
                }
                Ok(false) => {}
                Err(e) => return e.into(),
            }
        }
        DbError::Query(message).into()
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: CreateUser) -> WorklogResult<User> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let (serie, number) = (input.passport_serie, input.passport_number);
        let outcome = self
            .db
            .query(
                "CREATE type::record('user', $id) SET \
                 surname = $surname, name = $name, \
                 patronymic = $patronymic, address = $address, \
                 passport_serie = $passport_serie, \
                 passport_number = $passport_number",
            )
            .bind(("id", id_str.clone()))
            .bind(("surname", input.surname))
            .bind(("name", input.name))
            .bind(("patronymic", input.patronymic))
            .bind(("address", input.address))
            .bind(("passport_serie", u32::from(input.passport_serie)))
            .bind(("passport_number", input.passport_number))
            .await
            .and_then(|response| response.check());

        let mut result = match outcome {
            Ok(result) => result,
            Err(e) => return Err(self.create_failure(serie, number, e.to_string()).await),
        };

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        debug!(user_id = %id, "Created user");
        Ok(row.into_user(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> WorklogResult<User> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('user', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn list(
        &self,
        filter: &UserFilter,
        pagination: Pagination,
    ) -> WorklogResult<PaginatedResult<User>> {
        let prefixes = filter.prefixes();
        let clause = filter_clause(&prefixes);

        let count_sql = format!("SELECT count() AS total FROM user {clause} GROUP ALL");
        let page_sql = format!(
            "SELECT meta::id(id) AS record_id, * FROM user {clause} \
             ORDER BY id ASC LIMIT $limit START $offset"
        );
        debug!(sql = %page_sql, "Listing users");

        let mut count_query = self.db.query(count_sql);
        let mut page_query = self
            .db
            .query(page_sql)
            .bind(("limit", as_db_int(pagination.limit)))
            .bind(("offset", as_db_int(pagination.offset)));
        for (column, prefix) in prefixes {
            count_query = count_query.bind((column, prefix.clone()));
            page_query = page_query.bind((column, prefix));
        }

        let mut count_result = count_query.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = page_query.await.map_err(DbError::from)?;
        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_user())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_counts_clamp_to_signed_range() {
        assert_eq!(as_db_int(100), 100);
        assert_eq!(as_db_int(u64::MAX), i64::MAX);
    }

    #[test]
    fn empty_filter_has_no_where_clause() {
        assert_eq!(filter_clause(&[]), "");
    }

    #[test]
    fn prefixes_become_lowercase_starts_with() {
        let clause = filter_clause(&[("surname", "smi".into()), ("name", "jo".into())]);
        assert_eq!(
            clause,
            "WHERE string::starts_with(string::lowercase(surname), $surname) \
             AND string::starts_with(string::lowercase(name), $name)"
        );
    }
}
