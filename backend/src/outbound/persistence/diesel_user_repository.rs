//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, SessionToken, User, UserId, UserName};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> UserPersistenceError {
    map_pool_error(error, UserPersistenceError::connection)
}

fn map_read_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(
        error,
        |message| UserPersistenceError::query(message),
        |message| UserPersistenceError::connection(message),
    )
}

/// Like [`map_read_error`] but surfaces unique violations as duplicates so
/// the service can report a conflict instead of a server error.
fn map_write_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error {
        return UserPersistenceError::duplicate(info.message().to_owned());
    }
    map_read_error(error)
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let UserRow {
        id,
        name,
        email,
        session_id,
        created_at,
    } = row;

    let name = UserName::new(name).map_err(|err| corrupt_row(&id, "name", &err))?;
    let email = Email::new(email).map_err(|err| corrupt_row(&id, "email", &err))?;

    Ok(User::new(
        UserId::from_uuid(id),
        name,
        email,
        SessionToken::from_uuid(session_id),
        created_at,
    ))
}

fn corrupt_row(
    id: &uuid::Uuid,
    field: &str,
    error: &dyn std::fmt::Display,
) -> UserPersistenceError {
    warn!(user_id = %id, field, %error, "user row failed domain validation");
    UserPersistenceError::query(format!("stored user has an invalid {field}"))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let new_row = NewUserRow {
            id: *user.id().as_uuid(),
            name: user.name().as_ref(),
            email: user.email().as_ref(),
            session_id: *user.session().as_uuid(),
            created_at: user.created_at(),
        };

        diesel::insert_into(users::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_write_error)
    }

    async fn find_by_session(
        &self,
        token: &SessionToken,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: Option<UserRow> = users::table
            .filter(users::session_id.eq(token.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;

        row.map(row_to_user).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;

        rows.into_iter().map(row_to_user).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    fn valid_row() -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            name: "Ada Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            session_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let err = map_pool(PoolError::checkout("connection refused"));
        assert!(matches!(err, UserPersistenceError::Connection { .. }));
        assert!(err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn unique_violations_map_to_duplicates() {
        let diesel_err = diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates \"users_email_key\"".to_owned()),
        );
        let err = map_write_error(diesel_err);
        assert!(matches!(err, UserPersistenceError::Duplicate { .. }));
    }

    #[rstest]
    fn other_write_failures_stay_query_errors() {
        let err = map_write_error(diesel::result::Error::NotFound);
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }

    #[rstest]
    fn valid_rows_convert_to_domain_users() {
        let row = valid_row();
        let session_id = row.session_id;
        let user = row_to_user(row).expect("valid row converts");
        assert_eq!(user.name().as_ref(), "Ada Lovelace");
        assert_eq!(user.session().as_uuid(), &session_id);
    }

    #[rstest]
    fn corrupt_rows_surface_as_query_errors() {
        let mut row = valid_row();
        row.email = "not-an-address".to_owned();
        let err = row_to_user(row).expect_err("corrupt row rejected");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
        assert!(err.to_string().contains("email"));
    }
}
