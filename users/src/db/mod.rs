// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Database abstraction in terms of the operations needed by the service.

use crate::model::{Password, Profile, ProfileId, User, UserId, Username};
use async_trait::async_trait;
use log::debug;
use sqlx::Row;
#[cfg(feature = "mysql")]
use sqlx::mysql::MySqlRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
use std::sync::Arc;
#[cfg(feature = "mysql")]
use useraccess_core::db::mysql::{self, MysqlDb, MysqlOptions};
#[cfg(any(feature = "sqlite", test))]
use useraccess_core::db::sqlite;
use useraccess_core::db::{Db, DbError, DbResult, Executor};


/// Initializes the database schema.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        #[cfg(feature = "mysql")]
        Executor::Mysql(ex) => mysql::run_schema(ex, include_str!("mysql.sql")).await,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

#[cfg(feature = "mysql")]
impl TryFrom<MySqlRow> for User {
    type Error = DbError;

    fn try_from(row: MySqlRow) -> DbResult<Self> {
        let id: u64 = row.try_get("id").map_err(mysql::map_sqlx_error)?;
        let username: String = row.try_get("username").map_err(mysql::map_sqlx_error)?;
        let password: String = row.try_get("password").map_err(mysql::map_sqlx_error)?;

        Ok(User::new(UserId::new(id), Username::new(username)?, Password::new(password)?))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for User {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let username: String = row.try_get("username").map_err(sqlite::map_sqlx_error)?;
        let password: String = row.try_get("password").map_err(sqlite::map_sqlx_error)?;

        let id = u64::try_from(id)
            .map_err(|e| DbError::DataIntegrityError(format!("Invalid user id {}: {}", id, e)))?;

        Ok(User::new(UserId::new(id), Username::new(username)?, Password::new(password)?))
    }
}

#[cfg(feature = "mysql")]
impl TryFrom<MySqlRow> for Profile {
    type Error = DbError;

    fn try_from(row: MySqlRow) -> DbResult<Self> {
        let id: String = row.try_get("id").map_err(mysql::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(mysql::map_sqlx_error)?;

        Ok(Profile::new(ProfileId::new(id)?, name))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Profile {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: String = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;

        Ok(Profile::new(ProfileId::new(id)?, name))
    }
}

/// Checks that the statement described by `what` affected exactly one row, given that it
/// affected `rows`.
fn expect_one_row(what: &str, rows: u64) -> DbResult<()> {
    if rows != 1 {
        return Err(DbError::BackendError(format!("{} affected {} rows instead of 1", what, rows)));
    }
    Ok(())
}

/// Gets the first account whose name is exactly `username`, if any.
pub async fn get_user(ex: &mut Executor, username: &Username) -> DbResult<Option<User>> {
    let query_str = "SELECT * FROM users WHERE username = ?";
    match ex {
        #[cfg(feature = "mysql")]
        Executor::Mysql(ex) => {
            let maybe_row = sqlx::query(query_str)
                .bind(username.as_str())
                .fetch_optional(&mut **ex)
                .await
                .map_err(mysql::map_sqlx_error)?;
            maybe_row.map(User::try_from).transpose()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let maybe_row = sqlx::query(query_str)
                .bind(username.as_str())
                .fetch_optional(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            maybe_row.map(User::try_from).transpose()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Creates a new account with `username` and `password` and returns the identifier that the
/// store assigned to it.
pub async fn create_user(
    ex: &mut Executor,
    username: &Username,
    password: &Password,
) -> DbResult<UserId> {
    let query_str = "INSERT INTO users (username, password) VALUES (?, ?)";
    let id = match ex {
        #[cfg(feature = "mysql")]
        Executor::Mysql(ex) => {
            let done = sqlx::query(query_str)
                .bind(username.as_str())
                .bind(password.as_str())
                .execute(&mut **ex)
                .await
                .map_err(mysql::map_sqlx_error)?;
            expect_one_row("Insertion", done.rows_affected())?;
            done.last_insert_id()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let done = sqlx::query(query_str)
                .bind(username.as_str())
                .bind(password.as_str())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            expect_one_row("Insertion", done.rows_affected())?;
            let rowid = done.last_insert_rowid();
            u64::try_from(rowid).map_err(|e| {
                DbError::DataIntegrityError(format!("Invalid user id {}: {}", rowid, e))
            })?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(UserId::new(id))
}

/// Gets the profile identified by `id`, if any.
pub async fn get_profile(ex: &mut Executor, id: &ProfileId) -> DbResult<Option<Profile>> {
    let query_str = "SELECT id, name FROM profiles WHERE id = ?";
    match ex {
        #[cfg(feature = "mysql")]
        Executor::Mysql(ex) => {
            let maybe_row = sqlx::query(query_str)
                .bind(id.as_str())
                .fetch_optional(&mut **ex)
                .await
                .map_err(mysql::map_sqlx_error)?;
            maybe_row.map(Profile::try_from).transpose()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let maybe_row = sqlx::query(query_str)
                .bind(id.as_str())
                .fetch_optional(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            maybe_row.map(Profile::try_from).transpose()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Creates or replaces the profile keyed by the identifier in `profile`.
pub async fn put_profile(ex: &mut Executor, profile: &Profile) -> DbResult<()> {
    match ex {
        #[cfg(feature = "mysql")]
        Executor::Mysql(ex) => {
            let query_str = "
                INSERT INTO profiles (id, name) VALUES (?, ?)
                ON DUPLICATE KEY UPDATE name = VALUES(name)";
            sqlx::query(query_str)
                .bind(profile.id().as_str())
                .bind(profile.name())
                .execute(&mut **ex)
                .await
                .map_err(mysql::map_sqlx_error)?;
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO profiles (id, name) VALUES (?, ?)
                ON CONFLICT (id) DO UPDATE SET name = excluded.name";
            let done = sqlx::query(query_str)
                .bind(profile.id().as_str())
                .bind(profile.name())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            expect_one_row("Upsert", done.rows_affected())?;
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
    Ok(())
}

/// Capability to look up and create accounts.
#[async_trait]
pub trait AccountStore {
    /// Gets the first account named `username`, or `None` if there is none.
    async fn get_user(&self, username: &Username) -> DbResult<Option<User>>;

    /// Creates a new account and returns its store-generated identifier.
    async fn create_user(&self, username: &Username, password: &Password) -> DbResult<UserId>;
}

/// Capability to read and write profiles.
#[async_trait]
pub trait ProfileStore {
    /// Gets the profile identified by `id`, or `None` if there is none.
    async fn get_profile(&self, id: &ProfileId) -> DbResult<Option<Profile>>;

    /// Creates or replaces `profile`.
    async fn save_profile(&self, profile: &Profile) -> DbResult<()>;
}

/// Relational store backed by a connection pool.
///
/// Every operation checks out its own connection from the pool and issues a single statement.
#[derive(Clone)]
pub struct Database {
    /// The pool that backs all operations.
    db: Arc<dyn Db + Send + Sync>,
}

impl Database {
    /// Creates a new store backed by an already-configured `db`.
    pub fn new(db: Arc<dyn Db + Send + Sync>) -> Self {
        Self { db }
    }

    /// Creates a new store backed by a MySQL pool configured with `opts`.
    ///
    /// Note that this does *not* establish any connection.
    #[cfg(feature = "mysql")]
    pub fn connect(opts: MysqlOptions) -> DbResult<Self> {
        let db = MysqlDb::connect(opts)?;
        Ok(Self::new(Arc::new(db)))
    }

    /// Obtains an executor against the underlying pool.
    pub async fn ex(&self) -> DbResult<Executor> {
        self.db.ex().await
    }

    /// Closes the pool, waiting for all checked out connections to be returned.
    pub async fn close(&self) {
        self.db.close().await;
    }
}

#[async_trait]
impl AccountStore for Database {
    async fn get_user(&self, username: &Username) -> DbResult<Option<User>> {
        debug!("Looking up user {}", username.as_str());
        get_user(&mut self.ex().await?, username).await
    }

    async fn create_user(&self, username: &Username, password: &Password) -> DbResult<UserId> {
        let id = create_user(&mut self.ex().await?, username, password).await?;
        debug!("Created user {} with id {}", username.as_str(), id.as_u64());
        Ok(id)
    }
}

#[async_trait]
impl ProfileStore for Database {
    async fn get_profile(&self, id: &ProfileId) -> DbResult<Option<Profile>> {
        debug!("Looking up profile {}", id.as_str());
        get_profile(&mut self.ex().await?, id).await
    }

    async fn save_profile(&self, profile: &Profile) -> DbResult<()> {
        debug!("Saving profile {}", profile.id().as_str());
        put_profile(&mut self.ex().await?, profile).await
    }
}
