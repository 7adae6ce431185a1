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

//! Test utilities for the business layer.

use crate::db::{self, AccountStore, Database, ProfileStore};
use crate::driver::{Driver, UserService};
use crate::format::{NameFormatter, UppercaseFormatter};
use crate::model::{Password, Profile, ProfileId, UserId, Username};
use async_trait::async_trait;
use futures::lock::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use useraccess_core::db::{DbError, DbResult, Executor};

/// Account store that records its calls and returns a canned result.
pub(crate) struct FakeAccountStore {
    /// Identifier to return on creation, or the message of the backend error to raise.
    result: Result<u64, &'static str>,

    /// Arguments passed to every `create_user` call, in order.
    calls: Mutex<Vec<(Username, Password)>>,
}

impl FakeAccountStore {
    /// Creates a store whose creations succeed with `id`.
    pub(crate) fn returning(id: u64) -> Self {
        Self { result: Ok(id), calls: Mutex::default() }
    }

    /// Creates a store whose creations fail with a backend error carrying `message`.
    pub(crate) fn failing(message: &'static str) -> Self {
        Self { result: Err(message), calls: Mutex::default() }
    }

    /// Returns the arguments of all `create_user` calls seen so far.
    pub(crate) async fn calls(&self) -> Vec<(Username, Password)> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl AccountStore for FakeAccountStore {
    async fn get_user(&self, _username: &Username) -> DbResult<Option<crate::model::User>> {
        unimplemented!("Not needed by any test")
    }

    async fn create_user(&self, username: &Username, password: &Password) -> DbResult<UserId> {
        self.calls.lock().await.push((username.clone(), password.clone()));
        match self.result {
            Ok(id) => Ok(UserId::new(id)),
            Err(message) => Err(DbError::BackendError(message.to_owned())),
        }
    }
}

/// Profile store backed by memory that records its calls.
#[derive(Default)]
pub(crate) struct FakeProfileStore {
    /// Contents of the store, keyed by profile identifier.
    profiles: Mutex<BTreeMap<String, Profile>>,

    /// Identifiers passed to every `get_profile` call, in order.
    gets: Mutex<Vec<ProfileId>>,

    /// Profiles passed to every `save_profile` call, in order.
    saves: Mutex<Vec<Profile>>,

    /// If set, every operation fails with the error returned by this function.
    fail_with: Option<fn() -> DbError>,
}

impl FakeProfileStore {
    /// Creates a store whose operations always fail with the error produced by `fail_with`.
    pub(crate) fn failing(fail_with: fn() -> DbError) -> Self {
        Self { fail_with: Some(fail_with), ..Default::default() }
    }

    /// Adds `profile` to the store without recording a save.
    pub(crate) async fn insert(&self, profile: Profile) {
        self.profiles.lock().await.insert(profile.id().as_str().to_owned(), profile);
    }

    /// Returns the arguments of all `get_profile` calls seen so far.
    pub(crate) async fn gets(&self) -> Vec<ProfileId> {
        self.gets.lock().await.clone()
    }

    /// Returns the arguments of all `save_profile` calls seen so far.
    pub(crate) async fn saves(&self) -> Vec<Profile> {
        self.saves.lock().await.clone()
    }
}

#[async_trait]
impl ProfileStore for FakeProfileStore {
    async fn get_profile(&self, id: &ProfileId) -> DbResult<Option<Profile>> {
        self.gets.lock().await.push(id.clone());
        if let Some(fail_with) = self.fail_with {
            return Err(fail_with());
        }
        Ok(self.profiles.lock().await.get(id.as_str()).cloned())
    }

    async fn save_profile(&self, profile: &Profile) -> DbResult<()> {
        self.saves.lock().await.push(profile.clone());
        if let Some(fail_with) = self.fail_with {
            return Err(fail_with());
        }
        self.insert(profile.clone()).await;
        Ok(())
    }
}

/// Formatter that always returns the same output and records its inputs.
pub(crate) struct StubFormatter {
    /// The value returned by every call to `format`.
    output: &'static str,

    /// Names passed to every `format` call, in order.
    inputs: std::sync::Mutex<Vec<String>>,
}

impl StubFormatter {
    /// Creates a formatter that always returns `output`.
    pub(crate) fn new(output: &'static str) -> Self {
        Self { output, inputs: std::sync::Mutex::default() }
    }

    /// Returns the arguments of all `format` calls seen so far.
    pub(crate) fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

impl NameFormatter for StubFormatter {
    fn format(&self, name: &str) -> String {
        self.inputs.lock().unwrap().push(name.to_owned());
        self.output.to_owned()
    }
}

/// Creates a profile service backed by an empty in-memory store and the real formatter.
pub(crate) fn fake_user_service() -> UserService {
    UserService::new(Arc::new(FakeProfileStore::default()), Arc::new(UppercaseFormatter))
}

/// State of a driver backed by a real in-memory database.
pub(crate) struct TestContext {
    /// The store shared by the driver and the test.
    db: Database,

    /// The driver under test.
    driver: Driver,
}

impl TestContext {
    /// Initializes the database and the driver.
    pub(crate) async fn setup() -> Self {
        let sqlite = useraccess_core::db::sqlite::testutils::setup().await;
        let db = Database::new(Arc::new(sqlite));
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();

        let store = Arc::new(db.clone());
        let users = UserService::new(store.clone(), Arc::new(UppercaseFormatter));
        let driver = Driver::new(store, users);
        Self { db, driver }
    }

    /// Obtains an executor to query the database directly.
    pub(crate) async fn ex(&self) -> Executor {
        self.db.ex().await.unwrap()
    }

    /// Returns a copy of the driver.
    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Returns the profile service of the driver.
    pub(crate) fn users(&self) -> UserService {
        self.driver.clone().users()
    }
}
