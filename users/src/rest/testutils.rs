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

//! Test utilities for the REST API.

use crate::db::{self, Database};
use crate::driver::testutils::{FakeAccountStore, fake_user_service};
use crate::driver::{Driver, UserService};
use crate::format::UppercaseFormatter;
use crate::model::*;
use crate::rest::app;
use axum::Router;
use std::sync::Arc;

/// Creates the app with a driver whose account store is `accounts`.
pub(crate) fn app_with_accounts(accounts: Arc<FakeAccountStore>) -> Router {
    app(Driver::new(accounts, fake_user_service()))
}

/// State of a running app backed by a real in-memory database.
pub(crate) struct TestContext {
    /// The store shared by the app and the test.
    db: Database,

    /// The app under test.
    app: Router,
}

impl TestContext {
    /// Initializes the database and the app.
    pub(crate) async fn setup() -> Self {
        let sqlite = useraccess_core::db::sqlite::testutils::setup().await;
        let db = Database::new(Arc::new(sqlite));
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();

        let store = Arc::new(db.clone());
        let users = UserService::new(store.clone(), Arc::new(UppercaseFormatter));
        let app = app(Driver::new(store, users));
        Self { db, app }
    }

    /// Returns a copy of the app.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and returns the app.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Gets the first account named `username`, if any.
    pub(crate) async fn get_user(&self, username: &'static str) -> Option<User> {
        db::get_user(&mut self.db.ex().await.unwrap(), &Username::from(username)).await.unwrap()
    }

    /// Stores the profile `id` with `name` verbatim.
    pub(crate) async fn put_profile(&self, id: &'static str, name: &str) {
        db::put_profile(&mut self.db.ex().await.unwrap(), &Profile::new(ProfileId::from(id), name))
            .await
            .unwrap();
    }

    /// Gets the stored profile `id`, which must exist.
    pub(crate) async fn get_profile(&self, id: &'static str) -> Profile {
        db::get_profile(&mut self.db.ex().await.unwrap(), &ProfileId::from(id))
            .await
            .unwrap()
            .unwrap()
    }

    /// Checks whether the profile `id` exists.
    pub(crate) async fn has_profile(&self, id: &'static str) -> bool {
        db::get_profile(&mut self.db.ex().await.unwrap(), &ProfileId::from(id))
            .await
            .unwrap()
            .is_some()
    }
}
