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

//! Business logic for the service.

use crate::db::AccountStore;
use std::sync::Arc;

mod register;
#[cfg(test)]
pub(crate) mod testutils;
mod users;
pub use users::UserService;

/// Business logic.
///
/// The operations exposed by the driver consume it in an attempt to minimize the possibility of
/// executing two operations with the same instance.  The driver is cheap to clone.
#[derive(Clone)]
pub struct Driver {
    /// The store that persists accounts.
    accounts: Arc<dyn AccountStore + Send + Sync>,

    /// The orchestration component for profiles.
    users: UserService,
}

impl Driver {
    /// Creates a new driver backed by the given injected components.
    pub fn new(accounts: Arc<dyn AccountStore + Send + Sync>, users: UserService) -> Self {
        Self { accounts, users }
    }

    /// Returns the orchestration component for profiles.
    pub(crate) fn users(self) -> UserService {
        self.users
    }
}
