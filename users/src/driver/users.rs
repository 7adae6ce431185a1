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

//! Orchestration of profile reads and writes with the formatting rule.

use crate::db::ProfileStore;
use crate::format::NameFormatter;
use crate::model::{Profile, ProfileId};
use std::sync::Arc;
use useraccess_core::driver::DriverResult;

/// Combines a profile store with a name formatter.
///
/// Both capabilities are injected at construction time so that callers decide which store and
/// which formatting rule to use.
#[derive(Clone)]
pub struct UserService {
    /// The store that persists profiles.
    store: Arc<dyn ProfileStore + Send + Sync>,

    /// The rule applied to display names.
    formatter: Arc<dyn NameFormatter + Send + Sync>,
}

impl UserService {
    /// Creates a new service backed by `store` and `formatter`.
    pub fn new(
        store: Arc<dyn ProfileStore + Send + Sync>,
        formatter: Arc<dyn NameFormatter + Send + Sync>,
    ) -> Self {
        Self { store, formatter }
    }

    /// Fetches the profile `id` and returns it with its name formatted, or `None` if the profile
    /// does not exist.
    pub async fn get_formatted_user(&self, id: &ProfileId) -> DriverResult<Option<Profile>> {
        let profile = match self.store.get_profile(id).await? {
            Some(profile) => profile,
            None => return Ok(None),
        };
        let name = self.formatter.format(profile.name());
        Ok(Some(Profile::new(profile.id().clone(), name)))
    }

    /// Formats `name` and saves it as the profile `id`.
    pub async fn create_user(&self, id: ProfileId, name: &str) -> DriverResult<()> {
        let profile = Profile::new(id, self.formatter.format(name));
        self.store.save_profile(&profile).await?;
        Ok(())
    }
}
