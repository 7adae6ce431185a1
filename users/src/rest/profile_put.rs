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

//! API to create or replace a profile, formatting its name.

use crate::driver::Driver;
use crate::model::ProfileId;
use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use useraccess_core::rest::RestError;

/// Message sent to the server to store a profile.
#[derive(Deserialize)]
#[cfg_attr(test, derive(serde::Serialize))]
pub(crate) struct ProfilePutRequest {
    /// Display name of the profile, before formatting.
    name: Option<String>,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<ProfileId>,
    Json(request): Json<ProfilePutRequest>,
) -> Result<(), RestError> {
    let name = match request.name {
        Some(name) if !name.is_empty() => name,
        _ => return Err(RestError::InvalidRequest("Name cannot be empty".to_owned())),
    };

    driver.users().create_user(id, &name).await?;
    Ok(())
}
