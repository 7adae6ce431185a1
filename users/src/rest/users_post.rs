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

//! API to register a new account.

use crate::driver::Driver;
use crate::model::{Password, UserId, Username};
use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use useraccess_core::rest::RestError;

/// Message sent to the server to register a new account.
///
/// Both fields accept any JSON value at the wire level so that missing or falsy fields are
/// reported as invalid requests by our own validation.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub(crate) struct RegisterRequest {
    /// Name of the account to create.
    username: Option<Value>,

    /// Credential of the account to create.
    password: Option<Value>,
}

/// Extracts the text of the request field `what` from `value`.
///
/// Values that are falsy in JSON (`null`, `false`, `0` and `""`) are treated as missing and yield
/// an empty string, which the model types reject.
fn field_text(what: &str, value: Option<Value>) -> Result<String, RestError> {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(String::new()),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(RestError::InvalidRequest(format!("{} must be a string", what))),
    }
}

/// Message returned by the server after a successful registration.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterResponse {
    /// Identifier that the store assigned to the new account.
    user_id: UserId,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, RestError> {
    let username = Username::new(field_text("Username", request.username)?)?;
    let password = Password::new(field_text("Password", request.password)?)?;

    let user_id = driver.register(username, password).await?;

    Ok(Json(RegisterResponse { user_id }))
}
