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

//! High-level data types.

use serde::de::Visitor;
use serde::{Deserialize, Serialize};
use std::fmt;
use useraccess_core::model::{ModelError, ModelResult};

/// Identifier of an account, as generated by the store when the account is created.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Creates a new identifier from its numeric representation.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric representation of the identifier.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// The name of an account.  Free-form text that cannot be empty and that is kept verbatim.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Creates a new username from an untrusted string `s`, making sure it is valid.
    pub fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();
        if s.is_empty() {
            return Err(ModelError("Username cannot be empty".to_owned()));
        }
        Ok(Self(s))
    }

    /// Returns a string view of the username.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
impl From<&'static str> for Username {
    /// Creates a new username from a hardcoded string, which must be valid.
    fn from(s: &'static str) -> Self {
        Username::new(s).expect("Hardcoded usernames must be valid")
    }
}

/// An opaque type to hold a password, protecting it from leaking into logs.
///
/// Passwords are stored and compared verbatim.
#[derive(Clone, PartialEq)]
pub struct Password(String);

impl Password {
    /// Creates a new password from an untrusted string `s`, making sure it is valid.
    pub fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();
        if s.is_empty() {
            return Err(ModelError("Password cannot be empty".to_owned()));
        }
        Ok(Self(s))
    }

    /// Returns a string view of the password.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
impl From<&'static str> for Password {
    /// Creates a new password from a hardcoded string, which must be valid.
    fn from(s: &'static str) -> Self {
        Password::new(s).expect("Hardcoded passwords must be valid")
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("scrubbed password")
    }
}

/// An account as persisted in the `users` table.
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    /// Store-generated identifier of the account.
    id: UserId,

    /// Name of the account.
    username: Username,

    /// Credential of the account.
    password: Password,
}

impl User {
    /// Creates a new account record.
    pub fn new(id: UserId, username: Username, password: Password) -> Self {
        Self { id, username, password }
    }

    /// Gets the account's identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Gets the account's name.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Gets the account's credential.
    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Caller-supplied identifier of a profile.  Cannot be empty.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProfileId(String);

impl ProfileId {
    /// Creates a new profile identifier from an untrusted string `s`, making sure it is valid.
    pub fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();
        if s.is_empty() {
            return Err(ModelError("Profile identifier cannot be empty".to_owned()));
        }
        Ok(Self(s))
    }

    /// Returns a string view of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
impl From<&'static str> for ProfileId {
    /// Creates a new identifier from a hardcoded string, which must be valid.
    fn from(s: &'static str) -> Self {
        ProfileId::new(s).expect("Hardcoded profile identifiers must be valid")
    }
}

/// A deserialization visitor for a `ProfileId`.
struct ProfileIdVisitor;

impl Visitor<'_> for ProfileIdVisitor {
    type Value = ProfileId;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(r#"a non-empty string"#)
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        match ProfileId::new(v) {
            Ok(id) => Ok(id),
            Err(e) => Err(E::custom(format!("{}", e))),
        }
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        match ProfileId::new(v) {
            Ok(id) => Ok(id),
            Err(e) => Err(E::custom(format!("{}", e))),
        }
    }
}

impl<'de> Deserialize<'de> for ProfileId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_string(ProfileIdVisitor)
    }
}

/// A profile as persisted in the `profiles` table.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Profile {
    /// Identifier of the profile.
    id: ProfileId,

    /// Display name of the profile.
    name: String,
}

impl Profile {
    /// Creates a new profile record.
    pub fn new<S: Into<String>>(id: ProfileId, name: S) -> Self {
        Self { id, name: name.into() }
    }

    /// Gets the profile's identifier.
    pub fn id(&self) -> &ProfileId {
        &self.id
    }

    /// Gets the profile's display name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
