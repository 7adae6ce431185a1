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

//! Extends the driver with the `register` method.

use crate::driver::Driver;
use crate::model::{Password, UserId, Username};
use useraccess_core::driver::DriverResult;

impl Driver {
    /// Creates a new account for `username` with `password` and returns its identifier.
    pub(crate) async fn register(
        self,
        username: Username,
        password: Password,
    ) -> DriverResult<UserId> {
        let user_id = self.accounts.create_user(&username, &password).await?;
        Ok(user_id)
    }
}
