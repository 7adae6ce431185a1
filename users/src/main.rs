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

//! Entry point to the user access service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use log::error;
use std::net::Ipv4Addr;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use useraccess::db::Database;
use useraccess::driver::{Driver, UserService};
use useraccess::format::UppercaseFormatter;
use useraccess::{ServerOptions, log_builder, serve};
use useraccess_core::db::mysql::MysqlOptions;

/// Binds the listener and serves requests until terminated, using the already-open `db`.
async fn run(db: &Database, server_opts: ServerOptions) -> Result<(), String> {
    let store = Arc::new(db.clone());
    let users = UserService::new(store.clone(), Arc::new(UppercaseFormatter));
    let driver = Driver::new(store, users);

    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, server_opts.port))
        .await
        .map_err(|e| format!("Cannot listen on port {}: {}", server_opts.port, e))?;
    serve(listener, driver).await.map_err(|e| format!("Server failed: {}", e))
}

#[tokio::main]
async fn main() -> ExitCode {
    log_builder().init();

    let db_opts = match MysqlOptions::from_env("MYSQL") {
        Ok(opts) => opts,
        Err(e) => {
            error!("Invalid database configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let server_opts = match ServerOptions::from_env("USERS") {
        Ok(opts) => opts,
        Err(e) => {
            error!("Invalid server configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let db = match Database::connect(db_opts) {
        Ok(db) => db,
        Err(e) => {
            error!("Cannot set up the database pool: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = run(&db, server_opts).await;
    db.close().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
