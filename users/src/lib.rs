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

//! User access layer: account registration and formatted profiles over REST.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use log::{info, warn};
use std::future::Future;
use std::io;
use tokio::net::TcpListener;
use useraccess_core::env::get_optional_var;

pub mod db;
pub mod driver;
use driver::Driver;
pub mod format;
pub mod model;
mod rest;
use rest::app;

/// Default port to listen on when none is configured.
const DEFAULT_PORT: u16 = 8080;

/// Configuration options for the HTTP server.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerOptions {
    /// Port to listen on, on all interfaces.
    pub port: u16,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

impl ServerOptions {
    /// Initializes a set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_PORT`.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        Ok(Self { port: get_optional_var::<u16>(prefix, "PORT")?.unwrap_or(DEFAULT_PORT) })
    }
}

/// Returns a logger configuration that honors `RUST_LOG` and otherwise shows informational
/// messages, which include the server lifecycle.
pub fn log_builder() -> env_logger::Builder {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
}

/// Waits until the process receives `SIGINT` or `SIGTERM`, whichever comes first.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Cannot listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => (),
        () = terminate => (),
    }
}

/// Serves the application on `listener` until the process is asked to terminate.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose many
/// crate-internal types to the public, which in turn would make dead code detection harder.
pub async fn serve(listener: TcpListener, driver: Driver) -> io::Result<()> {
    serve_with_shutdown(listener, driver, shutdown_signal()).await
}

/// Serves the application on `listener` until `shutdown` completes.
///
/// Once `shutdown` completes, the server stops accepting new connections and waits for the
/// in-flight ones to finish before returning.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    driver: Driver,
    shutdown: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let port = listener.local_addr()?.port();
    let app = app(driver);

    info!("listening on port {}", port);
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("Server closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testutils::TestContext;
    use std::net::Ipv4Addr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    #[test]
    fn test_server_options_from_env_default() {
        temp_env::with_var_unset("SERVER_PORT", || {
            assert_eq!(ServerOptions { port: 8080 }, ServerOptions::from_env("SERVER").unwrap());
        });
    }

    #[test]
    fn test_server_options_from_env_port() {
        temp_env::with_var("SERVER_PORT", Some("3000"), || {
            assert_eq!(ServerOptions { port: 3000 }, ServerOptions::from_env("SERVER").unwrap());
        });
    }

    #[test]
    fn test_server_options_from_env_bad_port() {
        temp_env::with_var("SERVER_PORT", Some("70000"), || {
            let err = ServerOptions::from_env("SERVER").unwrap_err();
            assert!(err.contains("SERVER_PORT"));
        });
    }

    #[test]
    fn test_log_builder_defaults_to_info() {
        temp_env::with_var_unset("RUST_LOG", || {
            assert_eq!(log::LevelFilter::Info, log_builder().build().filter());
        });
    }

    #[test]
    fn test_log_builder_honors_rust_log() {
        temp_env::with_var("RUST_LOG", Some("debug"), || {
            assert_eq!(log::LevelFilter::Debug, log_builder().build().filter());
        });
    }

    /// Sends a raw HTTP `request` to `addr` and returns the whole response.
    async fn raw_request(addr: std::net::SocketAddr, request: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_serve_until_shutdown() {
        let context = TestContext::setup().await;

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve_with_shutdown(listener, context.driver(), async {
            let _ = rx.await;
        }));

        let body = r#"{"username":"someone","password":"secret"}"#;
        let response = raw_request(
            addr,
            &format!(
                "POST /users HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
                 Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
                body.len(),
                body
            ),
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 200"), "Unexpected response: {}", response);
        assert!(response.contains(r#"{"userId":"#), "Unexpected response: {}", response);

        let response = raw_request(
            addr,
            "GET /unknown HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 404"), "Unexpected response: {}", response);

        tx.send(()).unwrap();
        server.await.unwrap().unwrap();

        assert!(TcpStream::connect(addr).await.is_err());
    }
}
