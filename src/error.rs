// Copyright 2022 Alexander Krivács Schrøder
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// OR
//
// Licensed under the MIT License. See LICENSE-MIT for details.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::octocrab_extra::models::checks::{UnknownCheckRunConclusion, UnknownCheckRunStatus};

/// Failure to act as an app installation. Nothing else can be reported
/// without it, so it is always returned to the caller.
#[derive(Debug, Error, Diagnostic)]
pub enum AuthError {
    #[error("app private key is not a valid RSA PEM key")]
    #[diagnostic(code(check_reporter::auth::private_key))]
    PrivateKey(#[from] jsonwebtoken::errors::Error),
    #[error("could not build a GitHub client for app {app_id}")]
    #[diagnostic(code(check_reporter::auth::client))]
    Client {
        app_id: u64,
        #[source]
        source: octocrab::Error,
    },
    #[error("could not authenticate as installation {installation_id} of app {app_id}")]
    #[diagnostic(
        code(check_reporter::auth::installation),
        help("check that the app is installed on the repository and the ids are right")
    )]
    Installation {
        app_id: u64,
        installation_id: u64,
        #[source]
        source: octocrab::Error,
    },
}

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("`{0}` is not set")]
    #[diagnostic(code(check_reporter::config::missing))]
    Missing(&'static str),
    #[error("`{name}` must be an integer, got {value:?}")]
    #[diagnostic(code(check_reporter::config::integer))]
    NotAnInteger { name: &'static str, value: String },
    #[error("repository {0:?} is not in owner/name form")]
    #[diagnostic(code(check_reporter::config::repository))]
    Repository(String),
    #[error("unknown phase {0:?}")]
    #[diagnostic(
        code(check_reporter::config::phase),
        help("expected `start` or `complete`")
    )]
    Phase(String),
    #[error("could not read private key from {}", path.display())]
    #[diagnostic(code(check_reporter::config::private_key))]
    ReadPrivateKey {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    #[diagnostic(transparent)]
    Status(#[from] UnknownCheckRunStatus),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Conclusion(#[from] UnknownCheckRunConclusion),
}
