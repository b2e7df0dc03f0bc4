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

use std::future::Future;

pub mod config;
pub mod error;
pub mod github;
pub mod octocrab_extra;
pub mod reporter;

pub use octocrab_extra::models::checks::{
    AnnotationLevel, CheckRun, CheckRunAnnotation, CheckRunConclusion, CheckRunOutput,
    CheckRunStatus, CheckRunUpdate, NewCheckRun,
};
pub use reporter::{CheckReporter, Report};

/// The remote side of check-run reporting.
///
/// [`github::GitHubChecks`] talks to GitHub; anything else that keeps check
/// runs keyed by commit and name can stand in for it.
pub trait ChecksApi {
    type Error: std::error::Error;

    fn create_check_run(
        &self,
        check_run: &NewCheckRun,
    ) -> impl Future<Output = Result<CheckRun, Self::Error>> + Send;

    /// Every check run attached to `head_sha` that the service returns for
    /// `name`. The service may match loosely, so callers compare names
    /// themselves.
    fn list_check_runs(
        &self,
        head_sha: &str,
        name: &str,
    ) -> impl Future<Output = Result<Vec<CheckRun>, Self::Error>> + Send;

    fn update_check_run(
        &self,
        check_run_id: u64,
        update: &CheckRunUpdate,
    ) -> impl Future<Output = Result<CheckRun, Self::Error>> + Send;
}
