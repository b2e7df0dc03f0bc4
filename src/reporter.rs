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

use chrono::Utc;
use secrecy::SecretString;

use crate::error::AuthError;
use crate::github::GitHubChecks;
use crate::octocrab_extra::models::checks::{
    CheckRun, CheckRunConclusion, CheckRunOutput, CheckRunStatus, CheckRunUpdate, NewCheckRun,
};
use crate::ChecksApi;

/// What became of a reported status.
///
/// Remote errors never escape [`CheckReporter::start`] or
/// [`CheckReporter::complete`]; they are logged and show up here as
/// [`Report::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    Created(u64),
    Updated(u64),
    Failed,
}

impl Report {
    pub fn check_run_id(&self) -> Option<u64> {
        match self {
            Self::Created(id) | Self::Updated(id) => Some(*id),
            Self::Failed => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// Reports the status of one named check (the context) on commits of one
/// repository.
pub struct CheckReporter<C = GitHubChecks> {
    context: String,
    checks: C,
}

impl CheckReporter<GitHubChecks> {
    /// Authenticates as installation `installation_id` of app `app_id`.
    pub async fn new(
        owner: impl Into<String>,
        project: impl Into<String>,
        context: impl Into<String>,
        private_key: &SecretString,
        app_id: u64,
        installation_id: u64,
    ) -> Result<Self, AuthError> {
        let checks =
            GitHubChecks::authenticate(owner, project, private_key, app_id, installation_id)
                .await?;

        Ok(Self::with_checks(context, checks))
    }
}

impl<C: ChecksApi> CheckReporter<C> {
    pub fn with_checks(context: impl Into<String>, checks: C) -> Self {
        Self {
            context: context.into(),
            checks,
        }
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn checks(&self) -> &C {
        &self.checks
    }

    /// Creates a check run for `sha` in `status`, stamped as started now.
    ///
    /// Without an `output` the run shows [`CheckRunOutput::default`].
    pub async fn start(
        &self,
        sha: &str,
        status: CheckRunStatus,
        output: Option<CheckRunOutput>,
        details_url: Option<String>,
    ) -> Report {
        let check_run = NewCheckRun::new(&self.context, sha)
            .status(status)
            .started_at(Utc::now())
            .output(output.unwrap_or_default())
            .details_url(details_url);

        match self.checks.create_check_run(&check_run).await {
            Ok(created) => Report::Created(created.id),
            Err(error) => {
                tracing::error!(
                    context = %self.context,
                    sha,
                    error = %error,
                    "failed to create check run"
                );
                Report::Failed
            }
        }
    }

    /// Completes the check run for `sha` with `conclusion`.
    ///
    /// The run named after the context is updated in place; if `sha` has no
    /// such run yet a completed one is created.
    pub async fn complete(
        &self,
        sha: &str,
        conclusion: CheckRunConclusion,
        output: CheckRunOutput,
        details_url: Option<String>,
    ) -> Report {
        let completed_at = Utc::now();

        let existing = match self.find_check_run(sha).await {
            Ok(existing) => existing,
            Err(error) => {
                tracing::error!(
                    context = %self.context,
                    sha,
                    error = %error,
                    "could not retrieve existing check runs"
                );
                return Report::Failed;
            }
        };

        match existing {
            None => {
                tracing::debug!(
                    context = %self.context,
                    sha,
                    "no existing check run, creating a new one"
                );
                let check_run = NewCheckRun::new(&self.context, sha)
                    .status(CheckRunStatus::Completed)
                    .conclusion(conclusion)
                    .completed_at(completed_at)
                    .output(output)
                    .details_url(details_url);

                match self.checks.create_check_run(&check_run).await {
                    Ok(created) => Report::Created(created.id),
                    Err(error) => {
                        tracing::error!(
                            context = %self.context,
                            sha,
                            error = %error,
                            "failed to create check run"
                        );
                        Report::Failed
                    }
                }
            }
            Some(check_run) => {
                tracing::debug!(
                    context = %self.context,
                    sha,
                    check_run_id = check_run.id,
                    status = %CheckRunStatus::Completed,
                    "updating existing check run"
                );
                let update = CheckRunUpdate::completed(conclusion, completed_at)
                    .output(output)
                    .details_url(details_url);

                match self.checks.update_check_run(check_run.id, &update).await {
                    Ok(updated) => Report::Updated(updated.id),
                    Err(error) => {
                        tracing::error!(
                            context = %self.context,
                            sha,
                            check_run_id = check_run.id,
                            error = %error,
                            "failed to update check run"
                        );
                        Report::Failed
                    }
                }
            }
        }
    }

    async fn find_check_run(&self, sha: &str) -> Result<Option<CheckRun>, C::Error> {
        let check_runs = self.checks.list_check_runs(sha, &self.context).await?;

        Ok(check_runs
            .into_iter()
            .find(|check_run| check_run.name == self.context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_report_has_no_id() {
        assert_eq!(Report::Created(7).check_run_id(), Some(7));
        assert_eq!(Report::Updated(9).check_run_id(), Some(9));
        assert_eq!(Report::Failed.check_run_id(), None);
        assert!(Report::Failed.is_failed());
        assert!(!Report::Updated(9).is_failed());
    }
}
