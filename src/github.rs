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

use jsonwebtoken::EncodingKey;
use octocrab::models::{AppId, InstallationId};
use octocrab::Octocrab;
use secrecy::{ExposeSecret, SecretString};

use crate::error::AuthError;
use crate::octocrab_extra::models::checks::{CheckRun, CheckRunUpdate, NewCheckRun};
use crate::octocrab_extra::{CheckHandler, CheckRunFilter, ListCheckRunsBuilder, OctocrabExt};
use crate::ChecksApi;

const PER_PAGE: u8 = 100;

/// Check runs of one repository, reached through an app installation.
#[derive(Clone)]
pub struct GitHubChecks {
    octocrab: Octocrab,
    owner: String,
    repo: String,
}

impl GitHubChecks {
    pub async fn authenticate(
        owner: impl Into<String>,
        repo: impl Into<String>,
        private_key: &SecretString,
        app_id: u64,
        installation_id: u64,
    ) -> Result<Self, AuthError> {
        let key = EncodingKey::from_rsa_pem(private_key.expose_secret().as_bytes())?;
        let app = Octocrab::builder()
            .app(AppId(app_id), key)
            .build()
            .map_err(|source| AuthError::Client { app_id, source })?;

        let (octocrab, _token) = app
            .installation_and_token(InstallationId(installation_id))
            .await
            .map_err(|source| AuthError::Installation {
                app_id,
                installation_id,
                source,
            })?;

        Ok(Self::from_octocrab(octocrab, owner, repo))
    }

    /// Wraps a client that is already authenticated for the repository.
    pub fn from_octocrab(
        octocrab: Octocrab,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            octocrab,
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    fn repository(&self) -> CheckHandler<'_> {
        self.octocrab.check_runs(&self.owner, &self.repo)
    }
}

impl ChecksApi for GitHubChecks {
    type Error = octocrab::Error;

    async fn create_check_run(&self, check_run: &NewCheckRun) -> Result<CheckRun, Self::Error> {
        self.repository().create_check_run(check_run).await
    }

    async fn list_check_runs(
        &self,
        head_sha: &str,
        name: &str,
    ) -> Result<Vec<CheckRun>, Self::Error> {
        let repository = self.repository();
        let mut check_runs = Vec::new();
        let mut page = 1u32;
        loop {
            let listing = list_page(&repository, head_sha, name, page).send().await?;

            let received = listing.check_runs.len();
            check_runs.extend(listing.check_runs);
            if is_last_page(received, check_runs.len(), listing.total_count) {
                break;
            }
            page += 1;
        }

        Ok(check_runs)
    }

    async fn update_check_run(
        &self,
        check_run_id: u64,
        update: &CheckRunUpdate,
    ) -> Result<CheckRun, Self::Error> {
        self.repository().update_check_run(check_run_id, update).await
    }
}

/// Only the newest run per name, so a re-run supersedes the runs before it.
fn list_page<'octo, 'r>(
    repository: &'r CheckHandler<'octo>,
    head_sha: &str,
    name: &str,
    page: u32,
) -> ListCheckRunsBuilder<'octo, 'r> {
    repository
        .list_check_runs(head_sha)
        .check_name(name)
        .filter(CheckRunFilter::Latest)
        .per_page(PER_PAGE)
        .page(page)
}

/// A listing is done once a page comes back empty or everything GitHub
/// counted has been collected.
fn is_last_page(received: usize, collected: usize, total_count: u64) -> bool {
    received == 0 || collected as u64 >= total_count
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn pages_ask_for_the_latest_run_with_the_context_name() {
        let checks = GitHubChecks::from_octocrab(Octocrab::default(), "ceph", "ceph");
        let repository = checks.repository();

        assert_eq!(
            serde_json::to_value(list_page(&repository, "abc123", "ceph-ci", 3)).unwrap(),
            json!({
                "check_name": "ceph-ci",
                "filter": "latest",
                "per_page": 100,
                "page": 3,
            })
        );
    }

    #[test]
    fn stops_once_total_count_is_collected() {
        assert!(!is_last_page(100, 100, 250));
        assert!(!is_last_page(100, 200, 250));
        assert!(is_last_page(50, 250, 250));
        assert!(is_last_page(3, 3, 3));
    }

    #[test]
    fn stops_on_an_empty_page() {
        assert!(is_last_page(0, 0, 0));
        // The count can be stale while paging; an empty page still ends it.
        assert!(is_last_page(0, 200, 250));
    }
}
