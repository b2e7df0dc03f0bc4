use octocrab::Octocrab;

use crate::octocrab_extra::models::checks::{CheckRun, CheckRunUpdate, NewCheckRun};

mod list_check_runs;

pub use list_check_runs::{CheckRunFilter, ListCheckRunsBuilder};

/// Check-run endpoints of a single repository.
pub struct CheckHandler<'octo> {
    crab: &'octo Octocrab,
    owner: String,
    repo: String,
}

impl<'octo> CheckHandler<'octo> {
    pub(crate) fn new(crab: &'octo Octocrab, owner: String, repo: String) -> Self {
        Self { crab, owner, repo }
    }

    pub async fn create_check_run(&self, check_run: &NewCheckRun) -> octocrab::Result<CheckRun> {
        let route = format!(
            "/repos/{owner}/{repo}/check-runs",
            owner = self.owner,
            repo = self.repo,
        );

        self.crab.post(route, Some(check_run)).await
    }

    pub async fn update_check_run(
        &self,
        check_run_id: u64,
        update: &CheckRunUpdate,
    ) -> octocrab::Result<CheckRun> {
        let route = format!(
            "/repos/{owner}/{repo}/check-runs/{check_run_id}",
            owner = self.owner,
            repo = self.repo,
        );

        self.crab.patch(route, Some(update)).await
    }

    /// Check runs for a commit SHA, branch or tag.
    pub fn list_check_runs(&self, git_ref: impl Into<String>) -> ListCheckRunsBuilder<'octo, '_> {
        ListCheckRunsBuilder::new(self, git_ref.into())
    }
}
