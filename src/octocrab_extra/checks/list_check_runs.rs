use crate::octocrab_extra::models::checks::CheckRuns;

#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckRunFilter {
    Latest,
    All,
}

#[derive(serde::Serialize)]
pub struct ListCheckRunsBuilder<'octo, 'r> {
    #[serde(skip)]
    handler: &'r super::CheckHandler<'octo>,
    #[serde(skip)]
    git_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    check_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<CheckRunFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    per_page: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
}

impl<'octo, 'r> ListCheckRunsBuilder<'octo, 'r> {
    pub(crate) fn new(handler: &'r super::CheckHandler<'octo>, git_ref: String) -> Self {
        Self {
            handler,
            git_ref,
            check_name: None,
            filter: None,
            per_page: None,
            page: None,
        }
    }

    /// Returns only check runs with the specified name.
    pub fn check_name(mut self, check_name: impl Into<String>) -> Self {
        self.check_name = Some(check_name.into());
        self
    }

    /// Filters check runs by their `completed_at` timestamp. `latest` returns
    /// the most recent check runs.
    ///
    /// Default: [`CheckRunFilter::Latest`]
    pub fn filter(mut self, filter: CheckRunFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Results per page (max 100).
    pub fn per_page(mut self, per_page: impl Into<u8>) -> Self {
        self.per_page = Some(per_page.into());
        self
    }

    /// Page number of the results to fetch, starting at 1.
    pub fn page(mut self, page: impl Into<u32>) -> Self {
        self.page = Some(page.into());
        self
    }

    /// Send the actual request.
    pub async fn send(self) -> octocrab::Result<CheckRuns> {
        let route = format!(
            "/repos/{owner}/{repo}/commits/{git_ref}/check-runs",
            owner = self.handler.owner,
            repo = self.handler.repo,
            git_ref = self.git_ref,
        );

        self.handler.crab.get(route, Some(&self)).await
    }
}
