use octocrab::Octocrab;

pub mod models {
    pub mod checks;
}
mod checks;

pub use checks::{CheckHandler, CheckRunFilter, ListCheckRunsBuilder};

pub trait OctocrabExt {
    fn check_runs(&self, owner: impl Into<String>, repo: impl Into<String>) -> CheckHandler<'_>;
}

impl OctocrabExt for Octocrab {
    fn check_runs(&self, owner: impl Into<String>, repo: impl Into<String>) -> CheckHandler<'_> {
        CheckHandler::new(self, owner.into(), repo.into())
    }
}
