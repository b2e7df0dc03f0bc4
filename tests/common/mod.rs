#![allow(dead_code)]

use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex};

use check_reporter::{CheckRun, CheckRunStatus, CheckRunUpdate, ChecksApi, NewCheckRun};
use thiserror::Error;
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

#[derive(Debug, Error)]
#[error("remote service unavailable")]
pub struct Unavailable;

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Create(NewCheckRun),
    List { head_sha: String, name: String },
    Update { id: u64, update: CheckRunUpdate },
}

/// Keeps check runs in memory and records every request made to it.
#[derive(Default)]
pub struct FakeChecks {
    runs: Mutex<Vec<CheckRun>>,
    requests: Mutex<Vec<Request>>,
    fail_list: bool,
    fail_create: bool,
    fail_update: bool,
}

impl FakeChecks {
    pub fn with_runs(runs: impl IntoIterator<Item = CheckRun>) -> Self {
        Self {
            runs: Mutex::new(runs.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn failing_update(mut self) -> Self {
        self.fail_update = true;
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<Request> {
        self.requests()
            .into_iter()
            .filter(|r| !matches!(r, Request::List { .. }))
            .collect()
    }

    pub fn runs(&self) -> Vec<CheckRun> {
        self.runs.lock().unwrap().clone()
    }

    fn record(&self, request: Request) {
        self.requests.lock().unwrap().push(request);
    }
}

pub fn check_run(id: u64, head_sha: &str, name: &str, status: CheckRunStatus) -> CheckRun {
    CheckRun {
        id,
        head_sha: head_sha.into(),
        name: name.into(),
        status,
        conclusion: None,
        external_id: None,
        html_url: None,
        details_url: None,
        started_at: None,
        completed_at: None,
        output: None,
    }
}

impl ChecksApi for FakeChecks {
    type Error = Unavailable;

    async fn create_check_run(&self, new: &NewCheckRun) -> Result<CheckRun, Self::Error> {
        self.record(Request::Create(new.clone()));
        if self.fail_create {
            return Err(Unavailable);
        }

        let mut runs = self.runs.lock().unwrap();
        let mut run = check_run(
            1000 + runs.len() as u64,
            &new.head_sha,
            &new.name,
            new.status.unwrap_or(CheckRunStatus::Queued),
        );
        run.conclusion = new.conclusion;
        run.started_at = new.started_at;
        run.completed_at = new.completed_at;
        run.details_url = new.details_url.clone();
        runs.push(run.clone());
        Ok(run)
    }

    // Filters by commit only, like a service that ignores `check_name`.
    async fn list_check_runs(
        &self,
        head_sha: &str,
        name: &str,
    ) -> Result<Vec<CheckRun>, Self::Error> {
        self.record(Request::List {
            head_sha: head_sha.into(),
            name: name.into(),
        });
        if self.fail_list {
            return Err(Unavailable);
        }

        Ok(self
            .runs
            .lock()
            .unwrap()
            .iter()
            .filter(|run| run.head_sha == head_sha)
            .cloned()
            .collect())
    }

    async fn update_check_run(
        &self,
        check_run_id: u64,
        update: &CheckRunUpdate,
    ) -> Result<CheckRun, Self::Error> {
        self.record(Request::Update {
            id: check_run_id,
            update: update.clone(),
        });
        if self.fail_update {
            return Err(Unavailable);
        }

        let mut runs = self.runs.lock().unwrap();
        let run = runs
            .iter_mut()
            .find(|run| run.id == check_run_id)
            .ok_or(Unavailable)?;
        if let Some(status) = update.status {
            run.status = status;
        }
        run.conclusion = update.conclusion.or(run.conclusion);
        run.completed_at = update.completed_at.or(run.completed_at);
        Ok(run.clone())
    }
}

#[derive(Debug, Clone)]
pub struct LogLine {
    pub level: Level,
    pub fields: String,
}

/// Collects the events emitted while its guard is alive on this thread.
#[derive(Clone, Default)]
pub struct Logs(Arc<Mutex<Vec<LogLine>>>);

impl Logs {
    pub fn capture() -> (Self, DefaultGuard) {
        let logs = Self::default();
        let subscriber = tracing_subscriber::registry().with(logs.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (logs, guard)
    }

    pub fn at(&self, level: Level) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|line| line.level == level)
            .map(|line| line.fields.clone())
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for Logs {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Fields::default();
        event.record(&mut fields);
        self.0.lock().unwrap().push(LogLine {
            level: *event.metadata().level(),
            fields: fields.0,
        });
    }
}

#[derive(Default)]
struct Fields(String);

impl Visit for Fields {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if !self.0.is_empty() {
            self.0.push(' ');
        }
        if field.name() == "message" {
            let _ = write!(self.0, "{value:?}");
        } else {
            let _ = write!(self.0, "{}={:?}", field.name(), value);
        }
    }
}
