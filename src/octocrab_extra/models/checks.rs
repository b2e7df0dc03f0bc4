use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum CheckRunStatus {
    Queued,
    InProgress,
    Completed,
    // Only GitHub sets these; they are accepted when reading runs back.
    Waiting,
    Requested,
    Pending,
}

impl CheckRunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Waiting => "waiting",
            Self::Requested => "requested",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for CheckRunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckRunStatus {
    type Err = UnknownCheckRunStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(Self::Queued),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownCheckRunStatus(other.into())),
        }
    }
}

#[derive(Error, Diagnostic, Debug)]
#[error("Unknown check run status: {0}")]
#[diagnostic(help("expected one of: queued, in_progress, completed"))]
pub struct UnknownCheckRunStatus(String);

#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum CheckRunConclusion {
    ActionRequired,
    Cancelled,
    Failure,
    Neutral,
    Success,
    Skipped,
    TimedOut,
    /// Only GitHub sets this; it is accepted when reading runs back.
    Stale,
}

impl CheckRunConclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ActionRequired => "action_required",
            Self::Cancelled => "cancelled",
            Self::Failure => "failure",
            Self::Neutral => "neutral",
            Self::Success => "success",
            Self::Skipped => "skipped",
            Self::TimedOut => "timed_out",
            Self::Stale => "stale",
        }
    }
}

impl fmt::Display for CheckRunConclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckRunConclusion {
    type Err = UnknownCheckRunConclusion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "action_required" => Ok(Self::ActionRequired),
            "cancelled" => Ok(Self::Cancelled),
            "failure" => Ok(Self::Failure),
            "neutral" => Ok(Self::Neutral),
            "success" => Ok(Self::Success),
            "skipped" => Ok(Self::Skipped),
            "timed_out" => Ok(Self::TimedOut),
            other => Err(UnknownCheckRunConclusion(other.into())),
        }
    }
}

#[derive(Error, Diagnostic, Debug)]
#[error("Unknown check run conclusion: {0}")]
#[diagnostic(help(
    "expected one of: success, failure, neutral, cancelled, skipped, timed_out, action_required"
))]
pub struct UnknownCheckRunConclusion(String);

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CheckRunOutput {
    pub title: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<CheckRunAnnotation>>,
}

impl CheckRunOutput {
    pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            text: None,
            annotations: None,
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn annotations(mut self, annotations: impl Into<Vec<CheckRunAnnotation>>) -> Self {
        self.annotations = Some(annotations.into());
        self
    }
}

impl Default for CheckRunOutput {
    /// What a run shows before anything more useful is known about it.
    fn default() -> Self {
        Self::new("Summary", "started").text("details")
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CheckRunAnnotation {
    /// The path of the file to add an annotation to. For example, assets/css/main.css.
    pub path: String,
    /// The start line of the annotation.
    pub start_line: u64,
    /// The end line of the annotation.
    pub end_line: u64,
    /// The start column of the annotation. Annotations only support
    /// `start_column` and `end_column` on the same line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_column: Option<u64>,
    /// The end column of the annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u64>,
    /// The level of the annotation.
    pub annotation_level: AnnotationLevel,
    /// A short description of the feedback for these lines of code. The
    /// maximum size is 64 KB.
    pub message: String,
    /// The title that represents the annotation. The maximum size is 255
    /// characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Details about this annotation. The maximum size is 64 KB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_details: Option<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum AnnotationLevel {
    Notice,
    Warning,
    Failure,
}

/// Body of a create-check-run request.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct NewCheckRun {
    pub name: String,
    pub head_sha: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CheckRunStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<CheckRunConclusion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<CheckRunOutput>,
}

impl NewCheckRun {
    pub fn new(name: impl Into<String>, head_sha: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            head_sha: head_sha.into(),
            details_url: None,
            external_id: None,
            status: None,
            started_at: None,
            conclusion: None,
            completed_at: None,
            output: None,
        }
    }

    /// The URL of the integrator's site that has the full details of the
    /// check. If the integrator does not provide this, then the homepage of
    /// the GitHub app is used.
    pub fn details_url(mut self, details_url: Option<String>) -> Self {
        self.details_url = details_url;
        self
    }

    /// A reference for the run on the integrator's system.
    pub fn external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    /// The current status.
    ///
    /// Default: [`CheckRunStatus::Queued`]
    pub fn status(mut self, status: CheckRunStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// The time that the check run began.
    pub fn started_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.started_at = Some(started_at);
        self
    }

    /// The final conclusion of the check. **Required if you provide
    /// [`completed_at`](Self::completed_at) or a status of
    /// [`CheckRunStatus::Completed`]**.
    pub fn conclusion(mut self, conclusion: CheckRunConclusion) -> Self {
        self.conclusion = Some(conclusion);
        self
    }

    /// The time that the check completed.
    pub fn completed_at(mut self, completed_at: DateTime<Utc>) -> Self {
        self.completed_at = Some(completed_at);
        self
    }

    pub fn output(mut self, output: CheckRunOutput) -> Self {
        self.output = Some(output);
        self
    }
}

/// Body of an update-check-run request. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct CheckRunUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CheckRunStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<CheckRunConclusion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<CheckRunOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details_url: Option<String>,
}

impl CheckRunUpdate {
    /// Marks the run completed with `conclusion`.
    pub fn completed(conclusion: CheckRunConclusion, completed_at: DateTime<Utc>) -> Self {
        Self {
            status: Some(CheckRunStatus::Completed),
            conclusion: Some(conclusion),
            completed_at: Some(completed_at),
            ..Self::default()
        }
    }

    pub fn output(mut self, output: CheckRunOutput) -> Self {
        self.output = Some(output);
        self
    }

    pub fn details_url(mut self, details_url: Option<String>) -> Self {
        self.details_url = details_url;
        self
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CheckRunOutputResponse {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub annotations_count: u64,
}

/// A check performed on the code of a given code change
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CheckRun {
    /// The id of the check.
    pub id: u64,
    /// The SHA of the commit that is being checked.
    pub head_sha: String,
    pub name: String,
    /// The phase of the lifecycle that the check is currently in.
    pub status: CheckRunStatus,
    pub conclusion: Option<CheckRunConclusion>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub details_url: Option<String>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub output: Option<CheckRunOutputResponse>,
}

/// A page of check runs for a git reference.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct CheckRuns {
    pub total_count: u64,
    pub check_runs: Vec<CheckRun>,
}
