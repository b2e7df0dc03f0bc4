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

//! Inputs of the `check-reporter` binary.
//!
//! Everything comes from the environment, the way a GitHub Action receives
//! its inputs: `INPUT_*` variables plus the `GITHUB_*` variables set by the
//! runner.

use std::path::PathBuf;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::octocrab_extra::models::checks::{CheckRunConclusion, CheckRunOutput, CheckRunStatus};

/// What to report, and which run to report it on.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Start {
        status: CheckRunStatus,
        /// `None` when no output input was given.
        output: Option<CheckRunOutput>,
    },
    Complete {
        conclusion: CheckRunConclusion,
        output: CheckRunOutput,
    },
}

#[derive(Debug)]
pub struct Config {
    pub owner: String,
    pub project: String,
    pub sha: String,
    pub context: String,
    pub app_id: u64,
    pub installation_id: u64,
    pub private_key: SecretString,
    pub phase: Phase,
    pub details_url: Option<String>,
}

impl Config {
    /// Reads the process environment, after loading `.env` if there is one.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from `lookup`, which maps a variable name to
    /// its value. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let (owner, project) = match (get("INPUT_OWNER"), get("INPUT_PROJECT")) {
            (Some(owner), Some(project)) => (owner, project),
            (owner, project) => {
                let repository = require("GITHUB_REPOSITORY")?;
                let (repo_owner, repo_name) = split_repository(&repository)?;
                (
                    owner.unwrap_or_else(|| repo_owner.to_owned()),
                    project.unwrap_or_else(|| repo_name.to_owned()),
                )
            }
        };

        let sha = get("INPUT_SHA")
            .or_else(|| get("GITHUB_SHA"))
            .ok_or(ConfigError::Missing("GITHUB_SHA"))?;
        let context = require("INPUT_CONTEXT")?;
        let app_id = parse_integer("INPUT_APP_ID", require("INPUT_APP_ID")?)?;
        let installation_id =
            parse_integer("INPUT_INSTALLATION_ID", require("INPUT_INSTALLATION_ID")?)?;

        let private_key = match get("INPUT_PRIVATE_KEY") {
            Some(pem) => pem,
            None => {
                let path = PathBuf::from(require("INPUT_PRIVATE_KEY_PATH")?);
                std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::ReadPrivateKey { path, source })?
            }
        };

        let title = get("INPUT_TITLE");
        let summary = get("INPUT_SUMMARY");
        let text = get("INPUT_TEXT");

        let phase = match require("INPUT_PHASE")?.as_str() {
            "start" => {
                let status = match get("INPUT_STATUS") {
                    Some(status) => status.parse::<CheckRunStatus>()?,
                    None => CheckRunStatus::InProgress,
                };
                let output = if title.is_none() && summary.is_none() && text.is_none() {
                    None
                } else {
                    let defaults = CheckRunOutput::default();
                    Some(build_output(
                        title.unwrap_or(defaults.title),
                        summary.unwrap_or(defaults.summary),
                        text,
                    ))
                };
                Phase::Start { status, output }
            }
            "complete" => {
                let conclusion: CheckRunConclusion = require("INPUT_CONCLUSION")?.parse()?;
                let output = build_output(
                    title.unwrap_or_else(|| context.clone()),
                    summary.unwrap_or_else(|| conclusion.to_string()),
                    text,
                );
                Phase::Complete { conclusion, output }
            }
            other => return Err(ConfigError::Phase(other.to_owned())),
        };

        Ok(Self {
            owner,
            project,
            sha,
            context,
            app_id,
            installation_id,
            private_key: SecretString::from(private_key),
            phase,
            details_url: get("INPUT_DETAILS_URL"),
        })
    }
}

fn split_repository(repository: &str) -> Result<(&str, &str), ConfigError> {
    match repository.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner, name))
        }
        _ => Err(ConfigError::Repository(repository.to_owned())),
    }
}

fn parse_integer(name: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::NotAnInteger { name, value })
}

fn build_output(title: String, summary: String, text: Option<String>) -> CheckRunOutput {
    let output = CheckRunOutput::new(title, summary);
    match text {
        Some(text) => output.text(text),
        None => output,
    }
}
