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

use check_reporter::config::{Config, Phase};
use check_reporter::{CheckReporter, Report};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;

    let reporter = CheckReporter::new(
        config.owner,
        config.project,
        config.context,
        &config.private_key,
        config.app_id,
        config.installation_id,
    )
    .await?;

    let report = match config.phase {
        Phase::Start { status, output } => {
            reporter
                .start(&config.sha, status, output, config.details_url)
                .await
        }
        Phase::Complete { conclusion, output } => {
            reporter
                .complete(&config.sha, conclusion, output, config.details_url)
                .await
        }
    };

    // Remote failures were logged by the reporter and do not fail the step.
    match report {
        Report::Created(id) => tracing::info!(
            context = reporter.context(),
            sha = %config.sha,
            check_run_id = id,
            "created check run"
        ),
        Report::Updated(id) => tracing::info!(
            context = reporter.context(),
            sha = %config.sha,
            check_run_id = id,
            "updated check run"
        ),
        Report::Failed => tracing::warn!(
            context = reporter.context(),
            sha = %config.sha,
            "check run was not reported"
        ),
    }

    Ok(())
}
