// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `folio status <job>`: one-shot status fetch for any job.

use super::Context;
use crate::exit_error::ExitError;
use crate::output::print_snapshot;
use anyhow::Context as _;
use clap::Args;
use folio_adapters::{StatusClient, StatusError};
use folio_core::JobId;

#[derive(Args)]
pub struct StatusArgs {
    /// Job to look up
    pub job_id: String,
}

pub async fn handle(args: StatusArgs, ctx: &Context) -> anyhow::Result<()> {
    let client = ctx.status_client()?;
    let job_id = JobId::new(args.job_id.as_str());
    match client.fetch(&job_id).await {
        Ok(snapshot) => print_snapshot(&snapshot, ctx.format),
        Err(StatusError::NotFound) => {
            Err(ExitError::job_failed(format!("job {job_id} not found")).into())
        }
        Err(e) => Err(e).with_context(|| format!("fetching status of job {job_id}")),
    }
}
