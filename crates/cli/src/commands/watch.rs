// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `folio watch`: follow a job to its terminal state.
//!
//! Without arguments the remembered job is resumed. With `--job`/`--book`
//! the given job is recorded and observed, unless a different job is still
//! in flight.

use super::{Context, LiveCoordinator};
use crate::color;
use crate::exit_error::ExitError;
use crate::output::{print_decision, UpdatePrinter};
use clap::Args;
use folio_core::{JobHandle, JobStatusKind};
use folio_engine::{Decision, SessionUpdate};
use tokio::sync::mpsc;

#[derive(Args)]
pub struct WatchArgs {
    /// Id of a freshly submitted job
    #[arg(long, requires = "book")]
    pub job: Option<String>,
    /// Book the job belongs to
    #[arg(long, requires = "job")]
    pub book: Option<String>,
}

pub async fn handle(args: WatchArgs, ctx: &Context) -> anyhow::Result<()> {
    let requested = args
        .job
        .zip(args.book)
        .map(|(job, book)| JobHandle::new(job.as_str(), book.as_str()));
    let mut coordinator = ctx.coordinator()?;
    let decision = coordinator.resolve().await;

    let updates = match (decision, requested) {
        (Decision::ResumeJob(active), Some(job)) if active != job => {
            return Err(ExitError::usage(format!(
                "job {active} is still in flight; watch it or run {} first",
                color::literal("folio abandon")
            ))
            .into());
        }
        (Decision::ResumeJob(active), _) => {
            print_decision(&Decision::ResumeJob(active.clone()), ctx.format)?;
            coordinator.resume(active)?
        }
        (Decision::NoActiveJob, Some(job)) => coordinator.begin(job)?,
        (decision, Some(job)) => {
            print_decision(&decision, ctx.format)?;
            coordinator.begin(job)?
        }
        (decision, None) => return print_decision(&decision, ctx.format),
    };
    follow(&mut coordinator, updates, ctx).await
}

async fn follow(
    coordinator: &mut LiveCoordinator,
    mut updates: mpsc::Receiver<SessionUpdate>,
    ctx: &Context,
) -> anyhow::Result<()> {
    let mut printer = UpdatePrinter::new(ctx.format);
    let mut outcome = None;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            update = updates.recv() => {
                let Some(update) = update else { break };
                if let SessionUpdate::Terminal { snapshot } = &update {
                    outcome = Some(snapshot.status);
                }
                for line in printer.render(&update)? {
                    println!("{line}");
                }
            }
            _ = &mut ctrl_c => {
                if let Some(session) = coordinator.session() {
                    session.cancel();
                    session.finished().await;
                }
                eprintln!("stopped watching; run {} to pick it up again", color::literal("folio watch"));
                return Ok(());
            }
        }
    }

    match outcome {
        Some(JobStatusKind::Completed) => Ok(()),
        Some(JobStatusKind::Failed) => Err(ExitError::job_failed("job failed").into()),
        _ => Err(anyhow::anyhow!("observation ended before the job finished")),
    }
}
