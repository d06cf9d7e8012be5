// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `folio abandon`: forget the remembered job so a new one may start.

use super::Context;
use crate::color;
use crate::output::OutputFormat;

pub async fn handle(ctx: &Context) -> anyhow::Result<()> {
    let mut coordinator = ctx.coordinator()?;
    let job = match coordinator.persistence().load() {
        Ok(job) => job,
        Err(e) => {
            tracing::warn!(error = %e, "abandoning unreadable job record");
            None
        }
    };
    coordinator.abandon().await?;

    match ctx.format {
        OutputFormat::Text => match &job {
            Some(job) => println!("abandoned job {}", color::header(&job.to_string())),
            None => println!("no active job"),
        },
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&serde_json::json!({ "abandoned": job }))?)
        }
    }
    Ok(())
}
