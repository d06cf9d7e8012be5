// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `folio check`: validate the remembered job without observing it.

use super::Context;
use crate::output::print_decision;
use folio_engine::ActiveJobGuard;

pub async fn handle(ctx: &Context) -> anyhow::Result<()> {
    let guard = ActiveJobGuard::new(ctx.status_client()?, ctx.persistence());
    let decision = guard.resolve().await;
    print_decision(&decision, ctx.format)
}
