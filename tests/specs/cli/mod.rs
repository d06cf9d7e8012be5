// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

mod abandon;
mod check;
mod help;
mod status;
mod watch;
