// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! folio-engine: keeps one job's status in sync across push, poll and restarts

pub mod backoff;
pub mod config;
pub mod connection;
pub mod coordinator;
pub mod effect;
pub mod env;
pub mod event;
pub mod executor;
pub mod guard;
pub mod persistence;
pub mod polling;
pub mod reconciler;
pub mod runtime;
pub mod scheduler;
pub mod session;

pub use config::{ConfigError, EngineConfig};
pub use connection::ConnectionManager;
pub use coordinator::{CoordinatorError, JobCoordinator};
pub use effect::{Effect, SessionUpdate};
pub use event::Event;
pub use executor::{ExecuteError, Executor};
pub use guard::{ActiveJobGuard, Decision, StaleReason};
pub use persistence::{JobPersistence, PersistenceError};
pub use polling::PollingFallback;
pub use reconciler::{IgnoreReason, ReconcileResult, StatusReconciler};
pub use runtime::{observe, SessionDeps, SessionHandle};
pub use scheduler::Scheduler;
pub use session::SessionCore;
