// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! folio-adapters: I/O ports for the job watcher
//!
//! - [`status`]: one-shot status fetch over HTTP
//! - [`channel`]: live-update WebSocket channel
//! - [`store`]: durable key-value storage

pub mod channel;
pub mod endpoint;
pub mod status;
pub mod store;

pub use channel::{ChannelEvent, ChannelHandle, ConnectionId, LiveChannel, WsLiveChannel};
pub use endpoint::{Endpoint, EndpointError};
pub use status::{HttpStatusClient, StatusClient, StatusError};
pub use store::{FileStore, KeyValueStore, StoreError};

#[cfg(any(test, feature = "test-support"))]
pub use channel::{FakeLiveChannel, OpenCall};
#[cfg(any(test, feature = "test-support"))]
pub use status::FakeStatusClient;
#[cfg(any(test, feature = "test-support"))]
pub use store::{MemoryStore, StoreOp};
