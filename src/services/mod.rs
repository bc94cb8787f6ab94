// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - fetch engine and its collaborators.

pub mod batch;
pub mod cache;
pub mod credentials;
pub mod fault;
pub mod merge;
pub mod orchestrator;
pub mod pager;
pub mod retry;
pub mod strava;
pub mod transport;

pub use batch::{BatchFetcher, ResourceSource};
pub use cache::{JsonCache, Snapshot};
pub use credentials::CredentialStore;
pub use merge::Watermark;
pub use orchestrator::Orchestrator;
pub use pager::{PageFetcher, PageSource};
pub use retry::{RetryAction, RetryConfig};
pub use strava::StravaClient;
pub use transport::{HttpResponse, ReqwestTransport, Transport, TransportError};
